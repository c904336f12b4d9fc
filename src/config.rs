use crate::audio::AudioConfig;
use crate::audio::mapper::MappingMode;
use crate::audio::worker::AnalysisSettings;
use crate::game::GameConfig;
use crate::visualisation::store::Quality;

#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
  pub quality: Quality,
  pub show_fps: bool,
}

impl Default for RenderConfig {
  fn default() -> Self {
    Self {
      quality: Quality::High,
      show_fps: true,
    }
  }
}

/// Synthesized stand-in for a decoded track.
#[derive(Clone, Debug, PartialEq)]
pub struct DemoTrack {
  pub seconds: f32,
  pub bpm: f32,
}

impl Default for DemoTrack {
  fn default() -> Self {
    Self {
      seconds: 90.0,
      bpm: 128.0,
    }
  }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppConfig {
  pub audio: AudioConfig,
  pub analysis: AnalysisSettings,
  pub game: GameConfig,
  pub render: RenderConfig,
  pub demo: DemoTrack,
}

impl AppConfig {
  /// Switch what drives the background. Applies from the next session.
  pub fn toggle_mapping_mode(&mut self) -> MappingMode {
    let mode = self.analysis.mapper.mode.toggled();
    self.analysis.mapper.mode = mode;
    mode
  }

  /// Visualizer only, no enemies. Applies from the next session.
  pub fn toggle_idle(&mut self) -> bool {
    self.audio.idle = !self.audio.idle;
    self.audio.idle
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::audio::mapper::Color;
  use crate::audio::worker::{AnalysisState, FrameRequest};

  fn silent(config: &AppConfig) -> FrameRequest {
    FrameRequest {
      frame_buffer: vec![0.0; config.audio.frame_buffer_length],
      time: 1.0,
    }
  }

  #[test]
  fn test_toggles_flip_back_and_forth() {
    let mut config = AppConfig::default();
    assert_eq!(config.toggle_mapping_mode(), MappingMode::Bands);
    assert_eq!(config.toggle_mapping_mode(), MappingMode::Beat);
    assert!(config.toggle_idle());
    assert!(!config.toggle_idle());
    assert_eq!(config, AppConfig::default());
  }

  #[test]
  fn test_band_mode_reaches_the_analysis() {
    let mut config = AppConfig::default();
    config.toggle_mapping_mode();
    let mut state = AnalysisState::setup(&config.audio, &config.analysis).unwrap();
    let response = state.process(&silent(&config)).unwrap();
    // band colours live in their own, brighter range
    assert_eq!(response.canvas_bg, Some(Color::new(120, 120, 120)));
  }

  #[test]
  fn test_idle_toggle_silences_spawns() {
    let mut config = AppConfig::default();
    config.toggle_idle();
    let mut state = AnalysisState::setup(&config.audio, &config.analysis).unwrap();
    for _ in 0..60 {
      assert_eq!(state.process(&silent(&config)).unwrap().num_enemies, None);
    }
  }
}
