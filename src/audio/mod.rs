pub mod backend;
pub mod beat;
pub mod mapper;
pub mod playback;
pub mod processor;
pub mod worker;

use crate::error::{AnalysisError, Result};

const MAX_FFT_SIZE: usize = 1 << 16;

/// Audio metadata fixed for the lifetime of a session.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioConfig {
  pub channels: u16,
  pub rate: f32,
  /// interleaved samples per delivered frame, all channels included
  pub frame_buffer_length: usize,
  /// visualizer only, never emit spawn signals
  pub idle: bool,
  /// apply a hann window before the fft
  pub window: bool,
}

impl Default for AudioConfig {
  fn default() -> Self {
    Self {
      channels: 2,
      rate: 44_100.0,
      frame_buffer_length: 2048,
      idle: false,
      window: false,
    }
  }
}

impl AudioConfig {
  /// Mono samples per frame, which is also the fft size.
  pub fn fft_size(&self) -> usize {
    self.frame_buffer_length / self.channels.max(1) as usize
  }

  /// Seconds of audio carried by one frame.
  pub fn frame_duration(&self) -> f32 {
    self.fft_size() as f32 / self.rate
  }

  pub fn validate(&self) -> Result<()> {
    if self.channels == 0 {
      return Err(AnalysisError::Configuration("channel count is zero".into()));
    }
    if !self.rate.is_finite() || self.rate <= 0.0 {
      return Err(AnalysisError::Configuration(format!(
        "invalid sample rate {}",
        self.rate
      )));
    }
    if self.frame_buffer_length == 0 || self.frame_buffer_length % self.channels as usize != 0 {
      return Err(AnalysisError::Configuration(format!(
        "frame buffer length {} does not hold whole {}-channel frames",
        self.frame_buffer_length, self.channels
      )));
    }
    let fft_size = self.fft_size();
    if fft_size < 2 || fft_size > MAX_FFT_SIZE || !fft_size.is_power_of_two() {
      return Err(AnalysisError::Configuration(format!(
        "unsupported fft size {fft_size}"
      )));
    }
    Ok(())
  }
}
