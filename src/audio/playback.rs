use std::f32::consts::TAU;
use std::time::Duration;

use anyhow::anyhow;

use tokio::time::{self, MissedTickBehavior};

use tracing::info;

use crate::audio::AudioConfig;
use crate::audio::backend::{MediaSource, PlaybackControl};
use crate::audio::worker::{FrameRequest, FrameSender};

/// Plays an already decoded interleaved buffer in real time, one frame per
/// frame duration.
pub struct BufferSource {
  config: AudioConfig,
  samples: Vec<f32>,
}

impl BufferSource {
  pub fn new(config: AudioConfig, samples: Vec<f32>) -> Self {
    Self { config, samples }
  }

  pub fn duration(&self) -> f32 {
    let frames = self.samples.len() / self.config.channels.max(1) as usize;
    frames as f32 / self.config.rate
  }
}

impl MediaSource for BufferSource {
  type Error = anyhow::Error;

  async fn run(self, frames: FrameSender, control: PlaybackControl) -> Result<(), Self::Error> {
    let frame_duration = self.config.frame_duration();
    let len = self.config.frame_buffer_length;
    let mut ticker = time::interval(Duration::from_secs_f32(frame_duration));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut offset = 0;
    loop {
      ticker.tick().await;
      if control.is_stopped() {
        break;
      }
      if !control.is_playing() {
        continue;
      }
      if offset + len > self.samples.len() {
        info!("end of track after {:.1}s", control.current_time());
        control.mark_ended();
        break;
      }

      let frame = FrameRequest {
        frame_buffer: self.samples[offset..offset + len].to_vec(),
        time: frame_duration,
      };
      offset += len;
      control.advance(self.config.fft_size());

      if !frames.send(frame) {
        return Err(anyhow!("analysis worker went away"));
      }
    }

    Ok(())
  }
}

/// A pulsing stereo tone at `bpm`: a decaying low kick under a slow arpeggio.
pub fn demo_track(config: &AudioConfig, seconds: f32, bpm: f32) -> Vec<f32> {
  const ARPEGGIO: [f32; 4] = [220.0, 277.18, 329.63, 440.0];

  let rate = config.rate;
  let channels = config.channels.max(1) as usize;
  let frames = (seconds * rate) as usize;
  let beat_len = 60.0 / bpm;

  let mut samples = Vec::with_capacity(frames * channels);
  for i in 0..frames {
    let t = i as f32 / rate;
    let beat = (t / beat_len) as usize;
    let in_beat = t - beat as f32 * beat_len;

    let kick = (-in_beat * 12.0).exp() * (TAU * 55.0 * t).sin();
    let note = ARPEGGIO[beat % ARPEGGIO.len()];
    let lead = 0.25 * (-in_beat * 3.0).exp() * (TAU * note * t).sin();
    // louder every other bar so the spawn signal has something to follow
    let swell = if (beat / 8) % 2 == 0 { 0.4 } else { 0.8 };

    let s = ((kick + lead) * swell).clamp(-1.0, 1.0);
    samples.extend(std::iter::repeat_n(s, channels));
  }
  samples
}
