use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::audio::worker::FrameSender;

/// Transport shared between a media source and whoever drives it.
#[derive(Clone)]
pub struct PlaybackControl {
  inner: Arc<PlaybackState>,
}

struct PlaybackState {
  playing: AtomicBool,
  stop: AtomicBool,
  ended: AtomicBool,
  // per-channel samples delivered so far
  position: AtomicU64,
  rate: f32,
}

impl PlaybackControl {
  pub fn new(rate: f32) -> Self {
    Self {
      inner: Arc::new(PlaybackState {
        playing: AtomicBool::new(false),
        stop: AtomicBool::new(false),
        ended: AtomicBool::new(false),
        position: AtomicU64::new(0),
        rate,
      }),
    }
  }

  pub fn play(&self) {
    self.inner.playing.store(true, Ordering::Relaxed);
  }

  pub fn pause(&self) {
    self.inner.playing.store(false, Ordering::Relaxed);
  }

  pub fn is_playing(&self) -> bool {
    self.inner.playing.load(Ordering::Relaxed)
  }

  /// Seconds of audio delivered so far.
  pub fn current_time(&self) -> f32 {
    self.inner.position.load(Ordering::Relaxed) as f32 / self.inner.rate
  }

  pub fn advance(&self, samples: usize) {
    self
      .inner
      .position
      .fetch_add(samples as u64, Ordering::Relaxed);
  }

  pub fn mark_ended(&self) {
    self.inner.playing.store(false, Ordering::Relaxed);
    self.inner.ended.store(true, Ordering::Relaxed);
  }

  pub fn is_ended(&self) -> bool {
    self.inner.ended.load(Ordering::Relaxed)
  }

  pub fn stop(&self) {
    self.inner.stop.store(true, Ordering::Relaxed);
  }

  pub fn is_stopped(&self) -> bool {
    self.inner.stop.load(Ordering::Relaxed)
  }
}

/// Anything that can deliver decoded frames to the analysis worker at its own
/// pace.
pub trait MediaSource: Send {
  type Error;

  async fn run(self, frames: FrameSender, control: PlaybackControl) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_transport_flags() {
    let control = PlaybackControl::new(100.0);
    assert!(!control.is_playing());
    control.play();
    assert!(control.is_playing());
    control.pause();
    assert!(!control.is_playing());

    control.advance(50);
    control.advance(25);
    assert_eq!(control.current_time(), 0.75);

    control.play();
    control.mark_ended();
    assert!(control.is_ended());
    assert!(!control.is_playing());
  }

  #[test]
  fn test_clones_share_state() {
    let control = PlaybackControl::new(1.0);
    let other = control.clone();
    other.stop();
    assert!(control.is_stopped());
  }
}
