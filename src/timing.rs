use tracing::trace;

/// Frame deltas for the render loop, with a guard against stalls.
pub struct FrameClock {
  last: f64,
  max_delta: f64,
}

impl FrameClock {
  /// Longest frame still simulated, anything slower is skipped.
  pub const MAX_DELTA: f64 = 0.160;

  pub fn new(now: f64) -> Self {
    Self {
      last: now,
      max_delta: Self::MAX_DELTA,
    }
  }

  /// Seconds since the previous tick, or `None` when the gap is too long to
  /// integrate safely. The clock advances either way.
  pub fn tick(&mut self, now: f64) -> Option<f32> {
    let delta = now - self.last;
    self.last = now;
    if delta >= 0.0 && delta < self.max_delta {
      Some(delta as f32)
    } else {
      trace!("skipping frame after {:.3}s stall", delta);
      None
    }
  }
}

/// Frames rendered during the last full second.
pub struct FpsCounter {
  frames: u32,
  last_update: f64,
  fps: u32,
}

impl FpsCounter {
  pub fn new() -> Self {
    Self {
      frames: 0,
      last_update: 0.0,
      fps: 0,
    }
  }

  pub fn tick(&mut self, now: f64) {
    self.frames += 1;
    if now - self.last_update > 1.0 {
      self.last_update = now;
      self.fps = self.frames;
      self.frames = 0;
    }
  }

  pub fn fps(&self) -> u32 {
    self.fps
  }
}

impl Default for FpsCounter {
  fn default() -> Self {
    Self::new()
  }
}
