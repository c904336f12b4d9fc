use std::collections::VecDeque;

#[derive(Clone, Debug, PartialEq)]
pub struct BeatConfig {
  /// samples kept in the rolling history
  pub capacity: usize,
  /// seconds accumulated between intensity samples
  pub threshold: f32,
  /// gain applied to the spectrum peak
  pub gain: f32,
}

impl Default for BeatConfig {
  fn default() -> Self {
    Self {
      capacity: 30,
      threshold: 1.0 / 30.0,
      gain: 5.0,
    }
  }
}

/// Fixed capacity fifo of intensity samples.
#[derive(Clone, Debug)]
pub struct BeatHistory {
  samples: VecDeque<f32>,
  capacity: usize,
}

impl BeatHistory {
  pub fn new(capacity: usize) -> Self {
    let capacity = capacity.max(1);
    Self {
      samples: VecDeque::with_capacity(capacity),
      capacity,
    }
  }

  pub fn push(&mut self, value: f32) {
    if self.samples.len() >= self.capacity {
      self.samples.pop_front();
    }
    self.samples.push_back(value);
  }

  /// Mean over the samples actually held, zero when empty.
  pub fn average(&self) -> f32 {
    if self.samples.is_empty() {
      return 0.0;
    }
    self.samples.iter().sum::<f32>() / self.samples.len() as f32
  }

  #[cfg(test)]
  pub fn len(&self) -> usize {
    self.samples.len()
  }

  #[cfg(test)]
  pub fn iter(&self) -> impl Iterator<Item = &f32> {
    self.samples.iter()
  }
}

/// Turns a stream of spectra into a smoothed beat intensity, sampled on a
/// fixed time cadence.
pub struct BeatDetector {
  config: BeatConfig,
  ftimer: f32,
  history: BeatHistory,
}

impl BeatDetector {
  pub fn new(config: BeatConfig) -> Self {
    let history = BeatHistory::new(config.capacity);
    Self {
      config,
      ftimer: 0.0,
      history,
    }
  }

  /// Feed one spectrum covering `elapsed` seconds. Returns the new rolling
  /// average whenever the accumulated time crosses the threshold.
  pub fn step(&mut self, spectrum: &[f32], elapsed: f32) -> Option<f32> {
    if elapsed.is_finite() && elapsed > 0.0 {
      self.ftimer += elapsed;
    }

    if self.ftimer <= self.config.threshold {
      return None;
    }
    // keep the phase, whole periods missed during a long frame are dropped
    let threshold = self.config.threshold;
    self.ftimer = if threshold > 0.0 {
      (self.ftimer - threshold) % threshold
    } else {
      0.0
    };

    self.history.push(self.instant_intensity(spectrum));
    Some(self.history.average())
  }

  fn instant_intensity(&self, spectrum: &[f32]) -> f32 {
    let peak = spectrum
      .iter()
      .copied()
      .filter(|m| m.is_finite())
      .fold(0.0f32, f32::max);
    peak * self.config.gain
  }

  #[cfg(test)]
  pub fn history(&self) -> &BeatHistory {
    &self.history
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_history_never_exceeds_capacity() {
    let mut history = BeatHistory::new(4);
    for i in 0..100 {
      history.push(i as f32);
      assert!(history.len() <= 4);
    }
  }

  #[test]
  fn test_history_keeps_last_values_in_order() {
    let mut history = BeatHistory::new(3);
    for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
      history.push(v);
    }
    let kept: Vec<f32> = history.iter().copied().collect();
    assert_eq!(kept, vec![3.0, 4.0, 5.0]);
  }

  #[test]
  fn test_partial_history_averages_over_held_samples() {
    let mut history = BeatHistory::new(30);
    assert_eq!(history.average(), 0.0);
    history.push(1.0);
    history.push(2.0);
    assert_eq!(history.average(), 1.5);
  }

  #[test]
  fn test_step_waits_for_threshold() {
    let mut detector = BeatDetector::new(BeatConfig::default());
    let spectrum = [0.1, 0.2, 0.1];
    // threshold is 1/30 s
    assert_eq!(detector.step(&spectrum, 0.015), None);
    assert_eq!(detector.step(&spectrum, 0.015), None);
    let value = detector.step(&spectrum, 0.015).unwrap();
    assert!((value - 0.2 * 5.0).abs() < 1e-6);
    assert_eq!(detector.history().len(), 1);
  }

  #[test]
  fn test_step_averages_history() {
    let config = BeatConfig {
      capacity: 2,
      threshold: 0.01,
      gain: 1.0,
    };
    let mut detector = BeatDetector::new(config);
    assert_eq!(detector.step(&[1.0], 0.02), Some(1.0));
    assert_eq!(detector.step(&[3.0], 0.02), Some(2.0));
    assert_eq!(detector.step(&[5.0], 0.02), Some(4.0));
  }

  #[test]
  fn test_long_frame_emits_once() {
    let mut detector = BeatDetector::new(BeatConfig::default());
    assert!(detector.step(&[0.1], 1.01).is_some());
    // the 1 s backlog does not turn into a burst of samples
    let burst = (0..20)
      .filter(|_| detector.step(&[0.1], 0.001).is_some())
      .count();
    assert_eq!(burst, 0);
    assert_eq!(detector.history().len(), 1);
    // the cadence picks up again afterwards
    assert!(detector.step(&[0.1], 0.034).is_some());
  }

  #[test]
  fn test_non_finite_input_is_ignored() {
    let config = BeatConfig {
      capacity: 4,
      threshold: 0.01,
      gain: 1.0,
    };
    let mut detector = BeatDetector::new(config);
    assert_eq!(detector.step(&[0.5], f32::NAN), None);
    assert_eq!(detector.step(&[f32::INFINITY, 0.5], 0.02), Some(0.5));
  }
}
