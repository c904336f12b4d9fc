use std::sync::Arc;

use apodize::hanning_iter;

use realfft::{RealFftPlanner, RealToComplex};
use rustfft::num_complex::Complex;

use crate::audio::AudioConfig;
use crate::error::{AnalysisError, Result};

/// Interleaved frame in, magnitude spectrum of the stereo-mix mono signal out.
pub struct SpectrumAnalyzer {
  channels: usize,
  fft_size: usize,
  fft: Arc<dyn RealToComplex<f32>>,
  window_function: Option<Vec<f32>>,
  // real input buffer for fft, holds the mono mix
  fft_real_input: Vec<f32>,
  // complex output of fft (length = fft_size/2+1)
  fft_complex: Vec<Complex<f32>>,
  // scratch buffer used by the fft
  fft_scratch: Vec<Complex<f32>>,
  // magnitudes (length = fft_size/2)
  spectrum: Vec<f32>,
  // 2/N, a full scale sine lands on 1.0
  norm_factor: f32,
}

impl SpectrumAnalyzer {
  pub fn new(config: &AudioConfig) -> Result<Self> {
    config.validate()?;

    let fft_size = config.fft_size();
    let mut planner = RealFftPlanner::<f32>::new();
    let r2c = planner.plan_fft_forward(fft_size);

    let window_function = config
      .window
      .then(|| hanning_iter(fft_size).map(|v| v as f32).collect());

    // allocate fft buffers once
    let fft_real_input = r2c.make_input_vec();
    let fft_complex = r2c.make_output_vec();
    let fft_scratch = r2c.make_scratch_vec();

    Ok(Self {
      channels: config.channels as usize,
      fft_size,
      fft: r2c,
      window_function,
      fft_real_input,
      fft_complex,
      fft_scratch,
      spectrum: vec![0.0; fft_size / 2],
      norm_factor: 2.0 / fft_size as f32,
    })
  }

  /// Analyse one delivered frame. Undersized frames yield an all-zero spectrum.
  pub fn process(&mut self, frame: &[f32]) -> Result<&[f32]> {
    if frame.len() < self.fft_size * self.channels {
      self.spectrum.fill(0.0);
      return Ok(&self.spectrum);
    }

    mix_to_mono(frame, self.channels, &mut self.fft_real_input);

    if let Some(window) = &self.window_function {
      self
        .fft_real_input
        .iter_mut()
        .zip(window)
        .for_each(|(s, w)| *s *= w);
    }

    self
      .fft
      .process_with_scratch(
        &mut self.fft_real_input,
        &mut self.fft_complex,
        &mut self.fft_scratch,
      )
      .map_err(|e| AnalysisError::Fft(e.to_string()))?;

    for (out, c) in self.spectrum.iter_mut().zip(&self.fft_complex) {
      *out = c.norm() * self.norm_factor;
    }

    Ok(&self.spectrum)
  }
}

/// Average each interleaved group of `channels` samples into `mono`.
/// Non-finite samples count as silence.
pub fn mix_to_mono(samples: &[f32], channels: usize, mono: &mut [f32]) {
  let channels = channels.max(1);
  for (m, group) in mono.iter_mut().zip(samples.chunks_exact(channels)) {
    let sum: f32 = group.iter().filter(|s| s.is_finite()).sum();
    *m = sum / channels as f32;
  }
}
