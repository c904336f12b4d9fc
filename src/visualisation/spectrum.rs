use crate::graphics::renderer::Renderer;

const BAR_COLOR: u32 = 0x00000000;
const BAR_ALPHA: f32 = 0.2;
const WASH_COLOR: u32 = 0x00FFFFFF;
const WASH_ALPHA: f32 = 0.3;
// magnitudes are tiny next to the canvas height
const ZOOM: f32 = 6.0;

/// Mirrored spectrum bars: every other bin, one pixel wide, growing up and
/// down from the vertical centre at both edges.
pub struct SpectrumBars {
  levels: Vec<f32>,
}

impl SpectrumBars {
  pub fn new() -> Self {
    Self { levels: Vec::new() }
  }

  pub fn update(&mut self, spectrum: &[f32]) {
    self.levels.clear();
    self
      .levels
      .extend(spectrum.iter().map(|&m| if m.is_finite() { m.max(0.0) } else { 0.0 }));
  }

  #[cfg(test)]
  pub fn levels(&self) -> &[f32] {
    &self.levels
  }

  pub fn render(&self, renderer: &mut Renderer) {
    let (width, height) = renderer.dimensions();
    let center = (height / 2) as isize;

    for (i, level) in self.levels.iter().step_by(2).enumerate() {
      if i * 2 > width / 2 {
        break;
      }
      // a bar never needs to reach past the canvas edge
      let magnitude = (level * height as f32 * ZOOM).min(height as f32) as usize;
      if magnitude == 0 {
        continue;
      }

      let p = i as isize * 2 - 1;
      let top = center - magnitude as isize;
      renderer.blend_rect(p, top, 1, magnitude * 2, BAR_COLOR, BAR_ALPHA);
      renderer.blend_rect(width as isize - p, top, 1, magnitude * 2, BAR_COLOR, BAR_ALPHA);
    }

    // wash out the background a bit
    renderer.blend_rect(0, 0, width, height, WASH_COLOR, WASH_ALPHA);
  }
}

impl Default for SpectrumBars {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_bars_mirror_around_centre() {
    let mut bars = SpectrumBars::new();
    // bin 2 is the second drawn bar, at x = 1 and x = width - 1
    bars.update(&[0.0, 0.0, 0.1, 0.0]);
    let mut renderer = Renderer::new(20, 10);
    renderer.fill(0x00FFFFFF);
    bars.render(&mut renderer);

    let washed = renderer.pixel(10, 5).unwrap();
    let left = renderer.pixel(1, 5).unwrap();
    let right = renderer.pixel(19, 5).unwrap();
    assert_eq!(washed, 0x00FFFFFF);
    assert!(left < washed);
    assert_eq!(left, right);
    // 0.1 * 10 * 6 = 6 px each way, clipped to the canvas
    assert_eq!(renderer.pixel(1, 0).unwrap(), left);
    assert_eq!(renderer.pixel(1, 9).unwrap(), left);
  }

  #[test]
  fn test_huge_levels_clip_to_canvas() {
    let mut bars = SpectrumBars::new();
    bars.update(&[2e30, 0.0, 1e30, 0.0, f32::MAX]);
    let mut renderer = Renderer::new(20, 10);
    renderer.fill(0x00FFFFFF);
    bars.render(&mut renderer);

    let left = renderer.pixel(1, 0).unwrap();
    assert!(left < 0x00FFFFFF);
    assert_eq!(renderer.pixel(1, 9).unwrap(), left);
    assert_eq!(renderer.pixel(19, 5).unwrap(), left);
  }

  #[test]
  fn test_non_finite_levels_are_dropped() {
    let mut bars = SpectrumBars::new();
    bars.update(&[f32::NAN, -1.0, 0.5]);
    assert_eq!(bars.levels(), &[0.0, 0.0, 0.5]);
  }
}
