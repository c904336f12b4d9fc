use std::f32::consts::PI;

/// Background colour, channels already rescaled into display range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
  pub red: u8,
  pub green: u8,
  pub blue: u8,
}

impl Color {
  pub const fn new(red: u8, green: u8, blue: u8) -> Self {
    Self { red, green, blue }
  }

  /// 0x00RRGGBB, the framebuffer layout
  pub fn to_u32(self) -> u32 {
    ((self.red as u32) << 16) | ((self.green as u32) << 8) | self.blue as u32
  }

  fn channels(self) -> [u8; 3] {
    [self.red, self.green, self.blue]
  }
}

/// Which signal drives the background and the spawn count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MappingMode {
  /// smoothed beat intensity
  Beat,
  /// spectrum split into three energy bands
  Bands,
}

impl MappingMode {
  pub fn toggled(self) -> Self {
    match self {
      MappingMode::Beat => MappingMode::Bands,
      MappingMode::Bands => MappingMode::Beat,
    }
  }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MapperConfig {
  pub color_max: f32,
  pub rgb_min: u8,
  pub rgb_max: u8,
  pub band_rgb_min: u8,
  pub band_rgb_max: u8,
  pub max_enemies: usize,
  pub mode: MappingMode,
}

impl Default for MapperConfig {
  fn default() -> Self {
    Self {
      color_max: 1.5,
      rgb_min: 20,
      rgb_max: 200,
      band_rgb_min: 120,
      band_rgb_max: 250,
      max_enemies: 3,
      mode: MappingMode::Beat,
    }
  }
}

/// Equal-width partition of `[low, high]` into `bands` thresholds.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnTable {
  // bands + 1 entries, thresholds[0] == low
  thresholds: Vec<f32>,
}

impl SpawnTable {
  pub fn new(low: f32, high: f32, bands: usize) -> Self {
    let thresholds = (0..=bands)
      .map(|i| low + i as f32 * (high - low) / bands.max(1) as f32)
      .collect();
    Self { thresholds }
  }

  /// Number of band thresholds (above the floor) reached by `value`.
  /// Always in `[0, bands]` and non-decreasing in `value`.
  pub fn count(&self, value: f32) -> usize {
    if value.is_nan() {
      return 0;
    }
    self.thresholds[1..].iter().filter(|&&t| value >= t).count()
  }

  #[cfg(test)]
  pub fn bands(&self) -> usize {
    self.thresholds.len() - 1
  }
}

/// Pure mappings from analysis values to colour and spawn counts.
#[derive(Clone, Debug)]
pub struct SignalMapper {
  config: MapperConfig,
  intensity_table: SpawnTable,
  color_table: SpawnTable,
}

impl SignalMapper {
  pub fn new(config: MapperConfig) -> Self {
    let intensity_table = SpawnTable::new(0.0, config.color_max, config.max_enemies);
    let color_table = SpawnTable::new(
      config.band_rgb_min as f32,
      config.band_rgb_max as f32,
      config.max_enemies,
    );
    Self {
      config,
      intensity_table,
      color_table,
    }
  }

  pub fn config(&self) -> &MapperConfig {
    &self.config
  }

  /// Intensity to colour: red rises, blue falls and green swells in between.
  pub fn intensity_color(&self, value: f32) -> Color {
    let c = self.config.color_max;
    let v = if value.is_finite() { value } else { 0.0 };

    let red = 2.0 * v - c;
    let green = c * (c * v - PI / (2.0 * c)).sin();
    let blue = c - 0.5 * c * v;

    let scale = |channel: f32| {
      let channel = channel.clamp(0.0, c);
      rescale(
        channel / c,
        self.config.rgb_min,
        self.config.rgb_max,
      )
    };

    Color::new(scale(red), scale(green), scale(blue))
  }

  /// Spectrum thirds summed into red, green and blue.
  pub fn band_color(&self, spectrum: &[f32]) -> Color {
    let div = spectrum.len() / 3;
    let mut sums = [0.0f32; 3];
    for (band, sum) in sums.iter_mut().enumerate() {
      *sum = spectrum[band * div..(band + 1) * div]
        .iter()
        .filter(|m| m.is_finite())
        .sum();
    }

    let scale = |sum: f32| {
      rescale(
        sum.clamp(0.0, 1.0),
        self.config.band_rgb_min,
        self.config.band_rgb_max,
      )
    };

    Color::new(scale(sums[0]), scale(sums[1]), scale(sums[2]))
  }

  pub fn intensity_enemies(&self, value: f32) -> usize {
    self.intensity_table.count(value)
  }

  /// Spawn count from the mean channel of a band colour.
  pub fn color_enemies(&self, color: Color) -> usize {
    let mean = color.channels().iter().map(|&c| c as f32).sum::<f32>() / 3.0;
    self.color_table.count(mean)
  }
}

// fraction in [0, 1] to an integer channel in [min, max]
fn rescale(fraction: f32, min: u8, max: u8) -> u8 {
  let span = max.saturating_sub(min) as f32;
  let value = (fraction * span).round() + min as f32;
  value.clamp(min as f32, max as f32) as u8
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_intensity_color_stays_in_display_range() {
    let mapper = SignalMapper::new(MapperConfig::default());
    let c = mapper.config().color_max;
    for i in 0..=1000 {
      let v = 2.0 * c * i as f32 / 1000.0;
      let color = mapper.intensity_color(v);
      for channel in color.channels() {
        assert!((20..=200).contains(&channel), "v={v} -> {color:?}");
      }
    }
  }

  #[test]
  fn test_unbounded_intensity_is_clamped() {
    let mapper = SignalMapper::new(MapperConfig::default());
    for v in [-10.0, 1e9, f32::NAN, f32::INFINITY] {
      let color = mapper.intensity_color(v);
      for channel in color.channels() {
        assert!((20..=200).contains(&channel));
      }
    }
  }

  #[test]
  fn test_zero_intensity_color() {
    let mapper = SignalMapper::new(MapperConfig::default());
    assert_eq!(mapper.intensity_color(0.0), Color::new(20, 20, 200));
  }

  #[test]
  fn test_spawn_table_scenario() {
    let table = SpawnTable::new(0.0, 1.5, 3);
    assert_eq!(table.bands(), 3);
    assert_eq!(table.count(0.75), 1);
    assert_eq!(table.count(0.0), 0);
    assert_eq!(table.count(1.5), 3);
    assert_eq!(table.count(100.0), 3);
    assert_eq!(table.count(f32::NAN), 0);
  }

  #[test]
  fn test_spawn_count_is_bounded_and_monotonic() {
    for bands in 1..8 {
      let table = SpawnTable::new(0.0, 1.0, bands);
      let mut last = 0;
      for i in -10..=30 {
        let count = table.count(i as f32 / 20.0);
        assert!(count <= bands);
        assert!(count >= last);
        last = count;
      }
    }
  }

  #[test]
  fn test_band_color_splits_spectrum() {
    let mapper = SignalMapper::new(MapperConfig::default());
    let mut spectrum = vec![0.0; 30];
    spectrum[0] = 1.0;
    spectrum[25] = 0.5;
    let color = mapper.band_color(&spectrum);
    assert_eq!(color, Color::new(250, 120, 185));
    assert_eq!(mapper.band_color(&[]), Color::new(120, 120, 120));
  }

  #[test]
  fn test_color_enemies_uses_band_range() {
    let mapper = SignalMapper::new(MapperConfig::default());
    assert_eq!(mapper.color_enemies(Color::new(120, 120, 120)), 0);
    assert_eq!(mapper.color_enemies(Color::new(250, 250, 250)), 3);
    assert_eq!(mapper.color_enemies(Color::new(170, 170, 170)), 1);
  }

  #[test]
  fn test_color_packs_into_framebuffer_layout() {
    assert_eq!(Color::new(0x12, 0x34, 0x56).to_u32(), 0x00123456);
  }
}
