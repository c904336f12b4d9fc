use crate::game::entity::SpriteId;

/// Small pixel-art image, `None` pixels are transparent.
pub struct Sprite {
  width: usize,
  height: usize,
  pixels: Vec<Option<u32>>,
}

impl Sprite {
  /// One string per row, ragged rows are padded with transparency.
  pub fn from_mask(rows: &[&str], palette: impl Fn(char) -> Option<u32>) -> Self {
    let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
    let height = rows.len();
    let mut pixels = Vec::with_capacity(width * height);
    for row in rows {
      let mut chars = row.chars();
      for _ in 0..width {
        pixels.push(chars.next().and_then(&palette));
      }
    }
    Self {
      width,
      height,
      pixels,
    }
  }

  pub fn width(&self) -> usize {
    self.width
  }

  pub fn height(&self) -> usize {
    self.height
  }

  pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
    if x >= self.width || y >= self.height {
      return None;
    }
    self.pixels[y * self.width + x]
  }
}

pub struct SpriteSheet {
  player: Sprite,
  enemy: Sprite,
}

impl SpriteSheet {
  pub fn new() -> Self {
    Self {
      player: player_ship(),
      enemy: enemy_ship(),
    }
  }

  pub fn get(&self, id: SpriteId) -> &Sprite {
    match id {
      SpriteId::Player => &self.player,
      SpriteId::Enemy => &self.enemy,
    }
  }
}

impl Default for SpriteSheet {
  fn default() -> Self {
    Self::new()
  }
}

fn player_ship() -> Sprite {
  const ROWS: [&str; 12] = [
    "....##..........",
    "....###.........",
    "....####........",
    "##..########....",
    "##############..",
    "####****########",
    "####****########",
    "##############..",
    "##..########....",
    "....####........",
    "....###.........",
    "....##..........",
  ];
  Sprite::from_mask(&ROWS, |c| match c {
    '#' => Some(0x00E8E8F0),
    '*' => Some(0x0040A0FF),
    _ => None,
  })
}

fn enemy_ship() -> Sprite {
  const ROWS: [&str; 12] = [
    "....####....",
    "..########..",
    ".##########.",
    "###**##**###",
    "###**##**###",
    "############",
    "############",
    ".##.####.##.",
    "##..#..#..##",
    "#...#..#...#",
    "....#..#....",
    "...##..##...",
  ];
  Sprite::from_mask(&ROWS, |c| match c {
    '#' => Some(0x00D03050),
    '*' => Some(0x00FFE000),
    _ => None,
  })
}
