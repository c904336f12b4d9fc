use crate::graphics::primitives;
use crate::graphics::sprite::Sprite;

pub struct Renderer {
  width: usize,
  height: usize,
  buffer: Vec<u32>,
}

impl Renderer {
  pub fn new(width: usize, height: usize) -> Self {
    Self {
      width,
      height,
      buffer: vec![0; width * height],
    }
  }

  pub fn resize(&mut self, width: usize, height: usize) {
    if self.width != width || self.height != height {
      self.width = width;
      self.height = height;
      self.buffer.resize(width * height, 0);
    }
  }

  pub fn fill(&mut self, color: u32) {
    self.buffer.fill(color);
  }

  pub fn fill_rect(&mut self, x: isize, y: isize, w: usize, h: usize, color: u32) {
    primitives::fill_rect(
      &mut self.buffer,
      self.width,
      self.height,
      (x, y),
      w,
      h,
      color,
    );
  }

  pub fn blend_rect(&mut self, x: isize, y: isize, w: usize, h: usize, color: u32, alpha: f32) {
    primitives::blend_rect(
      &mut self.buffer,
      self.width,
      self.height,
      (x, y),
      w,
      h,
      color,
      alpha,
    );
  }

  /// Nearest-neighbour blit of `sprite` stretched to `w` x `h` at (x, y).
  pub fn draw_sprite(&mut self, sprite: &Sprite, x: isize, y: isize, w: usize, h: usize) {
    if w == 0 || h == 0 {
      return;
    }
    for dy in 0..h {
      let py = y + dy as isize;
      if py < 0 || py >= self.height as isize {
        continue;
      }
      let sy = dy * sprite.height() / h;
      for dx in 0..w {
        let px = x + dx as isize;
        if px < 0 || px >= self.width as isize {
          continue;
        }
        if let Some(color) = sprite.pixel(dx * sprite.width() / w, sy) {
          self.buffer[py as usize * self.width + px as usize] = color;
        }
      }
    }
  }

  pub fn draw_text(&mut self, text: &str, x: usize, y: usize, color: u32) {
    primitives::draw_text(
      &mut self.buffer,
      self.width,
      self.height,
      text,
      (x, y),
      color,
    );
  }

  #[cfg(test)]
  pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
    (x < self.width && y < self.height).then(|| self.buffer[y * self.width + x])
  }

  pub fn buffer(&self) -> &[u32] {
    &self.buffer
  }

  pub fn dimensions(&self) -> (usize, usize) {
    (self.width, self.height)
  }
}
