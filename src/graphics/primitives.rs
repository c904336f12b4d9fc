/// Clip an isize rect against the buffer, returning usize bounds.
fn clip(
  width: usize,
  height: usize,
  (x, y): (isize, isize),
  w: usize,
  h: usize,
) -> Option<(usize, usize, usize, usize)> {
  let x0 = x.max(0) as usize;
  let y0 = y.max(0) as usize;
  let x1 = (x + w as isize).clamp(0, width as isize) as usize;
  let y1 = (y + h as isize).clamp(0, height as isize) as usize;
  (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
}

pub fn fill_rect(
  buffer: &mut [u32],
  width: usize,
  height: usize,
  (x, y): (isize, isize),
  w: usize,
  h: usize,
  color: u32,
) {
  let Some((x0, y0, x1, y1)) = clip(width, height, (x, y), w, h) else {
    return;
  };
  for row in buffer.chunks_exact_mut(width).take(y1).skip(y0) {
    row[x0..x1].fill(color);
  }
}

/// Source-over blend of `color` at `alpha` onto the covered pixels.
pub fn blend_rect(
  buffer: &mut [u32],
  width: usize,
  height: usize,
  (x, y): (isize, isize),
  w: usize,
  h: usize,
  color: u32,
  alpha: f32,
) {
  let Some((x0, y0, x1, y1)) = clip(width, height, (x, y), w, h) else {
    return;
  };
  let alpha = alpha.clamp(0.0, 1.0);
  for row in buffer.chunks_exact_mut(width).take(y1).skip(y0) {
    for px in &mut row[x0..x1] {
      *px = blend(*px, color, alpha);
    }
  }
}

#[inline]
pub fn blend(dst: u32, src: u32, alpha: f32) -> u32 {
  let mix = |shift: u32| {
    let d = ((dst >> shift) & 0xFF) as f32;
    let s = ((src >> shift) & 0xFF) as f32;
    ((d + (s - d) * alpha).round() as u32) << shift
  };
  mix(16) | mix(8) | mix(0)
}

pub fn draw_text(
  buffer: &mut [u32],
  width: usize,
  height: usize,
  text: &str,
  (x, y): (usize, usize),
  color: u32,
) {
  let mut pos_x = x;
  for c in text.chars() {
    if pos_x + 8 >= width || y + 10 >= height {
      break;
    }
    if c == ':' {
      buffer[(y + 3) * width + pos_x + 2] = color;
      buffer[(y + 7) * width + pos_x + 2] = color;
    } else if let Some(segments) = glyph(c) {
      draw_segments(buffer, width, height, segments, (pos_x, y), color);
    }
    pos_x += 8;
  }
}

/// Seven segment layout: top, top left, top right, middle, bottom left,
/// bottom right, bottom.
fn glyph(c: char) -> Option<[bool; 7]> {
  const DIGITS: [[bool; 7]; 10] = [
    [true, true, true, false, true, true, true],     // 0
    [false, false, true, false, false, true, false], // 1
    [true, false, true, true, true, false, true],    // 2
    [true, false, true, true, false, true, true],    // 3
    [false, true, true, true, false, true, false],   // 4
    [true, true, false, true, false, true, true],    // 5
    [true, true, false, true, true, true, true],     // 6
    [true, false, true, false, false, true, false],  // 7
    [true, true, true, true, true, true, true],      // 8
    [true, true, true, true, false, true, true],     // 9
  ];

  let segments = match c.to_ascii_uppercase() {
    d @ '0'..='9' => DIGITS[d as usize - '0' as usize],
    'O' => DIGITS[0],
    'I' => DIGITS[1],
    'S' => DIGITS[5],
    'A' => [true, true, true, true, true, true, false],
    'C' => [true, true, false, false, true, false, true],
    'D' => [false, false, true, true, true, true, true],
    'E' => [true, true, false, true, true, false, true],
    'F' => [true, true, false, true, true, false, false],
    'H' => [false, true, true, true, true, true, false],
    'L' => [false, true, false, false, true, false, true],
    'P' => [true, true, true, true, true, false, false],
    'R' => [false, false, false, true, true, false, false],
    'T' => [false, true, false, true, true, false, true],
    'U' => [false, true, true, false, true, true, true],
    '-' => [false, false, false, true, false, false, false],
    _ => return None,
  };
  Some(segments)
}

fn draw_segments(
  buffer: &mut [u32],
  width: usize,
  height: usize,
  segments: [bool; 7],
  (x, y): (usize, usize),
  color: u32,
) {
  // (dx, dy, w, h) per segment
  const RECTS: [(usize, usize, usize, usize); 7] = [
    (0, 0, 5, 1),
    (0, 0, 1, 4),
    (4, 0, 1, 4),
    (0, 4, 5, 1),
    (0, 4, 1, 4),
    (4, 4, 1, 4),
    (0, 8, 5, 1),
  ];

  for (on, (dx, dy, w, h)) in segments.iter().zip(RECTS) {
    if *on {
      fill_rect(
        buffer,
        width,
        height,
        ((x + dx) as isize, (y + dy) as isize),
        w,
        h,
        color,
      );
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_fill_rect_clips() {
    let mut buffer = vec![0u32; 4 * 3];
    fill_rect(&mut buffer, 4, 3, (-1, 1), 3, 10, 7);
    assert_eq!(buffer, vec![0, 0, 0, 0, 7, 7, 0, 0, 7, 7, 0, 0]);

    let mut untouched = vec![0u32; 4];
    fill_rect(&mut untouched, 2, 2, (5, 5), 3, 3, 7);
    fill_rect(&mut untouched, 2, 2, (-5, -5), 3, 3, 7);
    assert!(untouched.iter().all(|&p| p == 0));
  }

  #[test]
  fn test_blend() {
    assert_eq!(blend(0x000000, 0xFFFFFF, 0.0), 0x000000);
    assert_eq!(blend(0x000000, 0xFFFFFF, 1.0), 0xFFFFFF);
    assert_eq!(blend(0x00C800, 0x000000, 0.5), 0x006400);
  }

  #[test]
  fn test_text_draws_known_glyphs_only() {
    let mut buffer = vec![0u32; 64 * 16];
    draw_text(&mut buffer, 64, 16, "#", (0, 0), 1);
    assert!(buffer.iter().all(|&p| p == 0));
    draw_text(&mut buffer, 64, 16, "PAUSED", (0, 0), 1);
    assert!(buffer.iter().any(|&p| p == 1));
  }
}
