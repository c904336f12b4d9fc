use crate::graphics::renderer::Renderer;
use crate::timing::FpsCounter;

const TEXT_COLOR: u32 = 0x00000000;
const BANNER_COLOR: u32 = 0x00000000;

/// What the ui layer shows on top of the scene.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HudState {
  pub paused: bool,
  pub running: bool,
  /// the last session finished and nothing replaced it yet
  pub ended: bool,
  pub score: u32,
  pub hits: u32,
}

pub struct Overlay {
  show_fps: bool,
  fps: FpsCounter,
  hud: HudState,
}

impl Overlay {
  pub fn new(show_fps: bool) -> Self {
    Self {
      show_fps,
      fps: FpsCounter::new(),
      hud: HudState::default(),
    }
  }

  pub fn toggle_fps(&mut self) -> bool {
    self.show_fps = !self.show_fps;
    self.show_fps
  }

  pub fn set_hud(&mut self, hud: HudState) {
    self.hud = hud;
  }

  #[cfg(test)]
  pub fn hud(&self) -> HudState {
    self.hud
  }

  #[cfg(test)]
  pub fn fps(&self) -> u32 {
    self.fps.fps()
  }

  /// Counts the frame even when nothing is drawn.
  pub fn render(&mut self, renderer: &mut Renderer, now: f64) {
    self.fps.tick(now);
    let (width, height) = renderer.dimensions();

    if self.show_fps {
      renderer.draw_text(&format!("{} FPS", self.fps.fps()), 10, 10, TEXT_COLOR);
    }

    if self.hud.running || self.hud.ended {
      let score = format!("{}", self.hud.score);
      let x = width.saturating_sub(10 + score.len() * 8);
      renderer.draw_text(&score, x, 10, TEXT_COLOR);
      let hits = format!("HITS {}", self.hud.hits);
      let x = width.saturating_sub(10 + hits.len() * 8);
      renderer.draw_text(&hits, x, 24, TEXT_COLOR);
    }

    let banner = if self.hud.paused {
      Some("PAUSED")
    } else if self.hud.ended {
      Some("PRESS R")
    } else {
      None
    };
    if let Some(text) = banner {
      let text_width = text.len() * 8;
      let (cx, cy) = (width / 2, height / 2);
      renderer.blend_rect(0, cy as isize - 12, width, 24, BANNER_COLOR, 0.4);
      renderer.draw_text(
        text,
        cx.saturating_sub(text_width / 2),
        cy.saturating_sub(5),
        0x00FFFFFF,
      );
    }
  }
}
