use tracing::debug;

use crate::audio::mapper::Color;
use crate::game::entity::{Appearance, Entity, EntityId};
use crate::graphics::renderer::Renderer;
use crate::graphics::sprite::SpriteSheet;
use crate::visualisation::overlay::{HudState, Overlay};
use crate::visualisation::spectrum::SpectrumBars;

/// Resolution multiplier applied to the canvas and everything on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quality {
  High,
  Low,
}

impl Quality {
  pub fn factor(self) -> f32 {
    match self {
      Quality::High => 1.0,
      Quality::Low => 0.5,
    }
  }

  pub fn toggled(self) -> Self {
    match self {
      Quality::High => Quality::Low,
      Quality::Low => Quality::High,
    }
  }
}

/// Per-frame render snapshot: background, spectrum, entities and ui.
/// Holds at most one entity per id.
pub struct EntityStore {
  // logical canvas, entity coordinates live here
  width: usize,
  height: usize,
  quality: Quality,
  objects: Vec<Entity>,
  next_id: u64,
  canvas_bg: Color,
  spectrum: SpectrumBars,
  overlay: Overlay,
  sprites: SpriteSheet,
}

impl EntityStore {
  pub fn new(width: usize, height: usize) -> Self {
    Self {
      width,
      height,
      quality: Quality::High,
      objects: Vec::new(),
      next_id: 0,
      canvas_bg: Color::new(255, 255, 255),
      spectrum: SpectrumBars::new(),
      overlay: Overlay::new(false),
      sprites: SpriteSheet::new(),
    }
  }

  /// Insert `entity`, replacing any entity with the same id. Entities without
  /// an id get a fresh one.
  pub fn add_object(&mut self, mut entity: Entity) -> EntityId {
    let id = match entity.id {
      Some(id) => {
        self.next_id = self.next_id.max(id.0);
        id
      }
      None => {
        self.next_id += 1;
        EntityId(self.next_id)
      }
    };
    entity.id = Some(id);

    match self.objects.iter_mut().find(|e| e.id == Some(id)) {
      Some(slot) => *slot = entity,
      None => self.objects.push(entity),
    }
    id
  }

  pub fn remove_object(&mut self, id: EntityId) -> Option<Entity> {
    let index = self.objects.iter().position(|e| e.id == Some(id))?;
    Some(self.objects.remove(index))
  }

  pub fn clean_objects(&mut self) {
    self.objects.clear();
  }

  #[cfg(test)]
  pub fn get(&self, id: EntityId) -> Option<&Entity> {
    self.objects.iter().find(|e| e.id == Some(id))
  }

  pub fn objects(&self) -> &[Entity] {
    &self.objects
  }

  #[cfg(test)]
  pub fn len(&self) -> usize {
    self.objects.len()
  }

  #[cfg(test)]
  pub fn is_empty(&self) -> bool {
    self.objects.is_empty()
  }

  /// Drop entities lying outside the canvas horizontally and vertically at
  /// once. An entity off one axis only is kept.
  pub fn cull(&mut self) {
    let (w, h) = (self.width as f32, self.height as f32);
    let before = self.objects.len();
    self.objects.retain(|e| {
      let off_x = e.right() < 0.0 || e.left() > w;
      let off_y = e.bottom() < 0.0 || e.top() > h;
      !(off_x && off_y)
    });
    let culled = before - self.objects.len();
    if culled > 0 {
      debug!("store culled {} entities", culled);
    }
  }

  pub fn set_spectrum_data(&mut self, spectrum: &[f32]) {
    self.spectrum.update(spectrum);
  }

  pub fn set_canvas_bg(&mut self, color: Color) {
    self.canvas_bg = color;
  }

  #[cfg(test)]
  pub fn canvas_bg(&self) -> Color {
    self.canvas_bg
  }

  pub fn set_quality(&mut self, quality: Quality) {
    if quality != self.quality {
      debug!("render quality {:?}", quality);
      self.quality = quality;
    }
  }

  pub fn quality(&self) -> Quality {
    self.quality
  }

  pub fn set_hud(&mut self, hud: HudState) {
    self.overlay.set_hud(hud);
  }

  pub fn toggle_fps(&mut self) -> bool {
    self.overlay.toggle_fps()
  }

  /// Logical canvas size.
  pub fn canvas_size(&self) -> (usize, usize) {
    (self.width, self.height)
  }

  /// Canvas size after the quality multiplier, the size of the render target.
  pub fn surface_size(&self) -> (usize, usize) {
    let f = self.quality.factor();
    (
      (self.width as f32 * f).round() as usize,
      (self.height as f32 * f).round() as usize,
    )
  }

  /// Draw one frame: background, spectrum, entities, then the ui.
  pub fn render(&mut self, renderer: &mut Renderer, now: f64) {
    let (sw, sh) = self.surface_size();
    renderer.resize(sw, sh);
    renderer.fill(self.canvas_bg.to_u32());

    self.spectrum.render(renderer);

    let f = self.quality.factor();
    for entity in &self.objects {
      let w = (entity.size.width * f).round() as usize;
      let h = (entity.size.height * f).round() as usize;
      // same multiplier as the canvas keeps the centre in place
      let x = (entity.position.x * f - w as f32 / 2.0).round() as isize;
      let y = (entity.position.y * f - h as f32 / 2.0).round() as isize;
      match entity.appearance {
        Appearance::Sprite(id) => renderer.draw_sprite(self.sprites.get(id), x, y, w, h),
        Appearance::Fill(color) => renderer.fill_rect(x, y, w, h, color),
      }
    }

    self.overlay.render(renderer, now);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::game::entity::{EntityKind, Size, SpriteId, Vec2};

  fn block(x: f32, y: f32) -> Entity {
    Entity::new(
      EntityKind::Bullet,
      Vec2::new(x, y),
      Size::new(4.0, 4.0),
      Appearance::Fill(0x00FF0000),
    )
  }

  #[test]
  fn test_add_assigns_fresh_ids() {
    let mut store = EntityStore::new(100, 100);
    let a = store.add_object(block(1.0, 1.0));
    let b = store.add_object(block(2.0, 2.0));
    assert_ne!(a, b);
    assert_eq!(store.len(), 2);
  }

  #[test]
  fn test_add_replaces_same_id() {
    let mut store = EntityStore::new(100, 100);
    store.add_object(block(1.0, 1.0).with_id(EntityId(7)));
    store.add_object(block(5.0, 5.0).with_id(EntityId(7)));
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(EntityId(7)).unwrap().position, Vec2::new(5.0, 5.0));

    // fresh ids never collide with explicit ones
    let fresh = store.add_object(block(0.0, 0.0));
    assert!(fresh.0 > 7);
  }

  #[test]
  fn test_remove_and_clean() {
    let mut store = EntityStore::new(100, 100);
    let a = store.add_object(block(1.0, 1.0));
    store.add_object(block(2.0, 2.0));
    assert!(store.remove_object(a).is_some());
    assert!(store.remove_object(a).is_none());
    assert_eq!(store.len(), 1);
    store.clean_objects();
    assert!(store.is_empty());
  }

  #[test]
  fn test_cull_needs_both_axes() {
    let mut store = EntityStore::new(100, 100);
    let right_only = store.add_object(block(150.0, 50.0));
    let corner = store.add_object(block(150.0, 150.0));
    let inside = store.add_object(block(50.0, 50.0));
    store.cull();
    assert!(store.get(right_only).is_some());
    assert!(store.get(corner).is_none());
    assert!(store.get(inside).is_some());
  }

  #[test]
  fn test_render_layers() {
    let mut store = EntityStore::new(40, 20);
    store.set_canvas_bg(Color::new(0, 0, 0));
    store.add_object(block(10.0, 10.0));
    let mut renderer = Renderer::new(1, 1);
    store.render(&mut renderer, 0.0);

    assert_eq!(renderer.dimensions(), (40, 20));
    // entity drawn after the wash-out keeps its own colour
    assert_eq!(renderer.pixel(10, 10), Some(0x00FF0000));
    // background washed 30 % toward white
    assert_eq!(renderer.pixel(30, 3), Some(0x004D4D4D));
  }

  #[test]
  fn test_renders_unbounded_spectrum() {
    let mut store = EntityStore::new(40, 20);
    store.set_spectrum_data(&[2e30; 16]);
    let mut renderer = Renderer::new(40, 20);
    store.render(&mut renderer, 0.0);
    assert_eq!(renderer.dimensions(), (40, 20));
  }

  #[test]
  fn test_quality_scales_around_centre() {
    let mut store = EntityStore::new(40, 20);
    store.set_canvas_bg(Color::new(0, 0, 0));
    store.add_object(block(20.0, 10.0));
    store.set_quality(Quality::Low);
    assert_eq!(store.surface_size(), (20, 10));

    let mut renderer = Renderer::new(40, 20);
    store.render(&mut renderer, 0.0);
    assert_eq!(renderer.dimensions(), (20, 10));
    // 4x4 at full size is 2x2 centred on (10, 5)
    for (x, y) in [(9, 4), (10, 4), (9, 5), (10, 5)] {
      assert_eq!(renderer.pixel(x, y), Some(0x00FF0000));
    }
    assert_ne!(renderer.pixel(11, 5), Some(0x00FF0000));
    assert_eq!(store.quality().toggled(), Quality::High);
  }

  #[test]
  fn test_sprites_render_centred() {
    let mut store = EntityStore::new(64, 64);
    store.add_object(Entity::new(
      EntityKind::Enemy,
      Vec2::new(32.0, 32.0),
      Size::new(24.0, 24.0),
      Appearance::Sprite(SpriteId::Enemy),
    ));
    let mut renderer = Renderer::new(64, 64);
    store.render(&mut renderer, 0.0);
    // body row of the enemy ship crosses the centre
    assert_eq!(renderer.pixel(32, 32), Some(0x00D03050));
  }
}
