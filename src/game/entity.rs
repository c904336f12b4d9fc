#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
  pub x: f32,
  pub y: f32,
}

impl Vec2 {
  pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

  pub const fn new(x: f32, y: f32) -> Self {
    Self { x, y }
  }

  pub fn is_finite(self) -> bool {
    self.x.is_finite() && self.y.is_finite()
  }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Size {
  pub width: f32,
  pub height: f32,
}

impl Size {
  pub const fn new(width: f32, height: f32) -> Self {
    Self { width, height }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
  Player,
  Bullet,
  Enemy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteId {
  Player,
  Enemy,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Appearance {
  /// plain rectangle, 0x00RRGGBB
  Fill(u32),
  Sprite(SpriteId),
}

/// Anything that moves on the canvas. `position` is the centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Entity {
  pub id: Option<EntityId>,
  pub kind: EntityKind,
  pub position: Vec2,
  pub velocity: Vec2,
  pub acceleration: Vec2,
  /// per-axis speed cap
  pub top_speed: Option<f32>,
  /// velocity multiplier per step on axes without acceleration
  pub inertia: Option<f32>,
  pub size: Size,
  pub appearance: Appearance,
}

impl Entity {
  pub fn new(kind: EntityKind, position: Vec2, size: Size, appearance: Appearance) -> Self {
    Self {
      id: None,
      kind,
      position,
      velocity: Vec2::ZERO,
      acceleration: Vec2::ZERO,
      top_speed: None,
      inertia: None,
      size,
      appearance,
    }
  }

  pub fn with_id(mut self, id: EntityId) -> Self {
    self.id = Some(id);
    self
  }

  pub fn with_velocity(mut self, velocity: Vec2) -> Self {
    self.velocity = velocity;
    self
  }

  #[cfg(test)]
  pub fn with_acceleration(mut self, acceleration: Vec2) -> Self {
    self.acceleration = acceleration;
    self
  }

  pub fn with_top_speed(mut self, top_speed: f32) -> Self {
    self.top_speed = Some(top_speed);
    self
  }

  pub fn with_inertia(mut self, inertia: f32) -> Self {
    self.inertia = Some(inertia);
    self
  }

  pub fn left(&self) -> f32 {
    self.position.x - self.size.width / 2.0
  }

  pub fn right(&self) -> f32 {
    self.position.x + self.size.width / 2.0
  }

  pub fn top(&self) -> f32 {
    self.position.y - self.size.height / 2.0
  }

  pub fn bottom(&self) -> f32 {
    self.position.y + self.size.height / 2.0
  }

  pub fn is_finite(&self) -> bool {
    self.position.is_finite() && self.velocity.is_finite()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_bounds_are_centred() {
    let e = Entity::new(
      EntityKind::Enemy,
      Vec2::new(10.0, 20.0),
      Size::new(4.0, 6.0),
      Appearance::Fill(0),
    );
    assert_eq!((e.left(), e.right()), (8.0, 12.0));
    assert_eq!((e.top(), e.bottom()), (17.0, 23.0));
  }

  #[test]
  fn test_non_finite_detected() {
    let e = Entity::new(
      EntityKind::Bullet,
      Vec2::new(f32::NAN, 0.0),
      Size::new(1.0, 1.0),
      Appearance::Fill(0),
    );
    assert!(!e.is_finite());
  }
}
