use crate::game::entity::Entity;

/// Circle standing in for the box, radius is the mean half extent.
pub fn radius(entity: &Entity) -> f32 {
  (entity.size.width + entity.size.height) / 4.0
}

/// Centres closer than the summed radii. Touching circles do not collide.
pub fn overlaps(a: &Entity, b: &Entity) -> bool {
  let dx = a.position.x - b.position.x;
  let dy = a.position.y - b.position.y;
  let reach = radius(a) + radius(b);
  dx * dx + dy * dy < reach * reach
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::game::entity::{Appearance, EntityKind, Size, Vec2};

  fn at(x: f32, y: f32, w: f32, h: f32) -> Entity {
    Entity::new(
      EntityKind::Enemy,
      Vec2::new(x, y),
      Size::new(w, h),
      Appearance::Fill(0),
    )
  }

  #[test]
  fn test_same_centre_always_collides() {
    for (w, h) in [(0.1, 0.1), (1.0, 30.0), (200.0, 2.0)] {
      assert!(overlaps(&at(5.0, 5.0, w, h), &at(5.0, 5.0, 1.0, 1.0)));
    }
  }

  #[test]
  fn test_far_apart_never_collides() {
    let a = at(0.0, 0.0, 10.0, 20.0);
    let b = at(0.0, 0.0, 6.0, 6.0);
    // beyond the summed half sizes on the longer axes
    let gap = 20.0 / 2.0 + 6.0 / 2.0 + 0.01;
    for (dx, dy) in [(gap, 0.0), (0.0, gap), (-gap, 0.0), (gap, gap)] {
      let moved = at(dx, dy, 6.0, 6.0);
      assert!(!overlaps(&a, &moved));
    }
    assert!(overlaps(&a, &b));
  }

  #[test]
  fn test_touching_is_not_a_hit() {
    // radii 5 and 5
    assert!(!overlaps(&at(0.0, 0.0, 10.0, 10.0), &at(10.0, 0.0, 10.0, 10.0)));
    assert!(overlaps(&at(0.0, 0.0, 10.0, 10.0), &at(9.9, 0.0, 10.0, 10.0)));
  }
}
