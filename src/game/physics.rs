use crate::game::entity::{Entity, Vec2};

/// Semi-implicit euler step. Velocity first (decayed on idle axes, capped per
/// axis), then position from the new velocity.
pub fn integrate(entity: Entity, dt: f32) -> Entity {
  if !dt.is_finite() || dt < 0.0 {
    return entity;
  }

  let a = entity.acceleration;
  let velocity = Vec2::new(
    axis_velocity(entity.velocity.x, a.x, dt, &entity),
    axis_velocity(entity.velocity.y, a.y, dt, &entity),
  );
  let position = Vec2::new(
    entity.position.x + velocity.x * dt + 0.5 * a.x * dt * dt,
    entity.position.y + velocity.y * dt + 0.5 * a.y * dt * dt,
  );

  Entity {
    position,
    velocity,
    ..entity
  }
}

fn axis_velocity(v: f32, a: f32, dt: f32, entity: &Entity) -> f32 {
  let mut v = v + a * dt;
  if a == 0.0 {
    if let Some(k) = entity.inertia {
      v *= k;
    }
  }
  match entity.top_speed {
    Some(top) => v.clamp(-top.abs(), top.abs()),
    None => v,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::game::entity::{Appearance, EntityKind, Size};

  fn body() -> Entity {
    Entity::new(
      EntityKind::Player,
      Vec2::ZERO,
      Size::new(10.0, 10.0),
      Appearance::Fill(0),
    )
  }

  #[test]
  fn test_constant_velocity() {
    let e = integrate(body().with_velocity(Vec2::new(10.0, -5.0)), 0.5);
    assert_eq!(e.position, Vec2::new(5.0, -2.5));
    assert_eq!(e.velocity, Vec2::new(10.0, -5.0));
  }

  #[test]
  fn test_acceleration_uses_new_velocity() {
    let e = integrate(body().with_acceleration(Vec2::new(4.0, 0.0)), 1.0);
    assert_eq!(e.velocity.x, 4.0);
    // v' * dt + a * dt^2 / 2
    assert_eq!(e.position.x, 6.0);
  }

  #[test]
  fn test_inertia_decays_geometrically() {
    let mut e = body()
      .with_velocity(Vec2::new(100.0, -50.0))
      .with_inertia(0.5);
    for _ in 0..20 {
      let before = e.velocity;
      e = integrate(e, 1.0 / 60.0);
      assert_eq!(e.velocity.x, before.x * 0.5);
      assert_eq!(e.velocity.y, before.y * 0.5);
      assert!(e.velocity.x >= 0.0);
      assert!(e.velocity.y <= 0.0);
    }
    assert!(e.velocity.x < 1e-3);
  }

  #[test]
  fn test_inertia_ignored_on_accelerating_axis() {
    let e = integrate(
      body()
        .with_velocity(Vec2::new(10.0, 10.0))
        .with_acceleration(Vec2::new(0.0, 1.0))
        .with_inertia(0.5),
      1.0,
    );
    assert_eq!(e.velocity, Vec2::new(5.0, 11.0));
  }

  #[test]
  fn test_top_speed_clamps_with_sign() {
    for a in [-1000.0, -3.0, 0.0, 3.0, 1000.0] {
      let e = integrate(
        body()
          .with_velocity(Vec2::new(8.0, -8.0))
          .with_acceleration(Vec2::new(a, -a))
          .with_top_speed(10.0),
        1.0,
      );
      assert!(e.velocity.x.abs() <= 10.0);
      assert!(e.velocity.y.abs() <= 10.0);
    }
    let e = integrate(
      body().with_acceleration(Vec2::new(-500.0, 500.0)).with_top_speed(10.0),
      1.0,
    );
    assert_eq!(e.velocity, Vec2::new(-10.0, 10.0));
  }

  #[test]
  fn test_is_deterministic() {
    let e = body()
      .with_velocity(Vec2::new(1.5, 2.5))
      .with_acceleration(Vec2::new(0.3, -0.7));
    assert_eq!(integrate(e, 0.016), integrate(e, 0.016));
  }

  #[test]
  fn test_bad_delta_is_a_no_op() {
    let e = body().with_velocity(Vec2::new(1.0, 1.0));
    assert_eq!(integrate(e, f32::NAN), e);
    assert_eq!(integrate(e, -1.0), e);
  }
}
