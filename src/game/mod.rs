pub mod collision;
pub mod director;
pub mod entity;
pub mod physics;

use tracing::{debug, info, trace};

use crate::game::entity::{EntityId, Size, Vec2};

/// Gameplay tunables, canvas in logical pixels, times in seconds.
#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
  pub width: f32,
  pub height: f32,
  pub fire_interval: f32,
  pub bullet_speed: f32,
  pub bullet_size: Size,
  pub enemy_speed: f32,
  pub enemy_size: Size,
  pub player_size: Size,
  pub player_thrust: f32,
  pub player_top_speed: f32,
  pub player_inertia: f32,
  pub points_per_kill: u32,
  /// seconds after a hit during which the player cannot be hit again
  pub hit_cooldown: f32,
  pub seed: Option<u64>,
}

impl Default for GameConfig {
  fn default() -> Self {
    Self {
      width: 640.0,
      height: 360.0,
      fire_interval: 0.15,
      bullet_speed: 600.0,
      bullet_size: Size::new(8.0, 3.0),
      enemy_speed: 180.0,
      enemy_size: Size::new(24.0, 24.0),
      player_size: Size::new(32.0, 24.0),
      player_thrust: 1200.0,
      player_top_speed: 360.0,
      player_inertia: 0.85,
      points_per_kill: 10,
      hit_cooldown: 1.0,
      seed: None,
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
  NotRunning,
  Running,
  Paused,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
  Up,
  Down,
  Left,
  Right,
}

/// What the input layer asks of the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Intent {
  Thrust { direction: Direction, engaged: bool },
  /// pointer already remapped into canvas space
  Pointer { x: f32, y: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameEvent {
  Started,
  Paused,
  Resumed,
  Aborted,
  Hit { enemy: EntityId, hits: u32 },
  Scored { enemy: EntityId, score: u32 },
  Moved { position: Vec2 },
}

pub trait GameObserver {
  fn on_event(&mut self, event: &GameEvent);
}

/// Logs every game event.
pub struct TracingObserver;

impl GameObserver for TracingObserver {
  fn on_event(&mut self, event: &GameEvent) {
    match event {
      GameEvent::Started => info!("game started"),
      GameEvent::Paused => info!("game paused"),
      GameEvent::Resumed => info!("game resumed"),
      GameEvent::Aborted => info!("game aborted"),
      GameEvent::Hit { enemy, hits } => debug!("player hit by {:?}, {} hits", enemy, hits),
      GameEvent::Scored { enemy, score } => debug!("shot down {:?}, score {}", enemy, score),
      GameEvent::Moved { position } => trace!("player at {:.0},{:.0}", position.x, position.y),
    }
  }
}
