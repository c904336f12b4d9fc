use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tracing::{debug, warn};

use crate::game::collision::overlaps;
use crate::game::entity::{Appearance, Entity, EntityId, EntityKind, SpriteId, Vec2};
use crate::game::physics::integrate;
use crate::game::{Direction, GameConfig, GameEvent, GameObserver, GameState, Intent};
use crate::visualisation::store::EntityStore;

const BULLET_COLOR: u32 = 0x00FFE066;

#[derive(Clone, Copy, Debug, Default)]
struct Thrust {
  up: bool,
  down: bool,
  left: bool,
  right: bool,
}

impl Thrust {
  fn set(&mut self, direction: Direction, engaged: bool) {
    match direction {
      Direction::Up => self.up = engaged,
      Direction::Down => self.down = engaged,
      Direction::Left => self.left = engaged,
      Direction::Right => self.right = engaged,
    }
  }

  fn acceleration(&self, thrust: f32) -> Vec2 {
    let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32 * thrust;
    Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
  }
}

/// Owns the simulation: player, bullets, enemies, score and the game state
/// machine.
pub struct GameDirector {
  config: GameConfig,
  state: GameState,
  player: Option<Entity>,
  bullets: Vec<Entity>,
  enemies: Vec<Entity>,
  thrust: Thrust,
  score: u32,
  hits: u32,
  last_fire: Option<f64>,
  last_hit: Option<f64>,
  next_id: u64,
  rng: StdRng,
  observers: Vec<Box<dyn GameObserver>>,
}

impl GameDirector {
  pub fn new(config: GameConfig) -> Self {
    let rng = match config.seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_os_rng(),
    };
    Self {
      config,
      state: GameState::NotRunning,
      player: None,
      bullets: Vec::new(),
      enemies: Vec::new(),
      thrust: Thrust::default(),
      score: 0,
      hits: 0,
      last_fire: None,
      last_hit: None,
      next_id: 0,
      rng,
      observers: Vec::new(),
    }
  }

  pub fn subscribe(&mut self, observer: Box<dyn GameObserver>) {
    self.observers.push(observer);
  }

  pub fn state(&self) -> GameState {
    self.state
  }

  #[cfg(test)]
  pub fn config(&self) -> &GameConfig {
    &self.config
  }

  #[cfg(test)]
  pub fn player(&self) -> Option<&Entity> {
    self.player.as_ref()
  }

  #[cfg(test)]
  pub fn bullets(&self) -> &[Entity] {
    &self.bullets
  }

  #[cfg(test)]
  pub fn enemies(&self) -> &[Entity] {
    &self.enemies
  }

  pub fn score(&self) -> u32 {
    self.score
  }

  pub fn hits(&self) -> u32 {
    self.hits
  }

  /// NotRunning -> Running with a fresh player. Returns false in any other
  /// state.
  pub fn start(&mut self) -> bool {
    if self.state != GameState::NotRunning {
      return false;
    }
    self.clear();
    self.score = 0;
    self.hits = 0;
    let player = self.spawn_player();
    self.player = Some(player);
    self.state = GameState::Running;
    self.emit(&[GameEvent::Started]);
    true
  }

  pub fn pause(&mut self) -> bool {
    if self.state != GameState::Running {
      return false;
    }
    self.state = GameState::Paused;
    self.emit(&[GameEvent::Paused]);
    true
  }

  pub fn resume(&mut self) -> bool {
    if self.state != GameState::Paused {
      return false;
    }
    self.state = GameState::Running;
    self.emit(&[GameEvent::Resumed]);
    true
  }

  /// Back to NotRunning with every entity gone.
  pub fn abort(&mut self) -> bool {
    if self.state == GameState::NotRunning {
      return false;
    }
    self.clear();
    self.state = GameState::NotRunning;
    self.emit(&[GameEvent::Aborted]);
    true
  }

  pub fn apply(&mut self, intent: Intent) {
    if self.state != GameState::Running {
      return;
    }
    match intent {
      Intent::Thrust { direction, engaged } => self.thrust.set(direction, engaged),
      Intent::Pointer { x, y } => {
        if !(x.is_finite() && y.is_finite()) {
          return;
        }
        let Some(player) = self.player.as_mut() else {
          return;
        };
        player.position = Vec2::new(x, y);
        player.velocity = Vec2::ZERO;
        clamp_to_canvas(player, &self.config);
        let position = player.position;
        self.emit(&[GameEvent::Moved { position }]);
      }
    }
  }

  /// Bring `count` enemies in just past the right edge at random heights.
  pub fn generate_enemies(&mut self, count: usize) {
    if self.state != GameState::Running || count == 0 {
      return;
    }
    let size = self.config.enemy_size;
    let (low, high) = (size.height / 2.0, self.config.height - size.height / 2.0);
    for _ in 0..count {
      let y = if high > low {
        self.rng.random_range(low..high)
      } else {
        self.config.height / 2.0
      };
      let id = self.next_id();
      let enemy = Entity::new(
        EntityKind::Enemy,
        Vec2::new(self.config.width + size.width / 2.0, y),
        size,
        Appearance::Sprite(SpriteId::Enemy),
      )
      .with_id(id)
      .with_velocity(Vec2::new(-self.config.enemy_speed, 0.0));
      self.enemies.push(enemy);
    }
    debug!("spawned {} enemies, {} alive", count, self.enemies.len());
  }

  /// One simulation step. Does nothing unless Running.
  pub fn tock(&mut self, dt: f32, now: f64) {
    if self.state != GameState::Running {
      return;
    }
    let mut events = Vec::new();

    // advance
    if let Some(player) = self.player.as_mut() {
      let before = player.position;
      player.acceleration = self.thrust.acceleration(self.config.player_thrust);
      *player = integrate(*player, dt);
      clamp_to_canvas(player, &self.config);
      if player.position != before {
        events.push(GameEvent::Moved {
          position: player.position,
        });
      }
    }
    for entity in self.enemies.iter_mut().chain(self.bullets.iter_mut()) {
      *entity = integrate(*entity, dt);
    }

    // cull
    let before = self.enemies.len() + self.bullets.len();
    self.enemies.retain(|e| e.is_finite() && e.position.x >= -e.size.width);
    let width = self.config.width;
    self.bullets.retain(|b| b.is_finite() && b.position.x <= width);
    let culled = before - self.enemies.len() - self.bullets.len();
    if culled > 0 {
      debug!("culled {} entities", culled);
    }

    // fire
    if self.last_fire.is_none_or(|last| now - last > self.config.fire_interval as f64) {
      self.fire();
      self.last_fire = Some(now);
    }

    self.collide(&mut events, now);
    self.emit(&events);
  }

  fn collide(&mut self, events: &mut Vec<GameEvent>, now: f64) {
    // enemy vs player, the enemy survives and the player is briefly immune
    let immune = self
      .last_hit
      .is_some_and(|last| now - last < self.config.hit_cooldown as f64);
    if let (Some(player), false) = (self.player, immune) {
      if let Some(enemy) = self.enemies.iter().find(|e| overlaps(e, &player)) {
        self.hits += 1;
        self.last_hit = Some(now);
        events.push(GameEvent::Hit {
          enemy: enemy.id.unwrap_or(EntityId(u64::MAX)),
          hits: self.hits,
        });
        let respawn = self.spawn_point();
        if let Some(player) = self.player.as_mut() {
          player.position = respawn;
          player.velocity = Vec2::ZERO;
        }
      }
    }

    // enemy vs bullet, first bullet in list order wins
    let mut consumed = vec![false; self.bullets.len()];
    let mut killed = vec![false; self.enemies.len()];
    for (ei, enemy) in self.enemies.iter().enumerate() {
      let hit = self
        .bullets
        .iter()
        .enumerate()
        .find(|(bi, bullet)| !consumed[*bi] && overlaps(enemy, bullet));
      if let Some((bi, _)) = hit {
        consumed[bi] = true;
        killed[ei] = true;
        self.score += self.config.points_per_kill;
        events.push(GameEvent::Scored {
          enemy: enemy.id.unwrap_or(EntityId(u64::MAX)),
          score: self.score,
        });
      }
    }

    let mut consumed = consumed.into_iter();
    self.bullets.retain(|_| !consumed.next().unwrap_or(false));
    let mut killed = killed.into_iter();
    self.enemies.retain(|_| !killed.next().unwrap_or(false));
  }

  fn fire(&mut self) {
    let Some(player) = self.player else {
      return;
    };
    let id = self.next_id();
    let bullet = Entity::new(
      EntityKind::Bullet,
      Vec2::new(player.position.x + player.size.width / 2.0, player.position.y),
      self.config.bullet_size,
      Appearance::Fill(BULLET_COLOR),
    )
    .with_id(id)
    .with_velocity(Vec2::new(self.config.bullet_speed, 0.0));
    self.bullets.push(bullet);
  }

  /// Push the current simulation into the store: entities that are gone are
  /// removed, the rest replaced by id.
  pub fn sync(&self, store: &mut EntityStore) {
    let mut alive = HashSet::new();
    for entity in self.player.iter().chain(&self.enemies).chain(&self.bullets) {
      if entity.is_finite() {
        alive.insert(store.add_object(*entity));
      } else {
        warn!("dropping non-finite {:?} {:?}", entity.kind, entity.id);
      }
    }

    let stale: Vec<EntityId> = store
      .objects()
      .iter()
      .filter_map(|e| e.id)
      .filter(|id| !alive.contains(id))
      .collect();
    for id in stale {
      store.remove_object(id);
    }
  }

  fn spawn_player(&mut self) -> Entity {
    let id = self.next_id();
    Entity::new(
      EntityKind::Player,
      self.spawn_point(),
      self.config.player_size,
      Appearance::Sprite(SpriteId::Player),
    )
    .with_id(id)
    .with_top_speed(self.config.player_top_speed)
    .with_inertia(self.config.player_inertia)
  }

  fn spawn_point(&self) -> Vec2 {
    Vec2::new(self.config.width * 0.15, self.config.height / 2.0)
  }

  fn next_id(&mut self) -> EntityId {
    self.next_id += 1;
    EntityId(self.next_id)
  }

  fn clear(&mut self) {
    self.player = None;
    self.bullets.clear();
    self.enemies.clear();
    self.thrust = Thrust::default();
    self.last_fire = None;
    self.last_hit = None;
  }

  fn emit(&mut self, events: &[GameEvent]) {
    for event in events {
      for observer in &mut self.observers {
        observer.on_event(event);
      }
    }
  }
}

fn clamp_to_canvas(player: &mut Entity, config: &GameConfig) {
  let (hw, hh) = (player.size.width / 2.0, player.size.height / 2.0);
  let x = player.position.x.clamp(hw, (config.width - hw).max(hw));
  let y = player.position.y.clamp(hh, (config.height - hh).max(hh));
  if x != player.position.x {
    player.velocity.x = 0.0;
  }
  if y != player.position.y {
    player.velocity.y = 0.0;
  }
  player.position = Vec2::new(x, y);
}
