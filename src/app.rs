use std::time::Instant;

use minifb::{Key, KeyRepeat, MouseMode, Scale, ScaleMode, Window, WindowOptions};

use tokio::task;

use tracing::{error, info};

use crate::audio::playback::{BufferSource, demo_track};
use crate::config::AppConfig;
use crate::game::{Direction, Intent};
use crate::graphics::renderer::Renderer;
use crate::session::Session;
use crate::timing::FrameClock;
use crate::visualisation::store::EntityStore;

const WINDOW_SCALE: usize = 2;

pub struct App {
  config: AppConfig,
  window: Window,
  renderer: Renderer,
  store: EntityStore,
  session: Option<Session>,
  clock: FrameClock,
  started: Instant,
  pointer: Option<(f32, f32)>,
}

impl App {
  pub fn new(config: AppConfig) -> Result<Self, anyhow::Error> {
    let width = config.game.width as usize;
    let height = config.game.height as usize;

    // create window
    let window_options = WindowOptions {
      resize: true,
      scale: Scale::X1,
      scale_mode: ScaleMode::Stretch,
      ..Default::default()
    };
    let window = Window::new(
      "beatfield",
      width * WINDOW_SCALE,
      height * WINDOW_SCALE,
      window_options,
    )?;

    let mut store = EntityStore::new(width, height);
    store.set_quality(config.render.quality);
    if config.render.show_fps {
      store.toggle_fps();
    }

    Ok(Self {
      renderer: Renderer::new(width, height),
      store,
      session: None,
      clock: FrameClock::new(0.0),
      started: Instant::now(),
      pointer: None,
      window,
      config,
    })
  }

  pub async fn run(&mut self) -> Result<(), anyhow::Error> {
    self.window.set_target_fps(60);
    self.restart()?;

    while self.window.is_open() && !self.window.is_key_down(Key::Escape) {
      let now = self.started.elapsed().as_secs_f64();
      // process user inputs...
      self.handle_input()?;
      // step the session, a stalled frame is skipped
      if let Some(dt) = self.clock.tick(now) {
        self.step(dt, now);
      }
      // render a frame...
      self.store.render(&mut self.renderer, now);
      let (width, height) = self.renderer.dimensions();
      self
        .window
        .update_with_buffer(self.renderer.buffer(), width, height)?;
      // yield to the media task
      task::yield_now().await;
    }

    Ok(())
  }

  fn step(&mut self, dt: f32, now: f64) {
    let Some(session) = self.session.as_mut() else {
      return;
    };
    if let Err(e) = session.frame(&mut self.store, dt, now) {
      error!("session error - {}", e);
      session.abort(&mut self.store);
    }
  }

  /// Abort whatever is running and play the track again from the top.
  fn restart(&mut self) -> Result<(), anyhow::Error> {
    if let Some(mut session) = self.session.take() {
      session.abort(&mut self.store);
    }
    let samples = demo_track(
      &self.config.audio,
      self.config.demo.seconds,
      self.config.demo.bpm,
    );
    let source = BufferSource::new(self.config.audio.clone(), samples);
    info!("playing {:.1}s demo track", source.duration());
    self.session = Some(Session::start(&self.config, source)?);
    Ok(())
  }

  fn handle_input(&mut self) -> Result<(), anyhow::Error> {
    for key in self.window.get_keys_pressed(KeyRepeat::No) {
      match key {
        Key::Space | Key::P => {
          if let Some(session) = self.session.as_mut() {
            session.toggle_pause();
          }
        }
        Key::Q => {
          let quality = self.store.quality().toggled();
          self.store.set_quality(quality);
        }
        Key::F => {
          self.store.toggle_fps();
        }
        Key::B => {
          let mode = self.config.toggle_mapping_mode();
          info!("background driven by {:?}", mode);
          self.restart()?;
        }
        Key::I => {
          let idle = self.config.toggle_idle();
          info!("idle visualizer {}", if idle { "on" } else { "off" });
          self.restart()?;
        }
        Key::R => self.restart()?,
        _ => self.thrust(key, true),
      }
    }
    for key in self.window.get_keys_released() {
      self.thrust(key, false);
    }

    let pointer = self
      .window
      .get_mouse_pos(MouseMode::Discard)
      .map(|pos| to_canvas(pos, self.window.get_size(), self.store.canvas_size()));
    if pointer.is_some() && pointer != self.pointer {
      self.pointer = pointer;
      if let (Some((x, y)), Some(session)) = (pointer, self.session.as_mut()) {
        session.apply(Intent::Pointer { x, y });
      }
    }
    Ok(())
  }

  fn thrust(&mut self, key: Key, engaged: bool) {
    let (Some(direction), Some(session)) = (direction(key), self.session.as_mut()) else {
      return;
    };
    session.apply(Intent::Thrust { direction, engaged });
  }
}

impl Drop for App {
  fn drop(&mut self) {
    if let Some(mut session) = self.session.take() {
      session.abort(&mut self.store);
    }
  }
}

fn direction(key: Key) -> Option<Direction> {
  match key {
    Key::Up => Some(Direction::Up),
    Key::Down => Some(Direction::Down),
    Key::Left => Some(Direction::Left),
    Key::Right => Some(Direction::Right),
    _ => None,
  }
}

/// Window pixels to canvas units, the window may be stretched freely.
fn to_canvas(pos: (f32, f32), window: (usize, usize), canvas: (usize, usize)) -> (f32, f32) {
  let sx = canvas.0 as f32 / window.0.max(1) as f32;
  let sy = canvas.1 as f32 / window.1.max(1) as f32;
  (pos.0 * sx, pos.1 * sy)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_arrows_map_to_directions() {
    assert_eq!(direction(Key::Up), Some(Direction::Up));
    assert_eq!(direction(Key::Right), Some(Direction::Right));
    assert_eq!(direction(Key::Space), None);
  }

  #[test]
  fn test_pointer_follows_stretch() {
    assert_eq!(to_canvas((640.0, 360.0), (1280, 720), (640, 360)), (320.0, 180.0));
  }
}
