use tokio::task::JoinHandle;

use tracing::{error, info};

use crate::audio::backend::{MediaSource, PlaybackControl};
use crate::audio::playback::BufferSource;
use crate::audio::worker::{AnalysisWorker, WorkerResponse};
use crate::config::AppConfig;
use crate::error::{AnalysisError, Result};
use crate::game::director::GameDirector;
use crate::game::{GameState, Intent, TracingObserver};
use crate::visualisation::overlay::HudState;
use crate::visualisation::store::EntityStore;

/// One play-through: a track feeding the worker, the worker feeding the
/// director, the director feeding the store.
pub struct Session {
  worker: Option<AnalysisWorker>,
  playback: PlaybackControl,
  media: Option<JoinHandle<()>>,
  director: GameDirector,
}

impl Session {
  /// Fails before anything runs when the audio metadata is unusable.
  pub fn start(config: &AppConfig, source: BufferSource) -> Result<Self> {
    let worker = AnalysisWorker::spawn(config.audio.clone(), config.analysis.clone())?;
    let frames = worker
      .frame_sender()
      .ok_or(AnalysisError::WorkerUnavailable)?;

    let playback = PlaybackControl::new(config.audio.rate);
    playback.play();
    let control = playback.clone();
    let media = tokio::spawn(async move {
      if let Err(e) = source.run(frames, control).await {
        error!("media source error - {}", e);
      }
    });

    let mut director = GameDirector::new(config.game.clone());
    director.subscribe(Box::new(TracingObserver));
    director.start();
    info!("session started");

    Ok(Self {
      worker: Some(worker),
      playback,
      media: Some(media),
      director,
    })
  }

  #[cfg(test)]
  pub fn state(&self) -> GameState {
    self.director.state()
  }

  #[cfg(test)]
  pub fn director(&self) -> &GameDirector {
    &self.director
  }

  #[cfg(test)]
  pub fn playback(&self) -> &PlaybackControl {
    &self.playback
  }

  pub fn apply(&mut self, intent: Intent) {
    self.director.apply(intent);
  }

  /// Simulation and audio pause together.
  pub fn pause(&mut self) {
    if self.director.pause() {
      self.playback.pause();
    }
  }

  pub fn resume(&mut self) {
    if self.director.resume() {
      self.playback.play();
    }
  }

  pub fn toggle_pause(&mut self) {
    match self.director.state() {
      GameState::Running => self.pause(),
      GameState::Paused => self.resume(),
      GameState::NotRunning => {}
    }
  }

  /// Everything between two renders: drain analysis results, step the game,
  /// push the result into the store. A lost worker ends the session.
  pub fn frame(&mut self, store: &mut EntityStore, dt: f32, now: f64) -> Result<()> {
    if let Some(worker) = self.worker.as_mut() {
      let mut responses = Vec::new();
      while let Some(response) = worker.try_recv()? {
        responses.push(response);
      }
      for response in responses {
        self.apply_response(store, response);
      }
    }

    if self.playback.is_ended() && self.director.state() != GameState::NotRunning {
      info!("track finished, final score {}", self.director.score());
      self.abort(store);
    }

    self.director.tock(dt, now);
    self.director.sync(store);
    store.cull();
    store.set_hud(self.hud());
    Ok(())
  }

  fn apply_response(&mut self, store: &mut EntityStore, response: WorkerResponse) {
    store.set_spectrum_data(&response.spectrum);
    if let Some(color) = response.canvas_bg {
      store.set_canvas_bg(color);
    }
    if let Some(count) = response.num_enemies {
      self.director.generate_enemies(count);
    }
  }

  pub fn hud(&self) -> HudState {
    let state = self.director.state();
    HudState {
      paused: state == GameState::Paused,
      running: state != GameState::NotRunning,
      ended: state == GameState::NotRunning,
      score: self.director.score(),
      hits: self.director.hits(),
    }
  }

  /// Tear down synchronously: worker gone, playback stopped, entities cleared.
  pub fn abort(&mut self, store: &mut EntityStore) {
    if let Some(worker) = self.worker.take() {
      worker.terminate();
    }
    self.stop_media();
    self.director.abort();
    store.clean_objects();
    store.set_hud(self.hud());
  }

  fn stop_media(&mut self) {
    self.playback.pause();
    self.playback.stop();
    if let Some(media) = self.media.take() {
      media.abort();
    }
  }
}

impl Drop for Session {
  fn drop(&mut self) {
    self.stop_media();
  }
}
