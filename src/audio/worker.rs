use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tokio::sync::mpsc::{self, error::TryRecvError, error::TrySendError};
use tokio::task;

use tracing::{debug, error, info};

use crate::audio::AudioConfig;
use crate::audio::beat::{BeatConfig, BeatDetector};
use crate::audio::mapper::{Color, MapperConfig, MappingMode, SignalMapper};
use crate::audio::processor::SpectrumAnalyzer;
use crate::error::{AnalysisError, Result};

/// One delivered block of interleaved samples.
#[derive(Clone, Debug, Default)]
pub struct FrameRequest {
  pub frame_buffer: Vec<f32>,
  /// seconds of audio covered since the previous frame
  pub time: f32,
}

pub enum WorkerRequest {
  Setup(AudioConfig),
  Frame(FrameRequest),
}

/// Snapshot posted back after every processed frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorkerResponse {
  pub spectrum: Vec<f32>,
  /// present on the beat cadence only
  pub canvas_bg: Option<Color>,
  /// present on the spawn cadence only
  pub num_enemies: Option<usize>,
}

/// Frames between spawn signals, redrawn from `[min_frames, max_frames)`
/// after every signal.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnCadence {
  pub min_frames: u32,
  pub max_frames: u32,
}

impl Default for SpawnCadence {
  fn default() -> Self {
    Self {
      min_frames: 5,
      max_frames: 30,
    }
  }
}

/// Tunables fixed for the lifetime of a worker.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisSettings {
  pub beat: BeatConfig,
  pub mapper: MapperConfig,
  pub cadence: SpawnCadence,
  pub seed: Option<u64>,
  /// frames allowed in flight before new ones are dropped
  pub queue_depth: usize,
}

impl Default for AnalysisSettings {
  fn default() -> Self {
    Self {
      beat: BeatConfig::default(),
      mapper: MapperConfig::default(),
      cadence: SpawnCadence::default(),
      seed: None,
      queue_depth: 16,
    }
  }
}

/// Everything the worker owns, processed strictly one frame at a time.
pub struct AnalysisState {
  idle: bool,
  analyzer: SpectrumAnalyzer,
  detector: BeatDetector,
  mapper: SignalMapper,
  cadence: SpawnCadence,
  rng: StdRng,
  canvas_bg: Color,
  enemies: usize,
  frames: u32,
  period: u32,
}

impl AnalysisState {
  pub fn setup(audio: &AudioConfig, settings: &AnalysisSettings) -> Result<Self> {
    let analyzer = SpectrumAnalyzer::new(audio)?;
    let mapper = SignalMapper::new(settings.mapper.clone());
    let mut rng = match settings.seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_os_rng(),
    };
    let period = draw_period(&settings.cadence, &mut rng);
    let canvas_bg = match settings.mapper.mode {
      MappingMode::Beat => mapper.intensity_color(0.0),
      MappingMode::Bands => mapper.band_color(&[]),
    };

    Ok(Self {
      idle: audio.idle,
      analyzer,
      detector: BeatDetector::new(settings.beat.clone()),
      mapper,
      cadence: settings.cadence.clone(),
      rng,
      canvas_bg,
      enemies: 0,
      frames: 0,
      period,
    })
  }

  pub fn process(&mut self, frame: &FrameRequest) -> Result<WorkerResponse> {
    let spectrum = self.analyzer.process(&frame.frame_buffer)?.to_vec();
    let mut response = WorkerResponse::default();

    if let Some(intensity) = self.detector.step(&spectrum, frame.time) {
      match self.mapper.config().mode {
        MappingMode::Beat => {
          self.canvas_bg = self.mapper.intensity_color(intensity);
          self.enemies = self.mapper.intensity_enemies(intensity);
        }
        MappingMode::Bands => {
          self.canvas_bg = self.mapper.band_color(&spectrum);
          self.enemies = self.mapper.color_enemies(self.canvas_bg);
        }
      }
      response.canvas_bg = Some(self.canvas_bg);
    }

    if !self.idle {
      self.frames += 1;
      if self.frames >= self.period {
        response.num_enemies = Some(self.enemies);
        self.frames = 0;
        self.period = draw_period(&self.cadence, &mut self.rng);
      }
    }

    response.spectrum = spectrum;
    Ok(response)
  }

  #[cfg(test)]
  pub fn canvas_bg(&self) -> Color {
    self.canvas_bg
  }
}

fn draw_period(cadence: &SpawnCadence, rng: &mut StdRng) -> u32 {
  let min = cadence.min_frames.max(1);
  if cadence.max_frames > min {
    rng.random_range(min..cadence.max_frames)
  } else {
    min
  }
}

/// Producer side handed to the media source.
#[derive(Clone)]
pub struct FrameSender {
  tx: mpsc::Sender<WorkerRequest>,
}

impl FrameSender {
  /// Queue a frame without blocking. A full queue drops the frame; returns
  /// false once the worker is gone.
  pub fn send(&self, frame: FrameRequest) -> bool {
    match self.tx.try_send(WorkerRequest::Frame(frame)) {
      Ok(()) => true,
      Err(TrySendError::Full(_)) => {
        debug!("analysis queue full, dropping frame");
        true
      }
      Err(TrySendError::Closed(_)) => false,
    }
  }
}

/// Handle to the analysis pipeline running on its own blocking thread.
pub struct AnalysisWorker {
  // dropped on shutdown so the worker loop sees a closed queue
  requests: Option<mpsc::Sender<WorkerRequest>>,
  responses: mpsc::UnboundedReceiver<WorkerResponse>,
  stop: Arc<AtomicBool>,
}

impl AnalysisWorker {
  /// Validates `audio` before anything is spawned, then hands it to the
  /// worker as its first setup request.
  pub fn spawn(audio: AudioConfig, settings: AnalysisSettings) -> Result<Self> {
    audio.validate()?;

    let (req_tx, req_rx) = mpsc::channel(settings.queue_depth.max(1));
    let (resp_tx, resp_rx) = mpsc::unbounded_channel();
    let stop = Arc::new(AtomicBool::new(false));

    let worker_stop = Arc::clone(&stop);
    task::spawn_blocking(move || run_worker(settings, req_rx, resp_tx, worker_stop));

    let worker = Self {
      requests: Some(req_tx),
      responses: resp_rx,
      stop,
    };
    worker.setup(audio)?;
    Ok(worker)
  }

  pub fn frame_sender(&self) -> Option<FrameSender> {
    self.requests.as_ref().map(|tx| FrameSender { tx: tx.clone() })
  }

  /// (Re)configure the worker. Invalid metadata fails here and never reaches
  /// the worker, as does a full or closed queue.
  pub fn setup(&self, audio: AudioConfig) -> Result<()> {
    audio.validate()?;
    self
      .requests
      .as_ref()
      .ok_or(AnalysisError::WorkerUnavailable)?
      .try_send(WorkerRequest::Setup(audio))
      .map_err(|_| AnalysisError::WorkerUnavailable)
  }

  /// Next pending response, if any. A dead worker is an error.
  pub fn try_recv(&mut self) -> Result<Option<WorkerResponse>> {
    match self.responses.try_recv() {
      Ok(response) => Ok(Some(response)),
      Err(TryRecvError::Empty) => Ok(None),
      Err(TryRecvError::Disconnected) => Err(AnalysisError::WorkerUnavailable),
    }
  }

  #[cfg(test)]
  pub async fn recv(&mut self) -> Option<WorkerResponse> {
    self.responses.recv().await
  }

  /// Stop outright, pending frames are not drained.
  pub fn terminate(mut self) {
    self.shutdown();
  }

  fn shutdown(&mut self) {
    self.stop.store(true, Ordering::Relaxed);
    if self.requests.take().is_some() {
      info!("analysis worker terminated");
    }
  }
}

impl Drop for AnalysisWorker {
  fn drop(&mut self) {
    self.shutdown();
  }
}

fn run_worker(
  settings: AnalysisSettings,
  mut rx: mpsc::Receiver<WorkerRequest>,
  tx: mpsc::UnboundedSender<WorkerResponse>,
  stop: Arc<AtomicBool>,
) {
  let mut state: Option<AnalysisState> = None;
  while let Some(request) = rx.blocking_recv() {
    if stop.load(Ordering::Relaxed) {
      break;
    }
    match request {
      WorkerRequest::Setup(audio) => match AnalysisState::setup(&audio, &settings) {
        Ok(next) => {
          info!(
            "analysis worker setup - {} ch @ {} Hz, fft size {}",
            audio.channels,
            audio.rate,
            audio.fft_size()
          );
          state = Some(next);
        }
        Err(e) => {
          error!("analysis setup failed - {}", e);
          break;
        }
      },
      WorkerRequest::Frame(frame) => {
        let Some(state) = state.as_mut() else {
          debug!("frame before setup, dropped");
          continue;
        };
        match state.process(&frame) {
          Ok(response) => {
            if let Some(n) = response.num_enemies {
              debug!("spawn signal - {} enemies", n);
            }
            if tx.send(response).is_err() {
              break;
            }
          }
          Err(e) => {
            error!("analysis failed - {}", e);
            break;
          }
        }
      }
    }
  }
  debug!("analysis worker loop finished");
}
