use thiserror::Error;

/// Failures of the analysis side of a session.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
  /// Audio metadata handed to setup cannot drive an fft
  #[error("configuration error: {0}")]
  Configuration(String),

  /// The worker went away while the session still needed it
  #[error("analysis worker unavailable")]
  WorkerUnavailable,

  /// The fft rejected its buffers
  #[error("fft error: {0}")]
  Fft(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
