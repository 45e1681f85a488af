use std::{io, path::PathBuf};

use thiserror::Error;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Configuration error: {0}")]
  Config(String),

  #[error("I/O error: {0}")]
  Io(#[from] io::Error),

  #[error("Serde error: {0}")]
  Serde(#[from] serde_json::Error),

  #[error("TOML error: {0}")]
  Toml(#[from] toml::de::Error),
}

/// Error type for rendering documents to disk.
#[derive(Debug, Error)]
pub enum RenderError {
  #[error("Input directory does not exist: {}", .0.display())]
  MissingInput(PathBuf),

  #[error("Failed to read {}: {source}", path.display())]
  Read { path: PathBuf, source: io::Error },

  #[error("Failed to write {}: {source}", path.display())]
  Write { path: PathBuf, source: io::Error },

  #[error("Serde error: {0}")]
  Serde(#[from] serde_json::Error),

  #[error("Thread pool error: {0}")]
  ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
