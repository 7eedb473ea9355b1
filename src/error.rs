use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, LyricError>;

#[derive(Debug, thiserror::Error)]
pub enum LyricError {
  #[error("{}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("config: {0}")]
  Config(#[from] serde_json::Error),
}

impl LyricError {
  pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    LyricError::Io { path: path.into(), source }
  }
}
