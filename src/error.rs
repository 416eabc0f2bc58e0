use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Pipeline step that was running when an I/O failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    LoadSymbols,
    LoadConfig,
    WriteDocument,
    WritePageImage,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::LoadSymbols => write!(f, "load symbols"),
            Stage::LoadConfig => write!(f, "load config"),
            Stage::WriteDocument => write!(f, "write document"),
            Stage::WritePageImage => write!(f, "write page image"),
        }
    }
}

#[derive(Debug, Error)]
pub enum DobbleError {
    /// Degenerate geometry or card counts; a caller bug, never retried.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("invalid card: {0}")]
    InvalidCard(String),

    #[error("{stage} failed for {}: {source}", .path.display())]
    Io {
        stage: Stage,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to encode {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to build PDF {}: {message}", .path.display())]
    Pdf { path: PathBuf, message: String },

    #[error("failed to parse config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl DobbleError {
    pub(crate) fn io(stage: Stage, path: impl Into<PathBuf>, source: io::Error) -> Self {
        DobbleError::Io {
            stage,
            path: path.into(),
            source,
        }
    }

    /// Stage that failed, for errors tied to the filesystem.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            DobbleError::Io { stage, .. } => Some(*stage),
            DobbleError::Decode { .. } => Some(Stage::LoadSymbols),
            DobbleError::Encode { .. } => Some(Stage::WritePageImage),
            DobbleError::Pdf { .. } => Some(Stage::WriteDocument),
            DobbleError::Config { .. } => Some(Stage::LoadConfig),
            DobbleError::Configuration(_) | DobbleError::InvalidCard(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DobbleError>;
