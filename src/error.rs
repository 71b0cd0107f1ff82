//! PicWords Error Types
//!
//! Centralized error handling. Every failure a practice session can hit is
//! reported to the user inline; nothing here is fatal to the process.

use std::path::PathBuf;
use thiserror::Error;

/// Central error type for PicWords
#[derive(Error, Debug)]
pub enum PracticeError {
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Folder for {category} not found: {}", dir.display())]
    MissingFolder { category: String, dir: PathBuf },

    #[error("No images found in {}", dir.display())]
    NoImages { dir: PathBuf },

    #[error(transparent)]
    Recognition(#[from] RecognitionError),

    #[error(transparent)]
    ImageLoad(#[from] ImageLoadError),

    #[error("TTS engine error: {0}")]
    Tts(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for PicWords operations
pub type PracticeResult<T> = Result<T, PracticeError>;

/// Failure of one speech-to-text attempt
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecognitionError {
    /// Audio was captured but nothing intelligible came back
    #[error("speech was not understood")]
    NoMatch,

    #[error("recognition service unreachable: {0}")]
    Unreachable(String),

    #[error("microphone error: {0}")]
    Device(String),

    /// No recognizer is configured or compiled in
    #[error("speech recognition unavailable: {0}")]
    Unavailable(String),
}

/// A drawn picture could not be opened or decoded
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unable to load image {file}: {reason}")]
pub struct ImageLoadError {
    pub file: String,
    pub reason: String,
}

/// Coarse error classes as shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Content,
    Recognition,
    ImageLoad,
    Internal,
}

/// Title and body of a user-facing error message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: &'static str,
    pub message: String,
}

impl PracticeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownCategory(_) | Self::MissingFolder { .. } | Self::Config(_) => {
                ErrorKind::Configuration
            }
            Self::NoImages { .. } => ErrorKind::Content,
            Self::Recognition(_) => ErrorKind::Recognition,
            Self::ImageLoad(_) => ErrorKind::ImageLoad,
            Self::Tts(_) | Self::Io(_) | Self::Json(_) | Self::Other(_) => ErrorKind::Internal,
        }
    }

    /// User-visible rendering of this error
    pub fn alert(&self) -> Alert {
        match self {
            Self::UnknownCategory(_) | Self::MissingFolder { .. } => Alert {
                title: "Missing Folder",
                message: self.to_string(),
            },
            Self::NoImages { .. } => Alert {
                title: "No Images",
                message: self.to_string(),
            },
            Self::Recognition(err) => err.alert(),
            Self::ImageLoad(err) => Alert {
                title: "Image Error",
                message: err.to_string(),
            },
            _ => Alert {
                title: "Error",
                message: self.to_string(),
            },
        }
    }
}

impl RecognitionError {
    pub fn alert(&self) -> Alert {
        match self {
            Self::NoMatch => Alert {
                title: "Try Again",
                message: "Sorry, I could not understand. Please try again.".to_string(),
            },
            Self::Unreachable(_) => Alert {
                title: "Network Error",
                message: "Could not reach recognition service. Check internet connectivity."
                    .to_string(),
            },
            Self::Device(reason) => Alert {
                title: "Microphone Error",
                message: format!("Problem accessing mic: {}", reason),
            },
            Self::Unavailable(reason) => Alert {
                title: "Speech To Text Missing",
                message: format!("Speech recognition is not available: {}", reason),
            },
        }
    }
}
