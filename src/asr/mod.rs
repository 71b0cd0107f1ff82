//! ASR (Automatic Speech Recognition) Module
//!
//! A recognizer turns one spoken answer into text. Backends:
//! - Wyoming: microphone capture sent to a Wyoming ASR server
//! - Unavailable: null object used when speech input is not set up

pub mod unavailable;
pub mod wyoming;

use crate::config::Config;
use crate::error::RecognitionError;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

// Re-export main types
pub use unavailable::UnavailableRecognizer;
pub use wyoming::{WyomingClient, WyomingRecognizer};

/// Trait for speech-to-text engines
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Capture one utterance and return it trimmed and lowercased
    async fn listen_once(&self) -> Result<String, RecognitionError>;

    /// Get the engine name
    fn name(&self) -> &str;
}

/// Clean up a raw transcript; empty text means nothing was understood
pub fn clean_transcript(raw: &str) -> Result<String, RecognitionError> {
    let text = raw.trim().to_lowercase();
    if text.is_empty() {
        Err(RecognitionError::NoMatch)
    } else {
        Ok(text)
    }
}

/// Factory to create the configured recognizer
pub fn create_recognizer(config: &Config) -> Arc<dyn SpeechRecognizer> {
    info!("🛠️ Creating ASR engine: {}", config.asr_engine);
    match config.asr_engine.as_str() {
        "wyoming" => wyoming_with_microphone(config),
        "none" => Arc::new(UnavailableRecognizer::new("speech input is turned off")),
        other => {
            warn!("  - Unknown ASR engine '{}'", other);
            Arc::new(UnavailableRecognizer::new(format!(
                "unknown engine '{}'",
                other
            )))
        }
    }
}

#[cfg(feature = "mic")]
fn wyoming_with_microphone(config: &Config) -> Arc<dyn SpeechRecognizer> {
    let client = WyomingClient::new(&config.wyoming_host, config.wyoming_port);
    let capture = Arc::new(crate::audio::MicCapture::new(config.audio_device));
    Arc::new(WyomingRecognizer::new(client, capture, config.listen_window()))
}

#[cfg(not(feature = "mic"))]
fn wyoming_with_microphone(_config: &Config) -> Arc<dyn SpeechRecognizer> {
    warn!("  - Built without the `mic` feature, speech input disabled");
    Arc::new(UnavailableRecognizer::new(
        "this build has no microphone support",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_transcript() {
        assert_eq!(clean_transcript("  Jupiter ").unwrap(), "jupiter");
        assert_eq!(clean_transcript("   "), Err(RecognitionError::NoMatch));
    }

    #[tokio::test]
    async fn test_disabled_engine_reports_unavailable() {
        let mut config = Config::default();
        config.asr_engine = "none".to_string();
        let recognizer = create_recognizer(&config);
        assert!(matches!(
            recognizer.listen_once().await,
            Err(RecognitionError::Unavailable(_))
        ));
    }
}
