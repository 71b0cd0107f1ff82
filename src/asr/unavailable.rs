//! Null recognizer: every attempt reports that speech input is unavailable

use super::SpeechRecognizer;
use crate::error::RecognitionError;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct UnavailableRecognizer {
    reason: String,
}

impl UnavailableRecognizer {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl SpeechRecognizer for UnavailableRecognizer {
    async fn listen_once(&self) -> Result<String, RecognitionError> {
        Err(RecognitionError::Unavailable(self.reason.clone()))
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}
