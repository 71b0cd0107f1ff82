//! Mock speech recognizer for testing
//!
//! Replays scripted results, one per `listen_once` call.

use async_trait::async_trait;
use picwords::asr::SpeechRecognizer;
use picwords::error::RecognitionError;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Default)]
pub struct MockRecognizer {
    script: Arc<Mutex<VecDeque<Result<String, RecognitionError>>>>,
    /// Number of capture attempts
    pub attempts: Arc<Mutex<usize>>,
}

impl MockRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a recognized phrase
    pub fn hears(&self, text: &str) -> &Self {
        self.script.lock().unwrap().push_back(Ok(text.to_string()));
        self
    }

    /// Queue a recognition failure
    pub fn fails_with(&self, err: RecognitionError) -> &Self {
        self.script.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl SpeechRecognizer for MockRecognizer {
    async fn listen_once(&self) -> Result<String, RecognitionError> {
        *self.attempts.lock().unwrap() += 1;
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(RecognitionError::NoMatch))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
