//! Recording speech engine
//!
//! Keeps every utterance in order so tests can check what the drill said.

use async_trait::async_trait;
use picwords::tts::TtsEngine;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Default)]
pub struct MockTts {
    utterances: Arc<Mutex<Vec<String>>>,
    broken: Arc<AtomicBool>,
}

impl MockTts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Utterances so far, oldest first
    pub fn get_spoken(&self) -> Vec<String> {
        self.utterances.lock().unwrap().clone()
    }

    pub fn was_spoken(&self, text: &str) -> bool {
        self.utterances.lock().unwrap().iter().any(|u| u == text)
    }

    /// Every later `speak` errors and records nothing
    pub fn fail(&self) {
        self.broken.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl TtsEngine for MockTts {
    async fn speak(&self, text: &str) -> anyhow::Result<()> {
        if self.broken.load(Ordering::SeqCst) {
            anyhow::bail!("speech device gone");
        }
        self.utterances.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
