//! TTS (Text-to-Speech) Module
//!
//! Speech output is optional: every caller goes through
//! [`speak_best_effort`], so a broken or missing engine never changes what
//! the drill does.

use crate::config::Config;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

pub mod silent;
pub mod system;

pub use silent::SilentEngine;
pub use system::SystemEngine;

/// Trait for TTS engines
#[async_trait]
pub trait TtsEngine: Send + Sync + std::fmt::Debug {
    /// Speak the given text, returning once it has been handed off
    async fn speak(&self, text: &str) -> Result<()>;

    /// Get the engine name
    fn name(&self) -> &str;
}

/// Speak and log failures instead of returning them
pub async fn speak_best_effort(engine: &dyn TtsEngine, text: &str) {
    if let Err(e) = engine.speak(text).await {
        warn!("🔇 {} could not speak '{}': {}", engine.name(), text, e);
    }
}

/// Speak a sequence in order, e.g. a word spelled letter by letter
pub async fn speak_sequence<S: AsRef<str>>(engine: &dyn TtsEngine, parts: &[S]) {
    for part in parts {
        speak_best_effort(engine, part.as_ref()).await;
    }
}

/// Factory to create the configured TTS engine
pub fn create_engine(config: &Config) -> Arc<dyn TtsEngine> {
    info!("🛠️ Creating TTS engine: {}", config.tts_engine);
    let engine: Arc<dyn TtsEngine> = match config.tts_engine.as_str() {
        "system" => Arc::new(SystemEngine),
        "silent" | "none" => Arc::new(SilentEngine),
        other => {
            warn!("  - Unknown engine '{}', falling back to System", other);
            Arc::new(SystemEngine)
        }
    };
    info!("✅ TTS engine '{}' initialized", engine.name());
    engine
}
