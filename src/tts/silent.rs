//! Null TTS engine used when speech output is switched off

use super::TtsEngine;
use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

#[derive(Debug, Default, Clone, Copy)]
pub struct SilentEngine;

#[async_trait]
impl TtsEngine for SilentEngine {
    async fn speak(&self, text: &str) -> Result<()> {
        debug!("(silent) {}", text);
        Ok(())
    }

    fn name(&self) -> &str {
        "silent"
    }
}
