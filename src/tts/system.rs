//! System TTS engine shelling out to speech-dispatcher or espeak-ng

use super::TtsEngine;
use anyhow::Result;
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// Candidate commands, tried in order. Each waits until speech finished so
/// spelled letters do not overlap.
const COMMANDS: &[(&str, &[&str])] = &[("spd-say", &["--wait"]), ("espeak-ng", &[])];

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEngine;

#[async_trait]
impl TtsEngine for SystemEngine {
    async fn speak(&self, text: &str) -> Result<()> {
        debug!("🗣️ {}", text);

        for (program, args) in COMMANDS {
            match Command::new(program).args(*args).arg(text).status().await {
                Ok(status) if status.success() => return Ok(()),
                Ok(status) => debug!("{} exited with {}", program, status),
                Err(e) => debug!("{} unavailable: {}", program, e),
            }
        }

        Err(anyhow::anyhow!(
            "No system TTS command found (tried spd-say, espeak-ng)"
        ))
    }

    fn name(&self) -> &str {
        "system"
    }
}
