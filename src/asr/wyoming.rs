//! Wyoming Protocol Client
//!
//! Sends one captured utterance to an external ASR service speaking the
//! Wyoming protocol (JSON events, one per line, over TCP) and waits for the
//! transcript.
//!
//! Reference: https://github.com/rhasspy/wyoming

use super::{clean_transcript, SpeechRecognizer};
use crate::audio::{self, AudioCapture, SAMPLE_RATE};
use crate::config::ListenWindow;
use crate::error::RecognitionError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

/// Samples per audio-chunk event
const SAMPLES_PER_CHUNK: usize = 1024;

/// Wyoming event types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum WyomingEvent {
    /// Describe request (handshake)
    #[serde(rename = "describe")]
    Describe,

    /// Info response from server
    #[serde(rename = "info")]
    Info(InfoData),

    /// Start of audio stream
    #[serde(rename = "audio-start")]
    AudioStart(AudioFormat),

    /// Audio chunk
    #[serde(rename = "audio-chunk")]
    AudioChunk(AudioChunkData),

    /// End of audio stream
    #[serde(rename = "audio-stop")]
    AudioStop,

    /// Transcript result
    #[serde(rename = "transcript")]
    Transcript(TranscriptData),
}

/// Info response data
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct InfoData {
    #[serde(default)]
    pub asr: Vec<AsrInfo>,
}

/// ASR service info
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsrInfo {
    pub name: String,
    #[serde(default)]
    pub languages: Vec<String>,
}

/// Audio format announced with audio-start
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AudioFormat {
    pub rate: u32,
    pub width: u8,
    pub channels: u8,
}

/// Audio chunk data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioChunkData {
    pub rate: u32,
    pub width: u8,
    pub channels: u8,
    #[serde(with = "base64_bytes")]
    pub audio: Vec<u8>,
    #[serde(default)]
    pub timestamp: u64,
}

/// Transcript result data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptData {
    pub text: String,
}

/// Base64 serialization for audio bytes
mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}

fn unreachable(e: impl std::fmt::Display) -> RecognitionError {
    RecognitionError::Unreachable(e.to_string())
}

/// Wyoming client for ASR services
#[derive(Debug, Clone)]
pub struct WyomingClient {
    host: String,
    port: u16,
    timeout: Duration,
}

impl WyomingClient {
    /// Create a new Wyoming client
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            host: host.to_string(),
            port,
            timeout: Duration::from_secs(30),
        }
    }

    /// Check if the server is available
    pub async fn health_check(&self) -> bool {
        match TcpStream::connect((&*self.host, self.port)).await {
            Ok(_) => {
                debug!("Wyoming server available at {}:{}", self.host, self.port);
                true
            }
            Err(e) => {
                warn!("Wyoming server not available: {}", e);
                false
            }
        }
    }

    /// Bound on one whole exchange, from connect to transcript
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Transcribe 16 kHz mono PCM; returns the raw transcript text
    pub async fn transcribe(&self, samples: &[i16]) -> Result<String, RecognitionError> {
        let transcript = tokio::time::timeout(self.timeout, self.exchange(samples))
            .await
            .map_err(|_| unreachable("timeout waiting for Wyoming server"))??;

        info!("📝 Wyoming transcript: '{}'", transcript);
        Ok(transcript)
    }

    async fn exchange(&self, samples: &[i16]) -> Result<String, RecognitionError> {
        let stream = TcpStream::connect((&*self.host, self.port))
            .await
            .map_err(unreachable)?;

        let (reader, mut writer) = stream.into_split();
        let mut reader = BufReader::new(reader);

        // Handshake
        send_event(&mut writer, &WyomingEvent::Describe).await?;
        let mut line = String::new();
        reader.read_line(&mut line).await.map_err(unreachable)?;
        debug!("Wyoming handshake: {}", line.trim());

        let format = AudioFormat {
            rate: SAMPLE_RATE,
            width: 2,
            channels: 1,
        };
        send_event(&mut writer, &WyomingEvent::AudioStart(format)).await?;

        for (i, chunk) in samples.chunks(SAMPLES_PER_CHUNK).enumerate() {
            let event = WyomingEvent::AudioChunk(AudioChunkData {
                rate: format.rate,
                width: format.width,
                channels: format.channels,
                audio: audio::to_le_bytes(chunk),
                timestamp: (i * SAMPLES_PER_CHUNK) as u64 * 1000 / SAMPLE_RATE as u64,
            });
            send_event(&mut writer, &event).await?;
        }

        send_event(&mut writer, &WyomingEvent::AudioStop).await?;
        writer.flush().await.map_err(unreachable)?;

        debug!(
            "Sent audio ({} samples), waiting for transcript...",
            samples.len()
        );

        read_transcript(&mut reader).await
    }
}

async fn read_transcript(
    reader: &mut BufReader<OwnedReadHalf>,
) -> Result<String, RecognitionError> {
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).await.map_err(unreachable)? == 0 {
            return Err(unreachable("connection closed before transcript"));
        }

        match serde_json::from_str::<WyomingEvent>(&line) {
            Ok(WyomingEvent::Transcript(data)) => return Ok(data.text),
            Ok(other) => debug!("Ignoring Wyoming event: {:?}", other),
            Err(_) => debug!("Ignoring unknown Wyoming line: {}", line.trim()),
        }
    }
}

async fn send_event(
    writer: &mut OwnedWriteHalf,
    event: &WyomingEvent,
) -> Result<(), RecognitionError> {
    let mut line = serde_json::to_vec(event).map_err(unreachable)?;
    line.push(b'\n');
    writer.write_all(&line).await.map_err(unreachable)
}

/// Microphone capture followed by Wyoming transcription
pub struct WyomingRecognizer {
    client: WyomingClient,
    capture: Arc<dyn AudioCapture>,
    window: ListenWindow,
}

impl WyomingRecognizer {
    pub fn new(
        client: WyomingClient,
        capture: Arc<dyn AudioCapture>,
        window: ListenWindow,
    ) -> Self {
        Self {
            client,
            capture,
            window,
        }
    }
}

#[async_trait]
impl SpeechRecognizer for WyomingRecognizer {
    async fn listen_once(&self) -> Result<String, RecognitionError> {
        let capture = self.capture.clone();
        let window = self.window;

        // Capture blocks for up to the listen window
        let samples = tokio::task::spawn_blocking(move || capture.capture(&window))
            .await
            .map_err(|e| RecognitionError::Device(format!("capture task failed: {}", e)))??;

        let raw = self.client.transcribe(&samples).await?;
        clean_transcript(&raw)
    }

    fn name(&self) -> &str {
        "wyoming"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    struct FixedCapture(Vec<i16>);

    impl AudioCapture for FixedCapture {
        fn capture(&self, _window: &ListenWindow) -> Result<Vec<i16>, RecognitionError> {
            Ok(self.0.clone())
        }
    }

    struct DeadMic;

    impl AudioCapture for DeadMic {
        fn capture(&self, _window: &ListenWindow) -> Result<Vec<i16>, RecognitionError> {
            Err(RecognitionError::Device("unplugged".into()))
        }
    }

    /// One-shot server: answers describe, counts chunks, replies `transcript`
    async fn fake_server(transcript: &'static str) -> (u16, tokio::task::JoinHandle<usize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (reader, mut writer) = stream.into_split();
            let mut reader = BufReader::new(reader);
            let mut chunks = 0;
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).await.unwrap() == 0 {
                    break;
                }
                match serde_json::from_str::<WyomingEvent>(&line).unwrap() {
                    WyomingEvent::Describe => {
                        let info = serde_json::to_string(&WyomingEvent::Info(InfoData::default()))
                            .unwrap();
                        writer.write_all(format!("{}\n", info).as_bytes()).await.unwrap();
                    }
                    WyomingEvent::AudioChunk(data) => {
                        assert_eq!(data.rate, 16000);
                        chunks += 1;
                    }
                    WyomingEvent::AudioStop => {
                        let reply = serde_json::to_string(&WyomingEvent::Transcript(
                            TranscriptData {
                                text: transcript.to_string(),
                            },
                        ))
                        .unwrap();
                        writer.write_all(format!("{}\n", reply).as_bytes()).await.unwrap();
                        break;
                    }
                    _ => {}
                }
            }
            chunks
        });
        (port, handle)
    }

    #[test]
    fn test_event_wire_format() {
        let describe = serde_json::to_value(&WyomingEvent::Describe).unwrap();
        assert_eq!(describe, serde_json::json!({"type": "describe"}));

        let start = serde_json::to_value(&WyomingEvent::AudioStart(AudioFormat {
            rate: 16000,
            width: 2,
            channels: 1,
        }))
        .unwrap();
        assert_eq!(start["type"], "audio-start");
        assert_eq!(start["data"]["rate"], 16000);

        let chunk: WyomingEvent = serde_json::from_str(
            r#"{"type":"audio-chunk","data":{"rate":16000,"width":2,"channels":1,"audio":"AQD+/w=="}}"#,
        )
        .unwrap();
        match chunk {
            WyomingEvent::AudioChunk(data) => assert_eq!(data.audio, vec![1, 0, 0xFE, 0xFF]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transcribe_round_trip() {
        let (port, server) = fake_server(" Mercury ").await;
        let client = WyomingClient::new("127.0.0.1", port);

        let text = client.transcribe(&vec![100i16; 3000]).await.unwrap();
        assert_eq!(text, " Mercury ");
        assert_eq!(server.await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_recognizer_cleans_transcript() {
        let (port, _server) = fake_server("  SATURN").await;
        let recognizer = WyomingRecognizer::new(
            WyomingClient::new("127.0.0.1", port),
            Arc::new(FixedCapture(vec![500; 1024])),
            ListenWindow::default(),
        );
        assert_eq!(recognizer.listen_once().await.unwrap(), "saturn");
    }

    #[tokio::test]
    async fn test_empty_transcript_is_no_match() {
        let (port, _server) = fake_server("").await;
        let recognizer = WyomingRecognizer::new(
            WyomingClient::new("127.0.0.1", port),
            Arc::new(FixedCapture(vec![500; 1024])),
            ListenWindow::default(),
        );
        assert_eq!(
            recognizer.listen_once().await,
            Err(RecognitionError::NoMatch)
        );
    }

    #[tokio::test]
    async fn test_closed_port_is_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = WyomingClient::new("127.0.0.1", port);
        assert!(!client.health_check().await);
        assert!(matches!(
            client.transcribe(&[0; 16]).await,
            Err(RecognitionError::Unreachable(_))
        ));
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let _server = tokio::spawn(async move {
            let (_stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(60)).await;
        });

        let client =
            WyomingClient::new("127.0.0.1", port).with_timeout(Duration::from_millis(300));
        let result = tokio::time::timeout(Duration::from_secs(5), client.transcribe(&[0; 16]))
            .await
            .expect("transcribe should give up on its own");
        assert!(matches!(result, Err(RecognitionError::Unreachable(_))));
    }

    #[tokio::test]
    async fn test_device_error_skips_network() {
        let recognizer = WyomingRecognizer::new(
            WyomingClient::new("127.0.0.1", 1),
            Arc::new(DeadMic),
            ListenWindow::default(),
        );
        assert_eq!(
            recognizer.listen_once().await,
            Err(RecognitionError::Device("unplugged".into()))
        );
    }
}
