//! Audio capture
//!
//! One bounded microphone capture per spoken answer: calibrate on ambient
//! noise, wait for speech, record until a pause or the phrase limit.

use crate::config::ListenWindow;
use crate::error::RecognitionError;
use std::time::Duration;

pub const SAMPLE_RATE: u32 = 16000;

/// Lowest energy treated as speech regardless of calibration
const MIN_SPEECH_ENERGY: f32 = 300.0;
/// Speech must be this much louder than the measured background
const AMBIENT_MARGIN: f32 = 1.5;

/// Captures one utterance as 16 kHz mono PCM
pub trait AudioCapture: Send + Sync {
    /// Blocks for at most the listen window
    fn capture(&self, window: &ListenWindow) -> Result<Vec<i16>, RecognitionError>;
}

/// Calculate audio energy for VAD
pub fn calculate_energy(samples: &[i16]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum: i64 = samples.iter().map(|&s| (s as i64).pow(2)).sum();
    (sum as f32 / samples.len() as f32).sqrt()
}

/// PCM samples as little-endian bytes (16-bit width)
pub fn to_le_bytes(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

fn samples_for(duration: Duration) -> usize {
    (duration.as_millis() as u64 * SAMPLE_RATE as u64 / 1000) as usize
}

/// Progress of a [`PhraseDetector`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorStep {
    Calibrating,
    Waiting,
    Recording,
    /// Utterance complete
    Done,
    /// No speech before the timeout
    TimedOut,
}

/// Energy-based end-pointing over a stream of chunks
///
/// Time is counted in samples, so the detector behaves the same on live
/// audio and in tests.
#[derive(Debug)]
pub struct PhraseDetector {
    ambient_len: usize,
    timeout_len: usize,
    phrase_len: usize,
    pause_len: usize,
    ambient: Vec<i16>,
    threshold: f32,
    waited: usize,
    silence: usize,
    phrase: Vec<i16>,
    step: DetectorStep,
}

impl PhraseDetector {
    pub fn new(window: &ListenWindow) -> Self {
        let ambient_len = samples_for(window.ambient);
        Self {
            ambient_len,
            timeout_len: samples_for(window.timeout),
            phrase_len: samples_for(window.phrase_limit),
            pause_len: samples_for(window.pause),
            ambient: Vec::with_capacity(ambient_len),
            threshold: MIN_SPEECH_ENERGY,
            waited: 0,
            silence: 0,
            phrase: Vec::new(),
            step: if ambient_len == 0 {
                DetectorStep::Waiting
            } else {
                DetectorStep::Calibrating
            },
        }
    }

    pub fn step(&self) -> DetectorStep {
        self.step
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.step, DetectorStep::Done | DetectorStep::TimedOut)
    }

    /// Feed one chunk of audio
    pub fn push(&mut self, chunk: &[i16]) -> DetectorStep {
        match self.step {
            DetectorStep::Calibrating => {
                self.ambient.extend_from_slice(chunk);
                if self.ambient.len() >= self.ambient_len {
                    self.threshold =
                        (calculate_energy(&self.ambient) * AMBIENT_MARGIN).max(MIN_SPEECH_ENERGY);
                    self.step = DetectorStep::Waiting;
                }
            }
            DetectorStep::Waiting => {
                if calculate_energy(chunk) >= self.threshold {
                    self.phrase.extend_from_slice(chunk);
                    self.step = DetectorStep::Recording;
                } else {
                    self.waited += chunk.len();
                    if self.waited >= self.timeout_len {
                        self.step = DetectorStep::TimedOut;
                    }
                }
            }
            DetectorStep::Recording => {
                self.phrase.extend_from_slice(chunk);
                if calculate_energy(chunk) >= self.threshold {
                    self.silence = 0;
                } else {
                    self.silence += chunk.len();
                }
                if self.silence >= self.pause_len || self.phrase.len() >= self.phrase_len {
                    self.phrase.truncate(self.phrase_len);
                    self.step = DetectorStep::Done;
                }
            }
            DetectorStep::Done | DetectorStep::TimedOut => {}
        }
        self.step
    }

    /// Recorded utterance, if speech was heard
    pub fn finish(self) -> Option<Vec<i16>> {
        if self.phrase.is_empty() {
            None
        } else {
            Some(self.phrase)
        }
    }
}

#[cfg(feature = "mic")]
pub use mic::MicCapture;

#[cfg(feature = "mic")]
mod mic {
    use super::{AudioCapture, PhraseDetector, SAMPLE_RATE};
    use crate::config::ListenWindow;
    use crate::error::RecognitionError;
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use std::sync::mpsc;
    use std::time::{Duration, Instant};
    use tracing::{debug, info, warn};

    const CHUNK_SIZE: u32 = 1024;

    /// Live microphone capture through cpal
    #[derive(Debug, Clone, Default)]
    pub struct MicCapture {
        device_index: Option<usize>,
    }

    impl MicCapture {
        pub fn new(device_index: Option<usize>) -> Self {
            Self { device_index }
        }

        fn device(&self) -> Result<cpal::Device, RecognitionError> {
            let host = cpal::default_host();
            let device = match self.device_index {
                Some(idx) => host
                    .input_devices()
                    .map_err(|e| RecognitionError::Device(e.to_string()))?
                    .nth(idx),
                None => host.default_input_device(),
            };
            device.ok_or_else(|| RecognitionError::Device("no input device found".to_string()))
        }
    }

    impl AudioCapture for MicCapture {
        fn capture(&self, window: &ListenWindow) -> Result<Vec<i16>, RecognitionError> {
            let device = self.device()?;
            let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
            info!("🎙️ Listening on: {}", device_name);

            let config = cpal::StreamConfig {
                channels: 1,
                sample_rate: cpal::SampleRate(SAMPLE_RATE),
                buffer_size: cpal::BufferSize::Fixed(CHUNK_SIZE),
            };

            let (tx, rx) = mpsc::channel::<Vec<i16>>();
            let stream = device
                .build_input_stream(
                    &config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        let _ = tx.send(data.to_vec());
                    },
                    |err| {
                        warn!("Audio stream error: {}", err);
                    },
                    None,
                )
                .map_err(|e| RecognitionError::Device(e.to_string()))?;
            stream
                .play()
                .map_err(|e| RecognitionError::Device(e.to_string()))?;

            let mut detector = PhraseDetector::new(window);
            let deadline = Instant::now()
                + window.ambient
                + window.timeout
                + window.phrase_limit
                + Duration::from_secs(1);

            while !detector.is_finished() {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    break;
                }
                match rx.recv_timeout(remaining) {
                    Ok(chunk) => {
                        detector.push(&chunk);
                    }
                    Err(mpsc::RecvTimeoutError::Timeout) => break,
                    Err(mpsc::RecvTimeoutError::Disconnected) => {
                        return Err(RecognitionError::Device(
                            "audio stream closed".to_string(),
                        ));
                    }
                }
            }
            drop(stream);

            debug!(
                "Capture ended in {:?} (threshold {:.0})",
                detector.step(),
                detector.threshold()
            );
            detector.finish().ok_or(RecognitionError::NoMatch)
        }
    }
}
