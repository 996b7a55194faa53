use std::path::PathBuf;
use tokio::sync::mpsc;

use crate::error::CaptureError;

/// Audio sample data (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Timestamp in milliseconds since capture started
    pub timestamp_ms: u64,
}

/// Configuration for an audio input
#[derive(Debug, Clone)]
pub struct InputConfig {
    /// Target sample rate in Hz
    pub sample_rate: u32,
    /// Target channel count (1 = mono, 2 = stereo)
    pub channels: u16,
    /// Frame size in milliseconds (affects delivery latency)
    pub buffer_duration_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            channels: 1,
            buffer_duration_ms: 100,
        }
    }
}

/// An audio input device behind a permission-gated acquire/release contract.
///
/// Acquisition is asynchronous and may be refused by the user or OS; a
/// refusal surfaces as [`CaptureError::PermissionDenied`] and leaves the
/// input closed. Implementations:
/// - Microphone: cpal default input device
/// - File: frames read from a WAV file (testing/batch processing)
#[async_trait::async_trait]
pub trait AudioInput: Send + Sync {
    /// Request exclusive access to the device and start delivering frames.
    ///
    /// Returns a channel receiver; the channel closes when the device is
    /// released or the source is exhausted.
    async fn acquire(&mut self) -> Result<mpsc::Receiver<AudioFrame>, CaptureError>;

    /// Release the device. Frame delivery stops and the channel closes.
    async fn release(&mut self) -> Result<(), CaptureError>;

    /// Whether the device is currently held.
    fn is_open(&self) -> bool;

    /// Input name for logging
    fn name(&self) -> &str;
}

/// Audio input source type
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Default microphone
    Microphone,
    /// WAV file input (testing/batch processing)
    File(PathBuf),
}

/// Audio input factory
pub struct InputFactory;

impl InputFactory {
    pub fn create(source: InputSource, config: InputConfig) -> Box<dyn AudioInput> {
        match source {
            InputSource::Microphone => {
                Box::new(super::microphone::MicrophoneInput::new(config))
            }
            InputSource::File(path) => Box::new(super::file::FileInput::new(path, config)),
        }
    }
}
