use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

use super::backend::{AudioFrame, AudioInput, InputConfig};
use crate::error::CaptureError;

/// Audio input backed by a WAV file, delivered as fixed-duration frames.
/// Used for batch submission and tests; no pacing, frames are sent as fast
/// as the receiver drains them.
pub struct FileInput {
    path: PathBuf,
    config: InputConfig,
    open: Arc<AtomicBool>,
}

impl FileInput {
    pub fn new(path: PathBuf, config: InputConfig) -> Self {
        Self {
            path,
            config,
            open: Arc::new(AtomicBool::new(false)),
        }
    }
}

#[async_trait::async_trait]
impl AudioInput for FileInput {
    async fn acquire(&mut self) -> Result<mpsc::Receiver<AudioFrame>, CaptureError> {
        let reader = hound::WavReader::open(&self.path)
            .map_err(|e| CaptureError::Device(format!("failed to open {}: {}", self.path.display(), e)))?;

        let spec = reader.spec();
        let samples: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CaptureError::Device(format!("failed to read audio samples: {}", e)))?;

        info!(
            "File input open: {} ({} Hz, {} channel(s), {} samples)",
            self.path.display(),
            spec.sample_rate,
            spec.channels,
            samples.len()
        );

        let frame_len = (spec.sample_rate as u64
            * spec.channels as u64
            * self.config.buffer_duration_ms
            / 1000) as usize;

        let (tx, rx) = mpsc::channel(64);
        let open = Arc::clone(&self.open);
        open.store(true, Ordering::SeqCst);

        tokio::spawn(async move {
            let mut timestamp_ms = 0u64;

            for chunk in samples.chunks(frame_len.max(1)) {
                if !open.load(Ordering::SeqCst) {
                    break;
                }

                let frame = AudioFrame {
                    samples: chunk.to_vec(),
                    sample_rate: spec.sample_rate,
                    channels: spec.channels,
                    timestamp_ms,
                };

                timestamp_ms += chunk.len() as u64 * 1000
                    / (spec.sample_rate as u64 * spec.channels as u64);

                if tx.send(frame).await.is_err() {
                    break;
                }
            }

            open.store(false, Ordering::SeqCst);
        });

        Ok(rx)
    }

    async fn release(&mut self) -> Result<(), CaptureError> {
        self.open.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "file"
    }
}
