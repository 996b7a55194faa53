use chrono::{DateTime, Utc};
use std::io::Cursor;
use std::path::PathBuf;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::backend::{AudioFrame, AudioInput};
use crate::artifact::Artifact;
use crate::error::CaptureError;
use crate::preview::{PreviewHandle, PreviewSlot};

/// Recording lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Recording,
    Captured,
}

/// Drives an audio input through Idle → Recording → Captured and yields a
/// WAV artifact on stop. `Captured → Idle` is reachable via [`discard`]
/// (re-record), which drops the artifact and revokes its preview.
///
/// [`discard`]: CaptureController::discard
pub struct CaptureController {
    input: Box<dyn AudioInput>,
    state: CaptureState,
    collector: Option<JoinHandle<Vec<AudioFrame>>>,
    artifact: Option<Artifact>,
    preview: PreviewSlot,
    is_playing: bool,
    started_at: Option<DateTime<Utc>>,
}

impl CaptureController {
    pub fn new(input: Box<dyn AudioInput>, preview_dir: impl Into<PathBuf>) -> Result<Self, CaptureError> {
        Ok(Self {
            input,
            state: CaptureState::Idle,
            collector: None,
            artifact: None,
            preview: PreviewSlot::new(preview_dir)?,
            is_playing: false,
            started_at: None,
        })
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// The artifact captured by the last completed recording, if any.
    pub fn captured(&self) -> Option<&Artifact> {
        self.artifact.as_ref()
    }

    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.preview.handle()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Request the device and start buffering frames.
    ///
    /// On denial the state stays `Idle`. Starting while `Recording` is
    /// rejected (no two open recordings); starting while `Captured` requires
    /// an explicit [`discard`](CaptureController::discard) first.
    pub async fn start(&mut self) -> Result<(), CaptureError> {
        match self.state {
            CaptureState::Recording => return Err(CaptureError::AlreadyRecording),
            CaptureState::Captured => return Err(CaptureError::CaptureHeld),
            CaptureState::Idle => {}
        }

        let mut rx = self.input.acquire().await?;

        let collector = tokio::spawn(async move {
            let mut frames = Vec::new();
            while let Some(frame) = rx.recv().await {
                frames.push(frame);
            }
            frames
        });

        self.collector = Some(collector);
        self.started_at = Some(Utc::now());
        self.state = CaptureState::Recording;
        info!("Recording started ({})", self.input.name());

        Ok(())
    }

    /// Stop recording: release the device, concatenate the buffered frames
    /// into one WAV artifact, and create its preview.
    ///
    /// Outside `Recording` this is a silent no-op, guarding against
    /// double-stop from rapid input.
    pub async fn stop(&mut self) -> Result<(), CaptureError> {
        if self.state != CaptureState::Recording {
            return Ok(());
        }

        self.input.release().await?;

        let frames = match self.collector.take() {
            Some(handle) => handle
                .await
                .map_err(|e| CaptureError::Device(format!("frame collector failed: {}", e)))?,
            None => Vec::new(),
        };

        if frames.is_empty() {
            warn!("Recording stopped with no captured frames");
        }

        let artifact = Artifact::from_recording(encode_wav(&frames)?);
        self.preview.create(&artifact)?;

        if let Some(started) = self.started_at.take() {
            let elapsed = Utc::now().signed_duration_since(started);
            info!(
                "Recording captured: {:.1}s, {} bytes",
                elapsed.num_milliseconds() as f64 / 1000.0,
                artifact.bytes.len()
            );
        }

        self.artifact = Some(artifact);
        self.state = CaptureState::Captured;

        Ok(())
    }

    /// Discard a held capture (re-record): drop the artifact, revoke its
    /// preview, and return to `Idle`. No-op outside `Captured`.
    pub fn discard(&mut self) -> Result<(), CaptureError> {
        if self.state != CaptureState::Captured {
            return Ok(());
        }

        self.artifact = None;
        self.preview.revoke()?;
        self.is_playing = false;
        self.state = CaptureState::Idle;
        info!("Capture discarded");

        Ok(())
    }

    /// Flip playback of the held capture's preview. Returns the new playing
    /// state; does nothing without a capture.
    pub fn toggle_playback(&mut self) -> bool {
        if self.artifact.is_some() {
            self.is_playing = !self.is_playing;
        }
        self.is_playing
    }

    /// External "ended" event from the playable representation.
    pub fn playback_ended(&mut self) {
        self.is_playing = false;
    }
}

/// Concatenate buffered frames into an in-memory WAV payload.
/// Format follows the first frame; an empty capture yields a valid
/// zero-sample file at the fallback format.
fn encode_wav(frames: &[AudioFrame]) -> Result<Vec<u8>, hound::Error> {
    let (sample_rate, channels) = frames
        .first()
        .map(|f| (f.sample_rate, f.channels))
        .unwrap_or((16000, 1));

    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for frame in frames {
            for &sample in &frame.samples {
                writer.write_sample(sample)?;
            }
        }
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}
