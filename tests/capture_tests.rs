// Integration tests for the recording state machine
//
// A scripted audio input stands in for the hardware device, so the
// Idle → Recording → Captured transitions and their guards can be driven
// deterministically.

use anyhow::Result;
use async_trait::async_trait;
use neuroscreen::capture::{AudioFrame, AudioInput, CaptureController, CaptureState};
use neuroscreen::{CaptureError, Config, ScreeningSession};
use std::io::Cursor;
use tempfile::TempDir;
use tokio::sync::mpsc;

/// Delivers a fixed set of frames, or denies access outright.
struct ScriptedInput {
    frames: Vec<AudioFrame>,
    deny: Option<String>,
    open: bool,
}

impl ScriptedInput {
    fn with_frames(frames: Vec<AudioFrame>) -> Self {
        Self {
            frames,
            deny: None,
            open: false,
        }
    }

    fn denied(reason: &str) -> Self {
        Self {
            frames: Vec::new(),
            deny: Some(reason.to_string()),
            open: false,
        }
    }
}

#[async_trait]
impl AudioInput for ScriptedInput {
    async fn acquire(&mut self) -> Result<mpsc::Receiver<AudioFrame>, CaptureError> {
        if let Some(reason) = &self.deny {
            return Err(CaptureError::PermissionDenied(reason.clone()));
        }

        let (tx, rx) = mpsc::channel(64);
        let frames = self.frames.clone();
        self.open = true;

        tokio::spawn(async move {
            for frame in frames {
                if tx.send(frame).await.is_err() {
                    break;
                }
            }
            // Sender drops here, closing the channel like a released device.
        });

        Ok(rx)
    }

    async fn release(&mut self) -> Result<(), CaptureError> {
        self.open = false;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// 100ms mono frames at 16kHz.
fn frames(count: usize) -> Vec<AudioFrame> {
    (0..count)
        .map(|i| AudioFrame {
            samples: vec![(i % 32) as i16; 1600],
            sample_rate: 16000,
            channels: 1,
            timestamp_ms: i as u64 * 100,
        })
        .collect()
}

fn controller(input: ScriptedInput, dir: &TempDir) -> CaptureController {
    CaptureController::new(Box::new(input), dir.path()).expect("controller setup")
}

#[tokio::test]
async fn test_stop_while_idle_is_noop() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut capture = controller(ScriptedInput::with_frames(frames(3)), &temp_dir);

    capture.stop().await?;

    assert_eq!(capture.state(), CaptureState::Idle);
    assert!(capture.captured().is_none());
    assert!(capture.preview().is_none());

    Ok(())
}

#[tokio::test]
async fn test_permission_denied_stays_idle() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut capture = controller(ScriptedInput::denied("user refused"), &temp_dir);

    let err = capture.start().await.unwrap_err();

    assert!(matches!(err, CaptureError::PermissionDenied(_)));
    assert_eq!(capture.state(), CaptureState::Idle);
    assert!(capture.captured().is_none());

    Ok(())
}

#[tokio::test]
async fn test_start_while_recording_is_rejected() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut capture = controller(ScriptedInput::with_frames(frames(2)), &temp_dir);

    capture.start().await?;
    let err = capture.start().await.unwrap_err();

    assert!(matches!(err, CaptureError::AlreadyRecording));
    assert_eq!(capture.state(), CaptureState::Recording);

    capture.stop().await?;
    Ok(())
}

#[tokio::test]
async fn test_record_stop_yields_wav_artifact_and_preview() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut capture = controller(ScriptedInput::with_frames(frames(5)), &temp_dir);

    capture.start().await?;
    assert_eq!(capture.state(), CaptureState::Recording);

    capture.stop().await?;
    assert_eq!(capture.state(), CaptureState::Captured);

    let artifact = capture.captured().expect("artifact after stop");
    assert_eq!(artifact.media_type, "audio/wav");
    assert!(artifact.file_name.is_none(), "live capture has no file name");

    // All buffered frames are concatenated into one well-formed WAV
    let reader = hound::WavReader::new(Cursor::new(artifact.bytes.clone()))?;
    assert_eq!(reader.spec().sample_rate, 16000);
    assert_eq!(reader.spec().channels, 1);
    assert_eq!(reader.len() as usize, 5 * 1600);

    let preview = capture.preview().expect("preview after stop");
    assert!(preview.path().exists());

    Ok(())
}

#[tokio::test]
async fn test_stop_after_captured_is_noop() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut capture = controller(ScriptedInput::with_frames(frames(2)), &temp_dir);

    capture.start().await?;
    capture.stop().await?;
    let first_len = capture.captured().unwrap().bytes.len();

    // Double-stop from rapid input: no transition, no new artifact, no fault
    capture.stop().await?;

    assert_eq!(capture.state(), CaptureState::Captured);
    assert_eq!(capture.captured().unwrap().bytes.len(), first_len);

    Ok(())
}

#[tokio::test]
async fn test_start_while_captured_requires_discard() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut capture = controller(ScriptedInput::with_frames(frames(1)), &temp_dir);

    capture.start().await?;
    capture.stop().await?;

    let err = capture.start().await.unwrap_err();
    assert!(matches!(err, CaptureError::CaptureHeld));

    Ok(())
}

#[tokio::test]
async fn test_discard_returns_to_idle_and_revokes_preview() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut capture = controller(ScriptedInput::with_frames(frames(2)), &temp_dir);

    capture.start().await?;
    capture.stop().await?;
    let preview_path = capture.preview().unwrap().path().to_path_buf();

    capture.discard()?;

    assert_eq!(capture.state(), CaptureState::Idle);
    assert!(capture.captured().is_none());
    assert!(capture.preview().is_none());
    assert!(!preview_path.exists(), "preview must be revoked on discard");

    // Re-record is now allowed
    capture.start().await?;
    assert_eq!(capture.state(), CaptureState::Recording);
    capture.stop().await?;

    Ok(())
}

#[tokio::test]
async fn test_playback_toggle_and_ended_event() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut capture = controller(ScriptedInput::with_frames(frames(1)), &temp_dir);

    // No capture held yet: toggle does nothing
    assert!(!capture.toggle_playback());

    capture.start().await?;
    capture.stop().await?;

    assert!(capture.toggle_playback(), "toggle starts playback");
    capture.playback_ended();
    assert!(!capture.is_playing(), "ended event resets the flag");

    Ok(())
}

#[tokio::test]
async fn test_session_surfaces_permission_denial_inline() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut config = Config::default();
    config.preview.cache_dir = temp_dir.path().display().to_string();

    let mut session =
        ScreeningSession::voice(&config, Box::new(ScriptedInput::denied("no device")))?;

    session.start_recording().await;

    assert_eq!(
        session.error(),
        Some("Microphone access denied. Please allow microphone access and try again.")
    );
    assert_eq!(
        session.capture().unwrap().state(),
        CaptureState::Idle,
        "denied start must leave the session idle"
    );

    Ok(())
}
