use anyhow::{Context, Result};
use tracing::warn;

use crate::artifact::{validate, Artifact, ArtifactKind, SelectedFile};
use crate::capture::{AudioInput, CaptureController};
use crate::config::Config;
use crate::error::{CaptureError, ValidateError};
use crate::handoff::HandoffSender;
use crate::preview::PreviewSlot;
use crate::submit::{InferenceClient, SubmissionOrchestrator, SubmissionResult};

/// Session-scoped state for one screening test page.
///
/// Owns the selected-file slot, the capture controller (voice sessions
/// only), the single user-visible error slot, and the submission
/// orchestrator. Every failure in the pipeline resolves into the error slot
/// with the rest of the state preserved, so the user can retry without
/// redoing capture or selection.
pub struct ScreeningSession {
    kind: ArtifactKind,
    capture: Option<CaptureController>,
    selected: Option<Artifact>,
    selected_preview: PreviewSlot,
    orchestrator: SubmissionOrchestrator,
    handoff: Option<HandoffSender>,
    error: Option<String>,
}

impl ScreeningSession {
    /// Voice test session: live capture plus file selection.
    pub fn voice(config: &Config, input: Box<dyn AudioInput>) -> Result<Self> {
        let capture = CaptureController::new(input, &config.preview.cache_dir)
            .context("failed to set up capture")?;

        let mut session = Self::new(config, ArtifactKind::Audio)?;
        session.capture = Some(capture);
        Ok(session)
    }

    /// Drawing test session: file selection only.
    pub fn drawing(config: &Config) -> Result<Self> {
        Self::new(config, ArtifactKind::Image)
    }

    fn new(config: &Config, kind: ArtifactKind) -> Result<Self> {
        let client =
            InferenceClient::new(&config.inference).context("failed to build inference client")?;

        Ok(Self {
            kind,
            capture: None,
            selected: None,
            selected_preview: PreviewSlot::new(&config.preview.cache_dir)
                .context("failed to set up preview cache")?,
            orchestrator: SubmissionOrchestrator::new(client),
            handoff: None,
            error: None,
        })
    }

    /// Attach the one-shot channel that carries a successful result to the
    /// next screen.
    pub fn with_handoff(mut self, handoff: HandoffSender) -> Self {
        self.handoff = Some(handoff);
        self
    }

    // ------------------------------------------------------------------
    // File selection
    // ------------------------------------------------------------------

    /// Validate a picked file. On acceptance it becomes the selected
    /// artifact and gets a preview; on rejection only the error slot
    /// changes.
    pub fn select_file(&mut self, file: SelectedFile) {
        match validate(file, self.kind) {
            Ok(artifact) => {
                if let Err(e) = self.selected_preview.create(&artifact) {
                    warn!("Failed to create preview: {}", e);
                }
                self.selected = Some(artifact);
                self.error = None;
            }
            Err(ValidateError::InvalidType { .. }) => {
                self.error = Some(format!(
                    "Please select a valid {} file",
                    self.kind.noun()
                ));
            }
            Err(ValidateError::EmptyFile) => {
                self.error = Some("The selected file is empty".to_string());
            }
        }
    }

    /// Clear the selection, revoking its preview.
    pub fn remove_file(&mut self) {
        self.selected = None;
        if let Err(e) = self.selected_preview.revoke() {
            warn!("Failed to revoke preview: {}", e);
        }
        self.error = None;
    }

    pub fn selected(&self) -> Option<&Artifact> {
        self.selected.as_ref()
    }

    // ------------------------------------------------------------------
    // Live capture (voice sessions)
    // ------------------------------------------------------------------

    pub async fn start_recording(&mut self) {
        let Some(capture) = self.capture.as_mut() else {
            warn!("start_recording on a session without capture");
            return;
        };

        match capture.start().await {
            Ok(()) => self.error = None,
            Err(CaptureError::PermissionDenied(reason)) => {
                warn!("Microphone access denied: {}", reason);
                self.error = Some(
                    "Microphone access denied. Please allow microphone access and try again."
                        .to_string(),
                );
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    pub async fn stop_recording(&mut self) {
        let Some(capture) = self.capture.as_mut() else {
            return;
        };

        if let Err(e) = capture.stop().await {
            self.error = Some(e.to_string());
        }
    }

    /// Re-record: discard the held capture and return to idle.
    pub fn discard_recording(&mut self) {
        if let Some(capture) = self.capture.as_mut() {
            if let Err(e) = capture.discard() {
                self.error = Some(e.to_string());
            }
        }
    }

    pub fn toggle_playback(&mut self) -> bool {
        self.capture
            .as_mut()
            .map(|c| c.toggle_playback())
            .unwrap_or(false)
    }

    pub fn playback_ended(&mut self) {
        if let Some(capture) = self.capture.as_mut() {
            capture.playback_ended();
        }
    }

    pub fn capture(&self) -> Option<&CaptureController> {
        self.capture.as_ref()
    }

    // ------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------

    /// Submit the active artifact: the selected file when present,
    /// otherwise the captured recording. On success the result goes through
    /// the handoff channel and is also returned; on failure the error slot
    /// is set, the busy flag is already cleared, and the artifact stays in
    /// place for a manual retry.
    pub async fn submit(&mut self) -> Option<SubmissionResult> {
        let artifact = self
            .selected
            .as_ref()
            .or_else(|| self.capture.as_ref().and_then(|c| c.captured()));

        let Some(artifact) = artifact else {
            self.error = Some(match self.kind {
                ArtifactKind::Audio => "Please record audio or select a file first".to_string(),
                ArtifactKind::Image => "Please select a file first".to_string(),
            });
            return None;
        };

        match self.orchestrator.submit(artifact).await {
            Ok(result) => {
                self.error = None;
                if let Some(handoff) = self.handoff.take() {
                    handoff.send(result.clone());
                }
                Some(result)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }

    pub fn is_uploading(&self) -> bool {
        self.orchestrator.is_uploading()
    }

    // ------------------------------------------------------------------
    // Error slot
    // ------------------------------------------------------------------

    /// The current user-visible message, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}
