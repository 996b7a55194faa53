use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

use super::client::InferenceClient;
use crate::artifact::{Artifact, ArtifactKind};
use crate::error::SubmitError;

/// Which screening test produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestType {
    Audio,
    Drawing,
}

impl From<ArtifactKind> for TestType {
    fn from(kind: ArtifactKind) -> Self {
        match kind {
            ArtifactKind::Audio => TestType::Audio,
            ArtifactKind::Image => TestType::Drawing,
        }
    }
}

/// The normalized shape every successful submission converges to,
/// regardless of which endpoint produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub test_type: TestType,
    pub confidence: f64,
    pub is_affected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_result: Option<serde_json::Value>,
}

/// Submits exactly one artifact at a time.
///
/// The `uploading` flag is the sole concurrency guard in the pipeline: a
/// second `submit` while one is in flight fails `Busy` without sending
/// anything. The flag is released on every exit path by a scoped guard.
pub struct SubmissionOrchestrator {
    client: InferenceClient,
    uploading: Arc<AtomicBool>,
}

impl SubmissionOrchestrator {
    pub fn new(client: InferenceClient) -> Self {
        Self {
            client,
            uploading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading.load(Ordering::SeqCst)
    }

    pub async fn submit(&self, artifact: &Artifact) -> Result<SubmissionResult, SubmitError> {
        let _guard = UploadGuard::acquire(&self.uploading)?;

        let prediction = self.client.predict(artifact).await?;

        info!(
            "Prediction received: confidence={:.2}, affected={}",
            prediction.confidence, prediction.is_affected
        );

        Ok(SubmissionResult {
            test_type: TestType::from(artifact.kind),
            confidence: prediction.confidence,
            is_affected: prediction.is_affected,
            raw_result: prediction.result,
        })
    }
}

/// Holds the busy flag for the duration of one submission; releases it on
/// drop so no exit path can leave the orchestrator wedged.
struct UploadGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> UploadGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, SubmitError> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| SubmitError::Busy)?;
        Ok(Self { flag })
    }
}

impl Drop for UploadGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
