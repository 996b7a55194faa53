use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::debug;

use super::response::{Prediction, PredictionBody};
use crate::artifact::{Artifact, ArtifactKind};
use crate::config::InferenceConfig;
use crate::error::SubmitError;

/// Synthetic file name for live captures, which carry none of their own.
const RECORDED_AUDIO_NAME: &str = "recorded_audio.wav";

/// Body-level success marker required by the drawing endpoint.
const STATUS_SUCCESS: &str = "success";

/// HTTP client for the remote inference service.
///
/// One POST per submission; endpoint and multipart field name are selected
/// by artifact kind. The two endpoints signal failure differently: the
/// drawing endpoint can return 200 with a failure marker in the body, while
/// the voice endpoint is trusted on HTTP status alone.
pub struct InferenceClient {
    http: reqwest::Client,
    voice_url: String,
    drawing_url: String,
}

impl InferenceClient {
    pub fn new(config: &InferenceConfig) -> Result<Self, SubmitError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(SubmitError::Network)?;

        Ok(Self {
            http,
            voice_url: config.voice_url.clone(),
            drawing_url: config.drawing_url.clone(),
        })
    }

    /// Submit one artifact and interpret the response into a [`Prediction`].
    pub async fn predict(&self, artifact: &Artifact) -> Result<Prediction, SubmitError> {
        let (url, field) = match artifact.kind {
            ArtifactKind::Audio => (self.voice_url.as_str(), "file"),
            ArtifactKind::Image => (self.drawing_url.as_str(), "image"),
        };

        let file_name = artifact
            .file_name
            .clone()
            .unwrap_or_else(|| RECORDED_AUDIO_NAME.to_string());

        let part = Part::bytes(artifact.bytes.clone())
            .file_name(file_name)
            .mime_str(&artifact.media_type)
            .map_err(|e| SubmitError::Payload(e.to_string()))?;
        let form = Form::new().part(field, part);

        debug!("Submitting {} artifact to {}", artifact.kind.noun(), url);

        let response = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(SubmitError::Network)?;

        let status = response.status();
        let text = response.text().await.map_err(SubmitError::Network)?;

        // Parse before any field access, regardless of HTTP status.
        let body: PredictionBody =
            serde_json::from_str(&text).map_err(|_| SubmitError::MalformedResponse)?;

        if !status.is_success() {
            return Err(SubmitError::RequestFailed(body.error.unwrap_or_else(
                || format!("request failed with status {}", status),
            )));
        }

        if artifact.kind == ArtifactKind::Image
            && body.status.as_deref() != Some(STATUS_SUCCESS)
        {
            return Err(SubmitError::PredictionFailed(
                body.error
                    .unwrap_or_else(|| "prediction failed".to_string()),
            ));
        }

        match (body.confidence, body.is_affected) {
            (Some(confidence), Some(is_affected)) => Ok(Prediction {
                confidence,
                is_affected,
                result: body.result,
            }),
            _ => Err(SubmitError::MalformedResponse),
        }
    }
}
