use thiserror::Error;

/// Errors raised while checking a selected file before it becomes an artifact.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidateError {
    #[error("unsupported media type \"{found}\", expected {expected}")]
    InvalidType {
        found: String,
        expected: &'static str,
    },

    #[error("selected file is empty")]
    EmptyFile,
}

/// Errors from the preview file lifecycle.
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("preview file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the recording state machine and the audio input device.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("microphone access denied: {0}")]
    PermissionDenied(String),

    #[error("a recording is already in progress")]
    AlreadyRecording,

    #[error("a captured recording is pending; discard it before recording again")]
    CaptureHeld,

    #[error("audio device error: {0}")]
    Device(String),

    #[error("failed to encode recording: {0}")]
    Encode(#[from] hound::Error),

    #[error(transparent)]
    Preview(#[from] PreviewError),
}

/// Errors from the submission pathway.
///
/// Display strings double as the user-facing messages shown in the session
/// error slot, so they are phrased for the user rather than for logs.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("an analysis is already in progress")]
    Busy,

    #[error("could not build the upload payload: {0}")]
    Payload(String),

    #[error("could not reach the analysis service, please try again")]
    Network(#[source] reqwest::Error),

    #[error("the analysis service returned an unreadable response, please try again")]
    MalformedResponse,

    #[error("{0}")]
    RequestFailed(String),

    #[error("{0}")]
    PredictionFailed(String),
}
