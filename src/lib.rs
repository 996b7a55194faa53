pub mod artifact;
pub mod capture;
pub mod config;
pub mod error;
pub mod handoff;
pub mod preview;
pub mod session;
pub mod submit;

pub use artifact::{validate, Artifact, ArtifactKind, SelectedFile};
pub use capture::{
    AudioFrame, AudioInput, CaptureController, CaptureState, InputConfig, InputFactory,
    InputSource,
};
pub use config::Config;
pub use error::{CaptureError, PreviewError, SubmitError, ValidateError};
pub use preview::{PreviewHandle, PreviewSlot};
pub use session::ScreeningSession;
pub use submit::{InferenceClient, SubmissionOrchestrator, SubmissionResult, TestType};
