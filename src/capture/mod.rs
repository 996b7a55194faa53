pub mod backend;
pub mod file;
pub mod microphone;
pub mod recorder;

pub use backend::{AudioFrame, AudioInput, InputConfig, InputFactory, InputSource};
pub use file::FileInput;
pub use microphone::MicrophoneInput;
pub use recorder::{CaptureController, CaptureState};
