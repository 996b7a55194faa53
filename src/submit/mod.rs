//! Submission pathway
//!
//! Packages one artifact into a multipart request, selects the endpoint by
//! artifact kind, and normalizes the heterogeneous responses of the two
//! inference endpoints into a single result shape.

mod client;
mod orchestrator;
mod response;

pub use client::InferenceClient;
pub use orchestrator::{SubmissionOrchestrator, SubmissionResult, TestType};
pub use response::Prediction;
