use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ValidateError;

/// Kind of diagnostic artifact a screening test works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Audio,
    Image,
}

impl ArtifactKind {
    /// Media-type class prefix accepted for this kind.
    pub fn media_type_prefix(&self) -> &'static str {
        match self {
            ArtifactKind::Audio => "audio/",
            ArtifactKind::Image => "image/",
        }
    }

    /// Human-readable noun used in user-facing messages.
    pub fn noun(&self) -> &'static str {
        match self {
            ArtifactKind::Audio => "audio",
            ArtifactKind::Image => "image",
        }
    }
}

/// A binary payload selected or captured for submission.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub bytes: Vec<u8>,
    pub media_type: String,
    /// Original file name, if the artifact came from a file pick.
    /// Live captures have none; the submission layer assigns a synthetic one.
    pub file_name: Option<String>,
}

impl Artifact {
    /// Artifact produced by the capture controller on stop.
    pub fn from_recording(bytes: Vec<u8>) -> Self {
        Self {
            kind: ArtifactKind::Audio,
            bytes,
            media_type: "audio/wav".to_string(),
            file_name: None,
        }
    }
}

/// A file as handed over by the picker: a name, a declared media type, and
/// the raw bytes. Not yet accepted — it must pass [`validate`] first.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    /// Load a file from disk, inferring its media type from the extension.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());

        Ok(Self {
            media_type: media_type_for_path(path).to_string(),
            name,
            bytes,
        })
    }
}

/// Check a selected file against the expected artifact kind.
///
/// The declared media type must start with the kind's class prefix and the
/// payload must be non-empty. No size ceiling is enforced here. Pure and
/// idempotent; on rejection no artifact is constructed.
pub fn validate(file: SelectedFile, expected: ArtifactKind) -> Result<Artifact, ValidateError> {
    if !file.media_type.starts_with(expected.media_type_prefix()) {
        return Err(ValidateError::InvalidType {
            found: file.media_type,
            expected: expected.noun(),
        });
    }

    if file.bytes.is_empty() {
        return Err(ValidateError::EmptyFile);
    }

    Ok(Artifact {
        kind: expected,
        bytes: file.bytes,
        media_type: file.media_type,
        file_name: Some(file.name),
    })
}

/// Best-effort media type from a file extension, standing in for the
/// declared MIME type a browser picker would supply.
pub fn media_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "wav" => "audio/wav",
        "mp3" => "audio/mpeg",
        "m4a" => "audio/mp4",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}
