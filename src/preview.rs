use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::artifact::Artifact;
use crate::error::PreviewError;

/// A live local reference to an artifact's bytes, playable/viewable without
/// re-reading the original source. Backed by a file in the preview cache
/// directory; the underlying resource is outside normal memory management,
/// so release is explicit via [`PreviewSlot::revoke`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewHandle {
    id: Uuid,
    path: PathBuf,
}

impl PreviewHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Holds at most one live [`PreviewHandle`].
///
/// `create` on an occupied slot revokes the previous handle before issuing a
/// new one, so two live handles never exist for the same slot. `revoke` is
/// idempotent.
#[derive(Debug)]
pub struct PreviewSlot {
    dir: PathBuf,
    current: Option<PreviewHandle>,
}

impl PreviewSlot {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, PreviewError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        Ok(Self { dir, current: None })
    }

    /// Write the artifact's bytes to a preview file and return its handle.
    pub fn create(&mut self, artifact: &Artifact) -> Result<&PreviewHandle, PreviewError> {
        self.revoke()?;

        let id = Uuid::new_v4();
        let path = self
            .dir
            .join(format!("preview-{}.{}", id, extension_for(&artifact.media_type)));

        fs::write(&path, &artifact.bytes)?;
        debug!("Preview created: {}", path.display());

        Ok(self.current.insert(PreviewHandle { id, path }))
    }

    /// Release the current handle, removing the preview file.
    /// A missing file is not a fault.
    pub fn revoke(&mut self) -> Result<(), PreviewError> {
        if let Some(handle) = self.current.take() {
            match fs::remove_file(&handle.path) {
                Ok(()) => debug!("Preview revoked: {}", handle.path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        Ok(())
    }

    pub fn handle(&self) -> Option<&PreviewHandle> {
        self.current.as_ref()
    }
}

impl Drop for PreviewSlot {
    fn drop(&mut self) {
        // Backstop only: the contract is an explicit revoke before the slot
        // goes away.
        if let Some(handle) = self.current.take() {
            warn!("Preview handle leaked, removing: {}", handle.path.display());
            if let Err(e) = fs::remove_file(&handle.path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to remove leaked preview file: {}", e);
                }
            }
        }
    }
}

fn extension_for(media_type: &str) -> &'static str {
    match media_type {
        "audio/wav" => "wav",
        "audio/mpeg" => "mp3",
        "audio/mp4" => "m4a",
        "audio/ogg" => "ogg",
        "audio/flac" => "flac",
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/bmp" => "bmp",
        _ => "bin",
    }
}
