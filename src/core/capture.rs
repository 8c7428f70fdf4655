//! # Capture
//!
//! A camera is a [`CaptureDevice`]: something that hands back one image
//! when asked. The captured image goes through the same import policy as
//! any upload and is tagged with the `camera` source so it shows up in
//! the Camera album.
//!
//! [`DirectoryCapture`] is the device used from the terminal: it takes the
//! newest supported image in a watched directory (a phone sync folder, a
//! tethering tool's output dir) and names it `Camera_<timestamp>.<ext>`.
//! Candidates are recognized by their content, not their extension.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::Local;
use log::{debug, info};

use crate::core::error::{CollaboratorError, SortError};
use crate::core::import::{
    ALLOWED_MIME_TYPES, ImportPayload, ImportPolicy, ImportReport, extension_for_mime,
    import_batch,
};
use crate::core::model::PhotoSource;
use crate::core::repository::PhotoRepository;

pub trait CaptureDevice {
    fn name(&self) -> &str;

    /// Take one image.
    fn capture(&mut self) -> Result<ImportPayload, CollaboratorError>;
}

/// Capture one image and import it as a camera photo.
pub fn import_capture<R: PhotoRepository + ?Sized>(
    repo: &mut R,
    device: &mut dyn CaptureDevice,
    policy: &ImportPolicy,
) -> Result<ImportReport, SortError> {
    let payload = device.capture()?;
    info!("Captured '{}' from {}", payload.name, device.name());
    Ok(import_batch(repo, vec![payload], policy, PhotoSource::Camera)?)
}

/// `Camera_2024-05-01T14-03-22-517.jpg`
pub fn camera_file_name(mime_type: &str) -> String {
    format!(
        "Camera_{}.{}",
        Local::now().format("%Y-%m-%dT%H-%M-%S-%3f"),
        extension_for_mime(mime_type)
    )
}

/// Picks up the most recently modified image in a directory.
#[derive(Debug, Clone)]
pub struct DirectoryCapture {
    dir: PathBuf,
}

impl DirectoryCapture {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn newest_image(&self) -> io::Result<Option<PathBuf>> {
        let mut newest: Option<(SystemTime, PathBuf)> = None;
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() || !is_supported_image(&path)? {
                continue;
            }
            let modified = entry.metadata()?.modified()?;
            if newest.as_ref().is_none_or(|(t, _)| modified > *t) {
                newest = Some((modified, path));
            }
        }
        Ok(newest.map(|(_, path)| path))
    }
}

/// Sniffs the file header.
fn is_supported_image(path: &Path) -> io::Result<bool> {
    Ok(infer::get_from_path(path)?
        .is_some_and(|kind| ALLOWED_MIME_TYPES.contains(&kind.mime_type())))
}

fn collaborator_error(dir: &Path, e: io::Error) -> CollaboratorError {
    match e.kind() {
        io::ErrorKind::PermissionDenied => CollaboratorError::Denied(dir.display().to_string()),
        _ => CollaboratorError::Unavailable(format!("{}: {}", dir.display(), e)),
    }
}

impl CaptureDevice for DirectoryCapture {
    fn name(&self) -> &str {
        "directory camera"
    }

    fn capture(&mut self) -> Result<ImportPayload, CollaboratorError> {
        let path = self
            .newest_image()
            .map_err(|e| collaborator_error(&self.dir, e))?
            .ok_or_else(|| {
                CollaboratorError::Unavailable(format!("no images in {}", self.dir.display()))
            })?;
        debug!("Capturing {}", path.display());

        let mut payload =
            ImportPayload::from_path(&path).map_err(|e| collaborator_error(&path, e))?;
        payload.name = camera_file_name(&payload.mime_type);
        Ok(payload)
    }
}
