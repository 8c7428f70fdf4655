//! # Export
//!
//! Decodes stored photos back to image files. [`export_photos`] is the
//! share step: it resolves ids to bytes. [`write_exports`] puts them in a
//! directory, which is the terminal's stand-in for a share sheet.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::info;

use crate::core::import::{decode_data_url, extension_for_mime};
use crate::core::repository::PhotoRepository;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedPhoto {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug)]
pub enum ExportError {
    UnknownPhoto(String),
    /// The stored data URL could not be decoded.
    Undecodable(String),
    Io(io::Error),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::UnknownPhoto(id) => write!(f, "no photo with id '{id}'"),
            ExportError::Undecodable(id) => write!(f, "photo '{id}' has unreadable image data"),
            ExportError::Io(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ExportError {
    fn from(e: io::Error) -> Self {
        ExportError::Io(e)
    }
}

/// Decode the photos named by `ids`, in the order given.
pub fn export_photos<R: PhotoRepository + ?Sized>(
    repo: &R,
    ids: &[String],
) -> Result<Vec<ExportedPhoto>, ExportError> {
    let photos = repo.get_all_photos();
    ids.iter()
        .map(|id| {
            let photo = photos
                .iter()
                .find(|p| &p.id == id)
                .ok_or_else(|| ExportError::UnknownPhoto(id.clone()))?;
            let (mime_type, bytes) = decode_data_url(&photo.image_data)
                .ok_or_else(|| ExportError::Undecodable(id.clone()))?;
            Ok(ExportedPhoto {
                id: photo.id.clone(),
                name: photo.name.clone(),
                mime_type,
                bytes,
            })
        })
        .collect()
}

/// File name for an export, made unique against `taken`.
fn export_file_name(export: &ExportedPhoto, taken: &HashSet<String>) -> String {
    let path = Path::new(&export.name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| export.id.clone());
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| extension_for_mime(&export.mime_type).to_string());

    let candidate = format!("{stem}.{ext}");
    if !taken.contains(&candidate) {
        return candidate;
    }
    (2..)
        .map(|n| format!("{stem} ({n}).{ext}"))
        .find(|name| !taken.contains(name))
        .unwrap_or(candidate)
}

/// Write each export into `dir`, creating it if needed. Returns the paths written.
pub fn write_exports(dir: &Path, exports: &[ExportedPhoto]) -> Result<Vec<PathBuf>, ExportError> {
    fs::create_dir_all(dir)?;
    let mut taken: HashSet<String> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();

    let mut written = Vec::with_capacity(exports.len());
    for export in exports {
        let file_name = export_file_name(export, &taken);
        let path = dir.join(&file_name);
        fs::write(&path, &export.bytes)?;
        taken.insert(file_name);
        written.push(path);
    }
    info!("Exported {} photos to {}", written.len(), dir.display());
    Ok(written)
}
