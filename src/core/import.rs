//! # Import
//!
//! Validates incoming image payloads and adds the accepted ones to the
//! repository. Rejections are not errors: each skipped payload is counted
//! in the [`ImportReport`] with the reason, and the rest of the batch goes
//! through.
//!
//! Accepted types are JPEG, PNG and WebP up to 10 MiB. A payload whose file
//! name matches a stored photo (or an earlier payload in the same batch) is
//! skipped. Names are the dedup key, not content: the same bytes under a
//! new name import fine.
//!
//! Files read from disk are typed by their magic bytes. A file that claims
//! to be an image by extension but doesn't sniff as one is typed as
//! `application/octet-stream` and skipped.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::{debug, info};

use crate::core::model::{Photo, PhotoSource, now_millis};
use crate::core::repository::PhotoRepository;
use crate::core::store::StorageError;

pub const ALLOWED_MIME_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];
pub const MAX_IMPORT_BYTES: u64 = 10 * 1024 * 1024;

/// An image on its way in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPayload {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImportPayload {
    pub fn new(name: &str, mime_type: &str, bytes: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            bytes,
        }
    }

    /// Read a file from disk, typing it by content.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
        let bytes = fs::read(path)?;
        Ok(Self {
            mime_type: detect_mime_type(path, &bytes),
            name,
            bytes,
        })
    }
}

/// MIME type for a path's extension; anything unrecognized is octet-stream.
pub fn mime_from_extension(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        _ => "application/octet-stream",
    }
}

/// MIME type from the content's magic bytes, falling back to the extension.
///
/// Image formats always carry a signature, so an image extension on bytes
/// that don't sniff as any known format is downgraded to octet-stream.
pub fn detect_mime_type(path: &Path, bytes: &[u8]) -> String {
    if let Some(kind) = infer::get(bytes) {
        return kind.mime_type().to_string();
    }
    let claimed = mime_from_extension(path);
    if claimed.starts_with("image/") {
        debug!("{} has an image extension but no image signature", path.display());
        return "application/octet-stream".to_string();
    }
    claimed.to_string()
}

/// File extension to use when writing a payload of `mime_type` back out.
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        _ => "bin",
    }
}

pub fn encode_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

/// Split a base64 data URL into its MIME type and bytes.
pub fn decode_data_url(data_url: &str) -> Option<(String, Vec<u8>)> {
    let rest = data_url.strip_prefix("data:")?;
    let (mime_type, payload) = rest.split_once(";base64,")?;
    let bytes = STANDARD.decode(payload.trim()).ok()?;
    Some((mime_type.to_string(), bytes))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    UnsupportedType,
    TooLarge,
    DuplicateName,
}

impl SkipReason {
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::UnsupportedType => "unsupported type",
            SkipReason::TooLarge => "too large",
            SkipReason::DuplicateName => "duplicate name",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportPolicy {
    pub max_bytes: u64,
}

impl Default for ImportPolicy {
    fn default() -> Self {
        Self {
            max_bytes: MAX_IMPORT_BYTES,
        }
    }
}

impl ImportPolicy {
    pub fn check(&self, payload: &ImportPayload, known_names: &HashSet<String>) -> Result<(), SkipReason> {
        if !ALLOWED_MIME_TYPES.contains(&payload.mime_type.as_str()) {
            return Err(SkipReason::UnsupportedType);
        }
        if payload.bytes.len() as u64 > self.max_bytes {
            return Err(SkipReason::TooLarge);
        }
        if known_names.contains(&payload.name) {
            return Err(SkipReason::DuplicateName);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub imported: Vec<Photo>,
    /// `(file name, reason)` for each payload left out.
    pub skipped: Vec<(String, SkipReason)>,
}

impl ImportReport {
    pub fn skipped_for(&self, reason: SkipReason) -> usize {
        self.skipped.iter().filter(|(_, r)| *r == reason).count()
    }

    /// One-line summary for the user, e.g. `3 imported, 1 skipped (duplicate name)`.
    pub fn summary(&self) -> String {
        let mut text = format!("{} imported", self.imported.len());
        if !self.skipped.is_empty() {
            let reasons: Vec<String> = [
                SkipReason::UnsupportedType,
                SkipReason::TooLarge,
                SkipReason::DuplicateName,
            ]
            .iter()
            .filter_map(|reason| {
                let count = self.skipped_for(*reason);
                (count > 0).then(|| format!("{} {}", count, reason.label()))
            })
            .collect();
            text.push_str(&format!(
                ", {} skipped ({})",
                self.skipped.len(),
                reasons.join(", ")
            ));
        }
        text
    }
}

/// Validate a batch against the photos already stored. Pure: writes nothing.
pub fn prepare_batch(
    payloads: Vec<ImportPayload>,
    existing: &[Photo],
    policy: &ImportPolicy,
    source: PhotoSource,
    now: i64,
) -> ImportReport {
    let mut known_names: HashSet<String> = existing.iter().map(|p| p.name.clone()).collect();
    let mut report = ImportReport::default();

    for payload in payloads {
        if let Err(reason) = policy.check(&payload, &known_names) {
            debug!("Skipping '{}': {}", payload.name, reason.label());
            report.skipped.push((payload.name, reason));
            continue;
        }
        known_names.insert(payload.name.clone());
        report.imported.push(Photo {
            id: uuid::Uuid::new_v4().to_string(),
            image_data: encode_data_url(&payload.mime_type, &payload.bytes),
            byte_size: payload.bytes.len() as u64,
            mime_type: payload.mime_type,
            name: payload.name,
            uploaded_at: now,
            sorted_at: None,
            source: Some(source),
        });
    }
    report
}

/// Validate a batch and append the accepted photos to the repository,
/// then refresh the system albums.
pub fn import_batch<R: PhotoRepository + ?Sized>(
    repo: &mut R,
    payloads: Vec<ImportPayload>,
    policy: &ImportPolicy,
    source: PhotoSource,
) -> Result<ImportReport, StorageError> {
    let mut photos = repo.get_all_photos();
    let report = prepare_batch(payloads, &photos, policy, source, now_millis());

    if !report.imported.is_empty() {
        photos.extend(report.imported.iter().cloned());
        repo.save_photos(&photos)?;
        repo.recompute_derived_albums()?;
    }
    info!("Import finished: {}", report.summary());
    Ok(report)
}
