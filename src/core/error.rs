//! # Errors
//!
//! `SortError` is what the core hands back to the UI layer. Nothing here is
//! fatal: the UI decides how to word it and the user decides what to do next.
//!
//! Two failure kinds are deliberately *not* errors:
//! - import skips (bad type, too large, duplicate name) are counted in
//!   [`ImportReport`](crate::core::import::ImportReport);
//! - a swipe whose album no longer exists is a
//!   [`Placement::Missed`](crate::core::router::Placement), logged but not raised.

use std::fmt;

use crate::core::export::ExportError;
use crate::core::model::Direction;
use crate::core::store::StorageError;

/// A platform facility (camera, share target, notifications) that is absent or refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    Unavailable(String),
    Denied(String),
}

impl fmt::Display for CollaboratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollaboratorError::Unavailable(msg) => write!(f, "unavailable: {msg}"),
            CollaboratorError::Denied(msg) => write!(f, "permission denied: {msg}"),
        }
    }
}

impl std::error::Error for CollaboratorError {}

#[derive(Debug)]
pub enum SortError {
    Storage(StorageError),
    Collaborator(CollaboratorError),
    Export(ExportError),
    /// A mapping direction names an album that can't receive swipes.
    InvalidMapping { direction: Direction, album_id: String },
    UnknownAlbum(String),
    /// System albums are derived and can't be edited directly.
    ProtectedAlbum(String),
}

impl fmt::Display for SortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortError::Storage(e) => write!(f, "{e}"),
            SortError::Collaborator(e) => write!(f, "{e}"),
            SortError::Export(e) => write!(f, "export failed: {e}"),
            SortError::InvalidMapping {
                direction,
                album_id,
            } => write!(
                f,
                "swipe {direction} points at '{album_id}', which is not a custom album"
            ),
            SortError::UnknownAlbum(id) => write!(f, "no album with id '{id}'"),
            SortError::ProtectedAlbum(id) => write!(f, "album '{id}' is a system album"),
        }
    }
}

impl std::error::Error for SortError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SortError::Storage(e) => Some(e),
            SortError::Collaborator(e) => Some(e),
            SortError::Export(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StorageError> for SortError {
    fn from(e: StorageError) -> Self {
        SortError::Storage(e)
    }
}

impl From<CollaboratorError> for SortError {
    fn from(e: CollaboratorError) -> Self {
        SortError::Collaborator(e)
    }
}

impl From<ExportError> for SortError {
    fn from(e: ExportError) -> Self {
        SortError::Export(e)
    }
}
