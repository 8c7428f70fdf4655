//! # Swipe Router
//!
//! Turns a gesture into a destination album and places the photo there.
//!
//! [`classify`] is pure: it only looks at the direction and the mapping.
//! [`route`] applies the result to a repository. A destination that is no
//! longer a custom album is a routing miss: the photo is not placed, the
//! caller still records the swipe, and the miss is logged rather than
//! raised. Storage failures are raised.

use log::{info, warn};

use crate::core::model::{ARCHIVE_ALBUM, Direction, FAVORITES_ALBUM, Photo, Route, SwipeMapping};
use crate::core::repository::PhotoRepository;
use crate::core::store::StorageError;

/// Album the legacy keep button sends photos to.
pub const LEGACY_KEEP_ALBUM: &str = FAVORITES_ALBUM;
/// Album the legacy discard button sends photos to.
pub const LEGACY_DISCARD_ALBUM: &str = ARCHIVE_ALBUM;

/// Resolve a gesture against `mapping`.
///
/// Only `Right` and `Keep` count as positive. The flag colors the history
/// and feeds the kept/discarded stats; it has no effect on routing.
pub fn classify(direction: Direction, mapping: &SwipeMapping) -> Route {
    let destination = match direction {
        Direction::Keep => LEGACY_KEEP_ALBUM,
        Direction::Discard => LEGACY_DISCARD_ALBUM,
        cardinal => mapping.get(cardinal).unwrap_or_default(),
    };
    Route {
        destination: destination.to_string(),
        is_positive: matches!(direction, Direction::Right | Direction::Keep),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    Placed { album_id: String },
    /// The destination album doesn't exist (or is a system album).
    Missed { album_id: String },
}

impl Placement {
    pub fn album_id(&self) -> &str {
        match self {
            Placement::Placed { album_id } | Placement::Missed { album_id } => album_id,
        }
    }

    pub fn is_placed(&self) -> bool {
        matches!(self, Placement::Placed { .. })
    }
}

/// Place `photo` in the album `route` points at.
pub fn route<R: PhotoRepository + ?Sized>(
    repo: &mut R,
    photo: &Photo,
    route: &Route,
) -> Result<Placement, StorageError> {
    let album_id = route.destination.clone();
    if repo.add_photo_to_album(&album_id, photo)? {
        info!("Routed '{}' to '{}'", photo.name, album_id);
        Ok(Placement::Placed { album_id })
    } else {
        warn!(
            "Routing miss: album '{}' is not a custom album, '{}' was not placed",
            album_id, photo.name
        );
        Ok(Placement::Missed { album_id })
    }
}
