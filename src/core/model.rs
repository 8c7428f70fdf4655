//! # Domain Types
//!
//! Photos, albums, swipe directions and the records produced by sorting.
//!
//! Field names on the persisted types match the JSON documents written by
//! the repository (`dataUrl`, `uploadedAt`, `type`, ...), so stored data
//! stays readable across versions.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};

/// Album ids that are always derived from the photo set.
pub const ALL_PHOTOS_ALBUM: &str = "all";
pub const RECENT_ALBUM: &str = "recent";
pub const CAMERA_ALBUM: &str = "camera";
pub const SYSTEM_ALBUM_IDS: [&str; 3] = [ALL_PHOTOS_ALBUM, RECENT_ALBUM, CAMERA_ALBUM];

pub const FAVORITES_ALBUM: &str = "favorites";
pub const ARCHIVE_ALBUM: &str = "archive";

/// Current wall-clock time as Unix milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Where a photo entered the collection.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PhotoSource {
    Camera,
    Upload,
    System,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: String,
    pub name: String,
    /// `data:<mime>;base64,<payload>`
    #[serde(rename = "dataUrl")]
    pub image_data: String,
    #[serde(rename = "size")]
    pub byte_size: u64,
    #[serde(rename = "type", default)]
    pub mime_type: String,
    pub uploaded_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorted_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PhotoSource>,
}

impl Photo {
    /// Timestamp used for gallery ordering: when it was sorted, else when it arrived.
    pub fn display_time(&self) -> i64 {
        self.sorted_at.unwrap_or(self.uploaded_at)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AlbumKind {
    #[default]
    Custom,
    System,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Album {
    pub id: String,
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(deserialize_with = "lenient_vec")]
    pub photos: Vec<Photo>,
    #[serde(rename = "type", default)]
    pub kind: AlbumKind,
}

impl Album {
    pub fn new(id: &str, display_name: &str, icon: &str, kind: AlbumKind) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            icon: icon.to_string(),
            photos: Vec::new(),
            kind,
        }
    }

    /// Whether a swipe may place photos here.
    ///
    /// Older documents may omit `type`, so the well-known system ids are
    /// excluded regardless of the stored kind.
    pub fn is_routable(&self) -> bool {
        self.kind == AlbumKind::Custom && !SYSTEM_ALBUM_IDS.contains(&self.id.as_str())
    }

    pub fn label(&self) -> String {
        if self.icon.is_empty() {
            self.display_name.clone()
        } else {
            format!("{} {}", self.icon, self.display_name)
        }
    }
}

/// The albums every fresh collection starts with.
pub fn default_albums() -> Vec<Album> {
    vec![
        Album::new(FAVORITES_ALBUM, "Favorites", "❤️", AlbumKind::Custom),
        Album::new(ARCHIVE_ALBUM, "Archive", "📁", AlbumKind::Custom),
        Album::new(ALL_PHOTOS_ALBUM, "All Photos", "📷", AlbumKind::System),
        Album::new(RECENT_ALBUM, "Recent", "🕒", AlbumKind::System),
        Album::new(CAMERA_ALBUM, "Camera", "📸", AlbumKind::System),
    ]
}

/// Deserializes a JSON array, dropping entries that don't match `T`.
pub fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect())
}

// ============================================================================
// Swipe directions and mapping
// ============================================================================

/// A sorting gesture.
///
/// The four cardinal directions go through the user's [`SwipeMapping`].
/// `Keep` and `Discard` come from the action buttons, which carry no
/// direction, and always resolve to Favorites / Archive.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    Keep,
    Discard,
}

impl Direction {
    pub const CARDINAL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Keep => "keep",
            Direction::Discard => "discard",
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Direction::Up => "↑",
            Direction::Down => "↓",
            Direction::Left => "←",
            Direction::Right => "→",
            Direction::Keep => "♥",
            Direction::Discard => "✕",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            "keep" => Ok(Direction::Keep),
            "discard" => Ok(Direction::Discard),
            other => Err(format!(
                "unknown direction '{other}' (expected up, down, left, right, keep or discard)"
            )),
        }
    }
}

/// Destination album for each cardinal direction.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SwipeMapping {
    pub up: String,
    pub down: String,
    pub left: String,
    pub right: String,
}

impl Default for SwipeMapping {
    fn default() -> Self {
        Self {
            up: FAVORITES_ALBUM.to_string(),
            down: ARCHIVE_ALBUM.to_string(),
            left: ARCHIVE_ALBUM.to_string(),
            right: FAVORITES_ALBUM.to_string(),
        }
    }
}

impl SwipeMapping {
    /// Album for a cardinal direction; `None` for the legacy keep/discard actions.
    pub fn get(&self, direction: Direction) -> Option<&str> {
        match direction {
            Direction::Up => Some(&self.up),
            Direction::Down => Some(&self.down),
            Direction::Left => Some(&self.left),
            Direction::Right => Some(&self.right),
            Direction::Keep | Direction::Discard => None,
        }
    }

    /// Point a cardinal direction at `album_id`. Returns false for keep/discard.
    pub fn set(&mut self, direction: Direction, album_id: &str) -> bool {
        let slot = match direction {
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
            Direction::Keep | Direction::Discard => return false,
        };
        *slot = album_id.to_string();
        true
    }

    /// All four directions name something.
    pub fn is_well_formed(&self) -> bool {
        Direction::CARDINAL
            .iter()
            .all(|d| self.get(*d).is_some_and(|id| !id.trim().is_empty()))
    }

    /// First direction whose album is missing from `albums` or isn't routable.
    pub fn first_unroutable(&self, albums: &[Album]) -> Option<(Direction, String)> {
        Direction::CARDINAL.iter().find_map(|d| {
            let id = self.get(*d).unwrap_or_default();
            let routable = albums.iter().any(|a| a.id == id && a.is_routable());
            (!routable).then(|| (*d, id.to_string()))
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub swipe_mappings: SwipeMapping,
    pub enable_notifications: bool,
    pub auto_backup: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            swipe_mappings: SwipeMapping::default(),
            enable_notifications: true,
            auto_backup: false,
        }
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Whether a classification counts as kept or discarded in the stats.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Keep,
    Discard,
}

impl Outcome {
    pub fn from_positive(is_positive: bool) -> Self {
        if is_positive { Outcome::Keep } else { Outcome::Discard }
    }
}

/// The resolved destination of a gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub destination: String,
    pub is_positive: bool,
}

/// One entry in the sorting history.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationRecord {
    pub photo_id: String,
    pub photo_name: String,
    pub direction: Direction,
    pub outcome: Outcome,
    pub destination: String,
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_json_uses_stored_field_names() {
        let photo = Photo {
            id: "p1".into(),
            name: "beach.jpg".into(),
            image_data: "data:image/jpeg;base64,AAAA".into(),
            byte_size: 3,
            mime_type: "image/jpeg".into(),
            uploaded_at: 1_700_000_000_000,
            sorted_at: None,
            source: Some(PhotoSource::Upload),
        };
        let json = serde_json::to_value(&photo).unwrap();
        assert_eq!(json["dataUrl"], "data:image/jpeg;base64,AAAA");
        assert_eq!(json["size"], 3);
        assert_eq!(json["type"], "image/jpeg");
        assert_eq!(json["uploadedAt"], 1_700_000_000_000i64);
        assert_eq!(json["source"], "upload");
        assert!(json.get("sortedAt").is_none());
    }

    #[test]
    fn test_album_drops_malformed_photos() {
        let json = r#"{
            "id": "favorites", "name": "Favorites", "icon": "x", "type": "custom",
            "photos": [
                {"id": "p1", "name": "a.jpg", "dataUrl": "d", "size": 1, "uploadedAt": 5},
                {"id": 7, "name": "broken"}
            ]
        }"#;
        let album: Album = serde_json::from_str(json).unwrap();
        assert_eq!(album.photos.len(), 1);
        assert_eq!(album.photos[0].id, "p1");
    }

    #[test]
    fn test_album_without_type_defaults_to_custom() {
        let json = r#"{"id": "trips", "name": "Trips", "photos": []}"#;
        let album: Album = serde_json::from_str(json).unwrap();
        assert_eq!(album.kind, AlbumKind::Custom);
        assert!(album.is_routable());
    }

    #[test]
    fn test_system_ids_never_routable() {
        let mut recent = Album::new(RECENT_ALBUM, "Recent", "", AlbumKind::System);
        assert!(!recent.is_routable());
        recent.kind = AlbumKind::Custom;
        assert!(!recent.is_routable());
    }

    #[test]
    fn test_direction_parses_case_insensitively() {
        assert_eq!("Right".parse::<Direction>(), Ok(Direction::Right));
        assert_eq!(" keep ".parse::<Direction>(), Ok(Direction::Keep));
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn test_mapping_set_rejects_legacy_actions() {
        let mut mapping = SwipeMapping::default();
        assert!(mapping.set(Direction::Up, "archive"));
        assert_eq!(mapping.up, "archive");
        assert!(!mapping.set(Direction::Keep, "archive"));
        assert_eq!(mapping.get(Direction::Keep), None);
    }

    #[test]
    fn test_mapping_well_formed() {
        let mut mapping = SwipeMapping::default();
        assert!(mapping.is_well_formed());
        mapping.left = "  ".into();
        assert!(!mapping.is_well_formed());
    }

    #[test]
    fn test_first_unroutable_reports_system_and_missing_albums() {
        let albums = default_albums();
        assert_eq!(SwipeMapping::default().first_unroutable(&albums), None);

        let mut mapping = SwipeMapping::default();
        mapping.down = "recent".into();
        assert_eq!(
            mapping.first_unroutable(&albums),
            Some((Direction::Down, "recent".to_string()))
        );

        mapping.down = "archive".into();
        mapping.right = "gone".into();
        assert_eq!(
            mapping.first_unroutable(&albums),
            Some((Direction::Right, "gone".to_string()))
        );
    }
}
