//! # Photo Repository
//!
//! Owns all durable state: the photo list, the album list (each album with
//! its own copy of its photos) and the user settings. Three independent JSON
//! documents in a [`KeyValueStore`]:
//!
//! ```text
//! sortit_photos    [Photo, ...]                    upload order
//! sortit_albums    [Album { photos: [...] }, ...]  custom + system
//! sortit_settings  { swipeMappings, enableNotifications, autoBackup }
//! ```
//!
//! Reads never fail. Each document is parsed into a `serde_json::Value`
//! first and every entry is checked on its own: malformed entries are
//! dropped, a malformed document falls back to its default. Writes return
//! `StorageError` and the caller is expected to surface it.
//!
//! Writing `sortit_photos` and then recomputing `sortit_albums` is two
//! writes. A crash in between leaves the system albums stale until the
//! next [`PhotoRepository::recompute_derived_albums`].

use log::{debug, info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::core::error::SortError;
use crate::core::model::{
    ALL_PHOTOS_ALBUM, Album, AlbumKind, CAMERA_ALBUM, Photo, PhotoSource, RECENT_ALBUM,
    SwipeMapping, UserSettings, default_albums, now_millis,
};
use crate::core::store::{KeyValueStore, StorageError};

pub const PHOTOS_KEY: &str = "sortit_photos";
pub const ALBUMS_KEY: &str = "sortit_albums";
pub const SETTINGS_KEY: &str = "sortit_settings";

pub const DEFAULT_RECENT_LIMIT: usize = 20;
pub const MIN_RECENT_LIMIT: usize = 20;
pub const MAX_RECENT_LIMIT: usize = 50;

pub trait PhotoRepository {
    /// All stored photos in upload order.
    fn get_all_photos(&self) -> Vec<Photo>;
    fn save_photos(&mut self, photos: &[Photo]) -> Result<(), StorageError>;

    fn get_albums(&self) -> Vec<Album>;
    fn save_albums(&mut self, albums: &[Album]) -> Result<(), StorageError>;

    /// Put `photo` at the front of a custom album, stamping `sorted_at`.
    ///
    /// An existing entry with the same id is moved rather than duplicated.
    /// Returns `Ok(false)` when `album_id` is not a custom album.
    fn add_photo_to_album(&mut self, album_id: &str, photo: &Photo) -> Result<bool, StorageError>;

    /// Returns `Ok(false)` when the album doesn't exist.
    fn remove_photo_from_album(
        &mut self,
        album_id: &str,
        photo_id: &str,
    ) -> Result<bool, StorageError>;

    /// Rebuild the system albums (All Photos, Recent, Camera) from the photo list.
    fn recompute_derived_albums(&mut self) -> Result<(), StorageError>;

    fn get_settings(&self) -> UserSettings;
    fn save_settings(&mut self, settings: &UserSettings) -> Result<(), StorageError>;

    /// Drop every stored document.
    fn clear(&mut self) -> Result<(), StorageError>;

    fn get_swipe_mapping(&self) -> SwipeMapping {
        self.get_settings().swipe_mappings
    }

    /// Every direction must name an existing custom album.
    fn save_swipe_mapping(&mut self, mapping: &SwipeMapping) -> Result<(), SortError> {
        if let Some((direction, album_id)) = mapping.first_unroutable(&self.get_albums()) {
            return Err(SortError::InvalidMapping {
                direction,
                album_id,
            });
        }
        let mut settings = self.get_settings();
        settings.swipe_mappings = mapping.clone();
        self.save_settings(&settings)?;
        Ok(())
    }

    /// Create an empty custom album. The id is derived from the name.
    fn create_album(&mut self, name: &str, icon: &str) -> Result<Album, SortError> {
        let mut albums = self.get_albums();
        let id = unique_album_id(name, &albums);
        let album = Album::new(&id, name.trim(), icon, AlbumKind::Custom);
        albums.push(album.clone());
        self.save_albums(&albums)?;
        info!("Created album '{}'", id);
        Ok(album)
    }

    /// Delete a custom album and its memberships. The swipe mapping is left
    /// alone, so a direction pointing here becomes a routing miss.
    fn delete_album(&mut self, album_id: &str) -> Result<Album, SortError> {
        let mut albums = self.get_albums();
        let index = albums
            .iter()
            .position(|a| a.id == album_id)
            .ok_or_else(|| SortError::UnknownAlbum(album_id.to_string()))?;
        if !albums[index].is_routable() {
            return Err(SortError::ProtectedAlbum(album_id.to_string()));
        }
        let removed = albums.remove(index);
        self.save_albums(&albums)?;
        info!("Deleted album '{}'", album_id);
        Ok(removed)
    }
}

/// Lowercase, dash-separated id for `name`, suffixed until unique.
fn unique_album_id(name: &str, albums: &[Album]) -> String {
    let mut slug = String::new();
    for c in name.trim().chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_matches('-');
    let base = if slug.is_empty() { "album" } else { slug };

    let taken = |id: &str| albums.iter().any(|a| a.id == id);
    if !taken(base) {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{base}-{n}"))
        .find(|id| !taken(id))
        .unwrap_or_else(|| base.to_string())
}

/// Repository over any [`KeyValueStore`].
#[derive(Debug)]
pub struct LocalRepository<S: KeyValueStore> {
    store: S,
    recent_limit: usize,
}

impl<S: KeyValueStore> LocalRepository<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }

    /// Cap for the Recent album, clamped to 20..=50.
    pub fn with_recent_limit(mut self, limit: usize) -> Self {
        self.recent_limit = limit.clamp(MIN_RECENT_LIMIT, MAX_RECENT_LIMIT);
        self
    }

    pub fn recent_limit(&self) -> usize {
        self.recent_limit
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Parse a stored document, or `None` if it's missing or unreadable.
    fn read_document(&self, key: &str) -> Option<serde_json::Value> {
        let text = match self.store.get(key) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read {}: {}", key, e);
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Stored {} is not valid JSON, ignoring it: {}", key, e);
                None
            }
        }
    }

    /// Read a JSON array document, keeping only entries that decode as `T`.
    fn read_list<T: DeserializeOwned>(&self, key: &str) -> Option<Vec<T>> {
        let serde_json::Value::Array(entries) = self.read_document(key)? else {
            warn!("Stored {} is not a list, ignoring it", key);
            return None;
        };
        let total = entries.len();
        let kept: Vec<T> = entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect();
        if kept.len() < total {
            warn!("Dropped {} malformed entries from {}", total - kept.len(), key);
        }
        Some(kept)
    }

    fn write_document<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let json = serde_json::to_string(value)?;
        self.store.set(key, &json)
    }
}

/// Copy of `photo` stamped with its upload time, as shown in system albums.
fn as_derived_entry(photo: &Photo) -> Photo {
    Photo {
        sorted_at: Some(photo.uploaded_at),
        ..photo.clone()
    }
}

/// Re-add any default system album missing from `albums`.
fn ensure_system_albums(albums: &mut Vec<Album>) {
    for album in default_albums() {
        if album.kind == AlbumKind::System && !albums.iter().any(|a| a.id == album.id) {
            debug!("Restoring missing system album '{}'", album.id);
            albums.push(album);
        }
    }
}

impl<S: KeyValueStore> PhotoRepository for LocalRepository<S> {
    fn get_all_photos(&self) -> Vec<Photo> {
        self.read_list(PHOTOS_KEY).unwrap_or_default()
    }

    fn save_photos(&mut self, photos: &[Photo]) -> Result<(), StorageError> {
        self.write_document(PHOTOS_KEY, photos)
    }

    fn get_albums(&self) -> Vec<Album> {
        self.read_list(ALBUMS_KEY).unwrap_or_else(default_albums)
    }

    fn save_albums(&mut self, albums: &[Album]) -> Result<(), StorageError> {
        self.write_document(ALBUMS_KEY, albums)
    }

    fn add_photo_to_album(&mut self, album_id: &str, photo: &Photo) -> Result<bool, StorageError> {
        let mut albums = self.get_albums();
        let Some(album) = albums
            .iter_mut()
            .find(|a| a.id == album_id && a.is_routable())
        else {
            return Ok(false);
        };
        album.photos.retain(|p| p.id != photo.id);
        album.photos.insert(
            0,
            Photo {
                sorted_at: Some(now_millis()),
                ..photo.clone()
            },
        );
        self.save_albums(&albums)?;
        Ok(true)
    }

    fn remove_photo_from_album(
        &mut self,
        album_id: &str,
        photo_id: &str,
    ) -> Result<bool, StorageError> {
        let mut albums = self.get_albums();
        let Some(album) = albums.iter_mut().find(|a| a.id == album_id) else {
            return Ok(false);
        };
        album.photos.retain(|p| p.id != photo_id);
        self.save_albums(&albums)?;
        Ok(true)
    }

    fn recompute_derived_albums(&mut self) -> Result<(), StorageError> {
        let photos = self.get_all_photos();
        let mut albums = self.get_albums();
        ensure_system_albums(&mut albums);

        for album in albums.iter_mut() {
            match album.id.as_str() {
                ALL_PHOTOS_ALBUM => {
                    album.photos = photos.iter().map(as_derived_entry).collect();
                }
                RECENT_ALBUM => {
                    let mut newest: Vec<&Photo> = photos.iter().collect();
                    newest.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
                    album.photos = newest
                        .into_iter()
                        .take(self.recent_limit)
                        .map(as_derived_entry)
                        .collect();
                }
                CAMERA_ALBUM => {
                    album.photos = photos
                        .iter()
                        .filter(|p| p.source == Some(PhotoSource::Camera))
                        .map(as_derived_entry)
                        .collect();
                }
                _ => {}
            }
        }

        debug!("Recomputed system albums from {} photos", photos.len());
        self.save_albums(&albums)
    }

    fn get_settings(&self) -> UserSettings {
        let defaults = UserSettings::default();
        let Some(serde_json::Value::Object(stored)) = self.read_document(SETTINGS_KEY) else {
            return defaults;
        };

        let swipe_mappings = stored
            .get("swipeMappings")
            .and_then(|v| serde_json::from_value::<SwipeMapping>(v.clone()).ok())
            .filter(SwipeMapping::is_well_formed)
            .unwrap_or_else(|| {
                warn!("Stored swipe mapping is invalid, using defaults");
                defaults.swipe_mappings.clone()
            });

        UserSettings {
            swipe_mappings,
            enable_notifications: stored
                .get("enableNotifications")
                .and_then(serde_json::Value::as_bool)
                .unwrap_or(defaults.enable_notifications),
            auto_backup: stored
                .get("autoBackup")
                .and_then(serde_json::Value::as_bool)
                .unwrap_or(defaults.auto_backup),
        }
    }

    fn save_settings(&mut self, settings: &UserSettings) -> Result<(), StorageError> {
        self.write_document(SETTINGS_KEY, settings)
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.store.remove(PHOTOS_KEY)?;
        self.store.remove(ALBUMS_KEY)?;
        self.store.remove(SETTINGS_KEY)?;
        info!("Cleared all stored photos, albums and settings");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{ARCHIVE_ALBUM, Direction, FAVORITES_ALBUM};
    use crate::core::store::MemoryStore;
    use crate::test_support::{memory_repo, photo};

    fn album<'a>(albums: &'a [Album], id: &str) -> &'a Album {
        albums.iter().find(|a| a.id == id).expect("album exists")
    }

    #[test]
    fn test_empty_store_yields_defaults() {
        let repo = memory_repo();
        assert!(repo.get_all_photos().is_empty());
        assert_eq!(repo.get_albums(), default_albums());
        assert_eq!(repo.get_settings(), UserSettings::default());
        assert_eq!(repo.get_swipe_mapping(), SwipeMapping::default());
    }

    #[test]
    fn test_malformed_photo_entries_are_dropped() {
        let mut store = MemoryStore::new();
        store
            .set(
                PHOTOS_KEY,
                r#"[
                    {"id": "p1", "name": "a.jpg", "dataUrl": "d", "size": 1, "uploadedAt": 1},
                    {"id": "p2", "name": "b.jpg", "dataUrl": "d", "size": "big", "uploadedAt": 2},
                    null,
                    {"id": "p3", "name": "c.jpg", "dataUrl": "d", "size": 3, "uploadedAt": 3, "type": "image/png"}
                ]"#,
            )
            .unwrap();
        let repo = LocalRepository::new(store);
        let ids: Vec<String> = repo.get_all_photos().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["p1", "p3"]);
    }

    #[test]
    fn test_non_list_documents_fall_back() {
        let mut store = MemoryStore::new();
        store.set(PHOTOS_KEY, r#"{"not": "a list"}"#).unwrap();
        store.set(ALBUMS_KEY, "this is not json").unwrap();
        let repo = LocalRepository::new(store);
        assert!(repo.get_all_photos().is_empty());
        assert_eq!(repo.get_albums(), default_albums());
    }

    #[test]
    fn test_settings_fields_fall_back_independently() {
        let mut store = MemoryStore::new();
        store
            .set(
                SETTINGS_KEY,
                r#"{"swipeMappings": {"up": "archive", "down": "", "left": "archive", "right": "favorites"},
                    "enableNotifications": false,
                    "autoBackup": "yes"}"#,
            )
            .unwrap();
        let repo = LocalRepository::new(store);
        let settings = repo.get_settings();
        // Empty "down" invalidates the whole mapping
        assert_eq!(settings.swipe_mappings, SwipeMapping::default());
        assert!(!settings.enable_notifications);
        assert!(!settings.auto_backup);
    }

    #[test]
    fn test_add_photo_to_album_stamps_and_moves_to_front() {
        let mut repo = memory_repo();
        let p1 = photo("p1", "a.jpg", 1);
        let p2 = photo("p2", "b.jpg", 2);

        assert!(repo.add_photo_to_album(FAVORITES_ALBUM, &p1).unwrap());
        assert!(repo.add_photo_to_album(FAVORITES_ALBUM, &p2).unwrap());
        assert!(repo.add_photo_to_album(FAVORITES_ALBUM, &p1).unwrap());

        let albums = repo.get_albums();
        let favorites = album(&albums, FAVORITES_ALBUM);
        let ids: Vec<&str> = favorites.photos.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
        assert!(favorites.photos.iter().all(|p| p.sorted_at.is_some()));
    }

    #[test]
    fn test_add_photo_to_missing_or_system_album_is_refused() {
        let mut repo = memory_repo();
        let p1 = photo("p1", "a.jpg", 1);
        assert!(!repo.add_photo_to_album("nope", &p1).unwrap());
        assert!(!repo.add_photo_to_album(RECENT_ALBUM, &p1).unwrap());
        assert!(album(&repo.get_albums(), RECENT_ALBUM).photos.is_empty());
    }

    #[test]
    fn test_remove_photo_from_album() {
        let mut repo = memory_repo();
        let p1 = photo("p1", "a.jpg", 1);
        repo.add_photo_to_album(ARCHIVE_ALBUM, &p1).unwrap();

        assert!(repo.remove_photo_from_album(ARCHIVE_ALBUM, "p1").unwrap());
        assert!(album(&repo.get_albums(), ARCHIVE_ALBUM).photos.is_empty());
        assert!(!repo.remove_photo_from_album("nope", "p1").unwrap());
    }

    #[test]
    fn test_recent_album_holds_newest_capped_at_limit() {
        let mut repo = memory_repo();
        // Upload times deliberately out of order
        let photos: Vec<Photo> = (0..30)
            .map(|i| photo(&format!("p{i}"), &format!("{i}.jpg"), (i * 7 % 30) as i64))
            .collect();
        repo.save_photos(&photos).unwrap();
        repo.recompute_derived_albums().unwrap();

        let albums = repo.get_albums();
        let recent = &album(&albums, RECENT_ALBUM).photos;
        assert_eq!(recent.len(), DEFAULT_RECENT_LIMIT);
        assert!(recent.windows(2).all(|w| w[0].uploaded_at >= w[1].uploaded_at));
        assert_eq!(recent[0].uploaded_at, 29);
        assert!(recent.iter().all(|p| p.sorted_at == Some(p.uploaded_at)));

        let all = &album(&albums, ALL_PHOTOS_ALBUM).photos;
        assert_eq!(all.len(), 30);
        assert_eq!(all[0].id, "p0");
    }

    #[test]
    fn test_recent_album_smaller_than_limit() {
        let mut repo = memory_repo().with_recent_limit(50);
        repo.save_photos(&[photo("a", "a.jpg", 1), photo("b", "b.jpg", 2)])
            .unwrap();
        repo.recompute_derived_albums().unwrap();
        let albums = repo.get_albums();
        let ids: Vec<&str> = album(&albums, RECENT_ALBUM)
            .photos
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_recent_limit_is_clamped() {
        assert_eq!(memory_repo().with_recent_limit(5).recent_limit(), 20);
        assert_eq!(memory_repo().with_recent_limit(35).recent_limit(), 35);
        assert_eq!(memory_repo().with_recent_limit(500).recent_limit(), 50);
    }

    #[test]
    fn test_recompute_restores_missing_system_albums_and_keeps_custom() {
        let mut repo = memory_repo();
        let mut camera_shot = photo("c1", "Camera_1.jpg", 5);
        camera_shot.source = Some(PhotoSource::Camera);
        repo.save_photos(&[photo("p1", "a.jpg", 1), camera_shot])
            .unwrap();
        repo.add_photo_to_album(FAVORITES_ALBUM, &photo("p1", "a.jpg", 1))
            .unwrap();
        let custom_only: Vec<Album> = repo
            .get_albums()
            .into_iter()
            .filter(|a| a.kind == AlbumKind::Custom)
            .collect();
        repo.save_albums(&custom_only).unwrap();

        repo.recompute_derived_albums().unwrap();
        let albums = repo.get_albums();
        assert_eq!(album(&albums, ALL_PHOTOS_ALBUM).photos.len(), 2);
        assert_eq!(album(&albums, CAMERA_ALBUM).photos.len(), 1);
        assert_eq!(album(&albums, CAMERA_ALBUM).photos[0].id, "c1");
        assert_eq!(album(&albums, FAVORITES_ALBUM).photos.len(), 1);
    }

    #[test]
    fn test_save_swipe_mapping_validates_albums() {
        let mut repo = memory_repo();
        let mut mapping = SwipeMapping::default();
        mapping.set(Direction::Up, ALL_PHOTOS_ALBUM);
        let err = repo.save_swipe_mapping(&mapping).unwrap_err();
        assert!(matches!(
            err,
            SortError::InvalidMapping { direction: Direction::Up, .. }
        ));
        assert_eq!(repo.get_swipe_mapping(), SwipeMapping::default());

        mapping.set(Direction::Up, ARCHIVE_ALBUM);
        repo.save_swipe_mapping(&mapping).unwrap();
        assert_eq!(repo.get_swipe_mapping().up, ARCHIVE_ALBUM);
        // Other settings survive a mapping save
        assert!(repo.get_settings().enable_notifications);
    }

    #[test]
    fn test_create_album_generates_unique_ids() {
        let mut repo = memory_repo();
        let trips = repo.create_album("Summer Trips!", "🏖").unwrap();
        assert_eq!(trips.id, "summer-trips");
        let again = repo.create_album("summer trips", "").unwrap();
        assert_eq!(again.id, "summer-trips-2");
        let blank = repo.create_album("???", "").unwrap();
        assert_eq!(blank.id, "album");
        assert!(repo.get_albums().iter().any(|a| a.id == "summer-trips-2"));
    }

    #[test]
    fn test_delete_album_protects_system_albums() {
        let mut repo = memory_repo();
        assert!(matches!(
            repo.delete_album(RECENT_ALBUM),
            Err(SortError::ProtectedAlbum(_))
        ));
        assert!(matches!(
            repo.delete_album("missing"),
            Err(SortError::UnknownAlbum(_))
        ));
        let removed = repo.delete_album(ARCHIVE_ALBUM).unwrap();
        assert_eq!(removed.id, ARCHIVE_ALBUM);
        assert!(!repo.get_albums().iter().any(|a| a.id == ARCHIVE_ALBUM));
    }

    #[test]
    fn test_storage_failure_propagates() {
        let mut repo = LocalRepository::new(MemoryStore::with_quota(64));
        let big = Photo {
            image_data: "x".repeat(200),
            ..photo("p1", "a.jpg", 1)
        };
        let err = repo.save_photos(&[big]).unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
        assert!(repo.get_all_photos().is_empty());
    }

    #[test]
    fn test_clear_removes_everything() {
        let mut repo = memory_repo();
        repo.save_photos(&[photo("p1", "a.jpg", 1)]).unwrap();
        repo.create_album("Pets", "").unwrap();
        repo.clear().unwrap();
        assert!(repo.get_all_photos().is_empty());
        assert_eq!(repo.get_albums(), default_albums());
    }
}
