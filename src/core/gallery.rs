//! # Gallery
//!
//! Read and bulk-edit operations over the stored collection: filtered,
//! searched and paginated listings, plus batch delete, batch move and
//! removal from a custom album.
//!
//! Listings are newest first by [`Photo::display_time`], so a photo sorted
//! into an album a moment ago sits at the top of that album.

use std::collections::HashSet;

use chrono::DateTime;
use log::info;

use crate::core::error::SortError;
use crate::core::model::{ALL_PHOTOS_ALBUM, Photo};
use crate::core::repository::PhotoRepository;

pub const PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryQuery {
    /// Album to list. `None` (or an unknown id) lists every photo.
    pub album: Option<String>,
    /// Case-insensitive name fragment, or part of an upload date
    /// (`2024`, `2024-03`, `2024-03-10`).
    pub search: Option<String>,
    /// Zero-based.
    pub page: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GalleryPage {
    pub photos: Vec<Photo>,
    pub page: usize,
    pub total_matches: usize,
    pub total_pages: usize,
}

impl GalleryPage {
    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }
}

/// Upload date of a photo as `YYYY-MM-DD` (UTC).
pub fn upload_date(photo: &Photo) -> String {
    DateTime::from_timestamp_millis(photo.uploaded_at)
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn matches_search(photo: &Photo, needle: &str) -> bool {
    photo.name.to_lowercase().contains(needle) || upload_date(photo).contains(needle)
}

pub fn query_photos<R: PhotoRepository + ?Sized>(repo: &R, query: &GalleryQuery) -> GalleryPage {
    let source = match query.album.as_deref() {
        Some(id) if id != ALL_PHOTOS_ALBUM => repo
            .get_albums()
            .into_iter()
            .find(|a| a.id == id)
            .map(|a| a.photos),
        _ => None,
    };
    let mut photos = source.unwrap_or_else(|| repo.get_all_photos());

    if let Some(needle) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let needle = needle.to_lowercase();
        photos.retain(|p| matches_search(p, &needle));
    }
    photos.sort_by(|a, b| b.display_time().cmp(&a.display_time()));

    let total_matches = photos.len();
    let total_pages = total_matches.div_ceil(PAGE_SIZE);
    let photos = photos
        .into_iter()
        .skip(query.page.saturating_mul(PAGE_SIZE))
        .take(PAGE_SIZE)
        .collect();

    GalleryPage {
        photos,
        page: query.page,
        total_matches,
        total_pages,
    }
}

/// Remove photos from the collection and from every custom album, then
/// refresh the system albums. Returns how many photos were removed.
pub fn delete_photos<R: PhotoRepository + ?Sized>(
    repo: &mut R,
    ids: &[String],
) -> Result<usize, SortError> {
    let doomed: HashSet<&str> = ids.iter().map(String::as_str).collect();

    let mut photos = repo.get_all_photos();
    let before = photos.len();
    photos.retain(|p| !doomed.contains(p.id.as_str()));
    let removed = before - photos.len();
    repo.save_photos(&photos)?;

    let mut albums = repo.get_albums();
    for album in albums.iter_mut().filter(|a| a.is_routable()) {
        album.photos.retain(|p| !doomed.contains(p.id.as_str()));
    }
    repo.save_albums(&albums)?;
    repo.recompute_derived_albums()?;

    info!("Deleted {} photos", removed);
    Ok(removed)
}

/// Place each photo named by `ids` in a custom album. Unknown ids are skipped.
/// Returns how many photos were placed.
pub fn move_photos<R: PhotoRepository + ?Sized>(
    repo: &mut R,
    album_id: &str,
    ids: &[String],
) -> Result<usize, SortError> {
    let album = repo
        .get_albums()
        .into_iter()
        .find(|a| a.id == album_id)
        .ok_or_else(|| SortError::UnknownAlbum(album_id.to_string()))?;
    if !album.is_routable() {
        return Err(SortError::ProtectedAlbum(album_id.to_string()));
    }

    let photos = repo.get_all_photos();
    let mut moved = 0;
    for id in ids {
        let Some(photo) = photos.iter().find(|p| &p.id == id) else {
            continue;
        };
        if repo.add_photo_to_album(album_id, photo)? {
            moved += 1;
        }
    }
    info!("Moved {} photos to '{}'", moved, album_id);
    Ok(moved)
}

/// Take photos out of a custom album without deleting them from the
/// collection. Ids not in the album are skipped. Returns how many were removed.
pub fn remove_from_album<R: PhotoRepository + ?Sized>(
    repo: &mut R,
    album_id: &str,
    ids: &[String],
) -> Result<usize, SortError> {
    let album = repo
        .get_albums()
        .into_iter()
        .find(|a| a.id == album_id)
        .ok_or_else(|| SortError::UnknownAlbum(album_id.to_string()))?;
    if !album.is_routable() {
        return Err(SortError::ProtectedAlbum(album_id.to_string()));
    }

    let mut removed = 0;
    for id in ids {
        if !album.photos.iter().any(|p| &p.id == id) {
            continue;
        }
        if repo.remove_photo_from_album(album_id, id)? {
            removed += 1;
        }
    }
    info!("Removed {} photos from '{}'", removed, album_id);
    Ok(removed)
}
