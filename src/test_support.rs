//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use crate::core::model::{Photo, PhotoSource};
use crate::core::repository::{LocalRepository, PhotoRepository};
use crate::core::session::SortingSession;
use crate::core::state::App;
use crate::core::store::MemoryStore;

/// An empty repository backed by memory.
pub fn memory_repo() -> LocalRepository<MemoryStore> {
    LocalRepository::new(MemoryStore::new())
}

/// A small uploaded photo with a fixed payload.
pub fn photo(id: &str, name: &str, uploaded_at: i64) -> Photo {
    Photo {
        id: id.to_string(),
        name: name.to_string(),
        image_data: "data:image/jpeg;base64,/9j/".to_string(),
        byte_size: 3,
        mime_type: "image/jpeg".to_string(),
        uploaded_at,
        sorted_at: None,
        source: Some(PhotoSource::Upload),
    }
}

/// A memory repository holding `p1..=pN`, system albums already derived.
pub fn seeded_repo(count: usize) -> LocalRepository<MemoryStore> {
    let mut repo = memory_repo();
    let photos: Vec<Photo> = (1..=count)
        .map(|i| photo(&format!("p{i}"), &format!("photo{i}.jpg"), i as i64 * 1000))
        .collect();
    repo.save_photos(&photos).expect("memory store accepts writes");
    repo.recompute_derived_albums()
        .expect("memory store accepts writes");
    repo
}

/// A sorting session over [`seeded_repo`].
pub fn test_session(count: usize) -> SortingSession {
    SortingSession::new(Box::new(seeded_repo(count)))
}

/// An [`App`] over [`test_session`] with no transition delay.
pub fn test_app(count: usize) -> App {
    let mut app = App::new(test_session(count));
    app.transition_delay = std::time::Duration::ZERO;
    app
}
