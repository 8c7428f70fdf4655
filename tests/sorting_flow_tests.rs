use std::fs;
use std::path::Path;

use sortit::core::export::{export_photos, write_exports};
use sortit::core::import::{ImportPayload, ImportPolicy, SkipReason, import_batch};
use sortit::core::model::{Album, Direction, PhotoSource, SwipeMapping, default_albums};
use sortit::core::repository::{LocalRepository, PhotoRepository};
use sortit::core::router::Placement;
use sortit::core::session::{SortingSession, SwipeOutcome};
use sortit::core::store::{FileStore, StorageError};
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

fn open_repo(dir: &Path) -> LocalRepository<FileStore> {
    LocalRepository::new(FileStore::open(dir, None).unwrap())
}

fn jpeg(name: &str, fill: u8) -> ImportPayload {
    ImportPayload::new(name, "image/jpeg", vec![0xFF, 0xD8, fill, fill])
}

/// Repository in `dir` holding a.jpg, b.jpg and c.jpg, in that order.
fn imported_repo(dir: &Path) -> LocalRepository<FileStore> {
    let mut repo = open_repo(dir);
    let report = import_batch(
        &mut repo,
        vec![jpeg("a.jpg", 1), jpeg("b.jpg", 2), jpeg("c.jpg", 3)],
        &ImportPolicy::default(),
        PhotoSource::Upload,
    )
    .unwrap();
    assert_eq!(report.imported.len(), 3);
    repo
}

fn album_names(repo: &dyn PhotoRepository, album_id: &str) -> Vec<String> {
    repo.get_albums()
        .into_iter()
        .find(|a: &Album| a.id == album_id)
        .map(|a| a.photos.into_iter().map(|p| p.name).collect())
        .unwrap_or_default()
}

fn swipe(session: &mut SortingSession, direction: Direction) -> Placement {
    match session.swipe_and_advance(direction).unwrap() {
        SwipeOutcome::Recorded { placement, .. } => placement,
        SwipeOutcome::Ignored => panic!("swipe {direction} was ignored"),
    }
}

// ============================================================================
// Sorting
// ============================================================================

#[test]
fn test_three_photo_scenario_on_disk() {
    let tmp = TempDir::new().unwrap();
    let mut session = SortingSession::new(Box::new(imported_repo(tmp.path())));

    swipe(&mut session, Direction::Right);
    swipe(&mut session, Direction::Left);
    assert_eq!(album_names(session.repository(), "favorites"), vec!["a.jpg"]);
    assert_eq!(album_names(session.repository(), "archive"), vec!["b.jpg"]);

    // Undo moves the pointer back but leaves b.jpg archived
    let undone = session.undo().unwrap();
    assert_eq!(undone.photo_name, "b.jpg");
    assert_eq!(session.current_index(), 1);
    assert_eq!(album_names(session.repository(), "archive"), vec!["b.jpg"]);

    swipe(&mut session, Direction::Up);
    swipe(&mut session, Direction::Up);
    assert!(session.is_complete());
    assert_eq!(session.current_index(), 3);

    let stats = session.stats();
    assert_eq!(stats.positive, 1);
    assert_eq!(stats.negative, 2);
    assert_eq!(stats.total_seen, 3);
    assert_eq!(
        album_names(session.repository(), "favorites"),
        vec!["c.jpg", "b.jpg", "a.jpg"]
    );
}

#[test]
fn test_albums_persist_but_session_starts_fresh() {
    let tmp = TempDir::new().unwrap();
    {
        let mut session = SortingSession::new(Box::new(imported_repo(tmp.path())));
        swipe(&mut session, Direction::Keep);
        swipe(&mut session, Direction::Discard);
    }

    let session = SortingSession::new(Box::new(open_repo(tmp.path())));
    assert_eq!(session.current_index(), 0);
    assert!(session.history().is_empty());
    assert_eq!(session.total(), 3);
    assert_eq!(album_names(session.repository(), "favorites"), vec!["a.jpg"]);
    assert_eq!(album_names(session.repository(), "archive"), vec!["b.jpg"]);
}

#[test]
fn test_custom_mapping_and_deleted_album() {
    let tmp = TempDir::new().unwrap();
    let mut repo = imported_repo(tmp.path());
    let pets = repo.create_album("Pets", "🐶").unwrap();
    let mut mapping = SwipeMapping::default();
    mapping.set(Direction::Up, &pets.id);
    repo.save_swipe_mapping(&mapping).unwrap();

    let mut session = SortingSession::new(Box::new(repo));
    assert!(swipe(&mut session, Direction::Up).is_placed());
    assert_eq!(album_names(session.repository(), "pets"), vec!["a.jpg"]);

    session.repository_mut().delete_album("pets").unwrap();
    let placement = swipe(&mut session, Direction::Up);
    assert_eq!(
        placement,
        Placement::Missed {
            album_id: "pets".into()
        }
    );
    assert_eq!(session.history().len(), 2);
    assert_eq!(session.current_index(), 2);
}

// ============================================================================
// Import / export
// ============================================================================

#[test]
fn test_duplicate_name_skipped_same_bytes_new_name_accepted() {
    let tmp = TempDir::new().unwrap();
    let mut repo = imported_repo(tmp.path());

    let report = import_batch(
        &mut repo,
        vec![jpeg("a.jpg", 9), jpeg("a-copy.jpg", 1)],
        &ImportPolicy::default(),
        PhotoSource::Upload,
    )
    .unwrap();
    assert_eq!(report.skipped, vec![("a.jpg".to_string(), SkipReason::DuplicateName)]);
    assert_eq!(report.imported[0].name, "a-copy.jpg");
    assert_eq!(repo.get_all_photos().len(), 4);
    assert_eq!(album_names(&repo, "recent").len(), 4);
}

#[test]
fn test_quota_exceeded_leaves_previous_photos() {
    let tmp = TempDir::new().unwrap();
    let mut repo = LocalRepository::new(FileStore::open(tmp.path(), Some(4096)).unwrap());
    import_batch(
        &mut repo,
        vec![jpeg("small.jpg", 1)],
        &ImportPolicy::default(),
        PhotoSource::Upload,
    )
    .unwrap();

    let big = ImportPayload::new("big.png", "image/png", vec![7; 8192]);
    let err = import_batch(&mut repo, vec![big], &ImportPolicy::default(), PhotoSource::Upload)
        .unwrap_err();
    assert!(matches!(err, StorageError::QuotaExceeded { .. }));

    let reopened = open_repo(tmp.path());
    let names: Vec<String> = reopened.get_all_photos().into_iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["small.jpg"]);
}

#[test]
fn test_export_writes_original_bytes() {
    let tmp = TempDir::new().unwrap();
    let repo = imported_repo(tmp.path());
    let ids: Vec<String> = repo.get_all_photos().into_iter().map(|p| p.id).collect();

    let out = tmp.path().join("out");
    let exports = export_photos(&repo, &ids[1..2]).unwrap();
    let written = write_exports(&out, &exports).unwrap();
    assert_eq!(written, vec![out.join("b.jpg")]);
    assert_eq!(fs::read(&written[0]).unwrap(), vec![0xFF, 0xD8, 2, 2]);
}

// ============================================================================
// Corrupt storage
// ============================================================================

#[test]
fn test_corrupt_documents_fall_back_to_defaults() {
    let tmp = TempDir::new().unwrap();
    imported_repo(tmp.path());

    fs::write(tmp.path().join("sortit_albums.json"), "{ not json").unwrap();
    fs::write(
        tmp.path().join("sortit_settings.json"),
        r#"{"swipeMappings": {"up": 3}, "autoBackup": true}"#,
    )
    .unwrap();

    let repo = open_repo(tmp.path());
    assert_eq!(repo.get_all_photos().len(), 3);
    assert_eq!(repo.get_albums(), default_albums());
    let settings = repo.get_settings();
    assert_eq!(settings.swipe_mappings, SwipeMapping::default());
    assert!(settings.auto_backup);
    assert!(settings.enable_notifications);

    // A fresh session still works against the recovered state
    let mut session = SortingSession::new(Box::new(repo));
    assert!(swipe(&mut session, Direction::Right).is_placed());
}
