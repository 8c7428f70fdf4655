//! # Sorting Session
//!
//! One pass over the photo collection. Composes the sequencer, the router
//! and the ledger around a repository handed in by the caller.
//!
//! ```text
//! swipe(dir) ──▶ begin_transition ──▶ classify ──▶ ledger.append ──▶ route
//!                                                                      │
//! finish_transition ◀──────────── (UI waits for the transition delay) ─┘
//! ```
//!
//! The record is appended before the album write, so a storage failure
//! still leaves the swipe in the history. The transition stays latched in
//! that case too, and `finish_transition` completes it as usual.
//!
//! The session's state is transient. The photo list and mapping are read
//! from the repository on construction and on [`SortingSession::reload`].

use log::{debug, info};

use crate::core::error::SortError;
use crate::core::ledger::{HistoryLedger, SortingStats};
use crate::core::model::{
    ClassificationRecord, Direction, Outcome, Photo, SwipeMapping, now_millis,
};
use crate::core::repository::PhotoRepository;
use crate::core::router::{self, Placement};
use crate::core::sequencer::Sequencer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwipeOutcome {
    /// A transition was already in flight, or there is nothing left to sort.
    Ignored,
    Recorded {
        record: ClassificationRecord,
        placement: Placement,
    },
}

pub struct SortingSession {
    repo: Box<dyn PhotoRepository>,
    sequencer: Sequencer,
    ledger: HistoryLedger,
    mapping: SwipeMapping,
}

impl SortingSession {
    pub fn new(repo: Box<dyn PhotoRepository>) -> Self {
        let photos = repo.get_all_photos();
        let mapping = repo.get_swipe_mapping();
        info!("Sorting session started with {} photos", photos.len());
        Self {
            repo,
            sequencer: Sequencer::new(photos),
            ledger: HistoryLedger::new(),
            mapping,
        }
    }

    pub fn repository(&self) -> &dyn PhotoRepository {
        self.repo.as_ref()
    }

    pub fn repository_mut(&mut self) -> &mut dyn PhotoRepository {
        self.repo.as_mut()
    }

    pub fn mapping(&self) -> &SwipeMapping {
        &self.mapping
    }

    pub fn photos(&self) -> &[Photo] {
        self.sequencer.photos()
    }

    pub fn current_photo(&self) -> Option<&Photo> {
        self.sequencer.current_photo()
    }

    pub fn current_index(&self) -> usize {
        self.sequencer.current_index()
    }

    pub fn total(&self) -> usize {
        self.sequencer.len()
    }

    pub fn is_complete(&self) -> bool {
        self.sequencer.is_complete()
    }

    /// `(done, total)` for progress display.
    pub fn progress(&self) -> (usize, usize) {
        let total = self.sequencer.len();
        (self.sequencer.current_index().min(total), total)
    }

    pub fn is_animating(&self) -> bool {
        self.sequencer.is_animating()
    }

    pub fn history(&self) -> &[ClassificationRecord] {
        self.ledger.records()
    }

    pub fn stats(&self) -> SortingStats {
        self.ledger.stats()
    }

    pub fn can_undo(&self) -> bool {
        !self.ledger.is_empty() && !self.sequencer.is_animating()
    }

    /// Classify the current photo.
    ///
    /// Starts a transition; call [`finish_transition`](Self::finish_transition)
    /// once the UI is ready to show the next photo.
    pub fn swipe(&mut self, direction: Direction) -> Result<SwipeOutcome, SortError> {
        let Some(photo) = self.sequencer.current_photo().cloned() else {
            return Ok(SwipeOutcome::Ignored);
        };
        if !self.sequencer.begin_transition() {
            debug!("Swipe {} ignored: transition in flight", direction);
            return Ok(SwipeOutcome::Ignored);
        }

        let route = router::classify(direction, &self.mapping);
        let record = ClassificationRecord {
            photo_id: photo.id.clone(),
            photo_name: photo.name.clone(),
            direction,
            outcome: Outcome::from_positive(route.is_positive),
            destination: route.destination.clone(),
            timestamp: now_millis(),
        };
        self.ledger.append(record.clone());

        let placement = router::route(self.repo.as_mut(), &photo, &route)?;
        Ok(SwipeOutcome::Recorded { record, placement })
    }

    /// Release the transition latch and move to the next photo.
    /// Returns whether the session is now complete.
    pub fn finish_transition(&mut self) -> bool {
        let complete = self.sequencer.finish_transition();
        if complete {
            info!("Sorting session complete: {:?}", self.ledger.stats());
        }
        complete
    }

    /// [`swipe`](Self::swipe) followed straight away by
    /// [`finish_transition`](Self::finish_transition), for callers with no
    /// animation to wait for.
    pub fn swipe_and_advance(&mut self, direction: Direction) -> Result<SwipeOutcome, SortError> {
        let outcome = self.swipe(direction);
        if !matches!(outcome, Ok(SwipeOutcome::Ignored)) {
            self.finish_transition();
        }
        outcome
    }

    /// Step back one photo and drop the newest record.
    ///
    /// The photo stays in whatever album it was routed to.
    pub fn undo(&mut self) -> Option<ClassificationRecord> {
        if !self.can_undo() {
            return None;
        }
        let record = self.ledger.pop_last()?;
        self.sequencer.retreat();
        debug!(
            "Undid {} on '{}' (album membership kept)",
            record.direction, record.photo_name
        );
        Some(record)
    }

    /// Back to the first photo with an empty history.
    pub fn reset(&mut self) {
        self.sequencer.reset();
        self.ledger.clear();
        info!("Sorting session reset");
    }

    /// Re-read photos and mapping from the repository and start over.
    pub fn reload(&mut self) {
        self.sequencer = Sequencer::new(self.repo.get_all_photos());
        self.mapping = self.repo.get_swipe_mapping();
        self.ledger.clear();
        info!("Sorting session reloaded with {} photos", self.sequencer.len());
    }
}
