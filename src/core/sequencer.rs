//! # Session Sequencer
//!
//! Walks the photo list one index at a time.
//!
//! ```text
//!            classify             classify               classify
//! Active(0) ─────────▶ Active(1) ─────────▶ ... Active(n-1) ─────────▶ Complete
//!     ▲       ◀───────                                                    │
//!     │         undo                                                      │
//!     └──────────────────────────── reset ────────────────────────────────┘
//! ```
//!
//! A classification is two steps: [`Sequencer::begin_transition`] latches
//! `is_animating`, and [`Sequencer::finish_transition`] releases it and
//! advances. While latched, nothing moves the pointer, which is what keeps
//! a second gesture from advancing twice.

use log::debug;

use crate::core::model::Photo;

#[derive(Debug, Clone, Default)]
pub struct Sequencer {
    photos: Vec<Photo>,
    current_index: usize,
    is_animating: bool,
}

impl Sequencer {
    pub fn new(photos: Vec<Photo>) -> Self {
        Self {
            photos,
            current_index: 0,
            is_animating: false,
        }
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_animating(&self) -> bool {
        self.is_animating
    }

    pub fn current_photo(&self) -> Option<&Photo> {
        self.photos.get(self.current_index)
    }

    pub fn is_complete(&self) -> bool {
        self.current_index >= self.photos.len()
    }

    /// Move to the next photo. Does nothing while a transition is latched
    /// or once complete. Returns whether the session is now complete.
    pub fn advance(&mut self) -> bool {
        if self.is_animating {
            debug!("advance ignored: transition in flight");
            return self.is_complete();
        }
        if !self.is_complete() {
            self.current_index += 1;
        }
        self.is_complete()
    }

    /// Step back one photo, floored at 0.
    pub fn retreat(&mut self) {
        self.current_index = self.current_index.saturating_sub(1);
    }

    pub fn reset(&mut self) {
        self.current_index = 0;
        self.is_animating = false;
    }

    /// Latch the pointer for a classification. Refused while already
    /// latched or when there is nothing left to classify.
    pub fn begin_transition(&mut self) -> bool {
        if self.is_animating || self.is_complete() {
            return false;
        }
        self.is_animating = true;
        true
    }

    /// Release the latch and advance. Returns whether the session is now complete.
    pub fn finish_transition(&mut self) -> bool {
        if !self.is_animating {
            return self.is_complete();
        }
        self.is_animating = false;
        self.advance()
    }
}
