#![forbid(unsafe_code)]

//! Recording fixtures for test suites.
//!
//! Enabled for this crate's own tests and, through the `test-helpers`
//! feature, for downstream crates.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::viewer::{Viewer, ViewerId};

/// One call to [`Viewer::present`].
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation<P> {
    /// Title the pane was shown under.
    pub title: String,
    /// The pane as presented.
    pub pane: P,
}

struct Recording<P> {
    presented: RefCell<Vec<Presentation<P>>>,
    dismissals: Cell<usize>,
}

/// A viewer that records everything shown to it.
///
/// Clones share the same recording, so a test can keep one handle and give
/// the other to a view.
pub struct RecordingViewer<P> {
    id: ViewerId,
    recording: Rc<Recording<P>>,
}

impl<P> Clone for RecordingViewer<P> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            recording: Rc::clone(&self.recording),
        }
    }
}

impl<P: Clone> RecordingViewer<P> {
    /// A viewer with the given raw id.
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self {
            id: ViewerId::new(id),
            recording: Rc::new(Recording {
                presented: RefCell::new(Vec::new()),
                dismissals: Cell::new(0),
            }),
        }
    }

    /// Every presentation so far, oldest first.
    #[must_use]
    pub fn presented(&self) -> Vec<Presentation<P>> {
        self.recording.presented.borrow().clone()
    }

    /// Number of presentations so far.
    #[must_use]
    pub fn present_count(&self) -> usize {
        self.recording.presented.borrow().len()
    }

    /// The most recently presented pane.
    #[must_use]
    pub fn last_pane(&self) -> Option<P> {
        self.recording
            .presented
            .borrow()
            .last()
            .map(|p| p.pane.clone())
    }

    /// The most recent title.
    #[must_use]
    pub fn last_title(&self) -> Option<String> {
        self.recording
            .presented
            .borrow()
            .last()
            .map(|p| p.title.clone())
    }

    /// Number of [`Viewer::dismiss`] calls.
    #[must_use]
    pub fn dismissals(&self) -> usize {
        self.recording.dismissals.get()
    }
}

impl<P: Clone + 'static> Viewer<P> for RecordingViewer<P> {
    fn id(&self) -> ViewerId {
        self.id
    }

    fn present(&self, title: &str, pane: &P) {
        self.recording.presented.borrow_mut().push(Presentation {
            title: title.to_string(),
            pane: pane.clone(),
        });
    }

    fn dismiss(&self) {
        self.recording
            .dismissals
            .set(self.recording.dismissals.get() + 1);
    }
}
