#![forbid(unsafe_code)]

//! Fault boundary around application callbacks.
//!
//! Every transform, click handler, element action and close handler runs
//! through [`guard`]. A returned `Err` passes through unchanged; a panic is
//! caught and converted into a [`HandlerError`] so a single faulty callback
//! can't unwind through the view, the scheduler, or other views.

use std::panic::{AssertUnwindSafe, catch_unwind};

use pane_core::{HandlerError, ViewerId};

use crate::view::ViewId;

/// Which kind of dispatched callback failed.
///
/// Transform failures are reported by the render pass on `pane.render`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    /// The interface-level click handler.
    Click,
    /// A pane element's own click action.
    Element,
    /// A close handler.
    Close,
}

impl HandlerKind {
    /// Stable name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Element => "element",
            Self::Close => "close",
        }
    }
}

/// Run `f`, turning a panic into a [`HandlerError`].
pub fn guard<R>(f: impl FnOnce() -> Result<R, HandlerError>) -> Result<R, HandlerError> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(HandlerError::from_panic(payload)),
    }
}

/// Log a contained callback failure.
pub(crate) fn report(kind: HandlerKind, view: ViewId, viewer: ViewerId, err: &HandlerError) {
    tracing::warn!(
        target: "pane.dispatch",
        handler = kind.as_str(),
        view = %view,
        viewer = %viewer,
        panicked = err.is_panic(),
        error = %err,
        "handler failed; contained at dispatch boundary"
    );
}
