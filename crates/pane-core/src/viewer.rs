#![forbid(unsafe_code)]

//! The identity a pane is shown to.

use std::fmt;

/// Stable identity of a viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewerId(u64);

impl ViewerId {
    /// Wrap a raw id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw numeric id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ViewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "viewer#{}", self.0)
    }
}

/// Something that can be shown a rendered pane of type `P`.
///
/// Viewers are cheap handles (cloning shares the underlying connection or
/// session); a view stores one clone for its lifetime.
pub trait Viewer<P>: Clone + 'static {
    /// Stable identity, used for logging and per-viewer lookups.
    fn id(&self) -> ViewerId;

    /// Display `pane` under `title`. Called after every successful render.
    fn present(&self, title: &str, pane: &P);

    /// Take the surface down. Called when application code closes a view;
    /// not called when the host itself reported the dismissal.
    fn dismiss(&self) {}
}
