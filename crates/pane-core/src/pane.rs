#![forbid(unsafe_code)]

//! The pane abstraction and its cell contents.
//!
//! A [`Pane`] is whatever grid a pipeline renders into. The runtime only
//! needs two things from it: a way to make a blank one, and a way to ask
//! whether a slot carries its own click action. [`GridPane`](crate::GridPane)
//! is the reference implementation built on [`Element`]s.

use std::fmt;
use std::rc::Rc;

use crate::error::HandlerError;
use crate::event::ClickEvent;
use crate::geometry::Slot;

/// Click action attached to a single element.
pub type ElementAction = Rc<dyn Fn(&ClickEvent) -> Result<(), HandlerError>>;

/// A grid of cell contents owned by one view.
///
/// Panes are values: a view clones its pane when handing it out, and every
/// render pass starts from [`Pane::blank`].
pub trait Pane: Clone + 'static {
    /// An empty pane of the given dimensions.
    fn blank(rows: u16, columns: u16) -> Self;

    /// The click action of the element at `slot`, if any.
    fn element_action(&self, _slot: Slot) -> Option<ElementAction> {
        None
    }
}

/// Content of one pane cell.
#[derive(Clone)]
pub struct Element {
    label: String,
    action: Option<ElementAction>,
}

impl Element {
    /// An element with a label and no click action.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: None,
        }
    }

    /// Attach a click action.
    #[must_use]
    pub fn with_action(
        mut self,
        action: impl Fn(&ClickEvent) -> Result<(), HandlerError> + 'static,
    ) -> Self {
        self.action = Some(Rc::new(action));
        self
    }

    /// The element's label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The element's click action.
    #[must_use]
    pub fn action(&self) -> Option<&ElementAction> {
        self.action.as_ref()
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label
            && match (&self.action, &other.action) {
                (None, None) => true,
                (Some(a), Some(b)) => Rc::ptr_eq(a, b),
                _ => false,
            }
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("label", &self.label)
            .field("action", &self.action.is_some())
            .finish()
    }
}
