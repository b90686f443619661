#![forbid(unsafe_code)]

//! Click handlers and click dispatch.
//!
//! A click on an open view goes through two steps:
//!
//! 1. The interface-level [`ClickHandler`] decides the outcome
//!    ([`ClickOutcome::Allow`] or [`ClickOutcome::Suppress`]).
//! 2. If the handler did not fail and the view is still open, the clicked
//!    element's own action (see [`Pane::element_action`]) runs.
//!
//! Both steps run behind the fault boundary. A failing handler suppresses the
//! click; a failing element action is logged and leaves the outcome alone.

use std::fmt;
use std::rc::Rc;

use pane_core::{Arguments, ClickEvent, ClickKind, HandlerError, Modifiers, Pane, Slot, Viewer};

use crate::boundary::{self, HandlerKind};
use crate::view::View;

/// What the host should do with the click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClickOutcome {
    /// Let the host apply its default behavior (e.g. moving an item).
    Allow,
    /// Cancel the host's default behavior.
    Suppress,
}

impl ClickOutcome {
    /// Returns `true` for [`ClickOutcome::Allow`].
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Returns `true` for [`ClickOutcome::Suppress`].
    #[must_use]
    pub const fn is_suppressed(self) -> bool {
        matches!(self, Self::Suppress)
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Suppress => "suppress",
        }
    }
}

/// Everything a click handler can see.
pub struct ClickContext<'a, P, V> {
    view: &'a View<P, V>,
    event: ClickEvent,
    pane: &'a P,
}

impl<'a, P: Pane, V: Viewer<P>> ClickContext<'a, P, V> {
    /// The view that was clicked.
    #[must_use]
    pub fn view(&self) -> &'a View<P, V> {
        self.view
    }

    /// Who clicked.
    #[must_use]
    pub fn viewer(&self) -> &'a V {
        self.view.viewer()
    }

    /// The clicked slot.
    #[must_use]
    pub fn slot(&self) -> Slot {
        self.event.slot
    }

    /// The kind of click.
    #[must_use]
    pub fn kind(&self) -> ClickKind {
        self.event.kind
    }

    /// Modifier keys held during the click.
    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        self.event.modifiers
    }

    /// The raw event.
    #[must_use]
    pub fn event(&self) -> &ClickEvent {
        &self.event
    }

    /// The pane as displayed when the click arrived.
    #[must_use]
    pub fn pane(&self) -> &'a P {
        self.pane
    }

    /// Arguments the view was opened with.
    #[must_use]
    pub fn arguments(&self) -> &'a Arguments {
        self.view.arguments()
    }
}

type ClickFn<P, V> = dyn Fn(&ClickContext<'_, P, V>) -> Result<ClickOutcome, HandlerError>;

/// Interface-level click handler.
///
/// The default suppresses every click.
pub struct ClickHandler<P, V> {
    handler: Rc<ClickFn<P, V>>,
}

impl<P, V> Clone for ClickHandler<P, V> {
    fn clone(&self) -> Self {
        Self {
            handler: Rc::clone(&self.handler),
        }
    }
}

impl<P, V> fmt::Debug for ClickHandler<P, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClickHandler").finish_non_exhaustive()
    }
}

impl<P: 'static, V: 'static> Default for ClickHandler<P, V> {
    fn default() -> Self {
        Self::cancel()
    }
}

impl<P: 'static, V: 'static> ClickHandler<P, V> {
    /// Wrap a handler that picks the outcome itself.
    pub fn new(
        handler: impl Fn(&ClickContext<'_, P, V>) -> Result<ClickOutcome, HandlerError> + 'static,
    ) -> Self {
        Self {
            handler: Rc::new(handler),
        }
    }

    /// Suppress every click.
    #[must_use]
    pub fn cancel() -> Self {
        Self::new(|_| Ok(ClickOutcome::Suppress))
    }

    /// Allow every click.
    #[must_use]
    pub fn allow() -> Self {
        Self::new(|_| Ok(ClickOutcome::Allow))
    }

    /// Run `f`, then suppress the click.
    pub fn canceling(
        f: impl Fn(&ClickContext<'_, P, V>) -> Result<(), HandlerError> + 'static,
    ) -> Self {
        Self::new(move |ctx| f(ctx).map(|()| ClickOutcome::Suppress))
    }

    /// Call the handler directly, without fault containment.
    pub fn invoke(&self, ctx: &ClickContext<'_, P, V>) -> Result<ClickOutcome, HandlerError> {
        (self.handler)(ctx)
    }
}

/// Route one click through the view's handler and the clicked element.
pub(crate) fn dispatch<P: Pane, V: Viewer<P>>(view: &View<P, V>, event: ClickEvent) -> ClickOutcome {
    let span = tracing::debug_span!(
        target: "pane.dispatch",
        "dispatch.click",
        view_id = %view.id(),
        viewer = %view.viewer().id(),
        slot = %event.slot,
        outcome = tracing::field::Empty,
    );
    let _enter = span.enter();

    if !view.is_open() {
        tracing::debug!(target: "pane.dispatch", "click on closed view suppressed");
        view.record_click(ClickOutcome::Suppress);
        return ClickOutcome::Suppress;
    }

    let pane = view.pane();
    let handler = view.definition().click_handler();
    let ctx = ClickContext {
        view,
        event,
        pane: &pane,
    };

    let outcome = match boundary::guard(|| handler.invoke(&ctx)) {
        Ok(outcome) => {
            if view.is_open() {
                if let Some(action) = pane.element_action(event.slot) {
                    if let Err(err) = boundary::guard(|| action(&event)) {
                        boundary::report(HandlerKind::Element, view.id(), view.viewer().id(), &err);
                    }
                }
            }
            outcome
        }
        Err(err) => {
            boundary::report(HandlerKind::Click, view.id(), view.viewer().id(), &err);
            ClickOutcome::Suppress
        }
    };

    span.record("outcome", outcome.as_str());
    view.record_click(outcome);
    outcome
}
