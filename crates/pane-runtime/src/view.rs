#![forbid(unsafe_code)]

//! Live, per-viewer instances of an interface.
//!
//! A [`View`] owns one pane rendered for one viewer. It moves through
//! `Created → Open → Closed`; `Closed` is terminal.
//!
//! # Lifecycle
//!
//! - **Open**: run the pipeline over a blank pane, present it, mark the view
//!   open, watch tracked properties and, if the definition asks for timed
//!   updates, register a repeating task with its scheduler.
//! - **Render**: only while open. Every pass folds the whole pipeline over a
//!   fresh blank pane. A pass that finishes after the view was closed is
//!   discarded. A pass that fails leaves the previous pane on screen.
//! - **Close**: exactly once. Cancels the task and property watches, then
//!   runs close handlers in registration order.
//!
//! # Re-entrancy
//!
//! No borrow of view state is held while user code runs, so transforms,
//! handlers and viewers may call back into the view. Renders are
//! single-flight: a tick arriving mid-render is skipped and counted, and a
//! refresh or property change arriving mid-render schedules one follow-up
//! pass.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use pane_core::{Arguments, ClickEvent, Pane, Viewer, ViewerId, Watch};
use web_time::Instant;

use crate::click::{self, ClickOutcome};
use crate::close::{self, CloseReport};
use crate::interface::Interface;
use crate::scheduler::TaskHandle;

static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique view identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(u64);

impl ViewId {
    pub(crate) fn next() -> Self {
        Self(NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

/// Lifecycle state of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewStatus {
    /// Constructed; first render not yet presented.
    Created,
    /// Presented and receiving updates.
    Open,
    /// Terminal.
    Closed,
}

/// Why a render pass ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderReason {
    /// Initial render on open.
    Open,
    /// Scheduler tick.
    Tick,
    /// Explicit [`View::refresh`].
    Refresh,
    /// A tracked property changed.
    PropertyChanged,
}

impl RenderReason {
    /// Stable name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Tick => "tick",
            Self::Refresh => "refresh",
            Self::PropertyChanged => "property",
        }
    }
}

/// Result of a render request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderOutcome {
    /// A new pane was stored and presented.
    Rendered,
    /// A transform failed; the previous pane stays.
    Failed,
    /// A render was already in flight.
    Skipped,
    /// The view closed while the pass ran; the result was dropped.
    Discarded,
    /// The view is not open.
    Closed,
}

/// Who initiated a close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseReason {
    /// Application code called [`View::close`].
    Requested,
    /// The host reported the surface gone ([`View::dismissed`]).
    Dismissed,
}

impl CloseReason {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::Dismissed => "dismissed",
        }
    }
}

/// Per-view counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewStats {
    /// Successful render passes, including the initial one.
    pub renders: u64,
    /// Passes abandoned because a transform failed.
    pub failed_renders: u64,
    /// Ticks that arrived while a render was in flight.
    pub skipped_ticks: u64,
    /// Passes that finished after the view closed.
    pub discarded_renders: u64,
    /// Clicks dispatched, including those on a closed view.
    pub clicks: u64,
    /// Clicks whose outcome was [`ClickOutcome::Suppress`].
    pub suppressed_clicks: u64,
    /// Close-handler results, once closed.
    pub close: Option<CloseReport>,
}

trait ViewLink {
    fn status(&self) -> ViewStatus;
}

/// Non-owning link from a child view to the view it was opened from.
#[derive(Clone)]
pub struct ParentView {
    id: ViewId,
    viewer: ViewerId,
    title: String,
    link: Weak<dyn ViewLink>,
}

impl ParentView {
    /// The parent's id.
    #[must_use]
    pub fn id(&self) -> ViewId {
        self.id
    }

    /// The parent's viewer.
    #[must_use]
    pub fn viewer_id(&self) -> ViewerId {
        self.viewer
    }

    /// The parent's effective title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The parent's current status. A dropped parent reports `Closed`.
    #[must_use]
    pub fn status(&self) -> ViewStatus {
        self.link
            .upgrade()
            .map_or(ViewStatus::Closed, |parent| parent.status())
    }

    /// Returns `true` if the parent is still open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status() == ViewStatus::Open
    }
}

impl fmt::Debug for ParentView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParentView")
            .field("id", &self.id)
            .field("viewer", &self.viewer)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

struct ViewState<P> {
    status: ViewStatus,
    pane: P,
    task: Option<TaskHandle>,
    rendering: bool,
    pending: Option<RenderReason>,
    watches: Vec<Watch>,
    stats: ViewStats,
}

struct ViewInner<P, V> {
    id: ViewId,
    definition: Interface<P, V>,
    viewer: V,
    parent: Option<ParentView>,
    arguments: Arguments,
    title: String,
    state: RefCell<ViewState<P>>,
    on_drop: fn(&ViewInner<P, V>),
}

impl<P, V> ViewLink for ViewInner<P, V> {
    fn status(&self) -> ViewStatus {
        self.state.borrow().status
    }
}

impl<P, V> Drop for ViewInner<P, V> {
    fn drop(&mut self) {
        (self.on_drop)(self);
    }
}

impl<P: Pane, V: Viewer<P>> ViewInner<P, V> {
    /// Last handle gone while still open: treat it as a host dismissal.
    fn dropped(&self) {
        if self.state.borrow().status != ViewStatus::Open {
            return;
        }
        tracing::debug!(
            target: "pane.view",
            view_id = %self.id,
            "view dropped while open; closing"
        );
        self.teardown(CloseReason::Dismissed);
    }

    fn teardown(&self, reason: CloseReason) -> bool {
        let span = tracing::debug_span!(
            target: "pane.view",
            "view.close",
            view_id = %self.id,
            viewer = %self.viewer.id(),
            reason = reason.as_str(),
        );
        let _enter = span.enter();

        let (task, watches, pane) = {
            let mut state = self.state.borrow_mut();
            if state.status == ViewStatus::Closed {
                tracing::debug!(target: "pane.view", "close on a closed view ignored");
                return false;
            }
            state.status = ViewStatus::Closed;
            state.pending = None;
            (
                state.task.take(),
                std::mem::take(&mut state.watches),
                state.pane.clone(),
            )
        };

        if let (Some(task), Some(scheduler)) = (task, self.definition.scheduler_ref()) {
            scheduler.cancel(task);
        }
        drop(watches);

        if reason == CloseReason::Requested {
            self.viewer.dismiss();
        }

        let report = close::dispatch_close(
            self.definition.close_handler_list(),
            &pane,
            &self.viewer,
            self.id,
        );
        self.state.borrow_mut().stats.close = Some(report);
        tracing::debug!(
            target: "pane.view",
            handlers = report.ran,
            failed = report.failed,
            "view closed"
        );
        true
    }
}

/// A live instance of an [`Interface`] for one viewer.
///
/// Cloning yields another handle to the same view.
pub struct View<P, V> {
    inner: Rc<ViewInner<P, V>>,
}

impl<P, V> Clone for View<P, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<P, V> fmt::Debug for View<P, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("id", &self.inner.id)
            .field("title", &self.inner.title)
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

impl<P, V> View<P, V> {
    /// This view's id.
    #[must_use]
    pub fn id(&self) -> ViewId {
        self.inner.id
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn status(&self) -> ViewStatus {
        self.inner.state.borrow().status
    }

    /// Returns `true` while the view is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status() == ViewStatus::Open
    }

    /// Effective title: the override given at open, else the definition's.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.inner.title
    }

    /// Arguments captured at open.
    #[must_use]
    pub fn arguments(&self) -> &Arguments {
        &self.inner.arguments
    }

    /// The viewer this view is shown to.
    #[must_use]
    pub fn viewer(&self) -> &V {
        &self.inner.viewer
    }

    /// The definition this view was opened from.
    #[must_use]
    pub fn definition(&self) -> &Interface<P, V> {
        &self.inner.definition
    }

    /// The view this one was opened from, if any.
    #[must_use]
    pub fn parent(&self) -> Option<&ParentView> {
        self.inner.parent.as_ref()
    }

    /// Counters so far.
    #[must_use]
    pub fn stats(&self) -> ViewStats {
        self.inner.state.borrow().stats
    }

    /// The scheduler task driving timed updates, while open.
    #[must_use]
    pub fn update_task(&self) -> Option<TaskHandle> {
        self.inner.state.borrow().task
    }

    /// Returns `true` if both handles refer to the same view.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn record_click(&self, outcome: ClickOutcome) {
        let mut state = self.inner.state.borrow_mut();
        state.stats.clicks += 1;
        if outcome.is_suppressed() {
            state.stats.suppressed_clicks += 1;
        }
    }
}

impl<P: Pane, V: Viewer<P>> View<P, V> {
    pub(crate) fn open(
        definition: Interface<P, V>,
        viewer: V,
        arguments: Arguments,
        title: Option<String>,
        parent: Option<ParentView>,
    ) -> Self {
        let id = ViewId::next();
        let title = title.unwrap_or_else(|| definition.title().to_owned());
        let span = tracing::debug_span!(
            target: "pane.view",
            "view.open",
            view_id = %id,
            viewer = %viewer.id(),
            title = %title,
        );
        let _enter = span.enter();

        let blank = P::blank(definition.rows(), definition.columns());
        let view = Self {
            inner: Rc::new(ViewInner {
                id,
                definition,
                viewer,
                parent,
                arguments,
                title,
                state: RefCell::new(ViewState {
                    status: ViewStatus::Created,
                    pane: blank.clone(),
                    task: None,
                    rendering: false,
                    pending: None,
                    watches: Vec::new(),
                    stats: ViewStats::default(),
                }),
                on_drop: ViewInner::dropped,
            }),
        };

        let pane = match view.fold(RenderReason::Open) {
            Some(pane) => {
                view.inner.state.borrow_mut().stats.renders += 1;
                pane
            }
            None => blank,
        };
        view.inner.state.borrow_mut().pane = pane.clone();
        view.inner.viewer.present(&view.inner.title, &pane);
        view.inner.state.borrow_mut().status = ViewStatus::Open;

        let watches: Vec<Watch> = view
            .inner
            .definition
            .pipeline()
            .tracked_keys()
            .iter()
            .filter_map(|key| {
                let weak = Rc::downgrade(&view.inner);
                key.watch(move || {
                    if let Some(inner) = weak.upgrade() {
                        View { inner }.render(RenderReason::PropertyChanged);
                    }
                })
            })
            .collect();

        let task = if view.inner.definition.updates() {
            view.schedule_updates()
        } else {
            None
        };

        {
            let mut state = view.inner.state.borrow_mut();
            state.watches = watches;
            state.task = task;
        }
        tracing::debug!(
            target: "pane.view",
            watches = view.inner.state.borrow().watches.len(),
            task = ?task,
            "view opened"
        );
        view
    }

    fn schedule_updates(&self) -> Option<TaskHandle> {
        let Some(scheduler) = self.inner.definition.scheduler_ref() else {
            tracing::warn!(
                target: "pane.view",
                view_id = %self.inner.id,
                "updates enabled without a scheduler; view will not tick"
            );
            return None;
        };
        let weak = Rc::downgrade(&self.inner);
        let handle = scheduler.schedule_repeating(
            self.inner.definition.update_delay(),
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    View { inner }.render(RenderReason::Tick);
                }
            }),
        );
        Some(handle)
    }

    /// Re-render now.
    pub fn refresh(&self) -> RenderOutcome {
        self.render(RenderReason::Refresh)
    }

    /// Close the view and ask the viewer to dismiss it.
    ///
    /// Returns `false` if the view was already closed.
    pub fn close(&self) -> bool {
        self.finish(CloseReason::Requested)
    }

    /// Record that the host already took the surface down.
    ///
    /// Same as [`close`](Self::close) except the viewer is not asked to
    /// dismiss anything.
    pub fn dismissed(&self) -> bool {
        self.finish(CloseReason::Dismissed)
    }

    /// Dispatch a click.
    pub fn click(&self, event: ClickEvent) -> ClickOutcome {
        click::dispatch(self, event)
    }

    /// A copy of the current pane.
    #[must_use]
    pub fn pane(&self) -> P {
        self.inner.state.borrow().pane.clone()
    }

    /// Open `child` for this view's viewer, linked back to this view.
    #[must_use = "dropping the child view closes it"]
    pub fn open_child<Q>(&self, child: &Interface<Q, V>, arguments: Arguments) -> View<Q, V>
    where
        Q: Pane,
        V: Viewer<Q>,
    {
        child.open_child(self, arguments)
    }

    pub(crate) fn as_parent(&self) -> ParentView {
        let weak = Rc::downgrade(&self.inner);
        let link: Weak<dyn ViewLink> = weak;
        ParentView {
            id: self.inner.id,
            viewer: self.inner.viewer.id(),
            title: self.inner.title.clone(),
            link,
        }
    }

    pub(crate) fn render(&self, reason: RenderReason) -> RenderOutcome {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.status != ViewStatus::Open {
                tracing::debug!(
                    target: "pane.view",
                    view_id = %self.inner.id,
                    reason = reason.as_str(),
                    "render on a view that is not open ignored"
                );
                return RenderOutcome::Closed;
            }
            if state.rendering {
                if reason == RenderReason::Tick {
                    state.stats.skipped_ticks += 1;
                    tracing::debug!(
                        target: "pane.view",
                        view_id = %self.inner.id,
                        "tick skipped; render in flight"
                    );
                } else {
                    state.pending = Some(reason);
                }
                return RenderOutcome::Skipped;
            }
            state.rendering = true;
        }

        let mut reason = reason;
        loop {
            let outcome = self.render_pass(reason);
            let mut state = self.inner.state.borrow_mut();
            match state.pending.take() {
                Some(next) if state.status == ViewStatus::Open => reason = next,
                _ => {
                    state.rendering = false;
                    return outcome;
                }
            }
        }
    }

    fn render_pass(&self, reason: RenderReason) -> RenderOutcome {
        let Some(pane) = self.fold(reason) else {
            return RenderOutcome::Failed;
        };
        {
            let mut state = self.inner.state.borrow_mut();
            if state.status != ViewStatus::Open {
                state.stats.discarded_renders += 1;
                tracing::debug!(
                    target: "pane.view",
                    view_id = %self.inner.id,
                    "view closed mid-render; result discarded"
                );
                return RenderOutcome::Discarded;
            }
            state.pane = pane.clone();
            state.stats.renders += 1;
        }
        self.inner.viewer.present(&self.inner.title, &pane);
        RenderOutcome::Rendered
    }

    /// Run the pipeline once. Failures are logged and counted.
    fn fold(&self, reason: RenderReason) -> Option<P> {
        let inner = &self.inner;
        let span = tracing::debug_span!(
            target: "pane.view",
            "view.render",
            view_id = %inner.id,
            viewer = %inner.viewer.id(),
            reason = reason.as_str(),
            duration_us = tracing::field::Empty,
        );
        let _enter = span.enter();

        let started = Instant::now();
        let blank = P::blank(inner.definition.rows(), inner.definition.columns());
        let result = inner
            .definition
            .pipeline()
            .render(blank, &inner.viewer, &inner.arguments);
        span.record(
            "duration_us",
            u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
        );

        match result {
            Ok(pane) => Some(pane),
            Err(failure) => {
                tracing::warn!(
                    target: "pane.render",
                    view = %inner.id,
                    viewer = %inner.viewer.id(),
                    stage = failure.index,
                    priority = failure.priority,
                    panicked = failure.error.is_panic(),
                    error = %failure.error,
                    "render pass failed; keeping previous pane"
                );
                inner.state.borrow_mut().stats.failed_renders += 1;
                None
            }
        }
    }

    fn finish(&self, reason: CloseReason) -> bool {
        self.inner.teardown(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{TickLoop, TickScheduler};
    use pane_core::testing::RecordingViewer;
    use pane_core::{Element, GridPane, HandlerError, Slot};
    use std::cell::Cell;

    type Recorder = RecordingViewer<GridPane>;
    type Menu = Interface<GridPane, Recorder>;
    type MenuView = View<GridPane, Recorder>;

    fn label(pane: &GridPane, x: u16, y: u16) -> Option<String> {
        pane.get(Slot::new(x, y)).map(|e| e.label().to_owned())
    }

    #[test]
    fn open_presents_and_opens() {
        let menu = Menu::builder()
            .with_title("Menu")
            .add_transform(|mut pane, _, _| {
                pane.set(Slot::new(0, 0), Element::new("stone"));
                Ok(pane)
            })
            .build()
            .unwrap();
        let viewer = Recorder::new(1);
        let view = menu.open(viewer.clone());

        assert_eq!(view.status(), ViewStatus::Open);
        assert_eq!(view.title(), "Menu");
        assert_eq!(viewer.present_count(), 1);
        assert_eq!(label(&view.pane(), 0, 0).as_deref(), Some("stone"));
        assert_eq!(view.stats().renders, 1);
        assert!(view.parent().is_none());
        assert!(view.definition().ptr_eq(&menu));
    }

    #[test]
    fn title_override_wins() {
        let menu = Menu::builder().with_title("Default").build().unwrap();
        let viewer = Recorder::new(1);
        let view = menu.open_titled(viewer.clone(), "Custom");
        assert_eq!(view.title(), "Custom");
        assert_eq!(viewer.last_title().as_deref(), Some("Custom"));
        assert_eq!(menu.title(), "Default");
    }

    #[test]
    fn close_is_idempotent_and_dismisses_once() {
        let closes = Rc::new(Cell::new(0));
        let inner = Rc::clone(&closes);
        let menu = Menu::builder()
            .add_close_handler(move |_, _| {
                inner.set(inner.get() + 1);
                Ok(())
            })
            .build()
            .unwrap();
        let viewer = Recorder::new(1);
        let view = menu.open(viewer.clone());

        assert!(view.close());
        assert!(!view.close());
        assert!(!view.dismissed());
        assert_eq!(closes.get(), 1);
        assert_eq!(viewer.dismissals(), 1);
        assert_eq!(view.status(), ViewStatus::Closed);
        assert_eq!(view.stats().close, Some(CloseReport { ran: 1, failed: 0 }));
    }

    #[test]
    fn dismissed_skips_viewer_dismiss() {
        let menu = Menu::builder().build().unwrap();
        let viewer = Recorder::new(1);
        let view = menu.open(viewer.clone());
        assert!(view.dismissed());
        assert_eq!(viewer.dismissals(), 0);
        assert!(!view.is_open());
    }

    #[test]
    fn refresh_after_close_is_noop() {
        let menu = Menu::builder().build().unwrap();
        let viewer = Recorder::new(1);
        let view = menu.open(viewer.clone());
        view.close();
        assert_eq!(view.refresh(), RenderOutcome::Closed);
        assert_eq!(viewer.present_count(), 1);
    }

    #[test]
    fn failed_initial_render_presents_blank() {
        let menu = Menu::builder()
            .with_rows(2)
            .add_transform(|_, _, _| Err(HandlerError::new("database down")))
            .build()
            .unwrap();
        let viewer = Recorder::new(1);
        let view = menu.open(viewer.clone());

        assert!(view.is_open());
        assert_eq!(viewer.last_pane(), Some(GridPane::blank(2, 9)));
        assert_eq!(view.stats().failed_renders, 1);
        assert_eq!(view.stats().renders, 0);
    }

    #[test]
    fn failed_rerender_keeps_previous_pane() {
        let fail = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fail);
        let menu = Menu::builder()
            .add_transform(move |mut pane, _, _| {
                if flag.get() {
                    return Err(HandlerError::new("out of stock"));
                }
                pane.set(Slot::new(1, 0), Element::new("apple"));
                Ok(pane)
            })
            .build()
            .unwrap();
        let viewer = Recorder::new(1);
        let view = menu.open(viewer.clone());

        fail.set(true);
        assert_eq!(view.refresh(), RenderOutcome::Failed);
        assert!(view.is_open());
        assert_eq!(label(&view.pane(), 1, 0).as_deref(), Some("apple"));
        assert_eq!(viewer.present_count(), 1);

        fail.set(false);
        assert_eq!(view.refresh(), RenderOutcome::Rendered);
        assert_eq!(viewer.present_count(), 2);
    }

    #[test]
    fn ticks_rerender_until_closed() {
        let ticks = Rc::new(TickLoop::new());
        let scheduler: Rc<dyn TickScheduler> = ticks.clone();
        let menu = Menu::builder()
            .with_updates(true, 2)
            .with_scheduler(scheduler)
            .build()
            .unwrap();
        let viewer = Recorder::new(1);
        let view = menu.open(viewer.clone());
        let task = view.update_task().unwrap();
        assert!(ticks.is_scheduled(task));

        ticks.advance(4);
        assert_eq!(viewer.present_count(), 3);

        view.close();
        assert!(!ticks.is_scheduled(task));
        assert_eq!(view.update_task(), None);
        ticks.advance(4);
        assert_eq!(viewer.present_count(), 3);
    }

    #[test]
    fn dropping_last_handle_cancels_updates() {
        let ticks = Rc::new(TickLoop::new());
        let scheduler: Rc<dyn TickScheduler> = ticks.clone();
        let menu = Menu::builder()
            .with_updates(true, 1)
            .with_scheduler(scheduler)
            .build()
            .unwrap();
        let view = menu.open(Recorder::new(1));
        assert_eq!(ticks.active_tasks(), 1);
        drop(view);
        assert_eq!(ticks.active_tasks(), 0);
    }

    #[test]
    fn refresh_during_render_is_coalesced() {
        let slot: Rc<RefCell<Option<MenuView>>> = Rc::default();
        let passes = Rc::new(Cell::new(0));
        let (inner_slot, inner_passes) = (Rc::clone(&slot), Rc::clone(&passes));
        let menu = Menu::builder()
            .add_transform(move |pane, _, _| {
                inner_passes.set(inner_passes.get() + 1);
                if inner_passes.get() == 2 {
                    let view = inner_slot.borrow().clone();
                    if let Some(view) = view {
                        assert_eq!(view.refresh(), RenderOutcome::Skipped);
                    }
                }
                Ok(pane)
            })
            .build()
            .unwrap();
        let viewer = Recorder::new(1);
        let view = menu.open(viewer.clone());
        *slot.borrow_mut() = Some(view.clone());

        assert_eq!(view.refresh(), RenderOutcome::Rendered);
        assert_eq!(passes.get(), 3);
        assert_eq!(view.stats().renders, 3);
        assert_eq!(viewer.present_count(), 3);
        slot.borrow_mut().take();
    }

    #[test]
    fn close_during_render_discards_result() {
        let slot: Rc<RefCell<Option<MenuView>>> = Rc::default();
        let passes = Rc::new(Cell::new(0));
        let (inner_slot, inner_passes) = (Rc::clone(&slot), Rc::clone(&passes));
        let menu = Menu::builder()
            .add_transform(move |pane, _, _| {
                inner_passes.set(inner_passes.get() + 1);
                if inner_passes.get() == 2 {
                    let view = inner_slot.borrow().clone();
                    if let Some(view) = view {
                        assert!(view.close());
                    }
                }
                Ok(pane)
            })
            .build()
            .unwrap();
        let viewer = Recorder::new(1);
        let view = menu.open(viewer.clone());
        *slot.borrow_mut() = Some(view.clone());

        assert_eq!(view.refresh(), RenderOutcome::Discarded);
        assert_eq!(view.stats().discarded_renders, 1);
        assert_eq!(viewer.present_count(), 1);
        assert_eq!(viewer.dismissals(), 1);
        slot.borrow_mut().take();
    }

    #[test]
    fn child_links_to_parent() {
        let parent_menu = Menu::builder().with_title("Main").build().unwrap();
        let child_menu = Menu::builder().with_title("Sub").build().unwrap();
        let viewer = Recorder::new(5);

        let parent = parent_menu.open(viewer.clone());
        let child = parent.open_child(&child_menu, Arguments::empty());

        let link = child.parent().unwrap();
        assert_eq!(link.id(), parent.id());
        assert_eq!(link.viewer_id(), ViewerId::new(5));
        assert_eq!(link.title(), "Main");
        assert!(link.is_open());

        parent.close();
        assert_eq!(link.status(), ViewStatus::Closed);
        assert!(child.is_open());
        assert_eq!(child.viewer().id(), ViewerId::new(5));
    }

    #[test]
    fn ids_are_unique() {
        let menu = Menu::builder().build().unwrap();
        let a = menu.open(Recorder::new(1));
        let b = menu.open(Recorder::new(1));
        assert_ne!(a.id(), b.id());
        assert!(a.ptr_eq(&a.clone()));
        assert!(!a.ptr_eq(&b));
    }
}
