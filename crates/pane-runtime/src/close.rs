#![forbid(unsafe_code)]

//! Close handlers and their dispatch.

use std::fmt;
use std::rc::Rc;

use pane_core::{HandlerError, Viewer};

use crate::boundary::{self, HandlerKind};
use crate::view::ViewId;

/// Callback run once when a view closes, with its final pane and viewer.
pub struct CloseHandler<P, V> {
    handler: Rc<dyn Fn(&P, &V) -> Result<(), HandlerError>>,
}

impl<P, V> Clone for CloseHandler<P, V> {
    fn clone(&self) -> Self {
        Self {
            handler: Rc::clone(&self.handler),
        }
    }
}

impl<P, V> fmt::Debug for CloseHandler<P, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloseHandler").finish_non_exhaustive()
    }
}

impl<P, V> CloseHandler<P, V> {
    /// Wrap a close callback.
    pub fn new(handler: impl Fn(&P, &V) -> Result<(), HandlerError> + 'static) -> Self {
        Self {
            handler: Rc::new(handler),
        }
    }

    /// Run the callback directly, without fault containment.
    pub fn invoke(&self, pane: &P, viewer: &V) -> Result<(), HandlerError> {
        (self.handler)(pane, viewer)
    }
}

/// Result of running a view's close handlers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CloseReport {
    /// Handlers invoked.
    pub ran: usize,
    /// Handlers that returned `Err` or panicked.
    pub failed: usize,
}

/// Run every handler in order. A failure is logged and the rest still run.
pub(crate) fn dispatch_close<P, V: Viewer<P>>(
    handlers: &im::Vector<CloseHandler<P, V>>,
    pane: &P,
    viewer: &V,
    view: ViewId,
) -> CloseReport {
    let mut report = CloseReport::default();
    for handler in handlers.iter() {
        report.ran += 1;
        if let Err(err) = boundary::guard(|| handler.invoke(pane, viewer)) {
            report.failed += 1;
            boundary::report(HandlerKind::Close, view, viewer.id(), &err);
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use pane_core::testing::RecordingViewer;
    use std::cell::RefCell;

    type Recorder = RecordingViewer<u32>;

    #[test]
    fn runs_in_order_and_survives_failures() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (a, b) = (Rc::clone(&log), Rc::clone(&log));
        let handlers: im::Vector<CloseHandler<u32, Recorder>> = im::vector![
            CloseHandler::new(move |pane: &u32, _: &Recorder| {
                a.borrow_mut().push(*pane);
                Ok(())
            }),
            CloseHandler::new(|_: &u32, _: &Recorder| Err(HandlerError::new("refund failed"))),
            CloseHandler::new(|_: &u32, _: &Recorder| -> Result<(), HandlerError> {
                panic!("inventory gone")
            }),
            CloseHandler::new(move |pane: &u32, _: &Recorder| {
                b.borrow_mut().push(pane + 1);
                Ok(())
            }),
        ];

        let viewer = Recorder::new(3);
        let report = dispatch_close(&handlers, &7, &viewer, ViewId::next());
        assert_eq!(report, CloseReport { ran: 4, failed: 2 });
        assert_eq!(*log.borrow(), vec![7, 8]);
    }

    #[test]
    fn handler_sees_viewer() {
        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        let handler = CloseHandler::new(move |_: &u32, viewer: &Recorder| {
            *sink.borrow_mut() = Some(viewer.id());
            Ok(())
        });
        handler.invoke(&0, &Recorder::new(11)).unwrap();
        assert_eq!(*seen.borrow(), Some(pane_core::ViewerId::new(11)));
    }

    #[test]
    fn empty_list_runs_nothing() {
        let handlers: im::Vector<CloseHandler<u32, Recorder>> = im::Vector::new();
        let report = dispatch_close(&handlers, &0, &Recorder::new(1), ViewId::next());
        assert_eq!(report, CloseReport::default());
    }
}
