#![forbid(unsafe_code)]

//! Pane Runtime
//!
//! This crate turns immutable interface definitions into live, per-viewer
//! views and keeps them up to date.
//!
//! # Key Components
//!
//! - [`Builder`] - Copy-on-write builder for interface definitions
//! - [`Interface`] - Immutable, shareable definition; opens views
//! - [`Pipeline`] / [`TransformContext`] - Ordered transforms folded into a pane
//! - [`View`] - Per-viewer runtime instance with its own pane and lifecycle
//! - [`TickScheduler`] / [`TickLoop`] - Repeating tick-driven re-renders
//! - [`ClickHandler`] / [`CloseHandler`] - Click and close dispatch
//!
//! # How it fits in the system
//! `pane-core` supplies the pane, viewer, argument and event types. The host
//! owns the tick loop and forwards clicks and dismissals to views; everything
//! else happens here, on the host's thread.
//!
//! ```
//! use pane_core::{Element, GridPane, Slot};
//! use pane_core::testing::RecordingViewer;
//! use pane_runtime::Interface;
//!
//! let menu = Interface::<GridPane, RecordingViewer<GridPane>>::builder()
//!     .with_rows(3)
//!     .with_title("Menu")
//!     .add_transform(|mut pane, _viewer, _args| {
//!         pane.set(Slot::new(4, 1), Element::new("diamond"));
//!         Ok(pane)
//!     })
//!     .build()
//!     .unwrap();
//!
//! let viewer = RecordingViewer::new(1);
//! let view = menu.open(viewer.clone());
//! assert!(view.is_open());
//! assert_eq!(viewer.last_title().as_deref(), Some("Menu"));
//! view.close();
//! ```

pub mod boundary;
pub mod click;
pub mod close;
pub mod interface;
pub mod scheduler;
pub mod transform;
pub mod view;

pub use boundary::HandlerKind;
pub use click::{ClickContext, ClickHandler, ClickOutcome};
pub use close::{CloseHandler, CloseReport};
pub use interface::{Builder, Interface};
pub use scheduler::{TaskHandle, TaskStats, TickLoop, TickScheduler};
pub use transform::{DEFAULT_PRIORITY, Pipeline, StageFailure, TransformContext, TransformFn};
pub use view::{
    CloseReason, ParentView, RenderOutcome, RenderReason, View, ViewId, ViewStats, ViewStatus,
};
