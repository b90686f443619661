#![forbid(unsafe_code)]

//! Core: panes, viewers, arguments, tracked properties and click events.
//!
//! # Role in pane
//! `pane-core` holds the value types every interface is built from. It does
//! not know about interfaces, views or scheduling; those live in
//! `pane-runtime`, which consumes the traits defined here.
//!
//! # Primary responsibilities
//! - **Pane**: the grid a pipeline renders into ([`pane::Pane`]), with a
//!   reference implementation in [`grid::GridPane`].
//! - **Viewer**: the identity a pane is shown to ([`viewer::Viewer`]).
//! - **Arguments**: the immutable key/value bag captured when a view opens.
//! - **Property**: tracked values whose changes re-render bound views.
//! - **ClickEvent**: the normalized click a host forwards to a view.
//! - **SurfaceConfig**: legal dimensions of the host surface.

pub mod arguments;
pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod grid;
pub mod pane;
pub mod property;
#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;
pub mod viewer;

pub use arguments::{ArgumentKey, Arguments, ArgumentsBuilder};
pub use config::{SurfaceConfig, SurfaceConfigError};
pub use error::{ConfigurationError, HandlerError, HandlerFault};
pub use event::{ClickEvent, ClickKind, Modifiers};
pub use geometry::Slot;
pub use grid::GridPane;
pub use pane::{Element, ElementAction, Pane};
pub use property::{Property, PropertyId, PropertyKey, Watch};
pub use viewer::{Viewer, ViewerId};
