#![forbid(unsafe_code)]

//! Pane public facade crate.
//!
//! This crate provides the stable surface area for users. It re-exports the
//! common types from `pane-core` and `pane-runtime` and offers a prelude for
//! day-to-day use.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use pane_core::{
    ArgumentKey, Arguments, ArgumentsBuilder, ClickEvent, ClickKind, ConfigurationError, Element,
    GridPane, HandlerError, Modifiers, Pane, Property, PropertyKey, Slot, SurfaceConfig,
    SurfaceConfigError, Viewer, ViewerId,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use pane_runtime::{
    Builder, ClickContext, ClickHandler, ClickOutcome, CloseHandler, Interface, RenderOutcome,
    TickLoop, TickScheduler, View, ViewStatus,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for pane applications.
#[derive(Debug)]
pub enum Error {
    /// An interface definition failed validation.
    Configuration(ConfigurationError),
    /// A surface configuration could not be loaded.
    Surface(SurfaceConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(err) => write!(f, "invalid interface: {err}"),
            Self::Surface(err) => write!(f, "invalid surface: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Configuration(err) => Some(err),
            Self::Surface(err) => Some(err),
        }
    }
}

impl From<ConfigurationError> for Error {
    fn from(err: ConfigurationError) -> Self {
        Self::Configuration(err)
    }
}

impl From<SurfaceConfigError> for Error {
    fn from(err: SurfaceConfigError) -> Self {
        Self::Surface(err)
    }
}

/// Standard result type for pane APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ArgumentKey, Arguments, ClickEvent, Element, Error, GridPane, HandlerError, Pane, Property,
        Result, Slot, Viewer, ViewerId,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{ClickHandler, ClickOutcome, Interface, TickLoop, TickScheduler, View};

    pub use crate::core;
    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}

pub use pane_core as core;
#[cfg(feature = "runtime")]
pub use pane_runtime as runtime;
