#![forbid(unsafe_code)]

//! Error types.
//!
//! [`ConfigurationError`] is the only error that reaches application code:
//! it is returned when an interface definition cannot be built. Everything a
//! transform or handler produces at runtime is a [`HandlerError`], which the
//! runtime contains and logs at its dispatch boundaries.

use std::any::Any;
use std::fmt;

/// Invalid interface configuration detected at build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Row count outside the legal range of the host surface.
    RowsOutOfRange {
        /// Requested rows.
        rows: u16,
        /// Smallest legal row count.
        min: u16,
        /// Largest legal row count.
        max: u16,
    },
    /// Updates were enabled with a delay of zero ticks.
    ZeroUpdateDelay,
    /// Updates were enabled but no tick scheduler was supplied.
    MissingScheduler,
    /// The surface configuration itself is inconsistent.
    InvalidSurface(Vec<String>),
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RowsOutOfRange { rows, min, max } => {
                write!(f, "row count {rows} is outside the legal range {min}..={max}")
            }
            Self::ZeroUpdateDelay => write!(f, "update delay must be at least 1 tick"),
            Self::MissingScheduler => {
                write!(f, "updates are enabled but no tick scheduler was supplied")
            }
            Self::InvalidSurface(errors) => {
                write!(f, "invalid surface configuration: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// How a [`HandlerError`] came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerFault {
    /// The handler returned `Err`.
    Returned,
    /// The handler panicked and the panic was caught.
    Panicked,
}

/// Failure raised inside a transform, click handler, element action or close
/// handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerError {
    message: String,
    fault: HandlerFault,
}

impl HandlerError {
    /// Create an error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fault: HandlerFault::Returned,
        }
    }

    /// Wrap any error value, keeping its display text.
    pub fn from_error(err: &dyn std::error::Error) -> Self {
        Self::new(err.to_string())
    }

    /// Convert a panic payload caught with `catch_unwind`.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        Self {
            message,
            fault: HandlerFault::Panicked,
        }
    }

    /// The error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the handler returned the error or panicked.
    #[must_use]
    pub const fn fault(&self) -> HandlerFault {
        self.fault
    }

    /// Returns `true` if this error was synthesized from a panic.
    #[must_use]
    pub const fn is_panic(&self) -> bool {
        matches!(self.fault, HandlerFault::Panicked)
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fault {
            HandlerFault::Returned => write!(f, "{}", self.message),
            HandlerFault::Panicked => write!(f, "handler panicked: {}", self.message),
        }
    }
}

impl std::error::Error for HandlerError {}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}
