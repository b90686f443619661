#![forbid(unsafe_code)]

//! Transforms and the ordered pipeline they form.
//!
//! A transform maps `(pane, viewer, arguments)` to a new pane. Each one is
//! wrapped in a [`TransformContext`] that adds a priority and an optional
//! tracked property. A [`Pipeline`] keeps contexts sorted by ascending
//! priority with ties in insertion order; rendering folds the pipeline over a
//! blank pane in that order.
//!
//! # Invariants
//!
//! 1. Stage order is `(priority, insertion order)` and is fixed when a stage
//!    is added; nothing re-sorts a pipeline afterwards.
//! 2. Adding a stage yields a new pipeline; the original is unchanged. The
//!    two share structure through a persistent vector.
//! 3. A render pass stops at the first failing stage and reports it; no
//!    partially transformed pane escapes.

use std::fmt;
use std::rc::Rc;

use pane_core::{Arguments, HandlerError, PropertyKey};

use crate::boundary;

/// Priority given to transforms added without one.
pub const DEFAULT_PRIORITY: i32 = 1;

/// Shared transform function.
pub type TransformFn<P, V> = Rc<dyn Fn(P, &V, &Arguments) -> Result<P, HandlerError>>;

/// A transform bound to a priority and an optional tracked property.
pub struct TransformContext<P, V> {
    property: PropertyKey,
    priority: i32,
    transform: TransformFn<P, V>,
}

// Manual Clone: only the Rc is cloned.
impl<P, V> Clone for TransformContext<P, V> {
    fn clone(&self) -> Self {
        Self {
            property: self.property.clone(),
            priority: self.priority,
            transform: Rc::clone(&self.transform),
        }
    }
}

impl<P, V> fmt::Debug for TransformContext<P, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformContext")
            .field("property", &self.property)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

impl<P, V> TransformContext<P, V> {
    /// Bind `transform` to `property` at `priority`.
    pub fn new(
        property: PropertyKey,
        priority: i32,
        transform: impl Fn(P, &V, &Arguments) -> Result<P, HandlerError> + 'static,
    ) -> Self {
        Self {
            property,
            priority,
            transform: Rc::new(transform),
        }
    }

    /// A transform bound to nothing.
    pub fn untracked(
        priority: i32,
        transform: impl Fn(P, &V, &Arguments) -> Result<P, HandlerError> + 'static,
    ) -> Self {
        Self::new(PropertyKey::untracked(), priority, transform)
    }

    /// The tracked property, or the untracked sentinel.
    #[must_use]
    pub fn property(&self) -> &PropertyKey {
        &self.property
    }

    /// Execution priority; lower runs first.
    #[must_use]
    pub const fn priority(&self) -> i32 {
        self.priority
    }

    /// Returns `true` if bound to a property.
    #[must_use]
    pub fn is_tracked(&self) -> bool {
        self.property.is_tracked()
    }

    /// The transform function itself.
    #[must_use]
    pub fn transform(&self) -> &TransformFn<P, V> {
        &self.transform
    }

    /// Apply the transform.
    pub fn apply(&self, pane: P, viewer: &V, arguments: &Arguments) -> Result<P, HandlerError> {
        (self.transform)(pane, viewer, arguments)
    }
}

/// The stage that aborted a render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageFailure {
    /// Position of the stage in the pipeline.
    pub index: usize,
    /// Priority of the stage.
    pub priority: i32,
    /// What went wrong.
    pub error: HandlerError,
}

impl fmt::Display for StageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "transform {} (priority {}) failed: {}",
            self.index, self.priority, self.error
        )
    }
}

impl std::error::Error for StageFailure {}

/// Immutable, ordered sequence of transform contexts.
pub struct Pipeline<P, V> {
    stages: im::Vector<TransformContext<P, V>>,
}

impl<P, V> Clone for Pipeline<P, V> {
    fn clone(&self) -> Self {
        Self {
            stages: self.stages.clone(),
        }
    }
}

impl<P, V> Default for Pipeline<P, V> {
    fn default() -> Self {
        Self {
            stages: im::Vector::new(),
        }
    }
}

impl<P, V> fmt::Debug for Pipeline<P, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.stages.iter()).finish()
    }
}

impl<P, V> Pipeline<P, V> {
    /// An empty pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A new pipeline with `stage` inserted after every stage of lower or
    /// equal priority.
    #[must_use]
    pub fn with_stage(&self, stage: TransformContext<P, V>) -> Self {
        let mut stages = self.stages.clone();
        let at = stages
            .iter()
            .position(|existing| existing.priority > stage.priority)
            .unwrap_or(stages.len());
        stages.insert(at, stage);
        Self { stages }
    }

    /// Number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns `true` if there are no stages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Stage at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&TransformContext<P, V>> {
        self.stages.get(index)
    }

    /// Iterate stages in execution order.
    pub fn iter(&self) -> impl Iterator<Item = &TransformContext<P, V>> + '_ {
        self.stages.iter()
    }

    /// Stage priorities in execution order.
    #[must_use]
    pub fn priorities(&self) -> Vec<i32> {
        self.stages.iter().map(TransformContext::priority).collect()
    }

    /// Distinct tracked properties, in first-use order.
    #[must_use]
    pub fn tracked_keys(&self) -> Vec<PropertyKey> {
        let mut keys: Vec<PropertyKey> = Vec::new();
        for stage in self.stages.iter().filter(|s| s.is_tracked()) {
            if !keys.contains(&stage.property) {
                keys.push(stage.property.clone());
            }
        }
        keys
    }

    /// Fold every stage over `blank`, in order.
    pub fn render(&self, blank: P, viewer: &V, arguments: &Arguments) -> Result<P, StageFailure> {
        let mut pane = blank;
        for (index, stage) in self.stages.iter().enumerate() {
            pane = boundary::guard(|| stage.apply(pane, viewer, arguments)).map_err(|error| {
                StageFailure {
                    index,
                    priority: stage.priority,
                    error,
                }
            })?;
        }
        tracing::trace!(target: "pane.render", stages = self.stages.len(), "pipeline folded");
        Ok(pane)
    }
}
