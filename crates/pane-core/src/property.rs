#![forbid(unsafe_code)]

//! Tracked values that re-render the views bound to them.
//!
//! # Design
//!
//! [`Property<T>`] wraps a value in shared, reference-counted storage
//! (`Rc<RefCell<..>>`). When the value changes (determined by `PartialEq`),
//! every live watcher is notified in registration order.
//!
//! Transforms are bound to a property through its type-erased
//! [`PropertyKey`]. The key carries no value, only the identity, version and
//! watcher list, so a pipeline can hold keys of many value types.
//! [`PropertyKey::untracked`] is the sentinel for transforms bound to
//! nothing.
//!
//! # Invariants
//!
//! 1. `version` increments by exactly 1 on each value-changing mutation.
//! 2. `set(v)` where `v == current` is a no-op.
//! 3. Watchers are notified in registration order, after the value borrow
//!    is released, so a watcher may read or set the property again.
//! 4. Dropped [`Watch`] guards are pruned lazily on the next notification.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

type WatcherRc = Rc<dyn Fn()>;
type WatcherWeak = Weak<dyn Fn()>;

static NEXT_PROPERTY_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyId(u64);

impl PropertyId {
    /// Raw numeric id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "property#{}", self.0)
    }
}

/// Identity, version and watchers shared by a property and its keys.
struct Tracker {
    id: PropertyId,
    version: Cell<u64>,
    watchers: RefCell<Vec<WatcherWeak>>,
}

impl Tracker {
    fn new() -> Self {
        Self {
            id: PropertyId(NEXT_PROPERTY_ID.fetch_add(1, Ordering::Relaxed)),
            version: Cell::new(0),
            watchers: RefCell::new(Vec::new()),
        }
    }

    fn watch(&self, callback: impl Fn() + 'static) -> Watch {
        let strong: WatcherRc = Rc::new(callback);
        self.watchers.borrow_mut().push(Rc::downgrade(&strong));
        Watch {
            property: self.id,
            _guard: Box::new(strong),
        }
    }

    fn bump_and_notify(&self) {
        self.version.set(self.version.get() + 1);

        // Collect live watchers first so none of them runs under the borrow.
        let live: Vec<WatcherRc> = {
            let mut watchers = self.watchers.borrow_mut();
            watchers.retain(|w| w.strong_count() > 0);
            watchers.iter().filter_map(Weak::upgrade).collect()
        };

        tracing::trace!(
            target: "pane.property",
            property = %self.id,
            version = self.version.get(),
            watchers = live.len(),
            "property changed"
        );

        for watcher in &live {
            watcher();
        }
    }
}

/// A shared, version-tracked value with change notification.
///
/// Cloning a `Property` creates a new handle to the **same** value.
pub struct Property<T> {
    value: Rc<RefCell<T>>,
    tracker: Rc<Tracker>,
}

impl<T> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self {
            value: Rc::clone(&self.value),
            tracker: Rc::clone(&self.tracker),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("id", &self.tracker.id)
            .field("value", &*self.value.borrow())
            .field("version", &self.tracker.version.get())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Property<T> {
    /// Create a property with the given initial value at version 0.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            value: Rc::new(RefCell::new(value)),
            tracker: Rc::new(Tracker::new()),
        }
    }

    /// Get a clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Access the current value by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.borrow())
    }

    /// Set a new value. Watchers run only if the value actually changed.
    pub fn set(&self, value: T) {
        {
            let mut current = self.value.borrow_mut();
            if *current == value {
                return;
            }
            *current = value;
        }
        self.tracker.bump_and_notify();
    }

    /// Modify the value in place. Watchers run only if it changed.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let changed = {
            let mut current = self.value.borrow_mut();
            let old = current.clone();
            f(&mut current);
            *current != old
        };
        if changed {
            self.tracker.bump_and_notify();
        }
    }

    /// Current version number.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.tracker.version.get()
    }

    /// This property's identity.
    #[must_use]
    pub fn id(&self) -> PropertyId {
        self.tracker.id
    }

    /// The type-erased key transforms are bound with.
    #[must_use]
    pub fn key(&self) -> PropertyKey {
        PropertyKey {
            tracker: Some(Rc::clone(&self.tracker)),
        }
    }
}

/// Type-erased binding between a transform and a [`Property`].
#[derive(Clone, Default)]
pub struct PropertyKey {
    tracker: Option<Rc<Tracker>>,
}

impl PropertyKey {
    /// The sentinel for transforms that track nothing.
    #[must_use]
    pub const fn untracked() -> Self {
        Self { tracker: None }
    }

    /// Returns `true` unless this is the untracked sentinel.
    #[must_use]
    pub fn is_tracked(&self) -> bool {
        self.tracker.is_some()
    }

    /// Identity of the bound property.
    #[must_use]
    pub fn id(&self) -> Option<PropertyId> {
        self.tracker.as_ref().map(|t| t.id)
    }

    /// Version of the bound property.
    #[must_use]
    pub fn version(&self) -> Option<u64> {
        self.tracker.as_ref().map(|t| t.version.get())
    }

    /// Run `callback` every time the bound property changes.
    ///
    /// Returns `None` for the untracked sentinel. Dropping the returned guard
    /// stops the notifications.
    pub fn watch(&self, callback: impl Fn() + 'static) -> Option<Watch> {
        self.tracker.as_ref().map(|t| t.watch(callback))
    }

    /// Number of live watchers.
    #[must_use]
    pub fn watcher_count(&self) -> usize {
        self.tracker.as_ref().map_or(0, |t| {
            t.watchers
                .borrow()
                .iter()
                .filter(|w| w.strong_count() > 0)
                .count()
        })
    }
}

impl PartialEq for PropertyKey {
    fn eq(&self, other: &Self) -> bool {
        match (&self.tracker, &other.tracker) {
            (None, None) => true,
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for PropertyKey {}

impl fmt::Debug for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id() {
            Some(id) => f.debug_tuple("PropertyKey").field(&id).finish(),
            None => f.write_str("PropertyKey(untracked)"),
        }
    }
}

impl<T: Clone + PartialEq + 'static> From<&Property<T>> for PropertyKey {
    fn from(property: &Property<T>) -> Self {
        property.key()
    }
}

/// RAII guard for a property watcher.
///
/// Dropping the guard drops the callback; the property prunes the dead entry
/// on its next notification.
pub struct Watch {
    property: PropertyId,
    _guard: Box<dyn std::any::Any>,
}

impl Watch {
    /// The watched property.
    #[must_use]
    pub fn property(&self) -> PropertyId {
        self.property
    }
}

impl fmt::Debug for Watch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watch")
            .field("property", &self.property)
            .finish_non_exhaustive()
    }
}
