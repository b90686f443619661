#![forbid(unsafe_code)]

//! Immutable argument bags captured when a view opens.
//!
//! Arguments are looked up with typed [`ArgumentKey`]s, so a transform that
//! reads `ArgumentKey<u32>` gets a `&u32` back or nothing at all; a value
//! stored under the same name with a different type is treated as absent.
//!
//! ```
//! use pane_core::arguments::{ArgumentKey, Arguments};
//!
//! const PAGE: ArgumentKey<u32> = ArgumentKey::new("page");
//!
//! let args = Arguments::builder().with(PAGE, 3).build();
//! assert_eq!(args.get(&PAGE), Some(&3));
//! ```

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use ahash::AHashMap;

/// A typed, named key into an [`Arguments`] bag.
pub struct ArgumentKey<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ArgumentKey<T> {
    /// Create a key with the given name.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    /// The key's name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

// Manual impls: `T` itself need not be Clone/Copy/Debug.
impl<T> Clone for ArgumentKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ArgumentKey<T> {}

impl<T> fmt::Debug for ArgumentKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ArgumentKey").field(&self.name).finish()
    }
}

/// An immutable key/value bag.
///
/// Cloning shares the underlying map; there is no way to mutate a bag once
/// it has been built.
#[derive(Clone, Default)]
pub struct Arguments {
    values: Rc<AHashMap<&'static str, Rc<dyn Any>>>,
}

impl Arguments {
    /// The empty bag.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Start building a bag.
    #[must_use]
    pub fn builder() -> ArgumentsBuilder {
        ArgumentsBuilder::default()
    }

    /// Look up a value by key.
    ///
    /// Returns `None` if the key is missing or holds a value of another type.
    #[must_use]
    pub fn get<T: 'static>(&self, key: &ArgumentKey<T>) -> Option<&T> {
        self.values.get(key.name).and_then(|v| v.downcast_ref::<T>())
    }

    /// Look up a value, falling back to `default`.
    #[must_use]
    pub fn get_or<'a, T: 'static>(&'a self, key: &ArgumentKey<T>, default: &'a T) -> &'a T {
        self.get(key).unwrap_or(default)
    }

    /// Returns `true` if a value of the key's type is present.
    #[must_use]
    pub fn contains<T: 'static>(&self, key: &ArgumentKey<T>) -> bool {
        self.get(key).is_some()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the bag holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Stored key names, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys: Vec<_> = self.values.keys().copied().collect();
        keys.sort_unstable();
        keys
    }
}

impl fmt::Debug for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arguments")
            .field("keys", &self.keys())
            .finish()
    }
}

/// Builder for [`Arguments`].
#[derive(Default)]
pub struct ArgumentsBuilder {
    values: AHashMap<&'static str, Rc<dyn Any>>,
}

impl ArgumentsBuilder {
    /// Store a value, replacing any previous value under the same name.
    #[must_use]
    pub fn with<T: 'static>(mut self, key: ArgumentKey<T>, value: T) -> Self {
        self.values.insert(key.name, Rc::new(value));
        self
    }

    /// Freeze the bag.
    #[must_use]
    pub fn build(self) -> Arguments {
        Arguments {
            values: Rc::new(self.values),
        }
    }
}
