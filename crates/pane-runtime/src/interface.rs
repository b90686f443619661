#![forbid(unsafe_code)]

//! Interface definitions and their copy-on-write builder.
//!
//! An [`Interface`] is an immutable, shareable description of a menu: its
//! size, title, transform pipeline, update policy, click handler and close
//! handlers. It is produced by a [`Builder`] and can be opened any number of
//! times, for any number of viewers; each open yields an independent
//! [`View`].
//!
//! # Builder semantics
//!
//! Every wither takes `&self` and returns a new builder. Collections are
//! persistent vectors, so the original builder is unaffected and the two share
//! structure. [`Builder::build`] validates and freezes the current state.

use std::fmt;
use std::rc::Rc;

use pane_core::{Arguments, ConfigurationError, HandlerError, Pane, PropertyKey, SurfaceConfig, Viewer};

use crate::click::ClickHandler;
use crate::close::CloseHandler;
use crate::scheduler::TickScheduler;
use crate::transform::{DEFAULT_PRIORITY, Pipeline, TransformContext};
use crate::view::View;

struct Definition<P, V> {
    rows: u16,
    title: String,
    pipeline: Pipeline<P, V>,
    close_handlers: im::Vector<CloseHandler<P, V>>,
    updates: bool,
    update_delay: u32,
    click_handler: ClickHandler<P, V>,
    scheduler: Option<Rc<dyn TickScheduler>>,
    surface: SurfaceConfig,
}

impl<P, V> Clone for Definition<P, V> {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows,
            title: self.title.clone(),
            pipeline: self.pipeline.clone(),
            close_handlers: self.close_handlers.clone(),
            updates: self.updates,
            update_delay: self.update_delay,
            click_handler: self.click_handler.clone(),
            scheduler: self.scheduler.clone(),
            surface: self.surface,
        }
    }
}

impl<P: 'static, V: 'static> Default for Definition<P, V> {
    fn default() -> Self {
        Self {
            rows: 1,
            title: String::new(),
            pipeline: Pipeline::new(),
            close_handlers: im::Vector::new(),
            updates: false,
            update_delay: 1,
            click_handler: ClickHandler::cancel(),
            scheduler: None,
            surface: SurfaceConfig::default(),
        }
    }
}

impl<P, V> fmt::Debug for Definition<P, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("rows", &self.rows)
            .field("title", &self.title)
            .field("transforms", &self.pipeline.len())
            .field("close_handlers", &self.close_handlers.len())
            .field("updates", &self.updates)
            .field("update_delay", &self.update_delay)
            .field("scheduler", &self.scheduler.is_some())
            .field("surface", &self.surface)
            .finish()
    }
}

/// Read accessors shared by [`Interface`] and [`Builder`].
macro_rules! definition_accessors {
    ($field:ident) => {
        /// Number of rows.
        #[must_use]
        pub fn rows(&self) -> u16 {
            self.$field.rows
        }

        /// Default title.
        #[must_use]
        pub fn title(&self) -> &str {
            &self.$field.title
        }

        /// The transform pipeline, in execution order.
        #[must_use]
        pub fn transformations(&self) -> Pipeline<P, V> {
            self.$field.pipeline.clone()
        }

        /// Close handlers, in registration order.
        #[must_use]
        pub fn close_handlers(&self) -> im::Vector<CloseHandler<P, V>> {
            self.$field.close_handlers.clone()
        }

        /// Whether views re-render on a timer.
        #[must_use]
        pub fn updates(&self) -> bool {
            self.$field.updates
        }

        /// Ticks between timed re-renders.
        #[must_use]
        pub fn update_delay(&self) -> u32 {
            self.$field.update_delay
        }

        /// The interface-level click handler.
        #[must_use]
        pub fn click_handler(&self) -> ClickHandler<P, V> {
            self.$field.click_handler.clone()
        }

        /// Pane width, from the surface config.
        #[must_use]
        pub fn columns(&self) -> u16 {
            self.$field.surface.columns
        }

        /// Surface limits the definition is validated against.
        #[must_use]
        pub fn surface(&self) -> SurfaceConfig {
            self.$field.surface
        }

        /// The scheduler that drives timed re-renders.
        #[must_use]
        pub fn scheduler(&self) -> Option<Rc<dyn TickScheduler>> {
            self.$field.scheduler.clone()
        }
    };
}

/// Immutable interface definition.
///
/// Cloning is cheap and shares the definition.
pub struct Interface<P, V> {
    inner: Rc<Definition<P, V>>,
}

impl<P, V> Clone for Interface<P, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<P, V> fmt::Debug for Interface<P, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Interface").field(&self.inner).finish()
    }
}

impl<P, V> Interface<P, V> {
    definition_accessors!(inner);

    /// Returns `true` if both handles share one definition.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn pipeline(&self) -> &Pipeline<P, V> {
        &self.inner.pipeline
    }

    pub(crate) fn close_handler_list(&self) -> &im::Vector<CloseHandler<P, V>> {
        &self.inner.close_handlers
    }

    pub(crate) fn scheduler_ref(&self) -> Option<&Rc<dyn TickScheduler>> {
        self.inner.scheduler.as_ref()
    }
}

impl<P: Pane, V: Viewer<P>> Interface<P, V> {
    /// Start a new definition from defaults.
    #[must_use]
    pub fn builder() -> Builder<P, V> {
        Builder::default()
    }

    /// Open a view for `viewer` with no arguments.
    #[must_use = "dropping the view closes it"]
    pub fn open(&self, viewer: V) -> View<P, V> {
        View::open(self.clone(), viewer, Arguments::empty(), None, None)
    }

    /// Open a view for `viewer` with the given arguments.
    #[must_use = "dropping the view closes it"]
    pub fn open_with(&self, viewer: V, arguments: Arguments) -> View<P, V> {
        View::open(self.clone(), viewer, arguments, None, None)
    }

    /// Open a view under a title that overrides the definition's.
    #[must_use = "dropping the view closes it"]
    pub fn open_titled(&self, viewer: V, title: impl Into<String>) -> View<P, V> {
        View::open(self.clone(), viewer, Arguments::empty(), Some(title.into()), None)
    }

    /// Open a view with arguments and an overriding title.
    #[must_use = "dropping the view closes it"]
    pub fn open_with_title(
        &self,
        viewer: V,
        arguments: Arguments,
        title: impl Into<String>,
    ) -> View<P, V> {
        View::open(self.clone(), viewer, arguments, Some(title.into()), None)
    }

    /// Open a view for the same viewer as `parent`, linked back to it.
    #[must_use = "dropping the view closes it"]
    pub fn open_child<Q>(&self, parent: &View<Q, V>, arguments: Arguments) -> View<P, V>
    where
        Q: Pane,
        V: Viewer<Q>,
    {
        View::open(
            self.clone(),
            parent.viewer().clone(),
            arguments,
            None,
            Some(parent.as_parent()),
        )
    }
}

/// Copy-on-write builder for [`Interface`].
pub struct Builder<P, V> {
    state: Definition<P, V>,
}

impl<P, V> Clone for Builder<P, V> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<P: 'static, V: 'static> Default for Builder<P, V> {
    fn default() -> Self {
        Self {
            state: Definition::default(),
        }
    }
}

impl<P, V> fmt::Debug for Builder<P, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Builder").field(&self.state).finish()
    }
}

impl<P, V> Builder<P, V> {
    definition_accessors!(state);

    fn derive(&self, edit: impl FnOnce(&mut Definition<P, V>)) -> Self {
        let mut state = self.state.clone();
        edit(&mut state);
        Self { state }
    }

    /// Set the row count.
    #[must_use]
    pub fn with_rows(&self, rows: u16) -> Self {
        self.derive(|d| d.rows = rows)
    }

    /// Set the default title.
    #[must_use]
    pub fn with_title(&self, title: impl Into<String>) -> Self {
        let title = title.into();
        self.derive(|d| d.title = title)
    }

    /// Enable or disable timed re-renders every `delay` ticks.
    #[must_use]
    pub fn with_updates(&self, enabled: bool, delay: u32) -> Self {
        self.derive(|d| {
            d.updates = enabled;
            d.update_delay = delay;
        })
    }

    /// Replace the click handler.
    #[must_use]
    pub fn with_click_handler(&self, handler: ClickHandler<P, V>) -> Self {
        self.derive(|d| d.click_handler = handler)
    }

    /// Add an untracked transform at the default priority.
    #[must_use]
    pub fn add_transform(
        &self,
        transform: impl Fn(P, &V, &Arguments) -> Result<P, HandlerError> + 'static,
    ) -> Self {
        self.add_context(TransformContext::untracked(DEFAULT_PRIORITY, transform))
    }

    /// Add a transform bound to `property` at `priority`.
    #[must_use]
    pub fn add_tracked_transform(
        &self,
        property: impl Into<PropertyKey>,
        priority: i32,
        transform: impl Fn(P, &V, &Arguments) -> Result<P, HandlerError> + 'static,
    ) -> Self {
        self.add_context(TransformContext::new(property.into(), priority, transform))
    }

    /// Add a prepared transform context.
    #[must_use]
    pub fn add_context(&self, context: TransformContext<P, V>) -> Self {
        self.derive(|d| d.pipeline = d.pipeline.with_stage(context))
    }

    /// Append a close handler.
    #[must_use]
    pub fn add_close_handler(
        &self,
        handler: impl Fn(&P, &V) -> Result<(), HandlerError> + 'static,
    ) -> Self {
        let handler = CloseHandler::new(handler);
        self.derive(|d| d.close_handlers.push_back(handler))
    }

    /// Set the scheduler used for timed re-renders.
    #[must_use]
    pub fn with_scheduler(&self, scheduler: Rc<dyn TickScheduler>) -> Self {
        self.derive(|d| d.scheduler = Some(scheduler))
    }

    /// Validate against a different surface.
    #[must_use]
    pub fn with_surface(&self, surface: SurfaceConfig) -> Self {
        self.derive(|d| d.surface = surface)
    }

    /// Validate and freeze the current state.
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::InvalidSurface`] if the surface config is
    ///   inconsistent.
    /// - [`ConfigurationError::RowsOutOfRange`] if the row count is outside
    ///   the surface limits.
    /// - [`ConfigurationError::ZeroUpdateDelay`] if updates are enabled with
    ///   a delay of 0.
    /// - [`ConfigurationError::MissingScheduler`] if updates are enabled
    ///   without a scheduler.
    pub fn build(&self) -> Result<Interface<P, V>, ConfigurationError> {
        let d = &self.state;
        d.surface.check_rows(d.rows)?;
        if d.updates {
            if d.update_delay == 0 {
                return Err(ConfigurationError::ZeroUpdateDelay);
            }
            if d.scheduler.is_none() {
                return Err(ConfigurationError::MissingScheduler);
            }
        }
        tracing::debug!(
            target: "pane.interface",
            rows = d.rows,
            title = %d.title,
            transforms = d.pipeline.len(),
            close_handlers = d.close_handlers.len(),
            updates = d.updates,
            update_delay = d.update_delay,
            "interface built"
        );
        Ok(Interface {
            inner: Rc::new(d.clone()),
        })
    }
}
