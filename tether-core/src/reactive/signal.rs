//! Signal Implementation
//!
//! A Signal is the fundamental reactive primitive. It holds a value and
//! asks its session to re-render when that value changes.
//!
//! # How Signals Work
//!
//! 1. A signal is created through a [`SessionContext`] and keeps a handle to
//!    it for its whole lifetime.
//!
//! 2. [`Signal::update`] computes the next value from the current one and
//!    always commits it.
//!
//! 3. If the committed value differs from the previous one (by `PartialEq`),
//!    the context's re-render subscriber runs synchronously.
//!
//! # Views
//!
//! A signal placed in a view is read afresh on every render. [`Signal::map`]
//! produces a [`Mapped`] view of the signal that is likewise recomputed on
//! every read and never cached.

use std::fmt::{self, Debug};
use std::sync::Arc;

use super::store::{CellId, Identity, Store};
use super::SessionContext;
use crate::error::Result;
use crate::view::{Reactive, View};

/// A reactive value of type `T` owned by one session.
///
/// Clones share the same value.
///
/// # Example
///
/// ```rust,ignore
/// let count = cx.signal(0)?;
///
/// count.update(|n| n + 1);  // requests a re-render
/// count.update(|n| *n);     // equal value: no re-render
/// ```
pub struct Signal<T> {
    store: Arc<Store<T>>,
    context: SessionContext,
}

impl<T> Signal<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create a new signal owned by `context`.
    ///
    /// Fails if the context's session has already ended.
    pub fn new(context: &SessionContext, value: T) -> Result<Self> {
        context.ensure_active()?;
        Ok(Self {
            store: Arc::new(Store::new(value)),
            context: context.clone(),
        })
    }

    /// Get the signal's unique ID.
    pub fn id(&self) -> CellId {
        self.store.id()
    }

    /// Identity of the currently held value.
    pub fn identity(&self) -> Identity {
        self.store.identity()
    }

    /// Get a clone of the current value.
    pub fn get(&self) -> T {
        self.store.with(T::clone)
    }

    /// Read the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.store.with(f)
    }

    /// Update the value using a function of the current one.
    ///
    /// The result is always committed. A re-render is requested only when
    /// it differs from the previous value.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        // `f` sees a snapshot; it may read or write this signal.
        let next = self.store.with(f);
        let previous = self.store.commit(next);
        let changed = self.store.with(|current| *current != *previous);

        if changed {
            self.context.request_rerender();
        }
    }

    /// Replace the value.
    pub fn set(&self, value: T) {
        self.update(move |_| value);
    }

    /// A deferred view of this signal: `f(current value)`, recomputed on
    /// every read.
    pub fn map<U, F>(&self, f: F) -> Mapped<U>
    where
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        let signal = self.clone();
        Mapped::new(move || signal.with(&f))
    }

    /// The context this signal belongs to.
    pub fn context(&self) -> &SessionContext {
        &self.context
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            context: self.context.clone(),
        }
    }
}

impl<T> Debug for Signal<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.store.with(|value| {
            f.debug_struct("Signal")
                .field("id", &self.store.id())
                .field("value", value)
                .finish()
        })
    }
}

impl<T> Reactive for Signal<T>
where
    T: Clone + PartialEq + Into<View> + Send + Sync + 'static,
{
    fn current(&self) -> View {
        self.get().into()
    }
}

impl<T> From<Signal<T>> for View
where
    T: Clone + PartialEq + Into<View> + Send + Sync + 'static,
{
    fn from(signal: Signal<T>) -> Self {
        View::Reactive(Arc::new(signal))
    }
}

impl<T> From<&Signal<T>> for View
where
    T: Clone + PartialEq + Into<View> + Send + Sync + 'static,
{
    fn from(signal: &Signal<T>) -> Self {
        signal.clone().into()
    }
}

// ----------------------------------------------------------------------------
// Mapped
// ----------------------------------------------------------------------------

/// A zero-argument producer derived from reactive state.
///
/// Evaluated on every call; there is no cache to invalidate.
pub struct Mapped<U> {
    produce: Arc<dyn Fn() -> U + Send + Sync>,
}

impl<U> Mapped<U> {
    pub fn new<F>(produce: F) -> Self
    where
        F: Fn() -> U + Send + Sync + 'static,
    {
        Self {
            produce: Arc::new(produce),
        }
    }

    /// Compute the current value.
    pub fn get(&self) -> U {
        (self.produce)()
    }
}

impl<U> Clone for Mapped<U> {
    fn clone(&self) -> Self {
        Self {
            produce: Arc::clone(&self.produce),
        }
    }
}

impl<U> From<Mapped<U>> for View
where
    U: Into<View> + 'static,
{
    fn from(mapped: Mapped<U>) -> Self {
        View::deferred(move || mapped.get().into())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
