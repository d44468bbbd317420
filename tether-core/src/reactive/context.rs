//! Session Context
//!
//! The session context links reactive state to the page render that created
//! it. Signals hold a clone of the context and call
//! [`SessionContext::request_rerender`] when their value changes.
//!
//! # Lifecycle
//!
//! A context is created when a page request arrives and stays active until
//! [`SessionContext::close`] is called, which happens when the live connection
//! ends or a pending session expires. Creating reactive state against a closed
//! context fails with [`Error::InactiveSession`].
//!
//! The re-render callback captures the renderer, which captures the view tree,
//! which captures the signals, which capture this context. Closing the context
//! drops the callback and breaks that cycle.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use super::{Ref, Signal};
use crate::error::{Error, Result};

type RerenderFn = Arc<dyn Fn() + Send + Sync>;

/// Per-request state shared by every signal a page creates.
///
/// Cloning is cheap and yields a handle to the same context.
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    active: AtomicBool,
    rerender: Mutex<Option<RerenderFn>>,
}

impl SessionContext {
    /// Create a new, active context with no re-render subscriber.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ContextInner {
                active: AtomicBool::new(true),
                rerender: Mutex::new(None),
            }),
        }
    }

    /// Whether reactive state may still be created against this context.
    pub fn is_active(&self) -> bool {
        self.inner.active.load(Ordering::Acquire)
    }

    pub(crate) fn ensure_active(&self) -> Result<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(Error::InactiveSession)
        }
    }

    /// Create a signal owned by this context.
    pub fn signal<T>(&self, value: T) -> Result<Signal<T>>
    where
        T: Clone + PartialEq + Send + Sync + 'static,
    {
        Signal::new(self, value)
    }

    /// Create a ref owned by this context.
    pub fn reference<T>(&self, value: T) -> Result<Ref<T>>
    where
        T: Send + Sync + 'static,
    {
        Ref::new(self, value)
    }

    /// Install the re-render subscriber, replacing any previous one.
    pub fn on_rerender<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.inner.rerender.lock() = Some(Arc::new(callback));
    }

    /// Ask the subscriber, if any, to re-render.
    ///
    /// The subscriber runs synchronously on the caller's task.
    pub fn request_rerender(&self) {
        // Clone out of the lock so the subscriber may replace itself.
        let callback = self.inner.rerender.lock().clone();
        if let Some(callback) = callback {
            callback();
        }
    }

    /// Whether a re-render subscriber is installed.
    pub fn has_subscriber(&self) -> bool {
        self.inner.rerender.lock().is_some()
    }

    /// End the session: drop the subscriber and refuse new reactive state.
    pub fn close(&self) {
        self.inner.active.store(false, Ordering::Release);
        self.inner.rerender.lock().take();
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("active", &self.is_active())
            .field("subscribed", &self.has_subscriber())
            .finish()
    }
}
