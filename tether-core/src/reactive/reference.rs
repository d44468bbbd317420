//! Non-reactive cells.

use std::fmt::{self, Debug};
use std::sync::Arc;

use super::signal::Mapped;
use super::store::{CellId, Identity, Store};
use super::SessionContext;
use crate::error::Result;
use crate::view::{Reactive, View};

/// A mutable holder that never requests a re-render.
///
/// Reads inside a render see the latest value, so a ref changed by one
/// callback shows up whenever some signal next triggers a render.
pub struct Ref<T> {
    store: Arc<Store<T>>,
}

impl<T> Ref<T>
where
    T: Send + Sync + 'static,
{
    /// Create a new ref. Like signals, refs belong to an active session.
    pub fn new(context: &SessionContext, value: T) -> Result<Self> {
        context.ensure_active()?;
        Ok(Self {
            store: Arc::new(Store::new(value)),
        })
    }

    pub fn id(&self) -> CellId {
        self.store.id()
    }

    pub fn identity(&self) -> Identity {
        self.store.identity()
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.store.with(T::clone)
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.store.with(f)
    }

    /// Replace the value with `f(current)`.
    ///
    /// `f` runs on a snapshot without any lock held.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let next = self.store.with(f);
        self.store.commit(next);
    }

    pub fn set(&self, value: T) {
        self.store.commit(value);
    }

    pub fn map<U, F>(&self, f: F) -> Mapped<U>
    where
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        let cell = self.clone();
        Mapped::new(move || cell.with(&f))
    }
}

impl<T> Clone for Ref<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<T: Debug> Debug for Ref<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.store.with(|value| {
            f.debug_struct("Ref")
                .field("id", &self.store.id())
                .field("value", value)
                .finish()
        })
    }
}

impl<T> Reactive for Ref<T>
where
    T: Clone + Into<View> + Send + Sync + 'static,
{
    fn current(&self) -> View {
        self.get().into()
    }
}

impl<T> From<Ref<T>> for View
where
    T: Clone + Into<View> + Send + Sync + 'static,
{
    fn from(cell: Ref<T>) -> Self {
        View::Reactive(Arc::new(cell))
    }
}

impl<T> From<&Ref<T>> for View
where
    T: Clone + Into<View> + Send + Sync + 'static,
{
    fn from(cell: &Ref<T>) -> Self {
        cell.clone().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn ref_updates_never_rerender() {
        let cx = SessionContext::new();
        let rerenders = Arc::new(AtomicUsize::new(0));
        let rerenders_clone = rerenders.clone();
        cx.on_rerender(move || {
            rerenders_clone.fetch_add(1, Ordering::SeqCst);
        });

        let draft = cx.reference(String::new()).unwrap();
        draft.update(|s| format!("{s}abc"));
        draft.set("xyz".to_string());

        assert_eq!(draft.get(), "xyz");
        assert_eq!(rerenders.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn update_may_write_the_same_ref() {
        let cx = SessionContext::new();
        let cell = cx.reference(1).unwrap();
        let inner = cell.clone();

        cell.update(|v| {
            inner.set(100);
            v + 1
        });

        assert_eq!(cell.get(), 2);
    }

    #[test]
    fn ref_identity_tracks_commits() {
        let cx = SessionContext::new();
        let cell = cx.reference(1).unwrap();
        let first = cell.identity();
        cell.set(1);
        assert_ne!(cell.identity(), first);
        assert_eq!(cell.map(|v| v + 1).get(), 2);
    }
}
