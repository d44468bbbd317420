//! List projection and conditional branches.
//!
//! Both combinators return [`View::Deferred`] producers, so the renderer
//! re-evaluates them on every render.
//!
//! [`each`] memoizes on the [`Identity`] of the list it reads: as long as the
//! backing cell has not been committed to since the last render, the
//! previously produced children are returned as-is and the mapper is not
//! called. Any commit counts, even one of an equal list. Because cells only
//! change through `update`/`set`, an in-place mutation that skips the commit
//! cannot happen.
//!
//! [`whether`] keeps no state: the condition and the chosen branch are
//! evaluated fresh every time, since branch content may create or read
//! reactive state of its own.

use parking_lot::Mutex;

use super::View;
use crate::reactive::{Identity, Ref, Signal};

/// A list that [`each`] can project.
pub trait ListSource<T>: Send + Sync + 'static {
    /// Identity of the list currently held.
    fn identity(&self) -> Identity;

    /// Borrow the current items.
    fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> R;
}

impl<T> ListSource<T> for Signal<Vec<T>>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn identity(&self) -> Identity {
        Signal::identity(self)
    }

    fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        self.with(|items| f(items))
    }
}

impl<T> ListSource<T> for Ref<Vec<T>>
where
    T: Send + Sync + 'static,
{
    fn identity(&self) -> Identity {
        Ref::identity(self)
    }

    fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        self.with(|items| f(items))
    }
}

/// A plain list never changes, so it is projected once.
impl<T> ListSource<T> for Vec<T>
where
    T: Send + Sync + 'static,
{
    fn identity(&self) -> Identity {
        Identity::FIXED
    }

    fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(self)
    }
}

/// Project every item of `source` through `mapper`.
pub fn each<S, T, F, V>(source: S, mapper: F) -> View
where
    S: ListSource<T>,
    T: 'static,
    F: Fn(&T) -> V + Send + Sync + 'static,
    V: Into<View>,
{
    project(source, move |item, _| mapper(item).into())
}

/// Like [`each`], but the mapper also receives the item's position in the
/// list being projected.
pub fn each_indexed<S, T, F, V>(source: S, mapper: F) -> View
where
    S: ListSource<T>,
    T: 'static,
    F: Fn(&T, usize) -> V + Send + Sync + 'static,
    V: Into<View>,
{
    project(source, move |item, index| mapper(item, index).into())
}

fn project<S, T, F>(source: S, mapper: F) -> View
where
    S: ListSource<T>,
    T: 'static,
    F: Fn(&T, usize) -> View + Send + Sync + 'static,
{
    let memo: Mutex<Option<(Identity, Vec<View>)>> = Mutex::new(None);

    View::deferred(move || {
        let identity = source.identity();
        let mut memo = memo.lock();

        if let Some((seen, children)) = memo.as_ref() {
            if *seen == identity {
                return View::Seq(children.clone());
            }
        }

        let children: Vec<View> = source.with_items(|items| {
            items
                .iter()
                .enumerate()
                .map(|(index, item)| mapper(item, index))
                .collect()
        });
        *memo = Some((identity, children.clone()));
        View::Seq(children)
    })
}

/// A condition [`whether`] can test.
pub trait Condition: Send + Sync + 'static {
    fn evaluate(&self) -> bool;
}

impl Condition for bool {
    fn evaluate(&self) -> bool {
        *self
    }
}

impl Condition for Signal<bool> {
    fn evaluate(&self) -> bool {
        self.get()
    }
}

impl Condition for Ref<bool> {
    fn evaluate(&self) -> bool {
        self.get()
    }
}

impl<F> Condition for F
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    fn evaluate(&self) -> bool {
        self()
    }
}

/// Render `truthy()` while `condition` holds, nothing otherwise.
pub fn whether<C, F, V>(condition: C, truthy: F) -> View
where
    C: Condition,
    F: Fn() -> V + Send + Sync + 'static,
    V: Into<View>,
{
    View::deferred(move || {
        if condition.evaluate() {
            truthy().into()
        } else {
            View::Empty
        }
    })
}

/// Render `truthy()` while `condition` holds, `falsy()` otherwise.
pub fn whether_else<C, F, G, V, W>(condition: C, truthy: F, falsy: G) -> View
where
    C: Condition,
    F: Fn() -> V + Send + Sync + 'static,
    G: Fn() -> W + Send + Sync + 'static,
    V: Into<View>,
    W: Into<View>,
{
    View::deferred(move || {
        if condition.evaluate() {
            truthy().into()
        } else {
            falsy().into()
        }
    })
}
