//! The view sum type and its conversions.

use std::fmt;
use std::sync::Arc;

use super::Element;

/// Anything that can be read afresh into a view on each render.
pub trait Reactive: Send + Sync {
    fn current(&self) -> View;
}

/// Numeric leaf, rendered in decimal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Uint(u64),
    Float(f64),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{n}"),
            Number::Uint(n) => write!(f, "{n}"),
            Number::Float(n) => write!(f, "{n}"),
        }
    }
}

/// A renderable tree.
///
/// Cloning is cheap: element nodes, reactive cells, and producers are shared.
#[derive(Clone, Default)]
pub enum View {
    #[default]
    Empty,
    Text(String),
    Number(Number),
    /// Rendered as the concatenation of its items.
    Seq(Vec<View>),
    Element(Arc<Element>),
    /// Read through [`Reactive::current`] on every render.
    Reactive(Arc<dyn Reactive>),
    /// Invoked on every render.
    Deferred(Arc<dyn Fn() -> View + Send + Sync>),
}

impl View {
    pub fn text(text: impl Into<String>) -> Self {
        View::Text(text.into())
    }

    /// Wrap a producer that is re-invoked every render.
    pub fn deferred<F>(produce: F) -> Self
    where
        F: Fn() -> View + Send + Sync + 'static,
    {
        View::Deferred(Arc::new(produce))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, View::Empty)
    }
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Empty => f.write_str("Empty"),
            View::Text(text) => f.debug_tuple("Text").field(text).finish(),
            View::Number(n) => f.debug_tuple("Number").field(n).finish(),
            View::Seq(items) => f.debug_tuple("Seq").field(items).finish(),
            View::Element(element) => f.debug_tuple("Element").field(element).finish(),
            View::Reactive(_) => f.write_str("Reactive(..)"),
            View::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

impl From<()> for View {
    fn from(_: ()) -> Self {
        View::Empty
    }
}

impl From<&str> for View {
    fn from(text: &str) -> Self {
        View::Text(text.to_owned())
    }
}

impl From<String> for View {
    fn from(text: String) -> Self {
        View::Text(text)
    }
}

impl From<&String> for View {
    fn from(text: &String) -> Self {
        View::Text(text.clone())
    }
}

macro_rules! number_from {
    ($variant:ident, $wide:ty: $($ty:ty),*) => {
        $(
            impl From<$ty> for View {
                fn from(n: $ty) -> Self {
                    View::Number(Number::$variant(<$wide>::from(n)))
                }
            }
        )*
    };
}

number_from!(Int, i64: i8, i16, i32, i64);
number_from!(Uint, u64: u8, u16, u32, u64);
number_from!(Float, f64: f32, f64);

impl From<usize> for View {
    fn from(n: usize) -> Self {
        View::Number(Number::Uint(n as u64))
    }
}

impl From<Element> for View {
    fn from(element: Element) -> Self {
        View::Element(Arc::new(element))
    }
}

impl<T: Into<View>> From<Vec<T>> for View {
    fn from(items: Vec<T>) -> Self {
        View::Seq(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<View>> From<Option<T>> for View {
    fn from(item: Option<T>) -> Self {
        item.map_or(View::Empty, Into::into)
    }
}

macro_rules! tuple_from {
    ($($name:ident),+) => {
        impl<$($name: Into<View>),+> From<($($name,)+)> for View {
            #[allow(non_snake_case)]
            fn from(($($name,)+): ($($name,)+)) -> Self {
                View::Seq(vec![$($name.into()),+])
            }
        }
    };
}

tuple_from!(A, B);
tuple_from!(A, B, C);
tuple_from!(A, B, C, D);
tuple_from!(A, B, C, D, E);
tuple_from!(A, B, C, D, E, F);
tuple_from!(A, B, C, D, E, F, G);
tuple_from!(A, B, C, D, E, F, G, H);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_display_in_decimal() {
        assert_eq!(Number::Int(-3).to_string(), "-3");
        assert_eq!(Number::Uint(42).to_string(), "42");
        assert_eq!(Number::Float(1.5).to_string(), "1.5");
    }

    #[test]
    fn conversions_pick_the_right_variant() {
        assert!(matches!(View::from(()), View::Empty));
        assert!(matches!(View::from(None::<&str>), View::Empty));
        assert!(matches!(View::from("hi"), View::Text(ref t) if t == "hi"));
        assert!(matches!(View::from(7), View::Number(Number::Int(7))));
        assert!(matches!(View::from(7usize), View::Number(Number::Uint(7))));
        assert!(matches!(View::from(("a", 1, ())), View::Seq(ref items) if items.len() == 3));
    }
}
