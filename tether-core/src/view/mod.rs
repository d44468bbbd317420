//! View Trees
//!
//! A page is described by a [`View`]: a lazy tree of text, numbers, element
//! nodes, sequences, reactive cells, and deferred producers. Nothing in a view
//! is evaluated until the renderer walks it, and the renderer walks it again
//! on every render, so reactive leaves always show their current value.
//!
//! # Building Views
//!
//! Element nodes are built with [`Element`] (or the helpers in [`tags`]) and
//! converted into views with `Into<View>`. Strings, numbers, vectors, tuples,
//! options, signals, refs, and mapped signals all convert as well.
//!
//! The [`each`] and [`whether`] combinators return deferred views that
//! project a list or pick a branch at render time.

mod tree;
mod element;
mod style;
mod combinators;
pub mod tags;

pub use tree::{Number, Reactive, View};
pub use element::{AttrValue, Element, NodeId};
pub use style::Style;
pub(crate) use style::concat_text;
pub use combinators::{each, each_indexed, whether, whether_else, Condition, ListSource};
