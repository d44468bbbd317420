//! Reactive Primitives
//!
//! This module implements the state side of Tether: signals, refs, and the
//! session context that ties them to one page render.
//!
//! # Concepts
//!
//! ## Session Context
//!
//! Every page request gets its own [`SessionContext`]. Reactive state is
//! created through it, and it carries the re-render callback that the live
//! session installs once the browser connects. The context is passed
//! explicitly into page functions, so two sessions never share state.
//!
//! ## Signals
//!
//! A [`Signal`] holds a value. Updating it with a transform that produces an
//! unequal value asks the owning session to re-render.
//!
//! ## Refs
//!
//! A [`Ref`] is a signal that never asks for a re-render. Useful for state the
//! page reads on its next render but that should not cause one by itself.
//!
//! # Identity
//!
//! Each commit to a signal or ref bumps a generation counter. The pair of cell
//! id and generation is the cell's [`Identity`]; list projections memoize on
//! it instead of comparing list contents.

mod context;
mod store;
mod signal;
mod reference;

pub use context::SessionContext;
pub use store::{CellId, Identity};
pub use signal::{Mapped, Signal};
pub use reference::Ref;
