//! Rendering
//!
//! The renderer turns a [`View`](crate::view::View) into markup and, in the
//! same pass, collects every callback attribute into an [`ActionRegistry`].
//!
//! # Handler Identity
//!
//! A callback is addressed by [`HandlerId`]: the owning element's node id
//! joined with the attribute name (`"17@onclick"`). Because node ids are fixed
//! at construction, a node kept alive across renders keeps its handler ids,
//! and the browser can keep sending the ids embedded in the markup it has.
//!
//! The registry is rebuilt from scratch on every render. A handler id is only
//! resolvable while some node in the latest render still carries it.

mod callback;
mod registry;
mod renderer;

pub use callback::{Callback, Handler, IntoOutcome};
pub use registry::{ActionRegistry, HandlerId};
pub use renderer::{render_to_string, Renderer};
