//! Synchronization Sessions
//!
//! A session follows one page from its first render to the end of the
//! browser's live connection.
//!
//! # States
//!
//! ```text
//!  page GET ──► Registered ──handshake──► Live ──close / violation──► Closed
//!               (PendingSession)          (LiveSession)
//! ```
//!
//! - **Registered**: [`Page::open`] ran the page function, rendered once, and
//!   produced a [`PendingSession`]. The [`SessionRegistry`] holds it under a
//!   fresh [`SessionId`] that the bootstrap script sends back.
//! - **Live**: the handshake removed the pending session from the registry
//!   and [`PendingSession::attach`] installed the re-render subscriber. Every
//!   re-render request renders the full tree and pushes it if the markup
//!   changed.
//! - **Closed**: the peer went away, a frame violated the protocol, or a
//!   callback failed. The session context is closed, which drops the
//!   subscriber; nothing is pushed afterwards.
//!
//! The typestate makes the transitions one-way: a pending session is consumed
//! by `attach`, and a live session by `run`.

pub mod protocol;
mod document;
mod page;
mod registry;
mod live;

pub use document::{bootstrap_script, document};
pub use page::{Page, PageFn, PageRequest};
pub use registry::{SessionId, SessionRegistry};
pub use live::{LiveSession, PendingSession};
