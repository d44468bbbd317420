//! Tether Core
//!
//! This crate provides the runtime for Tether, a server-driven UI framework.
//! Pages are built on the server from reactive cells and a lazy element tree,
//! rendered to HTML, and kept in sync with the browser over a WebSocket: the
//! browser reports events, the server runs the matching callback, re-renders,
//! and pushes the new markup back.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `reactive`: session contexts, signals, and non-reactive refs
//! - `view`: the element tree, styles, and the `each`/`whether` combinators
//! - `render`: the renderer and the per-render action registry
//! - `session`: the wire protocol, pending/live sessions, and pages
//! - `server`: the axum adapter serving pages and handshakes
//! - `config`: server configuration from the environment
//!
//! # Example
//!
//! ```rust,ignore
//! use tether_core::view::tags::{button, div};
//! use tether_core::{App, ServerConfig};
//!
//! let app = App::new().page("/", |cx, _| {
//!     let count = cx.signal(0)?;
//!     let increment = count.clone();
//!     Ok(div()
//!         .child(button().on("onclick", move || increment.update(|n| n + 1)).child("+"))
//!         .child(&count)
//!         .into())
//! });
//!
//! app.serve(ServerConfig::from_env()?).await?;
//! ```

pub mod config;
pub mod error;
pub mod reactive;
pub mod render;
pub mod server;
pub mod session;
pub mod view;

pub use config::ServerConfig;
pub use error::{Error, ProtocolError, Result};
pub use reactive::{Ref, SessionContext, Signal};
pub use server::App;
pub use session::{Page, PageRequest};
pub use view::{each, each_indexed, whether, whether_else, Element, Style, View};
