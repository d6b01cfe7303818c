//! # Ajane Server
//!
//! HTTP adapter serving Ajane control panels.
//!
//! This crate provides:
//! - The page endpoint (full HTML plus the polling client)
//! - The sync endpoint (form fields in, JSON diff out)
//! - A [`Transport`](ajane_core::Transport) over decoded form fields
//! - Server configuration and error mapping to HTTP status codes
//!
//! # Architecture
//!
//! The panel lives behind a mutex shared by the server and the program
//! that drives it. Each sync request locks the panel once and runs the
//! whole apply, callback, hook, commit and diff sequence under that lock.
//! The program mutates the panel between requests and calls
//! [`Panel::commit`](ajane_core::Panel::commit) to publish a batch.
//!
//! # Protocol
//!
//! 1. The browser loads the page; the current revision is embedded in it
//! 2. Every poll interval the client posts `revision=<baseline>` and any
//!    changed widget values
//! 3. The server answers with `{"ArduJAXrevision":N, ...}` listing every
//!    property changed after the baseline
//! 4. The client applies the diff and takes `N` as its next baseline

#![deny(unsafe_code)]
#![warn(missing_docs)]
// Production code MUST NOT use panic!/unwrap()/expect()
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod config;
mod error;
mod handler;
mod markup;
mod script;
mod server;
mod transport;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::{PanelHandler, ReactionHook};
pub use markup::{render_page, write_page};
pub use script::write_client_script;
pub use server::PanelServer;
pub use transport::{FormTransport, HTML_CONTENT_TYPE, JSON_CONTENT_TYPE};
