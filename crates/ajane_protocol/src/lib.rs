//! # Ajane Protocol
//!
//! Wire vocabulary for Ajane control panels.
//!
//! This crate provides:
//! - `Revision` arithmetic on the 16-bit revision ring
//! - `Baseline` classification of client-supplied revisions
//! - Property and field names used on the wire
//! - String filters (JSON quoting, HTML escaping)
//! - A streaming, allocation-free payload encoder
//! - Inbound value parsers (flags, numbers, colours)
//! - A payload decoder for clients and tests
//!
//! This is a pure protocol crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod filter;
pub mod names;
mod payload;
mod revision;
mod value;

pub use error::{ProtocolError, ProtocolResult};
pub use filter::{write_filtered, Escape, Escaper};
pub use payload::{DiffPayload, PayloadEncoder};
pub use revision::{Baseline, Revision, REVISION_WINDOW};
pub use value::{parse_flag, parse_number, Rgb};
