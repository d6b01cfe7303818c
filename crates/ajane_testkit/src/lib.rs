//! # Ajane Testkit
//!
//! Test utilities for Ajane.
//!
//! This crate provides:
//! - Panel fixtures for the common test trees
//! - Property-based test generators using proptest
//! - A harness that drives polls and updates through the in-memory
//!   transport and decodes the payloads
//!
//! ## Usage
//!
//! ```rust
//! use ajane_testkit::prelude::*;
//!
//! let fixture = scenario_panel();
//! let mut harness = PanelHarness::new(fixture.panel);
//! let diff = harness.update(&[("name", "Alice")]);
//! assert_eq!(diff.property("name", "value"), Some("Alice"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod harness;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::harness::*;
}

pub use fixtures::*;
pub use generators::*;
pub use harness::*;
