//! CLI command implementations.

pub mod dump;
pub mod page;
pub mod serve;
