//! # Ajane Core
//!
//! Revision-based synchronization engine for Ajane control panels.
//!
//! This crate provides:
//! - The change clock (pending vs. visible revision, two-phase commit)
//! - Widgets with per-property change stamps
//! - Containers and exclusive-selection (radio) groups
//! - A fixed-capacity panel arena and its builder
//! - The synchronization walk: poll, update and request dispatch
//! - The transport adapter trait and an in-memory adapter
//!
//! ## Architecture
//!
//! A [`Panel`] owns its widget tree and its [`ChangeClock`]. Server-side
//! setters stamp changed properties with the clock's pending revision; the
//! batch becomes visible to clients only when the panel commits. Clients
//! poll with the last revision they saw and receive every property stamped
//! after it.
//!
//! ## Key Invariants
//!
//! - Uncommitted changes never appear in a diff
//! - A diff against revision `R` contains exactly the properties stamped after `R`
//! - At most one member of a radio group is checked at any revision
//! - Inbound values are applied before callbacks, callbacks before the
//!   reaction hook, the hook before commit, and commit before the diff
//! - The tree topology is fixed once the panel is built

#![deny(unsafe_code)]
#![warn(missing_docs)]
// Production code MUST NOT use panic!/unwrap()/expect()
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod builder;
mod clock;
mod config;
mod error;
mod id;
mod node;
mod panel;
mod property;
mod sync;
mod transport;
mod widget;

pub use ajane_protocol::{Baseline, Revision, Rgb};
pub use builder::PanelBuilder;
pub use clock::ChangeClock;
pub use config::PanelConfig;
pub use error::{CoreError, CoreResult};
pub use id::{NodeId, WidgetId, MAX_ID_LEN};
pub use node::{ConnectionIndicator, Container, Node, RadioGroup, StaticContent};
pub use panel::Panel;
pub use property::{Property, PropertyFlags, PropertyValue, MAX_PROPERTIES};
pub use sync::SyncOutcome;
pub use transport::{
    MemoryTransport, Transport, TransportError, TransportResult, TransportWriter,
};
pub use widget::{
    ButtonCallback, CheckButton, ColorPicker, Element, ElementKind, GroupLink, MutableSpan,
    OptionSelect, PushButton, Slider, TextInput,
};
