//! Host simulation for wristlet apps
//!
//! Runs an [`wristlet_core::App`] off-device:
//!
//! - [`SimHost`] implements every host service and records what the app
//!   asked for in an ordered event log. Faults (no connection, busy outbox,
//!   failing sends, refused registrations, missing resources) are switches.
//! - [`Runtime`] plays the host event loop: init, ticks, clicks, inbound
//!   messages, send failures, redraws, deinit.
//! - [`SyncEngine`] is a minimal key/value sync engine.
//! - [`ResourceTable`] holds bundled resources, including generated bitmaps.
//! - [`SimConfig`] loads a scenario from TOML.

#![deny(unsafe_code)]

pub mod config;
pub mod host;
pub mod resources;
pub mod runtime;
pub mod sync;

pub use config::{SendResult, SimConfig, SimConfigError, StartTime};
pub use host::{HostEvent, SimHost};
pub use resources::{bitmap_bytes, ResourceTable};
pub use runtime::{Delivery, Dispatch, Runtime};
pub use sync::{SyncChange, SyncEngine};
