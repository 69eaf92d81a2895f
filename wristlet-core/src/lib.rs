//! Board-agnostic building blocks for wristlet apps
//!
//! This crate contains everything an app needs that does not depend on a
//! particular host (device firmware or simulator):
//!
//! - Host abstraction traits (message outbox, haptics, clock, resources, sync)
//! - The [`App`] trait the host drives
//! - App identity and static configuration
//! - Windows and layers (presentation state)
//! - Bitmap resource headers
//! - Time formatting
//! - The messaging adapter (command send, callback registration)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod bitmap;
pub mod config;
pub mod geometry;
pub mod input;
pub mod messaging;
pub mod time;
pub mod traits;
pub mod ui;

pub use traits::{App, Host};
