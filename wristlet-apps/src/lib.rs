//! Demo apps
//!
//! Each app shows one feature of the host SDK:
//!
//! - [`VibratePaired`]: clock that vibrates when the paired device sends VIBE,
//!   and sends UP/DOWN on button clicks
//! - [`RemoteControl`]: clock that sends UP/DOWN commands to the phone
//! - [`Weather`]: icon and temperature kept in sync with the phone
//! - [`DigitalWatch`]: plain 12-hour digital watch face
//!
//! Apps hold all their state in one struct and touch the outside world only
//! through the [`wristlet_core::Host`] passed to each handler.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

mod clock;

pub mod digital_watch;
pub mod remote_control;
pub mod resources;
pub mod vibrate_paired;
pub mod weather;

pub use digital_watch::DigitalWatch;
pub use remote_control::RemoteControl;
pub use vibrate_paired::VibratePaired;
pub use weather::Weather;
