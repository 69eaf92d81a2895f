//! Host abstraction traits
//!
//! These traits define the boundary between an app and whatever runs it:
//! the device firmware or the simulation host.

pub mod app;
pub mod host;

pub use app::App;
pub use host::{
    Clock, Haptics, Host, MessageCallbacks, MessageOutbox, ResourceError, ResourceStore,
    SyncError, SyncService, VibePattern, WindowStack,
};
