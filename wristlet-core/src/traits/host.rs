//! Services the host provides to apps
//!
//! Each concern is its own trait so a host can be assembled (or mocked)
//! piecewise; [`Host`] bundles them for app handlers.

use wristlet_protocol::{AppMessageError, DictError, Tuplet};

use crate::time::WallTime;
use crate::ui::Window;

/// Outbound message buffer
///
/// The buffer is a scoped resource: after a successful [`out_acquire`]
/// the caller must call [`out_release`] exactly once, whether or not
/// [`out_send`] succeeded. [`crate::messaging::OutboxGuard`] enforces this.
///
/// [`out_acquire`]: MessageOutbox::out_acquire
/// [`out_release`]: MessageOutbox::out_release
/// [`out_send`]: MessageOutbox::out_send
pub trait MessageOutbox {
    /// Reserve the outbound buffer
    ///
    /// Fails when a message is already in flight or no counterpart is
    /// connected.
    fn out_acquire(&mut self) -> Result<(), AppMessageError>;

    /// The reserved buffer, sized to the app's outbound configuration
    fn out_buffer(&mut self) -> &mut [u8];

    /// Submit the first `len` bytes of the buffer
    fn out_send(&mut self, len: usize) -> Result<(), AppMessageError>;

    /// Give the buffer back
    ///
    /// Fails with [`AppMessageError::AlreadyReleased`] when nothing is held.
    fn out_release(&mut self) -> Result<(), AppMessageError>;
}

/// Registration of the app's inbound/outbound message callbacks
pub trait MessageCallbacks {
    /// Start delivering message events to the app
    fn register_callbacks(&mut self) -> Result<(), AppMessageError>;

    /// Stop delivering message events to the app
    fn deregister_callbacks(&mut self) -> Result<(), AppMessageError>;
}

/// Vibration patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VibePattern {
    ShortPulse,
    LongPulse,
}

/// Vibration motor
pub trait Haptics {
    fn vibrate(&mut self, pattern: VibePattern);
}

/// Local wall clock
pub trait Clock {
    fn now(&self) -> WallTime;
}

/// Resource lookup errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResourceError {
    /// No resource with this id
    NotFound,
    /// Resource larger than the destination buffer
    BufferTooSmall,
}

/// Bundled app resources
pub trait ResourceStore {
    /// Copy a resource into `buffer`, returning its size
    fn load_resource(&mut self, id: u32, buffer: &mut [u8]) -> Result<usize, ResourceError>;
}

/// Key/value synchronisation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncError {
    /// The synchronised values do not fit the sync buffer
    Dictionary(DictError),
    /// The message service refused or lost a message
    Message(AppMessageError),
    /// Sync was already initialised
    AlreadyActive,
}

impl From<DictError> for SyncError {
    fn from(err: DictError) -> Self {
        SyncError::Dictionary(err)
    }
}

impl From<AppMessageError> for SyncError {
    fn from(err: AppMessageError) -> Self {
        SyncError::Message(err)
    }
}

/// Host key/value sync engine
///
/// The engine keeps a set of tuples consistent with the paired device and
/// reports each changed value to the app through
/// [`crate::App::on_sync_changed`]. Initial values are reported as changes
/// too.
pub trait SyncService {
    fn sync_init(&mut self, buffer_size: usize, initial: &[Tuplet<'_>]) -> Result<(), SyncError>;

    fn sync_deinit(&mut self);
}

/// Window stack
pub trait WindowStack {
    /// Make `window` the visible top-most window
    fn push_window(&mut self, window: &Window, animated: bool);
}

/// Everything an app handler can reach
pub trait Host:
    MessageOutbox + MessageCallbacks + Haptics + Clock + ResourceStore + SyncService + WindowStack
{
}

impl<T: ?Sized> Host for T where
    T: MessageOutbox + MessageCallbacks + Haptics + Clock + ResourceStore + SyncService + WindowStack
{
}
