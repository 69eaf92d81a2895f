//! Messaging adapter
//!
//! Translates between an app's command vocabulary and dictionary payloads:
//!
//! - [`send_command`] writes one integer tuple into the host outbox and
//!   submits it. If the outbox cannot be acquired the send is skipped.
//! - [`lookup_command`] pulls a command back out of an inbound payload.
//! - [`CallbackRegistration`] keeps at most one live callback set.
//! - [`DeliveryStats`] records send failures and drops. Neither is retried.

use wristlet_protocol::{AppMessageError, DictError, Dictionary, DictionaryWriter, Tuplet};

use crate::traits::{MessageCallbacks, MessageOutbox};

/// Commands exchanged between paired devices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Vibrate the receiving watch
    Vibe,
    /// Up button pressed on the sender
    Up,
    /// Down button pressed on the sender
    Down,
}

// Wire format values
const CMD_VIBE: u8 = 0x00;
const CMD_UP: u8 = 0x01;
const CMD_DOWN: u8 = 0x02;

impl Command {
    pub const ALL: [Command; 3] = [Command::Vibe, Command::Up, Command::Down];

    /// Parse a command from its wire byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            CMD_VIBE => Some(Command::Vibe),
            CMD_UP => Some(Command::Up),
            CMD_DOWN => Some(Command::Down),
            _ => None,
        }
    }

    /// Convert to wire byte
    pub fn to_byte(self) -> u8 {
        match self {
            Command::Vibe => CMD_VIBE,
            Command::Up => CMD_UP,
            Command::Down => CMD_DOWN,
        }
    }
}

/// Why a send did not go out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SendError {
    /// The outbox could not be acquired; nothing was written
    Unavailable(AppMessageError),
    /// The payload did not fit the outbox
    Encode(DictError),
    /// The host refused the finished payload
    Transmit(AppMessageError),
}

/// Acquired outbox, released on drop
pub struct OutboxGuard<'h, O: MessageOutbox + ?Sized> {
    outbox: &'h mut O,
}

impl<'h, O: MessageOutbox + ?Sized> OutboxGuard<'h, O> {
    /// Acquire the outbox
    ///
    /// On failure nothing was acquired and nothing will be released.
    pub fn acquire(outbox: &'h mut O) -> Result<Self, AppMessageError> {
        outbox.out_acquire()?;
        Ok(Self { outbox })
    }

    pub fn buffer(&mut self) -> &mut [u8] {
        self.outbox.out_buffer()
    }

    /// Submit the first `len` bytes of the buffer
    pub fn send(&mut self, len: usize) -> Result<(), AppMessageError> {
        self.outbox.out_send(len)
    }
}

impl<O: MessageOutbox + ?Sized> Drop for OutboxGuard<'_, O> {
    fn drop(&mut self) {
        if let Err(_err) = self.outbox.out_release() {
            #[cfg(feature = "defmt")]
            defmt::warn!("outbox release failed: {:?}", _err);
        }
    }
}

/// Encode `tuplets` into the outbox and submit them
///
/// Exactly one transmission attempt, no retry. Returns the payload size.
pub fn send_tuplets<O: MessageOutbox + ?Sized>(
    outbox: &mut O,
    tuplets: &[Tuplet<'_>],
) -> Result<usize, SendError> {
    let mut guard = OutboxGuard::acquire(outbox).map_err(|err| {
        #[cfg(feature = "defmt")]
        defmt::debug!("outbox unavailable ({:?}), send skipped", err);
        SendError::Unavailable(err)
    })?;

    let len = {
        let mut writer = DictionaryWriter::new(guard.buffer()).map_err(SendError::Encode)?;
        writer.write_all(tuplets).map_err(SendError::Encode)?;
        writer.end()
    };

    guard.send(len).map_err(SendError::Transmit)?;
    Ok(len)
}

/// Send a single command byte under `key`
pub fn send_command<O: MessageOutbox + ?Sized>(
    outbox: &mut O,
    key: u32,
    command: Command,
) -> Result<(), SendError> {
    send_tuplets(outbox, &[Tuplet::uint8(key, command.to_byte())]).map(|_| ())
}

/// Why an inbound payload carried no usable command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InboundError {
    /// The command key is absent
    MissingKey,
    /// The key carries a string or byte array
    NotAnInteger,
    /// The value is not a known command
    UnknownCommand(u32),
}

/// Find and decode the command carried under `key`
pub fn lookup_command(message: &Dictionary<'_>, key: u32) -> Result<Command, InboundError> {
    let tuple = message.find(key).ok_or(InboundError::MissingKey)?;
    let value = tuple.as_u32().ok_or(InboundError::NotAnInteger)?;
    u8::try_from(value)
        .ok()
        .and_then(Command::from_byte)
        .ok_or(InboundError::UnknownCommand(value))
}

/// What an app did with an inbound payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReceiveOutcome {
    /// A command was decoded and its effect performed
    Acted(Command),
    /// A command was decoded but has no effect in this app
    NoEffect(Command),
    /// The payload was ignored
    Ignored(InboundError),
}

/// Guard against registering two callback sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CallbackRegistration {
    registered: bool,
}

impl CallbackRegistration {
    pub const fn new() -> Self {
        Self { registered: false }
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// (Re-)register callbacks
    ///
    /// A live registration is torn down first. If that fails the old set
    /// stays live and no second set is registered. Returns whether a
    /// callback set is live afterwards.
    pub fn register<C: MessageCallbacks + ?Sized>(&mut self, host: &mut C) -> bool {
        if self.registered && host.deregister_callbacks().is_ok() {
            self.registered = false;
        }
        if !self.registered {
            match host.register_callbacks() {
                Ok(()) => self.registered = true,
                Err(_err) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("callback registration failed: {:?}", _err);
                }
            }
        }
        self.registered
    }

    /// Remove the live callback set, if any
    pub fn deregister<C: MessageCallbacks + ?Sized>(&mut self, host: &mut C) -> bool {
        if self.registered && host.deregister_callbacks().is_ok() {
            self.registered = false;
        }
        !self.registered
    }
}

/// Count of undelivered messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeliveryStats {
    pub send_failures: u16,
    /// Send failures caused by the radio link rather than the watch
    pub link_failures: u16,
    pub dropped: u16,
    pub last_error: Option<AppMessageError>,
}

impl DeliveryStats {
    pub const fn new() -> Self {
        Self {
            send_failures: 0,
            link_failures: 0,
            dropped: 0,
            last_error: None,
        }
    }

    /// Outbound message not acknowledged
    pub fn record_send_failure(&mut self, reason: AppMessageError) {
        #[cfg(feature = "defmt")]
        defmt::warn!("outbound message failed: {:?}", reason);
        self.send_failures = self.send_failures.saturating_add(1);
        if reason.is_transport() {
            self.link_failures = self.link_failures.saturating_add(1);
        }
        self.last_error = Some(reason);
    }

    /// Inbound message dropped by the host
    pub fn record_drop(&mut self, reason: AppMessageError) {
        #[cfg(feature = "defmt")]
        defmt::warn!("inbound message dropped: {:?}", reason);
        self.dropped = self.dropped.saturating_add(1);
        self.last_error = Some(reason);
    }
}
