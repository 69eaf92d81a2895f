//! Result codes reported by the host message service

/// Failure reasons for outbound sends, inbound drops and callback registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AppMessageError {
    /// The counterpart did not acknowledge in time
    SendTimeout,
    /// The counterpart rejected the message
    SendRejected,
    /// No counterpart connected
    NotConnected,
    /// The app on the other side is not running
    AppNotRunning,
    /// Invalid arguments passed to the message service
    InvalidArgs,
    /// A message is already in flight
    Busy,
    /// Message larger than the configured buffer
    BufferOverflow,
    /// The outbound buffer was released twice
    AlreadyReleased,
    /// A callback set is already registered
    CallbackAlreadyRegistered,
    /// No callback set is registered
    CallbackNotRegistered,
}

// Wire format values
const RESULT_SEND_TIMEOUT: u8 = 0x02;
const RESULT_SEND_REJECTED: u8 = 0x04;
const RESULT_NOT_CONNECTED: u8 = 0x08;
const RESULT_APP_NOT_RUNNING: u8 = 0x10;
const RESULT_INVALID_ARGS: u8 = 0x20;
const RESULT_BUSY: u8 = 0x40;
const RESULT_BUFFER_OVERFLOW: u8 = 0x80;
const RESULT_ALREADY_RELEASED: u8 = 0x81;
const RESULT_CALLBACK_ALREADY_REGISTERED: u8 = 0x82;
const RESULT_CALLBACK_NOT_REGISTERED: u8 = 0x83;

impl AppMessageError {
    /// Parse a result from its status byte
    ///
    /// `0x00` means success and has no error counterpart.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            RESULT_SEND_TIMEOUT => Some(AppMessageError::SendTimeout),
            RESULT_SEND_REJECTED => Some(AppMessageError::SendRejected),
            RESULT_NOT_CONNECTED => Some(AppMessageError::NotConnected),
            RESULT_APP_NOT_RUNNING => Some(AppMessageError::AppNotRunning),
            RESULT_INVALID_ARGS => Some(AppMessageError::InvalidArgs),
            RESULT_BUSY => Some(AppMessageError::Busy),
            RESULT_BUFFER_OVERFLOW => Some(AppMessageError::BufferOverflow),
            RESULT_ALREADY_RELEASED => Some(AppMessageError::AlreadyReleased),
            RESULT_CALLBACK_ALREADY_REGISTERED => Some(AppMessageError::CallbackAlreadyRegistered),
            RESULT_CALLBACK_NOT_REGISTERED => Some(AppMessageError::CallbackNotRegistered),
            _ => None,
        }
    }

    /// Convert to status byte
    pub fn to_byte(self) -> u8 {
        match self {
            AppMessageError::SendTimeout => RESULT_SEND_TIMEOUT,
            AppMessageError::SendRejected => RESULT_SEND_REJECTED,
            AppMessageError::NotConnected => RESULT_NOT_CONNECTED,
            AppMessageError::AppNotRunning => RESULT_APP_NOT_RUNNING,
            AppMessageError::InvalidArgs => RESULT_INVALID_ARGS,
            AppMessageError::Busy => RESULT_BUSY,
            AppMessageError::BufferOverflow => RESULT_BUFFER_OVERFLOW,
            AppMessageError::AlreadyReleased => RESULT_ALREADY_RELEASED,
            AppMessageError::CallbackAlreadyRegistered => RESULT_CALLBACK_ALREADY_REGISTERED,
            AppMessageError::CallbackNotRegistered => RESULT_CALLBACK_NOT_REGISTERED,
        }
    }

    /// Returns true if the failure happened on the radio link rather than locally
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AppMessageError::SendTimeout
                | AppMessageError::SendRejected
                | AppMessageError::NotConnected
                | AppMessageError::AppNotRunning
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_byte_roundtrip() {
        let all = [
            AppMessageError::SendTimeout,
            AppMessageError::SendRejected,
            AppMessageError::NotConnected,
            AppMessageError::AppNotRunning,
            AppMessageError::InvalidArgs,
            AppMessageError::Busy,
            AppMessageError::BufferOverflow,
            AppMessageError::AlreadyReleased,
            AppMessageError::CallbackAlreadyRegistered,
            AppMessageError::CallbackNotRegistered,
        ];
        for err in all {
            assert_eq!(AppMessageError::from_byte(err.to_byte()), Some(err));
        }
    }

    #[test]
    fn test_success_has_no_error() {
        assert!(AppMessageError::from_byte(0x00).is_none());
    }

    #[test]
    fn test_transport_classification() {
        assert!(AppMessageError::NotConnected.is_transport());
        assert!(!AppMessageError::Busy.is_transport());
        assert!(!AppMessageError::CallbackAlreadyRegistered.is_transport());
    }
}
