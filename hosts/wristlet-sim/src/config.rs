//! Simulation scenarios
//!
//! A scenario sets the start time and the fault switches of a [`SimHost`]:
//!
//! ```toml
//! connected = true
//! outbox_available = true
//! send_result = "timeout"
//! fail_register = false
//! missing_resources = [3]
//!
//! [start]
//! year = 2013
//! month = 4
//! day = 12
//! hour = 21
//! minute = 5
//!
//! [messaging]
//! inbound = 64
//! outbound = 16
//! ```
//!
//! Every field is optional.
//!
//! [`SimHost`]: crate::SimHost

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use wristlet_core::config::MessagingConfig;
use wristlet_core::time::WallTime;
use wristlet_protocol::AppMessageError;

/// Scenario loading errors
#[derive(Debug, Error)]
pub enum SimConfigError {
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid start time {0:?}")]
    InvalidTime(StartTime),

    #[error("message buffers {inbound}/{outbound} outside the allowed range")]
    InvalidMessaging { inbound: u16, outbound: u16 },
}

/// Wall clock reading at simulation start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StartTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    #[serde(default)]
    pub hour: u8,
    #[serde(default)]
    pub minute: u8,
    #[serde(default)]
    pub second: u8,
}

impl StartTime {
    pub fn to_wall_time(self) -> Result<WallTime, SimConfigError> {
        WallTime::new(
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
        )
        .ok_or(SimConfigError::InvalidTime(self))
    }
}

impl Default for StartTime {
    fn default() -> Self {
        Self {
            year: 2013,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
        }
    }
}

/// What the host answers when an app submits a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendResult {
    #[default]
    Ok,
    Timeout,
    Rejected,
    NotConnected,
    Busy,
}

impl SendResult {
    pub fn to_result(self) -> Result<(), AppMessageError> {
        match self {
            SendResult::Ok => Ok(()),
            SendResult::Timeout => Err(AppMessageError::SendTimeout),
            SendResult::Rejected => Err(AppMessageError::SendRejected),
            SendResult::NotConnected => Err(AppMessageError::NotConnected),
            SendResult::Busy => Err(AppMessageError::Busy),
        }
    }
}

/// One simulation scenario
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimConfig {
    #[serde(default)]
    pub start: StartTime,

    /// A paired phone is connected
    #[serde(default = "default_true")]
    pub connected: bool,

    /// The outbox can be acquired
    #[serde(default = "default_true")]
    pub outbox_available: bool,

    #[serde(default)]
    pub send_result: SendResult,

    /// Callback registration is refused
    #[serde(default)]
    pub fail_register: bool,

    /// Callback deregistration is refused
    #[serde(default)]
    pub fail_deregister: bool,

    /// Resource ids that fail to load
    #[serde(default)]
    pub missing_resources: Vec<u32>,

    /// Override the app's message buffer sizes
    #[serde(default)]
    pub messaging: Option<MessagingConfig>,
}

fn default_true() -> bool {
    true
}

impl SimConfig {
    /// Load a scenario from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SimConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate a scenario
    pub fn from_toml(text: &str) -> Result<Self, SimConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), SimConfigError> {
        self.start.to_wall_time()?;
        if let Some(messaging) = self.messaging {
            if !messaging.is_valid() {
                return Err(SimConfigError::InvalidMessaging {
                    inbound: messaging.inbound,
                    outbound: messaging.outbound,
                });
            }
        }
        Ok(())
    }

    /// Validated start time
    pub fn start_time(&self) -> Result<WallTime, SimConfigError> {
        self.start.to_wall_time()
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start: StartTime::default(),
            connected: true,
            outbox_available: true,
            send_result: SendResult::Ok,
            fail_register: false,
            fail_deregister: false,
            missing_resources: Vec::new(),
            messaging: None,
        }
    }
}
