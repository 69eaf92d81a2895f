//! App identity and static configuration
//!
//! Every app declares an [`AppInfo`] (consumed by the host's app registry)
//! and an [`AppConfig`] (which events it wants and how large its message
//! buffers are). Both are fixed at build time.

use wristlet_protocol::metadata::FLAG_WATCH_FACE;
use wristlet_protocol::{AppMetadata, MetadataError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Smallest message buffer the host will allocate
pub const MIN_MESSAGE_BUFFER: u16 = 16;

/// Largest message buffer the host will allocate
pub const MAX_MESSAGE_BUFFER: u16 = 256;

/// App category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AppKind {
    /// Listed in the app menu, receives button input
    #[default]
    StandardApp,
    /// Selectable as a watch face
    WatchFace,
}

/// Menu icon selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MenuIcon {
    /// The firmware's generic icon
    #[default]
    Default,
    /// An image resource bundled with the app
    Resource(u32),
}

impl MenuIcon {
    /// Resource id written into the app header (0 selects the default icon)
    pub fn resource_id(&self) -> u32 {
        match self {
            MenuIcon::Default => 0,
            MenuIcon::Resource(id) => *id,
        }
    }
}

/// Static identity block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct AppInfo {
    pub uuid: [u8; 16],
    pub name: &'static str,
    pub company: &'static str,
    /// (major, minor)
    pub version: (u8, u8),
    pub icon: MenuIcon,
    pub kind: AppKind,
}

impl AppInfo {
    /// Build the binary header the firmware reads to list this app
    pub fn metadata(&self) -> Result<AppMetadata, MetadataError> {
        let flags = match self.kind {
            AppKind::WatchFace => FLAG_WATCH_FACE,
            AppKind::StandardApp => 0,
        };
        AppMetadata::new(
            self.name,
            self.company,
            self.version,
            self.icon.resource_id(),
            flags,
            self.uuid,
        )
    }
}

/// Granularity of the periodic tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TickUnit {
    Second,
    Minute,
    Hour,
    Day,
}

impl TickUnit {
    /// Tick period in seconds (a day is treated as 86400 s)
    pub fn period_s(&self) -> u32 {
        match self {
            TickUnit::Second => 1,
            TickUnit::Minute => 60,
            TickUnit::Hour => 3600,
            TickUnit::Day => 86_400,
        }
    }
}

/// Inbound/outbound message buffer sizes in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MessagingConfig {
    pub inbound: u16,
    pub outbound: u16,
}

impl MessagingConfig {
    /// Returns true if both sizes lie within what the host can allocate
    pub fn is_valid(&self) -> bool {
        let range = MIN_MESSAGE_BUFFER..=MAX_MESSAGE_BUFFER;
        range.contains(&self.inbound) && range.contains(&self.outbound)
    }
}

/// Which host services an app subscribes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AppConfig {
    /// Periodic tick, if wanted
    pub tick: Option<TickUnit>,
    /// Message buffers, if the app exchanges messages
    pub messaging: Option<MessagingConfig>,
}
