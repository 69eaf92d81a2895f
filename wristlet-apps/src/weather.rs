//! Weather demo
//!
//! An icon and a temperature string, both owned by the phone and kept in
//! sync through the host's key/value sync engine. The app seeds the sync set
//! with placeholder values and redraws whenever either value changes.

use heapless::String;

use wristlet_core::bitmap::{BitmapError, BitmapInfo};
use wristlet_core::config::{AppConfig, AppInfo, AppKind, MenuIcon, MessagingConfig};
use wristlet_core::geometry::{GColor, GRect, SCREEN_WIDTH};
use wristlet_core::traits::{ResourceError, SyncError};
use wristlet_core::ui::{truncate_str, BitmapLayer, Font, LayerId, TextAlignment, TextLayer, Window};
use wristlet_core::{App, Host};
use wristlet_protocol::{Tuple, Tuplet};

use crate::resources::WEATHER_ICONS;

/// Icon index, unsigned integer
pub const WEATHER_ICON_KEY: u32 = 0x0;

/// Temperature text, C string
pub const WEATHER_TEMPERATURE_KEY: u32 = 0x1;

/// Longest temperature text kept, in bytes
pub const TEMPERATURE_LEN: usize = 15;

/// Sync engine storage for the two values
pub const SYNC_BUFFER_SIZE: usize = 32;

/// Largest icon resource
pub const BITMAP_BUFFER_SIZE: usize = 1024;

const INITIAL_ICON: u8 = 1;
const INITIAL_TEMPERATURE: &str = "1234\u{00B0}C";

const WINDOW_NAME: &str = "Weather";
const ICON_FRAME: GRect = GRect::new(32, 10, 80, 80);
const TEMPERATURE_FRAME: GRect = GRect::new(0, 100, SCREEN_WIDTH, 68);

/// Why a synced value was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RejectReason {
    /// Icon index past the icon table; the previous icon stays
    IconOutOfRange(u32),
    /// The icon value is not an integer
    NotAnInteger,
    /// The temperature value is not a valid string
    NotAString,
    Resource(ResourceError),
    Bitmap(BitmapError),
}

/// What a sync change did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncOutcome {
    /// Icon at this index is now shown
    IconShown(usize),
    /// Temperature text replaced
    TemperatureShown,
    Rejected(RejectReason),
    /// Key not used by this app
    UnknownKey(u32),
}

pub struct Weather {
    window: Window,
    icon_layer: Option<LayerId>,
    temperature_layer: Option<LayerId>,
    icon: Option<usize>,
    temperature: String<TEMPERATURE_LEN>,
    bitmap_data: [u8; BITMAP_BUFFER_SIZE],
    last_sync_error: Option<SyncError>,
}

impl Weather {
    pub fn new() -> Self {
        Self {
            window: Window::new(WINDOW_NAME),
            icon_layer: None,
            temperature_layer: None,
            icon: None,
            temperature: String::new(),
            bitmap_data: [0; BITMAP_BUFFER_SIZE],
            last_sync_error: None,
        }
    }

    /// Values the sync set starts from
    pub fn initial_values() -> [Tuplet<'static>; 2] {
        [
            Tuplet::uint8(WEATHER_ICON_KEY, INITIAL_ICON),
            Tuplet::cstring(WEATHER_TEMPERATURE_KEY, INITIAL_TEMPERATURE),
        ]
    }

    /// Apply one changed value to the display
    pub fn apply_change<H: Host + ?Sized>(&mut self, host: &mut H, key: u32, value: &Tuple<'_>) -> SyncOutcome {
        let outcome = match key {
            WEATHER_ICON_KEY => self.show_icon(host, value),
            WEATHER_TEMPERATURE_KEY => self.show_temperature(value),
            other => return SyncOutcome::UnknownKey(other),
        };
        match outcome {
            Ok(outcome) => outcome,
            Err(_reason) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("sync value for key {} rejected: {:?}", key, _reason);
                SyncOutcome::Rejected(_reason)
            }
        }
    }

    /// Index into [`WEATHER_ICONS`] of the icon on screen
    pub fn icon(&self) -> Option<usize> {
        self.icon
    }

    /// Resource id of the icon on screen
    pub fn icon_resource(&self) -> Option<u32> {
        self.icon.map(|index| WEATHER_ICONS[index])
    }

    pub fn temperature(&self) -> &str {
        self.temperature.as_str()
    }

    pub fn last_sync_error(&self) -> Option<SyncError> {
        self.last_sync_error
    }

    fn show_icon<H: Host + ?Sized>(&mut self, host: &mut H, value: &Tuple<'_>) -> Result<SyncOutcome, RejectReason> {
        let raw = value.as_u32().ok_or(RejectReason::NotAnInteger)?;
        let index = raw as usize;
        let resource = *WEATHER_ICONS
            .get(index)
            .ok_or(RejectReason::IconOutOfRange(raw))?;

        let len = host
            .load_resource(resource, &mut self.bitmap_data)
            .map_err(RejectReason::Resource)?;
        let bitmap = BitmapInfo::parse(&self.bitmap_data[..len]).map_err(RejectReason::Bitmap)?;

        if let Some(layer) = self.icon_layer.and_then(|id| self.window.bitmap_layer_mut(id)) {
            layer.set_bitmap(Some(bitmap));
        }
        self.icon = Some(index);
        Ok(SyncOutcome::IconShown(index))
    }

    fn show_temperature(&mut self, value: &Tuple<'_>) -> Result<SyncOutcome, RejectReason> {
        let text = value.as_cstr().ok_or(RejectReason::NotAString)?;
        self.temperature.clear();
        // Cannot fail: truncated to capacity
        let _ = self.temperature.push_str(truncate_str(text, TEMPERATURE_LEN));

        if let Some(layer) = self.temperature_layer.and_then(|id| self.window.text_layer_mut(id)) {
            layer.set_text(self.temperature.as_str());
        }
        Ok(SyncOutcome::TemperatureShown)
    }
}

impl Default for Weather {
    fn default() -> Self {
        Self::new()
    }
}

impl App for Weather {
    const INFO: AppInfo = AppInfo {
        uuid: [
            0x42, 0xC8, 0x6E, 0xA4, 0x1C, 0x3E, 0x4A, 0x07, 0xB8, 0x89, 0x2C, 0xCC, 0xCA, 0x91,
            0x41, 0x98,
        ],
        name: "Pebble Weather",
        company: "Pebble Technology",
        version: (1, 0),
        icon: MenuIcon::Default,
        kind: AppKind::StandardApp,
    };

    const CONFIG: AppConfig = AppConfig {
        tick: None,
        messaging: Some(MessagingConfig {
            inbound: 64,
            outbound: 16,
        }),
    };

    fn window(&self) -> &Window {
        &self.window
    }

    fn window_mut(&mut self) -> &mut Window {
        &mut self.window
    }

    fn on_init<H: Host + ?Sized>(&mut self, host: &mut H) {
        let mut window = Window::new(WINDOW_NAME);
        window.set_background_color(GColor::Black);
        window.set_fullscreen(true);

        self.icon_layer = window.add_bitmap_layer(BitmapLayer::new(ICON_FRAME)).ok();

        let mut temperature = TextLayer::new(TEMPERATURE_FRAME);
        temperature.set_text_color(GColor::White);
        temperature.set_background_color(GColor::Clear);
        temperature.set_font(Font::Gothic28Bold);
        temperature.set_alignment(TextAlignment::Center);
        temperature.set_text(self.temperature.as_str());
        self.temperature_layer = window.add_text_layer(temperature).ok();

        self.window = window;

        if let Err(err) = host.sync_init(SYNC_BUFFER_SIZE, &Self::initial_values()) {
            self.on_sync_error(host, err);
        }

        host.push_window(&self.window, true);
    }

    fn on_deinit<H: Host + ?Sized>(&mut self, host: &mut H) {
        host.sync_deinit();
    }

    fn on_sync_changed<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        key: u32,
        new: &Tuple<'_>,
        _old: Option<&Tuple<'_>>,
    ) {
        self.apply_change(host, key, new);
    }

    fn on_sync_error<H: Host + ?Sized>(&mut self, _host: &mut H, error: SyncError) {
        #[cfg(feature = "defmt")]
        defmt::warn!("weather sync error: {:?}", error);
        self.last_sync_error = Some(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wristlet_protocol::Dictionary;

    #[test]
    fn test_initial_values_fit_sync_buffer() {
        let size = Dictionary::size_for(&Weather::initial_values());
        assert!(size <= SYNC_BUFFER_SIZE);
    }

    #[test]
    fn test_initial_temperature_fits() {
        assert!(INITIAL_TEMPERATURE.len() <= TEMPERATURE_LEN);
    }

    #[test]
    fn test_temperature_frame_spans_screen() {
        assert_eq!(TEMPERATURE_FRAME, GRect::new(0, 100, 144, 68));
    }

    #[test]
    fn test_outbound_buffer_is_minimal() {
        let messaging = Weather::CONFIG.messaging.unwrap();
        assert!(messaging.is_valid());
        assert_eq!(messaging.outbound, 16);
    }
}
