//! Digital watch face
//!
//! One full-window text layer showing 12-hour time, updated every second.

use heapless::String;

use wristlet_core::config::{AppConfig, AppInfo, AppKind, MenuIcon, TickUnit};
use wristlet_core::time::{format_time, WallTime};
use wristlet_core::ui::{LayerId, TextLayer, Window};
use wristlet_core::{App, Host};

/// e.g. "09:41:07 AM"
pub const TIME_FORMAT: &str = "%I:%M:%S %p";

pub const TIME_TEXT_LEN: usize = 32;

const WINDOW_NAME: &str = "Digital Watch";

pub struct DigitalWatch {
    window: Window,
    text_layer: Option<LayerId>,
}

impl DigitalWatch {
    pub fn new() -> Self {
        Self {
            window: Window::new(WINDOW_NAME),
            text_layer: None,
        }
    }

    pub fn time_text(&self) -> &str {
        self.text_layer
            .and_then(|id| self.window.text_layer(id))
            .map_or("", |layer| layer.text())
    }
}

impl Default for DigitalWatch {
    fn default() -> Self {
        Self::new()
    }
}

impl App for DigitalWatch {
    const INFO: AppInfo = AppInfo {
        uuid: [
            0x69, 0x5C, 0xE6, 0xFE, 0x5D, 0xC1, 0x43, 0x81, 0x85, 0x29, 0x9A, 0x82, 0xDB, 0x09,
            0xA0, 0x69,
        ],
        name: "Digital Watch",
        company: "Initek",
        version: (1, 0),
        icon: MenuIcon::Default,
        kind: AppKind::WatchFace,
    };

    const CONFIG: AppConfig = AppConfig {
        tick: Some(TickUnit::Second),
        messaging: None,
    };

    fn window(&self) -> &Window {
        &self.window
    }

    fn window_mut(&mut self) -> &mut Window {
        &mut self.window
    }

    fn on_init<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.window = Window::new(WINDOW_NAME);
        host.push_window(&self.window, true);

        // Blank until the first tick
        let layer = TextLayer::new(self.window.frame());
        self.text_layer = self.window.add_text_layer(layer).ok();
    }

    fn on_tick<H: Host + ?Sized>(&mut self, _host: &mut H, time: &WallTime) {
        let text: String<TIME_TEXT_LEN> = format_time(TIME_FORMAT, time);
        if let Some(layer) = self.text_layer.and_then(|id| self.window.text_layer_mut(id)) {
            layer.set_text(&text);
        }
    }
}
