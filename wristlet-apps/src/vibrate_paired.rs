//! Paired vibration demo
//!
//! Shows the time and long-pulses the motor when the paired device sends
//! VIBE. Up/down clicks send UP/DOWN to the paired device.

use wristlet_core::config::{AppConfig, AppInfo, AppKind, MenuIcon, MessagingConfig, TickUnit};
use wristlet_core::geometry::GColor;
use wristlet_core::input::ButtonId;
use wristlet_core::messaging::{
    lookup_command, send_command, CallbackRegistration, Command, DeliveryStats, ReceiveOutcome,
    SendError,
};
use wristlet_core::time::WallTime;
use wristlet_core::traits::VibePattern;
use wristlet_core::ui::{LayerId, Window};
use wristlet_core::{App, Host};
use wristlet_protocol::{AppMessageError, Dictionary};

use crate::clock;

/// Inbound payloads carry their command under this key
pub const MSG_IN_KEY: u32 = 0x00;

/// Outbound payloads carry their command under this key
pub const MSG_OUT_KEY: u32 = 0x01;

const WINDOW_NAME: &str = "Happy Hour";

pub struct VibratePaired {
    window: Window,
    time_layer: Option<LayerId>,
    callbacks: CallbackRegistration,
    stats: DeliveryStats,
}

impl VibratePaired {
    pub fn new() -> Self {
        Self {
            window: Window::new(WINDOW_NAME),
            time_layer: None,
            callbacks: CallbackRegistration::new(),
            stats: DeliveryStats::new(),
        }
    }

    /// Send one command to the paired device
    pub fn send<H: Host + ?Sized>(&mut self, host: &mut H, command: Command) -> Result<(), SendError> {
        send_command(host, MSG_OUT_KEY, command)
    }

    /// Act on an inbound payload
    ///
    /// VIBE long-pulses the motor. UP and DOWN are accepted without effect.
    pub fn receive<H: Host + ?Sized>(&mut self, host: &mut H, message: &Dictionary<'_>) -> ReceiveOutcome {
        match lookup_command(message, MSG_IN_KEY) {
            Ok(Command::Vibe) => {
                host.vibrate(VibePattern::LongPulse);
                ReceiveOutcome::Acted(Command::Vibe)
            }
            Ok(command) => ReceiveOutcome::NoEffect(command),
            Err(err) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("ignoring message: {:?}", err);
                ReceiveOutcome::Ignored(err)
            }
        }
    }

    pub fn delivery_stats(&self) -> &DeliveryStats {
        &self.stats
    }

    pub fn callbacks(&self) -> &CallbackRegistration {
        &self.callbacks
    }

    /// Text currently shown by the clock
    pub fn time_text(&self) -> &str {
        self.time_layer
            .and_then(|id| self.window.text_layer(id))
            .map_or("", |layer| layer.text())
    }

    fn show_time(&mut self, time: &WallTime) {
        let text = clock::time_text(time);
        if let Some(layer) = self.time_layer.and_then(|id| self.window.text_layer_mut(id)) {
            layer.set_text(&text);
        }
    }
}

impl Default for VibratePaired {
    fn default() -> Self {
        Self::new()
    }
}

impl App for VibratePaired {
    const INFO: AppInfo = AppInfo {
        uuid: [
            0x7B, 0xD1, 0x03, 0xD3, 0x0F, 0x87, 0x4D, 0x31, 0xAE, 0xF8, 0xF5, 0x23, 0x7A, 0x79,
            0xC7, 0x2E,
        ],
        name: "Happy Hour",
        company: "Pebble",
        version: (3, 0),
        icon: MenuIcon::Default,
        kind: AppKind::StandardApp,
    };

    const CONFIG: AppConfig = AppConfig {
        tick: Some(TickUnit::Second),
        messaging: Some(MessagingConfig {
            inbound: 256,
            outbound: 256,
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
        self.time_layer = window.add_text_layer(clock::time_layer()).ok();
        window.set_click_config(clock::up_down_clicks());
        self.window = window;
        host.push_window(&self.window, true);

        let now = host.now();
        self.show_time(&now);

        self.callbacks.register(host);
    }

    fn on_deinit<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.callbacks.deregister(host);
    }

    fn on_tick<H: Host + ?Sized>(&mut self, _host: &mut H, time: &WallTime) {
        self.show_time(time);
    }

    fn on_click<H: Host + ?Sized>(&mut self, host: &mut H, button: ButtonId) {
        let command = match button {
            ButtonId::Up => Command::Up,
            ButtonId::Down => Command::Down,
            _ => return,
        };
        if let Err(_err) = self.send(host, command) {
            #[cfg(feature = "defmt")]
            defmt::debug!("send {:?} skipped: {:?}", command, _err);
        }
    }

    fn on_message<H: Host + ?Sized>(&mut self, host: &mut H, message: &Dictionary<'_>) {
        self.receive(host, message);
    }

    fn on_send_failed<H: Host + ?Sized>(&mut self, _host: &mut H, reason: AppMessageError) {
        self.stats.record_send_failure(reason);
    }

    fn on_dropped<H: Host + ?Sized>(&mut self, _host: &mut H, reason: AppMessageError) {
        self.stats.record_drop(reason);
    }
}
