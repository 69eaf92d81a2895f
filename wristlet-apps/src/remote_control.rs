//! Remote command sender
//!
//! Shows the time. Up sends UP to the phone and confirms with a short
//! pulse; down sends DOWN. Inbound commands are decoded but have no
//! effect here.

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

/// Both directions carry the command under this key
pub const CMD_KEY: u32 = 0x00;

const WINDOW_NAME: &str = "Remote";

pub struct RemoteControl {
    window: Window,
    time_layer: Option<LayerId>,
    callbacks: CallbackRegistration,
    stats: DeliveryStats,
}

impl RemoteControl {
    pub fn new() -> Self {
        Self {
            window: Window::new(WINDOW_NAME),
            time_layer: None,
            callbacks: CallbackRegistration::new(),
            stats: DeliveryStats::new(),
        }
    }

    /// Send one command to the phone
    pub fn send<H: Host + ?Sized>(&mut self, host: &mut H, command: Command) -> Result<(), SendError> {
        send_command(host, CMD_KEY, command)
    }

    /// Decode an inbound payload; no command has a local effect
    pub fn receive<H: Host + ?Sized>(&mut self, _host: &mut H, message: &Dictionary<'_>) -> ReceiveOutcome {
        match lookup_command(message, CMD_KEY) {
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

impl Default for RemoteControl {
    fn default() -> Self {
        Self::new()
    }
}

impl App for RemoteControl {
    const INFO: AppInfo = AppInfo {
        uuid: [
            0xEC, 0x7E, 0xE5, 0xC6, 0x8D, 0xDF, 0x40, 0x89, 0xAA, 0x84, 0xC3, 0x39, 0x6A, 0x11,
            0xCC, 0x95,
        ],
        name: "GPS SMS Time",
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
        match button {
            ButtonId::Up => {
                if let Err(_err) = self.send(host, Command::Up) {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("send UP skipped: {:?}", _err);
                }
                // Local confirmation, whether or not the send went out
                host.vibrate(VibePattern::ShortPulse);
            }
            ButtonId::Down => {
                if let Err(_err) = self.send(host, Command::Down) {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("send DOWN skipped: {:?}", _err);
                }
            }
            _ => {}
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
