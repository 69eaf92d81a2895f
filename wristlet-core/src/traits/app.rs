//! The app side of the host boundary

use wristlet_protocol::{AppMessageError, Dictionary, Tuple};

use super::host::{Host, SyncError};
use crate::config::{AppConfig, AppInfo};
use crate::input::ButtonId;
use crate::time::WallTime;
use crate::ui::Window;

/// A watch app driven by the host event loop
///
/// Handlers run to completion on the host's single thread and must not
/// block. Only [`App::on_init`] is mandatory; the host only calls the other
/// handlers for events the app subscribed to in [`App::CONFIG`] or by
/// registering message callbacks.
pub trait App {
    /// Identity block read by the app registry
    const INFO: AppInfo;

    /// Subscribed events and message buffer sizes
    const CONFIG: AppConfig;

    /// The app's single window
    fn window(&self) -> &Window;

    fn window_mut(&mut self) -> &mut Window;

    /// App launched
    fn on_init<H: Host + ?Sized>(&mut self, host: &mut H);

    /// App about to exit
    fn on_deinit<H: Host + ?Sized>(&mut self, _host: &mut H) {}

    /// Periodic tick at the configured granularity
    fn on_tick<H: Host + ?Sized>(&mut self, _host: &mut H, _time: &WallTime) {}

    /// Single click (or repeat) on a bound button
    fn on_click<H: Host + ?Sized>(&mut self, _host: &mut H, _button: ButtonId) {}

    /// Inbound message received
    fn on_message<H: Host + ?Sized>(&mut self, _host: &mut H, _message: &Dictionary<'_>) {}

    /// An outbound message was not delivered
    fn on_send_failed<H: Host + ?Sized>(&mut self, _host: &mut H, _reason: AppMessageError) {}

    /// An inbound message was dropped before reaching the app
    fn on_dropped<H: Host + ?Sized>(&mut self, _host: &mut H, _reason: AppMessageError) {}

    /// A synchronised value changed
    fn on_sync_changed<H: Host + ?Sized>(
        &mut self,
        _host: &mut H,
        _key: u32,
        _new: &Tuple<'_>,
        _old: Option<&Tuple<'_>>,
    ) {
    }

    /// The sync engine failed
    fn on_sync_error<H: Host + ?Sized>(&mut self, _host: &mut H, _error: SyncError) {}
}
