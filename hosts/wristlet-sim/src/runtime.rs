//! Host event loop
//!
//! [`Runtime`] owns one app and one host and turns simulated events into
//! handler calls the way the device firmware would: only subscribed events
//! are dispatched, pending sync changes are delivered after every handler,
//! and dirty layers are collected on [`Runtime::render`].

use tracing::{debug, warn};

use wristlet_core::input::ButtonId;
use wristlet_core::time::WallTime;
use wristlet_core::traits::SyncError;
use wristlet_core::ui::Layer;
use wristlet_core::{App, Host};
use wristlet_protocol::{AppMessageError, Dictionary};

use crate::host::SimHost;
use crate::sync::SyncChange;

/// Host-side hooks the event loop needs beyond the app-facing services
pub trait Dispatch: Host {
    fn set_time(&mut self, time: WallTime);

    /// Largest inbound payload the app's buffer accepts
    fn inbound_capacity(&self) -> usize;

    fn callbacks_live(&self) -> bool;

    fn sync_active(&self) -> bool;

    /// Merge an inbound message into the sync set
    fn sync_update(&mut self, message: &Dictionary<'_>) -> Result<(), SyncError>;

    /// Changes not yet reported to the app
    fn take_sync_changes(&mut self) -> Vec<SyncChange>;
}

/// What happened to an inbound payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Reported to the app as dropped
    Dropped(AppMessageError),
    /// Nobody was listening
    Ignored,
    /// Merged into the sync set
    Synced,
    /// Sync engine refused the update
    SyncFailed(SyncError),
    /// Handed to the app's message handler
    Received,
}

pub struct Runtime<A: App, H: Dispatch = SimHost> {
    app: A,
    host: H,
    running: bool,
}

impl<A: App, H: Dispatch> Runtime<A, H> {
    pub fn new(app: A, host: H) -> Self {
        Self {
            app,
            host,
            running: false,
        }
    }

    pub fn app(&self) -> &A {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut A {
        &mut self.app
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Borrow the app and the host together, to call app methods directly
    pub fn parts_mut(&mut self) -> (&mut A, &mut H) {
        (&mut self.app, &mut self.host)
    }

    /// Split into the app and the host
    pub fn into_parts(self) -> (A, H) {
        (self.app, self.host)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Launch the app
    pub fn start(&mut self) {
        debug!(app = A::INFO.name, "init");
        self.app.on_init(&mut self.host);
        self.running = true;
        self.deliver_sync_changes();
    }

    /// Exit the app
    pub fn stop(&mut self) {
        debug!(app = A::INFO.name, "deinit");
        self.app.on_deinit(&mut self.host);
        self.running = false;
    }

    /// Set the clock and tick, if the app subscribed to ticks
    pub fn tick(&mut self, time: WallTime) -> bool {
        self.host.set_time(time);
        if A::CONFIG.tick.is_none() {
            return false;
        }
        debug!(?time, "tick");
        self.app.on_tick(&mut self.host, &time);
        self.deliver_sync_changes();
        true
    }

    /// Advance the clock by one tick period and tick
    pub fn advance(&mut self) -> bool {
        let Some(unit) = A::CONFIG.tick else {
            return false;
        };
        let next = self.host.now().plus_seconds(unit.period_s() as u64);
        self.tick(next)
    }

    /// Single click, if the window binds the button
    pub fn click(&mut self, button: ButtonId) -> bool {
        if !self.app.window().click_config().is_bound(button) {
            return false;
        }
        debug!(?button, "click");
        self.app.on_click(&mut self.host, button);
        self.deliver_sync_changes();
        true
    }

    /// Hold a button for `held_ms`
    ///
    /// Repeating bindings fire once on press and again every repeat interval.
    /// Returns the number of clicks dispatched.
    pub fn hold(&mut self, button: ButtonId, held_ms: u32) -> u32 {
        let Some(binding) = self.app.window().click_config().binding(button) else {
            return 0;
        };
        let clicks = binding.clicks_for_hold(held_ms);
        for _ in 0..clicks {
            self.click(button);
        }
        clicks
    }

    /// Deliver an inbound payload from the phone
    pub fn deliver(&mut self, bytes: &[u8]) -> Delivery {
        if bytes.len() > self.host.inbound_capacity() {
            debug!(len = bytes.len(), "inbound message too large");
            return self.drop_inbound(AppMessageError::BufferOverflow);
        }
        let Ok(message) = Dictionary::parse(bytes) else {
            debug!("inbound message malformed");
            return self.drop_inbound(AppMessageError::InvalidArgs);
        };

        let delivery = if self.host.sync_active() {
            match self.host.sync_update(&message) {
                Ok(()) => Delivery::Synced,
                Err(err) => {
                    self.app.on_sync_error(&mut self.host, err);
                    Delivery::SyncFailed(err)
                }
            }
        } else if self.host.callbacks_live() {
            debug!(tuples = message.len(), "message received");
            self.app.on_message(&mut self.host, &message);
            Delivery::Received
        } else {
            Delivery::Ignored
        };
        self.deliver_sync_changes();
        delivery
    }

    /// Report that an earlier outbound message was not acknowledged
    pub fn outbound_failed(&mut self, reason: AppMessageError) {
        debug!(?reason, status = reason.to_byte(), "outbound failed");
        self.app.on_send_failed(&mut self.host, reason);
        self.deliver_sync_changes();
    }

    /// Report the status byte returned for an outbound message
    ///
    /// `0x00` is an acknowledgement. Other known codes reach the app as a
    /// send failure; unknown codes are logged and dropped.
    pub fn acknowledge(&mut self, status: u8) -> Option<AppMessageError> {
        if status == 0 {
            debug!("outbound acknowledged");
            return None;
        }
        match AppMessageError::from_byte(status) {
            Some(reason) => {
                self.outbound_failed(reason);
                Some(reason)
            }
            None => {
                warn!(status, "unknown outbound status");
                None
            }
        }
    }

    /// Redraw: returns the dirty layers and marks them clean
    pub fn render(&mut self) -> Vec<Layer> {
        let window = self.app.window_mut();
        let dirty: Vec<Layer> = window
            .layers()
            .filter(|layer| layer.is_dirty())
            .cloned()
            .collect();
        window.mark_clean();
        dirty
    }

    fn drop_inbound(&mut self, reason: AppMessageError) -> Delivery {
        self.app.on_dropped(&mut self.host, reason);
        Delivery::Dropped(reason)
    }

    fn deliver_sync_changes(&mut self) {
        loop {
            let changes = self.host.take_sync_changes();
            if changes.is_empty() {
                break;
            }
            for change in &changes {
                let Some(new) = change.new_value() else {
                    continue;
                };
                let old = change.old_value();
                self.app
                    .on_sync_changed(&mut self.host, change.key, &new, old.as_ref());
            }
        }
    }
}

impl Dispatch for SimHost {
    fn set_time(&mut self, time: WallTime) {
        SimHost::set_time(self, time);
    }

    fn inbound_capacity(&self) -> usize {
        SimHost::inbound_capacity(self)
    }

    fn callbacks_live(&self) -> bool {
        SimHost::callbacks_live(self)
    }

    fn sync_active(&self) -> bool {
        self.sync_engine().is_some()
    }

    fn sync_update(&mut self, message: &Dictionary<'_>) -> Result<(), SyncError> {
        self.merge_sync(message)
    }

    fn take_sync_changes(&mut self) -> Vec<SyncChange> {
        self.drain_sync_changes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wristlet_core::config::{AppConfig, AppInfo, AppKind, MenuIcon, MessagingConfig};
    use wristlet_core::input::{ClickBinding, ClickConfig};
    use wristlet_core::traits::{Clock, MessageCallbacks};
    use wristlet_core::ui::{TextLayer, Window};
    use wristlet_protocol::{DictionaryWriter, Tuplet};

    /// Counts handler calls; binds only Select
    struct Probe {
        window: Window,
        clicks: u32,
        messages: u32,
        dropped: Vec<AppMessageError>,
        send_failed: Vec<AppMessageError>,
    }

    impl Probe {
        fn new() -> Self {
            Self {
                window: Window::new("Probe"),
                clicks: 0,
                messages: 0,
                dropped: Vec::new(),
                send_failed: Vec::new(),
            }
        }
    }

    impl App for Probe {
        const INFO: AppInfo = AppInfo {
            uuid: [0; 16],
            name: "Probe",
            company: "Test",
            version: (1, 0),
            icon: MenuIcon::Default,
            kind: AppKind::StandardApp,
        };

        const CONFIG: AppConfig = AppConfig {
            tick: None,
            messaging: Some(MessagingConfig {
                inbound: 16,
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
            let mut clicks = ClickConfig::new();
            clicks.bind(ButtonId::Select, ClickBinding::repeating(100));
            self.window.set_click_config(clicks);
            let _ = self.window.add_text_layer(TextLayer::new(self.window.frame()));
            let _ = host.register_callbacks();
        }

        fn on_click<H: Host + ?Sized>(&mut self, _host: &mut H, _button: ButtonId) {
            self.clicks += 1;
        }

        fn on_message<H: Host + ?Sized>(&mut self, _host: &mut H, _message: &Dictionary<'_>) {
            self.messages += 1;
        }

        fn on_dropped<H: Host + ?Sized>(&mut self, _host: &mut H, reason: AppMessageError) {
            self.dropped.push(reason);
        }

        fn on_send_failed<H: Host + ?Sized>(&mut self, _host: &mut H, reason: AppMessageError) {
            self.send_failed.push(reason);
        }
    }

    fn runtime() -> Runtime<Probe> {
        let mut runtime = Runtime::new(Probe::new(), SimHost::new(&Probe::CONFIG));
        runtime.start();
        runtime
    }

    fn payload(tuplets: &[Tuplet<'_>]) -> Vec<u8> {
        let mut buffer = vec![0u8; 64];
        let mut writer = DictionaryWriter::new(&mut buffer).unwrap();
        writer.write_all(tuplets).unwrap();
        let len = writer.end();
        buffer.truncate(len);
        buffer
    }

    #[test]
    fn test_tick_needs_subscription() {
        let mut runtime = runtime();
        let time = WallTime::new(2013, 4, 12, 1, 2, 3).unwrap();
        assert!(!runtime.tick(time));
        assert_eq!(runtime.host().now(), time);
    }

    #[test]
    fn test_unbound_click_ignored() {
        let mut runtime = runtime();
        assert!(!runtime.click(ButtonId::Up));
        assert!(runtime.click(ButtonId::Select));
        assert_eq!(runtime.app().clicks, 1);
    }

    #[test]
    fn test_hold_repeats() {
        let mut runtime = runtime();
        assert_eq!(runtime.hold(ButtonId::Select, 350), 4);
        assert_eq!(runtime.app().clicks, 4);
        assert_eq!(runtime.hold(ButtonId::Back, 350), 0);
    }

    #[test]
    fn test_oversize_message_dropped() {
        let mut runtime = runtime();
        let bytes = payload(&[Tuplet::cstring(0, "longer than sixteen")]);
        assert_eq!(
            runtime.deliver(&bytes),
            Delivery::Dropped(AppMessageError::BufferOverflow)
        );
        assert_eq!(runtime.app().dropped, vec![AppMessageError::BufferOverflow]);
        assert_eq!(runtime.app().messages, 0);
    }

    #[test]
    fn test_acknowledge_status_bytes() {
        let mut runtime = runtime();
        assert_eq!(runtime.acknowledge(0x00), None);
        assert_eq!(runtime.acknowledge(0x02), Some(AppMessageError::SendTimeout));
        assert_eq!(runtime.acknowledge(0x08), Some(AppMessageError::NotConnected));
        assert_eq!(runtime.acknowledge(0x55), None);
        assert_eq!(
            runtime.app().send_failed,
            vec![AppMessageError::SendTimeout, AppMessageError::NotConnected]
        );
    }

    #[test]
    fn test_malformed_message_dropped() {
        let mut runtime = runtime();
        assert_eq!(
            runtime.deliver(&[2, 0, 0]),
            Delivery::Dropped(AppMessageError::InvalidArgs)
        );
    }

    #[test]
    fn test_message_needs_live_callbacks() {
        let mut runtime = runtime();
        let bytes = payload(&[Tuplet::uint8(0, 1)]);
        assert_eq!(runtime.deliver(&bytes), Delivery::Received);

        runtime.host_mut().deregister_callbacks().unwrap();
        assert_eq!(runtime.deliver(&bytes), Delivery::Ignored);
        assert_eq!(runtime.app().messages, 1);
    }

    #[test]
    fn test_render_cleans_layers() {
        let mut runtime = runtime();
        assert_eq!(runtime.render().len(), 1);
        assert!(runtime.render().is_empty());
    }
}
