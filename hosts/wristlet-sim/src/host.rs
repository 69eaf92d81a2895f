//! Recording host
//!
//! [`SimHost`] answers every host call from in-memory state and appends what
//! happened to an ordered event log, so scenarios can assert on the exact
//! sequence of side effects an app produced.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use wristlet_core::config::{AppConfig, MessagingConfig};
use wristlet_core::time::WallTime;
use wristlet_core::traits::{
    Clock, Haptics, MessageCallbacks, MessageOutbox, ResourceError, ResourceStore, SyncError,
    SyncService, VibePattern, WindowStack,
};
use wristlet_core::ui::Window;
use wristlet_protocol::{AppMessageError, Dictionary, Tuplet};

use crate::config::{SimConfig, SimConfigError};
use crate::resources::ResourceTable;
use crate::sync::{SyncChange, SyncEngine};

/// One observable side effect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    WindowPushed { name: String, animated: bool },
    Vibrated(VibePattern),
    /// Payload handed to the transport
    MessageSent(Vec<u8>),
    /// The transport refused a payload
    SendRefused(AppMessageError),
    OutboxReleased,
    /// Release without a matching acquire
    OutboxOverReleased,
    CallbacksRegistered,
    CallbacksDeregistered,
    RegistrationRefused(AppMessageError),
    SyncStarted { buffer_size: usize },
    SyncStopped,
    ResourceLoaded { id: u32, len: usize },
    ResourceFailed { id: u32, error: ResourceError },
}

pub struct SimHost {
    clock: WallTime,
    connected: bool,
    outbox_available: bool,
    send_result: Result<(), AppMessageError>,
    fail_register: bool,
    fail_deregister: bool,
    missing_resources: BTreeSet<u32>,
    resources: ResourceTable,

    inbound_capacity: usize,
    outbox: Vec<u8>,
    outbox_held: bool,
    callbacks_live: bool,

    sync: Option<SyncEngine>,
    pending_sync: Vec<SyncChange>,

    events: Vec<HostEvent>,
}

impl SimHost {
    /// Host with a connected phone and no faults
    pub fn new(app: &AppConfig) -> Self {
        Self::build(app.messaging, &SimConfig::default(), WallTime::from_epoch_seconds(0))
    }

    /// Host set up from a scenario
    ///
    /// The scenario's message buffer sizes, if given, replace the app's.
    pub fn with_config(app: &AppConfig, config: &SimConfig) -> Result<Self, SimConfigError> {
        let clock = config.start_time()?;
        Ok(Self::build(config.messaging.or(app.messaging), config, clock))
    }

    fn build(messaging: Option<MessagingConfig>, config: &SimConfig, clock: WallTime) -> Self {
        let (inbound, outbound) =
            messaging.map_or((0, 0), |m| (m.inbound as usize, m.outbound as usize));
        Self {
            clock,
            connected: config.connected,
            outbox_available: config.outbox_available,
            send_result: config.send_result.to_result(),
            fail_register: config.fail_register,
            fail_deregister: config.fail_deregister,
            missing_resources: config.missing_resources.iter().copied().collect(),
            resources: ResourceTable::new(),
            inbound_capacity: inbound,
            outbox: vec![0; outbound],
            outbox_held: false,
            callbacks_live: false,
            sync: None,
            pending_sync: Vec::new(),
            events: Vec::new(),
        }
    }

    // Fault switches

    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    pub fn set_outbox_available(&mut self, available: bool) {
        self.outbox_available = available;
    }

    pub fn set_send_result(&mut self, result: Result<(), AppMessageError>) {
        self.send_result = result;
    }

    pub fn fail_register(&mut self, fail: bool) {
        self.fail_register = fail;
    }

    pub fn fail_deregister(&mut self, fail: bool) {
        self.fail_deregister = fail;
    }

    /// Make a resource fail to load even if it is in the table
    pub fn hide_resource(&mut self, id: u32) {
        self.missing_resources.insert(id);
    }

    pub fn resources_mut(&mut self) -> &mut ResourceTable {
        &mut self.resources
    }

    pub fn set_time(&mut self, time: WallTime) {
        self.clock = time;
    }

    // Observations

    pub fn events(&self) -> &[HostEvent] {
        &self.events
    }

    /// Drain the event log
    pub fn take_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.events)
    }

    /// Payloads handed to the transport, oldest first
    pub fn sent_payloads(&self) -> Vec<&[u8]> {
        self.events
            .iter()
            .filter_map(|event| match event {
                HostEvent::MessageSent(bytes) => Some(bytes.as_slice()),
                _ => None,
            })
            .collect()
    }

    pub fn vibrations(&self) -> Vec<VibePattern> {
        self.events
            .iter()
            .filter_map(|event| match event {
                HostEvent::Vibrated(pattern) => Some(*pattern),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: &HostEvent) -> usize {
        self.events.iter().filter(|event| *event == wanted).count()
    }

    pub fn callbacks_live(&self) -> bool {
        self.callbacks_live
    }

    pub fn outbox_held(&self) -> bool {
        self.outbox_held
    }

    pub fn inbound_capacity(&self) -> usize {
        self.inbound_capacity
    }

    pub fn outbound_capacity(&self) -> usize {
        self.outbox.len()
    }

    pub fn sync_engine(&self) -> Option<&SyncEngine> {
        self.sync.as_ref()
    }

    // Runtime hooks

    /// Feed an inbound message to the sync engine
    pub(crate) fn merge_sync(&mut self, message: &Dictionary<'_>) -> Result<(), SyncError> {
        let Some(engine) = self.sync.as_mut() else {
            return Ok(());
        };
        let changes = engine.update(message)?;
        debug!(changes = changes.len(), "sync update");
        self.pending_sync.extend(changes);
        Ok(())
    }

    pub(crate) fn drain_sync_changes(&mut self) -> Vec<SyncChange> {
        std::mem::take(&mut self.pending_sync)
    }

    fn record(&mut self, event: HostEvent) {
        debug!(?event, "host");
        self.events.push(event);
    }
}

impl MessageOutbox for SimHost {
    fn out_acquire(&mut self) -> Result<(), AppMessageError> {
        if !self.connected {
            warn!("outbox acquire: not connected");
            return Err(AppMessageError::NotConnected);
        }
        if !self.outbox_available || self.outbox_held {
            warn!("outbox acquire: busy");
            return Err(AppMessageError::Busy);
        }
        self.outbox.fill(0);
        self.outbox_held = true;
        Ok(())
    }

    fn out_buffer(&mut self) -> &mut [u8] {
        &mut self.outbox
    }

    fn out_send(&mut self, len: usize) -> Result<(), AppMessageError> {
        if !self.outbox_held {
            return Err(AppMessageError::InvalidArgs);
        }
        if len > self.outbox.len() {
            return Err(AppMessageError::BufferOverflow);
        }
        match self.send_result {
            Ok(()) => {
                let payload = self.outbox[..len].to_vec();
                self.record(HostEvent::MessageSent(payload));
                Ok(())
            }
            Err(err) => {
                warn!(?err, "send refused");
                self.record(HostEvent::SendRefused(err));
                Err(err)
            }
        }
    }

    fn out_release(&mut self) -> Result<(), AppMessageError> {
        if self.outbox_held {
            self.outbox_held = false;
            self.record(HostEvent::OutboxReleased);
            Ok(())
        } else {
            warn!("outbox released twice");
            self.record(HostEvent::OutboxOverReleased);
            Err(AppMessageError::AlreadyReleased)
        }
    }
}

impl MessageCallbacks for SimHost {
    fn register_callbacks(&mut self) -> Result<(), AppMessageError> {
        let refusal = if self.callbacks_live {
            Some(AppMessageError::CallbackAlreadyRegistered)
        } else if self.fail_register {
            Some(AppMessageError::InvalidArgs)
        } else {
            None
        };
        if let Some(err) = refusal {
            warn!(?err, "callback registration refused");
            self.record(HostEvent::RegistrationRefused(err));
            return Err(err);
        }
        self.callbacks_live = true;
        self.record(HostEvent::CallbacksRegistered);
        Ok(())
    }

    fn deregister_callbacks(&mut self) -> Result<(), AppMessageError> {
        let refusal = if !self.callbacks_live {
            Some(AppMessageError::CallbackNotRegistered)
        } else if self.fail_deregister {
            Some(AppMessageError::InvalidArgs)
        } else {
            None
        };
        if let Some(err) = refusal {
            warn!(?err, "callback deregistration refused");
            self.record(HostEvent::RegistrationRefused(err));
            return Err(err);
        }
        self.callbacks_live = false;
        self.record(HostEvent::CallbacksDeregistered);
        Ok(())
    }
}

impl Haptics for SimHost {
    fn vibrate(&mut self, pattern: VibePattern) {
        self.record(HostEvent::Vibrated(pattern));
    }
}

impl Clock for SimHost {
    fn now(&self) -> WallTime {
        self.clock
    }
}

impl ResourceStore for SimHost {
    fn load_resource(&mut self, id: u32, buffer: &mut [u8]) -> Result<usize, ResourceError> {
        let result = if self.missing_resources.contains(&id) {
            Err(ResourceError::NotFound)
        } else {
            self.resources.load(id, buffer)
        };
        match result {
            Ok(len) => self.record(HostEvent::ResourceLoaded { id, len }),
            Err(error) => {
                warn!(id, ?error, "resource load failed");
                self.record(HostEvent::ResourceFailed { id, error });
            }
        }
        result
    }
}

impl SyncService for SimHost {
    fn sync_init(&mut self, buffer_size: usize, initial: &[Tuplet<'_>]) -> Result<(), SyncError> {
        if self.sync.is_some() {
            return Err(SyncError::AlreadyActive);
        }
        let (engine, changes) = SyncEngine::init(buffer_size, initial)?;
        self.sync = Some(engine);
        self.pending_sync.extend(changes);
        self.record(HostEvent::SyncStarted { buffer_size });
        Ok(())
    }

    fn sync_deinit(&mut self) {
        if self.sync.take().is_some() {
            self.pending_sync.clear();
            self.record(HostEvent::SyncStopped);
        }
    }
}

impl WindowStack for SimHost {
    fn push_window(&mut self, window: &Window, animated: bool) {
        self.record(HostEvent::WindowPushed {
            name: window.name().to_string(),
            animated,
        });
    }
}
