use crate::looper::LooperHandle;
use crate::midi::{
    DeviceDescriptor, DeviceKind, MidiError, MidiService, OpenListener, OpenedDevice,
    PortDescriptor, Result,
};
use chrono::{DateTime, Local};
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// What the mock does with an open request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenBehavior {
    /// Post the result to the looper straight away.
    Immediate,
    /// Hold the request until [`MockMidiService::complete_pending`].
    Deferred,
    /// Drop the request; the listener never fires.
    Fail,
}

struct PendingOpen {
    device: DeviceDescriptor,
    listener: OpenListener,
    looper: LooperHandle,
}

/// Scripted [`MidiService`] for tests and `--mock` runs.
pub struct MockMidiService {
    devices: Vec<DeviceDescriptor>,
    behavior: OpenBehavior,
    pending: Mutex<Vec<PendingOpen>>,
    open_requests: Mutex<Vec<u32>>,
    sent: Arc<Mutex<Vec<Vec<u8>>>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockMidiService {
    pub fn new(devices: Vec<DeviceDescriptor>) -> Self {
        Self::with_behavior(devices, OpenBehavior::Immediate)
    }

    pub fn with_behavior(devices: Vec<DeviceDescriptor>, behavior: OpenBehavior) -> Self {
        Self {
            devices,
            behavior,
            pending: Mutex::new(Vec::new()),
            open_requests: Mutex::new(Vec::new()),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A small fixed device set: a pass-through port that only reports an
    /// output, and a software player with an input port.
    pub fn demo() -> Self {
        Self::new(vec![
            DeviceDescriptor::new(0, "Midi Through")
                .with_port(PortDescriptor::output(0, "Midi Through Port-0")),
            DeviceDescriptor::new(1, "Mock Synth Player")
                .with_port(PortDescriptor::input(0, "Mock Synth Player In")),
        ])
    }

    /// Delivers every deferred open. Returns how many were posted.
    pub fn complete_pending(&self) -> usize {
        let pending: Vec<PendingOpen> = lock(&self.pending).drain(..).collect();
        let mut posted = 0;
        for open in pending {
            if self.deliver(open) {
                posted += 1;
            }
        }
        posted
    }

    pub fn pending_count(&self) -> usize {
        lock(&self.pending).len()
    }

    /// Ids of every device an open was requested for, in order.
    pub fn open_requests(&self) -> Vec<u32> {
        lock(&self.open_requests).clone()
    }

    /// Every byte buffer sent through devices this mock opened.
    pub fn sent(&self) -> Vec<Vec<u8>> {
        lock(&self.sent).clone()
    }

    fn deliver(&self, open: PendingOpen) -> bool {
        let device: Arc<dyn OpenedDevice> =
            Arc::new(MockDevice::new(open.device, self.sent.clone()));
        open.listener.post_to(&open.looper, device)
    }
}

impl MidiService for MockMidiService {
    fn list_devices(&self) -> Result<Vec<DeviceDescriptor>> {
        Ok(self.devices.clone())
    }

    fn open_device(&self, device: &DeviceDescriptor, listener: OpenListener, looper: LooperHandle) {
        lock(&self.open_requests).push(device.id);
        let open = PendingOpen {
            device: device.clone(),
            listener,
            looper,
        };
        match self.behavior {
            OpenBehavior::Immediate => {
                self.deliver(open);
            }
            OpenBehavior::Deferred => lock(&self.pending).push(open),
            OpenBehavior::Fail => debug!("Mock open of {} dropped", device.display_name()),
        }
    }
}

/// Opened device that records what is sent to it.
pub struct MockDevice {
    info: DeviceDescriptor,
    opened_at: DateTime<Local>,
    closed: AtomicBool,
    sent: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl MockDevice {
    pub fn new(info: DeviceDescriptor, sent: Arc<Mutex<Vec<Vec<u8>>>>) -> Self {
        Self {
            info,
            opened_at: Local::now(),
            closed: AtomicBool::new(false),
            sent,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl OpenedDevice for MockDevice {
    fn info(&self) -> &DeviceDescriptor {
        &self.info
    }

    fn kind(&self) -> DeviceKind {
        DeviceKind::Virtual
    }

    fn opened_at(&self) -> DateTime<Local> {
        self.opened_at
    }

    fn send(&self, bytes: &[u8]) -> Result<()> {
        if self.is_closed() {
            return Err(MidiError::Send("device closed".to_string()));
        }
        lock(&self.sent).push(bytes.to_vec());
        Ok(())
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
