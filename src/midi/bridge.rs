//! Asynchronous open requests.
//!
//! [`OpenRequestBridge`] asks the [`MidiService`] to open a device and
//! installs an [`OpenListener`] whose callback fills the bridge's
//! [`OpenedDeviceCell`]. The service posts the callback onto the looper, so
//! the cell is written on the main thread.

use super::device::DeviceDescriptor;
use super::engine::{MidiService, OpenedDevice};
use super::handle::PollableHandle;
use crate::looper::LooperHandle;
use log::{info, warn};
use std::sync::{Arc, OnceLock};

type OpenCallback = Box<dyn FnOnce(Arc<dyn OpenedDevice>) + Send + 'static>;

/// Receives the result of one open request. Consumed on delivery, so it can
/// fire at most once.
pub struct OpenListener {
    on_opened: OpenCallback,
}

impl OpenListener {
    pub fn new<F>(on_opened: F) -> Self
    where
        F: FnOnce(Arc<dyn OpenedDevice>) + Send + 'static,
    {
        Self {
            on_opened: Box::new(on_opened),
        }
    }

    pub fn on_device_opened(self, device: Arc<dyn OpenedDevice>) {
        (self.on_opened)(device);
    }

    /// Posts the delivery onto `looper`. Returns `false` if the looper is
    /// gone, in which case the device is dropped.
    pub fn post_to(self, looper: &LooperHandle, device: Arc<dyn OpenedDevice>) -> bool {
        looper.post(move || self.on_device_opened(device))
    }
}

/// Single-assignment slot for the opened device.
#[derive(Clone, Default)]
pub struct OpenedDeviceCell {
    slot: Arc<OnceLock<Arc<dyn OpenedDevice>>>,
}

impl OpenedDeviceCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `device` unless a device is already stored. Returns whether
    /// this call stored it.
    pub fn fill(&self, device: Arc<dyn OpenedDevice>) -> bool {
        let name = device.info().display_name();
        match self.slot.set(device) {
            Ok(()) => {
                info!("MIDI device opened: {}", name);
                true
            }
            Err(_) => {
                warn!("Ignoring second open result for {}", name);
                false
            }
        }
    }

    pub fn get(&self) -> Option<Arc<dyn OpenedDevice>> {
        self.slot.get().cloned()
    }

    pub fn is_filled(&self) -> bool {
        self.slot.get().is_some()
    }
}

/// Issues open requests and owns the result cell.
pub struct OpenRequestBridge {
    service: Arc<dyn MidiService>,
    looper: LooperHandle,
    cell: OpenedDeviceCell,
}

impl OpenRequestBridge {
    pub fn new(service: Arc<dyn MidiService>, looper: LooperHandle) -> Self {
        Self {
            service,
            looper,
            cell: OpenedDeviceCell::new(),
        }
    }

    /// Non-blocking. `on_opened` runs at most once, on the looper thread,
    /// after the device is stored in the cell.
    pub fn request_open<F>(&self, device: &DeviceDescriptor, on_opened: F)
    where
        F: FnOnce(Arc<dyn OpenedDevice>) + Send + 'static,
    {
        info!("Requesting open of MIDI device {}", device);
        let cell = self.cell.clone();
        let listener = OpenListener::new(move |opened: Arc<dyn OpenedDevice>| {
            if cell.fill(opened.clone()) {
                on_opened(opened);
            }
        });
        self.service.open_device(device, listener, self.looper.clone());
    }

    /// Same as [`request_open`](Self::request_open) with no extra callback.
    pub fn request_open_silent(&self, device: &DeviceDescriptor) {
        self.request_open(device, |_| {});
    }

    pub fn handle(&self) -> PollableHandle {
        PollableHandle::new(self.cell.clone())
    }

    pub fn cell(&self) -> &OpenedDeviceCell {
        &self.cell
    }
}
