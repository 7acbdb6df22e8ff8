use super::device::DeviceDescriptor;
use super::engine::MidiService;
use log::{debug, warn};
use std::sync::Arc;

/// Enumerates devices through the platform service.
#[derive(Clone)]
pub struct DeviceCatalog {
    service: Arc<dyn MidiService>,
}

impl DeviceCatalog {
    pub fn new(service: Arc<dyn MidiService>) -> Self {
        Self { service }
    }

    /// Fresh snapshot on every call. An empty list is a normal result; a
    /// backend that cannot start is logged and reported as empty.
    pub fn list_devices(&self) -> Vec<DeviceDescriptor> {
        match self.service.list_devices() {
            Ok(devices) => {
                debug!("Enumerated {} MIDI device(s)", devices.len());
                for device in &devices {
                    for port in &device.ports {
                        debug!(
                            "  {} port {:?} #{}: {}",
                            device.display_name(),
                            port.direction,
                            port.number,
                            port.name.as_deref().unwrap_or("<unnamed>")
                        );
                    }
                }
                devices
            }
            Err(e) => {
                warn!("MIDI enumeration failed: {}", e);
                Vec::new()
            }
        }
    }
}
