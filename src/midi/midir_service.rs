use crate::looper::LooperHandle;
use crate::midi::{
    DeviceDescriptor, DeviceKind, MidiError, MidiService, OpenListener, OpenedDevice,
    PortDescriptor, PortDirection, Result,
};
use chrono::{DateTime, Local};
use log::{debug, error, info, warn};
use midir::{MidiInput, MidiOutput, MidiOutputConnection};
use std::sync::{Arc, Mutex};
use std::thread;

/// [`MidiService`] backed by the system MIDI stack through `midir`.
///
/// midir exposes ports, not devices, so ports sharing a name are grouped
/// into one device. A midir *output* port is a port the host writes to,
/// i.e. an input port of the device.
pub struct MidirService {
    client_name: String,
}

impl Default for MidirService {
    fn default() -> Self {
        Self::new("gravitymaze")
    }
}

impl MidirService {
    pub fn new(client_name: impl Into<String>) -> Self {
        Self {
            client_name: client_name.into(),
        }
    }

    fn device_entry<'a>(
        devices: &'a mut Vec<DeviceDescriptor>,
        name: &str,
    ) -> &'a mut DeviceDescriptor {
        let pos = match devices.iter().position(|d| d.name.as_deref() == Some(name)) {
            Some(pos) => pos,
            None => {
                let id = devices.len() as u32;
                devices.push(DeviceDescriptor::new(id, name));
                devices.len() - 1
            }
        };
        &mut devices[pos]
    }

    fn add_port(devices: &mut Vec<DeviceDescriptor>, name: String, direction: PortDirection) {
        let device = Self::device_entry(devices, &name);
        let number = device.ports_in(direction).count() as u32;
        device.ports.push(PortDescriptor {
            number,
            name: Some(name),
            direction,
        });
    }

    /// Exact name first; a substring match only when nothing matches exactly.
    fn pick_port(names: &[String], target: &str) -> Option<usize> {
        names
            .iter()
            .position(|name| name == target)
            .or_else(|| names.iter().position(|name| name.contains(target)))
    }

    fn connect(client_name: &str, device: &DeviceDescriptor) -> Result<MidiOutputConnection> {
        // Devices that report no input port are tried by name anyway.
        let target = device
            .ports_in(PortDirection::Input)
            .next()
            .and_then(|p| p.name.clone())
            .or_else(|| device.name.clone())
            .ok_or_else(|| MidiError::NotFound(device.display_name()))?;

        let midi_out = MidiOutput::new(&format!("{}-out", client_name))?;
        let out_ports = midi_out.ports();
        let names: Vec<String> = out_ports
            .iter()
            .map(|p| midi_out.port_name(p).unwrap_or_default())
            .collect();
        let out_port = Self::pick_port(&names, &target)
            .map(|i| &out_ports[i])
            .ok_or_else(|| MidiError::NotFound(target.clone()))?;

        info!("Connecting to MIDI port: {}", target);
        Ok(midi_out.connect(out_port, &format!("{}-output", client_name))?)
    }
}

impl MidiService for MidirService {
    fn list_devices(&self) -> Result<Vec<DeviceDescriptor>> {
        let mut devices = Vec::new();

        let midi_out = MidiOutput::new(&format!("{}-list-out", self.client_name))?;
        for port in midi_out.ports() {
            if let Ok(name) = midi_out.port_name(&port) {
                Self::add_port(&mut devices, name, PortDirection::Input);
            }
        }

        let midi_in = MidiInput::new(&format!("{}-list-in", self.client_name))?;
        for port in midi_in.ports() {
            if let Ok(name) = midi_in.port_name(&port) {
                Self::add_port(&mut devices, name, PortDirection::Output);
            }
        }

        Ok(devices)
    }

    fn open_device(&self, device: &DeviceDescriptor, listener: OpenListener, looper: LooperHandle) {
        let client_name = self.client_name.clone();
        let device = device.clone();

        thread::spawn(move || match Self::connect(&client_name, &device) {
            Ok(conn) => {
                let opened: Arc<dyn OpenedDevice> = Arc::new(MidirDevice::new(device, conn));
                if !listener.post_to(&looper, opened) {
                    warn!("Looper gone before MIDI device open could be delivered");
                }
            }
            Err(e) => {
                error!("Failed to open MIDI device {}: {}", device.display_name(), e);
            }
        });
    }
}

/// Opened device wrapping a midir output connection.
pub struct MidirDevice {
    info: DeviceDescriptor,
    kind: DeviceKind,
    opened_at: DateTime<Local>,
    conn: Mutex<Option<MidiOutputConnection>>,
}

impl MidirDevice {
    fn new(info: DeviceDescriptor, conn: MidiOutputConnection) -> Self {
        let kind = DeviceKind::guess_from_name(&info.display_name());
        Self {
            info,
            kind,
            opened_at: Local::now(),
            conn: Mutex::new(Some(conn)),
        }
    }
}

impl OpenedDevice for MidirDevice {
    fn info(&self) -> &DeviceDescriptor {
        &self.info
    }

    fn kind(&self) -> DeviceKind {
        self.kind
    }

    fn opened_at(&self) -> DateTime<Local> {
        self.opened_at
    }

    fn send(&self, bytes: &[u8]) -> Result<()> {
        let mut guard = self
            .conn
            .lock()
            .map_err(|_| MidiError::Send("connection lock poisoned".to_string()))?;
        let conn = guard
            .as_mut()
            .ok_or_else(|| MidiError::Send("device closed".to_string()))?;
        debug!("Sending {} byte(s) to {}", bytes.len(), self.info.display_name());
        conn.send(bytes)?;
        Ok(())
    }

    fn close(&self) {
        if let Ok(mut guard) = self.conn.lock() {
            if let Some(conn) = guard.take() {
                conn.close();
                info!("Closed MIDI device {}", self.info.display_name());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ports_with_same_name_group_into_one_device() {
        let mut devices = Vec::new();
        MidirService::add_port(&mut devices, "Synth 20:0".into(), PortDirection::Input);
        MidirService::add_port(&mut devices, "Keys 24:0".into(), PortDirection::Output);
        MidirService::add_port(&mut devices, "Synth 20:0".into(), PortDirection::Output);

        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].id, 0);
        assert_eq!(devices[0].input_port_count(), 1);
        assert_eq!(devices[0].output_port_count(), 1);
        assert_eq!(devices[1].display_name(), "Keys 24:0");
        assert!(!devices[1].has_input());
    }

    #[test]
    fn test_exact_port_name_wins_over_substring() {
        let names = vec!["Port 10".to_string(), "Port 1".to_string()];
        assert_eq!(MidirService::pick_port(&names, "Port 1"), Some(1));
        assert_eq!(MidirService::pick_port(&names, "Port 10"), Some(0));
    }

    #[test]
    fn test_port_falls_back_to_substring() {
        let names = vec!["Synth 20:0".to_string(), "Keys 24:0".to_string()];
        assert_eq!(MidirService::pick_port(&names, "Keys"), Some(1));
        assert_eq!(MidirService::pick_port(&names, "Drums"), None);
    }
}
