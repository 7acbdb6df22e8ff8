//! Device and port descriptors.
//!
//! A [`DeviceDescriptor`] is an immutable snapshot taken during one
//! enumeration call. Nothing here is cached between calls.

use std::fmt;

/// Direction of a port, seen from the device.
///
/// `Input` ports receive bytes (the host sends into them), `Output` ports
/// emit bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortDirection {
    Input,
    Output,
}

/// One directional endpoint of a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortDescriptor {
    /// Port number, local to the device and direction.
    pub number: u32,
    pub name: Option<String>,
    pub direction: PortDirection,
}

impl PortDescriptor {
    pub fn input(number: u32, name: impl Into<String>) -> Self {
        Self {
            number,
            name: Some(name.into()),
            direction: PortDirection::Input,
        }
    }

    pub fn output(number: u32, name: impl Into<String>) -> Self {
        Self {
            number,
            name: Some(name.into()),
            direction: PortDirection::Output,
        }
    }
}

/// Snapshot of one discoverable MIDI device.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceDescriptor {
    pub id: u32,
    pub name: Option<String>,
    pub manufacturer: Option<String>,
    pub serial: Option<String>,
    pub version: Option<String>,
    pub ports: Vec<PortDescriptor>,
}

impl DeviceDescriptor {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Builder-style helper used by backends and tests.
    pub fn with_port(mut self, port: PortDescriptor) -> Self {
        self.ports.push(port);
        self
    }

    pub fn input_port_count(&self) -> usize {
        self.ports_in(PortDirection::Input).count()
    }

    pub fn output_port_count(&self) -> usize {
        self.ports_in(PortDirection::Output).count()
    }

    pub fn has_input(&self) -> bool {
        self.input_port_count() > 0
    }

    pub fn has_output(&self) -> bool {
        self.output_port_count() > 0
    }

    pub fn ports_in(&self, direction: PortDirection) -> impl Iterator<Item = &PortDescriptor> {
        self.ports.iter().filter(move |p| p.direction == direction)
    }

    /// Name if known, otherwise `device <id>`.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("device {}", self.id),
        }
    }

    /// True when the device has a name and it contains `marker`.
    pub fn name_contains(&self, marker: &str) -> bool {
        self.name
            .as_deref()
            .map(|name| name.contains(marker))
            .unwrap_or(false)
    }
}

impl fmt::Display for DeviceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [in: {}, out: {}]",
            self.display_name(),
            self.input_port_count(),
            self.output_port_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_counts() {
        let device = DeviceDescriptor::new(3, "Synth")
            .with_port(PortDescriptor::input(0, "in"))
            .with_port(PortDescriptor::output(0, "out a"))
            .with_port(PortDescriptor::output(1, "out b"));

        assert_eq!(device.input_port_count(), 1);
        assert_eq!(device.output_port_count(), 2);
        assert!(device.has_input());
        assert_eq!(device.to_string(), "Synth [in: 1, out: 2]");
    }

    #[test]
    fn test_unnamed_device() {
        let device = DeviceDescriptor {
            id: 7,
            ..DeviceDescriptor::default()
        };
        assert_eq!(device.display_name(), "device 7");
        assert!(!device.name_contains(""));
        assert!(!device.has_input());
        assert!(!device.has_output());
    }
}
