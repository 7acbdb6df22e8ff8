//! Device selection policy.
//!
//! Ports reported by the platform are not trustworthy: a device that only
//! lists output ports may still accept an input-port open. The output tier
//! below covers that case and must stay.

use super::device::DeviceDescriptor;
use log::debug;

/// Which device to open, given a catalog snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionPolicy {
    /// When set, the input tier only accepts devices whose name contains
    /// this marker.
    pub name_marker: Option<String>,
}

impl SelectionPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_marker(marker: impl Into<String>) -> Self {
        Self {
            name_marker: Some(marker.into()),
        }
    }

    /// First match wins, in list order:
    /// 1. a device with an input port (and the marker, if any)
    /// 2. a device with an output port
    pub fn select_device<'a>(
        &self,
        devices: &'a [DeviceDescriptor],
    ) -> Option<&'a DeviceDescriptor> {
        let by_input = devices.iter().find(|d| {
            d.has_input()
                && self
                    .name_marker
                    .as_deref()
                    .map_or(true, |marker| d.name_contains(marker))
        });
        if let Some(device) = by_input {
            debug!("Selected {} by input port", device.display_name());
            return Some(device);
        }

        let by_output = devices.iter().find(|d| d.has_output());
        match by_output {
            Some(device) => debug!("Selected {} by output port", device.display_name()),
            None => debug!("No MIDI device matched the selection policy"),
        }
        by_output
    }
}

/// [`SelectionPolicy::select_device`] with the default policy.
pub fn select_device(devices: &[DeviceDescriptor]) -> Option<&DeviceDescriptor> {
    SelectionPolicy::default().select_device(devices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::PortDescriptor;

    #[test]
    fn test_marker_only_applies_to_input_tier() {
        let devices = vec![
            DeviceDescriptor::new(0, "Keyboard").with_port(PortDescriptor::input(0, "in")),
            DeviceDescriptor::new(1, "Thru").with_port(PortDescriptor::output(0, "out")),
        ];
        let policy = SelectionPolicy::with_marker("Player");
        assert_eq!(policy.select_device(&devices).map(|d| d.id), Some(1));
    }

    #[test]
    fn test_marker_matches_input_device() {
        let devices = vec![
            DeviceDescriptor::new(0, "Keyboard").with_port(PortDescriptor::input(0, "in")),
            DeviceDescriptor::new(1, "Synth Player").with_port(PortDescriptor::input(0, "in")),
        ];
        let policy = SelectionPolicy::with_marker("Player");
        assert_eq!(policy.select_device(&devices).map(|d| d.id), Some(1));
    }
}
