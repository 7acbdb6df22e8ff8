//! Engine-side device poller.
//!
//! The engine cannot receive the open callback itself, so it steps a
//! [`DevicePoller`] once per frame. Each [`manage`](DevicePoller::manage)
//! call runs one state handler and never blocks.

use crate::midi::{MidiMessage, OpenedDevice};
use log::{debug, info, warn};
use std::sync::Arc;

/// The side of the host the poller talks to.
pub trait DeviceHost {
    /// Starts acquisition. `false` means nothing will ever open.
    fn kick_off_device_open(&mut self) -> bool;

    fn opened_device(&self) -> Option<Arc<dyn OpenedDevice>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Initial,
    WaitForDeviceOpen,
    Ready,
    Shutdown,
    Idle,
}

pub struct DevicePoller {
    state: PollerState,
    device: Option<Arc<dyn OpenedDevice>>,
    polls: u64,
}

impl Default for DevicePoller {
    fn default() -> Self {
        Self::new()
    }
}

impl DevicePoller {
    pub fn new() -> Self {
        Self {
            state: PollerState::Initial,
            device: None,
            polls: 0,
        }
    }

    pub fn state(&self) -> PollerState {
        self.state
    }

    pub fn device(&self) -> Option<&Arc<dyn OpenedDevice>> {
        self.device.as_ref()
    }

    /// Number of empty polls made while waiting for the open.
    pub fn polls(&self) -> u64 {
        self.polls
    }

    /// Runs one step and returns the new state.
    pub fn manage(&mut self, host: &mut dyn DeviceHost) -> PollerState {
        let next = match self.state {
            PollerState::Initial => self.initial(host),
            PollerState::WaitForDeviceOpen => self.wait_for_device_open(host),
            PollerState::Ready => PollerState::Ready,
            PollerState::Shutdown => self.shutdown(),
            PollerState::Idle => PollerState::Idle,
        };
        if next != self.state {
            debug!("Device poller: {:?} -> {:?}", self.state, next);
        }
        self.state = next;
        next
    }

    /// Forces shutdown and steps until idle.
    pub fn abort(&mut self, host: &mut dyn DeviceHost) {
        self.state = PollerState::Shutdown;
        while self.state != PollerState::Idle {
            self.manage(host);
        }
    }

    fn initial(&mut self, host: &mut dyn DeviceHost) -> PollerState {
        if host.kick_off_device_open() {
            info!("MIDI device open kicked off");
            PollerState::WaitForDeviceOpen
        } else {
            warn!("Failed to kick off MIDI device open");
            PollerState::Shutdown
        }
    }

    fn wait_for_device_open(&mut self, host: &mut dyn DeviceHost) -> PollerState {
        match host.opened_device() {
            None => {
                self.polls += 1;
                PollerState::WaitForDeviceOpen
            }
            Some(device) => {
                info!(
                    "MIDI device open succeeded: {} ({:?})",
                    device.info().display_name(),
                    device.kind()
                );
                self.device = Some(device);
                PollerState::Ready
            }
        }
    }

    fn shutdown(&mut self) -> PollerState {
        info!("Shutting down MIDI device");
        if let Some(device) = self.device.take() {
            for channel in 0..16 {
                if let Err(e) = device.send_message(&MidiMessage::AllNotesOff { channel }) {
                    warn!("Failed to silence channel {}: {}", channel, e);
                    break;
                }
            }
            device.close();
        }
        PollerState::Idle
    }
}
