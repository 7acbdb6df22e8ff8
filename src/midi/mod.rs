//! MIDI device acquisition
//!
//! This module finds a MIDI device, opens it asynchronously and hands the
//! result to a poller:
//! - [`DeviceCatalog`] enumerates devices through a [`MidiService`]
//! - [`SelectionPolicy`] picks at most one of them
//! - [`OpenRequestBridge`] issues the open and owns the result cell
//! - [`PollableHandle`] answers "is it open yet?" without blocking
//!
//! [`MidirService`] talks to real devices; [`MockMidiService`] is scripted.
//!
mod bridge;
mod catalog;
mod device;
mod engine;
mod handle;
pub mod midir_service;
pub mod mock_service;
mod selector;

pub use bridge::{OpenListener, OpenRequestBridge, OpenedDeviceCell};
pub use catalog::DeviceCatalog;
pub use device::{DeviceDescriptor, PortDescriptor, PortDirection};
pub use engine::{DeviceKind, MidiError, MidiMessage, MidiService, OpenedDevice, Result};
pub use handle::PollableHandle;
pub use selector::{select_device, SelectionPolicy};

pub use midir_service::MidirService;
pub use mock_service::{MockMidiService, OpenBehavior};
