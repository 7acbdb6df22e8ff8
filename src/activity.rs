//! Host activity glue.
//!
//! [`GameActivity`] is what the host window system and the engine call
//! into. It starts MIDI acquisition, answers the engine's polls and carries
//! the two lifecycle hooks: `finish` and the focus-change handler that puts
//! the window back into immersive fullscreen.

use crate::looper::LooperHandle;
use crate::midi::{
    DeviceCatalog, DeviceDescriptor, MidiService, OpenRequestBridge, OpenedDevice, PollableHandle,
    SelectionPolicy,
};
use crate::poller::DeviceHost;
use log::{debug, info, warn};
use std::ops::BitOr;
use std::sync::Arc;

/// Window decoration flags applied through [`HostWindow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SystemUiFlags(u32);

impl SystemUiFlags {
    pub const NONE: SystemUiFlags = SystemUiFlags(0);
    pub const LAYOUT_STABLE: SystemUiFlags = SystemUiFlags(0x0100);
    pub const LAYOUT_HIDE_NAVIGATION: SystemUiFlags = SystemUiFlags(0x0200);
    pub const LAYOUT_FULLSCREEN: SystemUiFlags = SystemUiFlags(0x0400);
    pub const HIDE_NAVIGATION: SystemUiFlags = SystemUiFlags(0x0002);
    pub const FULLSCREEN: SystemUiFlags = SystemUiFlags(0x0004);
    pub const IMMERSIVE_STICKY: SystemUiFlags = SystemUiFlags(0x1000);

    /// The set re-applied whenever the game window regains focus.
    pub const IMMERSIVE_FULLSCREEN: SystemUiFlags = SystemUiFlags(
        Self::IMMERSIVE_STICKY.0
            | Self::LAYOUT_STABLE.0
            | Self::LAYOUT_HIDE_NAVIGATION.0
            | Self::LAYOUT_FULLSCREEN.0
            | Self::HIDE_NAVIGATION.0
            | Self::FULLSCREEN.0,
    );

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, other: SystemUiFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for SystemUiFlags {
    type Output = SystemUiFlags;

    fn bitor(self, rhs: SystemUiFlags) -> SystemUiFlags {
        SystemUiFlags(self.0 | rhs.0)
    }
}

/// What the activity needs from the window system.
pub trait HostWindow {
    fn set_system_ui_visibility(&mut self, flags: SystemUiFlags);

    /// Ends the activity.
    fn finish(&mut self);
}

pub struct GameActivity<W: HostWindow> {
    window: W,
    catalog: DeviceCatalog,
    policy: SelectionPolicy,
    bridge: OpenRequestBridge,
    selected: Option<DeviceDescriptor>,
}

impl<W: HostWindow> GameActivity<W> {
    pub fn new(
        service: Arc<dyn MidiService>,
        looper: LooperHandle,
        window: W,
        policy: SelectionPolicy,
    ) -> Self {
        Self {
            window,
            catalog: DeviceCatalog::new(service.clone()),
            policy,
            bridge: OpenRequestBridge::new(service, looper),
            selected: None,
        }
    }

    /// Activity creation: starts device acquisition.
    pub fn on_create(&mut self) {
        info!("Game activity created");
        self.kick_off_midi_device_open();
    }

    /// Selects a device and requests its open. Returns whether a request is
    /// in flight; calling it again after a successful kick-off does not issue
    /// a second request.
    pub fn kick_off_midi_device_open(&mut self) -> bool {
        if let Some(device) = &self.selected {
            debug!("Open already requested for {}", device.display_name());
            return true;
        }

        let devices = self.catalog.list_devices();
        let Some(device) = self.policy.select_device(&devices).cloned() else {
            warn!("No MIDI device available to open");
            return false;
        };

        self.bridge.request_open_silent(&device);
        self.selected = Some(device);
        true
    }

    /// Non-blocking poll used by the engine.
    pub fn opened_midi_device(&self) -> Option<Arc<dyn OpenedDevice>> {
        self.bridge.handle().opened_device()
    }

    pub fn pollable_handle(&self) -> PollableHandle {
        self.bridge.handle()
    }

    pub fn selected_device(&self) -> Option<&DeviceDescriptor> {
        self.selected.as_ref()
    }

    /// Called by the engine when the session ends.
    pub fn game_activity_finished(&mut self) {
        info!("Game activity finished");
        self.window.finish();
    }

    pub fn on_window_focus_changed(&mut self, has_focus: bool) {
        if has_focus {
            self.hide_system_ui();
        }
    }

    fn hide_system_ui(&mut self) {
        debug!("Applying immersive fullscreen flags");
        self.window
            .set_system_ui_visibility(SystemUiFlags::IMMERSIVE_FULLSCREEN);
    }

    pub fn window(&self) -> &W {
        &self.window
    }
}

impl<W: HostWindow> DeviceHost for GameActivity<W> {
    fn kick_off_device_open(&mut self) -> bool {
        self.kick_off_midi_device_open()
    }

    fn opened_device(&self) -> Option<Arc<dyn OpenedDevice>> {
        self.opened_midi_device()
    }
}
