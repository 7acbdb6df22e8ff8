use gravitymaze_host::looper::Looper;
use gravitymaze_host::midi::{
    DeviceDescriptor, MidiMessage, MockMidiService, OpenBehavior, OpenedDevice, PortDescriptor,
};
use gravitymaze_host::{
    DeviceHost, DevicePoller, GameActivity, HostWindow, PollerState, SystemUiFlags,
};
use std::sync::Arc;

#[derive(Default)]
struct TestWindow;

impl HostWindow for TestWindow {
    fn set_system_ui_visibility(&mut self, _flags: SystemUiFlags) {}
    fn finish(&mut self) {}
}

fn devices() -> Vec<DeviceDescriptor> {
    vec![DeviceDescriptor::new(0, "Player").with_port(PortDescriptor::input(0, "Player In"))]
}

/// Host whose kick-off always fails.
struct DeadHost;

impl DeviceHost for DeadHost {
    fn kick_off_device_open(&mut self) -> bool {
        false
    }

    fn opened_device(&self) -> Option<Arc<dyn OpenedDevice>> {
        None
    }
}

#[test]
fn test_failed_kick_off_goes_to_shutdown_then_idle() {
    let mut host = DeadHost;
    let mut poller = DevicePoller::new();

    assert_eq!(poller.state(), PollerState::Initial);
    assert_eq!(poller.manage(&mut host), PollerState::Shutdown);
    assert_eq!(poller.manage(&mut host), PollerState::Idle);
    assert_eq!(poller.manage(&mut host), PollerState::Idle);
}

#[test]
fn test_waits_until_device_opens() {
    let (looper, handle) = Looper::new();
    let service = Arc::new(MockMidiService::with_behavior(devices(), OpenBehavior::Deferred));
    let mut activity = GameActivity::new(
        service.clone(),
        handle,
        TestWindow,
        Default::default(),
    );
    let mut poller = DevicePoller::new();

    assert_eq!(poller.manage(&mut activity), PollerState::WaitForDeviceOpen);
    for _ in 0..3 {
        looper.dispatch();
        assert_eq!(poller.manage(&mut activity), PollerState::WaitForDeviceOpen);
    }
    assert_eq!(poller.polls(), 3);
    assert!(poller.device().is_none());

    service.complete_pending();
    looper.dispatch();
    assert_eq!(poller.manage(&mut activity), PollerState::Ready);
    assert_eq!(poller.device().map(|d| d.info().id), Some(0));
    assert_eq!(poller.manage(&mut activity), PollerState::Ready);
}

#[test]
fn test_abort_silences_and_closes_device() {
    let (looper, handle) = Looper::new();
    let service = Arc::new(MockMidiService::new(devices()));
    let mut activity = GameActivity::new(
        service.clone(),
        handle,
        TestWindow,
        Default::default(),
    );
    let mut poller = DevicePoller::new();

    poller.manage(&mut activity);
    looper.dispatch();
    assert_eq!(poller.manage(&mut activity), PollerState::Ready);

    let device = activity.opened_midi_device().unwrap();
    poller.abort(&mut activity);

    assert_eq!(poller.state(), PollerState::Idle);
    assert!(poller.device().is_none());

    let sent = service.sent();
    assert_eq!(sent.len(), 16);
    assert_eq!(
        MidiMessage::parse(&sent[15]),
        Some(MidiMessage::AllNotesOff { channel: 15 })
    );
    assert!(device.send(&[0xF8]).is_err());
}

#[test]
fn test_abort_while_waiting() {
    let (_looper, handle) = Looper::new();
    let service = Arc::new(MockMidiService::with_behavior(devices(), OpenBehavior::Fail));
    let mut activity = GameActivity::new(service.clone(), handle, TestWindow, Default::default());
    let mut poller = DevicePoller::new();

    poller.manage(&mut activity);
    poller.manage(&mut activity);
    assert_eq!(poller.state(), PollerState::WaitForDeviceOpen);

    poller.abort(&mut activity);
    assert_eq!(poller.state(), PollerState::Idle);
    assert!(service.sent().is_empty());
}
