use gravitymaze_host::midi::{select_device, DeviceDescriptor, PortDescriptor, SelectionPolicy};

fn input_device(id: u32, name: &str) -> DeviceDescriptor {
    DeviceDescriptor::new(id, name).with_port(PortDescriptor::input(0, format!("{} in", name)))
}

fn output_device(id: u32, name: &str) -> DeviceDescriptor {
    DeviceDescriptor::new(id, name).with_port(PortDescriptor::output(0, format!("{} out", name)))
}

#[test]
fn test_input_device_wins_over_earlier_output_device() {
    let devices = vec![output_device(0, "A"), input_device(1, "B Player")];

    let selected = select_device(&devices).expect("a device should be selected");
    assert_eq!(selected.name.as_deref(), Some("B Player"));
}

#[test]
fn test_first_input_device_in_list_order() {
    let devices = vec![
        output_device(0, "Out 1"),
        input_device(1, "In 1"),
        output_device(2, "Out 2"),
        input_device(3, "In 2"),
    ];

    assert_eq!(select_device(&devices).map(|d| d.id), Some(1));
}

#[test]
fn test_falls_back_to_first_output_device() {
    let devices = vec![
        DeviceDescriptor::new(0, "No ports"),
        output_device(1, "Thru"),
        output_device(2, "Other"),
    ];

    assert_eq!(select_device(&devices).map(|d| d.id), Some(1));
}

#[test]
fn test_empty_list_selects_nothing() {
    assert!(select_device(&[]).is_none());
}

#[test]
fn test_devices_without_ports_select_nothing() {
    let devices = vec![DeviceDescriptor::new(0, "Ghost"), DeviceDescriptor::new(1, "Ghost 2")];
    assert!(select_device(&devices).is_none());
}

#[test]
fn test_device_with_both_directions_counts_as_input() {
    let both = DeviceDescriptor::new(1, "Both")
        .with_port(PortDescriptor::output(0, "out"))
        .with_port(PortDescriptor::input(0, "in"));
    let devices = vec![output_device(0, "Thru"), both];

    assert_eq!(select_device(&devices).map(|d| d.id), Some(1));
}

#[test]
fn test_marker_skips_unmarked_input_devices() {
    let devices = vec![
        input_device(0, "Keyboard"),
        output_device(1, "Thru"),
        input_device(2, "FluidSynth Player"),
    ];
    let policy = SelectionPolicy::with_marker("Player");

    assert_eq!(policy.select_device(&devices).map(|d| d.id), Some(2));
}

#[test]
fn test_marker_without_match_uses_output_tier() {
    let devices = vec![input_device(0, "Keyboard"), output_device(1, "Thru")];
    let policy = SelectionPolicy::with_marker("Player");

    assert_eq!(policy.select_device(&devices).map(|d| d.id), Some(1));
}
