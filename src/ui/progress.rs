use crate::midi::OpenedDevice;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

pub fn create_device_wait_spinner() -> ProgressBar {
    let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{prefix:.bold.dim} {spinner} {wide_msg} [{elapsed}]")
            .unwrap(),
    );
    pb.set_prefix("MIDI");
    pb.set_message("waiting for device to open");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn describe_device(device: &dyn OpenedDevice) -> String {
    format!(
        "{} ({:?}, opened {})",
        device.info().display_name(),
        device.kind(),
        device.opened_at().format("%H:%M:%S")
    )
}
