use super::bridge::OpenedDeviceCell;
use super::engine::OpenedDevice;
use std::sync::Arc;

/// Poll-side view of an open request.
///
/// Returns `None` until the open callback has run, then the same device on
/// every call. Never blocks. "Still empty" is a valid state that may last
/// forever if the platform never completes the open.
#[derive(Clone)]
pub struct PollableHandle {
    cell: OpenedDeviceCell,
}

impl PollableHandle {
    pub(crate) fn new(cell: OpenedDeviceCell) -> Self {
        Self { cell }
    }

    pub fn opened_device(&self) -> Option<Arc<dyn OpenedDevice>> {
        self.cell.get()
    }

    pub fn is_open(&self) -> bool {
        self.cell.is_filled()
    }
}
