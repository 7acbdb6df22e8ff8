pub mod activity;
pub mod cli;
pub mod config;
pub mod logging;
pub mod looper;
pub mod midi;
pub mod poller;
pub mod settings;
pub mod ui;

pub use activity::{GameActivity, HostWindow, SystemUiFlags};
pub use cli::{Args, Command, OptionsCommand};
pub use looper::{Looper, LooperHandle};
pub use poller::{DeviceHost, DevicePoller, PollerState};
pub use settings::{SettingsDocument, SettingsError, SettingsStore, SliderScale};
