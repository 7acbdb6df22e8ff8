//! User interface components
//!
//! Terminal stand-ins for the game's two screens:
//! - a spinner shown while waiting for a MIDI device to open
//! - the options screen model (two seek bars) and its interactive editor
//!
//! Progress output uses indicatif; prompts use dialoguer.

mod options;
mod progress;

pub use options::{prompt_seek_bar, OptionsScreen, SeekBar};
pub use progress::{create_device_wait_spinner, describe_device};
