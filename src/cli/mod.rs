use crate::midi::{DeviceDescriptor, SelectionPolicy};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Use the scripted mock MIDI service instead of real devices
    #[arg(long, global = true)]
    pub mock: bool,

    /// Extra configuration file (TOML, YAML or JSON)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log to stderr instead of the log file
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available MIDI devices and the one that would be selected
    Devices {
        /// Require this substring in the name of input devices
        #[arg(long)]
        marker: Option<String>,
    },
    /// Select a device, open it and wait for the open to complete
    Open {
        /// Require this substring in the name of input devices
        #[arg(long)]
        marker: Option<String>,

        /// Give up after this many seconds (waits forever when omitted)
        #[arg(long)]
        wait_secs: Option<u64>,
    },
    /// Show or change game settings
    #[command(subcommand)]
    Options(OptionsCommand),
}

#[derive(Subcommand, Debug)]
pub enum OptionsCommand {
    /// Print the current settings
    Show,
    /// Set slider positions and save
    Set(SetOptions),
    /// Edit slider positions interactively and save
    Edit,
}

#[derive(ClapArgs, Debug)]
pub struct SetOptions {
    /// Gravity slider position
    #[arg(long)]
    pub gravity: Option<u32>,

    /// Bounce slider position
    #[arg(long)]
    pub bounce: Option<u32>,
}

/// CLI marker wins over the configured one.
pub fn resolve_policy(cli_marker: Option<&str>, configured: Option<&str>) -> SelectionPolicy {
    match cli_marker.or(configured) {
        Some(marker) => SelectionPolicy::with_marker(marker),
        None => SelectionPolicy::new(),
    }
}

/// One line per device, `*` marking the selected one, followed by its ports.
pub fn format_device_list(
    devices: &[DeviceDescriptor],
    selected: Option<&DeviceDescriptor>,
) -> String {
    if devices.is_empty() {
        return "No MIDI devices found.\n".to_string();
    }

    let mut out = String::from("Available MIDI devices:\n");
    for device in devices {
        let mark = if selected.map(|s| s.id) == Some(device.id) {
            '*'
        } else {
            ' '
        };
        out.push_str(&format!("{} {}\n", mark, device));
        for port in &device.ports {
            out.push_str(&format!(
                "      {:?} #{}: {}\n",
                port.direction,
                port.number,
                port.name.as_deref().unwrap_or("<unnamed>")
            ));
        }
    }
    out
}
