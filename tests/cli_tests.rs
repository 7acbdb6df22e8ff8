#[cfg(test)]
mod tests {
    use clap::Parser;
    use gravitymaze_host::cli::{format_device_list, resolve_policy};
    use gravitymaze_host::midi::{DeviceDescriptor, MidiService, MockMidiService};
    use gravitymaze_host::*;

    #[test]
    fn test_devices_command() {
        let args = Args::parse_from(["test", "devices"]);
        assert!(!args.mock);
        assert!(matches!(args.command, Command::Devices { marker: None }));
    }

    #[test]
    fn test_open_with_marker_and_wait() {
        let args = Args::parse_from([
            "test", "--mock", "open", "--marker", "Player", "--wait-secs", "5",
        ]);
        assert!(args.mock);
        match args.command {
            Command::Open { marker, wait_secs } => {
                assert_eq!(marker.as_deref(), Some("Player"));
                assert_eq!(wait_secs, Some(5));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_options_set() {
        let args = Args::parse_from(["test", "options", "set", "--gravity", "40"]);
        match args.command {
            Command::Options(OptionsCommand::Set(set)) => {
                assert_eq!(set.gravity, Some(40));
                assert_eq!(set.bounce, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::parse_from(["test", "options", "show", "--verbose", "--config", "x.toml"]);
        assert!(args.verbose);
        assert_eq!(args.config.as_deref(), Some(std::path::Path::new("x.toml")));
    }

    #[test]
    fn test_missing_subcommand_is_error() {
        assert!(Args::try_parse_from(["test"]).is_err());
    }

    #[test]
    fn test_cli_marker_overrides_config() {
        assert_eq!(
            resolve_policy(Some("Cli"), Some("Config")).name_marker.as_deref(),
            Some("Cli")
        );
        assert_eq!(
            resolve_policy(None, Some("Config")).name_marker.as_deref(),
            Some("Config")
        );
        assert!(resolve_policy(None, None).name_marker.is_none());
    }

    #[test]
    fn test_device_list_marks_selection() {
        let devices = MockMidiService::demo().list_devices().unwrap();
        let selected = resolve_policy(None, None).select_device(&devices);
        let listing = format_device_list(&devices, selected);

        assert!(listing.contains("  Midi Through [in: 0, out: 1]"));
        assert!(listing.contains("* Mock Synth Player [in: 1, out: 0]"));
        assert!(listing.contains("Input #0: Mock Synth Player In"));
    }

    #[test]
    fn test_empty_device_list() {
        let devices: Vec<DeviceDescriptor> = Vec::new();
        assert_eq!(format_device_list(&devices, None), "No MIDI devices found.\n");
    }
}
