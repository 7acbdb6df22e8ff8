use clap::Parser;
use gravitymaze_host::{
    cli::{format_device_list, resolve_policy, SetOptions},
    config::AppConfig,
    logging,
    midi::{DeviceCatalog, MidiService, MidirService, MockMidiService},
    ui::{create_device_wait_spinner, describe_device, prompt_seek_bar, OptionsScreen},
    Args, Command, DevicePoller, GameActivity, HostWindow, Looper, OptionsCommand, PollerState,
    SettingsStore, SystemUiFlags,
};
use std::error::Error;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Terminal stand-in for the game window.
#[derive(Default)]
struct ConsoleWindow {
    flags: SystemUiFlags,
}

impl HostWindow for ConsoleWindow {
    fn set_system_ui_visibility(&mut self, flags: SystemUiFlags) {
        self.flags = flags;
        log::debug!("System UI flags set to {:#06x}", flags.bits());
    }

    fn finish(&mut self) {
        log::info!("Window finished with UI flags {:#06x}", self.flags.bits());
    }
}

fn main() {
    let args = Args::parse();

    let config = match AppConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    };

    initialize_logging(&args, &config);

    let service = create_service(args.mock);

    let result = match args.command {
        Command::Devices { marker } => list_devices(service, marker.as_deref(), &config),
        Command::Open { marker, wait_secs } => {
            open_device(service, marker.as_deref(), wait_secs, &config)
        }
        Command::Options(cmd) => run_options(cmd, &config),
    };

    if let Err(e) = result {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn initialize_logging(args: &Args, config: &AppConfig) {
    let result = if args.verbose {
        logging::init_stderr_logger()
    } else {
        logging::init_logger(&config.log_dir())
    };
    if let Err(e) = result {
        eprintln!("Warning: {}", e);
    }
    log::info!("Application starting");
}

fn create_service(mock: bool) -> Arc<dyn MidiService> {
    if mock {
        log::info!("Using mock MIDI service");
        Arc::new(MockMidiService::demo())
    } else {
        Arc::new(MidirService::default())
    }
}

fn list_devices(
    service: Arc<dyn MidiService>,
    marker: Option<&str>,
    config: &AppConfig,
) -> Result<(), Box<dyn Error>> {
    let devices = DeviceCatalog::new(service).list_devices();
    let policy = resolve_policy(marker, config.device_marker.as_deref());
    let selected = policy.select_device(&devices);
    print!("{}", format_device_list(&devices, selected));
    Ok(())
}

fn open_device(
    service: Arc<dyn MidiService>,
    marker: Option<&str>,
    wait_secs: Option<u64>,
    config: &AppConfig,
) -> Result<(), Box<dyn Error>> {
    let (looper, handle) = Looper::new();
    let policy = resolve_policy(marker, config.device_marker.as_deref());
    let mut activity = GameActivity::new(service, handle, ConsoleWindow::default(), policy);
    activity.on_create();
    activity.on_window_focus_changed(true);

    let mut poller = DevicePoller::new();
    let interval = Duration::from_millis(config.poll_interval_ms);
    let deadline = wait_secs.map(|secs| Instant::now() + Duration::from_secs(secs));
    let spinner = create_device_wait_spinner();

    loop {
        looper.dispatch_timeout(interval);
        match poller.manage(&mut activity) {
            PollerState::Ready => break,
            PollerState::Shutdown | PollerState::Idle => {
                spinner.finish_and_clear();
                poller.abort(&mut activity);
                activity.game_activity_finished();
                return Err("no MIDI device could be opened".into());
            }
            PollerState::Initial | PollerState::WaitForDeviceOpen => {}
        }

        if deadline.is_some_and(|d| Instant::now() >= d) {
            spinner.abandon_with_message("gave up waiting");
            poller.abort(&mut activity);
            activity.game_activity_finished();
            return Err(format!(
                "MIDI device did not open within {} second(s)",
                wait_secs.unwrap_or_default()
            )
            .into());
        }
    }

    spinner.finish_and_clear();
    if let Some(device) = poller.device() {
        println!("Opened MIDI device: {}", describe_device(device.as_ref()));
    }

    poller.abort(&mut activity);
    activity.game_activity_finished();
    Ok(())
}

fn run_options(cmd: OptionsCommand, config: &AppConfig) -> Result<(), Box<dyn Error>> {
    let store = SettingsStore::from_config(config);
    let mut screen = OptionsScreen::new(config.slider_max);
    let doc = screen.push_options_to_controls(&store)?;

    match cmd {
        OptionsCommand::Show => {
            println!(
                "gravity = {} (slider {}/{})",
                doc.gravity, screen.gravity_bar.progress, screen.gravity_bar.max
            );
            println!(
                "bounce  = {} (slider {}/{})",
                doc.bounce, screen.bounce_bar.progress, screen.bounce_bar.max
            );
        }
        OptionsCommand::Set(SetOptions { gravity, bounce }) => {
            if let Some(progress) = gravity {
                screen.gravity_bar.set_progress(progress);
            }
            if let Some(progress) = bounce {
                screen.bounce_bar.set_progress(progress);
            }
            let saved = screen.save_and_exit(&store)?;
            println!("Saved gravity = {}, bounce = {}", saved.gravity, saved.bounce);
        }
        OptionsCommand::Edit => {
            prompt_seek_bar("Gravity", &mut screen.gravity_bar)?;
            prompt_seek_bar("Bounce", &mut screen.bounce_bar)?;
            let saved = screen.save_and_exit(&store)?;
            println!("Saved gravity = {}, bounce = {}", saved.gravity, saved.bounce);
        }
    }
    Ok(())
}
