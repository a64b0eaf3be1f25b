use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::thread;

use anyhow::Context;
use crossbeam_channel::{unbounded, Receiver, Sender};
use rodio::{OutputStream, OutputStreamHandle};
use sysinfo::System;

use soundscape::audio_system::{AudioGroup, SinkSource, SourceHandle, SoundscapeController};
use soundscape::utils::FrameClock;
use soundscape::{AppResult, AudioError, Command, CommandResult, Config, Event};

const LOG_TARGET_STARTUP: &str = "soundscape::startup";

/// Initialize tracing with file rotation
///
/// Logs are written to `<config dir>/Soundscape/logs/soundscape.YYYY-MM-DD.log`.
/// Debug builds also log to the console.
fn initialize_tracing() {
    use tracing_appender::rolling;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let log_dir = dirs::config_dir()
        .map(|dir| dir.join("Soundscape").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"));

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create log directory: {}", e);
    }

    let file_appender = rolling::daily(&log_dir, "soundscape.log");

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true);

    #[cfg(debug_assertions)]
    {
        let console_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(console_layer)
            .init();
    }

    #[cfg(not(debug_assertions))]
    {
        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();
    }

    tracing::info!("Log directory: {}", log_dir.display());
}

fn log_runtime_environment() {
    let version = env!("CARGO_PKG_VERSION");
    let os_name = System::long_os_version()
        .or_else(System::name)
        .unwrap_or_else(|| "Unknown OS".to_string());
    let kernel = System::kernel_version().unwrap_or_else(|| "Unknown Kernel".to_string());

    tracing::info!(
        target: LOG_TARGET_STARTUP,
        "Starting soundscape v{} on ({})",
        version,
        std::env::consts::ARCH
    );
    tracing::info!(target: LOG_TARGET_STARTUP, "Operating System: {} (kernel {})", os_name, kernel);
}

/// Open every configured source; a source that fails to open leaves an empty slot
fn build_groups(config: &Config, config_path: &Path, stream_handle: &OutputStreamHandle) -> Vec<AudioGroup> {
    config
        .groups
        .iter()
        .map(|group| {
            let slots = group
                .sources
                .iter()
                .map(|entry| {
                    let path = Config::resolve_source_path(config_path, entry);
                    match SinkSource::open(stream_handle, &path, entry.volume, entry.looped) {
                        Ok(source) => Some(SourceHandle::new(source)),
                        Err(e) => {
                            tracing::warn!("Audiogroup {}: {}", group.name, e);
                            None
                        }
                    }
                })
                .collect();
            AudioGroup::new(group.name.clone(), slots)
        })
        .collect()
}

/// Forward stdin lines as commands; EOF quits
fn spawn_command_reader(commands: Sender<Command>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<Command>() {
                Ok(command) => {
                    if commands.send(command).is_err() {
                        return;
                    }
                }
                Err(e) => eprintln!("✗ {} (try: in <group>, out <group>, master <0-1>, status, quit)", e),
            }
        }
        let _ = commands.send(Command::Quit);
    });
}

fn log_events(events: &Receiver<Event>) {
    for event in events.try_iter() {
        match event {
            Event::FadeCompleted { .. } | Event::MasterVolumeChanged { .. } => {
                tracing::info!("{}", event.description())
            }
            _ => tracing::debug!("{}", event.description()),
        }
    }
}

/// Fade every group out, then keep ticking until all fades finished
fn fade_out_and_stop(controller: &mut SoundscapeController, clock: &mut FrameClock, events: &Receiver<Event>) {
    let names: Vec<String> = controller.group_names().map(str::to_string).collect();
    for name in &names {
        controller.fade_out_group(name);
    }

    while controller.engine().active_count() > 0 {
        clock.wait();
        controller.tick(clock.delta());
        log_events(events);
    }
}

fn run(config_path: &Path) -> AppResult<()> {
    let config = Config::load(config_path)
        .with_context(|| format!("Failed to start with config {}", config_path.display()))?;

    let (_stream, stream_handle) = OutputStream::try_default()
        .map_err(|e| AudioError::StreamInitFailed(Box::new(e)))
        .context("No audio output device available")?;

    let groups = build_groups(&config, config_path, &stream_handle);
    let mut controller = SoundscapeController::new(config.fade_policy(), groups);
    let (events, _subscriber) = controller.events().subscribe();

    controller.set_master_volume(config.master_volume);
    controller.start();

    let (command_tx, command_rx) = unbounded();
    spawn_command_reader(command_tx);

    println!("Soundscape running. Commands: in <group>, out <group>, master <0-1>, status, quit");

    let mut clock = FrameClock::new(config.tick_rate_hz);
    'ticks: loop {
        clock.wait();
        let dt = clock.delta();

        for command in command_rx.try_iter() {
            match controller.apply(command) {
                CommandResult::Success => {}
                CommandResult::SuccessWithValue(report) => println!("{}", report),
                CommandResult::Quit => break 'ticks,
            }
        }

        controller.tick(dt);
        log_events(&events);
    }

    fade_out_and_stop(&mut controller, &mut clock, &events);
    controller.shutdown();
    Ok(())
}

fn main() {
    initialize_tracing();
    log_runtime_environment();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(Config::default_path);

    if let Err(e) = run(&config_path) {
        tracing::error!("{:#}", e);
        eprintln!("✗ {:#}", e);
        std::process::exit(1);
    }
}
