use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tracing_subscriber::EnvFilter;

use crate::core::{
    alerts::AlertController,
    clock::MonotonicClock,
    config::{ConfigManager, Settings},
    coordinator::Coordinator,
    haptic::{Drv2605, SimulatedBus},
    model::Message,
    panel::{LogPanel, Panel},
    telemetry::TelemetryEmitter,
};

/// Directory holding settings.json
const CONFIG_DIR_ENV: &str = "DROWSY_ALERT_CONFIG_DIR";

/// Inbound lines buffered between the reader task and the control loop
const HOST_QUEUE_DEPTH: usize = 64;

pub fn run() -> anyhow::Result<()> {
    init_logging();

    let config_dir = std::env::var_os(CONFIG_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let config_manager = ConfigManager::new(config_dir);
    let settings = config_manager.load_or_init();
    log::info!("Settings from {:?}: {:?}", config_manager.path(), settings);

    // Single-threaded cooperative loop
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build runtime")?;
    runtime.block_on(control_loop(settings));
    // The stdin reader may still be parked in a blocking read
    runtime.shutdown_timeout(Duration::from_millis(100));
    Ok(())
}

fn init_logging() {
    // stdout carries the host protocol, logs go to stderr
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(feature = "audio")]
fn open_panel() -> Box<dyn Panel> {
    match crate::core::panel::AudioPanel::open() {
        Ok(panel) => Box::new(panel),
        Err(e) => {
            log::warn!("Audio output unavailable, buzzer is log-only: {}", e);
            Box::new(LogPanel)
        }
    }
}

#[cfg(not(feature = "audio"))]
fn open_panel() -> Box<dyn Panel> {
    Box::new(LogPanel)
}

async fn control_loop(settings: Settings) {
    let bus = if settings.haptic.enabled {
        SimulatedBus::new()
    } else {
        SimulatedBus::detached()
    };
    let controller = AlertController::new(
        Drv2605::new(bus, settings.haptic.address),
        open_panel(),
        settings.escalation,
    );
    let telemetry = TelemetryEmitter::new(settings.heartbeat_interval_ms, settings.vitals_seed);
    let mut coordinator = Coordinator::new(MonotonicClock::new(), controller, telemetry);

    let (tx, mut rx) = mpsc::channel(HOST_QUEUE_DEPTH);
    tokio::spawn(read_host_lines(tx));

    let idle = Duration::from_millis(settings.tick_interval_ms);
    let mut stdout = std::io::stdout();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    log::info!("Waiting for host commands on stdin");
    loop {
        let line = match rx.try_recv() {
            Ok(line) => Some(line),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                log::info!("Host link closed");
                break;
            }
        };

        let output = coordinator.step(line.as_deref());
        write_messages(&mut stdout, &output.messages);

        tokio::select! {
            _ = tokio::time::sleep(idle) => {}
            _ = &mut ctrl_c => {
                log::info!("Interrupted");
                break;
            }
        }
    }

    let output = coordinator.shutdown();
    write_messages(&mut stdout, &output.messages);
}

/// Forward stdin lines to the control loop until EOF.
async fn read_host_lines(tx: mpsc::Sender<String>) {
    let mut reader = BufReader::new(tokio::io::stdin());
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                // Line noise must not kill the link
                let line = String::from_utf8_lossy(&buf).into_owned();
                if tx.send(line).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                log::warn!("Error reading host link: {}", e);
                break;
            }
        }
    }
}

/// Write one JSON object per line. Failures are logged and the message dropped.
pub fn write_messages<W: Write>(out: &mut W, messages: &[Message]) {
    for message in messages {
        let line = match message.to_line() {
            Ok(line) => line,
            Err(e) => {
                log::warn!("Failed to encode {:?}: {}", message, e);
                continue;
            }
        };
        if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
            log::warn!("Failed to send to host: {}", e);
        }
    }
}
