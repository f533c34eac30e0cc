use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use remotecontroller::config::{AppConfig, LogLevel};
use remotecontroller::mqtt::{LinkEvent, MqttLink, MqttPublisher};
use remotecontroller::remote::Controller;
use std::path::PathBuf;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "remotecontroller",
    version,
    about = "Control lights with a wireless remote over MQTT"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured log verbosity
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup()?;

    let path = AppConfig::resolve_path(cli.config.as_deref())
        .await
        .map_err(|e| eyre!("Refusing to start: {}", e))?;
    let config = AppConfig::load(&path)
        .await
        .map_err(|e| eyre!("Refusing to start: {}", e))?;

    let level = cli.log_level.unwrap_or(config.general.log_level).level();
    setup_logging_env(level);
    info!("Loaded configuration from {}", path.display());
    info!("Starting remote controller with log level {}", level);

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown requested"),
            Err(e) => error!("Failed to listen for shutdown signal: {}", e),
        }
        signal_token.cancel();
    });

    run(config, shutdown).await
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    Ok(())
}

fn setup_logging_env(level: Level) {
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .init();
}

/// Single event loop: heartbeat ticks and link events are handled one at a time.
async fn run(config: AppConfig, shutdown: CancellationToken) -> Result<()> {
    let link = MqttLink::create(config.mqtt_config());
    let mut controller = Controller::new(config.controller_settings(), link.publisher());
    let mut link = link.start();

    let mut heartbeat = tokio::time::interval(config.heartbeat());
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // First tick completes immediately.
    heartbeat.tick().await;

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = heartbeat.tick() => controller.on_tick(),
            event = link.next_event() => dispatch(&mut controller, event),
        }
    }

    let link = link.stop().await;
    let status = link.status();
    info!(
        "Stopped after {} received and {} sent messages",
        status.messages_received, status.messages_sent
    );
    Ok(())
}

fn dispatch(controller: &mut Controller<MqttPublisher>, event: LinkEvent) {
    match event {
        LinkEvent::Connected => {
            if let Err(e) = controller.on_connected() {
                error!("{}", e);
            }
        }
        LinkEvent::Subscribed => controller.on_subscribed(),
        LinkEvent::Disconnected(reason) => {
            warn!("Connection lost: {}", reason);
            controller.on_disconnected();
        }
        LinkEvent::Retrying(reason) => warn!("Connection attempt failed: {}", reason),
        LinkEvent::Message(message) => {
            for failure in controller.on_inbound_message(message.topic(), message.content()) {
                warn!("{}", failure);
            }
        }
        LinkEvent::Idle => {}
    }
}
