//! Sample device application
//!
//! Fills and sends sample custom, network request and error events for a
//! smart car, then waits for the collector to re-enable the SDK if it was
//! disabled along the way.
//!
//! # Usage
//!
//! ```bash
//! # Send every sample event to the default collector
//! iot-sample <APP_KEY>
//!
//! # Only error events, verbose SDK logs to a custom file
//! iot-sample <APP_KEY> -s 4 -l 5 -f car.log
//!
//! # Capture a live POST request as the network event
//! iot-sample <APP_KEY> -s 2 -u https://httpbin.org/post -x POST -d '{"a":1}'
//! ```

mod events;
mod file_sink;
mod http;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use iot_config::{Config, DeviceConfig, LogLevel, SdkConfig};
use iot_telemetry::logging::level_filter;
use iot_telemetry::{LogSink, Method, Sdk, SinkLayer, StderrSink};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, prelude::*};

use crate::file_sink::FileSink;
use crate::http::HttpTransport;

const SEND_CUSTOM: u8 = 1;
const SEND_NETWORK: u8 = 2;
const SEND_ERROR: u8 = 4;

/// Simple program to fill and send sample data for custom, network and error events
#[derive(Parser, Debug)]
#[command(name = "iot-sample")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Application key events are reported under
    app_key: String,

    /// Collector URL events are sent to
    #[arg(short = 'c', long)]
    collector_url: Option<String>,

    /// File SDK log lines are appended to
    #[arg(short = 'f', long, default_value = "iot_sdk.log")]
    log_file: PathBuf,

    /// Log level (1 error, 2 warn, 3 info, 4 debug, 5 verbose, 6 all)
    #[arg(short, long, default_value_t = 6)]
    log_level: i64,

    /// Events to send (1 custom, 2 network, 4 error, 7 all)
    #[arg(short, long, default_value_t = 7, value_parser = clap::value_parser!(u8).range(1..=7))]
    send_event: u8,

    /// URL to request and report as the network event
    #[arg(short, long)]
    url: Option<String>,

    /// HTTP method for --url
    #[arg(short = 'x', long, default_value = "GET")]
    request: Method,

    /// Request body for --url
    #[arg(short, long)]
    data: Option<String>,

    /// Seconds between app status checks while the SDK is disabled
    #[arg(short, long, default_value_t = 15)]
    timer: u64,

    /// App status checks before giving up
    #[arg(short, long, default_value_t = 5)]
    retries: u32,

    /// TOML config file; its [device] replaces the sample device and its
    /// collector URL is used when -c is not given
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = LogLevel::from_level(cli.log_level);
    init_logging(level, &cli.log_file)?;

    let file = cli
        .config
        .as_deref()
        .map(Config::from_file)
        .transpose()
        .context("failed to load config file")?;

    let device = file
        .as_ref()
        .map(|file| file.device.clone())
        .unwrap_or_else(sample_device);

    let mut config = SdkConfig::new(cli.app_key.as_str()).with_log_level(level);
    let collector_url = cli
        .collector_url
        .clone()
        .or_else(|| file.and_then(|file| file.sdk.collector_url));
    if let Some(url) = collector_url {
        config = config.with_collector_url(url);
    }

    let sdk = Sdk::builder(config, device)
        .on_state_change(|state| println!("\nNew SDK State:{}", state))
        .init()
        .context("error initializing sdk")?;

    let transport = Arc::new(HttpTransport::new().context("failed to build http client")?);
    sdk.register_transport(transport.clone());

    run(&sdk, transport.as_ref(), &cli);

    if sdk.state().is_disabled() {
        wait_for_enable(&sdk, Duration::from_secs(cli.timer), cli.retries);
    }

    Ok(())
}

/// Send the events selected by the --send-event bitmask
fn run(sdk: &Sdk, transport: &HttpTransport, cli: &Cli) {
    // Failures are printed per event and do not stop the run
    if cli.send_event & SEND_CUSTOM != 0 {
        let _ = events::send_custom_event(sdk);
    }

    if cli.send_event & SEND_NETWORK != 0 {
        let _ = match cli.url.as_deref() {
            Some(url) => events::capture_and_send_network_event(
                sdk,
                transport,
                url,
                cli.request,
                cli.data.as_deref(),
            ),
            None => events::send_network_event(sdk),
        };
    }

    if cli.send_event & SEND_ERROR != 0 {
        let _ = events::send_error_event_alert(sdk);
        let _ = events::send_error_event_critical(sdk);
        let _ = events::send_error_event_fatal(sdk);
    }
}

/// Poll the collector until it re-enables the SDK or retries run out
fn wait_for_enable(sdk: &Sdk, period: Duration, retries: u32) {
    for attempt in 1..=retries {
        match sdk.check_app_status() {
            Ok(()) if sdk.state().is_enabled() => {
                println!("SDK Enabled Successfully");
                return;
            }
            Ok(()) => {}
            Err(e) => info!(attempt, error = %e, "sdk still disabled"),
        }
        thread::sleep(period);
    }
    warn!(retries, state = %sdk.state(), "sdk not re-enabled");
}

fn sample_device() -> DeviceConfig {
    DeviceConfig::new("SmartCar")
        .with_device_id("1111")
        .with_device_name("AudiS3")
        .with_fw_version("1.0")
        .with_hw_version("1.0")
        .with_os_version("1.0")
        .with_sw_version("1.0")
}

/// Route SDK logs to the log file, falling back to stderr
fn init_logging(level: LogLevel, log_file: &Path) -> Result<()> {
    let sink: Arc<dyn LogSink> = match FileSink::open(log_file) {
        Ok(sink) => Arc::new(sink),
        Err(e) => {
            eprintln!("failed to open log file {}: {}", log_file.display(), e);
            Arc::new(StderrSink)
        }
    };

    // RUST_LOG overrides; otherwise only our crates log below warn
    let filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(format!(
            "warn,iot_telemetry={0},iot_sample={0}",
            level_filter(level)
        ))
    })?;

    tracing_subscriber::registry()
        .with(SinkLayer::new(sink))
        .with(filter)
        .try_init()?;

    Ok(())
}
