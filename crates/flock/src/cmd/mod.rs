use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand, ValueEnum};
use flock_link::{Client, ConnectionConfig};

use crate::exit::{link_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod monitor;
pub mod ping;
pub mod ports;
pub mod probe;
pub mod scan;
pub mod status;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List serial endpoints and mark the ones that look like a Flock Bridge.
    Ports(PortsArgs),
    /// Send heartbeats and report round-trip times.
    Ping(PingArgs),
    /// Query device status.
    Status(StatusArgs),
    /// Run a passive scan and print the results.
    Scan(ScanArgs),
    /// Trigger an active probe.
    Probe(ProbeArgs),
    /// Print every message the device sends.
    Monitor(MonitorArgs),
    /// Show version information.
    Version(VersionArgs),
}

/// Where and how to reach the device; shared by every command that connects.
#[derive(Args, Debug, Clone)]
pub struct LinkArgs {
    /// Serial device or unix socket. Default: auto-detect.
    #[arg(long, short = 'p', env = "FLOCK_PORT", global = true)]
    pub port: Option<PathBuf>,
    /// Serial baud rate.
    #[arg(long, env = "FLOCK_BAUD", default_value_t = 115_200, global = true)]
    pub baud: u32,
}

impl LinkArgs {
    pub fn config(&self) -> ConnectionConfig {
        let config = ConnectionConfig::default().with_baud_rate(self.baud);
        match &self.port {
            Some(port) => config.with_endpoint(port),
            None => config,
        }
    }

    pub fn open(&self) -> CliResult<Client> {
        Client::open(self.config()).map_err(|err| link_error("connect failed", err))
    }
}

pub fn run(command: Command, link: &LinkArgs, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Ports(args) => ports::run(args, format),
        Command::Ping(args) => ping::run(args, link, format),
        Command::Status(args) => status::run(args, link, format),
        Command::Scan(args) => scan::run(args, link, format),
        Command::Probe(args) => probe::run(args, link, format),
        Command::Monitor(args) => monitor::run(args, link, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct PortsArgs {
    /// Show only endpoints that match a known device.
    #[arg(long)]
    pub matching: bool,
}

#[derive(Args, Debug)]
pub struct PingArgs {
    /// Number of heartbeats to send.
    #[arg(long, short = 'c', default_value = "1")]
    pub count: u32,
    /// Wait per heartbeat (e.g. 2s, 500ms).
    #[arg(long, default_value = "2s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Response timeout (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub timeout: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ScanKind {
    Wifi,
    Subghz,
    Ble,
    Ir,
    Nfc,
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    pub kind: ScanKind,
    /// Result timeout (e.g. 10s, 500ms).
    #[arg(long, default_value = "10s")]
    pub timeout: String,
    /// Sub-GHz band start in Hz.
    #[arg(long, default_value_t = 300_000_000)]
    pub start: u32,
    /// Sub-GHz band end in Hz.
    #[arg(long, default_value_t = 928_000_000)]
    pub end: u32,
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    #[command(subcommand)]
    pub kind: ProbeKind,
    /// Acknowledgement timeout (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s", global = true)]
    pub timeout: String,
}

#[derive(Subcommand, Debug)]
pub enum ProbeKind {
    /// 125 kHz low-frequency carrier burst.
    Lf {
        /// Burst length, clamped to 100..=5000.
        #[arg(long, default_value_t = 1000)]
        duration_ms: u16,
    },
    /// Infrared strobe.
    IrStrobe {
        #[arg(long, default_value_t = 14)]
        frequency_hz: u16,
        /// Duty cycle percent, clamped to 100.
        #[arg(long, default_value_t = 50)]
        duty_cycle: u8,
        /// Strobe length, clamped to 100..=10000.
        #[arg(long, default_value_t = 1000)]
        duration_ms: u16,
    },
    /// WiFi probe request for an SSID (empty for broadcast).
    Wifi {
        #[arg(default_value = "")]
        ssid: String,
    },
    /// BLE scan with scan requests.
    BleActive {
        /// Passive scan instead of active.
        #[arg(long)]
        passive: bool,
    },
    /// Zigbee beacon request.
    Zigbee {
        /// 802.15.4 channel (11-26); 0 hops all channels.
        #[arg(long, default_value_t = 0)]
        channel: u8,
    },
}

#[derive(Args, Debug)]
pub struct MonitorArgs {
    /// Exit after N messages.
    #[arg(long)]
    pub count: Option<usize>,
    /// Exit after this long (e.g. 30s). Default: until interrupted.
    #[arg(long)]
    pub duration: Option<String>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Parse `2s`, `150ms` or a bare number of seconds.
pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .trim()
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;
    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    Ok(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}
