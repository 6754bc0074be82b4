use std::io::IsTerminal;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use flock_frame::{message_type_name, Message};
use flock_records::{
    BleDevice, IrDetection, NfcDetection, Payload, SubGhzDetection, WifiNetwork,
};
use flock_transport::EndpointInfo;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

/// Something printable as one table row.
pub trait Tabular {
    const HEADERS: &'static [&'static str];

    fn row(&self) -> Vec<String>;
}

/// Print `rows` in a table or as `key=value` lines. JSON output is the
/// caller's job, since it usually wraps the rows with context.
pub fn print_rows<T: Tabular>(rows: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(T::HEADERS.to_vec());
            for row in rows {
                table.add_row(row.row());
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Json => {
            for row in rows {
                let fields: Vec<String> = T::HEADERS
                    .iter()
                    .zip(row.row())
                    .map(|(name, value)| format!("{}={}", name.to_lowercase(), value))
                    .collect();
                println!("{}", fields.join(" "));
            }
        }
    }
}

impl Tabular for EndpointInfo {
    const HEADERS: &'static [&'static str] = &["PATH", "USB", "DESCRIPTION"];

    fn row(&self) -> Vec<String> {
        vec![
            self.path.display().to_string(),
            self.usb_label(),
            self.description.clone().unwrap_or_else(|| "N/A".to_string()),
        ]
    }
}

impl Tabular for WifiNetwork {
    const HEADERS: &'static [&'static str] =
        &["SSID", "BSSID", "RSSI", "CHANNEL", "SECURITY", "HIDDEN"];

    fn row(&self) -> Vec<String> {
        vec![
            self.ssid.clone(),
            mac(&self.bssid),
            self.rssi.to_string(),
            self.channel.to_string(),
            self.security.to_string(),
            self.hidden.to_string(),
        ]
    }
}

impl Tabular for SubGhzDetection {
    const HEADERS: &'static [&'static str] =
        &["FREQUENCY", "RSSI", "MODULATION", "DURATION_MS", "PROTOCOL"];

    fn row(&self) -> Vec<String> {
        vec![
            format!("{:.3} MHz", f64::from(self.frequency) / 1_000_000.0),
            self.rssi.to_string(),
            self.modulation.to_string(),
            self.duration_ms.to_string(),
            self.protocol_name.clone(),
        ]
    }
}

impl Tabular for BleDevice {
    const HEADERS: &'static [&'static str] =
        &["ADDRESS", "NAME", "RSSI", "CONNECTABLE", "SERVICES", "MANUFACTURER"];

    fn row(&self) -> Vec<String> {
        vec![
            mac(&self.mac_address),
            self.name.clone(),
            self.rssi.to_string(),
            self.connectable.to_string(),
            self.service_uuids.len().to_string(),
            format!(
                "{:04X}",
                u16::from_le_bytes(self.manufacturer_id)
            ),
        ]
    }
}

impl Tabular for IrDetection {
    const HEADERS: &'static [&'static str] = &["PROTOCOL", "ADDRESS", "COMMAND", "REPEAT", "RSSI"];

    fn row(&self) -> Vec<String> {
        vec![
            self.protocol_name.clone(),
            format!("{:#x}", self.address),
            format!("{:#x}", self.command),
            self.repeat.to_string(),
            self.signal_strength.to_string(),
        ]
    }
}

impl Tabular for NfcDetection {
    const HEADERS: &'static [&'static str] = &["UID", "TYPE", "SAK", "ATQA"];

    fn row(&self) -> Vec<String> {
        vec![
            hex(self.uid_bytes()),
            self.type_name.clone(),
            format!("{:02X}", self.sak),
            hex(&self.atqa),
        ]
    }
}

#[derive(Serialize)]
struct MessageOutput<'a> {
    msg_type: u8,
    type_name: &'static str,
    payload_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<&'a Payload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    decode_error: Option<String>,
    timestamp: String,
}

/// Print one received message, decoded where the type is known.
pub fn print_message(message: &Message, format: OutputFormat) {
    let msg_type = message.msg_type();
    let decoded = Payload::from_message(message);

    match format {
        OutputFormat::Json => {
            let (payload, decode_error) = match &decoded {
                Ok(payload) => (Some(payload), None),
                Err(err) => (None, Some(err.to_string())),
            };
            print_json(&MessageOutput {
                msg_type,
                type_name: message_type_name(msg_type),
                payload_size: message.payload.len(),
                payload,
                decode_error,
                timestamp: now_unix_seconds(),
            });
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!(
                "type={:#04x} ({}) size={} {}",
                msg_type,
                message_type_name(msg_type),
                message.payload.len(),
                summary(&decoded)
            );
        }
    }
}

fn summary(decoded: &flock_records::Result<Payload>) -> String {
    let payload = match decoded {
        Ok(payload) => payload,
        Err(err) => return format!("<undecodable: {err}>"),
    };
    match payload {
        Payload::Empty => String::new(),
        Payload::Status(status) => format!(
            "battery={}% uptime={}s",
            status.battery_percent, status.uptime_seconds
        ),
        Payload::WifiScan(report) => format!("{} networks", report.entries.len()),
        Payload::SubGhzScan(report) => format!(
            "{} detections {}-{} Hz",
            report.detections.len(),
            report.frequency_start,
            report.frequency_end
        ),
        Payload::BleScan(report) => format!("{} devices", report.entries.len()),
        Payload::IrScan(report) => format!("{} signals", report.entries.len()),
        Payload::NfcScan(report) => format!("{} cards", report.entries.len()),
        Payload::WipsAlert(alert) => format!(
            "[{}] {} ssid={} {}",
            alert.severity, alert.kind, alert.ssid, alert.description
        ),
        Payload::Error(err) => err.to_string(),
        Payload::Raw { bytes, .. } => format!("<{} bytes>", bytes.len()),
    }
}

pub fn mac(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(":")
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02X}")).collect()
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
