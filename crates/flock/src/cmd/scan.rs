use flock_link::Client;
use flock_records::{
    BleDevice, IrDetection, NfcDetection, ScanEntry, ScanReport, SubGhzScanRequest, WifiNetwork,
};
use serde::Serialize;

use crate::cmd::{parse_duration, LinkArgs, ScanArgs, ScanKind};
use crate::exit::{link_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_json, print_rows, OutputFormat, Tabular};

pub fn run(args: ScanArgs, link: &LinkArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;
    if args.kind == ScanKind::Subghz && args.start >= args.end {
        return Err(CliError::new(
            USAGE,
            format!("--start ({}) must be below --end ({})", args.start, args.end),
        ));
    }

    let client = link.open()?;
    match args.kind {
        ScanKind::Wifi => report::<WifiNetwork>(&client, timeout, format, "networks"),
        ScanKind::Ble => report::<BleDevice>(&client, timeout, format, "devices"),
        ScanKind::Ir => report::<IrDetection>(&client, timeout, format, "signals"),
        ScanKind::Nfc => report::<NfcDetection>(&client, timeout, format, "cards"),
        ScanKind::Subghz => {
            let band = SubGhzScanRequest {
                frequency_start: args.start,
                frequency_end: args.end,
            };
            let report = client
                .subghz_scan(&band, timeout)
                .map_err(|err| link_error("sub-ghz scan failed", err))?;
            match format {
                OutputFormat::Json => print_json(&report),
                OutputFormat::Table | OutputFormat::Pretty => {
                    println!(
                        "{} detections in {}-{} Hz at t={}",
                        report.detections.len(),
                        report.frequency_start,
                        report.frequency_end,
                        report.timestamp
                    );
                    print_rows(&report.detections, format);
                }
            }
            Ok(SUCCESS)
        }
    }
}

fn report<T>(
    client: &Client,
    timeout: std::time::Duration,
    format: OutputFormat,
    noun: &str,
) -> CliResult<i32>
where
    T: ScanEntry + Tabular + Serialize,
{
    let report: ScanReport<T> = client
        .scan(timeout)
        .map_err(|err| link_error("scan failed", err))?;

    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("{} {noun} at t={}", report.entries.len(), report.timestamp);
            print_rows(&report.entries, format);
        }
    }
    Ok(SUCCESS)
}
