use flock_records::DeviceStatus;

use crate::cmd::{parse_duration, LinkArgs, StatusArgs};
use crate::exit::{link_error, CliResult, SUCCESS};
use crate::output::{print_json, OutputFormat};

pub fn run(args: StatusArgs, link: &LinkArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;
    let client = link.open()?;
    let status = client
        .status(timeout)
        .map_err(|err| link_error("status request failed", err))?;

    match format {
        OutputFormat::Json => print_json(&status),
        OutputFormat::Table | OutputFormat::Pretty => print_status(&status),
    }
    Ok(SUCCESS)
}

fn print_status(status: &DeviceStatus) {
    let ready = |flag: bool| if flag { "ready" } else { "not ready" };

    println!("Device Status:");
    println!("  Protocol:        v{}", status.protocol_version);
    println!("  Battery:         {}%", status.battery_percent);
    println!("  Uptime:          {}s", status.uptime_seconds);
    println!(
        "  WiFi board:      {}",
        if status.wifi_board_connected { "connected" } else { "not connected" }
    );
    println!("  Sub-GHz:         {}", ready(status.subghz_ready));
    println!("  BLE:             {}", ready(status.ble_ready));
    println!("  IR:              {}", ready(status.ir_ready));
    println!("  NFC:             {}", ready(status.nfc_ready));
    println!(
        "  Counters:        wifi={} subghz={} ble={} ir={} nfc={} wips={}",
        status.wifi_scan_count,
        status.subghz_detection_count,
        status.ble_scan_count,
        status.ir_detection_count,
        status.nfc_detection_count,
        status.wips_alert_count
    );
}
