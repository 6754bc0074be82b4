use flock_records::{BleActiveScan, IrStrobe, LfProbe, WifiProbe, ZigbeeBeacon};
use serde::Serialize;

use crate::cmd::{parse_duration, LinkArgs, ProbeArgs, ProbeKind};
use crate::exit::{link_error, CliResult, SUCCESS};
use crate::output::{print_json, OutputFormat};

#[derive(Serialize)]
struct ProbeOutput {
    probe: &'static str,
    acknowledged: bool,
}

pub fn run(args: ProbeArgs, link: &LinkArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;
    let client = link.open()?;

    let (probe, result) = match args.kind {
        ProbeKind::Lf { duration_ms } => ("lf", client.lf_probe(&LfProbe { duration_ms }, timeout)),
        ProbeKind::IrStrobe {
            frequency_hz,
            duty_cycle,
            duration_ms,
        } => (
            "ir-strobe",
            client.ir_strobe(
                &IrStrobe {
                    frequency_hz,
                    duty_cycle,
                    duration_ms,
                },
                timeout,
            ),
        ),
        ProbeKind::Wifi { ssid } => ("wifi", client.wifi_probe(&WifiProbe::new(ssid), timeout)),
        ProbeKind::BleActive { passive } => (
            "ble-active",
            client.ble_active_scan(&BleActiveScan { active: !passive }, timeout),
        ),
        ProbeKind::Zigbee { channel } => (
            "zigbee",
            client.zigbee_beacon(&ZigbeeBeacon { channel }, timeout),
        ),
    };
    result.map_err(|err| link_error(&format!("{probe} probe failed"), err))?;

    let out = ProbeOutput {
        probe,
        acknowledged: true,
    };
    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table | OutputFormat::Pretty => println!("{probe} probe acknowledged"),
    }
    Ok(SUCCESS)
}
