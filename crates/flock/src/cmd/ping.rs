use std::time::Instant;

use serde::Serialize;

use crate::cmd::{parse_duration, LinkArgs, PingArgs};
use crate::exit::{CliResult, SUCCESS, TIMEOUT};
use crate::output::{print_json, OutputFormat};

#[derive(Serialize)]
struct PingOutput {
    endpoint: Option<String>,
    sent: u32,
    received: u32,
    reachable: bool,
    rtt_ms: Vec<f64>,
}

pub fn run(args: PingArgs, link: &LinkArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_duration(&args.timeout)?;
    let client = link.open()?;

    let mut rtt_ms = Vec::new();
    for seq in 0..args.count.max(1) {
        let started = Instant::now();
        if client.ping(timeout) {
            let ms = (started.elapsed().as_secs_f64() * 1000.0 * 100.0).round() / 100.0;
            if matches!(format, OutputFormat::Pretty | OutputFormat::Table) {
                println!("heartbeat seq={seq} time={ms:.2}ms");
            }
            rtt_ms.push(ms);
        } else if matches!(format, OutputFormat::Pretty | OutputFormat::Table) {
            println!("heartbeat seq={seq} timed out after {timeout:?}");
        }
    }

    let out = PingOutput {
        endpoint: client
            .connection()
            .endpoint()
            .map(|path| path.display().to_string()),
        sent: args.count.max(1),
        received: rtt_ms.len() as u32,
        reachable: !rtt_ms.is_empty(),
        rtt_ms,
    };

    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("{} sent, {} received", out.sent, out.received);
        }
    }

    Ok(if out.reachable { SUCCESS } else { TIMEOUT })
}
