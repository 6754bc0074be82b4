use flock_transport::{list_endpoints, DeviceMatcher, EndpointInfo};
use serde::Serialize;

use crate::cmd::PortsArgs;
use crate::exit::{transport_error, CliResult, SUCCESS};
use crate::output::{print_json, print_rows, OutputFormat, Tabular};

#[derive(Serialize)]
struct PortOutput {
    path: String,
    vendor_id: Option<u16>,
    product_id: Option<u16>,
    description: Option<String>,
    matches: bool,
}

struct PortRow<'a> {
    endpoint: &'a EndpointInfo,
    matches: bool,
}

impl Tabular for PortRow<'_> {
    const HEADERS: &'static [&'static str] = &["PATH", "USB", "DESCRIPTION", "MATCH"];

    fn row(&self) -> Vec<String> {
        let mut row = self.endpoint.row();
        row.push(if self.matches { "yes" } else { "" }.to_string());
        row
    }
}

pub fn run(args: PortsArgs, format: OutputFormat) -> CliResult<i32> {
    let matcher = DeviceMatcher::default();
    let endpoints =
        list_endpoints().map_err(|err| transport_error("listing endpoints failed", err))?;

    let rows: Vec<PortRow<'_>> = endpoints
        .iter()
        .map(|endpoint| PortRow {
            endpoint,
            matches: matcher.matches(endpoint),
        })
        .filter(|row| row.matches || !args.matching)
        .collect();

    match format {
        OutputFormat::Json => {
            let out: Vec<PortOutput> = rows
                .iter()
                .map(|row| PortOutput {
                    path: row.endpoint.path.display().to_string(),
                    vendor_id: row.endpoint.vendor_id,
                    product_id: row.endpoint.product_id,
                    description: row.endpoint.description.clone(),
                    matches: row.matches,
                })
                .collect();
            print_json(&out);
        }
        OutputFormat::Table | OutputFormat::Pretty if rows.is_empty() => {
            println!("no serial endpoints found");
        }
        OutputFormat::Table | OutputFormat::Pretty => print_rows(&rows, format),
    }

    Ok(SUCCESS)
}
