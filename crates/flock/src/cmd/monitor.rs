use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::info;

use crate::cmd::{parse_duration, LinkArgs, MonitorArgs};
use crate::exit::{CliError, CliResult, INTERNAL, SUCCESS, TRANSPORT_ERROR};
use crate::output::{print_message, OutputFormat};

const POLL: Duration = Duration::from_millis(250);

pub fn run(args: MonitorArgs, link: &LinkArgs, format: OutputFormat) -> CliResult<i32> {
    let deadline = match &args.duration {
        Some(duration) => Some(Instant::now() + parse_duration(duration)?),
        None => None,
    };
    let client = link.open()?;
    let connection = client.connection();

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(Arc::clone(&running))?;
    info!(endpoint = ?connection.endpoint(), "monitoring; press Ctrl-C to stop");

    let mut printed = 0usize;
    while running.load(Ordering::SeqCst) {
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            break;
        }
        match connection.receive(POLL) {
            Some(message) => {
                print_message(&message, format);
                printed = printed.saturating_add(1);
                if args.count.is_some_and(|count| printed >= count) {
                    break;
                }
            }
            None if !connection.is_connected() => {
                return Err(CliError::new(TRANSPORT_ERROR, "device disconnected"));
            }
            None => {}
        }
    }

    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
