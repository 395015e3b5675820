//! icinga-events-tail
//!
//! Follows an Icinga2 event stream and prints every record, one reader thread
//! per requested event type.

use std::io::Write;
use std::process::ExitCode;
use std::thread;

use clap::Parser;
use log::{error, info};

use icinga_events::{Category, Client, ClientConfig, EventStreamRequest, FeedError};

#[derive(Parser)]
#[command(name = "icinga-events-tail", about = "Print an Icinga2 event stream by type")]
struct TailArgs {
    /// API base URL, up to the version segment
    #[arg(long, env = "ICINGA_URL", default_value = "https://localhost:5665/")]
    url: String,

    /// API user
    #[arg(long, env = "ICINGA_USER")]
    user: String,

    /// API password
    #[arg(long, env = "ICINGA_PASSWORD", hide_env_values = true)]
    password: String,

    /// Accept invalid certificate chains
    #[arg(long)]
    insecure: bool,

    /// Event queue name
    #[arg(long)]
    queue: String,

    /// API filter expression
    #[arg(long)]
    filter: Option<String>,

    /// Event type to follow (repeatable)
    #[arg(long = "type", value_name = "TYPE", required = true)]
    types: Vec<Category>,
}

fn run(args: TailArgs) -> Result<(), FeedError> {
    let client = Client::new(ClientConfig {
        base_url: args.url,
        user: args.user,
        password: args.password,
        insecure_skip_verify: args.insecure,
    })?;

    let mut request = EventStreamRequest::new(args.queue, args.types);
    if let Some(filter) = args.filter {
        request = request.with_filter(filter);
    }

    let demux = client.subscribe(&request)?;
    info!("following {:?}", demux.categories());

    let mut workers = Vec::new();
    for category in demux.categories() {
        let mut stream = demux.reader(category)?;
        workers.push(thread::spawn(move || -> Result<(), FeedError> {
            while let Some(record) = stream.recv()? {
                let mut out = std::io::stdout().lock();
                let _ = write!(out, "{category}\t");
                let _ = out.write_all(record.as_bytes());
            }
            Ok(())
        }));
    }

    let mut result = Ok(());
    for worker in workers {
        match worker.join() {
            Ok(Ok(())) => {}
            Ok(Err(err)) => result = Err(err),
            Err(_) => result = Err(FeedError::internal("reader thread panicked")),
        }
    }

    info!("event stream ended: {:?}", demux.termination());
    result
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(TailArgs::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
