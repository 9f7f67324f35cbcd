//! Fetches one thread and prints its topics as JSON.
//!
//! Usage: `thread_topics <url-or-file> [output.json|output.txt] [--force]`
//!
//! Options are read from the JSON file named by `THREADSPLIT_OPTIONS`, if
//! set. Log level follows `RUST_LOG` (default `info`).

use std::path::Path;
use std::process::ExitCode;

use threadsplit::export::{export, to_json, ExportStatus, Format};
use threadsplit::{fetch_with_options, Options};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let force = args.iter().any(|arg| arg == "--force");
    let positional: Vec<&String> = args.iter().filter(|arg| !arg.starts_with("--")).collect();

    let Some(locator) = positional.first() else {
        eprintln!("usage: thread_topics <url-or-file> [output.json|output.txt] [--force]");
        return ExitCode::from(2);
    };

    match run(locator, positional.get(1).map(|p| Path::new(p.as_str())), force) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "fetch failed");
            ExitCode::FAILURE
        }
    }
}

fn run(locator: &str, output: Option<&Path>, force: bool) -> threadsplit::Result<()> {
    let options = match std::env::var("THREADSPLIT_OPTIONS") {
        Ok(path) => Options::from_json_str(&std::fs::read_to_string(path)?)?,
        Err(_) => Options::default(),
    };

    let topics = fetch_with_options(locator, &options)?;

    match output {
        Some(path) => {
            let format = Format::from_path(path).unwrap_or_default();
            if export(&topics, format, path, force)? == ExportStatus::SkippedEmpty {
                eprintln!("{} kept: thread produced no topics", path.display());
            }
        }
        None => println!("{}", to_json(&topics)?),
    }
    Ok(())
}
