//! yt-comment-threads - List and insert YouTube comment threads.

use clap::Parser;
use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;
use yt_comment_threads::{Args, Command, YouTubeService};

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` takes precedence; otherwise `-v` raises this crate's level.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,yt_comment_threads={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let service = YouTubeService::new(args.service_config())?;
    let mut buffer: Vec<u8> = Vec::new();

    match &args.command {
        Command::List(list) => {
            let mut client = list.builder().with_service(Box::new(service)).build()?;
            client.list(
                &list.parts,
                list.format,
                list.json_path.as_deref(),
                &mut buffer,
            )?;
        }
        Command::Insert(insert) => {
            let client = insert.builder().with_service(Box::new(service)).build()?;
            client.insert(insert.format, insert.json_path.as_deref(), &mut buffer)?;
        }
    }

    // Write output
    if let Some(output_path) = &args.output {
        fs::write(output_path, &buffer)?;
        info!(path = %output_path, bytes = buffer.len(), "output written");
        eprintln!("Output written to {output_path}");
    } else {
        io::stdout().write_all(&buffer)?;
    }

    Ok(())
}
