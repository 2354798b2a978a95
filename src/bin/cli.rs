//! rego CLI Client
//!
//! Interactive read-send-print loop against a Redis server.

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::Parser;
use rego::network::{spawn_scanner, Connection, ScanOutcome};
use rego::{repl, Config};

/// rego CLI
#[derive(Parser, Debug)]
#[command(name = "rego-cli")]
#[command(about = "Interactive client for Redis servers")]
#[command(version)]
struct Args {
    /// Server address (host:port)
    #[arg(default_value = "127.0.0.1:6379")]
    server: String,

    /// Write logs to a file instead of stderr
    #[arg(long)]
    log: bool,

    /// Log file used with --log
    #[arg(long, default_value = "client.log")]
    log_file: PathBuf,

    /// Maximum array nesting accepted in replies
    #[arg(long, default_value = "64")]
    max_depth: usize,

    /// Give up waiting for replies after this many milliseconds (0 = never)
    #[arg(long, default_value = "0")]
    read_timeout_ms: u64,

    /// After input ends, wait this long for outstanding replies (0 = until the server closes)
    #[arg(long, default_value = "2000")]
    drain_timeout_ms: u64,
}

fn main() {
    let args = Args::parse();

    let log_file = if args.log { Some(args.log_file.as_path()) } else { None };
    if let Err(e) = rego::logging::init(log_file) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    tracing::info!("rego CLI v{}", rego::VERSION);

    let config = Config::builder()
        .server_addr(&args.server)
        .max_depth(args.max_depth)
        .read_timeout_ms(args.read_timeout_ms)
        .drain_timeout_ms(args.drain_timeout_ms)
        .build();

    let connection = match Connection::connect(&config) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to connect to {}: {}", config.server_addr, e);
            std::process::exit(1);
        }
    };
    tracing::info!("Connected to {}", connection.peer_addr());

    let (decoder, mut writer, cancel) = connection.into_parts();

    // Subscribe to the connection
    let (replies, scanner) = match spawn_scanner(decoder, config.channel_capacity, cancel.token()) {
        Ok(spawned) => spawned,
        Err(e) => {
            tracing::error!("Failed to start scanner: {}", e);
            std::process::exit(1);
        }
    };

    // Write replies to stdout
    let printer = thread::spawn(move || {
        let mut out = BufWriter::new(io::stdout());
        repl::run_printer(replies, &mut out)
    });

    // Read user input until EOF
    let stdin = io::stdin();
    match repl::run_repl(stdin.lock(), &mut writer, &mut io::stdout()) {
        Ok(sent) => tracing::debug!("Input closed after {} commands", sent),
        Err(e) => tracing::error!("REPL error: {}", e),
    }

    if let Err(e) = writer.flush() {
        tracing::warn!("Failed to flush requests: {}", e);
    }

    // Let replies to the last commands arrive before tearing down
    let grace = match config.drain_timeout_ms {
        0 => None,
        ms => Some(Duration::from_millis(ms)),
    };

    let mut exit_code = 0;
    match cancel.drain(scanner, grace) {
        Ok(Ok(ScanOutcome::Closed)) => tracing::info!("Server closed the connection"),
        Ok(Ok(outcome)) => tracing::debug!("Scanner stopped: {:?}", outcome),
        Ok(Err(e)) => {
            tracing::error!("Stream corrupted: {}", e);
            exit_code = 1;
        }
        Err(_) => {
            tracing::error!("Scanner thread panicked");
            exit_code = 1;
        }
    }

    match printer.join() {
        Ok(Ok(printed)) => tracing::debug!("Printed {} replies", printed),
        Ok(Err(e)) => tracing::warn!("Printer error: {}", e),
        Err(_) => tracing::error!("Printer thread panicked"),
    }

    std::process::exit(exit_code);
}
