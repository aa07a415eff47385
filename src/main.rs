//! ftp-walker - Resilient Recursive FTP Directory Walker
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use ftp_walker::config::{CliArgs, WalkConfig};
use ftp_walker::error::ConfigError;
use ftp_walker::ftp::{Connection, FtpDialer};
use ftp_walker::progress::{print_header, print_item, print_summary};
use ftp_walker::walker::Crawl;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse();

    setup_logging(args.verbose)?;

    let password = read_password(&args.username, &args.host)?;

    let config = WalkConfig::from_args(args, password).context("Invalid configuration")?;

    if config.show_report {
        print_header(&config.host, &config.username, &config.start_path);
    }

    // Setup signal handler: the crawl iterator is abandoned on interrupt and
    // its Drop releases the connection.
    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupt received, stopping walk...");
        flag.store(true, Ordering::SeqCst);
    })
    .context("Failed to set signal handler")?;

    let start = Instant::now();

    let dialer = FtpDialer::new(
        config.host.clone(),
        config.port,
        config.username.clone(),
        config.password.clone(),
        config.timeout,
    );
    let conn = Connection::connect(dialer, config.retry.clone())
        .with_context(|| format!("Failed to connect to {}", config.host))?;

    let crawl = Crawl::new(conn, &config.start_path).context("Failed to start walk")?;
    info!(strategy = %crawl.strategy(), "walk started");

    let mut files = 0u64;
    let mut directories = 0u64;

    for path in crawl {
        if interrupted.load(Ordering::SeqCst) {
            break;
        }

        if path.ends_with('/') {
            directories += 1;
        } else {
            files += 1;
        }

        if config.show_report {
            print_item(&path);
        } else {
            println!("{path}");
        }
    }

    if config.show_report {
        print_summary(
            files,
            directories,
            start.elapsed(),
            interrupted.load(Ordering::SeqCst),
        );
    }

    Ok(())
}

/// Read the password from FTP_PASSWORD, or prompt for it.
fn read_password(username: &str, host: &str) -> Result<String> {
    if let Ok(password) = std::env::var("FTP_PASSWORD") {
        return Ok(password);
    }

    let password = rpassword::prompt_password(format!("Password for {username}@{host}: "))
        .map_err(|_| ConfigError::MissingPassword)?;
    Ok(password)
}

fn setup_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("ftp_walker=debug,warn")
    } else {
        EnvFilter::new("ftp_walker=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}
