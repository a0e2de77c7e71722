// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  accesslog — structured access log for HTTP / WebSocket events
//
//  Input:   newline-delimited action notifications (file or stdin)
//  Output:  one JSON record per recognized event (file or stdout)
//  Config:  optional YAML file + ACCESSLOG_ env overrides
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

mod replay;

use accesslog_core::config::{Config, LogTimeZone};
use accesslog_observability::destination::Destination;
use accesslog_observability::generator::AccessLogGenerator;
use accesslog_observability::writer::RecordWriter;
use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "accesslog", version, about = "Structured access log for HTTP and WebSocket events")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "accesslog.yaml")]
    config: PathBuf,

    /// Diagnostic log level (diagnostics go to stderr)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Access log destination: '-' for stdout or a file path (overrides config)
    #[arg(long)]
    access_log: Option<String>,

    /// Timestamp time zone: 'local' or 'utc' (overrides config)
    #[arg(long)]
    time_zone: Option<LogTimeZone>,

    /// Notifications to replay: '-' for stdin or a file path
    #[arg(default_value = "-")]
    input: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // ── Tracing ──
    // stderr keeps diagnostics out of an access log written to stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    // ── Config ──
    // A missing file still goes through figment so ACCESSLOG_ env overrides apply.
    if cli.config.exists() {
        info!(path = %cli.config.display(), "Loading config file");
    } else {
        info!("No config file found, using defaults and environment");
    }
    let mut config = Config::load(&cli.config)?;
    if let Some(output) = cli.access_log {
        config.access_log.output = output;
    }
    if let Some(time_zone) = cli.time_zone {
        config.access_log.time_zone = time_zone;
    }

    // ── Destination ──
    let destination = Destination::parse(&config.access_log.output);
    let stream = destination.open()?;
    let generator = AccessLogGenerator::new(RecordWriter::from_config(stream, &config.access_log));
    info!(
        destination = %destination,
        time_zone = ?config.access_log.time_zone,
        "Access log ready"
    );

    // ── Replay ──
    let input: Box<dyn BufRead> = if cli.input == "-" {
        Box::new(io::stdin().lock())
    } else {
        Box::new(BufReader::new(File::open(&cli.input)?))
    };
    let stats = replay::replay(input, &generator)?;

    info!(
        written = stats.written,
        ignored = stats.ignored,
        rejected = stats.rejected,
        "Replay finished"
    );
    Ok(())
}
