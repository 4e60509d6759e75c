use bench_report_viewer::display::write_view;
use bench_report_viewer::loader::{collect_inputs, load_report};
use bench_report_viewer::sample::{generate_report, SampleConfig};
use bench_report_viewer::{render, OutputFormat, ViewConfig};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Subcommand, Debug)]
enum Command {
    /// Render benchmark reports as per-family tables.
    Render {
        /// Report file or directory of reports. Can be provided multiple times.
        #[arg(short, long, value_name = "PATH", num_args = 1.., action = clap::ArgAction::Append, required = true)]
        input: Vec<PathBuf>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Generate a deterministic synthetic benchmark report.
    GenerateSample {
        /// Number of fixture families.
        #[arg(long, default_value_t = 4)]
        families: usize,

        /// Random seed for deterministic generation.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Write single-sample fullDuration timings instead of compressed averages.
        #[arg(long, default_value_t = false)]
        raw: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "bench-report-viewer")]
#[command(about = "Normalized duration, per-element time and throughput tables from benchmark reports")]
struct Args {
    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// Where to write the output. If omitted, prints to stdout.
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

fn setup_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn now_utc() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    setup_logging(&args.log_level);

    let mut output = Vec::new();

    match &args.cmd {
        Command::Render { input, format } => {
            let files = collect_inputs(input).map_err(io::Error::other)?;
            let config = ViewConfig::default();

            // One report at a time; a later report never interleaves with an earlier one.
            for (i, path) in files.iter().enumerate() {
                let report = load_report(path).map_err(io::Error::other)?;
                let view = render(&report, &config).map_err(io::Error::other)?;

                if files.len() > 1 && *format == OutputFormat::Table {
                    if i > 0 {
                        writeln!(output)?;
                    }
                    writeln!(output, "==> {} <==", path.display())?;
                }
                write_view(&view, *format, &mut output)?;
                info!(path = %path.display(), "processing finished");
            }
        }
        Command::GenerateSample {
            families,
            seed,
            raw,
        } => {
            let config = SampleConfig {
                families: *families,
                seed: *seed,
                raw: *raw,
                time: now_utc(),
            };
            let report = generate_report(&config);
            serde_json::to_writer_pretty(&mut output, &report).map_err(io::Error::other)?;
            writeln!(output)?;
        }
    }

    if let Some(out) = args.out {
        fs::write(out, output)?;
    } else {
        io::stdout().write_all(&output)?;
    }

    Ok(())
}
