use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use vpcgraph::{OutputOptions, SourceOptions, VpcgraphOptions, run_main};

#[derive(Parser, Debug)]
#[command(
    name = "vpcgraph",
    about = "vpcgraph: draw the network topology of an AWS account",
    version
)]
pub struct Cli {
    /// Output file (HTML unless --format or the extension says otherwise)
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    #[command(flatten)]
    source: SourceOptions,

    #[command(flatten)]
    render: OutputOptions,
}

pub fn run(args: Cli) -> ExitCode {
    let total_start = Instant::now();

    // Warnings (skipped records, missing categories) show by default;
    // RUST_LOG replaces the filter.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    let opts = VpcgraphOptions {
        output: args.output,
        source: args.source,
        render: args.render,
    };

    let code = match run_main(&opts) {
        Ok(summary) => {
            if summary.skipped > 0 {
                eprintln!("Skipped {} malformed record(s)", summary.skipped);
            }
            println!("Graph visualization saved to {}", summary.output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    };

    let total_secs = total_start.elapsed().as_secs_f64();
    tracing::info!(total_secs, "complete");
    code
}

fn main() -> ExitCode {
    let args = Cli::parse();
    run(args)
}
