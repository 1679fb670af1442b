// src/main.rs
use std::path::PathBuf;
use std::process::exit;
use std::time::Instant;
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, error};
use tracing_subscriber::EnvFilter;

use kempner::{Config, KempnerError, ParallelExecutor, RunReport};

#[derive(Parser)]
#[command(name = "kempner")]
#[command(about = "Partial sums of the harmonic series without terms containing the digit 9")]
struct Args {
    #[arg(long, help = "Number of terms")]
    n: Option<u64>,

    #[arg(long, help = "Number of tasks")]
    ntasks: Option<u64>,

    #[arg(short, long, help = "Maximum concurrent workers (defaults to one per CPU)")]
    workers: Option<usize>,

    #[arg(long, help = "Abort after this many seconds")]
    timeout: Option<u64>,

    #[arg(long, short, help = "Path to a TOML configuration file")]
    config: Option<PathBuf>,

    #[arg(long, help = "Write a JSON run report to this path")]
    json: Option<PathBuf>,

    #[arg(long, help = "Print the effective configuration and exit")]
    print_config: bool,

    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args).await {
        let kind = e.downcast_ref::<KempnerError>().map(KempnerError::kind).unwrap_or("Error");
        error!("{}: {:#}", kind, e);
        exit(1);
    }

    Ok(())
}

async fn run(args: Args) -> Result<()> {
    let mut config = Config::load(args.config.as_deref())?;

    // Command-line flags take precedence over every other source
    if let Some(n) = args.n {
        config.run.n = n;
    }
    if let Some(ntasks) = args.ntasks {
        config.run.ntasks = ntasks;
    }
    if let Some(workers) = args.workers {
        config.executor.max_workers = Some(workers);
    }
    if let Some(timeout) = args.timeout {
        config.executor.timeout_seconds = Some(timeout);
    }

    if args.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let intervals = config.run.partition()?;
    let executor = ParallelExecutor::from_config(&config.executor)?;

    let token = executor.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, cancelling remaining intervals");
            token.cancel();
        }
    });

    println!(
        "running with {} tasks on {} workers over {}",
        config.run.ntasks,
        executor.max_workers(),
        intervals
    );

    let start = Instant::now();
    let aggregation = executor.aggregate(intervals.clone()).await?;
    let elapsed = start.elapsed();

    let report = RunReport::new(config.run, executor.max_workers(), intervals, aggregation, elapsed);

    println!("Time in seconds: {}", report.rounded_seconds());
    println!("sum = {}", report.total);

    if let Some(path) = &args.json {
        report.save_json(path).await
            .with_context(|| format!("writing report to {}", path.display()))?;
    }

    Ok(())
}
