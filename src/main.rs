//! # Butterfly-closure CLI
//!
//! Command-line interface for the butterfly-closure library.
//! Runs the recursive blocked relaxation on matrix files or on random graphs.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use butterfly_closure::{io, DistMatrix};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{BenchReport, EngineArgs, LatencySummary, ProgressManager, Weight};

/// Command-line interface for butterfly-closure
#[derive(Parser)]
#[command(name = "butterfly-closure")]
#[command(about = "Cache-oblivious recursive blocked triangular relaxation")]
#[command(long_about = "Evaluates M[i][j] = relax(M[i][j], M[i][k], M[k][j]) for every k < min(i, j)
with a recursive, cache-oblivious, rayon-parallel schedule:
  butterfly-closure solve graph.txt -o closed.txt     # Relax a matrix file
  butterfly-closure solve graph.txt --verify          # Cross-check with the triple loop
  butterfly-closure bench --n 1024 --runs 10          # Time random instances

Matrix files: first line N, then N rows of N values; '-', 'x' or 'inf' mean undefined.
Environment: BUTTERFLY_BLOCK, BUTTERFLY_PARALLEL_CUTOFF, BUTTERFLY_THREADS, RUST_LOG")]
#[command(version = env!("BUTTERFLY_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Relax a matrix file and write the result
    Solve {
        /// Input matrix file
        input: PathBuf,

        /// Output file, or "-" for stdout (default)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        engine: EngineArgs,

        /// Cross-check the result against the plain triple loop
        #[arg(long)]
        verify: bool,
    },
    /// Time the engine on a random graph
    Bench {
        /// Number of nodes
        #[arg(short, long, default_value = "512")]
        n: usize,

        /// Edge probability
        #[arg(long, default_value = "0.1")]
        density: f64,

        /// Largest edge weight
        #[arg(long, default_value = "100")]
        max_weight: u32,

        /// Random seed for reproducibility
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Number of timed runs
        #[arg(long, default_value = "5")]
        runs: usize,

        #[command(flatten)]
        engine: EngineArgs,

        /// Cross-check the first run against the plain triple loop
        #[arg(long)]
        verify: bool,

        /// Print the report as JSON on stdout
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: bool, json: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json);

    if let Err(e) = run(cli) {
        error!("❌ Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.verbose {
        eprintln!("🦋 Butterfly-closure v{} starting...", env!("BUTTERFLY_VERSION"));
    }

    match cli.command {
        Commands::Solve {
            input,
            output,
            engine,
            verify,
        } => solve(&input, output.as_deref(), &engine, verify),
        Commands::Bench {
            n,
            density,
            max_weight,
            seed,
            runs,
            engine,
            verify,
            json,
        } => bench(n, density, max_weight, seed, runs, &engine, verify, json),
    }
}

fn solve(input: &Path, output: Option<&Path>, args: &EngineArgs, verify: bool) -> Result<()> {
    let original: DistMatrix<Weight> = io::load_matrix(input)
        .with_context(|| format!("Failed to read matrix from {}", input.display()))?;
    let engine = args.build()?;

    let mut matrix = original.clone();
    let summary = engine.run(&mut matrix);
    info!(
        dim = summary.dim,
        block = summary.block,
        executor = summary.executor,
        base_cases = summary.base_cases.total(),
        elapsed_ms = summary.elapsed_ms,
        "relaxation finished"
    );

    if verify {
        cli::verify(&engine, &original, &matrix)?;
        info!("verified against reference");
    }

    match output {
        Some(path) if path != Path::new("-") => {
            io::save_matrix(&matrix, path)
                .with_context(|| format!("Failed to write matrix to {}", path.display()))?;
            eprintln!("📁 Saved to: {}", path.display());
        }
        _ => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            io::write_matrix(&matrix, &mut lock)?;
            lock.flush()?;
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn bench(
    n: usize,
    density: f64,
    max_weight: u32,
    seed: u64,
    runs: usize,
    args: &EngineArgs,
    verify: bool,
    json: bool,
) -> Result<()> {
    if runs == 0 {
        anyhow::bail!("--runs must be at least 1");
    }
    let engine = args.build()?;
    let original: DistMatrix<Weight> =
        butterfly_closure::generate::random_graph(n, density, max_weight, seed)?;

    let progress = if json {
        ProgressManager::hidden(runs as u64)
    } else {
        ProgressManager::new(runs as u64, &format!("⏱️  Benchmarking n={n} over {runs} runs"))
    };

    let mut hist = cli::report::latency_histogram()?;
    let mut last = None;
    let mut verification = None;
    for run in 0..runs {
        let mut matrix = original.clone();
        let summary = engine.run(&mut matrix);
        hist.saturating_record((summary.elapsed_ms * 1000.0).round().max(1.0) as u64);

        if verify && run == 0 {
            verification = Some(cli::verify(&engine, &original, &matrix));
        }
        last = Some(summary);
        progress.tick();
    }
    progress.finish("✅ Benchmark completed!");

    let last = last.context("no benchmark run completed")?;
    let report = BenchReport {
        n,
        density,
        seed,
        recurrence: args.recurrence,
        executor: last.executor,
        config: engine.config().clone(),
        base_cases: last.base_cases,
        latency: LatencySummary::from_micros(&hist),
        verified: None,
        mismatch: None,
    }
    .with_verification(verification.as_ref());

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print();
    }

    match verification {
        Some(Err(e)) => Err(e.context("Engine result differs from the reference triple loop")),
        _ => Ok(()),
    }
}
