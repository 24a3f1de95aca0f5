use anyhow::Context;
use cache_simulator::config;
use cache_simulator::generator::{TraceFormat, TraceGenerator, TraceGeneratorConfig};
use cache_simulator::input;
use cache_simulator::logging;
use cache_simulator::models::{EngineOverrides, SimulationConfig, TraceOutcome, TraceSource};
use cache_simulator::runner::{SimulationOutput, SimulationRunner};
use cache_simulator::stats::{self, SimulationStats};
use clap::{Args, Parser, Subcommand};
use hybrid_cache::{EngineConfig, HashScheme};
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Hybrid hash table cache simulator CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Subcommands for the CLI
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a trace (or a directory of traces) through the engine
    Simulate(SimulateArgs),

    /// Generate a random key trace
    Generate(GenerateArgs),
}

/// Exactly one trace source
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct SourceArgs {
    /// Trace file to simulate
    #[arg(short, long, value_name = "FILE")]
    trace: Option<PathBuf>,

    /// Keys given inline, e.g. "1,5,1,9,2"
    #[arg(short, long, value_name = "LIST")]
    keys: Option<String>,

    /// Directory of trace files to simulate as a batch
    #[arg(short, long, value_name = "DIR")]
    input_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SimulateArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Glob pattern selecting files inside --input-dir (default: *.txt, *.csv, *.log)
    #[arg(long, value_name = "GLOB", requires = "input_dir")]
    pattern: Option<String>,

    /// JSON engine configuration file; flags below override its fields
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Initial grid side length
    #[arg(long)]
    initial_dimension: Option<NonZeroUsize>,

    /// Load factor that triggers a rebuild, in (0, 1]
    #[arg(long)]
    threshold: Option<f64>,

    /// Quadratic probes before double hashing
    #[arg(long)]
    max_quadratic_probes: Option<usize>,

    /// Double-hashing probes before chaining
    #[arg(long)]
    max_double_probes: Option<usize>,

    /// Hash scheme: mix or modulo
    #[arg(long, value_name = "SCHEME")]
    hash: Option<HashScheme>,

    /// Leave per-access snapshots out of the report
    #[arg(long)]
    no_steps: bool,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,

    /// Record failing trace files in a batch and keep simulating the rest
    #[arg(long, requires = "input_dir")]
    keep_going: bool,

    /// Worker threads for batch runs (default: available parallelism)
    #[arg(long)]
    threads: Option<usize>,

    /// Export results to CSV file
    #[arg(long, value_name = "PATH")]
    output_csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Number of keys to generate
    #[arg(short = 'n', long, default_value = "100000")]
    count: usize,

    /// Keys are drawn from [0, MAX_KEY)
    #[arg(long, default_value = "1000000")]
    max_key: u64,

    /// Percentage of the key space treated as hot (0 = uniform)
    #[arg(long, default_value = "0")]
    hot_keys: u8,

    /// Percentage of traffic sent to hot keys
    #[arg(long, default_value = "80")]
    hot_traffic: u8,

    /// RNG seed for reproducible traces
    #[arg(long)]
    seed: Option<u64>,

    /// Output layout: delimited (" , ") or lines
    #[arg(long, default_value = "delimited")]
    format: TraceFormat,

    /// Output file
    #[arg(short, long, default_value = "large_input.txt")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    logging::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate(args) => simulate(args),
        Commands::Generate(args) => generate(args),
    }
}

fn generate(args: GenerateArgs) -> anyhow::Result<()> {
    let config = TraceGeneratorConfig {
        count: args.count,
        max_key: args.max_key,
        hot_keys_percent: args.hot_keys,
        hot_traffic_percent: args.hot_traffic,
        seed: args.seed,
        format: args.format,
        output: args.output,
    };
    let path = config.output.clone();
    let written = TraceGenerator::new(config).generate()?;
    eprintln!("Wrote {written} keys to {}", path.display());
    Ok(())
}

fn simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let base = match &args.config {
        Some(path) => config::load_engine_config(path)?,
        None => EngineConfig::default(),
    };
    let overrides = EngineOverrides {
        initial_dimension: args.initial_dimension,
        load_factor_threshold: args.threshold,
        max_quadratic_probes: args.max_quadratic_probes,
        max_double_probes: args.max_double_probes,
        hash_scheme: args.hash,
        no_steps: args.no_steps,
    };
    let engine = overrides.apply(base);

    let source = match (args.source.trace, args.source.keys, args.source.input_dir) {
        (Some(path), _, _) => TraceSource::File(path),
        (_, Some(list), _) => {
            TraceSource::Inline(input::parse_trace_str(&list).context("invalid --keys list")?)
        }
        (_, _, Some(dir)) => TraceSource::Directory {
            dir,
            pattern: args.pattern,
        },
        (None, None, None) => anyhow::bail!("one of --trace, --keys or --input-dir is required"),
    };

    let thread_count = args.threads.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1)
    });

    tracing::debug!(source = %source, ?engine, thread_count, "simulation configured");

    let runner = SimulationRunner::new(SimulationConfig {
        engine,
        source,
        thread_count,
        keep_going: args.keep_going,
    });

    match runner.run()? {
        SimulationOutput::Single(outcome) => {
            let json = stats::render_report(&outcome.report, args.pretty)
                .context("failed to serialize report")?;
            println!("{json}");
            export(std::slice::from_ref(&outcome), args.output_csv)
        }
        SimulationOutput::Batch(batch) => {
            let stats = SimulationStats::new(&batch.outcomes);
            stats.print_summary().context("failed to write summary")?;
            println!(
                "\n{} keys simulated in {:.2?}",
                batch.total_keys(),
                batch.duration
            );
            export(&batch.outcomes, args.output_csv)?;
            if !batch.failures.is_empty() {
                stats::write_failures(&batch.failures, &mut std::io::stderr().lock())
                    .context("failed to write failure report")?;
                anyhow::bail!("{} trace(s) failed", batch.failures.len());
            }
            Ok(())
        }
    }
}

fn export(outcomes: &[TraceOutcome], output_csv: Option<PathBuf>) -> anyhow::Result<()> {
    if let Some(path) = output_csv {
        SimulationStats::new(outcomes)
            .export_csv(&path)
            .with_context(|| format!("failed to export CSV to {}", path.display()))?;
        eprintln!("Results exported to: {}", path.display());
    }
    Ok(())
}
