use cache_simulator::generator::{TraceFormat, TraceGenerator, TraceGeneratorConfig};
use cache_simulator::logging;
use clap::Parser;
use std::path::PathBuf;

/// Generates random key traces for the cache simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of keys to generate
    #[arg(short = 'n', long, default_value = "100000")]
    count: usize,

    /// Keys are drawn from [0, MAX_KEY)
    #[arg(short, long, default_value = "1000000")]
    max_key: u64,

    /// Percentage of the key space treated as hot (0 = uniform)
    #[arg(long, default_value = "0")]
    hot_keys: u8,

    /// Percentage of traffic sent to hot keys
    #[arg(long, default_value = "80")]
    hot_traffic: u8,

    /// RNG seed for reproducible traces
    #[arg(short, long)]
    seed: Option<u64>,

    /// Output layout: delimited (" , ") or lines
    #[arg(short, long, default_value = "delimited")]
    format: TraceFormat,

    /// Output file
    #[arg(short, long, default_value = "large_input.txt")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    logging::init();
    let args = Args::parse();

    println!("Generating {} keys in [0, {})", args.count, args.max_key);
    if args.hot_keys > 0 {
        println!(
            "{}% of traffic goes to {}% of the keys",
            args.hot_traffic, args.hot_keys
        );
    }

    let config = TraceGeneratorConfig {
        count: args.count,
        max_key: args.max_key,
        hot_keys_percent: args.hot_keys,
        hot_traffic_percent: args.hot_traffic,
        seed: args.seed,
        format: args.format,
        output: args.output,
    };
    let output = config.output.clone();
    let written = TraceGenerator::new(config).generate()?;

    println!("Wrote {written} keys to {}", output.display());
    Ok(())
}
