//! Synthetic trace generation
//!
//! Produces random key traces for load testing the engine. By default keys
//! are drawn uniformly from `[0, max_key)` and written on one line separated
//! by `" , "`; a hot set can be configured to skew traffic towards a small
//! share of the key space.

use anyhow::{ensure, Context};
use hybrid_cache::Key;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::str::FromStr;

/// Layout of the generated file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TraceFormat {
    /// All keys on one line separated by `" , "`
    #[default]
    Delimited,
    /// One key per line
    Lines,
}

impl FromStr for TraceFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "delimited" | "comma" => Ok(TraceFormat::Delimited),
            "lines" | "newline" => Ok(TraceFormat::Lines),
            other => Err(format!("unknown trace format '{other}'")),
        }
    }
}

/// Parameters for generating a random trace
#[derive(Debug, Clone)]
pub struct TraceGeneratorConfig {
    /// Number of keys to generate
    pub count: usize,
    /// Keys are drawn from `[0, max_key)`
    pub max_key: Key,
    /// Percentage of the key space that is "hot" (0 = uniform traffic)
    pub hot_keys_percent: u8,
    /// Percentage of traffic that goes to the hot keys
    pub hot_traffic_percent: u8,
    /// RNG seed; `None` draws one from the OS
    pub seed: Option<u64>,
    /// Output layout
    pub format: TraceFormat,
    /// Output file
    pub output: PathBuf,
}

impl Default for TraceGeneratorConfig {
    fn default() -> Self {
        Self {
            count: 100_000,
            max_key: 1_000_000,
            hot_keys_percent: 0,
            hot_traffic_percent: 80,
            seed: None,
            format: TraceFormat::Delimited,
            output: PathBuf::from("large_input.txt"),
        }
    }
}

/// Generator for random key traces
#[derive(Debug)]
pub struct TraceGenerator {
    config: TraceGeneratorConfig,
}

impl TraceGenerator {
    /// Create a new generator with the given configuration
    pub fn new(config: TraceGeneratorConfig) -> Self {
        Self { config }
    }

    /// Generate the keys in memory
    pub fn keys(&self) -> anyhow::Result<Vec<Key>> {
        let cfg = &self.config;
        ensure!(cfg.max_key > 0, "max_key must be at least 1");
        ensure!(
            cfg.hot_keys_percent <= 100 && cfg.hot_traffic_percent <= 100,
            "percentages must be between 0 and 100"
        );

        let mut rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let hot_keys = (cfg.max_key as f64 * cfg.hot_keys_percent as f64 / 100.0) as Key;
        let hot_probability = cfg.hot_traffic_percent as f64 / 100.0;

        let keys = (0..cfg.count)
            .map(|_| {
                if hot_keys > 0 && rng.gen_bool(hot_probability) {
                    rng.gen_range(0..hot_keys)
                } else {
                    rng.gen_range(0..cfg.max_key)
                }
            })
            .collect();
        Ok(keys)
    }

    /// Writes `keys` in the configured format
    pub fn write_keys<W: Write>(&self, keys: &[Key], out: &mut W) -> std::io::Result<()> {
        let separator = match self.config.format {
            TraceFormat::Delimited => " , ",
            TraceFormat::Lines => "\n",
        };
        for (i, key) in keys.iter().enumerate() {
            if i > 0 {
                out.write_all(separator.as_bytes())?;
            }
            write!(out, "{key}")?;
        }
        writeln!(out)
    }

    /// Generate the trace and write it to the output file. Returns the number
    /// of keys written.
    pub fn generate(&self) -> anyhow::Result<usize> {
        let keys = self.keys()?;
        let path = &self.config.output;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let file =
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        self.write_keys(&keys, &mut writer)
            .and_then(|()| writer.flush())
            .with_context(|| format!("failed to write {}", path.display()))?;

        tracing::info!(
            keys = keys.len(),
            path = %path.display(),
            "trace written"
        );
        Ok(keys.len())
    }
}
