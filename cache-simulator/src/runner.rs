//! Simulation runner
//!
//! Feeds traces to the hybrid-cache engine. A single trace runs on the
//! calling thread; a batch spreads trace files over a fixed number of worker
//! threads. Every trace gets its own engine instance, so workers share
//! nothing but the list of files still to process.
//!
//! Batch runs only report counters, so per-access snapshots are never
//! recorded for them.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Instant;

use ahash::AHashSet;
use anyhow::{bail, Context};
use hybrid_cache::{EngineConfig, Key, TraceRunner};

use crate::input::{self, TraceReader};
use crate::models::{BatchResult, SimulationConfig, TraceFailure, TraceOutcome, TraceSource};

/// What a simulation produced
#[derive(Debug)]
pub enum SimulationOutput {
    /// A single trace (file or inline keys)
    Single(TraceOutcome),
    /// A directory of traces
    Batch(BatchResult),
}

/// Runner for trace simulations
#[derive(Debug)]
pub struct SimulationRunner {
    config: SimulationConfig,
}

impl SimulationRunner {
    /// Create a new simulation runner
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Run the configured source to completion.
    ///
    /// A failing trace aborts the run unless `keep_going` is set, in which
    /// case batch failures are returned next to the successful outcomes.
    pub fn run(&self) -> anyhow::Result<SimulationOutput> {
        self.config
            .engine
            .validate()
            .context("invalid engine configuration")?;

        match &self.config.source {
            TraceSource::Inline(keys) => {
                let outcome = simulate_keys("inline", keys, self.config.engine)?;
                Ok(SimulationOutput::Single(outcome))
            }
            TraceSource::File(path) => {
                let outcome = simulate_file(path, self.config.engine)?;
                Ok(SimulationOutput::Single(outcome))
            }
            TraceSource::Directory { dir, pattern } => {
                let files = TraceReader::new(dir)
                    .with_pattern(pattern.clone())
                    .get_trace_files()?;
                if files.is_empty() {
                    bail!("no trace files found in {}", self.config.source);
                }
                let engine = EngineConfig {
                    record_steps: false,
                    ..self.config.engine
                };
                let mut batch = run_batch(&files, engine, self.config.thread_count);
                if !self.config.keep_going && !batch.failures.is_empty() {
                    let first = batch.failures.remove(0);
                    return Err(first.error);
                }
                Ok(SimulationOutput::Batch(batch))
            }
        }
    }
}

/// Simulates one in-memory trace.
pub fn simulate_keys(name: &str, keys: &[Key], engine: EngineConfig) -> anyhow::Result<TraceOutcome> {
    let start = Instant::now();
    let report = TraceRunner::new(engine)
        .run(keys)
        .with_context(|| format!("simulation of {name} failed"))?;
    let duration = start.elapsed();

    let unique_keys = keys.iter().collect::<AHashSet<_>>().len();
    Ok(TraceOutcome {
        trace: name.to_string(),
        keys: keys.len(),
        unique_keys,
        report,
        duration,
    })
}

/// Reads and simulates one trace file.
pub fn simulate_file(path: &Path, engine: EngineConfig) -> anyhow::Result<TraceOutcome> {
    let keys = input::read_trace_file(path)
        .with_context(|| format!("trace {}", path.display()))?;
    simulate_keys(&trace_name(path), &keys, engine)
}

fn trace_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Simulates every file on `threads` worker threads.
///
/// Outcomes and failures both come back in the order of `files`. A failing
/// file never stops the others.
pub fn run_batch(files: &[PathBuf], engine: EngineConfig, threads: usize) -> BatchResult {
    let start = Instant::now();
    let workers = threads.clamp(1, files.len().max(1));
    let next = AtomicUsize::new(0);

    tracing::info!(files = files.len(), workers, "batch simulation: start");

    let mut results: Vec<(usize, anyhow::Result<TraceOutcome>)> = thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                scope.spawn(|| {
                    let mut done = Vec::new();
                    loop {
                        let index = next.fetch_add(1, Ordering::Relaxed);
                        let Some(path) = files.get(index) else {
                            break;
                        };
                        let outcome = simulate_file(path, engine);
                        match &outcome {
                            Ok(o) => tracing::info!(
                                trace = %o.trace,
                                keys = o.keys,
                                hits = o.report.hits,
                                misses = o.report.misses,
                                "batch simulation: trace done"
                            ),
                            Err(err) => tracing::warn!(
                                path = %path.display(),
                                error = %format!("{err:#}"),
                                "batch simulation: trace failed"
                            ),
                        }
                        done.push((index, outcome));
                    }
                    done
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|h| match h.join() {
                Ok(done) => done,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    });

    results.sort_by_key(|(index, _)| *index);
    let mut outcomes = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (index, result) in results {
        match result {
            Ok(outcome) => outcomes.push(outcome),
            Err(error) => failures.push(TraceFailure {
                trace: trace_name(&files[index]),
                error,
            }),
        }
    }

    let duration = start.elapsed();
    tracing::info!(
        succeeded = outcomes.len(),
        failed = failures.len(),
        elapsed_ms = duration.as_millis() as u64,
        "batch simulation: finished"
    );
    BatchResult {
        outcomes,
        failures,
        duration,
    }
}
