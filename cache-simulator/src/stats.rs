// Statistics reporting and export for trace simulations

use crate::models::{CsvResultRow, TraceFailure, TraceOutcome};
use hybrid_cache::Report;
use std::io::Write;
use std::path::Path;

/// Renders a report as JSON
pub fn render_report(report: &Report, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    }
}

/// Lists the traces a batch could not simulate, one per line
pub fn write_failures<W: Write>(failures: &[TraceFailure], out: &mut W) -> std::io::Result<()> {
    writeln!(out, "Failed traces ({})", failures.len())?;
    for failure in failures {
        writeln!(out, "  {}: {:#}", failure.trace, failure.error)?;
    }
    Ok(())
}

/// Summarises and exports the outcomes of one or more traces
#[derive(Debug)]
pub struct SimulationStats<'a> {
    outcomes: &'a [TraceOutcome],
}

impl<'a> SimulationStats<'a> {
    pub fn new(outcomes: &'a [TraceOutcome]) -> Self {
        Self { outcomes }
    }

    /// CSV rows in trace order
    pub fn rows(&self) -> Vec<CsvResultRow> {
        self.outcomes.iter().map(TraceOutcome::csv_row).collect()
    }

    /// Overall hit rate across every trace, as a percentage
    pub fn overall_hit_rate(&self) -> f64 {
        let (hits, requests) = self.outcomes.iter().fold((0u64, 0u64), |(h, r), o| {
            (h + o.report.hits, r + o.report.requests())
        });
        if requests > 0 {
            hits as f64 / requests as f64 * 100.0
        } else {
            0.0
        }
    }

    /// Writes the summary table
    pub fn write_summary<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "Trace Simulation Summary")?;
        writeln!(out, "========================")?;
        writeln!(
            out,
            "{:<24} {:>9} {:>9} {:>9} {:>9} {:>10} {:>9} {:>9} {:>6} {:>8}",
            "Trace",
            "Keys",
            "Unique",
            "Hits",
            "Misses",
            "Collisions",
            "HitRate",
            "Load",
            "Dim",
            "Rehashes"
        )?;
        writeln!(out, "{}", "-".repeat(110))?;

        for o in self.outcomes {
            let r = &o.report;
            writeln!(
                out,
                "{:<24} {:>9} {:>9} {:>9} {:>9} {:>10} {:>8.2}% {:>9.4} {:>6} {:>8}",
                truncate(&o.trace, 24),
                o.keys,
                o.unique_keys,
                r.hits,
                r.misses,
                r.collisions,
                o.hit_rate(),
                r.load_factor,
                r.dimension,
                r.rehashes
            )?;
        }

        writeln!(out, "{}", "-".repeat(110))?;
        writeln!(
            out,
            "{} trace(s), overall hit rate {:.2}%",
            self.outcomes.len(),
            self.overall_hit_rate()
        )
    }

    /// Print a summary report of the simulation results
    pub fn print_summary(&self) -> std::io::Result<()> {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        self.write_summary(&mut lock)
    }

    /// Export results to a CSV file
    pub fn export_csv(&self, path: &Path) -> Result<(), csv::Error> {
        let mut writer = csv::Writer::from_path(path)?;
        for row in self.rows() {
            writer.serialize(row)?;
        }
        writer.flush()?;
        tracing::info!(
            rows = self.outcomes.len(),
            path = %path.display(),
            "csv export complete"
        );
        Ok(())
    }
}

fn truncate(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        name.to_string()
    } else {
        let kept: String = name.chars().take(width - 1).collect();
        format!("{kept}~")
    }
}
