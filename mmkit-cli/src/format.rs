//! Output formatting for mmkit CLI

use crate::error::CliError;
use crate::{Args, OutputFormat, Verbosity};
use mmkit_proof::{
    CompressionStrategy, ProofStats, StatsTotals, VerificationStatus, VerificationSummary,
};
use serde::Serialize;

/// Result of the compress command
#[derive(Debug, Clone, Serialize)]
pub struct CompressReport {
    /// Theorem label
    pub label: String,
    /// Strategy used
    pub strategy: &'static str,
    /// Number of explicit references
    pub refs: usize,
    /// Number of codes, save markers included
    pub codes: usize,
    /// Number of saved steps
    pub saved_steps: usize,
    /// Proof text
    pub proof: String,
}

/// One line of the stats command
#[derive(Debug, Clone, Serialize)]
pub struct StatsRow {
    /// Theorem label
    pub label: String,
    /// Measured sizes
    pub stats: Option<ProofStats>,
    /// Why the proof could not be measured
    pub error: Option<String>,
}

#[derive(Serialize)]
struct StatsOutput<'a> {
    strategy: &'static str,
    totals: &'a StatsTotals,
    proofs: &'a [StatsRow],
}

#[derive(Serialize)]
struct DecompressOutput<'a> {
    label: &'a str,
    steps: usize,
    proof: &'a str,
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a verification summary
pub fn print_summary(args: &Args, summary: &VerificationSummary) -> Result<(), CliError> {
    if args.format == OutputFormat::Json {
        return print_json(summary);
    }

    for report in summary.failures() {
        println!(
            "FAILED {}: {}",
            report.label,
            report.error.as_deref().unwrap_or("unknown error")
        );
    }
    if args.verbosity >= Verbosity::Verbose {
        for report in &summary.reports {
            if report.status != VerificationStatus::Failed {
                println!(
                    "{} {} ({} steps, {:.3}ms)",
                    report.status.as_str(),
                    report.label,
                    report.steps,
                    report.elapsed.as_secs_f64() * 1000.0
                );
            }
        }
    }
    if args.verbosity > Verbosity::Quiet {
        println!(
            "{} theorems: {} verified, {} failed, {} skipped in {:.3}s",
            summary.total,
            summary.verified,
            summary.failed,
            summary.skipped,
            summary.elapsed.as_secs_f64()
        );
    }
    Ok(())
}

/// Print a compressed proof
pub fn print_compress(args: &Args, report: &CompressReport) -> Result<(), CliError> {
    if args.format == OutputFormat::Json {
        return print_json(report);
    }
    if args.verbosity >= Verbosity::Verbose {
        println!(
            "{}: {} refs, {} codes, {} saved steps ({})",
            report.label, report.refs, report.codes, report.saved_steps, report.strategy
        );
    }
    println!("{}", report.proof);
    Ok(())
}

/// Print an uncompressed proof
pub fn print_decompress(
    args: &Args,
    label: &str,
    steps: usize,
    proof: &str,
) -> Result<(), CliError> {
    if args.format == OutputFormat::Json {
        return print_json(&DecompressOutput { label, steps, proof });
    }
    if args.verbosity >= Verbosity::Verbose {
        println!("{}: {} steps", label, steps);
    }
    println!("{}", proof);
    Ok(())
}

/// Print proof size statistics
pub fn print_stats(
    args: &Args,
    strategy: CompressionStrategy,
    rows: &[StatsRow],
    totals: &StatsTotals,
) -> Result<(), CliError> {
    if args.format == OutputFormat::Json {
        return print_json(&StatsOutput {
            strategy: strategy.as_str(),
            totals,
            proofs: rows,
        });
    }

    let width = rows.iter().map(|r| r.label.len()).max().unwrap_or(5).max(5);
    println!(
        "{:<width$} {:>8} {:>8} {:>6} {:>8} {:>6}",
        "label", "steps", "codes", "saved", "letters", "ratio"
    );
    for row in rows {
        match (&row.stats, &row.error) {
            (Some(stats), _) => println!(
                "{:<width$} {:>8} {:>8} {:>6} {:>8} {:>6.2}",
                row.label,
                stats.steps,
                stats.codes,
                stats.saved_steps,
                stats.letters,
                stats.compression_ratio()
            ),
            (None, error) => println!(
                "{:<width$} error: {}",
                row.label,
                error.as_deref().unwrap_or("unknown error")
            ),
        }
    }
    if args.verbosity > Verbosity::Quiet {
        println!(
            "{} proofs ({} errors, {} trivial): {} steps, {} codes, {} letters",
            totals.proofs, totals.errors, totals.trivial, totals.steps, totals.codes, totals.letters
        );
    }
    Ok(())
}
