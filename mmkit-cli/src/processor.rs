//! Command execution against a library snapshot

use crate::error::CliError;
use crate::format::{self, CompressReport, StatsRow};
use crate::{Args, Verbosity};
use mmkit_core::{Assertion, LabTok, Library, LibraryImpl, Proof};
use mmkit_proof::{
    CompressionStrategy, LibraryVerifier, ProgressCallback, ProofExecutor, StatsTotals,
    VerifyConfig, VerifyProgress, collect_stats, format_proof,
};
use std::path::Path;
use tracing::info;

/// Load and check a snapshot
fn load_library(path: &Path) -> Result<LibraryImpl, CliError> {
    let lib = LibraryImpl::load(path)?;
    info!(
        path = %path.display(),
        labels = lib.labels_num(),
        symbols = lib.symbols_num(),
        "library loaded"
    );
    Ok(lib)
}

fn resolve(lib: &LibraryImpl, name: &str) -> Result<LabTok, CliError> {
    lib.label(name)
        .ok_or_else(|| CliError::UnknownLabel(name.to_string()))
}

fn theorem<'a>(lib: &'a LibraryImpl, name: &str) -> Result<&'a Assertion, CliError> {
    let label = resolve(lib, name)?;
    lib.assertion_of(label)
        .filter(|ass| ass.is_theorem())
        .ok_or_else(|| CliError::NotATheorem(name.to_string()))
}

/// Verify all or selected theorems
pub fn run_verify(
    args: &Args,
    snapshot: &Path,
    names: &[String],
    config: VerifyConfig,
) -> Result<bool, CliError> {
    let lib = load_library(snapshot)?;
    let verifier = LibraryVerifier::new(&lib, config);
    let summary = if names.is_empty() {
        let callback = (args.verbosity >= Verbosity::Verbose).then(|| {
            Box::new(|p: VerifyProgress| {
                eprintln!(
                    "[{}/{}] {} failed, {:.1}s",
                    p.completed,
                    p.total,
                    p.failed,
                    p.elapsed.as_secs_f64()
                );
            }) as ProgressCallback
        });
        verifier.verify_all_with_progress(callback)?
    } else {
        let labels = names
            .iter()
            .map(|name| theorem(&lib, name).map(Assertion::thesis))
            .collect::<Result<Vec<_>, _>>()?;
        verifier.verify_labels(&labels)?
    };
    format::print_summary(args, &summary)?;
    Ok(summary.all_verified())
}

/// Print the compressed form of one proof
pub fn run_compress(
    args: &Args,
    snapshot: &Path,
    name: &str,
    strategy: CompressionStrategy,
    config: &VerifyConfig,
) -> Result<bool, CliError> {
    let lib = load_library(snapshot)?;
    let assertion = theorem(&lib, name)?;
    let executor = ProofExecutor::for_assertion(&lib, assertion)?
        .with_max_labels(config.max_decompression_size);
    let compressed = executor.compress(strategy)?;
    let report = CompressReport {
        label: name.to_string(),
        strategy: strategy.as_str(),
        refs: compressed.refs().len(),
        codes: compressed.codes().len(),
        saved_steps: compressed.saved_steps(),
        proof: format_proof(&lib, &Proof::from(compressed)),
    };
    format::print_compress(args, &report)?;
    Ok(true)
}

/// Print the uncompressed form of one proof
pub fn run_decompress(
    args: &Args,
    snapshot: &Path,
    name: &str,
    config: &VerifyConfig,
) -> Result<bool, CliError> {
    let lib = load_library(snapshot)?;
    let assertion = theorem(&lib, name)?;
    let executor = ProofExecutor::for_assertion(&lib, assertion)?
        .with_max_labels(config.max_decompression_size);
    let uncompressed = executor.uncompress()?;
    let steps = uncompressed.len();
    let text = format_proof(&lib, &Proof::from(uncompressed));
    format::print_decompress(args, name, steps, &text)?;
    Ok(true)
}

/// Print size statistics of every proof
pub fn run_stats(
    args: &Args,
    snapshot: &Path,
    strategy: CompressionStrategy,
    config: &VerifyConfig,
) -> Result<bool, CliError> {
    let lib = load_library(snapshot)?;
    let results = collect_stats(&lib, strategy, config);
    let totals = StatsTotals::from_results(&results);
    let rows: Vec<StatsRow> = results
        .into_iter()
        .map(|(label, result)| match result {
            Ok(stats) => StatsRow {
                label,
                stats: Some(stats),
                error: None,
            },
            Err(e) => StatsRow {
                label,
                stats: None,
                error: Some(e.to_string()),
            },
        })
        .collect();
    format::print_stats(args, strategy, &rows, &totals)?;
    Ok(totals.errors == 0)
}
