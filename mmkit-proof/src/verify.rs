//! Parallel verification of every theorem in a library
//!
//! Each theorem gets its own executor and engine; workers only share
//! read access to the library.

use crate::config::VerifyConfig;
use crate::error::{ProofError, VerifyError};
use crate::executor::ProofExecutor;
use mmkit_core::{LabTok, Library};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Outcome of checking one theorem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// The proof derives the theorem
    Verified,
    /// The proof was rejected
    Failed,
    /// The theorem has no proof
    Skipped,
}

impl VerificationStatus {
    /// Short name for reports
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

/// Result of checking one theorem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Theorem label
    pub label: String,
    /// Outcome
    pub status: VerificationStatus,
    /// Whether the proof is stored compressed
    pub compressed: bool,
    /// Number of executed proof steps
    pub steps: usize,
    /// Error kind, when the proof was rejected
    pub error_kind: Option<String>,
    /// Error message, when the proof was rejected
    pub error: Option<String>,
    /// Time spent on this theorem
    pub elapsed: Duration,
}

/// Result of checking a set of theorems
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationSummary {
    /// Number of theorems checked
    pub total: usize,
    /// Number of accepted proofs
    pub verified: usize,
    /// Number of rejected proofs
    pub failed: usize,
    /// Number of theorems without a proof
    pub skipped: usize,
    /// Wall clock time
    pub elapsed: Duration,
    /// Per theorem reports, in declaration order
    pub reports: Vec<VerificationReport>,
}

impl VerificationSummary {
    fn from_reports(reports: Vec<VerificationReport>, elapsed: Duration) -> Self {
        let count = |status| reports.iter().filter(|r| r.status == status).count();
        Self {
            total: reports.len(),
            verified: count(VerificationStatus::Verified),
            failed: count(VerificationStatus::Failed),
            skipped: count(VerificationStatus::Skipped),
            elapsed,
            reports,
        }
    }

    /// Check whether no proof was rejected
    #[must_use]
    pub fn all_verified(&self) -> bool {
        self.failed == 0
    }

    /// Reports of rejected proofs
    pub fn failures(&self) -> impl Iterator<Item = &VerificationReport> {
        self.reports
            .iter()
            .filter(|r| r.status == VerificationStatus::Failed)
    }
}

/// Progress information during bulk verification
#[derive(Debug, Clone)]
pub struct VerifyProgress {
    /// Number of theorems to check
    pub total: usize,
    /// Number of theorems checked so far
    pub completed: usize,
    /// Number of rejected proofs so far
    pub failed: usize,
    /// Elapsed time
    pub elapsed: Duration,
}

/// Callback type for progress updates
pub type ProgressCallback = Box<dyn Fn(VerifyProgress) + Send + Sync>;

/// Verifies theorems of a library in parallel
pub struct LibraryVerifier<'a, L: Library + Sync + ?Sized> {
    lib: &'a L,
    config: VerifyConfig,
}

impl<'a, L: Library + Sync + ?Sized> LibraryVerifier<'a, L> {
    /// Create a verifier with the given configuration
    #[must_use]
    pub fn new(lib: &'a L, config: VerifyConfig) -> Self {
        Self { lib, config }
    }

    /// Get the configuration
    #[must_use]
    pub fn config(&self) -> &VerifyConfig {
        &self.config
    }

    /// Check one theorem
    #[must_use]
    pub fn verify_label(&self, label: LabTok) -> VerificationReport {
        let start = Instant::now();
        let name = self.lib.resolve_label(label).to_string();
        let Some(assertion) = self.lib.assertion_of(label) else {
            let err = ProofError::MissingProof(name.clone());
            return self.failed_report(name, false, &err, start);
        };
        let executor = match ProofExecutor::for_assertion(self.lib, assertion) {
            Ok(executor) => executor
                .with_max_labels(self.config.max_decompression_size)
                .with_proof_tree(self.config.gen_proof_tree),
            Err(_) => {
                debug!(theorem = %name, "no proof, skipped");
                return VerificationReport {
                    label: name,
                    status: VerificationStatus::Skipped,
                    compressed: false,
                    steps: 0,
                    error_kind: None,
                    error: None,
                    elapsed: start.elapsed(),
                };
            }
        };
        let compressed = executor.proof().is_compressed();
        match executor.run() {
            Ok(outcome) => VerificationReport {
                label: name,
                status: VerificationStatus::Verified,
                compressed,
                steps: outcome.proof_labels.len(),
                error_kind: None,
                error: None,
                elapsed: start.elapsed(),
            },
            Err(err) => {
                warn!(theorem = %name, error = %err, "proof rejected");
                self.failed_report(name, compressed, &err, start)
            }
        }
    }

    fn failed_report(
        &self,
        label: String,
        compressed: bool,
        err: &ProofError,
        start: Instant,
    ) -> VerificationReport {
        VerificationReport {
            label,
            status: VerificationStatus::Failed,
            compressed,
            steps: 0,
            error_kind: Some(err.kind().to_string()),
            error: Some(err.to_string()),
            elapsed: start.elapsed(),
        }
    }

    /// Check every theorem of the library
    pub fn verify_all(&self) -> Result<VerificationSummary, VerifyError> {
        self.verify_all_with_progress(None)
    }

    /// Check every theorem of the library with progress callback
    pub fn verify_all_with_progress(
        &self,
        progress_callback: Option<ProgressCallback>,
    ) -> Result<VerificationSummary, VerifyError> {
        let labels: Vec<LabTok> = self
            .lib
            .assertions()
            .filter(|(_, ass)| ass.is_theorem())
            .map(|(label, _)| label)
            .collect();
        self.run_labels(&labels, progress_callback)
    }

    /// Check selected theorems
    pub fn verify_labels(&self, labels: &[LabTok]) -> Result<VerificationSummary, VerifyError> {
        if let Some(&label) = labels.iter().find(|&&label| {
            !self
                .lib
                .assertion_of(label)
                .is_some_and(|ass| ass.is_theorem())
        }) {
            return Err(VerifyError::NotATheorem(
                self.lib.resolve_label(label).to_string(),
            ));
        }
        self.run_labels(labels, None)
    }

    fn run_labels(
        &self,
        labels: &[LabTok],
        progress_callback: Option<ProgressCallback>,
    ) -> Result<VerificationSummary, VerifyError> {
        let start = Instant::now();
        let total = labels.len();
        let completed = AtomicUsize::new(0);
        let failed = AtomicUsize::new(0);

        let pool = if self.config.num_threads > 0 {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(self.config.num_threads)
                    .build()?,
            )
        } else {
            None
        };

        let interval = self.config.progress_interval;
        let run = || {
            labels
                .par_iter()
                .map(|&label| {
                    let report = self.verify_label(label);
                    let count = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    if report.status == VerificationStatus::Failed {
                        failed.fetch_add(1, Ordering::Relaxed);
                    }
                    if let Some(ref callback) = progress_callback
                        && (count.is_multiple_of(interval) || count == total)
                    {
                        callback(VerifyProgress {
                            total,
                            completed: count,
                            failed: failed.load(Ordering::Relaxed),
                            elapsed: start.elapsed(),
                        });
                    }
                    report
                })
                .collect::<Vec<_>>()
        };

        let reports = match pool {
            Some(pool) => pool.install(run),
            None => run(),
        };
        let summary = VerificationSummary::from_reports(reports, start.elapsed());
        info!(
            total = summary.total,
            verified = summary.verified,
            failed = summary.failed,
            skipped = summary.skipped,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "verification finished"
        );
        Ok(summary)
    }
}
