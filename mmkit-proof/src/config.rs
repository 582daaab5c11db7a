//! Verification settings

use crate::compression::DEFAULT_MAX_LABELS;
use serde::{Deserialize, Serialize};

/// Configuration for proof verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyConfig {
    /// Number of worker threads (0 = use the global rayon pool)
    pub num_threads: usize,
    /// Maximum number of labels a compressed proof may expand to
    pub max_decompression_size: usize,
    /// Build derivation trees while verifying
    pub gen_proof_tree: bool,
    /// Progress callback interval (report every N theorems)
    pub progress_interval: usize,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            num_threads: 0,
            max_decompression_size: DEFAULT_MAX_LABELS,
            gen_proof_tree: false,
            progress_interval: 100,
        }
    }
}

impl VerifyConfig {
    /// Create the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of threads
    #[must_use]
    pub fn with_num_threads(mut self, n: usize) -> Self {
        self.num_threads = n;
        self
    }

    /// Set the decompression cap
    #[must_use]
    pub fn with_max_decompression_size(mut self, max_labels: usize) -> Self {
        self.max_decompression_size = max_labels;
        self
    }

    /// Enable derivation tree generation
    #[must_use]
    pub fn with_proof_tree(mut self, enabled: bool) -> Self {
        self.gen_proof_tree = enabled;
        self
    }

    /// Set the progress interval
    #[must_use]
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval.max(1);
        self
    }
}
