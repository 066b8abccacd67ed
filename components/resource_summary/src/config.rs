//! Configuration for the resource summary artifact

use crate::cache::DEFAULT_CACHE_CAPACITY;
use serde::{Deserialize, Serialize};

/// Default number of records each worker summarizes in the parallel form
pub const DEFAULT_PARALLEL_CHUNK_SIZE: usize = 512;

/// Configuration for [`ResourceSummaryComputer`](crate::ResourceSummaryComputer)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SummaryConfig {
    /// Maximum number of memoized summaries
    cache_capacity: usize,

    /// Whether large record lists are summarized on worker threads
    parallel: bool,

    /// Records per worker when summarizing in parallel
    parallel_chunk_size: usize,
}

impl SummaryConfig {
    /// Create a new builder for SummaryConfig
    ///
    /// # Example
    ///
    /// ```
    /// use resource_summary::SummaryConfig;
    ///
    /// let config = SummaryConfig::builder()
    ///     .cache_capacity(16)
    ///     .parallel(true)
    ///     .build();
    /// assert_eq!(config.cache_capacity(), 16);
    /// ```
    pub fn builder() -> SummaryConfigBuilder {
        SummaryConfigBuilder::default()
    }

    pub fn cache_capacity(&self) -> usize {
        self.cache_capacity
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }

    pub fn parallel_chunk_size(&self) -> usize {
        self.parallel_chunk_size
    }
}

impl Default for SummaryConfig {
    /// Default values:
    /// - cache_capacity: 64
    /// - parallel: false
    /// - parallel_chunk_size: 512
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            parallel: false,
            parallel_chunk_size: DEFAULT_PARALLEL_CHUNK_SIZE,
        }
    }
}

/// Builder for SummaryConfig
#[derive(Debug, Clone, Default)]
pub struct SummaryConfigBuilder {
    cache_capacity: Option<usize>,
    parallel: Option<bool>,
    parallel_chunk_size: Option<usize>,
}

impl SummaryConfigBuilder {
    /// Set the maximum number of memoized summaries (minimum 1)
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }

    /// Enable or disable parallel summarization
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = Some(enabled);
        self
    }

    /// Set records per worker (minimum 1)
    pub fn parallel_chunk_size(mut self, size: usize) -> Self {
        self.parallel_chunk_size = Some(size);
        self
    }

    /// Build the SummaryConfig
    ///
    /// Uses default values for any options not explicitly set.
    pub fn build(self) -> SummaryConfig {
        let default = SummaryConfig::default();

        SummaryConfig {
            cache_capacity: self.cache_capacity.unwrap_or(default.cache_capacity).max(1),
            parallel: self.parallel.unwrap_or(default.parallel),
            parallel_chunk_size: self
                .parallel_chunk_size
                .unwrap_or(default.parallel_chunk_size)
                .max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SummaryConfig::default();

        assert_eq!(config.cache_capacity(), 64);
        assert!(!config.parallel());
        assert_eq!(config.parallel_chunk_size(), 512);
    }

    #[test]
    fn test_builder_all_options() {
        let config = SummaryConfig::builder()
            .cache_capacity(8)
            .parallel(true)
            .parallel_chunk_size(100)
            .build();

        assert_eq!(config.cache_capacity(), 8);
        assert!(config.parallel());
        assert_eq!(config.parallel_chunk_size(), 100);
    }

    #[test]
    fn test_builder_no_options() {
        assert_eq!(SummaryConfig::builder().build(), SummaryConfig::default());
    }

    #[test]
    fn test_builder_clamps_zero() {
        let config = SummaryConfig::builder()
            .cache_capacity(0)
            .parallel_chunk_size(0)
            .build();

        assert_eq!(config.cache_capacity(), 1);
        assert_eq!(config.parallel_chunk_size(), 1);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: SummaryConfig = serde_json::from_str(r#"{"parallel": true}"#).unwrap();
        assert!(config.parallel());
        assert_eq!(config.cache_capacity(), 64);
    }
}
