//! Execution configuration for structured matvecs
//!
//! The configuration only chooses an execution path. Serial and parallel
//! paths compute the same product; they may differ in the last bits because
//! the parallel path sums blocks in a different order.

use std::fmt;

/// How a structured matvec is executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExecutionStrategy {
    /// Single-threaded block accumulation
    #[default]
    Serial,
    /// Output-block parallel accumulation (requires the `parallel` feature)
    Parallel,
    /// Parallel once the work estimate reaches `parallel_threshold`
    Auto,
}

impl ExecutionStrategy {
    /// Parse from string, falling back to [`ExecutionStrategy::Serial`]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "parallel" => ExecutionStrategy::Parallel,
            "auto" => ExecutionStrategy::Auto,
            _ => ExecutionStrategy::Serial,
        }
    }
}

impl fmt::Display for ExecutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionStrategy::Serial => write!(f, "serial"),
            ExecutionStrategy::Parallel => write!(f, "parallel"),
            ExecutionStrategy::Auto => write!(f, "auto"),
        }
    }
}

/// Structured matvec configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatvecConfig {
    /// Execution strategy
    pub strategy: ExecutionStrategy,
    /// Work estimate (scalar multiply-adds) at which `Auto` goes parallel
    pub parallel_threshold: usize,
}

/// Environment variable selecting the strategy in [`MatvecConfig::from_env`]
pub const STRATEGY_ENV: &str = "KRONOP_MATVEC_STRATEGY";

/// Environment variable overriding the threshold in [`MatvecConfig::from_env`]
pub const THRESHOLD_ENV: &str = "KRONOP_PARALLEL_THRESHOLD";

const DEFAULT_PARALLEL_THRESHOLD: usize = 1 << 16;

impl Default for MatvecConfig {
    fn default() -> Self {
        Self {
            strategy: ExecutionStrategy::Serial,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl MatvecConfig {
    /// Serial configuration
    pub fn serial() -> Self {
        Self::default()
    }

    /// Always-parallel configuration
    pub fn parallel() -> Self {
        Self::default().strategy(ExecutionStrategy::Parallel)
    }

    /// Build a configuration from `KRONOP_MATVEC_STRATEGY` and
    /// `KRONOP_PARALLEL_THRESHOLD`, using defaults for unset or unparsable
    /// values.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(s) = std::env::var(STRATEGY_ENV) {
            config.strategy = ExecutionStrategy::parse(&s);
        }

        if let Ok(s) = std::env::var(THRESHOLD_ENV) {
            match s.trim().parse::<usize>() {
                Ok(threshold) => config.parallel_threshold = threshold,
                Err(_) => tracing::warn!(value = %s, "ignoring unparsable {}", THRESHOLD_ENV),
            }
        }

        config
    }

    /// Set the execution strategy
    pub fn strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the `Auto` threshold
    pub fn parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Whether an operation with the given work estimate runs in parallel
    ///
    /// Always `false` when the crate is built without `parallel`.
    pub fn use_parallel(&self, work: usize) -> bool {
        if !cfg!(feature = "parallel") {
            return false;
        }
        match self.strategy {
            ExecutionStrategy::Serial => false,
            ExecutionStrategy::Parallel => true,
            ExecutionStrategy::Auto => work >= self.parallel_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_parse() {
        assert_eq!(ExecutionStrategy::parse("parallel"), ExecutionStrategy::Parallel);
        assert_eq!(ExecutionStrategy::parse(" AUTO "), ExecutionStrategy::Auto);
        assert_eq!(ExecutionStrategy::parse("serial"), ExecutionStrategy::Serial);
        assert_eq!(ExecutionStrategy::parse("bogus"), ExecutionStrategy::Serial);
    }

    #[test]
    fn test_default_is_serial() {
        let config = MatvecConfig::default();
        assert_eq!(config.strategy, ExecutionStrategy::Serial);
        assert!(!config.use_parallel(usize::MAX));
    }

    #[test]
    fn test_builder() {
        let config = MatvecConfig::default()
            .strategy(ExecutionStrategy::Auto)
            .parallel_threshold(100);
        assert_eq!(config.parallel_threshold, 100);
        assert!(!config.use_parallel(99));
        assert_eq!(config.use_parallel(100), cfg!(feature = "parallel"));
    }

    #[test]
    fn test_parallel_constructor() {
        assert_eq!(
            MatvecConfig::parallel().use_parallel(0),
            cfg!(feature = "parallel")
        );
    }
}
