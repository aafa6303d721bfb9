//! Engine configuration.

pub const MAX_THREADS: usize = 256;
pub const MIN_HASH_MB: usize = 1;
pub const MAX_HASH_MB: usize = 65_536;

/// Knobs fixed between searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Number of search workers.
    pub threads: usize,
    /// Transposition table size in megabytes.
    pub hash_mb: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            threads: 1,
            hash_mb: 16,
        }
    }
}

/// A configuration value outside its supported range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("thread count must be between 1 and 256, got {0}")]
    Threads(usize),

    #[error("hash size must be between 1 and 65536 MB, got {0}")]
    Hash(usize),
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_THREADS).contains(&self.threads) {
            return Err(ConfigError::Threads(self.threads));
        }
        if !(MIN_HASH_MB..=MAX_HASH_MB).contains(&self.hash_mb) {
            return Err(ConfigError::Hash(self.hash_mb));
        }
        Ok(())
    }
}
