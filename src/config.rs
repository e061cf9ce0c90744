//! Engine configuration
//!
//! [`EngineConfig`] is an explicit value handed to each engine constructor.
//! Nothing is read from process-wide state.

use core::fmt;

use crate::math;

/// Default number of reported items
pub const DEFAULT_K: usize = 10;
/// Default monitored-set amplification for the approximate engines
pub const DEFAULT_FACTOR: f64 = 5.0;
/// Default log2 of the admission filter bucket count
pub const DEFAULT_FILTER_BITS: u8 = 8;
/// Largest supported filter width
pub const MAX_FILTER_BITS: u8 = 32;
/// Default limit on a single record, in bytes
pub const DEFAULT_MAX_RECORD_BYTES: usize = 1024 * 1024;

/// Which engine to run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Algorithm {
    /// Full tally followed by bounded heap extraction
    #[default]
    Exact,
    /// Space-Saving over `k * factor` monitored items
    SpaceSaving,
    /// Space-Saving behind a bucketed admission filter
    Filtered,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::Exact => "exact",
            Algorithm::SpaceSaving => "space-saving",
            Algorithm::Filtered => "filtered",
        };
        f.write_str(name)
    }
}

/// Seed for the admission filter's bucket hash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum HashSeed {
    /// Reproducible runs
    Fixed(u64),
    /// A fresh seed per engine; output may differ between runs
    #[cfg(feature = "std")]
    Random,
}

impl HashSeed {
    /// The concrete seed to hash with
    pub fn resolve(self) -> u64 {
        match self {
            HashSeed::Fixed(seed) => seed,
            #[cfg(feature = "std")]
            HashSeed::Random => rand::random(),
        }
    }
}

impl Default for HashSeed {
    fn default() -> Self {
        HashSeed::Fixed(0)
    }
}

/// Invalid configuration values
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Factor must be finite and at least 1.0
    InvalidFactor(f64),
    /// Filter bits must be in `1..=MAX_FILTER_BITS`
    InvalidFilterBits(u8),
    /// Record limit must be positive
    InvalidRecordLimit,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidFactor(factor) => {
                write!(f, "invalid factor {}: must be finite and >= 1.0", factor)
            }
            ConfigError::InvalidFilterBits(bits) => {
                write!(f, "invalid filter bits {}: must be in 1..={}", bits, MAX_FILTER_BITS)
            }
            ConfigError::InvalidRecordLimit => write!(f, "record size limit must be positive"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Settings shared by every engine and the surrounding pipeline
///
/// # Example
///
/// ```
/// use topflow::config::{Algorithm, EngineConfig};
///
/// let config = EngineConfig::new(3)
///     .with_algorithm(Algorithm::SpaceSaving)
///     .with_factor(4.0);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.heap_capacity(), 12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Number of items to report
    pub k: usize,
    /// Engine selection
    pub algorithm: Algorithm,
    /// Monitored-set amplification over `k` (approximate engines)
    pub factor: f64,
    /// log2 of the admission filter bucket count (filtered engine)
    pub filter_bits: u8,
    /// Bucket hash seed (filtered engine)
    pub seed: HashSeed,
    /// Longest accepted record, in bytes
    pub max_record_bytes: usize,
    /// Append an aggregate row for unreported records
    pub other: bool,
}

impl EngineConfig {
    /// Defaults for everything but `k`
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Self::default()
        }
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_factor(mut self, factor: f64) -> Self {
        self.factor = factor;
        self
    }

    pub fn with_filter_bits(mut self, filter_bits: u8) -> Self {
        self.filter_bits = filter_bits;
        self
    }

    pub fn with_seed(mut self, seed: HashSeed) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_record_bytes(mut self, max_record_bytes: usize) -> Self {
        self.max_record_bytes = max_record_bytes;
        self
    }

    pub fn with_other(mut self, other: bool) -> Self {
        self.other = other;
        self
    }

    /// Check every field, reporting the first bad one
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.factor.is_finite() || self.factor < 1.0 {
            return Err(ConfigError::InvalidFactor(self.factor));
        }
        if self.filter_bits == 0 || self.filter_bits > MAX_FILTER_BITS {
            return Err(ConfigError::InvalidFilterBits(self.filter_bits));
        }
        if self.max_record_bytes == 0 {
            return Err(ConfigError::InvalidRecordLimit);
        }
        Ok(())
    }

    /// Size of the monitored set for the approximate engines:
    /// `max(k, round(k * factor))`
    pub fn heap_capacity(&self) -> usize {
        math::scaled_capacity(self.k, self.factor)
    }

    /// Mask selecting a filter bucket from a 64-bit hash
    pub fn filter_mask(&self) -> u64 {
        let bits = self.filter_bits.min(MAX_FILTER_BITS);
        (1u64 << bits) - 1
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            algorithm: Algorithm::default(),
            factor: DEFAULT_FACTOR,
            filter_bits: DEFAULT_FILTER_BITS,
            seed: HashSeed::default(),
            max_record_bytes: DEFAULT_MAX_RECORD_BYTES,
            other: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.k, 10);
        assert_eq!(config.algorithm, Algorithm::Exact);
        assert_eq!(config.heap_capacity(), 50);
        assert_eq!(config.filter_mask(), 0xff);
        assert_eq!(config.seed, HashSeed::Fixed(0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert_eq!(
            EngineConfig::new(5).with_factor(0.5).validate(),
            Err(ConfigError::InvalidFactor(0.5))
        );
        assert!(EngineConfig::new(5).with_factor(f64::NAN).validate().is_err());
        assert_eq!(
            EngineConfig::new(5).with_filter_bits(0).validate(),
            Err(ConfigError::InvalidFilterBits(0))
        );
        assert_eq!(
            EngineConfig::new(5).with_filter_bits(33).validate(),
            Err(ConfigError::InvalidFilterBits(33))
        );
        assert_eq!(
            EngineConfig::new(5).with_max_record_bytes(0).validate(),
            Err(ConfigError::InvalidRecordLimit)
        );
    }

    #[test]
    fn test_heap_capacity_never_below_k() {
        assert_eq!(EngineConfig::new(7).with_factor(1.0).heap_capacity(), 7);
        assert_eq!(EngineConfig::new(0).heap_capacity(), 0);
    }

    #[test]
    fn test_fixed_seed_resolves_to_itself() {
        assert_eq!(HashSeed::Fixed(42).resolve(), 42);
    }

    #[test]
    fn test_algorithm_display() {
        assert_eq!(Algorithm::SpaceSaving.to_string(), "space-saving");
    }
}
