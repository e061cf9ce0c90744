//! Reader to report
//!
//! [`run`] validates a configuration, builds the selected engine, feeds it
//! every record of the input and returns the finished [`Report`]. Nothing is
//! rendered here, so a failed read never produces partial output.

use std::fmt;
use std::io::BufRead;

use tracing::{debug, trace};

use crate::config::{Algorithm, ConfigError, EngineConfig};
use crate::frequency::{ExactTopK, FilteredSpaceSaving, SpaceSaving};
use crate::input::{LineReader, ReadError};
use crate::render::Report;
use crate::traits::FrequencyEngine;

/// Any failure of a pipeline run
#[derive(Debug)]
pub enum Error {
    /// The configuration was rejected before reading
    Config(ConfigError),
    /// Input could not be read
    Read(ReadError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(err) => write!(f, "{}", err),
            Error::Read(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(err) => Some(err),
            Error::Read(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

impl From<ReadError> for Error {
    fn from(err: ReadError) -> Self {
        Error::Read(err)
    }
}

/// Rank the records of `reader` with the engine `config` selects
///
/// # Example
///
/// ```
/// use topflow::config::EngineConfig;
/// use topflow::pipeline::run;
///
/// let report = run(&b"a\nb\na\nc\na\nb\n"[..], &EngineConfig::new(2).with_other(true)).unwrap();
/// assert_eq!(report.rows()[0].item, b"a");
/// assert_eq!(report.other(), Some(1));
/// ```
pub fn run<R: BufRead>(reader: R, config: &EngineConfig) -> Result<Report<Vec<u8>>, Error> {
    config.validate()?;
    trace!(?config, "starting run");

    let lines = LineReader::new(reader, config.max_record_bytes);
    let report = match config.algorithm {
        Algorithm::Exact => drive(ExactTopK::new(config.k), lines, config)?,
        Algorithm::SpaceSaving => drive(SpaceSaving::from_config(config), lines, config)?,
        Algorithm::Filtered => {
            let engine = FilteredSpaceSaving::from_config(config);
            debug!(seed = engine.seed(), buckets = 1u64 << config.filter_bits, "filter ready");
            drive(engine, lines, config)?
        }
    };
    Ok(report)
}

/// Feed every record to `engine` and rank the result
pub fn drive<E, R>(
    mut engine: E,
    mut lines: LineReader<R>,
    config: &EngineConfig,
) -> Result<Report<Vec<u8>>, ReadError>
where
    E: FrequencyEngine<Item = Vec<u8>>,
    R: BufRead,
{
    while let Some(record) = lines.next_record()? {
        engine.observe(record);
    }

    let stats = engine.stats();
    debug!(
        algorithm = %config.algorithm,
        records = stats.records,
        lines = lines.records_read(),
        tracked = stats.tracked,
        capacity = ?stats.capacity,
        admissions = stats.admissions,
        evictions = stats.evictions,
        rejections = stats.rejections,
        "scan complete"
    );

    Ok(Report::new(engine.top_k(), engine.total()).with_other(config.other))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::ItemCount;

    const SAMPLE: &[u8] = b"a\nb\na\nc\na\nb\n";

    fn rows(report: &Report<Vec<u8>>) -> Vec<(String, u64)> {
        report
            .rows()
            .iter()
            .map(|row| (String::from_utf8(row.item.clone()).unwrap(), row.count))
            .collect()
    }

    #[test]
    fn test_exact_run() {
        let report = run(SAMPLE, &EngineConfig::new(2)).unwrap();
        assert_eq!(rows(&report), vec![("a".into(), 3), ("b".into(), 2)]);
        assert_eq!(report.total(), 6);
        assert_eq!(report.other(), None);
    }

    #[test]
    fn test_other_row() {
        let report = run(SAMPLE, &EngineConfig::new(2).with_other(true)).unwrap();
        assert_eq!(report.other(), Some(1));
    }

    #[test]
    fn test_every_algorithm_agrees_on_small_input() {
        for algorithm in [Algorithm::Exact, Algorithm::SpaceSaving, Algorithm::Filtered] {
            let config = EngineConfig::new(2)
                .with_algorithm(algorithm)
                .with_filter_bits(32);
            let report = run(SAMPLE, &config).unwrap();
            assert_eq!(
                rows(&report),
                vec![("a".into(), 3), ("b".into(), 2)],
                "algorithm {algorithm}"
            );
        }
    }

    #[test]
    fn test_empty_input() {
        let report = run(&b""[..], &EngineConfig::new(3).with_other(true)).unwrap();
        assert!(report.is_empty());
        assert_eq!(report.to_text(), "");
    }

    #[test]
    fn test_k_zero() {
        for algorithm in [Algorithm::Exact, Algorithm::SpaceSaving, Algorithm::Filtered] {
            let config = EngineConfig::new(0).with_algorithm(algorithm);
            assert!(run(SAMPLE, &config).unwrap().is_empty());
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let err = run(SAMPLE, &EngineConfig::new(2).with_factor(0.0)).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::InvalidFactor(_))));
    }

    #[test]
    fn test_oversized_record_fails_whole_run() {
        let config = EngineConfig::new(2).with_max_record_bytes(3);
        let err = run(&b"ok\nfine\n"[..], &config).unwrap_err();
        assert!(matches!(
            err,
            Error::Read(ReadError::RecordTooLong { limit: 3, line: 2 })
        ));
    }

    #[test]
    fn test_drive_with_custom_engine() {
        let lines = LineReader::new(&b"x\nx\ny\n"[..], 16);
        let report = drive(ExactTopK::new(1), lines, &EngineConfig::new(1)).unwrap();
        assert_eq!(report.rows(), &[ItemCount::new(b"x".to_vec(), 2, 0)]);
    }
}
