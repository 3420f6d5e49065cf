//! Error taxonomy for a latency sweep.
//!
//! Configuration problems are caught before any measurement starts and are kept
//! apart from the failures that can only happen mid-sweep (allocation, output).

/// Rejected sweep configuration
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Parse { key: &'static str, value: String },
    #[error("minimum size of {min} slots is below the floor of {floor} slots")]
    MinTooSmall { min: usize, floor: usize },
    #[error("maximum size of {max} slots is smaller than minimum size of {min} slots")]
    MaxBelowMin { min: usize, max: usize },
    #[error("trial count must be at least 1")]
    ZeroTrials,
    #[error("iteration count must be at least 1")]
    ZeroIterations,
    #[error("stride must be at least 1")]
    ZeroStride,
}

/// Errors that abort a sweep
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("could not allocate chain of {slots} slots ({bytes} bytes)")]
    Alloc { slots: usize, bytes: usize },
    #[error("writing results: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sweep operations.
pub type ProbeResult<T> = Result<T, ProbeError>;
