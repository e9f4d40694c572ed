use thiserror::Error;

/// Errors surfaced by the simulation engine.
///
/// Every detectable failure is raised during construction and validation,
/// before the first trial runs; a failure mid-run would leave accumulators
/// partially populated, so the engine refuses to start instead.
#[derive(Debug, Error)]
pub enum SimError {
    /// Malformed or missing team/strength data.
    #[error("invalid input: {0}")]
    Input(String),

    /// The schedule cannot support the comparisons the league requires.
    #[error("incomplete schedule: {0}")]
    IncompleteSchedule(String),

    /// Invalid run configuration.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, SimError>;
