//! Error types for test generation.
//!
//! Structural problems with a chromosome (missing test factory) are contract
//! violations and panic. Everything a caller can recover from lives here.

use thiserror::Error;

/// Result type alias for test generation operations
pub type Result<T> = std::result::Result<T, TestGenError>;

/// Main error type for the evolutionary engine.
///
/// # Examples
///
/// ```
/// use aprender_testgen::error::TestGenError;
///
/// let err = TestGenError::InvalidFitness {
///     violations: vec!["Invalid value of fitness: -1".to_string()],
/// };
/// assert!(err.to_string().contains("Invalid value of fitness"));
/// ```
#[derive(Error, Debug)]
pub enum TestGenError {
    /// A fitness function produced values that failed validation.
    #[error("invalid fitness values: {}", violations.join(", "))]
    InvalidFitness {
        /// Human readable violation descriptions
        violations: Vec<String>,
    },

    /// A configuration knob is out of its admissible range.
    #[error("invalid configuration: {param} = {value} ({constraint})")]
    InvalidConfig {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// The search was asked to work on an empty population.
    #[error("population is empty")]
    EmptyPopulation,

    /// I/O error while reading a configuration file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed TOML configuration
    #[error("configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl TestGenError {
    /// Build an [`TestGenError::InvalidConfig`] from displayable parts.
    pub fn invalid_config(
        param: impl Into<String>,
        value: impl ToString,
        constraint: impl Into<String>,
    ) -> Self {
        Self::InvalidConfig {
            param: param.into(),
            value: value.to_string(),
            constraint: constraint.into(),
        }
    }
}
