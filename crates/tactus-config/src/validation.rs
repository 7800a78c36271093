//! Range and name checks for a parsed configuration.

use thiserror::Error;

/// A single reason a configuration was rejected.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Numeric field outside its accepted range.
    #[error("'{field}' = {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Dotted path of the field, e.g. `audio.channels`.
        field: &'static str,
        /// The rejected value.
        value: f64,
        /// Minimum allowed value.
        min: f64,
        /// Maximum allowed value.
        max: f64,
    },

    /// Binding names a feature the tracker does not provide.
    #[error("unknown gesture feature: {0}")]
    UnknownFeature(String),

    /// Binding names a parameter no stage declares.
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    /// Two bindings target the same parameter.
    #[error("parameter '{0}' is bound more than once")]
    DuplicateBinding(String),

    /// More bindings than the router can hold.
    #[error("{count} bindings exceed the router capacity of {capacity}")]
    TooManyBindings {
        /// Number of bindings in the file.
        count: usize,
        /// Router capacity.
        capacity: usize,
    },

    /// Multiple validation errors.
    #[error("{}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Collects errors so a file reports every problem at once.
#[derive(Debug, Default)]
pub(crate) struct Collector {
    errors: Vec<ValidationError>,
}

impl Collector {
    pub(crate) fn range<T: Into<f64> + Copy>(&mut self, field: &'static str, value: T, min: f64, max: f64) {
        let v: f64 = value.into();
        if !(min..=max).contains(&v) {
            self.errors.push(ValidationError::OutOfRange {
                field,
                value: v,
                min,
                max,
            });
        }
    }

    pub(crate) fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub(crate) fn finish(mut self) -> ValidationResult<()> {
        match self.errors.len() {
            0 => Ok(()),
            1 => Err(self.errors.remove(0)),
            _ => Err(ValidationError::Multiple(self.errors)),
        }
    }
}
