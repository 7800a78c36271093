//! Binding error type.

#[cfg(not(feature = "std"))]
use alloc::string::String;

use core::fmt;

/// Reasons a binding request is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    /// The feature name is not one of the known gesture features.
    UnknownFeature(String),

    /// The parameter name is not declared in the registry.
    UnknownParameter(String),

    /// Every binding slot is in use.
    RouterFull {
        /// Number of slots.
        capacity: usize,
    },
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownFeature(name) => write!(f, "unknown gesture feature '{name}'"),
            Self::UnknownParameter(name) => write!(f, "unknown parameter '{name}'"),
            Self::RouterFull { capacity } => write!(f, "router is full ({capacity} bindings)"),
        }
    }
}

impl core::error::Error for BindingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        assert_eq!(
            BindingError::UnknownFeature("spin".into()).to_string(),
            "unknown gesture feature 'spin'"
        );
        assert_eq!(
            BindingError::RouterFull { capacity: 8 }.to_string(),
            "router is full (8 bindings)"
        );
    }
}
