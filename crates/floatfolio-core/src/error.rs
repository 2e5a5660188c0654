#![forbid(unsafe_code)]

//! Error types for simulation setup.
//!
//! Per-frame paths never fail; these errors only come out of construction
//! and host calls that carry indices or sizes.

use crate::config::ConfigError;

/// Errors reported by [`Simulation`](crate::Simulation) setup calls.
#[derive(Debug)]
pub enum SimError {
    /// A tile index did not name a registered tile.
    TileIndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of registered tiles.
        count: usize,
    },
    /// The host passed a NaN, infinite or negative geometric value.
    NonFiniteInput {
        /// The call that rejected the value.
        op: &'static str,
    },
    /// The configuration failed validation.
    InvalidConfig(ConfigError),
}

impl std::fmt::Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TileIndexOutOfRange { index, count } => {
                write!(f, "tile index {index} out of range (count: {count})")
            }
            Self::NonFiniteInput { op } => write!(f, "invalid geometry passed to '{op}'"),
            Self::InvalidConfig(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Self::InvalidConfig(err) = self {
            return Some(err);
        }
        None
    }
}

impl From<ConfigError> for SimError {
    fn from(err: ConfigError) -> Self {
        Self::InvalidConfig(err)
    }
}

/// Result alias for simulation setup calls.
pub type SimResult<T> = Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = SimError::TileIndexOutOfRange { index: 9, count: 8 };
        assert_eq!(err.to_string(), "tile index 9 out of range (count: 8)");

        let err = SimError::NonFiniteInput { op: "resize" };
        assert_eq!(err.to_string(), "invalid geometry passed to 'resize'");

        let err = SimError::InvalidConfig(ConfigError::Validation(vec!["x".into()]));
        assert_eq!(err.to_string(), "invalid config: validation errors: x");
    }

    #[test]
    fn config_error_is_source() {
        use std::error::Error;
        let err: SimError = ConfigError::Validation(vec![]).into();
        assert!(err.source().is_some());
        assert!(SimError::NonFiniteInput { op: "x" }.source().is_none());
    }
}
