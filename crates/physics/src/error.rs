use render::RenderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnvError {
    /// An operation was issued out of order, e.g. `step` before `reset`.
    #[error("invalid lifecycle: {0}")]
    InvalidLifecycle(&'static str),
    /// An action that no amount of clamping can map into the action space.
    #[error("invalid action: {0}")]
    InvalidAction(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("shape mismatch: expected {expected} components, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
}

// Backend failures surface at the first render and count as configuration errors.
impl From<RenderError> for EnvError {
    fn from(err: RenderError) -> Self {
        EnvError::InvalidConfiguration(err.to_string())
    }
}

/// Fails with [`EnvError::InvalidConfiguration`] unless `value` is finite and
/// strictly positive.
pub(crate) fn require_positive(name: &str, value: f64) -> Result<(), EnvError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EnvError::InvalidConfiguration(format!(
            "{name} must be finite and positive, got {value}"
        )))
    }
}

pub(crate) fn require_finite(name: &str, value: f64) -> Result<(), EnvError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(EnvError::InvalidConfiguration(format!(
            "{name} must be finite, got {value}"
        )))
    }
}

/// Checks that an action or state slice has exactly `expected` components.
pub(crate) fn require_len(expected: usize, actual: usize) -> Result<(), EnvError> {
    if expected == actual {
        Ok(())
    } else {
        Err(EnvError::ShapeMismatch { expected, actual })
    }
}
