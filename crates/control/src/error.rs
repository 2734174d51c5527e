use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignalError {
    #[error("{name} must be finite and positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    #[error("{name} is out of range, got {value}")]
    OutOfRange { name: &'static str, value: f64 },
    #[error("shift register order must be between 2 and 16, got {0}")]
    InvalidOrder(u32),
    /// A PRBS bit has to be held for at least one step.
    #[error("hold length must be at least one step")]
    ZeroHold,
    #[error("a signal needs at least one component")]
    Empty,
}

pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<(), SignalError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SignalError::NonPositive { name, value })
    }
}
