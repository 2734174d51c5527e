//! Decorators that add lifecycle rules around any [`Environment`].
//!
//! Each wrapper is itself an [`Environment`], so they nest. The standard
//! stack, innermost first, is [`EnvChecker`], [`OrderEnforcing`],
//! [`StepLimit`] and [`FrameCollector`].

mod checker;
mod frames;
mod order;
mod time_limit;

pub use checker::EnvChecker;
pub use frames::FrameCollector;
pub use order::OrderEnforcing;
pub use time_limit::StepLimit;

use physics::{EnvError, Environment};

/// A system wrapped in the standard stack.
pub type Wrapped<E> = FrameCollector<StepLimit<OrderEnforcing<EnvChecker<E>>>>;

/// Wraps `env` in the standard stack with a budget of `max_steps` per episode.
///
/// # Errors
///
/// Returns [`EnvError::InvalidConfiguration`] when `max_steps` is zero.
pub fn wrap<E: Environment>(env: E, max_steps: usize) -> Result<Wrapped<E>, EnvError> {
    let limited = StepLimit::new(OrderEnforcing::new(EnvChecker::new(env)), max_steps)?;
    Ok(FrameCollector::new(limited))
}

impl<E: Environment> Wrapped<E> {
    /// The raw system at the bottom of the stack.
    pub fn system(&self) -> &E {
        self.inner().inner().inner().inner()
    }

    pub fn step_limit(&self) -> &StepLimit<OrderEnforcing<EnvChecker<E>>> {
        self.inner()
    }
}
