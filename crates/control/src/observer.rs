use crate::error::SignalError;

/// Turns raw observations into state estimates.
pub trait Observer<O> {
    fn observe(&mut self, observation: &O) -> O;

    /// Called at the start of every episode.
    fn reset(&mut self) {}
}

/// Passes observations through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityObserver;

impl<O: Clone> Observer<O> for IdentityObserver {
    fn observe(&mut self, observation: &O) -> O {
        observation.clone()
    }
}

/// First-order low-pass filter, `y <- y + alpha * (measurement - y)`.
///
/// The first measurement after construction or [`Observer::reset`] seeds the
/// estimate directly.
#[derive(Debug, Clone)]
pub struct LowPassObserver {
    alpha: f64,
    estimate: Option<Vec<f64>>,
}

impl LowPassObserver {
    /// # Errors
    ///
    /// Returns [`SignalError::OutOfRange`] unless `0 < alpha <= 1`.
    pub fn new(alpha: f64) -> Result<Self, SignalError> {
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(SignalError::OutOfRange { name: "alpha", value: alpha });
        }
        Ok(Self { alpha, estimate: None })
    }

    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl Observer<Vec<f64>> for LowPassObserver {
    fn observe(&mut self, observation: &Vec<f64>) -> Vec<f64> {
        let estimate = match self.estimate.take() {
            Some(mut y) if y.len() == observation.len() => {
                for (estimate, measured) in y.iter_mut().zip(observation) {
                    *estimate += self.alpha * (measured - *estimate);
                }
                y
            }
            Some(y) => {
                tracing::warn!(
                    expected = y.len(),
                    actual = observation.len(),
                    "observation shape changed; restarting low-pass filter"
                );
                observation.clone()
            }
            None => observation.clone(),
        };
        self.estimate = Some(estimate.clone());
        estimate
    }

    fn reset(&mut self) {
        self.estimate = None;
    }
}
