//! Declared sets of legal observations and actions.

use std::f64::consts::TAU;

use fastrand::Rng;

use crate::error::{require_len, EnvError};

/// A set of values that can be sampled and tested for membership.
pub trait Space: Clone {
    type Element;

    /// Draws a value from the space using the caller's generator.
    fn sample(&self, rng: &mut Rng) -> Self::Element;

    fn contains(&self, value: &Self::Element) -> bool;
}

/// Uniform sample in `[low, high)`.
pub(crate) fn uniform(rng: &mut Rng, low: f64, high: f64) -> f64 {
    low + rng.f64() * (high - low)
}

fn standard_normal(rng: &mut Rng) -> f64 {
    // Box-Muller; `1 - u` keeps the logarithm away from zero.
    let u1 = 1.0 - rng.f64();
    let u2 = rng.f64();
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}

fn exponential(rng: &mut Rng) -> f64 {
    -(1.0 - rng.f64()).ln()
}

/// An axis-aligned box in `R^n`.
///
/// Bounds may be infinite; sampling then follows the Gymnasium convention of
/// a normal draw for unbounded axes and a shifted exponential for half-open
/// ones.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSpace {
    low: Vec<f64>,
    high: Vec<f64>,
}

impl BoxSpace {
    /// # Errors
    ///
    /// Returns an error when the bounds differ in length, contain NaN, or
    /// have `low > high` on some axis.
    pub fn new(low: Vec<f64>, high: Vec<f64>) -> Result<Self, EnvError> {
        require_len(low.len(), high.len())?;
        if let Some(axis) = low
            .iter()
            .zip(&high)
            .position(|(l, h)| l.is_nan() || h.is_nan() || l > h)
        {
            return Err(EnvError::InvalidConfiguration(format!(
                "box bounds on axis {axis} are inverted or NaN: [{}, {}]",
                low[axis], high[axis]
            )));
        }
        Ok(Self { low, high })
    }

    /// The box `[-high, high]`.
    ///
    /// # Errors
    ///
    /// See [`BoxSpace::new`].
    pub fn symmetric(high: Vec<f64>) -> Result<Self, EnvError> {
        let low = high.iter().map(|h| -h).collect();
        Self::new(low, high)
    }

    #[must_use]
    pub fn dim(&self) -> usize {
        self.low.len()
    }

    #[must_use]
    pub fn low(&self) -> &[f64] {
        &self.low
    }

    #[must_use]
    pub fn high(&self) -> &[f64] {
        &self.high
    }

    /// Clamps each component of `value` into the box.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::ShapeMismatch`] if `value` has the wrong length.
    pub fn clip(&self, value: &[f64]) -> Result<Vec<f64>, EnvError> {
        require_len(self.dim(), value.len())?;
        Ok(value
            .iter()
            .zip(self.low.iter().zip(&self.high))
            .map(|(v, (l, h))| v.clamp(*l, *h))
            .collect())
    }
}

impl Space for BoxSpace {
    type Element = Vec<f64>;

    fn sample(&self, rng: &mut Rng) -> Vec<f64> {
        self.low
            .iter()
            .zip(&self.high)
            .map(|(&low, &high)| match (low.is_finite(), high.is_finite()) {
                (true, true) => uniform(rng, low, high),
                (true, false) => low + exponential(rng),
                (false, true) => high - exponential(rng),
                (false, false) => standard_normal(rng),
            })
            .collect()
    }

    fn contains(&self, value: &Vec<f64>) -> bool {
        value.len() == self.dim()
            && value
                .iter()
                .zip(self.low.iter().zip(&self.high))
                .all(|(v, (l, h))| l <= v && v <= h)
    }
}

/// A finite set of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Discrete<T> {
    values: Vec<T>,
}

impl<T: Clone + PartialEq> Discrete<T> {
    /// # Errors
    ///
    /// Returns [`EnvError::InvalidConfiguration`] for an empty set.
    pub fn new(values: Vec<T>) -> Result<Self, EnvError> {
        if values.is_empty() {
            return Err(EnvError::InvalidConfiguration(
                "a discrete space needs at least one value".to_string(),
            ));
        }
        Ok(Self { values })
    }

    #[must_use]
    pub fn n(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }
}

impl<T: Clone + PartialEq> Space for Discrete<T> {
    type Element = T;

    fn sample(&self, rng: &mut Rng) -> T {
        self.values[rng.usize(..self.values.len())].clone()
    }

    fn contains(&self, value: &T) -> bool {
        self.values.contains(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_samples_stay_inside() {
        let space = BoxSpace::new(vec![-1.0, 0.0], vec![1.0, 5.0]).unwrap();
        let mut rng = Rng::with_seed(7);
        for _ in 0..1000 {
            assert!(space.contains(&space.sample(&mut rng)));
        }
    }

    #[test]
    fn unbounded_axes_sample_finite_values() {
        let space = BoxSpace::new(
            vec![f64::NEG_INFINITY, 0.0, f64::NEG_INFINITY],
            vec![f64::INFINITY, f64::INFINITY, 2.0],
        )
        .unwrap();
        let mut rng = Rng::with_seed(3);
        for _ in 0..100 {
            let x = space.sample(&mut rng);
            assert!(x.iter().all(|v| v.is_finite()));
            assert!(x[1] >= 0.0 && x[2] <= 2.0);
        }
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        assert!(BoxSpace::new(vec![1.0], vec![0.0]).is_err());
        assert!(BoxSpace::new(vec![0.0, 0.0], vec![1.0]).is_err());
    }

    #[test]
    fn clip_clamps_and_checks_shape() {
        let space = BoxSpace::symmetric(vec![10.0]).unwrap();
        assert_eq!(space.clip(&[1e6]).unwrap(), vec![10.0]);
        assert!(matches!(
            space.clip(&[1.0, 2.0]),
            Err(EnvError::ShapeMismatch { expected: 1, actual: 2 })
        ));
    }

    #[test]
    fn discrete_samples_members() {
        let space = Discrete::new(vec!['a', 'b', 'c']).unwrap();
        let mut rng = Rng::with_seed(1);
        assert!((0..50).all(|_| space.contains(&space.sample(&mut rng))));
        assert!(!space.contains(&'z'));
        assert!(Discrete::<u8>::new(vec![]).is_err());
    }
}
