//! Open-loop excitation signals for system identification.
//!
//! A [`Signal`] is a pure function of the step index and time step, so the
//! same parameters always reproduce the same sequence. [`SignalController`]
//! owns the step counter and turns any signal into a single-input
//! [`Controller`].

use std::f64::consts::{PI, TAU};

use fastrand::Rng;
use serde::{Deserialize, Serialize};

use crate::controller::Controller;
use crate::error::{require_positive, SignalError};

/// Maximal-length feedback taps for orders 2 through 16, counted from the
/// input end of the register.
const LFSR_TAPS: [&[u32]; 15] = [
    &[2, 1],
    &[3, 2],
    &[4, 3],
    &[5, 3],
    &[6, 5],
    &[7, 6],
    &[8, 6, 5, 4],
    &[9, 5],
    &[10, 7],
    &[11, 9],
    &[12, 11, 10, 4],
    &[13, 12, 11, 8],
    &[14, 13, 12, 2],
    &[15, 14],
    &[16, 15, 13, 4],
];

/// A scalar signal sampled at `t = step * dt`.
pub trait Signal {
    fn value(&self, step: usize, dt: f64) -> f64;
}

impl<S: Signal + ?Sized> Signal for Box<S> {
    fn value(&self, step: usize, dt: f64) -> f64 {
        (**self).value(step, dt)
    }
}

fn time(step: usize, dt: f64) -> f64 {
    step as f64 * dt
}

fn require_non_negative(name: &'static str, value: f64) -> Result<(), SignalError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SignalError::OutOfRange { name, value })
    }
}

/// `amplitude * sin(2 pi frequency t + phase)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sine {
    pub amplitude: f64,
    pub frequency: f64,
    pub phase: f64,
}

impl Sine {
    /// # Errors
    ///
    /// Returns [`SignalError::OutOfRange`] for negative or non-finite
    /// parameters.
    pub fn new(amplitude: f64, frequency: f64, phase: f64) -> Result<Self, SignalError> {
        require_non_negative("amplitude", amplitude)?;
        require_non_negative("frequency", frequency)?;
        if !phase.is_finite() {
            return Err(SignalError::OutOfRange { name: "phase", value: phase });
        }
        Ok(Self { amplitude, frequency, phase })
    }
}

impl Signal for Sine {
    fn value(&self, step: usize, dt: f64) -> f64 {
        self.amplitude * (TAU * self.frequency * time(step, dt) + self.phase).sin()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SumOfSines {
    components: Vec<Sine>,
}

impl SumOfSines {
    /// # Errors
    ///
    /// Returns [`SignalError::Empty`] without components.
    pub fn new(components: Vec<Sine>) -> Result<Self, SignalError> {
        if components.is_empty() {
            return Err(SignalError::Empty);
        }
        Ok(Self { components })
    }

    #[must_use]
    pub fn components(&self) -> &[Sine] {
        &self.components
    }
}

impl Signal for SumOfSines {
    fn value(&self, step: usize, dt: f64) -> f64 {
        self.components.iter().map(|s| s.value(step, dt)).sum()
    }
}

/// Harmonic multisine sweep with a low crest factor.
///
/// Sums the harmonics `k * base_frequency`, `k = 1..=N`, with equal weights
/// `amplitude / N`, so the output never exceeds `amplitude`. Schroeder phases
/// `-pi k (k - 1) / N` keep the peaks of the sum low.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Multisine {
    amplitude: f64,
    base_frequency: f64,
    phases: Vec<f64>,
}

impl Multisine {
    /// Multisine with Schroeder phases.
    ///
    /// # Errors
    ///
    /// Fails for an empty set of harmonics or invalid amplitude and frequency.
    pub fn schroeder(amplitude: f64, base_frequency: f64, harmonics: usize) -> Result<Self, SignalError> {
        let n = harmonics as f64;
        let phases = (1..=harmonics)
            .map(|k| {
                let k = k as f64;
                -PI * k * (k - 1.0) / n
            })
            .collect();
        Self::with_phases(amplitude, base_frequency, phases)
    }

    /// Multisine with phases drawn uniformly from `[0, 2 pi)`.
    ///
    /// # Errors
    ///
    /// See [`Multisine::schroeder`].
    pub fn random_phase(
        amplitude: f64,
        base_frequency: f64,
        harmonics: usize,
        seed: u64,
    ) -> Result<Self, SignalError> {
        let mut rng = Rng::with_seed(seed);
        let phases = (0..harmonics).map(|_| rng.f64() * TAU).collect();
        Self::with_phases(amplitude, base_frequency, phases)
    }

    fn with_phases(amplitude: f64, base_frequency: f64, phases: Vec<f64>) -> Result<Self, SignalError> {
        require_non_negative("amplitude", amplitude)?;
        require_positive("base_frequency", base_frequency)?;
        if phases.is_empty() {
            return Err(SignalError::Empty);
        }
        Ok(Self { amplitude, base_frequency, phases })
    }

    #[must_use]
    pub fn phases(&self) -> &[f64] {
        &self.phases
    }
}

impl Signal for Multisine {
    fn value(&self, step: usize, dt: f64) -> f64 {
        let t = time(step, dt);
        let sum: f64 = self
            .phases
            .iter()
            .zip(1_u32..)
            .map(|(phase, k)| (TAU * f64::from(k) * self.base_frequency * t + phase).cos())
            .sum();
        self.amplitude * sum / self.phases.len() as f64
    }
}

/// Pseudo-random binary sequence from a maximal-length shift register.
///
/// One full period of `2^order - 1` bits is generated up front; each bit is
/// held for `hold` steps and mapped to `+amplitude` or `-amplitude`.
#[derive(Debug, Clone, PartialEq)]
pub struct Prbs {
    amplitude: f64,
    hold: usize,
    bits: Vec<bool>,
}

impl Prbs {
    /// The register starts from a non-zero state derived from `seed`.
    ///
    /// # Errors
    ///
    /// Fails for an order outside `2..=16`, a zero hold or a negative amplitude.
    pub fn new(order: u32, amplitude: f64, hold: usize, seed: u64) -> Result<Self, SignalError> {
        if !(2..=16).contains(&order) {
            return Err(SignalError::InvalidOrder(order));
        }
        if hold == 0 {
            return Err(SignalError::ZeroHold);
        }
        require_non_negative("amplitude", amplitude)?;

        let taps = LFSR_TAPS[(order - 2) as usize];
        let period = (1_u32 << order) - 1;
        let start = (seed % u64::from(period)) as u32 + 1;
        let mut state = start;
        let mut bits = Vec::with_capacity(period as usize);
        loop {
            bits.push(state & 1 == 1);
            let feedback = taps.iter().fold(0, |acc, tap| acc ^ (state >> (order - tap)) & 1);
            state = (state >> 1) | (feedback << (order - 1));
            if state == start {
                break;
            }
        }
        tracing::debug!(order, period = bits.len(), "generated PRBS period");
        Ok(Self { amplitude, hold, bits })
    }

    /// Number of bits before the sequence repeats.
    #[must_use]
    pub fn period(&self) -> usize {
        self.bits.len()
    }

    #[must_use]
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }
}

impl Signal for Prbs {
    fn value(&self, step: usize, _dt: f64) -> f64 {
        if self.bits[(step / self.hold) % self.bits.len()] {
            self.amplitude
        } else {
            -self.amplitude
        }
    }
}

/// Plays a [`Signal`] as a one-dimensional action.
#[derive(Debug, Clone)]
pub struct SignalController<S> {
    signal: S,
    dt: f64,
    step: usize,
}

impl<S: Signal> SignalController<S> {
    /// # Errors
    ///
    /// Returns [`SignalError::NonPositive`] for a non-positive `dt`.
    pub fn new(signal: S, dt: f64) -> Result<Self, SignalError> {
        require_positive("dt", dt)?;
        Ok(Self { signal, dt, step: 0 })
    }

    #[must_use]
    pub fn signal(&self) -> &S {
        &self.signal
    }

    /// Steps emitted since construction or the last reset.
    #[must_use]
    pub fn step(&self) -> usize {
        self.step
    }
}

impl<O, S: Signal> Controller<O, Vec<f64>> for SignalController<S> {
    fn act(&mut self, _observation: &O) -> Vec<f64> {
        let value = self.signal.value(self.step, self.dt);
        self.step += 1;
        vec![value]
    }

    fn reset(&mut self) {
        self.step = 0;
    }
}
