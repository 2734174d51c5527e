use std::collections::BTreeMap;

use fastrand::Rng;
use render::{Frame, RenderMode};

use crate::error::{require_len, EnvError};
use crate::space::Space;

/// Auxiliary diagnostics returned alongside observations.
pub type Info = BTreeMap<&'static str, f64>;

/// Outcome of a single [`Environment::step`].
#[derive(Debug, Clone, PartialEq)]
pub struct Step<O> {
    pub observation: O,
    pub reward: f64,
    /// The system reached one of its terminal states.
    pub terminated: bool,
    /// The episode was cut short by an external budget.
    pub truncated: bool,
    pub info: Info,
}

impl<O> Step<O> {
    /// Whether the episode is over for either reason.
    #[must_use]
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// Overrides for the initial state drawn by [`Environment::reset`].
///
/// `low`/`high` replace the bounds of the uniform reset noise; `state` sets the
/// initial state exactly and takes precedence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResetOptions {
    pub low: Option<f64>,
    pub high: Option<f64>,
    pub state: Option<Vec<f64>>,
}

impl ResetOptions {
    #[must_use]
    pub fn with_bounds(low: f64, high: f64) -> Self {
        Self { low: Some(low), high: Some(high), state: None }
    }

    #[must_use]
    pub fn with_state(state: Vec<f64>) -> Self {
        Self { state: Some(state), ..Self::default() }
    }

    /// Resolves the reset noise bounds, falling back to the system defaults.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::InvalidConfiguration`] when the bounds are not finite
    /// or `low > high`.
    pub fn bounds(
        options: Option<&Self>,
        default_low: f64,
        default_high: f64,
    ) -> Result<(f64, f64), EnvError> {
        let low = options.and_then(|o| o.low).unwrap_or(default_low);
        let high = options.and_then(|o| o.high).unwrap_or(default_high);
        if !(low.is_finite() && high.is_finite()) || low > high {
            return Err(EnvError::InvalidConfiguration(format!(
                "reset bounds must satisfy low <= high, got [{low}, {high}]"
            )));
        }
        Ok((low, high))
    }

    /// Returns the explicit initial state, if one was requested.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::ShapeMismatch`] when the state has the wrong length.
    pub fn fixed_state<const N: usize>(options: Option<&Self>) -> Result<Option<[f64; N]>, EnvError> {
        match options.and_then(|o| o.state.as_deref()) {
            None => Ok(None),
            Some(state) => {
                require_len(N, state.len())?;
                let mut fixed = [0.0; N];
                fixed.copy_from_slice(state);
                Ok(Some(fixed))
            }
        }
    }
}

/// A simulated system driven one fixed time step at a time.
///
/// Inspired by the Gymnasium environment contract: `reset` starts an episode
/// and returns the first observation, each `step` applies one action and
/// reports the new observation, a reward and whether the episode ended.
/// Wrappers implement this same trait around an inner environment, so any
/// stack of them is itself an environment.
pub trait Environment {
    type Observation: Clone;
    type Action: Clone;
    type ObservationSpace: Space<Element = Self::Observation>;
    type ActionSpace: Space<Element = Self::Action>;

    fn observation_space(&self) -> &Self::ObservationSpace;

    fn action_space(&self) -> &Self::ActionSpace;

    /// Starts a new episode.
    ///
    /// When `seed` is given the environment's random source is reseeded from
    /// it before the initial state is drawn.
    ///
    /// # Errors
    ///
    /// Fails on invalid `options` or when rendering fails in `human` mode.
    fn reset(
        &mut self,
        seed: Option<u64>,
        options: Option<&ResetOptions>,
    ) -> Result<(Self::Observation, Info), EnvError>;

    /// Advances the system by one time step.
    ///
    /// # Errors
    ///
    /// Fails with [`EnvError::InvalidLifecycle`] when called out of order and
    /// with [`EnvError::ShapeMismatch`] for malformed actions.
    fn step(&mut self, action: &Self::Action) -> Result<Step<Self::Observation>, EnvError>;

    /// Renders the current state.
    ///
    /// Raw systems return at most one frame; frame-collecting wrappers return
    /// everything buffered since the last reset. Without a render mode the
    /// result is empty.
    ///
    /// # Errors
    ///
    /// Fails with [`EnvError::InvalidConfiguration`] when the render mode has
    /// no backend.
    fn render(&mut self) -> Result<Vec<Frame>, EnvError>;

    fn render_mode(&self) -> Option<RenderMode>;

    /// Releases any rendering resources.
    fn close(&mut self) {}
}

/// Replaces `rng` with a generator seeded from `seed`, if any.
pub(crate) fn reseed(rng: &mut Rng, seed: Option<u64>) {
    if let Some(seed) = seed {
        *rng = Rng::with_seed(seed);
    }
}

/// Presents `canvas` through the configured render mode, if any.
pub(crate) fn present(
    mode: Option<RenderMode>,
    canvas: impl FnOnce() -> render::Canvas,
) -> Result<Vec<Frame>, EnvError> {
    match mode {
        None => {
            tracing::warn!("render called without a render mode; returning no frame");
            Ok(Vec::new())
        }
        Some(mode) => Ok(vec![mode.present(canvas())?]),
    }
}
