use physics::{EnvError, Environment, Info, ResetOptions, Step};
use render::{Frame, RenderMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Readiness {
    Ready,
    NotReady,
}

/// Rejects `step` unless an episode is running, and `render` before the
/// first `reset`.
///
/// The environment becomes ready on `reset` and stops being ready as soon as
/// a step reports termination or truncation. The final state of an ended
/// episode can still be rendered.
pub struct OrderEnforcing<E> {
    inner: E,
    readiness: Readiness,
    has_reset: bool,
}

impl<E: Environment> OrderEnforcing<E> {
    pub fn new(inner: E) -> Self {
        Self { inner, readiness: Readiness::NotReady, has_reset: false }
    }

    /// Whether `step` may be called.
    pub fn is_ready(&self) -> bool {
        self.readiness == Readiness::Ready
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut E {
        &mut self.inner
    }

    pub fn into_inner(self) -> E {
        self.inner
    }
}

impl<E: Environment> Environment for OrderEnforcing<E> {
    type Observation = E::Observation;
    type Action = E::Action;
    type ObservationSpace = E::ObservationSpace;
    type ActionSpace = E::ActionSpace;

    fn observation_space(&self) -> &Self::ObservationSpace {
        self.inner.observation_space()
    }

    fn action_space(&self) -> &Self::ActionSpace {
        self.inner.action_space()
    }

    fn reset(
        &mut self,
        seed: Option<u64>,
        options: Option<&ResetOptions>,
    ) -> Result<(Self::Observation, Info), EnvError> {
        let result = self.inner.reset(seed, options)?;
        self.readiness = Readiness::Ready;
        self.has_reset = true;
        Ok(result)
    }

    fn step(&mut self, action: &Self::Action) -> Result<Step<Self::Observation>, EnvError> {
        if self.readiness == Readiness::NotReady {
            return Err(EnvError::InvalidLifecycle(
                "cannot step before reset or after the episode ended",
            ));
        }
        let step = self.inner.step(action)?;
        if step.done() {
            self.readiness = Readiness::NotReady;
        }
        Ok(step)
    }

    fn render(&mut self) -> Result<Vec<Frame>, EnvError> {
        if !self.has_reset {
            return Err(EnvError::InvalidLifecycle("cannot render before reset"));
        }
        self.inner.render()
    }

    fn render_mode(&self) -> Option<RenderMode> {
        self.inner.render_mode()
    }

    fn close(&mut self) {
        self.inner.close();
    }
}
