use physics::{EnvError, Environment, Info, ResetOptions, Space, Step};
use render::{Frame, RenderMode};

/// Passive contract checks around an environment.
///
/// Logs a warning whenever an observation leaves the observation space, an
/// action leaves the action space, or a reward is not finite. Results are
/// passed through untouched.
pub struct EnvChecker<E> {
    inner: E,
}

impl<E: Environment> EnvChecker<E> {
    pub fn new(inner: E) -> Self {
        Self { inner }
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

    fn check_observation(&self, observation: &E::Observation, during: &'static str) {
        if !self.inner.observation_space().contains(observation) {
            tracing::warn!(during, "observation is outside the observation space");
        }
    }
}

impl<E: Environment> Environment for EnvChecker<E> {
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
        let (observation, info) = self.inner.reset(seed, options)?;
        self.check_observation(&observation, "reset");
        Ok((observation, info))
    }

    fn step(&mut self, action: &Self::Action) -> Result<Step<Self::Observation>, EnvError> {
        if !self.inner.action_space().contains(action) {
            tracing::warn!("action is outside the action space and will be clamped");
        }
        let step = self.inner.step(action)?;
        self.check_observation(&step.observation, "step");
        if !step.reward.is_finite() {
            tracing::warn!(reward = step.reward, "reward is not finite");
        }
        Ok(step)
    }

    fn render(&mut self) -> Result<Vec<Frame>, EnvError> {
        self.inner.render()
    }

    fn render_mode(&self) -> Option<RenderMode> {
        self.inner.render_mode()
    }

    fn close(&mut self) {
        self.inner.close();
    }
}
