use physics::{EnvError, Environment, Info, ResetOptions, Step};
use render::{Frame, RenderMode};

/// Truncates episodes after a fixed number of steps.
///
/// The step reaching the budget is reported as truncated and carries the
/// step count under `elapsed_steps` in its info, as does every other step.
pub struct StepLimit<E> {
    inner: E,
    max_steps: usize,
    elapsed_steps: Option<usize>,
}

impl<E: Environment> StepLimit<E> {
    /// # Errors
    ///
    /// Returns [`EnvError::InvalidConfiguration`] for a zero budget.
    pub fn new(inner: E, max_steps: usize) -> Result<Self, EnvError> {
        if max_steps == 0 {
            return Err(EnvError::InvalidConfiguration(
                "max_steps must be at least 1".to_string(),
            ));
        }
        Ok(Self { inner, max_steps, elapsed_steps: None })
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Steps taken in the current episode, if one was started.
    pub fn elapsed_steps(&self) -> Option<usize> {
        self.elapsed_steps
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

impl<E: Environment> Environment for StepLimit<E> {
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
        self.elapsed_steps = Some(0);
        Ok(result)
    }

    fn step(&mut self, action: &Self::Action) -> Result<Step<Self::Observation>, EnvError> {
        let elapsed = self
            .elapsed_steps
            .ok_or(EnvError::InvalidLifecycle("call reset before step"))?;
        if elapsed >= self.max_steps {
            return Err(EnvError::InvalidLifecycle(
                "step budget exhausted; call reset to start a new episode",
            ));
        }
        let mut step = self.inner.step(action)?;
        let elapsed = elapsed + 1;
        self.elapsed_steps = Some(elapsed);
        step.info.insert("elapsed_steps", elapsed as f64);
        if elapsed >= self.max_steps {
            tracing::debug!(max_steps = self.max_steps, "episode truncated");
            step.truncated = true;
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
