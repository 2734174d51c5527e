use physics::{EnvError, Environment, Info, ResetOptions, Step};
use render::{Frame, RenderMode};

/// Buffers one frame per reset and step in `rgb_array` mode.
///
/// [`Environment::render`] hands out every frame collected since the last
/// reset and empties the buffer. In any other mode calls pass through.
pub struct FrameCollector<E> {
    inner: E,
    frames: Vec<Frame>,
}

impl<E: Environment> FrameCollector<E> {
    pub fn new(inner: E) -> Self {
        Self { inner, frames: Vec::new() }
    }

    fn collecting(&self) -> bool {
        self.inner.render_mode() == Some(RenderMode::RgbArray)
    }

    fn capture(&mut self) -> Result<(), EnvError> {
        if self.collecting() {
            let frames = self.inner.render()?;
            self.frames.extend(frames);
        }
        Ok(())
    }

    /// Frames buffered so far.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
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

impl<E: Environment> Environment for FrameCollector<E> {
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
        self.frames.clear();
        let result = self.inner.reset(seed, options)?;
        self.capture()?;
        Ok(result)
    }

    fn step(&mut self, action: &Self::Action) -> Result<Step<Self::Observation>, EnvError> {
        let step = self.inner.step(action)?;
        self.capture()?;
        Ok(step)
    }

    fn render(&mut self) -> Result<Vec<Frame>, EnvError> {
        if self.collecting() {
            Ok(std::mem::take(&mut self.frames))
        } else {
            self.inner.render()
        }
    }

    fn render_mode(&self) -> Option<RenderMode> {
        self.inner.render_mode()
    }

    fn close(&mut self) {
        self.frames.clear();
        self.inner.close();
    }
}
