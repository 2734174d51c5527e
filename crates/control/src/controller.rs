use fastrand::Rng;
use physics::Space;

/// Maps observations to actions.
///
/// Any `FnMut(&O) -> A` closure is a controller, so simple feedback laws need
/// no dedicated type:
///
/// ```rust,ignore
/// let mut bang_bang = |obs: &Vec<f64>| vec![if obs[0] < 0.0 { 10.0 } else { -10.0 }];
/// ```
pub trait Controller<O, A> {
    fn act(&mut self, observation: &O) -> A;

    /// Called at the start of every episode.
    fn reset(&mut self) {}
}

impl<O, A, F> Controller<O, A> for F
where
    F: FnMut(&O) -> A,
{
    fn act(&mut self, observation: &O) -> A {
        self(observation)
    }
}

/// Always returns the same action.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantController<A> {
    action: A,
}

impl<A: Clone> ConstantController<A> {
    pub fn new(action: A) -> Self {
        Self { action }
    }
}

impl<O, A: Clone> Controller<O, A> for ConstantController<A> {
    fn act(&mut self, _observation: &O) -> A {
        self.action.clone()
    }
}

/// Samples uniformly from an action space, ignoring the observation.
pub struct RandomController<S> {
    space: S,
    rng: Rng,
}

impl<S: Space> RandomController<S> {
    /// Creates a sampler over `space`, seeded from `seed` when given.
    pub fn new(space: S, seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(Rng::new, Rng::with_seed);
        Self { space, rng }
    }

    pub fn space(&self) -> &S {
        &self.space
    }
}

impl<O, S: Space> Controller<O, S::Element> for RandomController<S> {
    fn act(&mut self, _observation: &O) -> S::Element {
        self.space.sample(&mut self.rng)
    }
}
