//! Closed-loop rollouts of a controller against an environment.

use control::{Controller, Observer, RandomController};
use physics::Environment;

use crate::error::RolloutError;
use crate::record::{EpisodeEnd, TrajectoryRecord};

pub const DEFAULT_MAX_STEPS: usize = 500;
pub const DEFAULT_SEED: u64 = 16;

type DynController<'a, E> =
    dyn Controller<<E as Environment>::Observation, <E as Environment>::Action> + 'a;
type DynObserver<'a, E> = dyn Observer<<E as Environment>::Observation> + 'a;

/// Configures and runs a single episode.
///
/// ```rust,ignore
/// let record = Rollout::new(&mut env)
///     .controller(&mut controller)
///     .max_steps(200)
///     .seed(Some(0))
///     .simulate()?;
/// ```
///
/// Without a controller, actions are sampled uniformly from the action space
/// with a generator seeded from the rollout seed.
pub struct Rollout<'a, E: Environment> {
    env: &'a mut E,
    controller: Option<&'a mut DynController<'a, E>>,
    observer: Option<&'a mut DynObserver<'a, E>>,
    max_steps: usize,
    seed: Option<u64>,
}

impl<'a, E: Environment> Rollout<'a, E> {
    pub fn new(env: &'a mut E) -> Self {
        Self {
            env,
            controller: None,
            observer: None,
            max_steps: DEFAULT_MAX_STEPS,
            seed: Some(DEFAULT_SEED),
        }
    }

    #[must_use]
    pub fn controller(mut self, controller: &'a mut DynController<'a, E>) -> Self {
        self.controller = Some(controller);
        self
    }

    #[must_use]
    pub fn observer(mut self, observer: &'a mut DynObserver<'a, E>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Upper bound on the number of steps, on top of any wrapper limit.
    #[must_use]
    pub fn max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Runs the episode and returns what happened.
    ///
    /// The controller is queried once per step and the observer once after
    /// reset and once per step; neither is called after the episode ends.
    /// Afterwards frames are collected if the environment renders, and the
    /// environment is reset once more and closed.
    ///
    /// # Errors
    ///
    /// Propagates any environment error.
    pub fn simulate(self) -> Result<TrajectoryRecord<E::Observation, E::Action>, RolloutError> {
        let Rollout { env, controller, mut observer, max_steps, seed } = self;

        let mut fallback;
        let controller: &mut DynController<'_, E> = match controller {
            Some(controller) => controller,
            None => {
                fallback = RandomController::new(env.action_space().clone(), seed);
                &mut fallback
            }
        };
        controller.reset();
        if let Some(observer) = observer.as_deref_mut() {
            observer.reset();
        }

        let (mut observation, _) = env.reset(seed, None)?;
        let mut observations = vec![observation.clone()];
        let mut estimated_observations = Vec::new();
        if let Some(observer) = observer.as_deref_mut() {
            estimated_observations.push(observer.observe(&observation));
        }
        let mut actions = Vec::new();
        let mut rewards = Vec::new();

        let mut end = EpisodeEnd::BudgetExhausted;
        for _ in 0..max_steps {
            let action = controller.act(&observation);
            let step = env.step(&action)?;
            observation = step.observation;
            observations.push(observation.clone());
            actions.push(action);
            rewards.push(step.reward);
            if let Some(observer) = observer.as_deref_mut() {
                estimated_observations.push(observer.observe(&observation));
            }

            if step.terminated {
                end = EpisodeEnd::Terminated;
                break;
            }
            if step.truncated {
                end = EpisodeEnd::Truncated;
                break;
            }
        }

        let frames = if env.render_mode().is_some() {
            env.render()?
        } else {
            Vec::new()
        };
        env.reset(None, None)?;
        env.close();

        let record = TrajectoryRecord::new(
            observations,
            actions,
            estimated_observations,
            rewards,
            end,
            frames,
        );
        tracing::info!(
            steps = record.steps(),
            total_reward = record.total_reward(),
            end = ?record.end(),
            "rollout finished"
        );
        Ok(record)
    }
}

/// Function form of [`Rollout`].
///
/// # Errors
///
/// Propagates any environment error.
pub fn simulate<'a, E: Environment>(
    env: &'a mut E,
    controller: Option<&'a mut DynController<'a, E>>,
    observer: Option<&'a mut DynObserver<'a, E>>,
    max_steps: usize,
    seed: Option<u64>,
) -> Result<TrajectoryRecord<E::Observation, E::Action>, RolloutError> {
    Rollout { env, controller, observer, max_steps, seed }.simulate()
}
