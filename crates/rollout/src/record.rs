use std::io::Write;

use render::Frame;
use serde::{Deserialize, Serialize};

use crate::error::RolloutError;

/// Why a rollout stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeEnd {
    /// The system reached a terminal state.
    Terminated,
    /// The environment's step limit cut the episode short.
    Truncated,
    /// The rollout's own step budget ran out first.
    BudgetExhausted,
}

/// Everything recorded during one rollout.
///
/// `observations` and, when an observer was attached,
/// `estimated_observations` hold one entry more than `actions` and
/// `rewards`: the observation right after reset comes first.
#[derive(Debug, Clone, Serialize)]
pub struct TrajectoryRecord<O, A> {
    observations: Vec<O>,
    actions: Vec<A>,
    estimated_observations: Vec<O>,
    rewards: Vec<f64>,
    end: EpisodeEnd,
    #[serde(skip)]
    frames: Vec<Frame>,
}

impl<O, A> TrajectoryRecord<O, A> {
    pub(crate) fn new(
        observations: Vec<O>,
        actions: Vec<A>,
        estimated_observations: Vec<O>,
        rewards: Vec<f64>,
        end: EpisodeEnd,
        frames: Vec<Frame>,
    ) -> Self {
        Self { observations, actions, estimated_observations, rewards, end, frames }
    }

    pub fn observations(&self) -> &[O] {
        &self.observations
    }

    pub fn actions(&self) -> &[A] {
        &self.actions
    }

    /// Observer estimates; empty when the rollout ran without an observer.
    pub fn estimated_observations(&self) -> &[O] {
        &self.estimated_observations
    }

    pub fn rewards(&self) -> &[f64] {
        &self.rewards
    }

    /// Frames rendered during the episode; empty without a render mode.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }

    pub fn end(&self) -> EpisodeEnd {
        self.end
    }

    /// Number of completed steps.
    pub fn steps(&self) -> usize {
        self.actions.len()
    }

    /// Undiscounted sum of rewards.
    pub fn total_reward(&self) -> f64 {
        self.rewards.iter().sum()
    }
}

impl<O: Serialize, A: Serialize> TrajectoryRecord<O, A> {
    /// Serializes the record, without frames, as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RolloutError::Export`] if serialization fails.
    pub fn to_json(&self) -> Result<String, RolloutError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the JSON form of the record to `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`RolloutError::Export`] on serialization or I/O failure.
    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), RolloutError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}
