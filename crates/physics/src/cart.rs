//! Frictionless cart on a flat track (double integrator).
//!
//! The cart's acceleration equals the applied force, `q'' = u`. It is
//! integrated with semi-implicit Euler; velocity and position are hard-limited
//! and hitting a position limit stops the cart. The episode succeeds once the
//! cart is at least `goal_position` away from the origin while moving at least
//! `goal_velocity` fast.

use fastrand::Rng;
use render::canvas::BLACK;
use render::{Canvas, Frame, RenderMode};
use serde::{Deserialize, Serialize};

use crate::env::{present, reseed, Environment, Info, ResetOptions, Step};
use crate::error::{require_finite, require_len, require_positive, EnvError};
use crate::space::{uniform, BoxSpace};

const SCREEN_WIDTH: u32 = 600;
const SCREEN_HEIGHT: u32 = 400;
const TRACK_HEIGHT: f64 = 0.55;
const GOAL_REWARD: f64 = 100.0;
const EFFORT_PENALTY: f64 = 0.1;

/// Configuration for a [`CartEnv`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartConfig {
    /// Track half-length; the cart stops at `±max_position`.
    pub max_position: f64,
    pub max_speed: f64,
    pub max_force: f64,
    /// Distance from the origin the cart must reach.
    pub goal_position: f64,
    /// Speed the cart must have at the goal.
    pub goal_velocity: f64,
    /// Integration time step in seconds.
    pub dt: f64,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            max_position: 10.0,
            max_speed: 10.0,
            max_force: 10.0,
            goal_position: 9.0,
            goal_velocity: 0.0,
            dt: 1.0 / 30.0,
        }
    }
}

impl CartConfig {
    /// # Errors
    ///
    /// Returns [`EnvError::InvalidConfiguration`] for non-positive limits or a
    /// goal that is not strictly inside the track.
    pub fn validate(&self) -> Result<(), EnvError> {
        require_positive("max_position", self.max_position)?;
        require_positive("max_speed", self.max_speed)?;
        require_positive("max_force", self.max_force)?;
        require_positive("dt", self.dt)?;
        require_finite("goal_position", self.goal_position)?;
        require_finite("goal_velocity", self.goal_velocity)?;
        if self.goal_position.abs() >= self.max_position {
            return Err(EnvError::InvalidConfiguration(format!(
                "goal position {} must be smaller in magnitude than max position {}",
                self.goal_position, self.max_position
            )));
        }
        if self.goal_velocity < 0.0 {
            return Err(EnvError::InvalidConfiguration(format!(
                "goal velocity must be non-negative, got {}",
                self.goal_velocity
            )));
        }
        Ok(())
    }
}

/// Advances `[position, velocity]` by one step under `force`.
///
/// `force` must already be clamped to the actuator limits.
#[must_use]
pub fn cart_dynamics(config: &CartConfig, [position, velocity]: [f64; 2], force: f64) -> [f64; 2] {
    let mut velocity = (velocity + force * config.dt).clamp(-config.max_speed, config.max_speed);
    let mut position = position + velocity * config.dt;
    if position.abs() > config.max_position {
        position = position.clamp(-config.max_position, config.max_position);
        velocity = 0.0;
    }
    [position, velocity]
}

/// The cart system.
pub struct CartEnv {
    config: CartConfig,
    observation_space: BoxSpace,
    action_space: BoxSpace,
    render_mode: Option<RenderMode>,
    state: Option<[f64; 2]>,
    rng: Rng,
}

impl CartEnv {
    /// # Errors
    ///
    /// Returns [`EnvError::InvalidConfiguration`] if `config` is inconsistent.
    pub fn new(config: CartConfig, render_mode: Option<RenderMode>) -> Result<Self, EnvError> {
        config.validate()?;
        let observation_space = BoxSpace::symmetric(vec![config.max_position, config.max_speed])?;
        let action_space = BoxSpace::symmetric(vec![config.max_force])?;
        Ok(Self {
            config,
            observation_space,
            action_space,
            render_mode,
            state: None,
            rng: Rng::new(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &CartConfig {
        &self.config
    }

    /// Copy of the current `[position, velocity]`, if the cart was reset.
    #[must_use]
    pub fn state(&self) -> Option<[f64; 2]> {
        self.state
    }

    fn is_terminal(&self, [position, velocity]: [f64; 2]) -> bool {
        position.abs() >= self.config.goal_position.abs() && velocity.abs() >= self.config.goal_velocity
    }

    fn draw(&self, [position, _]: [f64; 2]) -> Canvas {
        let mut canvas = Canvas::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        let min_position = -self.config.max_position;
        let scale = f64::from(SCREEN_WIDTH) / (2.0 * self.config.max_position);
        let ground = TRACK_HEIGHT * scale;
        let to_px = |x: f64| (x - min_position) * scale;

        canvas.draw_line((0.0, ground), (f64::from(SCREEN_WIDTH), ground), 1.0, BLACK);

        let (car_width, car_height, clearance) = (40.0, 20.0, 10.0);
        let cx = to_px(position);
        let bottom = ground + clearance;
        canvas.fill_rect(
            (cx - car_width / 2.0, bottom),
            (cx + car_width / 2.0, bottom + car_height),
            BLACK,
        );
        for offset in [car_width / 4.0, -car_width / 4.0] {
            canvas.fill_circle((cx + offset, bottom), car_height / 2.5, render::canvas::GREY);
        }

        let flag_x = to_px(self.config.goal_position);
        let flag_top = ground + 50.0;
        canvas.draw_line((flag_x, ground), (flag_x, flag_top), 1.0, BLACK);
        canvas.fill_polygon(
            &[(flag_x, flag_top), (flag_x, flag_top - 10.0), (flag_x + 25.0, flag_top - 5.0)],
            [204, 204, 0],
        );
        canvas
    }
}

impl Environment for CartEnv {
    type Observation = Vec<f64>;
    type Action = Vec<f64>;
    type ObservationSpace = BoxSpace;
    type ActionSpace = BoxSpace;

    fn observation_space(&self) -> &BoxSpace {
        &self.observation_space
    }

    fn action_space(&self) -> &BoxSpace {
        &self.action_space
    }

    fn reset(
        &mut self,
        seed: Option<u64>,
        options: Option<&ResetOptions>,
    ) -> Result<(Vec<f64>, Info), EnvError> {
        reseed(&mut self.rng, seed);
        let state = match ResetOptions::fixed_state::<2>(options)? {
            Some(state) => state,
            None => {
                let (low, high) = ResetOptions::bounds(options, -0.6, -0.4)?;
                [uniform(&mut self.rng, low, high), 0.0]
            }
        };
        self.state = Some(state);
        tracing::debug!(position = state[0], velocity = state[1], "cart reset");
        if self.render_mode == Some(RenderMode::Human) {
            self.render()?;
        }
        Ok((state.to_vec(), Info::new()))
    }

    fn step(&mut self, action: &Vec<f64>) -> Result<Step<Vec<f64>>, EnvError> {
        let state = self.state.ok_or(EnvError::InvalidLifecycle("call reset before step"))?;
        require_len(1, action.len())?;
        let force = action[0].clamp(-self.config.max_force, self.config.max_force);

        let next = cart_dynamics(&self.config, state, force);
        let terminated = self.is_terminal(next);
        let mut reward = if terminated { GOAL_REWARD } else { 0.0 };
        reward -= EFFORT_PENALTY * force * force;

        self.state = Some(next);
        tracing::trace!(position = next[0], velocity = next[1], force, "cart step");
        if terminated {
            tracing::debug!(position = next[0], "cart reached goal");
        }
        if self.render_mode == Some(RenderMode::Human) {
            self.render()?;
        }
        Ok(Step {
            observation: next.to_vec(),
            reward,
            terminated,
            truncated: false,
            info: Info::new(),
        })
    }

    fn render(&mut self) -> Result<Vec<Frame>, EnvError> {
        let state = self.state.ok_or(EnvError::InvalidLifecycle("call reset before render"))?;
        present(self.render_mode, || self.draw(state))
    }

    fn render_mode(&self) -> Option<RenderMode> {
        self.render_mode
    }
}
