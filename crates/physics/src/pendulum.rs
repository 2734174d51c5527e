//! Torque-driven pendulum swinging about a fixed pivot.
//!
//! The classic swing-up task: `θ = 0` is upright and positive angles turn
//! counter-clockwise. Every step costs `θ² + 0.1·θ'² + 0.001·u²`, evaluated on
//! the state before the step, and the episode never terminates on its own.
//! The angular velocity is clamped after each semi-implicit Euler update,
//! before the angle is advanced.

use std::f64::consts::PI;

use fastrand::Rng;
use render::canvas::BLACK;
use render::{Canvas, Frame, RenderMode};
use serde::{Deserialize, Serialize};

use crate::angle::{bound, wrap_angle};
use crate::env::{present, reseed, Environment, Info, ResetOptions, Step};
use crate::error::{require_finite, require_len, require_positive, EnvError};
use crate::space::{uniform, BoxSpace};

const SCREEN_DIM: u32 = 500;
const ROD_COLOR: [u8; 3] = [204, 77, 77];
const RESET_SPEED: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PendulumConfig {
    pub dt: f64,
    pub gravity: f64,
    pub mass: f64,
    pub length: f64,
    pub max_speed: f64,
    pub max_torque: f64,
}

impl Default for PendulumConfig {
    fn default() -> Self {
        Self {
            dt: 0.05,
            gravity: 10.0,
            mass: 1.0,
            length: 1.0,
            max_speed: 8.0,
            max_torque: 2.0,
        }
    }
}

impl PendulumConfig {
    /// # Errors
    ///
    /// Returns [`EnvError::InvalidConfiguration`] for non-physical parameters.
    pub fn validate(&self) -> Result<(), EnvError> {
        require_positive("dt", self.dt)?;
        require_finite("gravity", self.gravity)?;
        require_positive("mass", self.mass)?;
        require_positive("length", self.length)?;
        require_positive("max_speed", self.max_speed)?;
        require_positive("max_torque", self.max_torque)
    }
}

/// Angular acceleration of a uniform rod under gravity and `torque`.
#[must_use]
pub fn angular_acceleration(config: &PendulumConfig, theta: f64, torque: f64) -> f64 {
    let (g, m, l) = (config.gravity, config.mass, config.length);
    3.0 * g / (2.0 * l) * theta.sin() + 3.0 / (m * l * l) * torque
}

/// The pendulum system.
///
/// Observations are `[cos θ, sin θ, θ']`.
pub struct PendulumEnv {
    config: PendulumConfig,
    observation_space: BoxSpace,
    action_space: BoxSpace,
    render_mode: Option<RenderMode>,
    state: Option<[f64; 2]>,
    rng: Rng,
}

impl PendulumEnv {
    /// # Errors
    ///
    /// Returns [`EnvError::InvalidConfiguration`] if `config` is invalid.
    pub fn new(config: PendulumConfig, render_mode: Option<RenderMode>) -> Result<Self, EnvError> {
        config.validate()?;
        let observation_space = BoxSpace::symmetric(vec![1.0, 1.0, config.max_speed])?;
        let action_space = BoxSpace::symmetric(vec![config.max_torque])?;
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
    pub fn config(&self) -> &PendulumConfig {
        &self.config
    }

    /// Copy of the internal `[θ, θ']`, if the system was reset.
    #[must_use]
    pub fn state(&self) -> Option<[f64; 2]> {
        self.state
    }

    fn observation([theta, theta_dot]: [f64; 2]) -> Vec<f64> {
        vec![theta.cos(), theta.sin(), theta_dot]
    }

    fn draw(&self, [theta, _]: [f64; 2]) -> Canvas {
        let mut canvas = Canvas::new(SCREEN_DIM, SCREEN_DIM);
        let extent = 2.2;
        let scale = f64::from(SCREEN_DIM) / (extent * 2.0);
        let offset = f64::from(SCREEN_DIM) / 2.0;
        let to_px = |x: f64, y: f64| (x * scale + offset, y * scale + offset);

        let pivot = to_px(0.0, 0.0);
        let length = self.config.length;
        let tip = to_px(-length * theta.sin(), length * theta.cos());
        canvas.draw_line(pivot, tip, 0.2 * scale, ROD_COLOR);
        canvas.fill_circle(pivot, 0.1 * scale, ROD_COLOR);
        canvas.fill_circle(tip, 0.1 * scale, ROD_COLOR);
        canvas.fill_circle(pivot, 0.05 * scale, BLACK);
        canvas
    }
}

impl Environment for PendulumEnv {
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

    /// Starts from `θ` uniform in `[-π, π]` and `θ'` uniform in `[-1, 1]`.
    /// Explicit `low`/`high` options apply to both components.
    fn reset(
        &mut self,
        seed: Option<u64>,
        options: Option<&ResetOptions>,
    ) -> Result<(Vec<f64>, Info), EnvError> {
        reseed(&mut self.rng, seed);
        let state = match ResetOptions::fixed_state::<2>(options)? {
            Some([theta, theta_dot]) => [wrap_angle(theta), theta_dot],
            None => {
                let custom = options.is_some_and(|o| o.low.is_some() || o.high.is_some());
                let (speed_low, speed_high) = ResetOptions::bounds(options, -RESET_SPEED, RESET_SPEED)?;
                let (angle_low, angle_high) = if custom { (speed_low, speed_high) } else { (-PI, PI) };
                let theta = uniform(&mut self.rng, angle_low, angle_high);
                let theta_dot = uniform(&mut self.rng, speed_low, speed_high);
                [wrap_angle(theta), theta_dot]
            }
        };
        self.state = Some(state);
        tracing::debug!(?state, "pendulum reset");
        if self.render_mode == Some(RenderMode::Human) {
            self.render()?;
        }
        Ok((Self::observation(state), Info::new()))
    }

    fn step(&mut self, action: &Vec<f64>) -> Result<Step<Vec<f64>>, EnvError> {
        let [theta, theta_dot] = self.state.ok_or(EnvError::InvalidLifecycle("call reset before step"))?;
        require_len(1, action.len())?;
        let torque = action[0].clamp(-self.config.max_torque, self.config.max_torque);

        let cost = theta * theta + 0.1 * theta_dot * theta_dot + 0.001 * torque * torque;
        let accel = angular_acceleration(&self.config, theta, torque);
        let max_speed = self.config.max_speed;
        let theta_dot = bound(theta_dot + accel * self.config.dt, -max_speed, max_speed);
        let next = [wrap_angle(theta + theta_dot * self.config.dt), theta_dot];

        self.state = Some(next);
        tracing::trace!(?next, torque, "pendulum step");
        if self.render_mode == Some(RenderMode::Human) {
            self.render()?;
        }
        Ok(Step {
            observation: Self::observation(next),
            reward: -cost,
            terminated: false,
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
