//! Inverted pendulum on a cart with a continuous force input.
//!
//! A pole is hinged on top of a cart that moves along a frictionless track.
//! The dynamics are the classic cart-pole equations of motion (Florian, 2005):
//!
//! ```text
//! temp  = (F + m_p l θ'² sin θ) / M
//! θ''   = (g sin θ - cos θ · temp) / (l (4/3 - m_p cos² θ / M))
//! x''   = temp - m_p l θ'' cos θ / M
//! ```
//!
//! with `l` the pole half-length and `M` the total mass. The angle is measured
//! from upright and kept in `(-pi, pi]`. An episode ends when the state stops
//! being finite, the cart leaves the track, or the pole tilts past the
//! threshold.

use fastrand::Rng;
use render::canvas::BLACK;
use render::{Canvas, Frame, RenderMode};
use serde::{Deserialize, Serialize};

use crate::angle::wrap_angle;
use crate::env::{present, reseed, Environment, Info, ResetOptions, Step};
use crate::error::{require_finite, require_len, require_positive, EnvError};
use crate::integrator::Integrator;
use crate::space::{uniform, BoxSpace};

const SCREEN_WIDTH: u32 = 600;
const SCREEN_HEIGHT: u32 = 400;
const RESET_NOISE: f64 = 0.01;

/// Configuration for an [`InvertedPendulumEnv`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvertedPendulumConfig {
    /// Cart mass in kg
    pub masscart: f64,
    /// Pole mass in kg
    pub masspole: f64,
    /// Full pole length in meters
    pub length: f64,
    pub gravity: f64,
    /// Force magnitude limit on the cart
    pub force_max: f64,
    /// Position threshold for failure detection (meters)
    pub x_threshold: f64,
    /// Angle threshold for failure detection (degrees)
    pub theta_threshold: f64,
    /// Nominal pole angle at reset (radians)
    pub theta_initial: f64,
    pub dt: f64,
    pub integrator: Integrator,
}

impl Default for InvertedPendulumConfig {
    fn default() -> Self {
        Self {
            masscart: 1.0,
            masspole: 0.1,
            length: 1.0,
            gravity: 9.81,
            force_max: 10.0,
            x_threshold: 3.0,
            theta_threshold: 24.0,
            theta_initial: 0.0,
            dt: 0.02,
            integrator: Integrator::SemiImplicitEuler,
        }
    }
}

impl InvertedPendulumConfig {
    /// # Errors
    ///
    /// Returns [`EnvError::InvalidConfiguration`] for non-physical parameters.
    pub fn validate(&self) -> Result<(), EnvError> {
        require_positive("masscart", self.masscart)?;
        require_positive("masspole", self.masspole)?;
        require_positive("length", self.length)?;
        require_finite("gravity", self.gravity)?;
        require_positive("force_max", self.force_max)?;
        require_positive("x_threshold", self.x_threshold)?;
        require_positive("theta_threshold", self.theta_threshold)?;
        require_finite("theta_initial", self.theta_initial)?;
        require_positive("dt", self.dt)
    }

    fn total_mass(&self) -> f64 {
        self.masscart + self.masspole
    }

    fn half_length(&self) -> f64 {
        self.length / 2.0
    }

    /// Angle threshold in radians.
    #[must_use]
    pub fn theta_threshold_radians(&self) -> f64 {
        self.theta_threshold.to_radians()
    }
}

/// Cart and pole accelerations `(x'', θ'')` for `state = [x, x', θ, θ']`.
#[must_use]
pub fn cart_pole_accelerations(config: &InvertedPendulumConfig, state: [f64; 4], force: f64) -> (f64, f64) {
    let [_, _, theta, theta_dot] = state;
    let total_mass = config.total_mass();
    let polemass_length = config.masspole * config.half_length();
    let (sintheta, costheta) = theta.sin_cos();

    let temp = (force + polemass_length * theta_dot * theta_dot * sintheta) / total_mass;
    let theta_acc = (config.gravity * sintheta - costheta * temp)
        / (config.half_length() * (4.0 / 3.0 - config.masspole * costheta * costheta / total_mass));
    let x_acc = temp - polemass_length * theta_acc * costheta / total_mass;
    (x_acc, theta_acc)
}

/// The inverted pendulum system.
pub struct InvertedPendulumEnv {
    config: InvertedPendulumConfig,
    observation_space: BoxSpace,
    action_space: BoxSpace,
    render_mode: Option<RenderMode>,
    /// `[x, x', θ, θ']`
    state: Option<[f64; 4]>,
    /// Steps taken since the first terminal step, if any.
    steps_beyond_terminated: Option<usize>,
    rng: Rng,
}

impl InvertedPendulumEnv {
    /// # Errors
    ///
    /// Returns [`EnvError::InvalidConfiguration`] if `config` is invalid.
    pub fn new(config: InvertedPendulumConfig, render_mode: Option<RenderMode>) -> Result<Self, EnvError> {
        config.validate()?;
        // Twice the thresholds so a failing observation is still inside the box.
        let unbounded = f64::from(f32::MAX);
        let observation_space = BoxSpace::symmetric(vec![
            config.x_threshold * 2.0,
            unbounded,
            config.theta_threshold_radians() * 2.0,
            unbounded,
        ])?;
        let action_space = BoxSpace::symmetric(vec![config.force_max])?;
        Ok(Self {
            config,
            observation_space,
            action_space,
            render_mode,
            state: None,
            steps_beyond_terminated: None,
            rng: Rng::new(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &InvertedPendulumConfig {
        &self.config
    }

    /// Copy of the current `[x, x', θ, θ']`, if the system was reset.
    #[must_use]
    pub fn state(&self) -> Option<[f64; 4]> {
        self.state
    }

    fn is_terminal(&self, state: [f64; 4]) -> bool {
        let [x, _, theta, _] = state;
        state.iter().any(|v| !v.is_finite())
            || x.abs() > self.config.x_threshold
            || theta.abs() > self.config.theta_threshold_radians()
    }

    fn reward(&mut self, terminated: bool) -> f64 {
        if !terminated {
            return 1.0;
        }
        match self.steps_beyond_terminated {
            None => {
                // The pole just fell.
                self.steps_beyond_terminated = Some(0);
                1.0
            }
            Some(steps) => {
                if steps == 0 {
                    tracing::warn!(
                        "step() called after the episode terminated; call reset() first, \
                         further steps are undefined behavior"
                    );
                }
                self.steps_beyond_terminated = Some(steps + 1);
                0.0
            }
        }
    }

    fn draw(&self, [x, _, theta, _]: [f64; 4]) -> Canvas {
        let mut canvas = Canvas::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        let width = f64::from(SCREEN_WIDTH);
        let scale = width / (self.config.x_threshold * 2.0);
        let pole_width = 10.0;
        let pole_len = scale * self.config.length;
        let (cart_width, cart_height) = (50.0, 30.0);

        let cart_x = x * scale + width / 2.0;
        let cart_y = 100.0;
        canvas.draw_line((0.0, cart_y), (width, cart_y), 1.0, BLACK);
        canvas.fill_rect(
            (cart_x - cart_width / 2.0, cart_y - cart_height / 2.0),
            (cart_x + cart_width / 2.0, cart_y + cart_height / 2.0),
            BLACK,
        );

        let axle = (cart_x, cart_y + cart_height / 4.0);
        // Positive θ tilts the pole towards +x.
        let (sin, cos) = theta.sin_cos();
        let tip = (axle.0 + pole_len * sin, axle.1 + pole_len * cos);
        canvas.draw_line(axle, tip, pole_width, [202, 152, 101]);
        canvas.fill_circle(axle, pole_width / 2.0, [129, 132, 203]);
        canvas
    }
}

impl Environment for InvertedPendulumEnv {
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
        let state = match ResetOptions::fixed_state::<4>(options)? {
            Some(state) => state,
            None => {
                let (low, high) = ResetOptions::bounds(options, -RESET_NOISE, RESET_NOISE)?;
                let nominal = [0.0, 0.0, self.config.theta_initial, 0.0];
                nominal.map(|v| v + uniform(&mut self.rng, low, high))
            }
        };
        self.state = Some(state);
        self.steps_beyond_terminated = None;
        tracing::debug!(?state, "inverted pendulum reset");
        if self.render_mode == Some(RenderMode::Human) {
            self.render()?;
        }
        Ok((state.to_vec(), Info::new()))
    }

    fn step(&mut self, action: &Vec<f64>) -> Result<Step<Vec<f64>>, EnvError> {
        let state = self.state.ok_or(EnvError::InvalidLifecycle("call reset before step"))?;
        require_len(1, action.len())?;
        let force = action[0].clamp(-self.config.force_max, self.config.force_max);

        let [x, x_dot, theta, theta_dot] = state;
        let (x_acc, theta_acc) = cart_pole_accelerations(&self.config, state, force);
        let ([x, theta], [x_dot, theta_dot]) =
            self.config
                .integrator
                .advance([x, theta], [x_dot, theta_dot], [x_acc, theta_acc], self.config.dt);
        let next = [x, x_dot, wrap_angle(theta), theta_dot];

        let mut info = Info::new();
        if next.iter().any(|v| !v.is_finite()) {
            tracing::warn!(?next, "inverted pendulum state diverged");
            info.insert("diverged", 1.0);
        }
        let terminated = self.is_terminal(next);
        let reward = self.reward(terminated);

        self.state = Some(next);
        tracing::trace!(?next, force, "inverted pendulum step");
        if self.render_mode == Some(RenderMode::Human) {
            self.render()?;
        }
        Ok(Step {
            observation: next.to_vec(),
            reward,
            terminated,
            truncated: false,
            info,
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
