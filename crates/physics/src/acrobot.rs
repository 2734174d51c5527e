//! Two-link underactuated pendulum with a continuous torque input.
//!
//! The first joint hangs from a fixed pivot and is passive; torque is applied
//! at the joint between the two links. The goal is to swing the free end above
//! a target height. Dynamics follow Sutton & Barto's acrobot ("book" variant
//! by default, or the NIPS'95 variant without the `θ1'²` coupling term) and are
//! integrated with RK4 over the state augmented by the torque.

use std::f64::consts::{FRAC_PI_2, PI};

use fastrand::Rng;
use render::canvas::BLACK;
use render::{Canvas, Frame, RenderMode};
use serde::{Deserialize, Serialize};

use crate::angle::{bound, wrap_angle};
use crate::env::{present, reseed, Environment, Info, ResetOptions, Step};
use crate::error::{require_finite, require_len, require_positive, EnvError};
use crate::integrator::rk4;
use crate::space::{uniform, BoxSpace};

const SCREEN_DIM: u32 = 500;
const RESET_NOISE: f64 = 0.1;

/// Which form of the second joint's equation of motion to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcrobotDynamics {
    #[default]
    Book,
    Nips,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcrobotConfig {
    pub dt: f64,
    pub link_length_1: f64,
    pub link_length_2: f64,
    pub link_mass_1: f64,
    pub link_mass_2: f64,
    /// Position of each link's center of mass along the link.
    pub link_com_pos_1: f64,
    pub link_com_pos_2: f64,
    /// Moment of inertia of both links.
    pub link_moi: f64,
    pub gravity: f64,
    pub max_vel_1: f64,
    pub max_vel_2: f64,
    pub max_torque: f64,
    /// Half-width of the uniform noise added to the applied torque.
    pub torque_noise_max: f64,
    /// Height of the free end, above the pivot, that ends the episode.
    pub target_height: f64,
    pub dynamics: AcrobotDynamics,
}

impl Default for AcrobotConfig {
    fn default() -> Self {
        Self {
            dt: 0.2,
            link_length_1: 1.0,
            link_length_2: 1.0,
            link_mass_1: 1.0,
            link_mass_2: 1.0,
            link_com_pos_1: 0.5,
            link_com_pos_2: 0.5,
            link_moi: 1.0,
            gravity: 9.8,
            max_vel_1: 4.0 * PI,
            max_vel_2: 9.0 * PI,
            max_torque: 1.0,
            torque_noise_max: 0.0,
            target_height: 1.0,
            dynamics: AcrobotDynamics::Book,
        }
    }
}

impl AcrobotConfig {
    /// # Errors
    ///
    /// Returns [`EnvError::InvalidConfiguration`] for non-physical parameters.
    pub fn validate(&self) -> Result<(), EnvError> {
        require_positive("dt", self.dt)?;
        require_positive("link_length_1", self.link_length_1)?;
        require_positive("link_length_2", self.link_length_2)?;
        require_positive("link_mass_1", self.link_mass_1)?;
        require_positive("link_mass_2", self.link_mass_2)?;
        require_positive("link_com_pos_1", self.link_com_pos_1)?;
        require_positive("link_com_pos_2", self.link_com_pos_2)?;
        require_positive("link_moi", self.link_moi)?;
        require_finite("gravity", self.gravity)?;
        require_positive("max_vel_1", self.max_vel_1)?;
        require_positive("max_vel_2", self.max_vel_2)?;
        require_positive("max_torque", self.max_torque)?;
        require_finite("target_height", self.target_height)?;
        if !(self.torque_noise_max.is_finite() && self.torque_noise_max >= 0.0) {
            return Err(EnvError::InvalidConfiguration(format!(
                "torque_noise_max must be finite and non-negative, got {}",
                self.torque_noise_max
            )));
        }
        Ok(())
    }
}

/// Time derivative of `[θ1, θ2, θ1', θ2', τ]`; the torque is held constant.
#[must_use]
pub fn acrobot_derivatives(config: &AcrobotConfig, s: &[f64; 5]) -> [f64; 5] {
    let m1 = config.link_mass_1;
    let m2 = config.link_mass_2;
    let l1 = config.link_length_1;
    let lc1 = config.link_com_pos_1;
    let lc2 = config.link_com_pos_2;
    let i1 = config.link_moi;
    let i2 = config.link_moi;
    let g = config.gravity;
    let [theta1, theta2, dtheta1, dtheta2, torque] = *s;

    let d1 = m1 * lc1 * lc1 + m2 * (l1 * l1 + lc2 * lc2 + 2.0 * l1 * lc2 * theta2.cos()) + i1 + i2;
    let d2 = m2 * (lc2 * lc2 + l1 * lc2 * theta2.cos()) + i2;
    let phi2 = m2 * lc2 * g * (theta1 + theta2 - FRAC_PI_2).cos();
    let phi1 = -m2 * l1 * lc2 * dtheta2 * dtheta2 * theta2.sin()
        - 2.0 * m2 * l1 * lc2 * dtheta2 * dtheta1 * theta2.sin()
        + (m1 * lc1 + m2 * l1) * g * (theta1 - FRAC_PI_2).cos()
        + phi2;
    let coupling = match config.dynamics {
        AcrobotDynamics::Nips => 0.0,
        AcrobotDynamics::Book => m2 * l1 * lc2 * dtheta1 * dtheta1 * theta2.sin(),
    };
    let ddtheta2 =
        (torque + d2 / d1 * phi1 - coupling - phi2) / (m2 * lc2 * lc2 + i2 - d2 * d2 / d1);
    let ddtheta1 = -(d2 * ddtheta2 + phi1) / d1;
    [dtheta1, dtheta2, ddtheta1, ddtheta2, 0.0]
}

/// Height of the free end above the pivot.
#[must_use]
pub fn tip_height(config: &AcrobotConfig, [theta1, theta2, _, _]: [f64; 4]) -> f64 {
    -config.link_length_1 * theta1.cos() - config.link_length_2 * (theta1 + theta2).cos()
}

/// The acrobot system.
///
/// Observations are `[cos θ1, sin θ1, cos θ2, sin θ2, θ1', θ2']`.
pub struct AcrobotEnv {
    config: AcrobotConfig,
    observation_space: BoxSpace,
    action_space: BoxSpace,
    render_mode: Option<RenderMode>,
    state: Option<[f64; 4]>,
    rng: Rng,
}

impl AcrobotEnv {
    /// # Errors
    ///
    /// Returns [`EnvError::InvalidConfiguration`] if `config` is invalid.
    pub fn new(config: AcrobotConfig, render_mode: Option<RenderMode>) -> Result<Self, EnvError> {
        config.validate()?;
        let observation_space =
            BoxSpace::symmetric(vec![1.0, 1.0, 1.0, 1.0, config.max_vel_1, config.max_vel_2])?;
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
    pub fn config(&self) -> &AcrobotConfig {
        &self.config
    }

    /// Copy of the internal `[θ1, θ2, θ1', θ2']`, if the system was reset.
    #[must_use]
    pub fn state(&self) -> Option<[f64; 4]> {
        self.state
    }

    fn observation([theta1, theta2, dtheta1, dtheta2]: [f64; 4]) -> Vec<f64> {
        vec![theta1.cos(), theta1.sin(), theta2.cos(), theta2.sin(), dtheta1, dtheta2]
    }

    fn draw(&self, [theta1, theta2, _, _]: [f64; 4]) -> Canvas {
        let mut canvas = Canvas::new(SCREEN_DIM, SCREEN_DIM);
        let (l1, l2) = (self.config.link_length_1, self.config.link_length_2);
        let extent = l1 + l2 + 0.2;
        let scale = f64::from(SCREEN_DIM) / (extent * 2.0);
        let offset = f64::from(SCREEN_DIM) / 2.0;
        let to_px = |x: f64, y: f64| (x * scale + offset, y * scale + offset);

        let target = self.config.target_height;
        canvas.draw_line(to_px(-extent, target), to_px(extent, target), 1.0, BLACK);

        let pivot = to_px(0.0, 0.0);
        let elbow = to_px(l1 * theta1.sin(), -l1 * theta1.cos());
        let tip = to_px(
            l1 * theta1.sin() + l2 * (theta1 + theta2).sin(),
            -l1 * theta1.cos() - l2 * (theta1 + theta2).cos(),
        );
        let link_width = 0.2 * scale;
        for (from, to) in [(pivot, elbow), (elbow, tip)] {
            canvas.draw_line(from, to, link_width, [0, 204, 204]);
            canvas.fill_circle(from, 0.1 * scale, [204, 204, 0]);
        }
        canvas
    }
}

impl Environment for AcrobotEnv {
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
                std::array::from_fn(|_| uniform(&mut self.rng, low, high))
            }
        };
        self.state = Some(state);
        tracing::debug!(?state, "acrobot reset");
        if self.render_mode == Some(RenderMode::Human) {
            self.render()?;
        }
        Ok((Self::observation(state), Info::new()))
    }

    fn step(&mut self, action: &Vec<f64>) -> Result<Step<Vec<f64>>, EnvError> {
        let [theta1, theta2, dtheta1, dtheta2] =
            self.state.ok_or(EnvError::InvalidLifecycle("call reset before step"))?;
        require_len(1, action.len())?;
        let mut torque = action[0].clamp(-self.config.max_torque, self.config.max_torque);
        if self.config.torque_noise_max > 0.0 {
            let noise = self.config.torque_noise_max;
            torque += uniform(&mut self.rng, -noise, noise);
        }

        let augmented = [theta1, theta2, dtheta1, dtheta2, torque];
        let [theta1, theta2, dtheta1, dtheta2, _] =
            rk4(|s| acrobot_derivatives(&self.config, s), &augmented, self.config.dt);
        let next = [
            wrap_angle(theta1),
            wrap_angle(theta2),
            bound(dtheta1, -self.config.max_vel_1, self.config.max_vel_1),
            bound(dtheta2, -self.config.max_vel_2, self.config.max_vel_2),
        ];

        let terminated = tip_height(&self.config, next) > self.config.target_height;
        let reward = if terminated { 0.0 } else { -1.0 };
        self.state = Some(next);
        tracing::trace!(?next, torque, "acrobot step");
        if terminated {
            tracing::debug!("acrobot reached target height");
        }
        if self.render_mode == Some(RenderMode::Human) {
            self.render()?;
        }
        Ok(Step {
            observation: Self::observation(next),
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
