//! Ready-to-use systems wrapped in the standard lifecycle stack.

use physics::{
    AcrobotConfig, AcrobotEnv, CartConfig, CartEnv, EnvError, GridWorldConfig, GridWorldEnv,
    InvertedPendulumConfig, InvertedPendulumEnv, PendulumConfig, PendulumEnv,
};
use render::RenderMode;

use crate::wrappers::{wrap, Wrapped};

pub const CART_MAX_STEPS: usize = 200;
pub const INVERTED_PENDULUM_MAX_STEPS: usize = 500;
pub const PENDULUM_MAX_STEPS: usize = 200;
pub const ACROBOT_MAX_STEPS: usize = 500;
pub const GRID_WORLD_MAX_STEPS: usize = 20;

/// Builds a wrapped [`CartEnv`] with a budget of `max_steps`, 200 by default.
///
/// # Errors
///
/// Fails when the configuration is invalid or `max_steps` is zero.
pub fn create_cart_environment(
    config: CartConfig,
    render_mode: Option<RenderMode>,
    max_steps: Option<usize>,
) -> Result<Wrapped<CartEnv>, EnvError> {
    wrap(
        CartEnv::new(config, render_mode)?,
        max_steps.unwrap_or(CART_MAX_STEPS),
    )
}

/// Builds a wrapped [`InvertedPendulumEnv`], 500 steps by default.
///
/// # Errors
///
/// Fails when the configuration is invalid or `max_steps` is zero.
pub fn create_inverted_pendulum_environment(
    config: InvertedPendulumConfig,
    render_mode: Option<RenderMode>,
    max_steps: Option<usize>,
) -> Result<Wrapped<InvertedPendulumEnv>, EnvError> {
    wrap(
        InvertedPendulumEnv::new(config, render_mode)?,
        max_steps.unwrap_or(INVERTED_PENDULUM_MAX_STEPS),
    )
}

/// Builds a wrapped [`PendulumEnv`], 200 steps by default.
///
/// # Errors
///
/// Fails when the configuration is invalid or `max_steps` is zero.
pub fn create_pendulum_environment(
    config: PendulumConfig,
    render_mode: Option<RenderMode>,
    max_steps: Option<usize>,
) -> Result<Wrapped<PendulumEnv>, EnvError> {
    wrap(
        PendulumEnv::new(config, render_mode)?,
        max_steps.unwrap_or(PENDULUM_MAX_STEPS),
    )
}

/// Builds a wrapped [`AcrobotEnv`], 500 steps by default.
///
/// # Errors
///
/// Fails when the configuration is invalid or `max_steps` is zero.
pub fn create_acrobot_environment(
    config: AcrobotConfig,
    render_mode: Option<RenderMode>,
    max_steps: Option<usize>,
) -> Result<Wrapped<AcrobotEnv>, EnvError> {
    wrap(
        AcrobotEnv::new(config, render_mode)?,
        max_steps.unwrap_or(ACROBOT_MAX_STEPS),
    )
}

/// Builds a wrapped [`GridWorldEnv`], 20 steps by default.
///
/// The budget also scales the grid world's success reward.
///
/// # Errors
///
/// Fails when `max_steps` is zero.
pub fn create_grid_world_environment(
    render_mode: Option<RenderMode>,
    max_steps: Option<usize>,
) -> Result<Wrapped<GridWorldEnv>, EnvError> {
    let max_steps = max_steps.unwrap_or(GRID_WORLD_MAX_STEPS);
    wrap(
        GridWorldEnv::new(GridWorldConfig { max_steps }, render_mode)?,
        max_steps,
    )
}
