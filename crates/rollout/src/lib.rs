#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_precision_loss,
    clippy::must_use_candidate,
    clippy::missing_errors_doc
)]
//! # Rollouts
//!
//! Runs controllers against simulated systems and records what happened.
//!
//! -   [`wrappers`] adds lifecycle rules (order enforcement, step limits,
//!     frame collection) around any [`physics::Environment`].
//! -   [`factory`] builds each system already wrapped in the standard stack.
//! -   [`Rollout`] drives one episode with a controller and an optional
//!     observer, producing a [`TrajectoryRecord`].
//!
//! ```rust,ignore
//! use control::ConstantController;
//! use physics::CartConfig;
//! use rollout::{create_cart_environment, Rollout};
//!
//! let mut env = create_cart_environment(CartConfig::default(), None, None)?;
//! let mut push = ConstantController::new(vec![10.0]);
//! let record = Rollout::new(&mut env).controller(&mut push).simulate()?;
//! println!("{}", record.to_json()?);
//! ```

pub mod error;
pub mod factory;
pub mod record;
pub mod simulate;
pub mod wrappers;

pub use error::RolloutError;
pub use factory::{
    create_acrobot_environment, create_cart_environment, create_grid_world_environment,
    create_inverted_pendulum_environment, create_pendulum_environment,
};
pub use record::{EpisodeEnd, TrajectoryRecord};
pub use simulate::{simulate, Rollout};
pub use wrappers::{wrap, EnvChecker, FrameCollector, OrderEnforcing, StepLimit, Wrapped};
