#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::many_single_char_names,
    clippy::similar_names
)]
//! # Simulated control systems
//!
//! Small fixed-step dynamical systems behind a common [`Environment`]
//! contract, in the spirit of the Gymnasium API.
//!
//! ## Key Components
//!
//! -   **Contract:** [`Environment`], [`Step`], [`ResetOptions`] and the
//!     [`Space`] trait with its [`BoxSpace`] and [`Discrete`] implementations.
//! -   **Systems:** [`CartEnv`] (double integrator), [`InvertedPendulumEnv`]
//!     (cart-pole), [`PendulumEnv`] (torque-driven swing-up), [`AcrobotEnv`]
//!     (two-link pendulum) and [`GridWorldEnv`] (discrete maze).
//! -   **Numerics:** Euler and RK4 steppers in [`integrator`] and angle
//!     helpers in [`angle`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use physics::{CartConfig, CartEnv, Environment};
//!
//! let mut env = CartEnv::new(CartConfig::default(), None)?;
//! let (obs, _) = env.reset(Some(42), None)?;
//! let step = env.step(&vec![1.0])?;
//! ```

pub mod acrobot;
pub mod angle;
pub mod cart;
pub mod env;
pub mod error;
pub mod grid_world;
pub mod integrator;
pub mod inverted_pendulum;
pub mod pendulum;
pub mod space;

pub use acrobot::{AcrobotConfig, AcrobotDynamics, AcrobotEnv};
pub use cart::{CartConfig, CartEnv};
pub use env::{Environment, Info, ResetOptions, Step};
pub use error::EnvError;
pub use grid_world::{Cell, GridAction, GridSpace, GridWorldConfig, GridWorldEnv, Tile};
pub use integrator::Integrator;
pub use inverted_pendulum::{InvertedPendulumConfig, InvertedPendulumEnv};
pub use pendulum::{PendulumConfig, PendulumEnv};
pub use space::{BoxSpace, Discrete, Space};
