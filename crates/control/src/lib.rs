#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
//! # Control policies
//!
//! Controllers map observations to actions and observers turn raw
//! observations into state estimates. Both are plain traits so closures,
//! fixed policies and hand-written feedback laws all plug into the same
//! rollout loop.
//!
//! -   [`ConstantController`] and [`RandomController`] are the baseline
//!     policies.
//! -   [`excitation`] holds open-loop signals (sines, Schroeder multisines,
//!     PRBS) for exciting a system during identification experiments.
//! -   [`IdentityObserver`] and [`LowPassObserver`] are the stock observers.

pub mod controller;
pub mod error;
pub mod excitation;
pub mod observer;

pub use controller::{ConstantController, Controller, RandomController};
pub use error::SignalError;
pub use excitation::{Multisine, Prbs, Signal, SignalController, Sine, SumOfSines};
pub use observer::{IdentityObserver, LowPassObserver, Observer};
