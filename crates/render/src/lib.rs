#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
//! # Frame rendering
//!
//! Rendering of simple 2-D scenes into RGB frames.
//!
//! Simulated systems describe their current state by drawing lines, boxes and
//! circles onto a [`Canvas`], then hand the canvas to their configured
//! [`RenderMode`]. In `rgb_array` mode this yields a [`Frame`]; the `human`
//! mode needs a display backend, which this crate does not ship, and reports
//! [`RenderError::BackendUnavailable`] instead.

pub mod canvas;
pub mod mode;

pub use canvas::{Canvas, Color, Frame};
pub use mode::{RenderError, RenderMode};
