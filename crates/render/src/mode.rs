//! Render modes and presentation of finished canvases.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::canvas::{Canvas, Frame};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("no display backend available for render mode `{0}`")]
    BackendUnavailable(RenderMode),
    #[error("unknown render mode `{0}`, expected `human` or `rgb_array`")]
    UnknownMode(String),
}

/// How a system presents its rendered state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Draw into an interactive window.
    Human,
    /// Return the frame as an RGB pixel buffer.
    RgbArray,
}

impl RenderMode {
    /// Turns a finished canvas into a frame.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::BackendUnavailable`] for [`RenderMode::Human`],
    /// since no windowing backend is compiled in.
    pub fn present(self, canvas: Canvas) -> Result<Frame, RenderError> {
        match self {
            RenderMode::RgbArray => Ok(canvas.into_frame()),
            RenderMode::Human => {
                tracing::error!("human rendering requested but no display backend is available");
                Err(RenderError::BackendUnavailable(self))
            }
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RenderMode::Human => "human",
            RenderMode::RgbArray => "rgb_array",
        })
    }
}

impl FromStr for RenderMode {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "human" => Ok(RenderMode::Human),
            "rgb_array" => Ok(RenderMode::RgbArray),
            other => Err(RenderError::UnknownMode(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_gym_style_names() {
        assert_eq!("rgb_array".parse::<RenderMode>().unwrap(), RenderMode::RgbArray);
        assert_eq!("human".parse::<RenderMode>().unwrap(), RenderMode::Human);
        assert!("ansi".parse::<RenderMode>().is_err());
        assert_eq!(RenderMode::RgbArray.to_string(), "rgb_array");
    }

    #[test]
    fn human_mode_has_no_backend() {
        let err = RenderMode::Human.present(Canvas::new(2, 2)).unwrap_err();
        assert!(matches!(err, RenderError::BackendUnavailable(RenderMode::Human)));
    }

    #[test]
    fn rgb_array_returns_canvas_pixels() {
        let frame = RenderMode::RgbArray.present(Canvas::new(3, 2)).unwrap();
        assert_eq!(frame.dimensions(), (3, 2));
    }
}
