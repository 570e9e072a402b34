//! Slide background paints.
//!
//! A paint is stored as the CSS string the renderer consumes directly, either a
//! plain colour or a two-stop `linear-gradient(...)`. Parsing gives it a typed
//! shape so callers never splice CSS by hand.

#[cfg(test)]
#[path = "paint_test.rs"]
mod paint_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_BACKGROUND;

const GRADIENT_PREFIX: &str = "linear-gradient(";

/// Errors produced while parsing a paint string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaintError {
    /// The string was empty or whitespace.
    #[error("paint is empty")]
    Empty,
    /// A `linear-gradient(...)` could not be split into direction and two stops.
    #[error("malformed gradient: {0}")]
    MalformedGradient(String),
    /// The gradient direction keyword is not supported.
    #[error("unsupported gradient direction: {0}")]
    UnknownDirection(String),
}

/// Direction keyword of a linear gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradientDirection {
    #[default]
    ToRight,
    ToLeft,
    ToBottom,
    ToTop,
}

impl GradientDirection {
    /// CSS keyword for this direction.
    #[must_use]
    pub fn as_css(self) -> &'static str {
        match self {
            Self::ToRight => "to right",
            Self::ToLeft => "to left",
            Self::ToBottom => "to bottom",
            Self::ToTop => "to top",
        }
    }
}

impl FromStr for GradientDirection {
    type Err = PaintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_whitespace().collect::<Vec<_>>().join(" ").as_str() {
            "to right" => Ok(Self::ToRight),
            "to left" => Ok(Self::ToLeft),
            "to bottom" => Ok(Self::ToBottom),
            "to top" => Ok(Self::ToTop),
            _ => Err(PaintError::UnknownDirection(s.trim().to_owned())),
        }
    }
}

/// A slide background.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Paint {
    /// A single CSS colour.
    Solid(String),
    /// A two-stop linear gradient.
    LinearGradient { direction: GradientDirection, start: String, end: String },
}

impl Default for Paint {
    fn default() -> Self {
        Self::Solid(DEFAULT_BACKGROUND.to_owned())
    }
}

impl fmt::Display for Paint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Solid(color) => f.write_str(color),
            Self::LinearGradient { direction, start, end } => {
                write!(f, "{GRADIENT_PREFIX}{}, {start}, {end})", direction.as_css())
            }
        }
    }
}

impl FromStr for Paint {
    type Err = PaintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PaintError::Empty);
        }
        let Some(rest) = s.strip_prefix(GRADIENT_PREFIX) else {
            return Ok(Self::Solid(s.to_owned()));
        };
        let inner = rest
            .strip_suffix(')')
            .ok_or_else(|| PaintError::MalformedGradient(s.to_owned()))?;
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        let [direction, start, end] = parts.as_slice() else {
            return Err(PaintError::MalformedGradient(s.to_owned()));
        };
        if start.is_empty() || end.is_empty() {
            return Err(PaintError::MalformedGradient(s.to_owned()));
        }
        Ok(Self::LinearGradient {
            direction: direction.parse()?,
            start: (*start).to_owned(),
            end: (*end).to_owned(),
        })
    }
}

impl TryFrom<String> for Paint {
    type Error = PaintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Paint> for String {
    fn from(paint: Paint) -> Self {
        paint.to_string()
    }
}
