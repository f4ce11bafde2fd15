//! Geometric path shapes, parameterized by travelled distance.
use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// A geometric reference path.
///
/// Except for [`PathShape::Circle`], the longitudinal position equals the travelled
/// distance `s` and the heading is the arctangent of the analytic slope `dy/ds`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum PathShape {
    /// `y = amplitude * sin(2π s / period + phase)`.
    Sine {
        /// Amplitude [m].
        amplitude: f32,
        /// Period [m].
        period: f32,
        /// Phase [rad].
        phase: f32,
    },

    /// Lane change to `width` between `s1` and `s2`, and back between `s3` and `s4`.
    ///
    /// Both transitions are cosine blends, so position and heading are continuous.
    DoubleLane {
        /// Start of the first lane change [m].
        s1: f32,
        /// End of the first lane change [m].
        s2: f32,
        /// Start of the return [m].
        s3: f32,
        /// End of the return [m].
        s4: f32,
        /// Lateral offset of the second lane [m].
        width: f32,
    },

    /// Periodic triangle wave starting at zero and rising to `amplitude`.
    Triangle {
        /// Amplitude [m].
        amplitude: f32,
        /// Period [m].
        period: f32,
    },

    /// Circle of `radius` starting at the origin heading along the x axis, turning left.
    Circle {
        /// Radius [m].
        radius: f32,
    },
}

impl PathShape {
    /// Checks the parameters.
    ///
    /// Every parameter must be finite, so that poses are finite for any finite `s`.
    pub fn validate(&self) -> Result<()> {
        match *self {
            PathShape::Sine {
                amplitude,
                period,
                phase,
            } => {
                ensure_finite(&[amplitude, period, phase])?;
                ensure!(period > 0.0, "Path period must be positive, got {}", period);
            }
            PathShape::Triangle { amplitude, period } => {
                ensure_finite(&[amplitude, period])?;
                ensure!(period > 0.0, "Path period must be positive, got {}", period);
            }
            PathShape::DoubleLane {
                s1,
                s2,
                s3,
                s4,
                width,
            } => {
                ensure_finite(&[s1, s2, s3, s4, width])?;
                ensure!(
                    s1 < s2 && s2 <= s3 && s3 < s4,
                    "Lane change breakpoints must satisfy s1 < s2 <= s3 < s4, got {:?}",
                    (s1, s2, s3, s4)
                );
            }
            PathShape::Circle { radius } => {
                ensure!(
                    radius > 0.0 && radius.is_finite(),
                    "Circle radius must be positive and finite, got {}",
                    radius
                );
            }
        }
        Ok(())
    }

    /// Returns `(x, y, phi)` after travelling the distance `s`.
    ///
    /// The heading is not wrapped.
    pub fn pose(&self, s: f32) -> (f32, f32, f32) {
        match *self {
            PathShape::Sine {
                amplitude,
                period,
                phase,
            } => {
                let w = 2.0 * PI / period;
                let y = amplitude * (w * s + phase).sin();
                let dy = amplitude * w * (w * s + phase).cos();
                (s, y, dy.atan())
            }
            PathShape::DoubleLane {
                s1,
                s2,
                s3,
                s4,
                width,
            } => {
                let (up, dup) = blend(s, s1, s2);
                let (down, ddown) = blend(s, s3, s4);
                let y = width * (up - down);
                let dy = width * (dup - ddown);
                (s, y, dy.atan())
            }
            PathShape::Triangle { amplitude, period } => {
                let p = (s / period).rem_euclid(1.0);
                let slope = 4.0 * amplitude / period;
                let (y, dy) = if p < 0.25 {
                    (4.0 * amplitude * p, slope)
                } else if p < 0.75 {
                    (amplitude * (2.0 - 4.0 * p), -slope)
                } else {
                    (amplitude * (4.0 * p - 4.0), slope)
                };
                (s, y, dy.atan())
            }
            PathShape::Circle { radius } => {
                let theta = s / radius;
                (radius * theta.sin(), radius * (1.0 - theta.cos()), theta)
            }
        }
    }
}

// Smooth step from 0 at `a` to 1 at `b` with its derivative.
fn blend(s: f32, a: f32, b: f32) -> (f32, f32) {
    if s <= a {
        (0.0, 0.0)
    } else if s >= b {
        (1.0, 0.0)
    } else {
        let r = (s - a) / (b - a);
        (0.5 * (1.0 - (PI * r).cos()), 0.5 * PI * (PI * r).sin() / (b - a))
    }
}

pub(crate) fn ensure_finite(params: &[f32]) -> Result<()> {
    ensure!(
        params.iter().all(|v| v.is_finite()),
        "Parameters must be finite, got {:?}",
        params
    );
    Ok(())
}
