//! Speed profiles along a reference path.
use crate::path::ensure_finite;
use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Reference longitudinal speed as a function of time.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum SpeedProfile {
    /// Constant speed [m/s].
    Constant {
        /// Speed [m/s].
        u: f32,
    },

    /// `u = mean + amplitude * sin(2π t / period + phase)`.
    Sine {
        /// Mean speed [m/s].
        mean: f32,
        /// Amplitude [m/s].
        amplitude: f32,
        /// Period [s].
        period: f32,
        /// Phase [rad].
        phase: f32,
    },
}

impl SpeedProfile {
    /// Checks the parameters. Every parameter must be finite.
    pub fn validate(&self) -> Result<()> {
        match *self {
            SpeedProfile::Constant { u } => ensure_finite(&[u]),
            SpeedProfile::Sine {
                mean,
                amplitude,
                period,
                phase,
            } => {
                ensure_finite(&[mean, amplitude, period, phase])?;
                ensure!(period > 0.0, "Speed period must be positive, got {}", period);
                Ok(())
            }
        }
    }

    /// Speed at time `t`.
    pub fn speed(&self, t: f32) -> f32 {
        match *self {
            SpeedProfile::Constant { u } => u,
            SpeedProfile::Sine {
                mean,
                amplitude,
                period,
                phase,
            } => mean + amplitude * (2.0 * PI / period * t + phase).sin(),
        }
    }

    /// Distance travelled from time zero to `t`.
    pub fn distance(&self, t: f32) -> f32 {
        match *self {
            SpeedProfile::Constant { u } => u * t,
            SpeedProfile::Sine {
                mean,
                amplitude,
                period,
                phase,
            } => {
                let w = 2.0 * PI / period;
                mean * t + amplitude / w * (phase.cos() - (w * t + phase).cos())
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_distance_is_integral_of_speed() {
        let profile = SpeedProfile::Sine {
            mean: 10.0,
            amplitude: 1.0,
            period: 10.0,
            phase: 0.3,
        };
        assert_eq!(profile.distance(0.0), 0.0);

        let h = 1e-2;
        for &t in [0.5f32, 3.0, 7.2].iter() {
            let rate = (profile.distance(t + h) - profile.distance(t - h)) / (2.0 * h);
            assert!((rate - profile.speed(t)).abs() < 1e-2);
        }
    }

    #[test]
    fn test_constant() {
        let profile = SpeedProfile::Constant { u: 5.0 };
        assert_eq!(profile.speed(3.0), 5.0);
        assert_eq!(profile.distance(3.0), 15.0);
    }

    #[test]
    fn test_validate() {
        assert!(SpeedProfile::Constant { u: 10.0 }.validate().is_ok());
        assert!(SpeedProfile::Constant { u: f32::NAN }.validate().is_err());
        let sine = |period: f32, mean: f32| SpeedProfile::Sine {
            mean,
            amplitude: 1.0,
            period,
            phase: 0.0,
        };
        assert!(sine(10.0, 10.0).validate().is_ok());
        assert!(sine(0.0, 10.0).validate().is_err());
        assert!(sine(f32::INFINITY, 10.0).validate().is_err());
        assert!(sine(10.0, f32::INFINITY).validate().is_err());
    }
}
