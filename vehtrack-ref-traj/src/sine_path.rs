//! Fixed reference path of the reduced vehicle model.
use anyhow::{ensure, Result};
use ndarray::{Array1, ArrayView1, Zip};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use vehtrack_core::util::wrap_angle;

/// A sinusoidal term `amplitude * sin(2π (x - shift) / period)`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SineCurve {
    /// Amplitude [m].
    pub amplitude: f32,

    /// Period [m].
    pub period: f32,

    /// Shift along the abscissa [m].
    pub shift: f32,
}

impl SineCurve {
    /// Creates a sinusoidal term.
    pub fn new(amplitude: f32, period: f32, shift: f32) -> Self {
        Self {
            amplitude,
            period,
            shift,
        }
    }

    fn value(&self, x: f32) -> f32 {
        self.amplitude * ((x - self.shift) * 2.0 * PI / self.period).sin()
    }

    fn deriv(&self, x: f32) -> f32 {
        self.amplitude * 2.0 * PI / self.period * ((x - self.shift) * 2.0 * PI / self.period).cos()
    }
}

/// Configuration of [`SinePath`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SinePathConfig {
    /// Superposed terms.
    pub curves: Vec<SineCurve>,
}

impl Default for SinePathConfig {
    fn default() -> Self {
        Self {
            curves: vec![
                SineCurve::new(7.5, 200.0, 0.0),
                SineCurve::new(2.5, 300.0, 0.0),
                SineCurve::new(-5.0, 400.0, 0.0),
            ],
        }
    }
}

impl SinePathConfig {
    /// Sets the superposed terms.
    pub fn curves(mut self, curves: Vec<SineCurve>) -> Self {
        self.curves = curves;
        self
    }
}

/// Reference path given by a superposition of sinusoids.
///
/// The heading is the arctangent of the analytic derivative of the lateral position,
/// so it stays phase-consistent with the position.
#[derive(Debug, Clone)]
pub struct SinePath {
    curves: Vec<SineCurve>,
}

impl SinePath {
    /// Builds a path from its configuration.
    pub fn build(config: &SinePathConfig) -> Result<Self> {
        for c in config.curves.iter() {
            ensure!(
                c.period > 0.0 && c.period.is_finite(),
                "Period of a sine curve must be positive, got {}",
                c.period
            );
        }
        Ok(Self {
            curves: config.curves.clone(),
        })
    }

    /// Lateral position of the path at abscissa `x`.
    pub fn path_y(&self, x: f32) -> f32 {
        self.curves.iter().map(|c| c.value(x)).sum()
    }

    /// Heading of the path at abscissa `x`.
    pub fn path_phi(&self, x: f32) -> f32 {
        let deriv: f32 = self.curves.iter().map(|c| c.deriv(x)).sum();
        deriv.atan()
    }

    /// Lateral positions of the path.
    pub fn compute_path_y(&self, x: ArrayView1<f32>) -> Array1<f32> {
        x.mapv(|x| self.path_y(x))
    }

    /// Headings of the path.
    pub fn compute_path_phi(&self, x: ArrayView1<f32>) -> Array1<f32> {
        x.mapv(|x| self.path_phi(x))
    }

    /// Absolute lateral positions from lateral errors.
    pub fn compute_y(&self, x: ArrayView1<f32>, delta_y: ArrayView1<f32>) -> Array1<f32> {
        Zip::from(&x)
            .and(&delta_y)
            .map_collect(|&x, &dy| dy + self.path_y(x))
    }

    /// Lateral errors from absolute lateral positions.
    pub fn compute_delta_y(&self, x: ArrayView1<f32>, y: ArrayView1<f32>) -> Array1<f32> {
        Zip::from(&x)
            .and(&y)
            .map_collect(|&x, &y| y - self.path_y(x))
    }

    /// Absolute headings from heading errors, wrapped into `(-π, π]`.
    pub fn compute_phi(&self, x: ArrayView1<f32>, delta_phi: ArrayView1<f32>) -> Array1<f32> {
        Zip::from(&x)
            .and(&delta_phi)
            .map_collect(|&x, &dphi| wrap_angle(dphi + self.path_phi(x)))
    }

    /// Heading errors from absolute headings, wrapped into `(-π, π]`.
    pub fn compute_delta_phi(&self, x: ArrayView1<f32>, phi: ArrayView1<f32>) -> Array1<f32> {
        Zip::from(&x)
            .and(&phi)
            .map_collect(|&x, &phi| wrap_angle(phi - self.path_phi(x)))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::arr1;

    fn path() -> SinePath {
        SinePath::build(&SinePathConfig::default()).unwrap()
    }

    #[test]
    fn test_origin() {
        let path = path();
        assert_eq!(path.path_y(0.0), 0.0);
        // 7.5 * 2π/200 + 2.5 * 2π/300 - 5 * 2π/400
        let slope = 2.0 * PI * (7.5 / 200.0 + 2.5 / 300.0 - 5.0 / 400.0);
        assert!((path.path_phi(0.0) - slope.atan()).abs() < 1e-6);
    }

    #[test]
    fn test_continuity() {
        let path = path();
        let eps = 1e-3;
        let rng = fastrand::Rng::with_seed(7);
        for _ in 0..1000 {
            let x = rng.f32() * 1200.0;
            assert!((path.path_y(x + eps) - path.path_y(x)).abs() < 1e-3);
            assert!((path.path_phi(x + eps) - path.path_phi(x)).abs() < 1e-3);
        }
    }

    #[test]
    fn test_heading_matches_slope() {
        let path = path();
        for &x in [10.0f32, 250.0, 777.0].iter() {
            let h = 1e-2;
            let slope = (path.path_y(x + h) - path.path_y(x - h)) / (2.0 * h);
            assert!((path.path_phi(x) - slope.atan()).abs() < 1e-2);
        }
    }

    #[test]
    fn test_errors_and_absolutes() {
        let path = path();
        let x = arr1(&[0.0, 100.0, 350.0]);
        let y = arr1(&[1.0, -2.0, 0.5]);
        let dy = path.compute_delta_y(x.view(), y.view());
        let y2 = path.compute_y(x.view(), dy.view());
        for i in 0..3 {
            assert!((y[i] - y2[i]).abs() < 1e-4);
        }

        let phi = arr1(&[PI, -3.0, 0.2]);
        let dphi = path.compute_delta_phi(x.view(), phi.view());
        let phi2 = path.compute_phi(x.view(), dphi.view());
        for i in 0..3 {
            assert!(dphi[i] > -PI && dphi[i] <= PI);
            let d = wrap_angle(phi[i] - phi2[i]);
            assert!(d.abs() < 1e-5);
        }
    }

    #[test]
    fn test_invalid_period() {
        let config = SinePathConfig::default().curves(vec![SineCurve::new(1.0, 0.0, 0.0)]);
        assert!(SinePath::build(&config).is_err());
    }
}
