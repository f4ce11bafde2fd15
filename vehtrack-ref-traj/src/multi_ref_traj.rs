//! Table of reference trajectories indexed by path and speed selectors.
use crate::{PathShape, SpeedProfile};
use anyhow::{ensure, Result};
use log::info;
use ndarray::{Array1, ArrayView1, Zip};
use serde::{Deserialize, Serialize};
use vehtrack_core::{
    util::{check_len, wrap_angle},
    ModelError, SelectorKind,
};

/// Configuration of [`MultiRefTraj`].
///
/// The position of an entry in `paths` (`speeds`) is its `path_num` (`u_num`).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MultiRefTrajConfig {
    /// Path shapes.
    pub paths: Vec<PathShape>,

    /// Speed profiles.
    pub speeds: Vec<SpeedProfile>,
}

impl Default for MultiRefTrajConfig {
    fn default() -> Self {
        Self {
            paths: vec![
                PathShape::Sine {
                    amplitude: 1.5,
                    period: 100.0,
                    phase: 0.0,
                },
                PathShape::DoubleLane {
                    s1: 50.0,
                    s2: 90.0,
                    s3: 140.0,
                    s4: 180.0,
                    width: 3.5,
                },
                PathShape::Triangle {
                    amplitude: 3.0,
                    period: 100.0,
                },
                PathShape::Circle { radius: 100.0 },
            ],
            speeds: vec![
                SpeedProfile::Constant { u: 10.0 },
                SpeedProfile::Sine {
                    mean: 10.0,
                    amplitude: 1.0,
                    period: 10.0,
                    phase: 0.0,
                },
            ],
        }
    }
}

impl MultiRefTrajConfig {
    /// Sets the path shapes.
    pub fn paths(mut self, paths: Vec<PathShape>) -> Self {
        self.paths = paths;
        self
    }

    /// Sets the speed profiles.
    pub fn speeds(mut self, speeds: Vec<SpeedProfile>) -> Self {
        self.speeds = speeds;
        self
    }
}

/// Reference pose and speed of a single trajectory at a single time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefPoint {
    /// Longitudinal position [m].
    pub x: f32,

    /// Lateral position [m].
    pub y: f32,

    /// Heading in `(-π, π]` [rad].
    pub phi: f32,

    /// Longitudinal speed [m/s].
    pub u: f32,
}

/// Reference poses and speeds of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct RefPoints {
    /// Longitudinal positions [m].
    pub x: Array1<f32>,

    /// Lateral positions [m].
    pub y: Array1<f32>,

    /// Headings in `(-π, π]` [rad].
    pub phi: Array1<f32>,

    /// Longitudinal speeds [m/s].
    pub u: Array1<f32>,
}

/// A family of reference trajectories.
///
/// A trajectory is the combination of a [`PathShape`] and a [`SpeedProfile`].
/// The speed profile determines the distance travelled along the path at a given
/// time, and the path shape turns the distance into a pose.
#[derive(Debug, Clone)]
pub struct MultiRefTraj {
    paths: Vec<PathShape>,
    speeds: Vec<SpeedProfile>,
}

impl MultiRefTraj {
    /// Builds the table from its configuration.
    pub fn build(config: &MultiRefTrajConfig) -> Result<Self> {
        ensure!(!config.paths.is_empty(), "At least one path shape is required");
        ensure!(!config.speeds.is_empty(), "At least one speed profile is required");
        for p in config.paths.iter() {
            p.validate()?;
        }
        for s in config.speeds.iter() {
            s.validate()?;
        }
        info!(
            "Reference trajectories: {} path shapes, {} speed profiles",
            config.paths.len(),
            config.speeds.len()
        );

        Ok(Self {
            paths: config.paths.clone(),
            speeds: config.speeds.clone(),
        })
    }

    /// Number of path shapes.
    pub fn n_paths(&self) -> usize {
        self.paths.len()
    }

    /// Number of speed profiles.
    pub fn n_speeds(&self) -> usize {
        self.speeds.len()
    }

    /// Checks that selectors have `n` elements and index existing table entries.
    pub fn validate(
        &self,
        n: usize,
        path_num: ArrayView1<usize>,
        u_num: ArrayView1<usize>,
    ) -> Result<(), ModelError> {
        check_len("path_num", n, path_num.len())?;
        check_len("u_num", n, u_num.len())?;
        check_selector(SelectorKind::Path, path_num, self.paths.len())?;
        check_selector(SelectorKind::Speed, u_num, self.speeds.len())
    }

    /// Reference point of a single trajectory at time `t`.
    pub fn point(&self, t: f32, path_num: usize, u_num: usize) -> Result<RefPoint, ModelError> {
        if path_num >= self.paths.len() {
            return Err(ModelError::InvalidSelector {
                kind: SelectorKind::Path,
                index: 0,
                value: path_num,
                len: self.paths.len(),
            });
        }
        if u_num >= self.speeds.len() {
            return Err(ModelError::InvalidSelector {
                kind: SelectorKind::Speed,
                index: 0,
                value: u_num,
                len: self.speeds.len(),
            });
        }
        Ok(self.point_unchecked(t, path_num, u_num))
    }

    fn point_unchecked(&self, t: f32, path_num: usize, u_num: usize) -> RefPoint {
        let speed = &self.speeds[u_num];
        let (x, y, phi) = self.paths[path_num].pose(speed.distance(t));
        RefPoint {
            x,
            y,
            phi: wrap_angle(phi),
            u: speed.speed(t),
        }
    }

    fn eval<F>(
        &self,
        t: ArrayView1<f32>,
        path_num: ArrayView1<usize>,
        u_num: ArrayView1<usize>,
        f: F,
    ) -> Result<Array1<f32>, ModelError>
    where
        F: Fn(RefPoint) -> f32,
    {
        self.validate(t.len(), path_num, u_num)?;
        Ok(Zip::from(&t)
            .and(&path_num)
            .and(&u_num)
            .map_collect(|&t, &p, &s| f(self.point_unchecked(t, p, s))))
    }

    /// Reference longitudinal positions.
    pub fn compute_x(
        &self,
        t: ArrayView1<f32>,
        path_num: ArrayView1<usize>,
        u_num: ArrayView1<usize>,
    ) -> Result<Array1<f32>, ModelError> {
        self.eval(t, path_num, u_num, |p| p.x)
    }

    /// Reference lateral positions.
    pub fn compute_y(
        &self,
        t: ArrayView1<f32>,
        path_num: ArrayView1<usize>,
        u_num: ArrayView1<usize>,
    ) -> Result<Array1<f32>, ModelError> {
        self.eval(t, path_num, u_num, |p| p.y)
    }

    /// Reference headings, wrapped into `(-π, π]`.
    pub fn compute_phi(
        &self,
        t: ArrayView1<f32>,
        path_num: ArrayView1<usize>,
        u_num: ArrayView1<usize>,
    ) -> Result<Array1<f32>, ModelError> {
        self.eval(t, path_num, u_num, |p| p.phi)
    }

    /// Reference longitudinal speeds.
    pub fn compute_u(
        &self,
        t: ArrayView1<f32>,
        path_num: ArrayView1<usize>,
        u_num: ArrayView1<usize>,
    ) -> Result<Array1<f32>, ModelError> {
        self.eval(t, path_num, u_num, |p| p.u)
    }

    /// Reference poses and speeds in a single pass over the batch.
    pub fn compute_points(
        &self,
        t: ArrayView1<f32>,
        path_num: ArrayView1<usize>,
        u_num: ArrayView1<usize>,
    ) -> Result<RefPoints, ModelError> {
        self.validate(t.len(), path_num, u_num)?;
        let points = Zip::from(&t)
            .and(&path_num)
            .and(&u_num)
            .map_collect(|&t, &p, &s| self.point_unchecked(t, p, s));
        Ok(RefPoints {
            x: points.mapv(|p| p.x),
            y: points.mapv(|p| p.y),
            phi: points.mapv(|p| p.phi),
            u: points.mapv(|p| p.u),
        })
    }
}

fn check_selector(kind: SelectorKind, sel: ArrayView1<usize>, len: usize) -> Result<(), ModelError> {
    match sel.iter().position(|&v| v >= len) {
        None => Ok(()),
        Some(index) => Err(ModelError::InvalidSelector {
            kind,
            index,
            value: sel[index],
            len,
        }),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::arr1;
    use std::f32::consts::PI;

    fn ref_traj() -> MultiRefTraj {
        MultiRefTraj::build(&MultiRefTrajConfig::default()).unwrap()
    }

    #[test]
    fn test_default_table() {
        let r = ref_traj();
        assert_eq!(r.n_paths(), 4);
        assert_eq!(r.n_speeds(), 2);

        // sine path at constant speed
        let p = r.point(2.0, 0, 0).unwrap();
        assert_eq!(p.x, 20.0);
        assert!((p.y - 1.5 * (2.0 * PI * 20.0 / 100.0).sin()).abs() < 1e-5);
        assert_eq!(p.u, 10.0);
    }

    #[test]
    fn test_batch_matches_single() {
        let r = ref_traj();
        let t = arr1(&[0.0, 1.3, 7.7, 25.0, 62.0]);
        let path_num = arr1(&[0, 1, 2, 3, 1]);
        let u_num = arr1(&[1, 0, 1, 0, 1]);
        let points = r
            .compute_points(t.view(), path_num.view(), u_num.view())
            .unwrap();
        let xs = r.compute_x(t.view(), path_num.view(), u_num.view()).unwrap();
        let phis = r.compute_phi(t.view(), path_num.view(), u_num.view()).unwrap();
        for i in 0..t.len() {
            let p = r.point(t[i], path_num[i], u_num[i]).unwrap();
            assert_eq!(points.x[i], p.x);
            assert_eq!(points.y[i], p.y);
            assert_eq!(points.phi[i], p.phi);
            assert_eq!(points.u[i], p.u);
            assert_eq!(xs[i], p.x);
            assert_eq!(phis[i], p.phi);
            assert!(p.phi > -PI && p.phi <= PI);
        }
    }

    #[test]
    fn test_circle_heading_is_wrapped() {
        let r = ref_traj();
        // 3/4 of the circle at 10 m/s: heading 3π/2 wraps to -π/2
        let t = 0.75 * 2.0 * PI * 100.0 / 10.0;
        let p = r.point(t, 3, 0).unwrap();
        assert!((p.phi + 0.5 * PI).abs() < 1e-3);
    }

    #[test]
    fn test_invalid_selector() {
        let r = ref_traj();
        let t = arr1(&[0.0, 0.0, 0.0]);
        let err = r
            .compute_y(t.view(), arr1(&[0, 4, 9]).view(), arr1(&[0, 0, 0]).view())
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::InvalidSelector {
                kind: SelectorKind::Path,
                index: 1,
                value: 4,
                len: 4
            }
        );

        let err = r
            .compute_u(t.view(), arr1(&[0, 0, 0]).view(), arr1(&[0, 0, 2]).view())
            .unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidSelector {
                kind: SelectorKind::Speed,
                index: 2,
                ..
            }
        ));

        assert!(r.point(0.0, 0, 5).is_err());
    }

    #[test]
    fn test_selector_length_mismatch() {
        let r = ref_traj();
        let err = r
            .compute_x(arr1(&[0.0, 1.0]).view(), arr1(&[0]).view(), arr1(&[0, 0]).view())
            .unwrap_err();
        assert!(matches!(err, ModelError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_config_yaml() {
        let config = MultiRefTrajConfig::default().speeds(vec![SpeedProfile::Constant { u: 8.0 }]);
        let yaml = serde_yaml::to_string(&config).unwrap();
        let config_: MultiRefTrajConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config, config_);
    }

    #[test]
    fn test_invalid_config() {
        assert!(MultiRefTraj::build(&MultiRefTrajConfig::default().paths(vec![])).is_err());
        let config = MultiRefTrajConfig::default().paths(vec![PathShape::Circle { radius: -1.0 }]);
        assert!(MultiRefTraj::build(&config).is_err());

        let config = MultiRefTrajConfig::default().speeds(vec![SpeedProfile::Sine {
            mean: 10.0,
            amplitude: 1.0,
            period: f32::INFINITY,
            phase: 0.0,
        }]);
        assert!(MultiRefTraj::build(&config).is_err());
        let config = MultiRefTrajConfig::default().paths(vec![PathShape::Circle {
            radius: f32::INFINITY,
        }]);
        assert!(MultiRefTraj::build(&config).is_err());
    }
}
