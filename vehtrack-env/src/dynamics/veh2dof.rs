//! Two degree-of-freedom vehicle dynamics in the error frame.
use super::VehicleParams;
use ndarray::{Array1, Array2, ArrayView2, Zip};
use std::f32::consts::PI;
use vehtrack_core::{
    util::{check_shape, wrap_angle},
    ModelError,
};

// Identified at the 10 Hz base frequency.
const A: [[f32; 4]; 4] = [
    [0.4411, -0.6398, 0.0, 0.0],
    [0.0242, 0.2188, 0.0, 0.0],
    [0.0703, 0.0171, 1.0, 2.0],
    [0.0018, 0.0523, 0.0, 1.0],
];
const B: [f32; 4] = [2.0350, 4.8124, 0.4046, 0.2952];

/// Linear lateral model with states `(v_y, r, delta_y, delta_phi)` and action `steer`.
///
/// The transition `x' = A x + B u` uses pre-identified constant matrices, so the
/// step size is fixed by the identification and no singularity can occur.
#[derive(Debug, Clone)]
pub struct Veh2dofDynamics {
    params: VehicleParams,
    f_zf: f32,
    f_zr: f32,
    steer_scale: f32,
}

impl Veh2dofDynamics {
    /// Dimension of the state.
    pub const STATE_DIM: usize = 4;

    /// Dimension of the action.
    pub const ACT_DIM: usize = 1;

    /// Default physical steer angle [rad] of a unit normalized steer.
    pub const STEER_SCALE: f32 = 1.2 * PI / 9.0;

    /// Frequency [Hz] the matrices were identified at.
    pub const BASE_FREQUENCY: f32 = 10.0;

    const W_Y: f32 = 0.4;
    const W_PHI: f32 = 0.1;
    const W_YAW_RATE: f32 = 0.2;
    const W_STEER: f32 = 0.5;

    /// Creates the dynamics.
    pub fn new(params: VehicleParams, steer_scale: f32) -> Self {
        let (f_zf, f_zr) = params.static_loads();
        Self {
            params,
            f_zf,
            f_zr,
            steer_scale,
        }
    }

    /// Physical parameters of the vehicle the model was identified on.
    pub fn params(&self) -> &VehicleParams {
        &self.params
    }

    /// Static axle loads `(F_zf, F_zr)`.
    pub fn static_loads(&self) -> (f32, f32) {
        (self.f_zf, self.f_zr)
    }

    /// Scales normalized steers into physical steer angles.
    pub fn scale_action(&self, steer_norm: ArrayView2<f32>) -> Array2<f32> {
        steer_norm.mapv(|s| s * self.steer_scale)
    }

    /// One transition. The step size is implied by the identified matrices.
    pub fn f_xu(
        &self,
        states: ArrayView2<f32>,
        actions: ArrayView2<f32>,
    ) -> Result<Array2<f32>, ModelError> {
        let n = states.nrows();
        check_shape("state", &[n, Self::STATE_DIM], states.shape())?;
        check_shape("action", &[n, Self::ACT_DIM], actions.shape())?;

        let mut next = Array2::zeros((n, Self::STATE_DIM));
        Zip::from(next.rows_mut())
            .and(states.rows())
            .and(actions.rows())
            .for_each(|mut next, s, a| {
                for (i, (row, b)) in A.iter().zip(B.iter()).enumerate() {
                    next[i] = s[0] * row[0]
                        + s[1] * row[1]
                        + s[2] * row[2]
                        + s[3] * row[3]
                        + b * a[0];
                }
            });
        Ok(next)
    }

    /// Next states with the heading error wrapped into `(-π, π]`.
    ///
    /// `frequency` must be [`Veh2dofDynamics::BASE_FREQUENCY`]; it is accepted for
    /// symmetry with the global-frame model.
    pub fn prediction(
        &self,
        states: ArrayView2<f32>,
        actions: ArrayView2<f32>,
        _frequency: f32,
    ) -> Result<Array2<f32>, ModelError> {
        let mut next = self.f_xu(states, actions)?;
        next.column_mut(3).mapv_inplace(wrap_angle);
        Ok(next)
    }

    /// Scales normalized steers and returns the next states.
    pub fn simulation(
        &self,
        states: ArrayView2<f32>,
        steer_norm: ArrayView2<f32>,
        frequency: f32,
    ) -> Result<Array2<f32>, ModelError> {
        let actions = self.scale_action(steer_norm);
        self.prediction(states, actions.view(), frequency)
    }

    /// Rewards for states `(v_y, r, delta_y, delta_phi)` and physical steers.
    pub fn compute_rewards(
        &self,
        states: ArrayView2<f32>,
        actions: ArrayView2<f32>,
    ) -> Result<Array1<f32>, ModelError> {
        let n = states.nrows();
        check_shape("state", &[n, Self::STATE_DIM], states.shape())?;
        check_shape("action", &[n, Self::ACT_DIM], actions.shape())?;

        Ok(Zip::from(states.rows())
            .and(actions.rows())
            .map_collect(|s, a| {
                let (r, delta_y, delta_phi) = (s[1], s[2], s[3]);
                let steer = a[0];
                Self::W_Y * -(delta_y * delta_y)
                    + Self::W_PHI * -(delta_phi * delta_phi)
                    + Self::W_YAW_RATE * -(r * r)
                    + Self::W_STEER * -(steer * steer)
            }))
    }
}
