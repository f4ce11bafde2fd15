//! Three degree-of-freedom vehicle dynamics in the global frame.
use super::VehicleParams;
use ndarray::{Array1, Array2, ArrayView2, Zip};
use vehtrack_core::{
    util::{check_shape, wrap_angle},
    ModelError,
};

/// Nonlinear bicycle model with states `(x, y, phi, u, v, w)` and actions `(steer, a_x)`.
///
/// Position, heading and longitudinal speed are integrated with forward Euler.
/// Lateral velocity and yaw rate come from a first-order implicit step of the linear
/// tire model, which stays stable at the 10 Hz base frequency where explicit Euler
/// would not. The implicit step divides by
///
/// * `m u - dt (k_f + k_r)` for the lateral velocity,
/// * `I_z u - dt (l_f^2 k_f + l_r^2 k_r)` for the yaw rate.
///
/// With negative cornering stiffnesses both are positive for forward motion and
/// vanish at a negative `u`. A step fails with [`ModelError::Singularity`] when either
/// of them is not above `min_denominator`.
#[derive(Debug, Clone)]
pub struct Veh3dofDynamics {
    params: VehicleParams,
    f_zf: f32,
    f_zr: f32,
    min_denominator: f32,
}

impl Veh3dofDynamics {
    /// Dimension of the state.
    pub const STATE_DIM: usize = 6;

    /// Dimension of the action.
    pub const ACT_DIM: usize = 2;

    const W_Y: f32 = 0.1;
    const W_U: f32 = 0.01;
    const W_PHI: f32 = 0.01;
    const W_YAW_RATE: f32 = 0.01;
    const W_STEER: f32 = 0.01;
    const W_A_X: f32 = 0.01;
    const W_X: f32 = 0.04;

    /// Creates the dynamics.
    pub fn new(params: VehicleParams, min_denominator: f32) -> Self {
        let (f_zf, f_zr) = params.static_loads();
        Self {
            params,
            f_zf,
            f_zr,
            min_denominator,
        }
    }

    /// Physical parameters.
    pub fn params(&self) -> &VehicleParams {
        &self.params
    }

    /// Static axle loads `(F_zf, F_zr)`.
    pub fn static_loads(&self) -> (f32, f32) {
        (self.f_zf, self.f_zr)
    }

    /// Denominators of the lateral velocity and yaw rate updates at speed `u`.
    pub fn denominators(&self, u: f32, delta_t: f32) -> (f32, f32) {
        let p = &self.params;
        (
            p.m * u - delta_t * (p.k_f + p.k_r),
            p.i_z * u - delta_t * (p.l_f * p.l_f * p.k_f + p.l_r * p.l_r * p.k_r),
        )
    }

    fn check_denominators(&self, states: &ArrayView2<f32>, delta_t: f32) -> Result<(), ModelError> {
        let singular = states.column(3).iter().enumerate().find_map(|(index, &u)| {
            let (den_v, den_w) = self.denominators(u, delta_t);
            [den_v, den_w]
                .iter()
                // written to also reject NaN
                .find(|&&d| !(d > self.min_denominator))
                .map(|&denominator| ModelError::Singularity {
                    index,
                    u,
                    denominator,
                })
        });
        match singular {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// One transition with step size `delta_t`, without wrapping the heading.
    pub fn f_xu(
        &self,
        states: ArrayView2<f32>,
        actions: ArrayView2<f32>,
        delta_t: f32,
    ) -> Result<Array2<f32>, ModelError> {
        let n = states.nrows();
        check_shape("state", &[n, Self::STATE_DIM], states.shape())?;
        check_shape("action", &[n, Self::ACT_DIM], actions.shape())?;
        self.check_denominators(&states, delta_t)?;

        let VehicleParams {
            k_f,
            k_r,
            l_f,
            l_r,
            m,
            i_z,
            ..
        } = self.params;
        let mut next = Array2::zeros((n, Self::STATE_DIM));
        Zip::from(next.rows_mut())
            .and(states.rows())
            .and(actions.rows())
            .for_each(|mut next, s, a| {
                let (x, y, phi, u, v, w) = (s[0], s[1], s[2], s[3], s[4], s[5]);
                let (steer, a_x) = (a[0], a[1]);
                next[0] = x + delta_t * (u * phi.cos() - v * phi.sin());
                next[1] = y + delta_t * (u * phi.sin() + v * phi.cos());
                next[2] = phi + delta_t * w;
                next[3] = u + delta_t * a_x;
                next[4] = (m * v * u + delta_t * (l_f * k_f - l_r * k_r) * w
                    - delta_t * k_f * steer * u
                    - delta_t * m * u * u * w)
                    / (m * u - delta_t * (k_f + k_r));
                next[5] = (i_z * w * u + delta_t * (l_f * k_f - l_r * k_r) * v
                    - delta_t * l_f * k_f * steer * u)
                    / (i_z * u - delta_t * (l_f * l_f * k_f + l_r * l_r * k_r));
            });
        Ok(next)
    }

    /// Next states at the given base frequency, with the heading wrapped into `(-π, π]`.
    pub fn prediction(
        &self,
        states: ArrayView2<f32>,
        actions: ArrayView2<f32>,
        frequency: f32,
    ) -> Result<Array2<f32>, ModelError> {
        let mut next = self.f_xu(states, actions, 1.0 / frequency)?;
        next.column_mut(2).mapv_inplace(wrap_angle);
        Ok(next)
    }

    /// Rewards for error observations `(dx, dy, dphi, du, v, w, ..)` and physical actions.
    ///
    /// Columns after the sixth, such as lookahead features, are ignored.
    pub fn compute_rewards(
        &self,
        obs: ArrayView2<f32>,
        actions: ArrayView2<f32>,
    ) -> Result<Array1<f32>, ModelError> {
        let n = obs.nrows();
        if obs.ncols() < Self::STATE_DIM {
            return Err(ModelError::ShapeMismatch {
                what: "obs".to_string(),
                expected: vec![n, Self::STATE_DIM],
                actual: obs.shape().to_vec(),
            });
        }
        check_shape("action", &[n, Self::ACT_DIM], actions.shape())?;

        Ok(Zip::from(obs.rows())
            .and(actions.rows())
            .map_collect(|o, a| {
                let (delta_x, delta_y, delta_phi, delta_u, w) = (o[0], o[1], o[2], o[3], o[5]);
                let (steer, a_x) = (a[0], a[1]);
                Self::W_Y * -(delta_y * delta_y)
                    + Self::W_U * -(delta_u * delta_u)
                    + Self::W_PHI * -(delta_phi * delta_phi)
                    + Self::W_YAW_RATE * -(w * w)
                    + Self::W_STEER * -(steer * steer)
                    + Self::W_A_X * -(a_x * a_x)
                    + Self::W_X * -(delta_x * delta_x)
            }))
    }
}
