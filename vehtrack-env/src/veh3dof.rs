//! Trajectory tracking with the global-frame three degree-of-freedom model.
mod config;
use crate::{Veh3dofDynamics, VehAct, VehObs};
use anyhow::{ensure, Result};
pub use config::Veh3dofModelConfig;
use log::{debug, info, trace};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Zip};
use std::f32::consts::PI;
use vehtrack_core::{
    util::{check_finite, check_len, check_shape, wrap_angle},
    EnvModel, Info, ModelError, Step,
};
use vehtrack_ref_traj::MultiRefTraj;

const Y_ERROR_LIMIT: f32 = 2.0;
const PHI_ERROR_LIMIT: f32 = PI / 4.0;
const X_ERROR_LIMIT: f32 = 5.0;

/// Non-observable state of [`Veh3dofModel`].
#[derive(Debug, Clone, PartialEq)]
pub struct Veh3dofInfo {
    /// Absolute vehicle states `(x, y, phi, u, v, w)`, one row per element.
    pub state: Array2<f32>,

    /// Current reference time [s].
    pub ref_time: Array1<f32>,

    /// Path shape selectors.
    pub path_num: Array1<usize>,

    /// Speed profile selectors.
    pub u_num: Array1<usize>,

    /// Constraint values. This model does not evaluate constraints and clears it.
    pub constraint: Option<Array2<f32>>,
}

impl Info for Veh3dofInfo {}

impl Veh3dofInfo {
    /// Creates an info without constraint values.
    pub fn new(
        state: Array2<f32>,
        ref_time: Array1<f32>,
        path_num: Array1<usize>,
        u_num: Array1<usize>,
    ) -> Self {
        Self {
            state,
            ref_time,
            path_num,
            u_num,
            constraint: None,
        }
    }

    /// Number of elements in the batch.
    pub fn len(&self) -> usize {
        self.state.nrows()
    }

    /// Returns `true` if the batch has no element.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Vehicle tracking a selectable reference trajectory.
///
/// The observation of an element is its error with respect to the reference at the
/// current time, `(x - x_ref, y - y_ref, wrap(phi - phi_ref), u - u_ref, v, w)`,
/// followed by `pre_horizon` pairs `(x - x_ref(t + i dt), y - y_ref(t + i dt))`
/// for `i = 1..=pre_horizon`.
///
/// An element is terminated when, after the step, its lateral error exceeds 2 m, its
/// heading error exceeds π/4 or its longitudinal error exceeds 5 m. A non-finite error
/// also terminates the element.
pub struct Veh3dofModel {
    dynamics: Veh3dofDynamics,
    ref_traj: MultiRefTraj,
    pre_horizon: usize,
    base_frequency: f32,
}

impl Veh3dofModel {
    /// Physical action bounds `(steer [rad], a_x [m/s^2])`.
    pub const ACTION_LOWER_BOUND: [f32; 2] = [-PI / 6.0, -3.0];

    /// See [`Veh3dofModel::ACTION_LOWER_BOUND`].
    pub const ACTION_UPPER_BOUND: [f32; 2] = [PI / 6.0, 3.0];

    /// Timestep [s].
    pub fn dt(&self) -> f32 {
        1.0 / self.base_frequency
    }

    /// Number of lookahead points.
    pub fn pre_horizon(&self) -> usize {
        self.pre_horizon
    }

    /// Vehicle dynamics.
    pub fn dynamics(&self) -> &Veh3dofDynamics {
        &self.dynamics
    }

    /// Reference trajectory table.
    pub fn ref_traj(&self) -> &MultiRefTraj {
        &self.ref_traj
    }

    /// Observation of the elements of `info`.
    ///
    /// This is the observation a caller pairs with a freshly reset info.
    pub fn observe(&self, info: &Veh3dofInfo) -> Result<VehObs, ModelError> {
        let n = info.len();
        self.check_info(info, n)?;
        let obs = self.error_obs(
            info.state.view(),
            info.ref_time.view(),
            info.path_num.view(),
            info.u_num.view(),
        )?;
        Ok(VehObs(obs))
    }

    /// Termination flags of absolute states at reference time `t`.
    pub fn judge_done(
        &self,
        state: ArrayView2<f32>,
        t: ArrayView1<f32>,
        path_num: ArrayView1<usize>,
        u_num: ArrayView1<usize>,
    ) -> Result<Vec<i8>, ModelError> {
        let n = state.nrows();
        check_shape("state", &[n, Veh3dofDynamics::STATE_DIM], state.shape())?;
        let refs = self.ref_traj.compute_points(t, path_num, u_num)?;
        Ok(Zip::from(state.rows())
            .and(&refs.x)
            .and(&refs.y)
            .and(&refs.phi)
            .map_collect(|s, &x, &y, &phi| {
                is_out_of_track(s[0] - x, s[1] - y, wrap_angle(s[2] - phi)) as i8
            })
            .to_vec())
    }

    fn check_info(&self, info: &Veh3dofInfo, n: usize) -> Result<(), ModelError> {
        check_shape(
            "info.state",
            &[n, Veh3dofDynamics::STATE_DIM],
            info.state.shape(),
        )?;
        check_len("info.ref_time", n, info.ref_time.len())?;
        self.ref_traj
            .validate(n, info.path_num.view(), info.u_num.view())
    }

    fn clip_actions(&self, act: ArrayView2<f32>) -> Array2<f32> {
        let mut act = act.to_owned();
        for (i, mut col) in act.columns_mut().into_iter().enumerate() {
            let (lo, hi) = (Self::ACTION_LOWER_BOUND[i], Self::ACTION_UPPER_BOUND[i]);
            col.mapv_inplace(|a| a.max(lo).min(hi));
        }
        act
    }

    fn error_obs(
        &self,
        state: ArrayView2<f32>,
        t: ArrayView1<f32>,
        path_num: ArrayView1<usize>,
        u_num: ArrayView1<usize>,
    ) -> Result<Array2<f32>, ModelError> {
        let n = state.nrows();
        let refs = self.ref_traj.compute_points(t, path_num, u_num)?;
        let mut obs = Array2::zeros((n, self.obs_dim()));
        Zip::from(obs.rows_mut())
            .and(state.rows())
            .and(&refs.x)
            .and(&refs.y)
            .and(&refs.phi)
            .and(&refs.u)
            .for_each(|mut o, s, &x, &y, &phi, &u| {
                o[0] = s[0] - x;
                o[1] = s[1] - y;
                o[2] = wrap_angle(s[2] - phi);
                o[3] = s[3] - u;
                o[4] = s[4];
                o[5] = s[5];
            });

        for i in 0..self.pre_horizon {
            let t_i = t.mapv(|t| t + (i + 1) as f32 / self.base_frequency);
            let refs = self.ref_traj.compute_points(t_i.view(), path_num, u_num)?;
            let col = Veh3dofDynamics::STATE_DIM + 2 * i;
            Zip::from(obs.column_mut(col))
                .and(state.column(0))
                .and(&refs.x)
                .for_each(|o, &x, &x_ref| *o = x - x_ref);
            Zip::from(obs.column_mut(col + 1))
                .and(state.column(1))
                .and(&refs.y)
                .for_each(|o, &y, &y_ref| *o = y - y_ref);
        }
        Ok(obs)
    }
}

// NaN errors count as out of track.
fn is_out_of_track(delta_x: f32, delta_y: f32, delta_phi: f32) -> bool {
    !(delta_y.abs() <= Y_ERROR_LIMIT
        && delta_phi.abs() <= PHI_ERROR_LIMIT
        && delta_x.abs() <= X_ERROR_LIMIT)
}

impl EnvModel for Veh3dofModel {
    type Config = Veh3dofModelConfig;
    type Obs = VehObs;
    type Act = VehAct;
    type Info = Veh3dofInfo;

    fn build(config: &Self::Config) -> Result<Self> {
        ensure!(config.pre_horizon > 0, "pre_horizon must be positive");
        ensure!(
            config.base_frequency > 0.0 && config.base_frequency.is_finite(),
            "Base frequency must be positive, got {}",
            config.base_frequency
        );
        ensure!(
            config.min_denominator >= 0.0,
            "min_denominator must not be negative, got {}",
            config.min_denominator
        );
        let ref_traj = MultiRefTraj::build(&config.ref_traj)?;
        let dynamics = Veh3dofDynamics::new(config.vehicle.clone(), config.min_denominator);
        let model = Self {
            dynamics,
            ref_traj,
            pre_horizon: config.pre_horizon,
            base_frequency: config.base_frequency,
        };
        info!(
            "Veh3dofModel: pre_horizon = {}, obs_dim = {}, dt = {}",
            model.pre_horizon,
            model.obs_dim(),
            model.dt()
        );
        Ok(model)
    }

    fn obs_dim(&self) -> usize {
        Veh3dofDynamics::STATE_DIM + 2 * self.pre_horizon
    }

    fn act_dim(&self) -> usize {
        Veh3dofDynamics::ACT_DIM
    }

    fn action_bounds(&self) -> (Vec<f32>, Vec<f32>) {
        (
            Self::ACTION_LOWER_BOUND.to_vec(),
            Self::ACTION_UPPER_BOUND.to_vec(),
        )
    }

    /// Advances every element by one timestep.
    ///
    /// The observation is recomputed from `info.state`; `obs` is only checked for its
    /// shape. Actions must be finite and are clipped into the action bounds.
    fn step(
        &self,
        obs: &VehObs,
        act: &VehAct,
        is_done: &[i8],
        mut info: Veh3dofInfo,
    ) -> Result<Step<Self>, ModelError> {
        trace!("Veh3dofModel::step()");
        let n = info.len();
        check_shape("obs", &[n, self.obs_dim()], obs.0.shape())?;
        check_shape("act", &[n, self.act_dim()], act.0.shape())?;
        check_len("is_done", n, is_done.len())?;
        self.check_info(&info, n)?;
        check_finite("act", act.0.view())?;

        let actions = self.clip_actions(act.0.view());
        let (path_num, u_num) = (info.path_num.view(), info.u_num.view());

        let obs_c = self.error_obs(info.state.view(), info.ref_time.view(), path_num, u_num)?;
        let reward = self.dynamics.compute_rewards(obs_c.view(), actions.view())?;
        let state_next =
            self.dynamics
                .prediction(info.state.view(), actions.view(), self.base_frequency)?;
        let t = info.ref_time.mapv(|t| t + 1.0 / self.base_frequency);

        let obs_next = self.error_obs(state_next.view(), t.view(), path_num, u_num)?;
        let is_terminated: Vec<i8> = obs_next
            .rows()
            .into_iter()
            .map(|o| is_out_of_track(o[0], o[1], o[2]) as i8)
            .collect();
        debug!(
            "Veh3dofModel::step(): {} of {} elements terminated",
            is_terminated.iter().filter(|&&d| d == 1).count(),
            n
        );

        info.state = state_next;
        info.ref_time = t;
        info.constraint = None;
        Ok(Step::new(VehObs(obs_next), reward.to_vec(), is_terminated, info))
    }
}
