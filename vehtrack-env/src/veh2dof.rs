//! Path following with the error-frame two degree-of-freedom model.
mod config;
use crate::{Veh2dofDynamics, VehAct, VehObs};
use anyhow::{ensure, Result};
pub use config::Veh2dofModelConfig;
use log::{info, trace};
use ndarray::{s, Array1, Array2, ArrayView1, Zip};
use vehtrack_core::{
    util::{check_finite, check_len, check_shape},
    EnvModel, Info, ModelError, Obs, Step,
};
use vehtrack_ref_traj::SinePath;

/// Non-observable state of [`Veh2dofModel`].
///
/// The error-frame state is fully observable, so only the constraint slot remains.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Veh2dofInfo {
    /// Constraint values. This model does not evaluate constraints and clears it.
    pub constraint: Option<Array2<f32>>,
}

impl Info for Veh2dofInfo {}

/// Outcome of [`Veh2dofModel::rollout`].
#[derive(Debug, Clone)]
pub struct Rollout {
    /// Observation after every step.
    pub obs: Vec<VehObs>,

    /// Sum of rewards over the rollout, per element.
    pub v_pi: Array1<f32>,

    /// Termination flags after every step.
    pub is_terminated: Vec<Vec<i8>>,
}

/// Vehicle following a fixed sinusoidal path, observed through its tracking errors.
///
/// The observation is the state `(v_y, r, delta_y, delta_phi)` itself and the action is
/// a normalized steer. The model never terminates an element; episode ends are left
/// to the caller.
pub struct Veh2dofModel {
    dynamics: Veh2dofDynamics,
    path: SinePath,
    base_frequency: f32,
    obs_scale: [f32; 4],
}

impl Veh2dofModel {
    /// Vehicle dynamics.
    pub fn dynamics(&self) -> &Veh2dofDynamics {
        &self.dynamics
    }

    /// Reference path.
    pub fn path(&self) -> &SinePath {
        &self.path
    }

    /// Observations with each component multiplied by its scale.
    pub fn scale_obs(&self, obs: &VehObs) -> VehObs {
        let mut scaled = obs.0.clone();
        for (mut col, &k) in scaled.columns_mut().into_iter().zip(self.obs_scale.iter()) {
            col.mapv_inplace(|v| v * k);
        }
        VehObs(scaled)
    }

    /// Error-frame observations of vehicles at abscissa `x` with lateral position `y`
    /// and heading `phi`.
    pub fn error_state(
        &self,
        x: ArrayView1<f32>,
        v_y: ArrayView1<f32>,
        r: ArrayView1<f32>,
        y: ArrayView1<f32>,
        phi: ArrayView1<f32>,
    ) -> Result<VehObs, ModelError> {
        let n = x.len();
        let lens = [
            ("v_y", v_y.len()),
            ("r", r.len()),
            ("y", y.len()),
            ("phi", phi.len()),
        ];
        for (what, len) in lens.iter() {
            check_len(what, n, *len)?;
        }
        let delta_y = self.path.compute_delta_y(x, y);
        let delta_phi = self.path.compute_delta_phi(x, phi);
        let mut obs = Array2::zeros((n, Veh2dofDynamics::STATE_DIM));
        obs.column_mut(0).assign(&v_y);
        obs.column_mut(1).assign(&r);
        obs.column_mut(2).assign(&delta_y);
        obs.column_mut(3).assign(&delta_phi);
        Ok(VehObs(obs))
    }

    /// Absolute lateral positions and headings `(y, phi)` of vehicles at abscissa `x`.
    pub fn absolute_pose(
        &self,
        x: ArrayView1<f32>,
        obs: &VehObs,
    ) -> Result<(Array1<f32>, Array1<f32>), ModelError> {
        check_shape(
            "obs",
            &[x.len(), Veh2dofDynamics::STATE_DIM],
            obs.0.shape(),
        )?;
        let y = self.path.compute_y(x, obs.0.slice(s![.., 2]));
        let phi = self.path.compute_phi(x, obs.0.slice(s![.., 3]));
        Ok((y, phi))
    }

    /// Rolls out `n` steps from `obs`, querying `policy` with scaled observations.
    pub fn rollout<F>(&self, obs: &VehObs, mut policy: F, n: usize) -> Result<Rollout, ModelError>
    where
        F: FnMut(&VehObs) -> VehAct,
    {
        let batch = obs.len();
        let mut obs = obs.clone();
        let mut info = Veh2dofInfo::default();
        let mut rollout = Rollout {
            obs: Vec::with_capacity(n),
            v_pi: Array1::zeros(batch),
            is_terminated: Vec::with_capacity(n),
        };
        let is_done = vec![0; batch];

        for _ in 0..n {
            let act = policy(&self.scale_obs(&obs));
            let (obs_next, reward, is_terminated, info_next) =
                self.step(&obs, &act, &is_done, info)?.unpack();
            Zip::from(&mut rollout.v_pi)
                .and(&Array1::from(reward))
                .for_each(|v, &r| *v += r);
            rollout.obs.push(obs_next.clone());
            rollout.is_terminated.push(is_terminated);
            obs = obs_next;
            info = info_next;
        }
        Ok(rollout)
    }
}

impl EnvModel for Veh2dofModel {
    type Config = Veh2dofModelConfig;
    type Obs = VehObs;
    type Act = VehAct;
    type Info = Veh2dofInfo;

    fn build(config: &Self::Config) -> Result<Self> {
        ensure!(
            config.base_frequency == Veh2dofDynamics::BASE_FREQUENCY,
            "The linear model is identified at {} Hz, got base frequency {}",
            Veh2dofDynamics::BASE_FREQUENCY,
            config.base_frequency
        );
        let path = SinePath::build(&config.path)?;
        let dynamics = Veh2dofDynamics::new(config.vehicle.clone(), config.steer_scale);
        info!(
            "Veh2dofModel: steer_scale = {}, obs_scale = {:?}",
            config.steer_scale, config.obs_scale
        );
        Ok(Self {
            dynamics,
            path,
            base_frequency: config.base_frequency,
            obs_scale: config.obs_scale,
        })
    }

    fn obs_dim(&self) -> usize {
        Veh2dofDynamics::STATE_DIM
    }

    fn act_dim(&self) -> usize {
        Veh2dofDynamics::ACT_DIM
    }

    /// Bounds of the normalized steer.
    fn action_bounds(&self) -> (Vec<f32>, Vec<f32>) {
        (vec![-1.0], vec![1.0])
    }

    /// Advances every element by one timestep.
    ///
    /// The reward is computed from the state before the step. The returned
    /// termination flags are all zero. Actions must be finite.
    fn step(
        &self,
        obs: &VehObs,
        act: &VehAct,
        is_done: &[i8],
        mut info: Veh2dofInfo,
    ) -> Result<Step<Self>, ModelError> {
        trace!("Veh2dofModel::step()");
        let n = obs.len();
        check_shape("obs", &[n, self.obs_dim()], obs.0.shape())?;
        check_shape("act", &[n, self.act_dim()], act.0.shape())?;
        check_len("is_done", n, is_done.len())?;
        check_finite("act", act.0.view())?;

        let actions = self.dynamics.scale_action(act.0.view());
        let reward = self.dynamics.compute_rewards(obs.0.view(), actions.view())?;
        let states = self
            .dynamics
            .prediction(obs.0.view(), actions.view(), self.base_frequency)?;

        info.constraint = None;
        Ok(Step::new(VehObs(states), reward.to_vec(), vec![0; n], info))
    }
}
