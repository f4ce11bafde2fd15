//! Configuration of [`Veh2dofModel`](super::Veh2dofModel).
use crate::{Veh2dofDynamics, VehicleParams};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};
use vehtrack_ref_traj::SinePathConfig;

/// Configuration of [`Veh2dofModel`](super::Veh2dofModel).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct Veh2dofModelConfig {
    /// Base frequency [Hz]. Must equal [`Veh2dofDynamics::BASE_FREQUENCY`], the
    /// frequency the linear model was identified at.
    pub base_frequency: f32,

    /// Physical steer angle [rad] of a unit normalized steer.
    pub steer_scale: f32,

    /// Factors applied to `(v_y, r, delta_y, delta_phi)` before they reach a policy.
    pub obs_scale: [f32; 4],

    /// Physical parameters of the vehicle.
    ///
    /// Only the static axle loads are derived from them. The identified transition
    /// does not read these parameters, so changing them does not change the dynamics.
    pub vehicle: VehicleParams,

    /// Reference path.
    pub path: SinePathConfig,
}

impl Default for Veh2dofModelConfig {
    fn default() -> Self {
        Self {
            base_frequency: Veh2dofDynamics::BASE_FREQUENCY,
            steer_scale: Veh2dofDynamics::STEER_SCALE,
            obs_scale: [1.0, 2.0, 1.0, 2.4],
            vehicle: VehicleParams::default(),
            path: SinePathConfig::default(),
        }
    }
}

impl Veh2dofModelConfig {
    /// Sets the physical steer angle of a unit normalized steer.
    pub fn steer_scale(mut self, v: f32) -> Self {
        self.steer_scale = v;
        self
    }

    /// Sets the observation scales.
    pub fn obs_scale(mut self, v: [f32; 4]) -> Self {
        self.obs_scale = v;
        self
    }

    /// Sets the reference path.
    pub fn path(mut self, v: SinePathConfig) -> Self {
        self.path = v;
        self
    }

    /// Constructs [`Veh2dofModelConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`Veh2dofModelConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
