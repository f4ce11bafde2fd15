//! Configuration of [`Veh3dofModel`](super::Veh3dofModel).
use crate::VehicleParams;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};
use vehtrack_ref_traj::MultiRefTrajConfig;

/// Configuration of [`Veh3dofModel`](super::Veh3dofModel).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct Veh3dofModelConfig {
    /// Number of lookahead reference points appended to the observation.
    pub pre_horizon: usize,

    /// Base frequency [Hz]. The timestep is its reciprocal.
    pub base_frequency: f32,

    /// Smallest admissible denominator of the implicit lateral update.
    pub min_denominator: f32,

    /// Physical parameters of the vehicle.
    pub vehicle: VehicleParams,

    /// Reference trajectory table.
    pub ref_traj: MultiRefTrajConfig,
}

impl Default for Veh3dofModelConfig {
    fn default() -> Self {
        Self {
            pre_horizon: 10,
            base_frequency: 10.0,
            min_denominator: 1.0,
            vehicle: VehicleParams::default(),
            ref_traj: MultiRefTrajConfig::default(),
        }
    }
}

impl Veh3dofModelConfig {
    /// Sets the number of lookahead points.
    pub fn pre_horizon(mut self, v: usize) -> Self {
        self.pre_horizon = v;
        self
    }

    /// Sets the base frequency.
    pub fn base_frequency(mut self, v: f32) -> Self {
        self.base_frequency = v;
        self
    }

    /// Sets the smallest admissible denominator.
    pub fn min_denominator(mut self, v: f32) -> Self {
        self.min_denominator = v;
        self
    }

    /// Sets the vehicle parameters.
    pub fn vehicle(mut self, v: VehicleParams) -> Self {
        self.vehicle = v;
        self
    }

    /// Sets the reference trajectory table.
    pub fn ref_traj(mut self, v: MultiRefTrajConfig) -> Self {
        self.ref_traj = v;
        self
    }

    /// Constructs [`Veh3dofModelConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`Veh3dofModelConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
