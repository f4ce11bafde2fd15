//! Vehicle dynamics: state transitions and rewards.
//!
//! The two models share no base abstraction. Their state dimension, integration
//! scheme and termination policy differ, so they are separate types tagged by
//! [`DynamicsModel`] where a caller needs to handle either.
mod params;
mod veh2dof;
mod veh3dof;
use ndarray::{Array1, Array2, ArrayView2};
pub use params::VehicleParams;
pub use veh2dof::Veh2dofDynamics;
pub use veh3dof::Veh3dofDynamics;
use vehtrack_core::ModelError;

/// Either of the vehicle dynamics models.
#[derive(Debug, Clone)]
pub enum DynamicsModel {
    /// Global-frame nonlinear bicycle model.
    Veh3dof(Veh3dofDynamics),

    /// Error-frame identified linear model.
    Veh2dof(Veh2dofDynamics),
}

impl DynamicsModel {
    /// Dimension of the state.
    pub fn state_dim(&self) -> usize {
        match self {
            DynamicsModel::Veh3dof(_) => Veh3dofDynamics::STATE_DIM,
            DynamicsModel::Veh2dof(_) => Veh2dofDynamics::STATE_DIM,
        }
    }

    /// Dimension of the physical action.
    pub fn act_dim(&self) -> usize {
        match self {
            DynamicsModel::Veh3dof(_) => Veh3dofDynamics::ACT_DIM,
            DynamicsModel::Veh2dof(_) => Veh2dofDynamics::ACT_DIM,
        }
    }

    /// Returns `true` if the environment model built on these dynamics decides
    /// termination itself. The error-frame model leaves it to the caller.
    pub fn judges_termination(&self) -> bool {
        matches!(self, DynamicsModel::Veh3dof(_))
    }

    /// Next states for physical actions.
    pub fn prediction(
        &self,
        states: ArrayView2<f32>,
        actions: ArrayView2<f32>,
        frequency: f32,
    ) -> Result<Array2<f32>, ModelError> {
        match self {
            DynamicsModel::Veh3dof(d) => d.prediction(states, actions, frequency),
            DynamicsModel::Veh2dof(d) => d.prediction(states, actions, frequency),
        }
    }

    /// Rewards for error-frame observations and physical actions.
    pub fn compute_rewards(
        &self,
        obs: ArrayView2<f32>,
        actions: ArrayView2<f32>,
    ) -> Result<Array1<f32>, ModelError> {
        match self {
            DynamicsModel::Veh3dof(d) => d.compute_rewards(obs, actions),
            DynamicsModel::Veh2dof(d) => d.compute_rewards(obs, actions),
        }
    }
}

impl From<Veh3dofDynamics> for DynamicsModel {
    fn from(d: Veh3dofDynamics) -> Self {
        DynamicsModel::Veh3dof(d)
    }
}

impl From<Veh2dofDynamics> for DynamicsModel {
    fn from(d: Veh2dofDynamics) -> Self {
        DynamicsModel::Veh2dof(d)
    }
}
