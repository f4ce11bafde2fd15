//! Environment model.
use super::{Act, Info, Obs, Step};
use crate::error::ModelError;
use anyhow::Result;

/// Represents a batched environment model, typically the transition function of an MDP.
///
/// Unlike a stateful environment, an [`EnvModel`] does not own the simulated state.
/// The caller passes the current observation and [`Info`] into [`EnvModel::step`]
/// and receives the next ones in the returned [`Step`], so a step is a pure function
/// of its arguments.
pub trait EnvModel {
    /// Configurations.
    type Config: Clone;

    /// Observation of the model.
    type Obs: Obs;

    /// Action of the model.
    type Act: Act;

    /// Non-observable state threaded through [`EnvModel::step`].
    type Info: Info;

    /// Builds a model.
    fn build(config: &Self::Config) -> Result<Self>
    where
        Self: Sized;

    /// Dimension of a single observation.
    fn obs_dim(&self) -> usize;

    /// Dimension of a single action.
    fn act_dim(&self) -> usize;

    /// Lower and upper bounds of a single physical action.
    fn action_bounds(&self) -> (Vec<f32>, Vec<f32>);

    /// Performs a model step for every element of the batch.
    ///
    /// `is_done` is the termination mask of the previous step. Its length must match
    /// the batch size. Stepping elements that are already done is the caller's concern.
    fn step(
        &self,
        obs: &Self::Obs,
        act: &Self::Act,
        is_done: &[i8],
        info: Self::Info,
    ) -> Result<Step<Self>, ModelError>
    where
        Self: Sized;
}
