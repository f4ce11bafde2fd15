#![warn(missing_docs)]
//! Batched vehicle path-tracking models.
//!
//! Two models are provided, both implementing [`vehtrack_core::EnvModel`]:
//!
//! * [`Veh3dofModel`] integrates a nonlinear bicycle model in the global frame and
//!   observes the vehicle relative to a reference trajectory chosen per element from
//!   [`vehtrack_ref_traj::MultiRefTraj`], including a preview of upcoming reference
//!   points. Elements leaving the track are flagged as terminated.
//! * [`Veh2dofModel`] advances an identified linear model whose state already is the
//!   tracking error with respect to a fixed [`vehtrack_ref_traj::SinePath`].
//!
//! Every operation works on a batch of `n` independent elements, one row each, and
//! never mixes rows.
//!
//! ```no_run
//! use vehtrack_core::EnvModel;
//! use vehtrack_env::{Veh3dofModel, Veh3dofModelConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Veh3dofModelConfig::default().pre_horizon(5);
//! let model = Veh3dofModel::build(&config)?;
//! assert_eq!(model.obs_dim(), 16);
//! # Ok(())
//! # }
//! ```
mod act;
pub mod dynamics;
mod obs;
mod veh2dof;
mod veh3dof;
pub use act::VehAct;
pub use dynamics::{DynamicsModel, Veh2dofDynamics, Veh3dofDynamics, VehicleParams};
pub use obs::VehObs;
pub use veh2dof::{Rollout, Veh2dofInfo, Veh2dofModel, Veh2dofModelConfig};
pub use veh3dof::{Veh3dofInfo, Veh3dofModel, Veh3dofModelConfig};
