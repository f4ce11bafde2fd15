#![warn(missing_docs)]
//! Reference trajectories tracked by the vehicle environment models.
//!
//! Two families are provided:
//!
//! * [`SinePath`], a fixed superposition of sinusoids used by the reduced
//!   error-frame model. The lateral position and heading are functions of the
//!   longitudinal coordinate only.
//! * [`MultiRefTraj`], a table of path shapes ([`PathShape`]) and speed profiles
//!   ([`SpeedProfile`]) used by the full global-frame model. Each batch element
//!   selects one entry of each table with a `(path_num, u_num)` pair and the
//!   reference pose and speed are evaluated at a simulation time.
//!
//! All heading outputs are wrapped into `(-π, π]` with
//! [`wrap_angle`](vehtrack_core::util::wrap_angle).
mod multi_ref_traj;
mod path;
mod sine_path;
mod speed;
pub use multi_ref_traj::{MultiRefTraj, MultiRefTrajConfig, RefPoint, RefPoints};
pub use path::PathShape;
pub use sine_path::{SineCurve, SinePath, SinePathConfig};
pub use speed::SpeedProfile;
