#![warn(missing_docs)]
//! Core abstractions for batched, learned-control environment models.
//!
//! An environment model advances a whole batch of simulated systems by one
//! timestep in a single call. The batch dimension is always the leading one
//! and elements never interact, so slicing a batch and stepping the slices
//! separately gives the same result as stepping the whole batch.
//!
//! The crate provides:
//!
//! * [`Obs`] and [`Act`], batches of observations and actions,
//! * [`Info`], the typed side channel carrying non-observable state,
//! * [`EnvModel`], the stepping interface, and [`Step`], its result bundle,
//! * [`ModelError`], the failures a step can report to its caller,
//! * angle wrapping helpers in [`util`].
pub mod error;
pub mod util;

mod base;
pub use base::{Act, EnvModel, Info, Obs, Step};
pub use error::{ModelError, SelectorKind};
