//! Core functionalities.
mod env;
mod step;
pub use env::EnvModel;
use std::fmt::Debug;
pub use step::{Info, Step};

/// A batch of observations of an environment model.
///
/// Each observation in the batch belongs to an independent simulated system.
pub trait Obs: Clone + Debug {
    /// Returns the number of observations in the batch.
    fn len(&self) -> usize;

    /// Returns `true` if the batch has no element.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A batch of actions of an environment model.
pub trait Act: Clone + Debug {
    /// Returns the number of actions in the batch.
    fn len(&self) -> usize;

    /// Returns `true` if the batch has no element.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
