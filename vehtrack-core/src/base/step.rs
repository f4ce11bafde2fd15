//! Environment model step.
use super::EnvModel;
use std::fmt;

/// Additional information to `Obs` and `Act`.
///
/// It carries the raw simulation state from which observations are derived,
/// but which is not itself visible to a policy.
pub trait Info {}

impl Info for () {}

/// The outcome of [`EnvModel::step`] for a batch: `(o_t+1, r_t, done_t+1, info_t+1)`.
pub struct Step<E: EnvModel> {
    /// Observation.
    pub obs: E::Obs,

    /// Reward.
    pub reward: Vec<f32>,

    /// Flag denoting if episode is terminated.
    pub is_terminated: Vec<i8>,

    /// Information threaded to the next step.
    pub info: E::Info,
}

impl<E: EnvModel> fmt::Debug for Step<E>
where
    E::Info: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("obs", &self.obs)
            .field("reward", &self.reward)
            .field("is_terminated", &self.is_terminated)
            .field("info", &self.info)
            .finish()
    }
}

impl<E: EnvModel> Step<E> {
    /// Constructs a [`Step`] object.
    pub fn new(obs: E::Obs, reward: Vec<f32>, is_terminated: Vec<i8>, info: E::Info) -> Self {
        Step {
            obs,
            reward,
            is_terminated,
            info,
        }
    }

    /// Number of elements in the batch.
    pub fn len(&self) -> usize {
        self.reward.len()
    }

    /// Returns `true` if the batch has no element.
    pub fn is_empty(&self) -> bool {
        self.reward.is_empty()
    }

    #[inline]
    /// Terminated flag of the `i`-th element.
    pub fn is_done(&self, i: usize) -> bool {
        self.is_terminated[i] == 1
    }

    /// Returns `true` if every element is terminated.
    pub fn all_done(&self) -> bool {
        self.is_terminated.iter().all(|&d| d == 1)
    }

    /// Decomposes into `(obs, reward, is_terminated, info)`.
    pub fn unpack(self) -> (E::Obs, Vec<f32>, Vec<i8>, E::Info) {
        (self.obs, self.reward, self.is_terminated, self.info)
    }
}
