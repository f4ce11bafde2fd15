use ndarray::Array2;

#[derive(Clone, Debug, PartialEq)]
/// Batch of observations, one row per element.
pub struct VehObs(pub Array2<f32>);

impl vehtrack_core::Obs for VehObs {
    fn len(&self) -> usize {
        self.0.nrows()
    }
}

impl From<Array2<f32>> for VehObs {
    fn from(obs: Array2<f32>) -> Self {
        Self(obs)
    }
}
