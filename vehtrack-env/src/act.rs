use ndarray::Array2;

#[derive(Clone, Debug, PartialEq)]
/// Batch of continuous actions, one row per element.
pub struct VehAct(pub Array2<f32>);

impl vehtrack_core::Act for VehAct {
    fn len(&self) -> usize {
        self.0.nrows()
    }
}

impl From<Array2<f32>> for VehAct {
    fn from(act: Array2<f32>) -> Self {
        Self(act)
    }
}
