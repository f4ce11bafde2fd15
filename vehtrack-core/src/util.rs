//! Angle wrapping and argument checks shared by models.
use crate::error::ModelError;
use ndarray::{ArrayBase, ArrayView2, DataMut, Ix1};
use std::f32::consts::PI;

const TWO_PI: f32 = 2.0 * PI;

// Beyond this magnitude the stepwise correction is preceded by a modulo reduction.
const REDUCE_LIMIT: f32 = 64.0 * PI;

/// Wraps an angle into `(-π, π]`.
///
/// Values above `π` are shifted down by `2π`, values at or below `-π` are shifted up
/// by `2π`. Thus `-π` maps to `π` and `π` stays `π`. Non-finite values are returned
/// as is.
pub fn wrap_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return angle;
    }
    let mut a = if angle.abs() > REDUCE_LIMIT {
        angle.rem_euclid(TWO_PI)
    } else {
        angle
    };
    while a > PI {
        a -= TWO_PI;
    }
    while a <= -PI {
        a += TWO_PI;
    }
    a
}

/// Wraps every element of a 1-dimensional array into `(-π, π]` in place.
pub fn wrap_angles<S: DataMut<Elem = f32>>(angles: &mut ArrayBase<S, Ix1>) {
    angles.mapv_inplace(wrap_angle);
}

/// Fails with [`ModelError::ShapeMismatch`] unless `actual == expected`.
pub fn check_shape(what: &str, expected: &[usize], actual: &[usize]) -> Result<(), ModelError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ModelError::ShapeMismatch {
            what: what.to_string(),
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        })
    }
}

/// Fails with [`ModelError::ShapeMismatch`] unless a batch has `expected` elements.
pub fn check_len(what: &str, expected: usize, actual: usize) -> Result<(), ModelError> {
    check_shape(what, &[expected], &[actual])
}

/// Fails with [`ModelError::NonFinite`] on the first row holding a NaN or infinite value.
pub fn check_finite(what: &str, values: ArrayView2<f32>) -> Result<(), ModelError> {
    let bad = values
        .rows()
        .into_iter()
        .enumerate()
        .find_map(|(index, row)| row.iter().find(|v| !v.is_finite()).map(|&v| (index, v)));
    match bad {
        None => Ok(()),
        Some((index, value)) => Err(ModelError::NonFinite {
            what: what.to_string(),
            index,
            value,
        }),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::{arr1, arr2};

    #[test]
    fn test_wrap_boundaries() {
        assert_eq!(wrap_angle(-PI), PI);
        assert_eq!(wrap_angle(PI), PI);
        assert_eq!(wrap_angle(0.0), 0.0);

        let a = wrap_angle(PI + 0.01);
        assert!((a - (0.01 - PI)).abs() < 1e-6);
        assert_eq!(a, (PI + 0.01) - TWO_PI);
    }

    #[test]
    fn test_wrap_closure_and_idempotence() {
        let rng = fastrand::Rng::with_seed(42);
        for _ in 0..10_000 {
            let a = (rng.f32() - 0.5) * 200.0;
            let w = wrap_angle(a);
            assert!(w > -PI && w <= PI, "{} -> {}", a, w);
            assert_eq!(wrap_angle(w), w);
        }
        for &a in [1e7f32, -1e7, 3.0e30, -3.0e30].iter() {
            let w = wrap_angle(a);
            assert!(w > -PI && w <= PI, "{} -> {}", a, w);
        }
    }

    #[test]
    fn test_wrap_angles() {
        let mut a = arr1(&[-PI, 0.5, PI + 0.5]);
        wrap_angles(&mut a);
        assert_eq!(a[0], PI);
        assert_eq!(a[1], 0.5);
        assert!((a[2] - (0.5 - PI)).abs() < 1e-6);
    }

    #[test]
    fn test_check_shape() {
        assert!(check_shape("state", &[3, 6], &[3, 6]).is_ok());
        let err = check_len("action", 3, 2).unwrap_err();
        assert_eq!(
            err,
            ModelError::ShapeMismatch {
                what: "action".to_string(),
                expected: vec![3],
                actual: vec![2],
            }
        );
    }

    #[test]
    fn test_check_finite() {
        let a = arr2(&[[0.0, 1.0], [2.0, 3.0]]);
        assert!(check_finite("action", a.view()).is_ok());
        let a = arr2(&[[0.0, 1.0], [2.0, f32::NAN], [f32::INFINITY, 0.0]]);
        let err = check_finite("action", a.view()).unwrap_err();
        match err {
            ModelError::NonFinite { what, index, value } => {
                assert_eq!(what, "action");
                assert_eq!(index, 1);
                assert!(value.is_nan());
            }
            _ => panic!("unexpected error: {}", err),
        }
    }
}
