//! Mueller-to-Jones conversion (best effort)
//!
//! A nondepolarizing Mueller matrix corresponds to a 2×2 complex Jones
//! matrix up to an overall absolute phase, which the Mueller formalism
//! cannot see. This module implements the closed-form magnitude/phase
//! relations of CLY Eq. 6.112, fixing the `txx` reference phase at zero by
//! convention.
//!
//! The conversion should be treated as best-effort: it assumes the input is
//! nondepolarizing, and negative arguments to the magnitude square roots
//! (which arise for depolarizing or noisy measured matrices) propagate NaN
//! rather than failing.
//!
//! # SciRS2 Integration
//!
//! All array operations use `scirs2_core::ndarray_ext` and
//! `scirs2_core::num_complex`.

use crate::error::MuellerError;
use anyhow::Result;
use scirs2_core::ndarray_ext::{array, Array2, ArrayView2};
use scirs2_core::num_complex::Complex;

/// Convert a single Mueller matrix to a relative Jones matrix.
///
/// Phase is relative to the x-to-x transmission component: `txx` is fixed at
/// zero since the absolute phase is undetermined. Do not "correct" this
/// reference — downstream interpretation depends on the convention.
///
/// # Arguments
///
/// * `m` - a single (non-batched) 4×4 Mueller matrix
///
/// # Errors
///
/// Returns an error if `m` is not 4×4. Depolarizing inputs produce NaN
/// magnitudes silently.
///
/// # Examples
///
/// ```
/// use mueller_core::{linear_polarizer, mueller_to_jones};
/// use scirs2_core::ndarray_ext::Ix2;
///
/// let m = linear_polarizer(0.0, None)
///     .unwrap()
///     .into_dimensionality::<Ix2>()
///     .unwrap();
/// let j = mueller_to_jones(&m.view()).unwrap();
/// assert_eq!(j.shape(), &[2, 2]);
/// // Horizontal polarizer passes x fully and extinguishes y
/// assert!((j[[0, 0]].norm() - 1.0).abs() < 1e-12);
/// assert!(j[[1, 1]].norm() < 1e-12);
/// ```
pub fn mueller_to_jones(m: &ArrayView2<'_, f64>) -> Result<Array2<Complex<f64>>> {
    if m.dim() != (4, 4) {
        Err(MuellerError::TrailingShape {
            operation: "mueller_to_jones",
            expected: vec![4, 4],
            actual: m.shape().to_vec(),
        })?;
    }

    // CLY Eq. 6.112
    let pxx = ((m[[0, 0]] + m[[0, 1]] + m[[1, 0]] + m[[1, 1]]) / 2.0).sqrt();
    let pxy = ((m[[0, 0]] - m[[0, 1]] + m[[1, 0]] - m[[1, 1]]) / 2.0).sqrt();
    let pyx = ((m[[0, 0]] + m[[0, 1]] - m[[1, 0]] - m[[1, 1]]) / 2.0).sqrt();
    let pyy = ((m[[0, 0]] - m[[0, 1]] - m[[1, 0]] + m[[1, 1]]) / 2.0).sqrt();

    // The absolute phase is not determined; txx = 0 is the reference.
    let txx = 0.0;
    let txy = -(m[[0, 3]] + m[[1, 3]]).atan2(m[[0, 2]] + m[[1, 2]]);
    let tyx = (m[[3, 0]] + m[[3, 1]]).atan2(m[[2, 0]] + m[[2, 1]]);
    let tyy = (m[[3, 2]] - m[[2, 3]]).atan2(m[[2, 2]] + m[[3, 3]]);

    let entry = |p: f64, t: f64| Complex::from_polar(p, -t);

    Ok(array![
        [entry(pxx, txx), entry(pxy, txy)],
        [entry(pyx, tyx), entry(pyy, tyy)],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mueller::{linear_retarder, mueller_rotation};
    use scirs2_core::ndarray_ext::{Array, Ix2, IxDyn};

    fn as_matrix(m: Array<f64, IxDyn>) -> Array2<f64> {
        m.into_dimensionality::<Ix2>().expect("4x4 matrix")
    }

    #[test]
    fn test_identity_maps_to_identity_jones() {
        let m2 = as_matrix(mueller_rotation(0.0, None).unwrap());
        let j = mueller_to_jones(&m2.view()).unwrap();
        assert!((j[[0, 0]].re - 1.0).abs() < 1e-12);
        assert!(j[[0, 0]].im.abs() < 1e-12);
        assert!(j[[0, 1]].norm() < 1e-12);
        assert!(j[[1, 0]].norm() < 1e-12);
        assert!((j[[1, 1]].norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_quarter_wave_plate_phase() {
        // Quarter-wave plate at horizontal fast axis: y lags x by pi/2
        let m2 = as_matrix(linear_retarder(0.0, std::f64::consts::FRAC_PI_2, None).unwrap());
        let j = mueller_to_jones(&m2.view()).unwrap();
        assert!((j[[0, 0]].norm() - 1.0).abs() < 1e-12);
        assert!((j[[1, 1]].norm() - 1.0).abs() < 1e-12);
        let relative_phase = j[[1, 1]].arg() - j[[0, 0]].arg();
        assert!((relative_phase.abs() - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_wrong_shape() {
        let m = Array2::<f64>::zeros((3, 3));
        assert!(mueller_to_jones(&m.view()).is_err());
    }
}
