//! Mueller matrix builders for canonical optical elements
//!
//! All builders produce arrays of shape `shape + [4, 4]` (or `[4, 4]` when
//! `shape` is `None`), filling each batch element with the closed-form
//! entries of the element in question:
//!
//! - [`mueller_rotation`] — rotation of the polarization frame
//! - [`linear_polarizer`] — ideal Malus-law polarizer (CLY Eq. 6.37)
//! - [`linear_retarder`] — homogeneous linear retarder
//! - [`linear_diattenuator`] — partial polarizer with two transmission axes
//!   (CLY Eq. 6.54)
//! - [`depolarizer`] — diagonal depolarizer, rotated to an arbitrary axis
//!
//! Angles are in radians, measured with respect to horizontal. No physical
//! validation of parameters is performed; out-of-range transmissions or
//! depolarization factors produce matrices that are formally well-defined
//! but unphysical, and downstream square roots turn them into NaN silently.
//!
//! # SciRS2 Integration
//!
//! All array operations use `scirs2_core::ndarray_ext`.
//! Direct use of `ndarray` is forbidden per SCIRS2_INTEGRATION_POLICY.md

use crate::broadcast::{broadcast_to_batch, Param};
use crate::ops::matmul;
use anyhow::Result;
use scirs2_core::ndarray_ext::{Array, IxDyn};

/// Append one row-major 4x4 block to the output buffer.
fn push_mat4(data: &mut Vec<f64>, m: [[f64; 4]; 4]) {
    for row in &m {
        data.extend_from_slice(row);
    }
}

/// Finalize a builder's flat buffer into a `batch + [4, 4]` array.
fn into_mueller(batch: &[usize], data: Vec<f64>) -> Result<Array<f64, IxDyn>> {
    let mut dims = batch.to_vec();
    dims.extend_from_slice(&[4, 4]);
    Ok(Array::from_shape_vec(IxDyn(&dims), data)?)
}

/// Build a Mueller rotation matrix.
///
/// Rotates the Q/U polarization sub-space by `2·angle`; intensity and
/// circular polarization are untouched. `mueller_rotation(0.0, None)` is the
/// 4×4 identity.
///
/// # Arguments
///
/// * `angle` - rotation angle w.r.t. horizontal in radians, scalar or array
///   broadcastable to `shape`
/// * `shape` - leading batch shape to prepend, `None` for a single matrix
///
/// # Examples
///
/// ```
/// use mueller_core::mueller_rotation;
/// use scirs2_core::ndarray_ext::IxDyn;
///
/// let m = mueller_rotation(std::f64::consts::FRAC_PI_4, None).unwrap();
/// assert!((m[IxDyn(&[1, 2])] - 1.0).abs() < 1e-15);
/// assert!((m[IxDyn(&[2, 1])] + 1.0).abs() < 1e-15);
/// ```
pub fn mueller_rotation<'a>(
    angle: impl Into<Param<'a>>,
    shape: Option<&[usize]>,
) -> Result<Array<f64, IxDyn>> {
    let batch = shape.unwrap_or(&[]);
    let angle = broadcast_to_batch(angle.into(), batch)?;

    let mut data = Vec::with_capacity(angle.len() * 16);
    for &t in angle.iter() {
        let c = (2.0 * t).cos();
        let s = (2.0 * t).sin();
        push_mat4(
            &mut data,
            [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, c, s, 0.0],
                [0.0, -s, c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        );
    }
    into_mueller(batch, data)
}

/// Build an ideal homogeneous linear polarizer.
///
/// The matrix is the outer product of `[1, cos 2a, sin 2a, 0]` with itself
/// scaled by 1/2, i.e. Malus' law at transmission-axis angle `a`. The result
/// has rank 1 and is idempotent.
///
/// # Arguments
///
/// * `a` - transmission-axis angle w.r.t. horizontal in radians, scalar or
///   array broadcastable to `shape`
/// * `shape` - leading batch shape to prepend, `None` for a single matrix
///
/// # Examples
///
/// ```
/// use mueller_core::linear_polarizer;
/// use scirs2_core::ndarray_ext::IxDyn;
///
/// let m = linear_polarizer(0.0, None).unwrap();
/// assert_eq!(m[IxDyn(&[0, 0])], 0.5);
/// assert_eq!(m[IxDyn(&[0, 1])], 0.5);
/// assert_eq!(m[IxDyn(&[2, 2])], 0.0);
/// ```
pub fn linear_polarizer<'a>(
    a: impl Into<Param<'a>>,
    shape: Option<&[usize]>,
) -> Result<Array<f64, IxDyn>> {
    let batch = shape.unwrap_or(&[]);
    let a = broadcast_to_batch(a.into(), batch)?;

    let mut data = Vec::with_capacity(a.len() * 16);
    for &t in a.iter() {
        let c = (2.0 * t).cos();
        let s = (2.0 * t).sin();
        push_mat4(
            &mut data,
            [
                [0.5, 0.5 * c, 0.5 * s, 0.0],
                [0.5 * c, 0.5 * c * c, 0.5 * c * s, 0.0],
                [0.5 * s, 0.5 * c * s, 0.5 * s * s, 0.0],
                [0.0, 0.0, 0.0, 0.0],
            ],
        );
    }
    into_mueller(batch, data)
}

/// Build a homogeneous linear retarder.
///
/// A pure retarder introduces a phase delay `r` between the components along
/// its fast axis (at angle `a`) and the orthogonal slow axis. The inner 3×3
/// block is a rotation, so `linear_retarder(a, r)` composed with
/// `linear_retarder(a, -r)` is the identity for any `a` and `r`.
///
/// # Arguments
///
/// * `a` - fast-axis angle w.r.t. horizontal in radians, scalar or array
///   broadcastable to `shape`
/// * `r` - retardance in radians, scalar or array broadcastable to `shape`
/// * `shape` - leading batch shape to prepend, `None` for a single matrix
///
/// # Examples
///
/// ```
/// use mueller_core::linear_retarder;
/// use scirs2_core::ndarray_ext::IxDyn;
///
/// // Quarter-wave plate with horizontal fast axis
/// let m = linear_retarder(0.0, std::f64::consts::FRAC_PI_2, None).unwrap();
/// assert!((m[IxDyn(&[2, 3])] - 1.0).abs() < 1e-15);
/// assert!(m[IxDyn(&[3, 3])].abs() < 1e-15);
/// ```
pub fn linear_retarder<'a>(
    a: impl Into<Param<'a>>,
    r: impl Into<Param<'a>>,
    shape: Option<&[usize]>,
) -> Result<Array<f64, IxDyn>> {
    let batch = shape.unwrap_or(&[]);
    let a = broadcast_to_batch(a.into(), batch)?;
    let r = broadcast_to_batch(r.into(), batch)?;

    let mut data = Vec::with_capacity(a.len() * 16);
    for (&ta, &tr) in a.iter().zip(r.iter()) {
        let c = (2.0 * ta).cos();
        let s = (2.0 * ta).sin();
        let (sr, cr) = tr.sin_cos();

        let m11 = c * c + cr * s * s;
        let m12 = (1.0 - cr) * c * s;
        let m13 = -sr * s;
        let m22 = cr * c * c + s * s;
        let m23 = c * sr;

        push_mat4(
            &mut data,
            [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, m11, m12, m13],
                [0.0, m12, m22, m23],
                [0.0, -m13, -m23, cr],
            ],
        );
    }
    into_mueller(batch, data)
}

/// Build a homogeneous linear diattenuator.
///
/// Generalizes the polarizer to partial transmission: intensity along the
/// transmission axis is scaled by `tmax`, the orthogonal state by `tmin`.
/// With `tmin = 0` and `tmax = 1` this reduces to [`linear_polarizer`]
/// (and becomes singular). CLY Eq. 6.54.
///
/// # Arguments
///
/// * `a` - transmission-axis angle w.r.t. horizontal in radians, scalar or
///   array broadcastable to `shape`
/// * `tmin` - fractional transmission of the low-transmission axis
/// * `tmax` - fractional transmission of the high-transmission axis
///   (1.0 for an absorbing element that is lossless along its axis)
/// * `shape` - leading batch shape to prepend, `None` for a single matrix
///
/// # Examples
///
/// ```
/// use mueller_core::{linear_diattenuator, linear_polarizer};
///
/// // tmin = 0, tmax = 1 is an ideal polarizer
/// let d = linear_diattenuator(0.3, 0.0, 1.0, None).unwrap();
/// let p = linear_polarizer(0.3, None).unwrap();
/// for (x, y) in d.iter().zip(p.iter()) {
///     assert!((x - y).abs() < 1e-15);
/// }
/// ```
pub fn linear_diattenuator<'a>(
    a: impl Into<Param<'a>>,
    tmin: impl Into<Param<'a>>,
    tmax: impl Into<Param<'a>>,
    shape: Option<&[usize]>,
) -> Result<Array<f64, IxDyn>> {
    let batch = shape.unwrap_or(&[]);
    let a = broadcast_to_batch(a.into(), batch)?;
    let tmin = broadcast_to_batch(tmin.into(), batch)?;
    let tmax = broadcast_to_batch(tmax.into(), batch)?;

    let mut data = Vec::with_capacity(a.len() * 16);
    for ((&ta, &lo), &hi) in a.iter().zip(tmin.iter()).zip(tmax.iter()) {
        let big_a = hi + lo;
        let big_b = hi - lo;
        let big_c = 2.0 * (hi * lo).sqrt();
        let c = (2.0 * ta).cos();
        let s = (2.0 * ta).sin();

        let m11 = big_a * c * c + big_c * s * s;
        let m12 = (big_a - big_c) * c * s;
        let m22 = big_c * c * c + big_a * s * s;

        push_mat4(
            &mut data,
            [
                [0.5 * big_a, 0.5 * big_b * c, 0.5 * big_b * s, 0.0],
                [0.5 * big_b * c, 0.5 * m11, 0.5 * m12, 0.0],
                [0.5 * big_b * s, 0.5 * m12, 0.5 * m22, 0.0],
                [0.0, 0.0, 0.0, 0.5 * big_c],
            ],
        );
    }
    into_mueller(batch, data)
}

/// Build a diagonal depolarizer rotated to an arbitrary axis.
///
/// Constructs `diag(1, a, b, c)` — scaling the three polarized Stokes
/// components independently — and conjugates it with rotation matrices,
/// `R(angle) · diag · R(−angle)`, to orient the depolarization axes at
/// `angle`. Factors of 1 leave a component untouched, 0 fully depolarizes
/// it.
///
/// # Arguments
///
/// * `angle` - orientation of the depolarization axes in radians, scalar or
///   array broadcastable to `shape`
/// * `a` - depolarization of Q
/// * `b` - depolarization of U
/// * `c` - depolarization of V
/// * `shape` - leading batch shape to prepend, `None` for a single matrix
///
/// # Examples
///
/// ```
/// use mueller_core::depolarizer;
/// use scirs2_core::ndarray_ext::IxDyn;
///
/// let m = depolarizer(0.0, 0.5, 0.5, 0.5, None).unwrap();
/// assert_eq!(m[IxDyn(&[0, 0])], 1.0);
/// assert!((m[IxDyn(&[1, 1])] - 0.5).abs() < 1e-15);
/// ```
pub fn depolarizer<'a>(
    angle: impl Into<Param<'a>>,
    a: impl Into<Param<'a>>,
    b: impl Into<Param<'a>>,
    c: impl Into<Param<'a>>,
    shape: Option<&[usize]>,
) -> Result<Array<f64, IxDyn>> {
    let batch = shape.unwrap_or(&[]);
    let angle = broadcast_to_batch(angle.into(), batch)?;
    let a = broadcast_to_batch(a.into(), batch)?;
    let b = broadcast_to_batch(b.into(), batch)?;
    let c = broadcast_to_batch(c.into(), batch)?;

    let mut data = Vec::with_capacity(a.len() * 16);
    for ((&da, &db), &dc) in a.iter().zip(b.iter()).zip(c.iter()) {
        push_mat4(
            &mut data,
            [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, da, 0.0, 0.0],
                [0.0, 0.0, db, 0.0],
                [0.0, 0.0, 0.0, dc],
            ],
        );
    }
    let diag = into_mueller(batch, data)?;

    let neg_angle = angle.mapv(|t| -t);
    let rot_out = mueller_rotation(&angle, shape)?;
    let rot_in = mueller_rotation(&neg_angle, shape)?;

    matmul(&rot_out.view(), &matmul(&diag.view(), &rot_in.view())?.view())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_mat_eq(m: &Array<f64, IxDyn>, expected: [[f64; 4]; 4], tol: f64) {
        assert_eq!(m.shape(), &[4, 4]);
        for i in 0..4 {
            for j in 0..4 {
                let got = m[IxDyn(&[i, j])];
                assert!(
                    (got - expected[i][j]).abs() < tol,
                    "entry [{}, {}]: got {}, expected {}",
                    i,
                    j,
                    got,
                    expected[i][j]
                );
            }
        }
    }

    #[test]
    fn test_rotation_zero_is_identity() {
        let m = mueller_rotation(0.0, None).unwrap();
        assert_mat_eq(
            &m,
            [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
            1e-15,
        );
    }

    #[test]
    fn test_rotation_quarter_turn() {
        // cos(pi/2) = 0, sin(pi/2) = 1
        let m = mueller_rotation(std::f64::consts::FRAC_PI_4, None).unwrap();
        assert_mat_eq(
            &m,
            [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, -1.0, 0.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
            1e-15,
        );
    }

    #[test]
    fn test_horizontal_polarizer_entries() {
        let m = linear_polarizer(0.0, None).unwrap();
        assert_mat_eq(
            &m,
            [
                [0.5, 0.5, 0.0, 0.0],
                [0.5, 0.5, 0.0, 0.0],
                [0.0, 0.0, 0.0, 0.0],
                [0.0, 0.0, 0.0, 0.0],
            ],
            1e-15,
        );
    }

    #[test]
    fn test_polarizer_idempotent() {
        let m = linear_polarizer(0.7, None).unwrap();
        let mm = matmul(&m.view(), &m.view()).unwrap();
        for (x, y) in mm.iter().zip(m.iter()) {
            assert!((x - y).abs() < 1e-14);
        }
    }

    #[test]
    fn test_half_wave_plate() {
        // Half-wave plate at horizontal fast axis flips U and V
        let m = linear_retarder(0.0, std::f64::consts::PI, None).unwrap();
        assert_mat_eq(
            &m,
            [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, -1.0, 0.0],
                [0.0, 0.0, 0.0, -1.0],
            ],
            1e-15,
        );
    }

    #[test]
    fn test_retarder_inverse() {
        let m = linear_retarder(0.4, 1.3, None).unwrap();
        let inv = linear_retarder(0.4, -1.3, None).unwrap();
        let prod = matmul(&m.view(), &inv.view()).unwrap();
        let eye = mueller_rotation(0.0, None).unwrap();
        for (x, y) in prod.iter().zip(eye.iter()) {
            assert!((x - y).abs() < 1e-14);
        }
    }

    #[test]
    fn test_diattenuator_equal_transmission_is_attenuation() {
        // tmin == tmax: no diattenuation, just a uniform attenuator
        let m = linear_diattenuator(0.9, 0.6, 0.6, None).unwrap();
        assert!((m[IxDyn(&[0, 0])] - 0.6).abs() < 1e-15);
        assert!(m[IxDyn(&[0, 1])].abs() < 1e-15);
        assert!(m[IxDyn(&[0, 2])].abs() < 1e-15);
        assert!((m[IxDyn(&[3, 3])] - 0.6).abs() < 1e-15);
    }

    #[test]
    fn test_depolarizer_unrotated_diagonal() {
        let m = depolarizer(0.0, 0.9, 0.8, 0.7, None).unwrap();
        assert_mat_eq(
            &m,
            [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 0.9, 0.0, 0.0],
                [0.0, 0.0, 0.8, 0.0],
                [0.0, 0.0, 0.0, 0.7],
            ],
            1e-15,
        );
    }

    #[test]
    fn test_depolarizer_rotation_preserves_v() {
        // Rotation only mixes Q and U; the V factor survives unchanged
        let m = depolarizer(0.6, 0.9, 0.8, 0.7, None).unwrap();
        assert!((m[IxDyn(&[3, 3])] - 0.7).abs() < 1e-14);
        assert!((m[IxDyn(&[0, 0])] - 1.0).abs() < 1e-14);
    }

    #[test]
    fn test_batched_matches_single() {
        let single = linear_retarder(0.3, 0.9, None).unwrap();
        let batch = linear_retarder(0.3, 0.9, Some(&[2, 3])).unwrap();
        assert_eq!(batch.shape(), &[2, 3, 4, 4]);
        for a in 0..2 {
            for b in 0..3 {
                for i in 0..4 {
                    for j in 0..4 {
                        assert_eq!(batch[IxDyn(&[a, b, i, j])], single[IxDyn(&[i, j])]);
                    }
                }
            }
        }
    }
}
