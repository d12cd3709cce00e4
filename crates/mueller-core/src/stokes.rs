//! Stokes vector construction
//!
//! A Stokes vector collects the four parameters (I, Q, U, V) describing the
//! intensity and polarization state of a light beam:
//!
//! - I — total intensity
//! - Q — horizontal/vertical linear polarization
//! - U — +45°/−45° linear polarization
//! - V — right/left circular polarization
//!
//! Physically realizable light satisfies I ≥ sqrt(Q² + U² + V²). This module
//! does not enforce that bound; it is the caller's contract, exactly as in
//! the measured-data workflows these arrays feed.
//!
//! # SciRS2 Integration
//!
//! All array operations use `scirs2_core::ndarray_ext`.
//! Direct use of `ndarray` is forbidden per SCIRS2_INTEGRATION_POLICY.md

use crate::broadcast::{broadcast_to_batch, Param};
use anyhow::Result;
use scirs2_core::ndarray_ext::{Array, IxDyn};

/// Build a batched Stokes vector array from the four Stokes parameters.
///
/// Each parameter is a scalar or an array broadcastable to `shape`. The
/// result has shape `shape + [4, 1]`, or `[4, 1]` when `shape` is `None`,
/// with the vector in the trailing dimensions.
///
/// # Arguments
///
/// * `i` - Stokes parameter corresponding to intensity
/// * `q` - Stokes parameter corresponding to H/V polarization
/// * `u` - Stokes parameter corresponding to +45°/−45° polarization
/// * `v` - Stokes parameter corresponding to RHC/LHC polarization
/// * `shape` - leading batch shape to prepend, e.g. `Some(&[32, 32])` for a
///   `[32, 32, 4, 1]` result. `None` yields a single `[4, 1]` vector.
///
/// # Errors
///
/// Returns an error when a parameter array cannot be broadcast to `shape`.
///
/// # Examples
///
/// ```
/// use mueller_core::stokes_from_parameters;
/// use scirs2_core::ndarray_ext::IxDyn;
///
/// // Horizontally polarized light of unit intensity
/// let s = stokes_from_parameters(1.0, 1.0, 0.0, 0.0, None).unwrap();
/// assert_eq!(s.shape(), &[4, 1]);
/// assert_eq!(s[IxDyn(&[0, 0])], 1.0);
/// assert_eq!(s[IxDyn(&[1, 0])], 1.0);
///
/// // A 8x8 map of unpolarized light
/// let map = stokes_from_parameters(1.0, 0.0, 0.0, 0.0, Some(&[8, 8])).unwrap();
/// assert_eq!(map.shape(), &[8, 8, 4, 1]);
/// ```
pub fn stokes_from_parameters<'a>(
    i: impl Into<Param<'a>>,
    q: impl Into<Param<'a>>,
    u: impl Into<Param<'a>>,
    v: impl Into<Param<'a>>,
    shape: Option<&[usize]>,
) -> Result<Array<f64, IxDyn>> {
    let batch = shape.unwrap_or(&[]);
    let i = broadcast_to_batch(i.into(), batch)?;
    let q = broadcast_to_batch(q.into(), batch)?;
    let u = broadcast_to_batch(u.into(), batch)?;
    let v = broadcast_to_batch(v.into(), batch)?;

    let mut data = Vec::with_capacity(i.len() * 4);
    for (((si, sq), su), sv) in i.iter().zip(q.iter()).zip(u.iter()).zip(v.iter()) {
        data.extend_from_slice(&[*si, *sq, *su, *sv]);
    }

    let mut dims = batch.to_vec();
    dims.extend_from_slice(&[4, 1]);
    Ok(Array::from_shape_vec(IxDyn(&dims), data)?)
}
