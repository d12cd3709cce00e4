//! Scalar-or-array parameter broadcasting and batched outer products
//!
//! Every Mueller matrix builder accepts its physical parameters either as a
//! plain `f64` or as an array broadcastable to the batch shape. [`Param`] is
//! the single entry point for that polymorphism and
//! [`broadcast_to_batch`] the single place broadcast failures are reported,
//! so the builders themselves never carry ad hoc shape checks.
//!
//! # SciRS2 Integration
//!
//! All array operations use `scirs2_core::ndarray_ext`.
//! Direct use of `ndarray` is forbidden per SCIRS2_INTEGRATION_POLICY.md

use crate::error::MuellerError;
use anyhow::Result;
use scirs2_core::ndarray_ext::{Array, ArrayView, IxDyn};

/// A physical parameter that is either a scalar or a batched array.
///
/// Builders take `impl Into<Param<'_>>`, so callers pass `f64`, `&Array` or
/// an `ArrayView` directly:
///
/// ```
/// use mueller_core::linear_polarizer;
/// use scirs2_core::ndarray_ext::{Array, IxDyn};
///
/// let scalar = linear_polarizer(0.5, Some(&[2, 2])).unwrap();
///
/// let angles = Array::<f64, IxDyn>::from_elem(IxDyn(&[2, 2]), 0.5);
/// let arrayed = linear_polarizer(&angles, Some(&[2, 2])).unwrap();
///
/// assert_eq!(scalar, arrayed);
/// ```
#[derive(Debug, Clone)]
pub enum Param<'a> {
    /// A scalar, promoted to every batch element
    Scalar(f64),
    /// An array, broadcast to the batch shape
    Array(ArrayView<'a, f64, IxDyn>),
}

impl<'a> From<f64> for Param<'a> {
    fn from(value: f64) -> Self {
        Param::Scalar(value)
    }
}

impl<'a> From<&'a Array<f64, IxDyn>> for Param<'a> {
    fn from(value: &'a Array<f64, IxDyn>) -> Self {
        Param::Array(value.view())
    }
}

impl<'a> From<ArrayView<'a, f64, IxDyn>> for Param<'a> {
    fn from(value: ArrayView<'a, f64, IxDyn>) -> Self {
        Param::Array(value)
    }
}

/// Promote a parameter to an owned array of the given batch shape.
///
/// An empty `batch` (the unbatched, single-instance case) yields a 0-d array
/// holding one element, so callers can always iterate the result uniformly in
/// row-major order.
///
/// # Errors
///
/// Returns [`MuellerError::BroadcastMismatch`] when an array parameter cannot
/// be broadcast to `batch` under the usual trailing-dimension rules.
///
/// # Examples
///
/// ```
/// use mueller_core::{broadcast_to_batch, Param};
///
/// let a = broadcast_to_batch(Param::Scalar(0.25), &[2, 3]).unwrap();
/// assert_eq!(a.shape(), &[2, 3]);
/// assert_eq!(a.iter().copied().sum::<f64>(), 1.5);
/// ```
pub fn broadcast_to_batch(param: Param<'_>, batch: &[usize]) -> Result<Array<f64, IxDyn>> {
    match param {
        Param::Scalar(value) => Ok(Array::from_elem(IxDyn(batch), value)),
        Param::Array(view) => {
            let promoted = view.broadcast(IxDyn(batch)).map(|v| v.to_owned());
            Ok(promoted.ok_or_else(|| MuellerError::BroadcastMismatch {
                param: view.shape().to_vec(),
                batch: batch.to_vec(),
            })?)
        }
    }
}

/// Batched outer product over the trailing axis.
///
/// For inputs `u` of shape `S + [n]` and `v` of shape `S + [m]` with a common
/// leading batch shape `S`, computes the array of shape `S + [n, m]` where
/// `out[..., i, j] = u[..., i] * v[..., j]` independently for every batch
/// element.
///
/// # Errors
///
/// Returns an error if either input is 0-dimensional or the leading batch
/// shapes differ.
///
/// # Examples
///
/// ```
/// use mueller_core::broadcast_outer;
/// use scirs2_core::ndarray_ext::{array, IxDyn};
///
/// let u = array![1.0, 2.0, 3.0].into_dyn();
/// let m = broadcast_outer(&u.view(), &u.view()).unwrap();
/// assert_eq!(m.shape(), &[3, 3]);
/// assert_eq!(m[IxDyn(&[2, 1])], 6.0);
/// ```
pub fn broadcast_outer(
    u: &ArrayView<'_, f64, IxDyn>,
    v: &ArrayView<'_, f64, IxDyn>,
) -> Result<Array<f64, IxDyn>> {
    if u.ndim() < 1 || v.ndim() < 1 {
        Err(MuellerError::TrailingShape {
            operation: "broadcast_outer",
            expected: vec![1],
            actual: vec![],
        })?;
    }

    let (u_batch, u_len) = u.shape().split_at(u.ndim() - 1);
    let (v_batch, v_len) = v.shape().split_at(v.ndim() - 1);
    if u_batch != v_batch {
        Err(MuellerError::BatchMismatch {
            operation: "broadcast_outer",
            lhs: u_batch.to_vec(),
            rhs: v_batch.to_vec(),
        })?;
    }

    let (n, m) = (u_len[0], v_len[0]);
    let batch_len: usize = u_batch.iter().product();

    // Logical row-major traversal; handles non-contiguous views uniformly.
    let ub: Vec<f64> = u.iter().copied().collect();
    let vb: Vec<f64> = v.iter().copied().collect();

    let mut data = Vec::with_capacity(batch_len * n * m);
    for e in 0..batch_len {
        for i in 0..n {
            for j in 0..m {
                data.push(ub[e * n + i] * vb[e * m + j]);
            }
        }
    }

    let mut dims = u_batch.to_vec();
    dims.push(n);
    dims.push(m);
    Ok(Array::from_shape_vec(IxDyn(&dims), data)?)
}

/// Convert a flat row-major index into a multi-dimensional batch index.
///
/// Used when a per-element failure has to be reported against the original
/// batch coordinates.
pub fn flat_to_multi_index(mut flat_idx: usize, shape: &[usize]) -> Vec<usize> {
    let mut multi_idx = vec![0; shape.len()];
    for (dim, &size) in shape.iter().enumerate().rev() {
        multi_idx[dim] = flat_idx % size;
        flat_idx /= size;
    }
    multi_idx
}
