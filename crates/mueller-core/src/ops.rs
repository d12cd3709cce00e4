//! Batched matrix operations over arbitrary leading dimensions
//!
//! Mueller calculus composes optical elements by matrix multiplication and
//! applies a system to a beam by multiplying its matrix with a Stokes vector.
//! With the matrix dimensions trailing (`S + [4, 4]`, `S + [4, 1]`), both are
//! the same batched product: the same small matrix multiply applied
//! independently to every element of the leading batch shape, with no
//! cross-element coupling.
//!
//! # SciRS2 Integration
//!
//! All array operations use `scirs2_core::ndarray_ext`.
//! Direct use of `ndarray` is forbidden per SCIRS2_INTEGRATION_POLICY.md

use crate::error::MuellerError;
use anyhow::Result;
use scirs2_core::ndarray_ext::{Array, ArrayView, IxDyn};

/// Batched matrix product over the trailing two dimensions.
///
/// For `a` of shape `S + [r, k]` and `b` of shape `S + [k, c]` with an
/// identical leading batch shape `S`, computes the array of shape
/// `S + [r, c]` holding the per-element products. `S` may be empty, in which
/// case this is an ordinary matrix multiply.
///
/// # Errors
///
/// Returns an error if either operand has fewer than two dimensions, the
/// batch shapes differ, or the inner matrix dimensions do not match.
///
/// # Examples
///
/// ```
/// use mueller_core::{linear_polarizer, mueller_rotation, ops::matmul, stokes_from_parameters};
///
/// // Compose two elements
/// let m = matmul(
///     &linear_polarizer(0.0, None).unwrap().view(),
///     &mueller_rotation(0.3, None).unwrap().view(),
/// )
/// .unwrap();
/// assert_eq!(m.shape(), &[4, 4]);
///
/// // Apply a polarizer to a beam
/// let s = stokes_from_parameters(1.0, 0.0, 0.0, 0.0, None).unwrap();
/// let out = matmul(&linear_polarizer(0.0, None).unwrap().view(), &s.view()).unwrap();
/// assert_eq!(out.shape(), &[4, 1]);
/// ```
pub fn matmul(
    a: &ArrayView<'_, f64, IxDyn>,
    b: &ArrayView<'_, f64, IxDyn>,
) -> Result<Array<f64, IxDyn>> {
    if a.ndim() < 2 || b.ndim() < 2 {
        Err(MuellerError::TrailingShape {
            operation: "matmul",
            expected: vec![2],
            actual: vec![a.ndim().min(b.ndim())],
        })?;
    }

    let (a_batch, a_mat) = a.shape().split_at(a.ndim() - 2);
    let (b_batch, b_mat) = b.shape().split_at(b.ndim() - 2);
    if a_batch != b_batch {
        Err(MuellerError::BatchMismatch {
            operation: "matmul",
            lhs: a_batch.to_vec(),
            rhs: b_batch.to_vec(),
        })?;
    }

    let (r, k) = (a_mat[0], a_mat[1]);
    let (k2, c) = (b_mat[0], b_mat[1]);
    if k != k2 {
        Err(MuellerError::InnerDimension {
            operation: "matmul",
            lhs: k,
            rhs: k2,
        })?;
    }

    let batch_len: usize = a_batch.iter().product();
    let av: Vec<f64> = a.iter().copied().collect();
    let bv: Vec<f64> = b.iter().copied().collect();

    let mut data = vec![0.0; batch_len * r * c];
    for e in 0..batch_len {
        let ao = e * r * k;
        let bo = e * k * c;
        let co = e * r * c;
        for i in 0..r {
            for j in 0..c {
                let mut acc = 0.0;
                for l in 0..k {
                    acc += av[ao + i * k + l] * bv[bo + l * c + j];
                }
                data[co + i * c + j] = acc;
            }
        }
    }

    let mut dims = a_batch.to_vec();
    dims.push(r);
    dims.push(c);
    Ok(Array::from_shape_vec(IxDyn(&dims), data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scirs2_core::ndarray_ext::array;

    #[test]
    fn test_plain_matmul() {
        let a = array![[1.0, 2.0], [3.0, 4.0]].into_dyn();
        let b = array![[5.0, 6.0], [7.0, 8.0]].into_dyn();
        let c = matmul(&a.view(), &b.view()).unwrap();
        assert_eq!(c.shape(), &[2, 2]);
        assert_eq!(c[IxDyn(&[0, 0])], 19.0);
        assert_eq!(c[IxDyn(&[0, 1])], 22.0);
        assert_eq!(c[IxDyn(&[1, 0])], 43.0);
        assert_eq!(c[IxDyn(&[1, 1])], 50.0);
    }

    #[test]
    fn test_matrix_vector() {
        let a = array![[1.0, 2.0], [3.0, 4.0]].into_dyn();
        let v = array![[1.0], [1.0]].into_dyn();
        let c = matmul(&a.view(), &v.view()).unwrap();
        assert_eq!(c.shape(), &[2, 1]);
        assert_eq!(c[IxDyn(&[0, 0])], 3.0);
        assert_eq!(c[IxDyn(&[1, 0])], 7.0);
    }

    #[test]
    fn test_batched_independence() {
        // Two 2x2 blocks multiplied independently
        let a = array![[[1.0, 0.0], [0.0, 1.0]], [[2.0, 0.0], [0.0, 2.0]]].into_dyn();
        let b = array![[[3.0, 0.0], [0.0, 3.0]], [[5.0, 0.0], [0.0, 5.0]]].into_dyn();
        let c = matmul(&a.view(), &b.view()).unwrap();
        assert_eq!(c.shape(), &[2, 2, 2]);
        assert_eq!(c[IxDyn(&[0, 0, 0])], 3.0);
        assert_eq!(c[IxDyn(&[1, 0, 0])], 10.0);
        assert_eq!(c[IxDyn(&[1, 0, 1])], 0.0);
    }

    #[test]
    fn test_batch_mismatch() {
        let a = array![[[1.0, 0.0], [0.0, 1.0]], [[2.0, 0.0], [0.0, 2.0]]].into_dyn();
        let b = array![[3.0, 0.0], [0.0, 3.0]].into_dyn();
        assert!(matmul(&a.view(), &b.view()).is_err());
    }

    #[test]
    fn test_inner_dimension_mismatch() {
        let a = array![[1.0, 2.0]].into_dyn(); // 1x2
        let b = array![[1.0, 2.0]].into_dyn(); // 1x2
        let err = matmul(&a.view(), &b.view()).unwrap_err();
        assert!(format!("{}", err).contains("inner dimensions"));
    }
}
