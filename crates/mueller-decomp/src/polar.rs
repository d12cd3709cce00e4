//! Lu-Chipman polar decomposition
//!
//! Factorizes a Mueller matrix into an ordered product of three elementary
//! matrices:
//!
//! ```text
//! M = M_Δ · M_R · M_D
//! ```
//!
//! Where:
//! - M_D is a diattenuator (polarization-dependent attenuation)
//! - M_R is a pure retarder (phase only, no attenuation or depolarization)
//! - M_Δ is a depolarizer
//!
//! The order is fixed by convention: the diattenuator acts first. The
//! decomposition follows Lu & Chipman, "Interpretation of Mueller matrices
//! based on polar decomposition", JOSA A 13, 1106 (1996).
//!
//! # Stages
//!
//! 1. The diattenuator is read directly off the first row: with
//!    T = M₀₀ and d = M₀,₁..₃ / T,
//!    M_D = T · [[1, dᵀ], [d, m_D·I + (1 − m_D)·d̂d̂ᵀ]] with
//!    m_D = √(1 − |d|²).
//! 2. M' = M · M_D⁻¹ removes the diattenuator; M' = M_Δ · M_R.
//! 3. The depolarizer's inner 3×3 block is recovered from the eigenvalues of
//!    m' m'ᵀ via the Cayley-Hamilton construction, and the pure retarder is
//!    M_R = M_Δ⁻¹ · M'.
//!
//! All entry points accept batched input of shape `S + [4, 4]` and apply the
//! decomposition independently per block.
//!
//! # Numerical policy
//!
//! Inputs are taken at face value: a nonphysical matrix (|d| > 1, zero
//! transmittance) produces NaN entries rather than an error, except where a
//! linear solve fails outright. Use [`validate_mueller`] or
//! [`decompose_strict`] to reject such inputs up front. The single guarded
//! case is |d| = 0, where the d̂d̂ᵀ term is dropped since it vanishes in the
//! limit; without the guard an identity input would decompose to NaN.
//!
//! # SciRS2 Integration
//!
//! All array operations use `scirs2_core::ndarray_ext`.
//! Matrix inverses, determinants, and eigenvalues use `scirs2_linalg`.
//! Direct use of `ndarray` is forbidden per SCIRS2_INTEGRATION_POLICY.md

use anyhow::Result;
use mueller_core::flat_to_multi_index;
use mueller_core::ops::matmul;
use scirs2_core::ndarray_ext::{Array, Array2, ArrayView, IxDyn};
use scirs2_linalg::{det, eigh, inv, LinalgError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecompError {
    #[error("expected trailing dimensions [4, 4], got shape {0:?}")]
    NotMueller(Vec<usize>),

    #[error("matrix inversion failed at batch index {index:?}: {source}")]
    Inversion {
        index: Vec<usize>,
        source: LinalgError,
    },

    #[error("eigenvalue computation failed at batch index {index:?}: {source}")]
    Eigen {
        index: Vec<usize>,
        source: LinalgError,
    },

    #[error("determinant computation failed at batch index {index:?}: {source}")]
    Determinant {
        index: Vec<usize>,
        source: LinalgError,
    },

    #[error("matrix at batch index {index:?} is not a valid Mueller matrix: {reason}")]
    Invalid { index: Vec<usize>, reason: String },
}

/// The three Lu-Chipman factors of a Mueller matrix.
///
/// Each factor has the same shape as the decomposed input, `S + [4, 4]`.
/// The product `depolarizer · retarder · diattenuator` (per block)
/// reconstructs the original matrix; see [`LuChipman::reconstruct`].
#[derive(Debug, Clone)]
pub struct LuChipman {
    /// M_Δ, applied last
    pub depolarizer: Array<f64, IxDyn>,
    /// M_R, the pure retarder
    pub retarder: Array<f64, IxDyn>,
    /// M_D, applied first
    pub diattenuator: Array<f64, IxDyn>,
}

impl LuChipman {
    /// Multiply the factors back together, blockwise.
    ///
    /// Up to floating-point error this returns the matrix that was
    /// decomposed, which makes it a cheap self-check after decomposing
    /// measured data.
    pub fn reconstruct(&self) -> Result<Array<f64, IxDyn>> {
        let rd = matmul(&self.retarder.view(), &self.diattenuator.view())?;
        matmul(&self.depolarizer.view(), &rd.view())
    }
}

/// Validate trailing dimensions and return (batch shape, block count).
fn split_batch(m: &ArrayView<'_, f64, IxDyn>) -> Result<(Vec<usize>, usize), DecompError> {
    let shape = m.shape();
    if shape.len() < 2 || shape[shape.len() - 2..] != [4, 4] {
        return Err(DecompError::NotMueller(shape.to_vec()));
    }
    let batch = shape[..shape.len() - 2].to_vec();
    let blocks = batch.iter().product();
    Ok((batch, blocks))
}

fn mat4(block: &[f64]) -> Array2<f64> {
    Array2::from_shape_fn((4, 4), |(i, j)| block[4 * i + j])
}

fn diattenuator_block(b: &[f64]) -> [f64; 16] {
    let t = b[0];
    let d = [b[1] / t, b[2] / t, b[3] / t];
    let dd = d[0] * d[0] + d[1] * d[1] + d[2] * d[2];
    let m_d = (1.0 - dd).sqrt();

    let mut out = [0.0; 16];
    out[0] = 1.0;
    for i in 0..3 {
        out[1 + i] = d[i];
        out[4 * (1 + i)] = d[i];
        for j in 0..3 {
            let mut v = if i == j { m_d } else { 0.0 };
            // d̂d̂ᵀ has no limit as d → 0, but its coefficient vanishes there
            if dd > 0.0 {
                v += (1.0 - m_d) * d[i] * d[j] / dd;
            }
            out[4 * (1 + i) + 1 + j] = v;
        }
    }
    for v in out.iter_mut() {
        *v *= t;
    }
    out
}

/// Extract the diattenuator factor M_D.
///
/// Reads T and the diattenuation vector off the first row of each block and
/// assembles the symmetric diattenuator matrix. This stage involves no
/// linear algebra and cannot fail beyond a shape check, though nonphysical
/// input (T = 0 or |d| > 1) yields NaN entries.
///
/// # Arguments
///
/// * `m` - Mueller matrices of shape `S + [4, 4]`
///
/// # Errors
///
/// Returns an error if the trailing dimensions are not `[4, 4]`.
///
/// # Examples
///
/// ```
/// use mueller_core::linear_diattenuator;
/// use mueller_decomp::decompose_diattenuator;
///
/// // A bare diattenuator decomposes to itself
/// let m = linear_diattenuator(0.3, 0.1, 0.9, None).unwrap();
/// let md = decompose_diattenuator(&m.view()).unwrap();
/// for (got, want) in md.iter().zip(m.iter()) {
///     assert!((got - want).abs() < 1e-12);
/// }
/// ```
pub fn decompose_diattenuator(m: &ArrayView<'_, f64, IxDyn>) -> Result<Array<f64, IxDyn>> {
    let (_batch, blocks) = split_batch(m)?;
    let buf: Vec<f64> = m.iter().copied().collect();

    let mut data = Vec::with_capacity(buf.len());
    for e in 0..blocks {
        data.extend_from_slice(&diattenuator_block(&buf[e * 16..(e + 1) * 16]));
    }
    Ok(Array::from_shape_vec(IxDyn(m.shape()), data)?)
}

/// Split off the diattenuator, returning `(M', M_D)` with `M = M' · M_D`.
///
/// The first element is the product of the remaining depolarizer and
/// retarder factors, not a pure retarder; for a nondepolarizing input the
/// two coincide. Use [`decompose`] to separate all three factors.
///
/// # Errors
///
/// Returns an error on a shape mismatch, or if M_D is singular in some
/// block (a perfect polarizer, |d| = 1). The error names the offending
/// batch index.
pub fn decompose_retarder(
    m: &ArrayView<'_, f64, IxDyn>,
) -> Result<(Array<f64, IxDyn>, Array<f64, IxDyn>)> {
    let (batch, blocks) = split_batch(m)?;
    let md = decompose_diattenuator(m)?;

    let mbuf: Vec<f64> = m.iter().copied().collect();
    let mdbuf: Vec<f64> = md.iter().copied().collect();

    let mut data = Vec::with_capacity(mbuf.len());
    for e in 0..blocks {
        let md_block = mat4(&mdbuf[e * 16..(e + 1) * 16]);
        let md_inv = inv(&md_block.view(), None).map_err(|source| DecompError::Inversion {
            index: flat_to_multi_index(e, &batch),
            source,
        })?;
        let prime = mat4(&mbuf[e * 16..(e + 1) * 16]).dot(&md_inv);
        data.extend(prime.iter().copied());
    }
    let mprime = Array::from_shape_vec(IxDyn(m.shape()), data)?;
    Ok((mprime, md))
}

/// Stage 3 for a single block: recover M_Δ from M' = M_Δ · M_R.
fn depolarizer_block(mprime: &Array2<f64>, e: usize, batch: &[usize]) -> Result<Array2<f64>> {
    let mp = Array2::from_shape_fn((3, 3), |(i, j)| mprime[[i + 1, j + 1]]);
    let mm = mp.dot(&mp.t());

    let (evals, _) = eigh(&mm.view(), None).map_err(|source| DecompError::Eigen {
        index: flat_to_multi_index(e, batch),
        source,
    })?;
    let ev = [evals[0].sqrt(), evals[1].sqrt(), evals[2].sqrt()];

    // Cayley-Hamilton: m_Δ = ±(mm + e₂I)⁻¹ (e₁·mm + e₃I) with the
    // elementary symmetric functions of the singular values
    let sym2 = ev[0] * ev[1] + ev[1] * ev[2] + ev[2] * ev[0];
    let sym1 = ev[0] + ev[1] + ev[2];
    let sym3 = ev[0] * ev[1] * ev[2];
    let lhs = Array2::from_shape_fn((3, 3), |(i, j)| {
        mm[[i, j]] + if i == j { sym2 } else { 0.0 }
    });
    let rhs = Array2::from_shape_fn((3, 3), |(i, j)| {
        sym1 * mm[[i, j]] + if i == j { sym3 } else { 0.0 }
    });

    let lhs_inv = inv(&lhs.view(), None).map_err(|source| DecompError::Inversion {
        index: flat_to_multi_index(e, batch),
        source,
    })?;
    let mut inner = lhs_inv.dot(&rhs);

    let sign = det(&mm.view(), None).map_err(|source| DecompError::Determinant {
        index: flat_to_multi_index(e, batch),
        source,
    })?;
    if sign < 0.0 {
        inner.mapv_inplace(|x| -x);
    }

    Ok(Array2::from_shape_fn((4, 4), |(i, j)| match (i, j) {
        (0, 0) => 1.0,
        (0, _) => 0.0,
        // polarizance column carries over from M'
        (_, 0) => mprime[[i, 0]],
        _ => inner[[i - 1, j - 1]],
    }))
}

/// Extract the depolarizer factor M_Δ.
///
/// # Errors
///
/// As for [`decompose`].
pub fn decompose_depolarizer(m: &ArrayView<'_, f64, IxDyn>) -> Result<Array<f64, IxDyn>> {
    let (batch, blocks) = split_batch(m)?;
    let (mprime, _md) = decompose_retarder(m)?;
    let pbuf: Vec<f64> = mprime.iter().copied().collect();

    let mut data = Vec::with_capacity(pbuf.len());
    for e in 0..blocks {
        let block = mat4(&pbuf[e * 16..(e + 1) * 16]);
        let mdep = depolarizer_block(&block, e, &batch)?;
        data.extend(mdep.iter().copied());
    }
    Ok(Array::from_shape_vec(IxDyn(m.shape()), data)?)
}

/// Full three-factor Lu-Chipman decomposition.
///
/// Runs all three stages per block and returns the factors together so the
/// result can be reconstructed or inspected factor by factor.
///
/// # Arguments
///
/// * `m` - Mueller matrices of shape `S + [4, 4]`
///
/// # Errors
///
/// Returns an error on a shape mismatch, or when a blockwise inverse,
/// eigenvalue, or determinant computation fails; the error carries the
/// batch index of the offending block.
///
/// # Examples
///
/// ```
/// use mueller_core::ops::matmul;
/// use mueller_core::{depolarizer, linear_diattenuator, linear_retarder};
/// use mueller_decomp::decompose;
///
/// let m = matmul(
///     &depolarizer(0.0, 0.9, 0.8, 0.7, None).unwrap().view(),
///     &matmul(
///         &linear_retarder(0.4, 1.2, None).unwrap().view(),
///         &linear_diattenuator(0.2, 0.3, 0.9, None).unwrap().view(),
///     )
///     .unwrap()
///     .view(),
/// )
/// .unwrap();
///
/// let factors = decompose(&m.view()).unwrap();
/// let back = factors.reconstruct().unwrap();
/// for (got, want) in back.iter().zip(m.iter()) {
///     assert!((got - want).abs() < 1e-8);
/// }
/// ```
pub fn decompose(m: &ArrayView<'_, f64, IxDyn>) -> Result<LuChipman> {
    let (batch, blocks) = split_batch(m)?;
    let (mprime, md) = decompose_retarder(m)?;
    let pbuf: Vec<f64> = mprime.iter().copied().collect();

    let mut dep_data = Vec::with_capacity(pbuf.len());
    let mut ret_data = Vec::with_capacity(pbuf.len());
    for e in 0..blocks {
        let prime = mat4(&pbuf[e * 16..(e + 1) * 16]);
        let mdep = depolarizer_block(&prime, e, &batch)?;
        let mdep_inv = inv(&mdep.view(), None).map_err(|source| DecompError::Inversion {
            index: flat_to_multi_index(e, &batch),
            source,
        })?;
        let pure = mdep_inv.dot(&prime);
        dep_data.extend(mdep.iter().copied());
        ret_data.extend(pure.iter().copied());
    }

    Ok(LuChipman {
        depolarizer: Array::from_shape_vec(IxDyn(m.shape()), dep_data)?,
        retarder: Array::from_shape_vec(IxDyn(m.shape()), ret_data)?,
        diattenuator: md,
    })
}

/// Check that every block is a plausible Mueller matrix.
///
/// Enforces the preconditions the decomposition needs to stay finite:
/// finite entries, positive unpolarized transmittance T = M₀₀, and
/// diattenuation |d| ≤ 1. These are necessary conditions only; a matrix can
/// pass and still not correspond to a physical optical element.
///
/// # Errors
///
/// Returns [`DecompError::Invalid`] naming the first offending batch index
/// and the violated condition.
pub fn validate_mueller(m: &ArrayView<'_, f64, IxDyn>) -> Result<()> {
    let (batch, blocks) = split_batch(m)?;
    let buf: Vec<f64> = m.iter().copied().collect();

    for e in 0..blocks {
        let b = &buf[e * 16..(e + 1) * 16];
        if b.iter().any(|v| !v.is_finite()) {
            Err(DecompError::Invalid {
                index: flat_to_multi_index(e, &batch),
                reason: "contains non-finite entries".to_string(),
            })?;
        }
        let t = b[0];
        if t <= 0.0 {
            Err(DecompError::Invalid {
                index: flat_to_multi_index(e, &batch),
                reason: format!("unpolarized transmittance is {}, expected > 0", t),
            })?;
        }
        let dd = (b[1] * b[1] + b[2] * b[2] + b[3] * b[3]) / (t * t);
        if dd.sqrt() > 1.0 + 1e-12 {
            Err(DecompError::Invalid {
                index: flat_to_multi_index(e, &batch),
                reason: format!("diattenuation is {}, expected <= 1", dd.sqrt()),
            })?;
        }
    }
    Ok(())
}

/// [`decompose`], rejecting nonphysical input instead of producing NaN.
///
/// Runs [`validate_mueller`] first, so a perfect polarizer or a matrix with
/// |d| > 1 fails with a descriptive error rather than silently poisoning
/// the factors.
pub fn decompose_strict(m: &ArrayView<'_, f64, IxDyn>) -> Result<LuChipman> {
    validate_mueller(m)?;
    decompose(m)
}
