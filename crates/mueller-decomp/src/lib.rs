//! # mueller-decomp - Lu-Chipman Polar Decomposition
//!
//! Factorization of Mueller matrices into physically interpretable
//! components, following Lu & Chipman (JOSA A 13, 1106, 1996):
//!
//! ```text
//! M = M_Δ · M_R · M_D
//! ```
//!
//! - **M_D** — diattenuator: polarization-dependent attenuation
//! - **M_R** — retarder: pure phase, the inner 3×3 block is a rotation
//! - **M_Δ** — depolarizer: reduces the degree of polarization
//!
//! Measured Mueller matrices mix all three effects; the decomposition
//! separates them so diattenuation, retardance, and depolarization can be
//! read off individually. This is the standard analysis step in Mueller
//! polarimetry (tissue imaging, stress birefringence, scatterometry).
//!
//! ## Entry points
//!
//! - [`decompose`]: all three factors at once, as a [`LuChipman`]
//! - [`decompose_diattenuator`]: M_D only (no linear algebra, cheap)
//! - [`decompose_retarder`]: `(M', M_D)` with M' = M_Δ · M_R
//! - [`decompose_depolarizer`]: M_Δ only
//! - [`validate_mueller`] / [`decompose_strict`]: reject nonphysical input
//!   instead of propagating NaN
//!
//! All functions operate blockwise on batched input of shape `S + [4, 4]`
//! for any leading shape `S`, so a full polarimetric image decomposes in
//! one call.
//!
//! ## Quick Start
//!
//! ```
//! use mueller_core::ops::matmul;
//! use mueller_core::{depolarizer, linear_diattenuator, linear_retarder};
//! use mueller_decomp::decompose;
//!
//! // Compose a known system: diattenuator, then retarder, then depolarizer
//! let m = matmul(
//!     &depolarizer(0.0, 0.9, 0.8, 0.7, None).unwrap().view(),
//!     &matmul(
//!         &linear_retarder(0.3, 1.1, None).unwrap().view(),
//!         &linear_diattenuator(0.1, 0.4, 0.9, None).unwrap().view(),
//!     )
//!     .unwrap()
//!     .view(),
//! )
//! .unwrap();
//!
//! // ... and take it apart again
//! let factors = decompose(&m.view()).unwrap();
//! let back = factors.reconstruct().unwrap();
//! for (got, want) in back.iter().zip(m.iter()) {
//!     assert!((got - want).abs() < 1e-8);
//! }
//! ```
//!
//! ## SciRS2 Integration
//!
//! This crate uses SciRS2 as its scientific computing foundation:
//! - Array operations via `scirs2_core::ndarray_ext`
//! - Blockwise inverses, determinants, and eigenvalues via `scirs2_linalg`

#![deny(warnings)]

pub mod polar;


pub use polar::*;
