//! # Mueller - Polarization Algebra for Rust
//!
//! **Mueller-Stokes calculus** with batched element builders and the
//! Lu-Chipman polar decomposition.
//!
//! This is the **meta crate** that re-exports all components for convenient
//! access.
//!
//! ## Quick Start
//!
//! ```
//! use mueller::prelude::*;
//!
//! // A horizontal polarizer acting on an unpolarized beam
//! let beam = stokes_from_parameters(1.0, 0.0, 0.0, 0.0, None).unwrap();
//! let p = linear_polarizer(0.0, None).unwrap();
//! let out = matmul(&p.view(), &beam.view()).unwrap();
//! assert_eq!(out.shape(), &[4, 1]);
//! ```
//!
//! ## Components
//!
//! ### Core Algebra ([`core`])
//!
//! Stokes vectors, Mueller matrix builders for canonical elements, batched
//! matrix products, and the Mueller-to-Jones conversion. All builders accept
//! scalar or per-element array parameters and an optional leading batch
//! shape, so a full polarimetric image is one call:
//!
//! ```
//! use mueller::core::linear_retarder;
//!
//! // A 32x32 image of quarter-wave plates
//! let m = linear_retarder(0.0, std::f64::consts::FRAC_PI_2, Some(&[32, 32])).unwrap();
//! assert_eq!(m.shape(), &[32, 32, 4, 4]);
//! ```
//!
//! ### Lu-Chipman Decomposition ([`decomp`])
//!
//! Factors a Mueller matrix into depolarizer, retarder, and diattenuator,
//! blockwise over any batch shape:
//!
//! ```
//! use mueller::core::linear_diattenuator;
//! use mueller::decomp::decompose;
//!
//! let m = linear_diattenuator(0.2, 0.3, 0.9, None).unwrap();
//! let factors = decompose(&m.view()).unwrap();
//! let back = factors.reconstruct().unwrap();
//! for (got, want) in back.iter().zip(m.iter()) {
//!     assert!((got - want).abs() < 1e-8);
//! }
//! ```
//!
//! ## SciRS2 Integration
//!
//! All numerical work is built on the SciRS2 stack: arrays via
//! `scirs2_core::ndarray_ext`, dense linear algebra via `scirs2_linalg`.

#![deny(warnings)]

// Re-export all components
pub use mueller_core as core;
pub use mueller_decomp as decomp;

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! # Example
    //!
    //! ```
    //! use mueller::prelude::*;
    //!
    //! let m = mueller_rotation(0.3, None).unwrap();
    //! assert_eq!(m.shape(), &[4, 4]);
    //! ```

    // Builders
    pub use crate::core::{
        depolarizer, linear_diattenuator, linear_polarizer, linear_retarder, mueller_rotation,
        stokes_from_parameters,
    };

    // Batched algebra
    pub use crate::core::ops::matmul;

    // Jones conversion
    pub use crate::core::mueller_to_jones;

    // Decomposition
    pub use crate::decomp::{
        decompose, decompose_depolarizer, decompose_diattenuator, decompose_retarder,
        decompose_strict, validate_mueller, LuChipman,
    };
}
