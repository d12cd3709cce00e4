//! # mueller-core
//!
//! Batched Stokes vector and Mueller matrix construction for polarization
//! optics.
//!
//! This crate provides the foundational building blocks of the Mueller
//! calculus stack:
//!
//! - **Stokes vectors** ([`stokes_from_parameters`]) — 4×1 real vectors
//!   (I, Q, U, V) describing a possibly partially polarized beam
//! - **Mueller matrices** ([`mueller_rotation`], [`linear_polarizer`],
//!   [`linear_retarder`], [`linear_diattenuator`], [`depolarizer`]) — 4×4
//!   real matrices transforming Stokes vectors
//! - **Batched kernels** ([`ops::matmul`], [`broadcast::broadcast_outer`]) —
//!   elementwise matrix products over arbitrary leading batch dimensions
//! - **Jones conversion** ([`jones::mueller_to_jones`]) — best-effort
//!   conversion of a single Mueller matrix to a relative Jones matrix
//!
//! ## Batch model
//!
//! Every constructor takes `shape: Option<&[usize]>`. With `None` the result
//! is a single 4×4 matrix (or 4×1 vector). With `Some(&[d1, ..., dk])` the
//! result has shape `[d1, ..., dk, 4, 4]`: one matrix per element of a
//! k-dimensional grid, with the matrix dimensions trailing. This layout
//! matches the convention of focal-plane polarimetry, where every pixel of a
//! detector carries its own Mueller matrix.
//!
//! Physical parameters (angles, retardances, transmissions) are accepted
//! either as scalars or as arrays broadcastable to the batch shape, via the
//! [`Param`] type:
//!
//! ```
//! use mueller_core::linear_retarder;
//! use scirs2_core::ndarray_ext::{Array, IxDyn};
//!
//! // One retarder
//! let single = linear_retarder(0.2, 1.0, None).unwrap();
//! assert_eq!(single.shape(), &[4, 4]);
//!
//! // A 32x32 grid of retarders with a common fast axis and a per-pixel
//! // retardance map
//! let r = Array::<f64, IxDyn>::from_elem(IxDyn(&[32, 32]), 1.0);
//! let grid = linear_retarder(0.2, &r, Some(&[32, 32])).unwrap();
//! assert_eq!(grid.shape(), &[32, 32, 4, 4]);
//! ```
//!
//! ## SciRS2 Integration
//!
//! All array operations use `scirs2_core::ndarray_ext`. Direct use of
//! `ndarray` is forbidden per SCIRS2_INTEGRATION_POLICY.md.
//!
//! ## Error handling
//!
//! Shape and broadcast failures return structured [`MuellerError`] values
//! through `anyhow::Result`. Unphysical *values* (e.g. a transmission above
//! one) are not validated here; following the conventions of the optics
//! literature they propagate silently as NaN. See `mueller-decomp` for the
//! strict validation entry points.

#![deny(warnings)]

pub mod broadcast;
pub mod error;
pub mod jones;
pub mod mueller;
pub mod ops;
pub mod stokes;


pub use broadcast::{broadcast_outer, broadcast_to_batch, flat_to_multi_index, Param};
pub use error::MuellerError;
pub use jones::mueller_to_jones;
pub use mueller::{
    depolarizer, linear_diattenuator, linear_polarizer, linear_retarder, mueller_rotation,
};
pub use stokes::stokes_from_parameters;
