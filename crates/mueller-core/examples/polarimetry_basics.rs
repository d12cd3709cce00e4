//! Trace a beam through a short polarimetric train.
//!
//! Builds a Stokes vector, pushes it through a polarizer and a wave plate,
//! and prints the beam after each element.
//!
//! Run with: cargo run --example polarimetry_basics

use anyhow::Result;
use mueller_core::ops::matmul;
use mueller_core::{linear_polarizer, linear_retarder, stokes_from_parameters};
use scirs2_core::ndarray_ext::{Array, IxDyn};

fn print_beam(label: &str, s: &Array<f64, IxDyn>) {
    let i = s[IxDyn(&[0, 0])];
    let q = s[IxDyn(&[1, 0])];
    let u = s[IxDyn(&[2, 0])];
    let v = s[IxDyn(&[3, 0])];
    let dop = (q * q + u * u + v * v).sqrt() / i;
    println!(
        "{:<24} I={:+.4} Q={:+.4} U={:+.4} V={:+.4}  (DoP {:.3})",
        label, i, q, u, v, dop
    );
}

fn main() -> Result<()> {
    // Unpolarized unit-intensity beam
    let mut beam = stokes_from_parameters(1.0, 0.0, 0.0, 0.0, None)?;
    print_beam("source", &beam);

    // Polarizer at 45 degrees: half the light survives, fully polarized
    let polarizer = linear_polarizer(std::f64::consts::FRAC_PI_4, None)?;
    beam = matmul(&polarizer.view(), &beam.view())?;
    print_beam("after polarizer @45", &beam);

    // Quarter-wave plate at horizontal fast axis turns +45 linear into
    // circular light
    let qwp = linear_retarder(0.0, std::f64::consts::FRAC_PI_2, None)?;
    beam = matmul(&qwp.view(), &beam.view())?;
    print_beam("after quarter-wave", &beam);

    Ok(())
}
