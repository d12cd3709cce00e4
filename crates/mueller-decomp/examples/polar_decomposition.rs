//! Decompose a composed optical system back into its elements.
//!
//! Builds M = M_Δ · M_R · M_D from known parameters, runs the Lu-Chipman
//! decomposition, and prints the recovered factors next to the inputs.
//!
//! Run with: cargo run --example polar_decomposition

use anyhow::Result;
use mueller_core::ops::matmul;
use mueller_core::{depolarizer, linear_diattenuator, linear_retarder};
use mueller_decomp::decompose;
use scirs2_core::ndarray_ext::{Array, IxDyn};

fn print_matrix(label: &str, m: &Array<f64, IxDyn>) {
    println!("{}:", label);
    for i in 0..4 {
        let row: Vec<String> = (0..4)
            .map(|j| format!("{:+.4}", m[IxDyn(&[i, j])]))
            .collect();
        println!("  [{}]", row.join(", "));
    }
}

fn main() -> Result<()> {
    // A depolarizing sample behind a wave plate and a partial polarizer
    let dia = linear_diattenuator(0.1, 0.35, 0.9, None)?;
    let ret = linear_retarder(0.5, 1.4, None)?;
    let dep = depolarizer(0.2, 0.85, 0.75, 0.65, None)?;

    let m = matmul(&dep.view(), &matmul(&ret.view(), &dia.view())?.view())?;
    print_matrix("measured system", &m);

    let factors = decompose(&m.view())?;
    println!();
    print_matrix("recovered diattenuator", &factors.diattenuator);
    print_matrix("recovered retarder", &factors.retarder);
    print_matrix("recovered depolarizer", &factors.depolarizer);

    let back = factors.reconstruct()?;
    let worst = back
        .iter()
        .zip(m.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max);
    println!();
    println!("max |reconstruction - input| = {:.2e}", worst);

    Ok(())
}
