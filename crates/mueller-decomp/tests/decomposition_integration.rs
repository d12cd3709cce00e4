//! Integration tests for the Lu-Chipman decomposition
//!
//! Exercises the full pipeline the way a polarimetric analysis does: build a
//! batched image of composed systems with per-pixel parameters, decompose it
//! in one call, and check the factors against the elements that went in.

use mueller_core::ops::matmul;
use mueller_core::{depolarizer, linear_diattenuator, linear_polarizer, linear_retarder};
use mueller_decomp::{decompose, decompose_strict, validate_mueller, LuChipman};
use scirs2_core::ndarray_ext::{Array, Array2, IxDyn};

fn max_abs_diff(a: &Array<f64, IxDyn>, b: &Array<f64, IxDyn>) -> f64 {
    assert_eq!(a.shape(), b.shape());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

fn composed_system(shape: Option<&[usize]>) -> Array<f64, IxDyn> {
    let dep = depolarizer(0.2, 0.85, 0.75, 0.65, shape).unwrap();
    let ret = linear_retarder(0.5, 1.4, shape).unwrap();
    let dia = linear_diattenuator(0.1, 0.35, 0.9, shape).unwrap();
    matmul(
        &dep.view(),
        &matmul(&ret.view(), &dia.view()).unwrap().view(),
    )
    .unwrap()
}

#[test]
fn single_matrix_round_trip() {
    let m = composed_system(None);
    let factors = decompose(&m.view()).unwrap();
    let back = factors.reconstruct().unwrap();
    assert!(max_abs_diff(&back, &m) < 1e-8);
}

#[test]
fn image_sized_batch_round_trips() {
    let m = composed_system(Some(&[8, 8]));
    assert_eq!(m.shape(), &[8, 8, 4, 4]);

    let factors = decompose(&m.view()).unwrap();
    assert_eq!(factors.depolarizer.shape(), &[8, 8, 4, 4]);
    assert_eq!(factors.retarder.shape(), &[8, 8, 4, 4]);
    assert_eq!(factors.diattenuator.shape(), &[8, 8, 4, 4]);

    let back = factors.reconstruct().unwrap();
    assert!(max_abs_diff(&back, &m) < 1e-8);
}

#[test]
fn batched_factors_agree_with_per_block_decomposition() {
    // A ramp of retardances across the batch, decomposed at once and one at
    // a time
    let retardances =
        Array::from_shape_vec(IxDyn(&[3]), vec![0.4, 1.0, 1.9]).unwrap();
    let ret = linear_retarder(0.3, &retardances, Some(&[3])).unwrap();
    let dia = linear_diattenuator(0.1, 0.35, 0.9, Some(&[3])).unwrap();
    let m = matmul(&ret.view(), &dia.view()).unwrap();

    let batch = decompose(&m.view()).unwrap();
    for (e, &r) in retardances.iter().enumerate() {
        let single_m = matmul(
            &linear_retarder(0.3, r, None).unwrap().view(),
            &linear_diattenuator(0.1, 0.35, 0.9, None).unwrap().view(),
        )
        .unwrap();
        let single = decompose(&single_m.view()).unwrap();
        for i in 0..4 {
            for j in 0..4 {
                assert!(
                    (batch.retarder[IxDyn(&[e, i, j])] - single.retarder[IxDyn(&[i, j])]).abs()
                        < 1e-10,
                    "retarder block {} entry [{}, {}]",
                    e,
                    i,
                    j
                );
            }
        }
    }
}

#[test]
fn nondepolarizing_system_has_identity_depolarizer() {
    let ret = linear_retarder(0.5, 1.4, None).unwrap();
    let dia = linear_diattenuator(0.1, 0.35, 0.9, None).unwrap();
    let m = matmul(&ret.view(), &dia.view()).unwrap();

    let LuChipman {
        depolarizer: dep,
        retarder,
        diattenuator,
    } = decompose(&m.view()).unwrap();

    let eye = Array2::<f64>::eye(4).into_dyn();
    assert!(max_abs_diff(&dep, &eye) < 1e-8);
    assert!(max_abs_diff(&retarder, &ret) < 1e-8);
    assert!(max_abs_diff(&diattenuator, &dia) < 1e-8);
}

#[test]
fn perfect_polarizer_fails_or_poisons() {
    // |d| = 1 makes the diattenuator exactly singular; the decomposition
    // either reports the failed inverse or the factors stop being finite
    let m = linear_polarizer(0.0, None).unwrap();
    match decompose_strict(&m.view()) {
        Err(_) => {}
        Ok(factors) => assert!(factors.retarder.iter().any(|v| !v.is_finite())),
    }
}

#[test]
fn strict_mode_passes_physical_input_through() {
    let m = composed_system(None);
    validate_mueller(&m.view()).unwrap();
    let factors = decompose_strict(&m.view()).unwrap();
    let back = factors.reconstruct().unwrap();
    assert!(max_abs_diff(&back, &m) < 1e-8);
}
