//!
//! Mock models and profiles for testing
//!
use crate::alphabet::Alphabet;
use crate::background::Background;
use crate::model::{CoreModel, TransRow};
use crate::prob::{p, Prob};
use crate::profile::Profile;
use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;

fn row(values: &[f64]) -> Vec<Prob> {
    values.iter().map(|&v| p(v)).collect()
}

///
/// Hand-built 4-node DNA model with strongly peaked match emissions
/// (consensus "ACGT") and mild gap probabilities.
///
pub fn mock_core_model() -> CoreModel {
    let abc = Alphabet::dna();
    let m = 4;
    let mut t = Vec::new();
    let mut mat = Vec::new();
    let mut ins = Vec::new();

    // node 0: entry row; insert row doubles as the N flank source
    t.push(TransRow::new(
        [p(0.7), p(0.2), p(0.1)],
        [p(0.6), p(0.4)],
        [p(1.0), p(0.0)],
    ));
    mat.push(row(&[0.25, 0.25, 0.25, 0.25]));
    ins.push(row(&[0.25, 0.25, 0.25, 0.25]));

    for k in 1..=m {
        if k < m {
            t.push(TransRow::new(
                [p(0.8), p(0.1), p(0.1)],
                [p(0.7), p(0.3)],
                [p(0.8), p(0.2)],
            ));
        } else {
            // node M: no M->D, no D->D
            t.push(TransRow::new(
                [p(0.9), p(0.1), p(0.0)],
                [p(0.7), p(0.3)],
                [p(1.0), p(0.0)],
            ));
        }
        let mut e = vec![0.05; 4];
        e[(k - 1) % 4] = 0.85;
        mat.push(row(&e));
        ins.push(row(&[0.25, 0.25, 0.25, 0.25]));
    }
    CoreModel::new(abc, t, mat, ins).unwrap()
}

///
/// Random DNA model of length m, rows normalized from uniform draws.
/// Honors the node-M boundary conventions.
///
pub fn mock_random_model(m: usize, seed: u64) -> CoreModel {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let abc = Alphabet::dna();
    let k = abc.k();

    let mut sample_row = move |n: usize| -> Vec<f64> {
        let mut v: Vec<f64> = (0..n).map(|_| rng.gen_range(0.05..1.0)).collect();
        let sum: f64 = v.iter().sum();
        for x in v.iter_mut() {
            *x /= sum;
        }
        v
    };

    let mut t = Vec::new();
    let mut mat = Vec::new();
    let mut ins = Vec::new();
    for node in 0..=m {
        let fm = if node == m {
            let two = sample_row(2);
            [p(two[0]), p(two[1]), p(0.0)]
        } else {
            let three = sample_row(3);
            [p(three[0]), p(three[1]), p(three[2])]
        };
        let fi = {
            let two = sample_row(2);
            [p(two[0]), p(two[1])]
        };
        let fd = if node == m {
            [p(1.0), p(0.0)]
        } else {
            let two = sample_row(2);
            [p(two[0]), p(two[1])]
        };
        t.push(TransRow::new(fm, fi, fd));
        mat.push(row(&sample_row(k)));
        ins.push(row(&sample_row(k)));
    }
    CoreModel::new(abc, t, mat, ins).unwrap()
}

///
/// Degenerate model whose only path is an unbroken delete run
/// D1..DM, producing a zero-length sequence with certainty.
///
pub fn mock_all_delete_model(m: usize) -> CoreModel {
    let abc = Alphabet::dna();
    let mut t = Vec::new();
    let mut mat = Vec::new();
    let mut ins = Vec::new();

    t.push(TransRow::new(
        [p(0.0), p(0.0), p(1.0)],
        [p(1.0), p(0.0)],
        [p(1.0), p(0.0)],
    ));
    for k in 1..=m {
        if k < m {
            t.push(TransRow::new(
                [p(0.8), p(0.1), p(0.1)],
                [p(0.7), p(0.3)],
                [p(0.0), p(1.0)],
            ));
        } else {
            t.push(TransRow::new(
                [p(0.9), p(0.1), p(0.0)],
                [p(0.7), p(0.3)],
                [p(1.0), p(0.0)],
            ));
        }
    }
    for _ in 0..=m {
        mat.push(row(&[0.25, 0.25, 0.25, 0.25]));
        ins.push(row(&[0.25, 0.25, 0.25, 0.25]));
    }
    CoreModel::new(abc, t, mat, ins).unwrap()
}

///
/// Single-node DNA model whose node-1 consensus residue is `A` with
/// probability `p_max` (the rest split evenly). Used for pinning the
/// fancy-consensus confidence thresholds.
///
pub fn mock_single_node_model(p_max: f64) -> CoreModel {
    let abc = Alphabet::dna();
    let rest = (1.0 - p_max) / 3.0;
    let t = vec![
        TransRow::new(
            [p(1.0), p(0.0), p(0.0)],
            [p(0.6), p(0.4)],
            [p(1.0), p(0.0)],
        ),
        TransRow::new(
            [p(0.9), p(0.1), p(0.0)],
            [p(0.7), p(0.3)],
            [p(1.0), p(0.0)],
        ),
    ];
    let mat = vec![
        row(&[0.25, 0.25, 0.25, 0.25]),
        row(&[p_max, rest, rest, rest]),
    ];
    let ins = vec![
        row(&[0.25, 0.25, 0.25, 0.25]),
        row(&[0.25, 0.25, 0.25, 0.25]),
    ];
    CoreModel::new(abc, t, mat, ins).unwrap()
}

///
/// Configured multihit dual-mode profile over a mock model.
///
pub fn mock_profile(model: &CoreModel, target_len: usize) -> (Profile, Background) {
    (
        Profile::configured(model, target_len),
        Background::uniform(model.alphabet()),
    )
}
