//!
//! test of sequence emission from core models and profiles
//!
use itertools::izip;
use phmm_emit::emit::core::emit_core;
use phmm_emit::emit::profile::{emit_profile, sample_endpoints};
use phmm_emit::mocks::{mock_all_delete_model, mock_profile, mock_random_model};
use phmm_emit::seq::Seq;
use phmm_emit::trace::Trace;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn emission_core_many_models_many_seeds() {
    init_logger();
    let mut sq = Seq::digital();
    let mut tr = Trace::new();
    for model_seed in 0..5 {
        let model = mock_random_model(40, model_seed);
        model.validate().unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(model_seed);
        for _ in 0..50 {
            emit_core(&mut rng, &model, Some(&mut sq), Some(&mut tr)).unwrap();
            tr.validate(sq.residues(), model.alphabet().k()).unwrap();
            assert_eq!(tr.model_len, model.m());
            assert_eq!(tr.seq_len, sq.len());
        }
    }
}

#[test]
fn emission_profile_many_models_many_seeds() {
    init_logger();
    let mut sq = Seq::digital();
    let mut tr = Trace::new();
    for model_seed in 0..5 {
        let model = mock_random_model(40, model_seed);
        let (gm, bg) = mock_profile(&model, 80);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1000 + model_seed);
        for _ in 0..50 {
            emit_profile(&mut rng, &model, &gm, &bg, Some(&mut sq), Some(&mut tr)).unwrap();
            tr.validate(sq.residues(), model.alphabet().k()).unwrap();
            // wing retraction: no accepted domain is all-delete
            for n_match in tr.matches_per_domain() {
                assert!(n_match >= 1);
            }
            // at least one match anywhere implies length >= 1
            assert!(sq.len() >= 1);
        }
    }
}

#[test]
fn emission_profile_accepted_paths_are_stable() {
    // once accepted, replaying the same seed gives the identical path
    init_logger();
    let model = mock_random_model(30, 9);
    let (gm, bg) = mock_profile(&model, 60);

    let mut sq_a = Seq::digital();
    let mut tr_a = Trace::new();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);
    emit_profile(&mut rng, &model, &gm, &bg, Some(&mut sq_a), Some(&mut tr_a)).unwrap();

    let mut sq_b = Seq::digital();
    let mut tr_b = Trace::new();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);
    emit_profile(&mut rng, &model, &gm, &bg, Some(&mut sq_b), Some(&mut tr_b)).unwrap();

    assert_eq!(sq_a.residues(), sq_b.residues());
    assert_eq!(tr_a.len(), tr_b.len());
    for (x, y) in izip!(tr_a.iter(), tr_b.iter()) {
        assert_eq!(x, y);
    }
}

#[test]
fn emission_buffers_reflect_only_the_latest_call() {
    init_logger();
    let noisy = mock_random_model(40, 2);
    let empty = mock_all_delete_model(10);
    let mut sq = Seq::digital();
    let mut tr = Trace::new();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);

    emit_core(&mut rng, &noisy, Some(&mut sq), Some(&mut tr)).unwrap();
    emit_core(&mut rng, &empty, Some(&mut sq), Some(&mut tr)).unwrap();
    assert_eq!(sq.len(), 0);
    assert_eq!(tr.seq_len, 0);
    tr.validate(sq.residues(), empty.alphabet().k()).unwrap();
}

#[test]
fn emission_endpoints_cover_the_model() {
    init_logger();
    let model = mock_random_model(20, 4);
    let (gm, _) = mock_profile(&model, 40);
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
    let mut seen_start = vec![false; gm.m() + 1];
    let mut seen_end = vec![false; gm.m() + 1];
    for _ in 0..5000 {
        let (kstart, kend) = sample_endpoints(&mut rng, &gm).unwrap();
        assert!(1 <= kstart && kstart <= kend && kend <= gm.m());
        seen_start[kstart] = true;
        seen_end[kend] = true;
    }
    // with uniform-pair entry every node is reachable as a start and end
    assert!(seen_start[1..].iter().all(|&b| b));
    assert!(seen_end[1..].iter().all(|&b| b));
}
