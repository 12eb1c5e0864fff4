//!
//! Sampling from the core model
//!
//! The core machine walks the untranslated model: every path is glocal
//! (B->G->{MD}1 ... {M}M), with the node-0 insert mapped onto the N flank
//! and the node-M insert folded into the C flank, so the resulting trace
//! uses the same vocabulary as a profile trace.
//!
use super::picker::{pick_residue, pick_with_prob};
use crate::alphabet::Residue;
use crate::error::EmitError;
use crate::model::CoreModel;
use crate::seq::Seq;
use crate::trace::{State, Trace};
use log::trace;
use rand::Rng;

///
/// Sample one sequence (and/or its trace) from a core model.
///
/// `sq` and `tr` are caller-owned reusable buffers; either may be `None`
/// if not needed. Both are reset at the start of the call. A zero-length
/// sequence is possible via an unbroken delete run. On error the buffer
/// contents are unreliable, but the buffers stay safely reusable.
///
pub fn emit_core<R: Rng>(
    rng: &mut R,
    model: &CoreModel,
    mut sq: Option<&mut Seq>,
    mut tr: Option<&mut Trace>,
) -> Result<(), EmitError> {
    if let Some(sq) = sq.as_deref_mut() {
        if !sq.is_digital() {
            return Err(EmitError::Precondition(
                "emit_core requires a digital-mode Seq",
            ));
        }
        sq.reuse();
    }
    if let Some(tr) = tr.as_deref_mut() {
        tr.reuse();
        tr.append(State::S, 0, 0)?;
        tr.append(State::N, 0, 0)?;
    }

    let m = model.m();
    let mut k = 0; // position in model nodes 1..M
    let mut i = 0; // position in sequence 1..L
    let mut st = State::S;

    while st != State::T {
        // sample the next state type, given the current one (and current k)
        st = match st {
            State::S => {
                let t0 = model.trans(0);
                pick_with_prob(
                    rng,
                    &[
                        (State::MG, t0.from_match[0]),
                        // I0 mapped onto N; the preamble already added one N
                        (State::N, t0.from_match[1]),
                        (State::DG, t0.from_match[2]),
                    ],
                )?
            }
            State::N => {
                let t0 = model.trans(0);
                pick_with_prob(
                    rng,
                    &[(State::MG, t0.from_insert[0]), (State::N, t0.from_insert[1])],
                )?
            }
            State::MG => {
                let t = model.trans(k);
                pick_with_prob(
                    rng,
                    &[
                        (State::MG, t.from_match[0]),
                        (State::IG, t.from_match[1]),
                        (State::DG, t.from_match[2]),
                    ],
                )?
            }
            State::IG => {
                let t = model.trans(k);
                pick_with_prob(
                    rng,
                    &[(State::MG, t.from_insert[0]), (State::IG, t.from_insert[1])],
                )?
            }
            State::DG => {
                let t = model.trans(k);
                pick_with_prob(
                    rng,
                    &[(State::MG, t.from_delete[0]), (State::DG, t.from_delete[1])],
                )?
            }
            State::C => {
                let tm = model.trans(m);
                pick_with_prob(
                    rng,
                    &[(State::T, tm.from_insert[0]), (State::C, tm.from_insert[1])],
                )?
            }
            _ => return Err(EmitError::Corrupt("illegal state reached during emission")),
        };

        // bump k if needed, depending on the new state type
        if st == State::MG || st == State::DG {
            k += 1;
        }

        // a transit to {MD}1 means we're clear of I0 and starting the core
        if k == 1 && (st == State::MG || st == State::DG) {
            if let Some(tr) = tr.as_deref_mut() {
                tr.append(State::B, 0, 0)?;
                tr.append(State::G, 0, 0)?;
            }
        }

        // a transit to M_{M+1} means there is no I_M and we're done
        if k == m + 1 && st == State::MG {
            if let Some(tr) = tr.as_deref_mut() {
                tr.append(State::E, 0, 0)?;
                tr.append(State::C, 0, 0)?;
            }
            st = State::T;
        }

        // a transit to I_M gets mapped over to C
        if k == m && st == State::IG {
            if let Some(tr) = tr.as_deref_mut() {
                tr.append(State::E, 0, 0)?;
                tr.append(State::C, 0, 0)?;
            }
            st = State::C;
        }

        // sample a residue if the new state emits one
        let x: Option<Residue> = match st {
            State::MG => Some(pick_residue(rng, model.mat(k))?),
            State::IG => Some(pick_residue(rng, model.ins(k))?),
            State::N => Some(pick_residue(rng, model.ins(0))?),
            State::C => Some(pick_residue(rng, model.ins(m))?),
            _ => None,
        };
        if x.is_some() {
            i += 1;
        }
        trace!("core step: {} k={} i={}", st, k, i);

        if let Some(tr) = tr.as_deref_mut() {
            let node = if st.is_main() { k } else { 0 };
            let pos = if x.is_some() { i } else { 0 };
            tr.append(st, node, pos)?;
        }
        if let Some(x) = x {
            if let Some(sq) = sq.as_deref_mut() {
                sq.push_residue(x)?;
            }
        }
    }

    if let Some(tr) = tr.as_deref_mut() {
        tr.close(m, i);
    }
    if let Some(sq) = sq.as_deref_mut() {
        sq.terminate()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{mock_all_delete_model, mock_core_model, mock_random_model};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn core_emit_traces_replay_against_sequences() {
        let model = mock_core_model();
        let k = model.alphabet().k();
        let mut sq = Seq::digital();
        let mut tr = Trace::new();
        for seed in 0..30 {
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
            emit_core(&mut rng, &model, Some(&mut sq), Some(&mut tr)).unwrap();
            tr.validate(sq.residues(), k).unwrap();
            assert_eq!(tr.model_len, model.m());
            assert_eq!(tr.seq_len, sq.len());
        }
    }
    #[test]
    fn core_emit_random_models() {
        for seed in 0..10 {
            let model = mock_random_model(25, seed);
            model.validate().unwrap();
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed + 1000);
            let mut sq = Seq::digital();
            let mut tr = Trace::new();
            for _ in 0..10 {
                emit_core(&mut rng, &model, Some(&mut sq), Some(&mut tr)).unwrap();
                tr.validate(sq.residues(), model.alphabet().k()).unwrap();
            }
        }
    }
    #[test]
    fn core_emit_all_delete_path_gives_zero_length() {
        let model = mock_all_delete_model(6);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        let mut sq = Seq::digital();
        let mut tr = Trace::new();
        emit_core(&mut rng, &model, Some(&mut sq), Some(&mut tr)).unwrap();
        assert_eq!(sq.len(), 0);
        assert_eq!(tr.seq_len, 0);
        tr.validate(sq.residues(), model.alphabet().k()).unwrap();
        let n_delete = tr.iter().filter(|s| s.state.is_delete()).count();
        assert_eq!(n_delete, 6);
    }
    #[test]
    fn core_emit_is_deterministic_for_a_seed() {
        let model = mock_core_model();
        let mut rng_a = Xoshiro256PlusPlus::seed_from_u64(7);
        let mut rng_b = Xoshiro256PlusPlus::seed_from_u64(7);
        let mut sq_a = Seq::digital();
        let mut sq_b = Seq::digital();
        emit_core(&mut rng_a, &model, Some(&mut sq_a), None).unwrap();
        emit_core(&mut rng_b, &model, Some(&mut sq_b), None).unwrap();
        assert_eq!(sq_a.residues(), sq_b.residues());
    }
    #[test]
    fn core_emit_reuses_buffers_without_leaking() {
        let model = mock_all_delete_model(4);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        let mut sq = Seq::digital();
        let mut tr = Trace::new();
        // fill the buffers with something longer first
        let noisy = mock_core_model();
        loop {
            emit_core(&mut rng, &noisy, Some(&mut sq), Some(&mut tr)).unwrap();
            if sq.len() > 0 {
                break;
            }
        }
        // the all-delete model must leave them exactly empty
        emit_core(&mut rng, &model, Some(&mut sq), Some(&mut tr)).unwrap();
        assert_eq!(sq.len(), 0);
        assert_eq!(tr.seq_len, 0);
        tr.validate(sq.residues(), model.alphabet().k()).unwrap();
    }
    #[test]
    fn core_emit_requires_digital_seq() {
        let model = mock_core_model();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        let mut sq = Seq::text();
        assert!(matches!(
            emit_core(&mut rng, &model, Some(&mut sq), None),
            Err(EmitError::Precondition(_))
        ));
    }
    #[test]
    fn core_emit_sequence_only_and_trace_only() {
        let model = mock_core_model();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let mut sq = Seq::digital();
        emit_core(&mut rng, &model, Some(&mut sq), None).unwrap();
        let mut tr = Trace::new();
        emit_core(&mut rng, &model, None, Some(&mut tr)).unwrap();
        assert!(tr.len() >= 3);
    }
}
