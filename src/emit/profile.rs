//!
//! Sampling from the configured profile
//!
//! The profile machine samples from the implicit probabilistic model of a
//! configured search profile: background-emitting N/C/J flanks, multihit
//! looping through J, and per-domain local/glocal duality. Local fragments
//! fix their endpoints up front via `sample_endpoints`.
//!
//! The whole path is wrapped in a rejection loop: a domain that passes
//! through zero match states is an all-delete glocal path whose
//! probability mass the profile excludes by wing retraction, so such a
//! path is discarded and resampled rather than renormalized in place.
//!
use super::picker::{pick_index, pick_residue, pick_with_prob, roll};
use crate::alphabet::Residue;
use crate::background::Background;
use crate::error::EmitError;
use crate::model::CoreModel;
use crate::profile::{Profile, Special, NUM_SPECIAL_STATES, SPECIAL_MOVE};
use crate::seq::Seq;
use crate::trace::{State, Trace};
use log::{debug, trace};
use rand::Rng;

///
/// Sample one sequence (and/or its trace) from a configured profile.
///
/// Requires the core probabilities of `model`, the configured `profile`,
/// and the `background` for flank emissions. `sq` and `tr` are reusable
/// caller-owned buffers, reset at the start of every attempt. Every
/// domain of an accepted path contains at least one match state. On
/// failure both buffers are reset before the error propagates, so a
/// partially-built rejected domain never leaks to the caller.
///
pub fn emit_profile<R: Rng>(
    rng: &mut R,
    model: &CoreModel,
    profile: &Profile,
    background: &Background,
    mut sq: Option<&mut Seq>,
    mut tr: Option<&mut Trace>,
) -> Result<(), EmitError> {
    let result = emit_profile_inner(
        rng,
        model,
        profile,
        background,
        sq.as_deref_mut(),
        tr.as_deref_mut(),
    );
    if let Err(e) = result {
        if let Some(sq) = sq {
            sq.reuse();
        }
        if let Some(tr) = tr {
            tr.reuse();
        }
        return Err(e);
    }
    Ok(())
}

fn emit_profile_inner<R: Rng>(
    rng: &mut R,
    model: &CoreModel,
    profile: &Profile,
    background: &Background,
    mut sq: Option<&mut Seq>,
    mut tr: Option<&mut Trace>,
) -> Result<(), EmitError> {
    if let Some(sq) = sq.as_deref_mut() {
        if !sq.is_digital() {
            return Err(EmitError::Precondition(
                "emit_profile requires a digital-mode Seq",
            ));
        }
    }
    let m = model.m();
    if profile.m() != m {
        return Err(EmitError::Precondition(
            "model and profile lengths disagree",
        ));
    }

    // back-calculate the special-state probabilities from the log scores
    let xt: [[f64; 2]; NUM_SPECIAL_STATES] = profile.special_probs();
    let draw = |rng: &mut R, s: Special| -> Result<bool, EmitError> {
        Ok(pick_index(rng, &xt[s as usize])? == SPECIAL_MOVE)
    };

    loop {
        let mut st = State::N;
        let mut k = 0; // position in model nodes 1..M
        let mut i = 0; // position in sequence 1..L
        let mut kend = m; // predestined end node of the current domain
        let mut n_match = 0; // match states in the current domain

        if let Some(sq) = sq.as_deref_mut() {
            sq.reuse();
        }
        if let Some(tr) = tr.as_deref_mut() {
            tr.reuse();
            tr.append(State::S, 0, 0)?;
            tr.append(State::N, 0, 0)?;
        }

        let mut rejected = false;
        while st != State::T {
            // sample a state transition; prv/st = previous/current state
            let prv = st;
            st = match st {
                // implicit probabilistic model over local fragment endpoints
                State::L => {
                    let (kstart, ke) = sample_endpoints(rng, profile)?;
                    k = kstart;
                    kend = ke;
                    State::ML
                }
                State::ML | State::MG => {
                    // preordained local Mk->E fate, or glocal Mm->E
                    if k == kend {
                        State::E
                    } else {
                        let local = st == State::ML;
                        let t = model.trans(k);
                        match pick_with_prob(
                            rng,
                            &[
                                (0usize, t.from_match[0]),
                                (1, t.from_match[1]),
                                (2, t.from_match[2]),
                            ],
                        )? {
                            0 if local => State::ML,
                            0 => State::MG,
                            1 if local => State::IL,
                            1 => State::IG,
                            _ if local => State::DL,
                            _ => State::DG,
                        }
                    }
                }
                State::DL | State::DG => {
                    if k == kend {
                        State::E
                    } else {
                        let local = st == State::DL;
                        let t = model.trans(k);
                        let to_match = pick_with_prob(
                            rng,
                            &[(true, t.from_delete[0]), (false, t.from_delete[1])],
                        )?;
                        match (to_match, local) {
                            (true, true) => State::ML,
                            (true, false) => State::MG,
                            (false, true) => State::DL,
                            (false, false) => State::DG,
                        }
                    }
                }
                State::IL | State::IG => {
                    let local = st == State::IL;
                    let t = model.trans(k);
                    let to_match = pick_with_prob(
                        rng,
                        &[(true, t.from_insert[0]), (false, t.from_insert[1])],
                    )?;
                    match (to_match, local) {
                        (true, true) => State::ML,
                        (true, false) => State::MG,
                        (false, true) => State::IL,
                        (false, false) => State::IG,
                    }
                }
                State::B => {
                    n_match = 0;
                    if draw(rng, Special::B)? {
                        State::G
                    } else {
                        State::L
                    }
                }
                State::G => {
                    // glocal fragments always run to the last node
                    kend = m;
                    if draw(rng, Special::G)? {
                        State::DG
                    } else {
                        State::MG
                    }
                }
                State::N => {
                    if draw(rng, Special::N)? {
                        State::B
                    } else {
                        State::N
                    }
                }
                State::E => {
                    if draw(rng, Special::E)? {
                        State::C
                    } else {
                        State::J
                    }
                }
                State::C => {
                    if draw(rng, Special::C)? {
                        State::T
                    } else {
                        State::C
                    }
                }
                State::J => {
                    if draw(rng, Special::J)? {
                        State::B
                    } else {
                        State::J
                    }
                }
                State::S | State::T => {
                    return Err(EmitError::Corrupt("illegal state reached during emission"))
                }
            };

            // update k; careful about L->Mk, where k is already set
            if st == State::E {
                k = 0;
                if n_match == 0 {
                    // all-delete domain: reject the whole path
                    rejected = true;
                    break;
                }
            } else if (st == State::ML && prv != State::L)
                || st == State::MG
                || st == State::DG
                || st == State::DL
            {
                k += 1;
            }

            // generate a residue if the new state emits one;
            // flanks emit from the background only when looping
            let x: Option<Residue> = match st {
                State::ML | State::MG => {
                    n_match += 1;
                    Some(pick_residue(rng, model.mat(k))?)
                }
                State::IL | State::IG => Some(pick_residue(rng, model.ins(k))?),
                State::N | State::C | State::J if prv == st => {
                    Some(pick_residue(rng, background.freqs())?)
                }
                _ => None,
            };
            if x.is_some() {
                i += 1;
            }
            trace!("profile step: {} k={} kend={} i={}", st, k, kend, i);

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

        if !rejected {
            if let Some(tr) = tr.as_deref_mut() {
                tr.close(m, i);
            }
            if let Some(sq) = sq.as_deref_mut() {
                sq.terminate()?;
            }
            return Ok(());
        }
        debug!("rejected an all-delete domain path after {} residues", i);
    }
}

///
/// Sample a local fragment's (kstart, kend) from the profile's implicit
/// endpoint model.
///
/// The entry distribution is back-calculated from the local-entry log
/// scores; exits are assumed uniform given the entry, so each entry
/// weight is multiplied by its number of valid exits, M - k + 1. By
/// construction kstart >= 1 and kstart <= kend <= M.
///
pub fn sample_endpoints<R: Rng>(
    rng: &mut R,
    profile: &Profile,
) -> Result<(usize, usize), EmitError> {
    let m = profile.m();
    let mut pstart = Vec::new();
    pstart.try_reserve_exact(m + 1)?;
    pstart.push(0.0);
    for k in 1..=m {
        pstart.push(profile.entry_score(k).exp() * (m - k + 1) as f64);
    }
    let kstart = pick_index(rng, &pstart)?;
    let kend = kstart + roll(rng, m - kstart + 1);
    Ok((kstart, kend))
}
