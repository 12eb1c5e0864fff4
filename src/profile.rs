//!
//! Configured search profile (log-odds score form)
//!
//! The profile adds to a core model the parameters of the implicit
//! probabilistic model used for searching: per-node local-entry scores
//! and the special-state transition scores (flank loops, domain begin,
//! glocal entry, multihit looping). The profile sampler back-calculates
//! probabilities from these log scores.
//!
use crate::error::EmitError;
use crate::model::CoreModel;

///
/// Special (non-node) profile states with configured transition scores.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Special {
    E = 0,
    N = 1,
    J = 2,
    B = 3,
    C = 4,
    G = 5,
}

pub const NUM_SPECIAL_STATES: usize = 6;

/// transition index: stay/loop on the current stage
pub const SPECIAL_LOOP: usize = 0;
/// transition index: advance to the next stage
pub const SPECIAL_MOVE: usize = 1;

///
/// Length-configured, log-odds-scored view of a core model.
///
/// Read-only for the samplers. Score semantics per state, `[LOOP, MOVE]`:
/// * `N`/`C`/`J`: loop = emit one background residue, move = advance
/// * `B`: loop = local entry (L), move = glocal entry (G)
/// * `G`: loop = enter match 1, move = enter delete 1
/// * `E`: loop = another domain (J), move = final flank (C)
///
#[derive(Debug, Clone)]
pub struct Profile {
    m: usize,
    /// log local-entry score for B->Mk, indexed 1..=M ([0] unused)
    entry: Vec<f64>,
    xsc: [[f64; 2]; NUM_SPECIAL_STATES],
}

impl Profile {
    pub fn new(
        m: usize,
        entry: Vec<f64>,
        xsc: [[f64; 2]; NUM_SPECIAL_STATES],
    ) -> Result<Profile, EmitError> {
        if entry.len() != m + 1 {
            return Err(EmitError::Precondition(
                "profile entry scores must have M+1 entries",
            ));
        }
        Ok(Profile { m, entry, xsc })
    }
    pub fn m(&self) -> usize {
        self.m
    }
    ///
    /// Log local-entry score for starting a local fragment at node k.
    ///
    pub fn entry_score(&self, k: usize) -> f64 {
        self.entry[k]
    }
    pub fn special_score(&self, s: Special, t: usize) -> f64 {
        self.xsc[s as usize][t]
    }
    ///
    /// All special-state scores, exponentiated back to probabilities.
    ///
    pub fn special_probs(&self) -> [[f64; 2]; NUM_SPECIAL_STATES] {
        let mut xt = [[0.0; 2]; NUM_SPECIAL_STATES];
        for (s, row) in self.xsc.iter().enumerate() {
            for (t, &score) in row.iter().enumerate() {
                xt[s][t] = score.exp();
            }
        }
        xt
    }

    ///
    /// Standard multihit dual-mode (local/glocal) configuration for a
    /// target mean sequence length.
    ///
    /// Entry uses the uniform-fragment model: all (kstart, kend) pairs
    /// with kstart <= kend equally likely, giving entry(k) = 2/(M(M+1)).
    /// E and B are 50/50; G follows the model's node-0 match/delete
    /// mass; the N/C/J length model emits `target_len` residues in
    /// expectation across the three flanks.
    ///
    pub fn configured(model: &CoreModel, target_len: usize) -> Profile {
        let m = model.m();
        let mut entry = vec![f64::NEG_INFINITY; m + 1];
        let e = (2.0 / (m as f64 * (m as f64 + 1.0))).ln();
        for k in 1..=m {
            entry[k] = e;
        }

        let mut xsc = [[0.0f64; 2]; NUM_SPECIAL_STATES];
        let half = 0.5f64.ln();
        xsc[Special::E as usize] = [half, half];
        xsc[Special::B as usize] = [half, half];

        // G: loop = enter M1, move = enter D1, from the node-0 match row
        let t0 = model.trans(0);
        let pm = t0.from_match[0].to_value();
        let pd = t0.from_match[2].to_value();
        let total = pm + pd;
        xsc[Special::G as usize] = if total > 0.0 {
            [(pm / total).ln(), (pd / total).ln()]
        } else {
            [0.0, f64::NEG_INFINITY]
        };

        // N/C/J length model: 2 + nj expected flanks with nj = 1 (multihit)
        let l = target_len as f64;
        let p_loop = (l / (l + 3.0)).ln();
        let p_move = (3.0 / (l + 3.0)).ln();
        for s in [Special::N, Special::C, Special::J] {
            xsc[s as usize] = [p_loop, p_move];
        }

        Profile { m, entry, xsc }
    }
}
