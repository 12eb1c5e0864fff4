//!
//! Core profile HMM model (probability form)
//!
//! A `CoreModel` is a node-indexed table of transition and emission
//! distributions for nodes `0..=M`. Node 0 holds the entry parameters:
//! its match row is the start distribution over {enter match 1, loop in
//! the pre-model insert, enter delete 1}, and its insert row doubles as
//! the emission source of the `N` flank. Node M's insert row doubles as
//! the `C` flank source.
//!
use crate::alphabet::Alphabet;
use crate::error::EmitError;
use crate::prob::Prob;

///
/// Per-node transition distributions, grouped by source state.
///
/// Layout:
/// * `from_match`  = [to match(k+1), to insert(k), to delete(k+1)]
/// * `from_insert` = [to match(k+1), to insert(k)]
/// * `from_delete` = [to match(k+1), to delete(k+1)]
///
#[derive(Debug, Clone, PartialEq)]
pub struct TransRow {
    pub from_match: [Prob; 3],
    pub from_insert: [Prob; 2],
    pub from_delete: [Prob; 2],
}

impl TransRow {
    pub fn new(from_match: [Prob; 3], from_insert: [Prob; 2], from_delete: [Prob; 2]) -> TransRow {
        TransRow {
            from_match,
            from_insert,
            from_delete,
        }
    }
}

///
/// Core model: alphabet + M nodes of transition/emission rows.
///
/// Borrowed read-only by the samplers; never mutated by them.
///
#[derive(Debug, Clone)]
pub struct CoreModel {
    alphabet: Alphabet,
    m: usize,
    t: Vec<TransRow>,
    mat: Vec<Vec<Prob>>,
    ins: Vec<Vec<Prob>>,
    masked: Vec<bool>,
}

impl CoreModel {
    ///
    /// Build a model of length M from per-node rows (`t`, `mat`, `ins`
    /// all of length M+1, emission rows of length K).
    ///
    pub fn new(
        alphabet: Alphabet,
        t: Vec<TransRow>,
        mat: Vec<Vec<Prob>>,
        ins: Vec<Vec<Prob>>,
    ) -> Result<CoreModel, EmitError> {
        if t.is_empty() || t.len() != mat.len() || t.len() != ins.len() {
            return Err(EmitError::Precondition(
                "model tables must all have M+1 rows",
            ));
        }
        let k = alphabet.k();
        if mat.iter().chain(ins.iter()).any(|row| row.len() != k) {
            return Err(EmitError::Precondition(
                "emission rows must match the alphabet size",
            ));
        }
        let m = t.len() - 1;
        Ok(CoreModel {
            alphabet,
            m,
            t,
            mat,
            ins,
            masked: vec![false; m + 1],
        })
    }
    ///
    /// Model length M (number of consensus nodes)
    ///
    pub fn m(&self) -> usize {
        self.m
    }
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }
    pub fn trans(&self, k: usize) -> &TransRow {
        &self.t[k]
    }
    ///
    /// Match emission distribution of node k
    ///
    pub fn mat(&self, k: usize) -> &[Prob] {
        &self.mat[k]
    }
    ///
    /// Insert emission distribution of node k
    ///
    pub fn ins(&self, k: usize) -> &[Prob] {
        &self.ins[k]
    }
    pub fn is_masked(&self, k: usize) -> bool {
        self.masked[k]
    }
    ///
    /// Flag node k as masked; consensus generators render it as the
    /// unknown residue.
    ///
    pub fn set_masked(&mut self, k: usize, masked: bool) {
        self.masked[k] = masked;
    }

    ///
    /// Check that every row is a proper distribution and that the node-M
    /// boundary conventions hold (match M cannot open a delete, delete M
    /// cannot extend), so no path can run past node M.
    ///
    pub fn validate(&self) -> Result<(), EmitError> {
        for k in 0..=self.m {
            let row = &self.t[k];
            check_distribution(&row.from_match)?;
            check_distribution(&row.from_insert)?;
            check_distribution(&row.from_delete)?;
            check_distribution(&self.mat[k])?;
            check_distribution(&self.ins[k])?;
        }
        let last = &self.t[self.m];
        if !last.from_match[2].is_zero() {
            return Err(EmitError::Corrupt("node M must not transition M->D"));
        }
        if !last.from_delete[1].is_zero() {
            return Err(EmitError::Corrupt("node M must not transition D->D"));
        }
        Ok(())
    }
}

fn check_distribution(row: &[Prob]) -> Result<(), EmitError> {
    for &p in row {
        let lp = p.to_log_value();
        if lp.is_nan() || lp > 1e-9 {
            return Err(EmitError::Corrupt("probability outside [0, 1]"));
        }
    }
    let sum: Prob = row.iter().sum();
    if (sum.to_value() - 1.0).abs() > 1e-6 {
        return Err(EmitError::Corrupt("row does not sum to 1"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{mock_all_delete_model, mock_core_model, mock_random_model};
    use crate::prob::p;

    #[test]
    fn model_mocks_are_valid() {
        mock_core_model().validate().unwrap();
        mock_all_delete_model(5).validate().unwrap();
        for seed in 0..5 {
            mock_random_model(20, seed).validate().unwrap();
        }
    }
    #[test]
    fn model_validate_rejects_bad_row() {
        let mut model = mock_core_model();
        let m = model.m();
        model.t[m].from_match = [p(0.5), p(0.3), p(0.3)]; // sums to 1.1
        assert!(model.validate().is_err());
    }
    #[test]
    fn model_validate_rejects_node_m_delete() {
        let mut model = mock_core_model();
        let m = model.m();
        model.t[m].from_match = [p(0.8), p(0.1), p(0.1)];
        assert!(model.validate().is_err());
    }
    #[test]
    fn model_masking() {
        let mut model = mock_core_model();
        assert!(!model.is_masked(2));
        model.set_masked(2, true);
        assert!(model.is_masked(2));
    }
}
