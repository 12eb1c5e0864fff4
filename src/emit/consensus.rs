//!
//! Deterministic consensus generators
//!
//! Both decoders read only the match-emission tables: for each node
//! 1..=M they pick the maximum-likelihood residue. No randomness is
//! involved, so two calls on the same model yield identical output.
//!
use crate::alphabet::Residue;
use crate::error::EmitError;
use crate::model::CoreModel;
use crate::prob::Prob;
use crate::seq::Seq;

///
/// Maximum-likelihood residue of a match emission row, with its
/// probability.
///
fn max_match(row: &[Prob]) -> Result<(Residue, f64), EmitError> {
    row.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.to_log_value().total_cmp(&b.to_log_value()))
        .map(|(x, p)| (x as Residue, p.to_value()))
        .ok_or(EmitError::Corrupt("empty match emission row"))
}

///
/// Simple consensus: the maximum-probability residue at each node, as a
/// digital sequence of exactly M residues. Masked nodes yield the
/// degenerate unknown code.
///
pub fn simple_consensus(model: &CoreModel, sq: &mut Seq) -> Result<(), EmitError> {
    if !sq.is_digital() {
        return Err(EmitError::Precondition(
            "simple_consensus requires a digital-mode Seq",
        ));
    }
    sq.reuse();
    sq.grow_to(model.m() + 1)?;
    for k in 1..=model.m() {
        let x = if model.is_masked(k) {
            model.alphabet().unknown_code()
        } else {
            max_match(model.mat(k))?.0
        };
        sq.push_residue(x)?;
    }
    sq.terminate()?;
    Ok(())
}

///
/// Fancy consensus: a human-readable annotated string.
///
/// Per node: masked nodes render as a lowercase unknown symbol; a
/// consensus probability below `min_lower` renders as a lowercase
/// unknown; at or above `min_upper` as the uppercase symbol; anything
/// between as the lowercase symbol (a low-confidence call). The lower
/// bound is exclusive, the upper bound inclusive.
///
pub fn fancy_consensus(
    model: &CoreModel,
    min_lower: f64,
    min_upper: f64,
    sq: &mut Seq,
) -> Result<(), EmitError> {
    if !sq.is_text() {
        return Err(EmitError::Precondition(
            "fancy_consensus requires a text-mode Seq",
        ));
    }
    let abc = model.alphabet();
    sq.reuse();
    sq.grow_to(model.m() + 1)?;
    for k in 1..=model.m() {
        let c = if model.is_masked(k) {
            abc.unknown_symbol().to_ascii_lowercase()
        } else {
            let (x, p) = max_match(model.mat(k))?;
            if p < min_lower {
                abc.unknown_symbol().to_ascii_lowercase()
            } else if p >= min_upper {
                abc.symbol(x).to_ascii_uppercase()
            } else {
                abc.symbol(x).to_ascii_lowercase()
            }
        };
        sq.push_char(c)?;
    }
    sq.terminate()?;
    Ok(())
}
