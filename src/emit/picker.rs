//!
//! Categorical draw primitives used by the samplers
//!
use crate::alphabet::Residue;
use crate::error::EmitError;
use crate::prob::Prob;
use rand::distributions::{Distribution, WeightedIndex};
use rand::prelude::*;

///
/// pick randomly from the choices with its own probability.
///
/// Zero-probability choices are never selected. A choice list whose
/// weights do not form a usable distribution means the model table
/// feeding it is malformed.
///
pub fn pick_with_prob<R: Rng, T: Copy>(rng: &mut R, choices: &[(T, Prob)]) -> Result<T, EmitError> {
    choices
        .choose_weighted(rng, |item| item.1.to_value())
        .map(|item| item.0)
        .map_err(|_| EmitError::Corrupt("transition row is not a usable distribution"))
}

///
/// Draw a residue code from an emission distribution.
///
pub fn pick_residue<R: Rng>(rng: &mut R, emissions: &[Prob]) -> Result<Residue, EmitError> {
    let dist = WeightedIndex::new(emissions.iter().map(|p| p.to_value()))
        .map_err(|_| EmitError::Corrupt("emission row is not a usable distribution"))?;
    Ok(dist.sample(rng) as Residue)
}

///
/// Draw an index proportional to non-negative `f64` weights.
///
pub fn pick_index<R: Rng>(rng: &mut R, weights: &[f64]) -> Result<usize, EmitError> {
    let dist = WeightedIndex::new(weights.iter())
        .map_err(|_| EmitError::Corrupt("weight vector is not a usable distribution"))?;
    Ok(dist.sample(rng))
}

///
/// Uniform roll over `0..n`
///
pub fn roll<R: Rng>(rng: &mut R, n: usize) -> usize {
    rng.gen_range(0..n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prob::p;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn picker_never_selects_zero_weight() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        let choices = [(0u8, p(0.0)), (1u8, p(0.7)), (2u8, p(0.0)), (3u8, p(0.3))];
        for _ in 0..200 {
            let x = pick_with_prob(&mut rng, &choices).unwrap();
            assert!(x == 1 || x == 3);
        }
    }
    #[test]
    fn picker_rejects_all_zero_weights() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        let choices = [(0u8, p(0.0)), (1u8, p(0.0))];
        assert!(matches!(
            pick_with_prob(&mut rng, &choices),
            Err(EmitError::Corrupt(_))
        ));
        assert!(matches!(
            pick_index(&mut rng, &[0.0, 0.0]),
            Err(EmitError::Corrupt(_))
        ));
    }
    #[test]
    fn picker_residue_within_alphabet() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let row = vec![p(0.1), p(0.2), p(0.3), p(0.4)];
        for _ in 0..100 {
            let x = pick_residue(&mut rng, &row).unwrap();
            assert!((x as usize) < 4);
        }
    }
    #[test]
    fn picker_roll_range() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(2);
        for _ in 0..100 {
            assert!(roll(&mut rng, 7) < 7);
        }
        assert_eq!(roll(&mut rng, 1), 0);
    }
    #[test]
    fn picker_is_deterministic_for_a_seed() {
        let row = vec![p(0.25); 4];
        let mut a = Xoshiro256PlusPlus::seed_from_u64(42);
        let mut b = Xoshiro256PlusPlus::seed_from_u64(42);
        for _ in 0..50 {
            assert_eq!(
                pick_residue(&mut a, &row).unwrap(),
                pick_residue(&mut b, &row).unwrap()
            );
        }
    }
}
