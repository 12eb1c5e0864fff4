//!
//! Background (null) residue model for flanking regions
//!
use crate::alphabet::Alphabet;
use crate::prob::Prob;

///
/// One residue emission distribution over the alphabet, used by the
/// profile sampler for N/C/J flank emissions.
///
#[derive(Debug, Clone)]
pub struct Background {
    freqs: Vec<Prob>,
}

impl Background {
    pub fn new(freqs: Vec<Prob>) -> Background {
        Background { freqs }
    }
    ///
    /// Uniform background `1/K` for each residue
    ///
    pub fn uniform(abc: &Alphabet) -> Background {
        let k = abc.k();
        Background {
            freqs: vec![Prob::from_prob(1.0 / k as f64); k],
        }
    }
    pub fn freqs(&self) -> &[Prob] {
        &self.freqs
    }
    pub fn k(&self) -> usize {
        self.freqs.len()
    }
}
