//!
//! phmm-emit: sampling sequences and alignment traces from profile HMMs
//!
//! The generative counterpart of profile HMM search: run a trained model
//! forward to draw random sequences from the family it describes, either
//! from the core model or from a configured search profile, plus two
//! deterministic consensus decoders. One call samples one sequence into
//! caller-owned reusable buffers.
//!
pub mod alphabet;
pub mod background;
pub mod emit;
pub mod error;
pub mod mocks;
pub mod model;
pub mod prob;
pub mod profile;
pub mod seq;
pub mod trace;

#[cfg(test)]
#[macro_use]
extern crate approx;
