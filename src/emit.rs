//!
//! Sampling sequences and traces from core models and configured profiles
//!
//! * [`core::emit_core`] walks the untranslated core model (glocal paths).
//! * [`profile::emit_profile`] walks the configured profile's implicit
//!   probabilistic model, with local/glocal duality and multihit looping.
//! * [`consensus`] holds the two deterministic consensus generators.
//!
pub mod consensus;
pub mod core;
pub mod picker;
pub mod profile;
