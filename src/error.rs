//!
//! Error type shared by model construction, buffers and the samplers
//!
use std::collections::TryReserveError;
use thiserror::Error;

///
/// Failure modes of emission and consensus calls.
///
/// `Corrupt` means a model table fed to a sampler is not a usable
/// distribution; `Alloc` surfaces a failed buffer/trace reservation;
/// `Precondition` flags a caller error such as a wrong-mode `Seq` or a
/// model/profile length mismatch.
///
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("corrupt model: {0}")]
    Corrupt(&'static str),
    #[error("allocation failed: {0}")]
    Alloc(#[from] TryReserveError),
    #[error("precondition violated: {0}")]
    Precondition(&'static str),
}
