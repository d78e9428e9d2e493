//! Spin request errors

use thiserror::Error;

/// Why a spin or a state change was refused. None of these mutate state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpinError {
    #[error("Nothing to spin: enable at least one class and one build")]
    NothingToSpin,

    #[error("A spin is already in progress")]
    AlreadySpinning,

    #[error("Both wheels are locked, nothing left to randomize")]
    AllLocked,

    #[error("Cannot change the wheels while they are spinning")]
    SessionBusy,

    #[error("Unknown {kind}: {id}")]
    UnknownItem { kind: &'static str, id: String },
}
