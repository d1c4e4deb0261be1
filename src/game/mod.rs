//! Game simulation modules

pub mod field;
pub mod math;
pub mod r#match;
pub mod physics;
pub mod snapshot;

pub use r#match::{Ball, GameMatch, KickOutcome, MatchHandle, MatchState, PlayerState};

use crate::sync::protocol::PlayerId;

/// Engine errors for id-keyed operations. With lenient references (the
/// default) unknown ids are absorbed as no-ops and these never surface.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("unknown player id: {0}")]
    UnknownPlayer(PlayerId),
}
