//! Authoritative football match simulation engine.
//!
//! The deterministic core lives in [`game::MatchState`]: ball physics,
//! player movement, kicking, and goal detection advance only through its
//! entry points, so a match is fully reproducible from its command
//! sequence. [`game::GameMatch`] wraps the core in a paced tick loop that
//! feeds collaborator commands in and broadcasts state snapshots out;
//! rendering, transport, and input devices stay external behind the
//! [`sync::protocol`] types.

pub mod config;
pub mod game;
pub mod sync;
pub mod util;

pub use game::math::Vec3;
pub use game::{Ball, EngineError, GameMatch, KickOutcome, MatchHandle, MatchState, PlayerState};
pub use sync::protocol::{
    ClientMsg, GameEvent, MatchSnapshot, PlayerId, PlayerSnapshot, Score, ServerMsg, Team,
};
