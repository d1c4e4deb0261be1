//! Protocol message definitions
//! These are the serializable types exchanged with the input and network
//! collaborators; transport is outside the engine.

use serde::{Deserialize, Serialize};

use crate::game::math::Vec3;

/// Player identifier, unique within a match
pub type PlayerId = u32;

/// Team sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    /// Team 1, spawns on negative z and defends the left goal
    Home,
    /// Team 2, spawns on positive z and defends the right goal
    Away,
}

impl Team {
    /// Numeric side: 0 = home, 1 = away
    pub fn index(self) -> u8 {
        match self {
            Team::Home => 0,
            Team::Away => 1,
        }
    }

    pub fn opponent(self) -> Team {
        match self {
            Team::Home => Team::Away,
            Team::Away => Team::Home,
        }
    }
}

impl Default for Team {
    fn default() -> Self {
        Self::Home
    }
}

/// Messages sent into the engine by collaborators
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    /// Add a player to the roster (an existing id is replaced)
    Join {
        id: PlayerId,
        name: String,
        team: Team,
    },

    /// Directional move request for one player
    Move {
        id: PlayerId,
        /// Direction along x
        dx: f32,
        /// Accepted for symmetry, ignored: players stay on the ground
        dy: f32,
        /// Direction along z
        dz: f32,
    },

    /// Kick request; ignored when the player cannot reach the ball
    Kick { id: PlayerId, power: f32 },

    /// Remove a player from the roster
    Leave { id: PlayerId },

    /// Authoritative state from the network collaborator, overwriting
    /// local ball and player state (server reconciliation)
    ApplyState { state: MatchSnapshot },
}

/// Messages sent from the engine to collaborators
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    /// Player joined the match
    PlayerJoined { player: PlayerInfo },

    /// Player left the match
    PlayerLeft { id: PlayerId },

    /// Periodic state snapshot with the events since the previous one
    Snapshot {
        state: MatchSnapshot,
        events: Vec<GameEvent>,
    },

    /// Match has ended
    MatchEnd { score: Score, duration_secs: u32 },

    /// Rejected command (strict reference mode)
    Error { code: String, message: String },
}

/// Player identity for roster announcements
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub id: PlayerId,
    pub display_name: String,
    pub team: Team,
}

/// Match score. Counters only ever increase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

impl Score {
    /// Credit a goal to `team`.
    pub fn record(&mut self, team: Team) {
        match team {
            Team::Home => self.home += 1,
            Team::Away => self.away += 1,
        }
    }
}

/// Ball state in a snapshot
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BallSnapshot {
    pub position: Vec3,
    pub velocity: Vec3,
}

/// Player state in a snapshot
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub position: Vec3,
    pub velocity: Vec3,
}

/// Full match state for sync: tick, clock, score, ball, and every player
/// (sorted by id for stable output)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub tick: u64,
    pub clock_secs: f32,
    pub score: Score,
    pub ball: BallSnapshot,
    pub players: Vec<PlayerSnapshot>,
}

/// Game events (kicks, goals)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum GameEvent {
    /// A player connected with the ball
    Kick { player_id: PlayerId, power: f32 },

    /// Goal scored; carries the updated score
    Goal { team: Team, score: Score },
}
