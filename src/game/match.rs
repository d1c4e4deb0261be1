//! Match state and authoritative tick loop

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::time::interval;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::sync::protocol::{
    BallSnapshot, ClientMsg, GameEvent, MatchSnapshot, PlayerId, PlayerInfo, PlayerSnapshot, Score,
    ServerMsg, Team,
};
use crate::util::time::{tick_delta, SIMULATION_TPS, SNAPSHOT_TPS, TICK_DURATION_MICROS};

use super::field::{Field, GoalSide};
use super::math::Vec3;
use super::physics::PhysicsSystem;
use super::snapshot::SnapshotBuilder;
use super::EngineError;

/// Movement speed every player is created with
pub const DEFAULT_PLAYER_SPEED: f32 = 5.0;
/// Standard football radius
pub const BALL_RADIUS: f32 = 0.11;
/// Spawn distance from the halfway line on the z axis
const SPAWN_DEPTH: f32 = 20.0;

/// The match ball. Exactly one per match; reset to the center spot after
/// each goal, never destroyed.
#[derive(Debug, Clone)]
pub struct Ball {
    pub position: Vec3,
    pub velocity: Vec3,
    pub radius: f32,
}

impl Ball {
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            radius: BALL_RADIUS,
        }
    }

    /// Back to the center spot, dead.
    pub fn reset(&mut self) {
        self.position = Vec3::ZERO;
        self.velocity = Vec3::ZERO;
    }
}

impl Default for Ball {
    fn default() -> Self {
        Self::new()
    }
}

/// Player state in a match (authoritative)
#[derive(Debug, Clone)]
pub struct PlayerState {
    pub id: PlayerId,
    pub display_name: String,
    pub team: Team,
    pub position: Vec3,
    pub velocity: Vec3,
    pub speed: f32,
}

impl PlayerState {
    /// New player at their team's spawn spot.
    pub fn new(id: PlayerId, display_name: String, team: Team) -> Self {
        let spawn_z = match team {
            Team::Home => -SPAWN_DEPTH,
            Team::Away => SPAWN_DEPTH,
        };
        Self {
            id,
            display_name,
            team,
            position: Vec3::new(0.0, 0.0, spawn_z),
            velocity: Vec3::ZERO,
            speed: DEFAULT_PLAYER_SPEED,
        }
    }
}

/// Outcome of a kick attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KickOutcome {
    /// The ball was in reach; its velocity has been replaced
    Kicked,
    /// The ball was out of reach; nothing changed
    OutOfRange,
}

/// Match state (owned by the match task). All mutation goes through the
/// entry points below; there is no hidden global state, so several
/// matches can run side by side.
pub struct MatchState {
    pub id: Uuid,
    pub tick: u64,
    pub clock_secs: f32,
    pub field: Field,
    pub ball: Ball,
    pub players: HashMap<PlayerId, PlayerState>,
    pub score: Score,
    strict_refs: bool,
}

impl MatchState {
    /// Fresh match at kickoff. With `strict_refs` unset, operations on
    /// unknown player ids are absorbed as no-ops; set, they return
    /// [`EngineError::UnknownPlayer`].
    pub fn new(id: Uuid, strict_refs: bool) -> Self {
        Self {
            id,
            tick: 0,
            clock_secs: 0.0,
            field: Field::default(),
            ball: Ball::new(),
            players: HashMap::new(),
            score: Score::default(),
            strict_refs,
        }
    }

    /// Advance the simulation by `dt` seconds: ball physics, then goal
    /// detection on the post-physics position, then the match clock.
    pub fn advance(&mut self, dt: f32) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.tick += 1;

        let (position, velocity) =
            PhysicsSystem::step_ball(self.ball.position, self.ball.velocity, &self.field, dt);
        self.ball.position = position;
        self.ball.velocity = velocity;

        if let Some(event) = self.check_goal() {
            events.push(event);
        }

        self.clock_secs += dt;
        events
    }

    /// Set a player's velocity from a directional input and displace them
    /// immediately. The displacement is per call, not per second: the
    /// input collaborator issues one move per tick. `dy` is accepted but
    /// ignored; players stay on the ground plane. The player cannot leave
    /// the field.
    pub fn move_player(
        &mut self,
        id: PlayerId,
        dx: f32,
        _dy: f32,
        dz: f32,
    ) -> Result<(), EngineError> {
        let Some(player) = self.players.get_mut(&id) else {
            return self.unknown_player(id);
        };
        player.velocity.x = dx * player.speed;
        player.velocity.z = dz * player.speed;

        player.position.x += player.velocity.x;
        player.position.z += player.velocity.z;
        player.position = self.field.clamp_to_bounds(player.position);
        Ok(())
    }

    /// Kick the ball from a player's position. Out of reach is a quiet
    /// [`KickOutcome::OutOfRange`], not an error.
    pub fn kick_ball(&mut self, id: PlayerId, power: f32) -> Result<KickOutcome, EngineError> {
        let Some(player) = self.players.get(&id) else {
            return self.unknown_player(id).map(|_| KickOutcome::OutOfRange);
        };
        match PhysicsSystem::kick_velocity(player.position, self.ball.position, power) {
            Some(velocity) => {
                self.ball.velocity = velocity;
                Ok(KickOutcome::Kicked)
            }
            None => Ok(KickOutcome::OutOfRange),
        }
    }

    /// Insert a player at their team's spawn spot. Reusing an id replaces
    /// the previous entry.
    pub fn add_player(&mut self, id: PlayerId, display_name: String, team: Team) -> PlayerInfo {
        let player = PlayerState::new(id, display_name, team);
        let info = PlayerInfo {
            id,
            display_name: player.display_name.clone(),
            team,
        };
        if self.players.insert(id, player).is_some() {
            warn!(match_id = %self.id, player_id = id, "player id reused, replacing entry");
        }
        info
    }

    /// Remove a player from the roster. Returns the removed entry, or
    /// `Ok(None)` for an unknown id in lenient mode.
    pub fn remove_player(&mut self, id: PlayerId) -> Result<Option<PlayerState>, EngineError> {
        match self.players.remove(&id) {
            Some(player) => Ok(Some(player)),
            None => self.unknown_player(id).map(|_| None),
        }
    }

    /// Overwrite local ball and player state from an authoritative
    /// snapshot. Players unknown locally are ignored; score and clock
    /// stay local.
    pub fn apply_snapshot(&mut self, state: &MatchSnapshot) {
        self.ball.position = state.ball.position;
        self.ball.velocity = state.ball.velocity;
        for remote in &state.players {
            if let Some(player) = self.players.get_mut(&remote.id) {
                player.position = remote.position;
                player.velocity = remote.velocity;
            }
        }
    }

    /// Elapsed simulated time in seconds.
    pub fn elapsed_secs(&self) -> f32 {
        self.clock_secs
    }

    /// Sync state for one player, if present.
    pub fn player_snapshot(&self, id: PlayerId) -> Option<PlayerSnapshot> {
        self.players.get(&id).map(|p| PlayerSnapshot {
            id: p.id,
            position: p.position,
            velocity: p.velocity,
        })
    }

    /// Full sync state, players sorted by id.
    pub fn snapshot(&self) -> MatchSnapshot {
        let mut players: Vec<PlayerSnapshot> = self
            .players
            .values()
            .map(|p| PlayerSnapshot {
                id: p.id,
                position: p.position,
                velocity: p.velocity,
            })
            .collect();
        players.sort_by_key(|p| p.id);

        MatchSnapshot {
            tick: self.tick,
            clock_secs: self.clock_secs,
            score: self.score,
            ball: BallSnapshot {
                position: self.ball.position,
                velocity: self.ball.velocity,
            },
            players,
        }
    }

    /// Goal detection. Runs once per tick; the goal zones are disjoint
    /// and the ball is reset to the center spot immediately, so at most
    /// one counter increments per crossing.
    fn check_goal(&mut self) -> Option<GameEvent> {
        let side = self.field.goal_crossed(self.ball.position)?;
        // The attacking side scores, not the defender of the crossed line
        let team = match side {
            GoalSide::Left => Team::Away,
            GoalSide::Right => Team::Home,
        };
        self.score.record(team);
        self.ball.reset();
        Some(GameEvent::Goal {
            team,
            score: self.score,
        })
    }

    fn unknown_player(&self, id: PlayerId) -> Result<(), EngineError> {
        if self.strict_refs {
            return Err(EngineError::UnknownPlayer(id));
        }
        debug!(match_id = %self.id, player_id = id, "ignoring unknown player id");
        Ok(())
    }
}

/// Handle to a running match
#[derive(Clone)]
pub struct MatchHandle {
    pub id: Uuid,
    pub command_tx: mpsc::Sender<ClientMsg>,
    pub msg_tx: broadcast::Sender<ServerMsg>,
    pub player_count: Arc<AtomicUsize>,
}

impl MatchHandle {
    pub fn player_count(&self) -> usize {
        self.player_count.load(Ordering::Relaxed)
    }
}

/// The authoritative match task: paces ticks, feeds collaborator commands
/// into the simulation, and broadcasts snapshots. Contains no game logic
/// of its own.
pub struct GameMatch {
    state: MatchState,
    command_rx: mpsc::Receiver<ClientMsg>,
    msg_tx: broadcast::Sender<ServerMsg>,
    snapshot_builder: SnapshotBuilder,
    pending_events: Vec<GameEvent>,
    player_count: Arc<AtomicUsize>,
}

impl GameMatch {
    /// Create a new match and its handle.
    pub fn new(id: Uuid, strict_refs: bool) -> (Self, MatchHandle) {
        let (command_tx, command_rx) = mpsc::channel(256);
        let (msg_tx, _) = broadcast::channel(64);
        let player_count = Arc::new(AtomicUsize::new(0));

        let handle = MatchHandle {
            id,
            command_tx,
            msg_tx: msg_tx.clone(),
            player_count: player_count.clone(),
        };

        let snapshot_interval = SIMULATION_TPS / SNAPSHOT_TPS;
        let game_match = Self {
            state: MatchState::new(id, strict_refs),
            command_rx,
            msg_tx,
            snapshot_builder: SnapshotBuilder::new(snapshot_interval),
            pending_events: Vec::new(),
            player_count,
        };

        (game_match, handle)
    }

    /// Run the authoritative tick loop until every command sender is gone.
    pub async fn run(mut self) {
        info!(match_id = %self.state.id, "Match started");

        let tick_duration = Duration::from_micros(TICK_DURATION_MICROS);
        let mut tick_interval = interval(tick_duration);
        tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tick_interval.tick().await;

            // Drain collaborator commands, then run the simulation tick
            let connected = self.process_commands();
            let events = self.state.advance(tick_delta());

            for event in &events {
                if let GameEvent::Goal { team, score } = event {
                    info!(
                        match_id = %self.state.id,
                        team = ?team,
                        home = score.home,
                        away = score.away,
                        "Goal!"
                    );
                    self.snapshot_builder.force_next();
                }
            }
            self.pending_events.extend(events);

            if self.snapshot_builder.should_send() {
                let events = std::mem::take(&mut self.pending_events);
                let snapshot = self.snapshot_builder.build(&self.state, events);
                let _ = self.msg_tx.send(snapshot);
            }

            if !connected {
                break;
            }
        }

        let _ = self.msg_tx.send(ServerMsg::MatchEnd {
            score: self.state.score,
            duration_secs: self.state.clock_secs as u32,
        });
        info!(
            match_id = %self.state.id,
            home = self.state.score.home,
            away = self.state.score.away,
            "Match ended"
        );
    }

    /// Drain queued commands. Returns false once the channel is closed
    /// and empty.
    fn process_commands(&mut self) -> bool {
        loop {
            match self.command_rx.try_recv() {
                Ok(msg) => self.handle_command(msg),
                Err(mpsc::error::TryRecvError::Empty) => return true,
                Err(mpsc::error::TryRecvError::Disconnected) => return false,
            }
        }
    }

    fn handle_command(&mut self, msg: ClientMsg) {
        match msg {
            ClientMsg::Join { id, name, team } => {
                let info = self.state.add_player(id, name, team);
                self.player_count
                    .store(self.state.players.len(), Ordering::Relaxed);
                info!(
                    match_id = %self.state.id,
                    player_id = id,
                    team = ?info.team,
                    "Player joined match"
                );
                let _ = self.msg_tx.send(ServerMsg::PlayerJoined { player: info });
            }
            ClientMsg::Move { id, dx, dy, dz } => {
                if let Err(err) = self.state.move_player(id, dx, dy, dz) {
                    self.report_error(err);
                }
            }
            ClientMsg::Kick { id, power } => match self.state.kick_ball(id, power) {
                Ok(KickOutcome::Kicked) => {
                    debug!(match_id = %self.state.id, player_id = id, power, "Ball kicked");
                    self.pending_events
                        .push(GameEvent::Kick { player_id: id, power });
                }
                Ok(KickOutcome::OutOfRange) => {}
                Err(err) => self.report_error(err),
            },
            ClientMsg::Leave { id } => match self.state.remove_player(id) {
                Ok(Some(_)) => {
                    self.player_count
                        .store(self.state.players.len(), Ordering::Relaxed);
                    info!(match_id = %self.state.id, player_id = id, "Player left match");
                    let _ = self.msg_tx.send(ServerMsg::PlayerLeft { id });
                }
                Ok(None) => {}
                Err(err) => self.report_error(err),
            },
            ClientMsg::ApplyState { state } => {
                self.state.apply_snapshot(&state);
                debug!(
                    match_id = %self.state.id,
                    remote_tick = state.tick,
                    "Applied authoritative state"
                );
            }
        }
    }

    fn report_error(&self, err: EngineError) {
        warn!(match_id = %self.state.id, %err, "Rejected command");
        let _ = self.msg_tx.send(ServerMsg::Error {
            code: "unknown_player".to_string(),
            message: err.to_string(),
        });
    }
}
