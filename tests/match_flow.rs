//! End-to-end match scenarios through the public engine API

use std::time::Duration;

use uuid::Uuid;

use football_match_engine::{
    ClientMsg, GameEvent, GameMatch, KickOutcome, MatchState, Score, ServerMsg, Team, Vec3,
};

const DT: f32 = 1.0 / 30.0;

fn kickoff() -> MatchState {
    MatchState::new(Uuid::new_v4(), false)
}

#[test]
fn shot_into_left_goal_credits_away() {
    let mut state = kickoff();
    state.ball.position = Vec3::new(0.0, 0.0, -35.0);
    state.ball.velocity = Vec3::new(0.0, 0.0, 2.0);

    let events = state.advance(DT);
    assert_eq!(state.score, Score { home: 0, away: 1 });
    assert!(matches!(
        events.as_slice(),
        [GameEvent::Goal {
            team: Team::Away,
            ..
        }]
    ));
    assert_eq!(state.ball.position, Vec3::ZERO);
    assert_eq!(state.ball.velocity, Vec3::ZERO);
}

#[test]
fn close_range_kick_matches_power_split() {
    let mut state = kickoff();
    state.add_player(10, "Striker".to_string(), Team::Home);
    state.players.get_mut(&10).unwrap().position = Vec3::new(0.0, 0.0, 1.0);

    // Ball at the center spot, one unit away: direction is -z
    assert_eq!(state.kick_ball(10, 10.0), Ok(KickOutcome::Kicked));
    let vel = state.ball.velocity;
    assert!(vel.x.abs() < 1e-6);
    assert!((vel.y - 3.0).abs() < 1e-6);
    assert!((vel.z + 10.0).abs() < 1e-6);
}

#[test]
fn long_range_kick_is_ignored() {
    let mut state = kickoff();
    state.add_player(10, "Striker".to_string(), Team::Home);
    state.ball.velocity = Vec3::new(1.0, 0.0, 1.0);

    // Spawn spot is 20m from the center spot
    assert_eq!(state.kick_ball(10, 50.0), Ok(KickOutcome::OutOfRange));
    assert_eq!(state.ball.velocity, Vec3::new(1.0, 0.0, 1.0));
}

#[test]
fn dead_ball_stays_dead() {
    let mut state = kickoff();
    for _ in 0..300 {
        state.advance(DT);
    }
    assert_eq!(state.ball.position, Vec3::ZERO);
    assert_eq!(state.ball.velocity, Vec3::ZERO);
    assert!((state.elapsed_secs() - 10.0).abs() < 1e-3);
}

#[test]
fn side_line_bounce_keeps_ball_in_play() {
    let mut state = kickoff();
    state.ball.position = Vec3::new(52.0, 0.0, 0.0);
    state.ball.velocity = Vec3::new(40.0, 0.0, 0.0);

    state.advance(DT);
    assert_eq!(state.ball.position.x, state.field.half_width());
    assert!(state.ball.velocity.x < 0.0);
    assert_eq!(state.score, Score::default());
}

#[test]
fn full_attack_scores_through_the_public_api() {
    let mut state = kickoff();
    state.add_player(7, "Striker".to_string(), Team::Home);

    // Run from (0, 0, -20) to within kicking range of the center spot
    for _ in 0..3 {
        state.move_player(7, 0.0, 0.0, 1.0).unwrap();
    }
    state.move_player(7, 0.0, 0.0, 0.7).unwrap();
    let striker = state.player_snapshot(7).unwrap();
    assert!((striker.position.z + 1.5).abs() < 1e-4);

    // Shoot toward the away goal and play on until it crosses the line
    assert_eq!(state.kick_ball(7, 30.0), Ok(KickOutcome::Kicked));
    let mut goal_events = Vec::new();
    for _ in 0..(30 * 5) {
        goal_events.extend(state.advance(DT));
        if !goal_events.is_empty() {
            break;
        }
    }

    assert!(matches!(
        goal_events.as_slice(),
        [GameEvent::Goal {
            team: Team::Home,
            ..
        }]
    ));
    assert_eq!(state.score, Score { home: 1, away: 0 });
    assert_eq!(state.ball.position, Vec3::ZERO);
}

#[test]
fn snapshot_reconciliation_between_two_engines() {
    let mut server = kickoff();
    server.add_player(1, "One".to_string(), Team::Home);
    server.add_player(2, "Two".to_string(), Team::Away);
    server.move_player(1, 1.0, 0.0, 0.5).unwrap();
    server.kick_ball(1, 5.0).ok();
    server.advance(DT);

    let mut client = kickoff();
    client.add_player(1, "One".to_string(), Team::Home);
    client.add_player(2, "Two".to_string(), Team::Away);

    client.apply_snapshot(&server.snapshot());
    assert_eq!(client.ball.position, server.ball.position);
    assert_eq!(client.ball.velocity, server.ball.velocity);
    assert_eq!(client.players[&1].position, server.players[&1].position);
    // Score stays local to the applying engine
    assert_eq!(client.score, Score::default());
}

#[tokio::test]
async fn runner_relays_commands_and_snapshots() {
    let (game_match, handle) = GameMatch::new(Uuid::new_v4(), false);
    let mut rx = handle.msg_tx.subscribe();
    let task = tokio::spawn(game_match.run());

    handle
        .command_tx
        .send(ClientMsg::Join {
            id: 7,
            name: "Striker".to_string(),
            team: Team::Home,
        })
        .await
        .unwrap();
    handle
        .command_tx
        .send(ClientMsg::Move {
            id: 7,
            dx: 0.0,
            dy: 0.0,
            dz: 1.0,
        })
        .await
        .unwrap();

    // Wait for a snapshot showing the displaced player
    let deadline = Duration::from_secs(2);
    let moved = loop {
        let msg = tokio::time::timeout(deadline, rx.recv())
            .await
            .expect("runner went quiet")
            .expect("broadcast closed early");
        if let ServerMsg::Snapshot { state, .. } = msg {
            if let Some(player) = state.players.iter().find(|p| p.id == 7) {
                if (player.position.z + 15.0).abs() < 1e-4 {
                    break player.position;
                }
            }
        }
    };
    assert_eq!(moved.y, 0.0);

    drop(handle);
    task.await.unwrap();

    let mut saw_end = false;
    while let Ok(msg) = rx.try_recv() {
        if matches!(msg, ServerMsg::MatchEnd { .. }) {
            saw_end = true;
        }
    }
    assert!(saw_end);
}
