//! Football Match Engine - headless demo driver
//!
//! Boots the authoritative match loop and stands in for the input and
//! network collaborators with a short scripted attack: a home striker
//! runs onto the ball and shoots into the away goal.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::sleep;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use football_match_engine::config::Config;
use football_match_engine::{ClientMsg, GameEvent, GameMatch, MatchHandle, ServerMsg, Team};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    let match_id = Uuid::new_v4();
    info!(%match_id, strict_refs = config.strict_refs, "Starting football match engine");

    let (game_match, handle) = GameMatch::new(match_id, config.strict_refs);
    let observer = tokio::spawn(observe(handle.msg_tx.subscribe()));
    let runner = tokio::spawn(game_match.run());

    run_demo_script(&handle, config.match_duration_secs).await?;

    // Dropping the last command sender ends the match loop
    drop(handle);
    runner.await?;
    observer.await?;

    info!("Demo complete");
    Ok(())
}

/// Stand-in for the network collaborator: consumes broadcast messages and
/// logs the outbound sync payloads.
async fn observe(mut rx: broadcast::Receiver<ServerMsg>) {
    loop {
        match rx.recv().await {
            Ok(ServerMsg::Snapshot { state, events }) => {
                for event in &events {
                    if let GameEvent::Kick { player_id, power } = event {
                        info!(player_id, power, "Kick relayed");
                    }
                }
                match serde_json::to_string(&state) {
                    Ok(payload) => debug!(tick = state.tick, %payload, "Snapshot out"),
                    Err(err) => debug!(%err, "Snapshot serialization failed"),
                }
            }
            Ok(ServerMsg::MatchEnd {
                score,
                duration_secs,
            }) => {
                info!(
                    home = score.home,
                    away = score.away,
                    duration_secs,
                    "Full time"
                );
                break;
            }
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                debug!(skipped, "Observer lagged behind broadcasts");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Scripted input collaborator: two players join, the striker closes in
/// on the center spot and shoots toward the away goal, then both leave.
async fn run_demo_script(handle: &MatchHandle, duration_secs: u64) -> anyhow::Result<()> {
    let tx = &handle.command_tx;

    tx.send(ClientMsg::Join {
        id: 7,
        name: "Home Striker".to_string(),
        team: Team::Home,
    })
    .await?;
    tx.send(ClientMsg::Join {
        id: 13,
        name: "Away Keeper".to_string(),
        team: Team::Away,
    })
    .await?;
    sleep(Duration::from_millis(100)).await;

    // Run from the spawn spot at (0, 0, -20) to just short of the ball
    for _ in 0..3 {
        tx.send(ClientMsg::Move {
            id: 7,
            dx: 0.0,
            dy: 0.0,
            dz: 1.0,
        })
        .await?;
        sleep(Duration::from_millis(60)).await;
    }
    tx.send(ClientMsg::Move {
        id: 7,
        dx: 0.0,
        dy: 0.0,
        dz: 0.7,
    })
    .await?;
    sleep(Duration::from_millis(60)).await;

    // Close enough: shoot. Power 30 carries past the far goal line.
    tx.send(ClientMsg::Kick { id: 7, power: 30.0 }).await?;

    // Let the ball run in, then keep the match alive for the rest of the
    // configured duration
    sleep(Duration::from_secs(3)).await;
    sleep(Duration::from_secs(duration_secs.saturating_sub(4))).await;

    tx.send(ClientMsg::Leave { id: 7 }).await?;
    tx.send(ClientMsg::Leave { id: 13 }).await?;
    sleep(Duration::from_millis(100)).await;
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
