use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::config::GameConfig;
use crate::game::controller::Game;
use crate::network::queue::{InboundQueue, OutboundQueue};
use crate::protocol::OutboundMessage;

/// The single game-state lock. Ticks and commands each hold it for one
/// whole step, so neither observes the other half-done.
pub type SharedGame = Arc<Mutex<Game>>;

/// Handles to the background loops plus the flag that stops them.
pub struct Runtime {
    shutdown_tx: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl Runtime {
    /// Start the tick loop and the command loop.
    pub fn start(game: SharedGame, inbound: Arc<InboundQueue>, outbound: Arc<OutboundQueue>, config: &GameConfig) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let tick_interval = Duration::from_millis(config.tick_interval_ms.max(1));
        let poll_interval = Duration::from_millis(config.poll_interval_ms.max(1));

        let handles = vec![
            tokio::spawn(tick_loop(Arc::clone(&game), Arc::clone(&outbound), tick_interval, shutdown_rx.clone())),
            tokio::spawn(command_loop(game, inbound, outbound, poll_interval, shutdown_rx)),
        ];
        Self { shutdown_tx, handles }
    }

    /// A receiver other tasks (gateways) can watch for shutdown.
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    /// Ask both loops to stop and wait for them to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Game loop task failed: {}", e);
            }
        }
        info!("Game loops stopped");
    }
}

fn publish(outbound: &OutboundQueue, messages: impl IntoIterator<Item = OutboundMessage>) {
    for message in messages {
        // A full queue is logged by the queue itself; the message is dropped.
        let _ = outbound.push(message);
    }
}

async fn tick_loop(game: SharedGame, outbound: Arc<OutboundQueue>, period: Duration, mut shutdown: watch::Receiver<bool>) {
    info!("Tick loop started ({}ms)", period.as_millis());
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let mut game = game.lock().await;
                game.tick();
                publish(&outbound, game.drain_outbound());
            }
            _ = shutdown.changed() => break,
        }
        if *shutdown.borrow() {
            break;
        }
    }
    info!("Tick loop stopped");
}

async fn command_loop(
    game: SharedGame,
    inbound: Arc<InboundQueue>,
    outbound: Arc<OutboundQueue>,
    poll_interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    info!("Command loop started");
    loop {
        tokio::select! {
            batch = inbound.wait_drain(poll_interval) => {
                if batch.is_empty() {
                    continue;
                }
                let mut game = game.lock().await;
                for raw in batch {
                    if let Some(response) = game.handle_input(&raw) {
                        publish(&outbound, [response]);
                    }
                    publish(&outbound, game.drain_outbound());
                }
            }
            _ = shutdown.changed() => break,
        }
        if *shutdown.borrow() {
            break;
        }
    }
    info!("Command loop stopped");
}
