use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{watch, Mutex};
use tracing::{error, info};

use textmud_server::config::GameConfig;
use textmud_server::game::controller::Game;
use textmud_server::network::queue::{InboundQueue, MessageQueue, OutboundQueue};
use textmud_server::network::server::GameServer;
use textmud_server::runtime::{Runtime, SharedGame};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = GameConfig::load();
    let local = std::env::args().any(|arg| arg == "--local");

    let game: SharedGame = Arc::new(Mutex::new(Game::new(&config)));
    let inbound: Arc<InboundQueue> = Arc::new(MessageQueue::new("inbound", config.queue_capacity));
    let outbound: Arc<OutboundQueue> = Arc::new(MessageQueue::new("outbound", config.queue_capacity));
    let runtime = Runtime::start(Arc::clone(&game), Arc::clone(&inbound), Arc::clone(&outbound), &config);
    let poll_interval = Duration::from_millis(config.poll_interval_ms.max(1));

    if local {
        let printer = tokio::spawn(print_outbound(Arc::clone(&outbound), poll_interval, runtime.shutdown_signal()));
        tokio::select! {
            _ = run_console(&config.local_player, &inbound) => {}
            _ = tokio::signal::ctrl_c() => info!("Interrupted"),
        }
        runtime.shutdown().await;
        let _ = printer.await;
        return;
    }

    let server = match GameServer::bind(&config.bind_addr, inbound, outbound, poll_interval).await {
        Ok(server) => server,
        Err(e) => {
            error!("{}", e);
            runtime.shutdown().await;
            return;
        }
    };
    let serving = tokio::spawn(server.run(runtime.shutdown_signal()));

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
    }
    info!("Shutting down");
    runtime.shutdown().await;
    let _ = serving.await;
}

/// Feed stdin lines to the game as `player` until EOF or `quit`.
async fn run_console(player: &str, inbound: &InboundQueue) {
    println!("Playing as {}. Type `join` to start, `help` for commands, `quit` to leave.", player);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim();
                if line == "quit" {
                    break;
                }
                if line.is_empty() {
                    continue;
                }
                if let Err(e) = inbound.push(format!("{} {}", player, line)) {
                    error!("{}", e);
                }
            }
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        }
    }
}

async fn print_outbound(outbound: Arc<OutboundQueue>, poll_interval: Duration, mut shutdown: watch::Receiver<bool>) {
    loop {
        tokio::select! {
            batch = outbound.wait_drain(poll_interval) => {
                for message in batch {
                    println!("[{}] {}", message.player, message.text.trim_end());
                }
            }
            _ = shutdown.changed() => break,
        }
    }
}
