use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

use crate::network::queue::{InboundQueue, OutboundQueue};
use crate::protocol::InboundCommand;

/// Channel for sending text frames to one connected client.
type ClientTx = mpsc::UnboundedSender<String>;

/// Player name -> the connection that last spoke for that player.
#[derive(Clone, Default)]
struct Routes(Arc<Mutex<HashMap<String, ClientTx>>>);

impl Routes {
    fn lock(&self) -> MutexGuard<'_, HashMap<String, ClientTx>> {
        self.0.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn register(&self, player: &str, tx: &ClientTx) {
        self.lock().insert(player.to_string(), tx.clone());
    }

    fn unregister_all(&self, tx: &ClientTx) {
        self.lock().retain(|_, route| !route.same_channel(tx));
    }

    fn get(&self, player: &str) -> Option<ClientTx> {
        self.lock().get(player).cloned()
    }
}

/// WebSocket gateway. Each text frame is one `"<player> <command>"` line;
/// replies go back as JSON-encoded `OutboundMessage`s on the connection
/// that last sent a line for that player.
pub struct GameServer {
    listener: TcpListener,
    inbound: Arc<InboundQueue>,
    outbound: Arc<OutboundQueue>,
    routes: Routes,
    poll_interval: Duration,
}

impl GameServer {
    pub async fn bind(
        addr: &str,
        inbound: Arc<InboundQueue>,
        outbound: Arc<OutboundQueue>,
        poll_interval: Duration,
    ) -> Result<Self, String> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;
        info!("Game server listening on ws://{}", addr);
        Ok(Self {
            listener,
            inbound,
            outbound,
            routes: Routes::default(),
            poll_interval,
        })
    }

    pub fn local_addr(&self) -> Result<std::net::SocketAddr, String> {
        self.listener.local_addr().map_err(|e| e.to_string())
    }

    /// Accept connections and pump outbound messages until `shutdown` flips.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let pump = tokio::spawn(outbound_pump(
            Arc::clone(&self.outbound),
            self.routes.clone(),
            self.poll_interval,
            shutdown.clone(),
        ));

        loop {
            tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, addr)) => {
                        info!("New connection from: {}", addr);
                        tokio::spawn(handle_connection(stream, Arc::clone(&self.inbound), self.routes.clone()));
                    }
                    Err(e) => error!("Failed to accept connection: {}", e),
                },
                _ = shutdown.changed() => break,
            }
            if *shutdown.borrow() {
                break;
            }
        }

        let _ = pump.await;
        info!("Game server stopped");
    }
}

async fn handle_connection(stream: TcpStream, inbound: Arc<InboundQueue>, routes: Routes) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            error!("WebSocket handshake failed: {}", e);
            return;
        }
    };
    let (mut ws_write, mut ws_read) = ws_stream.split();
    let (client_tx, mut client_rx) = mpsc::unbounded_channel::<String>();

    // ── Write task ──────────────────────────────────────────────
    tokio::spawn(async move {
        while let Some(text) = client_rx.recv().await {
            if let Err(e) = ws_write.send(Message::Text(text)).await {
                error!("Failed to send WebSocket message: {}", e);
                break;
            }
        }
        debug!("Write task shutting down");
    });

    // ── Read loop ───────────────────────────────────────────────
    while let Some(result) = ws_read.next().await {
        match result {
            Ok(Message::Text(line)) => {
                let Some(command) = InboundCommand::parse(&line) else {
                    continue;
                };
                routes.register(&command.player, &client_tx);
                if let Err(e) = inbound.push(line) {
                    warn!("Dropping command from {}: {}", command.player, e);
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                error!("WebSocket read error: {}", e);
                break;
            }
        }
    }

    routes.unregister_all(&client_tx);
    info!("Connection closed");
}

/// Forward queued outbound messages to whichever connection owns the player.
async fn outbound_pump(outbound: Arc<OutboundQueue>, routes: Routes, poll_interval: Duration, mut shutdown: watch::Receiver<bool>) {
    loop {
        tokio::select! {
            batch = outbound.wait_drain(poll_interval) => {
                for message in batch {
                    let Some(tx) = routes.get(&message.player) else {
                        debug!("No connection for {}, dropping message", message.player);
                        continue;
                    };
                    match serde_json::to_string(&message) {
                        Ok(json) => {
                            if tx.send(json).is_err() {
                                warn!("Client for {} disconnected", message.player);
                            }
                        }
                        Err(e) => error!("Failed to serialize OutboundMessage: {}", e),
                    }
                }
            }
            _ = shutdown.changed() => break,
        }
        if *shutdown.borrow() {
            break;
        }
    }
    debug!("Outbound pump stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::queue::MessageQueue;
    use crate::protocol::OutboundMessage;
    use tokio_tungstenite::connect_async;

    #[tokio::test]
    async fn frames_reach_inbound_and_replies_reach_the_client() {
        let inbound = Arc::new(MessageQueue::new("inbound", 8));
        let outbound = Arc::new(MessageQueue::new("outbound", 8));
        let server = GameServer::bind("127.0.0.1:0", Arc::clone(&inbound), Arc::clone(&outbound), Duration::from_millis(5))
            .await
            .unwrap();
        let addr = server.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let serving = tokio::spawn(server.run(shutdown_rx));

        let (mut client, _) = connect_async(format!("ws://{}", addr)).await.unwrap();
        client.send(Message::Text("Tester look".to_string())).await.unwrap();

        let lines = inbound.wait_drain(Duration::from_secs(2)).await;
        assert_eq!(lines, vec!["Tester look".to_string()]);

        outbound.push(OutboundMessage::new("Tester", "You are at Center.")).unwrap();
        let reply = tokio::time::timeout(Duration::from_secs(2), client.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        let message: OutboundMessage = serde_json::from_str(reply.to_text().unwrap()).unwrap();
        assert_eq!(message, OutboundMessage::new("Tester", "You are at Center."));

        shutdown_tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(2), serving).await.unwrap().unwrap();
    }
}
