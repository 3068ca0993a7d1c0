//! In-process realtime hub with the tokio mpsc command/event pattern.
//!
//! The hub event loop runs in a dedicated tokio task and owns room
//! membership for every attached client. External code communicates with
//! it through typed command and event channels, keeping the transport
//! fully asynchronous and decoupled. Fan-out is at-least-once and always
//! includes the emitter's own link, so a sender sees its own message come
//! back (self-echo); deduplication is the receiver's responsibility.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use causerie_shared::constants::CHANNEL_BUFFER;
use causerie_shared::types::RoomId;

// ---------------------------------------------------------------------------
// Command / event types
// ---------------------------------------------------------------------------

/// Commands sent *into* the hub task.
#[derive(Debug)]
pub enum TransportCommand {
    /// Subscribe the client to a room channel.
    Join(RoomId),
    /// Unsubscribe the client from a room channel. Idempotent.
    Leave(RoomId),
    /// Fan a payload out to every client joined to the room, the emitter
    /// included.
    Emit { room: RoomId, data: Vec<u8> },
    /// Detach the client from the hub.
    Shutdown,
}

/// Events delivered *from* the hub task to an attached client.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// A payload published on a room the client has joined.
    Delivered { room: RoomId, data: Vec<u8> },
}

/// One client's pair of transport channels.
///
/// Dropping the command sender detaches the client from the hub.
pub struct TransportLink {
    /// Sender half for commands into the hub.
    pub cmd_tx: mpsc::Sender<TransportCommand>,
    /// Receiver half for deliveries out of the hub.
    pub events: mpsc::Receiver<TransportEvent>,
}

// ---------------------------------------------------------------------------
// Hub
// ---------------------------------------------------------------------------

enum HubOp {
    Attach {
        client: u64,
        event_tx: mpsc::Sender<TransportEvent>,
    },
    Command {
        client: u64,
        command: TransportCommand,
    },
}

struct HubClient {
    joined: HashSet<RoomId>,
    event_tx: mpsc::Sender<TransportEvent>,
}

/// Handle to a running in-process hub.
pub struct LocalHub {
    op_tx: mpsc::Sender<HubOp>,
    next_id: AtomicU64,
}

impl LocalHub {
    /// Spawn the hub event loop in a background tokio task.
    pub fn spawn() -> Self {
        let (op_tx, op_rx) = mpsc::channel(CHANNEL_BUFFER);

        tokio::spawn(async move {
            hub_loop(op_rx).await;
        });

        Self {
            op_tx,
            next_id: AtomicU64::new(0),
        }
    }

    /// Attach a client and return its command/event channel pair.
    pub async fn attach(&self) -> anyhow::Result<TransportLink> {
        let client = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (event_tx, events) = mpsc::channel(CHANNEL_BUFFER);
        let (cmd_tx, mut cmd_rx) = mpsc::channel(CHANNEL_BUFFER);

        self.op_tx
            .send(HubOp::Attach { client, event_tx })
            .await
            .map_err(|_| anyhow::anyhow!("Hub task is gone"))?;

        // Forward this client's commands into the hub, tagged with the
        // client id. A dropped command sender detaches the client.
        let op_tx = self.op_tx.clone();
        tokio::spawn(async move {
            while let Some(command) = cmd_rx.recv().await {
                let shutdown = matches!(command, TransportCommand::Shutdown);
                if op_tx.send(HubOp::Command { client, command }).await.is_err() {
                    return;
                }
                if shutdown {
                    return;
                }
            }
            let _ = op_tx
                .send(HubOp::Command {
                    client,
                    command: TransportCommand::Shutdown,
                })
                .await;
        });

        Ok(TransportLink { cmd_tx, events })
    }
}

async fn hub_loop(mut ops: mpsc::Receiver<HubOp>) {
    let mut clients: HashMap<u64, HubClient> = HashMap::new();

    info!("Local hub started");

    while let Some(op) = ops.recv().await {
        match op {
            HubOp::Attach { client, event_tx } => {
                debug!(client, "Client attached");
                clients.insert(
                    client,
                    HubClient {
                        joined: HashSet::new(),
                        event_tx,
                    },
                );
            }

            HubOp::Command { client, command } => match command {
                TransportCommand::Join(room) => {
                    if let Some(entry) = clients.get_mut(&client) {
                        entry.joined.insert(room);
                        debug!(client, room = %room, "Joined room");
                    }
                }

                TransportCommand::Leave(room) => {
                    if let Some(entry) = clients.get_mut(&client) {
                        entry.joined.remove(&room);
                        debug!(client, room = %room, "Left room");
                    }
                }

                TransportCommand::Emit { room, data } => {
                    let emitter_joined = clients
                        .get(&client)
                        .map(|entry| entry.joined.contains(&room))
                        .unwrap_or(false);
                    if !emitter_joined {
                        warn!(client, room = %room, "Emit on a room the client has not joined");
                        continue;
                    }

                    for (id, entry) in &clients {
                        if entry.joined.contains(&room) {
                            let delivery = TransportEvent::Delivered {
                                room,
                                data: data.clone(),
                            };
                            if entry.event_tx.send(delivery).await.is_err() {
                                debug!(client = id, "Client event channel closed");
                            }
                        }
                    }
                }

                TransportCommand::Shutdown => {
                    debug!(client, "Client detached");
                    clients.remove(&client);
                }
            },
        }
    }

    info!("Local hub loop terminated");
}
