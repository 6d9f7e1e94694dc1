use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use tokio::runtime::Runtime;

use crate::api::Channel;
use crate::client::{ApiClient, MessageQuery};
use crate::poller::{PollerSession, SessionMap, POLL_INTERVAL};
use crate::protocol::{BackendAction, ClientEvent};
use crate::render::{MessageRenderer, TextRenderer};

/// Run the backend with the default poll interval.
pub fn run_backend(action_rx: Receiver<BackendAction>, event_tx: Sender<ClientEvent>) {
    run_backend_with(action_rx, event_tx, POLL_INTERVAL);
}

/// Backend thread entry point: owns the tokio runtime, the API client,
/// and the poll sessions. Exits when a `Quit` action arrives or every
/// action sender is gone.
pub fn run_backend_with(
    action_rx: Receiver<BackendAction>,
    event_tx: Sender<ClientEvent>,
    poll_interval: Duration,
) {
    // Create a Tokio runtime for this thread
    let rt = match Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            let _ = event_tx.send(ClientEvent::Error(format!(
                "Failed to create Tokio runtime: {}",
                e
            )));
            return;
        }
    };

    rt.block_on(async move {
        let renderer: Arc<dyn MessageRenderer> = Arc::new(TextRenderer::new());
        let mut client: Option<Arc<ApiClient>> = None;
        let mut directory: Vec<Channel> = Vec::new();
        let mut sessions = SessionMap::new();

        'main: loop {
            // Check for actions from the frontend (non-blocking)
            loop {
                let action = match action_rx.try_recv() {
                    Ok(action) => action,
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        // The frontend dropped its sender; nothing more
                        // can arrive
                        sessions.stop_all();
                        break 'main;
                    }
                };
                match action {
                    BackendAction::Connect { base_url } => {
                        // Sessions pointed at the old service die with it
                        sessions.stop_all();

                        let new_client = match ApiClient::new(&base_url) {
                            Ok(c) => Arc::new(c),
                            Err(e) => {
                                let _ = event_tx.send(ClientEvent::Error(e.to_string()));
                                continue;
                            }
                        };

                        // Probe with the channel listing; it doubles as the
                        // initial directory fetch
                        match new_client.channels().await {
                            Ok(channels) => {
                                directory = channels.clone();
                                let _ = event_tx.send(ClientEvent::Connected {
                                    base_url: new_client.base_url().to_string(),
                                });
                                let _ = event_tx.send(ClientEvent::ChannelList(channels));
                                client = Some(new_client);
                            }
                            Err(e) => {
                                let _ = event_tx
                                    .send(ClientEvent::Error(format!("Connect failed: {}", e)));
                            }
                        }
                    }

                    BackendAction::Subscribe { channel_id } => {
                        let Some(ref c) = client else {
                            let _ = event_tx.send(ClientEvent::Error("Not connected".into()));
                            continue;
                        };
                        let name = directory
                            .iter()
                            .find(|ch| ch.id == channel_id)
                            .map(|ch| ch.label().to_string())
                            .unwrap_or_else(|| format!("#{}", channel_id));

                        let session = PollerSession::new(
                            channel_id,
                            Arc::clone(c),
                            Arc::clone(&renderer),
                            event_tx.clone(),
                        )
                        .with_interval(poll_interval);
                        sessions.start(session);
                        let _ =
                            event_tx.send(ClientEvent::SubscriptionStarted { channel_id, name });
                    }

                    BackendAction::Unsubscribe { channel_id } => {
                        if sessions.stop(channel_id) {
                            let _ = event_tx.send(ClientEvent::SubscriptionEnded { channel_id });
                        } else {
                            let _ = event_tx.send(ClientEvent::Info(format!(
                                "Not subscribed to channel {}",
                                channel_id
                            )));
                        }
                    }

                    BackendAction::SendMessage { channel_id, text } => {
                        let Some(ref c) = client else {
                            let _ = event_tx.send(ClientEvent::Error("Not connected".into()));
                            continue;
                        };
                        match c.send_message(channel_id, &text).await {
                            Ok(receipt) => {
                                // The poller appends it on a later tick
                                let _ = event_tx.send(ClientEvent::MessageSent {
                                    channel_id,
                                    id: receipt.id,
                                });
                            }
                            Err(e) => {
                                let _ = event_tx
                                    .send(ClientEvent::Error(format!("Failed to send: {}", e)));
                            }
                        }
                    }

                    BackendAction::LoadOlder {
                        channel_id,
                        before_id,
                    } => {
                        let Some(ref c) = client else {
                            let _ = event_tx.send(ClientEvent::Error("Not connected".into()));
                            continue;
                        };
                        match c.messages(channel_id, MessageQuery::before(before_id)).await {
                            Ok(batch) => {
                                let lines = batch
                                    .iter()
                                    .filter_map(|m| {
                                        let fragment = renderer.render(m);
                                        if fragment.is_empty() {
                                            None
                                        } else {
                                            Some((m.id, fragment))
                                        }
                                    })
                                    .collect();
                                let _ = event_tx
                                    .send(ClientEvent::HistoryLoaded { channel_id, lines });
                            }
                            Err(e) => {
                                let _ = event_tx.send(ClientEvent::Error(format!(
                                    "Failed to load history: {}",
                                    e
                                )));
                            }
                        }
                    }

                    BackendAction::ListChannels => {
                        let Some(ref c) = client else {
                            let _ = event_tx.send(ClientEvent::Error("Not connected".into()));
                            continue;
                        };
                        match c.channels().await {
                            Ok(channels) => {
                                directory = channels.clone();
                                let _ = event_tx.send(ClientEvent::ChannelList(channels));
                            }
                            Err(e) => {
                                let _ = event_tx.send(ClientEvent::Error(format!(
                                    "Failed to list channels: {}",
                                    e
                                )));
                            }
                        }
                    }

                    BackendAction::Quit => {
                        sessions.stop_all();
                        let _ = event_tx.send(ClientEvent::Disconnected("Client shut down".into()));
                        break 'main;
                    }
                }
            }

            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    });
}
