//! Backend event processing (poll appends, channel lists, errors, etc.).

use chrono::Local;
use crossbeam_channel::Receiver;

use crate::buffer::RenderedMessage;
use crate::mentions;
use crate::protocol::ClientEvent;
use crate::state::ClientState;

const MAX_SYSTEM_LOG: usize = 500;

/// Process all pending events from the backend.
pub fn process_events(event_rx: &Receiver<ClientEvent>, state: &mut ClientState) {
    // Drain all pending events from the backend
    while let Ok(event) = event_rx.try_recv() {
        apply_event(state, event);
    }
}

/// Apply one backend event to the client state.
pub fn apply_event(state: &mut ClientState, event: ClientEvent) {
    let ts = Local::now().format("%H:%M:%S").to_string();

    match event {
        ClientEvent::Connected { base_url } => {
            state.connected_to = Some(base_url.clone());
            state.system_log.push(format!("[{}] ✓ Connected to {}", ts, base_url));
            state
                .status_messages
                .push((format!("Connected to {}", base_url), std::time::Instant::now()));
        }

        ClientEvent::Disconnected(reason) => {
            state.connected_to = None;
            state.system_log.push(format!("[{}] ✗ Disconnected: {}", ts, reason));
        }

        ClientEvent::Error(msg) => {
            state.system_log.push(format!("[{}] ⚠ Error: {}", ts, msg));
            state
                .status_messages
                .push((format!("Error: {}", msg), std::time::Instant::now()));
        }

        ClientEvent::Info(msg) => {
            state.system_log.push(format!("[{}] {}", ts, msg));
            // Keep log from growing too large
            if state.system_log.len() > MAX_SYSTEM_LOG {
                state.system_log.remove(0);
            }
        }

        ClientEvent::ChannelList(channels) => {
            state
                .system_log
                .push(format!("[{}] {} channels visible", ts, channels.len()));
            state.channels = channels;
        }

        ClientEvent::SubscriptionStarted { channel_id, name } => {
            state.system_log.push(format!("[{}] ✓ Joined {}", ts, name));
            let buffer = state.ensure_buffer(channel_id, &name);
            buffer.clear_unread();
            state.active_buffer = Some(channel_id);
        }

        ClientEvent::SubscriptionEnded { channel_id } => {
            let label = state.channel_label(channel_id);
            state.system_log.push(format!("[{}] ← Left {}", ts, label));
            state.remove_buffer(channel_id);
        }

        ClientEvent::MessageReceived {
            channel_id,
            message,
            fragment,
        } => {
            let is_active = state.active_buffer == Some(channel_id);
            let mention = !message.is_own
                && mentions::mentions_user(&message.content, &state.display_name, &state.role);
            let name = state.channel_label(channel_id);
            let buffer = state.ensure_buffer(channel_id, &name);
            buffer.add_message(
                RenderedMessage::new(message.id, fragment),
                is_active || message.is_own,
                mention,
            );
        }

        ClientEvent::HistoryLoaded { channel_id, lines } => {
            // Only prepend into a live buffer; a torn-down one stays gone
            if let Some(buffer) = state.buffers.get_mut(&channel_id) {
                let count = lines.len();
                buffer.prepend_history(
                    lines
                        .into_iter()
                        .map(|(id, fragment)| RenderedMessage::new(id, fragment))
                        .collect(),
                );
                state
                    .system_log
                    .push(format!("[{}] Loaded {} older messages", ts, count));
            }
        }

        ClientEvent::MessageSent { channel_id, id } => {
            tracing::debug!(channel_id, id, "message accepted by server");
        }
    }
}
