//! Core application state, separated from presentation logic.
//!
//! `ClientState` holds all data that represents the discussion session:
//! buffers, the channel directory, system log, etc. Frontend code
//! receives state as a parameter rather than owning it.

use std::collections::HashMap;
use std::time::Instant;

use crate::api::Channel;
use crate::buffer::ChannelBuffer;

/// Core application state for the discussion client.
#[derive(Default)]
pub struct ClientState {
    /// Base URL of the service once the connect probe succeeded.
    pub connected_to: Option<String>,

    /// Message buffers keyed by channel id.
    pub buffers: HashMap<i64, ChannelBuffer>,

    /// Ordered list of buffer channel ids (subscription order).
    pub buffers_order: Vec<i64>,

    /// Currently active/visible buffer.
    pub active_buffer: Option<i64>,

    /// Channel directory from the last listing.
    pub channels: Vec<Channel>,

    /// Display name of the local user, used for mention detection.
    pub display_name: String,

    /// Role of the local user, used for role-mention detection.
    pub role: String,

    /// System log messages.
    pub system_log: Vec<String>,

    /// Status toast messages with creation time (auto-expire).
    pub status_messages: Vec<(String, Instant)>,
}

impl ClientState {
    pub fn new(display_name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            role: role.into(),
            system_log: vec!["Welcome to Hubbub!".into()],
            ..Self::default()
        }
    }

    /// Get a mutable reference to a buffer, creating it if needed.
    pub fn ensure_buffer(&mut self, channel_id: i64, name: &str) -> &mut ChannelBuffer {
        if !self.buffers.contains_key(&channel_id) {
            self.buffers.insert(channel_id, ChannelBuffer::new(name));
            self.buffers_order.push(channel_id);
        }
        self.buffers
            .get_mut(&channel_id)
            .expect("Buffer should exist after insertion")
    }

    /// Drop a buffer (subscription ended).
    pub fn remove_buffer(&mut self, channel_id: i64) {
        self.buffers.remove(&channel_id);
        self.buffers_order.retain(|id| *id != channel_id);
        if self.active_buffer == Some(channel_id) {
            self.active_buffer = self.buffers_order.first().copied();
        }
    }

    /// Display label for a channel, falling back to `#<id>` when the
    /// directory has no entry.
    pub fn channel_label(&self, channel_id: i64) -> String {
        self.channels
            .iter()
            .find(|c| c.id == channel_id)
            .map(|c| c.label().to_string())
            .unwrap_or_else(|| format!("#{}", channel_id))
    }

    /// Switch to the next buffer in order.
    pub fn next_buffer(&mut self) {
        let Some(active) = self.active_buffer else {
            self.active_buffer = self.buffers_order.first().copied();
            return;
        };
        if let Some(idx) = self.buffers_order.iter().position(|id| *id == active) {
            let next_idx = (idx + 1) % self.buffers_order.len();
            self.activate_index(next_idx);
        }
    }

    /// Switch to the previous buffer in order.
    pub fn prev_buffer(&mut self) {
        let Some(active) = self.active_buffer else {
            self.active_buffer = self.buffers_order.first().copied();
            return;
        };
        if let Some(idx) = self.buffers_order.iter().position(|id| *id == active) {
            let prev_idx = if idx == 0 {
                self.buffers_order.len() - 1
            } else {
                idx - 1
            };
            self.activate_index(prev_idx);
        }
    }

    /// Switch to a specific buffer by channel id.
    pub fn switch_to_buffer(&mut self, channel_id: i64) {
        if self.buffers.contains_key(&channel_id) {
            self.active_buffer = Some(channel_id);
            if let Some(buffer) = self.buffers.get_mut(&channel_id) {
                buffer.clear_unread();
            }
        }
    }

    fn activate_index(&mut self, idx: usize) {
        if let Some(id) = self.buffers_order.get(idx).copied() {
            self.active_buffer = Some(id);
            if let Some(buffer) = self.buffers.get_mut(&id) {
                buffer.clear_unread();
            }
        }
    }

    /// Purge status messages older than the given duration.
    pub fn purge_old_status_messages(&mut self, max_age_secs: u64) {
        self.status_messages
            .retain(|(_, created)| created.elapsed().as_secs() < max_age_secs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_state_new() {
        let state = ClientState::new("Asha", "member");
        assert!(state.connected_to.is_none());
        assert!(state.buffers.is_empty());
        assert!(state.active_buffer.is_none());
        assert_eq!(state.display_name, "Asha");
    }

    #[test]
    fn test_ensure_buffer() {
        let mut state = ClientState::new("Asha", "member");
        state.ensure_buffer(3, "general");
        assert!(state.buffers.contains_key(&3));
        assert_eq!(state.buffers_order, vec![3]);
        assert_eq!(state.buffers[&3].name, "general");

        // Idempotent
        state.ensure_buffer(3, "general");
        assert_eq!(state.buffers_order, vec![3]);
    }

    #[test]
    fn test_next_prev_buffer() {
        let mut state = ClientState::new("Asha", "member");
        state.ensure_buffer(1, "general");
        state.ensure_buffer(2, "offtopic");
        state.ensure_buffer(3, "announcements");
        state.active_buffer = Some(1);

        state.next_buffer();
        assert_eq!(state.active_buffer, Some(2));
        state.next_buffer();
        assert_eq!(state.active_buffer, Some(3));
        state.next_buffer();
        assert_eq!(state.active_buffer, Some(1)); // wrap around

        state.prev_buffer();
        assert_eq!(state.active_buffer, Some(3));
    }

    #[test]
    fn test_switch_to_buffer_clears_unread() {
        let mut state = ClientState::new("Asha", "member");
        {
            let buf = state.ensure_buffer(5, "general");
            buf.add_message(crate::buffer::RenderedMessage::new(1, "x".into()), false, true);
        }
        assert_eq!(state.buffers[&5].unread_count, 1);

        state.switch_to_buffer(5);
        assert_eq!(state.active_buffer, Some(5));
        assert_eq!(state.buffers[&5].unread_count, 0);

        // Switching to non-existent buffer does nothing
        state.switch_to_buffer(99);
        assert_eq!(state.active_buffer, Some(5));
    }

    #[test]
    fn test_remove_buffer_moves_active() {
        let mut state = ClientState::new("Asha", "member");
        state.ensure_buffer(1, "general");
        state.ensure_buffer(2, "offtopic");
        state.active_buffer = Some(2);

        state.remove_buffer(2);
        assert!(!state.buffers.contains_key(&2));
        assert_eq!(state.active_buffer, Some(1));
    }
}
