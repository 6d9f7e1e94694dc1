/// Maximum messages to keep in a buffer before trimming
const MAX_BUFFER_MESSAGES: usize = 2000;
/// Number of oldest messages to remove when trimming
const BUFFER_TRIM_COUNT: usize = 500;

/// One rendered display line, tagged with the message id it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedMessage {
    pub id: i64,
    pub fragment: String,
}

impl RenderedMessage {
    pub fn new(id: i64, fragment: String) -> Self {
        Self { id, fragment }
    }
}

/// Display surface for one channel subscription.
#[derive(Default, Clone)]
pub struct ChannelBuffer {
    /// Channel display name.
    pub name: String,
    pub messages: Vec<RenderedMessage>,
    /// Number of unread messages
    pub unread_count: usize,
    /// Whether there is a mention in unread messages
    pub has_highlight: bool,
}

impl ChannelBuffer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            messages: Vec::new(),
            unread_count: 0,
            has_highlight: false,
        }
    }

    pub fn add_message(&mut self, msg: RenderedMessage, is_active: bool, is_highlight: bool) {
        self.messages.push(msg);
        if !is_active {
            self.unread_count += 1;
            if is_highlight {
                self.has_highlight = true;
            }
        }
        // Trim old messages if buffer gets too large
        if self.messages.len() > MAX_BUFFER_MESSAGES {
            self.messages.drain(0..BUFFER_TRIM_COUNT);
        }
    }

    /// Prepend an older page of history (ascending by id), e.g. from a
    /// `before` fetch. Does not touch unread state.
    pub fn prepend_history(&mut self, lines: Vec<RenderedMessage>) {
        if lines.is_empty() {
            return;
        }
        let mut merged = lines;
        merged.append(&mut self.messages);
        self.messages = merged;
    }

    /// Lowest message id currently displayed, the anchor for paging
    /// further back.
    pub fn oldest_id(&self) -> Option<i64> {
        self.messages.first().map(|m| m.id)
    }

    pub fn clear_unread(&mut self) {
        self.unread_count = 0;
        self.has_highlight = false;
    }
}
