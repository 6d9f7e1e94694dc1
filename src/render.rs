//! Message rendering.
//!
//! The poller does not know how messages are displayed; it is handed a
//! renderer at construction time and appends whatever fragments it
//! produces. A fragment of `""` means "nothing to display" and is not
//! appended, though the message still counts for the watermark.

use crate::api::{Message, MessageKind};

/// Maps one message to a display fragment.
pub trait MessageRenderer: Send + Sync {
    fn render(&self, msg: &Message) -> String;
}

/// Plain-text renderer for the terminal frontend.
#[derive(Default)]
pub struct TextRenderer;

impl TextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl MessageRenderer for TextRenderer {
    fn render(&self, msg: &Message) -> String {
        let body = match msg.message_type {
            MessageKind::Poll => match msg.poll {
                Some(ref poll) => {
                    format!("📊 {} ({} votes)", poll.question, poll.total_votes)
                }
                None => msg.content.clone(),
            },
            _ => msg.content.clone(),
        };

        if body.is_empty() {
            return String::new();
        }

        let mut line = format!("[{}] <{}> {}", msg.created_at, msg.author_name, body);

        if let Some(ref task) = msg.referenced_task {
            line.push_str(&format!(" → re: {} ({})", task.title, task.status));
        }

        if !msg.reactions.is_empty() {
            let total: u32 = msg.reactions.values().map(|r| r.count).sum();
            line.push_str(&format!(" [{} reactions]", total));
        }

        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{PollView, TaskRef};
    use std::collections::HashMap;

    fn message(id: i64, content: &str) -> Message {
        Message {
            id,
            user_id: 1,
            content: content.into(),
            message_type: MessageKind::Text,
            author_name: "Asha".into(),
            author_role: "member".into(),
            author_avatar_color: String::new(),
            created_at: "03:41 PM".into(),
            is_own: false,
            referenced_task: None,
            reactions: HashMap::new(),
            poll: None,
        }
    }

    #[test]
    fn test_renders_plain_text() {
        let r = TextRenderer::new();
        assert_eq!(r.render(&message(1, "hello")), "[03:41 PM] <Asha> hello");
    }

    #[test]
    fn test_renders_poll_question() {
        let mut msg = message(2, "📊 Poll: Meet when?");
        msg.message_type = MessageKind::Poll;
        msg.poll = Some(PollView {
            id: 9,
            question: "Meet when?".into(),
            is_active: true,
            options: vec![],
            total_votes: 4,
        });

        let r = TextRenderer::new();
        assert_eq!(
            r.render(&msg),
            "[03:41 PM] <Asha> 📊 Meet when? (4 votes)"
        );
    }

    #[test]
    fn test_renders_task_reference() {
        let mut msg = message(3, "status update");
        msg.referenced_task = Some(TaskRef {
            title: "Ship flyer".into(),
            status: "review".into(),
            due_date: None,
        });

        let r = TextRenderer::new();
        assert_eq!(
            r.render(&msg),
            "[03:41 PM] <Asha> status update → re: Ship flyer (review)"
        );
    }

    #[test]
    fn test_empty_content_renders_nothing() {
        let r = TextRenderer::new();
        assert_eq!(r.render(&message(4, "")), "");
    }
}
