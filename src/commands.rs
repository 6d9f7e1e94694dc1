//! Slash-command handling (/join, /leave, /channels, etc.).

use crossbeam_channel::Sender;

use crate::protocol::BackendAction;
use crate::state::ClientState;
use crate::validation;

/// Handle user commands starting with '/'.
/// Returns true if the input was a command (and should be cleared), false otherwise.
pub fn handle_user_command(
    input: &str,
    state: &mut ClientState,
    action_tx: &Sender<BackendAction>,
) -> bool {
    let s = input.trim();
    if !s.starts_with('/') {
        return false;
    }

    // Remove leading '/'
    let cmdline = s[1..].trim();
    let mut parts = cmdline.split_whitespace();
    let cmd = parts.next().unwrap_or("").to_lowercase();

    match cmd.as_str() {
        "connect" | "c" => {
            let url = parts
                .next()
                .map(str::to_string)
                .unwrap_or_else(|| state.connected_to.clone().unwrap_or_default());
            match validation::validate_base_url(&url) {
                Ok(()) => {
                    let _ = action_tx.send(BackendAction::Connect { base_url: url });
                }
                Err(e) => state.system_log.push(format!("Usage: /connect <url> ({})", e)),
            }
        }
        "join" | "j" => {
            if let Some(arg) = parts.next() {
                match validation::validate_channel_id(arg) {
                    Ok(channel_id) => {
                        let _ = action_tx.send(BackendAction::Subscribe { channel_id });
                    }
                    Err(e) => state.system_log.push(e),
                }
            } else {
                state.system_log.push("Usage: /join <channel-id>".into());
            }
        }
        "leave" | "part" => {
            let target = match parts.next() {
                Some(arg) => validation::validate_channel_id(arg).ok(),
                None => state.active_buffer,
            };
            if let Some(channel_id) = target {
                let _ = action_tx.send(BackendAction::Unsubscribe { channel_id });
            } else {
                state.system_log.push("Usage: /leave [channel-id]".into());
            }
        }
        "channels" | "ls" => {
            let _ = action_tx.send(BackendAction::ListChannels);
        }
        "older" | "o" => {
            let target = state
                .active_buffer
                .and_then(|id| state.buffers.get(&id).map(|b| (id, b.oldest_id())));
            match target {
                Some((channel_id, Some(before_id))) => {
                    let _ = action_tx.send(BackendAction::LoadOlder {
                        channel_id,
                        before_id,
                    });
                }
                Some((_, None)) => {
                    state.system_log.push("Nothing displayed yet".into());
                }
                None => {
                    state.system_log.push("/older needs an active channel".into());
                }
            }
        }
        "switch" | "s" => {
            if let Some(arg) = parts.next() {
                match validation::validate_channel_id(arg) {
                    Ok(channel_id) => state.switch_to_buffer(channel_id),
                    Err(e) => state.system_log.push(e),
                }
            } else {
                state.system_log.push("Usage: /switch <channel-id>".into());
            }
        }
        "next" => state.next_buffer(),
        "prev" => state.prev_buffer(),
        "quit" | "exit" => {
            let _ = action_tx.send(BackendAction::Quit);
        }
        "help" => {
            state.system_log.push(
                "Supported commands: /connect, /join, /leave, /channels, /older, /switch, /next, /prev, /quit"
                    .into(),
            );
        }
        unknown => {
            state.system_log.push(format!("Unknown command: /{}", unknown));
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn test_plain_text_is_not_a_command() {
        let (tx, rx) = unbounded();
        let mut state = ClientState::new("Asha", "member");
        assert!(!handle_user_command("hello there", &mut state, &tx));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_join_sends_subscribe() {
        let (tx, rx) = unbounded();
        let mut state = ClientState::new("Asha", "member");

        assert!(handle_user_command("/join 4", &mut state, &tx));
        assert!(matches!(
            rx.try_recv().unwrap(),
            BackendAction::Subscribe { channel_id: 4 }
        ));

        // Bad id goes to the system log, not the backend
        assert!(handle_user_command("/join zero", &mut state, &tx));
        assert!(rx.try_recv().is_err());
        assert!(state.system_log.last().unwrap().contains("Invalid channel id"));
    }

    #[test]
    fn test_leave_defaults_to_active_buffer() {
        let (tx, rx) = unbounded();
        let mut state = ClientState::new("Asha", "member");
        state.ensure_buffer(7, "general");
        state.active_buffer = Some(7);

        assert!(handle_user_command("/leave", &mut state, &tx));
        assert!(matches!(
            rx.try_recv().unwrap(),
            BackendAction::Unsubscribe { channel_id: 7 }
        ));
    }

    #[test]
    fn test_older_uses_oldest_displayed_id() {
        let (tx, rx) = unbounded();
        let mut state = ClientState::new("Asha", "member");
        {
            let buf = state.ensure_buffer(7, "general");
            buf.add_message(crate::buffer::RenderedMessage::new(41, "m41".into()), true, false);
            buf.add_message(crate::buffer::RenderedMessage::new(42, "m42".into()), true, false);
        }
        state.active_buffer = Some(7);

        assert!(handle_user_command("/older", &mut state, &tx));
        assert!(matches!(
            rx.try_recv().unwrap(),
            BackendAction::LoadOlder {
                channel_id: 7,
                before_id: 41
            }
        ));
    }

    #[test]
    fn test_quit_and_unknown() {
        let (tx, rx) = unbounded();
        let mut state = ClientState::new("Asha", "member");

        assert!(handle_user_command("/quit", &mut state, &tx));
        assert!(matches!(rx.try_recv().unwrap(), BackendAction::Quit));

        assert!(handle_user_command("/frobnicate", &mut state, &tx));
        assert!(state
            .system_log
            .last()
            .unwrap()
            .contains("Unknown command: /frobnicate"));
    }
}
