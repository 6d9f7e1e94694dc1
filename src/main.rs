//! Terminal frontend for the Hubbub discussion client.
//!
//! Usage: `hubbub-client [base-url] [channel-id]`. Arguments override the
//! saved settings; slash commands (`/help`) drive everything else.

use std::io::BufRead;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{select, unbounded, Receiver};

use hubbub_client::backend;
use hubbub_client::commands;
use hubbub_client::config;
use hubbub_client::events;
use hubbub_client::protocol::{BackendAction, ClientEvent};
use hubbub_client::state::ClientState;
use hubbub_client::validation;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let settings = config::load_settings().unwrap_or_default();

    let (action_tx, action_rx) = unbounded::<BackendAction>();
    let (event_tx, event_rx) = unbounded::<ClientEvent>();

    let poll_interval = Duration::from_millis(settings.poll_interval_ms);
    let backend_handle = thread::spawn(move || {
        backend::run_backend_with(action_rx, event_tx, poll_interval);
    });

    let input_rx = spawn_stdin_reader();

    let mut state = ClientState::new(&settings.display_name, &settings.role);
    let mut printed_log = 0;

    let base_url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| settings.base_url.clone());
    let mut startup_channel = std::env::args()
        .nth(2)
        .and_then(|arg| arg.parse::<i64>().ok())
        .or(settings.default_channel);

    let _ = action_tx.send(BackendAction::Connect { base_url });

    let mut quit_requested = false;
    loop {
        select! {
            recv(event_rx) -> msg => {
                let Ok(event) = msg else { break };

                // Fragments for the active channel go straight to the screen
                if let ClientEvent::MessageReceived { channel_id, ref fragment, .. } = event {
                    if state.active_buffer == Some(channel_id) {
                        println!("{}", fragment);
                    }
                }

                if matches!(event, ClientEvent::Connected { .. }) {
                    if let Some(channel_id) = startup_channel.take() {
                        let _ = action_tx.send(BackendAction::Subscribe { channel_id });
                    }
                }

                let quitting = matches!(event, ClientEvent::Disconnected(_));
                events::apply_event(&mut state, event);
                flush_system_log(&state, &mut printed_log);
                if quitting {
                    break;
                }
            }
            recv(input_rx) -> msg => {
                match msg {
                    Ok(line) => {
                        handle_input(&line, &mut state, &action_tx);
                        flush_system_log(&state, &mut printed_log);
                    }
                    Err(_) => {
                        // stdin closed; ask the backend to wind down and
                        // wait for its Disconnected event
                        if !quit_requested {
                            quit_requested = true;
                            let _ = action_tx.send(BackendAction::Quit);
                        }
                        // A closed channel stays ready; don't spin
                        thread::sleep(Duration::from_millis(50));
                    }
                }
            }
        }
        state.purge_old_status_messages(6);
    }

    let _ = backend_handle.join();
}

/// Forward stdin lines over a channel; the receiver disconnects on EOF.
fn spawn_stdin_reader() -> Receiver<String> {
    let (input_tx, input_rx) = unbounded::<String>();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if input_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });
    input_rx
}

/// Route one input line: slash command, or message to the active channel.
fn handle_input(
    line: &str,
    state: &mut ClientState,
    action_tx: &crossbeam_channel::Sender<BackendAction>,
) {
    if line.trim().is_empty() {
        return;
    }
    if commands::handle_user_command(line, state, action_tx) {
        return;
    }

    let Some(channel_id) = state.active_buffer else {
        state
            .system_log
            .push("Join a channel first (/join <channel-id>)".into());
        return;
    };

    let text = validation::sanitize_message(line);
    match validation::validate_message(&text) {
        Ok(()) => {
            let _ = action_tx.send(BackendAction::SendMessage { channel_id, text });
        }
        Err(e) => state.system_log.push(e),
    }
}

/// Print system log lines added since the last flush.
fn flush_system_log(state: &ClientState, printed: &mut usize) {
    if *printed > state.system_log.len() {
        *printed = state.system_log.len();
    }
    for line in state.system_log.iter().skip(*printed) {
        println!("* {}", line);
    }
    *printed = state.system_log.len();
}
