//! Client execution logic with reconnection support.
//!
//! The runner owns everything that must survive a reconnect: the durable
//! client identity, the participant id, the readline thread, and the
//! backoff state. Each successful connection resets the backoff; each
//! failure consumes one attempt, and exhausting them is terminal.

use std::path::Path;
use std::time::Duration;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{
    backoff::ReconnectBackoff,
    error::ClientError,
    identity::load_or_create_identity,
    session::{connect_session, run_session},
};

const RECONNECT_BASE_DELAY: Duration = Duration::from_secs(1);
const RECONNECT_MAX_DELAY: Duration = Duration::from_secs(10);
const MAX_RECONNECT_ATTEMPTS: u32 = 5;

/// Run the planning poker client with reconnection logic.
pub async fn run_client(
    url: String,
    room_id: String,
    name: String,
    identity_file: &Path,
) -> Result<(), ClientError> {
    // Durable identity: survives reconnects and restarts, and lets the
    // server recognize which participant entries are ours
    let client_id = load_or_create_identity(identity_file)?;

    // Stable within one run so a reconnect re-registers the same entry
    let participant_id = format!("participant-{}", Uuid::new_v4());

    // The readline thread and its channel outlive individual sessions
    let (input_tx, mut input_rx) = mpsc::unbounded_channel();
    spawn_readline_thread(name.clone(), input_tx);

    println!(
        "\nYou are '{}'. Type /help for commands, Ctrl+C to exit.\n",
        name
    );

    let mut backoff = ReconnectBackoff::new(
        RECONNECT_BASE_DELAY,
        RECONNECT_MAX_DELAY,
        MAX_RECONNECT_ATTEMPTS,
    );

    loop {
        tracing::info!("Connecting to {} as '{}' (room '{}')", url, name, room_id);

        let session_result = match connect_session(&url, &room_id, &client_id).await {
            Ok((write, read)) => {
                // Connected: the schedule starts over on the next failure
                backoff.reset();
                run_session(write, read, &client_id, &name, &participant_id, &mut input_rx).await
            }
            Err(e) => Err(e),
        };

        match session_result {
            Ok(_) => {
                tracing::info!("Client session ended normally");
                break;
            }
            Err(e) => {
                tracing::warn!("Connection lost: {}", e);

                let Some(delay) = backoff.next_delay() else {
                    tracing::error!(
                        "Failed to reconnect after {} attempts. Exiting.",
                        backoff.max_attempts()
                    );
                    return Err(ClientError::ReconnectExhausted(backoff.max_attempts()));
                };

                tracing::info!(
                    "Reconnecting in {}s... (attempt {}/{})",
                    delay.as_secs(),
                    backoff.attempt(),
                    backoff.max_attempts()
                );
                tokio::time::sleep(delay).await;
            }
        }
    }

    Ok(())
}

/// Spawn a blocking thread for rustyline (synchronous readline).
fn spawn_readline_thread(name: String, input_tx: mpsc::UnboundedSender<String>) {
    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", name);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });
}
