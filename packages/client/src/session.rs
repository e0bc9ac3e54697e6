//! WebSocket client session management.
//!
//! A session is one connection's lifetime: connect, join the room, then a
//! single cooperative loop that applies server events to the local mirror
//! and turns input lines into protocol messages. Reconnection is the
//! runner's concern; any transport failure simply ends the session with an
//! error.

use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

use mitsumori_server::infrastructure::dto::websocket::{
    ClientMessage, ParticipantDto, ServerMessage,
};
use mitsumori_shared::cards::is_deck_card;

use crate::{
    error::ClientError, formatter::MessageFormatter, mirror::RoomMirror, results::compute_results,
    ui::redisplay_prompt,
};

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
type WsSource = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Connect to the server and join the room with our durable identity.
///
/// The server replies with a full `roomState` snapshot, which the session
/// loop applies as its first event.
pub async fn connect_session(
    url: &str,
    room_id: &str,
    client_id: &str,
) -> Result<(WsSink, WsSource), ClientError> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    tracing::info!("Connected to {}", url);

    let (mut write, read) = ws_stream.split();

    let join = ClientMessage::Join {
        room_id: room_id.to_string(),
        client_id: client_id.to_string(),
    };
    send_message(&mut write, &join).await?;

    Ok((write, read))
}

/// Run the session loop until the connection drops or the user quits.
///
/// Returns `Ok(())` only for a deliberate exit (quit command or closed
/// input); every transport-level end is an error so the runner can decide
/// whether to reconnect.
pub async fn run_session(
    mut write: WsSink,
    mut read: WsSource,
    client_id: &str,
    name: &str,
    participant_id: &str,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let mut mirror = RoomMirror::new(client_id.to_string());

    loop {
        tokio::select! {
            message = read.next() => {
                let Some(message) = message else {
                    return Err(ClientError::ConnectionError(
                        "connection closed".to_string(),
                    ));
                };
                match message {
                    Ok(Message::Text(text)) => {
                        handle_server_message(&mut write, &mut mirror, name, participant_id, &text)
                            .await?;
                    }
                    Ok(Message::Close(_)) => {
                        tracing::info!("Server closed the connection");
                        return Err(ClientError::ConnectionError(
                            "server closed the connection".to_string(),
                        ));
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!("WebSocket read error: {}", e);
                        return Err(ClientError::ConnectionError(e.to_string()));
                    }
                }
            }
            line = input_rx.recv() => {
                let Some(line) = line else {
                    // Readline thread ended (Ctrl+C / Ctrl+D)
                    tracing::info!("Input closed, ending session");
                    return Ok(());
                };
                if !handle_input_line(&mut write, &mut mirror, name, &line).await? {
                    return Ok(());
                }
            }
        }
    }
}

/// Apply one server-pushed event and print the matching notification.
async fn handle_server_message(
    write: &mut WsSink,
    mirror: &mut RoomMirror,
    name: &str,
    participant_id: &str,
    text: &str,
) -> Result<(), ClientError> {
    let message = match serde_json::from_str::<ServerMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!("Failed to parse server message: {}", e);
            print!("{}", MessageFormatter::format_raw_message(text));
            redisplay_prompt(name);
            return Ok(());
        }
    };

    // The removed participant's name is gone from the mirror after apply
    let removed_name = match &message {
        ServerMessage::ParticipantRemoved { participant_id } => mirror
            .find_participant(participant_id)
            .map(|p| p.name.clone()),
        _ => None,
    };

    mirror.apply(&message);

    match &message {
        ServerMessage::RoomState { .. } => {
            print!("{}", MessageFormatter::format_room(mirror));
            redisplay_prompt(name);
            // Self-healing: the server drops our participant when the old
            // connection dies, so re-register after any snapshot that does
            // not contain us.
            if mirror.my_participant().is_none() {
                register_self(write, mirror, name, participant_id).await?;
            }
        }
        ServerMessage::ParticipantAdded { participant } => {
            let is_me = participant.client_id == mirror.client_id();
            print!(
                "{}",
                MessageFormatter::format_participant_added(participant, is_me)
            );
            redisplay_prompt(name);
        }
        ServerMessage::ParticipantRemoved { .. } => {
            if let Some(removed_name) = removed_name {
                print!("{}", MessageFormatter::format_participant_removed(&removed_name));
                redisplay_prompt(name);
            }
        }
        ServerMessage::VoteUpdated { participant_id, vote, .. } => {
            if let Some(participant) = mirror.find_participant(participant_id) {
                print!(
                    "{}",
                    MessageFormatter::format_vote_updated(
                        &participant.name,
                        vote,
                        mirror.votes_revealed
                    )
                );
                redisplay_prompt(name);
            }
        }
        ServerMessage::TaskUpdated { task } => {
            print!("{}", MessageFormatter::format_task_updated(task));
            redisplay_prompt(name);
        }
        ServerMessage::VotesRevealed { revealed } => {
            print!("{}", MessageFormatter::format_votes_revealed(*revealed));
            if *revealed {
                print!(
                    "{}",
                    MessageFormatter::format_results(&compute_results(&mirror.participants))
                );
            }
            redisplay_prompt(name);
        }
        ServerMessage::VotesReset => {
            print!("{}", MessageFormatter::format_votes_reset());
            redisplay_prompt(name);
        }
        ServerMessage::Unrecognized => {
            tracing::debug!("Ignoring unrecognized server message");
        }
    }

    Ok(())
}

/// Turn one input line into a protocol message or a local command.
///
/// Returns `Ok(false)` when the user asked to quit.
async fn handle_input_line(
    write: &mut WsSink,
    mirror: &mut RoomMirror,
    name: &str,
    line: &str,
) -> Result<bool, ClientError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(true);
    }

    match Command::parse(line) {
        Command::Vote(value) => {
            let Some(participant_id) = mirror.my_participant_id.clone() else {
                println!("Not at the table yet; wait for the join to complete.");
                redisplay_prompt(name);
                return Ok(true);
            };
            send_message(
                write,
                &ClientMessage::Vote {
                    participant_id,
                    vote: value,
                },
            )
            .await?;
        }
        Command::Task(task) => {
            // The server does not echo taskUpdated back to the sender;
            // the local mirror is updated here instead
            mirror.task = task.clone();
            send_message(write, &ClientMessage::UpdateTask { task }).await?;
        }
        Command::Reveal(revealed) => {
            // votesRevealed is not echoed back to the sender either
            mirror.votes_revealed = revealed;
            send_message(write, &ClientMessage::RevealVotes { revealed }).await?;
            if revealed {
                print!(
                    "{}",
                    MessageFormatter::format_results(&compute_results(&mirror.participants))
                );
                redisplay_prompt(name);
            }
        }
        Command::Reset => {
            send_message(write, &ClientMessage::ResetVotes).await?;
        }
        Command::Leave => {
            let Some(participant_id) = mirror.my_participant_id.clone() else {
                println!("Not at the table.");
                redisplay_prompt(name);
                return Ok(true);
            };
            send_message(write, &ClientMessage::RemoveParticipant { participant_id }).await?;
        }
        Command::Who => {
            print!("{}", MessageFormatter::format_room(mirror));
            redisplay_prompt(name);
        }
        Command::Results => {
            print!(
                "{}",
                MessageFormatter::format_results(&compute_results(&mirror.participants))
            );
            redisplay_prompt(name);
        }
        Command::Cards => {
            print!("{}", MessageFormatter::format_deck());
            redisplay_prompt(name);
        }
        Command::Help => {
            print!("{}", help_text());
            redisplay_prompt(name);
        }
        Command::Quit => {
            return Ok(false);
        }
        Command::Unknown(input) => {
            println!("Unknown command '{}'. Type /help for commands.", input);
            redisplay_prompt(name);
        }
    }

    Ok(true)
}

/// Send our own participant entry to the server.
async fn register_self(
    write: &mut WsSink,
    mirror: &RoomMirror,
    name: &str,
    participant_id: &str,
) -> Result<(), ClientError> {
    let participant = ParticipantDto {
        id: participant_id.to_string(),
        name: name.to_string(),
        vote: None,
        has_voted: false,
        client_id: mirror.client_id().to_string(),
    };
    send_message(write, &ClientMessage::AddParticipant { participant }).await
}

async fn send_message(write: &mut WsSink, message: &ClientMessage) -> Result<(), ClientError> {
    let json = serde_json::to_string(message).unwrap();
    write
        .send(Message::Text(json.into()))
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))
}

fn help_text() -> String {
    "\nCommands:\n  \
     <card> or /vote <value>  cast your vote\n  \
     /task <text>             set the task being estimated\n  \
     /reveal  /hide           show or mask everyone's votes\n  \
     /reset                   start a new round\n  \
     /who                     show the table\n  \
     /results                 show mean / median / consensus\n  \
     /cards                   show the card deck\n  \
     /leave                   remove yourself from the table\n  \
     /quit                    exit\n"
        .to_string()
}

/// Parsed user command.
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Vote(String),
    Task(String),
    Reveal(bool),
    Reset,
    Leave,
    Who,
    Results,
    Cards,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    fn parse(line: &str) -> Self {
        if !line.starts_with('/') {
            // A bare card value is a vote, anything else is a typo
            if is_deck_card(line) {
                return Command::Vote(line.to_string());
            }
            return Command::Unknown(line.to_string());
        }

        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "/vote" if !rest.is_empty() => Command::Vote(rest.to_string()),
            "/task" => Command::Task(rest.to_string()),
            "/reveal" => Command::Reveal(true),
            "/hide" => Command::Reveal(false),
            "/reset" => Command::Reset,
            "/leave" => Command::Leave,
            "/who" => Command::Who,
            "/results" => Command::Results,
            "/cards" => Command::Cards,
            "/help" => Command::Help,
            "/quit" | "/exit" => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        }
    }
}
