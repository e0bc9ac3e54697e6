//! Integration tests driving the real server binary over WebSocket and HTTP.
//!
//! Each test starts its own server process on a dedicated port and speaks
//! the wire protocol directly through tokio-tungstenite, so broadcast
//! content and exclusion rules can be asserted message by message.

use std::process::{Child, Command, Stdio};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

/// Helper struct to manage server process lifecycle
struct TestServer {
    process: Child,
    port: u16,
}

impl TestServer {
    /// Start a test server on the specified port and wait until it accepts
    /// connections.
    async fn start(port: u16) -> Self {
        let process = Command::new("cargo")
            .args([
                "run",
                "-p",
                "mitsumori-server",
                "--bin",
                "mitsumori-server",
                "--",
                "--port",
                &port.to_string(),
            ])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("Failed to start server");

        // The first test run compiles the binary under the shared cargo
        // lock, so readiness polling has to be generous
        let deadline = tokio::time::Instant::now() + Duration::from_secs(300);
        loop {
            if tokio::net::TcpStream::connect(("127.0.0.1", port)).await.is_ok() {
                break;
            }
            if tokio::time::Instant::now() > deadline {
                panic!("Server on port {} did not start in time", port);
            }
            tokio::time::sleep(Duration::from_millis(200)).await;
        }

        TestServer { process, port }
    }

    /// Get the WebSocket URL for this server
    fn ws_url(&self) -> String {
        format!("ws://127.0.0.1:{}/ws", self.port)
    }

    /// Get an HTTP URL for this server
    fn http_url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Kill the server process when the test ends
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}

type Ws = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connect a raw protocol client and join the given room.
async fn join_room(server: &TestServer, room_id: &str, client_id: &str) -> Ws {
    let (mut ws, _) = connect_async(&server.ws_url())
        .await
        .expect("Failed to connect");
    send(
        &mut ws,
        json!({"type": "join", "roomId": room_id, "clientId": client_id}),
    )
    .await;
    ws
}

async fn send(ws: &mut Ws, message: Value) {
    ws.send(Message::Text(message.to_string().into()))
        .await
        .expect("Failed to send");
}

/// Receive the next JSON text frame within a timeout.
async fn recv(ws: &mut Ws) -> Value {
    let deadline = Duration::from_secs(10);
    loop {
        let message = tokio::time::timeout(deadline, ws.next())
            .await
            .expect("Timed out waiting for a message")
            .expect("Connection closed")
            .expect("WebSocket error");
        if let Message::Text(text) = message {
            return serde_json::from_str(&text).expect("Message is not JSON");
        }
        // Skip pings and other control frames
    }
}

/// Assert that no text frame arrives within a short window.
async fn assert_silent(ws: &mut Ws) {
    let result = tokio::time::timeout(Duration::from_millis(500), ws.next()).await;
    assert!(
        result.is_err(),
        "Expected no message, got: {:?}",
        result.unwrap()
    );
}

fn participant_payload(id: &str, name: &str, client_id: &str) -> Value {
    json!({
        "type": "addParticipant",
        "participant": {"id": id, "name": name, "clientId": client_id}
    })
}

#[tokio::test]
async fn test_join_receives_empty_room_state_snapshot() {
    // テスト項目: join した接続に空の roomState スナップショットが返される
    // given (前提条件):
    let server = TestServer::start(18090).await;

    // when (操作):
    let mut ws = join_room(&server, "sprint-1", "client-a").await;

    // then (期待する結果):
    let message = recv(&mut ws).await;
    assert_eq!(message["type"], "roomState");
    assert_eq!(message["room"]["participants"], json!([]));
    assert_eq!(message["room"]["task"], "");
    assert_eq!(message["room"]["votesRevealed"], false);
}

#[tokio::test]
async fn test_add_participant_echoes_to_sender_and_broadcasts() {
    // テスト項目: participantAdded が送信者にもエコーされ、他の購読者にも届く
    // given (前提条件):
    let server = TestServer::start(18091).await;
    let mut alice = join_room(&server, "sprint-1", "client-a").await;
    let mut bob = join_room(&server, "sprint-1", "client-b").await;
    recv(&mut alice).await; // roomState
    recv(&mut bob).await; // roomState

    // when (操作):
    send(&mut alice, participant_payload("p1", "alice", "client-a")).await;

    // then (期待する結果): 両方の接続が同じ participantAdded を受け取り、
    // 参加者は未投票状態で作成されている
    for ws in [&mut alice, &mut bob] {
        let message = recv(ws).await;
        assert_eq!(message["type"], "participantAdded");
        assert_eq!(message["participant"]["id"], "p1");
        assert_eq!(message["participant"]["name"], "alice");
        assert_eq!(message["participant"]["vote"], Value::Null);
        assert_eq!(message["participant"]["hasVoted"], false);
    }
}

#[tokio::test]
async fn test_vote_is_broadcast_to_all_subscribers() {
    // テスト項目: voteUpdated が送信者を含む全購読者に届く
    // given (前提条件):
    let server = TestServer::start(18092).await;
    let mut alice = join_room(&server, "sprint-1", "client-a").await;
    let mut bob = join_room(&server, "sprint-1", "client-b").await;
    recv(&mut alice).await;
    recv(&mut bob).await;
    send(&mut alice, participant_payload("p1", "alice", "client-a")).await;
    recv(&mut alice).await; // participantAdded echo
    recv(&mut bob).await;

    // when (操作):
    send(
        &mut alice,
        json!({"type": "vote", "participantId": "p1", "vote": "5"}),
    )
    .await;

    // then (期待する結果):
    for ws in [&mut alice, &mut bob] {
        let message = recv(ws).await;
        assert_eq!(message["type"], "voteUpdated");
        assert_eq!(message["participantId"], "p1");
        assert_eq!(message["vote"], "5");
        assert_eq!(message["hasVoted"], true);
    }
}

#[tokio::test]
async fn test_vote_for_unknown_participant_is_silently_ignored() {
    // テスト項目: 存在しない参加者への投票がブロードキャストされない
    // given (前提条件):
    let server = TestServer::start(18093).await;
    let mut alice = join_room(&server, "sprint-1", "client-a").await;
    let mut bob = join_room(&server, "sprint-1", "client-b").await;
    recv(&mut alice).await;
    recv(&mut bob).await;

    // when (操作):
    send(
        &mut alice,
        json!({"type": "vote", "participantId": "ghost", "vote": "5"}),
    )
    .await;

    // then (期待する結果): どちらにも何も届かない
    assert_silent(&mut alice).await;
    assert_silent(&mut bob).await;
}

#[tokio::test]
async fn test_task_update_is_not_echoed_to_sender() {
    // テスト項目: taskUpdated が送信者以外にのみ届く
    // given (前提条件):
    let server = TestServer::start(18094).await;
    let mut alice = join_room(&server, "sprint-1", "client-a").await;
    let mut bob = join_room(&server, "sprint-1", "client-b").await;
    recv(&mut alice).await;
    recv(&mut bob).await;

    // when (操作):
    send(
        &mut alice,
        json!({"type": "updateTask", "task": "estimate the login flow"}),
    )
    .await;

    // then (期待する結果):
    let message = recv(&mut bob).await;
    assert_eq!(message["type"], "taskUpdated");
    assert_eq!(message["task"], "estimate the login flow");
    assert_silent(&mut alice).await;
}

#[tokio::test]
async fn test_reveal_and_reset_follow_their_exclusion_rules() {
    // テスト項目: votesRevealed は送信者に届かず、votesReset は全員に届く
    // given (前提条件):
    let server = TestServer::start(18095).await;
    let mut alice = join_room(&server, "sprint-1", "client-a").await;
    let mut bob = join_room(&server, "sprint-1", "client-b").await;
    recv(&mut alice).await;
    recv(&mut bob).await;

    // when (操作): alice が公開してからリセット
    send(&mut alice, json!({"type": "revealVotes", "revealed": true})).await;
    let revealed = recv(&mut bob).await;
    send(&mut alice, json!({"type": "resetVotes"})).await;

    // then (期待する結果):
    assert_eq!(revealed["type"], "votesRevealed");
    assert_eq!(revealed["revealed"], true);

    // votesReset は送信者にも届く（全員が同一に適用する破壊的リセット）
    let reset_alice = recv(&mut alice).await;
    let reset_bob = recv(&mut bob).await;
    assert_eq!(reset_alice["type"], "votesReset");
    assert_eq!(reset_bob["type"], "votesReset");
}

#[tokio::test]
async fn test_disconnect_removes_owned_participants_and_empty_room() {
    // テスト項目: 切断で所有参加者が削除されて participantRemoved が流れ、
    //             最後の購読者が抜けた Room は破棄される
    // given (前提条件):
    let server = TestServer::start(18096).await;
    let mut alice = join_room(&server, "sprint-1", "client-a").await;
    let mut bob = join_room(&server, "sprint-1", "client-b").await;
    recv(&mut alice).await;
    recv(&mut bob).await;
    send(&mut alice, participant_payload("p1", "alice", "client-a")).await;
    recv(&mut alice).await;
    recv(&mut bob).await;

    // when (操作): alice の接続を閉じる
    alice.close(None).await.expect("Failed to close");

    // then (期待する結果): bob に participantRemoved が届く
    let message = recv(&mut bob).await;
    assert_eq!(message["type"], "participantRemoved");
    assert_eq!(message["participantId"], "p1");

    // bob も切断すると Room が破棄され、再 join で空の Room が返る
    bob.close(None).await.expect("Failed to close");
    tokio::time::sleep(Duration::from_millis(300)).await;

    let mut charlie = join_room(&server, "sprint-1", "client-c").await;
    let snapshot = recv(&mut charlie).await;
    assert_eq!(snapshot["type"], "roomState");
    assert_eq!(snapshot["room"]["participants"], json!([]));
}

#[tokio::test]
async fn test_malformed_and_unknown_messages_leave_connection_open() {
    // テスト項目: 不正な JSON や未知のイベントを受けても接続が生き続ける
    // given (前提条件):
    let server = TestServer::start(18097).await;
    let (mut ws, _) = connect_async(&server.ws_url())
        .await
        .expect("Failed to connect");

    // when (操作): join 前の不正メッセージ・未知イベント・join 前の投票
    ws.send(Message::Text("this is not json".to_string().into()))
        .await
        .expect("Failed to send");
    send(&mut ws, json!({"type": "timeTravel", "to": "1970"})).await;
    send(
        &mut ws,
        json!({"type": "vote", "participantId": "p1", "vote": "5"}),
    )
    .await;
    send(
        &mut ws,
        json!({"type": "join", "roomId": "sprint-1", "clientId": "client-a"}),
    )
    .await;

    // then (期待する結果): 接続は開いたままで、join は通常通り処理される
    let message = recv(&mut ws).await;
    assert_eq!(message["type"], "roomState");
}

#[tokio::test]
async fn test_events_do_not_leak_across_rooms() {
    // テスト項目: ある Room のイベントが他の Room の購読者に届かない
    // given (前提条件):
    let server = TestServer::start(18098).await;
    let mut alice = join_room(&server, "room-a", "client-a").await;
    let mut bob = join_room(&server, "room-b", "client-b").await;
    recv(&mut alice).await;
    recv(&mut bob).await;

    // when (操作):
    send(&mut alice, participant_payload("p1", "alice", "client-a")).await;

    // then (期待する結果):
    let message = recv(&mut alice).await;
    assert_eq!(message["type"], "participantAdded");
    assert_silent(&mut bob).await;
}

#[tokio::test]
async fn test_http_health_and_room_summary_endpoints() {
    // テスト項目: ヘルスチェックが Room 数を報告し、Room サマリが
    //             現在の状態を返す
    // given (前提条件):
    let server = TestServer::start(18099).await;
    let client = reqwest::Client::new();

    // Room が 1 つもない状態
    let health: Value = client
        .get(server.http_url("/api/health"))
        .send()
        .await
        .expect("Failed to get health")
        .json()
        .await
        .expect("Health is not JSON");
    assert_eq!(health["status"], "ok");
    assert_eq!(health["rooms"], 0);

    // when (操作): Room を作って参加者とタスクを入れる
    let mut alice = join_room(&server, "sprint-1", "client-a").await;
    recv(&mut alice).await;
    send(&mut alice, participant_payload("p1", "alice", "client-a")).await;
    recv(&mut alice).await;
    send(&mut alice, json!({"type": "updateTask", "task": "API design"})).await;
    tokio::time::sleep(Duration::from_millis(300)).await;

    // then (期待する結果):
    let health: Value = client
        .get(server.http_url("/api/health"))
        .send()
        .await
        .expect("Failed to get health")
        .json()
        .await
        .expect("Health is not JSON");
    assert_eq!(health["rooms"], 1);

    let summary: Value = client
        .get(server.http_url("/api/rooms/sprint-1"))
        .send()
        .await
        .expect("Failed to get room summary")
        .json()
        .await
        .expect("Summary is not JSON");
    assert_eq!(summary["id"], "sprint-1");
    assert_eq!(summary["participantCount"], 1);
    assert_eq!(summary["task"], "API design");
    assert_eq!(summary["votesRevealed"], false);

    let missing = client
        .get(server.http_url("/api/rooms/ghost"))
        .send()
        .await
        .expect("Failed to get room summary");
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rejoin_resynchronizes_through_fresh_snapshot() {
    // テスト項目: 再接続後の join で最新状態のスナップショットが返され、
    //             切断中のイベントが再同期される
    // given (前提条件):
    let server = TestServer::start(18100).await;
    let mut alice = join_room(&server, "sprint-1", "client-a").await;
    let mut bob = join_room(&server, "sprint-1", "client-b").await;
    recv(&mut alice).await;
    recv(&mut bob).await;
    send(&mut bob, participant_payload("p2", "bob", "client-b")).await;
    recv(&mut alice).await;
    recv(&mut bob).await;

    // when (操作): alice が切断し、その間に bob がタスクを変えて投票する
    alice.close(None).await.expect("Failed to close");
    send(&mut bob, json!({"type": "updateTask", "task": "moved on"})).await;
    send(
        &mut bob,
        json!({"type": "vote", "participantId": "p2", "vote": "8"}),
    )
    .await;
    recv(&mut bob).await; // voteUpdated echo
    tokio::time::sleep(Duration::from_millis(300)).await;

    // alice が同じ識別子で再接続する
    let mut alice = join_room(&server, "sprint-1", "client-a").await;

    // then (期待する結果): スナップショットに切断中の変更が全て含まれる
    let snapshot = recv(&mut alice).await;
    assert_eq!(snapshot["type"], "roomState");
    assert_eq!(snapshot["room"]["task"], "moved on");
    let participants = snapshot["room"]["participants"].as_array().unwrap();
    assert_eq!(participants.len(), 1);
    assert_eq!(participants[0]["id"], "p2");
    assert_eq!(participants[0]["vote"], "8");
    assert_eq!(participants[0]["hasVoted"], true);
}
