use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use memory_pairs::adapter::protocol::create_hello;
use memory_pairs::adapter::server::{run_server, ServerConfig};
use memory_pairs::adapter::{Dispatcher, InboundCommand, OutboundMessage};
use memory_pairs::core::{GameConfig, GameSession, GameStateStore, Identity, MemorySlot};
use memory_pairs::types::GridSize;

type Lines = tokio::io::Lines<BufReader<OwnedReadHalf>>;

async fn read_json(lines: &mut Lines) -> serde_json::Value {
    let line = tokio::time::timeout(Duration::from_secs(5), lines.next_line())
        .await
        .expect("timeout waiting for line")
        .expect("io error")
        .expect("expected line");
    serde_json::from_str(&line).unwrap()
}

/// Read lines until one satisfies `pred`, returning everything read.
async fn read_until(
    lines: &mut Lines,
    pred: impl Fn(&serde_json::Value) -> bool,
) -> Vec<serde_json::Value> {
    let mut seen = Vec::new();
    loop {
        let v = read_json(lines).await;
        let done = pred(&v);
        seen.push(v);
        if done {
            return seen;
        }
    }
}

async fn write_json(write_half: &mut OwnedWriteHalf, value: &serde_json::Value) {
    write_half
        .write_all(serde_json::to_string(value).unwrap().as_bytes())
        .await
        .unwrap();
    write_half.write_all(b"\n").await.unwrap();
    write_half.flush().await.unwrap();
}

fn select(seq: u64, card_id: u32) -> serde_json::Value {
    serde_json::json!({"type": "command", "seq": seq, "ts": 1, "action": "select", "card_id": card_id})
}

/// Game loop driven by inbound commands and a 16ms ticker, on a 2x2 unshuffled board.
async fn engine_loop(
    mut cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
) {
    let mut session = GameSession::new(GameConfig::default());
    session
        .new_game_with(GridSize::new(2, 2), &mut Identity)
        .unwrap();
    let mut store = GameStateStore::new(MemorySlot::new());
    let mut dispatcher = Dispatcher::new();
    let mut ticker = tokio::time::interval(Duration::from_millis(16));

    loop {
        tokio::select! {
            inbound = cmd_rx.recv() => {
                let Some(inbound) = inbound else { return };
                for msg in dispatcher.handle(&mut session, &mut store, inbound) {
                    let _ = out_tx.send(msg);
                }
            }
            _ = ticker.tick() => session.tick(16),
        }
        for msg in dispatcher.flush_events(&mut session) {
            let _ = out_tx.send(msg);
        }
    }
}

struct Harness {
    addr: SocketAddr,
    server: JoinHandle<()>,
    engine: JoinHandle<()>,
}

impl Harness {
    async fn start(max_pending_commands: usize) -> Self {
        let config = ServerConfig {
            port: 0,
            max_pending_commands,
            ..ServerConfig::default()
        };

        let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(max_pending_commands);
        let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
        let (ready_tx, ready_rx) = oneshot::channel();

        let server = tokio::spawn(async move {
            let _ = run_server(config, cmd_tx, out_rx, Some(ready_tx)).await;
        });
        let engine = tokio::spawn(engine_loop(cmd_rx, out_tx));

        let addr = tokio::time::timeout(Duration::from_secs(2), ready_rx)
            .await
            .expect("server did not signal ready")
            .expect("ready channel dropped");

        Self {
            addr,
            server,
            engine,
        }
    }

    async fn connect(&self) -> (Lines, OwnedWriteHalf) {
        let stream = TcpStream::connect(self.addr).await.expect("connect failed");
        let (read_half, write_half) = stream.into_split();
        (BufReader::new(read_half).lines(), write_half)
    }

    /// Connect and complete the handshake, returning the welcome message.
    async fn join(&self, name: &str, stream_events: bool) -> (Lines, OwnedWriteHalf, serde_json::Value) {
        let (mut lines, mut write_half) = self.connect().await;
        let mut hello = create_hello(1, name, "1.0.0");
        hello.requested.stream_events = stream_events;
        write_json(&mut write_half, &serde_json::to_value(&hello).unwrap()).await;

        let welcome = read_json(&mut lines).await;
        assert_eq!(welcome["type"], "welcome");
        if stream_events {
            let obs = read_json(&mut lines).await;
            assert_eq!(obs["type"], "observation");
        }
        (lines, write_half, welcome)
    }

    fn stop(self) {
        self.server.abort();
        self.engine.abort();
    }
}

#[tokio::test]
async fn hello_select_match_streams_events() {
    let harness = Harness::start(16).await;
    let (mut lines, mut write_half) = harness.connect().await;

    let hello = create_hello(1, "e2e-test", "1.0.0");
    write_json(&mut write_half, &serde_json::to_value(&hello).unwrap()).await;

    let welcome = read_json(&mut lines).await;
    assert_eq!(welcome["type"], "welcome");
    assert_eq!(welcome["seq"], 1);
    assert_eq!(welcome["role"], "controller");
    assert_eq!(welcome["protocol_version"], "1.0.0");

    let obs = read_json(&mut lines).await;
    assert_eq!(obs["type"], "observation");
    assert_eq!(obs["cards"].as_array().unwrap().len(), 4);
    assert_eq!(obs["phase"], "idle");

    write_json(&mut write_half, &select(2, 0)).await;
    let seen = read_until(&mut lines, |v| v["event"]["kind"] == "cardRevealed").await;
    let ack = seen.iter().find(|v| v["type"] == "ack").unwrap();
    assert_eq!(ack["seq"], 2);
    assert_eq!(ack["status"], "ok");

    write_json(&mut write_half, &select(3, 1)).await;
    let seen = read_until(&mut lines, |v| v["event"]["kind"] == "matchFound").await;
    let kinds: Vec<_> = seen
        .iter()
        .filter(|v| v["type"] == "event")
        .map(|v| v["event"]["kind"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        kinds,
        vec!["cardRevealed", "moveRegistered", "cardMatched", "cardMatched", "matchFound"]
    );
    let found = seen.last().unwrap();
    assert_eq!(found["episode_id"], 1);
    assert_eq!(found["event"]["pair_key"], 0);
    assert_eq!(found["event"]["score"], 100);
    assert_eq!(found["event"]["combo"], 1);

    // Matched cards are no longer selectable.
    write_json(&mut write_half, &select(4, 0)).await;
    let ack = read_until(&mut lines, |v| v["type"] == "ack").await.pop().unwrap();
    assert_eq!(ack["status"], "ignored");

    harness.stop();
}

#[tokio::test]
async fn command_before_hello_requires_handshake() {
    let harness = Harness::start(16).await;
    let (mut lines, mut write_half) = harness.connect().await;

    write_json(&mut write_half, &select(1, 0)).await;
    let err = read_json(&mut lines).await;
    assert_eq!(err["type"], "error");
    assert_eq!(err["code"], "handshake_required");

    harness.stop();
}

#[tokio::test]
async fn protocol_mismatch_closes_connection() {
    let harness = Harness::start(16).await;
    let (mut lines, mut write_half) = harness.connect().await;

    let hello = create_hello(1, "old-client", "2.0.0");
    write_json(&mut write_half, &serde_json::to_value(&hello).unwrap()).await;

    let err = read_json(&mut lines).await;
    assert_eq!(err["code"], "protocol_mismatch");
    let next = tokio::time::timeout(Duration::from_secs(2), lines.next_line())
        .await
        .expect("timeout waiting for close")
        .expect("io error");
    assert!(next.is_none());

    harness.stop();
}

#[tokio::test]
async fn seq_must_increase_and_garbage_is_reported() {
    let harness = Harness::start(16).await;
    let (mut lines, mut write_half, _) = harness.join("seq-test", false).await;

    write_json(&mut write_half, &select(1, 0)).await;
    let err = read_json(&mut lines).await;
    assert_eq!(err["code"], "invalid_command");
    assert_eq!(err["seq"], 1);

    write_half.write_all(b"{\"seq\":7, not json\n").await.unwrap();
    write_half.flush().await.unwrap();
    let err = read_json(&mut lines).await;
    assert_eq!(err["code"], "invalid_command");
    assert_eq!(err["seq"], 7);

    let missing_card = serde_json::json!({"type": "command", "seq": 2, "ts": 1, "action": "select"});
    write_json(&mut write_half, &missing_card).await;
    let err = read_json(&mut lines).await;
    assert_eq!(err["code"], "invalid_command");

    harness.stop();
}

#[tokio::test]
async fn observer_is_gated_until_controller_leaves() {
    let harness = Harness::start(16).await;
    let (controller_lines, controller_write, welcome) = harness.join("first", false).await;
    assert_eq!(welcome["role"], "controller");

    let (mut lines, mut write_half, welcome) = harness.join("second", false).await;
    assert_eq!(welcome["role"], "observer");

    write_json(&mut write_half, &select(2, 0)).await;
    let err = read_json(&mut lines).await;
    assert_eq!(err["code"], "not_controller");

    let claim = serde_json::json!({"type": "control", "seq": 3, "ts": 1, "action": "claim"});
    write_json(&mut write_half, &claim).await;
    let err = read_json(&mut lines).await;
    assert_eq!(err["code"], "controller_active");

    let release = serde_json::json!({"type": "control", "seq": 4, "ts": 1, "action": "release"});
    write_json(&mut write_half, &release).await;
    let err = read_json(&mut lines).await;
    assert_eq!(err["code"], "not_controller_release");

    drop(controller_write);
    drop(controller_lines);

    // Promotion happens once the server notices the disconnect.
    let mut seq = 5;
    let ack = loop {
        write_json(&mut write_half, &select(seq, 0)).await;
        let reply = read_until(&mut lines, |v| v["type"] == "ack" || v["type"] == "error")
            .await
            .pop()
            .unwrap();
        if reply["type"] == "ack" {
            break reply;
        }
        assert_eq!(reply["code"], "not_controller");
        assert!(seq < 50, "observer was never promoted");
        seq += 1;
        tokio::time::sleep(Duration::from_millis(20)).await;
    };
    assert_eq!(ack["status"], "ok");

    harness.stop();
}

#[tokio::test]
async fn full_queue_reports_backpressure() {
    let (cmd_tx, _cmd_rx) = mpsc::channel::<InboundCommand>(1);
    let (_out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
    let (ready_tx, ready_rx) = oneshot::channel();
    let config = ServerConfig {
        port: 0,
        max_pending_commands: 1,
        ..ServerConfig::default()
    };
    // Nobody drains the command queue.
    let server = tokio::spawn(async move {
        let _ = run_server(config, cmd_tx, out_rx, Some(ready_tx)).await;
    });
    let addr = ready_rx.await.unwrap();

    let stream = TcpStream::connect(addr).await.unwrap();
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    let mut hello = create_hello(1, "flood", "1.0.0");
    hello.requested.stream_events = false;
    write_json(&mut write_half, &serde_json::to_value(&hello).unwrap()).await;
    assert_eq!(read_json(&mut lines).await["type"], "welcome");

    write_json(&mut write_half, &select(2, 0)).await;
    write_json(&mut write_half, &select(3, 1)).await;
    let err = read_json(&mut lines).await;
    assert_eq!(err["code"], "backpressure");
    assert_eq!(err["seq"], 3);

    server.abort();
}
