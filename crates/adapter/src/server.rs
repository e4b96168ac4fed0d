//! TCP server for the adapter
//!
//! Handles incoming connections and manages client lifecycle.
//! Uses tokio for async networking.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, RwLock};
use tracing::{debug, info, warn};

use crate::protocol::*;
use crate::runtime::{ClientCommand, InboundCommand, InboundPayload, OutboundMessage};
use crate::types::GridSize;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub protocol_version: String,
    pub max_pending_commands: usize,
    /// Append every wire line (both directions) to this file.
    pub log_path: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
            protocol_version: PROTOCOL_VERSION.to_string(),
            max_pending_commands: 10,
            log_path: None,
        }
    }
}

impl ServerConfig {
    /// Create from `PAIRS_AI_*` environment variables
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();
        let host = env::var("PAIRS_AI_HOST").unwrap_or(defaults.host);
        let port = env::var("PAIRS_AI_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        let max_pending_commands = env::var("PAIRS_AI_MAX_PENDING")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_pending_commands);

        let log_path = env::var("PAIRS_AI_LOG_PATH")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            host,
            port,
            protocol_version: defaults.protocol_version,
            max_pending_commands,
            log_path,
        }
    }

    /// Check if the adapter is disabled via environment
    pub fn is_disabled() -> bool {
        std::env::var("PAIRS_AI_DISABLED")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid socket address {}:{}", self.host, self.port))
    }
}

/// Shared server state
struct ServerState {
    config: ServerConfig,
    clients: RwLock<Vec<ClientHandle>>,
    controller: RwLock<Option<usize>>,
}

impl ServerState {
    fn new(config: ServerConfig) -> Self {
        Self {
            config,
            clients: RwLock::new(Vec::new()),
            controller: RwLock::new(None),
        }
    }

    async fn is_handshaken(&self, client_id: usize) -> bool {
        let clients = self.clients.read().await;
        clients
            .iter()
            .find(|c| c.id == client_id)
            .is_some_and(|c| c.handshaken)
    }

    async fn is_controller(&self, client_id: usize) -> bool {
        *self.controller.read().await == Some(client_id)
    }

    /// Record `seq` if it is strictly greater than the last one seen from this client.
    async fn check_and_update_seq(&self, client_id: usize, seq: u64) -> bool {
        let mut clients = self.clients.write().await;
        let Some(client) = clients.iter_mut().find(|c| c.id == client_id) else {
            return true;
        };

        match client.last_seq {
            Some(prev) if seq <= prev => false,
            _ => {
                client.last_seq = Some(seq);
                true
            }
        }
    }
}

/// Handle to a connected client
struct ClientHandle {
    id: usize,
    stream_events: bool,
    handshaken: bool,
    last_seq: Option<u64>,
    tx: mpsc::UnboundedSender<String>,
}

fn to_line<T: Serialize>(msg: &T) -> Option<String> {
    match serde_json::to_string(msg) {
        Ok(line) => Some(line),
        Err(e) => {
            warn!(error = %e, "failed to encode outbound message");
            None
        }
    }
}

fn send<T: Serialize>(tx: &mpsc::UnboundedSender<String>, msg: &T) {
    if let Some(line) = to_line(msg) {
        let _ = tx.send(line);
    }
}

fn send_error(tx: &mpsc::UnboundedSender<String>, seq: u64, code: ErrorCode, message: &str) {
    send(tx, &create_error(seq, code, message));
}

fn spawn_wire_log(path: String) -> mpsc::UnboundedSender<String> {
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    tokio::spawn(async move {
        use tokio::fs::OpenOptions;

        let mut file = match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
        {
            Ok(f) => f,
            Err(e) => {
                warn!(path = %path, error = %e, "wire log disabled");
                return;
            }
        };

        while let Some(line) = rx.recv().await {
            if file.write_all(line.as_bytes()).await.is_err() || file.write_all(b"\n").await.is_err() {
                break;
            }
        }
        let _ = file.flush().await;
    });
    tx
}

/// Start the TCP server
pub async fn run_server(
    config: ServerConfig,
    command_tx: mpsc::Sender<InboundCommand>,
    mut out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let wire_log_tx = config.log_path.clone().map(spawn_wire_log);

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    let bound = listener.local_addr()?;
    info!(addr = %bound, "adapter listening");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let state = Arc::new(ServerState::new(config));
    let mut client_id_counter = 0usize;

    // Outbound dispatcher.
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                let clients = state.clients.read().await;
                match msg {
                    OutboundMessage::ToClient { client_id, line } => {
                        if let Some(c) = clients.iter().find(|c| c.id == client_id) {
                            let _ = c.tx.send(line);
                        }
                    }
                    OutboundMessage::Broadcast { line } => {
                        for c in clients.iter().filter(|c| c.handshaken && c.stream_events) {
                            let _ = c.tx.send(line.clone());
                        }
                    }
                }
            }
        });
    }

    // Accept incoming connections
    loop {
        let (socket, addr) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;

        info!(client_id, %addr, "client connected");

        let state = Arc::clone(&state);
        let command_tx = command_tx.clone();
        let wire_log_tx = wire_log_tx.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, client_id, &state, command_tx, wire_log_tx).await {
                debug!(client_id, error = %e, "client connection error");
            }
            info!(client_id, "client disconnected");
        });
    }
}

/// Handle a single client connection
async fn handle_client(
    socket: TcpStream,
    client_id: usize,
    state: &ServerState,
    command_tx: mpsc::Sender<InboundCommand>,
    wire_log_tx: Option<mpsc::UnboundedSender<String>>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = tokio::io::split(socket);
    let mut reader = BufReader::new(reader);

    // Channel to send messages to this client
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    {
        let mut clients = state.clients.write().await;
        clients.push(ClientHandle {
            id: client_id,
            stream_events: false,
            handshaken: false,
            last_seq: None,
            tx: tx.clone(),
        });
    }

    let wire_log_tx_out = wire_log_tx.clone();

    // Spawn task to write messages to client
    let write_task = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if writer.write_all(line.as_bytes()).await.is_err()
                || writer.write_all(b"\n").await.is_err()
                || writer.flush().await.is_err()
            {
                break;
            }
            if let Some(log) = wire_log_tx_out.as_ref() {
                let _ = log.send(line);
            }
        }
    });

    let mut line = String::new();
    let result = loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => break Ok(()),
            Ok(_) => {}
            Err(e) => break Err(e.into()),
        }

        let raw_line = line.trim_end_matches(['\n', '\r']);
        let trimmed = raw_line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(log) = wire_log_tx.as_ref() {
            let _ = log.send(raw_line.to_string());
        }

        match parse_message(trimmed) {
            Ok(ParsedMessage::Hello(hello)) => {
                if state.is_handshaken(client_id).await
                    && !state.check_and_update_seq(client_id, hello.seq).await
                {
                    send_error(&tx, hello.seq, ErrorCode::InvalidCommand, "seq must be strictly increasing");
                    continue;
                }

                if !hello.protocol_version.starts_with("1.") {
                    send_error(
                        &tx,
                        hello.seq,
                        ErrorCode::ProtocolMismatch,
                        &format!("Protocol version {} not supported", hello.protocol_version),
                    );
                    break Ok(());
                }

                // First client to hello becomes controller.
                let (role, controller_id) = {
                    let mut controller = state.controller.write().await;
                    let mut clients = state.clients.write().await;
                    if let Some(client) = clients.iter_mut().find(|c| c.id == client_id) {
                        client.handshaken = true;
                        client.last_seq = Some(hello.seq);
                        client.stream_events = hello.requested.stream_events;
                    }
                    if controller.is_none() {
                        *controller = Some(client_id);
                        info!(client_id, client = %hello.client.name, "client is now controller");
                    }
                    let role = if *controller == Some(client_id) {
                        AssignedRole::Controller
                    } else {
                        AssignedRole::Observer
                    };
                    (role, (*controller).map(|id| id as u64))
                };

                let welcome = create_welcome(
                    hello.seq,
                    &state.config.protocol_version,
                    client_id as u64,
                    role,
                    controller_id,
                );
                send(&tx, &welcome);

                if hello.requested.stream_events {
                    let _ = command_tx.try_send(InboundCommand {
                        client_id,
                        seq: hello.seq,
                        payload: InboundPayload::ObservationRequest,
                    });
                }
            }

            Ok(ParsedMessage::Command(cmd)) => {
                if !state.is_handshaken(client_id).await {
                    send_error(&tx, cmd.seq, ErrorCode::HandshakeRequired, "Send hello before command");
                    continue;
                }
                if !state.check_and_update_seq(client_id, cmd.seq).await {
                    send_error(&tx, cmd.seq, ErrorCode::InvalidCommand, "seq must be strictly increasing");
                    continue;
                }
                if !state.is_controller(client_id).await {
                    send_error(&tx, cmd.seq, ErrorCode::NotController, "Only controller may send commands");
                    continue;
                }

                let mapped = match map_command(&cmd) {
                    Ok(c) => c,
                    Err((code, message)) => {
                        send_error(&tx, cmd.seq, code, &message);
                        continue;
                    }
                };

                // Backpressure: bounded queue. The ack is sent by the game loop.
                let inbound = InboundCommand {
                    client_id,
                    seq: cmd.seq,
                    payload: InboundPayload::Command(mapped),
                };
                if command_tx.try_send(inbound).is_err() {
                    send_error(&tx, cmd.seq, ErrorCode::Backpressure, "Command queue is full");
                }
            }

            Ok(ParsedMessage::Control(ctrl)) => {
                if !state.is_handshaken(client_id).await {
                    send_error(&tx, ctrl.seq, ErrorCode::HandshakeRequired, "Send hello before control");
                    continue;
                }
                if !state.check_and_update_seq(client_id, ctrl.seq).await {
                    send_error(&tx, ctrl.seq, ErrorCode::InvalidCommand, "seq must be strictly increasing");
                    continue;
                }

                let mut controller = state.controller.write().await;
                match ctrl.action {
                    ControlAction::Claim => {
                        if controller.is_none() || *controller == Some(client_id) {
                            *controller = Some(client_id);
                            info!(client_id, "controller claimed");
                            send(&tx, &create_ack(ctrl.seq, AckStatus::Ok));
                        } else {
                            send_error(&tx, ctrl.seq, ErrorCode::ControllerActive, "Controller already assigned");
                        }
                    }
                    ControlAction::Release => {
                        if *controller == Some(client_id) {
                            *controller = None;
                            info!(client_id, "controller released");
                            send(&tx, &create_ack(ctrl.seq, AckStatus::Ok));
                        } else {
                            send_error(
                                &tx,
                                ctrl.seq,
                                ErrorCode::NotControllerRelease,
                                "Only controller may release",
                            );
                        }
                    }
                }
            }

            Ok(ParsedMessage::Unknown(msg)) => {
                if state.is_handshaken(client_id).await
                    && !state.check_and_update_seq(client_id, msg.seq).await
                {
                    send_error(&tx, msg.seq, ErrorCode::InvalidCommand, "seq must be strictly increasing");
                    continue;
                }
                send_error(&tx, msg.seq, ErrorCode::InvalidCommand, "Unknown message type");
            }

            Err(e) => {
                let seq = extract_seq_best_effort(trimmed).unwrap_or(0);
                send_error(&tx, seq, ErrorCode::InvalidCommand, &format!("JSON parse error: {}", e));
            }
        }
    };

    // Dropping every sender lets the writer flush queued replies and stop.
    drop(tx);
    remove_client(state, client_id).await;
    let _ = write_task.await;

    result
}

/// Remove a client and promote the next one (lowest id) if it held control.
async fn remove_client(state: &ServerState, client_id: usize) {
    let mut controller = state.controller.write().await;
    let mut clients = state.clients.write().await;

    clients.retain(|c| c.id != client_id);

    if *controller == Some(client_id) {
        let next_id = clients.iter().filter(|c| c.handshaken).map(|c| c.id).min();
        *controller = next_id;
        match next_id {
            Some(new_id) => info!(client_id = new_id, "controller promoted"),
            None => info!(client_id, "controller released on disconnect"),
        }
    }
}

/// Map a protocol command into a game-loop command.
pub fn map_command(cmd: &CommandMessage) -> Result<ClientCommand, (ErrorCode, String)> {
    match cmd.action {
        CommandAction::Select => {
            let Some(card_id) = cmd.card_id else {
                return Err((ErrorCode::InvalidCommand, "Missing card_id".to_string()));
            };
            Ok(ClientCommand::Select { card_id })
        }
        CommandAction::NewGame => Ok(ClientCommand::NewGame {
            grid: cmd.grid.map(|g| GridSize::new(g.width, g.height)),
            seed: cmd.seed,
        }),
        CommandAction::Save => Ok(ClientCommand::Save),
        CommandAction::Load => Ok(ClientCommand::Load),
        CommandAction::ClearSave => Ok(ClientCommand::ClearSave),
        CommandAction::Observe => Ok(ClientCommand::Observe),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_from_env() {
        // This test just ensures it doesn't panic
        let _config = ServerConfig::from_env();
    }

    #[test]
    fn test_default_socket_addr() {
        let addr = ServerConfig::default().socket_addr().unwrap();
        assert_eq!(addr.port(), 7878);
        assert!(addr.ip().is_loopback());
    }

    #[test]
    fn test_bad_host_is_error() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            ..ServerConfig::default()
        };
        assert!(config.socket_addr().is_err());
    }

    #[test]
    fn test_map_select_requires_card() {
        let cmd = create_command(1, CommandAction::Select);
        let (code, _) = map_command(&cmd).unwrap_err();
        assert_eq!(code, ErrorCode::InvalidCommand);

        let cmd = CommandMessage {
            card_id: Some(4),
            ..create_command(2, CommandAction::Select)
        };
        assert_eq!(map_command(&cmd).unwrap(), ClientCommand::Select { card_id: 4 });
    }

    #[test]
    fn test_map_new_game() {
        let cmd = CommandMessage {
            grid: Some(GridSpec {
                width: 4,
                height: 3,
            }),
            seed: Some(11),
            ..create_command(1, CommandAction::NewGame)
        };
        assert_eq!(
            map_command(&cmd).unwrap(),
            ClientCommand::NewGame {
                grid: Some(GridSize::new(4, 3)),
                seed: Some(11)
            }
        );
        assert_eq!(
            map_command(&create_command(2, CommandAction::NewGame)).unwrap(),
            ClientCommand::NewGame {
                grid: None,
                seed: None
            }
        );
    }
}
