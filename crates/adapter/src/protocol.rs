//! Protocol module - JSON message types for the adapter
//!
//! Line-delimited JSON. Every message carries `type`, `seq` (sequence number) and
//! `ts` (timestamp in ms).

use serde::{Deserialize, Serialize};

use crate::core::Observation;
use crate::types::{CardId, GameEvent};

/// Protocol major version accepted in `hello`.
pub const PROTOCOL_VERSION: &str = "1.0.0";

// ============== Client -> Game Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HelloType {
    #[default]
    #[serde(rename = "hello")]
    Hello,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CommandType {
    #[default]
    #[serde(rename = "command")]
    Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ControlType {
    #[default]
    #[serde(rename = "control")]
    Control,
}

/// Client hello message (first message to establish connection)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: HelloType,
    pub seq: u64,
    pub ts: u64,
    pub client: ClientInfo,
    pub protocol_version: String,
    #[serde(default)]
    pub requested: RequestedCapabilities,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestedCapabilities {
    /// Receive `event` and `observation` broadcasts.
    #[serde(default = "default_true")]
    pub stream_events: bool,
}

impl Default for RequestedCapabilities {
    fn default() -> Self {
        Self {
            stream_events: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Command message (controller only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: CommandType,
    pub seq: u64,
    pub ts: u64,
    pub action: CommandAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_id: Option<CardId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSpec {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandAction {
    Select,
    NewGame,
    Save,
    Load,
    ClearSave,
    Observe,
}

impl CommandAction {
    pub const ALL: [CommandAction; 6] = [
        CommandAction::Select,
        CommandAction::NewGame,
        CommandAction::Save,
        CommandAction::Load,
        CommandAction::ClearSave,
        CommandAction::Observe,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandAction::Select => "select",
            CommandAction::NewGame => "newGame",
            CommandAction::Save => "save",
            CommandAction::Load => "load",
            CommandAction::ClearSave => "clearSave",
            CommandAction::Observe => "observe",
        }
    }
}

impl<'de> Deserialize<'de> for CommandAction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        CommandAction::ALL
            .into_iter()
            .find(|a| s.eq_ignore_ascii_case(a.as_str()))
            .ok_or_else(|| serde::de::Error::custom("unknown command action"))
    }
}

impl Serialize for CommandAction {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Control message (claim/release controller status)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: ControlType,
    pub seq: u64,
    pub ts: u64,
    pub action: ControlAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlAction {
    Claim,
    Release,
}

impl<'de> Deserialize<'de> for ControlAction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        if s.eq_ignore_ascii_case("claim") {
            Ok(Self::Claim)
        } else if s.eq_ignore_ascii_case("release") {
            Ok(Self::Release)
        } else {
            Err(serde::de::Error::custom("invalid control action"))
        }
    }
}

impl Serialize for ControlAction {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            ControlAction::Claim => serializer.serialize_str("claim"),
            ControlAction::Release => serializer.serialize_str("release"),
        }
    }
}

// ============== Game -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WelcomeType {
    #[serde(rename = "welcome")]
    Welcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckType {
    #[serde(rename = "ack")]
    Ack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckStatus {
    #[serde(rename = "ok")]
    Ok,
    /// The command was valid but the game rejected it (e.g. selecting a locked card).
    #[serde(rename = "ignored")]
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "handshake_required")]
    HandshakeRequired,
    #[serde(rename = "protocol_mismatch")]
    ProtocolMismatch,
    #[serde(rename = "not_controller")]
    NotController,
    #[serde(rename = "not_controller_release")]
    NotControllerRelease,
    #[serde(rename = "controller_active")]
    ControllerActive,
    #[serde(rename = "invalid_command")]
    InvalidCommand,
    #[serde(rename = "backpressure")]
    Backpressure,
    #[serde(rename = "game_error")]
    GameError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignedRole {
    #[serde(rename = "controller")]
    Controller,
    #[serde(rename = "observer")]
    Observer,
}

/// Welcome message (response to hello)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: WelcomeType,
    pub seq: u64,
    pub ts: u64,
    pub protocol_version: String,
    pub client_id: u64,
    pub role: AssignedRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller_id: Option<u64>,
    pub game_id: String,
    pub capabilities: ServerCapabilities,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerCapabilities {
    pub formats: Vec<String>,
    pub commands: Vec<CommandAction>,
}

/// Acknowledgment for command receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckMessage {
    #[serde(rename = "type")]
    pub msg_type: AckType,
    pub seq: u64,
    pub ts: u64,
    pub status: AckStatus,
}

/// Error message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "event")]
    Event,
}

/// One core event, tagged with the game it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    #[serde(rename = "type")]
    pub msg_type: EventType,
    pub seq: u64,
    pub ts: u64,
    pub episode_id: u32,
    pub event: GameEvent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

/// Board and score as visible to a player.
#[derive(Debug, Clone, Serialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub ts: u64,
    #[serde(flatten)]
    pub observation: Observation,
}

// ============== Message Parsing ==============

/// Parse a JSON message from a string
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum InboundMessage {
        #[serde(rename = "hello")]
        Hello(HelloMessage),
        #[serde(rename = "command")]
        Command(CommandMessage),
        #[serde(rename = "control")]
        Control(ControlMessage),
    }

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Hello(m)) => Ok(ParsedMessage::Hello(m)),
        Ok(InboundMessage::Command(m)) => Ok(ParsedMessage::Command(m)),
        Ok(InboundMessage::Control(m)) => Ok(ParsedMessage::Control(m)),
        Err(e) => {
            // Unknown message type is not a hard parse error for the protocol.
            #[derive(Debug, Deserialize)]
            struct TypeOnly<'a> {
                #[serde(rename = "type")]
                msg_type: Option<&'a str>,
            }
            let msg_type = serde_json::from_str::<TypeOnly>(json)?
                .msg_type
                .unwrap_or("unknown");
            if msg_type != "hello" && msg_type != "command" && msg_type != "control" {
                #[derive(Debug, Deserialize)]
                struct SeqOnly {
                    seq: Option<u64>,
                }
                let seq = serde_json::from_str::<SeqOnly>(json)?.seq.unwrap_or(0);
                return Ok(ParsedMessage::Unknown(UnknownMessage { seq }));
            }
            Err(e)
        }
    }
}

/// Parsed incoming message
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Hello(HelloMessage),
    Command(CommandMessage),
    Control(ControlMessage),
    Unknown(UnknownMessage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
}

/// Best-effort `seq` for replying to a line that failed to parse.
pub fn extract_seq_best_effort(s: &str) -> Option<u64> {
    let start = s.find("\"seq\"")?;
    let after_key = &s[start + 5..];
    let colon = after_key.find(':')?;
    let rest = after_key[colon + 1..].trim_start();
    let end = rest.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }
    rest[..end].parse::<u64>().ok()
}

// ============== Utility Functions ==============

/// Create a hello message
pub fn create_hello(seq: u64, client_name: &str, protocol_version: &str) -> HelloMessage {
    HelloMessage {
        msg_type: HelloType::Hello,
        seq,
        ts: current_timestamp_ms(),
        client: ClientInfo {
            name: client_name.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        protocol_version: protocol_version.to_string(),
        requested: RequestedCapabilities::default(),
    }
}

/// Create a command message
pub fn create_command(seq: u64, action: CommandAction) -> CommandMessage {
    CommandMessage {
        msg_type: CommandType::Command,
        seq,
        ts: current_timestamp_ms(),
        action,
        card_id: None,
        grid: None,
        seed: None,
    }
}

/// Create a welcome message
pub fn create_welcome(
    seq: u64,
    protocol_version: &str,
    client_id: u64,
    role: AssignedRole,
    controller_id: Option<u64>,
) -> WelcomeMessage {
    WelcomeMessage {
        msg_type: WelcomeType::Welcome,
        seq,
        ts: current_timestamp_ms(),
        protocol_version: protocol_version.to_string(),
        client_id,
        role,
        controller_id,
        game_id: "memory-pairs".to_string(),
        capabilities: ServerCapabilities {
            formats: vec!["json".to_string()],
            commands: CommandAction::ALL.to_vec(),
        },
    }
}

/// Create an acknowledgment
pub fn create_ack(seq: u64, status: AckStatus) -> AckMessage {
    AckMessage {
        msg_type: AckType::Ack,
        seq,
        ts: current_timestamp_ms(),
        status,
    }
}

/// Create an error message
pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
    }
}

pub fn create_event(seq: u64, episode_id: u32, event: GameEvent) -> EventMessage {
    EventMessage {
        msg_type: EventType::Event,
        seq,
        ts: current_timestamp_ms(),
        episode_id,
        event,
    }
}

pub fn create_observation(seq: u64, observation: Observation) -> ObservationMessage {
    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        ts: current_timestamp_ms(),
        observation,
    }
}

/// Get current timestamp in milliseconds
fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hello() {
        let json = r#"{"type":"hello","seq":1,"ts":1234567890,"client":{"name":"test-bot","version":"1.0.0"},"protocol_version":"1.0.0","requested":{"stream_events":false}}"#;

        match parse_message(json).unwrap() {
            ParsedMessage::Hello(msg) => {
                assert_eq!(msg.msg_type, HelloType::Hello);
                assert_eq!(msg.seq, 1);
                assert_eq!(msg.client.name, "test-bot");
                assert!(!msg.requested.stream_events);
            }
            _ => panic!("Expected Hello message"),
        }
    }

    #[test]
    fn test_hello_requested_defaults_to_streaming() {
        let json = r#"{"type":"hello","seq":1,"ts":0,"client":{"name":"x","version":"0"},"protocol_version":"1.0.0"}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Hello(msg) => assert!(msg.requested.stream_events),
            _ => panic!("Expected Hello message"),
        }
    }

    #[test]
    fn test_parse_select_command() {
        let json = r#"{"type":"command","seq":2,"ts":1234567900,"action":"select","card_id":5}"#;

        match parse_message(json).unwrap() {
            ParsedMessage::Command(msg) => {
                assert_eq!(msg.action, CommandAction::Select);
                assert_eq!(msg.card_id, Some(5));
                assert!(msg.grid.is_none());
            }
            _ => panic!("Expected Command message"),
        }
    }

    #[test]
    fn test_parse_new_game_command() {
        let json = r#"{"type":"command","seq":3,"ts":0,"action":"NEWGAME","grid":{"width":6,"height":4},"seed":9}"#;

        match parse_message(json).unwrap() {
            ParsedMessage::Command(msg) => {
                assert_eq!(msg.action, CommandAction::NewGame);
                assert_eq!(
                    msg.grid,
                    Some(GridSpec {
                        width: 6,
                        height: 4
                    })
                );
                assert_eq!(msg.seed, Some(9));
            }
            _ => panic!("Expected Command message"),
        }
    }

    #[test]
    fn test_unknown_command_action_is_parse_error() {
        let json = r#"{"type":"command","seq":3,"ts":0,"action":"undo"}"#;
        assert!(parse_message(json).is_err());
    }

    #[test]
    fn test_parse_control() {
        let json = r#"{"type":"control","seq":3,"ts":1234567910,"action":"claim"}"#;

        match parse_message(json).unwrap() {
            ParsedMessage::Control(msg) => assert_eq!(msg.action, ControlAction::Claim),
            _ => panic!("Expected Control message"),
        }
    }

    #[test]
    fn test_unknown_type_keeps_seq() {
        let json = r#"{"type":"ping","seq":12}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Unknown(m) => assert_eq!(m.seq, 12),
            _ => panic!("Expected Unknown message"),
        }
    }

    #[test]
    fn test_extract_seq_best_effort() {
        assert_eq!(extract_seq_best_effort(r#"{"seq": 41, "type":"#), Some(41));
        assert_eq!(extract_seq_best_effort(r#"{"type":"command"}"#), None);
    }

    #[test]
    fn test_create_welcome() {
        let welcome = create_welcome(1, PROTOCOL_VERSION, 7, AssignedRole::Controller, Some(7));
        assert_eq!(welcome.msg_type, WelcomeType::Welcome);
        assert_eq!(welcome.client_id, 7);
        assert_eq!(welcome.role, AssignedRole::Controller);
        assert_eq!(welcome.game_id, "memory-pairs");
        assert_eq!(welcome.capabilities.commands.len(), 6);
    }

    #[test]
    fn test_event_wire_shape() {
        let msg = create_event(
            4,
            2,
            GameEvent::MatchFound {
                pair_key: 3,
                score: 150,
                combo: 2,
            },
        );
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "event");
        assert_eq!(value["episode_id"], 2);
        assert_eq!(value["event"]["kind"], "matchFound");
        assert_eq!(value["event"]["pair_key"], 3);
    }

    #[test]
    fn test_error_code_names() {
        let err = create_error(5, ErrorCode::Backpressure, "Command queue is full");
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["code"], "backpressure");
        assert_eq!(value["type"], "error");
    }
}
