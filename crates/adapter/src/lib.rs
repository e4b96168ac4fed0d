//! Adapter module - game control via TCP socket with JSON protocol
//!
//! This crate lets an external client (a presentation layer in another process, a bot, a
//! test harness) drive a [`GameSession`](crate::core::GameSession) over a TCP socket.
//!
//! # Protocol Overview
//!
//! The adapter implements a **line-delimited JSON protocol** over TCP:
//!
//! 1. **Connection**: Client connects to TCP socket (default: 127.0.0.1:7878)
//! 2. **Handshake**: Client sends `hello`, server responds with `welcome`
//! 3. **Controller Assignment**: First client to hello becomes the controller
//! 4. **Event Streaming**: Every core event is broadcast as an `event` message
//! 5. **Commanding**: Controller sends commands (`select`, `newGame`, `save`, ...)
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **hello**: Initial handshake with client info and requested capabilities
//! - **command**: Select a card or manage the session
//! - **control**: Claim or release controller status
//!
//! ## Server → Client
//!
//! - **welcome**: Response to hello with assigned role and server capabilities
//! - **ack**: Command applied (`ok`) or rejected by the game rules (`ignored`)
//! - **error**: Error response with code and message
//! - **event**: One core event tagged with its `episode_id`
//! - **observation**: Board, score and turn state as a player sees them
//!
//! # Environment Variables
//!
//! - `PAIRS_AI_HOST`: Bind address (default: "127.0.0.1")
//! - `PAIRS_AI_PORT`: Port number (default: 7878)
//! - `PAIRS_AI_MAX_PENDING`: Inbound command queue size (default: 10)
//! - `PAIRS_AI_LOG_PATH`: Append all wire traffic to this file
//! - `PAIRS_AI_DISABLED`: Set to "1" or "true" to disable adapter entirely
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"ts":1234567890,"client":{"name":"bot","version":"1.0.0"},"protocol_version":"1.0.0","requested":{"stream_events":true}}
//! Server -> Client: {"type":"welcome","seq":1,"ts":1234567890,"protocol_version":"1.0.0","client_id":1,"role":"controller",...}
//! Server -> Client: {"type":"observation","seq":1,"ts":1234567891,"episode_id":1,"cards":[...],...}
//! Client -> Server: {"type":"command","seq":2,"ts":1234567892,"action":"select","card_id":5}
//! Server -> Client: {"type":"ack","seq":2,"ts":1234567892,"status":"ok"}
//! Server -> Client: {"type":"event","seq":2,"ts":1234567892,"episode_id":1,"event":{"kind":"cardRevealed","card_id":5}}
//! ```
//!
//! # Implementation
//!
//! - [`server`]: tokio TCP server (handshake, sequencing, controller arbitration, backpressure)
//! - [`runtime`]: channels bridging the synchronous game loop and the server
//! - [`dispatch`]: applies commands to the session on the game loop thread
//! - [`protocol`]: message structure definitions

pub mod dispatch;
pub mod protocol;
pub mod runtime;
pub mod server;

pub use memory_pairs_core as core;
pub use memory_pairs_types as types;

// Re-export protocol types for convenience
pub use dispatch::Dispatcher;
pub use protocol::*;
pub use runtime::{Adapter, ClientCommand, InboundCommand, InboundPayload, OutboundMessage};
pub use server::*;
