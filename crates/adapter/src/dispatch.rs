//! Game-loop side of the adapter
//!
//! Applies inbound commands to a [`GameSession`] and turns replies, core events and
//! observations into outbound lines. Runs on the game loop thread; never touches the socket.

use serde::Serialize;
use tracing::{debug, warn};

use crate::core::{GameSession, GameStateStore, SaveSlot, SimpleRng, Unbiased};
use crate::protocol::*;
use crate::runtime::{ClientCommand, InboundCommand, InboundPayload, OutboundMessage};

#[derive(Debug, Default)]
pub struct Dispatcher {
    /// Sequence number of server-originated messages (events, observations).
    seq: u64,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    /// Apply one inbound command. Replies go to the sender; resulting core events are
    /// broadcast by the next [`flush_events`](Self::flush_events).
    pub fn handle<S: SaveSlot>(
        &mut self,
        session: &mut GameSession,
        store: &mut GameStateStore<S>,
        inbound: InboundCommand,
    ) -> Vec<OutboundMessage> {
        let InboundCommand {
            client_id,
            seq,
            payload,
        } = inbound;

        let command = match payload {
            InboundPayload::ObservationRequest => {
                return self.observation_for(session, client_id).into_iter().collect();
            }
            InboundPayload::Command(command) => command,
        };
        debug!(client_id, seq, ?command, "applying command");

        let result = match command {
            ClientCommand::Select { card_id } => session.select_card(card_id).map(|admitted| {
                if admitted {
                    AckStatus::Ok
                } else {
                    AckStatus::Ignored
                }
            }),
            ClientCommand::NewGame { grid, seed } => {
                let grid = grid.unwrap_or_else(|| session.config().grid());
                let started = match seed {
                    Some(seed) if session.config().unbiased_shuffle => {
                        session.new_game_with(grid, &mut Unbiased(SimpleRng::new(seed)))
                    }
                    Some(seed) => session.new_game_with(grid, &mut SimpleRng::new(seed)),
                    None => session.new_game(grid),
                };
                started.map(|()| AckStatus::Ok)
            }
            ClientCommand::Save => session.save(store).map(|()| AckStatus::Ok),
            ClientCommand::Load => session.load(store).map(|found| {
                if found {
                    AckStatus::Ok
                } else {
                    AckStatus::Ignored
                }
            }),
            ClientCommand::ClearSave => store.clear().map(|()| AckStatus::Ok),
            ClientCommand::Observe => {
                let ack = self.reply(client_id, &create_ack(seq, AckStatus::Ok));
                let observation = self.observation_for(session, client_id);
                return ack.into_iter().chain(observation).collect();
            }
        };

        let reply = match result {
            Ok(status) => self.reply(client_id, &create_ack(seq, status)),
            Err(e) => {
                warn!(client_id, seq, error = %e, "command failed");
                self.reply(
                    client_id,
                    &create_error(seq, ErrorCode::GameError, &e.to_string()),
                )
            }
        };
        reply.into_iter().collect()
    }

    /// Broadcast every event the session emitted since the last flush.
    pub fn flush_events(&mut self, session: &mut GameSession) -> Vec<OutboundMessage> {
        let episode_id = session.episode_id();
        session
            .drain_events()
            .into_iter()
            .filter_map(|event| {
                let msg = create_event(self.next_seq(), episode_id, event);
                encode(&msg).map(|line| OutboundMessage::Broadcast { line })
            })
            .collect()
    }

    /// Current observation for every streaming client.
    pub fn broadcast_observation(&mut self, session: &GameSession) -> Option<OutboundMessage> {
        let observation = session.observation()?;
        let msg = create_observation(self.next_seq(), observation);
        encode(&msg).map(|line| OutboundMessage::Broadcast { line })
    }

    fn observation_for(
        &mut self,
        session: &GameSession,
        client_id: usize,
    ) -> Option<OutboundMessage> {
        let observation = session.observation()?;
        let msg = create_observation(self.next_seq(), observation);
        self.reply(client_id, &msg)
    }

    fn reply<T: Serialize>(&self, client_id: usize, msg: &T) -> Option<OutboundMessage> {
        encode(msg).map(|line| OutboundMessage::ToClient { client_id, line })
    }
}

fn encode<T: Serialize>(msg: &T) -> Option<String> {
    match serde_json::to_string(msg) {
        Ok(line) => Some(line),
        Err(e) => {
            warn!(error = %e, "failed to encode outbound message");
            None
        }
    }
}
