use std::sync::Arc;
use thiserror::Error;
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::{debug, info, instrument, warn};

use crate::assistant::{extract_prompt, AssistantService};
use crate::websockets::{ConnectionManager, MessageBroadcaster, WebSocketMessage};

use super::{membership::MembershipError, models::ChatEvent, store::StateStore};

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("assistant unavailable: {0}")]
    AssistantUnavailable(String),

    #[error("failed to encode outbound message: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<MembershipError> for CoordinatorError {
    fn from(e: MembershipError) -> Self {
        CoordinatorError::InvalidState(e.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined,
    /// Already a member: history was replayed, nothing was announced
    AlreadyMember,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    Left,
    /// Not a member, or not the identity's active room: nothing changed
    NotTracked,
}

#[derive(Debug)]
pub struct MessageOutcome {
    pub event: ChatEvent,
    /// Background task posting the assistant's reply, when the message
    /// addressed the assistant. Resolves to the posted event.
    pub assistant_task: Option<JoinHandle<Option<ChatEvent>>>,
}

/// Applies join, leave, message and disconnect events to room state and
/// fans the results out to room members.
///
/// Every operation holds the state lock across its mutation and the
/// enqueueing of its fan-out, so members observe events in history order.
/// Assistant calls run on their own task, outside the lock.
pub struct BroadcastCoordinator {
    state: Mutex<StateStore>,
    connection_manager: Arc<dyn ConnectionManager>,
    assistant: Arc<AssistantService>,
}

impl BroadcastCoordinator {
    pub fn new(
        history_capacity: usize,
        connection_manager: Arc<dyn ConnectionManager>,
        assistant: Arc<AssistantService>,
    ) -> Self {
        Self {
            state: Mutex::new(StateStore::new(history_capacity)),
            connection_manager,
            assistant,
        }
    }

    #[instrument(skip(self))]
    pub async fn join(&self, identity: &str, room: &str) -> Result<JoinOutcome, CoordinatorError> {
        let identity = require_identity(identity)?;
        let room = require_room(room)?;

        let mut state = self.state.lock().await;

        if state.membership.is_member(identity, room) {
            state.membership.set_active(identity, room)?;
            self.replay(&state, identity, room).await?;
            debug!(identity = %identity, room_id = %room, "Rejoin, replayed history only");
            return Ok(JoinOutcome::AlreadyMember);
        }

        state.add_member(identity, room);
        state.membership.set_active(identity, room)?;
        state.history.ensure(room);
        self.replay(&state, identity, room).await?;

        let event = ChatEvent::joined(identity);
        state.history.append(room, event.clone());
        self.announce(&state, room, &event).await?;

        info!(
            identity = %identity,
            room_id = %room,
            member_count = state.registry.member_count(room),
            "Identity joined room"
        );
        Ok(JoinOutcome::Joined)
    }

    /// Leaves `room` only when it is the identity's active room
    #[instrument(skip(self))]
    pub async fn leave(&self, identity: &str, room: &str) -> Result<LeaveOutcome, CoordinatorError> {
        let identity = require_identity(identity)?;
        let room = require_room(room)?;

        let mut state = self.state.lock().await;

        if state.membership.active_room(identity) != Some(room) {
            debug!(identity = %identity, room_id = %room, "Leave ignored, not the active room");
            return Ok(LeaveOutcome::NotTracked);
        }

        state.remove_member(identity, room);
        self.announce_departure(&mut state, identity, room).await?;

        info!(identity = %identity, room_id = %room, "Identity left room");
        Ok(LeaveOutcome::Left)
    }

    /// Publishes a user message. A message addressed to the assistant also
    /// spawns the reply, so the sender's connection is never held up by it.
    #[instrument(skip(self, text))]
    pub async fn message(
        self: &Arc<Self>,
        identity: &str,
        room: &str,
        text: &str,
    ) -> Result<MessageOutcome, CoordinatorError> {
        let identity = require_identity(identity)?;
        let room = require_room(room)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(CoordinatorError::Validation(
                "message text must not be empty".to_string(),
            ));
        }

        let event = ChatEvent::user_message(identity, text);
        self.publish(room, &event).await?;
        debug!(identity = %identity, room_id = %room, "Message broadcast");

        let assistant_task = extract_prompt(text).map(|prompt| {
            let coordinator = Arc::clone(self);
            let room = room.to_string();
            let prompt = prompt.to_string();
            tokio::spawn(async move { coordinator.answer_prompt(&room, &prompt).await })
        });

        Ok(MessageOutcome {
            event,
            assistant_task,
        })
    }

    /// Asks the assistant and posts its reply to the room
    async fn answer_prompt(&self, room: &str, prompt: &str) -> Option<ChatEvent> {
        let reply = self.assistant.reply(prompt).await;
        let reply_event = ChatEvent::assistant_reply(&reply);

        match self.publish(room, &reply_event).await {
            Ok(()) => {
                info!(room_id = %room, "Assistant replied");
                Some(reply_event)
            }
            Err(e) => {
                warn!(room_id = %room, error = %e, "Failed to post assistant reply");
                None
            }
        }
    }

    /// Removes the identity from every room, announcing to rooms that still
    /// have members. Returns the rooms it was removed from.
    #[instrument(skip(self))]
    pub async fn disconnect(&self, identity: &str) -> Result<Vec<String>, CoordinatorError> {
        let mut state = self.state.lock().await;
        self.remove_everywhere(&mut state, identity).await
    }

    /// Disconnects the identity once its connection closes, unless a newer
    /// connection has taken over. The ownership check runs under the state
    /// lock, so a reconnecting client's join is applied after the removal.
    #[instrument(skip(self))]
    pub async fn release_connection(
        &self,
        identity: &str,
        connection_id: &str,
    ) -> Result<Vec<String>, CoordinatorError> {
        let mut state = self.state.lock().await;

        let was_current = self
            .connection_manager
            .remove_connection(identity, connection_id)
            .await;
        if !was_current {
            debug!(identity = %identity, "Superseded connection closed, presence kept");
            return Ok(Vec::new());
        }

        self.remove_everywhere(&mut state, identity).await
    }

    pub async fn members(&self, room: &str) -> Vec<String> {
        self.state.lock().await.registry.members(room)
    }

    pub async fn member_count(&self, room: &str) -> usize {
        self.state.lock().await.registry.member_count(room)
    }

    pub async fn history(&self, room: &str) -> Vec<ChatEvent> {
        self.state.lock().await.history.get(room)
    }

    pub async fn rooms_of(&self, identity: &str) -> Vec<String> {
        self.state.lock().await.membership.rooms_of(identity)
    }

    pub async fn active_room(&self, identity: &str) -> Option<String> {
        self.state
            .lock()
            .await
            .membership
            .active_room(identity)
            .map(str::to_string)
    }

    async fn remove_everywhere(
        &self,
        state: &mut StateStore,
        identity: &str,
    ) -> Result<Vec<String>, CoordinatorError> {
        let rooms = state.remove_identity(identity);
        for room in &rooms {
            self.announce_departure(state, identity, room).await?;
        }

        if !rooms.is_empty() {
            info!(identity = %identity, rooms = ?rooms, "Identity disconnected from rooms");
        }
        Ok(rooms)
    }

    /// Appends an event and broadcasts it to the room's current members
    async fn publish(&self, room: &str, event: &ChatEvent) -> Result<(), CoordinatorError> {
        let mut state = self.state.lock().await;
        state.history.append(room, event.clone());

        let members = state.registry.members(room);
        MessageBroadcaster::broadcast_to_identities(
            &self.connection_manager,
            &members,
            &WebSocketMessage::message(room, event),
        )
        .await?;
        Ok(())
    }

    async fn announce_departure(
        &self,
        state: &mut StateStore,
        identity: &str,
        room: &str,
    ) -> Result<(), CoordinatorError> {
        if state.registry.member_count(room) == 0 {
            return Ok(());
        }

        let event = ChatEvent::left(identity);
        state.history.append(room, event.clone());
        self.announce(state, room, &event).await
    }

    /// Sends the event and the refreshed member list to every member
    async fn announce(
        &self,
        state: &StateStore,
        room: &str,
        event: &ChatEvent,
    ) -> Result<(), CoordinatorError> {
        let members = state.registry.members(room);
        MessageBroadcaster::broadcast_to_identities(
            &self.connection_manager,
            &members,
            &WebSocketMessage::message(room, event),
        )
        .await?;
        MessageBroadcaster::broadcast_to_identities(
            &self.connection_manager,
            &members,
            &WebSocketMessage::update_users(room, members.clone()),
        )
        .await?;
        Ok(())
    }

    async fn replay(
        &self,
        state: &StateStore,
        identity: &str,
        room: &str,
    ) -> Result<(), CoordinatorError> {
        MessageBroadcaster::send_to_identity(
            &self.connection_manager,
            identity,
            &WebSocketMessage::chat_history(room, state.history.get(room)),
        )
        .await?;
        Ok(())
    }
}

fn require_identity(identity: &str) -> Result<&str, CoordinatorError> {
    if identity.trim().is_empty() {
        return Err(CoordinatorError::Validation(
            "identity must not be empty".to_string(),
        ));
    }
    Ok(identity)
}

fn require_room(room: &str) -> Result<&str, CoordinatorError> {
    let room = room.trim();
    if room.is_empty() {
        return Err(CoordinatorError::Validation(
            "room must not be empty".to_string(),
        ));
    }
    Ok(room)
}
