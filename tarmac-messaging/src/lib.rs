//! Per-board message queues: the only cross-role signaling channel. A
//! producing role posts, the consuming role acts and deletes. Ordering is
//! guaranteed within a board only, newest first.

use chrono::Utc;
use tarmac_domain::{Board, Message, MessagePayload, Priority};
use tarmac_store::{SharedStore, StoreError};
use tracing::info;
use uuid::Uuid;

/// A message as composed by the producing role; id and timestamp are
/// assigned at post time.
#[derive(Debug, Clone)]
pub struct MessageDraft {
    pub author: String,
    pub airline: Option<String>,
    pub payload: MessagePayload,
    pub priority: Priority,
}

#[derive(Clone)]
pub struct MessageBus {
    store: SharedStore,
}

impl MessageBus {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub fn post(&self, board: Board, draft: MessageDraft) -> Result<Message, StoreError> {
        let message = Message {
            id: Uuid::new_v4(),
            author: draft.author,
            airline: draft.airline,
            payload: draft.payload,
            priority: draft.priority,
            posted_at: Utc::now(),
        };

        let mut store = self.store.lock();
        // Newest first
        store.boards.entry(board).or_default().insert(0, message.clone());
        store.persist_messages()?;

        info!("Message posted to {:?} board: {}", board, message.payload.summary());
        Ok(message)
    }

    /// Idempotent: deleting an id that is already gone is a no-op, so two
    /// sessions of the same role can acknowledge concurrently.
    pub fn delete(&self, board: Board, message_id: Uuid) -> Result<(), StoreError> {
        let mut store = self.store.lock();
        if let Some(messages) = store.boards.get_mut(&board) {
            messages.retain(|m| m.id != message_id);
        }
        store.persist_messages()
    }

    pub fn get(&self, board: Board, message_id: Uuid) -> Option<Message> {
        let store = self.store.lock();
        store
            .boards
            .get(&board)
            .and_then(|messages| messages.iter().find(|m| m.id == message_id))
            .cloned()
    }

    pub fn list_by_board(&self, board: Board) -> Vec<Message> {
        let store = self.store.lock();
        store.boards.get(&board).cloned().unwrap_or_default()
    }

    pub fn list_by_board_and_scope(&self, board: Board, airline: &str) -> Vec<Message> {
        let store = self.store.lock();
        store
            .boards
            .get(&board)
            .map(|messages| {
                messages
                    .iter()
                    .filter(|m| m.airline.as_deref() == Some(airline))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}
