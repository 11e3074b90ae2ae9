use super::{HistorySource, Subscription, UpdateKind, UpdateSender};
use crate::entry::{ConversationId, EntrySequence};

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// In-process history source driven by explicit `push` calls
///
/// Clones share the same subscriber table, so one clone can be handed to the
/// viewer while another feeds it.
#[derive(Debug, Clone, Default)]
pub struct ManualHistory {
    senders: Arc<Mutex<HashMap<ConversationId, UpdateSender>>>,
}

impl ManualHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit to the live subscriber of `conversation`; `false` if there is none
    pub fn push(&self, conversation: &ConversationId, entries: EntrySequence, kind: UpdateKind, loading: bool) -> bool {
        let senders = self.senders.lock().unwrap_or_else(PoisonError::into_inner);
        match senders.get(conversation) {
            Some(tx) => tx.emit(entries, kind, loading),
            None => false,
        }
    }

    pub fn is_subscribed(&self, conversation: &ConversationId) -> bool {
        let senders = self.senders.lock().unwrap_or_else(PoisonError::into_inner);
        senders.get(conversation).is_some_and(|tx| !tx.is_cancelled())
    }

    /// Conversations with a live subscriber
    pub fn subscribed(&self) -> Vec<ConversationId> {
        let senders = self.senders.lock().unwrap_or_else(PoisonError::into_inner);
        let mut ids: Vec<_> = senders.iter().filter(|(_, tx)| !tx.is_cancelled()).map(|(id, _)| id.clone()).collect();
        ids.sort();
        ids
    }
}

impl HistorySource for ManualHistory {
    fn subscribe(&self, conversation: &ConversationId) -> Subscription {
        let (tx, subscription) = Subscription::channel(conversation.clone());
        self.senders.lock().unwrap_or_else(PoisonError::into_inner).insert(conversation.clone(), tx);
        subscription
    }
}
