//! History accumulator interface.
//!
//! A [`HistorySource`] turns some raw patch stream into ordered, deduplicated
//! [`EntrySequence`] snapshots. The viewer only consumes [`HistoryUpdate`]s;
//! merging and deduplication happen on the source side.

mod jsonl;
mod manual;
mod merge;

pub use jsonl::JsonlHistory;
pub use manual::ManualHistory;
pub use merge::{Applied, EntryLog, PatchBody, PatchRecord};

use crate::entry::{ConversationId, EntrySequence};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// How an emission relates to the previous one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    /// First emission for a subscription
    Initial,
    /// Entries were appended
    Append,
    /// Existing entries were replaced
    Refresh,
}

/// One emission from a history source: the authoritative current state
#[derive(Debug, Clone)]
pub struct HistoryUpdate {
    pub conversation: ConversationId,
    pub entries: EntrySequence,
    pub kind: UpdateKind,
    pub loading: bool,
}

/// A producer of conversation history
pub trait HistorySource {
    /// Start streaming history for `conversation`.
    ///
    /// Dropping (or calling [`Subscription::unsubscribe`] on) the returned
    /// subscription stops the producer.
    fn subscribe(&self, conversation: &ConversationId) -> Subscription;
}

/// Consumer half of a history stream
#[derive(Debug)]
pub struct Subscription {
    conversation: ConversationId,
    updates: mpsc::UnboundedReceiver<HistoryUpdate>,
    cancel: CancellationToken,
}

/// Producer half of a history stream, held by the source's task
#[derive(Debug, Clone)]
pub struct UpdateSender {
    conversation: ConversationId,
    tx: mpsc::UnboundedSender<HistoryUpdate>,
    cancel: CancellationToken,
}

impl Subscription {
    /// Create a connected sender/subscription pair for `conversation`
    pub fn channel(conversation: ConversationId) -> (UpdateSender, Subscription) {
        let (tx, updates) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let sender = UpdateSender { conversation: conversation.clone(), tx, cancel: cancel.clone() };
        (sender, Subscription { conversation, updates, cancel })
    }

    pub fn conversation(&self) -> &ConversationId {
        &self.conversation
    }

    /// Wait for the next emission; `None` once the source has finished
    pub async fn next(&mut self) -> Option<HistoryUpdate> {
        self.updates.recv().await
    }

    /// Non-blocking poll for an already-delivered emission
    pub fn try_next(&mut self) -> Option<HistoryUpdate> {
        self.updates.try_recv().ok()
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl UpdateSender {
    pub fn conversation(&self) -> &ConversationId {
        &self.conversation
    }

    /// Deliver an emission. Returns `false` once the subscriber is gone.
    pub fn emit(&self, entries: EntrySequence, kind: UpdateKind, loading: bool) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }

        let update = HistoryUpdate { conversation: self.conversation.clone(), entries, kind, loading };
        self.tx.send(update).is_ok()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled() || self.tx.is_closed()
    }

    /// Resolves when the subscriber unsubscribes
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }
}
