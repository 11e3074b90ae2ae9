//! View state for the active conversation and the glue that feeds history
//! updates into the scroll policy.

use crate::registry::{EntriesReader, SharedEntries};
use crate::scroll::{FrameOutcome, FrameScheduler, FrameStamp, ScrollHandle, ScrollPolicy, ScrollTarget};
use crate::viewport::ExpansionStore;

use chrono::{DateTime, Local};
use tailview_core::{ConversationId, EntryKey, EntrySequence, HistoryUpdate};

/// State of one conversation, dropped wholesale on switch
#[derive(Debug)]
pub struct ViewState {
    pub stamp: FrameStamp,
    pub entries: EntrySequence,
    pub loading: bool,
    pub scroll: ScrollPolicy,
    pub expansion: ExpansionStore,
    pub updated_at: Option<DateTime<Local>>,
}

impl ViewState {
    fn new(stamp: FrameStamp, burst_threshold: usize) -> Self {
        Self {
            stamp,
            entries: EntrySequence::new(),
            loading: true,
            scroll: ScrollPolicy::new(burst_threshold),
            expansion: ExpansionStore::new(),
            updated_at: None,
        }
    }

    pub fn conversation(&self) -> &ConversationId {
        &self.stamp.conversation
    }
}

/// What applying one update did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateEffects {
    /// The update belonged to another conversation and was dropped
    pub ignored: bool,
    pub loading_finished: bool,
    pub settle: Option<ScrollTarget>,
    pub burst: Option<ScrollTarget>,
}

/// Owns the active conversation's state, its entries registry and the
/// frame scheduler for deferred jumps.
#[derive(Debug)]
pub struct ConversationView {
    registry: SharedEntries,
    burst_threshold: usize,
    state: Option<ViewState>,
    frames: FrameScheduler,
    next_generation: u64,
}

impl ConversationView {
    pub fn new(burst_threshold: usize) -> Self {
        Self {
            registry: SharedEntries::new(),
            burst_threshold,
            state: None,
            frames: FrameScheduler::new(),
            next_generation: 0,
        }
    }

    pub fn state(&self) -> Option<&ViewState> {
        self.state.as_ref()
    }

    pub fn conversation(&self) -> Option<&ConversationId> {
        self.state.as_ref().map(ViewState::conversation)
    }

    pub fn entries(&self) -> EntrySequence {
        self.state.as_ref().map(|state| state.entries.clone()).unwrap_or_default()
    }

    /// A view with no conversation shows the loading overlay too
    pub fn is_loading(&self) -> bool {
        self.state.as_ref().is_none_or(|state| state.loading)
    }

    pub fn is_at_bottom(&self) -> bool {
        self.state.as_ref().is_none_or(|state| state.scroll.at_bottom())
    }

    pub fn expansion(&self) -> Option<&ExpansionStore> {
        self.state.as_ref().map(|state| &state.expansion)
    }

    /// Read side of the entries registry for cooperating features
    pub fn entries_reader(&self) -> EntriesReader {
        self.registry.reader()
    }

    pub fn pending_jump(&self) -> Option<ScrollTarget> {
        self.frames.pending().map(|jump| jump.target)
    }

    /// Tear down the current state and start a fresh one for `conversation`.
    ///
    /// Entries, the loading flag and the settle latch reset before the caller
    /// resubscribes. Jumps scheduled for the old state become stale.
    pub fn switch_to(&mut self, conversation: Option<ConversationId>) {
        let previous = self.state.take();
        self.registry.reset();

        self.state = conversation.map(|conversation| {
            self.next_generation += 1;
            let stamp = FrameStamp { conversation, generation: self.next_generation };
            ViewState::new(stamp, self.burst_threshold)
        });

        tracing::debug!(
            from = previous.as_ref().map(|s| s.conversation().as_str()),
            to = self.conversation().map(ConversationId::as_str),
            "conversation switched"
        );
    }

    /// Apply one accumulator emission and schedule any resulting jump.
    pub fn on_update(&mut self, update: HistoryUpdate) -> UpdateEffects {
        let Some(state) = self.state.as_mut() else {
            return UpdateEffects { ignored: true, ..Default::default() };
        };

        if update.conversation != state.stamp.conversation {
            tracing::trace!(conversation = %update.conversation, "dropping update for inactive conversation");
            return UpdateEffects { ignored: true, ..Default::default() };
        }

        let mut effects = UpdateEffects::default();

        state.entries = update.entries;
        state.updated_at = Some(Local::now());
        self.registry.set_entries(&state.stamp.conversation, state.entries.clone());

        if state.loading {
            state.loading = update.loading;
            if !state.loading {
                effects.loading_finished = true;
                tracing::debug!(
                    conversation = %state.stamp.conversation,
                    entries = state.entries.len(),
                    "history loaded"
                );
            }
        } else if update.loading {
            tracing::trace!(kind = ?update.kind, "ignoring loading regression");
        }

        let len = state.entries.len();
        effects.settle = state.scroll.settle(len, state.loading);
        effects.burst = state.scroll.on_length_change(len);

        if let Some(target) = effects.settle {
            tracing::debug!(index = target.index, "initial settle scheduled");
            self.frames.request(state.stamp.clone(), target);
        }
        if let Some(target) = effects.burst {
            tracing::debug!(index = target.index, "burst jump scheduled");
            self.frames.request(state.stamp.clone(), target);
        }

        effects
    }

    /// Feed the viewport's pinned-state observation back into the policy.
    pub fn on_bottom_state_change(&mut self, at_bottom: bool, handle: &mut dyn ScrollHandle) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        state.scroll.set_at_bottom(at_bottom);
        handle.set_follow_output(state.scroll.follow_output());
    }

    /// Run the jump deferred to this paint boundary.
    pub fn run_frame(&mut self, handle: &mut dyn ScrollHandle) -> FrameOutcome {
        let current = self.state.as_ref().map(|state| &state.stamp);
        self.frames.run(current, handle)
    }

    /// Flip a structured row between collapsed and expanded
    pub fn toggle_expansion(&mut self, key: &EntryKey) -> Option<bool> {
        self.state.as_mut().map(|state| state.expansion.toggle(key))
    }
}
