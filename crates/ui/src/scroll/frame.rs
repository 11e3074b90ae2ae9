use super::{ScrollHandle, ScrollTarget};
use tailview_core::ConversationId;

/// Identity of the view a jump was decided for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameStamp {
    pub conversation: ConversationId,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledJump {
    pub stamp: FrameStamp,
    pub target: ScrollTarget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Nothing was pending
    Idle,
    Executed(ScrollTarget),
    /// The view changed since the jump was scheduled; dropped
    Stale(ScheduledJump),
}

/// Defers jumps to the next paint boundary
///
/// At most one jump is pending; a later request replaces an earlier one.
/// Execution only checks view identity. Whether the viewport is still
/// pinned is not re-read here.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    pending: Option<ScheduledJump>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self, stamp: FrameStamp, target: ScrollTarget) {
        if let Some(previous) = self.pending.replace(ScheduledJump { stamp, target }) {
            tracing::trace!(index = previous.target.index, "coalesced pending jump");
        }
    }

    pub fn pending(&self) -> Option<&ScheduledJump> {
        self.pending.as_ref()
    }

    /// Run the pending jump against `handle` if it still belongs to `current`.
    pub fn run(&mut self, current: Option<&FrameStamp>, handle: &mut dyn ScrollHandle) -> FrameOutcome {
        let Some(jump) = self.pending.take() else {
            return FrameOutcome::Idle;
        };

        if current != Some(&jump.stamp) {
            tracing::debug!(
                conversation = %jump.stamp.conversation,
                generation = jump.stamp.generation,
                "discarding stale jump"
            );
            return FrameOutcome::Stale(jump);
        }

        tracing::debug!(index = jump.target.index, align = ?jump.target.align, "executing scheduled jump");
        handle.scroll_to_index(jump.target);
        FrameOutcome::Executed(jump.target)
    }
}
