use super::{FollowOutput, ScrollTarget};

/// Per-conversation scroll policy state
///
/// Lives inside the view state of one conversation, so switching
/// conversations builds a fresh policy and the one-shot settle latch is
/// re-armed without any explicit reset.
#[derive(Debug, Clone)]
pub struct ScrollPolicy {
    burst_threshold: usize,
    at_bottom: bool,
    initial_scroll_done: bool,
    previous_length: usize,
}

impl ScrollPolicy {
    pub fn new(burst_threshold: usize) -> Self {
        Self { burst_threshold: burst_threshold.max(1), at_bottom: true, initial_scroll_done: false, previous_length: 0 }
    }

    pub fn at_bottom(&self) -> bool {
        self.at_bottom
    }

    pub fn initial_scroll_done(&self) -> bool {
        self.initial_scroll_done
    }

    pub fn previous_length(&self) -> usize {
        self.previous_length
    }

    /// One-shot jump to the tail once the backlog has finished loading.
    pub fn settle(&mut self, len: usize, loading: bool) -> Option<ScrollTarget> {
        if self.initial_scroll_done || loading || len == 0 {
            return None;
        }

        self.initial_scroll_done = true;
        Some(ScrollTarget::tail(len))
    }

    /// Burst follow: a single update that grows the list by at least the
    /// threshold while pinned asks for an explicit jump. Smaller growth is
    /// left to continuous follow.
    pub fn on_length_change(&mut self, len: usize) -> Option<ScrollTarget> {
        if len == self.previous_length {
            return None;
        }

        let grew_by = len.saturating_sub(self.previous_length);
        self.previous_length = len;

        if grew_by >= self.burst_threshold && self.at_bottom && len > 0 {
            Some(ScrollTarget::tail(len))
        } else {
            None
        }
    }

    /// Only the viewport's own observation may change this.
    pub fn set_at_bottom(&mut self, at_bottom: bool) {
        self.at_bottom = at_bottom;
    }

    pub fn follow_output(&self) -> FollowOutput {
        if self.at_bottom { FollowOutput::Smooth } else { FollowOutput::Disabled }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::Align;

    #[test]
    fn test_settle_waits_for_loaded_entries() {
        let mut policy = ScrollPolicy::new(5);
        assert_eq!(policy.settle(0, false), None);
        assert_eq!(policy.settle(3, true), None);
        assert!(!policy.initial_scroll_done());

        assert_eq!(policy.settle(3, false), Some(ScrollTarget::new(2, Align::End)));
        assert!(policy.initial_scroll_done());
    }

    #[test]
    fn test_settle_fires_once() {
        let mut policy = ScrollPolicy::new(5);
        assert!(policy.settle(3, false).is_some());
        assert_eq!(policy.settle(3, false), None);
        assert_eq!(policy.settle(10, false), None);
    }

    #[test]
    fn test_small_growth_does_not_jump() {
        let mut policy = ScrollPolicy::new(5);
        assert!(policy.on_length_change(20).is_some());
        assert_eq!(policy.on_length_change(21), None);
        assert_eq!(policy.on_length_change(24), None);
        assert_eq!(policy.previous_length(), 24);
    }

    #[test]
    fn test_burst_growth_jumps_to_last() {
        let mut policy = ScrollPolicy::new(5);
        policy.on_length_change(21);
        assert_eq!(policy.on_length_change(40), Some(ScrollTarget::new(39, Align::End)));
    }

    #[test]
    fn test_burst_ignored_when_scrolled_up() {
        let mut policy = ScrollPolicy::new(5);
        policy.set_at_bottom(false);
        assert_eq!(policy.on_length_change(500), None);
        assert_eq!(policy.previous_length(), 500);
        assert_eq!(policy.follow_output(), FollowOutput::Disabled);
    }

    #[test]
    fn test_shrink_updates_previous_length() {
        let mut policy = ScrollPolicy::new(5);
        policy.on_length_change(10);
        assert_eq!(policy.on_length_change(2), None);
        assert_eq!(policy.on_length_change(7), Some(ScrollTarget::tail(7)));
    }

    #[test]
    fn test_threshold_is_at_least_one() {
        let mut policy = ScrollPolicy::new(0);
        assert!(policy.on_length_change(1).is_some());
    }
}
