//! Scroll policy: when the viewer jumps to the tail on its own.
//!
//! The controller never touches the viewport directly. It talks to a
//! [`ScrollHandle`], which the virtualized list implements and tests replace
//! with a recording fake.

mod frame;
mod policy;

pub use frame::{FrameOutcome, FrameScheduler, FrameStamp, ScheduledJump};
pub use policy::ScrollPolicy;

/// Where the target row lands inside the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    Start,
    Center,
    #[default]
    End,
}

/// Row index plus alignment for an explicit jump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollTarget {
    pub index: usize,
    pub align: Align,
}

impl ScrollTarget {
    pub fn new(index: usize, align: Align) -> Self {
        Self { index, align }
    }

    /// Last row of a sequence of `len` entries, aligned to the bottom edge
    pub fn tail(len: usize) -> Self {
        Self { index: len.saturating_sub(1), align: Align::End }
    }
}

/// How the viewport reacts to growth at the tail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FollowOutput {
    /// Track appended rows with stepped motion while pinned
    #[default]
    Smooth,
    Disabled,
}

/// Imperative capability the scroll policy drives
pub trait ScrollHandle {
    fn scroll_to_index(&mut self, target: ScrollTarget);

    fn set_follow_output(&mut self, follow: FollowOutput);

    fn scroll_to_end(&mut self, len: usize) {
        if len > 0 {
            self.scroll_to_index(ScrollTarget::tail(len));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        jumps: Vec<ScrollTarget>,
    }

    impl ScrollHandle for Recorder {
        fn scroll_to_index(&mut self, target: ScrollTarget) {
            self.jumps.push(target);
        }

        fn set_follow_output(&mut self, _follow: FollowOutput) {}
    }

    #[test]
    fn test_tail_target() {
        assert_eq!(ScrollTarget::tail(40), ScrollTarget::new(39, Align::End));
        assert_eq!(ScrollTarget::tail(0).index, 0);
    }

    #[test]
    fn test_scroll_to_end_skips_empty() {
        let mut handle = Recorder::default();
        handle.scroll_to_end(0);
        assert!(handle.jumps.is_empty());

        handle.scroll_to_end(3);
        assert_eq!(handle.jumps, vec![ScrollTarget::new(2, Align::End)]);
    }
}
