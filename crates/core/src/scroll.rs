//! Infinite-scroll trigger.
//!
//! Turns a stream of "sentinel is visible" signals into at most one
//! load-more request per visibility window. Debouncing is done by the
//! state machine, not by time: while a load is pending every further
//! signal is ignored.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerState {
    Idle,
    Pending,
}

/// What the consumer should do in response to a visibility signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerAction {
    /// Request the next page now.
    LoadMore,
    Ignore,
}

/// Scroll-sentinel state machine for one query key.
///
/// Once a settle reports `has_more == false` the trigger is exhausted and
/// stays silent until [`ScrollTrigger::reset`] is called for a new key.
#[derive(Debug, Clone)]
pub struct ScrollTrigger {
    state: TriggerState,
    exhausted: bool,
}

impl ScrollTrigger {
    pub fn new() -> Self {
        Self {
            state: TriggerState::Idle,
            exhausted: false,
        }
    }

    pub fn state(&self) -> TriggerState {
        self.state
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Feed one visibility signal.
    ///
    /// Moves Idle -> Pending (and returns [`TriggerAction::LoadMore`]) only
    /// when the sentinel is visible, nothing is loading and more pages
    /// exist.
    pub fn observe(&mut self, visible: bool, loading: bool, has_more: bool) -> TriggerAction {
        if !has_more {
            self.exhausted = true;
        }
        if self.exhausted || self.state == TriggerState::Pending {
            return TriggerAction::Ignore;
        }
        if visible && !loading {
            self.state = TriggerState::Pending;
            return TriggerAction::LoadMore;
        }
        TriggerAction::Ignore
    }

    /// The fetch started by the last [`TriggerAction::LoadMore`] finished,
    /// successfully or not.
    pub fn settle(&mut self, has_more: bool) {
        self.state = TriggerState::Idle;
        if !has_more {
            self.exhausted = true;
        }
    }

    /// Start over for a new query key.
    pub fn reset(&mut self) {
        self.state = TriggerState::Idle;
        self.exhausted = false;
    }
}

impl Default for ScrollTrigger {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
