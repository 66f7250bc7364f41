// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cooperative cancellation state shared between a task and its canceller.

use alloc::sync::Arc;
use core::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle of a cancelable task.
///
/// Transitions only move forward:
/// `Running` → `CancelRequested` (any [`CancelHandle::cancel`] call) →
/// `Stopped` (the task observes the request at its next check point).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CancelState {
    /// No cancellation has been requested.
    Running = 0,
    /// Cancellation was requested but the task has not reached a check point yet.
    CancelRequested = 1,
    /// The task observed the request and stopped.
    Stopped = 2,
}

impl CancelState {
    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Running,
            1 => Self::CancelRequested,
            _ => Self::Stopped,
        }
    }
}

/// Shared handle used to request cancellation of a task.
///
/// Handles are cheap to clone and may be sent to other threads; every clone
/// refers to the same task.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    state: Arc<AtomicU8>,
}

impl CancelHandle {
    /// Creates a handle in the [`CancelState::Running`] state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    ///
    /// Returns `true` if this call made the request, `false` if cancellation
    /// was already requested or the task has stopped.
    pub fn cancel(&self) -> bool {
        let requested = self.transition(CancelState::Running, CancelState::CancelRequested);
        if requested {
            tracing::debug!("cancellation requested");
        }
        requested
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> CancelState {
        CancelState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Returns `true` once cancellation has been requested, whether or not the
    /// task has stopped yet.
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        self.state() != CancelState::Running
    }

    /// Moves `CancelRequested` → `Stopped`; `true` only for the call that did it.
    pub(crate) fn acknowledge(&self) -> bool {
        self.transition(CancelState::CancelRequested, CancelState::Stopped)
    }

    fn transition(&self, from: CancelState, to: CancelState) -> bool {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::{CancelHandle, CancelState};

    #[test]
    fn starts_running() {
        let handle = CancelHandle::new();
        assert_eq!(handle.state(), CancelState::Running);
        assert!(!handle.is_canceled());
    }

    #[test]
    fn cancel_is_idempotent() {
        let handle = CancelHandle::new();
        assert!(handle.cancel());
        assert!(!handle.cancel());
        assert_eq!(handle.state(), CancelState::CancelRequested);
        assert!(handle.is_canceled());
    }

    #[test]
    fn acknowledge_happens_once() {
        let handle = CancelHandle::new();
        assert!(!handle.acknowledge());

        handle.cancel();
        let clone = handle.clone();
        assert!(clone.acknowledge());
        assert!(!handle.acknowledge());
        assert_eq!(handle.state(), CancelState::Stopped);

        // A stopped task cannot be re-requested.
        assert!(!handle.cancel());
        assert_eq!(clone.state(), CancelState::Stopped);
    }
}
