// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A registry of live progress values, for activity views.

use alloc::rc::{Rc, Weak};
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use hashbrown::HashMap;

use crate::{Progress, ProgressEvent, ProgressEvents, ProgressObserver};

/// Identifier of a tracked progress value within one [`ProgressRegistry`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgressId(u64);

/// Last known state of a tracked progress value.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressSnapshot {
    /// Current description.
    pub description: String,
    /// Completed steps.
    pub n: usize,
    /// Expected total, `None` when indeterminate.
    pub total: Option<usize>,
    /// Whether the task was canceled.
    pub canceled: bool,
}

#[derive(Debug, Default)]
struct RegistryInner {
    next_id: u64,
    entries: HashMap<ProgressId, ProgressSnapshot>,
}

/// Tracks live [`Progress`] values so a view can list them.
///
/// The registry is explicit rather than global: create one per application
/// (or per window) and [`track`](Self::track) each progress value that should
/// be shown. Entries update as the progress emits events and disappear when it
/// is closed or dropped. Clones share the same entries.
///
/// The registry is single-threaded; progress values it tracks stay on the
/// thread that owns it. Cancellation can still come from any thread through a
/// [`CancelHandle`](crate::CancelHandle).
///
/// ```rust
/// use understory_progress::{ProgressRegistry, progress_range};
///
/// let registry = ProgressRegistry::new();
/// let mut work = progress_range(0..4).with_description("loading");
/// let id = registry.track(&mut work);
///
/// work.next();
/// assert_eq!(registry.get(id).unwrap().n, 1);
///
/// drop(work);
/// assert!(registry.is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct ProgressRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl ProgressRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking `progress` and returns its id.
    pub fn track<I>(&self, progress: &mut Progress<I>) -> ProgressId {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = ProgressId(inner.next_id);
            inner.next_id += 1;
            inner.entries.insert(
                id,
                ProgressSnapshot {
                    description: progress.description().into(),
                    n: progress.n(),
                    total: progress.total(),
                    canceled: progress.cancel_handle().is_canceled(),
                },
            );
            id
        };
        progress.subscribe(
            ProgressEvents::all(),
            Tracker {
                id,
                registry: Rc::downgrade(&self.inner),
            },
        );
        id
    }

    /// Returns the snapshot of a tracked progress value.
    #[must_use]
    pub fn get(&self, id: ProgressId) -> Option<ProgressSnapshot> {
        self.inner.borrow().entries.get(&id).cloned()
    }

    /// Returns all live entries, oldest first.
    #[must_use]
    pub fn active(&self) -> Vec<(ProgressId, ProgressSnapshot)> {
        let inner = self.inner.borrow();
        let mut entries: Vec<_> = inner
            .entries
            .iter()
            .map(|(id, snapshot)| (*id, snapshot.clone()))
            .collect();
        entries.sort_unstable_by_key(|(id, _)| *id);
        entries
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Returns `true` if nothing is being tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Observer that mirrors one progress value into the registry.
struct Tracker {
    id: ProgressId,
    registry: Weak<RefCell<RegistryInner>>,
}

impl ProgressObserver for Tracker {
    fn on_event(&mut self, event: &ProgressEvent<'_>) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut inner = registry.borrow_mut();
        if let ProgressEvent::Closed = event {
            inner.entries.remove(&self.id);
            return;
        }
        let Some(entry) = inner.entries.get_mut(&self.id) else {
            return;
        };
        match *event {
            ProgressEvent::Value(n) => entry.n = n,
            ProgressEvent::Total(total) => entry.total = total,
            ProgressEvent::Description(description) => {
                entry.description.clear();
                entry.description.push_str(description);
            }
            ProgressEvent::Canceled => entry.canceled = true,
            ProgressEvent::Overflow | ProgressEvent::Closed => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ManualProgress, progress_range};

    #[test]
    fn snapshots_follow_events() {
        let registry = ProgressRegistry::new();
        let mut work = ManualProgress::manual(Some(1));
        let id = registry.track(&mut work);

        let snapshot = registry.get(id).unwrap();
        assert_eq!(snapshot.description, "progress");
        assert_eq!(snapshot.n, 0);
        assert_eq!(snapshot.total, Some(1));
        assert!(!snapshot.canceled);

        work.set_description("segmenting");
        work.increment_with_overflow().unwrap();
        work.increment_with_overflow().unwrap();

        let snapshot = registry.get(id).unwrap();
        assert_eq!(snapshot.description, "segmenting");
        assert_eq!(snapshot.n, 1);
        assert_eq!(snapshot.total, None);
    }

    #[test]
    fn active_lists_in_tracking_order() {
        let registry = ProgressRegistry::new();
        let mut a = progress_range(0..2).with_description("a");
        let mut b = progress_range(0..2).with_description("b");
        let id_b = registry.track(&mut b);
        let id_a = registry.track(&mut a);

        let active = registry.active();
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].0, id_b);
        assert_eq!(active[0].1.description, "b");
        assert_eq!(active[1].0, id_a);

        b.close();
        assert_eq!(registry.len(), 1);
        assert!(registry.get(id_b).is_none());
        drop(a);
        assert!(registry.is_empty());
    }

    #[test]
    fn cancellation_is_recorded() {
        let registry = ProgressRegistry::new();
        let mut work = progress_range(0..10);
        let id = registry.track(&mut work);

        work.next();
        work.cancel_handle().cancel();
        assert_eq!(work.next(), None);

        let snapshot = registry.get(id).unwrap();
        assert!(snapshot.canceled);
        assert_eq!(snapshot.n, 1);
    }

    #[test]
    fn dropping_the_registry_detaches_trackers() {
        let registry = ProgressRegistry::new();
        let mut work = progress_range(0..3);
        registry.track(&mut work);
        drop(registry);

        assert_eq!(work.next(), Some(0));
        work.close();
    }
}
