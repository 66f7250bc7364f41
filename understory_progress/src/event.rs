// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Progress events and observers.

use alloc::boxed::Box;
use core::fmt;

use smallvec::SmallVec;

bitflags::bitflags! {
    /// Set of [`ProgressEvent`] kinds an observer is interested in.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ProgressEvents: u8 {
        /// [`ProgressEvent::Value`].
        const VALUE       = 0b0000_0001;
        /// [`ProgressEvent::Total`].
        const TOTAL       = 0b0000_0010;
        /// [`ProgressEvent::Description`].
        const DESCRIPTION = 0b0000_0100;
        /// [`ProgressEvent::Overflow`].
        const OVERFLOW    = 0b0000_1000;
        /// [`ProgressEvent::Canceled`].
        const CANCELED    = 0b0001_0000;
        /// [`ProgressEvent::Closed`].
        const CLOSED      = 0b0010_0000;
    }
}

/// A change to a [`Progress`](crate::Progress).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgressEvent<'a> {
    /// The counter changed to this value.
    Value(usize),
    /// The expected total changed; `None` means indeterminate.
    Total(Option<usize>),
    /// The description changed.
    Description(&'a str),
    /// The counter reached the total and the total became indeterminate.
    Overflow,
    /// The task observed a cancellation request and stopped.
    Canceled,
    /// The progress was closed.
    Closed,
}

impl ProgressEvent<'_> {
    /// The kind of this event, for matching against a subscription mask.
    #[must_use]
    pub const fn kind(&self) -> ProgressEvents {
        match self {
            Self::Value(_) => ProgressEvents::VALUE,
            Self::Total(_) => ProgressEvents::TOTAL,
            Self::Description(_) => ProgressEvents::DESCRIPTION,
            Self::Overflow => ProgressEvents::OVERFLOW,
            Self::Canceled => ProgressEvents::CANCELED,
            Self::Closed => ProgressEvents::CLOSED,
        }
    }
}

/// Receives [`ProgressEvent`]s.
///
/// Implemented for every `FnMut(&ProgressEvent<'_>)`.
pub trait ProgressObserver {
    /// Called for each event matching the observer's subscription.
    fn on_event(&mut self, event: &ProgressEvent<'_>);
}

impl<F: FnMut(&ProgressEvent<'_>)> ProgressObserver for F {
    fn on_event(&mut self, event: &ProgressEvent<'_>) {
        self(event);
    }
}

/// Subscribed observers, in subscription order.
#[derive(Default)]
pub(crate) struct Observers {
    // Most progress values have a registry and at most one view attached.
    entries: SmallVec<[(ProgressEvents, Box<dyn ProgressObserver>); 2]>,
}

impl Observers {
    pub(crate) fn subscribe(&mut self, kinds: ProgressEvents, observer: Box<dyn ProgressObserver>) {
        self.entries.push((kinds, observer));
    }

    pub(crate) fn emit(&mut self, event: &ProgressEvent<'_>) {
        let kind = event.kind();
        for (kinds, observer) in &mut self.entries {
            if kinds.contains(kind) {
                observer.on_event(event);
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}
