// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Progress counters and cancelable iteration.

use alloc::borrow::ToOwned;
use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;
use core::iter::{Empty, FusedIterator};
use core::ops::Range;

use crate::event::Observers;
use crate::{
    CancelHandle, CancelState, ProgressError, ProgressEvent, ProgressEvents, ProgressObserver,
};

/// Description used when none (or an empty one) is given.
pub const DEFAULT_DESCRIPTION: &str = "progress";

/// A [`Progress`] that is advanced by hand rather than by iteration.
pub type ManualProgress = Progress<Empty<()>>;

/// Tracks progress of a long-running task and lets it be canceled cooperatively.
///
/// A `Progress` either wraps an iterator, counting each item it yields, or is
/// driven manually with [`Progress::update`]. In both cases a
/// [`CancelHandle`] obtained from [`Progress::cancel_handle`] can request
/// cancellation from elsewhere (for example a UI thread).
///
/// Cancellation is cooperative: the item currently being processed always
/// finishes. At the next check point (the next call to `next`, or
/// [`Progress::should_stop`] for manual progress) the task stops, the
/// [`Progress::on_cancel`] callback runs exactly once, the wrapped iterator is
/// dropped, and iteration ends normally.
///
/// ```rust
/// use understory_progress::progress_range;
///
/// let mut work = progress_range(0..10).with_description("resampling");
/// let cancel = work.cancel_handle();
///
/// let mut done = 0;
/// for step in &mut work {
///     done += 1;
///     if step == 3 {
///         cancel.cancel();
///     }
/// }
/// assert_eq!(done, 4);
/// assert_eq!(work.n(), 4);
/// ```
pub struct Progress<I> {
    inner: Option<I>,
    n: usize,
    total: Option<usize>,
    description: String,
    cancel: CancelHandle,
    on_cancel: Option<Box<dyn FnOnce()>>,
    observers: Observers,
    closed: bool,
}

impl<I: Iterator> Progress<I> {
    /// Wraps an iterator.
    ///
    /// The total is taken from the iterator's size hint when it is exact.
    pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
        let iter = iter.into_iter();
        let total = match iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(lower),
            _ => None,
        };
        Self::from_parts(Some(iter), total)
    }
}

impl ManualProgress {
    /// Creates a progress value that is advanced with [`Progress::update`].
    #[must_use]
    pub fn manual(total: Option<usize>) -> Self {
        Self::from_parts(Some(core::iter::empty()), total)
    }
}

/// Shorthand for `Progress::new(range)`.
#[must_use]
pub fn progress_range(range: Range<usize>) -> Progress<Range<usize>> {
    Progress::new(range)
}

impl<I> Progress<I> {
    fn from_parts(inner: Option<I>, total: Option<usize>) -> Self {
        Self {
            inner,
            n: 0,
            total,
            description: DEFAULT_DESCRIPTION.to_owned(),
            cancel: CancelHandle::new(),
            on_cancel: None,
            observers: Observers::default(),
            closed: false,
        }
    }

    /// Returns this progress with the given description.
    #[must_use]
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = normalize(description);
        self
    }

    /// Returns this progress with the given total, overriding any size hint.
    #[must_use]
    pub fn with_total(mut self, total: Option<usize>) -> Self {
        self.total = total;
        self
    }

    /// Returns this progress with a callback that runs once if the task is canceled.
    #[must_use]
    pub fn on_cancel(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.on_cancel = Some(Box::new(callback));
        self
    }

    /// Subscribes an observer to the given event kinds.
    pub fn subscribe(&mut self, kinds: ProgressEvents, observer: impl ProgressObserver + 'static) {
        self.observers.subscribe(kinds, Box::new(observer));
    }

    /// Number of completed steps.
    #[must_use]
    pub const fn n(&self) -> usize {
        self.n
    }

    /// Expected number of steps, or `None` when indeterminate.
    #[must_use]
    pub const fn total(&self) -> Option<usize> {
        self.total
    }

    /// Completed fraction in `0.0..=1.0`, or `None` when the total is
    /// indeterminate or zero.
    #[must_use]
    pub fn fraction(&self) -> Option<f64> {
        match self.total {
            Some(total) if total > 0 => Some((self.n as f64 / total as f64).min(1.0)),
            _ => None,
        }
    }

    /// Current description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Sets the description; an empty one resets to [`DEFAULT_DESCRIPTION`].
    pub fn set_description(&mut self, description: &str) {
        self.description = normalize(description);
        self.observers.emit(&ProgressEvent::Description(&self.description));
    }

    /// Sets the expected total.
    pub fn set_total(&mut self, total: Option<usize>) {
        self.total = total;
        self.observers.emit(&ProgressEvent::Total(total));
    }

    /// Advances the counter by `step`.
    pub fn update(&mut self, step: usize) -> Result<(), ProgressError> {
        self.n = self
            .n
            .checked_add(step)
            .ok_or(ProgressError::Overflow { n: self.n, step })?;
        self.observers.emit(&ProgressEvent::Value(self.n));
        Ok(())
    }

    /// Advances the counter by one, unless it already reached the total.
    ///
    /// At the total, the total becomes indeterminate and an
    /// [`ProgressEvent::Overflow`] is emitted instead, so views can switch to a
    /// busy indicator when a task runs longer than expected.
    pub fn increment_with_overflow(&mut self) -> Result<(), ProgressError> {
        if self.total == Some(self.n) {
            tracing::trace!(n = self.n, "progress overflowed its total");
            self.set_total(None);
            self.observers.emit(&ProgressEvent::Overflow);
            Ok(())
        } else {
            self.update(1)
        }
    }

    /// Returns a handle that can request cancellation of this task.
    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Current cancellation state.
    #[must_use]
    pub fn cancel_state(&self) -> CancelState {
        self.cancel.state()
    }

    /// Check point for cancellation.
    ///
    /// Returns `true` if the task should stop. The first call that observes a
    /// cancellation request stops the task and runs the cancel callback.
    pub fn should_stop(&mut self) -> bool {
        match self.cancel.state() {
            CancelState::Running => false,
            CancelState::CancelRequested => {
                if self.cancel.acknowledge() {
                    self.stop();
                }
                true
            }
            CancelState::Stopped => true,
        }
    }

    fn stop(&mut self) {
        tracing::debug!(
            description = self.description.as_str(),
            n = self.n,
            "progress canceled"
        );
        self.inner = None;
        self.observers.emit(&ProgressEvent::Canceled);
        if let Some(callback) = self.on_cancel.take() {
            callback();
        }
    }

    /// Closes the progress, emitting [`ProgressEvent::Closed`] once.
    ///
    /// Dropping a `Progress` closes it.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        tracing::trace!(
            description = self.description.as_str(),
            n = self.n,
            "progress closed"
        );
        self.observers.emit(&ProgressEvent::Closed);
    }

    /// Returns `true` once [`Progress::close`] has run.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }
}

fn normalize(description: &str) -> String {
    if description.is_empty() {
        DEFAULT_DESCRIPTION.to_owned()
    } else {
        description.to_owned()
    }
}

impl<I: Iterator> Iterator for Progress<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        if self.should_stop() {
            return None;
        }
        let item = self.inner.as_mut()?.next()?;
        self.n = self.n.saturating_add(1);
        self.observers.emit(&ProgressEvent::Value(self.n));
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            // Cancellation may end iteration early.
            Some(inner) => (0, inner.size_hint().1),
            None => (0, Some(0)),
        }
    }
}

impl<I: FusedIterator> FusedIterator for Progress<I> {}

impl<I> Drop for Progress<I> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<I> fmt::Debug for Progress<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Progress")
            .field("description", &self.description)
            .field("n", &self.n)
            .field("total", &self.total)
            .field("cancel", &self.cancel.state())
            .field("observers", &self.observers.len())
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::{Cell, RefCell};

    fn record(progress: &mut Progress<impl Iterator>) -> Rc<RefCell<Vec<String>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        progress.subscribe(ProgressEvents::all(), move |event: &ProgressEvent<'_>| {
            sink.borrow_mut().push(alloc::format!("{event:?}"));
        });
        log
    }

    #[test]
    fn total_comes_from_exact_size_hint() {
        assert_eq!(progress_range(0..7).total(), Some(7));
        assert_eq!(Progress::new((0..7).filter(|i| i % 2 == 0)).total(), None);
        assert_eq!(ManualProgress::manual(Some(3)).total(), Some(3));
    }

    #[test]
    fn iteration_counts_items() {
        let mut work = progress_range(0..5);
        let log = record(&mut work);
        let items: Vec<_> = work.by_ref().collect();

        assert_eq!(items, [0, 1, 2, 3, 4]);
        assert_eq!(work.n(), 5);
        assert_eq!(work.fraction(), Some(1.0));
        assert_eq!(log.borrow().len(), 5);
        assert_eq!(log.borrow()[4], "Value(5)");
    }

    #[test]
    fn description_defaults_and_updates() {
        let mut work = ManualProgress::manual(None);
        assert_eq!(work.description(), DEFAULT_DESCRIPTION);
        let log = record(&mut work);

        work.set_description("loading layers");
        assert_eq!(work.description(), "loading layers");
        work.set_description("");
        assert_eq!(work.description(), DEFAULT_DESCRIPTION);
        assert_eq!(
            *log.borrow(),
            ["Description(\"loading layers\")", "Description(\"progress\")"]
        );
    }

    #[test]
    fn manual_updates_and_overflow() {
        let mut work = ManualProgress::manual(Some(2));
        let log = record(&mut work);

        work.increment_with_overflow().unwrap();
        work.increment_with_overflow().unwrap();
        assert_eq!(work.n(), 2);
        assert_eq!(work.total(), Some(2));

        // At the total: switch to indeterminate instead of counting.
        work.increment_with_overflow().unwrap();
        assert_eq!(work.n(), 2);
        assert_eq!(work.total(), None);
        assert_eq!(work.fraction(), None);
        assert_eq!(
            *log.borrow(),
            ["Value(1)", "Value(2)", "Total(None)", "Overflow"]
        );

        // Indeterminate progress keeps counting.
        work.increment_with_overflow().unwrap();
        assert_eq!(work.n(), 3);
    }

    #[test]
    fn update_reports_overflow() {
        let mut work = ManualProgress::manual(None);
        work.update(usize::MAX).unwrap();
        assert_eq!(
            work.update(1),
            Err(ProgressError::Overflow {
                n: usize::MAX,
                step: 1
            })
        );
        assert_eq!(work.n(), usize::MAX);
    }

    #[test]
    fn cancel_stops_after_current_item() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let mut work = progress_range(0..100).on_cancel(move || counter.set(counter.get() + 1));
        let handle = work.cancel_handle();

        let mut seen = Vec::new();
        for i in &mut work {
            seen.push(i);
            if i == 2 {
                handle.cancel();
            }
        }

        assert_eq!(seen, [0, 1, 2]);
        assert_eq!(work.n(), 3);
        assert_eq!(work.cancel_state(), CancelState::Stopped);
        assert_eq!(calls.get(), 1);

        // Further polling neither resumes nor re-runs the callback.
        assert_eq!(work.next(), None);
        assert!(work.should_stop());
        assert_eq!(calls.get(), 1);
        assert_eq!(work.size_hint(), (0, Some(0)));
    }

    #[test]
    fn cancel_before_start_yields_nothing() {
        let mut work = progress_range(0..3);
        let log = record(&mut work);
        assert!(work.cancel_handle().cancel());

        assert_eq!(work.next(), None);
        assert_eq!(work.n(), 0);
        assert_eq!(*log.borrow(), ["Canceled"]);
    }

    #[test]
    fn manual_tasks_poll_for_cancellation() {
        let canceled = Rc::new(Cell::new(false));
        let flag = canceled.clone();
        let mut work = ManualProgress::manual(Some(10)).on_cancel(move || flag.set(true));
        let handle = work.cancel_handle();

        let mut steps = 0;
        while !work.should_stop() {
            steps += 1;
            work.update(1).unwrap();
            if steps == 4 {
                handle.cancel();
            }
        }
        assert_eq!(steps, 4);
        assert!(canceled.get());
    }

    #[test]
    fn close_emits_once_and_on_drop() {
        let closes = Rc::new(Cell::new(0));
        {
            let mut work = progress_range(0..1);
            let counter = closes.clone();
            work.subscribe(ProgressEvents::CLOSED, move |_: &ProgressEvent<'_>| {
                counter.set(counter.get() + 1);
            });
            work.close();
            work.close();
            assert!(work.is_closed());
        }
        assert_eq!(closes.get(), 1);

        {
            let mut work = progress_range(0..1);
            let counter = closes.clone();
            work.subscribe(ProgressEvents::CLOSED, move |_: &ProgressEvent<'_>| {
                counter.set(counter.get() + 1);
            });
        }
        assert_eq!(closes.get(), 2);
    }
}
