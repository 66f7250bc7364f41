// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Progress: progress tracking and cooperative cancellation.
//!
//! Long-running work in a viewer (loading, resampling, segmenting) should
//! report how far along it is and stop promptly when the user cancels. This
//! crate provides the renderer-agnostic core for that:
//!
//! - [`Progress`]: wraps an iterator (or is advanced by hand) and counts
//!   completed steps against an optional total.
//! - [`CancelHandle`] / [`CancelState`]: a shared, thread-safe cancellation
//!   flag with an explicit `Running → CancelRequested → Stopped` lifecycle.
//! - [`ProgressEvent`] / [`ProgressObserver`]: change notifications, filtered by
//!   a [`ProgressEvents`] mask.
//! - [`ProgressRegistry`]: an explicit list of live progress values for an
//!   activity view.
//!
//! Cancellation never unwinds. A canceled [`Progress`] finishes the current
//! step, then ends iteration normally and runs its cancel callback once.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_progress::{ProgressEvent, ProgressEvents, progress_range};
//!
//! let mut work = progress_range(0..3).with_description("loading layers");
//! work.subscribe(ProgressEvents::VALUE, |event: &ProgressEvent<'_>| {
//!     if let ProgressEvent::Value(n) = event {
//!         // Update a progress bar with `n`.
//!         let _ = n;
//!     }
//! });
//!
//! let loaded: Vec<_> = work.by_ref().collect();
//! assert_eq!(loaded.len(), 3);
//! assert_eq!(work.fraction(), Some(1.0));
//! ```
//!
//! This crate does not render progress bars or compute time estimates; hosts
//! observe events and draw whatever they like.
//!
//! ## Logging
//!
//! Cancellation requests and stops are logged with `tracing` at `debug`
//! level; overflow and close at `trace` level.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod cancel;
mod error;
mod event;
mod progress;
mod registry;

pub use cancel::{CancelHandle, CancelState};
pub use error::ProgressError;
pub use event::{ProgressEvent, ProgressEvents, ProgressObserver};
pub use progress::{DEFAULT_DESCRIPTION, ManualProgress, Progress, progress_range};
pub use registry::{ProgressId, ProgressRegistry, ProgressSnapshot};
