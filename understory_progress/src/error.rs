// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Errors reported when updating a progress counter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ProgressError {
    /// Advancing the counter would exceed `usize::MAX`.
    #[error("progress counter overflow: {n} + {step}")]
    Overflow {
        /// Counter value before the update.
        n: usize,
        /// Requested increment.
        step: usize,
    },
}
