// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by grid configuration and placement.

/// Errors produced when configuring a grid or querying a placement.
///
/// Configuration variants are returned when a value is constructed, so an
/// invalid grid never reaches a layout pass. [`GridError::IndexOutOfRange`] is
/// the only error a well-configured [`GridLayout`](crate::GridLayout) can
/// report, and it always indicates a caller bug.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum GridError {
    /// A stride of zero was requested.
    #[error("grid stride must be non-zero")]
    ZeroStride,
    /// A dimension was neither positive nor the auto sentinel (`-1`).
    #[error("invalid grid dimension {value}: expected a positive size or -1 for auto")]
    InvalidDimension {
        /// The rejected raw value.
        value: i64,
    },
    /// An item index was not in `0..item_count`.
    #[error("item index {index} is out of range for {item_count} items")]
    IndexOutOfRange {
        /// The requested item index.
        index: usize,
        /// The number of items being laid out.
        item_count: usize,
    },
}
