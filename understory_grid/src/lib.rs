// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Grid: integer grid layout for stacks of layers.
//!
//! Viewers that can show several layers side by side need to decide, for a
//! given number of layers, how large the grid is and which cell each layer
//! goes in. This crate answers exactly those two questions and nothing else:
//!
//! - [`GridLayout::effective_shape`] resolves the grid's rows and columns and
//!   the number of cells the items occupy.
//! - [`GridLayout::position`] returns the [`Cell`] of one item.
//! - [`GridLayout::placements`] yields the cells of every item for a full
//!   layout pass.
//!
//! The layout is configured with a [`GridConfig`]:
//!
//! - `enabled`: when `false`, every item shares a single cell.
//! - `shape`: requested rows and columns, each a fixed size or [`Dim::Auto`].
//!   With both auto the grid is as close to square as possible, preferring
//!   extra columns over extra rows.
//! - `stride`: a non-zero [`Stride`]. Its magnitude is how many consecutive
//!   items share a cell; a negative stride places the last item first.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_grid::{Cell, GridConfig, GridLayout, Stride};
//!
//! // Seven layers, two per cell.
//! let config = GridConfig::enabled().with_stride(Stride::new(2)?);
//! let layout = GridLayout::new(config);
//!
//! let extent = layout.effective_shape(7);
//! assert_eq!(extent.shape(), (2, 2));
//! assert_eq!(extent.occupied, 4);
//!
//! assert_eq!(layout.position(1, 7)?, Cell::new(0, 0));
//! assert_eq!(layout.position(6, 7)?, Cell::new(1, 1));
//! # Ok::<(), understory_grid::GridError>(())
//! ```
//!
//! ## Not a renderer
//!
//! Results are integer rows and columns. Mapping cells to pixels, drawing, and
//! notifying observers when the configuration changes are left to the host,
//! which owns the configuration and re-queries after each change.
//!
//! ## Errors
//!
//! Invalid configuration (a zero stride, a zero or negative fixed dimension)
//! is rejected when it is constructed, see [`GridError`]. Asking for the
//! position of an index outside `0..item_count` is reported as
//! [`GridError::IndexOutOfRange`] rather than answered with a wrapped cell.
//!
//! ## Features
//!
//! - `serde`: (de)serialize configuration in its legacy numeric form, where a
//!   dimension of `-1` means auto. Invalid values fail to deserialize.
//!
//! ## Logging
//!
//! Extent resolution emits `tracing` events at `trace` level, and at `debug`
//! level when a fully fixed shape is too small and placement wraps around.
//!
//! This crate is `no_std`.

#![no_std]

mod config;
mod error;
mod layout;
mod util;

pub use config::{Dim, GridConfig, GridShape, Stride};
pub use error::GridError;
pub use layout::{Cell, GridExtent, GridLayout, Placements};
