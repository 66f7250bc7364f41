// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The grid layout engine: effective shape and per-item placement.
//!
//! A [`GridLayout`] maps a flat sequence of `item_count` items onto a grid of
//! cells. Cells are filled row-major: cell `k` is at row `k / cols` and column
//! `k % cols`. Items are grouped `|stride|` at a time into consecutive cells,
//! walking from the first item (positive stride) or the last (negative stride).
//!
//! When the configured shape holds fewer cells than the items need, placement
//! wraps around and reuses cells from the start. [`GridExtent::wraps`] reports
//! this case.

use core::iter::FusedIterator;

use crate::util::isqrt_ceil;
use crate::{Dim, GridConfig, GridError, GridShape, Stride};

/// Resolved grid dimensions for a given item count.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GridExtent {
    /// Number of rows; always at least `1`.
    pub rows: usize,
    /// Number of columns; always at least `1`.
    pub cols: usize,
    /// Number of cells the items need: `ceil(item_count / |stride|)`, or `0`
    /// when the grid is disabled or empty.
    pub occupied: usize,
}

impl GridExtent {
    /// The extent of a disabled or empty grid: one cell, nothing in it.
    pub const SINGLE: Self = Self {
        rows: 1,
        cols: 1,
        occupied: 0,
    };

    /// Returns `(rows, cols)`.
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Total number of cells, `rows * cols`, saturating at `usize::MAX`.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    /// Returns `true` if the items need more cells than the grid has, in which
    /// case later items share cells with earlier ones.
    #[must_use]
    pub const fn wraps(&self) -> bool {
        self.occupied > self.cell_count()
    }
}

/// A grid cell, addressed by zero-based row and column.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    /// Zero-based row.
    pub row: usize,
    /// Zero-based column.
    pub col: usize,
}

impl Cell {
    /// The top-left cell.
    pub const ORIGIN: Self = Self { row: 0, col: 0 };

    /// Creates a cell.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<Cell> for (usize, usize) {
    fn from(cell: Cell) -> Self {
        (cell.row, cell.col)
    }
}

/// Lays out a sequence of items on a grid.
///
/// The layout holds only its [`GridConfig`]; every query is a pure function of
/// that configuration and its arguments. Owners change the configuration
/// between layout passes with the setters and re-query.
///
/// ```rust
/// use understory_grid::{Cell, GridConfig, GridLayout};
///
/// let layout = GridLayout::new(GridConfig::enabled());
///
/// // Five items fit a 2 × 3 grid.
/// let extent = layout.effective_shape(5);
/// assert_eq!(extent.shape(), (2, 3));
/// assert_eq!(extent.occupied, 5);
///
/// // The fourth item starts the second row.
/// assert_eq!(layout.position(3, 5), Ok(Cell::new(1, 0)));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct GridLayout {
    config: GridConfig,
}

impl GridLayout {
    /// Creates a layout from a validated configuration.
    #[must_use]
    pub const fn new(config: GridConfig) -> Self {
        Self { config }
    }

    /// Returns the current configuration.
    #[must_use]
    pub const fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Enables or disables the grid.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    /// Sets the requested shape.
    pub fn set_shape(&mut self, shape: GridShape) {
        self.config.shape = shape;
    }

    /// Sets the stride.
    pub fn set_stride(&mut self, stride: Stride) {
        self.config.stride = stride;
    }

    /// Resolves the grid dimensions for `item_count` items.
    ///
    /// - Disabled or empty grids are a single empty cell.
    /// - With both dimensions auto, columns are `ceil(sqrt(cells))` and rows
    ///   cover the rest, so non-square counts get more columns than rows.
    /// - With one dimension fixed, the other is just large enough for all cells.
    /// - With both fixed, the shape is used as given even if it is too small.
    #[must_use]
    pub fn effective_shape(&self, item_count: usize) -> GridExtent {
        let GridConfig {
            enabled,
            shape,
            stride,
        } = self.config;
        if !enabled || item_count == 0 {
            return GridExtent::SINGLE;
        }

        let occupied = item_count.div_ceil(stride.magnitude().get());
        let (rows, cols) = match (shape.rows, shape.cols) {
            (Dim::Auto, Dim::Auto) => {
                let cols = isqrt_ceil(occupied);
                (occupied.div_ceil(cols), cols)
            }
            (Dim::Auto, Dim::Fixed(cols)) => (occupied.div_ceil(cols.get()), cols.get()),
            (Dim::Fixed(rows), Dim::Auto) => (rows.get(), occupied.div_ceil(rows.get())),
            (Dim::Fixed(rows), Dim::Fixed(cols)) => (rows.get(), cols.get()),
        };

        let extent = GridExtent {
            rows: rows.max(1),
            cols: cols.max(1),
            occupied,
        };
        tracing::trace!(
            item_count,
            rows = extent.rows,
            cols = extent.cols,
            occupied,
            "resolved grid extent"
        );
        if extent.wraps() {
            tracing::debug!(
                item_count,
                rows = extent.rows,
                cols = extent.cols,
                occupied,
                "fixed grid shape is smaller than the occupied cells; placement wraps"
            );
        }
        extent
    }

    /// Returns the cell of the item at `index` among `item_count` items.
    ///
    /// Fails with [`GridError::IndexOutOfRange`] unless `index < item_count`.
    /// A disabled grid places every item at [`Cell::ORIGIN`].
    pub fn position(&self, index: usize, item_count: usize) -> Result<Cell, GridError> {
        if index >= item_count {
            return Err(GridError::IndexOutOfRange { index, item_count });
        }
        if !self.config.enabled {
            return Ok(Cell::ORIGIN);
        }
        let extent = self.effective_shape(item_count);
        Ok(place(self.config.stride, &extent, index, item_count))
    }

    /// Returns the cells of all items `0..item_count`, in index order.
    ///
    /// The extent is resolved once up front; this is the usual entry point for a
    /// layout pass that places every item.
    #[must_use]
    pub fn placements(&self, item_count: usize) -> Placements {
        Placements {
            enabled: self.config.enabled,
            stride: self.config.stride,
            extent: self.effective_shape(item_count),
            item_count,
            next: 0,
        }
    }
}

impl From<GridConfig> for GridLayout {
    fn from(config: GridConfig) -> Self {
        Self::new(config)
    }
}

/// Maps an in-range index of an enabled grid onto its cell.
fn place(stride: Stride, extent: &GridExtent, index: usize, item_count: usize) -> Cell {
    debug_assert!(
        index < item_count,
        "grid placement index out of range: index={index}, item_count={item_count}"
    );
    let step = if stride.is_reversed() {
        item_count - index - 1
    } else {
        index
    };
    let cell = (step / stride.magnitude().get()) % extent.cell_count();
    Cell {
        row: cell / extent.cols,
        col: cell % extent.cols,
    }
}

/// Iterator over the cells of every item in a layout pass.
///
/// Returned by [`GridLayout::placements`].
#[derive(Clone, Debug)]
pub struct Placements {
    enabled: bool,
    stride: Stride,
    extent: GridExtent,
    item_count: usize,
    next: usize,
}

impl Placements {
    /// The extent every yielded cell lies within.
    #[must_use]
    pub const fn extent(&self) -> &GridExtent {
        &self.extent
    }
}

impl Iterator for Placements {
    type Item = Cell;

    fn next(&mut self) -> Option<Cell> {
        if self.next >= self.item_count {
            return None;
        }
        let index = self.next;
        self.next += 1;
        if !self.enabled {
            return Some(Cell::ORIGIN);
        }
        Some(place(self.stride, &self.extent, index, self.item_count))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.item_count - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Placements {}

impl FusedIterator for Placements {}
