// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid configuration: dimensions, stride, and the enabled flag.
//!
//! Every type here validates on construction, so a [`GridConfig`] that exists
//! is always usable by [`GridLayout`](crate::GridLayout).

use core::num::{NonZeroIsize, NonZeroUsize};

use crate::GridError;

/// One requested grid dimension: a fixed number of rows/columns, or auto.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "i64", into = "i64")
)]
pub enum Dim {
    /// Computed from the item count and the other dimension.
    #[default]
    Auto,
    /// Exactly this many rows or columns.
    Fixed(NonZeroUsize),
}

impl Dim {
    /// Raw value historically used to mean [`Dim::Auto`] in numeric configuration.
    pub const AUTO_SENTINEL: i64 = -1;

    /// Creates a fixed dimension, rejecting zero.
    pub fn fixed(size: usize) -> Result<Self, GridError> {
        NonZeroUsize::new(size)
            .map(Self::Fixed)
            .ok_or(GridError::InvalidDimension { value: 0 })
    }

    /// Parses a numeric dimension where `-1` means auto.
    ///
    /// Zero and negative values other than `-1` are rejected rather than coerced.
    pub fn from_raw(value: i64) -> Result<Self, GridError> {
        if value == Self::AUTO_SENTINEL {
            return Ok(Self::Auto);
        }
        usize::try_from(value)
            .ok()
            .and_then(NonZeroUsize::new)
            .map(Self::Fixed)
            .ok_or(GridError::InvalidDimension { value })
    }

    /// Returns the fixed size, or `None` for [`Dim::Auto`].
    #[must_use]
    pub const fn get(self) -> Option<usize> {
        match self {
            Self::Auto => None,
            Self::Fixed(n) => Some(n.get()),
        }
    }

    /// Returns `true` for [`Dim::Auto`].
    #[must_use]
    pub const fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }
}

impl TryFrom<i64> for Dim {
    type Error = GridError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_raw(value)
    }
}

impl From<Dim> for i64 {
    fn from(dim: Dim) -> Self {
        match dim {
            Dim::Auto => Dim::AUTO_SENTINEL,
            Dim::Fixed(n) => Self::try_from(n.get()).unwrap_or(Self::MAX),
        }
    }
}

/// Number of consecutive items sharing a cell, and the traversal direction.
///
/// The magnitude groups items: with a stride of `3`, items `0..3` share the
/// first cell, `3..6` the second, and so on. A negative stride walks the items
/// from last to first, so the last item lands in the first cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "isize", into = "isize")
)]
pub struct Stride(NonZeroIsize);

impl Stride {
    /// One item per cell, first item in the first cell.
    pub const FORWARD: Self = Self(NonZeroIsize::new(1).unwrap());
    /// One item per cell, last item in the first cell.
    pub const REVERSE: Self = Self(NonZeroIsize::new(-1).unwrap());

    /// Creates a stride, rejecting zero.
    pub fn new(stride: isize) -> Result<Self, GridError> {
        NonZeroIsize::new(stride).map(Self).ok_or(GridError::ZeroStride)
    }

    /// Returns the signed stride.
    #[must_use]
    pub const fn get(self) -> isize {
        self.0.get()
    }

    /// Number of consecutive items that share one cell.
    #[must_use]
    pub const fn magnitude(self) -> NonZeroUsize {
        self.0.unsigned_abs()
    }

    /// Returns `true` when items are traversed from last to first.
    #[must_use]
    pub const fn is_reversed(self) -> bool {
        self.0.is_negative()
    }
}

impl Default for Stride {
    fn default() -> Self {
        Self::FORWARD
    }
}

impl TryFrom<isize> for Stride {
    type Error = GridError;

    fn try_from(stride: isize) -> Result<Self, Self::Error> {
        Self::new(stride)
    }
}

impl From<Stride> for isize {
    fn from(stride: Stride) -> Self {
        stride.get()
    }
}

/// Requested grid shape as `rows × cols`, either of which may be auto.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridShape {
    /// Requested number of rows.
    pub rows: Dim,
    /// Requested number of columns.
    pub cols: Dim,
}

impl GridShape {
    /// Both dimensions auto: the grid is sized as close to square as possible.
    pub const AUTO: Self = Self {
        rows: Dim::Auto,
        cols: Dim::Auto,
    };

    /// Creates a shape from two dimensions.
    #[must_use]
    pub const fn new(rows: Dim, cols: Dim) -> Self {
        Self { rows, cols }
    }

    /// Parses a legacy `(rows, cols)` pair where `-1` means auto.
    pub fn from_raw((rows, cols): (i64, i64)) -> Result<Self, GridError> {
        Ok(Self {
            rows: Dim::from_raw(rows)?,
            cols: Dim::from_raw(cols)?,
        })
    }
}

/// Configuration for a [`GridLayout`](crate::GridLayout).
///
/// The default is a disabled grid with an auto shape and a stride of `1`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct GridConfig {
    /// When `false` every item shares a single cell.
    pub enabled: bool,
    /// Requested shape.
    pub shape: GridShape,
    /// Grouping and direction.
    pub stride: Stride,
}

impl GridConfig {
    /// Creates an enabled grid with an auto shape and a stride of `1`.
    #[must_use]
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    /// Validates a configuration given in its legacy numeric form.
    pub fn from_raw(enabled: bool, shape: (i64, i64), stride: isize) -> Result<Self, GridError> {
        Ok(Self {
            enabled,
            shape: GridShape::from_raw(shape)?,
            stride: Stride::new(stride)?,
        })
    }

    /// Returns this configuration with the given shape.
    #[must_use]
    pub const fn with_shape(mut self, shape: GridShape) -> Self {
        self.shape = shape;
        self
    }

    /// Returns this configuration with the given stride.
    #[must_use]
    pub const fn with_stride(mut self, stride: Stride) -> Self {
        self.stride = stride;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_a_fresh_canvas() {
        let config = GridConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.shape, GridShape::AUTO);
        assert_eq!(config.stride.get(), 1);
    }

    #[test]
    fn raw_shape_and_stride_are_kept() {
        let config = GridConfig::from_raw(false, (3, 4), 2).unwrap();
        assert_eq!(config.shape.rows.get(), Some(3));
        assert_eq!(config.shape.cols.get(), Some(4));
        assert_eq!(config.stride.get(), 2);
    }

    #[test]
    fn auto_sentinel_parses_to_auto() {
        assert_eq!(Dim::from_raw(-1), Ok(Dim::Auto));
        assert_eq!(i64::from(Dim::Auto), -1);
        assert_eq!(i64::from(Dim::fixed(7).unwrap()), 7);
    }

    #[test]
    fn invalid_dimensions_are_rejected() {
        assert_eq!(
            Dim::from_raw(0),
            Err(GridError::InvalidDimension { value: 0 })
        );
        assert_eq!(
            Dim::from_raw(-2),
            Err(GridError::InvalidDimension { value: -2 })
        );
        assert_eq!(Dim::fixed(0), Err(GridError::InvalidDimension { value: 0 }));
        assert!(GridConfig::from_raw(true, (2, -5), 1).is_err());
    }

    #[test]
    fn zero_stride_is_rejected() {
        assert_eq!(Stride::new(0), Err(GridError::ZeroStride));
        assert_eq!(
            GridConfig::from_raw(true, (-1, -1), 0),
            Err(GridError::ZeroStride)
        );
    }

    #[test]
    fn stride_sign_and_magnitude() {
        assert_eq!(Stride::FORWARD.get(), 1);
        assert_eq!(Stride::REVERSE.get(), -1);

        let stride = Stride::new(-3).unwrap();
        assert!(stride.is_reversed());
        assert_eq!(stride.magnitude().get(), 3);
        assert!(!Stride::new(3).unwrap().is_reversed());

        let extreme = Stride::new(isize::MIN).unwrap();
        assert_eq!(extreme.magnitude().get(), isize::MIN.unsigned_abs());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_uses_legacy_integers() {
        let config = GridConfig::from_raw(true, (-1, 4), -2).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(
            json,
            r#"{"enabled":true,"shape":{"rows":-1,"cols":4},"stride":-2}"#
        );
        let back: GridConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_rejects_invalid_values() {
        assert!(serde_json::from_str::<GridConfig>(r#"{"stride":0}"#).is_err());
        assert!(serde_json::from_str::<GridShape>(r#"{"rows":0,"cols":-1}"#).is_err());
        let partial: GridConfig = serde_json::from_str(r#"{"enabled":true}"#).unwrap();
        assert_eq!(partial, GridConfig::enabled());
    }
}
