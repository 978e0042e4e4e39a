// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-axis split positions.

use core::fmt;

use crate::error::GeometryError;
use crate::relation::Axis;

/// Where a box is cut along each axis, as a percentage of its extent.
///
/// Both components lie in `[0, 100]`. `(50, 50)` is the classic quadtree midpoint split;
/// `(25, 50)` places the vertical cut a quarter of the way across.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawSplitRatio"))]
pub struct SplitRatio {
    x: f64,
    y: f64,
}

impl Default for SplitRatio {
    fn default() -> Self {
        Self::HALF
    }
}

impl SplitRatio {
    /// Midpoint split on both axes.
    pub const HALF: Self = Self { x: 50.0, y: 50.0 };

    /// Create a ratio from per-axis percentages.
    pub fn new(x: f64, y: f64) -> Result<Self, GeometryError> {
        percent(Axis::X, x)?;
        percent(Axis::Y, y)?;
        Ok(Self { x, y })
    }

    /// Horizontal cut position in percent.
    #[inline]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// Vertical cut position in percent.
    #[inline]
    pub const fn y(&self) -> f64 {
        self.y
    }

    /// Fraction in `[0, 1]` for one axis.
    #[inline]
    pub fn fraction(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x / 100.0,
            Axis::Y => self.y / 100.0,
        }
    }
}

impl fmt::Display for SplitRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}%, {}%)", self.x, self.y)
    }
}

fn percent(axis: Axis, value: f64) -> Result<(), GeometryError> {
    // NaN fails the range check.
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(GeometryError::RatioOutOfRange { axis, value })
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawSplitRatio {
    #[serde(default = "half")]
    x: f64,
    #[serde(default = "half")]
    y: f64,
}

#[cfg(feature = "serde")]
fn half() -> f64 {
    50.0
}

#[cfg(feature = "serde")]
impl TryFrom<RawSplitRatio> for SplitRatio {
    type Error = GeometryError;

    fn try_from(raw: RawSplitRatio) -> Result<Self, Self::Error> {
        Self::new(raw.x, raw.y)
    }
}
