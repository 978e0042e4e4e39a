// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The validated axis-aligned box value type.

use crate::error::GeometryError;
use crate::ratio::SplitRatio;
use crate::relation::{self, Axis, Relation};
use crate::split::{self, Quadrants};

/// Axis-aligned bounding box in 2D, stored as origin and size.
///
/// Covers `[x, x + width] × [y, y + height]`. The y axis grows downward, so `y` is the
/// top edge and [`bottom`](Self::bottom) the bottom edge.
///
/// All four fields are finite and the extents are non-negative; the only way to get an
/// `Aabb` is through [`Aabb::new`] (or [`Aabb::ZERO`]), which enforces this.
/// Equality is exact, field by field.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawAabb"))]
pub struct Aabb {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Aabb {
    /// The empty box at the origin.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Create a box from its top-left corner and size.
    ///
    /// Fails if any value is NaN or infinite, or if `width` or `height` is negative.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Result<Self, GeometryError> {
        finite("x", x)?;
        finite("y", y)?;
        extent("width", width)?;
        extent("height", height)?;
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// Left edge.
    #[inline]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// Top edge.
    #[inline]
    pub const fn y(&self) -> f64 {
        self.y
    }

    /// Horizontal extent.
    #[inline]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Vertical extent.
    #[inline]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Right edge, `x + width`.
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge, `y + height`.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Area covered by the box.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Origin and length of the box along one axis.
    #[inline]
    pub(crate) const fn span(&self, axis: Axis) -> (f64, f64) {
        match axis {
            Axis::X => (self.x, self.width),
            Axis::Y => (self.y, self.height),
        }
    }

    /// Build a box whose fields are already known to be valid.
    pub(crate) const fn from_parts_unchecked(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Relation of `self` to `other` along one axis.
    pub fn relation(&self, axis: Axis, other: &Self) -> Relation {
        relation::relation(axis, self, other)
    }

    /// True if `self` strictly encloses `other` on both axes.
    pub fn encloses(&self, other: &Self) -> bool {
        relation::is_enclosing(self, other)
    }

    /// True if `other` strictly encloses `self` on both axes.
    pub fn is_enclosed_by(&self, other: &Self) -> bool {
        relation::is_enclosed_by(self, other)
    }

    /// True if the two boxes share at least one point.
    pub fn intersects(&self, other: &Self) -> bool {
        relation::is_intersecting(self, other)
    }

    /// True if the two boxes are separated on at least one axis.
    pub fn is_out_of_bounds(&self, other: &Self) -> bool {
        relation::is_out_of_bounds(self, other)
    }

    /// Whether `other` lies inside `self`, edges included.
    ///
    /// This is the non-strict counterpart of [`encloses`](Self::encloses).
    pub fn contains(&self, other: &Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Cut the box into four quadrants at `ratio`.
    ///
    /// See [`split`](crate::split()).
    pub fn split(&self, ratio: SplitRatio) -> Quadrants {
        split::split(self, ratio)
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), GeometryError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(GeometryError::NonFinite { field, value })
    }
}

fn extent(field: &'static str, value: f64) -> Result<(), GeometryError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(GeometryError::NegativeExtent { field, value });
    }
    Ok(())
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawAabb {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawAabb> for Aabb {
    type Error = GeometryError;

    fn try_from(raw: RawAabb) -> Result<Self, Self::Error> {
        Self::new(raw.x, raw.y, raw.width, raw.height)
    }
}

#[cfg(feature = "kurbo")]
impl From<Aabb> for kurbo::Rect {
    fn from(b: Aabb) -> Self {
        Self::new(b.x, b.y, b.right(), b.bottom())
    }
}

#[cfg(feature = "kurbo")]
impl TryFrom<kurbo::Rect> for Aabb {
    type Error = GeometryError;

    /// Converts a Kurbo rectangle, normalizing inverted corners first.
    fn try_from(rect: kurbo::Rect) -> Result<Self, Self::Error> {
        let r = rect.abs();
        Self::new(r.x0, r.y0, r.width(), r.height())
    }
}
