// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadrant naming and the ratio-driven four-way split.

use core::fmt;

use crate::aabb::Aabb;
use crate::ratio::SplitRatio;
use crate::relation::Axis;

/// One of the four children of a split box, named by compass direction.
///
/// North is toward smaller `y` (the y axis grows downward).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Quadrant {
    /// High x, low y.
    Ne,
    /// High x, high y.
    Se,
    /// Low x, high y.
    Sw,
    /// Low x, low y.
    Nw,
}

impl Quadrant {
    /// All quadrants in canonical order: clockwise from north-east.
    ///
    /// Every traversal and every "first child that fits" search uses this order.
    pub const ALL: [Self; 4] = [Self::Ne, Self::Se, Self::Sw, Self::Nw];

    /// Position of this quadrant in [`Quadrant::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::Ne => 0,
            Self::Se => 1,
            Self::Sw => 2,
            Self::Nw => 3,
        }
    }

    /// Upper-case compass label (`"NE"`, `"SE"`, `"SW"`, `"NW"`).
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ne => "NE",
            Self::Se => "SE",
            Self::Sw => "SW",
            Self::Nw => "NW",
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The four boxes produced by [`split`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Quadrants {
    /// High x, low y.
    pub ne: Aabb,
    /// Low x, low y.
    pub nw: Aabb,
    /// Low x, high y.
    pub sw: Aabb,
    /// High x, high y.
    pub se: Aabb,
}

impl Quadrants {
    /// The box for one quadrant.
    pub const fn get(&self, quadrant: Quadrant) -> Aabb {
        match quadrant {
            Quadrant::Ne => self.ne,
            Quadrant::Se => self.se,
            Quadrant::Sw => self.sw,
            Quadrant::Nw => self.nw,
        }
    }

    /// The boxes in [`Quadrant::ALL`] order.
    pub const fn to_array(&self) -> [Aabb; 4] {
        [self.ne, self.se, self.sw, self.nw]
    }
}

/// Cut `reference` into four boxes that tile it exactly.
///
/// The vertical cut sits at `x + width * ratio.x / 100` and the horizontal cut at
/// `y + height * ratio.y / 100`. The far-side extents run from the cut to the parent's
/// far edge and never reach past it; they land on it exactly whenever that edge is
/// reachable from the cut in `f64`. A ratio of `0` or `100` produces zero-extent
/// quadrants on that axis.
pub fn split(reference: &Aabb, ratio: SplitRatio) -> Quadrants {
    let (x, near_w, far_w) = cut(reference, ratio, Axis::X);
    let (y, near_h, far_h) = cut(reference, ratio, Axis::Y);
    let (split_x, split_y) = (x + near_w, y + near_h);

    Quadrants {
        ne: Aabb::from_parts_unchecked(split_x, y, far_w, near_h),
        nw: Aabb::from_parts_unchecked(x, y, near_w, near_h),
        sw: Aabb::from_parts_unchecked(x, split_y, near_w, far_h),
        se: Aabb::from_parts_unchecked(split_x, split_y, far_w, far_h),
    }
}

/// Origin, near extent and far extent of one axis.
fn cut(reference: &Aabb, ratio: SplitRatio, axis: Axis) -> (f64, f64, f64) {
    let (origin, len) = reference.span(axis);
    let near = (len * ratio.fraction(axis)).clamp(0.0, len);
    (origin, near, far_extent(origin + near, origin + len))
}

/// Extent reaching from `start` to `end`, with `start + extent <= end`.
///
/// `end - start` alone can land the far edge an ulp off `end`, so the overshoot is
/// fed back a few times and any remaining excess is trimmed.
fn far_extent(start: f64, end: f64) -> f64 {
    let mut far = end - start;
    for _ in 0..4 {
        let reached = start + far;
        if reached == end {
            break;
        }
        far -= reached - end;
    }
    far = far.max(0.0);
    while far > 0.0 && start + far > end {
        far = far.next_down();
    }
    far
}
