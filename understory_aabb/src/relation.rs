// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pairwise spatial relations between boxes, and filters built on them.
//!
//! Every predicate takes a `reference` box first and a `target` second and reads
//! "reference *is* … target": `is_enclosing(reference, target)` is true when the
//! reference strictly surrounds the target.
//!
//! Enclosure is strict. A box whose edge lies on the reference's edge is
//! [`Relation::Intersecting`] on that axis, not enclosed. Quadtree placement relies on
//! this: an item sitting exactly on a split line never fits in either neighbor.

use alloc::vec::Vec;
use core::fmt;

use crate::aabb::Aabb;

/// One of the two coordinate axes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal axis (`x`, `width`).
    X,
    /// Vertical axis (`y`, `height`), growing downward.
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::X => "x",
            Self::Y => "y",
        })
    }
}

/// How a reference interval relates to a target interval on one axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Relation {
    /// The target strictly surrounds the reference.
    EnclosedBy,
    /// The reference strictly surrounds the target.
    Enclosing,
    /// The intervals overlap without strict containment, including shared edges and equality.
    Intersecting,
    /// The intervals share no point at all.
    OutOfBounds,
}

/// Relation of `reference` to `target` along `axis`.
///
/// For spans `[r0, r0 + rl]` and `[t0, t0 + tl]`:
/// - `OutOfBounds` when `r0 > t0 + tl` or `r0 + rl < t0`,
/// - `Enclosing` when `r0 < t0` and `r0 + rl > t0 + tl`,
/// - `EnclosedBy` for the mirrored case,
/// - `Intersecting` otherwise.
pub fn relation(axis: Axis, reference: &Aabb, target: &Aabb) -> Relation {
    let (r0, rl) = reference.span(axis);
    let (t0, tl) = target.span(axis);
    let (r1, t1) = (r0 + rl, t0 + tl);
    if r0 > t1 || r1 < t0 {
        Relation::OutOfBounds
    } else if r0 < t0 && r1 > t1 {
        Relation::Enclosing
    } else if t0 < r0 && t1 > r1 {
        Relation::EnclosedBy
    } else {
        Relation::Intersecting
    }
}

/// True if `reference` strictly encloses `target` on both axes.
pub fn is_enclosing(reference: &Aabb, target: &Aabb) -> bool {
    relation(Axis::X, reference, target) == Relation::Enclosing
        && relation(Axis::Y, reference, target) == Relation::Enclosing
}

/// True if `target` strictly encloses `reference` on both axes.
pub fn is_enclosed_by(reference: &Aabb, target: &Aabb) -> bool {
    is_enclosing(target, reference)
}

/// True if the boxes are separated on either axis.
///
/// One separating axis is enough for two rectangles to be disjoint.
pub fn is_out_of_bounds(reference: &Aabb, target: &Aabb) -> bool {
    relation(Axis::X, reference, target) == Relation::OutOfBounds
        || relation(Axis::Y, reference, target) == Relation::OutOfBounds
}

/// True if the boxes share at least one point.
pub fn is_intersecting(reference: &Aabb, target: &Aabb) -> bool {
    !is_out_of_bounds(reference, target)
}

/// Targets strictly enclosed by `reference`, in input order.
pub fn filter_enclosing(reference: &Aabb, targets: &[Aabb]) -> Vec<Aabb> {
    filter(targets, |t| is_enclosing(reference, t))
}

/// Targets that strictly enclose `reference`, in input order.
pub fn filter_enclosed_by(reference: &Aabb, targets: &[Aabb]) -> Vec<Aabb> {
    filter(targets, |t| is_enclosed_by(reference, t))
}

/// Targets sharing at least one point with `reference`, in input order.
pub fn filter_intersecting(reference: &Aabb, targets: &[Aabb]) -> Vec<Aabb> {
    filter(targets, |t| is_intersecting(reference, t))
}

/// Targets disjoint from `reference`, in input order.
pub fn filter_out_of_bounds(reference: &Aabb, targets: &[Aabb]) -> Vec<Aabb> {
    filter(targets, |t| is_out_of_bounds(reference, t))
}

fn filter(targets: &[Aabb], mut keep: impl FnMut(&Aabb) -> bool) -> Vec<Aabb> {
    targets.iter().filter(|t| keep(t)).copied().collect()
}
