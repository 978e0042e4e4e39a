// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory AABB: validated 2D boxes, strict enclosure relations, and quadrant splits.
//!
//! This is the geometry layer under [Understory Quadtree](https://docs.rs/understory_quadtree).
//! It has no tree of its own.
//!
//! - [`Aabb`]: an origin/size box whose fields are always finite with non-negative extents.
//! - [`SplitRatio`]: per-axis cut positions in percent, `(50, 50)` by default.
//! - [`relation()`]: per-axis comparison yielding a [`Relation`].
//! - [`is_enclosing`], [`is_enclosed_by`], [`is_intersecting`], [`is_out_of_bounds`]: 2D predicates.
//! - [`filter_enclosing`] and friends: order-preserving filters over slices.
//! - [`split()`]: four [`Quadrants`] that tile the input exactly.
//!
//! # Example
//!
//! ```rust
//! use understory_aabb::{Aabb, SplitRatio, Quadrant};
//!
//! let world = Aabb::new(0.0, 0.0, 1000.0, 1000.0)?;
//! let quads = world.split(SplitRatio::new(30.0, 50.0)?);
//!
//! let item = Aabb::new(10.0, 10.0, 5.0, 5.0)?;
//! assert!(quads.get(Quadrant::Nw).encloses(&item));
//! assert!(!quads.ne.intersects(&item));
//! assert_eq!(quads.nw.width() + quads.ne.width(), world.width());
//! # Ok::<(), understory_aabb::GeometryError>(())
//! ```
//!
//! ## Strict enclosure
//!
//! [`is_enclosing`] requires the target to sit strictly inside the reference on both axes.
//! Boxes that share an edge, or are equal, only intersect. Use [`Aabb::contains`] for the
//! inclusive test.
//!
//! ## Features
//!
//! - `std` (default): forwards `std` to dependencies.
//! - `libm`: forwards `libm` to Kurbo for `no_std` builds with the `kurbo` feature.
//! - `kurbo`: `From<Aabb> for kurbo::Rect` and `TryFrom<kurbo::Rect> for Aabb`.
//! - `serde`: (de)serialization; deserialized values are validated.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod aabb;
pub mod error;
pub mod ratio;
pub mod relation;
pub mod split;

pub use aabb::Aabb;
pub use error::GeometryError;
pub use ratio::SplitRatio;
pub use relation::{
    Axis, Relation, filter_enclosed_by, filter_enclosing, filter_intersecting,
    filter_out_of_bounds, is_enclosed_by, is_enclosing, is_intersecting, is_out_of_bounds,
    relation,
};
pub use split::{Quadrant, Quadrants, split};
