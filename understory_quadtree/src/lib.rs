// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Quadtree: a region quadtree for broad-phase collision candidates.
//!
//! The tree covers a fixed rectangle and subdivides it lazily. Each item lives at the
//! deepest node whose bounds strictly enclose it, so an item lying across a split line stays
//! at the node that owns the line. Asking for the candidates near a box walks one chain of
//! nodes from the root and returns everything stored along it.
//!
//! - [`Quadtree`]: the tree, its arena of nodes, and every operation on it.
//! - [`Item`]: what the tree stores; anything with an id and [`Aabb`] bounds.
//! - [`Boxed`]: a ready-made item pairing an id with a box.
//! - [`TreeConfig`]: capacity per node, depth cap, and [`SplitRatio`].
//! - [`NodeId`] and [`NodeRef`]: generational node handles and read-only node views.
//! - [`Callbacks`]: pre-order and post-order visitors for [`Quadtree::traverse`].
//!
//! Geometry comes from [`understory_aabb`].
//!
//! ## Lifecycle
//!
//! - [`Quadtree::insert`] places an item and subdivides a node that grows past capacity.
//! - [`Quadtree::retrieve`] returns broad-phase candidates, deepest node first.
//! - [`Quadtree::update`] relocates items whose bounds changed, in one children-first pass.
//! - [`Quadtree::remove`] takes an item out, even if it drifted since it was placed.
//! - [`Quadtree::prune`] and [`Quadtree::merge`] fold sparse branches back up.
//!
//! Items are owned by the tree. To move one, change its bounds through
//! [`Quadtree::get_mut`] or [`Quadtree::items_mut`], then call [`Quadtree::update`].
//!
//! # Example
//!
//! ```rust
//! use understory_aabb::Aabb;
//! use understory_quadtree::{Boxed, Quadtree, TreeConfig};
//!
//! let world = Aabb::new(0.0, 0.0, 1000.0, 1000.0)?;
//! let mut tree = Quadtree::with_config(world, TreeConfig::default().with_max_items_in_node(2))?;
//!
//! tree.insert(Boxed::new("player", Aabb::new(10.0, 10.0, 5.0, 5.0)?));
//! tree.insert(Boxed::new("crate", Aabb::new(20.0, 20.0, 5.0, 5.0)?));
//! tree.insert(Boxed::new("wall", Aabb::new(495.0, 0.0, 10.0, 1000.0)?));
//! tree.insert(Boxed::new("enemy", Aabb::new(900.0, 900.0, 5.0, 5.0)?));
//!
//! // The wall crosses the root's split line and stays at the root.
//! let near_player: Vec<_> = tree
//!     .retrieve(&Aabb::new(12.0, 12.0, 1.0, 1.0)?)
//!     .into_iter()
//!     .map(|item| item.id)
//!     .collect();
//! assert!(near_player.contains(&"crate"));
//! assert!(near_player.contains(&"wall"));
//! assert!(!near_player.contains(&"enemy"));
//!
//! // Move the enemy next to the player and settle it.
//! tree.get_mut("enemy").unwrap().set_bounds(Aabb::new(30.0, 30.0, 5.0, 5.0)?);
//! tree.update();
//! assert_eq!(tree.len(), 4);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Logging
//!
//! Structural changes emit [`tracing`] events: `debug` when a node subdivides, merges, or
//! loses an empty subtree, and `trace` when an item leaves its node or removal falls back
//! to scanning the tree. Nothing is logged unless a subscriber is installed.
//!
//! ## Features
//!
//! - `std` (default): forwards `std` to dependencies.
//! - `libm`: forwards `libm` for `no_std` builds.
//! - `serde`: (de)serialization of [`TreeConfig`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod node;
mod traverse;
mod tree;
mod types;

pub use error::TreeError;
pub use node::NodeRef;
pub use traverse::Callbacks;
pub use tree::Quadtree;
pub use types::{Boxed, Item, NodeId, TreeConfig};

pub use understory_aabb::{Aabb, Quadrant, SplitRatio};
