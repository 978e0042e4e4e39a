// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the quadtree: node identifiers, the item contract, and configuration.

use core::fmt::Debug;
use understory_aabb::{Aabb, SplitRatio};

use crate::error::TreeError;

/// Identifier for a node in the tree.
///
/// A small, copyable handle made of a slot index and a generation counter.
/// Nodes are created when a parent subdivides and released when a subtree is pruned,
/// merged, or cleared; a released slot may be reused by a later subdivision.
///
/// - On allocation, a fresh slot starts at generation `1`.
/// - On reuse of a freed slot, its generation is incremented, so the new `NodeId` differs
///   from every handle that pointed at the slot before.
///
/// Use [`Quadtree::is_alive`](crate::Quadtree::is_alive) to check a handle. Stale handles
/// never alias a different live node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Something that occupies a rectangle and can be told apart from its peers.
///
/// The tree reads [`bounds`](Item::bounds) when placing, updating, and removing an item,
/// and compares [`id`](Item::id) for identity. Nothing else about the item is inspected.
pub trait Item {
    /// Stable identity used for replacement and removal.
    type Id: Copy + Eq + Debug;

    /// The item's identity.
    fn id(&self) -> Self::Id;

    /// The rectangle the item currently occupies.
    fn bounds(&self) -> Aabb;
}

/// A ready-made [`Item`]: an identifier paired with a box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Boxed<K> {
    /// Identity of the item.
    pub id: K,
    /// Rectangle occupied by the item.
    pub bounds: Aabb,
}

impl<K> Boxed<K> {
    /// Pair an identifier with a box.
    pub const fn new(id: K, bounds: Aabb) -> Self {
        Self { id, bounds }
    }

    /// Move the item. Call [`Quadtree::update`](crate::Quadtree::update) afterwards if it is stored in a tree.
    pub fn set_bounds(&mut self, bounds: Aabb) {
        self.bounds = bounds;
    }
}

impl<K: Copy + Eq + Debug> Item for Boxed<K> {
    type Id = K;

    fn id(&self) -> K {
        self.id
    }

    fn bounds(&self) -> Aabb {
        self.bounds
    }
}

/// Tuning for a [`Quadtree`](crate::Quadtree), fixed at construction and shared by every node.
///
/// ```
/// use understory_quadtree::TreeConfig;
/// use understory_aabb::SplitRatio;
///
/// let config = TreeConfig::default()
///     .with_max_items_in_node(8)
///     .with_split_ratio(SplitRatio::new(40.0, 60.0)?);
/// assert_eq!(config.max_levels_in_tree, 5);
/// # Ok::<(), understory_aabb::GeometryError>(())
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TreeConfig {
    /// A node holding more items than this subdivides (if depth allows). Must be at least `1`.
    pub max_items_in_node: usize,
    /// Depth at which nodes stop subdividing. The root is at depth `0`.
    pub max_levels_in_tree: u32,
    /// Where each node is cut when it subdivides.
    pub split_ratio: SplitRatio,
}

impl TreeConfig {
    /// Items a node may hold before it subdivides, unless configured otherwise.
    pub const DEFAULT_MAX_ITEMS: usize = 5;
    /// Deepest level, unless configured otherwise.
    pub const DEFAULT_MAX_LEVELS: u32 = 5;

    /// Set [`max_items_in_node`](Self::max_items_in_node).
    pub const fn with_max_items_in_node(mut self, max: usize) -> Self {
        self.max_items_in_node = max;
        self
    }

    /// Set [`max_levels_in_tree`](Self::max_levels_in_tree).
    pub const fn with_max_levels_in_tree(mut self, max: u32) -> Self {
        self.max_levels_in_tree = max;
        self
    }

    /// Set [`split_ratio`](Self::split_ratio).
    pub const fn with_split_ratio(mut self, ratio: SplitRatio) -> Self {
        self.split_ratio = ratio;
        self
    }

    /// Check the values a tree cannot work with.
    pub fn validate(&self) -> Result<(), TreeError> {
        if self.max_items_in_node == 0 {
            return Err(TreeError::InvalidConfig {
                reason: "max_items_in_node must be at least 1",
            });
        }
        Ok(())
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_items_in_node: Self::DEFAULT_MAX_ITEMS,
            max_levels_in_tree: Self::DEFAULT_MAX_LEVELS,
            split_ratio: SplitRatio::HALF,
        }
    }
}
