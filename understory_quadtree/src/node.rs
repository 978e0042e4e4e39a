// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node storage and the read-only node view handed to callers.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Write as _};
use understory_aabb::{Aabb, Quadrant};

use crate::tree::Quadtree;
use crate::types::{Item, NodeId};

/// Whether a node has been subdivided.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Kind {
    Leaf,
    /// Children in [`Quadrant::ALL`] order.
    Split([NodeId; 4]),
}

#[derive(Clone, Debug)]
pub(crate) struct Node<I> {
    pub(crate) generation: u32,
    pub(crate) bounds: Aabb,
    pub(crate) depth: u32,
    pub(crate) parent: Option<NodeId>,
    /// Which quadrant of the parent this node covers; `None` for the root.
    pub(crate) quadrant: Option<Quadrant>,
    pub(crate) items: Vec<I>,
    pub(crate) kind: Kind,
}

impl<I> Node<I> {
    pub(crate) fn new(
        bounds: Aabb,
        depth: u32,
        parent: Option<NodeId>,
        quadrant: Option<Quadrant>,
    ) -> Self {
        Self {
            generation: 0,
            bounds,
            depth,
            parent,
            quadrant,
            items: Vec::new(),
            kind: Kind::Leaf,
        }
    }

    pub(crate) fn children(&self) -> Option<[NodeId; 4]> {
        match self.kind {
            Kind::Leaf => None,
            Kind::Split(children) => Some(children),
        }
    }
}

/// A read-only view of one node, borrowed from its tree.
///
/// Handed to traversal callbacks and returned by [`Quadtree::node_ref`].
pub struct NodeRef<'a, I> {
    pub(crate) tree: &'a Quadtree<I>,
    pub(crate) id: NodeId,
    pub(crate) node: &'a Node<I>,
}

impl<I> Clone for NodeRef<'_, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I> Copy for NodeRef<'_, I> {}

impl<I> fmt::Debug for NodeRef<'_, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("bounds", &self.node.bounds)
            .field("depth", &self.node.depth)
            .field("items", &self.node.items.len())
            .field("leaf", &(self.node.kind == Kind::Leaf))
            .finish_non_exhaustive()
    }
}

impl<'a, I: Item> NodeRef<'a, I> {
    /// Handle of this node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Region covered by this node.
    pub fn bounds(&self) -> Aabb {
        self.node.bounds
    }

    /// Distance from the root, which is at depth `0`.
    pub fn depth(&self) -> u32 {
        self.node.depth
    }

    /// Items stored directly at this node, in no particular order.
    pub fn items(&self) -> &'a [I] {
        &self.node.items
    }

    /// True if the node has not been subdivided.
    pub fn is_leaf(&self) -> bool {
        self.node.kind == Kind::Leaf
    }

    /// Which quadrant of its parent this node covers; `None` for the root.
    pub fn quadrant(&self) -> Option<Quadrant> {
        self.node.quadrant
    }

    /// The parent node; `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        self.node.parent.map(|p| self.tree.view(p))
    }

    /// The four children in [`Quadrant::ALL`] order; `None` for a leaf.
    pub fn children(&self) -> Option<[Self; 4]> {
        self.node.children().map(|c| c.map(|id| self.tree.view(id)))
    }

    /// The child covering `quadrant`; `None` for a leaf.
    pub fn child(&self, quadrant: Quadrant) -> Option<Self> {
        self.node
            .children()
            .map(|c| self.tree.view(c[quadrant.index()]))
    }

    /// Number of items stored in this node's subtree, this node included.
    pub fn count_items(&self) -> usize {
        let below: usize = self
            .children()
            .map(|c| c.iter().map(Self::count_items).sum())
            .unwrap_or(0);
        self.node.items.len() + below
    }

    /// Label built from the quadrants leading here, for example `ROOT-NE-SW`.
    pub fn path(&self) -> String {
        let mut quadrants = Vec::with_capacity(self.node.depth as usize);
        let mut at = Some(*self);
        while let Some(n) = at {
            if let Some(q) = n.quadrant() {
                quadrants.push(q);
            }
            at = n.parent();
        }
        let mut out = String::from("ROOT");
        for q in quadrants.iter().rev() {
            // Writing into a `String` cannot fail.
            let _ = write!(out, "-{q}");
        }
        out
    }
}
