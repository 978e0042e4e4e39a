// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Depth-first walks over the tree and the reports built on them.

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use understory_aabb::Aabb;

use crate::error::TreeError;
use crate::node::NodeRef;
use crate::tree::Quadtree;
use crate::types::{Item, NodeId};

type Visit<'a, I> = Box<dyn FnMut(NodeRef<'_, I>) + 'a>;

/// Pre-order and post-order callbacks for [`Quadtree::traverse`].
///
/// At least one callback must be set. Children are visited in
/// [`Quadrant::ALL`](understory_aabb::Quadrant::ALL) order.
pub struct Callbacks<'a, I> {
    pre_order: Option<Visit<'a, I>>,
    post_order: Option<Visit<'a, I>>,
}

impl<I> core::fmt::Debug for Callbacks<'_, I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Callbacks")
            .field("pre_order", &self.pre_order.is_some())
            .field("post_order", &self.post_order.is_some())
            .finish()
    }
}

impl<I> Default for Callbacks<'_, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, I> Callbacks<'a, I> {
    /// No callbacks yet.
    pub fn new() -> Self {
        Self {
            pre_order: None,
            post_order: None,
        }
    }

    /// Called on a node before any of its children.
    pub fn pre_order(mut self, f: impl FnMut(NodeRef<'_, I>) + 'a) -> Self {
        self.pre_order = Some(Box::new(f));
        self
    }

    /// Called on a node after all of its children.
    pub fn post_order(mut self, f: impl FnMut(NodeRef<'_, I>) + 'a) -> Self {
        self.post_order = Some(Box::new(f));
        self
    }
}

impl<I: Item> Quadtree<I> {
    /// Walk the whole tree depth-first.
    ///
    /// ```
    /// use understory_aabb::Aabb;
    /// use understory_quadtree::{Boxed, Callbacks, Quadtree};
    ///
    /// let mut tree = Quadtree::new(Aabb::new(0.0, 0.0, 100.0, 100.0)?);
    /// tree.insert(Boxed::new(1_u32, Aabb::new(10.0, 10.0, 5.0, 5.0)?));
    ///
    /// let mut seen = 0;
    /// tree.traverse(Callbacks::new().pre_order(|node| seen += node.items().len()))?;
    /// assert_eq!(seen, 1);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn traverse(&self, callbacks: Callbacks<'_, I>) -> Result<(), TreeError> {
        self.traverse_from(self.root(), callbacks)
    }

    /// Walk `node`'s subtree depth-first.
    ///
    /// Fails with [`TreeError::MissingCallback`] if neither callback is set, and with
    /// [`TreeError::StaleNode`] if `node` is not live.
    pub fn traverse_from(
        &self,
        node: NodeId,
        mut callbacks: Callbacks<'_, I>,
    ) -> Result<(), TreeError> {
        if callbacks.pre_order.is_none() && callbacks.post_order.is_none() {
            return Err(TreeError::MissingCallback);
        }
        self.check(node)?;
        walk(self.view(node), &mut callbacks);
        Ok(())
    }

    /// Call `f` on every leaf, in traversal order.
    pub fn each_leaf(&self, mut f: impl FnMut(NodeRef<'_, I>)) {
        each_leaf_inner(self.root_node(), &mut f);
    }

    /// Call `f` on every leaf of `node`'s subtree.
    pub fn each_leaf_from(
        &self,
        node: NodeId,
        mut f: impl FnMut(NodeRef<'_, I>),
    ) -> Result<(), TreeError> {
        self.check(node)?;
        each_leaf_inner(self.view(node), &mut f);
        Ok(())
    }

    /// Bounds of every node, children first.
    pub fn all_bounds(&self) -> Vec<Aabb> {
        self.post_order(self.root())
            .into_iter()
            .map(|id| self.node(id).bounds)
            .collect()
    }

    /// One line per node, children first: the node's path label and its item count.
    ///
    /// ```
    /// use understory_aabb::Aabb;
    /// use understory_quadtree::Quadtree;
    /// # use understory_quadtree::Boxed;
    ///
    /// let tree: Quadtree<Boxed<u32>> = Quadtree::new(Aabb::new(0.0, 0.0, 10.0, 10.0)?);
    /// assert_eq!(tree.describe(), ["ROOT: 0 items"]);
    /// # Ok::<(), understory_aabb::GeometryError>(())
    /// ```
    pub fn describe(&self) -> Vec<String> {
        self.post_order(self.root())
            .into_iter()
            .map(|id| {
                let node = self.view(id);
                format!("{}: {} items", node.path(), node.items().len())
            })
            .collect()
    }
}

fn walk<I: Item>(node: NodeRef<'_, I>, callbacks: &mut Callbacks<'_, I>) {
    if let Some(pre) = callbacks.pre_order.as_mut() {
        pre(node);
    }
    if let Some(children) = node.children() {
        for child in children {
            walk(child, callbacks);
        }
    }
    if let Some(post) = callbacks.post_order.as_mut() {
        post(node);
    }
}

fn each_leaf_inner<I: Item>(node: NodeRef<'_, I>, f: &mut impl FnMut(NodeRef<'_, I>)) {
    match node.children() {
        Some(children) => {
            for child in children {
                each_leaf_inner(child, f);
            }
        }
        None => f(node),
    }
}
