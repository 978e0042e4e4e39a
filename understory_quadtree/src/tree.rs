// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: node arena, placement, rebalancing, removal, and maintenance.

use alloc::vec;
use alloc::vec::Vec;
use core::mem;
use tracing::{debug, trace};
use understory_aabb::{Aabb, Quadrant};

use crate::error::TreeError;
use crate::node::{Kind, Node, NodeRef};
use crate::types::{Item, NodeId, TreeConfig};

/// A region quadtree over a fixed rectangle.
///
/// Items live at the deepest node whose bounds strictly enclose them. Nodes subdivide
/// lazily once they hold more than [`TreeConfig::max_items_in_node`] items, down to
/// [`TreeConfig::max_levels_in_tree`]. Items straddling a split line stay at the node
/// that owns the line.
///
/// Nodes are stored in an arena and addressed by generational [`NodeId`]s; a child refers
/// to its parent by handle, so there is no shared ownership anywhere in the tree.
pub struct Quadtree<I> {
    nodes: Vec<Option<Node<I>>>, // slots
    generations: Vec<u32>,       // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    root: NodeId,
    config: TreeConfig,
}

impl<I> core::fmt::Debug for Quadtree<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let items: usize = self.nodes.iter().flatten().map(|n| n.items.len()).sum();
        f.debug_struct("Quadtree")
            .field("config", &self.config)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("items", &items)
            .finish_non_exhaustive()
    }
}

impl<I: Item> Quadtree<I> {
    /// Create a tree over `bounds` with the default [`TreeConfig`].
    pub fn new(bounds: Aabb) -> Self {
        Self::from_parts(bounds, TreeConfig::default())
    }

    /// Create a tree over `bounds` with an explicit configuration.
    ///
    /// Fails with [`TreeError::InvalidConfig`] if the configuration is unusable.
    pub fn with_config(bounds: Aabb, config: TreeConfig) -> Result<Self, TreeError> {
        config.validate()?;
        Ok(Self::from_parts(bounds, config))
    }

    fn from_parts(bounds: Aabb, config: TreeConfig) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: NodeId::new(0, 0),
            config,
        };
        tree.root = tree.alloc(Node::new(bounds, 0, None, None));
        tree
    }

    /// The configuration shared by every node.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Region covered by the root.
    pub fn bounds(&self) -> Aabb {
        self.node(self.root).bounds
    }

    /// Handle of the root node. The root lives as long as the tree.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// View of the root node.
    pub fn root_node(&self) -> NodeRef<'_, I> {
        self.view(self.root)
    }

    /// View of a node, if the handle is live.
    pub fn node_ref(&self, id: NodeId) -> Option<NodeRef<'_, I>> {
        self.is_alive(id).then(|| self.view(id))
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.1)
            .unwrap_or(false)
    }

    /// Number of live nodes, the root included.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Depth of the deepest live node.
    pub fn depth(&self) -> u32 {
        self.nodes.iter().flatten().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Total number of items stored in the tree.
    pub fn len(&self) -> usize {
        self.nodes.iter().flatten().map(|n| n.items.len()).sum()
    }

    /// True if no node holds an item.
    pub fn is_empty(&self) -> bool {
        self.nodes.iter().flatten().all(|n| n.items.is_empty())
    }

    // --- insertion ---

    /// Insert an item, placing it at the deepest existing node that strictly encloses it.
    ///
    /// If the receiving node then holds more than `max_items_in_node` items, it subdivides
    /// (depth permitting) and pushes every item that fits a single child down.
    ///
    /// An item whose id is already stored at the receiving node replaces the stored value.
    /// Ids are expected to be unique across the tree; to move an item, change its bounds
    /// through [`get_mut`](Self::get_mut) and call [`update`](Self::update).
    ///
    /// Items outside the root's bounds are kept at the root.
    pub fn insert(&mut self, item: I) {
        if !self.bounds().encloses(&item.bounds()) {
            trace!(id = ?item.id(), "item is not enclosed by the root; keeping it at the root");
        }
        self.add_item(self.root, item);
    }

    /// Insert starting from `node` instead of the root.
    ///
    /// The item descends from `node` exactly as [`insert`](Self::insert) descends from the root.
    pub fn insert_at(&mut self, node: NodeId, item: I) -> Result<(), TreeError> {
        self.check(node)?;
        self.add_item(node, item);
        Ok(())
    }

    fn add_item(&mut self, mut at: NodeId, item: I) {
        let bounds = item.bounds();
        while let Some(child) = self.enclosing_child(at, &bounds) {
            at = child;
        }
        let max = self.config.max_items_in_node;
        let node = self.node_mut(at);
        store(&mut node.items, item);
        if node.items.len() > max {
            self.rebalance(at);
        }
    }

    /// The first child, in [`Quadrant::ALL`] order, that strictly encloses `bounds`.
    fn enclosing_child(&self, id: NodeId, bounds: &Aabb) -> Option<NodeId> {
        self.node(id)
            .children()?
            .into_iter()
            .find(|c| self.node(*c).bounds.encloses(bounds))
    }

    /// Subdivide `id` if it is a leaf with depth to spare, then push down every item that
    /// fits inside one child.
    fn rebalance(&mut self, id: NodeId) {
        let node = self.node(id);
        if node.kind == Kind::Leaf {
            if node.depth >= self.config.max_levels_in_tree {
                return;
            }
            self.subdivide(id);
        }
        let items = mem::take(&mut self.node_mut(id).items);
        let mut kept = Vec::with_capacity(items.len());
        let mut moved = Vec::new();
        for item in items {
            match self.enclosing_child(id, &item.bounds()) {
                Some(child) => moved.push((child, item)),
                None => kept.push(item),
            }
        }
        self.node_mut(id).items = kept;
        for (child, item) in moved {
            self.add_item(child, item);
        }
    }

    fn subdivide(&mut self, id: NodeId) {
        let (bounds, depth, count) = {
            let n = self.node(id);
            (n.bounds, n.depth, n.items.len())
        };
        let quads = bounds.split(self.config.split_ratio);
        let children =
            Quadrant::ALL.map(|q| self.alloc(Node::new(quads.get(q), depth + 1, Some(id), Some(q))));
        self.node_mut(id).kind = Kind::Split(children);
        debug!(node = ?id, depth, items = count, "subdivided node");
    }

    // --- lookup ---

    /// The stored item with this id, if any.
    pub fn get(&self, id: I::Id) -> Option<&I> {
        self.nodes
            .iter()
            .flatten()
            .flat_map(|n| n.items.iter())
            .find(|i| i.id() == id)
    }

    /// Mutable access to the stored item with this id.
    ///
    /// Changing the item's bounds does not move it; call [`update`](Self::update) afterwards.
    pub fn get_mut(&mut self, id: I::Id) -> Option<&mut I> {
        self.nodes
            .iter_mut()
            .flatten()
            .flat_map(|n| n.items.iter_mut())
            .find(|i| i.id() == id)
    }

    /// Mutable access to every stored item, in no particular order.
    ///
    /// Call [`update`](Self::update) after moving items.
    pub fn items_mut(&mut self) -> impl Iterator<Item = &mut I> + '_ {
        self.nodes
            .iter_mut()
            .flatten()
            .flat_map(|n| n.items.iter_mut())
    }

    /// The node currently holding `item`.
    ///
    /// Follows the item's bounds down from the root first; if the item has moved since it
    /// was placed, falls back to a depth-first scan of the whole tree.
    pub fn locate(&self, item: &I) -> Option<NodeId> {
        let id = item.id();
        let bounds = item.bounds();
        let mut at = Some(self.root);
        while let Some(n) = at {
            if self.node(n).items.iter().any(|i| i.id() == id) {
                return Some(n);
            }
            at = self.enclosing_child(n, &bounds);
        }
        self.find_holder(id)
    }

    /// Depth-first (pre-order) search for the node storing `id`.
    fn find_holder(&self, id: I::Id) -> Option<NodeId> {
        let mut stack = vec![self.root];
        while let Some(n) = stack.pop() {
            let node = self.node(n);
            if node.items.iter().any(|i| i.id() == id) {
                return Some(n);
            }
            if let Some(children) = node.children() {
                // Reversed so the first quadrant is visited first.
                stack.extend(children.iter().rev());
            }
        }
        None
    }

    // --- removal ---

    /// Remove `item` from the tree, returning the stored value.
    ///
    /// Searches along the item's current bounds first and falls back to a scan of every
    /// node, so items whose bounds drifted since insertion are still found.
    /// Returns `None` if no stored item has this id.
    pub fn remove(&mut self, item: &I) -> Option<I> {
        let id = item.id();
        let bounds = item.bounds();
        let mut at = Some(self.root);
        while let Some(n) = at {
            if let Some(found) = take(&mut self.node_mut(n).items, id) {
                return Some(found);
            }
            at = self.enclosing_child(n, &bounds);
        }
        trace!(?id, "item not on its bounds path; scanning the tree");
        self.remove_by_id(id)
    }

    /// Remove the item with this id by scanning every node, ignoring bounds.
    pub fn remove_by_id(&mut self, id: I::Id) -> Option<I> {
        let holder = self.find_holder(id)?;
        take(&mut self.node_mut(holder).items, id)
    }

    /// Remove the item with this id from `node`'s own collection only.
    ///
    /// Returns `Ok(None)` if `node` does not hold it directly, even if a descendant does.
    pub fn remove_from_node(&mut self, node: NodeId, id: I::Id) -> Result<Option<I>, TreeError> {
        self.check(node)?;
        Ok(take(&mut self.node_mut(node).items, id))
    }

    // --- clearing ---

    /// Remove every item and collapse the tree back to a single root leaf.
    pub fn clear(&mut self) {
        self.clear_inner(self.root, true);
    }

    /// Remove the items stored at `node`.
    ///
    /// With `recursive`, the node's children are discarded along with their items and
    /// the node becomes a leaf; otherwise only the node's own items are dropped.
    pub fn clear_items(&mut self, node: NodeId, recursive: bool) -> Result<(), TreeError> {
        self.check(node)?;
        self.clear_inner(node, recursive);
        Ok(())
    }

    fn clear_inner(&mut self, id: NodeId, recursive: bool) {
        self.node_mut(id).items.clear();
        if recursive {
            self.discard_children(id);
        }
    }

    /// Discard `node`'s subtree, items included, leaving its own items in place.
    pub fn clear_children(&mut self, node: NodeId) -> Result<(), TreeError> {
        self.check(node)?;
        self.discard_children(node);
        Ok(())
    }

    // --- maintenance ---

    /// Relocate items whose bounds changed since they were placed.
    ///
    /// Visits every node children-first. An item that no longer fits strictly inside its
    /// node is handed to the parent as-is; the parent's own visit, which comes later,
    /// decides where it goes next. An item that now fits a single child moves down into it.
    /// One pass settles every item.
    pub fn update(&mut self) {
        for id in self.post_order(self.root) {
            self.update_inner(id);
        }
    }

    /// Run the update step for a single node.
    ///
    /// Unlike [`update`](Self::update), items pushed up to the parent are not revisited.
    pub fn update_node(&mut self, node: NodeId) -> Result<(), TreeError> {
        self.check(node)?;
        self.update_inner(node);
        Ok(())
    }

    fn update_inner(&mut self, id: NodeId) {
        let node = self.node_mut(id);
        let (bounds, parent) = (node.bounds, node.parent);
        let items = mem::take(&mut node.items);
        let mut kept = Vec::with_capacity(items.len());
        for item in items {
            let item_bounds = item.bounds();
            if let Some(parent) = parent
                && !bounds.encloses(&item_bounds)
            {
                trace!(id = ?item.id(), from = ?id, to = ?parent, "item left its node");
                store(&mut self.node_mut(parent).items, item);
                continue;
            }
            match self.enclosing_child(id, &item_bounds) {
                Some(child) => self.add_item(child, item),
                None => kept.push(item),
            }
        }
        self.node_mut(id).items.append(&mut kept);
    }

    /// Discard every empty subtree, children-first.
    ///
    /// A split node whose four subtrees hold no items goes back to being a leaf.
    /// Returns the number of items in the tree.
    pub fn prune(&mut self) -> usize {
        self.prune_inner(self.root)
    }

    /// [`prune`](Self::prune) restricted to `node`'s subtree.
    ///
    /// Returns the number of items in that subtree.
    pub fn prune_node(&mut self, node: NodeId) -> Result<usize, TreeError> {
        self.check(node)?;
        Ok(self.prune_inner(node))
    }

    fn prune_inner(&mut self, id: NodeId) -> usize {
        let own = self.node(id).items.len();
        let Some(children) = self.node(id).children() else {
            return own;
        };
        let below: usize = children.into_iter().map(|c| self.prune_inner(c)).sum();
        if below == 0 {
            debug!(node = ?id, "pruned empty subtree");
            self.discard_children(id);
        }
        own + below
    }

    /// Fold sparse subtrees back into their parents, children-first.
    ///
    /// A split node whose subtree holds no more than `max_items_in_node` items takes
    /// every descendant item into its own collection and becomes a leaf.
    /// Returns the number of items in the tree.
    pub fn merge(&mut self) -> usize {
        self.merge_inner(self.root)
    }

    fn merge_inner(&mut self, id: NodeId) -> usize {
        let own = self.node(id).items.len();
        let Some(children) = self.node(id).children() else {
            return own;
        };
        let below: usize = children.into_iter().map(|c| self.merge_inner(c)).sum();
        if own + below <= self.config.max_items_in_node {
            let mut gathered = Vec::with_capacity(below);
            for child in children {
                // Children are leaves at this point, so their own items are all there is.
                gathered.append(&mut self.node_mut(child).items);
            }
            self.discard_children(id);
            self.node_mut(id).items.append(&mut gathered);
            debug!(node = ?id, items = own + below, "merged subtree");
        }
        own + below
    }

    /// Move the item with this id from `node` into its parent's own collection.
    ///
    /// The item is not pushed back down; a later [`update`](Self::update) or rebalance
    /// settles it. Returns `Ok(false)` if `node` is the root or does not hold the item.
    pub fn reassign(&mut self, node: NodeId, id: I::Id) -> Result<bool, TreeError> {
        self.check(node)?;
        let Some(parent) = self.node(node).parent else {
            return Ok(false);
        };
        let Some(item) = take(&mut self.node_mut(node).items, id) else {
            return Ok(false);
        };
        store(&mut self.node_mut(parent).items, item);
        Ok(true)
    }

    /// Move every item stored at `node` into its parent's own collection.
    ///
    /// Returns how many items moved; the root has no parent and moves nothing.
    pub fn reassign_all(&mut self, node: NodeId) -> Result<usize, TreeError> {
        self.check(node)?;
        let Some(parent) = self.node(node).parent else {
            return Ok(0);
        };
        let items = mem::take(&mut self.node_mut(node).items);
        let moved = items.len();
        let target = &mut self.node_mut(parent).items;
        for item in items {
            store(target, item);
        }
        Ok(moved)
    }

    // --- queries ---

    /// Broad-phase candidates for `target`.
    ///
    /// Follows the chain of children that strictly enclose `target` and returns the items
    /// of every node on that chain, deepest node first. This over-approximates: callers
    /// still need an exact overlap test on the result.
    pub fn retrieve(&self, target: &Aabb) -> Vec<&I> {
        let mut chain = vec![self.root];
        let mut at = self.root;
        while let Some(child) = self.enclosing_child(at, target) {
            chain.push(child);
            at = child;
        }
        chain
            .iter()
            .rev()
            .flat_map(|n| self.node(*n).items.iter())
            .collect()
    }

    /// Items stored on the path from the root down to `node`, root first.
    pub fn retrieve_path(&self, node: NodeId) -> Result<Vec<&I>, TreeError> {
        self.check(node)?;
        let mut chain = Vec::new();
        let mut at = Some(node);
        while let Some(n) = at {
            chain.push(n);
            at = self.node(n).parent;
        }
        Ok(chain
            .iter()
            .rev()
            .flat_map(|n| self.node(*n).items.iter())
            .collect())
    }

    /// Every item in the tree, gathered children-first.
    pub fn retrieve_all(&self) -> Vec<&I> {
        self.post_order(self.root)
            .into_iter()
            .flat_map(|n| self.node(n).items.iter())
            .collect()
    }

    // --- internals ---

    pub(crate) fn check(&self, id: NodeId) -> Result<(), TreeError> {
        if self.is_alive(id) {
            Ok(())
        } else {
            Err(TreeError::StaleNode(id))
        }
    }

    /// Node ids of `id`'s subtree, children before parents.
    pub(crate) fn post_order(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_post_order(id, &mut out);
        out
    }

    fn collect_post_order(&self, id: NodeId, out: &mut Vec<NodeId>) {
        if let Some(children) = self.node(id).children() {
            for child in children {
                self.collect_post_order(child, out);
            }
        }
        out.push(id);
    }

    fn alloc(&mut self, mut node: Node<I>) -> NodeId {
        if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            node.generation = generation;
            self.nodes[idx] = Some(node);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Node slots are addressed with 32-bit indices."
            )]
            NodeId::new(idx as u32, generation)
        } else {
            let generation = 1_u32;
            node.generation = generation;
            self.nodes.push(Some(node));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Node slots are addressed with 32-bit indices."
            )]
            NodeId::new((self.nodes.len() - 1) as u32, generation)
        }
    }

    /// Turn `id` back into a leaf, freeing every node below it.
    fn discard_children(&mut self, id: NodeId) {
        let node = self.node_mut(id);
        let Kind::Split(children) = node.kind else {
            return;
        };
        node.kind = Kind::Leaf;
        for child in children {
            self.release(child);
        }
    }

    fn release(&mut self, id: NodeId) {
        if let Some(node) = self.nodes[id.idx()].take() {
            if let Kind::Split(children) = node.kind {
                for child in children {
                    self.release(child);
                }
            }
            self.free_list.push(id.idx());
        }
    }

    pub(crate) fn view(&self, id: NodeId) -> NodeRef<'_, I> {
        NodeRef {
            tree: self,
            id,
            node: self.node(id),
        }
    }

    /// Access a node; panics if `id` is stale.
    pub(crate) fn node(&self, id: NodeId) -> &Node<I> {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Access a node mutably; panics if `id` is stale.
    fn node_mut(&mut self, id: NodeId) -> &mut Node<I> {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }
}

/// Add `item` to a node's collection, replacing an item with the same id.
fn store<I: Item>(items: &mut Vec<I>, item: I) {
    let id = item.id();
    match items.iter_mut().find(|i| i.id() == id) {
        Some(slot) => *slot = item,
        None => items.push(item),
    }
}

/// Take the item with this id out of a node's collection.
fn take<I: Item>(items: &mut Vec<I>, id: I::Id) -> Option<I> {
    let pos = items.iter().position(|i| i.id() == id)?;
    Some(items.swap_remove(pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Boxed;
    use understory_aabb::SplitRatio;

    fn b(x: f64, y: f64, w: f64, h: f64) -> Aabb {
        Aabb::new(x, y, w, h).unwrap()
    }

    fn world() -> Aabb {
        b(0.0, 0.0, 1000.0, 1000.0)
    }

    fn small(max_items: usize, max_levels: u32) -> Quadtree<Boxed<u32>> {
        let config = TreeConfig::default()
            .with_max_items_in_node(max_items)
            .with_max_levels_in_tree(max_levels);
        Quadtree::with_config(world(), config).unwrap()
    }

    #[test]
    fn rejects_zero_capacity() {
        let config = TreeConfig::default().with_max_items_in_node(0);
        let err = Quadtree::<Boxed<u32>>::with_config(world(), config).unwrap_err();
        assert!(matches!(err, TreeError::InvalidConfig { .. }));
    }

    #[test]
    fn stays_a_leaf_until_over_capacity() {
        let mut tree = small(5, 5);
        for i in 0..5 {
            tree.insert(Boxed::new(i, b(10.0 + f64::from(i) * 20.0, 10.0, 5.0, 5.0)));
        }
        assert!(tree.root_node().is_leaf());
        assert_eq!(tree.node_count(), 1);

        tree.insert(Boxed::new(5, b(600.0, 600.0, 5.0, 5.0)));
        assert!(!tree.root_node().is_leaf());
        assert_eq!(tree.len(), 6);
    }

    #[test]
    fn straddling_items_stay_at_parent() {
        let mut tree = small(1, 5);
        // Crosses x = 500.
        let straddler = Boxed::new(1, b(490.0, 10.0, 20.0, 5.0));
        tree.insert(straddler);
        tree.insert(Boxed::new(2, b(10.0, 10.0, 5.0, 5.0)));

        let root = tree.root_node();
        assert!(!root.is_leaf());
        assert_eq!(root.items().len(), 1);
        assert_eq!(root.items()[0].id, 1);
        assert_eq!(tree.locate(&straddler), Some(tree.root()));
    }

    #[test]
    fn item_on_split_line_is_not_enclosed() {
        let mut tree = small(1, 5);
        tree.insert(Boxed::new(1, b(10.0, 10.0, 5.0, 5.0)));
        tree.insert(Boxed::new(2, b(20.0, 20.0, 5.0, 5.0)));
        // Touches the vertical split line at x = 500 from the left.
        let flush = Boxed::new(3, b(495.0, 100.0, 5.0, 5.0));
        tree.insert(flush);
        assert_eq!(tree.locate(&flush), Some(tree.root()));
    }

    #[test]
    fn depth_cap_stops_subdivision() {
        let mut tree = small(1, 2);
        for i in 0..20 {
            tree.insert(Boxed::new(i, b(1.0 + f64::from(i) * 0.1, 1.0, 0.05, 0.05)));
        }
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.len(), 20);
        tree.each_leaf(|leaf| {
            assert!(leaf.depth() <= 2);
        });
    }

    #[test]
    fn zero_levels_never_split() {
        let mut tree = small(1, 0);
        for i in 0..10 {
            tree.insert(Boxed::new(i, b(f64::from(i) * 50.0 + 1.0, 1.0, 1.0, 1.0)));
        }
        assert!(tree.root_node().is_leaf());
        assert_eq!(tree.root_node().items().len(), 10);
    }

    #[test]
    fn same_id_at_same_node_replaces() {
        let mut tree = small(5, 5);
        tree.insert(Boxed::new(7, b(10.0, 10.0, 5.0, 5.0)));
        tree.insert(Boxed::new(7, b(11.0, 11.0, 5.0, 5.0)));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get(7).map(|i| i.bounds), Some(b(11.0, 11.0, 5.0, 5.0)));
    }

    #[test]
    fn remove_round_trip() {
        let mut tree = small(2, 5);
        let items: Vec<_> = (0..10)
            .map(|i| Boxed::new(i, b(f64::from(i) * 90.0 + 3.0, 3.0, 4.0, 4.0)))
            .collect();
        for item in &items {
            tree.insert(*item);
        }
        assert_eq!(tree.len(), 10);
        assert_eq!(tree.remove(&items[4]), Some(items[4]));
        assert_eq!(tree.len(), 9);
        assert_eq!(tree.remove(&items[4]), None);
        assert_eq!(tree.len(), 9);
    }

    #[test]
    fn remove_finds_items_that_drifted() {
        let mut tree = small(1, 5);
        tree.insert(Boxed::new(1, b(10.0, 10.0, 5.0, 5.0)));
        tree.insert(Boxed::new(2, b(900.0, 900.0, 5.0, 5.0)));

        // Caller-side copy with bounds that no longer match where the item is stored.
        let drifted = Boxed::new(1, b(800.0, 100.0, 5.0, 5.0));
        assert!(tree.remove(&drifted).is_some());
        assert!(tree.get(1).is_none());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn node_scoped_removal_only_looks_at_that_node() {
        let mut tree = small(1, 5);
        tree.insert(Boxed::new(1, b(10.0, 10.0, 5.0, 5.0)));
        tree.insert(Boxed::new(2, b(900.0, 900.0, 5.0, 5.0)));
        assert_eq!(tree.remove_from_node(tree.root(), 1), Ok(None));

        let holder = tree.locate(&Boxed::new(1, b(10.0, 10.0, 5.0, 5.0))).unwrap();
        assert!(tree.remove_from_node(holder, 1).unwrap().is_some());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn update_moves_items_up_and_down() {
        let mut tree = small(1, 5);
        tree.insert(Boxed::new(1, b(10.0, 10.0, 5.0, 5.0)));
        tree.insert(Boxed::new(2, b(900.0, 900.0, 5.0, 5.0)));
        let nw = tree.root_node().child(Quadrant::Nw).unwrap().id();
        assert_eq!(tree.locate(&Boxed::new(1, b(10.0, 10.0, 5.0, 5.0))), Some(nw));

        // Move item 1 from the north-west into the south-east quadrant.
        let moved = b(700.0, 700.0, 5.0, 5.0);
        tree.get_mut(1).unwrap().set_bounds(moved);
        tree.update();

        let now = tree.locate(&Boxed::new(1, moved)).unwrap();
        assert_ne!(now, nw);
        assert!(tree.node_ref(now).unwrap().bounds().encloses(&moved));
        assert!(tree.retrieve_path(now).unwrap().iter().any(|i| i.id == 1));
        // SE split again to make room, so the item sits one level below it.
        assert_eq!(tree.node_ref(now).unwrap().path(), "ROOT-SE-NW");
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn update_keeps_straddlers_at_the_catching_ancestor() {
        let mut tree = small(1, 5);
        tree.insert(Boxed::new(1, b(10.0, 10.0, 5.0, 5.0)));
        tree.insert(Boxed::new(2, b(900.0, 900.0, 5.0, 5.0)));

        // Now crosses the root's vertical split line.
        tree.get_mut(1).unwrap().set_bounds(b(495.0, 10.0, 10.0, 5.0));
        tree.update();
        assert_eq!(tree.root_node().items().len(), 1);
        assert_eq!(tree.root_node().items()[0].id, 1);
    }

    #[test]
    fn update_node_pushes_to_parent_without_descent() {
        let mut tree = small(1, 5);
        tree.insert(Boxed::new(1, b(10.0, 10.0, 5.0, 5.0)));
        tree.insert(Boxed::new(2, b(900.0, 900.0, 5.0, 5.0)));
        let nw = tree.root_node().child(Quadrant::Nw).unwrap().id();

        tree.get_mut(1).unwrap().set_bounds(b(600.0, 600.0, 5.0, 5.0));
        tree.update_node(nw).unwrap();
        // Parked at the root until the root itself is updated.
        assert!(tree.root_node().items().iter().any(|i| i.id == 1));
        tree.update_node(tree.root()).unwrap();
        assert!(tree.root_node().items().is_empty());
    }

    #[test]
    fn prune_collapses_empty_subtrees() {
        let mut tree = small(1, 5);
        let a = Boxed::new(1, b(10.0, 10.0, 5.0, 5.0));
        let c = Boxed::new(2, b(900.0, 900.0, 5.0, 5.0));
        tree.insert(a);
        tree.insert(c);
        let before = tree.node_count();
        assert!(before > 1);

        tree.remove(&a);
        assert_eq!(tree.prune(), 1);
        assert!(!tree.root_node().is_leaf(), "SE still holds an item");

        tree.remove(&c);
        assert_eq!(tree.prune(), 0);
        assert!(tree.root_node().is_leaf());
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn prune_keeps_deep_items() {
        let mut tree = small(1, 5);
        // Two items close together force several levels of splitting.
        tree.insert(Boxed::new(1, b(1.0, 1.0, 1.0, 1.0)));
        tree.insert(Boxed::new(2, b(3.0, 3.0, 1.0, 1.0)));
        assert!(tree.depth() >= 2);
        assert_eq!(tree.prune(), 2);
        assert_eq!(tree.len(), 2);
        assert!(tree.get(1).is_some() && tree.get(2).is_some());
    }

    #[test]
    fn merge_folds_sparse_subtrees() {
        let mut tree = small(2, 5);
        for i in 0..3 {
            tree.insert(Boxed::new(i, b(10.0 + f64::from(i) * 300.0, 10.0, 5.0, 5.0)));
        }
        assert!(!tree.root_node().is_leaf());
        tree.remove_by_id(0);
        assert_eq!(tree.merge(), 2);
        assert!(tree.root_node().is_leaf());
        assert_eq!(tree.root_node().items().len(), 2);
    }

    #[test]
    fn stale_handles_are_rejected() {
        let mut tree = small(1, 5);
        tree.insert(Boxed::new(1, b(10.0, 10.0, 5.0, 5.0)));
        tree.insert(Boxed::new(2, b(900.0, 900.0, 5.0, 5.0)));
        let nw = tree.root_node().child(Quadrant::Nw).unwrap().id();
        tree.clear();
        assert!(!tree.is_alive(nw));
        assert_eq!(tree.update_node(nw), Err(TreeError::StaleNode(nw)));
        assert!(tree.node_ref(nw).is_none());

        // Slots are reused with a fresh generation.
        tree.insert(Boxed::new(1, b(10.0, 10.0, 5.0, 5.0)));
        tree.insert(Boxed::new(2, b(900.0, 900.0, 5.0, 5.0)));
        let again = tree.root_node().child(Quadrant::Nw).unwrap().id();
        assert!(!tree.is_alive(nw));
        assert!(tree.is_alive(again));
        assert_ne!(again, nw);
    }

    #[test]
    fn clear_items_non_recursive_keeps_children() {
        let mut tree = small(1, 5);
        tree.insert(Boxed::new(1, b(490.0, 10.0, 20.0, 5.0)));
        tree.insert(Boxed::new(2, b(10.0, 10.0, 5.0, 5.0)));
        tree.clear_items(tree.root(), false).unwrap();
        assert!(!tree.root_node().is_leaf());
        assert_eq!(tree.len(), 1);

        tree.clear_items(tree.root(), true).unwrap();
        assert!(tree.root_node().is_leaf());
        assert!(tree.is_empty());
    }

    #[test]
    fn clear_children_keeps_own_items() {
        let mut tree = small(1, 5);
        tree.insert(Boxed::new(1, b(490.0, 10.0, 20.0, 5.0)));
        tree.insert(Boxed::new(2, b(10.0, 10.0, 5.0, 5.0)));
        tree.clear_children(tree.root()).unwrap();
        assert!(tree.root_node().is_leaf());
        assert_eq!(tree.len(), 1);
        assert!(tree.get(1).is_some());
    }

    #[test]
    fn reassign_moves_to_parent() {
        let mut tree = small(1, 5);
        tree.insert(Boxed::new(1, b(10.0, 10.0, 5.0, 5.0)));
        tree.insert(Boxed::new(2, b(900.0, 900.0, 5.0, 5.0)));
        let nw = tree.root_node().child(Quadrant::Nw).unwrap().id();

        assert_eq!(tree.reassign(nw, 1), Ok(true));
        assert_eq!(tree.reassign(nw, 1), Ok(false));
        assert_eq!(tree.reassign(tree.root(), 1), Ok(false));
        assert_eq!(tree.root_node().items()[0].id, 1);

        let se = tree.root_node().child(Quadrant::Se).unwrap().id();
        assert_eq!(tree.reassign_all(se), Ok(1));
        assert_eq!(tree.root_node().items().len(), 2);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn retrieve_collects_chain_deepest_first() {
        let mut tree = small(1, 5);
        let straddler = Boxed::new(1, b(490.0, 10.0, 20.0, 5.0));
        tree.insert(straddler);
        tree.insert(Boxed::new(2, b(10.0, 10.0, 5.0, 5.0)));
        tree.insert(Boxed::new(3, b(900.0, 900.0, 5.0, 5.0)));

        let hits: Vec<u32> = tree
            .retrieve(&b(20.0, 20.0, 2.0, 2.0))
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(hits, vec![2, 1]);

        // A target spanning the root's split lines only sees the root's items.
        let wide: Vec<u32> = tree
            .retrieve(&b(400.0, 400.0, 200.0, 200.0))
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(wide, vec![1]);
    }

    #[test]
    fn uneven_ratio_shapes_children() {
        let config = TreeConfig::default()
            .with_max_items_in_node(1)
            .with_split_ratio(SplitRatio::new(25.0, 75.0).unwrap());
        let mut tree = Quadtree::with_config(world(), config).unwrap();
        tree.insert(Boxed::new(1, b(10.0, 10.0, 5.0, 5.0)));
        tree.insert(Boxed::new(2, b(900.0, 900.0, 5.0, 5.0)));
        let nw = tree.root_node().child(Quadrant::Nw).unwrap();
        assert_eq!(nw.bounds(), b(0.0, 0.0, 250.0, 750.0));
        let se = tree.root_node().child(Quadrant::Se).unwrap();
        assert_eq!(se.bounds(), b(250.0, 750.0, 750.0, 250.0));
        assert_eq!(se.items()[0].id, 2);
    }

    #[test]
    fn items_outside_root_stay_at_root() {
        let mut tree = small(1, 5);
        let outside = Boxed::new(1, b(2000.0, 2000.0, 5.0, 5.0));
        tree.insert(outside);
        tree.insert(Boxed::new(2, b(10.0, 10.0, 5.0, 5.0)));
        tree.update();
        assert_eq!(tree.locate(&outside), Some(tree.root()));
    }
}
