// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by tree construction and node-scoped operations.

use understory_aabb::GeometryError;

use crate::types::NodeId;

/// Errors from [`Quadtree`](crate::Quadtree) operations.
///
/// A missing item is not an error: removal and lookup return `None` for it.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum TreeError {
    /// Root bounds or split ratio were built from invalid values.
    #[error(transparent)]
    InvalidGeometry(#[from] GeometryError),
    /// A [`TreeConfig`](crate::TreeConfig) value the tree cannot work with.
    #[error("invalid tree configuration: {reason}")]
    InvalidConfig {
        /// What was wrong.
        reason: &'static str,
    },
    /// A traversal was requested with neither a pre-order nor a post-order callback.
    #[error("traversal needs at least one of a pre-order or post-order callback")]
    MissingCallback,
    /// The node handle no longer refers to a live node.
    #[error("node {0:?} is not part of the tree")]
    StaleNode(NodeId),
}
