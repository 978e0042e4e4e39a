// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Moving bodies.
//!
//! Step a handful of bouncing boxes, settle them with `update`, and count colliding pairs
//! each frame. Set `RUST_LOG=understory_quadtree=trace` to watch items change nodes.
//!
//! Run:
//! - `cargo run -p understory_examples --example quadtree_moving`

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;
use understory_aabb::{Aabb, GeometryError};
use understory_quadtree::{Item, Quadtree, TreeConfig};

const SIZE: f64 = 500.0;

#[derive(Debug)]
struct Body {
    id: u32,
    bounds: Aabb,
    vx: f64,
    vy: f64,
}

impl Item for Body {
    type Id = u32;

    fn id(&self) -> u32 {
        self.id
    }

    fn bounds(&self) -> Aabb {
        self.bounds
    }
}

impl Body {
    fn step(&mut self) -> Result<(), GeometryError> {
        let (w, h) = (self.bounds.width(), self.bounds.height());
        let mut x = self.bounds.x() + self.vx;
        let mut y = self.bounds.y() + self.vy;
        if x < 0.0 || x + w > SIZE {
            self.vx = -self.vx;
            x = x.clamp(0.0, SIZE - w);
        }
        if y < 0.0 || y + h > SIZE {
            self.vy = -self.vy;
            y = y.clamp(0.0, SIZE - h);
        }
        self.bounds = Aabb::new(x, y, w, h)?;
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut rng = StdRng::seed_from_u64(2025);
    let config = TreeConfig::default()
        .with_max_items_in_node(4)
        .with_max_levels_in_tree(6);
    let mut tree = Quadtree::with_config(Aabb::new(0.0, 0.0, SIZE, SIZE)?, config)?;
    for id in 0..200 {
        let size = rng.random_range(2.0..12.0);
        tree.insert(Body {
            id,
            bounds: Aabb::new(
                rng.random_range(0.0..SIZE - size),
                rng.random_range(0.0..SIZE - size),
                size,
                size,
            )?,
            vx: rng.random_range(-4.0..4.0),
            vy: rng.random_range(-4.0..4.0),
        });
    }

    for frame in 0..10 {
        for body in tree.items_mut() {
            body.step()?;
        }
        tree.update();
        let merged_to = tree.merge();

        // A pair is seen from whichever body sits deeper, or from both at the same node.
        let mut pairs = BTreeSet::new();
        for body in tree.retrieve_all() {
            for other in tree.retrieve(&body.bounds) {
                if other.id != body.id && other.bounds.intersects(&body.bounds) {
                    pairs.insert((body.id.min(other.id), body.id.max(other.id)));
                }
            }
        }
        info!(
            frame,
            nodes = tree.node_count(),
            depth = tree.depth(),
            items = merged_to,
            pairs = pairs.len(),
            "stepped"
        );
    }
    Ok(())
}
