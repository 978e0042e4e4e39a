// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadtree basics.
//!
//! Fill a tree from Kurbo rectangles, print its layout, and narrow broad-phase
//! candidates down to real overlaps.
//!
//! Run:
//! - `cargo run -p understory_examples --example quadtree_basics`

use kurbo::Rect;
use understory_aabb::Aabb;
use understory_quadtree::{Boxed, Quadtree, TreeConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let world = Aabb::try_from(Rect::new(0.0, 0.0, 400.0, 400.0))?;
    let mut tree = Quadtree::with_config(world, TreeConfig::default().with_max_items_in_node(2))?;

    let shapes = [
        ("house", Rect::new(20.0, 20.0, 60.0, 50.0)),
        ("tree", Rect::new(70.0, 30.0, 80.0, 45.0)),
        ("well", Rect::new(40.0, 60.0, 50.0, 70.0)),
        ("road", Rect::new(0.0, 195.0, 400.0, 205.0)),
        ("barn", Rect::new(300.0, 300.0, 360.0, 340.0)),
        ("fence", Rect::new(290.0, 350.0, 380.0, 352.0)),
        ("pond", Rect::new(320.0, 40.0, 360.0, 80.0)),
    ];
    for (name, rect) in shapes {
        tree.insert(Boxed::new(name, Aabb::try_from(rect)?));
    }

    println!("{} items in {} nodes, depth {}", tree.len(), tree.node_count(), tree.depth());
    for line in tree.describe() {
        println!("  {line}");
    }

    // Broad phase, then an exact overlap test on what came back.
    let probe = Aabb::try_from(Rect::new(35.0, 40.0, 55.0, 65.0))?;
    let candidates = tree.retrieve(&probe);
    let hits: Vec<_> = candidates
        .iter()
        .filter(|item| item.bounds.intersects(&probe))
        .map(|item| item.id)
        .collect();
    println!(
        "probe {:?}: {} candidates, hits {hits:?}",
        Rect::from(probe),
        candidates.len()
    );
    assert!(hits.contains(&"house") && hits.contains(&"well"));
    assert!(!hits.contains(&"barn"));

    // The road crosses the horizontal split line, so it stays at the root.
    let road = tree.get("road").copied().ok_or("road missing")?;
    assert_eq!(tree.locate(&road), Some(tree.root()));
    Ok(())
}
