// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use understory_quadtree::{Aabb, Boxed, Quadtree, SplitRatio, TreeConfig};

const WORLD: f64 = 2000.0;

fn world() -> Aabb {
    Aabb::new(0.0, 0.0, WORLD, WORLD).unwrap()
}

fn gen_random_items(count: u32, size: f64, seed: u64) -> Vec<Boxed<u32>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|id| {
            let x = rng.random_range(0.0..WORLD - size);
            let y = rng.random_range(0.0..WORLD - size);
            Boxed::new(id, Aabb::new(x, y, size, size).unwrap())
        })
        .collect()
}

fn gen_clustered_items(n_clusters: u32, per_cluster: u32, spread: f64) -> Vec<Boxed<u32>> {
    let mut rng = StdRng::seed_from_u64(0xC1A5_7E55_9999_ABCD);
    let mut out = Vec::with_capacity((n_clusters * per_cluster) as usize);
    for c in 0..n_clusters {
        let cx = rng.random_range(spread..WORLD - spread);
        let cy = rng.random_range(spread..WORLD - spread);
        for i in 0..per_cluster {
            let dx = rng.random_range(-0.5..0.5) * spread;
            let dy = rng.random_range(-0.5..0.5) * spread;
            let id = c * per_cluster + i;
            out.push(Boxed::new(id, Aabb::new(cx + dx, cy + dy, 6.0, 6.0).unwrap()));
        }
    }
    out
}

fn build(items: &[Boxed<u32>], config: TreeConfig) -> Quadtree<Boxed<u32>> {
    let mut tree = Quadtree::with_config(world(), config).unwrap();
    for item in items {
        tree.insert(*item);
    }
    tree
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for &n in &[1_000_u32, 10_000] {
        let items = gen_random_items(n, 8.0, 0xCAFE_F00D_DEAD_BEEF);
        group.throughput(Throughput::Elements(u64::from(n)));
        group.bench_function(format!("random_n{n}"), |b| {
            b.iter(|| black_box(build(&items, TreeConfig::default())));
        });
    }
    let items = gen_clustered_items(16, 500, 120.0);
    group.bench_function("clustered_8000", |b| {
        b.iter(|| black_box(build(&items, TreeConfig::default().with_max_levels_in_tree(8))));
    });
    let ratio = SplitRatio::new(30.0, 70.0).unwrap();
    let items = gen_random_items(10_000, 8.0, 0xBADC_F00D_1234_5678);
    group.bench_function("uneven_ratio_n10000", |b| {
        b.iter(|| black_box(build(&items, TreeConfig::default().with_split_ratio(ratio))));
    });
    group.finish();
}

fn bench_retrieve(c: &mut Criterion) {
    let mut group = c.benchmark_group("retrieve");
    let items = gen_random_items(10_000, 8.0, 0xFACE_FEED_CAFE_BABE);
    let tree = build(&items, TreeConfig::default());
    group.throughput(Throughput::Elements(items.len() as u64));
    group.bench_function("every_item_n10000", |b| {
        b.iter(|| {
            let candidates: usize = items.iter().map(|i| tree.retrieve(&i.bounds).len()).sum();
            black_box(candidates);
        });
    });
    group.finish();
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("update");
    let items = gen_random_items(10_000, 8.0, 0x0DDB_A11C_0FFE_E000);
    let tree = build(&items, TreeConfig::default());
    group.bench_function("jitter_all_n10000", |b| {
        b.iter_batched(
            || (clone_tree(&tree, &items), StdRng::seed_from_u64(1)),
            |(mut tree, mut rng)| {
                for item in tree.items_mut() {
                    let x = (item.bounds.x() + rng.random_range(-20.0..20.0)).clamp(0.0, WORLD - 8.0);
                    let y = (item.bounds.y() + rng.random_range(-20.0..20.0)).clamp(0.0, WORLD - 8.0);
                    item.set_bounds(Aabb::new(x, y, 8.0, 8.0).unwrap());
                }
                tree.update();
                black_box(tree.len());
            },
            BatchSize::LargeInput,
        );
    });
    group.bench_function("remove_all_then_prune_n10000", |b| {
        b.iter_batched(
            || clone_tree(&tree, &items),
            |mut tree| {
                for item in &items {
                    black_box(tree.remove(item));
                }
                black_box(tree.prune());
            },
            BatchSize::LargeInput,
        );
    });
    group.finish();
}

// The tree is not `Clone`; rebuilding from the same items gives an identical layout.
fn clone_tree(tree: &Quadtree<Boxed<u32>>, items: &[Boxed<u32>]) -> Quadtree<Boxed<u32>> {
    build(items, *tree.config())
}

criterion_group!(benches, bench_insert, bench_retrieve, bench_update);
criterion_main!(benches);
