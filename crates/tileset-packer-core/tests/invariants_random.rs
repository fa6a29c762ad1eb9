use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;
use tileset_packer_core::config::PackerConfig;
use tileset_packer_core::model::Frame;
use tileset_packer_core::pipeline::pack_layout;

fn disjoint(frames: &[Frame]) -> bool {
    for i in 0..frames.len() {
        for j in (i + 1)..frames.len() {
            if frames[i].cells.intersects(&frames[j].cells) {
                return false;
            }
        }
    }
    true
}

/// Random sprite mixes: every page keeps footprints disjoint and in bounds,
/// and every input ends in exactly one of placed / rejected / unplaced.
#[test]
fn random_runs_keep_invariants() {
    let mut rng = StdRng::seed_from_u64(0x7153_5e75);
    for round in 0..20 {
        let cfg = PackerConfig::default();
        let n = rng.gen_range(1..=80);
        let inputs: Vec<(String, u32, u32)> = (0..n)
            .map(|i| {
                (
                    format!("r{round}_s{i}"),
                    rng.gen_range(1..=120),
                    rng.gen_range(1..=120),
                )
            })
            .collect();
        let all_keys: BTreeSet<String> = inputs.iter().map(|(k, _, _)| k.clone()).collect();

        let out = pack_layout(inputs, cfg.clone()).unwrap();

        let cols = cfg.cols();
        let rows = cfg.rows();
        let mut seen: BTreeSet<String> = BTreeSet::new();
        for page in &out.atlas.pages {
            assert!(disjoint(&page.frames), "overlap on page {}", page.id);
            for f in &page.frames {
                assert!(f.cells.x + f.cells.w <= cols, "x overflow: {:?}", f.cells);
                assert!(f.cells.y + f.cells.h <= rows, "y overflow: {:?}", f.cells);
                assert!(seen.insert(f.key.clone()), "{} placed twice", f.key);
            }
        }
        for r in &out.rejected {
            assert!(
                r.w > cfg.max_sprite_width || r.h > cfg.max_sprite_height,
                "{} rejected but within cap",
                r.key
            );
            assert!(seen.insert(r.key.clone()), "{} both placed and rejected", r.key);
        }
        for k in &out.unplaced {
            assert!(seen.insert(k.clone()), "{} both placed and unplaced", k);
        }
        assert_eq!(seen, all_keys, "conservation violated in round {round}");
    }
}

/// With the default config the cap never exceeds the canvas, so any sprite
/// passing the cap fits an empty grid and nothing is ever left unplaced.
#[test]
fn cap_within_canvas_leaves_nothing_unplaced() {
    let mut rng = StdRng::seed_from_u64(42);
    let cfg = PackerConfig::default();
    let inputs: Vec<(String, u32, u32)> = (0..100)
        .map(|i| {
            (
                format!("s{i}"),
                rng.gen_range(1..=96),
                rng.gen_range(1..=96),
            )
        })
        .collect();

    let out = pack_layout(inputs, cfg).unwrap();
    assert!(out.rejected.is_empty());
    assert!(out.unplaced.is_empty());
    let placed: usize = out.atlas.pages.iter().map(|p| p.frames.len()).sum();
    assert_eq!(placed, 100);
}
