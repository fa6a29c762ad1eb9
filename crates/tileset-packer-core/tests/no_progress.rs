use tileset_packer_core::config::PackerConfig;
use tileset_packer_core::pipeline::pack_layout;

/// With the sprite cap above the canvas size, a sprite can pass the cap yet
/// never fit an empty grid. The session must stop instead of opening canvases
/// forever, leaving the sprite unplaced and unconsumed.
#[test]
fn session_terminates_when_nothing_fits() {
    let cfg = PackerConfig {
        max_width: 64,
        max_height: 64,
        grid_size: 48,
        max_sprite_width: 96,
        max_sprite_height: 96,
    };
    // 80x80 is within the cap but spans 2x2 cells on a 1x1 grid.
    let out = pack_layout(vec![("stuck", 80, 80)], cfg).unwrap();

    assert!(out.atlas.pages.is_empty());
    assert!(out.rejected.is_empty());
    assert_eq!(out.unplaced, vec!["stuck".to_string()]);
}

/// Placeable sprites still get their pages before the session gives up on
/// the unplaceable remainder.
#[test]
fn progress_then_termination() {
    let cfg = PackerConfig {
        max_width: 64,
        max_height: 64,
        grid_size: 48,
        max_sprite_width: 96,
        max_sprite_height: 96,
    };
    let inputs = vec![("fits", 40, 40), ("stuck", 80, 80), ("fits_too", 48, 48)];

    let out = pack_layout(inputs, cfg).unwrap();
    // Page one takes "fits"; "fits_too" no longer fits the single cell and
    // carries over with "stuck". Page two takes "fits_too". The third pass
    // places nothing and ends the session.
    assert_eq!(out.atlas.pages.len(), 2);
    assert_eq!(out.atlas.pages[0].frames[0].key, "fits");
    assert_eq!(out.atlas.pages[1].frames[0].key, "fits_too");
    assert_eq!(out.unplaced, vec!["stuck".to_string()]);
}

/// A run whose inputs are all oversized ends after one pass with no pages
/// and everything in the rejected set.
#[test]
fn all_rejected_ends_cleanly() {
    let cfg = PackerConfig::default();
    let out = pack_layout(vec![("a", 200, 10), ("b", 10, 200)], cfg).unwrap();

    assert!(out.atlas.pages.is_empty());
    assert!(out.unplaced.is_empty());
    assert_eq!(out.rejected.len(), 2);
}
