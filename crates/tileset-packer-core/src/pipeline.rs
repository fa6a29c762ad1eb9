use crate::compositing::blit_rgba;
use crate::config::PackerConfig;
use crate::error::{Result, TilesetPackerError};
use crate::model::{Atlas, Frame, Meta, Page};
use crate::packer::first_fit::FirstFitPacker;
use crate::packer::Packer;
use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{instrument, warn};

/// In-memory sprite to pack (key + decoded image).
pub struct InputImage {
    pub key: String,
    pub image: DynamicImage,
}

/// Output RGBA page and its logical page record.
pub struct OutputPage {
    pub page: Page,
    pub rgba: RgbaImage,
}

/// A sprite excluded from packing because it exceeds the per-sprite cap.
/// Rejection is permanent for the run; the sprite is never consumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedSprite {
    pub key: String,
    pub w: u32,
    pub h: u32,
}

/// Output of a packing run: atlas metadata, RGBA pages, and the sprites that
/// did not make it onto any page.
pub struct PackOutput {
    pub atlas: Atlas,
    pub pages: Vec<OutputPage>,
    /// Sprites over the size cap, excluded for the whole run.
    pub rejected: Vec<RejectedSprite>,
    /// Sprites still pending when a full pass placed nothing.
    pub unplaced: Vec<String>,
}

impl PackOutput {
    /// Computes packing statistics for this output.
    /// This is a convenience method that delegates to `atlas.stats()`.
    pub fn stats(&self) -> crate::model::PackStats {
        self.atlas.stats()
    }

    /// Keys of every sprite placed on some page, page by page in placement
    /// order. These are the consumed sources a driver may delete.
    pub fn placed_keys(&self) -> Vec<&str> {
        self.atlas
            .pages
            .iter()
            .flat_map(|p| p.frames.iter().map(|f| f.key.as_str()))
            .collect()
    }
}

/// Output of a layout-only run: placements without pixel data.
pub struct LayoutOutput {
    pub atlas: Atlas,
    pub rejected: Vec<RejectedSprite>,
    pub unplaced: Vec<String>,
}

#[instrument(skip_all)]
/// Packs `inputs` onto fixed-size tileset canvases using configuration `cfg`
/// and returns metadata and RGBA pages.
///
/// Notes:
/// - Input order is the placement scan order; no sorting is performed.
/// - Every page is exactly `max_width` x `max_height`, transparent where no
///   sprite was pasted.
/// - Oversized and unplaceable sprites are returned in `rejected` /
///   `unplaced` rather than treated as errors.
pub fn pack_sprites(inputs: Vec<InputImage>, cfg: PackerConfig) -> Result<PackOutput> {
    // Validate configuration first
    cfg.validate()?;

    if inputs.is_empty() {
        return Err(TilesetPackerError::Empty);
    }

    // Decode once up front; dimensions drive the session, pixels are only
    // touched again when compositing.
    let prepared: Vec<(String, RgbaImage)> = inputs
        .into_iter()
        .map(|inp| (inp.key, inp.image.to_rgba8()))
        .collect();
    let items: Vec<Pending> = prepared
        .iter()
        .map(|(key, rgba)| {
            let (w, h) = rgba.dimensions();
            Pending {
                key: key.clone(),
                w,
                h,
            }
        })
        .collect();

    let session = run_session(items, &cfg);

    // Map for quick lookup during compositing
    let prep_map: HashMap<&str, &RgbaImage> = prepared
        .iter()
        .map(|(key, rgba)| (key.as_str(), rgba))
        .collect();

    let mut pages: Vec<OutputPage> = Vec::new();
    let mut atlas_pages: Vec<Page> = Vec::new();
    for (id, frames) in session.page_frames.into_iter().enumerate() {
        let mut canvas = RgbaImage::new(cfg.max_width, cfg.max_height);
        for f in &frames {
            if let Some(src) = prep_map.get(f.key.as_str()) {
                blit_rgba(src, &mut canvas, f.frame.x, f.frame.y);
            }
        }
        let page = Page {
            id,
            width: cfg.max_width,
            height: cfg.max_height,
            frames,
        };
        pages.push(OutputPage {
            page: page.clone(),
            rgba: canvas,
        });
        atlas_pages.push(page);
    }

    let atlas = Atlas {
        pages: atlas_pages,
        meta: make_meta(&cfg),
    };
    Ok(PackOutput {
        atlas,
        pages,
        rejected: session.rejected,
        unplaced: session.unplaced,
    })
}

#[instrument(skip_all)]
/// Packs sizes onto pages without compositing pixel data.
/// Inputs are (key, width, height). Same session semantics as `pack_sprites`;
/// lets callers and tests drive the packer with no image decoding.
pub fn pack_layout<K: Into<String>>(
    inputs: Vec<(K, u32, u32)>,
    cfg: PackerConfig,
) -> Result<LayoutOutput> {
    // Validate configuration first
    cfg.validate()?;

    if inputs.is_empty() {
        return Err(TilesetPackerError::Empty);
    }

    let items: Vec<Pending> = inputs
        .into_iter()
        .map(|(k, w, h)| Pending {
            key: k.into(),
            w,
            h,
        })
        .collect();

    let session = run_session(items, &cfg);

    let atlas_pages: Vec<Page> = session
        .page_frames
        .into_iter()
        .enumerate()
        .map(|(id, frames)| Page {
            id,
            width: cfg.max_width,
            height: cfg.max_height,
            frames,
        })
        .collect();

    Ok(LayoutOutput {
        atlas: Atlas {
            pages: atlas_pages,
            meta: make_meta(&cfg),
        },
        rejected: session.rejected,
        unplaced: session.unplaced,
    })
}

struct Pending {
    key: String,
    w: u32,
    h: u32,
}

struct SessionOutcome {
    page_frames: Vec<Vec<Frame>>,
    rejected: Vec<RejectedSprite>,
    unplaced: Vec<String>,
}

/// One packing session: open a canvas, make a single forward pass over the
/// pending list in its existing order, repeat with the leftovers until
/// everything is placed or a full pass places nothing.
fn run_session(items: Vec<Pending>, cfg: &PackerConfig) -> SessionOutcome {
    let mut pending = items;
    let mut rejected: Vec<RejectedSprite> = Vec::new();
    let mut page_frames: Vec<Vec<Frame>> = Vec::new();

    while !pending.is_empty() {
        let mut packer = FirstFitPacker::new(cfg.clone());
        let mut frames: Vec<Frame> = Vec::new();
        // The next pass's pending list is rebuilt explicitly; the list being
        // scanned is never mutated under iteration.
        let mut still_pending: Vec<Pending> = Vec::new();

        for item in pending {
            if item.w > cfg.max_sprite_width || item.h > cfg.max_sprite_height {
                warn!(
                    key = %item.key,
                    w = item.w,
                    h = item.h,
                    "sprite exceeds size cap; rejected"
                );
                rejected.push(RejectedSprite {
                    key: item.key,
                    w: item.w,
                    h: item.h,
                });
                continue;
            }
            match packer.pack(item.key.clone(), item.w, item.h) {
                Some(f) => frames.push(f),
                None => still_pending.push(item),
            }
        }
        pending = still_pending;

        if frames.is_empty() {
            // A full pass placed nothing; whatever is still pending cannot be
            // placed on an empty grid either. Stop instead of spinning.
            if !pending.is_empty() {
                warn!(
                    count = pending.len(),
                    "no sprite fits an empty canvas; leaving the rest unplaced"
                );
            }
            break;
        }
        page_frames.push(frames);
    }

    SessionOutcome {
        page_frames,
        rejected,
        unplaced: pending.into_iter().map(|p| p.key).collect(),
    }
}

fn make_meta(cfg: &PackerConfig) -> Meta {
    Meta {
        schema_version: "1".into(),
        app: "tileset-packer".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        format: "RGBA8888".into(),
        max_dim: (cfg.max_width, cfg.max_height),
        grid_size: cfg.grid_size,
        sprite_cap: (cfg.max_sprite_width, cfg.max_sprite_height),
    }
}
