//! Core library for packing sprites onto fixed-size tileset canvases.
//!
//! - Algorithm: coarse occupancy grid + first-fit placement in row-major scan order
//! - Pipeline: `pack_sprites` takes in-memory images and returns RGBA pages + metadata;
//!   `pack_layout` computes placements only (no pixel data)
//! - Data model is serde-serializable; a JSON manifest exporter is provided.
//!
//! Quick example:
//! ```ignore
//! use image::ImageReader;
//! use tileset_packer_core::{InputImage, PackerConfig, pack_sprites};
//! # fn main() -> anyhow::Result<()> {
//! let img1 = ImageReader::open("a.png")?.decode()?;
//! let img2 = ImageReader::open("b.png")?.decode()?;
//! let inputs = vec![
//!   InputImage { key: "a".into(), image: img1 },
//!   InputImage { key: "b".into(), image: img2 },
//! ];
//! let cfg = PackerConfig::default();
//! let out = pack_sprites(inputs, cfg)?;
//! println!("pages: {}", out.pages.len());
//! # Ok(()) }
//! ```

pub mod compositing;
pub mod config;
pub mod error;
pub mod export;
pub mod grid;
pub mod model;
pub mod packer;
pub mod pipeline;

pub use config::*;
pub use error::*;
pub use export::*;
pub use grid::*;
pub use model::*;
pub use packer::*;
pub use pipeline::*;

/// Convenience prelude for common types and functions.
/// Importing `tileset_packer_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{PackerConfig, PackerConfigBuilder};
    pub use crate::grid::OccupancyGrid;
    pub use crate::model::{Atlas, CellRect, Frame, Meta, Page, PackStats, Rect};
    pub use crate::packer::{first_fit::FirstFitPacker, Packer};
    pub use crate::{
        pack_layout, pack_sprites, InputImage, LayoutOutput, OutputPage, PackOutput,
        RejectedSprite,
    };
}
