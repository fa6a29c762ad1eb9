use serde::{Deserialize, Serialize};

/// Packing configuration.
/// Key notes:
///   - canvases are always exactly `max_width` x `max_height` RGBA pixels
///   - placements snap to multiples of `grid_size`
///   - sprites wider/taller than the sprite cap are rejected, never placed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackerConfig {
    /// Canvas width in pixels.
    pub max_width: u32,
    /// Canvas height in pixels.
    pub max_height: u32,
    /// Grid alignment step in pixels. Sprite footprints are reserved in whole
    /// cells of this size.
    pub grid_size: u32,
    /// Per-sprite width cap in pixels.
    pub max_sprite_width: u32,
    /// Per-sprite height cap in pixels.
    pub max_sprite_height: u32,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            max_width: 256,
            max_height: 256,
            grid_size: 48,
            max_sprite_width: 96,
            max_sprite_height: 96,
        }
    }
}

impl PackerConfig {
    /// Number of grid columns on one canvas (floor division; a trailing strip
    /// narrower than `grid_size` is unusable slack).
    pub fn cols(&self) -> u32 {
        self.max_width / self.grid_size
    }

    /// Number of grid rows on one canvas.
    pub fn rows(&self) -> u32 {
        self.max_height / self.grid_size
    }

    /// Validates the configuration parameters.
    ///
    /// Returns an error if:
    /// - Canvas dimensions are zero
    /// - The grid step is zero, or larger than the canvas (no usable cells)
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::TilesetPackerError;

        if self.max_width == 0 || self.max_height == 0 {
            return Err(TilesetPackerError::InvalidDimensions {
                width: self.max_width,
                height: self.max_height,
            });
        }

        if self.grid_size == 0 {
            return Err(TilesetPackerError::InvalidConfig(
                "grid_size must be non-zero".into(),
            ));
        }

        if self.grid_size > self.max_width || self.grid_size > self.max_height {
            return Err(TilesetPackerError::InvalidConfig(format!(
                "grid_size ({}) exceeds canvas dimensions ({}x{}); no cell fits",
                self.grid_size, self.max_width, self.max_height
            )));
        }

        // The sprite cap may exceed the canvas; such sprites pass the cap but
        // can never fit a cell footprint, and the session's no-progress guard
        // stops on them. Not a configuration error.

        Ok(())
    }
}

/// Builder for `PackerConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct PackerConfigBuilder {
    cfg: PackerConfig,
}

impl PackerConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: PackerConfig::default(),
        }
    }
    pub fn with_max_dimensions(mut self, w: u32, h: u32) -> Self {
        self.cfg.max_width = w;
        self.cfg.max_height = h;
        self
    }
    pub fn grid_size(mut self, v: u32) -> Self {
        self.cfg.grid_size = v;
        self
    }
    pub fn max_sprite_size(mut self, w: u32, h: u32) -> Self {
        self.cfg.max_sprite_width = w;
        self.cfg.max_sprite_height = h;
        self
    }
    pub fn build(self) -> PackerConfig {
        self.cfg
    }
}

impl PackerConfig {
    /// Create a fluent builder for `PackerConfig`.
    pub fn builder() -> PackerConfigBuilder {
        PackerConfigBuilder::new()
    }
}
