use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Inclusive right edge coordinate (`x + w - 1`).
    pub fn right(&self) -> u32 {
        self.x + self.w.saturating_sub(1)
    }
    /// Inclusive bottom edge coordinate (`y + h - 1`).
    pub fn bottom(&self) -> u32 {
        self.y + self.h.saturating_sub(1)
    }
}

/// Rectangle in grid-cell coordinates. `x,y` is the top-left cell; `w,h` are
/// spans in cells.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CellRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl CellRect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Number of cells covered.
    pub fn area(&self) -> u64 {
        (self.w as u64) * (self.h as u64)
    }
    /// Returns true if the cell footprints of `self` and `r` intersect.
    pub fn intersects(&self, r: &CellRect) -> bool {
        !(self.x >= r.x + r.w || r.x >= self.x + self.w || self.y >= r.y + r.h || r.y >= self.y + self.h)
    }
}

/// A placed sprite within a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frame<K = String> {
    /// User-specified key (e.g., filename or asset path).
    pub key: K,
    /// Placed rectangle within the page, in pixels. The origin is always a
    /// multiple of the grid step; width/height are the sprite's own size.
    pub frame: Rect,
    /// Reserved footprint in grid cells (ceiling of the pixel size).
    pub cells: CellRect,
}

/// A single tileset page (logical record).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<K = String> {
    pub id: usize,
    pub width: u32,
    pub height: u32,
    pub frames: Vec<Frame<K>>,
}

/// Atlas-level metadata (common fields used by the exporter and tooling).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    /// Schema version for the JSON manifest. String to allow non-integer
    /// versions like "1.0"; current: "1".
    pub schema_version: String,
    pub app: String,
    pub version: String,
    pub format: String,
    pub max_dim: (u32, u32),
    pub grid_size: u32,
    pub sprite_cap: (u32, u32),
}

/// Atlas of pages and metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Atlas<K = String> {
    pub pages: Vec<Page<K>>,
    pub meta: Meta,
}

/// Statistics about packing efficiency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PackStats {
    /// Total number of pages in the atlas.
    pub num_pages: usize,
    /// Total number of frames (sprites) placed.
    pub num_frames: usize,
    /// Grid cells available across all pages.
    pub total_cells: u64,
    /// Grid cells reserved by placed frames.
    pub used_cells: u64,
    /// Cell occupancy ratio: used_cells / total_cells (0.0 to 1.0).
    pub cell_occupancy: f64,
    /// Total pixel area of all pages.
    pub total_page_area: u64,
    /// Pixel area covered by placed frames.
    pub used_frame_area: u64,
    /// Pixel occupancy ratio: used_frame_area / total_page_area (0.0 to 1.0).
    pub occupancy: f64,
}

impl<K> Atlas<K> {
    /// Computes packing statistics for this atlas.
    pub fn stats(&self) -> PackStats {
        let num_pages = self.pages.len();
        let cells_per_page = ((self.meta.max_dim.0 / self.meta.grid_size) as u64)
            * ((self.meta.max_dim.1 / self.meta.grid_size) as u64);
        let mut num_frames = 0;
        let mut total_page_area = 0u64;
        let mut used_frame_area = 0u64;
        let mut used_cells = 0u64;

        for page in &self.pages {
            total_page_area += (page.width as u64) * (page.height as u64);
            for frame in &page.frames {
                num_frames += 1;
                used_frame_area += (frame.frame.w as u64) * (frame.frame.h as u64);
                used_cells += frame.cells.area();
            }
        }

        let total_cells = cells_per_page * num_pages as u64;
        let cell_occupancy = if total_cells > 0 {
            used_cells as f64 / total_cells as f64
        } else {
            0.0
        };
        let occupancy = if total_page_area > 0 {
            used_frame_area as f64 / total_page_area as f64
        } else {
            0.0
        };

        PackStats {
            num_pages,
            num_frames,
            total_cells,
            used_cells,
            cell_occupancy,
            total_page_area,
            used_frame_area,
            occupancy,
        }
    }
}

impl PackStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Pages: {}, Frames: {}, Cells: {}/{} ({:.2}%), Pixel occupancy: {:.2}%",
            self.num_pages,
            self.num_frames,
            self.used_cells,
            self.total_cells,
            self.cell_occupancy * 100.0,
            self.occupancy * 100.0,
        )
    }

    /// Returns unreserved cells across all pages.
    pub fn free_cells(&self) -> u64 {
        self.total_cells.saturating_sub(self.used_cells)
    }
}
