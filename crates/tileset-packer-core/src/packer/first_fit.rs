use super::Packer;
use crate::config::PackerConfig;
use crate::grid::OccupancyGrid;
use crate::model::{CellRect, Frame, Rect};

/// First-fit placement over one page's occupancy grid.
///
/// Candidate cells are scanned in row-major order (`y` outer, `x` inner),
/// starting from the origin for every sprite; the first position whose
/// footprint fits wins. No attempt is made to minimize fragmentation.
pub struct FirstFitPacker {
    config: PackerConfig,
    grid: OccupancyGrid,
}

impl FirstFitPacker {
    pub fn new(config: PackerConfig) -> Self {
        let grid = OccupancyGrid::new(config.max_width, config.max_height, config.grid_size);
        Self { config, grid }
    }

    /// Occupancy state of the page under construction.
    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    fn find_first_fit(&self, w_cells: u32, h_cells: u32) -> Option<(u32, u32)> {
        for y in 0..self.grid.rows() {
            for x in 0..self.grid.cols() {
                if self.grid.fits(x, y, w_cells, h_cells) {
                    return Some((x, y));
                }
            }
        }
        None
    }
}

impl<K> Packer<K> for FirstFitPacker {
    fn can_pack(&self, w: u32, h: u32) -> bool {
        let (wc, hc) = OccupancyGrid::cell_span(self.config.grid_size, w, h);
        self.find_first_fit(wc, hc).is_some()
    }

    fn pack(&mut self, key: K, w: u32, h: u32) -> Option<Frame<K>> {
        let (wc, hc) = OccupancyGrid::cell_span(self.config.grid_size, w, h);
        let (x, y) = self.find_first_fit(wc, hc)?;
        self.grid.mark(x, y, wc, hc);
        let frame = Rect::new(x * self.config.grid_size, y * self.config.grid_size, w, h);
        Some(Frame {
            key,
            frame,
            cells: CellRect::new(x, y, wc, hc),
        })
    }
}
