/// Per-canvas occupancy state over a coarse grid.
///
/// Cells are addressed as `(x, y)` with `x < cols`, `y < rows`, stored
/// row-major. A cell is occupied once any placed sprite's footprint covers
/// it; cells are never freed within a canvas's lifetime.
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    cols: u32,
    rows: u32,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// Grid sized for a `width x height` pixel canvas with square cells of
    /// `grid_size` pixels. Floor division: a trailing strip narrower than one
    /// cell is unusable slack, not a partial cell.
    pub fn new(width: u32, height: u32, grid_size: u32) -> Self {
        let cols = width / grid_size;
        let rows = height / grid_size;
        Self {
            cols,
            rows,
            cells: vec![false; (cols as usize) * (rows as usize)],
        }
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Footprint of a `w x h` pixel sprite in cells, by ceiling division: a
    /// sprite smaller than one cell still reserves a full cell, and one that
    /// straddles a cell boundary reserves the next cell too.
    pub fn cell_span(grid_size: u32, w: u32, h: u32) -> (u32, u32) {
        (w.div_ceil(grid_size), h.div_ceil(grid_size))
    }

    /// True when a `w_cells x h_cells` footprint fits with its top-left at
    /// cell `(x, y)`. Bounds are checked before any cell data is touched;
    /// otherwise every cell in the rectangle must be unoccupied.
    pub fn fits(&self, x: u32, y: u32, w_cells: u32, h_cells: u32) -> bool {
        if x + w_cells > self.cols || y + h_cells > self.rows {
            return false;
        }
        for j in y..y + h_cells {
            for i in x..x + w_cells {
                if self.cells[(j as usize) * (self.cols as usize) + i as usize] {
                    return false;
                }
            }
        }
        true
    }

    /// Occupies every cell in the footprint. Callers must have just verified
    /// `fits` for the same rectangle; no overlap re-check is performed.
    pub fn mark(&mut self, x: u32, y: u32, w_cells: u32, h_cells: u32) {
        for j in y..y + h_cells {
            for i in x..x + w_cells {
                self.cells[(j as usize) * (self.cols as usize) + i as usize] = true;
            }
        }
    }

    /// True if the cell at `(x, y)` is occupied.
    pub fn occupied(&self, x: u32, y: u32) -> bool {
        self.cells[(y as usize) * (self.cols as usize) + x as usize]
    }
}
