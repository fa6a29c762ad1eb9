use image::RgbaImage;

/// Copy `src` into `canvas` with its top-left at `(dx, dy)`.
///
/// A straight per-pixel copy; pixels falling outside the canvas bounds are
/// dropped. Grid-aligned placements never overhang the canvas, so the guard
/// only matters for callers composing by hand.
pub fn blit_rgba(src: &RgbaImage, canvas: &mut RgbaImage, dx: u32, dy: u32) {
    let (cw, ch) = canvas.dimensions();
    let (sw, sh) = src.dimensions();
    for yy in 0..sh {
        for xx in 0..sw {
            if dx + xx < cw && dy + yy < ch {
                let px = *src.get_pixel(xx, yy);
                canvas.put_pixel(dx + xx, dy + yy, px);
            }
        }
    }
}
