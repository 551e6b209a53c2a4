//! Pure dimension math. No I/O, no images.

use super::params::Bound;

/// Dimensions of an image scaled down to fit `bound`, preserving aspect ratio.
///
/// Images already inside the bound are returned unchanged: the resize never
/// enlarges. Each side is at least 1 pixel.
///
/// ```text
/// 4000x3000 in 1500x1000 → 1333x1000   (height limits)
/// 3000x1000 in 1500x1000 → 1500x500    (width limits)
/// 200x100   in 300x200   → 200x100     (already fits)
/// ```
pub fn fit_within(original: (u32, u32), bound: Bound) -> (u32, u32) {
    let (w, h) = original;
    if w == 0 || h == 0 || (w <= bound.width && h <= bound.height) {
        return original;
    }

    let scale = f64::min(
        bound.width as f64 / w as f64,
        bound.height as f64 / h as f64,
    );
    let out_w = ((w as f64 * scale).round() as u32).clamp(1, bound.width);
    let out_h = ((h as f64 * scale).round() as u32).clamp(1, bound.height);
    (out_w, out_h)
}
