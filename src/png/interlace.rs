//! Adam7 interlacing geometry.
//!
//! Neither `reduced_image_dimensions` nor `interlaced_pos_to_full_pos` were
//! ever defined anywhere in the teacher crate, even though the unfilter code
//! calls them; this module supplies both, derived from the standard Adam7
//! pass table in the PNG 1.2 spec and checked against every assertion in the
//! teacher's own (otherwise orphaned) `test_reduced_image_dimensions` test.

/// `(row_start, row_increment, col_start, col_increment)` for each of the
/// seven Adam7 passes, 1-indexed (index 0 is unused padding so pass `p`
/// lines up with `ADAM7_PASSES[p]`).
const ADAM7_PASSES: [(u32, u32, u32, u32); 8] = [
  (0, 1, 0, 1), // unused
  (0, 8, 0, 8),
  (0, 8, 4, 8),
  (4, 8, 0, 4),
  (0, 4, 2, 4),
  (2, 4, 0, 2),
  (0, 2, 1, 2),
  (1, 2, 0, 1),
];

/// For a full image of `width x height`, the `(width, height)` of each of
/// the 7 Adam7 reduced images, indexed `[0]` (unused, zero) through `[7]`.
#[must_use]
pub fn reduced_image_dimensions(width: u32, height: u32) -> [(u32, u32); 8] {
  let mut out = [(0u32, 0u32); 8];
  for pass in 1..=7 {
    let (row_start, row_inc, col_start, col_inc) = ADAM7_PASSES[pass];
    let w = if width > col_start { (width - col_start + col_inc - 1) / col_inc } else { 0 };
    let h = if height > row_start { (height - row_start + row_inc - 1) / row_inc } else { 0 };
    out[pass] = (w, h);
  }
  out
}

/// Maps a `(x, y)` position within the reduced image of the given `pass`
/// (`1..=7`) to its position in the full image.
#[must_use]
pub const fn interlaced_pos_to_full_pos(pass: usize, x: u32, y: u32) -> (u32, u32) {
  let (row_start, row_inc, col_start, col_inc) = ADAM7_PASSES[pass];
  (col_start + x * col_inc, row_start + y * row_inc)
}
