//! Nearest-palette classification (§4.5). Direct translation of
//! `_mapcache_imageio_classify` in the original C source: a linear scan of
//! the palette for each distinct pixel color, memoized through a hash table
//! keyed the same way as [`crate::quant::histogram`] so repeated colors in
//! the image cost one lookup instead of one scan.

use alloc::vec;
use alloc::vec::Vec;

use crate::pixel::PixelBgra8888;

use super::histogram::{hash_color, HASH_SIZE};

/// Squared Euclidean distance between two premultiplied BGRA pixels, widened
/// to `u64` so four `u8` channel differences squared and summed can never
/// overflow (SPEC_FULL.md §9 open question 3).
#[inline]
#[must_use]
fn distance(a: PixelBgra8888, b: PixelBgra8888) -> u64 {
  let db = a.b as i64 - b.b as i64;
  let dg = a.g as i64 - b.g as i64;
  let dr = a.r as i64 - b.r as i64;
  let da = a.a as i64 - b.a as i64;
  (db * db + dg * dg + dr * dr + da * da) as u64
}

/// Finds the index of the closest color in `palette` to `color`, breaking
/// ties in favor of the lower index (first found wins).
#[must_use]
fn nearest_index(palette: &[PixelBgra8888], color: PixelBgra8888) -> u8 {
  let mut best_index = 0usize;
  let mut best_distance = u64::MAX;
  for (index, &entry) in palette.iter().enumerate() {
    let d = distance(color, entry);
    if d < best_distance {
      best_distance = d;
      best_index = index;
      if d == 0 {
        break;
      }
    }
  }
  best_index as u8
}

struct MemoEntry {
  color: PixelBgra8888,
  index: u8,
}

/// Classifies every pixel of `pixels` against `palette` (must be non-empty,
/// at most 256 entries), returning one palette index per pixel in the same
/// order. A chained hash table memoizes color-to-index lookups, exactly
/// mirroring the bucket/chain shape of [`crate::quant::histogram::ColorHistogram`]
/// but storing a single winning index per distinct color instead of a count.
#[must_use]
pub fn classify(pixels: impl Iterator<Item = PixelBgra8888>, palette: &[PixelBgra8888]) -> Vec<u8> {
  debug_assert!(!palette.is_empty() && palette.len() <= 256);
  let mut buckets: Vec<Vec<MemoEntry>> = (0..HASH_SIZE).map(|_| Vec::new()).collect();
  let mut out = Vec::new();
  for color in pixels {
    let bucket = &mut buckets[hash_color(color)];
    let memoized = bucket.iter().find(|e| e.color == color).map(|e| e.index);
    let index = match memoized {
      Some(index) => index,
      None => {
        let index = nearest_index(palette, color);
        bucket.push(MemoEntry { color, index });
        index
      }
    };
    out.push(index);
  }
  out
}
