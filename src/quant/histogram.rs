//! Color histogram (§4.3): a fixed-size chained hash table bounded by
//! `MAXCOLORS`, direct translation of `pam_computeacolorhash` /
//! `pam_addtoacolorhash` / `pam_computeacolorhist` in the original C source.

use alloc::vec;
use alloc::vec::Vec;

use crate::pixel::PixelBgra8888;

/// Number of hash buckets. Matches the original's `MAXCOLORS`-sized prime
/// modulus exactly; this is a tuning constant of the source algorithm, not
/// a correctness-relevant one, so it is kept verbatim.
pub const HASH_SIZE: usize = 20023;

/// Upper bound on distinct colors the histogram will track before
/// triggering depth reduction in the caller.
pub const MAXCOLORS: usize = 32767;

#[inline]
#[must_use]
pub(crate) fn hash_color(c: PixelBgra8888) -> usize {
  let sum = (c.r as u64) * 33023
    + (c.g as u64) * 30013
    + (c.b as u64) * 27011
    + (c.a as u64) * 24007;
  ((sum & 0x7fff_ffff) as usize) % HASH_SIZE
}

/// One distinct color and its pixel count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorCount {
  pub color: PixelBgra8888,
  pub count: u32,
}

struct Node {
  color: PixelBgra8888,
  count: u32,
  next: Option<u32>,
}

/// Built by streaming every pixel of an image through a chained hash table
/// (arena of nodes + per-bucket head index, resolving SPEC_FULL.md §9's
/// "cyclic ownership" note: no cycles, bulk free is just dropping the
/// arena). Construction fails (`None`) the instant a `MAXCOLORS + 1`-th
/// *distinct* color would be inserted, matching the original's abort
/// behavior exactly (a color seen only once can still trigger the abort).
pub struct ColorHistogram {
  buckets: Vec<Option<u32>>,
  arena: Vec<Node>,
}
impl ColorHistogram {
  /// Builds a histogram from every pixel in `pixels`, or returns `None` if
  /// the image has more than `MAXCOLORS` distinct colors.
  #[must_use]
  pub fn build(pixels: impl Iterator<Item = PixelBgra8888>) -> Option<Self> {
    let mut hist = Self { buckets: vec![None; HASH_SIZE], arena: Vec::new() };
    for color in pixels {
      hist.insert(color)?;
    }
    Some(hist)
  }

  fn insert(&mut self, color: PixelBgra8888) -> Option<()> {
    let bucket = hash_color(color);
    let mut cursor = self.buckets[bucket];
    while let Some(idx) = cursor {
      let node = &mut self.arena[idx as usize];
      if node.color == color {
        node.count += 1;
        return Some(());
      }
      cursor = node.next;
    }
    if self.arena.len() >= MAXCOLORS {
      return None;
    }
    let idx = self.arena.len() as u32;
    self.arena.push(Node { color, count: 1, next: self.buckets[bucket] });
    self.buckets[bucket] = Some(idx);
    Some(())
  }

  /// Number of distinct colors seen.
  #[must_use]
  pub fn len(&self) -> usize {
    self.arena.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.arena.is_empty()
  }

  /// Flattens the hash table into a dense array of `(color, count)` pairs.
  #[must_use]
  pub fn to_array(&self) -> Vec<ColorCount> {
    self.arena.iter().map(|n| ColorCount { color: n.color, count: n.count }).collect()
  }
}
