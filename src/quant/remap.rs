//! Palette remap (§4.6): partitions a classified palette into a translucent
//! head and an opaque tail so the `tRNS` chunk only needs to carry alpha for
//! the head and can be omitted or truncated entirely otherwise (PNG treats
//! a short `tRNS` as implicitly `255` for the remaining entries), then
//! un-premultiplies every palette entry back to straight RGB before it's
//! written out. Direct translation of `_mapcache_imageio_remap_palette` in
//! the original C source.

use alloc::vec::Vec;

use crate::error::{ImagineError, PngResult};
use crate::pixel::PixelBgra8888;

/// Result of [`remap_palette`]: the reordered straight-RGB palette, the
/// parallel alpha head (one byte per translucent entry, indices `[0,
/// alpha_head.len())`), and the translation table from old palette index to
/// new palette index.
pub struct Remapped {
  pub rgb: Vec<[u8; 3]>,
  pub alpha_head: Vec<u8>,
  pub old_to_new: Vec<u8>,
}

/// Reorders `palette` (premultiplied BGRA, indexed by the classifier's
/// output) so every translucent entry sorts before every fully-opaque one,
/// using the classic two-pointer in-place partition: `top_idx` walks up
/// from the front past entries already translucent, `bot_idx` walks down
/// from the back past entries already opaque, and the first mismatched
/// pair on each side is swapped. The partition point ends up at exactly
/// `top_idx`, and the invariant `bot_idx == top_idx + 1` (or `top_idx ==
/// bot_idx == 0` for an empty/all-one-kind palette) must hold once the two
/// pointers pass each other; a violation means they crossed without
/// meeting cleanly, which the original treats as an unreachable assertion
/// and this crate surfaces as an error instead of panicking.
///
/// `palette` entries are assumed to be at full 8-bit resolution
/// (`maxval == 255`); use [`remap_palette_at_maxval`] when the quantizer ran
/// its depth-reduction retry loop (§4.4) and the palette is still scaled to
/// a reduced `maxval`.
pub fn remap_palette(palette: &[PixelBgra8888]) -> PngResult<Remapped> {
  remap_palette_at_maxval(palette, 255)
}

/// Same as [`remap_palette`], but un-premultiplies each entry from a
/// reduced `maxval` back up to 255 first (§4.6 "Un-premultiplication":
/// "first rescale from the quantizer's maxval to 255").
pub fn remap_palette_at_maxval(palette: &[PixelBgra8888], maxval: u8) -> PngResult<Remapped> {
  let mut entries: Vec<PixelBgra8888> = palette.to_vec();
  let n = entries.len();
  let mut moved_from: Vec<u8> = (0..n as u8).collect();

  if n > 0 {
    let mut top_idx = 0usize;
    let mut bot_idx = n - 1;
    loop {
      while top_idx < n && entries[top_idx].a != maxval {
        top_idx += 1;
      }
      while bot_idx > 0 && entries[bot_idx].a == maxval {
        bot_idx -= 1;
      }
      if top_idx >= bot_idx {
        break;
      }
      entries.swap(top_idx, bot_idx);
      moved_from.swap(top_idx, bot_idx);
      top_idx += 1;
      if bot_idx == 0 {
        break;
      }
      bot_idx -= 1;
    }
    if bot_idx + 1 != top_idx && !(bot_idx == 0 && top_idx == 0) {
      return Err(ImagineError::QuantizerInvariantViolation);
    }
  }

  // `moved_from[new_index]` holds the old index now sitting at `new_index`;
  // invert it into old-index -> new-index.
  let mut old_to_new = alloc::vec![0u8; n];
  for (new_index, &old_index) in moved_from.iter().enumerate() {
    old_to_new[old_index as usize] = new_index as u8;
  }

  let translucent_count = entries.iter().filter(|c| c.a != maxval).count();
  let rgb: Vec<[u8; 3]> = entries
    .iter()
    .map(|c| {
      let (r, g, b, _a) = c.to_straight_rgba_at_maxval(maxval);
      [r, g, b]
    })
    .collect();
  let alpha_head: Vec<u8> = entries[..translucent_count]
    .iter()
    .map(|c| crate::pixel::rescale_channel(c.a, maxval, 255))
    .collect();

  Ok(Remapped { rgb, alpha_head, old_to_new })
}
