//! Color quantization (§4.3-§4.6): turns a truecolor [`PixelImage`](crate::pixel_image::PixelImage)
//! into a palette of at most `ncolors` entries plus one index per pixel,
//! following the histogram -> median-cut -> classify -> remap pipeline of
//! the original source this crate's quantizer is translated from.

mod classify;
mod histogram;
mod median_cut;
mod remap;

pub use classify::classify;
pub use histogram::{ColorCount, ColorHistogram, MAXCOLORS};
pub use median_cut::mediancut;
pub use remap::{remap_palette, remap_palette_at_maxval, Remapped};

use alloc::vec::Vec;

use crate::error::PngResult;
use crate::pixel::PixelBgra8888;
use crate::pixel_image::PixelImage;

/// Full quantize pipeline: builds a color histogram of `image`, runs
/// median-cut down to at most `ncolors` representative colors, classifies
/// every pixel against that palette, and remaps the palette so translucent
/// entries sort before opaque ones.
pub struct QuantizeResult {
  pub rgb: Vec<[u8; 3]>,
  pub alpha_head: Vec<u8>,
  pub indices: Vec<u8>,
}

/// Builds a color histogram of `image`, halving `maxval` and requantizing
/// every pixel's channels (§4.4's depth-reduction retry loop) each time the
/// histogram overflows [`MAXCOLORS`] distinct colors, until it either
/// succeeds or `maxval` bottoms out at 1 (at which point `2^4 = 16` colors
/// is the theoretical ceiling, always within `MAXCOLORS`, so this loop is
/// guaranteed to terminate with a built histogram).
///
/// Returns the histogram together with the resulting `maxval` and, when a
/// reduction actually ran, the rescaled image it was built from (so the
/// caller can classify against the same rescaled pixel values the palette
/// was derived from).
fn build_histogram_with_retry(image: &PixelImage) -> (ColorHistogram, u8, Option<PixelImage>) {
  let mut maxval = 255u8;
  let mut rescaled: Option<PixelImage> = None;
  loop {
    let current: &PixelImage = rescaled.as_ref().unwrap_or(image);
    match ColorHistogram::build(current.pixels()) {
      Some(hist) => return (hist, maxval, rescaled),
      None => {
        let new_maxval = maxval / 2;
        let source = rescaled.as_ref().unwrap_or(image);
        rescaled = Some(source.rescaled(maxval, new_maxval));
        maxval = new_maxval;
      }
    }
  }
}

/// Quantizes `image` down to at most `ncolors` representative colors and
/// classifies every pixel against the result.
///
/// If `image` has more than [`MAXCOLORS`] distinct colors, this halves the
/// working per-channel resolution and requantizes the image's channels
/// (§4.4's "rescale loop"), retrying until the histogram fits; the returned
/// palette is always un-premultiplied back to full 8-bit resolution
/// regardless of how many reduction passes it took.
pub fn quantize(image: &PixelImage, ncolors: usize) -> PngResult<QuantizeResult> {
  let (hist, maxval, rescaled) = build_histogram_with_retry(image);
  let array = hist.to_array();
  let palette: Vec<PixelBgra8888> = mediancut(array, ncolors);
  let remapped = remap_palette_at_maxval(&palette, maxval)?;
  let new_palette: Vec<PixelBgra8888> = {
    let mut reordered = alloc::vec![PixelBgra8888::TRANSPARENT; palette.len()];
    for (old_index, &new_index) in remapped.old_to_new.iter().enumerate() {
      reordered[new_index as usize] = palette[old_index];
    }
    reordered
  };
  let classify_source: &PixelImage = rescaled.as_ref().unwrap_or(image);
  let indices = classify(classify_source.pixels(), &new_palette);

  Ok(QuantizeResult { rgb: remapped.rgb, alpha_head: remapped.alpha_head, indices })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn quantizes_two_color_checkerboard() {
    let mut img = PixelImage::new(4, 4);
    for y in 0..4u32 {
      for x in 0..4u32 {
        let color = if (x + y) % 2 == 0 {
          PixelBgra8888::from_straight_rgba(255, 0, 0, 255)
        } else {
          PixelBgra8888::from_straight_rgba(0, 0, 255, 255)
        };
        img.set_pixel(x, y, color);
      }
    }
    let result = quantize(&img, 256).unwrap();
    assert_eq!(result.rgb.len(), 2);
    assert!(result.alpha_head.is_empty());
    assert_eq!(result.indices.len(), 16);
  }

  #[test]
  fn quantizes_gradient_with_alpha_down_to_target_count() {
    let mut img = PixelImage::new(16, 16);
    for y in 0..16u32 {
      for x in 0..16u32 {
        img.set_pixel(
          x,
          y,
          PixelBgra8888::from_straight_rgba((x * 16) as u8, (y * 16) as u8, 128, 128),
        );
      }
    }
    let result = quantize(&img, 8).unwrap();
    assert!(result.rgb.len() <= 8);
    assert_eq!(result.indices.len(), 256);
  }

  /// S5: a 200x200 image with 40000 distinct opaque colors (> MAXCOLORS)
  /// forces at least one depth-reduction retry pass; quantization must
  /// still succeed and land on a palette of at most `ncolors` entries.
  #[test]
  fn too_many_colors_forces_depth_reduction_retry() {
    let mut img = PixelImage::new(200, 200);
    let mut n = 0u32;
    for y in 0..200u32 {
      for x in 0..200u32 {
        // 200*200 = 40000 distinct (r, g) pairs, all opaque.
        let r = (n % 200) as u8;
        let g = (n / 200) as u8;
        img.set_pixel(x, y, PixelBgra8888::from_straight_rgba(r, g, 0, 255));
        n += 1;
      }
    }
    let result = quantize(&img, 16).unwrap();
    assert!(result.rgb.len() <= 16);
    assert_eq!(result.indices.len(), 200 * 200);
    assert!(result.indices.iter().all(|&i| (i as usize) < result.rgb.len()));
  }
}
