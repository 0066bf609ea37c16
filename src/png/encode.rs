//! PNG encoding: truecolor (§4.2) and palette (§4.7) output paths.
//!
//! Row-transform logic is a direct translation of `_mapcache_imageio_png_encode`'s
//! `argb_to_rgba`/`xrgb_to_rgbx` row visitors in the original C source; the
//! indexed-path sample-depth selection and bit-packing follow
//! `_mapcache_imageio_png_q_encode` in that same file.

use alloc::vec::Vec;

use crate::error::PngResult;
use crate::pixel_image::PixelImage;

use super::header::{PngColorType, PngHeader};
use super::raw_chunk::{write_chunk, PNG_SIGNATURE};

/// Recognized zlib compression levels (§6). Filter type is always `NONE`
/// per §4.2(i), regardless of compression level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
  /// Leaves the library default (miniz_oxide's level 6).
  #[default]
  Default,
  /// zlib level 1.
  Fast,
  /// zlib level 9.
  Best,
}
impl CompressionLevel {
  const fn zlib_level(self) -> u8 {
    match self {
      Self::Default => 6,
      Self::Fast => 1,
      Self::Best => 9,
    }
  }
}

/// Encodes a [`PixelImage`] as a truecolor PNG (RGB or RGBA, whichever §4.2
/// decision (iii) calls for), with filter type fixed to `NONE`.
pub fn encode_truecolor(image: &PixelImage, compression: CompressionLevel) -> PngResult<Vec<u8>> {
  let has_alpha = image.pixels().any(|p| p.a != 255);
  let color_type = if has_alpha { PngColorType::RGBA } else { PngColorType::RGB };
  let header = PngHeader {
    width: image.width(),
    height: image.height(),
    bit_depth: 8,
    color_type,
    interlaced: false,
  };

  let channels = color_type.channel_count() as usize;
  let row_bytes = header.bytes_per_scanline();
  let mut raw = Vec::with_capacity((row_bytes + 1) * image.height() as usize);
  for y in 0..image.height() {
    raw.push(0u8); // filter type None, per §4.2(i)
    for x in 0..image.width() {
      let p = image.pixel(x, y);
      if has_alpha {
        let (r, g, b, a) = p.to_straight_rgba();
        raw.extend_from_slice(&[r, g, b, a]);
      } else {
        raw.extend_from_slice(&[p.r, p.g, p.b]);
      }
    }
  }
  debug_assert_eq!(raw.len(), (row_bytes + 1) * image.height() as usize);
  let _ = channels;

  write_png(header, None, None, &raw, compression)
}

/// Encodes a pre-classified indexed image: `rgb` is the remapped palette
/// (length `k`, `k <= 256`), `alpha` the parallel alpha tail of length
/// `num_a` (possibly empty, in which case no `tRNS` chunk is written),
/// `indices` one byte per pixel of `width * height` referring into `rgb`.
///
/// Sample depth follows §4.7: `<=2 -> 1 bit, <=4 -> 2, <=16 -> 4, else 8`.
pub fn encode_indexed(
  width: u32, height: u32, rgb: &[[u8; 3]], alpha: &[u8], indices: &[u8],
  compression: CompressionLevel,
) -> PngResult<Vec<u8>> {
  let k = rgb.len();
  let bit_depth: u8 = if k <= 2 {
    1
  } else if k <= 4 {
    2
  } else if k <= 16 {
    4
  } else {
    8
  };
  let header = PngHeader {
    width,
    height,
    bit_depth,
    color_type: PngColorType::INDEXED,
    interlaced: false,
  };
  let row_bytes = header.bytes_per_scanline();
  let per_byte = 8 / bit_depth as usize;
  let mut raw = Vec::with_capacity((row_bytes + 1) * height as usize);
  for y in 0..height {
    raw.push(0u8);
    let row_start = raw.len();
    raw.resize(row_start + row_bytes, 0);
    for x in 0..width {
      let index = indices[(y * width + x) as usize];
      if bit_depth == 8 {
        raw[row_start + x as usize] = index;
      } else {
        let byte_index = row_start + (x as usize) / per_byte;
        let slot = (x as usize) % per_byte;
        let shift = 8 - bit_depth as usize * (slot + 1);
        raw[byte_index] |= index << shift;
      }
    }
  }

  let plte: Vec<u8> = rgb.iter().flat_map(|c| c.iter().copied()).collect();
  let trns = if alpha.is_empty() { None } else { Some(alpha.to_vec()) };

  write_png(header, Some(plte), trns, &raw, compression)
}

fn write_png(
  header: PngHeader, plte: Option<Vec<u8>>, trns: Option<Vec<u8>>, raw_with_filters: &[u8],
  compression: CompressionLevel,
) -> PngResult<Vec<u8>> {
  let compressed =
    miniz_oxide::deflate::compress_to_vec_zlib(raw_with_filters, compression.zlib_level());

  let mut out = Vec::with_capacity(compressed.len() + 64);
  out.extend_from_slice(&PNG_SIGNATURE);
  write_chunk(&mut out, *b"IHDR", &header.to_ihdr_data());
  if let Some(plte) = plte.as_deref() {
    write_chunk(&mut out, *b"PLTE", plte);
  }
  if let Some(trns) = trns.as_deref() {
    write_chunk(&mut out, *b"tRNS", trns);
  }
  write_chunk(&mut out, *b"IDAT", &compressed);
  write_chunk(&mut out, *b"IEND", &[]);
  Ok(out)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::pixel::PixelBgra8888;

  #[test]
  fn opaque_image_encodes_as_rgb() {
    let img = PixelImage::solid(2, 2, PixelBgra8888::from_straight_rgba(255, 0, 0, 255));
    let bytes = encode_truecolor(&img, CompressionLevel::Default).unwrap();
    assert_eq!(&bytes[..8], &PNG_SIGNATURE);
    // IHDR color type byte sits at offset 8(sig)+4(len)+4(type)+9 = 25
    assert_eq!(bytes[25], PngColorType::RGB.0);
  }

  #[test]
  fn translucent_image_encodes_as_rgba() {
    let img = PixelImage::solid(2, 2, PixelBgra8888::from_straight_rgba(255, 0, 0, 128));
    let bytes = encode_truecolor(&img, CompressionLevel::Best).unwrap();
    assert_eq!(bytes[25], PngColorType::RGBA.0);
  }

  #[test]
  fn indexed_with_two_colors_uses_1bit_depth() {
    let rgb = [[255, 0, 0], [0, 0, 255]];
    let indices = [0u8, 1, 1, 0];
    let bytes =
      encode_indexed(2, 2, &rgb, &[], &indices, CompressionLevel::Default).unwrap();
    assert_eq!(bytes[24], 1); // bit depth byte
    assert_eq!(bytes[25], PngColorType::INDEXED.0);
  }
}
