//! Top-level PNG decode: bytes in, a canonical premultiplied-BGRA
//! [`PixelImage`](crate::pixel_image::PixelImage) out.
//!
//! The canonicalization transforms in step (b) are each a direct
//! translation of one of the libpng transform flags
//! `_mapcache_imageio_png_decode_to_image` in the original C source sets
//! (`PNG_TRANSFORM_EXPAND`, `STRIP_16`, `GRAY_TO_RGB`, the alpha filler),
//! written out explicitly since there's no libpng underneath to apply them
//! implicitly. The final premultiply step is that same source's
//! `premultiply()` translated to `pixel::premul`.

use alloc::vec::Vec;

use crate::error::{DecodeErrorReason, ImagineError, PngResult};
use crate::pixel::PixelBgra8888;
use crate::pixel_image::PixelImage;

use super::header::{PngColorType, PngHeader};
use super::interlace::{interlaced_pos_to_full_pos, reduced_image_dimensions};
use super::raw_chunk::{PngRawChunkIter, PngRawChunkType};
use super::unfilter::{read_sample, unfilter_pass};

/// Decodes a full PNG byte stream into a canonical premultiplied-BGRA
/// [`PixelImage`].
pub fn decode_to_pixel_image(png_bytes: &[u8]) -> PngResult<PixelImage> {
  let mut chunks = PngRawChunkIter::new(png_bytes);
  if !chunks.signature_ok() {
    return Err(DecodeErrorReason::NoPngSignature.into());
  }

  let ihdr_chunk = chunks.next().ok_or(DecodeErrorReason::UnexpectedEndOfInput)?;
  let header = PngHeader::from_ihdr_chunk(ihdr_chunk)?;

  let mut palette: Option<Vec<[u8; 3]>> = None;
  let mut trns: Option<Vec<u8>> = None;
  let mut idat: Vec<u8> = Vec::new();
  let mut seen_idat = false;

  for chunk in chunks {
    match chunk.type_ {
      PngRawChunkType::PLTE => {
        if chunk.data.len() % 3 != 0 {
          return Err(DecodeErrorReason::UnexpectedEndOfInput.into());
        }
        palette = Some(chunk.data.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect());
      }
      PngRawChunkType::tRNS => trns = Some(chunk.data.to_vec()),
      PngRawChunkType::IDAT => {
        seen_idat = true;
        idat.extend_from_slice(chunk.data);
      }
      PngRawChunkType::IEND => break,
      _ => {}
    }
  }
  if !seen_idat {
    return Err(DecodeErrorReason::UnexpectedEndOfInput.into());
  }
  if header.color_type == PngColorType::INDEXED && palette.is_none() {
    return Err(DecodeErrorReason::MissingPalette.into());
  }

  let inflated = miniz_oxide::inflate::decompress_to_vec_zlib(&idat)
    .map_err(|_| ImagineError::from(DecodeErrorReason::ZlibError))?;

  let mut image = PixelImage::new(header.width, header.height);

  if !header.interlaced {
    let unfiltered = unfilter_pass(header, header.width, header.height, &inflated)?;
    let row_bytes = header.bytes_per_scanline();
    for y in 0..header.height {
      let row = &unfiltered[(y as usize) * row_bytes..(y as usize + 1) * row_bytes];
      for x in 0..header.width {
        let px = sample_pixel(header, row, x, palette.as_deref(), trns.as_deref())?;
        image.set_pixel(x, y, px);
      }
    }
  } else {
    let dims = reduced_image_dimensions(header.width, header.height);
    let mut cursor = inflated.as_slice();
    for pass in 1..=7usize {
      let (pw, ph) = dims[pass];
      if pw == 0 || ph == 0 {
        continue;
      }
      let row_bytes = header.bytes_per_scanline_for(pw);
      let pass_len = (row_bytes + 1) * ph as usize;
      if cursor.len() < pass_len {
        return Err(DecodeErrorReason::TruncatedScanlineData.into());
      }
      let (pass_bytes, rest) = cursor.split_at(pass_len);
      cursor = rest;
      let unfiltered = unfilter_pass(header, pw, ph, pass_bytes)?;
      for ry in 0..ph {
        let row = &unfiltered[(ry as usize) * row_bytes..(ry as usize + 1) * row_bytes];
        for rx in 0..pw {
          let px = sample_pixel(header, row, rx, palette.as_deref(), trns.as_deref())?;
          let (fx, fy) = interlaced_pos_to_full_pos(pass, rx, ry);
          image.set_pixel(fx, fy, px);
        }
      }
    }
  }

  Ok(image)
}

/// Reads the pixel at column `x` of one already-unfiltered scanline and
/// converts it to canonical premultiplied BGRA, applying every
/// canonicalization transform from SPEC_FULL.md §4.1(b) in one pass: bit
/// depth expansion to 8, palette expansion, 16-to-8 stripping, grayscale
/// broadcast to RGB, and opaque-alpha filling.
fn sample_pixel(
  header: PngHeader, row: &[u8], x: u32, palette: Option<&[[u8; 3]]>, trns: Option<&[u8]>,
) -> PngResult<PixelBgra8888> {
  use crate::bit_depth_changes::int_make_depth_8;

  fn scale_to_8(sample: u16, bit_depth: u8) -> u8 {
    match bit_depth {
      1 => int_make_depth_8::<1>(sample as u32),
      2 => int_make_depth_8::<2>(sample as u32),
      4 => int_make_depth_8::<4>(sample as u32),
      8 => sample as u8,
      16 => (sample >> 8) as u8,
      _ => unreachable!(),
    }
  }

  let channels = header.color_type.channel_count() as usize;
  let base = x as usize * channels;

  let (r, g, b, a) = match header.color_type {
    PngColorType::GREYSCALE => {
      let y = scale_to_8(read_sample(row, header.bit_depth, base), header.bit_depth);
      (y, y, y, 255)
    }
    PngColorType::GREYSCALE_ALPHA => {
      let y = scale_to_8(read_sample(row, header.bit_depth, base), header.bit_depth);
      let a = scale_to_8(read_sample(row, header.bit_depth, base + 1), header.bit_depth);
      (y, y, y, a)
    }
    PngColorType::RGB => {
      let r = scale_to_8(read_sample(row, header.bit_depth, base), header.bit_depth);
      let g = scale_to_8(read_sample(row, header.bit_depth, base + 1), header.bit_depth);
      let b = scale_to_8(read_sample(row, header.bit_depth, base + 2), header.bit_depth);
      (r, g, b, 255)
    }
    PngColorType::RGBA => {
      let r = scale_to_8(read_sample(row, header.bit_depth, base), header.bit_depth);
      let g = scale_to_8(read_sample(row, header.bit_depth, base + 1), header.bit_depth);
      let b = scale_to_8(read_sample(row, header.bit_depth, base + 2), header.bit_depth);
      let a = scale_to_8(read_sample(row, header.bit_depth, base + 3), header.bit_depth);
      (r, g, b, a)
    }
    PngColorType::INDEXED => {
      let index = read_sample(row, header.bit_depth, x as usize) as usize;
      let entries = palette.ok_or(DecodeErrorReason::MissingPalette)?;
      let [r, g, b] =
        *entries.get(index).ok_or(DecodeErrorReason::PaletteIndexOutOfRange)?;
      let a = trns.and_then(|t| t.get(index).copied()).unwrap_or(255);
      (r, g, b, a)
    }
    _ => return Err(DecodeErrorReason::IllegalColorTypeBitDepthCombination.into()),
  };

  Ok(PixelBgra8888::from_straight_rgba(r, g, b, a))
}
