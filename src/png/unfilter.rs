//! Scanline reconstruction (the PNG "unfilter" step).
//!
//! Drives the reconstruction functions in the crate's `filtering` module
//! (kept unmodified -- they're already correct) across one Adam7 pass (or
//! the whole image, for non-interlaced PNGs) worth of decompressed bytes.
//! Grounded on the structure of the teacher's abandoned `png/unfilter.rs`
//! prototype (per-pass scanline loop, byte-at-a-time reconstruction), but
//! driving the pass geometry functions this crate actually defines in
//! `png::interlace` rather than the teacher's never-defined ones.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::{DecodeErrorReason, PngResult};
use crate::filtering::{reconstruct_average, reconstruct_paeth, reconstruct_sub, reconstruct_up};

use super::header::PngHeader;

/// Unfilters one pass worth of data (the whole image, for non-interlaced
/// PNGs). `filtered` must contain, for each of `pass_height` scanlines, one
/// filter-type byte followed by `header.bytes_per_scanline_for(pass_width)`
/// data bytes.
///
/// Returns the concatenated unfiltered scanlines (filter-type bytes
/// stripped), `pass_height` rows of `header.bytes_per_scanline_for(pass_width)`
/// bytes each.
pub fn unfilter_pass(
  header: PngHeader, pass_width: u32, pass_height: u32, filtered: &[u8],
) -> PngResult<Vec<u8>> {
  if pass_width == 0 || pass_height == 0 {
    return Ok(Vec::new());
  }
  let row_bytes = header.bytes_per_scanline_for(pass_width);
  let bpp = header.filter_chunk_size();
  let mut out = vec![0u8; row_bytes * pass_height as usize];
  let mut cursor = filtered;
  for row in 0..pass_height as usize {
    let (filter_byte, rest) =
      cursor.split_first().ok_or(DecodeErrorReason::TruncatedScanlineData)?;
    if rest.len() < row_bytes {
      return Err(DecodeErrorReason::TruncatedScanlineData.into());
    }
    let (raw_row, remaining) = rest.split_at(row_bytes);
    cursor = remaining;

    let out_row_start = row * row_bytes;
    let (prev_rows, cur_and_after) = out.split_at_mut(out_row_start);
    let cur_row = &mut cur_and_after[..row_bytes];
    let prev_row: Option<&[u8]> =
      if row == 0 { None } else { Some(&prev_rows[out_row_start - row_bytes..]) };

    match filter_byte {
      0 => cur_row.copy_from_slice(raw_row),
      1 => {
        for i in 0..row_bytes {
          let a = if i >= bpp { cur_row[i - bpp] } else { 0 };
          cur_row[i] = reconstruct_sub(raw_row[i], a);
        }
      }
      2 => {
        for i in 0..row_bytes {
          let b = prev_row.map(|p| p[i]).unwrap_or(0);
          cur_row[i] = reconstruct_up(raw_row[i], b);
        }
      }
      3 => {
        for i in 0..row_bytes {
          let a = if i >= bpp { cur_row[i - bpp] } else { 0 };
          let b = prev_row.map(|p| p[i]).unwrap_or(0);
          cur_row[i] = reconstruct_average(raw_row[i], a, b);
        }
      }
      4 => {
        for i in 0..row_bytes {
          let a = if i >= bpp { cur_row[i - bpp] } else { 0 };
          let b = prev_row.map(|p| p[i]).unwrap_or(0);
          let c = if i >= bpp { prev_row.map(|p| p[i - bpp]).unwrap_or(0) } else { 0 };
          cur_row[i] = reconstruct_paeth(raw_row[i], a, b, c);
        }
      }
      _ => return Err(DecodeErrorReason::IllegalFilterType.into()),
    }
  }
  Ok(out)
}

/// Reads the `bit_depth`-sized sample at logical pixel-channel position
/// `sample_index` (0-based, counting samples left to right, channel-major
/// within a pixel) out of one unfiltered scanline.
#[must_use]
pub fn read_sample(row: &[u8], bit_depth: u8, sample_index: usize) -> u16 {
  match bit_depth {
    16 => {
      let byte_index = sample_index * 2;
      u16::from_be_bytes([row[byte_index], row[byte_index + 1]])
    }
    8 => row[sample_index] as u16,
    1 | 2 | 4 => {
      let per_byte = 8 / bit_depth as usize;
      let byte_index = sample_index / per_byte;
      let slot = sample_index % per_byte;
      let shift = 8 - bit_depth as usize * (slot + 1);
      let mask = (1u16 << bit_depth) - 1;
      ((row[byte_index] as u16) >> shift) & mask
    }
    _ => unreachable!("illegal bit depth"),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::png::header::PngColorType;

  #[test]
  fn none_filter_passes_through() {
    let header = PngHeader {
      width: 2,
      height: 2,
      bit_depth: 8,
      color_type: PngColorType::RGB,
      interlaced: false,
    };
    let mut filtered = Vec::new();
    for _ in 0..2 {
      filtered.push(0u8); // filter type None
      filtered.extend_from_slice(&[1, 2, 3, 4, 5, 6]);
    }
    let out = unfilter_pass(header, 2, 2, &filtered).unwrap();
    assert_eq!(out, [1, 2, 3, 4, 5, 6, 1, 2, 3, 4, 5, 6]);
  }

  #[test]
  fn sub_filter_reconstructs() {
    let header = PngHeader {
      width: 2,
      height: 1,
      bit_depth: 8,
      color_type: PngColorType::RGB,
      interlaced: false,
    };
    // raw pixel (10,20,30) then (1,1,1) delta on top -> (11,21,31)
    let mut filtered = vec![1u8];
    filtered.extend_from_slice(&[10, 20, 30, 1, 1, 1]);
    let out = unfilter_pass(header, 2, 1, &filtered).unwrap();
    assert_eq!(out, [10, 20, 30, 11, 21, 31]);
  }

  #[test]
  fn sub_byte_sample_reads() {
    // bit depth 1, 8 pixels packed MSB-first into one byte: 1,0,1,1,0,0,1,0
    let row = [0b1011_0010u8];
    let bits: Vec<u16> = (0..8).map(|i| read_sample(&row, 1, i)).collect();
    assert_eq!(bits, [1, 0, 1, 1, 0, 0, 1, 0]);
  }
}
