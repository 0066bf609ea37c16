use crate::error::{DecodeErrorReason, PngResult};

use super::raw_chunk::{PngRawChunk, PngRawChunkType};

/// The `IHDR` chunk, parsed.
///
/// Grounded on the legacy `PngHeader`/`PngColorType` newtype style of this
/// crate, with the byte-math methods (`bytes_per_scanline` and friends)
/// generalized from `PngPixelFormat::bytes_per_scanline` in the abandoned
/// `png/chunks.rs` prototype -- that prototype's `pixel_format` abstraction
/// is referenced by the unfilter code but was never actually defined
/// anywhere in this crate, so it's rebuilt here from the color-type/
/// bit-depth fields that do exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PngHeader {
  pub width: u32,
  pub height: u32,
  pub bit_depth: u8,
  pub color_type: PngColorType,
  pub interlaced: bool,
}
impl PngHeader {
  pub fn from_ihdr_chunk(chunk: PngRawChunk<'_>) -> PngResult<Self> {
    if chunk.type_ != PngRawChunkType::IHDR || chunk.data.len() != 13 {
      return Err(DecodeErrorReason::NotAnIhdrChunk.into());
    }
    let width = u32::from_be_bytes(chunk.data[0..4].try_into().unwrap());
    let height = u32::from_be_bytes(chunk.data[4..8].try_into().unwrap());
    if width == 0 || height == 0 {
      return Err(DecodeErrorReason::IllegalWidthOrHeightZero.into());
    }
    let bit_depth = chunk.data[8];
    let color_type = PngColorType(chunk.data[9]);
    if !color_type.bit_depth_is_legal(bit_depth) {
      return Err(DecodeErrorReason::IllegalColorTypeBitDepthCombination.into());
    }
    if chunk.data[10] != 0 {
      return Err(DecodeErrorReason::IllegalCompressionMethod.into());
    }
    if chunk.data[11] != 0 {
      return Err(DecodeErrorReason::IllegalFilterMethod.into());
    }
    let interlaced = match chunk.data[12] {
      0 => false,
      1 => true,
      _ => return Err(DecodeErrorReason::IllegalInterlaceMethod.into()),
    };
    Ok(Self { width, height, bit_depth, color_type, interlaced })
  }

  /// Writes the 13-byte IHDR payload (not the surrounding chunk framing).
  #[must_use]
  pub fn to_ihdr_data(self) -> [u8; 13] {
    let mut data = [0u8; 13];
    data[0..4].copy_from_slice(&self.width.to_be_bytes());
    data[4..8].copy_from_slice(&self.height.to_be_bytes());
    data[8] = self.bit_depth;
    data[9] = self.color_type.0;
    data[10] = 0;
    data[11] = 0;
    data[12] = self.interlaced as u8;
    data
  }

  /// Number of color+alpha channels per pixel (not counting palette index
  /// vs RGB distinction -- indexed color has 1 channel, the index itself).
  #[must_use]
  pub const fn channel_count(self) -> u32 {
    self.color_type.channel_count()
  }

  #[must_use]
  pub const fn bits_per_pixel(self) -> u32 {
    self.channel_count() * self.bit_depth as u32
  }

  /// Bytes per unfiltered scanline, i.e. `ceil(width * bits_per_pixel / 8)`.
  #[must_use]
  pub fn bytes_per_scanline_for(self, width: u32) -> usize {
    let bits = (width as u64) * (self.bits_per_pixel() as u64);
    ((bits + 7) / 8) as usize
  }

  #[must_use]
  pub fn bytes_per_scanline(self) -> usize {
    self.bytes_per_scanline_for(self.width)
  }

  /// Bytes-per-pixel used by the filter reconstruction step (`max(1,
  /// bits_per_pixel/8)`); sub-8-bit images still filter byte-at-a-time.
  #[must_use]
  pub const fn filter_chunk_size(self) -> usize {
    let bpp = self.bits_per_pixel();
    (if bpp < 8 { 1 } else { bpp / 8 }) as usize
  }
}

/// PNG color type byte from IHDR.
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct PngColorType(pub u8);
impl PngColorType {
  pub const GREYSCALE: Self = Self(0);
  pub const RGB: Self = Self(2);
  pub const INDEXED: Self = Self(3);
  pub const GREYSCALE_ALPHA: Self = Self(4);
  pub const RGBA: Self = Self(6);

  #[must_use]
  pub const fn channel_count(self) -> u32 {
    match self {
      Self::GREYSCALE => 1,
      Self::RGB => 3,
      Self::INDEXED => 1,
      Self::GREYSCALE_ALPHA => 2,
      Self::RGBA => 4,
      _ => 0,
    }
  }

  #[must_use]
  pub const fn has_alpha(self) -> bool {
    matches!(self, Self::GREYSCALE_ALPHA | Self::RGBA)
  }

  #[must_use]
  pub const fn bit_depth_is_legal(self, bit_depth: u8) -> bool {
    match self {
      Self::GREYSCALE => matches!(bit_depth, 1 | 2 | 4 | 8 | 16),
      Self::INDEXED => matches!(bit_depth, 1 | 2 | 4 | 8),
      Self::RGB | Self::GREYSCALE_ALPHA | Self::RGBA => matches!(bit_depth, 8 | 16),
      _ => false,
    }
  }
}
impl core::fmt::Debug for PngColorType {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match *self {
      Self::GREYSCALE => write!(f, "Greyscale"),
      Self::RGB => write!(f, "RGB"),
      Self::INDEXED => write!(f, "Indexed"),
      Self::GREYSCALE_ALPHA => write!(f, "GreyscaleAlpha"),
      Self::RGBA => write!(f, "RGBA"),
      other => write!(f, "Illegal({})", other.0),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn scanline_bytes_for_sub_byte_depths() {
    let h = PngHeader { width: 5, height: 1, bit_depth: 1, color_type: PngColorType::GREYSCALE, interlaced: false };
    assert_eq!(h.bytes_per_scanline(), 1); // 5 bits -> 1 byte
    let h2 = PngHeader { width: 9, height: 1, bit_depth: 1, color_type: PngColorType::GREYSCALE, interlaced: false };
    assert_eq!(h2.bytes_per_scanline(), 2);
  }

  #[test]
  fn scanline_bytes_for_rgba8() {
    let h = PngHeader { width: 4, height: 1, bit_depth: 8, color_type: PngColorType::RGBA, interlaced: false };
    assert_eq!(h.bytes_per_scanline(), 16);
    assert_eq!(h.filter_chunk_size(), 4);
  }

  #[test]
  fn ihdr_roundtrip() {
    let h = PngHeader { width: 10, height: 20, bit_depth: 8, color_type: PngColorType::RGB, interlaced: false };
    let data = h.to_ihdr_data();
    let chunk = PngRawChunk { type_: PngRawChunkType::IHDR, data: &data, declared_crc: 0 };
    let parsed = PngHeader::from_ihdr_chunk(chunk).unwrap();
    assert_eq!(parsed, h);
  }
}
