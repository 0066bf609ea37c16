//! External interface (§6): the small set of entry points a caller of this
//! crate is expected to use. Everything below is a thin composition of
//! [`crate::png`] and [`crate::quant`]; the interesting algorithms live
//! there.

use alloc::vec::Vec;

use crate::error::{ImagineError, PngResult};
use crate::pixel::PixelBgra8888;
use crate::pixel_image::PixelImage;
use crate::png::{decode_to_pixel_image, encode_indexed as png_encode_indexed, encode_truecolor};
use crate::quant::quantize;

pub use crate::png::CompressionLevel;

/// Encodes `image` as a truecolor PNG (RGB or RGBA, decided by whether any
/// pixel is non-opaque), filter type fixed to `NONE`.
#[inline]
pub fn encode_rgba(image: &PixelImage, compression: CompressionLevel) -> PngResult<Vec<u8>> {
  encode_truecolor(image, compression)
}

/// Quantizes `image` down to at most `ncolors` (must be in `2..=256`) and
/// encodes it as a palette PNG, writing a `tRNS` chunk iff any palette
/// entry ends up non-opaque.
///
/// Returns [`ImagineError::InvalidInput`] if `ncolors` is outside `2..=256`,
/// or the image has zero width/height. If the image has more distinct
/// colors than the quantizer's histogram can track at full resolution,
/// [`crate::quant::quantize`] transparently runs its depth-reduction retry
/// loop (§4.4) rather than failing.
pub fn encode_indexed(
  image: &PixelImage, ncolors: usize, compression: CompressionLevel,
) -> PngResult<Vec<u8>> {
  if !(2..=256).contains(&ncolors) {
    return Err(ImagineError::InvalidInput("ncolors must be in 2..=256"));
  }
  if image.width() == 0 || image.height() == 0 {
    return Err(ImagineError::InvalidInput("image dimensions must be non-zero"));
  }
  let result = quantize(image, ncolors)?;
  png_encode_indexed(
    image.width(),
    image.height(),
    &result.rgb,
    &result.alpha_head,
    &result.indices,
    compression,
  )
}

/// Decodes PNG bytes into a canonical premultiplied-BGRA [`PixelImage`].
#[inline]
pub fn decode(png_bytes: &[u8]) -> PngResult<PixelImage> {
  decode_to_pixel_image(png_bytes)
}

/// Builds a `width x height` image filled with a single premultiplied BGRA
/// color and encodes it as a truecolor PNG. Grounded on
/// `_mapcache_imageio_png_create_empty` in the original C source, which
/// likewise builds a filled raster and hands it to the normal encode path
/// rather than hand-writing a bespoke tiny encoder.
pub fn create_solid(
  width: u32, height: u32, color: PixelBgra8888, compression: CompressionLevel,
) -> PngResult<Vec<u8>> {
  if width == 0 || height == 0 {
    return Err(ImagineError::InvalidInput("image dimensions must be non-zero"));
  }
  let image = PixelImage::solid(width, height, color);
  encode_rgba(&image, compression)
}
