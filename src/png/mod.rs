//! PNG decode and encode: the image codec half of the crate's core (see the
//! system overview in the design docs).
//!
//! * [`decode_to_pixel_image`] turns PNG bytes into a canonical
//!   premultiplied-BGRA [`PixelImage`](crate::pixel_image::PixelImage).
//! * [`encode_truecolor`] writes an RGB or RGBA PNG back out.
//! * [`encode_indexed`] writes a palette PNG from an already-quantized
//!   palette and index buffer (see the [`quant`](crate::quant) module for
//!   how to build those from a truecolor image).

pub(crate) mod header;
pub(crate) mod interlace;
pub(crate) mod raw_chunk;
pub(crate) mod unfilter;

mod decode;
mod encode;

pub use decode::decode_to_pixel_image;
pub use encode::{encode_indexed, encode_truecolor, CompressionLevel};
pub use header::{PngColorType, PngHeader};
pub use raw_chunk::{PngRawChunk, PngRawChunkIter, PngRawChunkType, PNG_SIGNATURE};
