use core::fmt::{self, Display};

/// Result type used throughout the crate.
pub type PngResult<T> = Result<T, ImagineError>;

/// Finer-grained reason a [`ImagineError::DecodeError`] was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
#[allow(missing_docs)]
pub enum DecodeErrorReason {
  NoPngSignature,
  UnexpectedEndOfInput,
  NotAnIhdrChunk,
  IllegalWidthOrHeightZero,
  IllegalColorTypeBitDepthCombination,
  IllegalCompressionMethod,
  IllegalFilterMethod,
  IllegalInterlaceMethod,
  IllegalFilterType,
  MissingPalette,
  PaletteIndexOutOfRange,
  ZlibError,
  TruncatedScanlineData,
}
impl Display for DecodeErrorReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Self::NoPngSignature => "input does not start with the PNG signature",
      Self::UnexpectedEndOfInput => "chunk stream ended before expected data",
      Self::NotAnIhdrChunk => "first chunk was not IHDR",
      Self::IllegalWidthOrHeightZero => "IHDR declares a width or height of zero",
      Self::IllegalColorTypeBitDepthCombination => {
        "IHDR color type and bit depth combination is not legal"
      }
      Self::IllegalCompressionMethod => "IHDR compression method is not 0",
      Self::IllegalFilterMethod => "IHDR filter method is not 0",
      Self::IllegalInterlaceMethod => "IHDR interlace method is not 0 or 1",
      Self::IllegalFilterType => "a scanline filter type byte was out of range",
      Self::MissingPalette => "color type is indexed but no PLTE chunk was present",
      Self::PaletteIndexOutOfRange => "an index sample referred outside the palette",
      Self::ZlibError => "the IDAT zlib stream failed to decompress",
      Self::TruncatedScanlineData => "decompressed data was shorter than the image requires",
    };
    f.write_str(s)
  }
}

/// An error raised by the codec or quantizer core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ImagineError {
  /// Memory exhaustion while building a histogram, palette, or PNG byte
  /// buffer.
  AllocationFailure,
  /// The byte stream being decoded is malformed in some way.
  DecodeError(DecodeErrorReason),
  /// The palette remapper's `bot_idx == top_idx + 1` invariant failed,
  /// which indicates a bug upstream in palette construction.
  QuantizerInvariantViolation,
  /// A caller-supplied argument was out of range (zero dimensions, a
  /// stride too small for the width, or a palette size outside `1..=256`).
  InvalidInput(&'static str),
}
impl Display for ImagineError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::AllocationFailure => f.write_str("allocation failure"),
      Self::DecodeError(reason) => write!(f, "decode error: {reason}"),
      Self::QuantizerInvariantViolation => {
        f.write_str("quantizer invariant violation: bot_idx != top_idx + 1")
      }
      Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
    }
  }
}
#[cfg(feature = "alloc")]
impl From<alloc::collections::TryReserveError> for ImagineError {
  #[inline]
  fn from(_: alloc::collections::TryReserveError) -> Self {
    Self::AllocationFailure
  }
}
impl From<DecodeErrorReason> for ImagineError {
  #[inline]
  fn from(reason: DecodeErrorReason) -> Self {
    Self::DecodeError(reason)
  }
}
