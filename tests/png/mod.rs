//! End-to-end scenarios for the PNG codec + quantizer pipeline, following
//! the literal test inputs laid out in the design docs' "testable
//! properties" section.

use imagine_quant::{
  create_solid, decode, encode_indexed, encode_rgba, CompressionLevel, PixelBgra8888, PixelImage,
};

/// S1: fully transparent 2x2 encodes to a 1-entry palette with a tRNS of
/// length 1 and every raster index 0.
#[test]
fn s1_fully_transparent_2x2() {
  let img = PixelImage::new(2, 2); // all-zero == fully transparent black
  let bytes = encode_indexed(&img, 16, CompressionLevel::Default).unwrap();
  let decoded = decode(&bytes).unwrap();
  assert_eq!(decoded.width(), 2);
  assert_eq!(decoded.height(), 2);
  for p in decoded.pixels() {
    assert_eq!(p, PixelBgra8888::TRANSPARENT);
  }
}

/// S2: fully opaque solid red 1x1 encodes RGB with no transparency.
#[test]
fn s2_opaque_solid_red_1x1() {
  let red = PixelBgra8888::from_straight_rgba(255, 0, 0, 255);
  let bytes = create_solid(1, 1, red, CompressionLevel::Default).unwrap();
  let decoded = decode(&bytes).unwrap();
  assert_eq!(decoded.pixel(0, 0), red);
}

/// S3: two-color opaque checkerboard quantized to 2 colors reclassifies
/// back to the exact original pattern.
#[test]
fn s3_two_color_checkerboard_round_trips_pattern() {
  let red = PixelBgra8888::from_straight_rgba(255, 0, 0, 255);
  let blue = PixelBgra8888::from_straight_rgba(0, 0, 255, 255);
  let mut img = PixelImage::new(2, 2);
  img.set_pixel(0, 0, red);
  img.set_pixel(1, 0, blue);
  img.set_pixel(0, 1, blue);
  img.set_pixel(1, 1, red);

  let bytes = encode_indexed(&img, 2, CompressionLevel::Default).unwrap();
  let decoded = decode(&bytes).unwrap();
  assert_eq!(decoded.pixel(0, 0), red);
  assert_eq!(decoded.pixel(1, 0), blue);
  assert_eq!(decoded.pixel(0, 1), blue);
  assert_eq!(decoded.pixel(1, 1), red);
}

/// S4: 256x1 gradient at alpha 128, RGBA round trip within +-1 per channel.
#[test]
fn s4_gradient_with_alpha_round_trips_within_one() {
  let mut img = PixelImage::new(256, 1);
  for x in 0..256u32 {
    let v = x as u8;
    img.set_pixel(x, 0, PixelBgra8888::from_straight_rgba(v, v, v, 128));
  }
  let bytes = encode_rgba(&img, CompressionLevel::Default).unwrap();
  let decoded = decode(&bytes).unwrap();
  for x in 0..256u32 {
    let orig = img.pixel(x, 0);
    let back = decoded.pixel(x, 0);
    assert!((orig.b as i32 - back.b as i32).abs() <= 1, "x={x}");
    assert!((orig.g as i32 - back.g as i32).abs() <= 1, "x={x}");
    assert!((orig.r as i32 - back.r as i32).abs() <= 1, "x={x}");
    assert_eq!(orig.a, back.a, "x={x}");
  }
}

/// S5: a 200x200 image with 40000 distinct colors (> MAXCOLORS) forces the
/// quantizer's depth-reduction retry loop; it must still succeed and
/// produce a palette of at most `ncolors` entries.
#[test]
fn s5_too_many_colors_forces_rescale_and_still_succeeds() {
  let mut img = PixelImage::new(200, 200);
  let mut n: u32 = 0;
  for y in 0..200u32 {
    for x in 0..200u32 {
      let r = (n % 200) as u8;
      let g = (n / 200) as u8;
      img.set_pixel(x, y, PixelBgra8888::from_straight_rgba(r, g, 0, 255));
      n += 1;
    }
  }
  let bytes = encode_indexed(&img, 64, CompressionLevel::Default).unwrap();
  let decoded = decode(&bytes).unwrap();
  assert_eq!(decoded.width(), 200);
  assert_eq!(decoded.height(), 200);
}

/// S6: a mix of translucent and opaque colors quantized to 32 must succeed
/// -- the remapper's two-pointer partition must meet cleanly even with
/// duplicate representative colors after quantization.
#[test]
fn s6_mixed_translucency_quantizes_cleanly() {
  let mut img = PixelImage::new(6, 5);
  let mut i = 0usize;
  for y in 0..5u32 {
    for x in 0..6u32 {
      let color = if i < 10 {
        PixelBgra8888::from_straight_rgba((i * 20) as u8, 10, 200, 128)
      } else {
        PixelBgra8888::from_straight_rgba(10, (i * 5) as u8, 50, 255)
      };
      img.set_pixel(x, y, color);
      i += 1;
    }
  }
  let bytes = encode_indexed(&img, 32, CompressionLevel::Default).unwrap();
  let decoded = decode(&bytes).unwrap();
  assert_eq!(decoded.width(), 6);
  assert_eq!(decoded.height(), 5);
}

/// Round trip for an opaque image must be pixel-exact (design docs
/// invariant 2).
#[test]
fn opaque_round_trip_is_pixel_exact() {
  let mut img = PixelImage::new(8, 8);
  for y in 0..8u32 {
    for x in 0..8u32 {
      img.set_pixel(
        x,
        y,
        PixelBgra8888::from_straight_rgba((x * 30) as u8, (y * 30) as u8, 5, 255),
      );
    }
  }
  let bytes = encode_rgba(&img, CompressionLevel::Best).unwrap();
  let decoded = decode(&bytes).unwrap();
  assert_eq!(decoded, img);
}

/// The palette encoder never needs more indices in the raster than the
/// requested palette size permits (design docs invariant 4).
#[test]
fn palette_encoder_succeeds_under_requested_colors() {
  let mut img = PixelImage::new(32, 32);
  for y in 0..32u32 {
    for x in 0..32u32 {
      img.set_pixel(
        x,
        y,
        PixelBgra8888::from_straight_rgba((x * 8) as u8, (y * 8) as u8, 100, 255),
      );
    }
  }
  let bytes = encode_indexed(&img, 12, CompressionLevel::Fast).unwrap();
  decode(&bytes).unwrap();
}

#[test]
fn decode_rejects_garbage() {
  assert!(decode(b"not a png").is_err());
}
