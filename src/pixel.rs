//! The canonical pixel format: premultiplied BGRA, 8 bits per channel.

use bytemuck::{Pod, Zeroable};

/// Premultiplied Blue/Green/Red/Alpha, u8 per channel.
///
/// This is the crate's canonical internal pixel format (see the data model
/// section of the design docs): byte 0 is blue, a choice inherited from the
/// system this crate's algorithms are ported from. `B`, `G`, and `R` are
/// always `<= A` (the premultiplication invariant); when `A == 0` all three
/// are `0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Zeroable, Pod)]
#[repr(C)]
pub struct PixelBgra8888 {
  pub b: u8,
  pub g: u8,
  pub r: u8,
  pub a: u8,
}
impl PixelBgra8888 {
  /// The fully transparent black pixel.
  pub const TRANSPARENT: Self = Self { b: 0, g: 0, r: 0, a: 0 };

  #[inline]
  #[must_use]
  pub const fn new(b: u8, g: u8, r: u8, a: u8) -> Self {
    Self { b, g, r, a }
  }

  /// Builds a premultiplied pixel from straight-alpha RGBA channels.
  #[inline]
  #[must_use]
  pub const fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
    Self { b: premul(b, a), g: premul(g, a), r: premul(r, a), a }
  }

  /// Un-premultiplies back to straight-alpha `(r, g, b, a)`.
  #[inline]
  #[must_use]
  pub const fn to_straight_rgba(self) -> (u8, u8, u8, u8) {
    (unpremul(self.r, self.a), unpremul(self.g, self.a), unpremul(self.b, self.a), self.a)
  }

  /// Un-premultiplies a pixel that was computed at a reduced per-channel
  /// resolution `maxval < 255` (the quantizer's depth-reduction retry path,
  /// §4.4/§4.6) back to straight-alpha 8-bit RGBA.
  ///
  /// First rescales every channel from `maxval` to `255` with
  /// [`rescale_channel`], then un-premultiplies using the rescaled alpha,
  /// exactly as the remapper's un-premultiplication step specifies.
  #[inline]
  #[must_use]
  pub fn to_straight_rgba_at_maxval(self, maxval: u8) -> (u8, u8, u8, u8) {
    if maxval == 255 {
      return self.to_straight_rgba();
    }
    let a = rescale_channel(self.a, maxval, 255);
    if a == 0 {
      return (0, 0, 0, 0);
    }
    let r = rescale_channel(self.r, maxval, 255);
    let g = rescale_channel(self.g, maxval, 255);
    let b = rescale_channel(self.b, maxval, 255);
    if a == 255 {
      return (r, g, b, 255);
    }
    (unpremul(r, a), unpremul(g, a), unpremul(b, a), a)
  }

  /// Requantizes every channel of a premultiplied pixel from `old_maxval` to
  /// `new_maxval`, per §4.4's depth-reduction retry loop: `new = (old *
  /// new_maxval + old_maxval/2) / old_maxval`, applied uniformly to
  /// B, G, R, A.
  #[inline]
  #[must_use]
  pub fn rescaled(self, old_maxval: u8, new_maxval: u8) -> Self {
    Self {
      b: rescale_channel(self.b, old_maxval, new_maxval),
      g: rescale_channel(self.g, old_maxval, new_maxval),
      r: rescale_channel(self.r, old_maxval, new_maxval),
      a: rescale_channel(self.a, old_maxval, new_maxval),
    }
  }
}

/// `new = (old * new_maxval + old_maxval/2) / old_maxval`: the linear
/// channel rescale used both by the quantizer's depth-reduction retry loop
/// (§4.4) and the remapper's un-premultiplication rescale back to 255
/// (§4.6).
#[inline]
#[must_use]
pub fn rescale_channel(old: u8, old_maxval: u8, new_maxval: u8) -> u8 {
  let old_maxval = old_maxval as u32;
  let new_maxval = new_maxval as u32;
  (((old as u32) * new_maxval + old_maxval / 2) / old_maxval) as u8
}

/// `premul(c,a) = ((a*c + 0x80 + ((a*c+0x80)>>8)) >> 8)`.
///
/// This is the rounding premultiplication formula used everywhere a straight
/// alpha channel is converted to the canonical premultiplied form.
#[inline]
#[must_use]
pub const fn premul(c: u8, a: u8) -> u8 {
  let t = (a as u32) * (c as u32) + 0x80;
  ((t + (t >> 8)) >> 8) as u8
}

/// Inverse of [`premul`]: recovers a straight-alpha channel value from a
/// premultiplied channel and its alpha.
///
/// * `a == 0` maps to `0` (there is no information to recover).
/// * `a == 255` is the identity.
/// * Otherwise `(c*255 + a/2) / a`, matching the remapper's un-premultiply
///   step.
#[inline]
#[must_use]
pub const fn unpremul(c: u8, a: u8) -> u8 {
  match a {
    0 => 0,
    255 => c,
    a => (((c as u32) * 255 + (a as u32) / 2) / (a as u32)) as u8,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn premul_opaque_is_identity() {
    for c in 0..=255u8 {
      assert_eq!(premul(c, 255), c);
    }
  }

  #[test]
  fn premul_zero_alpha_is_zero() {
    for c in 0..=255u8 {
      assert_eq!(premul(c, 0), 0);
    }
  }

  #[test]
  fn premul_never_exceeds_alpha() {
    for a in 0..=255u8 {
      for c in [0u8, 1, 17, 128, 200, 255] {
        assert!(premul(c, a) <= a);
      }
    }
  }

  #[test]
  fn unpremul_roundtrip_within_one() {
    for a in 1..=255u8 {
      for c in 0..=255u8 {
        let p = premul(c, a);
        let back = unpremul(p, a);
        assert!((back as i32 - c as i32).abs() <= 1, "a={a} c={c} p={p} back={back}");
      }
    }
  }

  #[test]
  fn rescale_channel_is_identity_at_same_maxval() {
    for c in [0u8, 1, 17, 128, 200, 255] {
      assert_eq!(rescale_channel(c, 255, 255), c);
    }
  }

  #[test]
  fn rescale_then_unscale_roundtrips_within_rounding() {
    for c in [0u8, 10, 63, 127] {
      let down = rescale_channel(c, 255, 127);
      let up = rescale_channel(down, 127, 255);
      assert!((up as i32 - c as i32).abs() <= 3, "c={c} down={down} up={up}");
    }
  }

  #[test]
  fn to_straight_rgba_at_maxval_matches_full_res_when_maxval_255() {
    let p = PixelBgra8888::from_straight_rgba(200, 10, 50, 128);
    assert_eq!(p.to_straight_rgba_at_maxval(255), p.to_straight_rgba());
  }
}
