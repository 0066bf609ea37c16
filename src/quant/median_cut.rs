//! Median-cut quantizer (§4.4). Direct translation of `mediancut()` in the
//! original C source, `LARGE_NORM` tie-break mode only -- `LARGE_LUM` is a
//! discarded alternative per SPEC_FULL.md §9 and is not implemented.

use alloc::vec::Vec;

use crate::pixel::PixelBgra8888;

use super::histogram::ColorCount;

/// Internal median-cut state: a contiguous slice `[start, start+count)` of
/// the (mutably sorted in place) histogram array, plus the total pixel
/// weight it covers.
#[derive(Debug, Clone, Copy)]
struct Box_ {
  start: usize,
  count: usize,
  sum: u64,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Channel {
  Alpha,
  Red,
  Green,
  Blue,
}
impl Channel {
  #[inline]
  fn of(self, c: PixelBgra8888) -> u8 {
    match self {
      Self::Alpha => c.a,
      Self::Red => c.r,
      Self::Green => c.g,
      Self::Blue => c.b,
    }
  }
}

/// Runs median-cut over `histogram` (consumed and reordered in place),
/// returning up to `target_colors` representative BGRA colors, each the
/// pixel-weighted average of its box (§4.4 "Representative color per box").
#[must_use]
pub fn mediancut(mut histogram: Vec<ColorCount>, target_colors: usize) -> Vec<PixelBgra8888> {
  if histogram.is_empty() || target_colors == 0 {
    return Vec::new();
  }
  let total_sum: u64 = histogram.iter().map(|c| c.count as u64).sum();
  let mut boxes = alloc::vec![Box_ { start: 0, count: histogram.len(), sum: total_sum }];

  while boxes.len() < target_colors {
    let Some(split_at) = boxes.iter().position(|b| b.count >= 2) else {
      break;
    };
    let box_ = boxes[split_at];
    let slice = &mut histogram[box_.start..box_.start + box_.count];

    let channel = largest_range_channel(slice);
    slice.sort_by_key(|c| channel.of(c.color));

    let target = box_.sum / 2;
    let mut running = 0u64;
    let mut split_index = 1usize;
    for (i, entry) in slice.iter().enumerate() {
      running += entry.count as u64;
      if running >= target {
        split_index = (i + 1).clamp(1, slice.len() - 1);
        break;
      }
    }

    let left_sum: u64 = slice[..split_index].iter().map(|c| c.count as u64).sum();
    let right_sum = box_.sum - left_sum;
    let left = Box_ { start: box_.start, count: split_index, sum: left_sum };
    let right =
      Box_ { start: box_.start + split_index, count: box_.count - split_index, sum: right_sum };

    boxes.remove(split_at);
    boxes.push(left);
    boxes.push(right);
    boxes.sort_by(|a, b| b.sum.cmp(&a.sum));
  }

  boxes.iter().map(|b| representative_color(&histogram[b.start..b.start + b.count])).collect()
}

/// Picks the channel with the largest range over the box's colors,
/// tie-broken in the order Alpha, Red, Green, Blue (alpha preferred on
/// ties, per §4.4 step 3).
fn largest_range_channel(slice: &[ColorCount]) -> Channel {
  let mut min = [255u8; 4];
  let mut max = [0u8; 4];
  for entry in slice {
    let c = entry.color;
    let vals = [c.a, c.r, c.g, c.b];
    for i in 0..4 {
      min[i] = min[i].min(vals[i]);
      max[i] = max[i].max(vals[i]);
    }
  }
  let ranges = [
    (Channel::Alpha, max[0] - min[0]),
    (Channel::Red, max[1] - min[1]),
    (Channel::Green, max[2] - min[2]),
    (Channel::Blue, max[3] - min[3]),
  ];
  let mut best = ranges[0];
  for candidate in ranges.into_iter().skip(1) {
    if candidate.1 > best.1 {
      best = candidate;
    }
  }
  best.0
}

/// Pixel-weighted average of a box's colors, per channel: `sum(channel *
/// count) / sum(count)`.
fn representative_color(slice: &[ColorCount]) -> PixelBgra8888 {
  let mut sums = [0u64; 4]; // b, g, r, a
  let mut total = 0u64;
  for entry in slice {
    let c = entry.color;
    let weight = entry.count as u64;
    sums[0] += c.b as u64 * weight;
    sums[1] += c.g as u64 * weight;
    sums[2] += c.r as u64 * weight;
    sums[3] += c.a as u64 * weight;
    total += weight;
  }
  if total == 0 {
    return PixelBgra8888::TRANSPARENT;
  }
  PixelBgra8888::new(
    (sums[0] / total) as u8,
    (sums[1] / total) as u8,
    (sums[2] / total) as u8,
    (sums[3] / total) as u8,
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  fn cc(b: u8, g: u8, r: u8, a: u8, count: u32) -> ColorCount {
    ColorCount { color: PixelBgra8888::new(b, g, r, a), count }
  }

  #[test]
  fn fixed_point_when_fewer_colors_than_target() {
    let hist = alloc::vec![cc(1, 2, 3, 255, 5), cc(10, 20, 30, 255, 7)];
    let palette = mediancut(hist, 8);
    assert_eq!(palette.len(), 2);
  }

  #[test]
  fn splits_into_requested_count_when_enough_colors() {
    let hist: Vec<ColorCount> =
      (0..10u8).map(|i| cc(i * 20, i * 10, i * 5, 255, 1)).collect();
    let palette = mediancut(hist, 4);
    assert_eq!(palette.len(), 4);
  }

  #[test]
  fn representative_is_pixel_weighted_average() {
    let slice = [cc(0, 0, 0, 255, 1), cc(100, 0, 0, 255, 3)];
    let repr = representative_color(&slice);
    // (0*1 + 100*3) / 4 = 75
    assert_eq!(repr.b, 75);
  }

  #[test]
  fn alpha_wins_range_ties() {
    let slice = [cc(0, 0, 0, 0, 1), cc(10, 10, 10, 10, 1)];
    assert_eq!(largest_range_channel(&slice) as u8 as u8, Channel::Alpha as u8);
  }
}
