// THEORY:
// The `feature_extractor` turns a raw `PixelBuffer` into a compact, immutable
// `FeatureVector` — the single value every downstream decision is made from.
// It is the sensory layer of the engine: everything after it (gate, crop and
// disease classifiers) operates purely on these summary statistics and never
// touches pixels again.
//
// Key architectural principles:
// 1.  **Two populations, deliberately different**: Biological color statistics
//     describe the *plant*, so they are computed over a plant mask (green or
//     leaf-brown pixels), with a whole-buffer fallback when the mask is too
//     small to be statistically meaningful. Digital-artifact statistics
//     describe the *image* (screenshot borders, flat vector fills, synthetic
//     backgrounds), so they are always computed over the full buffer.
// 2.  **Pure function**: No state, no I/O, no randomness. The same buffer
//     always produces the same vector, which is what makes the whole pipeline
//     deterministic and safely parallel.
// 3.  **Guarded arithmetic**: Every ratio denominator carries a small epsilon,
//     and the mask fallback guarantees statistics are never taken over an
//     empty sample. Degenerate input is handled here, locally, and never
//     surfaces as an error.

use crate::core_modules::pixel::pixel::Pixel;
use crate::core_modules::pixel_buffer::pixel_buffer::PixelBuffer;
use crate::core_modules::thresholds::{COLOR_QUANTIZATION_STEP, EPSILON, MIN_PLANT_MASK_PIXELS};
use std::collections::{HashMap, HashSet};

/// The compact statistical summary of one analyzed buffer. Built once per
/// request, immutable thereafter.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    // --- Color-space summaries (plant mask, with whole-buffer fallback) ---
    /// Mean hue of the sampled tissue, degrees in [0, 360).
    pub hue: f64,
    /// Mean HSV saturation of the sampled tissue, in [0, 1].
    pub saturation: f64,
    /// Perceived brightness (Rec. 601) of the mean color, in 0..255.
    pub brightness: f64,
    /// Mean per-channel standard deviation; the texture/noise signature a
    /// physical photograph always carries.
    pub variance: f64,

    // --- Biological pixel ratios (full buffer) ---
    /// Fraction of pixels matching the healthy-green predicate.
    pub green_ratio: f64,
    /// Fraction of pixels matching the necrotic leaf-brown predicate.
    pub brown_ratio: f64,
    /// Fraction of pixels matching the chlorotic yellow predicate.
    pub yellow_ratio: f64,
    /// Fraction of pixels matching the mildew-like white predicate.
    pub white_ratio: f64,
    /// Fraction of pixels matching the human skin-tone predicate.
    pub skin_ratio: f64,

    // --- Digital-artifact ratios (full buffer) ---
    /// Fraction of pure black/white pixels.
    pub pure_pixel_ratio: f64,
    /// Distinct exact 24-bit colors over total pixels.
    pub unique_colors_ratio: f64,
    /// Distinct quantized colors over total pixels.
    pub quantized_unique_ratio: f64,
    /// Frequency share of the single most common exact color.
    pub max_single_color_ratio: f64,

    // --- Provenance of the color-space summaries ---
    /// Number of pixels in the plant mask.
    pub plant_pixel_count: usize,
    /// Whether the summaries above came from the mask (true) or from the
    /// whole-buffer fallback (false).
    pub used_plant_mask: bool,
}

impl FeatureVector {
    /// Combined biological coverage, the gate's last line of defense.
    pub fn biological_ratio(&self) -> f64 {
        self.green_ratio + self.brown_ratio + self.yellow_ratio
    }
}

/// Derives a `FeatureVector` from a pixel buffer. Pure; no side effects.
pub fn extract_features(buffer: &PixelBuffer) -> FeatureVector {
    let total = buffer.len();
    let denominator = total as f64 + EPSILON;

    let mut green_count = 0usize;
    let mut brown_count = 0usize;
    let mut yellow_count = 0usize;
    let mut white_count = 0usize;
    let mut skin_count = 0usize;
    let mut pure_count = 0usize;

    let mut exact_colors: HashMap<u32, u32> = HashMap::new();
    let mut quantized_colors: HashSet<u32> = HashSet::new();

    let mut mask_sum = [0u64; 3];
    let mut mask_count = 0usize;

    for pixel in buffer.iter() {
        if pixel.is_green() {
            green_count += 1;
        }
        if pixel.is_leaf_brown() {
            brown_count += 1;
        }
        if pixel.is_yellow() {
            yellow_count += 1;
        }
        if pixel.is_white() {
            white_count += 1;
        }
        if pixel.is_skin() {
            skin_count += 1;
        }
        if pixel.is_pure() {
            pure_count += 1;
        }

        *exact_colors.entry(pixel.color_key()).or_insert(0) += 1;
        quantized_colors.insert(pixel.quantized_color_key(COLOR_QUANTIZATION_STEP));

        if in_plant_mask(pixel) {
            mask_sum[0] += pixel.red as u64;
            mask_sum[1] += pixel.green as u64;
            mask_sum[2] += pixel.blue as u64;
            mask_count += 1;
        }
    }

    // A near-empty mask would make the channel statistics meaningless, so
    // fall back to the whole buffer below the minimum sample size.
    let used_plant_mask = mask_count >= MIN_PLANT_MASK_PIXELS;
    let (means, variance) = if used_plant_mask {
        channel_statistics(buffer, mask_sum, mask_count, in_plant_mask)
    } else {
        let mut full_sum = [0u64; 3];
        for pixel in buffer.iter() {
            full_sum[0] += pixel.red as u64;
            full_sum[1] += pixel.green as u64;
            full_sum[2] += pixel.blue as u64;
        }
        channel_statistics(buffer, full_sum, total, |_| true)
    };

    let (hue, saturation) = rgb_to_hue_saturation(means[0], means[1], means[2]);
    let brightness = 0.299 * means[0] + 0.587 * means[1] + 0.114 * means[2];

    let max_color_frequency = exact_colors.values().copied().max().unwrap_or(0);

    FeatureVector {
        hue,
        saturation,
        brightness,
        variance,
        green_ratio: green_count as f64 / denominator,
        brown_ratio: brown_count as f64 / denominator,
        yellow_ratio: yellow_count as f64 / denominator,
        white_ratio: white_count as f64 / denominator,
        skin_ratio: skin_count as f64 / denominator,
        pure_pixel_ratio: pure_count as f64 / denominator,
        unique_colors_ratio: exact_colors.len() as f64 / denominator,
        quantized_unique_ratio: quantized_colors.len() as f64 / denominator,
        max_single_color_ratio: max_color_frequency as f64 / denominator,
        plant_pixel_count: mask_count,
        used_plant_mask,
    }
}

/// Plant mask membership: likely leaf tissue, healthy or necrotic.
fn in_plant_mask(pixel: &Pixel) -> bool {
    pixel.is_green() || pixel.is_leaf_brown()
}

/// Per-channel mean and pooled standard deviation over the pixels selected by
/// `select`. `sums` and `count` must already describe that same selection.
fn channel_statistics(
    buffer: &PixelBuffer,
    sums: [u64; 3],
    count: usize,
    select: impl Fn(&Pixel) -> bool,
) -> ([f64; 3], f64) {
    let n = count as f64 + EPSILON;
    let means = [
        sums[0] as f64 / n,
        sums[1] as f64 / n,
        sums[2] as f64 / n,
    ];

    let mut sum_sq = [0f64; 3];
    for pixel in buffer.iter() {
        if select(pixel) {
            sum_sq[0] += (pixel.red as f64 - means[0]).powi(2);
            sum_sq[1] += (pixel.green as f64 - means[1]).powi(2);
            sum_sq[2] += (pixel.blue as f64 - means[2]).powi(2);
        }
    }
    let variance =
        ((sum_sq[0] / n).sqrt() + (sum_sq[1] / n).sqrt() + (sum_sq[2] / n).sqrt()) / 3.0;

    (means, variance)
}

/// Standard RGB→HSV conversion of a mean color triple (channels in 0..255).
/// Returns (hue in [0, 360), saturation in [0, 1]).
fn rgb_to_hue_saturation(red: f64, green: f64, blue: f64) -> (f64, f64) {
    let r = red / 255.0;
    let g = green / 255.0;
    let b = blue / 255.0;

    let max = r.max(g.max(b));
    let min = r.min(g.min(b));
    let chroma = max - min;

    let saturation = if max <= 0.0 { 0.0 } else { chroma / max };

    if chroma <= 1e-9 {
        return (0.0, saturation);
    }

    let hue_sector = if max == r {
        (g - b) / chroma + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / chroma + 2.0
    } else {
        (r - g) / chroma + 4.0
    };

    let mut hue = hue_sector * 60.0;
    if hue >= 360.0 {
        hue -= 360.0;
    }
    (hue, saturation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::pixel_buffer::pixel_buffer::PixelBuffer;

    #[test]
    fn hue_of_pure_channels() {
        let (hue, sat) = rgb_to_hue_saturation(255.0, 0.0, 0.0);
        assert!((hue - 0.0).abs() < 1e-6);
        assert!((sat - 1.0).abs() < 1e-6);

        let (hue, _) = rgb_to_hue_saturation(0.0, 255.0, 0.0);
        assert!((hue - 120.0).abs() < 1e-6);

        let (hue, _) = rgb_to_hue_saturation(0.0, 0.0, 255.0);
        assert!((hue - 240.0).abs() < 1e-6);
    }

    #[test]
    fn hue_of_grey_is_zero_with_zero_saturation() {
        let (hue, sat) = rgb_to_hue_saturation(128.0, 128.0, 128.0);
        assert_eq!(hue, 0.0);
        assert_eq!(sat, 0.0);
    }

    #[test]
    fn leaf_green_buffer_uses_the_plant_mask() {
        let buffer = PixelBuffer::from_fn(|_| Pixel::new(40, 160, 40));
        let features = extract_features(&buffer);

        assert!(features.used_plant_mask);
        assert_eq!(features.plant_pixel_count, buffer.len());
        assert!((features.green_ratio - 1.0).abs() < 0.01);
        // Mean color is exactly (40,160,40): hue lands in the green band.
        assert!(features.hue > 100.0 && features.hue < 140.0);
        // A perfectly uniform buffer has no texture and one color.
        assert!(features.variance < 1.0);
        assert!(features.unique_colors_ratio < 0.001);
        assert!((features.max_single_color_ratio - 1.0).abs() < 0.01);
    }

    #[test]
    fn solid_blue_buffer_falls_back_to_whole_buffer_statistics() {
        let buffer = PixelBuffer::from_fn(|_| Pixel::new(0, 0, 200));
        let features = extract_features(&buffer);

        assert!(!features.used_plant_mask);
        assert_eq!(features.plant_pixel_count, 0);
        assert!((features.hue - 240.0).abs() < 1.0);
        assert!(features.biological_ratio() < 0.001);
    }

    #[test]
    fn artifact_statistics_cover_the_full_buffer_not_the_mask() {
        // Half leaf green, half pure white: the mask only holds the green
        // half, but the pure-pixel ratio must still see the white half.
        let buffer = PixelBuffer::from_fn(|i| {
            if i % 2 == 0 {
                Pixel::new(40, 160, 40)
            } else {
                Pixel::new(255, 255, 255)
            }
        });
        let features = extract_features(&buffer);

        assert!(features.used_plant_mask);
        assert!((features.pure_pixel_ratio - 0.5).abs() < 0.01);
        assert!((features.max_single_color_ratio - 0.5).abs() < 0.01);
    }

    #[test]
    fn ratios_stay_in_unit_interval() {
        let buffer = PixelBuffer::from_fn(|i| {
            Pixel::new((i % 256) as u8, (i / 7 % 256) as u8, (i / 13 % 256) as u8)
        });
        let f = extract_features(&buffer);
        for ratio in [
            f.green_ratio,
            f.brown_ratio,
            f.yellow_ratio,
            f.white_ratio,
            f.skin_ratio,
            f.pure_pixel_ratio,
            f.unique_colors_ratio,
            f.quantized_unique_ratio,
            f.max_single_color_ratio,
        ] {
            assert!((0.0..=1.0).contains(&ratio), "ratio out of range: {ratio}");
        }
        assert!((0.0..360.0).contains(&f.hue));
    }

    #[test]
    fn extraction_is_deterministic() {
        let buffer = PixelBuffer::from_fn(|i| {
            Pixel::new((i % 200) as u8, (i % 151) as u8, (i % 97) as u8)
        });
        assert_eq!(extract_features(&buffer), extract_features(&buffer));
    }
}
