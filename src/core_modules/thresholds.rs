// THEORY:
// Every decision the gate and the disease chain make is a comparison against a
// hand-tuned threshold, and those thresholds have historically been the most
// frequently revised part of this style of heuristic engine. This module pulls
// all of them into one named, versioned, serializable structure so that tuning
// is a data change, never a code change, and so a specific threshold set can be
// pinned, diffed, and tested in isolation.
//
// Key architectural principles:
// 1.  **One structure, injected everywhere**: `ThresholdConfig` is passed by
//     reference into the `ValidationGate` and `DiseaseClassifier`. Nothing
//     re-derives a threshold at call time.
// 2.  **Versioned defaults**: `ThresholdConfig::default()` is the tuned set
//     this crate ships with, stamped with a version string so downstream
//     results can be traced to the threshold set that produced them.
// 3.  **Serializable**: a config can be loaded from or dumped to JSON, which
//     is how alternative tunings are exchanged during calibration.

use serde::{Deserialize, Serialize};

/// Version stamp of the built-in threshold set.
pub const DEFAULT_THRESHOLD_VERSION: &str = "2024.2";

/// Quantization step used for the coarse color-cardinality statistic: each
/// channel is integer-divided by this before counting distinct triples.
pub const COLOR_QUANTIZATION_STEP: u8 = 10;

/// Minimum number of plant-mask pixels required before masked statistics are
/// trusted; below this the extractor falls back to whole-buffer statistics.
pub const MIN_PLANT_MASK_PIXELS: usize = 500;

/// Guard against zero denominators in ratio computations.
pub const EPSILON: f64 = 1e-3;

/// All tunable decision thresholds for the validation gate and the disease
/// rule chain, as one injectable value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Version stamp identifying this tuning.
    pub version: String,

    // --- Validation gate ---
    /// Below this exact unique-color ratio the image is digitally flat
    /// (diagram, UI capture, gradient).
    pub min_unique_colors_ratio: f64,
    /// Below this quantized unique-color ratio the image is digitally flat
    /// even if dithering inflated the exact count.
    pub min_quantized_unique_ratio: f64,
    /// Above this pure black/white pixel ratio the image has the uniform
    /// regions typical of screenshots and borders.
    pub max_pure_pixel_ratio: f64,
    /// Above this single-color dominance the background is synthetic.
    pub max_single_color_ratio: f64,
    /// Below this channel std-dev the image lacks sensor noise.
    pub min_variance: f64,
    /// Above this skin-tone ratio the subject is likely human.
    pub max_skin_ratio: f64,
    /// Below this combined green+brown+yellow ratio there is not enough
    /// plant material visible to classify.
    pub min_biological_ratio: f64,

    // --- Disease rule chain ---
    /// White/mildew-like ratio above which powdery mildew is diagnosed.
    pub mildew_white_ratio: f64,
    /// Necrotic ratio above which a wilt-class disease is diagnosed.
    pub wilt_brown_ratio: f64,
    /// Necrotic ratio above which a spot-class disease is diagnosed.
    pub spot_brown_ratio: f64,
    /// Chlorotic ratio above which a blight-class disease is diagnosed.
    pub blight_yellow_ratio: f64,
    /// Healthy-green ratio above which the high-confidence healthy rule fires.
    pub healthy_green_ratio: f64,

    // --- Confidence normalization ---
    /// Floor applied to accepted confidences; the heuristic never claims
    /// near-total uncertainty for an image it accepted.
    pub confidence_floor: f64,
    /// Ceiling applied to accepted confidences; the heuristic never claims
    /// near-certainty either.
    pub confidence_ceiling: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_THRESHOLD_VERSION.to_string(),
            min_unique_colors_ratio: 0.08,
            min_quantized_unique_ratio: 0.0005,
            max_pure_pixel_ratio: 0.30,
            max_single_color_ratio: 0.40,
            min_variance: 15.0,
            max_skin_ratio: 0.12,
            min_biological_ratio: 0.05,
            mildew_white_ratio: 0.08,
            wilt_brown_ratio: 0.08,
            spot_brown_ratio: 0.03,
            blight_yellow_ratio: 0.15,
            healthy_green_ratio: 0.20,
            confidence_floor: 0.65,
            confidence_ceiling: 0.99,
        }
    }
}

impl ThresholdConfig {
    /// Clamps an accepted-path confidence into the configured band.
    pub fn clamp_confidence(&self, raw: f64) -> f64 {
        raw.clamp(self.confidence_floor, self.confidence_ceiling)
    }
}

#[cfg(test)]
mod tests {
    use super::ThresholdConfig;

    #[test]
    fn default_set_is_internally_ordered() {
        let t = ThresholdConfig::default();
        // The spot rule must sit strictly below the wilt rule or the chain's
        // priority ordering is meaningless.
        assert!(t.spot_brown_ratio < t.wilt_brown_ratio);
        assert!(t.confidence_floor < t.confidence_ceiling);
        assert!(t.min_quantized_unique_ratio < t.min_unique_colors_ratio);
    }

    #[test]
    fn clamp_confidence_applies_floor_and_ceiling() {
        let t = ThresholdConfig::default();
        assert_eq!(t.clamp_confidence(0.50), 0.65);
        assert_eq!(t.clamp_confidence(0.80), 0.80);
        assert_eq!(t.clamp_confidence(1.20), 0.99);
    }

    #[test]
    fn survives_a_json_round_trip() {
        let t = ThresholdConfig::default();
        let json = serde_json::to_string(&t).unwrap();
        let back: ThresholdConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.version, t.version);
        assert_eq!(back.min_variance, t.min_variance);
    }
}
