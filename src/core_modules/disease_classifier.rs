// THEORY:
// The `disease_classifier` is the heart of the diagnostic heuristic: an
// ordered, *overlapping* chain of rules over the biological pixel ratios.
// Unlike the crop classifier's disjoint hue bands, these rules can match the
// same vector simultaneously (a mildewed leaf is often also yellowing), so the
// chain's priority order is itself diagnostic knowledge: surface mildew trumps
// necrosis, heavy necrosis trumps light necrosis, and so on down to the
// exhaustive healthy fallback.
//
// Key architectural principles:
// 1.  **First match wins**: Rules are evaluated in fixed order and evaluation
//     stops at the first hit. The order is encoded once, in one list, not in
//     nesting depth.
// 2.  **Exhaustive by construction**: The final fallback always matches, so
//     the chain can never fail to produce a label.
// 3.  **Confidence is base + proportional bonus**: Each rule reports a
//     confidence derived from its triggering ratio, pre-clamp; the pipeline's
//     normalizer applies the [floor, ceiling] band afterwards.

use crate::core_modules::feature_extractor::FeatureVector;
use crate::core_modules::thresholds::ThresholdConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier for every disease the engine can diagnose, plus the
/// terminal `NotACrop` label for rejected images. Keys the knowledge base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiseaseId {
    Healthy,
    PowderyMildew,
    BacterialBlight,
    VerticilliumWilt,
    LeafRust,
    ViralInfection,
    SeptoriaLeafSpot,
    Anthracnose,
    TomatoLeafMold,
    PotatoLateBlight,
    NotACrop,
}

impl fmt::Display for DiseaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self {
            DiseaseId::Healthy => "healthy",
            DiseaseId::PowderyMildew => "powdery_mildew",
            DiseaseId::BacterialBlight => "bacterial_blight",
            DiseaseId::VerticilliumWilt => "verticillium_wilt",
            DiseaseId::LeafRust => "leaf_rust",
            DiseaseId::ViralInfection => "viral_infection",
            DiseaseId::SeptoriaLeafSpot => "septoria_leaf_spot",
            DiseaseId::Anthracnose => "anthracnose",
            DiseaseId::TomatoLeafMold => "tomato_leaf_mold",
            DiseaseId::PotatoLateBlight => "potato_late_blight",
            DiseaseId::NotACrop => "not_a_crop",
        };
        f.write_str(key)
    }
}

/// A disease label with the chain's raw (pre-clamp) confidence in it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiseaseCall {
    pub disease: DiseaseId,
    pub base_confidence: f64,
}

/// One link in the priority chain: if `matches` holds, `call` produces the
/// outcome and no later rule is consulted.
struct DiseaseRule {
    matches: fn(&FeatureVector, &ThresholdConfig) -> bool,
    call: fn(&FeatureVector) -> DiseaseCall,
}

/// The diagnostic chain, highest priority first. The order is part of the
/// tuned heuristic: reordering it changes diagnoses on overlapping symptoms.
const DISEASE_RULES: &[DiseaseRule] = &[
    // Surface mildew is visually unmistakable; it outranks everything.
    DiseaseRule {
        matches: |f, t| f.white_ratio > t.mildew_white_ratio,
        call: |_| DiseaseCall {
            disease: DiseaseId::PowderyMildew,
            base_confidence: 0.92,
        },
    },
    // Heavy necrosis reads as a wilt taking the whole leaf.
    DiseaseRule {
        matches: |f, t| f.brown_ratio > t.wilt_brown_ratio,
        call: |_| DiseaseCall {
            disease: DiseaseId::VerticilliumWilt,
            base_confidence: 0.88,
        },
    },
    // Light necrosis reads as localized spotting; confidence grows with
    // coverage.
    DiseaseRule {
        matches: |f, t| f.brown_ratio > t.spot_brown_ratio,
        call: |f| DiseaseCall {
            disease: DiseaseId::Anthracnose,
            base_confidence: 0.70 + 1.25 * f.brown_ratio,
        },
    },
    // Chlorosis without significant necrosis reads as blight.
    DiseaseRule {
        matches: |f, t| f.yellow_ratio > t.blight_yellow_ratio,
        call: |f| DiseaseCall {
            disease: DiseaseId::BacterialBlight,
            base_confidence: 0.75 + 0.5 * f.yellow_ratio,
        },
    },
    // Dominant healthy green tissue with no symptom rule fired above.
    DiseaseRule {
        matches: |f, t| f.green_ratio > t.healthy_green_ratio,
        call: |_| DiseaseCall {
            disease: DiseaseId::Healthy,
            base_confidence: 0.95,
        },
    },
];

/// When nothing in the chain matched: healthy, at a low-but-nonzero base.
const FALLBACK_CALL: DiseaseCall = DiseaseCall {
    disease: DiseaseId::Healthy,
    base_confidence: 0.70,
};

/// Runs the priority chain. First matching rule wins; the fallback guarantees
/// a label is always produced.
pub fn classify_disease(features: &FeatureVector, thresholds: &ThresholdConfig) -> DiseaseCall {
    for rule in DISEASE_RULES {
        if (rule.matches)(features, thresholds) {
            return (rule.call)(features);
        }
    }
    FALLBACK_CALL
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline() -> FeatureVector {
        FeatureVector {
            hue: 120.0,
            saturation: 0.5,
            brightness: 100.0,
            variance: 25.0,
            green_ratio: 0.0,
            brown_ratio: 0.0,
            yellow_ratio: 0.0,
            white_ratio: 0.0,
            skin_ratio: 0.0,
            pure_pixel_ratio: 0.0,
            unique_colors_ratio: 0.3,
            quantized_unique_ratio: 0.01,
            max_single_color_ratio: 0.01,
            plant_pixel_count: 10_000,
            used_plant_mask: true,
        }
    }

    #[test]
    fn mildew_rule_fires_on_white_coverage() {
        let t = ThresholdConfig::default();
        let mut f = baseline();
        f.white_ratio = 0.20;
        let call = classify_disease(&f, &t);
        assert_eq!(call.disease, DiseaseId::PowderyMildew);
        assert_eq!(call.base_confidence, 0.92);
    }

    #[test]
    fn heavy_necrosis_is_wilt_not_spot() {
        let t = ThresholdConfig::default();
        let mut f = baseline();
        f.brown_ratio = 0.92;
        let call = classify_disease(&f, &t);
        assert_eq!(call.disease, DiseaseId::VerticilliumWilt);
        assert_eq!(call.base_confidence, 0.88);
    }

    #[test]
    fn light_necrosis_is_spot_with_scaled_confidence() {
        let t = ThresholdConfig::default();
        let mut f = baseline();
        f.brown_ratio = 0.05;
        let call = classify_disease(&f, &t);
        assert_eq!(call.disease, DiseaseId::Anthracnose);
        assert!((call.base_confidence - (0.70 + 1.25 * 0.05)).abs() < 1e-9);
    }

    #[test]
    fn chlorosis_is_blight_with_scaled_confidence() {
        let t = ThresholdConfig::default();
        let mut f = baseline();
        f.yellow_ratio = 0.30;
        let call = classify_disease(&f, &t);
        assert_eq!(call.disease, DiseaseId::BacterialBlight);
        assert!((call.base_confidence - (0.75 + 0.5 * 0.30)).abs() < 1e-9);
    }

    #[test]
    fn dominant_green_is_confidently_healthy() {
        let t = ThresholdConfig::default();
        let mut f = baseline();
        f.green_ratio = 0.75;
        let call = classify_disease(&f, &t);
        assert_eq!(call.disease, DiseaseId::Healthy);
        assert_eq!(call.base_confidence, 0.95);
    }

    #[test]
    fn chain_is_exhaustive() {
        let t = ThresholdConfig::default();
        let call = classify_disease(&baseline(), &t);
        assert_eq!(call.disease, DiseaseId::Healthy);
        assert!(call.base_confidence > 0.0);
        assert!(call.base_confidence < 0.95);
    }

    #[test]
    fn mildew_outranks_blight_when_both_match() {
        let t = ThresholdConfig::default();
        let mut f = baseline();
        f.white_ratio = 0.20;
        f.yellow_ratio = 0.30;
        assert_eq!(classify_disease(&f, &t).disease, DiseaseId::PowderyMildew);
    }

    #[test]
    fn disease_id_serializes_as_snake_case_key() {
        let json = serde_json::to_string(&DiseaseId::PowderyMildew).unwrap();
        assert_eq!(json, "\"powdery_mildew\"");
        assert_eq!(DiseaseId::NotACrop.to_string(), "not_a_crop");
    }
}
