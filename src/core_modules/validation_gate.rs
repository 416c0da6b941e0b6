// THEORY:
// The `validation_gate` decides one thing: does this buffer plausibly depict
// real plant tissue at all? It is the firewall between the noisy outside world
// (screenshots, diagrams, UI captures, selfies) and the classifiers, which are
// only meaningful on photographs of foliage.
//
// Key architectural principles:
// 1.  **Explicit ordered rule list**: Historically this decision lived in a
//     nest of if/else with thresholds scattered through it, and rule order was
//     implicit in nesting depth. Here each rejection rule is one
//     (predicate, reason) pair in an explicit ordered slice, evaluated by a
//     single first-match-wins loop. Adding, removing, or reordering a rule is
//     a one-line change, and the order is an inspectable artifact.
// 2.  **Total function**: Every feature vector maps to exactly ACCEPT or
//     REJECT. There are no partial results and no errors.
// 3.  **Rejection is terminal**: A match here short-circuits the rest of the
//     pipeline; the classifiers never see a rejected image.

use crate::core_modules::feature_extractor::FeatureVector;
use crate::core_modules::thresholds::ThresholdConfig;
use tracing::debug;

/// Why the gate rejected a buffer. Carried on the decision for logging and
/// operator feedback; downstream behavior is identical for all reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Too few distinct colors (exact or quantized): flat digital imagery.
    LowColorCardinality,
    /// Large uniform black/white regions: screenshot or border framing.
    HighPurePixelRatio,
    /// One exact color dominates the frame: synthetic background.
    SingleColorDominance,
    /// Texture below the noise floor of a physical photograph.
    LowVariance,
    /// Skin-tone coverage suggests a human subject, not foliage.
    HighSkinRatio,
    /// Not enough green/brown/yellow material to be a plant.
    InsufficientBiologicalContent,
}

/// The gate's verdict on one feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Accept,
    Reject(RejectReason),
}

impl GateDecision {
    pub fn is_accept(&self) -> bool {
        matches!(self, GateDecision::Accept)
    }
}

/// One rejection rule: if `predicate` holds, the image is rejected with
/// `reason`. Rules are evaluated strictly in slice order.
struct RejectionRule {
    reason: RejectReason,
    predicate: fn(&FeatureVector, &ThresholdConfig) -> bool,
}

/// The ordered rule chain. Earlier rules win; order is part of the contract.
const REJECTION_RULES: &[RejectionRule] = &[
    RejectionRule {
        reason: RejectReason::LowColorCardinality,
        predicate: |f, t| {
            f.unique_colors_ratio < t.min_unique_colors_ratio
                || f.quantized_unique_ratio < t.min_quantized_unique_ratio
        },
    },
    RejectionRule {
        reason: RejectReason::HighPurePixelRatio,
        predicate: |f, t| f.pure_pixel_ratio > t.max_pure_pixel_ratio,
    },
    RejectionRule {
        reason: RejectReason::SingleColorDominance,
        predicate: |f, t| f.max_single_color_ratio > t.max_single_color_ratio,
    },
    RejectionRule {
        reason: RejectReason::LowVariance,
        predicate: |f, t| f.variance < t.min_variance,
    },
    RejectionRule {
        reason: RejectReason::HighSkinRatio,
        predicate: |f, t| f.skin_ratio > t.max_skin_ratio,
    },
    RejectionRule {
        reason: RejectReason::InsufficientBiologicalContent,
        predicate: |f, t| f.biological_ratio() < t.min_biological_ratio,
    },
];

/// Runs the ordered rule chain against one feature vector. Any match rejects;
/// no match accepts.
pub fn validate(features: &FeatureVector, thresholds: &ThresholdConfig) -> GateDecision {
    for rule in REJECTION_RULES {
        if (rule.predicate)(features, thresholds) {
            debug!(reason = ?rule.reason, "validation gate rejected buffer");
            return GateDecision::Reject(rule.reason);
        }
    }
    GateDecision::Accept
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A vector that comfortably passes every rule; individual tests then
    /// push one statistic over its threshold.
    fn plausible_leaf_features() -> FeatureVector {
        FeatureVector {
            hue: 120.0,
            saturation: 0.6,
            brightness: 110.0,
            variance: 30.0,
            green_ratio: 0.6,
            brown_ratio: 0.05,
            yellow_ratio: 0.05,
            white_ratio: 0.0,
            skin_ratio: 0.0,
            pure_pixel_ratio: 0.01,
            unique_colors_ratio: 0.4,
            quantized_unique_ratio: 0.01,
            max_single_color_ratio: 0.02,
            plant_pixel_count: 30_000,
            used_plant_mask: true,
        }
    }

    #[test]
    fn plausible_leaf_is_accepted() {
        let t = ThresholdConfig::default();
        assert_eq!(validate(&plausible_leaf_features(), &t), GateDecision::Accept);
    }

    #[test]
    fn each_rule_rejects_with_its_own_reason() {
        let t = ThresholdConfig::default();

        let mut f = plausible_leaf_features();
        f.unique_colors_ratio = 0.01;
        assert_eq!(
            validate(&f, &t),
            GateDecision::Reject(RejectReason::LowColorCardinality)
        );

        let mut f = plausible_leaf_features();
        f.quantized_unique_ratio = 0.0001;
        assert_eq!(
            validate(&f, &t),
            GateDecision::Reject(RejectReason::LowColorCardinality)
        );

        let mut f = plausible_leaf_features();
        f.pure_pixel_ratio = 0.5;
        assert_eq!(
            validate(&f, &t),
            GateDecision::Reject(RejectReason::HighPurePixelRatio)
        );

        let mut f = plausible_leaf_features();
        f.max_single_color_ratio = 0.7;
        assert_eq!(
            validate(&f, &t),
            GateDecision::Reject(RejectReason::SingleColorDominance)
        );

        let mut f = plausible_leaf_features();
        f.variance = 3.0;
        assert_eq!(validate(&f, &t), GateDecision::Reject(RejectReason::LowVariance));

        let mut f = plausible_leaf_features();
        f.skin_ratio = 0.4;
        assert_eq!(validate(&f, &t), GateDecision::Reject(RejectReason::HighSkinRatio));

        let mut f = plausible_leaf_features();
        f.green_ratio = 0.01;
        f.brown_ratio = 0.01;
        f.yellow_ratio = 0.01;
        assert_eq!(
            validate(&f, &t),
            GateDecision::Reject(RejectReason::InsufficientBiologicalContent)
        );
    }

    #[test]
    fn earlier_rules_take_priority_over_later_ones() {
        let t = ThresholdConfig::default();
        // Violates both the cardinality rule (1st) and the variance rule
        // (4th); the reported reason must come from the first.
        let mut f = plausible_leaf_features();
        f.unique_colors_ratio = 0.01;
        f.variance = 1.0;
        assert_eq!(
            validate(&f, &t),
            GateDecision::Reject(RejectReason::LowColorCardinality)
        );
    }
}
