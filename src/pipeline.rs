// THEORY:
// The `pipeline` module is the top-level API for the classification engine.
// It wires the core stages into a single call: feature extraction, the
// validation gate, the crop and disease classifiers, and confidence
// normalization, producing one immutable `Diagnosis` per buffer.
//
// Control flow is strictly linear with one short-circuit: a gate rejection
// terminates the pipeline with the not-a-crop diagnosis and an exactly-zero
// confidence. Only accepted buffers ever reach the classifiers.
//
// The pipeline holds no mutable state — its only field is the injected
// threshold configuration — so a single instance can serve any number of
// requests from any number of threads, and identical buffers always produce
// identical diagnoses.

use crate::core_modules::crop_classifier::{CROP_REJECTED, classify_crop};
use crate::core_modules::disease_classifier::{DiseaseId, classify_disease};
use crate::core_modules::feature_extractor::{FeatureVector, extract_features};
use crate::core_modules::pixel_buffer::pixel_buffer::PixelBuffer;
use crate::core_modules::thresholds::ThresholdConfig;
use crate::core_modules::validation_gate::{GateDecision, validate};
use tracing::debug;

// Re-export the decision types callers match on.
pub use crate::core_modules::validation_gate::RejectReason;

/// The final output of one classification: crop label, disease id, bounded
/// confidence, plus the gate decision and feature vector that produced them.
/// Constructed once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnosis {
    /// Human-readable crop label.
    pub crop_label: &'static str,
    /// Stable disease identifier; keys the advisory knowledge base.
    pub disease: DiseaseId,
    /// Final confidence: exactly 0.0 on rejection, within the configured
    /// [floor, ceiling] band on acceptance.
    pub confidence: f64,
    /// The gate's verdict for this buffer.
    pub gate: GateDecision,
    /// The statistics the decision was made from; the report layer derives
    /// its display indices from these.
    pub features: FeatureVector,
}

impl Diagnosis {
    pub fn is_crop(&self) -> bool {
        self.gate.is_accept()
    }
}

/// The stateless orchestrator for the full classification sequence.
pub struct ClassificationPipeline {
    thresholds: ThresholdConfig,
}

impl ClassificationPipeline {
    pub fn new(thresholds: ThresholdConfig) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.thresholds
    }

    /// Runs the full pipeline on one buffer. Deterministic and total: every
    /// well-formed buffer produces a complete `Diagnosis`.
    pub fn classify(&self, buffer: &PixelBuffer) -> Diagnosis {
        let features = extract_features(buffer);
        let gate = validate(&features, &self.thresholds);

        let diagnosis = match gate {
            GateDecision::Reject(_) => Diagnosis {
                crop_label: CROP_REJECTED,
                disease: DiseaseId::NotACrop,
                confidence: 0.0,
                gate,
                features,
            },
            GateDecision::Accept => {
                let crop_label = classify_crop(&features);
                let call = classify_disease(&features, &self.thresholds);
                Diagnosis {
                    crop_label,
                    disease: call.disease,
                    confidence: self.thresholds.clamp_confidence(call.base_confidence),
                    gate,
                    features,
                }
            }
        };

        debug!(
            crop = diagnosis.crop_label,
            disease = %diagnosis.disease,
            confidence = diagnosis.confidence,
            accepted = diagnosis.is_crop(),
            "classification complete"
        );
        diagnosis
    }
}

impl Default for ClassificationPipeline {
    fn default() -> Self {
        Self::new(ThresholdConfig::default())
    }
}
