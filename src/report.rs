// THEORY:
// The `report` module is the response-assembly collaborator: it joins a
// `Diagnosis` with its advisory record from the knowledge base and derives
// the operator-facing display metrics. It owns presentation concerns only —
// rounding, default strings, index scaling — and makes no decisions; by the
// time a `Diagnosis` reaches this layer, the classification is final.

use crate::knowledge_base::{Recommendations, Severity, lookup};
use crate::pipeline::Diagnosis;
use serde::Serialize;

/// Display metrics derived directly from the biological pixel ratios, each a
/// percentage rounded to one decimal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnalysisIndices {
    /// Healthy-green tissue coverage.
    pub health_index: f64,
    /// Chlorotic (yellowing) tissue coverage.
    pub chlorosis_index: f64,
    /// Necrotic (browning) tissue coverage.
    pub necrosis_index: f64,
}

/// The serializable response record handed to the transport layer.
#[derive(Debug, Clone, Serialize)]
pub struct DetectionReport {
    pub disease: &'static str,
    pub scientific_name: &'static str,
    pub pathogen: &'static str,
    pub crop: &'static str,
    pub severity: Severity,
    /// Final confidence, rounded to four decimals.
    pub confidence: f64,
    pub recommendations: Recommendations,
    pub analysis: AnalysisIndices,
}

/// Builds the response record for one diagnosis. Knowledge-base lookup falls
/// back to the healthy record on an unknown id, so assembly never fails.
pub fn assemble(diagnosis: &Diagnosis) -> DetectionReport {
    let record = lookup(diagnosis.disease);
    let features = &diagnosis.features;

    DetectionReport {
        disease: record.name,
        scientific_name: record.scientific_name.unwrap_or(""),
        pathogen: record.pathogen.unwrap_or("Biological"),
        crop: diagnosis.crop_label,
        severity: record.severity,
        confidence: round_to(diagnosis.confidence, 4),
        recommendations: record.recommendations,
        analysis: AnalysisIndices {
            health_index: round_to(features.green_ratio * 100.0, 1),
            chlorosis_index: round_to(features.yellow_ratio * 100.0, 1),
            necrosis_index: round_to(features.brown_ratio * 100.0, 1),
        },
    }
}

fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}
