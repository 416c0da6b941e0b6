// THEORY:
// The `crop_classifier` maps the mean hue of the sampled plant tissue onto a
// small fixed set of crop labels. It is structurally the simplest decision in
// the engine: the hue bands are disjoint, so evaluation order is irrelevant —
// a deliberate contrast with the disease chain, whose rules overlap and are
// priority-ordered.
//
// The bands are tuned on field imagery: deep blue-green foliage reads as
// cotton, the yellow-green range as tomato/potato canopy, and anything outside
// those bands is reported as a generic detected plant rather than guessed at.

use crate::core_modules::feature_extractor::FeatureVector;

/// Label for the deep-green hue band.
pub const CROP_COTTON: &str = "Cotton";
/// Label for the yellow-green hue band.
pub const CROP_TOMATO_POTATO: &str = "Tomato / Potato";
/// Fallback label when no band matches.
pub const CROP_UNIDENTIFIED: &str = "Detected Plant";
/// Label the pipeline reports for gate-rejected images; never produced by
/// the band lookup itself.
pub const CROP_REJECTED: &str = "Unknown Object";

/// Inclusive-exclusive hue bands, disjoint by construction.
const DEEP_GREEN_BAND: (f64, f64) = (112.0, 170.0);
const YELLOW_GREEN_BAND: (f64, f64) = (60.0, 112.0);

/// Maps mean tissue hue to a crop label. Only meaningful for buffers the
/// validation gate accepted.
pub fn classify_crop(features: &FeatureVector) -> &'static str {
    let hue = features.hue;
    if hue >= DEEP_GREEN_BAND.0 && hue <= DEEP_GREEN_BAND.1 {
        CROP_COTTON
    } else if hue >= YELLOW_GREEN_BAND.0 && hue < YELLOW_GREEN_BAND.1 {
        CROP_TOMATO_POTATO
    } else {
        CROP_UNIDENTIFIED
    }
}
