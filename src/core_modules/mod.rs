pub mod crop_classifier;
pub mod disease_classifier;
pub mod feature_extractor;
pub mod pixel;
pub mod pixel_buffer;
pub mod thresholds;
pub mod utils;
pub mod validation_gate;
