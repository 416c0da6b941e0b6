// THEORY:
// This file is the main entry point for the `flora_vision` library crate.
// It follows the standard Rust convention of using `lib.rs` to define the
// public API that will be exposed to external consumers (an upload-handling
// service, a CLI, a batch job).
//
// The primary goal is to export the `ClassificationPipeline` and its
// associated data structures (`ThresholdConfig`, `Diagnosis`, the report
// assembler) as the clean, high-level interface for the engine. The internal
// analytical modules (`core_modules`) remain accessible for advanced
// consumers but the expected entry points are re-exported here.

pub mod core_modules;
pub mod knowledge_base;
pub mod overrides;
pub mod parallel_pipeline;
pub mod pipeline;
pub mod report;

pub use core_modules::pixel_buffer::pixel_buffer::PixelBuffer;
pub use core_modules::thresholds::ThresholdConfig;
pub use pipeline::{ClassificationPipeline, Diagnosis};
