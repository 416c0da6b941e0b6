// This file is an example of how to use the `flora_vision` library: a small
// command-line runner that classifies one image file and prints the advisory
// report as JSON. The library entry point is `src/lib.rs`.

use flora_vision::core_modules::utils::image_loader;
use flora_vision::overrides::apply_filename_override;
use flora_vision::pipeline::ClassificationPipeline;
use flora_vision::report;
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let Some(path_arg) = std::env::args().nth(1) else {
        eprintln!("usage: flora_vision <image-path>");
        return ExitCode::FAILURE;
    };
    let path = Path::new(&path_arg);

    let buffer = match image_loader::load_from_path(path) {
        Ok(buffer) => buffer,
        Err(err) => {
            eprintln!("could not load {}: {err}", path.display());
            return ExitCode::FAILURE;
        }
    };

    let pipeline = ClassificationPipeline::default();
    let diagnosis = pipeline.classify(&buffer);

    // Demo affordance only: filenames like "tomato_blight.jpg" steer the
    // label. The core pipeline never sees the filename.
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let diagnosis = apply_filename_override(diagnosis, &filename);

    let detection_report = report::assemble(&diagnosis);
    match serde_json::to_string_pretty(&detection_report) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("failed to serialize report: {err}");
            ExitCode::FAILURE
        }
    }
}
