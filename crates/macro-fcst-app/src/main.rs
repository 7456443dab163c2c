use macro_fcst_app::{execute, logging, HttpSource, TextChart};
use macro_fcst_core::PipelineConfig;
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    logging::init();

    let config = PipelineConfig::default();
    let source = HttpSource::new();
    let mut charts = TextChart::new(io::stdout());
    let mut out = io::stdout();

    let code = execute(&source, &mut charts, &mut out, &config);
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
