//! Boundary layer for macro-fcst.
//!
//! Concrete HTTP sources, the ASCII chart sink, console reporting and
//! logging setup around the pipeline in `macro-fcst-core`.

pub mod chart;
pub mod logging;
pub mod report;
pub mod sources;

pub use chart::TextChart;
pub use report::{forecast_table, summary_line, write_report};
pub use sources::HttpSource;

use macro_fcst_core::{run, ChartSink, PipelineConfig, Result, RunReport, SeriesSource};
use std::io::Write;
use tracing::error;

/// Run the pipeline and write the summary to `out`.
///
/// Returns the process exit code: the error code for a fatal failure,
/// otherwise the report's code (non-zero when any indicator failed).
pub fn execute<S, C, W>(source: &S, sink: &mut C, out: &mut W, config: &PipelineConfig) -> i32
where
    S: SeriesSource + ?Sized,
    C: ChartSink + ?Sized,
    W: Write,
{
    match run_and_report(source, sink, out, config) {
        Ok(report) => report.exit_code(),
        Err(e) => {
            error!(error = %e, "Run failed");
            e.to_code()
        }
    }
}

fn run_and_report<S, C, W>(
    source: &S,
    sink: &mut C,
    out: &mut W,
    config: &PipelineConfig,
) -> Result<RunReport>
where
    S: SeriesSource + ?Sized,
    C: ChartSink + ?Sized,
    W: Write,
{
    let report = run(source, sink, config)?;
    if let Err(e) = write_report(out, &report) {
        error!(error = %e, "Failed to write summary");
    }
    Ok(report)
}
