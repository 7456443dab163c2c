//! Fixed-size ASCII rendering of pipeline charts.

use macro_fcst_core::{Chart, ChartSink, LineStyle};
use std::io::Write;
use tracing::warn;

const WIDTH: usize = 72;
const HEIGHT: usize = 16;

/// Glyphs for solid lines, by line position. Dashed lines use `DASHED`.
const SOLID: [char; 4] = ['*', 'o', '+', 'x'];
const DASHED: char = '.';

/// Chart sink writing plain-text plots to a writer.
pub struct TextChart<W: Write> {
    out: W,
    width: usize,
    height: usize,
}

impl<W: Write> TextChart<W> {
    pub fn new(out: W) -> Self {
        Self::with_size(out, WIDTH, HEIGHT)
    }

    /// Plot area of `width` columns by `height` rows (both at least 2).
    pub fn with_size(out: W, width: usize, height: usize) -> Self {
        Self {
            out,
            width: width.max(2),
            height: height.max(2),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn glyph(position: usize, style: LineStyle) -> char {
    match style {
        LineStyle::Solid => SOLID[position % SOLID.len()],
        LineStyle::Dashed => DASHED,
    }
}

/// Value range over every present point, widened when flat.
fn value_range(chart: &Chart) -> Option<(f64, f64)> {
    let mut points = chart
        .lines
        .iter()
        .flat_map(|line| line.points.iter().flatten().copied())
        .filter(|v| v.is_finite());

    let first = points.next()?;
    let (lo, hi) = points.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if hi - lo <= f64::EPSILON * hi.abs().max(1.0) {
        Some((lo - 1.0, hi + 1.0))
    } else {
        Some((lo, hi))
    }
}

/// Plot grid, row 0 at the top.
pub fn rasterize(chart: &Chart, width: usize, height: usize) -> Vec<Vec<char>> {
    let mut grid = vec![vec![' '; width]; height];
    let Some((lo, hi)) = value_range(chart) else {
        return grid;
    };

    let n = chart.x_labels.len();
    for (position, line) in chart.lines.iter().enumerate() {
        let mark = glyph(position, line.style);
        for (i, value) in line.points.iter().copied().enumerate() {
            let Some(value) = value.filter(|v| v.is_finite()) else {
                continue;
            };
            let col = if n > 1 { i * (width - 1) / (n - 1) } else { 0 };
            let level = ((value - lo) / (hi - lo) * (height - 1) as f64).round() as usize;
            let row = height - 1 - level.min(height - 1);
            grid[row][col.min(width - 1)] = mark;
        }
    }
    grid
}

/// Render `chart` as lines of text.
pub fn render_text(chart: &Chart, width: usize, height: usize) -> Vec<String> {
    let mut lines = vec![chart.title.clone()];

    let Some((lo, hi)) = value_range(chart) else {
        lines.push("  (no data)".to_string());
        return lines;
    };

    let grid = rasterize(chart, width, height);
    for (row, cells) in grid.iter().enumerate() {
        let axis = if row == 0 {
            format!("{:>12.4}", hi)
        } else if row == height - 1 {
            format!("{:>12.4}", lo)
        } else {
            " ".repeat(12)
        };
        let body: String = cells.iter().collect();
        lines.push(format!("{} |{}", axis, body.trim_end()));
    }
    lines.push(format!("{} +{}", " ".repeat(12), "-".repeat(width)));

    if let (Some(first), Some(last)) = (chart.x_labels.first(), chart.x_labels.last()) {
        let left = first.format("%Y-%m").to_string();
        let right = last.format("%Y-%m").to_string();
        let gap = width.saturating_sub(left.len() + right.len());
        lines.push(format!(
            "{}  {}{}{}",
            " ".repeat(12),
            left,
            " ".repeat(gap),
            right
        ));
    }

    let legend: Vec<String> = chart
        .lines
        .iter()
        .enumerate()
        .map(|(position, line)| format!("{} {}", glyph(position, line.style), line.label))
        .collect();
    lines.push(format!("{}  {}", " ".repeat(12), legend.join("   ")));
    lines
}

impl<W: Write> ChartSink for TextChart<W> {
    fn render(&mut self, chart: &Chart) {
        let text = render_text(chart, self.width, self.height);
        let written = text
            .iter()
            .try_for_each(|line| writeln!(self.out, "{}", line))
            .and_then(|_| writeln!(self.out))
            .and_then(|_| self.out.flush());
        if let Err(e) = written {
            warn!(chart = %chart.title, error = %e, "Failed to write chart");
        }
    }
}
