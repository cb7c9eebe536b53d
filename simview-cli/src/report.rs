//! Console summary of a lap comparison

use simview_telemetry::{ComparisonUrl, LapComparison};
use std::path::Path;

/// Format a signed time difference the way the chart reads it
fn format_delta(delta: f64) -> String {
    if delta > 0.0 {
        format!("+{:.3}s (lap 1 slower)", delta)
    } else if delta < 0.0 {
        format!("{:.3}s (lap 1 faster)", delta)
    } else {
        "0.000s".to_string()
    }
}

/// Build the summary lines printed after a run
pub fn summary_lines(url: &ComparisonUrl, comparison: &LapComparison, chart: &Path) -> Vec<String> {
    let [lap1, lap2] = comparison.summaries();
    let mut lines = vec![
        format!("Site:   {}", url.base_url),
        format!("Lap 1:  #{} {}", url.lap1, lap1),
        format!("Lap 2:  #{} {}", url.lap2, lap2),
        format!("Points: {} common grid points", comparison.common_len()),
    ];

    if let Some(delta) = comparison.time_delta().final_delta() {
        lines.push(format!("Delta:  {}", format_delta(delta)));
    }
    lines.push(format!("Chart:  {}", chart.display()));
    lines
}

/// Print the summary to stdout
pub fn print_summary(url: &ComparisonUrl, comparison: &LapComparison, chart: &Path) {
    println!("═══════════════════════════════════════════════");
    println!("  SimView Lap Comparison");
    println!("═══════════════════════════════════════════════");
    for line in summary_lines(url, comparison, chart) {
        println!("{}", line);
    }
}
