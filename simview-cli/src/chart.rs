//! Time-diff chart rendering
//!
//! Draws both velocity traces against track position on the primary axis and
//! the running time difference on a secondary axis.

use anyhow::Result;
use plotters::prelude::*;
use simview_telemetry::LapComparison;
use std::ops::Range;
use std::path::Path;

const LAP_COLORS: [RGBColor; 2] = [RGBColor(30, 144, 255), RGBColor(200, 0, 100)];
const DELTA_COLOR: RGBColor = RGBColor(34, 139, 34);

/// Min..max of a set of values, widened when empty or flat
fn value_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    if max - min < f64::EPSILON {
        return (min - 1.0)..(max + 1.0);
    }
    min..max
}

/// Render the comparison as an SVG chart at `path`
pub fn render(comparison: &LapComparison, path: &Path) -> Result<()> {
    let traces = comparison.velocity_traces();
    let delta = comparison.time_delta();

    let x_range = value_range(
        traces
            .iter()
            .flat_map(|t| t.positions().iter().copied())
            .chain(delta.positions.iter().copied()),
    );
    let speed_range = value_range(traces.iter().flat_map(|t| t.speeds().iter().copied()));
    let delta_range = value_range(delta.deltas.iter().copied());

    let root = SVGBackend::new(path, (1280, 720)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(25)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Right, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x_range.clone(), speed_range)?
        .set_secondary_coord(x_range, delta_range);

    chart
        .configure_mesh()
        .x_desc("Track Position (m)")
        .y_desc("Velocity (km/h)")
        .x_label_formatter(&|v| format!("{:.0}", v))
        .y_label_formatter(&|v| format!("{:.0}", v))
        .draw()?;

    chart
        .configure_secondary_axes()
        .y_desc("Time Diff (s)")
        .y_label_formatter(&|v| format!("{:.2}", v))
        .draw()?;

    for (index, (trace, color)) in traces.iter().zip(LAP_COLORS).enumerate() {
        chart
            .draw_series(LineSeries::new(trace.points(), color.mix(0.7)))?
            .label(format!("lap-{}", index + 1))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 30, y)], color));
    }

    chart
        .draw_secondary_series(LineSeries::new(delta.points(), DELTA_COLOR.stroke_width(2)))?
        .label("time diff")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 30, y)], DELTA_COLOR));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.7))
        .border_style(BLACK.mix(0.3))
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use simview_telemetry::{compare_laps, AnalysisConfig};

    fn payload(records: &[(f32, f32)]) -> Vec<u8> {
        let mut raw = Vec::new();
        raw.extend_from_slice(&1u32.to_le_bytes());
        raw.extend_from_slice(&1000u32.to_le_bytes());
        for (position, speed) in records {
            raw.extend_from_slice(&position.to_le_bytes());
            raw.push(0);
            raw.extend_from_slice(&speed.to_le_bytes());
            raw.extend_from_slice(&[0u8; 8]);
        }
        raw
    }

    #[test]
    fn test_value_range() {
        assert_eq!(value_range([3.0, -1.0, 2.0].into_iter()), -1.0..3.0);
        assert_eq!(value_range([5.0, 5.0].into_iter()), 4.0..6.0);
        assert_eq!(value_range(std::iter::empty()), 0.0..1.0);
    }

    #[test]
    fn test_render_writes_svg() {
        let lap1 = payload(&[(0.1, 100.0), (0.4, 180.0), (0.9, 120.0)]);
        let lap2 = payload(&[(0.2, 110.0), (0.6, 170.0), (0.95, 130.0)]);
        let comparison = compare_laps([&lap1, &lap2], &AnalysisConfig::new().with_epsilon(1.0)).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("time_diff.svg");
        render(&comparison, &path).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Time Diff (s)"));
        assert!(svg.contains("lap-2"));
    }
}
