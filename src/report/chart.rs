use std::path::Path;

use plotters::prelude::*;

use super::{EfficiencyReport, Error};

const SIZE: (u32, u32) = (1200, 800);

/// Draw parallel efficiency vs. core count (log scale), with each run
/// annotated by its cells per core, and save it as an SVG image.
pub fn render_chart(report: &EfficiencyReport, out_path: &Path) -> Result<(), Error> {
    log::debug!("drawing chart {:?}", out_path);
    draw(report, out_path).map_err(|e| Error::Chart(out_path.to_path_buf(), e.to_string()))
}

fn draw(report: &EfficiencyReport, out_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let points: Vec<(f64, f64)> = report
        .rows()
        .iter()
        .filter_map(|row| row.efficiency.map(|e| (row.record.core_count as f64, e)))
        .collect();

    let max_cores = report
        .rows()
        .iter()
        .map(|row| row.record.core_count)
        .max()
        .unwrap_or(1)
        .max(1) as f64;
    let y_max = points.iter().map(|p| p.1).fold(1.0f64, f64::max) * 1.1;

    let root = SVGBackend::new(out_path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(report.title(), ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((0.8f64..max_cores * 1.25).log_scale(), 0.0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc("# cores")
        .y_desc("parallel efficiency")
        .draw()?;

    chart.draw_series(LineSeries::new(points.iter().copied(), &BLUE))?;
    chart.draw_series(points.iter().map(|&p| Circle::new(p, 4, BLUE.filled())))?;

    // vertical label at the bottom of each run's core count:
    let label_style = ("sans-serif", 14)
        .into_font()
        .transform(FontTransform::Rotate270)
        .color(&BLACK);
    for row in report.rows() {
        let cores = row.record.core_count as f64;
        let label = match row.cells_per_core {
            Some(cpc) => format!("{cpc:.0} cells/core"),
            None => "n/a cells/core".to_owned(),
        };
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(cores, 0.0), (cores, y_max)],
            BLACK.mix(0.2),
        )))?;
        chart.draw_series(std::iter::once(Text::new(
            label,
            (cores, 0.02 * y_max),
            label_style.clone(),
        )))?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::PerformanceRecord;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_chart_is_written() -> Result<()> {
        let dir = tempdir()?;
        let records = [1, 2, 4]
            .into_iter()
            .map(|cores| PerformanceRecord {
                node_count: 1,
                task_count: cores,
                core_count: cores,
                mean_walltime_per_step: Some(1.0 / cores as f64),
                mesh_cells: Some(400),
            })
            .collect();
        let report = EfficiencyReport::build("cavity", records);
        let path = dir.path().join("cavity.parallel_efficiency.svg");
        render_chart(&report, &path)?;

        let svg = std::fs::read_to_string(&path)?;
        assert!(svg.contains("<svg"));
        assert!(svg.contains("100 cells/core"));
        assert!(svg.contains("Case cavity"));
        Ok(())
    }
}
