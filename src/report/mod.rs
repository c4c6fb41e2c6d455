/// Fixed-width text table
mod table;

/// Efficiency vs. core count chart
mod chart;
pub use chart::render_chart;

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to draw chart {0:?}: {1}")]
    Chart(PathBuf, String),
}

/// Metrics collected from one run directory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceRecord {
    pub node_count: u64,
    pub task_count: u64,
    pub core_count: u64,
    /// None if the log was missing or had fewer than two samples
    pub mean_walltime_per_step: Option<f64>,
    /// None if the stdout was missing or never reported the mesh size
    pub mesh_cells: Option<u64>,
}

/// One row of a report: a record plus the values derived from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportRow {
    pub record: PerformanceRecord,
    pub cpu_time_per_step: Option<f64>,
    pub cells_per_core: Option<f64>,
    pub speedup: Option<f64>,
    pub efficiency: Option<f64>,
}

/// Speedup and parallel efficiency of every run of one case.
///
/// Speedup is relative to the run with the fewest cores that is present,
/// which is only a true serial baseline if the sweep includes the single-core run.
/// Missing metrics make the affected cells of a row unavailable; rows are never dropped.
#[derive(Debug)]
pub struct EfficiencyReport {
    case: String,
    cluster: Option<String>,
    /// sorted by increasing core count
    rows: Vec<ReportRow>,
}

impl EfficiencyReport {
    pub fn build(case: &str, mut records: Vec<PerformanceRecord>) -> Self {
        records.sort_by_key(|record| record.core_count);
        let baseline = records
            .first()
            .and_then(|record| record.mean_walltime_per_step)
            .filter(|walltime| *walltime > 0.0);
        if baseline.is_none() {
            log::warn!("case {case}: no walltime for the smallest run; speedup is unavailable");
        }

        let rows = records
            .into_iter()
            .map(|record| {
                let cores = record.core_count as f64;
                let walltime = record.mean_walltime_per_step;
                let speedup = baseline
                    .zip(walltime.filter(|w| *w > 0.0))
                    .map(|(w0, w)| w0 / w);
                ReportRow {
                    record,
                    cpu_time_per_step: walltime.map(|w| w * cores),
                    cells_per_core: record.mesh_cells.map(|cells| cells as f64 / cores),
                    speedup,
                    efficiency: speedup.map(|s| s / cores),
                }
            })
            .collect();

        Self {
            case: case.to_owned(),
            cluster: None,
            rows,
        }
    }

    /// Name the cluster the runs were done on in the report title.
    pub fn on_cluster(mut self, cluster: Option<&str>) -> Self {
        self.cluster = cluster.map(str::to_owned);
        self
    }

    pub fn case(&self) -> &str {
        &self.case
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn title(&self) -> String {
        match &self.cluster {
            Some(cluster) => format!("Case {} (on {})", self.case, cluster),
            None => format!("Case {}", self.case),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(nodes: u64, cores: u64, walltime: Option<f64>) -> PerformanceRecord {
        PerformanceRecord {
            node_count: nodes,
            task_count: cores,
            core_count: cores,
            mean_walltime_per_step: walltime,
            mesh_cells: Some(8000),
        }
    }

    #[test]
    fn test_rows_are_sorted_and_baseline_is_exact() {
        let records = vec![
            record(1, 4, Some(0.3)),
            record(1, 1, Some(1.1)),
            record(1, 2, Some(0.6)),
        ];
        let report = EfficiencyReport::build("cavity", records);
        let cores: Vec<u64> = report.rows().iter().map(|r| r.record.core_count).collect();
        assert_eq!(vec![1, 2, 4], cores);

        let baseline = &report.rows()[0];
        assert_eq!(Some(1.0), baseline.speedup);
        assert_eq!(Some(1.0), baseline.efficiency);
        let cpu_time = report.rows()[1].cpu_time_per_step.unwrap();
        assert!((cpu_time - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_baseline_need_not_be_serial() {
        let records = vec![record(2, 256, Some(0.5)), record(1, 128, Some(1.0))];
        let report = EfficiencyReport::build("cavity", records);
        assert_eq!(Some(1.0), report.rows()[0].speedup);
        assert_eq!(Some(2.0), report.rows()[1].speedup);
        assert_eq!(Some(2.0 / 256.0), report.rows()[1].efficiency);
    }

    #[test]
    fn test_cells_per_core_decreases() {
        let records = (0..6).map(|i| record(1, 1 << i, Some(1.0))).collect();
        let report = EfficiencyReport::build("cavity", records);
        let cells: Vec<f64> = report
            .rows()
            .iter()
            .map(|r| r.cells_per_core.unwrap())
            .collect();
        assert_eq!(8000.0, cells[0]);
        assert!(cells.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn test_missing_walltime_only_affects_its_row() {
        let records = vec![
            record(1, 1, Some(2.0)),
            record(1, 2, None),
            record(1, 4, Some(0.5)),
        ];
        let report = EfficiencyReport::build("cavity", records);
        let rows = report.rows();
        assert_eq!(3, rows.len());
        assert_eq!(None, rows[1].speedup);
        assert_eq!(None, rows[1].efficiency);
        assert_eq!(None, rows[1].cpu_time_per_step);
        assert_eq!(Some(4000.0), rows[1].cells_per_core);
        assert_eq!(Some(4.0), rows[2].speedup);
        assert_eq!(Some(1.0), rows[2].efficiency);
    }

    #[test]
    fn test_missing_baseline_walltime() {
        let records = vec![record(1, 1, None), record(1, 2, Some(1.0))];
        let report = EfficiencyReport::build("cavity", records);
        assert!(report.rows().iter().all(|r| r.speedup.is_none()));
        assert_eq!(Some(2.0), report.rows()[1].cpu_time_per_step);
    }

    #[test]
    fn test_title() {
        let report = EfficiencyReport::build("cavity", Vec::new());
        assert_eq!("Case cavity", report.title());
        assert_eq!("Case cavity (on dodrio)", report.on_cluster(Some("dodrio")).title());
    }
}
