use std::fmt::Write;

use super::{EfficiencyReport, ReportRow};

const WIDTH: usize = 69;
const UNAVAILABLE: &str = "n/a";

impl EfficiencyReport {
    /// Render the report as a fixed-width text table.
    pub fn table(&self) -> String {
        let mut out = String::with_capacity(WIDTH * (self.rows.len() + 10));
        let line = "-".repeat(WIDTH);

        // writing to a String can't fail:
        let _ = writeln!(out, "{line}");
        let _ = writeln!(out, "{:^WIDTH$}", self.title());
        let _ = writeln!(out, "{line}");
        let _ = writeln!(
            out,
            "{:>10}{:>10}{:>10}{:>10}{:>10}{:>8}{:>11}",
            "", "", "walltime", "cpu_time", "#cells", "", ""
        );
        let _ = writeln!(
            out,
            "{:>10}{:>10}{:>10}{:>10}{:>10}{:>8}{:>11}",
            "", "", "per", "per", "per", "", "parallel"
        );
        let _ = writeln!(
            out,
            "{:>10}{:>10}{:>10}{:>10}{:>10}{:>8}{:>11}\n",
            "#nodes", "#cores", "timestep", "timestep", "core", "speedup", "efficiency"
        );
        for row in &self.rows {
            write_row(&mut out, row);
        }
        let _ = writeln!(out, "{line}");
        out
    }
}

fn write_row(out: &mut String, row: &ReportRow) {
    let _ = writeln!(
        out,
        "{:>10}{:>10}{:>10}{:>10}{:>10}{:>8}{:>11}",
        row.record.node_count,
        row.record.core_count,
        cell(row.record.mean_walltime_per_step, 3),
        cell(row.cpu_time_per_step, 3),
        cell(row.cells_per_core, 0),
        cell(row.speedup, 1),
        cell(row.efficiency, 3),
    );
}

fn cell(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(value) => format!("{value:.precision$}"),
        None => UNAVAILABLE.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use crate::report::{EfficiencyReport, PerformanceRecord};

    #[test]
    fn test_table_layout() {
        let records = vec![
            PerformanceRecord {
                node_count: 1,
                task_count: 1,
                core_count: 1,
                mean_walltime_per_step: Some(2.0),
                mesh_cells: Some(8000),
            },
            PerformanceRecord {
                node_count: 1,
                task_count: 2,
                core_count: 2,
                mean_walltime_per_step: None,
                mesh_cells: None,
            },
        ];
        let table = EfficiencyReport::build("cavity", records)
            .on_cluster(Some("vaughan"))
            .table();
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!("-".repeat(69), lines[0]);
        assert_eq!("Case cavity (on vaughan)", lines[1].trim());
        assert_eq!(69, lines[1].len());
        assert_eq!(
            "    #nodes    #cores  timestep  timestep      core speedup efficiency",
            lines[5]
        );
        assert_eq!("", lines[6]);
        assert_eq!(
            "         1         1     2.000     2.000      8000     1.0      1.000",
            lines[7]
        );
        assert_eq!(
            "         1         2       n/a       n/a       n/a     n/a        n/a",
            lines[8]
        );
        assert_eq!(Some(&"-".repeat(69).as_str()), lines.last());
        assert!(lines.iter().all(|l| l.len() <= 69));
    }
}
