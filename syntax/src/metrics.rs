use crate::parse::{execution_time, mesh_size};

/// Elapsed-time samples from one run's log, in file order.
///
/// The solver reports time elapsed since start-up, so samples are
/// non-decreasing and the cost of one step is the difference between
/// two consecutive samples.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TimeSeries {
    samples: Vec<f64>,
}

impl TimeSeries {
    /// Collect every `ExecutionTime = ...` declaration in `log_text`.
    pub fn from_log(log_text: &str) -> Self {
        let samples: Vec<f64> = log_text.lines().filter_map(execution_time).collect();
        log::trace!("found {} ExecutionTime samples", samples.len());
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Arithmetic mean of consecutive differences,
    /// or `None` if there are fewer than two samples.
    pub fn mean_step(&self) -> Option<f64> {
        if self.samples.len() < 2 {
            return None;
        }
        let steps = self.samples.len() - 1;
        let total: f64 = self.samples.windows(2).map(|w| w[1] - w[0]).sum();
        Some(total / steps as f64)
    }
}

/// Mean wall-clock cost of one timestep, from the text of a solver log.
pub fn mean_walltime_per_step(log_text: &str) -> Option<f64> {
    TimeSeries::from_log(log_text).mean_step()
}

/// Number of mesh cells, taken from the first mesh size declaration in a job's stdout.
pub fn mesh_cell_count(stdout_text: &str) -> Option<u64> {
    stdout_text.lines().find_map(mesh_size)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_no_samples_is_unavailable() {
        assert_eq!(None, mean_walltime_per_step("Time = 1\nCourant Number mean: 0\n"));
        assert_eq!(None, mean_walltime_per_step(""));
    }

    #[test]
    fn test_one_sample_is_unavailable() {
        assert_eq!(None, mean_walltime_per_step("ExecutionTime = 1.0 s\n"));
    }

    #[test]
    fn test_two_samples() {
        let log = "Time = 1\nExecutionTime = 1.0 s  ClockTime = 1 s\n\
                   Time = 2\nExecutionTime = 3.0 s  ClockTime = 3 s\n";
        assert_eq!(Some(2.0), mean_walltime_per_step(log));
    }

    #[test]
    fn test_uneven_steps_are_averaged() {
        let log = "ExecutionTime = 0.5 s\nExecutionTime = 1.5 s\nExecutionTime = 4.5 s\n";
        let series = TimeSeries::from_log(log);
        assert_eq!(3, series.len());
        assert_eq!(Some(2.0), series.mean_step());
    }

    #[test]
    fn test_mesh_cell_count_takes_first_match() {
        let stdout = "Create mesh for time = 0\n\nMesh region0 size: 8000\nMesh size: 4\n";
        assert_eq!(Some(8000), mesh_cell_count(stdout));
        assert_eq!(Some(4), mesh_cell_count("header\nMesh size: 4\n"));
    }

    #[test]
    fn test_mesh_cell_count_no_match() {
        assert_eq!(None, mesh_cell_count("nCells: 8000\n"));
    }
}
