/// Line-level parsers for solver output.
mod parse;
pub use parse::{execution_time, mesh_size};

/// Per-run metrics computed from whole log files.
mod metrics;
pub use metrics::{mean_walltime_per_step, mesh_cell_count, TimeSeries};

/// Run directory naming convention.
mod run_dir;
pub use run_dir::{case_from_results_dir, run_dir_name, RunDirName, RESULTS_DIR_INFIX};
