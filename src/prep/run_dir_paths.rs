use std::path::{Path, PathBuf};

use sweep::SweepConfiguration;

use crate::fs::Fs;

/// Reusable container for the paths of one run directory.
pub struct RunDirPaths {
    /// `{case}-{nodes}x{tasks_per_node}cores`
    run_name: String,
    /// absolute path to the run dir
    run_dir: PathBuf,
    /// job script inside the run dir
    job_script: PathBuf,
    /// solver log; its existence means the run was already submitted
    log: PathBuf,
}

impl RunDirPaths {
    pub fn new() -> Self {
        Self {
            run_name: String::with_capacity(64),
            run_dir: PathBuf::with_capacity(256),
            job_script: PathBuf::with_capacity(256),
            log: PathBuf::with_capacity(256),
        }
    }

    pub fn make_paths(&mut self, case_name: &str, config: &SweepConfiguration, fs: &Fs) {
        self.run_name = config.run_name(case_name);
        fs.run_dir(&self.run_name, &mut self.run_dir);
        fs.job_script(&self.run_dir, &self.run_name, &mut self.job_script);
        fs.run_log(&self.run_dir, &self.run_name, &mut self.log);
    }

    pub fn run_name(&self) -> &str {
        &self.run_name
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    pub fn job_script(&self) -> &Path {
        &self.job_script
    }

    /// file name of the job script, as passed to the scheduler from inside the run dir.
    pub fn job_script_name(&self) -> &str {
        // built from `run_name`, so always valid UTF-8:
        self.job_script
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
    }

    pub fn log(&self) -> &Path {
        &self.log
    }
}
