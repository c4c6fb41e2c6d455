use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;

use util::HashMap;

use crate::fs::Fs;
use crate::report::PerformanceRecord;

/// Per-process subdirectories left behind by domain decomposition.
const PROCESSOR_DIR_PREFIX: &str = "processor";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("No run directories found in {0:?}")]
    NoRuns(PathBuf),
    #[error("No run directories of case '{0}' found in {1:?}")]
    NoRunsForCase(String, PathBuf),
}

/// A run directory found in the results directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDir {
    /// also the stem of the run's log and stdout files
    pub run_name: String,
    pub path: PathBuf,
    pub node_count: u64,
    pub tasks_per_node: u64,
}

/// All run directories of one case, in increasing core order.
#[derive(Debug)]
pub struct CaseRuns {
    pub case: String,
    pub runs: Vec<RunDir>,
}

/// Reads the results of a finished sweep: finds run directories,
/// extracts their metrics and cleans up after them.
pub struct Collector<'a> {
    /// whitelisted for the results directory
    fs: &'a Fs,
    /// reused for every file read
    strbuf: String,
    /// reused for every path built
    pathbuf: PathBuf,
}

impl<'a> Collector<'a> {
    pub fn new(fs: &'a Fs) -> Self {
        Self {
            fs,
            strbuf: String::with_capacity(0), // resized on first read
            pathbuf: PathBuf::with_capacity(256),
        }
    }
}

impl Collector<'_> {
    /// Find all run directories, grouped by case and sorted by case name.
    /// If `case` is given, only that case's runs are returned.
    pub fn discover(&self, case: Option<&str>) -> Result<Vec<CaseRuns>> {
        let results = self.fs.output_prefix();
        let mut by_case: HashMap<String, Vec<RunDir>> = HashMap::default();

        for entry in self
            .fs
            .read_dir(results)
            .with_context(|| format!("while listing results directory {:?}", results))?
        {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let file_name = entry.file_name();
            let Some(dir_name) = file_name.to_str() else {
                log::debug!("skipping non-UTF-8 directory {:?}", entry.path());
                continue;
            };
            let Some(parsed) = syntax::run_dir_name(dir_name) else {
                log::trace!("skipping {dir_name}: not a run directory");
                continue;
            };
            if case.is_some_and(|case| case != parsed.case) {
                continue;
            }
            by_case
                .entry(parsed.case.to_owned())
                .or_default()
                .push(RunDir {
                    run_name: dir_name.to_owned(),
                    path: entry.path(),
                    node_count: parsed.nodes,
                    tasks_per_node: parsed.tasks_per_node,
                });
        }

        if by_case.is_empty() {
            return Err(match case {
                Some(case) => Error::NoRunsForCase(case.to_owned(), results.to_path_buf()),
                None => Error::NoRuns(results.to_path_buf()),
            }
            .into());
        }

        let mut families: Vec<CaseRuns> = by_case
            .into_iter()
            .map(|(case, mut runs)| {
                runs.sort_by_key(|run| (run.node_count * run.tasks_per_node, run.node_count));
                CaseRuns { case, runs }
            })
            .collect();
        families.sort_by(|a, b| a.case.cmp(&b.case));

        for family in &families {
            log::info!("found {} runs of case {}", family.runs.len(), family.case);
        }
        Ok(families)
    }

    /// Extract the metrics of every run. Missing files or values are
    /// reported and leave the corresponding metric unavailable.
    pub fn collect(&mut self, runs: &[RunDir]) -> Result<Vec<PerformanceRecord>> {
        let mut records = Vec::with_capacity(runs.len());
        for run in runs {
            let record = self
                .collect_run(run)
                .with_context(|| format!("while collecting metrics of {}", run.run_name))?;
            records.push(record);
        }
        Ok(records)
    }

    fn collect_run(&mut self, run: &RunDir) -> Result<PerformanceRecord> {
        self.fs.run_log(&run.path, &run.run_name, &mut self.pathbuf);
        let mean_walltime_per_step = if self.read_if_exists("log")? {
            let mean = syntax::mean_walltime_per_step(&self.strbuf);
            if mean.is_none() {
                log::warn!(
                    "{}: fewer than two ExecutionTime samples in log; walltime unavailable",
                    run.run_name
                );
            }
            mean
        } else {
            None
        };

        self.fs
            .run_stdout(&run.path, &run.run_name, &mut self.pathbuf);
        let mesh_cells = if self.read_if_exists("stdout")? {
            let cells = syntax::mesh_cell_count(&self.strbuf);
            if cells.is_none() {
                log::warn!("{}: no mesh size in stdout; cell count unavailable", run.run_name);
            }
            cells
        } else {
            None
        };

        let task_count = run.node_count * run.tasks_per_node;
        let record = PerformanceRecord {
            node_count: run.node_count,
            task_count,
            core_count: task_count,
            mean_walltime_per_step,
            mesh_cells,
        };
        log::debug!(
            "{}: {} tasks, walltime per step {:?}, {:?} cells",
            run.run_name,
            record.task_count,
            record.mean_walltime_per_step,
            record.mesh_cells
        );
        Ok(record)
    }

    /// Read the file at `self.pathbuf` into `self.strbuf`.
    /// Returns false (after warning) if there is no such file.
    fn read_if_exists(&mut self, kind: &str) -> Result<bool> {
        if !self.fs.exists(&self.pathbuf) {
            log::warn!(".{kind} file {:?} not found; ignoring it", self.pathbuf);
            eprintln!(
                "{}",
                format!(".{kind} file {:?} not found. Ignoring it.", self.pathbuf).red()
            );
            return Ok(false);
        }
        self.fs
            .read_to_buf(&self.pathbuf, &mut self.strbuf)
            .with_context(|| format!("while reading {:?}", self.pathbuf))?;
        Ok(true)
    }

    /// Delete the `processor*` directories of every run.
    /// Returns the number of directories deleted.
    pub fn clean(&self, runs: &[RunDir]) -> Result<usize> {
        let mut deleted = 0;
        for run in runs {
            deleted += self.clean_run(&run.path)?;
        }
        Ok(deleted)
    }

    fn clean_run(&self, run_dir: &Path) -> Result<usize> {
        let processor_dirs = self.fs.subdirs_with_prefix(run_dir, PROCESSOR_DIR_PREFIX)?;
        for dir in &processor_dirs {
            log::debug!("deleting {:?}", dir);
            self.fs
                .delete_dir(dir)
                .with_context(|| format!("while cleaning up {:?}", run_dir))?;
        }
        Ok(processor_dirs.len())
    }
}
