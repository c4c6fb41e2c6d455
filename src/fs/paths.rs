use std::path::{Path, PathBuf};

use super::Fs;

/// Utility fns for making common types of paths.
/// Run directories are always direct children of the output prefix.
impl Fs {
    /// $OUTPUT/{run_name}
    pub fn run_dir<'a>(&self, run_name: &str, buf: &'a mut PathBuf) -> &'a Path {
        self.parts2(&self.output_prefix, run_name, buf)
    }

    /// $OUTPUT/{run_name}/{run_name}.slurm
    pub fn job_script<'a>(
        &self,
        run_dir: &Path,
        run_name: &str,
        buf: &'a mut PathBuf,
    ) -> &'a Path {
        self.run_file(run_dir, run_name, "slurm", buf)
    }

    /// $OUTPUT/{run_name}/{run_name}.log, written by the solver; marks a run as submitted.
    pub fn run_log<'a>(
        &self,
        run_dir: &Path,
        run_name: &str,
        buf: &'a mut PathBuf,
    ) -> &'a Path {
        self.run_file(run_dir, run_name, "log", buf)
    }

    /// $OUTPUT/{run_name}/{run_name}.stdout, written by the scheduler.
    pub fn run_stdout<'a>(
        &self,
        run_dir: &Path,
        run_name: &str,
        buf: &'a mut PathBuf,
    ) -> &'a Path {
        self.run_file(run_dir, run_name, "stdout", buf)
    }

    /// $OUTPUT/{case}.parallel_efficiency.txt
    pub fn report_table<'a>(&self, case: &str, buf: &'a mut PathBuf) -> &'a Path {
        self.parts2(&self.output_prefix, format!("{case}.parallel_efficiency.txt"), buf)
    }

    /// $OUTPUT/{case}.parallel_efficiency.svg
    pub fn report_chart<'a>(&self, case: &str, buf: &'a mut PathBuf) -> &'a Path {
        self.parts2(&self.output_prefix, format!("{case}.parallel_efficiency.svg"), buf)
    }

    fn run_file<'a>(
        &self,
        run_dir: &Path,
        run_name: &str,
        extension: &str,
        buf: &'a mut PathBuf,
    ) -> &'a Path {
        self.parts2(run_dir, format!("{run_name}.{extension}"), buf)
    }

    fn parts2<'a, T, U>(&self, p1: T, p2: U, buf: &'a mut PathBuf) -> &'a Path
    where
        T: AsRef<Path>,
        U: AsRef<Path>,
    {
        buf.clear();
        buf.push(p1);
        buf.push(p2);
        &*buf
    }
}
