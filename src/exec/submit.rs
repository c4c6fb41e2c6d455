use std::io::{stderr, Write};
use std::path::Path;
use std::process::Command;

use colored::Colorize;

use super::Error;

/// Something that can queue a job script for execution.
pub trait Submit {
    /// Submit `script` (a file name relative to `run_dir`), with `run_dir` as working directory.
    fn submit(&self, script: &str, run_dir: &Path) -> Result<(), Error>;
}

/// Submits jobs by running the scheduler's submit command, e.g. `sbatch job.slurm`.
#[derive(Debug)]
pub struct Scheduler {
    /// The submit command, optionally with leading arguments (`sbatch --parsable`).
    command: Vec<String>,
    verbose: bool,
}

impl Scheduler {
    pub fn new(command: &str, verbose: bool) -> Self {
        Self {
            command: command.split_whitespace().map(str::to_owned).collect(),
            verbose,
        }
    }

    fn program(&self) -> &str {
        self.command.first().map(String::as_str).unwrap_or("sbatch")
    }
}

impl Submit for Scheduler {
    fn submit(&self, script: &str, run_dir: &Path) -> Result<(), Error> {
        let leading_args = self.command.iter().skip(1);
        let mut cmd = Command::new(self.program());
        cmd.args(leading_args).arg(script).current_dir(run_dir);

        let shown = format!("{} {}", self.command.join(" "), script);
        eprintln!("  > {}", shown);
        if self.verbose {
            eprintln!("{} {:?}", "in".magenta(), run_dir);
        }

        let output = cmd
            .output()
            .map_err(|e| Error::SubmitCommandNotRun(self.program().to_owned(), e))?;

        // the scheduler reports the job id on stdout; pass both streams through to the user.
        let mut err = stderr().lock();
        let _ = err.write_all(&output.stdout);
        let _ = err.write_all(&output.stderr);

        log::debug!("submit command exited with {}", output.status);
        if output.status.success() {
            Ok(())
        } else {
            Err(Error::SubmissionFailed(shown, output.status))
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_submit_runs_in_run_dir() -> Result<()> {
        let dir = tempdir()?;
        std::fs::write(dir.path().join("job.slurm"), "#!/bin/bash\ntouch ran\n")?;
        Scheduler::new("bash", false).submit("job.slurm", dir.path())?;
        assert!(dir.path().join("ran").exists());
        Ok(())
    }

    #[test]
    fn test_failed_submission() -> Result<()> {
        let dir = tempdir()?;
        let err = Scheduler::new("false", false)
            .submit("job.slurm", dir.path())
            .unwrap_err();
        assert!(matches!(err, Error::SubmissionFailed(..)));
        Ok(())
    }

    #[test]
    fn test_missing_submit_command() -> Result<()> {
        let dir = tempdir()?;
        let err = Scheduler::new("surely-not-a-real-sbatch", false)
            .submit("job.slurm", dir.path())
            .unwrap_err();
        assert!(matches!(err, Error::SubmitCommandNotRun(..)));
        Ok(())
    }
}
