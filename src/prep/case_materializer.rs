use anyhow::{Context, Result};
use colored::Colorize;

use sweep::{ClusterProfile, SweepConfiguration, Walltime};

use crate::exec::Submit;
use crate::fs::Fs;

use super::{Case, Error, RunDirPaths};

/// Settings shared by every run of one sweep.
#[derive(Debug, Clone, Copy)]
pub struct SweepOptions<'a> {
    /// Solver executable, run from the run directory.
    pub solver: &'a str,
    pub walltime: &'a Walltime,
    /// Delete and recreate run directories that already exist.
    pub overwrite: bool,
    /// Submit runs that have no log file yet.
    pub submit: bool,
}

/// What happened to the run directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirOutcome {
    /// Fresh copy of the base case, with a new job script.
    Created,
    /// Already existed and was left untouched.
    SkippedExists,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotSubmittedReason {
    /// The run has a log file, so it already ran (or is running).
    MarkerPresent,
    SubmitDisabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Submitted,
    NotSubmitted(NotSubmittedReason),
}

/// Result of materializing one configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub run_name: String,
    pub dir: DirOutcome,
    pub submission: Submission,
}

/// Turns sweep configurations into run directories, one per configuration,
/// and submits each one at most once.
///
/// A run directory is identified by name alone: if it exists, it is assumed
/// to be complete and is never modified, unless `overwrite` is set, in which case
/// it is deleted and recreated. Submission is skipped for any run that already has
/// a log file, so re-running a whole sweep only submits what hasn't run yet.
pub struct CaseMaterializer<'a> {
    /// for filesystem operations; its prefix is the sweep destination
    fs: &'a Fs,
    /// cluster the job scripts are written for
    profile: &'a ClusterProfile,
    /// hands job scripts to the scheduler
    submitter: &'a dyn Submit,
    /// verbosity count; job scripts are printed from 2 on
    verbose: u8,
}

impl<'a> CaseMaterializer<'a> {
    pub fn new(
        fs: &'a Fs,
        profile: &'a ClusterProfile,
        submitter: &'a dyn Submit,
        verbose: u8,
    ) -> Self {
        Self {
            fs,
            profile,
            submitter,
            verbose,
        }
    }
}

impl CaseMaterializer<'_> {
    /// Check everything that would make every run of the sweep fail,
    /// before anything on disk is touched.
    pub fn check_preconditions(&self, case: &Case) -> Result<(), Error> {
        case.check_ready_for(self.profile)?;
        let destination = self.fs.output_prefix();
        if !destination.is_dir() {
            return Err(Error::MissingDestination(
                destination.to_string_lossy().into_owned(),
            ));
        }
        if destination.starts_with(&case.path) {
            return Err(Error::DestinationInsideCase(
                destination.to_string_lossy().into_owned(),
            ));
        }
        Ok(())
    }

    /// Materialize every configuration, in the order given.
    /// Stops at the first error; outcomes of earlier runs are kept on disk.
    pub fn materialize_all(
        &self,
        case: &Case,
        configs: &[SweepConfiguration],
        opts: &SweepOptions,
    ) -> Result<Vec<Outcome>> {
        self.check_preconditions(case)?;

        let mut paths = RunDirPaths::new();
        let mut outcomes = Vec::with_capacity(configs.len());
        for config in configs {
            let outcome = self
                .materialize_with(case, config, opts, &mut paths)
                .with_context(|| format!("while preparing run {}", config.run_name(&case.name)))?;
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    /// Materialize a single configuration.
    #[cfg(test)]
    pub fn materialize(
        &self,
        case: &Case,
        config: &SweepConfiguration,
        opts: &SweepOptions,
    ) -> Result<Outcome> {
        self.check_preconditions(case)?;
        self.materialize_with(case, config, opts, &mut RunDirPaths::new())
    }

    fn materialize_with(
        &self,
        case: &Case,
        config: &SweepConfiguration,
        opts: &SweepOptions,
        paths: &mut RunDirPaths,
    ) -> Result<Outcome> {
        paths.make_paths(&case.name, config, self.fs);
        let run_dir = paths.run_dir();

        eprintln!(
            "\nPreparing case for {}:\n  {}",
            self.profile.name,
            run_dir.to_string_lossy().green()
        );

        if opts.overwrite && self.fs.delete_dir_if_exists(run_dir)? {
            eprintln!("  {} previous run directory.", "Deleted".red());
        }

        let dir = if !self.fs.exists(run_dir) {
            self.fs
                .copy(&case.path, run_dir)
                .context("copying base case")?;

            let script = sweep::render(
                self.profile,
                config,
                paths.run_name(),
                opts.solver,
                opts.walltime,
            );
            if self.shows_scripts() {
                eprintln!("{}\n{}{}", "<".repeat(80), script, ">".repeat(80));
            }
            self.fs
                .write_file(paths.job_script(), &script)
                .context("writing job script")?;
            if self.verbose > 0 {
                eprintln!("  Jobscript written.");
            }
            DirOutcome::Created
        } else {
            eprintln!(
                "  {}",
                format!(
                    "Folder '{}' already exists. (Specify --overwrite to remove and recreate it)",
                    run_dir.to_string_lossy()
                )
                .blue()
            );
            DirOutcome::SkippedExists
        };

        let submission = self.submit(paths, opts)?;

        Ok(Outcome {
            run_name: paths.run_name().to_owned(),
            dir,
            submission,
        })
    }

    fn shows_scripts(&self) -> bool {
        self.verbose > 1
    }

    fn submit(&self, paths: &RunDirPaths, opts: &SweepOptions) -> Result<Submission> {
        let marker_present = self.fs.exists(paths.log());
        if opts.submit && !marker_present {
            self.submitter
                .submit(paths.job_script_name(), paths.run_dir())?;
            eprintln!("  {}", "Submitted.".green());
            return Ok(Submission::Submitted);
        }

        let reason = if marker_present {
            eprintln!("  {}", "NOT submitted: log-file already exists.".red());
            NotSubmittedReason::MarkerPresent
        } else {
            eprintln!("  {}", "NOT submitted: '--submit' not specified.".red());
            NotSubmittedReason::SubmitDisabled
        };
        Ok(Submission::NotSubmitted(reason))
    }
}
