use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;

use sweep::SweepConfiguration;

use crate::exec::Scheduler;
use crate::fs::Fs;
use crate::post::Collector;
use crate::prep::{
    CaseMaterializer, DirOutcome, NotSubmittedReason, Outcome, Submission, SweepOptions,
};
use crate::report::{self, EfficiencyReport};
use crate::settings::{Action, PostSettings, RunSettings, Settings};
use crate::ui::Ui;

/// This struct actually runs the command-line app.
pub struct App {
    /// Interpreted command line settings
    settings: Settings,
    /// User interface
    ui: Ui,
}

impl App {
    /// Create a new `App`.
    pub fn new(settings: Settings) -> Self {
        let yes = match &settings.action {
            Action::Run(run) => run.yes,
            Action::Post(_) => true,
        };
        let ui = Ui::new(settings.verbose, yes);
        Self { settings, ui }
    }

    /// Run the app, using settings to determine which command to run.
    pub fn run(self) -> Result<()> {
        match &self.settings.action {
            Action::Run(run) => self.run_sweep(run),
            Action::Post(post) => self.post_process(post),
        }
    }
}

// RUNNING A SWEEP /////////////////
impl App {
    fn run_sweep(&self, run: &RunSettings) -> Result<()> {
        self.ui.verbose_progress("Planning sweep");
        self.ui.start_timer();
        let configs = sweep::plan(run.max_tasks_per_node, run.max_nodes)
            .context("while planning strong-scaling sweep")?;
        self.ui.done();
        self.ui.print_elapsed("Planning sweep");

        self.print_plan(run, &configs);

        if run.dry_run {
            if self.settings.verbose > 1 {
                self.print_scripts(run, &configs);
            }
            return Ok(());
        }

        if run.overwrite
            && !self
                .ui
                .confirm("Existing run directories will be deleted and recreated. Proceed?")?
        {
            return Ok(());
        }

        // fail before the destination is created:
        run.case
            .check_ready_for(&run.profile)
            .context("while checking base case")?;

        let mut fs = Fs::new(&run.destination);
        fs.ensure_output_dir_exists(self.ui.verbose)?;

        let scheduler = Scheduler::new(&run.submit_command, self.ui.verbose);
        let materializer =
            CaseMaterializer::new(&fs, &run.profile, &scheduler, self.settings.verbose);
        let opts = SweepOptions {
            solver: &run.solver,
            walltime: &run.walltime,
            overwrite: run.overwrite,
            submit: run.submit,
        };

        self.ui.start_timer();
        let outcomes = materializer
            .materialize_all(&run.case, &configs, &opts)
            .context("while preparing strong-scaling sweep")?;
        self.ui.print_elapsed("Preparing sweep");

        self.print_summary(&outcomes);
        Ok(())
    }

    fn print_plan(&self, run: &RunSettings, configs: &[SweepConfiguration]) {
        eprintln!(
            "\nStrong-scaling sweep of case {} on {} ({} cores per node, at most {} tasks per node):",
            run.case.name.green(),
            run.profile.name.green(),
            run.profile.cores_per_node,
            run.max_tasks_per_node,
        );
        for config in configs {
            let partial = if config.is_partial_node() {
                " (partial node)"
            } else {
                ""
            };
            eprintln!(
                "{} {}{}",
                "RUN".green(),
                config.run_name(&run.case.name),
                partial.magenta()
            );
        }
        self.ui
            .verbose_msg(&format!("Run directories will be created in {:?}", run.destination));
        eprintln!();
    }

    fn print_scripts(&self, run: &RunSettings, configs: &[SweepConfiguration]) {
        for config in configs {
            let run_name = config.run_name(&run.case.name);
            let script = sweep::render(&run.profile, config, &run_name, &run.solver, &run.walltime);
            eprintln!("{} {}.slurm", "Job script".magenta(), run_name);
            eprintln!("{}\n{}{}", "<".repeat(80), script, ">".repeat(80));
        }
    }

    fn print_summary(&self, outcomes: &[Outcome]) {
        if self.ui.verbose {
            eprintln!();
            for outcome in outcomes {
                eprintln!(
                    "{}: {:?}, {:?}",
                    outcome.run_name, outcome.dir, outcome.submission
                );
            }
        }
        let created = outcomes
            .iter()
            .filter(|o| o.dir == DirOutcome::Created)
            .count();
        let submitted = outcomes
            .iter()
            .filter(|o| o.submission == Submission::Submitted)
            .count();
        let already_ran = outcomes
            .iter()
            .filter(|o| {
                o.submission == Submission::NotSubmitted(NotSubmittedReason::MarkerPresent)
            })
            .count();
        eprintln!(
            "\n{}: {} runs, {} created, {} skipped, {} submitted, {} already submitted before.",
            "Sweep preparation complete".green(),
            outcomes.len(),
            created,
            outcomes.len() - created,
            submitted,
            already_ran,
        );
    }
}

// POST-PROCESSING /////////////////
impl App {
    fn post_process(&self, post: &PostSettings) -> Result<()> {
        // results dir is canonicalized already, and only written to inside:
        let fs = Fs::new(&post.results);
        let mut collector = Collector::new(&fs);

        self.ui
            .verbose_progress_debug("Looking for run directories in", &post.results);
        let families = collector.discover(post.case.as_deref())?;
        self.ui.done();

        let mut table_path = PathBuf::with_capacity(256);
        let mut chart_path = PathBuf::with_capacity(256);

        for family in families {
            self.ui.start_timer();
            let records = collector.collect(&family.runs)?;
            let report = EfficiencyReport::build(&family.case, records)
                .on_cluster(post.cluster.as_deref());

            let table = report.table();
            println!("\n{table}");

            fs.report_table(report.case(), &mut table_path);
            fs.write_file(&table_path, &table)
                .with_context(|| format!("while writing report for case {}", report.case()))?;

            fs.report_chart(report.case(), &mut chart_path);
            fs.check_whitelist(&chart_path)?;
            report::render_chart(&report, &chart_path)?;

            eprintln!(
                "{} {:?} and {:?}",
                "Wrote".green(),
                table_path,
                chart_path
            );

            if post.clean {
                let deleted = collector.clean(&family.runs)?;
                self.ui.verbose_msg(&format!(
                    "Removed {deleted} processor directories of case {}.",
                    report.case()
                ));
            }
            self.ui.print_elapsed(&format!("Post-processing case {}", report.case()));
        }
        Ok(())
    }
}
