use clap::{ArgAction, Parser, Subcommand};

const CMD_NAME: &str = "sst";
const DEFAULT_SOLVER: &str = "icoFoam";
const DEFAULT_WALLTIME: &str = "1";
const DEFAULT_SUBMIT_COMMAND: &str = "sbatch";

/// Stores our command-line args format.
#[derive(Parser)]
#[command(name = CMD_NAME, version, about = None, long_about = None)]
pub struct Args {
    /// Print additional info (-vv for debugging info and job scripts)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Prepare a strong-scaling sweep of a case, and optionally submit it
    Run(RunArgs),
    /// Collect the results of a sweep and report its parallel efficiency
    Post(PostArgs),
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Base case directory
    #[arg(value_name = "CASE", default_value = ".")]
    pub case: String,

    /// Cluster to prepare the sweep for
    #[arg(short = 'C', long, value_name = "NAME", env = "VSC_INSTITUTE_CLUSTER")]
    pub cluster: Option<String>,

    /// Additional cluster profiles (TOML), replacing built-in ones of the same name
    #[arg(long, value_name = "FILE", env = "SST_CLUSTER_FILE")]
    pub cluster_file: Option<String>,

    /// Directory to create run directories in
    /// [default: {CASE}-strong-scaling-test-{CORES}.{MAX_TASKS} next to the case]
    #[arg(short, long, value_name = "DIR")]
    pub destination: Option<String>,

    /// Solver to run
    #[arg(short, long, value_name = "SOLVER", default_value = DEFAULT_SOLVER)]
    pub solver: String,

    /// Maximum number of nodes
    #[arg(short = 'N', long, value_name = "N", default_value_t = 1)]
    pub max_nodes: u32,

    /// Maximum number of tasks per node [default: cores per node of the cluster]
    #[arg(short = 't', long, value_name = "N")]
    pub max_tasks_per_node: Option<u32>,

    /// Walltime limit of each job, in hours or as HH:MM:SS
    #[arg(short, long, value_name = "TIME", default_value = DEFAULT_WALLTIME)]
    pub walltime: String,

    /// Delete and recreate run directories that already exist
    #[arg(short, long)]
    pub overwrite: bool,

    /// Submit runs that haven't run yet
    #[arg(long)]
    pub submit: bool,

    /// Command used to submit job scripts
    #[arg(long, value_name = "CMD", default_value = DEFAULT_SUBMIT_COMMAND)]
    #[arg(env = "SST_SUBMIT_COMMAND")]
    pub submit_command: String,

    /// Bypass user confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Dry run; print the sweep but don't modify anything.
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

#[derive(clap::Args)]
pub struct PostArgs {
    /// Directory containing the run directories of a sweep
    #[arg(value_name = "DIR", default_value = ".")]
    pub results: String,

    /// Only report on this case [default: taken from the results directory name]
    #[arg(short, long, value_name = "CASE")]
    pub case: Option<String>,

    /// Cluster the sweep ran on, shown in report titles
    #[arg(long, value_name = "NAME", env = "VSC_INSTITUTE_CLUSTER")]
    pub cluster: Option<String>,

    /// Remove processor* directories of collected runs (the default)
    #[arg(long, overrides_with = "no_clean")]
    pub clean: bool,

    /// Keep processor* directories
    #[arg(long, overrides_with = "clean")]
    pub no_clean: bool,
}
