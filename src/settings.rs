use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use sweep::{ClusterProfile, ClusterRegistry, Walltime};
use util::PathEncodingError;

use crate::args::{Args, Command, PostArgs, RunArgs};
use crate::prep::{self, Case};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Maximum tasks per node {0} is more than the {2} cores per node of cluster '{1}'")]
    TaskCeilingAboveCores(u32, String, u32),
    #[error("Missing results folder '{0}'")]
    MissingResults(String),
    #[error("Case folder '{0}' has no parent folder to put the sweep in; specify --destination")]
    CaseHasNoParent(String),
}

/// Settings are like Args, except all the logic has
/// been applied so e.g. defaults are added in.
#[derive(Debug)]
pub struct Settings {
    pub verbose: u8,
    pub action: Action,
}

#[derive(Debug)]
pub enum Action {
    Run(RunSettings),
    Post(PostSettings),
}

/// Interpreted `run` args.
#[derive(Debug)]
pub struct RunSettings {
    pub case: Case,
    /// resolved once here, then passed down to everything that needs it
    pub profile: ClusterProfile,
    pub destination: PathBuf,
    pub solver: String,
    pub max_nodes: u32,
    pub max_tasks_per_node: u32,
    pub walltime: Walltime,
    pub overwrite: bool,
    pub submit: bool,
    pub submit_command: String,
    pub yes: bool,
    pub dry_run: bool,
}

/// Interpreted `post` args.
#[derive(Debug)]
pub struct PostSettings {
    /// canonicalized
    pub results: PathBuf,
    /// None means every case found in `results`
    pub case: Option<String>,
    /// only used to label reports
    pub cluster: Option<String>,
    pub clean: bool,
}

impl TryFrom<Args> for Settings {
    type Error = anyhow::Error;
    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let action = match args.command {
            Command::Run(run) => Action::Run(run.try_into()?),
            Command::Post(post) => Action::Post(post.try_into()?),
        };
        Ok(Self {
            verbose: args.verbose,
            action,
        })
    }
}

impl TryFrom<RunArgs> for RunSettings {
    type Error = anyhow::Error;
    fn try_from(args: RunArgs) -> Result<Self, Self::Error> {
        let profile = resolve_cluster(args.cluster.as_deref(), args.cluster_file.as_deref())?;

        let max_tasks_per_node = args.max_tasks_per_node.unwrap_or(profile.cores_per_node);
        if max_tasks_per_node == 0 {
            return Err(sweep::Error::InvalidTaskCeiling.into());
        } else if max_tasks_per_node > profile.cores_per_node {
            return Err(Error::TaskCeilingAboveCores(
                max_tasks_per_node,
                profile.name.clone(),
                profile.cores_per_node,
            )
            .into());
        }
        if args.max_nodes == 0 {
            return Err(sweep::Error::ZeroNodes.into());
        }

        let walltime: Walltime = args.walltime.parse()?;

        let case = Case::open(Path::new(&args.case))?;

        let destination = match args.destination {
            Some(dest) => {
                let dest = PathBuf::from(dest);
                if !dest.is_dir() {
                    let dest = dest.to_str().ok_or(PathEncodingError)?.to_owned();
                    return Err(prep::Error::MissingDestination(dest).into());
                }
                dest.canonicalize()?
            }
            None => default_destination(&case, &profile, max_tasks_per_node)?,
        };
        log::debug!("sweep destination: {:?}", destination);

        Ok(Self {
            case,
            profile,
            destination,
            solver: args.solver,
            max_nodes: args.max_nodes,
            max_tasks_per_node,
            walltime,
            overwrite: args.overwrite,
            submit: args.submit,
            submit_command: args.submit_command,
            yes: args.yes,
            dry_run: args.dry_run,
        })
    }
}

impl TryFrom<PostArgs> for PostSettings {
    type Error = anyhow::Error;
    fn try_from(args: PostArgs) -> Result<Self, Self::Error> {
        let results = PathBuf::from(&args.results)
            .canonicalize()
            .map_err(|_| Error::MissingResults(args.results.clone()))?;
        if !results.is_dir() {
            return Err(Error::MissingResults(args.results).into());
        }

        let case = args.case.or_else(|| {
            let dir_name = results.file_name()?.to_str()?;
            syntax::case_from_results_dir(dir_name).map(str::to_owned)
        });
        match &case {
            Some(case) => log::info!("reporting on case '{case}'"),
            None => log::info!("no case specified; reporting on every case in {:?}", results),
        }

        Ok(Self {
            results,
            case,
            cluster: args.cluster,
            clean: !args.no_clean,
        })
    }
}

/// Look up the cluster profile, from the built-in profiles plus an optional cluster file.
fn resolve_cluster(name: Option<&str>, cluster_file: Option<&str>) -> Result<ClusterProfile> {
    let mut registry = ClusterRegistry::builtin()?;
    if let Some(file) = cluster_file {
        registry.load_file(Path::new(file))?;
    }
    let name = name.ok_or(sweep::Error::NoCluster)?;
    let profile = registry
        .resolve(name)
        .context("while resolving cluster profile")?;
    log::info!(
        "using cluster '{}' with {} cores per node",
        profile.name,
        profile.cores_per_node
    );
    Ok(profile)
}

/// `{case.parent}/{case}-strong-scaling-test-{cores_per_node}.{max_tasks_per_node}`
fn default_destination(
    case: &Case,
    profile: &ClusterProfile,
    max_tasks_per_node: u32,
) -> Result<PathBuf> {
    let parent = case.path.parent().ok_or_else(|| {
        Error::CaseHasNoParent(case.path.to_string_lossy().into_owned())
    })?;
    Ok(parent.join(format!(
        "{}{}-{}.{}",
        case.name,
        syntax::RESULTS_DIR_INFIX,
        profile.cores_per_node,
        max_tasks_per_node
    )))
}
