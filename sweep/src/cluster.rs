use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::{Error, SweepConfiguration};

const BUILTIN_CLUSTERS: &str = include_str!("clusters.toml");

/// How MPI processes are launched for a multi-task run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LaunchPolicy {
    /// `srun -np N`
    Srun,
    /// `mympirun --hybrid N`, spread pinning within each node.
    Hybrid,
    /// `mympirun --universe N`, compact pinning.
    Universe,
    /// `mpirun -np N`, for machines without a node concept.
    Mpirun,
}

impl LaunchPolicy {
    /// The command prefix that launches the parallel processes of `config`.
    pub fn prefix(&self, config: &SweepConfiguration) -> String {
        match self {
            Self::Srun => format!("srun -np {}", config.task_count),
            Self::Hybrid => format!(
                "mympirun --hybrid {}",
                config.max_tasks_per_node.min(config.task_count)
            ),
            Self::Universe => format!("mympirun --universe {}", config.task_count),
            Self::Mpirun => format!("mpirun -np {}", config.task_count),
        }
    }
}

/// Launch policies of a cluster. Clusters with a node concept declare
/// `partial_node` and `full_node`; everything else falls back to `default`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LaunchPolicies {
    #[serde(default)]
    pub partial_node: Option<LaunchPolicy>,
    #[serde(default)]
    pub full_node: Option<LaunchPolicy>,
    #[serde(default = "default_launch_policy")]
    pub default: LaunchPolicy,
}

fn default_launch_policy() -> LaunchPolicy {
    LaunchPolicy::Srun
}

impl Default for LaunchPolicies {
    fn default() -> Self {
        Self {
            partial_node: None,
            full_node: None,
            default: default_launch_policy(),
        }
    }
}

impl LaunchPolicies {
    /// Pick the policy for a run that does (`partial`) or doesn't fill its nodes.
    /// Always returns a policy, whichever combination is declared.
    pub fn select(&self, partial: bool) -> LaunchPolicy {
        match (partial, self.partial_node, self.full_node) {
            (true, Some(policy), _) => policy,
            (false, _, Some(policy)) => policy,
            _ => self.default,
        }
    }

    /// True if the cluster launches differently on partially and fully occupied nodes.
    pub fn has_node_policies(&self) -> bool {
        self.partial_node.is_some() || self.full_node.is_some()
    }
}

/// Everything about a cluster that a job script depends on.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusterProfile {
    /// Filled in from the registry key.
    #[serde(skip)]
    pub name: String,
    pub cores_per_node: u32,
    /// Modules loaded, in order, after purging the environment.
    #[serde(default)]
    pub bootstrap_modules: Vec<String>,
    /// Charge code passed as `--account`.
    #[serde(default)]
    pub scheduler_account: Option<String>,
    /// Unset `SLURM_EXPORT_ENV` at the start of the job and echo the job id.
    #[serde(default)]
    pub needs_env_unset: bool,
    /// The mesh must be generated before the sweep; the job script skips it.
    #[serde(default)]
    pub mesh_precomputed_required: bool,
    /// Script sourced to set up the solver's environment.
    #[serde(default = "default_solver_bootstrap")]
    pub solver_bootstrap: String,
    #[serde(default)]
    pub launch: LaunchPolicies,
}

fn default_solver_bootstrap() -> String {
    "$FOAM_BASH".to_owned()
}

/// All known cluster profiles, keyed by cluster identity.
#[derive(Debug, Default)]
pub struct ClusterRegistry {
    profiles: BTreeMap<String, ClusterProfile>,
}

impl ClusterRegistry {
    /// Registry containing the profiles that ship with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_toml(BUILTIN_CLUSTERS).context("while reading built-in cluster profiles")
    }

    /// Parse a table of `[cluster_name]` sections.
    pub fn from_toml(text: &str) -> Result<Self> {
        let mut profiles: BTreeMap<String, ClusterProfile> =
            toml::from_str(text).context("parsing cluster profiles")?;
        for (name, profile) in profiles.iter_mut() {
            if profile.cores_per_node == 0 {
                return Err(Error::ZeroCores(name.clone()).into());
            }
            profile.name.clone_from(name);
        }
        Ok(Self { profiles })
    }

    /// Read a cluster file and merge it over the profiles already in the registry.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("while reading cluster file {:?}", path))?;
        let other =
            Self::from_toml(&text).with_context(|| format!("in cluster file {:?}", path))?;
        log::debug!(
            "loaded {} cluster profiles from {:?}",
            other.profiles.len(),
            path
        );
        self.merge(other);
        Ok(())
    }

    /// Add all of `other`'s profiles, replacing any with the same name.
    pub fn merge(&mut self, other: ClusterRegistry) {
        self.profiles.extend(other.profiles);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    /// Look up the profile for cluster `name`.
    pub fn resolve(&self, name: &str) -> Result<ClusterProfile, Error> {
        self.profiles.get(name).cloned().ok_or_else(|| {
            Error::UnknownCluster(name.to_owned(), self.names().collect::<Vec<_>>().join(", "))
        })
    }
}
