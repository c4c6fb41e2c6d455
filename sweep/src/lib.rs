/// Per-cluster capacity, environment and launch policy.
mod cluster;
pub use cluster::{ClusterProfile, ClusterRegistry, LaunchPolicies, LaunchPolicy};

/// One (node count, task count) pair of a sweep.
mod config;
pub use config::SweepConfiguration;

/// Geometric sweep over task and node counts.
mod planner;
pub use planner::plan;

/// Scheduler walltime limits.
mod walltime;
pub use walltime::Walltime;

/// Job script synthesis.
mod script;
pub use script::{render, JobScriptBuilder};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Unknown cluster: '{0}' (known clusters: {1})")]
    UnknownCluster(String, String),
    #[error("No cluster specified; set $VSC_INSTITUTE_CLUSTER or pass --cluster")]
    NoCluster,
    #[error("Maximum tasks per node must be at least 1")]
    InvalidTaskCeiling,
    #[error("Maximum node count must be at least 1")]
    ZeroNodes,
    #[error("A sweep up to {0} nodes of {1} tasks has too many tasks to count")]
    TooManyNodes(u32, u32),
    #[error("Cluster '{0}' must have at least one core per node")]
    ZeroCores(String),
    #[error("Invalid walltime '{0}' (should be a positive number of hours or 'HH:MM:SS')")]
    InvalidWalltime(String),
}
