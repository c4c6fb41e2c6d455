/// Copies the base case, writes job scripts and submits them.
mod case_materializer;
pub use case_materializer::{
    CaseMaterializer, DirOutcome, NotSubmittedReason, Outcome, Submission, SweepOptions,
};

/// Creates common paths in a run directory.
mod run_dir_paths;
use run_dir_paths::RunDirPaths;

use std::path::{Path, PathBuf};

use sweep::ClusterProfile;
use util::PathEncodingError;

/// Present in a case once its mesh has been generated.
pub const PRECOMPUTED_MESH_ARTIFACT: &str = "constant/polyMesh/points";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Missing case folder '{0}'")]
    MissingCase(String),
    #[error("Missing destination folder '{0}'")]
    MissingDestination(String),
    #[error("Destination '{0}' is inside the case folder it would copy")]
    DestinationInsideCase(String),
    #[error("Cluster '{0}' needs the mesh generated beforehand: run blockMesh in '{1}' (missing {2})")]
    MissingPrecomputedMesh(String, String, String),
    #[error(transparent)]
    PathEncoding(#[from] PathEncodingError),
}

/// The base case that every run of a sweep is copied from.
#[derive(Debug, Clone)]
pub struct Case {
    /// canonicalized path
    pub path: PathBuf,
    /// final component of `path`, used to name run directories
    pub name: String,
}

impl Case {
    /// Open the case at `path`, failing if it doesn't exist.
    pub fn open(path: &Path) -> Result<Self, Error> {
        let path = path
            .canonicalize()
            .map_err(|_| Error::MissingCase(path.to_string_lossy().into_owned()))?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or(PathEncodingError)?
            .to_owned();
        Ok(Self { path, name })
    }

    /// Check that every run of a sweep on `profile` can be copied from this case.
    /// Needs no destination, so it can run before anything is created.
    pub fn check_ready_for(&self, profile: &ClusterProfile) -> Result<(), Error> {
        if !self.path.exists() {
            return Err(Error::MissingCase(self.path.to_string_lossy().into_owned()));
        }
        if profile.mesh_precomputed_required && !self.path.join(PRECOMPUTED_MESH_ARTIFACT).exists()
        {
            return Err(Error::MissingPrecomputedMesh(
                profile.name.clone(),
                self.path.to_string_lossy().into_owned(),
                PRECOMPUTED_MESH_ARTIFACT.to_owned(),
            ));
        }
        Ok(())
    }
}
