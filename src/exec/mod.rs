/// Hand a job script to the batch scheduler
mod submit;
pub use submit::{Scheduler, Submit};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to start submit command '{0}': {1}")]
    SubmitCommandNotRun(String, std::io::Error),
    #[error("Submitting {0} failed with {1}")]
    SubmissionFailed(String, std::process::ExitStatus),
}
