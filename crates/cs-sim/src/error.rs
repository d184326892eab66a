use cs_agent::AgentError;
use cs_batch::KernelError;
use cs_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("invalid agent set: {0}")]
    Agent(#[from] AgentError),

    #[error("could not build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("batch kernel failed: {0}")]
    Kernel(#[from] KernelError),
}

pub type SimResult<T> = Result<T, SimError>;
