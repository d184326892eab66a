use thiserror::Error;

#[derive(Debug, Error)]
pub enum KernelError {
    #[error("kernel group size must be at least 1")]
    EmptyGroup,

    #[error("buffer `{buffer}` holds {actual} lanes, launch needs {expected}")]
    BufferLength {
        buffer:   &'static str,
        expected: usize,
        actual:   usize,
    },
}

pub type KernelResult<T> = Result<T, KernelError>;
