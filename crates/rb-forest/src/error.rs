use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ForestError {
    #[error("allocation of red-black node failed")]
    OutOfMemory,
}
