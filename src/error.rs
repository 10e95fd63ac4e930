use thiserror::Error;

/// The global allocator could not provide memory for a new tree node.
/// The tree that was being modified is left in a valid state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unable to allocate a tree node")]
pub struct AllocError;

pub type Result<T> = std::result::Result<T, AllocError>;
