use thiserror::Error;

pub type Result<T> = std::result::Result<T, LeafPageError>;

/// Failures reported by leaf page operations. Every failing operation leaves
/// the page exactly as it was before the call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LeafPageError {
    #[error("index {index} out of range for page of size {size}")]
    OutOfRange { index: usize, size: usize },
    #[error("duplicate key")]
    DuplicateKey,
    #[error("page full ({max_size} entries)")]
    PageFull { max_size: usize },
    #[error("key at index {index} does not sort after its predecessor")]
    OrderingViolation { index: usize },
    #[error("invalid page capacity {requested}, must be within 1..={max}")]
    InvalidCapacity { requested: usize, max: usize },
    #[error("page id {0} is reserved for missing page links")]
    ReservedPageId(usize),
    #[error("invalid recipient page: {0}")]
    InvalidRecipient(&'static str),
    #[error("corruption detected: {0}")]
    Corruption(&'static str),
}
