use thiserror::Error;
use uuid::Uuid;

/// Failures reported by a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    /// A stored row could not be mapped back into a domain value.
    #[error("corrupt stored row: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend(Box::new(err))
    }
}

#[derive(Debug, Error)]
pub enum InsightError {
    /// The insight does not exist or belongs to another user.
    #[error("insight not found: {0}")]
    NotFound(Uuid),

    /// None of the requested insights belong to the caller.
    #[error("no matching insights found")]
    NoneOwned,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to parse feed: {0}")]
    Parse(#[from] feed_rs::parser::ParseFeedError),
}
