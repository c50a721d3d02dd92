use skillswap_store::StoreError;

/// Errors produced during candidate discovery.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
