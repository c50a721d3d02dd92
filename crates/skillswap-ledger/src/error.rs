use skillswap_store::StoreError;
use skillswap_types::UserId;

/// Errors produced by ledger operations.
///
/// Every failure leaves the account balance and the transaction log in
/// their pre-call state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("account not found: {0}")]
    AccountNotFound(UserId),

    #[error("insufficient credits: need {required}, have {available}")]
    InsufficientFunds { required: u32, available: u32 },

    #[error("amount must be greater than zero")]
    InvalidAmount,

    #[error("credit would overflow the account balance")]
    BalanceOverflow,

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
