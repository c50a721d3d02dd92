use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use skillswap_store::{AccountStore, StoreError, TransactionStore};
use skillswap_types::{SessionId, TransactionKind, TransactionRecord, UserId};
use tracing::debug;

use crate::error::LedgerError;

/// Default number of history entries returned by [`CreditLedger::transactions`].
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// The credit ledger: the only path to an account balance.
///
/// Each mutation runs as a read-modify-write-append sequence under a
/// mutex scoped to the account id, so two concurrent debits against the
/// same low balance cannot both observe the old value and drive it
/// negative. Different accounts do not contend.
pub struct CreditLedger {
    accounts: Arc<dyn AccountStore>,
    transactions: Arc<dyn TransactionStore>,
    account_locks: Mutex<HashMap<UserId, Arc<Mutex<()>>>>,
}

impl CreditLedger {
    pub fn new(accounts: Arc<dyn AccountStore>, transactions: Arc<dyn TransactionStore>) -> Self {
        Self {
            accounts,
            transactions,
            account_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Add credits to an account, recording an `Earned` transaction.
    /// Returns the new balance.
    pub fn credit(
        &self,
        user: UserId,
        amount: u32,
        description: impl Into<String>,
        session: Option<SessionId>,
    ) -> Result<u32, LedgerError> {
        self.apply(user, TransactionKind::Earned, amount, description.into(), session)
    }

    /// Remove credits from an account, recording a `Spent` transaction.
    ///
    /// Fails with [`LedgerError::InsufficientFunds`] if the balance is
    /// lower than `amount`; nothing is written in that case.
    pub fn debit(
        &self,
        user: UserId,
        amount: u32,
        description: impl Into<String>,
        session: Option<SessionId>,
    ) -> Result<u32, LedgerError> {
        self.apply(user, TransactionKind::Spent, amount, description.into(), session)
    }

    /// Grant credits outside the earn/spend cycle (signup grant,
    /// promotions), recording a `Bonus` transaction.
    pub fn grant_bonus(
        &self,
        user: UserId,
        amount: u32,
        description: impl Into<String>,
    ) -> Result<u32, LedgerError> {
        self.apply(user, TransactionKind::Bonus, amount, description.into(), None)
    }

    /// Return previously spent credits to an account (operator dispute
    /// resolution), recording a `Refund` transaction.
    pub fn refund(
        &self,
        user: UserId,
        amount: u32,
        description: impl Into<String>,
        session: Option<SessionId>,
    ) -> Result<u32, LedgerError> {
        self.apply(user, TransactionKind::Refund, amount, description.into(), session)
    }

    /// Current balance, consistent with the latest committed transaction.
    pub fn balance(&self, user: &UserId) -> Result<u32, LedgerError> {
        let profile = self
            .accounts
            .get_user(user)?
            .ok_or(LedgerError::AccountNotFound(*user))?;
        Ok(profile.credits)
    }

    /// Transaction history, newest first, at most `limit` entries.
    pub fn transactions(
        &self,
        user: &UserId,
        limit: usize,
    ) -> Result<Vec<TransactionRecord>, LedgerError> {
        if self.accounts.get_user(user)?.is_none() {
            return Err(LedgerError::AccountNotFound(*user));
        }
        Ok(self.transactions.list_for(user, limit)?)
    }

    /// The single mutation primitive behind all four public operations.
    fn apply(
        &self,
        user: UserId,
        kind: TransactionKind,
        amount: u32,
        description: String,
        session: Option<SessionId>,
    ) -> Result<u32, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }

        let account_lock = self.lock_for(user)?;
        let _guard = account_lock
            .lock()
            .map_err(|_| LedgerError::Store(StoreError::LockPoisoned))?;

        let mut profile = self
            .accounts
            .get_user(&user)?
            .ok_or(LedgerError::AccountNotFound(user))?;
        let previous = profile.credits;

        let new_balance = if kind.is_credit() {
            previous
                .checked_add(amount)
                .ok_or(LedgerError::BalanceOverflow)?
        } else {
            previous
                .checked_sub(amount)
                .ok_or(LedgerError::InsufficientFunds {
                    required: amount,
                    available: previous,
                })?
        };

        profile.credits = new_balance;
        self.accounts.save_user(&profile)?;

        let record = TransactionRecord::new(user, kind, amount, description, session, new_balance)
            .map_err(|_| LedgerError::InvalidAmount)?;
        if let Err(append_err) = self.transactions.append(record) {
            // A balance change without its audit record must not survive.
            // Put the old balance back and report the failure.
            profile.credits = previous;
            self.accounts.save_user(&profile)?;
            return Err(append_err.into());
        }

        debug!(
            account = %user.short_id(),
            ?kind,
            amount,
            balance = new_balance,
            "ledger mutation committed"
        );
        Ok(new_balance)
    }

    /// The mutex serializing mutations for one account, created on first
    /// use. The registry itself is only held long enough to clone the Arc.
    fn lock_for(&self, user: UserId) -> Result<Arc<Mutex<()>>, LedgerError> {
        let mut locks = self
            .account_locks
            .lock()
            .map_err(|_| LedgerError::Store(StoreError::LockPoisoned))?;
        Ok(Arc::clone(locks.entry(user).or_default()))
    }
}
