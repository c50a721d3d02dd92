use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TypeError;
use crate::{SessionId, UserId};

/// Why credits moved. `Earned` and `Spent` come from session settlement
/// and scheduling; `Bonus` covers grants (signup), `Refund` covers
/// dispute resolution by the operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Earned,
    Spent,
    Bonus,
    Refund,
}

impl TransactionKind {
    /// Whether this kind increases the account balance.
    pub fn is_credit(&self) -> bool {
        !matches!(self, Self::Spent)
    }
}

/// One immutable entry in an account's audit trail.
///
/// Records are append-only: created exactly once per successful ledger
/// mutation, never updated or deleted. `balance_after` snapshots the
/// account balance immediately after the mutation, so the history alone
/// explains every balance the account has ever held.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: Uuid,
    pub account: UserId,
    pub kind: TransactionKind,
    /// Always positive; the sign lives in `kind`.
    pub amount: u32,
    pub description: String,
    /// Set when the movement is anchored to a session, for audit
    /// correlation between the learner's debit and the teacher's credit.
    pub session: Option<SessionId>,
    pub balance_after: u32,
    pub created_at: DateTime<Utc>,
}

impl TransactionRecord {
    pub fn new(
        account: UserId,
        kind: TransactionKind,
        amount: u32,
        description: impl Into<String>,
        session: Option<SessionId>,
        balance_after: u32,
    ) -> Result<Self, TypeError> {
        if amount == 0 {
            return Err(TypeError::ZeroAmount);
        }
        Ok(Self {
            id: Uuid::now_v7(),
            account,
            kind,
            amount,
            description: description.into(),
            session,
            balance_after,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_amount_is_rejected() {
        let err = TransactionRecord::new(
            UserId::new(),
            TransactionKind::Earned,
            0,
            "nothing",
            None,
            5,
        )
        .unwrap_err();
        assert_eq!(err, TypeError::ZeroAmount);
    }

    #[test]
    fn only_spent_decreases_the_balance() {
        assert!(TransactionKind::Earned.is_credit());
        assert!(TransactionKind::Bonus.is_credit());
        assert!(TransactionKind::Refund.is_credit());
        assert!(!TransactionKind::Spent.is_credit());
    }

    #[test]
    fn serde_roundtrip() {
        let record = TransactionRecord::new(
            UserId::new(),
            TransactionKind::Spent,
            2,
            "session scheduled",
            Some(SessionId::new()),
            3,
        )
        .unwrap();
        let json = serde_json::to_string(&record).unwrap();
        let parsed: TransactionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, parsed);
    }
}
