use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use skillswap_types::{MatchId, SessionId, TransactionKind, UserId};

/// Outbound notification emitted by the engine after a mutation commits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SwapEvent {
    MatchCreated {
        match_id: MatchId,
        initiated_by: UserId,
        score: u8,
    },
    SessionScheduled {
        session_id: SessionId,
        scheduled_date: DateTime<Utc>,
        credits: u32,
    },
    SessionCompleted {
        session_id: SessionId,
        credits: u32,
    },
    CreditsMoved {
        kind: TransactionKind,
        amount: u32,
        balance: u32,
    },
}

/// Delivery boundary for [`SwapEvent`]s.
///
/// The transport layer owns the connection registry (who is online, on
/// which socket); the engine only hands events to this seam. Delivery is
/// fire-and-forget: a user who is offline simply misses the event, and a
/// failed delivery never fails the mutation that produced it.
pub trait EventSink: Send + Sync {
    fn route(&self, user: UserId, event: SwapEvent);
}

/// Sink that drops every event. Default for embedding and tests that do
/// not care about notifications.
#[derive(Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn route(&self, _user: UserId, _event: SwapEvent) {}
}
