// Cleanup - validation and planning for the bulk-delete command.
//
// The Discord layer fetches the recent history, hands it over as
// `ScannedMessage`s, and executes whatever plan comes back.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

pub const DEFAULT_SCAN_AMOUNT: u32 = 100;
pub const MAX_SCAN_AMOUNT: u32 = 100;

/// Discord refuses to bulk-delete messages older than two weeks.
const BULK_DELETE_MAX_AGE_DAYS: i64 = 14;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CleanupError {
    #[error("You must provide either a user or a user ID.")]
    MissingTarget,

    #[error("`{0}` is not a valid user ID.")]
    InvalidUserId(String),

    #[error("Amount must be between 1 and 100, got {0}.")]
    AmountOutOfRange(u32),
}

/// A validated `/clean` invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupRequest {
    pub target_id: u64,
    pub amount: u32,
}

impl CleanupRequest {
    /// Build a request from raw command arguments.
    ///
    /// A selected user wins over a typed-in ID.
    pub fn parse(
        user: Option<u64>,
        user_id: Option<&str>,
        amount: Option<u32>,
    ) -> Result<Self, CleanupError> {
        let target_id = match (user, user_id.map(str::trim)) {
            (Some(id), _) => id,
            (None, Some(raw)) if !raw.is_empty() => raw
                .parse::<u64>()
                .ok()
                .filter(|id| *id != 0)
                .ok_or_else(|| CleanupError::InvalidUserId(raw.to_string()))?,
            _ => return Err(CleanupError::MissingTarget),
        };

        let amount = amount.unwrap_or(DEFAULT_SCAN_AMOUNT);
        if !(1..=MAX_SCAN_AMOUNT).contains(&amount) {
            return Err(CleanupError::AmountOutOfRange(amount));
        }

        Ok(Self { target_id, amount })
    }

    /// Pick which scanned messages to delete and how.
    ///
    /// `scanned` is newest first, as the history endpoint returns it; only the
    /// first `amount` entries are considered.
    pub fn plan(&self, scanned: &[ScannedMessage], now: DateTime<Utc>) -> CleanupPlan {
        let bulk_cutoff = now - Duration::days(BULK_DELETE_MAX_AGE_DAYS);
        let mut plan = CleanupPlan::default();

        for message in scanned
            .iter()
            .take(self.amount as usize)
            .filter(|m| m.author_id == self.target_id)
        {
            if message.created_at > bulk_cutoff {
                plan.bulk.push(message.id);
            } else {
                plan.single.push(message.id);
            }
        }

        // Bulk delete needs at least two messages
        if plan.bulk.len() == 1 {
            plan.single.append(&mut plan.bulk);
        }

        plan
    }
}

/// A message seen while scanning channel history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedMessage {
    pub id: u64,
    pub author_id: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupPlan {
    /// Recent enough for one bulk request.
    pub bulk: Vec<u64>,
    /// Deleted one request at a time.
    pub single: Vec<u64>,
}

impl CleanupPlan {
    pub fn total(&self) -> usize {
        self.bulk.len() + self.single.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}
