// Mention guard service - core business logic for mention moderation.
//
// This service handles:
// - Deciding whether a message mentions a blocked user or role
// - Gating enforcement on the author's protected role
// - Running the timeout -> delete -> notice sequence
//
// NO Discord dependencies here - side effects go through `ModerationActions`.

use super::moderation_models::{
    ActionKind, ActionOutcome, ActionReport, ChatMessage, Enforcement, ModerationPolicy, Verdict,
    TIMEOUT_AUDIT_REASON,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Invalid timeout: {0}")]
    InvalidTimeout(String),

    #[error("Message was not sent in a guild")]
    NotInGuild,
}

// ============================================================================
// SIDE-EFFECT TRAIT (PORT)
// ============================================================================

/// Trait for the chat platform calls the guard needs.
///
/// Following the same pattern as the store traits: the core owns the
/// interface, the Discord layer provides the implementation.
#[async_trait]
pub trait ModerationActions: Send + Sync {
    /// Prevent a member from talking until `until`.
    async fn timeout_member(
        &self,
        guild_id: u64,
        user_id: u64,
        until: DateTime<Utc>,
        reason: &str,
    ) -> Result<(), ActionError>;

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<(), ActionError>;

    async fn send_message(&self, channel_id: u64, content: &str) -> Result<(), ActionError>;
}

// ============================================================================
// EVALUATION
// ============================================================================

/// Decide what to do with a message. Pure: only the message and policy matter.
pub fn evaluate(message: &ChatMessage, policy: &ModerationPolicy) -> Verdict {
    // Never react to automated accounts, including ourselves
    if message.author.bot {
        return Verdict::Ignore;
    }

    // Timeouts only exist inside a guild
    if message.guild_id.is_none() {
        return Verdict::Ignore;
    }

    // Every mention is checked; the verdict is still binary
    let user_hit = message
        .mentioned_users
        .iter()
        .filter(|user| policy.is_blocked(&user.name))
        .count();
    let role_hit = message
        .mentioned_roles
        .iter()
        .filter(|role| policy.is_blocked(&role.name))
        .count();

    if user_hit + role_hit == 0 {
        return Verdict::Ignore;
    }

    // Only holders of the protected role are acted on
    if !message.author.has_role(policy.protected_role_name()) {
        return Verdict::Ignore;
    }

    Verdict::Enforce(Enforcement {
        message: message.clone(),
        timeout: policy.timeout(),
    })
}

// ============================================================================
// CORE SERVICE
// ============================================================================

/// Mention guard: evaluates messages and enforces the policy.
pub struct MentionGuardService<A: ModerationActions> {
    policy: Arc<ModerationPolicy>,
    actions: A,
}

impl<A: ModerationActions> MentionGuardService<A> {
    /// Create a new guard with the given policy and platform actions.
    pub fn new(policy: Arc<ModerationPolicy>, actions: A) -> Self {
        Self { policy, actions }
    }

    pub fn evaluate(&self, message: &ChatMessage) -> Verdict {
        evaluate(message, &self.policy)
    }

    /// Carry out a verdict.
    ///
    /// Each step is attempted even if an earlier one failed, and failures
    /// are returned in the report instead of as an error.
    pub async fn act_on(&self, verdict: &Verdict) -> ActionReport {
        let mut report = ActionReport::default();

        let enforcement = match verdict {
            Verdict::Ignore => return report,
            Verdict::Enforce(enforcement) => enforcement,
        };

        let message = &enforcement.message;
        // evaluate() never enforces outside a guild, but a hand-built verdict could
        let timeout_result = match message.guild_id {
            Some(guild_id) => match timeout_deadline(Utc::now(), enforcement.timeout) {
                Ok(until) => {
                    self.actions
                        .timeout_member(guild_id, message.author.id, until, TIMEOUT_AUDIT_REASON)
                        .await
                }
                Err(e) => Err(e),
            },
            None => Err(ActionError::NotInGuild),
        };
        report.record(ActionKind::Timeout, timeout_result.into());

        let outcome = self
            .actions
            .delete_message(message.channel_id, message.id)
            .await
            .into();
        report.record(ActionKind::Delete, outcome);

        let outcome = self
            .actions
            .send_message(message.channel_id, &enforcement.notice_text())
            .await
            .into();
        report.record(ActionKind::Notice, outcome);

        for step in report.failures() {
            if let ActionOutcome::Failed { reason } = &step.outcome {
                tracing::warn!(
                    user_id = message.author.id,
                    channel_id = message.channel_id,
                    message_id = message.id,
                    action = %step.kind,
                    "Moderation step failed: {}",
                    reason
                );
            }
        }

        if report.all_succeeded() {
            tracing::info!(
                user_id = message.author.id,
                timeout_secs = enforcement.timeout.as_secs(),
                "Timed out {}",
                message.author.display_name
            );
        }

        report
    }

    /// Evaluate a message and act on the result.
    pub async fn handle(&self, message: &ChatMessage) -> ActionReport {
        let verdict = self.evaluate(message);
        self.act_on(&verdict).await
    }
}

fn timeout_deadline(
    now: DateTime<Utc>,
    timeout: std::time::Duration,
) -> Result<DateTime<Utc>, ActionError> {
    chrono::Duration::from_std(timeout)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta))
        .ok_or_else(|| ActionError::InvalidTimeout(format!("{:?} is out of range", timeout)))
}

impl From<Result<(), ActionError>> for ActionOutcome {
    fn from(result: Result<(), ActionError>) -> Self {
        match result {
            Ok(()) => ActionOutcome::Succeeded,
            Err(e) => ActionOutcome::Failed {
                reason: e.to_string(),
            },
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
