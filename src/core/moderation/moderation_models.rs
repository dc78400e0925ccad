// Moderation domain models - data structures for the mention guard.
//
// These are pure domain types with no Discord dependencies.
// The Discord layer builds them from gateway events and turns the
// resulting verdict back into Discord actions.

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

/// Audit-log reason attached to every timeout the guard applies.
pub const TIMEOUT_AUDIT_REASON: &str = "Mentioned protected user or role";

/// The member who posted a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: u64,
    /// Guild nickname, falling back to global name, then username.
    pub display_name: String,
    pub bot: bool,
    /// Names of every role the author holds in the guild.
    pub role_names: Vec<String>,
}

impl Author {
    /// Exact (case-sensitive) role name check.
    pub fn has_role(&self, role_name: &str) -> bool {
        self.role_names.iter().any(|name| name == role_name)
    }
}

/// A user mentioned directly in a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionedUser {
    #[allow(dead_code)]
    pub id: u64,
    pub name: String,
}

/// A role mentioned directly in a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionedRole {
    #[allow(dead_code)]
    pub id: u64,
    pub name: String,
}

/// A chat message as the moderation core sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: u64,
    pub channel_id: u64,
    /// `None` for direct messages.
    pub guild_id: Option<u64>,
    pub author: Author,
    /// Raw text. Not used by the mention decision.
    #[allow(dead_code)]
    pub content: String,
    pub mentioned_users: Vec<MentionedUser>,
    pub mentioned_roles: Vec<MentionedRole>,
}

/// Process-wide moderation configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct ModerationPolicy {
    blocked_names: HashSet<String>,
    protected_role_name: String,
    timeout: Duration,
}

impl ModerationPolicy {
    /// Blocked names are normalized to lowercase; blank entries are dropped.
    pub fn new<I, S>(blocked_names: I, protected_role_name: impl Into<String>, timeout: Duration) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let blocked_names = blocked_names
            .into_iter()
            .map(|name| name.as_ref().trim().to_lowercase())
            .filter(|name| !name.is_empty())
            .collect();

        Self {
            blocked_names,
            protected_role_name: protected_role_name.into(),
            timeout,
        }
    }

    /// Case-insensitive membership in the blocked set.
    pub fn is_blocked(&self, name: &str) -> bool {
        self.blocked_names.contains(&name.to_lowercase())
    }

    pub fn protected_role_name(&self) -> &str {
        &self.protected_role_name
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Blocked names in a stable order, for startup logging.
    pub fn blocked_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.blocked_names.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ModerationPolicy {
    fn default() -> Self {
        Self::new(
            ["tripex", "ma1eja", "owner"],
            "Members",
            Duration::from_secs(1800), // 30 minutes
        )
    }
}

/// Everything needed to punish one triggering message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enforcement {
    pub message: ChatMessage,
    pub timeout: Duration,
}

impl Enforcement {
    /// Notice posted in the channel once the guard has acted.
    pub fn notice_text(&self) -> String {
        format!(
            "{} has been timed out for {} for mentioning a protected user or role.",
            self.message.author.display_name,
            describe_duration(self.timeout)
        )
    }
}

/// Outcome of evaluating one message against the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Ignore,
    Enforce(Enforcement),
}

/// One remedial step of an enforcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Timeout,
    Delete,
    Notice,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Timeout => write!(f, "timeout"),
            ActionKind::Delete => write!(f, "delete"),
            ActionKind::Notice => write!(f, "notice"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Succeeded,
    Failed { reason: String },
}

impl ActionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionOutcome::Succeeded)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionStep {
    pub kind: ActionKind,
    pub outcome: ActionOutcome,
}

/// Per-step results of acting on a verdict, in the order they ran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionReport {
    pub steps: Vec<ActionStep>,
}

impl ActionReport {
    pub fn record(&mut self, kind: ActionKind, outcome: ActionOutcome) {
        self.steps.push(ActionStep { kind, outcome });
    }

    /// True for the empty report of an ignored message.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn all_succeeded(&self) -> bool {
        self.steps.iter().all(|step| step.outcome.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &ActionStep> {
        self.steps.iter().filter(|step| !step.outcome.is_success())
    }

    #[cfg(test)]
    pub fn outcome_of(&self, kind: ActionKind) -> Option<&ActionOutcome> {
        self.steps
            .iter()
            .find(|step| step.kind == kind)
            .map(|step| &step.outcome)
    }
}

/// Render a duration in its largest whole unit: "30 minutes", "1 hour", "45 seconds".
pub fn describe_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let (value, unit) = if secs >= 3600 && secs % 3600 == 0 {
        (secs / 3600, "hour")
    } else if secs >= 60 && secs % 60 == 0 {
        (secs / 60, "minute")
    } else {
        (secs, "second")
    };

    if value == 1 {
        format!("{} {}", value, unit)
    } else {
        format!("{} {}s", value, unit)
    }
}
