use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Canonical store-resident form of a remote message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRecord {
    pub message_id: String,
    pub thread_id: Option<String>,
    pub subject: Option<String>,
    pub from_address: String,
    pub to_address: String,
    pub received_at: DateTime<Utc>,
    pub labels: Vec<String>,
    pub attachments_size: i64,
    pub category: Option<String>,
    pub importance: i64,
    pub is_archived: bool,
    pub is_deleted: bool,
    pub ai_analysis: Option<EmailAnalysis>,
}

/// Analysis payload persisted alongside a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAnalysis {
    #[serde(rename = "type")]
    pub kind: String,
    pub sentiment: String,
    pub summary: String,
    #[serde(rename = "actionRequired")]
    pub action_required: bool,
}

/// Partial write against the email table, keyed by `message_id`.
/// Absent fields are left untouched on update; a create additionally
/// requires `from_address`, `to_address` and `received_at`.
#[derive(Debug, Clone, Default)]
pub struct EmailPatch {
    pub message_id: String,
    pub thread_id: Option<String>,
    pub subject: Option<String>,
    pub from_address: Option<String>,
    pub to_address: Option<String>,
    pub received_at: Option<DateTime<Utc>>,
    pub labels: Option<LabelsPatch>,
    pub attachments_size: Option<i64>,
    pub category: Option<String>,
    pub importance: Option<i64>,
    pub is_archived: Option<bool>,
    pub is_deleted: Option<bool>,
    pub ai_analysis: Option<EmailAnalysis>,
}

impl EmailPatch {
    pub fn new(message_id: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            ..Self::default()
        }
    }

    /// True when the patch can create a row on its own.
    pub fn has_required_fields(&self) -> bool {
        self.from_address.is_some() && self.to_address.is_some() && self.received_at.is_some()
    }
}

/// How a patch touches the label set: re-ingestion replaces the whole
/// set, mutations merge individual entries into it.
#[derive(Debug, Clone)]
pub enum LabelsPatch {
    Replace(Vec<String>),
    Merge(Vec<String>),
}

/// Running per-sender statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SenderStats {
    pub sender: String,
    pub email_count: i64,
    pub last_email_date: Option<DateTime<Utc>>,
    pub average_response_time: Option<i64>,
    pub total_attachments_size: i64,
    pub categories: BTreeMap<String, i64>,
}

/// One message's contribution to its sender's statistics.
#[derive(Debug, Clone)]
pub struct StatsDelta {
    pub received_at: DateTime<Utc>,
    pub attachments_size: i64,
    pub category: Option<String>,
}

impl StatsDelta {
    pub fn from_record(record: &EmailRecord) -> Self {
        Self {
            received_at: record.received_at,
            attachments_size: record.attachments_size,
            category: record.category.clone(),
        }
    }
}

/// Conjunction of predicates over the email table; absent fields are
/// unconstrained.
#[derive(Debug, Clone, Default)]
pub struct EmailFilter {
    pub sender: Option<String>,
    pub category: Option<String>,
    pub is_archived: Option<bool>,
    pub is_deleted: Option<bool>,
}

/// Aggregate view computed directly from the email table, used when no
/// stats row exists for a sender.
#[derive(Debug, Clone, Serialize)]
pub struct SenderOverview {
    pub sender: String,
    pub email_count: i64,
    pub last_email_date: Option<DateTime<Utc>>,
    pub total_attachments_size: i64,
}

/// Whole-mailbox totals.
#[derive(Debug, Clone, Serialize)]
pub struct MailboxOverview {
    pub total: i64,
    pub archived: i64,
    pub deleted: i64,
    pub with_attachments: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoArchiveRule {
    pub condition: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoLabelRule {
    pub condition: String,
    pub value: String,
    pub label: String,
}

/// Per-user rule configuration. Written through the store, consumed by a
/// future rule-evaluation step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPreferences {
    pub user_id: String,
    pub auto_archive_rules: Vec<AutoArchiveRule>,
    pub auto_label_rules: Vec<AutoLabelRule>,
    pub default_importance: i64,
}

#[derive(Debug, Clone, Default)]
pub struct PreferencesPatch {
    pub auto_archive_rules: Option<Vec<AutoArchiveRule>>,
    pub auto_label_rules: Option<Vec<AutoLabelRule>>,
    pub default_importance: Option<i64>,
}

/// A label as the provider reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderLabel {
    pub id: String,
    pub name: String,
}
