//! Mailbox mutations. Each one is two-phase, remote first: if the provider
//! call fails the local mirror is never touched, and if the local write
//! fails after a successful remote call the operation can simply be
//! re-invoked, since every local write here is an idempotent upsert.
//!
//! A mutation on a message that was never ingested fails with
//! `MissingRequiredFields`: the local mirror has nothing to merge into.

use crate::db::Database;
use crate::error::Result;
use crate::gmail::MailProvider;
use crate::models::{EmailPatch, EmailRecord, LabelsPatch};
use tracing::info;

pub async fn archive(
    provider: &dyn MailProvider,
    db: &Database,
    message_id: &str,
) -> Result<EmailRecord> {
    provider
        .modify_labels(
            message_id,
            &["ARCHIVED".to_string()],
            &["INBOX".to_string()],
        )
        .await?;

    let mut patch = EmailPatch::new(message_id);
    patch.is_archived = Some(true);
    let record = db.upsert_email(patch).await?;
    info!(message_id, "archived message");
    Ok(record)
}

pub async fn delete(
    provider: &dyn MailProvider,
    db: &Database,
    message_id: &str,
) -> Result<EmailRecord> {
    provider.trash_message(message_id).await?;

    let mut patch = EmailPatch::new(message_id);
    patch.is_deleted = Some(true);
    let record = db.upsert_email(patch).await?;
    info!(message_id, "deleted message");
    Ok(record)
}

/// Attach `label_name` to the message, creating the label on the provider
/// when it does not exist yet. The name lookup is a case-sensitive exact
/// match. Locally the name is merged into the record's label set.
pub async fn add_label(
    provider: &dyn MailProvider,
    db: &Database,
    message_id: &str,
    label_name: &str,
) -> Result<EmailRecord> {
    let existing = provider
        .list_labels()
        .await?
        .into_iter()
        .find(|l| l.name == label_name);

    let label = match existing {
        Some(label) => label,
        None => provider.create_label(label_name).await?,
    };

    provider.modify_labels(message_id, &[label.id], &[]).await?;

    let mut patch = EmailPatch::new(message_id);
    patch.labels = Some(LabelsPatch::Merge(vec![label_name.to_string()]));
    let record = db.upsert_email(patch).await?;
    info!(message_id, label = label_name, "labelled message");
    Ok(record)
}
