use crate::models::{EmailPatch, LabelsPatch};
use chrono::DateTime;
use google_gmail1::api::Message;

/// Map a raw provider message onto a create-capable record patch.
///
/// Header extraction takes the first header whose name matches exactly
/// (case-sensitive); a missing header becomes an empty string. Attachment
/// size is the sum of the payload's immediate part body sizes. Malformed
/// input degrades to defaults, never to an error.
pub fn normalize(msg: &Message) -> EmailPatch {
    let headers = msg
        .payload
        .as_ref()
        .and_then(|p| p.headers.as_deref())
        .unwrap_or(&[]);

    let header = |name: &str| {
        headers
            .iter()
            .find(|h| h.name.as_deref() == Some(name))
            .and_then(|h| h.value.clone())
            .unwrap_or_default()
    };

    let label_ids = msg.label_ids.clone().unwrap_or_default();

    let attachments_size: i64 = msg
        .payload
        .as_ref()
        .and_then(|p| p.parts.as_ref())
        .map(|parts| {
            parts
                .iter()
                .map(|part| i64::from(part.body.as_ref().and_then(|b| b.size).unwrap_or(0)))
                .sum()
        })
        .unwrap_or(0);

    let mut patch = EmailPatch::new(msg.id.clone().unwrap_or_default());
    patch.thread_id = msg.thread_id.clone();
    patch.subject = Some(header("Subject"));
    patch.from_address = Some(header("From"));
    patch.to_address = Some(header("To"));
    patch.received_at = Some(
        DateTime::from_timestamp_millis(msg.internal_date.unwrap_or(0)).unwrap_or_default(),
    );
    patch.attachments_size = Some(attachments_size);
    patch.is_archived = Some(label_ids.iter().any(|l| l == "ARCHIVED"));
    patch.is_deleted = Some(label_ids.iter().any(|l| l == "TRASH"));
    patch.labels = Some(LabelsPatch::Replace(label_ids));
    patch
}
