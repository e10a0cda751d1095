use crate::db::Database;
use crate::error::Result;
use crate::gmail::MailProvider;
use crate::models::{EmailRecord, StatsDelta};
use crate::normalize::normalize;
use futures::future::try_join_all;
use tracing::{debug, info};

pub const DEFAULT_QUERY: &str = "in:inbox";
pub const DEFAULT_MAX_RESULTS: u32 = 100;

/// Pull a batch of remote messages matching `query` into the local store,
/// then fold each record into its sender's running stats.
///
/// Message bodies are fetched concurrently with no ordering between them.
/// The first fetch or upsert failure aborts the whole batch; no partial
/// result is reported. Records already upserted stay upserted (the upsert
/// is idempotent, so re-running the batch is safe), and stats are only
/// folded once every upsert has completed.
pub async fn fetch_and_ingest(
    provider: &dyn MailProvider,
    db: &Database,
    query: &str,
    max_results: u32,
) -> Result<Vec<EmailRecord>> {
    let ids = provider.list_messages(query, max_results).await?;
    info!(count = ids.len(), query, "fetching message batch");

    let records = try_join_all(ids.iter().map(|id| async move {
        let msg = provider.get_message(id).await?;
        let patch = normalize(&msg);
        debug!(message_id = %patch.message_id, "upserting message");
        db.upsert_email(patch).await
    }))
    .await?;

    for record in &records {
        db.accumulate_stats(&record.from_address, &StatsDelta::from_record(record))
            .await?;
    }

    info!(count = records.len(), "batch ingested");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::gmail::testing::{MockProvider, raw_message};
    use crate::models::EmailFilter;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;

    async fn open_test_db() -> Database {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        let db = Database::from_pool(pool);
        db.run_migrations().await.unwrap();
        db
    }

    fn three_message_batch() -> Vec<google_gmail1::api::Message> {
        vec![
            raw_message("m1", "a@b.com", "me@x.com", "one", 1_000, &["INBOX"], &[10]),
            raw_message("m2", "a@b.com", "me@x.com", "two", 2_000, &["INBOX"], &[20]),
            raw_message("m3", "c@d.com", "me@x.com", "three", 3_000, &["INBOX"], &[]),
        ]
    }

    #[tokio::test]
    async fn ingests_batch_and_folds_stats_per_sender() {
        let provider = MockProvider::with_messages(three_message_batch());
        let db = open_test_db().await;

        let records = fetch_and_ingest(&provider, &db, DEFAULT_QUERY, DEFAULT_MAX_RESULTS)
            .await
            .unwrap();
        assert_eq!(records.len(), 3);

        let stats_a = db.sender_stats("a@b.com").await.unwrap();
        assert_eq!(stats_a.email_count, 2);
        assert_eq!(stats_a.total_attachments_size, 30);
        assert_eq!(stats_a.last_email_date.unwrap().timestamp_millis(), 2_000);

        let stats_c = db.sender_stats("c@d.com").await.unwrap();
        assert_eq!(stats_c.email_count, 1);
        assert_eq!(stats_c.total_attachments_size, 0);
    }

    #[tokio::test]
    async fn reingesting_keeps_one_record_but_counts_again() {
        let provider = MockProvider::with_messages(three_message_batch());
        let db = open_test_db().await;

        fetch_and_ingest(&provider, &db, DEFAULT_QUERY, DEFAULT_MAX_RESULTS)
            .await
            .unwrap();
        fetch_and_ingest(&provider, &db, DEFAULT_QUERY, DEFAULT_MAX_RESULTS)
            .await
            .unwrap();

        let all = db.query_emails(&EmailFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);

        // at-least-once folding: a re-ingested duplicate counts again
        let stats_a = db.sender_stats("a@b.com").await.unwrap();
        assert_eq!(stats_a.email_count, 4);
        assert_eq!(stats_a.total_attachments_size, 60);
    }

    #[tokio::test]
    async fn max_results_caps_the_batch() {
        let provider = MockProvider::with_messages(three_message_batch());
        let db = open_test_db().await;

        let records = fetch_and_ingest(&provider, &db, DEFAULT_QUERY, 2).await.unwrap();
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn single_fetch_failure_aborts_the_batch() {
        let mut provider = MockProvider::with_messages(three_message_batch());
        provider.fail_get = Some("m2".to_string());
        let db = open_test_db().await;

        let err = fetch_and_ingest(&provider, &db, DEFAULT_QUERY, DEFAULT_MAX_RESULTS)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Provider(_)));

        // stats are folded only after every upsert has completed
        assert!(matches!(
            db.sender_stats("a@b.com").await.unwrap_err(),
            Error::NotFound(_)
        ));
    }
}
