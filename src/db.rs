use crate::error::{Error, Result};
use crate::models::{
    EmailFilter, EmailPatch, EmailRecord, LabelsPatch, MailboxOverview, PreferencesPatch,
    SenderOverview, SenderStats, StatsDelta, UserPreferences,
};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, sqlite::SqlitePool};
use std::collections::BTreeMap;

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self> {
        use sqlx::sqlite::SqliteConnectOptions;
        use std::str::FromStr;

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = SqlitePool::connect_with(options).await?;
        Ok(Self { pool })
    }

    #[cfg(test)]
    pub(crate) fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        let schema = include_str!("../schema.sql");
        sqlx::query(schema).execute(&self.pool).await?;
        Ok(())
    }

    /// Insert-or-merge a partial record keyed by `message_id`.
    ///
    /// A patch carrying `from`, `to` and `received_at` goes through a single
    /// constraint-backed upsert, so two concurrent calls for the same id can
    /// never both take the create branch. A patch without them can only
    /// update; if no row exists the call fails with `MissingRequiredFields`.
    /// Absent fields never clobber stored values.
    pub async fn upsert_email(&self, patch: EmailPatch) -> Result<EmailRecord> {
        let ai_json = match &patch.ai_analysis {
            Some(analysis) => Some(serde_json::to_string(analysis)?),
            None => None,
        };
        let received_ms = patch.received_at.map(|t| t.timestamp_millis());

        let mut tx = self.pool.begin().await?;

        let row = if patch.has_required_fields() {
            sqlx::query(
                "INSERT INTO emails (message_id, thread_id, subject, from_address, to_address, received_at, \
                                     attachments_size, category, importance, is_archived, is_deleted, ai_analysis) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
                 ON CONFLICT(message_id) DO UPDATE SET \
                     thread_id = COALESCE(?, thread_id), \
                     subject = COALESCE(?, subject), \
                     attachments_size = COALESCE(?, attachments_size), \
                     category = COALESCE(?, category), \
                     importance = COALESCE(?, importance), \
                     is_archived = COALESCE(?, is_archived), \
                     is_deleted = COALESCE(?, is_deleted), \
                     ai_analysis = COALESCE(?, ai_analysis) \
                 RETURNING *",
            )
            .bind(&patch.message_id)
            .bind(&patch.thread_id)
            .bind(&patch.subject)
            .bind(&patch.from_address)
            .bind(&patch.to_address)
            .bind(received_ms)
            .bind(patch.attachments_size.unwrap_or(0))
            .bind(&patch.category)
            .bind(patch.importance.unwrap_or(0))
            .bind(patch.is_archived.unwrap_or(false))
            .bind(patch.is_deleted.unwrap_or(false))
            .bind(&ai_json)
            .bind(&patch.thread_id)
            .bind(&patch.subject)
            .bind(patch.attachments_size)
            .bind(&patch.category)
            .bind(patch.importance)
            .bind(patch.is_archived)
            .bind(patch.is_deleted)
            .bind(&ai_json)
            .fetch_one(&mut *tx)
            .await?
        } else {
            let updated = sqlx::query(
                "UPDATE emails SET \
                     thread_id = COALESCE(?, thread_id), \
                     subject = COALESCE(?, subject), \
                     attachments_size = COALESCE(?, attachments_size), \
                     category = COALESCE(?, category), \
                     importance = COALESCE(?, importance), \
                     is_archived = COALESCE(?, is_archived), \
                     is_deleted = COALESCE(?, is_deleted), \
                     ai_analysis = COALESCE(?, ai_analysis) \
                 WHERE message_id = ? \
                 RETURNING *",
            )
            .bind(&patch.thread_id)
            .bind(&patch.subject)
            .bind(patch.attachments_size)
            .bind(&patch.category)
            .bind(patch.importance)
            .bind(patch.is_archived)
            .bind(patch.is_deleted)
            .bind(&ai_json)
            .bind(&patch.message_id)
            .fetch_optional(&mut *tx)
            .await?;

            match updated {
                Some(row) => row,
                None => return Err(Error::MissingRequiredFields(patch.message_id)),
            }
        };

        match &patch.labels {
            Some(LabelsPatch::Replace(labels)) => {
                sqlx::query("DELETE FROM email_labels WHERE message_id = ?")
                    .bind(&patch.message_id)
                    .execute(&mut *tx)
                    .await?;
                for label in labels {
                    sqlx::query(
                        "INSERT OR IGNORE INTO email_labels (message_id, label) VALUES (?, ?)",
                    )
                    .bind(&patch.message_id)
                    .bind(label)
                    .execute(&mut *tx)
                    .await?;
                }
            }
            Some(LabelsPatch::Merge(labels)) => {
                for label in labels {
                    sqlx::query(
                        "INSERT OR IGNORE INTO email_labels (message_id, label) VALUES (?, ?)",
                    )
                    .bind(&patch.message_id)
                    .bind(label)
                    .execute(&mut *tx)
                    .await?;
                }
            }
            None => {}
        }

        let label_rows =
            sqlx::query("SELECT label FROM email_labels WHERE message_id = ? ORDER BY seq")
                .bind(&patch.message_id)
                .fetch_all(&mut *tx)
                .await?;
        let labels = label_rows.into_iter().map(|r| r.get(0)).collect();

        tx.commit().await?;

        record_from_row(&row, labels)
    }

    pub async fn query_emails(&self, filter: &EmailFilter) -> Result<Vec<EmailRecord>> {
        let mut qb = QueryBuilder::new(
            "SELECT id, message_id, thread_id, subject, from_address, to_address, received_at, \
             attachments_size, category, importance, is_archived, is_deleted, ai_analysis \
             FROM emails WHERE 1 = 1",
        );
        if let Some(sender) = &filter.sender {
            qb.push(" AND from_address = ");
            qb.push_bind(sender);
        }
        if let Some(category) = &filter.category {
            qb.push(" AND category = ");
            qb.push_bind(category);
        }
        if let Some(is_archived) = filter.is_archived {
            qb.push(" AND is_archived = ");
            qb.push_bind(is_archived);
        }
        if let Some(is_deleted) = filter.is_deleted {
            qb.push(" AND is_deleted = ");
            qb.push_bind(is_deleted);
        }

        let rows = qb.build().fetch_all(&self.pool).await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let message_id: String = row.get("message_id");
            let labels = self.message_labels(&message_id).await?;
            records.push(record_from_row(&row, labels)?);
        }
        Ok(records)
    }

    pub async fn get_email(&self, message_id: &str) -> Result<EmailRecord> {
        let row = sqlx::query("SELECT * FROM emails WHERE message_id = ?")
            .bind(message_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound(format!("no email with message id {message_id}")))?;
        let labels = self.message_labels(message_id).await?;
        record_from_row(&row, labels)
    }

    async fn message_labels(&self, message_id: &str) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT label FROM email_labels WHERE message_id = ? ORDER BY seq")
            .bind(message_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|r| r.get(0)).collect())
    }

    /// Fold one message's contribution into its sender's running stats.
    ///
    /// Seeding and updating are the same statement, and every arithmetic
    /// step happens inside it. N concurrent folds for one sender always
    /// land as exactly N increments.
    pub async fn accumulate_stats(&self, sender: &str, delta: &StatsDelta) -> Result<()> {
        sqlx::query(
            "INSERT INTO email_stats (sender, email_count, last_email_date, total_attachments_size, categories) \
             VALUES (?1, 1, ?2, ?3, CASE WHEN ?4 IS NULL THEN NULL ELSE json_object(?4, 1) END) \
             ON CONFLICT(sender) DO UPDATE SET \
                 email_count = email_count + 1, \
                 last_email_date = CASE \
                     WHEN last_email_date IS NULL OR excluded.last_email_date > last_email_date \
                     THEN excluded.last_email_date \
                     ELSE last_email_date \
                 END, \
                 total_attachments_size = total_attachments_size + excluded.total_attachments_size, \
                 categories = CASE \
                     WHEN ?4 IS NULL THEN categories \
                     ELSE json_set(COALESCE(categories, '{}'), '$.\"' || ?4 || '\"', \
                          COALESCE(json_extract(categories, '$.\"' || ?4 || '\"'), 0) + 1) \
                 END",
        )
        .bind(sender)
        .bind(delta.received_at.timestamp_millis())
        .bind(delta.attachments_size)
        .bind(&delta.category)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn sender_stats(&self, sender: &str) -> Result<SenderStats> {
        let row = sqlx::query(
            "SELECT sender, email_count, last_email_date, average_response_time, \
             total_attachments_size, categories \
             FROM email_stats WHERE sender = ?",
        )
        .bind(sender)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("no stats for sender {sender}")))?;

        let categories: Option<String> = row.get("categories");
        let categories: BTreeMap<String, i64> = match categories {
            Some(raw) => serde_json::from_str(&raw)?,
            None => BTreeMap::new(),
        };

        Ok(SenderStats {
            sender: row.get("sender"),
            email_count: row.get("email_count"),
            last_email_date: row
                .get::<Option<i64>, _>("last_email_date")
                .map(millis_to_utc),
            average_response_time: row.get("average_response_time"),
            total_attachments_size: row.get("total_attachments_size"),
            categories,
        })
    }

    /// Aggregate view computed straight from the email table. Fallback for
    /// senders with no stats row.
    pub async fn sender_overview(&self, sender: &str) -> Result<SenderOverview> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS email_count, MAX(received_at) AS last_email_date, \
             COALESCE(SUM(attachments_size), 0) AS total_attachments_size \
             FROM emails WHERE from_address = ?",
        )
        .bind(sender)
        .fetch_one(&self.pool)
        .await?;

        let email_count: i64 = row.get("email_count");
        if email_count == 0 {
            return Err(Error::NotFound(format!("no emails from sender {sender}")));
        }

        Ok(SenderOverview {
            sender: sender.to_string(),
            email_count,
            last_email_date: row
                .get::<Option<i64>, _>("last_email_date")
                .map(millis_to_utc),
            total_attachments_size: row.get("total_attachments_size"),
        })
    }

    pub async fn mailbox_overview(&self) -> Result<MailboxOverview> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS total, \
             COALESCE(SUM(is_archived), 0) AS archived, \
             COALESCE(SUM(is_deleted), 0) AS deleted, \
             COALESCE(SUM(attachments_size > 0), 0) AS with_attachments \
             FROM emails",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(MailboxOverview {
            total: row.get("total"),
            archived: row.get("archived"),
            deleted: row.get("deleted"),
            with_attachments: row.get("with_attachments"),
        })
    }

    pub async fn user_preferences(&self, user_id: &str) -> Result<UserPreferences> {
        let row = sqlx::query(
            "SELECT user_id, auto_archive_rules, auto_label_rules, default_importance \
             FROM user_preferences WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("no preferences for user {user_id}")))?;

        let archive_rules: Option<String> = row.get("auto_archive_rules");
        let label_rules: Option<String> = row.get("auto_label_rules");

        Ok(UserPreferences {
            user_id: row.get("user_id"),
            auto_archive_rules: match archive_rules {
                Some(raw) => serde_json::from_str(&raw)?,
                None => Vec::new(),
            },
            auto_label_rules: match label_rules {
                Some(raw) => serde_json::from_str(&raw)?,
                None => Vec::new(),
            },
            default_importance: row.get("default_importance"),
        })
    }

    pub async fn update_user_preferences(
        &self,
        user_id: &str,
        patch: PreferencesPatch,
    ) -> Result<()> {
        let archive_rules = match &patch.auto_archive_rules {
            Some(rules) => Some(serde_json::to_string(rules)?),
            None => None,
        };
        let label_rules = match &patch.auto_label_rules {
            Some(rules) => Some(serde_json::to_string(rules)?),
            None => None,
        };

        sqlx::query(
            "INSERT INTO user_preferences (user_id, auto_archive_rules, auto_label_rules, default_importance) \
             VALUES (?, ?, ?, ?) \
             ON CONFLICT(user_id) DO UPDATE SET \
                 auto_archive_rules = COALESCE(?, auto_archive_rules), \
                 auto_label_rules = COALESCE(?, auto_label_rules), \
                 default_importance = COALESCE(?, default_importance)",
        )
        .bind(user_id)
        .bind(&archive_rules)
        .bind(&label_rules)
        .bind(patch.default_importance.unwrap_or(0))
        .bind(&archive_rules)
        .bind(&label_rules)
        .bind(patch.default_importance)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn millis_to_utc(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}

fn record_from_row(row: &SqliteRow, labels: Vec<String>) -> Result<EmailRecord> {
    let ai_analysis: Option<String> = row.get("ai_analysis");
    let ai_analysis = match ai_analysis {
        Some(raw) => Some(serde_json::from_str(&raw)?),
        None => None,
    };

    Ok(EmailRecord {
        message_id: row.get("message_id"),
        thread_id: row.get("thread_id"),
        subject: row.get("subject"),
        from_address: row.get("from_address"),
        to_address: row.get("to_address"),
        received_at: millis_to_utc(row.get("received_at")),
        labels,
        attachments_size: row.get("attachments_size"),
        category: row.get("category"),
        importance: row.get("importance"),
        is_archived: row.get("is_archived"),
        is_deleted: row.get("is_deleted"),
        ai_analysis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AutoLabelRule, EmailAnalysis};
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

    fn ingest_patch(message_id: &str, from: &str, received_ms: i64, size: i64) -> EmailPatch {
        let mut patch = EmailPatch::new(message_id);
        patch.thread_id = Some(format!("t-{message_id}"));
        patch.subject = Some(format!("subject {message_id}"));
        patch.from_address = Some(from.to_string());
        patch.to_address = Some("me@example.com".to_string());
        patch.received_at = Some(millis_to_utc(received_ms));
        patch.attachments_size = Some(size);
        patch.labels = Some(LabelsPatch::Replace(vec!["INBOX".to_string()]));
        patch
    }

    #[tokio::test]
    async fn upsert_creates_then_merges_partial_updates() {
        let db = open_test_db().await;

        db.upsert_email(ingest_patch("m1", "alice@example.com", 1_000, 10))
            .await
            .unwrap();

        let mut patch = EmailPatch::new("m1");
        patch.is_archived = Some(true);
        let merged = db.upsert_email(patch).await.unwrap();

        assert!(merged.is_archived);
        assert_eq!(merged.from_address, "alice@example.com");
        assert_eq!(merged.to_address, "me@example.com");
        assert_eq!(merged.subject.as_deref(), Some("subject m1"));
        assert_eq!(merged.received_at.timestamp_millis(), 1_000);
    }

    #[tokio::test]
    async fn upsert_is_idempotent() {
        let db = open_test_db().await;

        let first = db
            .upsert_email(ingest_patch("m1", "alice@example.com", 1_000, 10))
            .await
            .unwrap();
        let second = db
            .upsert_email(ingest_patch("m1", "alice@example.com", 1_000, 10))
            .await
            .unwrap();

        assert_eq!(first.message_id, second.message_id);
        assert_eq!(first.labels, second.labels);
        assert_eq!(first.attachments_size, second.attachments_size);

        let all = db.query_emails(&EmailFilter::default()).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn upsert_new_row_without_required_fields_fails() {
        let db = open_test_db().await;

        let mut patch = EmailPatch::new("never-seen");
        patch.is_archived = Some(true);

        let err = db.upsert_email(patch).await.unwrap_err();
        assert!(matches!(err, Error::MissingRequiredFields(_)));
    }

    #[tokio::test]
    async fn labels_merge_keeps_existing_replace_resets() {
        let db = open_test_db().await;

        let mut patch = ingest_patch("m1", "alice@example.com", 1_000, 0);
        patch.labels = Some(LabelsPatch::Replace(vec![
            "INBOX".to_string(),
            "IMPORTANT".to_string(),
        ]));
        db.upsert_email(patch).await.unwrap();

        let mut merge = EmailPatch::new("m1");
        merge.labels = Some(LabelsPatch::Merge(vec!["Finance".to_string()]));
        let merged = db.upsert_email(merge).await.unwrap();
        assert_eq!(merged.labels, vec!["INBOX", "IMPORTANT", "Finance"]);

        // merging an existing label is a no-op
        let mut again = EmailPatch::new("m1");
        again.labels = Some(LabelsPatch::Merge(vec!["Finance".to_string()]));
        let merged = db.upsert_email(again).await.unwrap();
        assert_eq!(merged.labels, vec!["INBOX", "IMPORTANT", "Finance"]);

        let mut replace = EmailPatch::new("m1");
        replace.labels = Some(LabelsPatch::Replace(vec!["TRASH".to_string()]));
        let replaced = db.upsert_email(replace).await.unwrap();
        assert_eq!(replaced.labels, vec!["TRASH"]);
    }

    #[tokio::test]
    async fn upsert_roundtrips_ai_analysis() {
        let db = open_test_db().await;
        db.upsert_email(ingest_patch("m1", "alice@example.com", 1_000, 0))
            .await
            .unwrap();

        let mut patch = EmailPatch::new("m1");
        patch.category = Some("work".to_string());
        patch.importance = Some(4);
        patch.ai_analysis = Some(EmailAnalysis {
            kind: "business".to_string(),
            sentiment: "neutral".to_string(),
            summary: "quarterly report attached".to_string(),
            action_required: true,
        });
        db.upsert_email(patch).await.unwrap();

        let record = db.get_email("m1").await.unwrap();
        assert_eq!(record.category.as_deref(), Some("work"));
        assert_eq!(record.importance, 4);
        let analysis = record.ai_analysis.unwrap();
        assert_eq!(analysis.kind, "business");
        assert!(analysis.action_required);
    }

    #[tokio::test]
    async fn query_predicates_compose() {
        let db = open_test_db().await;

        db.upsert_email(ingest_patch("m1", "a@b.com", 1_000, 0))
            .await
            .unwrap();
        db.upsert_email(ingest_patch("m2", "a@b.com", 2_000, 0))
            .await
            .unwrap();
        db.upsert_email(ingest_patch("m3", "c@d.com", 3_000, 0))
            .await
            .unwrap();

        let mut patch = EmailPatch::new("m1");
        patch.is_archived = Some(true);
        db.upsert_email(patch).await.unwrap();

        let filter = EmailFilter {
            sender: Some("a@b.com".to_string()),
            is_archived: Some(true),
            ..EmailFilter::default()
        };
        let matches = db.query_emails(&filter).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].message_id, "m1");

        let everything = db.query_emails(&EmailFilter::default()).await.unwrap();
        assert_eq!(everything.len(), 3);

        let unarchived = db
            .query_emails(&EmailFilter {
                sender: Some("a@b.com".to_string()),
                is_archived: Some(false),
                ..EmailFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(unarchived.len(), 1);
        assert_eq!(unarchived[0].message_id, "m2");
    }

    #[tokio::test]
    async fn accumulate_seeds_then_applies_deltas() {
        let db = open_test_db().await;

        let delta = StatsDelta {
            received_at: millis_to_utc(5_000),
            attachments_size: 10,
            category: Some("work".to_string()),
        };
        db.accumulate_stats("a@b.com", &delta).await.unwrap();

        let older = StatsDelta {
            received_at: millis_to_utc(2_000),
            attachments_size: 20,
            category: Some("newsletters".to_string()),
        };
        db.accumulate_stats("a@b.com", &older).await.unwrap();

        let stats = db.sender_stats("a@b.com").await.unwrap();
        assert_eq!(stats.email_count, 2);
        assert_eq!(stats.total_attachments_size, 30);
        // an older message must not move last_email_date backwards
        assert_eq!(stats.last_email_date.unwrap().timestamp_millis(), 5_000);
        assert_eq!(stats.categories.get("work"), Some(&1));
        assert_eq!(stats.categories.get("newsletters"), Some(&1));
    }

    #[tokio::test]
    async fn concurrent_folds_lose_no_updates() {
        let db = open_test_db().await;
        const N: i64 = 24;

        let mut handles = Vec::new();
        for i in 0..N {
            let db = db.clone();
            handles.push(tokio::spawn(async move {
                let delta = StatsDelta {
                    received_at: millis_to_utc(i * 1_000),
                    attachments_size: i,
                    category: Some("bulk".to_string()),
                };
                db.accumulate_stats("hot@sender.com", &delta).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let stats = db.sender_stats("hot@sender.com").await.unwrap();
        assert_eq!(stats.email_count, N);
        assert_eq!(stats.total_attachments_size, (0..N).sum::<i64>());
        assert_eq!(stats.categories.get("bulk"), Some(&N));
    }

    #[tokio::test]
    async fn missing_rows_surface_as_not_found() {
        let db = open_test_db().await;

        assert!(matches!(
            db.sender_stats("ghost@example.com").await.unwrap_err(),
            Error::NotFound(_)
        ));
        assert!(matches!(
            db.sender_overview("ghost@example.com").await.unwrap_err(),
            Error::NotFound(_)
        ));
        assert!(matches!(
            db.user_preferences("nobody").await.unwrap_err(),
            Error::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn sender_overview_aggregates_from_records() {
        let db = open_test_db().await;

        db.upsert_email(ingest_patch("m1", "a@b.com", 1_000, 10))
            .await
            .unwrap();
        db.upsert_email(ingest_patch("m2", "a@b.com", 9_000, 25))
            .await
            .unwrap();

        let overview = db.sender_overview("a@b.com").await.unwrap();
        assert_eq!(overview.email_count, 2);
        assert_eq!(overview.total_attachments_size, 35);
        assert_eq!(overview.last_email_date.unwrap().timestamp_millis(), 9_000);

        let mailbox = db.mailbox_overview().await.unwrap();
        assert_eq!(mailbox.total, 2);
        assert_eq!(mailbox.archived, 0);
        assert_eq!(mailbox.with_attachments, 2);
    }

    #[tokio::test]
    async fn preferences_upsert_merges() {
        let db = open_test_db().await;

        let mut patch = PreferencesPatch::default();
        patch.default_importance = Some(2);
        db.update_user_preferences("u1", patch).await.unwrap();

        let mut patch = PreferencesPatch::default();
        patch.auto_label_rules = Some(vec![AutoLabelRule {
            condition: "from".to_string(),
            value: "billing@".to_string(),
            label: "Finance".to_string(),
        }]);
        db.update_user_preferences("u1", patch).await.unwrap();

        let prefs = db.user_preferences("u1").await.unwrap();
        assert_eq!(prefs.default_importance, 2);
        assert_eq!(prefs.auto_label_rules.len(), 1);
        assert_eq!(prefs.auto_label_rules[0].label, "Finance");
        assert!(prefs.auto_archive_rules.is_empty());
    }
}
