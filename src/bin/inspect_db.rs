use sqlx::Row;
use sqlx::sqlite::SqlitePoolOptions;
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <search_query>", args[0]);
        eprintln!("Search query matches against sender or subject.");
        std::process::exit(1);
    }

    let query = &args[1];
    let search_term = format!("%{}%", query);

    let database_url = "sqlite://gsync.db";
    let pool = SqlitePoolOptions::new()
        .connect(database_url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;

    let row = sqlx::query(
        "SELECT message_id, from_address, to_address, subject, received_at, \
         attachments_size, category, importance, is_archived, is_deleted, ai_analysis \
         FROM emails \
         WHERE from_address LIKE ? OR subject LIKE ? \
         ORDER BY received_at DESC \
         LIMIT 1",
    )
    .bind(&search_term)
    .bind(&search_term)
    .fetch_optional(&pool)
    .await?;

    let Some(row) = row else {
        println!("No messages found matching '{}'", query);
        return Ok(());
    };

    let message_id: String = row.get("message_id");
    let from: String = row.get("from_address");

    println!("Found Message:");
    println!("ID: {}", message_id);
    println!("From: {}", from);
    println!("To: {}", row.get::<String, _>("to_address"));
    println!("Subject: {:?}", row.get::<Option<String>, _>("subject"));
    println!("Received: {}", row.get::<i64, _>("received_at"));
    println!("Attachments: {} bytes", row.get::<i64, _>("attachments_size"));
    println!("Category: {:?}", row.get::<Option<String>, _>("category"));
    println!("Importance: {}", row.get::<i64, _>("importance"));
    println!(
        "Archived: {} / Deleted: {}",
        row.get::<bool, _>("is_archived"),
        row.get::<bool, _>("is_deleted")
    );
    println!(
        "--------------------------------------------------------------------------------"
    );

    let labels = sqlx::query("SELECT label FROM email_labels WHERE message_id = ? ORDER BY seq")
        .bind(&message_id)
        .fetch_all(&pool)
        .await?;
    let labels: Vec<String> = labels.into_iter().map(|r| r.get(0)).collect();
    println!("Labels: {}", labels.join(", "));

    println!(
        "--------------------------------------------------------------------------------"
    );
    println!("AI Analysis (Raw):");
    println!("{:?}", row.get::<Option<String>, _>("ai_analysis"));

    println!(
        "--------------------------------------------------------------------------------"
    );
    let stats = sqlx::query(
        "SELECT email_count, last_email_date, total_attachments_size, categories \
         FROM email_stats WHERE sender = ?",
    )
    .bind(&from)
    .fetch_optional(&pool)
    .await?;

    if let Some(stats) = stats {
        println!("Sender Stats for {}:", from);
        println!("Emails: {}", stats.get::<i64, _>("email_count"));
        println!(
            "Last Email: {:?}",
            stats.get::<Option<i64>, _>("last_email_date")
        );
        println!(
            "Total Attachments: {} bytes",
            stats.get::<i64, _>("total_attachments_size")
        );
        println!("Categories: {:?}", stats.get::<Option<String>, _>("categories"));
    } else {
        println!("No stats row for sender {}", from);
    }

    Ok(())
}
