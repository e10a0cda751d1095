mod actions;
mod analyze;
mod auth;
mod config;
mod db;
mod error;
mod gmail;
mod models;
mod normalize;
mod sync;

use crate::config::Config;
use crate::gmail::GmailClient;
use crate::models::EmailFilter;
use anyhow::Context;
use google_gmail1::Gmail;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load();
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--reset-token") {
        auth::RingStorage.clear_token()?;
        println!("Token cleared. Run again to re-authenticate.");
        return Ok(());
    }

    let db = db::Database::new(&config.database_url).await?;
    db.run_migrations().await?;

    let command = args.first().map(String::as_str).unwrap_or("sync");

    // Commands against the local mirror only; no provider round-trip.
    match command {
        "stats" => {
            let sender = args.get(1).context("usage: gsync stats <sender>")?;
            match db.sender_stats(sender).await {
                Ok(stats) => println!("{}", serde_json::to_string_pretty(&stats)?),
                Err(error::Error::NotFound(_)) => {
                    let overview = db.sender_overview(sender).await?;
                    println!("{}", serde_json::to_string_pretty(&overview)?);
                }
                Err(e) => return Err(e.into()),
            }
            return Ok(());
        }
        "overview" => {
            let overview = db.mailbox_overview().await?;
            println!("{}", serde_json::to_string_pretty(&overview)?);
            return Ok(());
        }
        "search" => {
            let filter = parse_filter(&args[1..])?;
            let records = db.query_emails(&filter).await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
            return Ok(());
        }
        "analyze" => {
            let id = args.get(1).context("usage: gsync analyze <message-id>")?;
            let record = db.get_email(id).await?;
            let analyzer = analyze::Analyzer::from_config(&config.llm)?;
            let response = analyzer
                .analyze(&analyze::EmailContent::from_record(&record))
                .await?;
            analyze::apply_analysis(&db, id, &response).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            return Ok(());
        }
        "batch-analyze" => {
            if args.len() < 2 {
                anyhow::bail!("usage: gsync batch-analyze <message-id>...");
            }
            let analyzer = analyze::Analyzer::from_config(&config.llm)?;
            let mut records = Vec::new();
            for id in &args[1..] {
                records.push(db.get_email(id).await?);
            }
            let contents: Vec<_> = records
                .iter()
                .map(analyze::EmailContent::from_record)
                .collect();
            let responses = analyzer.analyze_batch(&contents).await?;
            for (record, response) in records.iter().zip(&responses) {
                analyze::apply_analysis(&db, &record.message_id, response).await?;
            }
            println!("{}", serde_json::to_string_pretty(&responses)?);
            return Ok(());
        }
        _ => {}
    }

    let client = connect(&config).await?;

    match command {
        "sync" => {
            let records =
                sync::fetch_and_ingest(&client, &db, &config.sync.query, config.sync.max_results)
                    .await?;
            println!("Ingested {} messages.", records.len());
        }
        "archive" => {
            let id = args.get(1).context("usage: gsync archive <message-id>")?;
            actions::archive(&client, &db, id).await?;
            println!("Archived {id}.");
        }
        "delete" => {
            let id = args.get(1).context("usage: gsync delete <message-id>")?;
            actions::delete(&client, &db, id).await?;
            println!("Deleted {id}.");
        }
        "label" => {
            let id = args.get(1).context("usage: gsync label <message-id> <name>")?;
            let name = args.get(2).context("usage: gsync label <message-id> <name>")?;
            actions::add_label(&client, &db, id, name).await?;
            println!("Labelled {id} with {name}.");
        }
        other => anyhow::bail!("unknown command `{other}`"),
    }

    Ok(())
}

async fn connect(config: &Config) -> anyhow::Result<GmailClient> {
    let secret = auth::Authenticator::load_secret(&config.credentials_path).await?;
    let authenticator = auth::Authenticator::authenticate(secret).await?;
    authenticator
        .token(auth::SCOPES)
        .await
        .context("failed to obtain access token")?;

    let hub = Gmail::new(
        hyper::Client::builder().build(
            hyper_rustls::HttpsConnectorBuilder::new()
                .with_native_roots()
                .context("failed to load native TLS roots")?
                .https_only()
                .enable_http1()
                .build(),
        ),
        authenticator,
    );

    Ok(GmailClient::new(hub))
}

fn parse_filter(args: &[String]) -> anyhow::Result<EmailFilter> {
    let mut filter = EmailFilter::default();
    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let value = iter
            .next()
            .with_context(|| format!("flag {flag} needs a value"))?;
        match flag.as_str() {
            "--sender" => filter.sender = Some(value.clone()),
            "--category" => filter.category = Some(value.clone()),
            "--archived" => filter.is_archived = Some(value.parse()?),
            "--deleted" => filter.is_deleted = Some(value.parse()?),
            other => anyhow::bail!("unknown search flag `{other}`"),
        }
    }
    Ok(filter)
}
