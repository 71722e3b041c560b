//! Cursor paging example
//!
//! Logs in, runs a query in batches of 5 and prints every batch.
//!
//! Reads connection settings from `microfoxx.json` when present:
//! ```json
//! { "host": "localhost", "port": 8529, "database": "shop",
//!   "username": "root", "password": "secret" }
//! ```
//!
//! Run with: cargo run -p microfoxx-rs --example cursor_paging

use microfoxx_rs::{Client, ConnectionParams, CursorState, QuerySpec};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logging() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("microfoxx_rs=debug,microfoxx_core=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false))
        .try_init()?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;

    let params = ConnectionParams::load("microfoxx.json").unwrap_or_else(|_| {
        tracing::warn!("Failed to load microfoxx.json, using defaults");
        ConnectionParams::new("_system").with_credentials("root", "")
    });

    println!("🦊 Microfoxx cursor paging example\n");
    println!("Endpoint: {}", params.endpoint());

    let mut client = Client::connect(&params).await?;
    println!("✓ Logged in as session {}\n", client.session().map(|s| s.sid.as_str()).unwrap_or(""));

    let spec = QuerySpec::new("FOR item in @@coll FILTER item.status == @status RETURN item")
        .bind("@coll", "users")
        .bind("status", "enabled")
        .batch_size(5)
        .with_count();

    let mut pager = client.pager(spec.clone());
    let mut batches = 0;
    while let Some(result) = pager.next_page().await {
        if result.status == 401 {
            println!("Session rejected, refreshing and starting over");
            drop(pager);
            client.refresh().await?;
            let records: Vec<serde_json::Value> = client.pager(spec).records().await?;
            println!("✓ Fetched {} records after refresh", records.len());
            return Ok(());
        }

        let batch = result.into_result()?;
        batches += 1;
        if let Some(count) = batch.count {
            println!("Total results: {}", count);
        }
        println!(
            "Batch {} ({:?}): {}",
            batches, batch.state, batch.documents
        );
        if batch.state == CursorState::Active {
            println!("  cursor {} has more", batch.cursor.as_deref().unwrap_or("?"));
        }
    }

    println!("\n✓ Done after {} batches", batches);
    Ok(())
}
