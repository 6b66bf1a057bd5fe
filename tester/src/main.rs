//! Manual end-to-end harness: runs the demo flow against a live server,
//! going through the failover client for the read paths.
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use failover::{fetch_with_failover, FetchConfig};
use serde_json::{json, Value};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Server to exercise.
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    base_url: String,

    /// Primary request budget in milliseconds.
    #[arg(long, default_value_t = 5000)]
    timeout_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let http = reqwest::Client::new();
    let base = args.base_url.trim_end_matches('/');
    let budget = Duration::from_millis(args.timeout_ms);

    // Pantry read through the failover client.
    let config = FetchConfig {
        timeout_budget: budget,
        fallback_url: Some(format!("{base}/fallback/pantry.json")),
    };
    let outcome = fetch_with_failover::<Value>(&http, &format!("{base}/api/pantry"), &config).await;
    report("pantry", &outcome.data, &outcome.error)?;

    // Add an item.
    let created: Value = http
        .post(format!("{base}/api/pantry"))
        .json(&json!({"name": "Oats", "quantity": 3, "category": "Grains"}))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
        .context("decoding created item")?;
    println!("added pantry item {}", created["id"]);

    // Catalog search through the failover client.
    let config = FetchConfig {
        timeout_budget: budget,
        fallback_url: Some(format!("{base}/fallback/foods.json")),
    };
    let outcome = fetch_with_failover::<Value>(
        &http,
        &format!("{base}/api/foods/search?q=cheese"),
        &config,
    )
    .await;
    report("food search", &outcome.data, &outcome.error)?;

    // Weekly plan.
    let response: Value = http
        .post(format!("{base}/api/diet/week"))
        .json(&json!({"pantry": [{"name": "Egg"}, {"name": "Oats"}]}))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
        .context("decoding weekly plan")?;

    let plan = response["plan"]
        .as_object()
        .context("plan is not an object")?;
    if plan.len() != 7 {
        bail!("weekly plan has {} days, expected 7", plan.len());
    }
    if plan["Day 1"]["breakfast"] != "Egg" {
        bail!("unexpected Day 1 breakfast: {}", plan["Day 1"]["breakfast"]);
    }
    println!(
        "weekly plan OK ({} days, mode {})",
        plan.len(),
        response["mode"]
    );

    Ok(())
}

fn report(step: &str, data: &Option<Value>, error: &Option<failover::FailoverError>) -> Result<()> {
    let Some(data) = data else {
        bail!("{step}: no data ({})", describe(error));
    };

    let count = data.as_array().map_or(0, Vec::len);
    match error {
        None => println!("{step}: {count} records (primary)"),
        Some(err) => println!("{step}: {count} records (fallback; {err})"),
    }

    Ok(())
}

fn describe(error: &Option<failover::FailoverError>) -> String {
    error
        .as_ref()
        .map_or_else(|| "no error".to_string(), ToString::to_string)
}
