//! Demo/orchestration binary.
//!
//! The scraper, persistent store, and HTTP façade are external
//! collaborators (spec §1 Non-goals) with no implementation here; this
//! binary seeds a small in-memory dataset so the prediction engine has
//! something to work over, then runs the same periodic-refresh loop a
//! real deployment would wire up against its own store.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use tirage_brain::brain::InMemoryBrainStore;
use tirage_brain::config::EngineConfig;
use tirage_brain::history::InMemoryPredictionLog;
use tirage_brain::ml::NullMlFeatureSource;
use tirage_brain::models::{Draw, DrawType, DrawTypeId};
use tirage_brain::store::InMemoryDrawStore;
use tirage_brain::Engine;

#[tokio::main]
async fn main() {
    tirage_brain::logging::init();

    let config = match EngineConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(%err, "invalid configuration, aborting");
            std::process::exit(1);
        }
    };
    tracing::info!(?config, "starting prediction engine");

    let draw_store = Arc::new(InMemoryDrawStore::new(vec![DrawType {
        id: DrawTypeId(1),
        name: "morning".to_string(),
        category: "daily".to_string(),
    }]));
    draw_store.seed(DrawTypeId(1), demo_draws());

    let engine = Engine::new(
        config.clone(),
        draw_store,
        Arc::new(InMemoryBrainStore::default()),
        Arc::new(InMemoryPredictionLog::default()),
        Arc::new(NullMlFeatureSource),
    )
    .await;

    if let Err(err) = engine.refresh(true).await {
        tracing::warn!(%err, "initial refresh failed");
    }

    match engine.predict(Some(DrawTypeId(1)), None).await {
        Ok(response) => tracing::info!(
            numbers = ?response.report.winning.numbers,
            confidence = response.report.winning.confidence,
            cached = response.cached,
            "generated a prediction"
        ),
        Err(err) => tracing::error!(%err, "prediction failed"),
    }

    if config.refresh_interval_minutes == 0 {
        tracing::info!("REFRESH_INTERVAL=0, background refresh disabled, exiting");
        return;
    }

    let mut ticker = tokio::time::interval(Duration::from_secs(config.refresh_interval_minutes as u64 * 60));
    loop {
        ticker.tick().await;
        match engine.refresh(false).await {
            Ok(outcome) => tracing::info!(message = %outcome.message, "background refresh completed"),
            Err(err) => tracing::warn!(%err, "background refresh skipped"),
        }
    }
}

fn demo_draws() -> Vec<Draw> {
    // Number 7 appears in every draw (decade 0); the other four numbers
    // each stay confined to their own decade so the five are always
    // distinct, the way a real historical draw would be.
    (0..200i64)
        .map(|i| {
            let date = Utc.timestamp_opt(1_700_000_000 + i * 86_400, 0).single().unwrap_or_else(Utc::now);
            let winning = [
                7,
                20 + (i % 9) as u8,
                40 + (i % 9) as u8,
                60 + (i % 9) as u8,
                81 + (i % 9) as u8,
            ];
            let machine = [
                11 + (i % 9) as u8,
                31 + (i % 9) as u8,
                51 + (i % 9) as u8,
                71 + (i % 9) as u8,
                82 + (i % 8) as u8,
            ];
            Draw {
                draw_type_id: DrawTypeId(1),
                date,
                day_of_week: (date.timestamp() / 86_400 % 7) as u8,
                winning,
                machine: Some(machine),
            }
        })
        .collect()
}
