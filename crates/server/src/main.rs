//! Simple test harness for the recommendation engine.
//!
//! This binary exercises the end-to-end read paths against a local model
//! directory: one hybrid recommendation, one genre chart, one actor chart.

use anyhow::Result;
use std::path::Path;
use tracing::{info, warn};

use server::{RecommendationEngine, load_artifacts};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("info,server=debug,charts=debug,similarity=debug")
        .init();

    info!("Starting FlickPick engine test harness");

    let model_dir = Path::new("model");
    let (catalog, similarity, predictor) = load_artifacts(model_dir)?;
    info!("Oracles loaded ({} catalog rows)", catalog.len());

    let engine = RecommendationEngine::new(catalog, similarity, predictor)?
        .with_snapshot_dir(model_dir.join("charts"));

    let user_id = 1;
    let seed = "Toy Story";

    info!("Hybrid recommendations for user {} seeded on {:?}:", user_id, seed);
    let recs = engine.recommend(user_id, seed);
    if recs.is_empty() {
        warn!("Seed title not found in this catalog");
    }
    for (i, rec) in recs.iter().enumerate() {
        info!("{}. {} (id {}) - est {:.2}", i + 1, rec.title, rec.movie_id, rec.score);
    }

    info!("Top Drama chart:");
    for (i, row) in engine.top_by_genre("Drama")?.iter().enumerate() {
        info!(
            "{}. {} - wr {:.3} ({} votes)",
            i + 1,
            row.title,
            row.weighted_rating.unwrap_or_default(),
            row.vote_count
        );
    }

    info!("Top Tom Hanks chart:");
    match engine.top_by_actor("Tom Hanks") {
        Ok(chart) => {
            for (i, row) in chart.iter().enumerate() {
                info!("{}. {} ({} votes)", i + 1, row.title, row.vote_count);
            }
        }
        Err(e) => warn!("{}", e),
    }

    Ok(())
}
