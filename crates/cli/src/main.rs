use anyhow::{Context, Result};
use catalog::{MovieId, UserId};
use clap::{Parser, Subcommand};
use colored::Colorize;
use server::{EngineError, RecommendationEngine, TmdbPosterClient, load_artifacts};
use std::path::PathBuf;
use std::time::Instant;

/// FlickPick - Hybrid movie recommendation engine
#[derive(Parser)]
#[command(name = "flickpick")]
#[command(about = "Movie recommendations and weighted-rating charts", long_about = None)]
struct Cli {
    /// Path to the model artifact directory
    #[arg(short, long, default_value = "model")]
    model_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hybrid recommendations for a user, seeded on a movie they like
    Recommend {
        /// User ID to personalize for
        #[arg(long)]
        user_id: UserId,

        /// Seed movie title
        #[arg(long)]
        title: String,

        /// Fetch poster URLs from TMDB (requires TMDB_API_KEY)
        #[arg(long)]
        posters: bool,
    },

    /// Movies most content-similar to a given movie id
    Similar {
        #[arg(long)]
        movie_id: MovieId,

        /// Number of results to return
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Top movies of a genre by weighted rating
    TopGenre {
        #[arg(long)]
        genre: String,
    },

    /// Most-voted movies featuring an actor
    TopActor {
        #[arg(long)]
        name: String,
    },

    /// Most-voted movies by a director (loose name match)
    TopDirector {
        #[arg(long)]
        name: String,
    },

    /// Most popular movies right now
    Trending {
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Add an in-memory review for a movie
    ReviewAdd {
        #[arg(long)]
        movie_id: MovieId,

        /// Star rating, 1 to 5
        #[arg(long)]
        rating: u8,

        #[arg(long, default_value = "")]
        text: String,
    },

    /// List the in-memory reviews for a movie
    ReviewList {
        #[arg(long)]
        movie_id: MovieId,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Load the oracles (this may take a moment)
    println!("Loading model artifacts from {}...", cli.model_dir.display());
    let start = Instant::now();
    let (catalog, similarity, predictor) =
        load_artifacts(&cli.model_dir).context("Failed to load model artifacts")?;
    let engine = RecommendationEngine::new(catalog, similarity, predictor)
        .context("Failed to construct engine")?
        .with_snapshot_dir(cli.model_dir.join("charts"));
    println!("{} Loaded oracles in {:?}", "✓".green(), start.elapsed());

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend {
            user_id,
            title,
            posters,
        } => handle_recommend(&engine, user_id, &title, posters).await,
        Commands::Similar { movie_id, limit } => handle_similar(&engine, movie_id, limit),
        Commands::TopGenre { genre } => handle_chart(engine.top_by_genre(&genre), &genre),
        Commands::TopActor { name } => handle_chart(engine.top_by_actor(&name), &name),
        Commands::TopDirector { name } => handle_chart(engine.top_by_director(&name), &name),
        Commands::Trending { limit } => {
            print_chart(&engine.trending(limit));
            Ok(())
        }
        Commands::ReviewAdd {
            movie_id,
            rating,
            text,
        } => handle_review_add(&engine, movie_id, rating, &text),
        Commands::ReviewList { movie_id } => {
            let reviews = engine.reviews().list(movie_id);
            if reviews.is_empty() {
                println!("No reviews for movie {} yet", movie_id);
            }
            for review in reviews {
                println!("#{} {}: {}", review.id, stars(review.rating), review.text);
            }
            Ok(())
        }
    }
}

/// Handle the 'recommend' command
async fn handle_recommend(
    engine: &RecommendationEngine,
    user_id: UserId,
    title: &str,
    posters: bool,
) -> Result<()> {
    let recs = engine.recommend(user_id, title);
    if recs.is_empty() {
        println!("{} No recommendations: {:?} is not in the catalog", "✗".red(), title);
        return Ok(());
    }

    let poster_client = if posters {
        let client = TmdbPosterClient::from_env();
        if client.is_none() {
            println!("{}", "TMDB_API_KEY not set, skipping posters".yellow());
        }
        client
    } else {
        None
    };

    println!(
        "\nBecause user {} liked {}:",
        user_id,
        title.bold()
    );
    for (i, rec) in recs.iter().enumerate() {
        println!(
            "{:2}. {} (id {}) - predicted {:.2}",
            i + 1,
            rec.title.bold(),
            rec.movie_id,
            rec.score
        );
        if let Some(client) = &poster_client {
            match client.poster_url(rec.movie_id).await {
                Some(url) => println!("    {}", url.dimmed()),
                None => println!("    {}", "no poster".dimmed()),
            }
        }
    }
    Ok(())
}

/// Handle the 'similar' command
fn handle_similar(engine: &RecommendationEngine, movie_id: MovieId, limit: usize) -> Result<()> {
    match engine.similar(movie_id, limit) {
        Ok(similar) => {
            for (i, rec) in similar.iter().enumerate() {
                println!(
                    "{:2}. {} (id {}) - similarity {:.3}",
                    i + 1,
                    rec.title.bold(),
                    rec.movie_id,
                    rec.score
                );
            }
            Ok(())
        }
        Err(EngineError::NotFound { .. }) => {
            println!("{} Movie id {} is not in the catalog", "✗".red(), movie_id);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Print a chart result, reporting NotFound as a message rather than a failure
fn handle_chart(result: server::Result<charts::Chart>, query: &str) -> Result<()> {
    match result {
        Ok(chart) if chart.is_empty() => {
            println!("{} Nothing charted for {:?}", "✗".yellow(), query);
            Ok(())
        }
        Ok(chart) => {
            print_chart(&chart);
            Ok(())
        }
        Err(EngineError::NotFound { kind, query }) => {
            println!("{} No movies found for {} {:?}", "✗".red(), kind, query);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn print_chart(chart: &charts::Chart) {
    for (i, row) in chart.iter().enumerate() {
        let detail = match row.weighted_rating {
            Some(wr) => format!("wr {:.3}", wr),
            None => format!("{} votes", row.vote_count),
        };
        println!(
            "{:2}. {} ({}) - {}",
            i + 1,
            row.title.bold(),
            row.year.map(|y| y.to_string()).unwrap_or_else(|| "????".to_string()),
            detail
        );
    }
}

/// Handle the 'review-add' command
fn handle_review_add(
    engine: &RecommendationEngine,
    movie_id: MovieId,
    rating: u8,
    text: &str,
) -> Result<()> {
    match engine.reviews().append(movie_id, rating, text) {
        Ok(review) => {
            println!(
                "{} Review #{} recorded for movie {} ({})",
                "✓".green(),
                review.id,
                movie_id,
                stars(review.rating)
            );
            Ok(())
        }
        Err(EngineError::InvalidInput { reason, .. }) => {
            println!("{} {}", "✗".red(), reason);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn stars(rating: u8) -> String {
    "★".repeat(rating as usize)
}
