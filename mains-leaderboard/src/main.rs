use std::path::PathBuf;

use mains_leaderboard::{config, model, AppState};
use sqlx::sqlite::SqlitePoolOptions;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config_file: PathBuf = std::env::var("CONFIG_FILE")
        .unwrap_or_else(|_| "config.json".into())
        .into();
    let config = config::load(&config_file).expect("Could not load config");

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://pokemon_usage.db?mode=rwc".into());

    let pool = SqlitePoolOptions::new()
        .connect(&database_url)
        .await
        .expect("Could not make pool.");
    model::encounter::prepare(&pool, config.legacy_csv.as_deref())
        .await
        .expect("Could not prepare database");

    let species = model::species::Species::load(config.species_file.as_deref())
        .expect("Could not load species table");

    let port = config.port;
    let static_dir = config.static_dir.clone();
    let state = AppState::new(pool, config, species);

    let app = mains_leaderboard::router(&static_dir)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(&*Box::leak(Box::new(state)));

    println!();
    println!("Starting server at http://localhost:{port}");
    println!("Serving static files from {}", static_dir.display());
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .unwrap_or_else(|_| panic!("Failed to bind to address 0.0.0.0:{port}"));
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
