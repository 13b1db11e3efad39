use std::path::Path;

use {
    crate::controllers::*,
    axum::{
        http::StatusCode,
        response::IntoResponse,
        routing::{get, post},
        Router,
    },
    tower_http::services::ServeDir,
};

pub mod assets;
pub mod config;
pub mod dashboard;

pub mod controllers {
    pub mod api;
    pub mod entry;
    pub mod home;
    pub mod widgets;
}

pub mod model {
    pub mod encounter;
    pub mod species;
    pub mod stats;
}

pub mod view;

pub type AppStateRef = &'static AppState;

pub struct AppState {
    pub pool: sqlx::SqlitePool,
    pub config: config::Config,
    pub species: model::species::Species,
    pub sessions: dashboard::SessionRegistry,
}

impl AppState {
    pub fn new(
        pool: sqlx::SqlitePool,
        config: config::Config,
        species: model::species::Species,
    ) -> Self {
        let sessions = dashboard::SessionRegistry::new(config.session_ttl());
        Self {
            pool,
            config,
            species,
            sessions,
        }
    }

    pub fn shiny_odds(&self) -> dashboard::shiny::ShinyOdds {
        dashboard::shiny::ShinyOdds::new(
            self.config.shiny_odds,
            assets::shiny_gifs_exist(&self.config.static_dir, &self.config.game),
        )
    }
}

pub fn router(static_dir: &Path) -> Router<AppStateRef> {
    let api_routes = Router::new()
        .route("/config", get(api::config))
        .route("/leaderboard", get(api::leaderboard))
        .route("/last10", get(api::last10))
        .route("/location_percentages", get(api::location_percentages))
        .route("/current_streak", get(api::current_streak))
        .route("/play_streak", get(api::play_streak))
        .route("/longest_streak", get(api::longest_streak))
        .route("/max_runs_per_day", get(api::max_runs_per_day))
        .route("/total_pokemon", get(api::total_pokemon))
        .route("/unique_pokemon", get(api::unique_pokemon))
        .route("/average_bst", get(api::average_bst))
        .route("/lowest_bst", get(api::lowest_bst))
        .route("/bst", get(api::species_list))
        .route("/pokemon_entries/{name}", get(api::pokemon_entries))
        .route("/last_pokemon", get(api::last_pokemon))
        .route("/add_entry", post(api::add_entry));

    Router::new()
        .merge(home::router())
        .merge(api_routes)
        .route("/entry", post(entry::submit))
        .nest("/widgets", widgets::router())
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(get((StatusCode::NOT_FOUND, "Could not find your route")))
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database Error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Migration Error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),
    #[error("{0}")]
    Input(String),
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("This page has expired. Reload to continue.")]
    SessionExpired,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Sqlx(_)
            | AppError::Migrate(_)
            | AppError::Io(_)
            | AppError::Json(_)
            | AppError::Csv(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Input(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::SessionExpired => StatusCode::GONE,
        }
    }

    /// The text that is safe to show in the page.
    pub fn user_msg(&self) -> String {
        let status = self.status_code();
        if status.is_server_error() {
            "Our Fault! Please Try Again.".to_string()
        } else {
            self.to_string()
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{status}: {self}");
        } else {
            tracing::info!("{status}: {self}");
        }

        (status, self.user_msg()).into_response()
    }
}

/// Inline message for htmx forms. Always lands in `#message`.
pub struct AppNotification(pub StatusCode, pub String);

impl IntoResponse for AppNotification {
    fn into_response(self) -> axum::response::Response {
        (
            self.0,
            [("HX-Retarget", "#message"), ("HX-Reswap", "outerHTML")],
            maud::html! {
                @if self.0.is_success() {
                    p #message class="mt-2 text-sm text-green-600" { (self.1) }
                } @else if self.0.is_server_error() {
                    p #message class="mt-2 text-sm text-red-600" { "Error adding new entry." }
                } @else {
                    p #message class="mt-2 text-sm text-red-600" { (self.1) }
                }
            },
        )
            .into_response()
    }
}

impl From<AppError> for AppNotification {
    fn from(value: AppError) -> Self {
        let status = value.status_code();
        let text = value.user_msg();

        // logs the cause
        let _ = value.into_response();

        AppNotification(status, text)
    }
}
