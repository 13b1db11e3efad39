//! HTML fragments that htmx swaps into the dashboard.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use itertools::Itertools;
use maud::{html, Markup};

use super::api::today;
use crate::{
    assets,
    dashboard::{shiny::ShinyReveal, PageId},
    model::{
        encounter::{self, Encounter},
        species::Species,
        stats::{self, wire_date},
    },
    view, AppError, AppStateRef,
};

pub fn router() -> Router<AppStateRef> {
    Router::new()
        .route("/leaderboard", get(leaderboard))
        .route("/leaderboard/sort/{column}", post(sort_leaderboard))
        .route("/leaderboard/toggle", post(toggle_leaderboard))
        .route("/last10", get(last10))
        .route("/last10/toggle", post(toggle_last10))
        .route("/locations", get(locations))
        .route("/stat/{kind}", get(stat))
        .route("/pokemon/{name}", get(pokemon))
}

/// A failed widget shows its own error text and leaves the rest of the page
/// alone.
pub struct WidgetError(AppError);

impl<E: Into<AppError>> From<E> for WidgetError {
    fn from(value: E) -> Self {
        WidgetError(value.into())
    }
}

impl IntoResponse for WidgetError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        let body = match &self.0 {
            AppError::SessionExpired => html! {
                span class="text-sm text-red-600" { (self.0.user_msg()) }
            },
            _ => view::widgets::load_error(),
        };

        // logs the cause
        let _ = self.0.into_response();

        (status, body).into_response()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatKind {
    Total,
    Unique,
    AverageBst,
    LowestBst,
    CurrentStreak,
    LongestStreak,
    MaxRuns,
}

impl StatKind {
    pub const ALL: [StatKind; 7] = [
        StatKind::Total,
        StatKind::Unique,
        StatKind::AverageBst,
        StatKind::LowestBst,
        StatKind::CurrentStreak,
        StatKind::LongestStreak,
        StatKind::MaxRuns,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            StatKind::Total => "total",
            StatKind::Unique => "unique",
            StatKind::AverageBst => "average-bst",
            StatKind::LowestBst => "lowest-bst",
            StatKind::CurrentStreak => "current-streak",
            StatKind::LongestStreak => "longest-streak",
            StatKind::MaxRuns => "max-runs",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatKind::Total => "Total Pokemon",
            StatKind::Unique => "Unique Pokemon",
            StatKind::AverageBst => "Average BST",
            StatKind::LowestBst => "Lowest BST",
            StatKind::CurrentStreak => "Current Streak",
            StatKind::LongestStreak => "Longest Streak",
            StatKind::MaxRuns => "Max Runs / Day",
        }
    }

    pub fn text(self, encounters: &[Encounter], species: &Species, today: NaiveDate) -> String {
        match self {
            StatKind::Total => stats::total_pokemon(encounters).to_string(),
            StatKind::Unique => stats::unique_pokemon(encounters).to_string(),
            StatKind::AverageBst => stats::average_bst(encounters, species).to_string(),
            StatKind::LowestBst => stats::lowest_bst(encounters, species).to_string(),
            StatKind::CurrentStreak => days(stats::current_streak(encounters, today)),
            StatKind::LongestStreak => {
                let streak = stats::longest_streak(encounters);
                match (streak.start_date, streak.end_date) {
                    (Some(start), Some(end)) => format!(
                        "{} ({} - {})",
                        days(streak.longest_streak),
                        wire_date::format(start),
                        wire_date::format(end)
                    ),
                    _ => days(streak.longest_streak),
                }
            }
            StatKind::MaxRuns => {
                let max = stats::max_runs_per_day(encounters);
                if max.dates.is_empty() {
                    max.max_runs.to_string()
                } else {
                    format!("{} ({})", max.max_runs, max.dates.iter().join(", "))
                }
            }
        }
    }
}

fn days(n: u32) -> String {
    if n == 1 {
        "1 day".to_string()
    } else {
        format!("{n} days")
    }
}

fn with_reveal(content: Markup, reveal: Option<ShinyReveal>, volume: f32) -> Markup {
    html! {
        (content)
        @if let Some(reveal) = reveal {
            (view::widgets::shiny_reveal(&reveal, volume))
        }
    }
}

async fn leaderboard(
    State(state): State<AppStateRef>,
    page: PageId,
) -> Result<Markup, WidgetError> {
    let encounters = encounter::all(&state.pool).await?;
    let entries = stats::leaderboard(&encounters, &state.species, today());
    let odds = state.shiny_odds();

    let (table, reveal) = state
        .sessions
        .with_session(&page, |session| {
            let reveal = session.load_leaderboard(
                entries,
                odds,
                &state.config.game,
                &mut rand::thread_rng(),
            );
            let table = view::widgets::leaderboard(
                &session.leaderboard,
                session.toggles.leaderboard,
                session.features,
            );
            (table, reveal)
        })
        .await?;

    Ok(with_reveal(table, reveal, state.config.volume()))
}

async fn sort_leaderboard(
    State(state): State<AppStateRef>,
    page: PageId,
    Path(column): Path<usize>,
) -> Result<Markup, WidgetError> {
    let table = state
        .sessions
        .with_session(&page, |session| {
            session.leaderboard.sort_by_column(column)?;
            Ok::<_, AppError>(view::widgets::leaderboard(
                &session.leaderboard,
                session.toggles.leaderboard,
                session.features,
            ))
        })
        .await??;

    Ok(table)
}

async fn toggle_leaderboard(
    State(state): State<AppStateRef>,
    page: PageId,
) -> Result<Markup, WidgetError> {
    let encounters = encounter::all(&state.pool).await?;
    let entries = stats::leaderboard(&encounters, &state.species, today());

    let cells = state
        .sessions
        .with_session(&page, |session| {
            let metric = session.toggles.flip_leaderboard();
            session.leaderboard.refresh_since_last(&entries);
            view::widgets::leaderboard_metric(&session.leaderboard, metric)
        })
        .await?;

    Ok(cells)
}

async fn last10(State(state): State<AppStateRef>, page: PageId) -> Result<Markup, WidgetError> {
    let entries = stats::last10(&encounter::all(&state.pool).await?);
    let odds = state.shiny_odds();

    let (table, reveal) = state
        .sessions
        .with_session(&page, |session| {
            let reveal =
                session.load_recent(entries, odds, &state.config.game, &mut rand::thread_rng());
            let table =
                view::widgets::recent(&session.recent, session.toggles.recent, session.features);
            (table, reveal)
        })
        .await?;

    Ok(with_reveal(table, reveal, state.config.volume()))
}

async fn toggle_last10(
    State(state): State<AppStateRef>,
    page: PageId,
) -> Result<Markup, WidgetError> {
    let entries = stats::last10(&encounter::all(&state.pool).await?);

    let cells = state
        .sessions
        .with_session(&page, |session| {
            let metric = session.toggles.flip_recent();
            session.recent.refresh_since_last(&entries);
            view::widgets::recent_metric(&session.recent, metric)
        })
        .await?;

    Ok(cells)
}

async fn locations(State(state): State<AppStateRef>) -> Result<Markup, WidgetError> {
    let encounters = encounter::all(&state.pool).await?;
    Ok(view::widgets::locations(&stats::location_percentages(
        &encounters,
    )))
}

async fn stat(
    State(state): State<AppStateRef>,
    Path(kind): Path<StatKind>,
) -> Result<Markup, WidgetError> {
    let encounters = encounter::all(&state.pool).await?;
    Ok(view::widgets::stat(&kind.text(
        &encounters,
        &state.species,
        today(),
    )))
}

async fn pokemon(
    State(state): State<AppStateRef>,
    Path(name): Path<String>,
) -> Result<Markup, WidgetError> {
    if !state.config.details_modal {
        return Err(AppError::NotFound("Details are turned off".into()).into());
    }

    let encounters = encounter::all(&state.pool).await?;
    let details = stats::pokemon_entries(&encounters, &name);
    let name = state.species.canonical(&name).unwrap_or(&name);
    let gif = assets::gif_url(&state.config.game, name, false);

    Ok(view::details::m(name, &gif, &details))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn log() -> Vec<Encounter> {
        [(1, "Pikachu", 3), (2, "Gengar", 4), (3, "Pikachu", 4), (4, "Abra", 5)]
            .into_iter()
            .map(|(id, pokemon, day)| Encounter {
                id,
                pokemon: pokemon.into(),
                location: "Route 1".into(),
                date: date(day),
                notes: String::new(),
            })
            .collect()
    }

    #[test]
    fn slugs_match_serde_names() {
        for kind in StatKind::ALL {
            let parsed: StatKind =
                serde_json::from_value(serde_json::Value::String(kind.slug().into())).unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn stat_texts() {
        let species: Species = [
            ("Pikachu".to_string(), 320),
            ("Gengar".to_string(), 500),
            ("Abra".to_string(), 310),
        ]
        .into_iter()
        .collect();
        let log = log();
        let text = |kind: StatKind| kind.text(&log, &species, date(6));

        assert_eq!(text(StatKind::Total), "4");
        assert_eq!(text(StatKind::Unique), "3");
        assert_eq!(text(StatKind::LowestBst), "310");
        assert_eq!(text(StatKind::CurrentStreak), "3 days");
        assert_eq!(text(StatKind::LongestStreak), "3 days (5/3/2024 - 5/5/2024)");
        assert_eq!(text(StatKind::MaxRuns), "2 (5/4/2024)");
    }

    #[test]
    fn empty_log_texts() {
        let species = Species::default();
        let text = |kind: StatKind| kind.text(&[], &species, date(6));

        assert_eq!(text(StatKind::Total), "0");
        assert_eq!(text(StatKind::LongestStreak), "0 days");
        assert_eq!(text(StatKind::CurrentStreak), "0 days");
    }
}
