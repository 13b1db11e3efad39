//! The JSON endpoints. Every aggregate is recomputed from the full log on
//! each request.

use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde_json::{json, Value};

use super::entry::{self, EntryForm};
use crate::{
    assets,
    model::{
        encounter::{self, Encounter},
        species::SpeciesBst,
        stats::{
            self, LeaderboardEntry, LocationShare, LongestStreak, MaxRunsPerDay, PokemonEntries,
            RecentEntry,
        },
    },
    AppError, AppStateRef,
};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

async fn encounters(state: AppStateRef) -> Result<Vec<Encounter>, AppError> {
    Ok(encounter::all(&state.pool).await?)
}

pub async fn config(State(state): State<AppStateRef>) -> Json<Value> {
    let config = &state.config;
    Json(json!({
        "title": config.title,
        "port": config.port,
        "shiny_odds": state.shiny_odds().one_in(),
        "volume": config.volume(),
        "game": config.game,
        "shiny_gifs_exists": assets::shiny_gifs_exist(&config.static_dir, &config.game),
    }))
}

pub async fn leaderboard(
    State(state): State<AppStateRef>,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    let encounters = encounters(state).await?;
    Ok(Json(stats::leaderboard(&encounters, &state.species, today())))
}

pub async fn last10(State(state): State<AppStateRef>) -> Result<Json<Vec<RecentEntry>>, AppError> {
    Ok(Json(stats::last10(&encounters(state).await?)))
}

pub async fn location_percentages(
    State(state): State<AppStateRef>,
) -> Result<Json<Vec<LocationShare>>, AppError> {
    Ok(Json(stats::location_percentages(&encounters(state).await?)))
}

pub async fn current_streak(State(state): State<AppStateRef>) -> Result<Json<Value>, AppError> {
    let streak = stats::current_streak(&encounters(state).await?, today());
    Ok(Json(json!({ "current_streak": streak })))
}

pub async fn play_streak(State(state): State<AppStateRef>) -> Result<Json<Value>, AppError> {
    let streak = stats::current_streak(&encounters(state).await?, today());
    Ok(Json(json!({ "play_streak": streak })))
}

pub async fn longest_streak(
    State(state): State<AppStateRef>,
) -> Result<Json<LongestStreak>, AppError> {
    Ok(Json(stats::longest_streak(&encounters(state).await?)))
}

pub async fn max_runs_per_day(
    State(state): State<AppStateRef>,
) -> Result<Json<MaxRunsPerDay>, AppError> {
    Ok(Json(stats::max_runs_per_day(&encounters(state).await?)))
}

pub async fn total_pokemon(State(state): State<AppStateRef>) -> Result<Json<Value>, AppError> {
    let total = stats::total_pokemon(&encounters(state).await?);
    Ok(Json(json!({ "total_pokemon": total })))
}

pub async fn unique_pokemon(State(state): State<AppStateRef>) -> Result<Json<Value>, AppError> {
    let unique = stats::unique_pokemon(&encounters(state).await?);
    Ok(Json(json!({ "unique_pokemon": unique })))
}

pub async fn average_bst(State(state): State<AppStateRef>) -> Result<Json<Value>, AppError> {
    let average = stats::average_bst(&encounters(state).await?, &state.species);
    Ok(Json(json!({ "average_bst": average })))
}

pub async fn lowest_bst(State(state): State<AppStateRef>) -> Result<Json<Value>, AppError> {
    let lowest = stats::lowest_bst(&encounters(state).await?, &state.species);
    Ok(Json(json!({ "lowest_bst": lowest })))
}

pub async fn species_list(State(state): State<AppStateRef>) -> Json<Vec<SpeciesBst>> {
    Json(state.species.list())
}

pub async fn pokemon_entries(
    State(state): State<AppStateRef>,
    Path(name): Path<String>,
) -> Result<Json<PokemonEntries>, AppError> {
    Ok(Json(stats::pokemon_entries(&encounters(state).await?, &name)))
}

/// The GIF of the most recent encounter.
pub async fn last_pokemon(State(state): State<AppStateRef>) -> Result<Response, AppError> {
    let latest = encounter::latest(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("No entries found".into()))?;

    let path = assets::gif_file(&state.config.static_dir, &state.config.game, &latest.pokemon)
        .ok_or_else(|| AppError::NotFound(format!("No GIF for {}", latest.pokemon)))?;

    let bytes = tokio::fs::read(&path).await?;
    Ok(([(header::CONTENT_TYPE, "image/gif")], bytes).into_response())
}

async fn read_entry_form(mut multipart: Multipart) -> Result<EntryForm, AppError> {
    let mut form = EntryForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Input(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let value = field
            .text()
            .await
            .map_err(|e| AppError::Input(e.body_text()))?;

        match name.as_str() {
            "pokemon" => form.pokemon = value,
            "location" => form.location = value,
            "date" => form.date = value,
            "notes" => form.notes = value,
            other => tracing::debug!(field = other, "Ignoring unknown form field"),
        }
    }

    Ok(form)
}

pub async fn add_entry(State(state): State<AppStateRef>, multipart: Multipart) -> Response {
    let saved = async {
        let form = read_entry_form(multipart).await?;
        let new_encounter = entry::validate(form, &state.species)?;
        Ok::<_, AppError>(encounter::insert(&new_encounter, &state.pool).await?)
    }
    .await;

    match saved {
        Ok(saved) => {
            tracing::info!(pokemon = %saved.pokemon, location = %saved.location, "Entry added");
            Json(json!({ "success": true })).into_response()
        }
        Err(err) => {
            let status = err.status_code();
            if status.is_server_error() {
                tracing::error!("{status}: {err}");
            } else {
                tracing::info!("{status}: {err}");
            }

            (
                status,
                Json(json!({ "success": false, "error": err.user_msg() })),
            )
                .into_response()
        }
    }
}
