use axum::{extract::State, http::StatusCode, response::IntoResponse, Form};
use chrono::NaiveDate;

use crate::{
    model::{
        encounter::{self, NewEncounter},
        species::Species,
    },
    AppError, AppNotification, AppStateRef,
};

/// Widgets listen for this event and reload themselves.
pub const ENTRY_ADDED: &str = "entry-added";

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct EntryForm {
    pub pokemon: String,
    pub location: String,
    pub date: String,
    pub notes: String,
}

/// Checks a submitted entry before anything is written.
pub fn validate(form: EntryForm, species: &Species) -> Result<NewEncounter, AppError> {
    let pokemon = form.pokemon.trim();
    if pokemon.is_empty() {
        return Err(AppError::Input("Please enter a Pokemon.".into()));
    }

    let pokemon = species
        .canonical(pokemon)
        .ok_or_else(|| AppError::Input("Invalid Pokemon Entered".into()))?;

    let location = form.location.trim();
    if location.is_empty() {
        return Err(AppError::Input("Please enter a location.".into()));
    }

    let date = NaiveDate::parse_from_str(form.date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Input("Please enter a valid date.".into()))?;

    Ok(NewEncounter {
        pokemon: pokemon.to_string(),
        location: location.to_string(),
        date,
        notes: form.notes.trim().to_string(),
    })
}

pub async fn submit(
    State(state): State<AppStateRef>,
    Form(form): Form<EntryForm>,
) -> Result<impl IntoResponse, AppNotification> {
    let new_encounter = validate(form, &state.species)?;
    let saved = encounter::insert(&new_encounter, &state.pool)
        .await
        .map_err(AppError::from)?;

    tracing::info!(pokemon = %saved.pokemon, location = %saved.location, "Entry added");

    Ok((
        [("HX-Trigger", ENTRY_ADDED)],
        AppNotification(StatusCode::OK, "Entry added successfully.".into()),
    ))
}
