use axum::{extract::State, routing::get, Router};

use crate::{controllers::api::today, view, AppStateRef};

pub fn router() -> Router<AppStateRef> {
    Router::new().route("/", get(handler))
}

/// Every page load gets its own dashboard session.
pub async fn handler(State(state): State<AppStateRef>) -> maud::Markup {
    let page_id = state.sessions.open(state.config.features()).await;
    tracing::debug!(%page_id, "Opened dashboard session");

    view::home::m(
        &state.config.title,
        &page_id,
        state.species.names(),
        today(),
    )
}
