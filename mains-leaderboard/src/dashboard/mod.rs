//! Per-page-load UI state.
//!
//! Every `GET /` opens a fresh [`DashboardSession`] under a random page id.
//! The page sends that id back on each widget request, so toggles, sort
//! flags and the shiny gate live exactly as long as the page does.

use std::{
    collections::HashMap,
    fmt,
    time::{Duration, Instant},
};

use axum::{extract::FromRequestParts, http::request::Parts};
use rand::Rng;
use tokio::sync::Mutex;

use crate::{
    model::stats::{LeaderboardEntry, RecentEntry},
    AppError,
};

pub mod rows;
pub mod shiny;
pub mod sort;
pub mod toggle;

use rows::{LeaderboardView, RecentView};
use shiny::{ShinyDraw, ShinyGate, ShinyOdds, ShinyReveal};
use toggle::ToggleState;

pub const SESSION_HEADER: &str = "x-dashboard-session";

/// Optional pieces of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Features {
    pub show_bst: bool,
    pub details_modal: bool,
    pub since_last_toggle: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            show_bst: true,
            details_modal: true,
            since_last_toggle: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageId(String);

impl PageId {
    fn generate() -> Self {
        Self(format!("{:032x}", rand::thread_rng().gen::<u128>()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for PageId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(|value| PageId(value.to_string()))
            .ok_or(AppError::SessionExpired)
    }
}

#[derive(Debug)]
pub struct DashboardSession {
    pub features: Features,
    pub toggles: ToggleState,
    pub leaderboard: LeaderboardView,
    pub recent: RecentView,
    pub shiny: ShinyGate,
    last_seen: Instant,
}

impl DashboardSession {
    pub fn new(features: Features) -> Self {
        Self {
            features,
            toggles: ToggleState::default(),
            leaderboard: LeaderboardView::new(sort::columns(&features)),
            recent: RecentView::default(),
            shiny: ShinyGate::default(),
            last_seen: Instant::now(),
        }
    }

    pub fn load_leaderboard<R: Rng + ?Sized>(
        &mut self,
        entries: Vec<LeaderboardEntry>,
        odds: ShinyOdds,
        game: &str,
        rng: &mut R,
    ) -> Option<ShinyReveal> {
        let mut draw = ShinyDraw::new(odds, game, &mut self.shiny, rng);
        self.leaderboard.replace_rows(entries, &mut draw);
        draw.finish()
    }

    pub fn load_recent<R: Rng + ?Sized>(
        &mut self,
        entries: Vec<RecentEntry>,
        odds: ShinyOdds,
        game: &str,
        rng: &mut R,
    ) -> Option<ShinyReveal> {
        let mut draw = ShinyDraw::new(odds, game, &mut self.shiny, rng);
        self.recent.replace_rows(entries, &mut draw);
        draw.finish()
    }
}

/// All open page sessions. Each access holds the lock for the whole
/// mutation, so concurrent widget requests never lose each other's updates.
pub struct SessionRegistry {
    sessions: Mutex<HashMap<PageId, DashboardSession>>,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Starts a session for a new page load, evicting idle ones first.
    pub async fn open(&self, features: Features) -> PageId {
        let mut sessions = self.sessions.lock().await;

        let before = sessions.len();
        sessions.retain(|_, session| session.last_seen.elapsed() < self.ttl);
        if sessions.len() < before {
            tracing::debug!(evicted = before - sessions.len(), "Evicted idle dashboard sessions");
        }

        let id = PageId::generate();
        sessions.insert(id.clone(), DashboardSession::new(features));
        id
    }

    pub async fn with_session<T>(
        &self,
        id: &PageId,
        f: impl FnOnce(&mut DashboardSession) -> T,
    ) -> Result<T, AppError> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .get_mut(id)
            .filter(|session| session.last_seen.elapsed() < self.ttl)
            .ok_or(AppError::SessionExpired)?;

        session.last_seen = Instant::now();
        Ok(f(session))
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
