use std::collections::HashMap;

use chrono::NaiveDate;
use rand::Rng;

use super::{
    shiny::{GifChoice, ShinyDraw},
    sort::{self, ColumnKind, Direction, SortState},
    toggle::SinceLast,
};
use crate::{
    model::stats::{LeaderboardEntry, RecentEntry},
    AppError,
};

/// A rendered leaderboard row with its typed values.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardRow {
    /// Position in the order the rows were loaded, starting at 1.
    pub rank: u32,
    pub name: String,
    pub bst: u32,
    pub count: u32,
    pub last_ran: NaiveDate,
    pub since_last: SinceLast,
    pub gif: GifChoice,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecentRow {
    pub name: String,
    pub date: NaiveDate,
    pub location: String,
    pub since_last: SinceLast,
    pub gif: GifChoice,
}

#[derive(Debug, Clone)]
pub struct LeaderboardView {
    pub columns: Vec<ColumnKind>,
    pub sort: SortState,
    pub rows: Vec<LeaderboardRow>,
}

impl LeaderboardView {
    pub fn new(columns: Vec<ColumnKind>) -> Self {
        let sort = SortState::new(columns.len());
        Self {
            columns,
            sort,
            rows: Vec::new(),
        }
    }

    /// Replaces every row with freshly loaded data in server order. The
    /// stored sort flags survive, the header indicator does not.
    pub fn replace_rows<R: Rng + ?Sized>(
        &mut self,
        entries: Vec<LeaderboardEntry>,
        draw: &mut ShinyDraw<'_, R>,
    ) {
        self.rows = entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| LeaderboardRow {
                rank: i as u32 + 1,
                since_last: SinceLast::new(entry.runs_since_last, &entry.time_since_last),
                gif: draw.gif(&entry.pokemon),
                name: entry.pokemon,
                bst: entry.bst,
                count: entry.count,
                last_ran: entry.last_ran,
            })
            .collect();
        self.sort.clear_indicator();
    }

    /// Handles a click on the header of `column`. Returns `None` when the
    /// column is not sortable.
    pub fn sort_by_column(&mut self, column: usize) -> Result<Option<Direction>, AppError> {
        let kind = *self
            .columns
            .get(column)
            .ok_or_else(|| AppError::Input(format!("No leaderboard column {column}")))?;

        if !kind.is_sortable() {
            return Ok(None);
        }

        let direction = self
            .sort
            .flip(column)
            .ok_or_else(|| AppError::Input(format!("No leaderboard column {column}")))?;
        sort::sort_rows(&mut self.rows, kind, direction);
        tracing::debug!(column, ?kind, ?direction, "Sorted leaderboard");
        Ok(Some(direction))
    }

    /// Updates only the since-last values, matching rows by name. Row order
    /// and every other value are left alone.
    pub fn refresh_since_last(&mut self, entries: &[LeaderboardEntry]) {
        let fresh: HashMap<&str, &LeaderboardEntry> = entries
            .iter()
            .map(|entry| (entry.pokemon.as_str(), entry))
            .collect();

        for row in &mut self.rows {
            row.since_last = fresh
                .get(row.name.as_str())
                .map(|entry| SinceLast::new(entry.runs_since_last, &entry.time_since_last))
                .unwrap_or_default();
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecentView {
    pub rows: Vec<RecentRow>,
}

impl RecentView {
    pub fn replace_rows<R: Rng + ?Sized>(
        &mut self,
        entries: Vec<RecentEntry>,
        draw: &mut ShinyDraw<'_, R>,
    ) {
        self.rows = entries
            .into_iter()
            .map(|entry| RecentRow {
                since_last: SinceLast::new(entry.runs_since_last, &entry.time_since_last),
                gif: draw.gif(&entry.pokemon),
                name: entry.pokemon,
                date: entry.date,
                location: entry.location,
            })
            .collect();
    }

    /// Updates only the since-last values, matching rows by position.
    pub fn refresh_since_last(&mut self, entries: &[RecentEntry]) {
        for (i, row) in self.rows.iter_mut().enumerate() {
            row.since_last = entries
                .get(i)
                .map(|entry| SinceLast::new(entry.runs_since_last, &entry.time_since_last))
                .unwrap_or_default();
        }
    }
}
