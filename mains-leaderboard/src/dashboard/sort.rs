use std::cmp::Ordering;

use super::{rows::LeaderboardRow, Features};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Rank,
    Name,
    Bst,
    Count,
    LastRan,
    SinceLast,
}

impl ColumnKind {
    pub fn label(self) -> &'static str {
        match self {
            ColumnKind::Rank => "Rank",
            ColumnKind::Name => "Pokemon",
            ColumnKind::Bst => "BST",
            ColumnKind::Count => "Count",
            ColumnKind::LastRan => "Last Time Ran",
            ColumnKind::SinceLast => "Since Last Ran",
        }
    }

    /// The since-last column switches metrics instead of sorting.
    pub fn is_sortable(self) -> bool {
        self != ColumnKind::SinceLast
    }

    /// Ascending order for this column.
    pub fn compare(self, a: &LeaderboardRow, b: &LeaderboardRow) -> Ordering {
        match self {
            ColumnKind::Rank => a.rank.cmp(&b.rank),
            ColumnKind::Name => a
                .name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name)),
            ColumnKind::Bst => a.bst.cmp(&b.bst),
            ColumnKind::Count => a.count.cmp(&b.count),
            ColumnKind::LastRan => a.last_ran.cmp(&b.last_ran),
            ColumnKind::SinceLast => Ordering::Equal,
        }
    }
}

/// The leaderboard's columns, left to right.
pub fn columns(features: &Features) -> Vec<ColumnKind> {
    let mut columns = vec![ColumnKind::Rank, ColumnKind::Name];
    if features.show_bst {
        columns.push(ColumnKind::Bst);
    }
    columns.extend([ColumnKind::Count, ColumnKind::LastRan]);
    if features.since_last_toggle {
        columns.push(ColumnKind::SinceLast);
    }
    columns
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    pub fn arrow(self) -> &'static str {
        match self {
            Direction::Ascending => "▲",
            Direction::Descending => "▼",
        }
    }
}

/// One stored direction flag per column plus the header indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    ascending: Vec<bool>,
    indicator: Option<(usize, Direction)>,
}

impl SortState {
    /// Every flag starts unset so the first click on a column sorts it
    /// ascending.
    pub fn new(columns: usize) -> Self {
        Self {
            ascending: vec![false; columns],
            indicator: None,
        }
    }

    /// Flips the stored flag of `column` and moves the indicator onto it.
    /// `None` when there is no such column.
    pub fn flip(&mut self, column: usize) -> Option<Direction> {
        let ascending = self.ascending.get_mut(column)?;
        *ascending = !*ascending;
        let direction = if *ascending {
            Direction::Ascending
        } else {
            Direction::Descending
        };
        self.indicator = Some((column, direction));
        Some(direction)
    }

    pub fn indicator(&self, column: usize) -> Option<Direction> {
        match self.indicator {
            Some((active, direction)) if active == column => Some(direction),
            _ => None,
        }
    }

    pub fn clear_indicator(&mut self) {
        self.indicator = None;
    }

    pub fn is_ascending(&self, column: usize) -> bool {
        self.ascending.get(column).copied().unwrap_or(false)
    }
}

/// Reorders `rows` by `kind`. Ties keep the order the rows were loaded in,
/// whichever way the sort runs.
pub fn sort_rows(rows: &mut [LeaderboardRow], kind: ColumnKind, direction: Direction) {
    rows.sort_by(|a, b| {
        let ordering = kind.compare(a, b);
        let ordering = match direction {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        };
        ordering.then(a.rank.cmp(&b.rank))
    });
}
