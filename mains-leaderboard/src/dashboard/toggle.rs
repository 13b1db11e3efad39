use crate::model::stats::RunsSince;

/// Which of the two "since last ran" representations a table shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metric {
    #[default]
    Runs,
    Time,
}

impl Metric {
    pub fn flip(self) -> Self {
        match self {
            Metric::Runs => Metric::Time,
            Metric::Time => Metric::Runs,
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            Metric::Runs => "Runs Since Last Ran",
            Metric::Time => "Time Since Last Ran",
        }
    }
}

/// Independent metric choice for the leaderboard and the recent list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToggleState {
    pub leaderboard: Metric,
    pub recent: Metric,
}

impl ToggleState {
    pub fn flip_leaderboard(&mut self) -> Metric {
        self.leaderboard = self.leaderboard.flip();
        self.leaderboard
    }

    pub fn flip_recent(&mut self) -> Metric {
        self.recent = self.recent.flip();
        self.recent
    }
}

/// Both precomputed metrics for one row. A missing value renders as "".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SinceLast {
    pub runs: Option<String>,
    pub time: Option<String>,
}

impl SinceLast {
    pub fn new(runs: RunsSince, time: &str) -> Self {
        Self {
            runs: Some(runs.to_string()),
            time: Some(time.to_string()),
        }
    }

    pub fn text(&self, metric: Metric) -> &str {
        match metric {
            Metric::Runs => self.runs.as_deref().unwrap_or(""),
            Metric::Time => self.time.as_deref().unwrap_or(""),
        }
    }
}
