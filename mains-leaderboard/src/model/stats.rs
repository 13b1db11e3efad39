//! Aggregates over the encounter log.
//!
//! Everything here is a pure function of the encounters (in insertion order)
//! and, where elapsed time matters, an explicit `today`.

use std::{cmp::Reverse, collections::BTreeSet, fmt};

use chrono::{Datelike, NaiveDate};
use itertools::Itertools;
use serde::{Serialize, Serializer};

use super::{encounter::Encounter, species::Species};

const RECENT_LIMIT: usize = 10;

/// `M/D/YYYY` without leading zeros, the format every endpoint speaks.
pub mod wire_date {
    use chrono::NaiveDate;
    use serde::Serializer;

    pub fn format(date: NaiveDate) -> String {
        date.format("%-m/%-d/%Y").to_string()
    }

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(*date))
    }

    pub mod option {
        use chrono::NaiveDate;
        use serde::Serializer;

        pub fn serialize<S: Serializer>(
            date: &Option<NaiveDate>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => serializer.serialize_str(&super::format(*date)),
                None => serializer.serialize_none(),
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunsSince {
    Runs(u32),
    Never,
}

impl fmt::Display for RunsSince {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunsSince::Runs(runs) => write!(f, "{runs}"),
            RunsSince::Never => f.write_str("Never"),
        }
    }
}

impl Serialize for RunsSince {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    #[serde(rename = "Pokemon")]
    pub pokemon: String,
    #[serde(rename = "BST")]
    pub bst: u32,
    #[serde(rename = "Count")]
    pub count: u32,
    #[serde(rename = "Last Time Ran", with = "wire_date")]
    pub last_ran: NaiveDate,
    #[serde(rename = "Runs Since Last Ran")]
    pub runs_since_last: RunsSince,
    #[serde(rename = "Time Since Last Ran")]
    pub time_since_last: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentEntry {
    #[serde(rename = "Pokemon")]
    pub pokemon: String,
    #[serde(rename = "Date", with = "wire_date")]
    pub date: NaiveDate,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Notes")]
    pub notes: String,
    #[serde(rename = "Runs Since Last Ran")]
    pub runs_since_last: RunsSince,
    #[serde(rename = "Time Since Last Ran")]
    pub time_since_last: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationShare {
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Percentage")]
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongestStreak {
    pub longest_streak: u32,
    #[serde(with = "wire_date::option")]
    pub start_date: Option<NaiveDate>,
    #[serde(with = "wire_date::option")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaxRunsPerDay {
    pub max_runs: u32,
    pub dates: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PokemonEntries {
    pub total_entries: u32,
    pub location_percentages: Vec<LocationCount>,
    pub entries: Vec<EntryDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationCount {
    pub location: String,
    pub count: u32,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryDetail {
    #[serde(rename = "Pokemon")]
    pub pokemon: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Date", with = "wire_date")]
    pub date: NaiveDate,
    #[serde(rename = "Notes")]
    pub notes: String,
}

/// Elapsed calendar time as "2 yrs, 4 mos, 8 days". Argument order does not
/// matter.
pub fn time_since(from: NaiveDate, to: NaiveDate) -> String {
    let (from, to) = if from > to { (to, from) } else { (from, to) };

    if from == to {
        return "0 days".into();
    }

    let mut years = to.year() - from.year();
    let mut months = to.month() as i32 - from.month() as i32;
    let mut days = to.day() as i32 - from.day() as i32;

    if days < 0 {
        months -= 1;
        days += days_in_previous_month(to);
    }

    if months < 0 {
        years -= 1;
        months += 12;
    }

    let parts = [(years, "yr"), (months, "mo"), (days, "day")]
        .into_iter()
        .filter(|(amount, _)| *amount > 0)
        .map(|(amount, unit)| {
            if amount == 1 {
                format!("{amount} {unit}")
            } else {
                format!("{amount} {unit}s")
            }
        })
        .join(", ");

    if parts.is_empty() {
        "0 days".into()
    } else {
        parts
    }
}

fn days_in_previous_month(date: NaiveDate) -> i32 {
    let first_of_month = date.with_day(1).unwrap_or(date);
    first_of_month
        .pred_opt()
        .map(|last_of_previous| last_of_previous.day() as i32)
        .unwrap_or(30)
}

struct Tally<'a> {
    pokemon: &'a str,
    count: u32,
    last: (NaiveDate, i64),
}

pub fn leaderboard(
    encounters: &[Encounter],
    species: &Species,
    today: NaiveDate,
) -> Vec<LeaderboardEntry> {
    let mut tallies: Vec<Tally> = Vec::new();
    for encounter in encounters {
        match tallies.iter_mut().find(|t| t.pokemon == encounter.pokemon) {
            Some(tally) => {
                tally.count += 1;
                tally.last = tally.last.max(encounter.order_key());
            }
            None => tallies.push(Tally {
                pokemon: &encounter.pokemon,
                count: 1,
                last: encounter.order_key(),
            }),
        }
    }

    // stable, so first appearance breaks remaining ties
    tallies.sort_by(|a, b| b.count.cmp(&a.count).then(a.last.0.cmp(&b.last.0)));

    tallies
        .into_iter()
        .map(|tally| {
            let runs = encounters
                .iter()
                .filter(|e| e.order_key() > tally.last)
                .count();

            LeaderboardEntry {
                pokemon: tally.pokemon.to_string(),
                bst: species.bst(tally.pokemon),
                count: tally.count,
                last_ran: tally.last.0,
                runs_since_last: RunsSince::Runs(runs as u32),
                time_since_last: time_since(tally.last.0, today),
            }
        })
        .collect()
}

fn newest_first(encounters: &[Encounter]) -> Vec<&Encounter> {
    encounters
        .iter()
        .sorted_by_key(|e| Reverse(e.order_key()))
        .collect()
}

pub fn last10(encounters: &[Encounter]) -> Vec<RecentEntry> {
    let ordered = newest_first(encounters);

    ordered
        .iter()
        .take(RECENT_LIMIT)
        .map(|entry| {
            let key = entry.order_key();
            let previous = ordered
                .iter()
                .find(|other| other.order_key() < key && other.pokemon == entry.pokemon);

            let (runs_since_last, time_since_last) = match previous {
                Some(previous) => {
                    let between = ordered
                        .iter()
                        .filter(|other| {
                            other.order_key() > previous.order_key() && other.order_key() < key
                        })
                        .count();
                    (
                        RunsSince::Runs(between as u32 + 1),
                        time_since(previous.date, entry.date),
                    )
                }
                None => (RunsSince::Never, "Never".to_string()),
            };

            RecentEntry {
                pokemon: entry.pokemon.clone(),
                date: entry.date,
                location: entry.location.clone(),
                notes: entry.notes.clone(),
                runs_since_last,
                time_since_last,
            }
        })
        .collect()
}

pub fn location_percentages(encounters: &[Encounter]) -> Vec<LocationShare> {
    let total = encounters.len();
    if total == 0 {
        return Vec::new();
    }

    let counts = encounters.iter().map(|e| e.location.as_str()).counts();

    encounters
        .iter()
        .map(|e| e.location.as_str())
        .unique()
        .sorted_by_key(|location| Reverse(counts[location]))
        .map(|location| LocationShare {
            location: location.to_string(),
            percentage: counts[location] as f64 / total as f64 * 100.0,
        })
        .collect()
}

fn entry_dates(encounters: &[Encounter]) -> BTreeSet<NaiveDate> {
    encounters.iter().map(|e| e.date).collect()
}

/// Consecutive days ending at the most recent entry. Broken once a full day
/// passes with nothing logged.
pub fn current_streak(encounters: &[Encounter], today: NaiveDate) -> u32 {
    let dates = entry_dates(encounters);
    let Some(&latest) = dates.last() else {
        return 0;
    };

    if !dates.contains(&today) && (today - latest).num_days() > 1 {
        return 0;
    }

    let mut streak = 1;
    let mut previous = latest;
    for &date in dates.iter().rev().skip(1) {
        if (previous - date).num_days() != 1 {
            break;
        }
        streak += 1;
        previous = date;
    }

    streak
}

pub fn longest_streak(encounters: &[Encounter]) -> LongestStreak {
    let dates = entry_dates(encounters);
    let Some(&first) = dates.first() else {
        return LongestStreak {
            longest_streak: 0,
            start_date: None,
            end_date: None,
        };
    };

    let (mut longest, mut longest_start, mut longest_end) = (1, first, first);
    let (mut current, mut current_start) = (1, first);

    for (&previous, &date) in dates.iter().tuple_windows() {
        if (date - previous).num_days() == 1 {
            current += 1;
            if current > longest {
                longest = current;
                longest_start = current_start;
                longest_end = date;
            }
        } else {
            current = 1;
            current_start = date;
        }
    }

    LongestStreak {
        longest_streak: longest,
        start_date: Some(longest_start),
        end_date: Some(longest_end),
    }
}

pub fn max_runs_per_day(encounters: &[Encounter]) -> MaxRunsPerDay {
    let counts = encounters.iter().map(|e| e.date).counts();
    let Some(&max_runs) = counts.values().max() else {
        return MaxRunsPerDay {
            max_runs: 0,
            dates: Vec::new(),
        };
    };

    MaxRunsPerDay {
        max_runs: max_runs as u32,
        dates: encounters
            .iter()
            .map(|e| e.date)
            .unique()
            .filter(|date| counts[date] == max_runs)
            .map(wire_date::format)
            .collect(),
    }
}

pub fn total_pokemon(encounters: &[Encounter]) -> u32 {
    encounters.len() as u32
}

pub fn unique_pokemon(encounters: &[Encounter]) -> u32 {
    encounters.iter().map(|e| &e.pokemon).unique().count() as u32
}

pub fn average_bst(encounters: &[Encounter], species: &Species) -> u32 {
    if encounters.is_empty() {
        return 0;
    }

    let total: u64 = encounters
        .iter()
        .map(|e| species.bst(&e.pokemon) as u64)
        .sum();
    (total / encounters.len() as u64) as u32
}

pub fn lowest_bst(encounters: &[Encounter], species: &Species) -> u32 {
    if encounters.is_empty() {
        return 0;
    }

    encounters
        .iter()
        .map(|e| species.bst(&e.pokemon))
        .fold(999, u32::min)
}

pub fn pokemon_entries(encounters: &[Encounter], name: &str) -> PokemonEntries {
    let name = name.to_lowercase();
    let matching: Vec<&Encounter> = encounters
        .iter()
        .filter(|e| e.pokemon.to_lowercase() == name)
        .collect();

    let total = matching.len();
    let counts = matching.iter().map(|e| e.location.as_str()).counts();
    let location_percentages = matching
        .iter()
        .map(|e| e.location.as_str())
        .unique()
        .sorted_by_key(|location| Reverse(counts[location]))
        .map(|location| LocationCount {
            location: location.to_string(),
            count: counts[location] as u32,
            percentage: counts[location] as f64 / total as f64 * 100.0,
        })
        .collect();

    let entries = matching
        .into_iter()
        .sorted_by_key(|e| Reverse(e.order_key()))
        .map(|e| EntryDetail {
            pokemon: e.pokemon.clone(),
            location: e.location.clone(),
            date: e.date,
            notes: e.notes.clone(),
        })
        .collect();

    PokemonEntries {
        total_entries: total as u32,
        location_percentages,
        entries,
    }
}
