use std::{
    collections::{BTreeMap, HashMap},
    path::Path,
};

use serde::Serialize;

use crate::AppError;

const BUILTIN: &str = include_str!("../../data/species.json");

/// Known species and their base stat totals.
#[derive(Debug, Clone, Default)]
pub struct Species {
    by_name: BTreeMap<String, u32>,
    lowercase: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeciesBst {
    #[serde(rename = "Pokemon")]
    pub pokemon: String,
    #[serde(rename = "BST")]
    pub bst: u32,
}

impl Species {
    pub fn builtin() -> Result<Self, serde_json::Error> {
        Self::from_json(BUILTIN)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let by_name: BTreeMap<String, u32> = serde_json::from_str(json)?;
        Ok(Self::from_iter(by_name))
    }

    /// Uses the given table when one is configured, the built-in one otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        match path {
            Some(path) => {
                let species = Self::from_json(&std::fs::read_to_string(path)?)?;
                tracing::info!("Loaded {} species from {}", species.len(), path.display());
                Ok(species)
            }
            None => Ok(Self::builtin()?),
        }
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Exact match first, then case-insensitive. Unknown names count as 0.
    pub fn bst(&self, name: &str) -> u32 {
        if let Some(bst) = self.by_name.get(name) {
            return *bst;
        }

        self.canonical(name)
            .and_then(|canonical| self.by_name.get(canonical))
            .copied()
            .unwrap_or(0)
    }

    /// The table's spelling of `name`, if it is a known species.
    pub fn canonical(&self, name: &str) -> Option<&str> {
        self.lowercase
            .get(&name.to_lowercase())
            .map(String::as_str)
    }

    /// Sorted by name.
    pub fn list(&self) -> Vec<SpeciesBst> {
        self.by_name
            .iter()
            .map(|(pokemon, bst)| SpeciesBst {
                pokemon: pokemon.clone(),
                bst: *bst,
            })
            .collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }
}

impl FromIterator<(String, u32)> for Species {
    fn from_iter<T: IntoIterator<Item = (String, u32)>>(iter: T) -> Self {
        let by_name: BTreeMap<String, u32> = iter.into_iter().collect();
        let lowercase = by_name
            .keys()
            .map(|name| (name.to_lowercase(), name.clone()))
            .collect();

        Self { by_name, lowercase }
    }
}
