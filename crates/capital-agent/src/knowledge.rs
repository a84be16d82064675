//! Static Knowledge Tables
//!
//! Reference data built once at startup and shared read-only (`Arc<WorldFacts>`)
//! by every tool.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Case-fold a user supplied key: surrounding whitespace is dropped and the
/// rest lowercased.
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Immutable mapping from a normalized key to a value, in insertion order
#[derive(Clone, Debug)]
pub struct KnowledgeTable<V> {
    entries: Vec<(String, V)>,
    index: HashMap<String, usize>,
}

impl<V> KnowledgeTable<V> {
    /// Look up a raw (non-normalized) key
    pub fn get(&self, raw: &str) -> Option<&V> {
        self.index
            .get(&normalize_key(raw))
            .map(|&i| &self.entries[i].1)
    }

    pub fn contains(&self, raw: &str) -> bool {
        self.index.contains_key(&normalize_key(raw))
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>, V> FromIterator<(K, V)> for KnowledgeTable<V> {
    /// Keys are normalized on the way in. A repeated key replaces the earlier
    /// value but keeps its position.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut entries: Vec<(String, V)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for (key, value) in iter {
            let key = normalize_key(key.as_ref());
            if let Some(&i) = index.get(&key) {
                entries[i].1 = value;
            } else {
                index.insert(key.clone(), entries.len());
                entries.push((key, value));
            }
        }

        Self { entries, index }
    }
}

/// Latitude/longitude in degrees
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Everything the tools know about the world
#[derive(Clone, Debug)]
pub struct WorldFacts {
    pub capitals: KnowledgeTable<String>,
    pub populations: KnowledgeTable<String>,
    pub coordinates: KnowledgeTable<Coordinate>,
}

impl WorldFacts {
    /// The built-in tables: four countries, their capitals and capital
    /// coordinates.
    pub fn builtin() -> Self {
        let capitals = [
            ("france", "Paris"),
            ("japan", "Tokyo"),
            ("canada", "Ottawa"),
            ("portugal", "Lisbon"),
        ];
        let populations = [
            ("france", "66 million"),
            ("japan", "123 million"),
            ("canada", "39 million"),
            ("portugal", "10 million"),
        ];
        let coordinates = [
            ("paris", Coordinate::new(48.85, 2.35)),
            ("tokyo", Coordinate::new(35.68, 139.69)),
            ("ottawa", Coordinate::new(45.42, -75.69)),
            ("lisbon", Coordinate::new(38.72, -9.14)),
        ];

        Self {
            capitals: capitals
                .into_iter()
                .map(|(k, v)| (k, v.to_string()))
                .collect(),
            populations: populations
                .into_iter()
                .map(|(k, v)| (k, v.to_string()))
                .collect(),
            coordinates: coordinates.into_iter().collect(),
        }
    }

    /// Countries with a known capital, in table order
    pub fn countries(&self) -> Vec<String> {
        self.capitals.keys().map(str::to_string).collect()
    }
}

impl Default for WorldFacts {
    fn default() -> Self {
        Self::builtin()
    }
}
