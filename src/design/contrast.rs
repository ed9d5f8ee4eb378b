use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::core::types::ContrastMode;

/// Order-independent identity of a pair of factor levels
#[must_use]
pub fn normalize_pair_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("{a}\0{b}")
    } else {
        format!("{b}\0{a}")
    }
}

/// Number of distinct unordered pairs that `level_count` levels can form
#[must_use]
pub fn max_pair_count(level_count: usize) -> usize {
    if level_count < 2 {
        0
    } else {
        level_count * (level_count - 1) / 2
    }
}

/// The contrasts handed on to the analysis, one shape per mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrimaryContrasts {
    AllAgainstAll,
    Baseline {
        baseline: String,
        compare: Vec<String>,
    },
    Explicit {
        pairs: Vec<[String; 2]>,
    },
}

impl PrimaryContrasts {
    #[must_use]
    pub fn mode(&self) -> ContrastMode {
        match self {
            Self::AllAgainstAll => ContrastMode::AllAgainstAll,
            Self::Baseline { .. } => ContrastMode::Baseline,
            Self::Explicit { .. } => ContrastMode::Explicit,
        }
    }
}

/// One reference level compared against a set of other levels.
///
/// `compare` keeps insertion order and never contains `baseline`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineState {
    baseline: Option<String>,
    compare: Vec<String>,
}

impl BaselineState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn baseline(&self) -> Option<&str> {
        self.baseline.as_deref()
    }

    #[must_use]
    pub fn compare(&self) -> &[String] {
        &self.compare
    }

    /// Make `level` the baseline, dropping it from the compared levels
    #[must_use]
    pub fn select_baseline(&self, level: &str) -> Self {
        Self {
            baseline: Some(level.to_string()),
            compare: self
                .compare
                .iter()
                .filter(|c| *c != level)
                .cloned()
                .collect(),
        }
    }

    /// Add or remove `level` from the compared levels; the baseline itself is ignored
    #[must_use]
    pub fn toggle_compare(&self, level: &str) -> Self {
        if self.baseline.as_deref() == Some(level) {
            return self.clone();
        }

        let mut compare = self.compare.clone();
        if let Some(index) = compare.iter().position(|c| c == level) {
            compare.remove(index);
        } else {
            compare.push(level.to_string());
        }

        Self {
            baseline: self.baseline.clone(),
            compare,
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.baseline.is_some() && !self.compare.is_empty()
    }

    /// `None` until a baseline and at least one compared level are chosen
    #[must_use]
    pub fn build(&self) -> Option<PrimaryContrasts> {
        let baseline = self.baseline.as_ref()?;
        if self.compare.is_empty() {
            return None;
        }
        Some(PrimaryContrasts::Baseline {
            baseline: baseline.clone(),
            compare: self.compare.clone(),
        })
    }
}

/// Explicit pairs being edited, keyed by row id.
///
/// There is always at least one row; removing the last one seeds a fresh
/// empty pair. Empty strings mark an unset side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContrastPairs {
    pairs: BTreeMap<usize, [String; 2]>,
}

impl Default for ContrastPairs {
    fn default() -> Self {
        Self::new()
    }
}

impl ContrastPairs {
    /// A single empty pair with id 0
    #[must_use]
    pub fn new() -> Self {
        let mut pairs = BTreeMap::new();
        pairs.insert(0, empty_pair());
        Self { pairs }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Never true; removing the last pair reseeds an empty one
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: usize) -> Option<&[String; 2]> {
        self.pairs.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &[String; 2])> {
        self.pairs.iter().map(|(id, pair)| (*id, pair))
    }

    /// Append an empty pair, returning its id (one past the highest id)
    pub fn add_pair(&mut self) -> usize {
        let id = self.pairs.keys().next_back().map_or(0, |max| max + 1);
        self.pairs.insert(id, empty_pair());
        id
    }

    /// Remove a pair; removing the only pair resets to a single empty pair
    pub fn remove_pair(&mut self, id: usize) {
        if self.pairs.len() <= 1 {
            *self = Self::new();
            return;
        }
        self.pairs.remove(&id);
    }

    /// Set one side of a pair. Unknown ids are ignored.
    pub fn update_pair(&mut self, id: usize, side: usize, value: &str) {
        if let Some(pair) = self.pairs.get_mut(&id) {
            if let Some(slot) = pair.get_mut(side) {
                *slot = value.to_string();
            }
        }
    }

    /// Pairs with both sides set and different, in id order
    #[must_use]
    pub fn valid_pairs(&self) -> Vec<&[String; 2]> {
        self.pairs.values().filter(|pair| is_valid_pair(pair)).collect()
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.pairs.values().any(is_valid_pair)
    }

    /// Valid pairs as explicit contrasts, or `None` if there are none.
    ///
    /// Pairs naming the same two levels as an earlier pair are dropped.
    #[must_use]
    pub fn build(&self) -> Option<PrimaryContrasts> {
        let mut seen = HashSet::new();
        let pairs: Vec<[String; 2]> = self
            .valid_pairs()
            .into_iter()
            .filter(|[a, b]| seen.insert(normalize_pair_key(a, b)))
            .cloned()
            .collect();

        if pairs.is_empty() {
            None
        } else {
            Some(PrimaryContrasts::Explicit { pairs })
        }
    }

    /// Normalized keys of every complete pair, optionally skipping one row
    #[must_use]
    pub fn used_pair_keys(&self, exclude: Option<usize>) -> HashSet<String> {
        self.pairs
            .iter()
            .filter(|(id, _)| Some(**id) != exclude)
            .filter(|(_, pair)| is_valid_pair(pair))
            .map(|(_, [a, b])| normalize_pair_key(a, b))
            .collect()
    }

    /// Levels that must not be offered for one side of row `current`.
    ///
    /// With the other side unset, only levels that have no unused partner
    /// left are disabled. Otherwise the other side's own level is disabled,
    /// plus every level that would repeat a pair already made by another row.
    #[must_use]
    pub fn disabled_values(&self, levels: &[String], current: usize, other: &str) -> Vec<String> {
        let used = self.used_pair_keys(Some(current));

        if other.is_empty() {
            return levels
                .iter()
                .filter(|level| has_no_valid_partner(level, levels, &used))
                .cloned()
                .collect();
        }

        levels
            .iter()
            .filter(|level| {
                level.as_str() == other || used.contains(&normalize_pair_key(level, other))
            })
            .cloned()
            .collect()
    }

    /// True once every distinct pair of `level_count` levels is in use
    #[must_use]
    pub fn is_all_pairs_used(&self, level_count: usize) -> bool {
        self.used_pair_keys(None).len() >= max_pair_count(level_count)
    }
}

/// True if every possible partner of `level` is itself or already paired with it
#[must_use]
pub fn has_no_valid_partner(level: &str, levels: &[String], used: &HashSet<String>) -> bool {
    levels
        .iter()
        .all(|partner| partner == level || used.contains(&normalize_pair_key(level, partner)))
}

fn is_valid_pair(pair: &[String; 2]) -> bool {
    let [a, b] = pair;
    !a.is_empty() && !b.is_empty() && a != b
}

fn empty_pair() -> [String; 2] {
    [String::new(), String::new()]
}

/// The active contrast mode plus both editable sub-states.
///
/// Switching modes keeps the inactive sub-state; only the active one
/// feeds [`ContrastState::primary_contrasts`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContrastState {
    pub mode: ContrastMode,
    pub baseline: BaselineState,
    pub explicit: ContrastPairs,
}

impl ContrastState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Contrasts for the active mode, `None` while that mode is incomplete
    #[must_use]
    pub fn primary_contrasts(&self) -> Option<PrimaryContrasts> {
        match self.mode {
            ContrastMode::AllAgainstAll => Some(PrimaryContrasts::AllAgainstAll),
            ContrastMode::Baseline => self.baseline.build(),
            ContrastMode::Explicit => self.explicit.build(),
        }
    }

    /// Whether continuing should be blocked for `level_count` factor levels
    #[must_use]
    pub fn is_disabled(&self, level_count: usize) -> bool {
        if level_count < 2 {
            return true;
        }
        match self.mode {
            ContrastMode::AllAgainstAll => false,
            ContrastMode::Baseline => !self.baseline.is_valid(),
            ContrastMode::Explicit => !self.explicit.is_valid(),
        }
    }

    /// Clear both sub-states, e.g. after the primary factor changes
    pub fn reset(&mut self) {
        self.baseline = BaselineState::new();
        self.explicit = ContrastPairs::new();
    }
}

/// Sorted distinct non-empty values of `factor` across the sample sheet rows
#[must_use]
pub fn unique_factor_values<'a, I>(rows: I, factor: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a BTreeMap<String, String>>,
{
    let mut values: Vec<String> = rows
        .into_iter()
        .filter_map(|row| row.get(factor))
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect();
    values.sort();
    values.dedup();
    values
}
