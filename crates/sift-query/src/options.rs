//! Relevance tuning inputs: per-field boosts and per-strategy options.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Field name to relevance weight, in caller order.
///
/// Inserting a field that is already present replaces its weight in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoostMap {
    entries: Vec<(String, f64)>,
}

impl BoostMap {
    /// Create an empty boost map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field with its weight (builder style).
    pub fn with(mut self, field: impl Into<String>, boost: f64) -> Self {
        self.insert(field, boost);
        self
    }

    /// Add or replace a field's weight.
    pub fn insert(&mut self, field: impl Into<String>, boost: f64) {
        let field = field.into();
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some(entry) => entry.1 = boost,
            None => self.entries.push((field, boost)),
        }
    }

    /// Weight of a field, if present.
    pub fn get(&self, field: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, boost)| *boost)
    }

    /// Iterate over `(field, boost)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(f, b)| (f.as_str(), *b))
    }

    /// Number of boosted fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no fields are boosted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for BoostMap {
    fn from_iter<T: IntoIterator<Item = (K, f64)>>(iter: T) -> Self {
        let mut map = BoostMap::new();
        for (field, boost) in iter {
            map.insert(field, boost);
        }
        map
    }
}

impl<K: Into<String>, const N: usize> From<[(K, f64); N]> for BoostMap {
    fn from(pairs: [(K, f64); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl Serialize for BoostMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, boost) in &self.entries {
            map.serialize_entry(field, boost)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for BoostMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BoostMapVisitor;

        impl<'de> Visitor<'de> for BoostMapVisitor {
            type Value = BoostMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to numeric boosts")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<BoostMap, A::Error> {
                let mut map = BoostMap::new();
                while let Some((field, boost)) = access.next_entry::<String, f64>()? {
                    map.insert(field, boost);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(BoostMapVisitor)
    }
}

// ============================================================================
// Match strategies
// ============================================================================

/// The four text match strategies combined by multi-field search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Fuzzy per-field match.
    Fuzzy,
    /// Per-field match with no fuzziness.
    Exact,
    /// Whole-phrase match, only for multi-token text.
    Phrase,
    /// Prefix match.
    Prefix,
}

impl MatchStrategy {
    /// All strategies, in the order their clauses are emitted.
    pub const ALL: [MatchStrategy; 4] = [
        MatchStrategy::Fuzzy,
        MatchStrategy::Exact,
        MatchStrategy::Phrase,
        MatchStrategy::Prefix,
    ];

    /// Whether the strategy runs when the caller does not say.
    pub fn default_enabled(self) -> bool {
        !matches!(self, MatchStrategy::Prefix)
    }

    /// Multiplier applied to each field boost when the caller does not say.
    pub fn default_boost_factor(self) -> f64 {
        match self {
            MatchStrategy::Fuzzy => 1.0,
            MatchStrategy::Exact => 2.0,
            MatchStrategy::Phrase => 2.0,
            MatchStrategy::Prefix => 1.0,
        }
    }
}

/// Caller overrides for one strategy. Unset fields fall back to the
/// strategy's defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyOptions {
    /// Run this strategy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Multiplier applied to each field's boost.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boost_factor: Option<f64>,
}

/// Options for `multi_field_text_search_with_boost` and
/// `exact_phrase_text_search_with_boost`.
///
/// | Strategy | enabled | boost factor |
/// |----------|---------|--------------|
/// | fuzzy    | true    | 1            |
/// | exact    | true    | 2            |
/// | phrase   | true    | 2            |
/// | prefix   | false   | 1            |
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSearchOptions {
    /// Fuzzy match overrides.
    pub fuzzy_match: StrategyOptions,
    /// Exact match overrides.
    pub exact_match: StrategyOptions,
    /// Phrase match overrides.
    pub phrase_match: StrategyOptions,
    /// Prefix match overrides.
    pub prefix_match: StrategyOptions,
}

impl TextSearchOptions {
    /// Options with every strategy at its default.
    pub fn new() -> Self {
        Self::default()
    }

    fn strategy(&self, strategy: MatchStrategy) -> &StrategyOptions {
        match strategy {
            MatchStrategy::Fuzzy => &self.fuzzy_match,
            MatchStrategy::Exact => &self.exact_match,
            MatchStrategy::Phrase => &self.phrase_match,
            MatchStrategy::Prefix => &self.prefix_match,
        }
    }

    fn strategy_mut(&mut self, strategy: MatchStrategy) -> &mut StrategyOptions {
        match strategy {
            MatchStrategy::Fuzzy => &mut self.fuzzy_match,
            MatchStrategy::Exact => &mut self.exact_match,
            MatchStrategy::Phrase => &mut self.phrase_match,
            MatchStrategy::Prefix => &mut self.prefix_match,
        }
    }

    /// Turn a strategy on.
    pub fn enable(mut self, strategy: MatchStrategy) -> Self {
        self.strategy_mut(strategy).enabled = Some(true);
        self
    }

    /// Turn a strategy off.
    pub fn disable(mut self, strategy: MatchStrategy) -> Self {
        self.strategy_mut(strategy).enabled = Some(false);
        self
    }

    /// Override a strategy's boost factor.
    pub fn with_boost_factor(mut self, strategy: MatchStrategy, factor: f64) -> Self {
        self.strategy_mut(strategy).boost_factor = Some(factor);
        self
    }

    /// Effective enabled flag for a strategy.
    pub fn is_enabled(&self, strategy: MatchStrategy) -> bool {
        self.strategy(strategy)
            .enabled
            .unwrap_or_else(|| strategy.default_enabled())
    }

    /// Effective boost factor for a strategy.
    pub fn boost_factor(&self, strategy: MatchStrategy) -> f64 {
        self.strategy(strategy)
            .boost_factor
            .unwrap_or_else(|| strategy.default_boost_factor())
    }
}

// ============================================================================
// Tests
// ============================================================================
