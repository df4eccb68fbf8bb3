//! Fluent query accumulator.
//!
//! `QueryBuilder` collects relevance fragments, filters, sorts and optional
//! score adjustments, then compiles them into one [`QueryDocument`]:
//!
//! ```rust
//! use sift_query::{BoostMap, GeoPoint, QueryBuilder, SortDescriptor, TextSearchOptions};
//!
//! let boosts = BoostMap::new().with("name", 3.0).with("description", 1.0);
//!
//! let document = QueryBuilder::new()
//!     .multi_field_text_search_with_boost("flat white", &boosts, &TextSearchOptions::default())
//!     .filter_exact("status", "open")
//!     .filter_by_distance("geo", GeoPoint::new(37.77, -122.41), 2_000.0)
//!     .sort_by(&SortDescriptor::distance(GeoPoint::new(37.77, -122.41)))
//!     .unwrap()
//!     .build();
//!
//! assert_eq!(document.sort().map(Vec::len), Some(1));
//! ```
//!
//! # Ownership
//!
//! Each builder is a single-use accumulator owned by one caller. Mutating
//! methods take the builder by value and hand it back, so a builder cannot
//! be mutated from two places at once; share the compiled document instead.

use serde_json::{Map, Value, json};
use sift_core::Result;

use crate::document::QueryDocument;
use crate::dsl::{self, DEFAULT_FUZZINESS, NO_FUZZINESS};
use crate::geo::{DistanceCalculation, GeoPoint};
use crate::options::{BoostMap, MatchStrategy, TextSearchOptions};
use crate::sort::SortDescriptor;

/// Accumulates query clauses and compiles them into a [`QueryDocument`].
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    queries: Vec<Value>,
    filters: Vec<Value>,
    sorts: Vec<Value>,
    distance_calc: Option<DistanceCalculation>,
    min_score: Option<f64>,
}

impl QueryBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Relevance
    // ------------------------------------------------------------------

    /// Fuzzy text search across `fields`.
    pub fn fuzzy_text_query<I, S>(mut self, text: &str, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.queries
            .push(dsl::multi_match(fields, text, DEFAULT_FUZZINESS));
        self
    }

    /// Text search over the boosted fields, OR-combining every enabled
    /// strategy.
    ///
    /// Each enabled strategy contributes one OR group with one clause per
    /// boosted field, weighted `boost × strategy factor`. The phrase
    /// strategy only contributes when `text` has more than one token. The
    /// strategy groups are wrapped in a single OR group and added as one
    /// relevance fragment.
    pub fn multi_field_text_search_with_boost(
        mut self,
        text: &str,
        boosts: &BoostMap,
        options: &TextSearchOptions,
    ) -> Self {
        let mut should = Vec::new();

        for strategy in MatchStrategy::ALL {
            if !options.is_enabled(strategy) {
                continue;
            }
            if strategy == MatchStrategy::Phrase && !dsl::is_phrase(text) {
                continue;
            }
            let factor = options.boost_factor(strategy);
            let clauses = boosts
                .iter()
                .map(|(field, boost)| strategy_clause(strategy, field, text, boost * factor))
                .collect();
            should.push(dsl::bool_should(clauses));
        }

        self.queries.push(dsl::bool_should(should));
        self
    }

    /// Phrase search over the boosted fields regardless of token count.
    ///
    /// Used when the caller quoted the text. Only the phrase boost factor
    /// in `options` is consulted.
    pub fn exact_phrase_text_search_with_boost(
        mut self,
        text: &str,
        boosts: &BoostMap,
        options: &TextSearchOptions,
    ) -> Self {
        let factor = options.boost_factor(MatchStrategy::Phrase);
        let clauses = boosts
            .iter()
            .map(|(field, boost)| dsl::phrase_match(field, text, boost * factor))
            .collect();

        self.queries
            .push(dsl::bool_should(vec![dsl::bool_should(clauses)]));
        self
    }

    // ------------------------------------------------------------------
    // Filters
    // ------------------------------------------------------------------

    /// Keep documents whose `path` holds any of `values`.
    pub fn filter_terms<I, V>(mut self, path: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.filters.push(dsl::terms_query(path, values));
        self
    }

    /// Keep documents whose `path` equals `value`.
    pub fn filter_exact(mut self, path: &str, value: impl Into<Value>) -> Self {
        self.filters.push(dsl::term_query(path, value));
        self
    }

    /// Keep documents within `meters` of `origin`.
    pub fn filter_by_distance(mut self, path: &str, origin: GeoPoint, meters: f64) -> Self {
        self.filters.push(json!({
            "geo_distance": {
                "distance": format!("{meters}m"),
                path: origin,
            }
        }));
        self
    }

    /// Keep documents whose `path` is at least `value`.
    pub fn filter_gte(mut self, path: &str, value: impl Into<Value>) -> Self {
        let value: Value = value.into();
        self.filters
            .push(json!({ "range": { path: { "gte": value } } }));
        self
    }

    /// Keep documents whose `path` is at most `value`.
    pub fn filter_lte(mut self, path: &str, value: impl Into<Value>) -> Self {
        let value: Value = value.into();
        self.filters
            .push(json!({ "range": { path: { "lte": value } } }));
        self
    }

    /// Keep documents whose `path` equals one of `values`, as an OR of
    /// single-term tests.
    pub fn filter_matches_one<I, V>(mut self, path: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.filters.push(dsl::matches_one_bool_query(path, values));
        self
    }

    /// Require `path` to hold any of `values` in an explicit `must` context.
    pub fn filter_must<I, V>(mut self, path: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let terms = dsl::terms_query(path, values);
        self.filters.push(json!({ "bool": { "must": terms } }));
        self
    }

    /// Exclude documents whose `path` equals `value`.
    pub fn filter_must_not(mut self, path: &str, value: impl Into<Value>) -> Self {
        let term = dsl::term_query(path, value);
        self.filters.push(json!({ "bool": { "must_not": term } }));
        self
    }

    // ------------------------------------------------------------------
    // Sorting and scoring
    // ------------------------------------------------------------------

    /// Apply a sort strategy.
    ///
    /// Sorts keep the order they were added in; earlier sorts take
    /// priority. `Scoring` and unknown strategies leave the sorts
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a `FieldOrder` sort without a field.
    /// The builder is consumed either way, so every clause accumulated so
    /// far is dropped with the error. Use [`add_sort`](Self::add_sort) to
    /// keep the builder on failure.
    pub fn sort_by(mut self, descriptor: &SortDescriptor) -> Result<Self> {
        self.add_sort(descriptor)?;
        Ok(self)
    }

    /// Apply a sort strategy in place.
    ///
    /// Same rules as [`sort_by`](Self::sort_by), but a rejected descriptor
    /// leaves the builder untouched.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a `FieldOrder` sort without a field.
    pub fn add_sort(&mut self, descriptor: &SortDescriptor) -> Result<&mut Self> {
        if let Some(clause) = descriptor.to_sort_clause()? {
            self.sorts.push(clause);
        }
        Ok(self)
    }

    /// Report each hit's distance from (`lat`, `lon`) in `distance_field`.
    ///
    /// Only one calculation is kept; a later call replaces an earlier one.
    pub fn add_distance_calculation(
        mut self,
        geo_field: impl Into<String>,
        lat: f64,
        lon: f64,
        distance_field: impl Into<String>,
    ) -> Self {
        self.distance_calc = Some(DistanceCalculation {
            geo_field: geo_field.into(),
            lat,
            lon,
            distance_field: distance_field.into(),
        });
        self
    }

    /// Drop hits scoring below `score`. Zero (or NaN) means no floor.
    pub fn set_min_score(mut self, score: f64) -> Self {
        self.min_score = Some(score);
        self
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    /// Relevance fragments added so far.
    pub fn queries(&self) -> &[Value] {
        &self.queries
    }

    /// Filters added so far.
    pub fn filters(&self) -> &[Value] {
        &self.filters
    }

    /// Sort clauses added so far.
    pub fn sorts(&self) -> &[Value] {
        &self.sorts
    }

    // ------------------------------------------------------------------
    // Compilation
    // ------------------------------------------------------------------

    /// Compile the accumulated state into a query document.
    ///
    /// - relevance: the first relevance fragment, or match-all. Later
    ///   fragments are not included; combine relevance logic into one call.
    /// - filter: `{}` with no filters, the filter itself with one, an AND of
    ///   all of them with more.
    /// - sort: omitted when empty.
    ///
    /// Building does not consume or alter the builder.
    pub fn build(&self) -> QueryDocument {
        let relevance = self
            .queries
            .first()
            .cloned()
            .unwrap_or_else(dsl::match_all_query);

        let filter = match self.filters.as_slice() {
            [] => json!({}),
            [only] => only.clone(),
            many => dsl::and_filters(many),
        };

        let mut document = Map::new();
        document.insert(
            "query".to_string(),
            json!({ "bool": { "must": relevance, "filter": filter } }),
        );

        if !self.sorts.is_empty() {
            document.insert("sort".to_string(), Value::Array(self.sorts.clone()));
        }

        if let Some(calc) = &self.distance_calc
            && let Value::Object(fields) = calc.to_script_fields()
        {
            document.extend(fields);
        }

        if let Some(score) = self.min_score.filter(|s| *s != 0.0 && !s.is_nan()) {
            document.insert("min_score".to_string(), json!(score));
        }

        QueryDocument::new(Value::Object(document))
    }
}

fn strategy_clause(strategy: MatchStrategy, field: &str, text: &str, boost: f64) -> Value {
    match strategy {
        MatchStrategy::Fuzzy => {
            dsl::single_field_text_query_with_boost(field, text, boost, DEFAULT_FUZZINESS)
        }
        MatchStrategy::Exact => {
            dsl::single_field_text_query_with_boost(field, text, boost, NO_FUZZINESS)
        }
        MatchStrategy::Phrase => dsl::phrase_match(field, text, boost),
        MatchStrategy::Prefix => dsl::prefix_match(field, text, boost),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn boosts() -> BoostMap {
        BoostMap::new().with("name", 3.0).with("description", 1.0)
    }

    fn groups(document: &QueryDocument) -> &Vec<Value> {
        document.relevance()["bool"]["should"].as_array().unwrap()
    }

    #[test]
    fn test_empty_build() {
        let document = QueryBuilder::new().build();
        assert_eq!(
            document.into_value(),
            json!({"query": {"bool": {"must": {"match_all": {}}, "filter": {}}}})
        );
    }

    #[test]
    fn test_fuzzy_text_query() {
        let document = QueryBuilder::new()
            .fuzzy_text_query("latte", ["name", "tags"])
            .build();
        assert_eq!(
            document.relevance(),
            &json!({"multi_match": {
                "fields": ["name", "tags"],
                "query": "latte",
                "fuzziness": "AUTO",
            }})
        );
    }

    #[test]
    fn test_multi_field_defaults_single_token() {
        let document = QueryBuilder::new()
            .multi_field_text_search_with_boost("latte", &boosts(), &TextSearchOptions::default())
            .build();

        // fuzzy + exact; phrase skipped for a single token, prefix off by default
        let groups = groups(&document);
        assert_eq!(groups.len(), 2);

        let fuzzy = &groups[0]["bool"]["should"];
        assert_eq!(fuzzy[0]["match"]["name"]["boost"], json!(3.0));
        assert_eq!(fuzzy[0]["match"]["name"]["fuzziness"], json!("AUTO"));
        assert_eq!(fuzzy[1]["match"]["description"]["boost"], json!(1.0));

        let exact = &groups[1]["bool"]["should"];
        assert_eq!(exact[0]["match"]["name"]["boost"], json!(6.0));
        assert_eq!(exact[0]["match"]["name"]["fuzziness"], json!(0));
        assert_eq!(exact[1]["match"]["description"]["boost"], json!(2.0));
    }

    #[test]
    fn test_multi_field_phrase_for_multi_token() {
        let document = QueryBuilder::new()
            .multi_field_text_search_with_boost(
                "flat white",
                &boosts(),
                &TextSearchOptions::default(),
            )
            .build();

        let groups = groups(&document);
        assert_eq!(groups.len(), 3);
        let phrase = &groups[2]["bool"]["should"];
        assert_eq!(
            phrase[0],
            json!({"match_phrase": {"name": {"query": "flat white", "boost": 6.0}}})
        );
    }

    #[test]
    fn test_multi_field_prefix_enabled() {
        let options = TextSearchOptions::new()
            .disable(MatchStrategy::Fuzzy)
            .disable(MatchStrategy::Exact)
            .enable(MatchStrategy::Prefix)
            .with_boost_factor(MatchStrategy::Prefix, 0.5);

        let document = QueryBuilder::new()
            .multi_field_text_search_with_boost("lat", &boosts(), &options)
            .build();

        let groups = groups(&document);
        assert_eq!(groups.len(), 1);
        assert_eq!(
            groups[0]["bool"]["should"][0],
            json!({"prefix": {"name": {"value": "lat", "boost": 1.5}}})
        );
    }

    #[test]
    fn test_multi_field_all_disabled() {
        let options = TextSearchOptions::new()
            .disable(MatchStrategy::Fuzzy)
            .disable(MatchStrategy::Exact)
            .disable(MatchStrategy::Phrase);
        let document = QueryBuilder::new()
            .multi_field_text_search_with_boost("flat white", &boosts(), &options)
            .build();
        assert!(groups(&document).is_empty());
    }

    #[test]
    fn test_exact_phrase_ignores_token_gate() {
        let document = QueryBuilder::new()
            .exact_phrase_text_search_with_boost("latte", &boosts(), &TextSearchOptions::default())
            .build();
        let groups = groups(&document);
        assert_eq!(groups.len(), 1);
        assert_eq!(
            groups[0]["bool"]["should"],
            json!([
                {"match_phrase": {"name": {"query": "latte", "boost": 6.0}}},
                {"match_phrase": {"description": {"query": "latte", "boost": 2.0}}},
            ])
        );
    }

    #[test]
    fn test_only_first_relevance_fragment_survives() {
        let document = QueryBuilder::new()
            .fuzzy_text_query("first", ["name"])
            .fuzzy_text_query("second", ["name"])
            .build();
        assert_eq!(document.relevance()["multi_match"]["query"], "first");
    }

    #[test]
    fn test_single_filter_unwrapped() {
        let document = QueryBuilder::new().filter_exact("status", "open").build();
        assert_eq!(document.filter(), &json!({"term": {"status": "open"}}));
    }

    #[test]
    fn test_multiple_filters_and_combined() {
        let document = QueryBuilder::new()
            .filter_exact("status", "open")
            .filter_gte("rating", 4)
            .filter_lte("price", 10.5)
            .build();
        assert_eq!(
            document.filter(),
            &json!({"bool": {"must": [
                {"term": {"status": "open"}},
                {"range": {"rating": {"gte": 4}}},
                {"range": {"price": {"lte": 10.5}}},
            ]}})
        );
    }

    #[test]
    fn test_filter_terms_vs_matches_one() {
        let terms = QueryBuilder::new().filter_terms("kind", [1, 2]).build();
        assert_eq!(terms.filter(), &json!({"terms": {"kind": [1, 2]}}));

        let one = QueryBuilder::new().filter_matches_one("kind", [1, 2]).build();
        assert_eq!(
            one.filter(),
            &json!({"bool": {"should": [{"term": {"kind": 1}}, {"term": {"kind": 2}}]}})
        );
    }

    #[test]
    fn test_filter_by_distance() {
        let document = QueryBuilder::new()
            .filter_by_distance("geo", GeoPoint::new(1.0, 2.0), 500.0)
            .build();
        assert_eq!(
            document.filter(),
            &json!({"geo_distance": {"distance": "500m", "geo": {"lat": 1.0, "lon": 2.0}}})
        );
    }

    #[test]
    fn test_filter_must_and_must_not() {
        let document = QueryBuilder::new()
            .filter_must("tags", ["wifi", "vegan"])
            .filter_must_not("status", "closed")
            .build();
        assert_eq!(
            document.filter(),
            &json!({"bool": {"must": [
                {"bool": {"must": {"terms": {"tags": ["wifi", "vegan"]}}}},
                {"bool": {"must_not": {"term": {"status": "closed"}}}},
            ]}})
        );
    }

    #[test]
    fn test_sorts_preserve_order() {
        let document = QueryBuilder::new()
            .sort_by(&SortDescriptor::field_order("rating", false))
            .unwrap()
            .sort_by(&SortDescriptor::scoring())
            .unwrap()
            .sort_by(&SortDescriptor::field_order("name", true))
            .unwrap()
            .build();
        assert_eq!(
            document.sort(),
            Some(&vec![json!({"rating": "desc"}), json!({"name": "asc"})])
        );
    }

    #[test]
    fn test_unknown_sort_leaves_sorts_unchanged() {
        let builder = QueryBuilder::new()
            .sort_by(&SortDescriptor::field_order("name", true))
            .unwrap();
        let before = builder.sorts().to_vec();

        let builder = builder.sort_by(&SortDescriptor::Unknown).unwrap();
        assert_eq!(builder.sorts(), before.as_slice());
    }

    #[test]
    fn test_sort_omitted_when_empty() {
        let document = QueryBuilder::new()
            .sort_by(&SortDescriptor::scoring())
            .unwrap()
            .build();
        assert!(document.as_value().get("sort").is_none());
    }

    #[test]
    fn test_invalid_field_order_sort() {
        assert!(
            QueryBuilder::new()
                .sort_by(&SortDescriptor::field_order("", true))
                .is_err()
        );
    }

    #[test]
    fn test_add_sort_keeps_builder_on_error() {
        let mut builder = QueryBuilder::new()
            .fuzzy_text_query("tartine", ["name"])
            .filter_exact("kind", "bakery")
            .sort_by(&SortDescriptor::field_order("rating", false))
            .unwrap();

        let err = builder
            .add_sort(&SortDescriptor::field_order("", true))
            .unwrap_err();
        assert!(matches!(err, sift_core::Error::Validation { .. }));

        assert_eq!(builder.queries().len(), 1);
        assert_eq!(builder.filters().len(), 1);
        assert_eq!(builder.sorts(), [json!({"rating": "desc"})]);

        builder
            .add_sort(&SortDescriptor::field_order("name", true))
            .unwrap();
        assert_eq!(builder.sorts().len(), 2);
    }

    #[test]
    fn test_distance_calculation_last_wins() {
        let document = QueryBuilder::new()
            .add_distance_calculation("geo", 1.0, 2.0, "first")
            .add_distance_calculation("geo", 3.0, 4.0, "distance")
            .build();
        let script_fields = document.as_value()["script_fields"].as_object().unwrap();
        assert_eq!(script_fields.len(), 1);
        assert_eq!(script_fields["distance"]["params"], json!({"lat": 3.0, "lon": 4.0}));
    }

    #[test]
    fn test_min_score() {
        let document = QueryBuilder::new().set_min_score(0.5).build();
        assert_eq!(document.min_score(), Some(0.5));

        let zero = QueryBuilder::new().set_min_score(0.0).build();
        assert!(zero.as_value().get("min_score").is_none());

        let nan = QueryBuilder::new().set_min_score(f64::NAN).build();
        assert!(nan.min_score().is_none());
    }

    #[test]
    fn test_build_is_repeatable() {
        let builder = QueryBuilder::new()
            .multi_field_text_search_with_boost("flat white", &boosts(), &TextSearchOptions::default())
            .filter_exact("status", "open")
            .sort_by(&SortDescriptor::field_order("name", true))
            .unwrap()
            .add_distance_calculation("geo", 1.0, 2.0, "distance")
            .set_min_score(0.2);

        assert_eq!(builder.build(), builder.build());
    }
}
