//! Configuration types for the more-like-this query builder.

use std::env;
use std::str::FromStr;

use serde::Deserialize;
use tracing::warn;

/// Default term-selection parameters applied to more-like-this queries.
///
/// Every field is optional; `None` leaves the server default in place.
/// Apply with [`MoreLikeThisQuery::with_defaults`](crate::MoreLikeThisQuery::with_defaults),
/// which only fills parameters the query has not set itself.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MoreLikeThisDefaults {
    /// Terms appearing fewer times than this in the input are ignored.
    pub min_term_freq: Option<i64>,
    /// Maximum number of terms selected from the input.
    pub max_query_terms: Option<i64>,
    /// Terms appearing in fewer documents than this are ignored.
    pub min_doc_freq: Option<i64>,
    /// Terms appearing in more documents than this are ignored.
    pub max_doc_freq: Option<i64>,
    /// Shorter words are ignored.
    pub min_word_len: Option<i64>,
    /// Longer words are ignored.
    pub max_word_len: Option<i64>,
    /// Minimum-should-match expression, e.g. `"30%"`.
    pub minimum_should_match: Option<String>,
    /// Analyzer used on the input text.
    pub analyzer: Option<String>,
    /// Words never selected as terms.
    pub stop_words: Vec<String>,
    /// Boost factor applied to selected terms.
    pub boost_terms: Option<f64>,
}

impl MoreLikeThisDefaults {
    /// Load defaults from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `MLT_MIN_TERM_FREQ`, `MLT_MAX_QUERY_TERMS`, `MLT_MIN_DOC_FREQ`,
    ///   `MLT_MAX_DOC_FREQ`, `MLT_MIN_WORD_LEN`, `MLT_MAX_WORD_LEN`: integers
    /// - `MLT_BOOST_TERMS`: float
    /// - `MLT_MINIMUM_SHOULD_MATCH`, `MLT_ANALYZER`: strings
    /// - `MLT_STOP_WORDS`: comma separated list
    ///
    /// Unset variables leave the field as `None`. Values that fail to parse are
    /// logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load defaults through an arbitrary key lookup, using the same keys and
    /// parsing rules as [`from_env`](Self::from_env).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let string = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            min_term_freq: parse_var(&lookup, "MLT_MIN_TERM_FREQ"),
            max_query_terms: parse_var(&lookup, "MLT_MAX_QUERY_TERMS"),
            min_doc_freq: parse_var(&lookup, "MLT_MIN_DOC_FREQ"),
            max_doc_freq: parse_var(&lookup, "MLT_MAX_DOC_FREQ"),
            min_word_len: parse_var(&lookup, "MLT_MIN_WORD_LEN"),
            max_word_len: parse_var(&lookup, "MLT_MAX_WORD_LEN"),
            minimum_should_match: string("MLT_MINIMUM_SHOULD_MATCH"),
            analyzer: string("MLT_ANALYZER"),
            stop_words: lookup("MLT_STOP_WORDS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|w| !w.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            boost_terms: parse_var::<f64, _>(&lookup, "MLT_BOOST_TERMS").filter(|v| {
                if !v.is_finite() {
                    warn!(key = "MLT_BOOST_TERMS", value = v, "Non-finite boost, ignoring");
                }
                v.is_finite()
            }),
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key = key, value = %raw, "Invalid more-like-this default, ignoring");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_empty() {
        let defaults = MoreLikeThisDefaults::from_lookup(|_| None);
        assert_eq!(defaults, MoreLikeThisDefaults::default());
    }

    #[test]
    fn test_from_lookup_parses_all_keys() {
        let defaults = MoreLikeThisDefaults::from_lookup(lookup_from(&[
            ("MLT_MIN_TERM_FREQ", "1"),
            ("MLT_MAX_QUERY_TERMS", "25"),
            ("MLT_MIN_DOC_FREQ", "0"),
            ("MLT_MAX_DOC_FREQ", "1000"),
            ("MLT_MIN_WORD_LEN", "3"),
            ("MLT_MAX_WORD_LEN", "20"),
            ("MLT_MINIMUM_SHOULD_MATCH", "30%"),
            ("MLT_ANALYZER", "english"),
            ("MLT_STOP_WORDS", "the, a ,,an"),
            ("MLT_BOOST_TERMS", "1.5"),
        ]));

        assert_eq!(defaults.min_term_freq, Some(1));
        assert_eq!(defaults.max_query_terms, Some(25));
        assert_eq!(defaults.min_doc_freq, Some(0));
        assert_eq!(defaults.max_doc_freq, Some(1000));
        assert_eq!(defaults.min_word_len, Some(3));
        assert_eq!(defaults.max_word_len, Some(20));
        assert_eq!(defaults.minimum_should_match.as_deref(), Some("30%"));
        assert_eq!(defaults.analyzer.as_deref(), Some("english"));
        assert_eq!(defaults.stop_words, vec!["the", "a", "an"]);
        assert_eq!(defaults.boost_terms, Some(1.5));
    }

    #[test]
    fn test_from_lookup_ignores_invalid_values() {
        let defaults = MoreLikeThisDefaults::from_lookup(lookup_from(&[
            ("MLT_MIN_TERM_FREQ", "two"),
            ("MLT_BOOST_TERMS", "inf"),
            ("MLT_ANALYZER", "   "),
            ("MLT_MAX_QUERY_TERMS", " 12 "),
        ]));

        assert_eq!(defaults.min_term_freq, None);
        assert_eq!(defaults.boost_terms, None);
        assert_eq!(defaults.analyzer, None);
        assert_eq!(defaults.max_query_terms, Some(12));
    }

    #[test]
    fn test_deserialize_partial() {
        let defaults: MoreLikeThisDefaults =
            serde_json::from_str(r#"{ "min_term_freq": 1, "stop_words": ["the"] }"#).unwrap();
        assert_eq!(defaults.min_term_freq, Some(1));
        assert_eq!(defaults.stop_words, vec!["the"]);
        assert_eq!(defaults.analyzer, None);
    }
}
