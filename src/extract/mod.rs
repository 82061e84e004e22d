//! Place-name extraction for Ukrainian situational reports.
//!
//! Text goes through the pattern matcher, the validator and the context
//! classifier, then a keyword pass maps well-known city stems and slang
//! onto canonical names. Both passes write into one map; later writes win.
pub mod facility;
pub mod patterns;
pub mod terms;

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::ops::Range;

use serde::Serialize;
use tracing::debug;

pub use crate::extract::facility::FacilityType;
use crate::extract::patterns::PatternMatcher;
use crate::extract::terms::{CITY_KEYWORDS, FACILITY_TERMS, SKIP_WORDS};

/// Context marker for entries produced by the keyword pass.
pub const KEYWORD_MATCH: &str = "keyword_match";

/// Shortest accepted name, in characters.
const MIN_NAME_CHARS: usize = 3;

/// Characters of context taken on each side of a match.
const CONTEXT_RADIUS: usize = 30;

// ───────────────────────────── Data model ────────────────────────────────

/// A single place mention. Serialised without its name, which is the key
/// of the surrounding map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationMention {
    #[serde(skip)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FacilityType,
    pub context: String,
    pub direction: Option<String>,
}

/// Mentions keyed by name. Sorted keys keep the JSON output stable.
pub type ExtractionResult = BTreeMap<String, LocationMention>;

// ───────────────────────────── Validation ────────────────────────────────

/// Rejects names that are too short or known not to be places.
pub struct Validator {
    skip_words: HashSet<String>,
}

impl Validator {
    /// Built-in stoplist plus `extra` (compared lowercased).
    pub fn new(extra: impl IntoIterator<Item = String>) -> Self {
        let skip_words = SKIP_WORDS
            .iter()
            .map(|w| w.to_string())
            .chain(extra.into_iter().map(|w| w.trim().to_lowercase()))
            .filter(|w| !w.is_empty())
            .collect();
        Self { skip_words }
    }

    /// Length is counted in characters; the stoplist match is exact, not
    /// a substring test.
    pub fn is_valid(&self, candidate: &str) -> bool {
        if candidate.chars().count() < MIN_NAME_CHARS {
            return false;
        }
        !self.skip_words.contains(&candidate.to_lowercase())
    }

    pub fn skip_word_count(&self) -> usize {
        self.skip_words.len()
    }
}

// ───────────────────────────── Classification ────────────────────────────

/// Maps a context window to a facility type via [`FACILITY_TERMS`].
pub struct ContextClassifier {
    terms: &'static [(&'static str, FacilityType)],
}

impl Default for ContextClassifier {
    fn default() -> Self {
        Self {
            terms: FACILITY_TERMS,
        }
    }
}

impl ContextClassifier {
    /// First term in declared order that occurs in the window wins.
    pub fn classify(&self, context: &str) -> FacilityType {
        let lower = context.to_lowercase();
        self.terms
            .iter()
            .find(|(term, _)| lower.contains(term))
            .map_or(FacilityType::Generic, |&(_, kind)| kind)
    }
}

/// Up to [`CONTEXT_RADIUS`] characters either side of `span`, clipped to
/// the text. `span` must lie on char boundaries (regex matches do).
pub fn context_window(text: &str, span: Range<usize>) -> &str {
    let start = text[..span.start]
        .char_indices()
        .rev()
        .nth(CONTEXT_RADIUS - 1)
        .map_or(0, |(i, _)| i);
    let end = text[span.end..]
        .char_indices()
        .nth(CONTEXT_RADIUS)
        .map_or(text.len(), |(i, _)| span.end + i);
    &text[start..end]
}

// ───────────────────────────── Keywords ──────────────────────────────────

/// Substring scan for city stems and slang, see [`CITY_KEYWORDS`].
pub struct KeywordNormalizer {
    keywords: &'static [(&'static str, &'static str)],
}

impl Default for KeywordNormalizer {
    fn default() -> Self {
        Self {
            keywords: CITY_KEYWORDS,
        }
    }
}

impl KeywordNormalizer {
    /// One city entry per key present anywhere in the text, in table
    /// order. Several keys may yield the same canonical name.
    pub fn normalize(&self, text: &str) -> Vec<LocationMention> {
        let lower = text.to_lowercase();
        self.keywords
            .iter()
            .filter(|(key, _)| lower.contains(key))
            .map(|&(_, canonical)| LocationMention {
                name: canonical.to_string(),
                kind: FacilityType::City,
                context: KEYWORD_MATCH.to_string(),
                direction: None,
            })
            .collect()
    }
}

// ───────────────────────────── Aggregation ───────────────────────────────

/// The whole pipeline. Immutable after construction, so one instance can
/// serve any number of threads.
pub struct LocationExtractor {
    validator: Validator,
    matcher: PatternMatcher,
    classifier: ContextClassifier,
    normalizer: KeywordNormalizer,
}

impl Default for LocationExtractor {
    fn default() -> Self {
        Self::with_extra_skip_words(Vec::new())
    }
}

impl LocationExtractor {
    pub fn with_extra_skip_words(extra: impl IntoIterator<Item = String>) -> Self {
        Self {
            validator: Validator::new(extra),
            matcher: PatternMatcher::default(),
            classifier: ContextClassifier::default(),
            normalizer: KeywordNormalizer::default(),
        }
    }

    /// Built-in tables plus `EXTRA_SKIP_WORDS` (comma-separated).
    pub fn from_env() -> Self {
        let extra: Vec<String> = std::env::var("EXTRA_SKIP_WORDS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        Self::with_extra_skip_words(extra)
    }

    /// Never fails: text without matches yields an empty map.
    pub fn extract(&self, text: &str) -> ExtractionResult {
        let mut locations = ExtractionResult::new();

        // Pass 1: patterns, in pattern order then text order.
        for candidate in self.matcher.find_candidates(text) {
            let name = candidate.name.trim();
            if !self.validator.is_valid(name) {
                continue;
            }
            let context = context_window(text, candidate.span);
            let kind = self.classifier.classify(context);
            debug!("{:?}: {name:?} → {kind}", candidate.kind);
            locations.insert(
                name.to_string(),
                LocationMention {
                    name: name.to_string(),
                    kind,
                    context: context.to_string(),
                    direction: candidate.direction.map(str::to_string),
                },
            );
        }

        // Pass 2: keywords, strictly after the patterns so they win.
        for mention in self.normalizer.normalize(text) {
            debug!("Keyword: {:?} → city", mention.name);
            locations.insert(mention.name.clone(), mention);
        }

        locations
    }
}

impl fmt::Display for LocationExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LocationExtractor(patterns={}, facility_terms={}, city_keywords={}, skip_words={})",
            patterns::PatternKind::ALL.len(),
            self.classifier.terms.len(),
            self.normalizer.keywords.len(),
            self.validator.skip_word_count(),
        )
    }
}
