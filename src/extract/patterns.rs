use std::ops::Range;
use std::sync::LazyLock;

use regex::{Captures, Regex};

// ───────────────────────────── Pattern kinds ──────────────────────────────

/// The location patterns, in evaluation order.
///
/// Every pattern runs over the whole text. All matches of an earlier kind
/// are reported before any match of a later one, and the aggregator lets
/// later writes win, so this order is part of the output contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    /// `[у|в|біля|…|смт] Name[, Name][ області| районі]`
    ProperNoun,
    /// `північніше Харкова`
    Directional,
    /// `на північ від Харкова`
    CardinalFrom,
    /// `біля Харкова`, `поруч з Ізюмом`
    Proximity,
    /// `у Бучанському районі`
    District,
}

impl PatternKind {
    pub const ALL: [PatternKind; 5] = [
        Self::ProperNoun,
        Self::Directional,
        Self::CardinalFrom,
        Self::Proximity,
        Self::District,
    ];

    fn source(self) -> &'static str {
        match self {
            Self::ProperNoun => {
                r"(?i)(?:у |в |біля |поблизу |районі |м\. |с\. |смт )?([А-ЯІЇЄҐ][а-яіїєґ'\-]+)(?:, ([А-ЯІЇЄҐ][а-яіїєґ'\-]+))?(?: області| районі)?"
            }
            Self::Directional => {
                r"(?i)(північніше|південніше|східніше|західніше|північній|південній|східній|західній)\s+([\w\-']+)"
            }
            Self::CardinalFrom => r"(?i)на\s+(?:північ|південь|схід|захід)\s+від\s+([\w\-']+)",
            Self::Proximity => r"(?i)(біля|поблизу|околиці|район|поруч\s+з|під)\s*([\w\-']+)",
            Self::District => r"(?i)у\s+([\w\-']+)\s+районі",
        }
    }

    /// Pull `(name, direction)` out of one match.
    ///
    /// For a proper-noun pair ("Харківщина, Чугуїв") the second token is the
    /// name and the first rides along in the direction slot.
    fn capture<'t>(self, caps: &Captures<'t>) -> Option<(&'t str, Option<&'t str>)> {
        let group = |i: usize| caps.get(i).map(|m| m.as_str());
        match self {
            Self::ProperNoun => match group(2) {
                Some(second) => Some((second, group(1))),
                None => group(1).map(|name| (name, None)),
            },
            Self::Directional | Self::Proximity => Some((group(2)?, group(1))),
            Self::CardinalFrom | Self::District => group(1).map(|name| (name, None)),
        }
    }
}

struct LocationPattern {
    kind: PatternKind,
    regex: Regex,
}

static LOCATION_PATTERNS: LazyLock<Vec<LocationPattern>> = LazyLock::new(|| {
    PatternKind::ALL
        .iter()
        .map(|&kind| LocationPattern {
            kind,
            regex: Regex::new(kind.source()).expect("location pattern must compile"),
        })
        .collect()
});

// ───────────────────────────── Matcher ────────────────────────────────────

/// One raw hit, borrowed from the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate<'t> {
    pub name: &'t str,
    pub direction: Option<&'t str>,
    /// Byte range of the whole match (markers and suffixes included).
    pub span: Range<usize>,
    pub kind: PatternKind,
}

pub struct PatternMatcher {
    patterns: &'static [LocationPattern],
}

impl Default for PatternMatcher {
    fn default() -> Self {
        Self {
            patterns: LOCATION_PATTERNS.as_slice(),
        }
    }
}

impl PatternMatcher {
    /// Every match of every pattern, ordered by pattern then by position.
    /// Patterns overlap freely; the same word can come back several times.
    pub fn find_candidates<'t>(&self, text: &'t str) -> Vec<Candidate<'t>> {
        let mut found = Vec::new();
        for pattern in self.patterns {
            for caps in pattern.regex.captures_iter(text) {
                let Some(whole) = caps.get(0) else {
                    continue;
                };
                if let Some((name, direction)) = pattern.kind.capture(&caps) {
                    found.push(Candidate {
                        name,
                        direction,
                        span: whole.range(),
                        kind: pattern.kind,
                    });
                }
            }
        }
        found
    }
}
