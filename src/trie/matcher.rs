//! Single-character matchers, the building blocks of [`PatternSequence`](super::PatternSequence).

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::error::{Error, Result};

/// Matches one character against a primary character and optional alternatives,
/// or matches anything when it has no primary.
///
/// ```
/// use libtrie::trie::CharacterMatcher;
///
/// let a = CharacterMatcher::with_alternatives('a', ['á', 'à', 'ä']);
/// assert!(a.matches('a'));
/// assert!(a.matches('ä'));
/// assert!(!a.matches('e'));
///
/// assert!(CharacterMatcher::wildcard().matches('q'));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "MatcherRepr", into = "MatcherRepr")]
pub struct CharacterMatcher {
    primary: Option<char>,
    alternatives: SmallVec<[char; 4]>,
}

impl CharacterMatcher {
    /// A matcher that accepts any character.
    pub const fn wildcard() -> Self {
        CharacterMatcher {
            primary: None,
            alternatives: SmallVec::new_const(),
        }
    }

    /// A matcher that accepts exactly `ch`.
    pub const fn exact(ch: char) -> Self {
        CharacterMatcher {
            primary: Some(ch),
            alternatives: SmallVec::new_const(),
        }
    }

    /// A matcher that accepts `primary` or any of `alternatives`.
    ///
    /// Alternatives equal to the primary and repeated alternatives are dropped,
    /// the remaining order is kept.
    pub fn with_alternatives(primary: char, alternatives: impl IntoIterator<Item = char>) -> Self {
        let mut deduped: SmallVec<[char; 4]> = SmallVec::new();
        for ch in alternatives {
            if ch != primary && !deduped.contains(&ch) {
                deduped.push(ch);
            }
        }
        CharacterMatcher {
            primary: Some(primary),
            alternatives: deduped,
        }
    }

    /// Builds a matcher from its serialized shape.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if alternatives are given without a primary:
    /// a wildcard already accepts everything, so such a matcher has no meaning.
    pub fn from_parts(primary: Option<char>, alternatives: Option<Vec<char>>) -> Result<Self> {
        let alternatives = alternatives.unwrap_or_default();
        match primary {
            Some(primary) => Ok(Self::with_alternatives(primary, alternatives)),
            None if alternatives.is_empty() => Ok(Self::wildcard()),
            None => Err(Error::invalid(format!(
                "alternatives {alternatives:?} given without a primary character"
            ))),
        }
    }

    /// Returns true if `ch` is accepted.
    #[inline]
    pub fn matches(&self, ch: char) -> bool {
        match self.primary {
            None => true,
            Some(primary) => primary == ch || self.alternatives.contains(&ch),
        }
    }

    /// True if this matcher accepts any character.
    #[inline]
    pub fn is_wildcard(&self) -> bool {
        self.primary.is_none()
    }

    /// The primary character, `None` for a wildcard.
    pub fn primary(&self) -> Option<char> {
        self.primary
    }

    /// The alternative characters, in the order they were given.
    pub fn alternatives(&self) -> &[char] {
        &self.alternatives
    }
}

impl From<char> for CharacterMatcher {
    fn from(ch: char) -> Self {
        CharacterMatcher::exact(ch)
    }
}

impl From<Option<char>> for CharacterMatcher {
    fn from(ch: Option<char>) -> Self {
        ch.map_or_else(CharacterMatcher::wildcard, CharacterMatcher::exact)
    }
}

impl fmt::Display for CharacterMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.primary {
            None => f.write_str("*"),
            Some(primary) if self.alternatives.is_empty() => write!(f, "{primary}"),
            Some(primary) => {
                write!(f, "[{primary}")?;
                for ch in &self.alternatives {
                    write!(f, "{ch}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Wire shape of a [`CharacterMatcher`]: `(primary?, alternatives?)`.
#[derive(Serialize, Deserialize)]
struct MatcherRepr {
    primary: Option<char>,
    alternatives: Option<Vec<char>>,
}

impl TryFrom<MatcherRepr> for CharacterMatcher {
    type Error = Error;

    fn try_from(repr: MatcherRepr) -> Result<Self> {
        CharacterMatcher::from_parts(repr.primary, repr.alternatives)
    }
}

impl From<CharacterMatcher> for MatcherRepr {
    fn from(matcher: CharacterMatcher) -> Self {
        MatcherRepr {
            primary: matcher.primary,
            alternatives: (!matcher.alternatives.is_empty())
                .then(|| matcher.alternatives.into_vec()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn wildcard_matches_everything() {
        let m = CharacterMatcher::wildcard();
        assert!(m.is_wildcard());
        for ch in ['a', 'Z', 'é', '授', ' '] {
            assert!(m.matches(ch));
        }
    }

    #[test]
    fn exact_matches_only_primary() {
        let m = CharacterMatcher::exact('o');
        assert!(m.matches('o'));
        assert!(!m.matches('O'));
        assert!(!m.matches('ö'));
        assert_eq!(m.primary(), Some('o'));
        assert!(m.alternatives().is_empty());
    }

    #[test]
    fn alternatives_extend_primary() {
        let m = CharacterMatcher::with_alternatives('a', ['á', 'à', 'ä']);
        assert!(m.matches('a'));
        assert!(m.matches('á'));
        assert!(m.matches('à'));
        assert!(m.matches('ä'));
        assert!(!m.matches('â'));
    }

    #[test]
    fn alternatives_are_deduplicated() {
        let m = CharacterMatcher::with_alternatives('a', ['a', 'ä', 'ä', 'á']);
        assert_eq!(m.alternatives(), &['ä', 'á']);
    }

    #[test]
    fn alternatives_without_primary_are_rejected() {
        let err = CharacterMatcher::from_parts(None, Some(vec!['x'])).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        let m = CharacterMatcher::from_parts(None, Some(vec![])).unwrap();
        assert!(m.is_wildcard());
    }

    #[test]
    fn conversions() {
        assert_eq!(CharacterMatcher::from('q'), CharacterMatcher::exact('q'));
        assert_eq!(CharacterMatcher::from(None), CharacterMatcher::wildcard());
    }

    #[test]
    fn display() {
        assert_eq!(CharacterMatcher::wildcard().to_string(), "*");
        assert_eq!(CharacterMatcher::exact('n').to_string(), "n");
        let m = CharacterMatcher::with_alternatives('e', ['é', 'è']);
        assert_eq!(m.to_string(), "[eéè]");
    }

    #[test]
    fn serde_shape() {
        let m = CharacterMatcher::with_alternatives('a', ['ä']);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"primary":"a","alternatives":["ä"]}"#);
        let back: CharacterMatcher = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);

        let json = serde_json::to_string(&CharacterMatcher::wildcard()).unwrap();
        assert_eq!(json, r#"{"primary":null,"alternatives":null}"#);
    }

    #[test]
    fn serde_rejects_orphan_alternatives() {
        let res: std::result::Result<CharacterMatcher, _> =
            serde_json::from_str(r#"{"primary":null,"alternatives":["x"]}"#);
        assert!(res.is_err());
    }
}
