//! Patterns: sequences of [`CharacterMatcher`]s with a match mode.

use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::error::{Error, Result};
use super::matcher::CharacterMatcher;

/// How a [`PatternSequence`] has to line up with a stored word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// The word must start with the sequence.
    Prefix,
    /// The word must have exactly the sequence's length and match at every position.
    Word,
    /// The sequence must occur as a contiguous run anywhere in the word.
    Fragment,
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::Prefix => write!(f, "Prefix"),
            MatchMode::Word => write!(f, "Word"),
            MatchMode::Fragment => write!(f, "Fragment"),
        }
    }
}

/// An ordered sequence of character matchers plus a [`MatchMode`].
///
/// The empty sequence matches every word in every mode.
///
/// ```
/// use libtrie::trie::{MatchMode, PatternSequence};
///
/// let pattern = PatternSequence::parse("w***d", '*', MatchMode::Word).unwrap();
/// assert!(pattern.matches_word("woord"));
/// assert!(!pattern.matches_word("woorden"));
///
/// // A fragment bounded by wildcards on both ends would match nearly everything.
/// assert!(PatternSequence::parse("*o*", '*', MatchMode::Fragment).is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PatternRepr", into = "PatternRepr")]
pub struct PatternSequence {
    matchers: SmallVec<[CharacterMatcher; 8]>,
    mode: MatchMode,
}

impl PatternSequence {
    /// Builds a pattern from matchers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for a [`MatchMode::Fragment`] pattern whose first
    /// and last matchers are both wildcards. A single wildcard end is accepted: `"ab*"`
    /// matches any word with `ab` followed by at least one more character.
    pub fn new(
        matchers: impl IntoIterator<Item = CharacterMatcher>,
        mode: MatchMode,
    ) -> Result<Self> {
        let pattern = PatternSequence {
            matchers: matchers.into_iter().collect(),
            mode,
        };
        pattern.validate()?;
        Ok(pattern)
    }

    /// Builds a pattern where every character must match literally.
    ///
    /// Literal patterns contain no wildcards, so this cannot fail.
    pub fn literal(text: &str, mode: MatchMode) -> Self {
        PatternSequence {
            matchers: text.chars().map(CharacterMatcher::exact).collect(),
            mode,
        }
    }

    /// Builds a pattern from optional characters; `None` becomes a wildcard.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn from_placeholders(
        chars: impl IntoIterator<Item = Option<char>>,
        mode: MatchMode,
    ) -> Result<Self> {
        Self::new(chars.into_iter().map(CharacterMatcher::from), mode)
    }

    /// Builds a pattern from text where every `placeholder` character is a wildcard.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn parse(text: &str, placeholder: char, mode: MatchMode) -> Result<Self> {
        Self::from_placeholders(
            text.chars().map(|ch| (ch != placeholder).then_some(ch)),
            mode,
        )
    }

    fn validate(&self) -> Result<()> {
        if self.mode != MatchMode::Fragment {
            return Ok(());
        }
        if let (Some(first), Some(last)) = (self.matchers.first(), self.matchers.last()) {
            if first.is_wildcard() && last.is_wildcard() {
                return Err(Error::invalid(format!(
                    "fragment pattern '{self}' is bounded by wildcards on both ends"
                )));
            }
        }
        Ok(())
    }

    /// The match mode.
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// The matchers, in order.
    pub fn matchers(&self) -> &[CharacterMatcher] {
        &self.matchers
    }

    /// Number of matchers (the number of characters a match spans).
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    /// True if the pattern has no matchers and therefore matches every word.
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Tests a single word against this pattern without a trie.
    ///
    /// This is the reference semantics every trie search must agree with.
    pub fn matches_word(&self, word: &str) -> bool {
        let chars: SmallVec<[char; 32]> = word.chars().collect();
        self.matches_chars(&chars)
    }

    /// Like [`matches_word`](Self::matches_word) for an already collected word.
    pub fn matches_chars(&self, word: &[char]) -> bool {
        let n = self.matchers.len();
        if n == 0 {
            return true;
        }
        let lines_up = |window: &[char]| {
            self.matchers
                .iter()
                .zip(window)
                .all(|(matcher, &ch)| matcher.matches(ch))
        };
        match self.mode {
            MatchMode::Prefix => word.len() >= n && lines_up(&word[..n]),
            MatchMode::Word => word.len() == n && lines_up(word),
            MatchMode::Fragment => word.windows(n).any(lines_up),
        }
    }
}

impl fmt::Display for PatternSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.matchers.iter().join(""))
    }
}

#[derive(Serialize, Deserialize)]
struct PatternRepr {
    matchers: Vec<CharacterMatcher>,
    mode: MatchMode,
}

impl TryFrom<PatternRepr> for PatternSequence {
    type Error = Error;

    fn try_from(repr: PatternRepr) -> Result<Self> {
        PatternSequence::new(repr.matchers, repr.mode)
    }
}

impl From<PatternSequence> for PatternRepr {
    fn from(pattern: PatternSequence) -> Self {
        PatternRepr {
            matchers: pattern.matchers.into_vec(),
            mode: pattern.mode,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn fragment(text: &str) -> PatternSequence {
        PatternSequence::parse(text, '*', MatchMode::Fragment).unwrap()
    }

    #[test]
    fn literal_maps_to_exact_matchers() {
        let p = PatternSequence::literal("wo", MatchMode::Prefix);
        assert_eq!(p.len(), 2);
        assert_eq!(p.matchers()[0], CharacterMatcher::exact('w'));
        assert_eq!(p.mode(), MatchMode::Prefix);
        assert_eq!(p.to_string(), "wo");
    }

    #[test]
    fn placeholders_become_wildcards() {
        let p = PatternSequence::from_placeholders([Some('u'), Some('s'), None, Some('o')], MatchMode::Fragment)
            .unwrap();
        assert!(p.matchers()[2].is_wildcard());
        assert_eq!(p.to_string(), "us*o");
        assert_eq!(p, fragment("us*o"));
    }

    #[test]
    fn fragment_bounded_by_wildcards_is_rejected() {
        for text in ["*", "**", "*o*", "*oo*"] {
            let err = PatternSequence::parse(text, '*', MatchMode::Fragment).unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)), "{text}");
        }
        // One open boundary is still a meaningful fragment.
        assert!(PatternSequence::parse("*o", '*', MatchMode::Fragment).is_ok());
        assert!(PatternSequence::parse("o*", '*', MatchMode::Fragment).is_ok());
        // Other modes allow wildcard boundaries.
        assert!(PatternSequence::parse("*o*", '*', MatchMode::Word).is_ok());
        assert!(PatternSequence::parse("*", '*', MatchMode::Prefix).is_ok());
    }

    #[test]
    fn open_end_needs_a_character_there() {
        let p = fragment("ab*");
        assert!(p.matches_word("abc"));
        assert!(p.matches_word("xabyz"));
        assert!(!p.matches_word("xab"));

        let p = fragment("*ab");
        assert!(p.matches_word("cab"));
        assert!(!p.matches_word("abc"));
    }

    #[test]
    fn empty_pattern_matches_everything() {
        for mode in [MatchMode::Prefix, MatchMode::Word, MatchMode::Fragment] {
            let p = PatternSequence::new([], mode).unwrap();
            assert!(p.is_empty());
            assert!(p.matches_word("woord"));
            assert!(p.matches_word(""));
        }
    }

    #[test]
    fn reference_semantics() {
        let prefix = PatternSequence::literal("wo", MatchMode::Prefix);
        assert!(prefix.matches_word("woord"));
        assert!(prefix.matches_word("wo"));
        assert!(!prefix.matches_word("w"));
        assert!(!prefix.matches_word("zwo"));

        let word = PatternSequence::parse("w***d", '*', MatchMode::Word).unwrap();
        assert!(word.matches_word("woord"));
        assert!(!word.matches_word("woorden"));
        assert!(!word.matches_word("wapens"));

        let frag = fragment("oord");
        assert!(frag.matches_word("lustoord"));
        assert!(frag.matches_word("woorden"));
        assert!(!frag.matches_word("oor"));
    }

    #[test]
    fn alternatives_inside_pattern() {
        let p = PatternSequence::new(
            [
                CharacterMatcher::exact('c'),
                CharacterMatcher::with_alternatives('a', ['á', 'ä']),
                CharacterMatcher::exact('t'),
            ],
            MatchMode::Word,
        )
        .unwrap();
        assert!(p.matches_word("cat"));
        assert!(p.matches_word("cät"));
        assert!(!p.matches_word("cot"));
        assert_eq!(p.to_string(), "c[aáä]t");
    }

    #[test]
    fn serde_validates_on_the_way_in() {
        let p = fragment("us*o");
        let json = serde_json::to_string(&p).unwrap();
        let back: PatternSequence = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);

        let bad = r#"{"matchers":[{"primary":null,"alternatives":null}],"mode":"fragment"}"#;
        assert!(serde_json::from_str::<PatternSequence>(bad).is_err());
    }
}
