//! Lazy pattern search over a [`Trie`].
//!
//! All three match modes run as one depth-first walk driven by an explicit stack,
//! so results are produced one at a time and a query never holds more than the
//! stack and a character buffer as deep as the longest word.
//!
//! Prefix and word searches advance a single match position per branch and prune
//! any subtree whose `remaining_depth` is shorter than the unmatched rest of the
//! pattern.
//!
//! Fragment search has to find the pattern starting at any depth. Every node on
//! the current path whose character matched the first matcher is the origin of an
//! attempt; each frame carries the matched lengths of all attempts still alive at
//! that node. A character either extends an attempt or ends it, and a new attempt
//! starts wherever the first matcher accepts. Because an attempt that breaks does
//! not hide any other attempt started later on the same path, no restart from an
//! earlier node is ever needed. Each node is visited once per query and the first
//! completed attempt turns the rest of the subtree into plain collection, so every
//! containing word is yielded exactly once.

use smallvec::SmallVec;
use tracing::trace;

use super::node_arena::NodeId;
use super::pattern::{MatchMode, PatternSequence};
use super::tree::Trie;

/// Matched lengths of the fragment attempts alive at a node, one per retry origin.
type Attempts = SmallVec<[usize; 4]>;

enum State {
    /// Every word in the subtree is a result.
    Collect,
    /// Prefix or word mode with this many matchers satisfied.
    Anchored(usize),
    /// Fragment mode with these attempts in flight.
    Fragment(Attempts),
}

struct Frame {
    node: NodeId,
    /// Length of the path from the root to `node`.
    depth: usize,
    /// The character on the edge into `node`; `None` only for the root.
    letter: Option<char>,
    state: State,
}

/// Lazy iterator over the words matching a [`PatternSequence`].
///
/// Created by [`Trie::find`], [`Trie::find_text`] and [`Trie::words`].
/// Words come out in depth-first order with children visited in ascending
/// letter order; a word is always yielded before its extensions.
pub struct Matches<'t, V> {
    trie: &'t Trie<V>,
    pattern: PatternSequence,
    stack: Vec<Frame>,
    buffer: Vec<char>,
}

impl<'t, V> Matches<'t, V> {
    pub(crate) fn new(trie: &'t Trie<V>, pattern: PatternSequence) -> Self {
        let root = &trie.arena[trie.root];
        let len = pattern.len();
        let mut matches = Matches {
            trie,
            pattern,
            stack: Vec::new(),
            buffer: Vec::new(),
        };

        let state = if len == 0 {
            State::Collect
        } else if len > root.remaining_depth {
            trace!(len, depth = root.remaining_depth, "pattern longer than any word");
            return matches;
        } else {
            match matches.pattern.mode() {
                MatchMode::Prefix | MatchMode::Word => State::Anchored(0),
                MatchMode::Fragment => State::Fragment(Attempts::new()),
            }
        };
        trace!(pattern = %matches.pattern, mode = %matches.pattern.mode(), "search started");
        matches.stack.push(Frame {
            node: trie.root,
            depth: 0,
            letter: None,
            state,
        });
        matches
    }

    /// Turns this iterator into one that also yields the value attached to each word.
    ///
    /// ```
    /// use libtrie::trie::Trie;
    ///
    /// let trie = Trie::from_entries([("zijn", 1), ("zij", 2)]).unwrap();
    /// let entries: Vec<(String, Option<&i32>)> = trie.find_text("zij", true).with_values().collect();
    /// assert_eq!(entries, [("zij".to_string(), Some(&2)), ("zijn".to_string(), Some(&1))]);
    /// ```
    pub fn with_values(self) -> Entries<'t, V> {
        Entries { inner: self }
    }

    /// The pattern being searched for.
    pub fn pattern(&self) -> &PatternSequence {
        &self.pattern
    }

    /// Advances to the next matching word node. The word itself is left in `buffer`.
    fn next_node(&mut self) -> Option<NodeId> {
        let trie = self.trie;
        let len = self.pattern.len();
        while let Some(frame) = self.stack.pop() {
            self.buffer.truncate(frame.depth.saturating_sub(1));
            if let Some(letter) = frame.letter {
                self.buffer.push(letter);
            }
            let node = &trie.arena[frame.node];
            let stack = &mut self.stack;

            match &frame.state {
                State::Collect => {
                    push_children(stack, trie, &frame, |_| Some(State::Collect));
                    if node.word {
                        return Some(frame.node);
                    }
                }
                State::Anchored(matched) if *matched == len => {
                    // Word mode needs the length to match exactly, so nothing below counts.
                    if self.pattern.mode() == MatchMode::Prefix {
                        push_children(stack, trie, &frame, |_| Some(State::Collect));
                    }
                    if node.word {
                        return Some(frame.node);
                    }
                }
                State::Anchored(matched) => {
                    let matched = *matched;
                    if node.remaining_depth < len - matched {
                        continue;
                    }
                    let matcher = &self.pattern.matchers()[matched];
                    push_children(stack, trie, &frame, |(letter, _)| {
                        matcher
                            .matches(letter)
                            .then_some(State::Anchored(matched + 1))
                    });
                }
                State::Fragment(attempts) => {
                    let matchers = self.pattern.matchers();
                    push_children(stack, trie, &frame, |(letter, child)| {
                        let room = trie.arena[child].remaining_depth;
                        let mut next: Attempts = attempts
                            .iter()
                            .filter(|&&matched| matchers[matched].matches(letter))
                            .map(|&matched| matched + 1)
                            .collect();
                        if matchers[0].matches(letter) {
                            next.push(1);
                        }
                        if next.contains(&len) {
                            return Some(State::Collect);
                        }
                        // Drop attempts that cannot be completed below the child.
                        next.retain(|matched| len - *matched <= room);
                        // A fresh attempt can still start below the child if it is deep enough.
                        (!next.is_empty() || room >= len).then_some(State::Fragment(next))
                    });
                }
            }
        }
        None
    }
}

/// Pushes the children of `frame` for which `state_for` yields a state, in reverse
/// letter order so that they pop in ascending order.
fn push_children<V>(
    stack: &mut Vec<Frame>,
    trie: &Trie<V>,
    frame: &Frame,
    mut state_for: impl FnMut((char, NodeId)) -> Option<State>,
) {
    let node = &trie.arena[frame.node];
    for (letter, child) in node.children.iter().rev() {
        if let Some(state) = state_for((letter, child)) {
            stack.push(Frame {
                node: child,
                depth: frame.depth + 1,
                letter: Some(letter),
                state,
            });
        }
    }
}

impl<V> Iterator for Matches<'_, V> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.next_node()?;
        Some(self.buffer.iter().collect())
    }
}

/// Lazy iterator over `(word, value)` pairs, see [`Matches::with_values`].
pub struct Entries<'t, V> {
    inner: Matches<'t, V>,
}

impl<'t, V> Iterator for Entries<'t, V> {
    type Item = (String, Option<&'t V>);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.inner.next_node()?;
        let value = self.inner.trie.arena[id].value.as_ref();
        Some((self.inner.buffer.iter().collect(), value))
    }
}

#[cfg(test)]
mod test {
    use itertools::Itertools;

    use super::super::matcher::CharacterMatcher;
    use super::*;

    const SEED: [&str; 6] = ["woord", "woorden", "zijn", "wapens", "logos", "lustoord"];

    fn seeded() -> Trie {
        Trie::from_words(SEED).unwrap()
    }

    fn sorted(words: impl Iterator<Item = String>) -> Vec<String> {
        words.sorted().collect()
    }

    fn fragment(text: &str) -> PatternSequence {
        PatternSequence::parse(text, '*', MatchMode::Fragment).unwrap()
    }

    fn brute_force(trie: &Trie, pattern: &PatternSequence) -> Vec<String> {
        trie.words().filter(|w| pattern.matches_word(w)).sorted().collect()
    }

    #[test]
    fn prefix_search() {
        let trie = seeded();
        assert_eq!(sorted(trie.find_text("wo", true)), ["woord", "woorden"]);
        assert_eq!(sorted(trie.find_text("l", true)), ["logos", "lustoord"]);
        assert_eq!(trie.find_text("x", true).count(), 0);
    }

    #[test]
    fn empty_pattern_returns_all_words_in_every_mode() {
        let trie = seeded();
        let all = sorted(SEED.iter().map(|s| s.to_string()));
        for mode in [MatchMode::Prefix, MatchMode::Word, MatchMode::Fragment] {
            let pattern = PatternSequence::new([], mode).unwrap();
            assert_eq!(sorted(trie.find(&pattern)), all, "{mode}");
        }
    }

    #[test]
    fn words_come_out_in_letter_order() {
        let trie = seeded();
        let words: Vec<String> = trie.words().collect();
        assert_eq!(words, ["logos", "lustoord", "wapens", "woord", "woorden", "zijn"]);
    }

    #[test]
    fn exact_word_search() {
        let trie = seeded();
        assert_eq!(sorted(trie.find_text("woord", false)), ["woord"]);
        assert_eq!(trie.find_text("woorde", false).count(), 0);
    }

    #[test]
    fn word_mode_with_wildcards() {
        let trie = seeded();
        let pattern = PatternSequence::parse("w***d", '*', MatchMode::Word).unwrap();
        assert_eq!(sorted(trie.find(&pattern)), ["woord"]);

        let pattern = PatternSequence::parse("****", '*', MatchMode::Word).unwrap();
        assert_eq!(sorted(trie.find(&pattern)), ["zijn"]);
    }

    #[test]
    fn fragment_search() {
        let trie = seeded();
        assert_eq!(sorted(trie.find(&fragment("oord"))), ["lustoord", "woord", "woorden"]);
        assert_eq!(sorted(trie.find(&fragment("n"))), ["wapens", "woorden", "zijn"]);
        assert_eq!(sorted(trie.find(&fragment("us*o"))), ["lustoord"]);
        assert_eq!(sorted(trie.find(&fragment("os"))), ["logos"]);
        assert_eq!(trie.find(&fragment("oo*x")).count(), 0);
    }

    #[test]
    fn fragment_with_alternatives() {
        let trie: Trie = Trie::from_words(["café", "cafe", "cafeïne", "koffie"]).unwrap();
        let pattern = PatternSequence::new(
            [
                CharacterMatcher::exact('f'),
                CharacterMatcher::with_alternatives('e', ['é']),
            ],
            MatchMode::Fragment,
        )
        .unwrap();
        assert_eq!(sorted(trie.find(&pattern)), ["cafe", "cafeïne", "café"]);
    }

    #[test]
    fn fragment_restarts_inside_a_broken_attempt() {
        // "aab" inside "aaab" only matches from the second 'a'.
        let trie: Trie = Trie::from_words(["aaab", "aab", "abab", "ab", "aaaa"]).unwrap();
        assert_eq!(sorted(trie.find(&fragment("aab"))), ["aaab", "aab"]);
        assert_eq!(sorted(trie.find(&fragment("abab"))), ["abab"]);
    }

    #[test]
    fn overlapping_occurrences_yield_once() {
        let trie: Trie = Trie::from_words(["aaaaaa", "aabaab", "baaab"]).unwrap();
        let hits: Vec<String> = trie.find(&fragment("aa")).collect();
        assert_eq!(hits.len(), 3);
        assert_eq!(sorted(hits.into_iter()), ["aaaaaa", "aabaab", "baaab"]);
    }

    #[test]
    fn fragment_at_word_end_and_start() {
        let trie: Trie = Trie::from_words(["abc", "bca", "cab"]).unwrap();
        assert_eq!(sorted(trie.find(&fragment("ab"))), ["abc", "cab"]);
        assert_eq!(sorted(trie.find(&fragment("ca"))), ["bca", "cab"]);
        assert_eq!(sorted(trie.find(&fragment("c"))), ["abc", "bca", "cab"]);
    }

    #[test]
    fn fragment_with_one_open_boundary() {
        let trie = seeded();
        assert_eq!(sorted(trie.find(&fragment("*oord"))), ["lustoord", "woord", "woorden"]);
        assert_eq!(sorted(trie.find(&fragment("ord*"))), ["woorden"]);
    }

    #[test]
    fn pattern_longer_than_any_word_yields_nothing() {
        let trie = seeded();
        let matches = trie.find(&fragment("abcdefghijk"));
        assert!(matches.stack.is_empty());
        assert_eq!(matches.count(), 0);
        assert!(trie.find_text("woordenboek", true).stack.is_empty());
    }

    #[test]
    fn values_alongside_words() {
        let trie: Trie<u8> = Trie::from_entries([("woord", 1), ("woorden", 2), ("zijn", 3)]).unwrap();
        let entries: Vec<(String, Option<&u8>)> = trie.find(&fragment("oord")).with_values().collect();
        assert_eq!(
            entries,
            [("woord".to_string(), Some(&1)), ("woorden".to_string(), Some(&2))]
        );
        let mut trie = trie;
        trie.add("zij").unwrap();
        let entries: Vec<_> = trie.find_text("zij", true).with_values().collect();
        assert_eq!(entries, [("zij".to_string(), None), ("zijn".to_string(), Some(&3))]);
    }

    #[test]
    fn searches_agree_with_brute_force() {
        let words = [
            "a", "ab", "aba", "abab", "ababa", "baab", "bba", "abba", "aabb", "bbbb", "ba",
        ];
        let trie: Trie = Trie::from_words(words).unwrap();
        let patterns = ["a", "b", "ab", "ba", "aba", "bab", "a*a", "b*b", "ab*", "*ba", "abab"];
        for text in patterns {
            for mode in [MatchMode::Prefix, MatchMode::Word, MatchMode::Fragment] {
                let pattern = PatternSequence::parse(text, '*', mode).unwrap();
                let found: Vec<String> = trie.find(&pattern).sorted().collect();
                assert_eq!(found, brute_force(&trie, &pattern), "{text} {mode}");
            }
        }
    }

    #[test]
    fn search_is_lazy() {
        let trie = seeded();
        let mut matches = trie.words();
        assert_eq!(matches.next().as_deref(), Some("logos"));
        // Only the unexplored siblings are on the stack, not every word.
        assert!(matches.stack.len() < trie.num_nodes());
        assert_eq!(matches.next().as_deref(), Some("lustoord"));
    }
}
