//! # libtrie
//!
//! A word index built on a prefix tree (trie) with prefix, exact-length, and
//! fragment (substring) pattern search, optional per-word values, in-place
//! add/remove that keeps the tree minimal, and a compact preorder serialization.
//!
//! ## Features
//!
//! - **Pattern search**: per-position matchers with wildcards and alternative
//!   characters, in [`Prefix`](trie::MatchMode::Prefix), [`Word`](trie::MatchMode::Word)
//!   or [`Fragment`](trie::MatchMode::Fragment) mode
//! - **Lazy**: searches are iterators that hold only a stack and one word buffer
//! - **Pruned**: every node caches its subtree depth, so subtrees too shallow for
//!   the rest of a pattern are never entered
//! - **Map mode**: attach any value to a word with [`Trie::insert`](trie::Trie::insert)
//! - **Minimal**: [`Trie::remove`](trie::Trie::remove) trims every node that no longer
//!   leads to a word, and trimmed nodes are recycled
//!
//! ## Quick Start
//!
//! ```
//! use libtrie::trie::{MatchMode, PatternSequence, Trie};
//!
//! let trie: Trie = Trie::from_words(["woord", "woorden", "zijn", "wapens", "logos", "lustoord"]).unwrap();
//!
//! let mut words: Vec<String> = trie.find_text("wo", true).collect();
//! words.sort();
//! assert_eq!(words, ["woord", "woorden"]);
//!
//! let pattern = PatternSequence::parse("us*o", '*', MatchMode::Fragment).unwrap();
//! assert_eq!(trie.find(&pattern).collect::<Vec<_>>(), ["lustoord"]);
//!
//! let pattern = PatternSequence::parse("w***d", '*', MatchMode::Word).unwrap();
//! assert_eq!(trie.find(&pattern).collect::<Vec<_>>(), ["woord"]);
//! ```
//!
//! ## Values
//!
//! ```
//! use libtrie::trie::Trie;
//!
//! let mut trie = Trie::new();
//! trie.insert("zijn", 7u32).unwrap();
//! trie.insert("zij", 3).unwrap();
//! assert_eq!(trie.find_value("zijn"), Some(&7));
//! assert_eq!(trie.get_word(&3).as_deref(), Some("zij"));
//! ```
//!
//! ## Serialization
//!
//! With the `bincode` feature (enabled by default) a trie can be written to any
//! [`std::io::Write`] and read back from any [`std::io::Read`]:
//!
//! ```
//! # #[cfg(feature = "bincode")] {
//! use libtrie::trie::Trie;
//!
//! let trie: Trie = Trie::from_words(["logos", "lustoord"]).unwrap();
//! let mut bytes = Vec::new();
//! trie.write_to(&mut bytes).unwrap();
//! let copy: Trie = Trie::read_from(bytes.as_slice()).unwrap();
//! assert_eq!(copy.words().collect::<Vec<_>>(), ["logos", "lustoord"]);
//! # }
//! ```

#![warn(missing_docs)]

/// Core trie data structure: nodes, patterns, search, and serialization.
pub mod trie;

pub use trie::{CharacterMatcher, Error, MatchMode, PatternSequence, Result, Trie};
