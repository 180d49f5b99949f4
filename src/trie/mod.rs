/// Preorder record serialization.
pub mod codec;
/// Compact child storage for trie nodes.
mod children;
/// Error and result types.
mod error;
/// Single-character matchers.
pub mod matcher;
/// Trie nodes and read-only node views.
mod node;
/// Internal index arena with a free-list.
pub(crate) mod node_arena;
/// Patterns and match modes.
pub mod pattern;
/// Lazy search iterators.
pub mod search;
/// The trie itself: mutation and lookups.
mod tree;
/// Input conversion for words.
mod word;

pub use error::{Error, Result};
pub use matcher::CharacterMatcher;
pub use node::NodeRef;
pub use pattern::{MatchMode, PatternSequence};
pub use search::{Entries, Matches};
pub use tree::Trie;
pub use word::{IntoWord, WordBuf};
