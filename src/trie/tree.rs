use smallvec::{smallvec, SmallVec};
use tracing::debug;

use super::error::{Error, Result};
use super::node::{NodeRef, TrieNode};
use super::node_arena::{NodeArena, NodeId};
use super::pattern::{MatchMode, PatternSequence};
use super::search::Matches;
use super::word::{IntoWord, WordBuf, WORD_INLINE};

type Path = SmallVec<[NodeId; WORD_INLINE]>;

/// A prefix tree over words with an optional value per word.
///
/// Nodes live in an arena and are addressed by index; nodes trimmed by
/// [`remove`](Trie::remove) are recycled by later [`add`](Trie::add) calls.
/// Every node lies on the path of at least one stored word.
///
/// Searches borrow the trie immutably and mutations need `&mut self`, so a search
/// can never observe a half-applied mutation.
///
/// # Examples
///
/// ```
/// use libtrie::trie::{MatchMode, PatternSequence, Trie};
///
/// let mut trie: Trie = Trie::from_words(["woord", "woorden", "zijn", "lustoord"]).unwrap();
/// assert!(trie.contains("woord", false).unwrap());
/// assert!(trie.contains("wo", true).unwrap());
///
/// let fragment = PatternSequence::literal("oord", MatchMode::Fragment);
/// let mut hits: Vec<String> = trie.find(&fragment).collect();
/// hits.sort();
/// assert_eq!(hits, ["lustoord", "woord", "woorden"]);
///
/// assert!(trie.remove("woord", false).unwrap());
/// assert!(!trie.contains("woord", false).unwrap());
/// assert!(trie.contains("woorden", false).unwrap());
/// ```
pub struct Trie<V = ()> {
    pub(crate) arena: NodeArena<TrieNode<V>>,
    pub(crate) root: NodeId,
}

impl<V> Default for Trie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Trie<V> {
    /// Creates an empty trie.
    pub fn new() -> Self {
        let (arena, root) = NodeArena::with_first(TrieNode::new());
        Trie { arena, root }
    }

    /// Builds a trie from a sequence of words, in any order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] on the first empty word.
    pub fn from_words<W: IntoWord>(words: impl IntoIterator<Item = W>) -> Result<Self> {
        let mut trie = Self::new();
        trie.extend_words(words)?;
        Ok(trie)
    }

    /// Builds a trie from `(word, value)` pairs. Later duplicates overwrite earlier values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] on the first empty word.
    pub fn from_entries<W: IntoWord>(entries: impl IntoIterator<Item = (W, V)>) -> Result<Self> {
        let mut trie = Self::new();
        for (word, value) in entries {
            trie.insert(word, value)?;
        }
        Ok(trie)
    }

    /// Adds every word of the sequence and returns how many were new.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] on the first empty word; words before it stay added.
    pub fn extend_words<W: IntoWord>(&mut self, words: impl IntoIterator<Item = W>) -> Result<usize> {
        let mut added = 0;
        for word in words {
            added += usize::from(self.add(word)?);
        }
        debug!(added, total = self.num_words(), "bulk load finished");
        Ok(added)
    }

    /// Adds a word without a value.
    ///
    /// Returns `true` if the word was new. Adding an existing word keeps its value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the word is empty, or if the
    /// word needs new nodes after every `u32` node index is taken. A failed add leaves
    /// the trie unchanged.
    ///
    /// ```
    /// use libtrie::trie::Trie;
    ///
    /// let mut trie: Trie = Trie::new();
    /// assert!(trie.add("woord").unwrap());
    /// assert!(!trie.add("woord").unwrap()); // already present
    /// assert!(trie.add("").is_err());
    /// ```
    pub fn add(&mut self, word: impl IntoWord) -> Result<bool> {
        let word = word.collect_word();
        self.add_entry(&word, None)
    }

    /// Adds a word and attaches `value` to it, replacing any previous value.
    ///
    /// Returns `true` if the word was new.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the word is empty, or if the
    /// word needs new nodes after every `u32` node index is taken. A failed add leaves
    /// the trie unchanged.
    pub fn insert(&mut self, word: impl IntoWord, value: V) -> Result<bool> {
        let word = word.collect_word();
        self.add_entry(&word, Some(value))
    }

    fn add_entry(&mut self, word: &[char], value: Option<V>) -> Result<bool> {
        if word.is_empty() {
            return Err(Error::invalid("cannot add an empty word"));
        }

        // path[i] is the node reached after word[..i].
        let mut path: Path = smallvec![self.root];
        let mut current = self.root;
        let mut created = 0usize;
        for &ch in word {
            current = match self.arena[current].children.find(ch) {
                Some(child) => child,
                None => {
                    let Some(child) = self.arena.alloc(TrieNode::new()) else {
                        // Nodes created so far lead nowhere yet.
                        self.trim(word, &mut path);
                        return Err(Error::invalid(format!(
                            "no room for a word of {} characters: every node index is taken",
                            word.len()
                        )));
                    };
                    self.arena[current].children.insert(ch, child);
                    created += 1;
                    child
                }
            };
            path.push(current);
        }

        let terminal = &mut self.arena[current];
        let is_new = !terminal.word;
        terminal.word = true;
        if value.is_some() {
            terminal.value = value;
        }
        self.refresh_path(&path);

        if is_new {
            debug!(len = word.len(), created, "word added");
        }
        Ok(is_new)
    }

    /// Returns `true` if `word` is stored, or with `as_prefix` if any stored word starts with it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `word` is empty.
    pub fn contains(&self, word: impl IntoWord, as_prefix: bool) -> Result<bool> {
        let word = non_empty(word, "contains")?;
        Ok(self
            .locate(&word)
            .is_some_and(|id| as_prefix || self.arena[id].word))
    }

    /// Returns the value attached to `word`, if the word is stored and has one.
    pub fn find_value(&self, word: impl IntoWord) -> Option<&V> {
        let word = word.collect_word();
        self.locate(&word)
            .and_then(|id| self.arena[id].value.as_ref())
    }

    /// Returns the first word, in traversal order, whose value equals `value`.
    ///
    /// This is a linear scan over every stored word.
    pub fn get_word(&self, value: &V) -> Option<String>
    where
        V: PartialEq,
    {
        self.words()
            .with_values()
            .find_map(|(word, v)| (v == Some(value)).then_some(word))
    }

    /// Lazily yields every word matching `pattern`.
    ///
    /// Each matching word is produced exactly once. Use
    /// [`Matches::with_values`] to get attached values as well.
    pub fn find(&self, pattern: &PatternSequence) -> Matches<'_, V> {
        Matches::new(self, pattern.clone())
    }

    /// Finds by literal text: words starting with `text` when `as_prefix`,
    /// otherwise the word equal to `text`.
    ///
    /// ```
    /// use libtrie::trie::Trie;
    ///
    /// let trie: Trie = Trie::from_words(["woord", "woorden", "zijn"]).unwrap();
    /// let mut words: Vec<String> = trie.find_text("wo", true).collect();
    /// words.sort();
    /// assert_eq!(words, ["woord", "woorden"]);
    /// assert_eq!(trie.find_text("zijn", false).count(), 1);
    /// ```
    pub fn find_text(&self, text: &str, as_prefix: bool) -> Matches<'_, V> {
        let mode = if as_prefix {
            MatchMode::Prefix
        } else {
            MatchMode::Word
        };
        Matches::new(self, PatternSequence::literal(text, mode))
    }

    /// Lazily yields every stored word.
    pub fn words(&self) -> Matches<'_, V> {
        self.find_text("", true)
    }

    /// Removes a word, or with `as_prefix` every word starting with `fragment`.
    ///
    /// Nodes left without words beneath them are trimmed. Returns `false` if
    /// nothing matched; that is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `fragment` is empty.
    ///
    /// ```
    /// use libtrie::trie::Trie;
    ///
    /// let mut trie: Trie = Trie::from_words(["woord", "woorden", "wapens"]).unwrap();
    /// assert!(trie.remove("woo", true).unwrap());
    /// assert_eq!(trie.num_words(), 1);
    /// assert!(!trie.remove("woord", false).unwrap());
    /// ```
    pub fn remove(&mut self, fragment: impl IntoWord, as_prefix: bool) -> Result<bool> {
        let word = non_empty(fragment, "remove")?;

        let mut path: Path = smallvec![self.root];
        for &ch in word.iter() {
            let last = path[path.len() - 1];
            match self.arena[last].children.find(ch) {
                Some(child) => path.push(child),
                None => return Ok(false),
            }
        }

        let terminal = path[path.len() - 1];
        let mut freed = 0usize;
        let removed_words;
        if as_prefix {
            // Detach the whole subtree; the trim below then starts at its parent.
            path.pop();
            let parent = path[path.len() - 1];
            self.arena[parent].children.remove(word[word.len() - 1]);
            removed_words = self.arena[terminal].num_words;
            freed += self.free_subtree(terminal);
        } else {
            let node = &mut self.arena[terminal];
            if !node.word {
                return Ok(false);
            }
            node.word = false;
            node.value = None;
            removed_words = 1;
        }

        freed += self.trim(&word, &mut path);
        self.refresh_path(&path);

        debug!(as_prefix, removed_words, freed, "removed");
        Ok(true)
    }

    /// Walks up from the end of `path`, deleting nodes that neither end a word nor
    /// have children. Stops at the first node that is still needed. The root is never
    /// deleted. Returns the number of nodes freed.
    fn trim(&mut self, word: &[char], path: &mut Path) -> usize {
        let mut freed = 0;
        while path.len() > 1 {
            let id = path[path.len() - 1];
            if !self.arena[id].is_dead() {
                break;
            }
            path.pop();
            // The edge into path[i] is word[i - 1].
            let letter = word[path.len() - 1];
            let parent = path[path.len() - 1];
            self.arena[parent].children.remove(letter);
            self.arena.free(id);
            freed += 1;
        }
        freed
    }

    /// Frees `id` and everything below it. Returns the number of nodes freed.
    fn free_subtree(&mut self, id: NodeId) -> usize {
        let mut freed = 0;
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.arena.free(id) {
                stack.extend(node.children.iter().map(|(_, child)| child));
                freed += 1;
            }
        }
        freed
    }

    /// Recomputes the cached subtree scalars of every node on `path`, deepest first.
    fn refresh_path(&mut self, path: &[NodeId]) {
        for &id in path.iter().rev() {
            self.refresh(id);
        }
    }

    /// Recomputes `num_words` and `remaining_depth` of one node from its children.
    pub(crate) fn refresh(&mut self, id: NodeId) {
        let (num_words, remaining_depth) = self.summarize(id);
        let node = &mut self.arena[id];
        node.num_words = num_words;
        node.remaining_depth = remaining_depth;
    }

    /// Computes `(num_words, remaining_depth)` of a node from its children's caches.
    fn summarize(&self, id: NodeId) -> (usize, usize) {
        let node = &self.arena[id];
        node.children
            .iter()
            .fold((usize::from(node.word), 0), |(words, depth), (_, child)| {
                let child = &self.arena[child];
                (words + child.num_words, depth.max(child.remaining_depth + 1))
            })
    }

    /// Follows `word` from the root.
    pub(crate) fn locate(&self, word: &[char]) -> Option<NodeId> {
        word.iter()
            .try_fold(self.root, |id, &ch| self.arena[id].children.find(ch))
    }

    /// Number of stored words.
    pub fn num_words(&self) -> usize {
        self.arena[self.root].num_words
    }

    /// Number of live nodes, including the root.
    pub fn num_nodes(&self) -> usize {
        self.arena.len()
    }

    /// True if no words are stored.
    pub fn is_empty(&self) -> bool {
        self.num_words() == 0
    }

    /// Removes every word and releases all nodes.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Returns a view of the root node.
    pub fn root(&self) -> NodeRef<'_, V> {
        NodeRef::new(self, self.root)
    }

    /// Returns a view of the node reached by `prefix`, if any stored word starts with it.
    pub fn node(&self, prefix: impl IntoWord) -> Option<NodeRef<'_, V>> {
        let prefix = prefix.collect_word();
        self.locate(&prefix).map(|id| NodeRef::new(self, id))
    }

    /// Verifies the structural invariants of the whole tree: the root carries no word,
    /// every value sits on a word node, no node is dead, and every cached scalar equals
    /// its recomputation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvariantViolation`] describing the first broken invariant.
    pub fn check_invariants(&self) -> Result<()> {
        let root = &self.arena[self.root];
        if root.word || root.value.is_some() {
            return Err(Error::InvariantViolation("root is marked as a word".into()));
        }
        let mut live = 0usize;
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            live += 1;
            let node = &self.arena[id];
            if id != self.root && node.is_dead() {
                return Err(Error::InvariantViolation(format!("dead node {id:?} was not trimmed")));
            }
            if node.value.is_some() && !node.word {
                return Err(Error::InvariantViolation(format!("value on non-word node {id:?}")));
            }
            if self.summarize(id) != (node.num_words, node.remaining_depth) {
                return Err(Error::InvariantViolation(format!("stale cache on node {id:?}")));
            }
            stack.extend(node.children.iter().map(|(_, child)| child));
        }
        if live != self.arena.len() {
            return Err(Error::InvariantViolation(format!(
                "{} nodes allocated but {live} reachable",
                self.arena.len()
            )));
        }
        Ok(())
    }
}

fn non_empty(word: impl IntoWord, operation: &str) -> Result<WordBuf> {
    let word = word.collect_word();
    if word.is_empty() {
        return Err(Error::invalid(format!("{operation}: word must not be empty")));
    }
    Ok(word)
}

impl<V> std::fmt::Debug for Trie<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trie")
            .field("num_words", &self.num_words())
            .field("num_nodes", &self.num_nodes())
            .finish()
    }
}
