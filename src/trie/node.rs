use super::children::Children;
use super::node_arena::NodeId;
use super::tree::Trie;

/// A node in the trie.
///
/// The character a node stands for lives on its parent's edge. `num_words` and
/// `remaining_depth` are caches over the subtree; [`Trie`] recomputes them along
/// every mutated path before a mutating call returns.
#[derive(Clone, Debug)]
pub(crate) struct TrieNode<V> {
    pub(crate) children: Children,
    pub(crate) word: bool,
    pub(crate) value: Option<V>,
    pub(crate) num_words: usize,
    pub(crate) remaining_depth: usize,
}

impl<V> TrieNode<V> {
    /// Creates a childless, non-word node.
    pub fn new() -> Self {
        TrieNode {
            children: Children::None,
            word: false,
            value: None,
            num_words: 0,
            remaining_depth: 0,
        }
    }

    /// True if this node may be trimmed: it ends no word and leads to none.
    #[inline]
    pub fn is_dead(&self) -> bool {
        !self.word && self.children.is_empty()
    }
}

/// A read-only view of one node inside a [`Trie`].
///
/// ```
/// use libtrie::trie::Trie;
///
/// let trie: Trie = Trie::from_words(["woord", "woorden"]).unwrap();
/// let node = trie.node("woord").unwrap();
/// assert!(node.is_word());
/// assert_eq!(node.num_words(), 2);
/// assert_eq!(node.remaining_depth(), 2);
/// assert!(node.get('e').is_some());
/// ```
pub struct NodeRef<'t, V> {
    trie: &'t Trie<V>,
    id: NodeId,
}

impl<V> Clone for NodeRef<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for NodeRef<'_, V> {}

impl<'t, V> NodeRef<'t, V> {
    pub(crate) fn new(trie: &'t Trie<V>, id: NodeId) -> Self {
        NodeRef { trie, id }
    }

    #[inline]
    fn node(&self) -> &'t TrieNode<V> {
        &self.trie.arena[self.id]
    }

    /// Returns the node that letter's edge leads to, or None if no such edge exists.
    #[inline]
    pub fn get(&self, letter: char) -> Option<NodeRef<'t, V>> {
        self.node()
            .children
            .find(letter)
            .map(|id| NodeRef::new(self.trie, id))
    }

    /// True if the path to this node spells a stored word.
    #[inline]
    pub fn is_word(&self) -> bool {
        self.node().word
    }

    /// The value attached to the word ending here, if any.
    pub fn value(&self) -> Option<&'t V> {
        self.node().value.as_ref()
    }

    /// Returns an iterator over `(letter, child)` pairs in ascending letter order.
    pub fn children(&self) -> impl ExactSizeIterator<Item = (char, NodeRef<'t, V>)> + 't {
        let trie = self.trie;
        self.node()
            .children
            .iter()
            .map(move |(ch, id)| (ch, NodeRef::new(trie, id)))
    }

    /// Returns the number of children.
    pub fn child_count(&self) -> usize {
        self.node().children.len()
    }

    /// Number of words stored in this subtree, including this node.
    pub fn num_words(&self) -> usize {
        self.node().num_words
    }

    /// Length of the longest path below this node; `0` for a leaf.
    pub fn remaining_depth(&self) -> usize {
        self.node().remaining_depth
    }
}

impl<V> std::fmt::Debug for NodeRef<'_, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("is_word", &self.is_word())
            .field("child_count", &self.child_count())
            .field("num_words", &self.num_words())
            .field("remaining_depth", &self.remaining_depth())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fresh_node_is_dead() {
        let n = TrieNode::<()>::new();
        assert!(n.is_dead());
        assert_eq!(n.num_words, 0);
        assert_eq!(n.remaining_depth, 0);
    }

    #[test]
    fn view_walks_edges() {
        let trie: Trie<u32> = Trie::from_entries([("zijn", 1), ("zij", 2)]).unwrap();
        let root = trie.root();
        assert!(!root.is_word());
        assert_eq!(root.child_count(), 1);

        let zij = root.get('z').and_then(|n| n.get('i')).and_then(|n| n.get('j')).unwrap();
        assert!(zij.is_word());
        assert_eq!(zij.value(), Some(&2));
        let (letter, zijn) = zij.children().next().unwrap();
        assert_eq!(letter, 'n');
        assert_eq!(zijn.value(), Some(&1));
        assert_eq!(zijn.remaining_depth(), 0);
        assert!(zijn.get('x').is_none());
    }
}
