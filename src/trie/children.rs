use super::node_arena::NodeId;

/// A compact representation of the children of a trie node that doesn't allocate until
/// there are at least three children.
///
/// Entries are kept sorted by character, which gives every traversal a
/// deterministic order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum Children {
    /// No children.
    #[default]
    None,
    /// Exactly one child (letter, node).
    One((char, NodeId)),
    /// Exactly two children (letter1, node1, letter2, node2), letter1 < letter2.
    Two((char, NodeId, char, NodeId)),
    /// Three or more children stored in a sorted vector.
    Many(Vec<(char, NodeId)>),
}

impl Children {
    /// Gets the child at the specified index.
    ///
    /// Returns `None` if the index is out of bounds.
    #[inline]
    pub fn get(&self, index: usize) -> Option<(char, NodeId)> {
        match self {
            Children::None => None,
            Children::One(child) => match index {
                0 => Some(*child),
                _ => None,
            },
            Children::Two((c1, n1, c2, n2)) => match index {
                0 => Some((*c1, *n1)),
                1 => Some((*c2, *n2)),
                _ => None,
            },
            Children::Many(children) => children.get(index).copied(),
        }
    }

    /// Returns the node that letter's edge leads to, or None if no such edge exists.
    #[inline]
    pub fn find(&self, letter: char) -> Option<NodeId> {
        match self {
            Children::None => None,
            Children::One((ch, node)) => (*ch == letter).then_some(*node),
            Children::Two((c1, n1, c2, n2)) => {
                if letter == *c1 {
                    Some(*n1)
                } else if letter == *c2 {
                    Some(*n2)
                } else {
                    None
                }
            }
            Children::Many(children) => {
                // Unrolling by 2 exposes load-level parallelism and beats a binary
                // search for the small fan-outs typical of natural-language word lists.
                let chunks = children.chunks_exact(2);
                let remainder = chunks.remainder();
                for chunk in chunks {
                    if chunk[0].0 == letter {
                        return Some(chunk[0].1);
                    }
                    if chunk[1].0 == letter {
                        return Some(chunk[1].1);
                    }
                }
                remainder
                    .iter()
                    .find(|&&(ch, _)| ch == letter)
                    .map(|&(_, node)| node)
            }
        }
    }

    /// Inserts an edge in sorted position.
    ///
    /// The letter must not already be present.
    pub fn insert(&mut self, letter: char, child: NodeId) {
        debug_assert!(self.find(letter).is_none(), "insert: letter already exists");
        *self = match std::mem::take(self) {
            Children::None => Children::One((letter, child)),
            Children::One((c1, n1)) => {
                if letter < c1 {
                    Children::Two((letter, child, c1, n1))
                } else {
                    Children::Two((c1, n1, letter, child))
                }
            }
            Children::Two((c1, n1, c2, n2)) => {
                let mut v = vec![(c1, n1), (c2, n2), (letter, child)];
                v.sort_by_key(|&(c, _)| c);
                Children::Many(v)
            }
            Children::Many(mut children) => {
                let pos = children.partition_point(|&(c, _)| c < letter);
                children.insert(pos, (letter, child));
                Children::Many(children)
            }
        };
    }

    /// Removes the edge labeled `letter` and returns the node it led to.
    ///
    /// Leaves the children untouched and returns `None` if `letter` is not present.
    pub fn remove(&mut self, letter: char) -> Option<NodeId> {
        let (removed, rest) = match std::mem::take(self) {
            Children::None => (None, Children::None),
            Children::One((c, n)) if c == letter => (Some(n), Children::None),
            Children::Two((c1, n1, c2, n2)) if c1 == letter => (Some(n1), Children::One((c2, n2))),
            Children::Two((c1, n1, c2, n2)) if c2 == letter => (Some(n2), Children::One((c1, n1))),
            Children::Many(mut children) => {
                match children.iter().position(|&(c, _)| c == letter) {
                    Some(pos) => {
                        let (_, node) = children.remove(pos);
                        let rest = match children.len() {
                            2 => Children::Two((
                                children[0].0,
                                children[0].1,
                                children[1].0,
                                children[1].1,
                            )),
                            _ => Children::Many(children),
                        };
                        (Some(node), rest)
                    }
                    None => (None, Children::Many(children)),
                }
            }
            unchanged => (None, unchanged),
        };
        *self = rest;
        removed
    }

    /// Returns the number of children.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Children::None => 0,
            Children::One(_) => 1,
            Children::Two(_) => 2,
            Children::Many(children) => children.len(),
        }
    }

    /// Returns `true` if there are no children.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Children::None)
    }

    /// Returns an iterator over all children in ascending letter order.
    #[inline]
    pub fn iter(&self) -> ChildIter<'_> {
        ChildIter {
            children: self,
            front: 0,
            back: self.len(),
        }
    }
}

/// An iterator over the children of a trie node.
#[derive(Clone)]
pub(crate) struct ChildIter<'c> {
    children: &'c Children,
    front: usize,
    back: usize,
}

impl Iterator for ChildIter<'_> {
    type Item = (char, NodeId);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let next_child = self.children.get(self.front);
        self.front += 1;
        next_child
    }

    /// Since we know the exact size, we can do better than the default implementation.
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back.saturating_sub(self.front);
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for ChildIter<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.children.get(self.back)
    }
}

impl ExactSizeIterator for ChildIter<'_> {}

#[cfg(test)]
mod test {
    use super::super::node_arena::NodeArena;
    use super::*;

    fn ids(n: usize) -> Vec<NodeId> {
        let mut arena = NodeArena::new();
        (0..n).map(|i| arena.alloc(i).unwrap()).collect()
    }

    #[test]
    fn no_children() {
        let c = Children::None;
        assert_eq!(c.iter().next(), None);
        assert_eq!(c.len(), 0);
        assert!(c.is_empty());
    }

    #[test]
    fn inserts_stay_sorted() {
        let id = ids(4);
        let mut c = Children::None;
        c.insert('d', id[0]);
        c.insert('b', id[1]);
        assert!(matches!(c, Children::Two(_)));
        c.insert('c', id[2]);
        c.insert('a', id[3]);
        let letters: Vec<char> = c.iter().map(|(ch, _)| ch).collect();
        assert_eq!(letters, ['a', 'b', 'c', 'd']);
        assert_eq!(c.find('c'), Some(id[2]));
        assert_eq!(c.find('e'), None);
    }

    #[test]
    fn remove_shrinks_representation() {
        let id = ids(3);
        let mut c = Children::None;
        c.insert('a', id[0]);
        c.insert('b', id[1]);
        c.insert('c', id[2]);
        assert_eq!(c.remove('b'), Some(id[1]));
        assert!(matches!(c, Children::Two(('a', _, 'c', _))));
        assert_eq!(c.remove('x'), None);
        assert_eq!(c.len(), 2);
        assert_eq!(c.remove('a'), Some(id[0]));
        assert_eq!(c, Children::One(('c', id[2])));
        assert_eq!(c.remove('c'), Some(id[2]));
        assert!(c.is_empty());
        assert_eq!(c.remove('c'), None);
    }

    #[test]
    fn iterates_from_both_ends() {
        let id = ids(3);
        let mut c = Children::None;
        for (ch, node) in ['x', 'y', 'z'].into_iter().zip(id.iter().copied()) {
            c.insert(ch, node);
        }
        let reversed: Vec<char> = c.iter().rev().map(|(ch, _)| ch).collect();
        assert_eq!(reversed, ['z', 'y', 'x']);
        assert_eq!(c.iter().len(), 3);
    }

    #[test]
    fn a_thousand_children() {
        let mut arena = NodeArena::new();
        let mut c = Children::None;
        let letters: Vec<char> = (0..).filter_map(std::char::from_u32).take(1000).collect();
        for &ch in letters.iter().rev() {
            c.insert(ch, arena.alloc(ch).unwrap());
        }
        assert_eq!(c.len(), 1000);
        for (expected, (ch, node)) in letters.iter().zip(c.iter()) {
            assert_eq!(*expected, ch);
            assert_eq!(arena[node], ch);
        }
        for &ch in &letters {
            assert!(c.find(ch).is_some());
        }
    }
}
