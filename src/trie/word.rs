use smallvec::SmallVec;

/// Inline capacity of the character buffer used for a single word.
pub(crate) const WORD_INLINE: usize = 32;

/// A word collected into a character buffer.
pub type WordBuf = SmallVec<[char; WORD_INLINE]>;

/// Trait for types that can be used as a word (or prefix) when talking to a trie.
///
/// Implemented for common string and character-sequence types so that
/// [`Trie::add`](super::Trie::add), [`Trie::contains`](super::Trie::contains) and
/// friends accept them directly without manual conversion.
pub trait IntoWord {
    /// Collects this word into a character buffer.
    fn collect_word(self) -> WordBuf;
}

impl IntoWord for &str {
    fn collect_word(self) -> WordBuf {
        self.chars().collect()
    }
}

impl IntoWord for &&str {
    fn collect_word(self) -> WordBuf {
        self.chars().collect()
    }
}

impl IntoWord for String {
    fn collect_word(self) -> WordBuf {
        self.chars().collect()
    }
}

impl IntoWord for &String {
    fn collect_word(self) -> WordBuf {
        self.chars().collect()
    }
}

impl IntoWord for &[char] {
    fn collect_word(self) -> WordBuf {
        self.iter().copied().collect()
    }
}

impl IntoWord for Vec<char> {
    fn collect_word(self) -> WordBuf {
        self.into_iter().collect()
    }
}

impl IntoWord for &Vec<char> {
    fn collect_word(self) -> WordBuf {
        self.iter().copied().collect()
    }
}

impl<const N: usize> IntoWord for [char; N] {
    fn collect_word(self) -> WordBuf {
        self.into_iter().collect()
    }
}

impl<const N: usize> IntoWord for &[char; N] {
    fn collect_word(self) -> WordBuf {
        self.iter().copied().collect()
    }
}
