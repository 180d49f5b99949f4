//! Example: a small crossword helper on top of [`Trie`].
//!
//! Builds a word list, answers lookups and pattern queries in all three match
//! modes, attaches scores to words, and round-trips the list through bytes.
//!
//! Run with: cargo run --example wordlist
//! Set `RUST_LOG=libtrie=trace` to see the search and mutation logs.

use libtrie::trie::{CharacterMatcher, MatchMode, PatternSequence, Trie};
use tracing_subscriber::EnvFilter;

fn show(label: &str, words: impl Iterator<Item = String>) {
    let words: Vec<String> = words.collect();
    println!("  {label}: {words:?}");
}

fn main() -> libtrie::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let words = ["woord", "woorden", "zijn", "wapens", "logos", "lustoord", "kaas", "käse"];
    let mut trie: Trie = Trie::from_words(words)?;
    println!("{} words in {} nodes", trie.num_words(), trie.num_nodes());

    // Word lookup
    println!("\nWord lookup:");
    for word in ["woord", "woor", "zijn", "zij"] {
        println!("  {word}: {}", if trie.contains(word, false)? { "yes" } else { "no" });
    }

    // Prefix checking
    println!("\nPrefix checking:");
    for prefix in ["woor", "lu", "x"] {
        println!("  {prefix}*: {}", if trie.contains(prefix, true)? { "yes" } else { "no" });
    }

    // Pattern search
    println!("\nPattern search:");
    show("prefix 'wo'", trie.find_text("wo", true));
    show("word 'w***d'", trie.find(&PatternSequence::parse("w***d", '*', MatchMode::Word)?));
    show("fragment 'oord'", trie.find(&PatternSequence::parse("oord", '*', MatchMode::Fragment)?));
    show("fragment 'us*o'", trie.find(&PatternSequence::parse("us*o", '*', MatchMode::Fragment)?));

    let umlaut = PatternSequence::new(
        [
            CharacterMatcher::exact('k'),
            CharacterMatcher::with_alternatives('a', ['ä']),
        ],
        MatchMode::Prefix,
    )?;
    show("prefix 'k[aä]'", trie.find(&umlaut));

    // Removal trims the tree
    let before = trie.num_nodes();
    trie.remove("lustoord", false)?;
    trie.remove("woorden", false)?;
    println!("\nAfter removing two words: {} nodes (was {before})", trie.num_nodes());
    trie.remove("wo", true)?;
    show("after removing prefix 'wo'", trie.words());

    // Values
    println!("\nScores:");
    let scores: Trie<u32> = Trie::from_entries([("zijn", 8), ("wapens", 11), ("logos", 7)])?;
    for (word, score) in scores.words().with_values() {
        println!("  {word}: {}", score.copied().unwrap_or_default());
    }
    println!("  word scoring 11: {:?}", scores.get_word(&11));

    // Serialization
    let mut bytes = Vec::new();
    scores.write_to(&mut bytes)?;
    let copy: Trie<u32> = Trie::read_from(bytes.as_slice())?;
    println!("\nRound trip through {} bytes: {} words", bytes.len(), copy.num_words());

    Ok(())
}
