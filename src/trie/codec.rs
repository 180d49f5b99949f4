//! Serialization of a [`Trie`] as a preorder stream of node records.
//!
//! A stream starts with a [`Header`] and is followed by one [`NodeRecord`] per node
//! in depth-first preorder, root first. Each record declares its child count, so
//! the reader knows how many records belong below it without any brackets or
//! end markers.
//!
//! The record stream is written through [`NodeSink`] and read through
//! [`NodeSource`]. [`RecordBuffer`] keeps records in memory; with the `bincode`
//! feature, [`StreamSink`] and [`StreamSource`] encode them onto any
//! [`std::io::Write`] / [`std::io::Read`].

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::{Error, Result};
use super::node::TrieNode;
use super::node_arena::NodeId;
use super::tree::Trie;

/// Magic bytes at the start of every stream.
pub const MAGIC: [u8; 4] = *b"TRIE";

/// Version of the record layout.
pub const FORMAT_VERSION: u16 = 1;

/// Stream header, written before the first node record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Always [`MAGIC`].
    pub magic: [u8; 4],
    /// Always [`FORMAT_VERSION`] for streams written by this crate.
    pub version: u16,
    /// Number of words in the serialized trie.
    pub num_words: u64,
    /// Number of node records that follow, root included.
    pub num_nodes: u64,
}

impl Header {
    fn for_trie<V>(trie: &Trie<V>) -> Self {
        Header {
            magic: MAGIC,
            version: FORMAT_VERSION,
            num_words: trie.num_words() as u64,
            num_nodes: trie.num_nodes() as u64,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.magic != MAGIC {
            return Err(Error::format(format!("bad magic bytes {:?}", self.magic)));
        }
        if self.version != FORMAT_VERSION {
            return Err(Error::format(format!(
                "unsupported format version {} (expected {FORMAT_VERSION})",
                self.version
            )));
        }
        Ok(())
    }
}

/// One node of the preorder stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord<V> {
    /// The character on the edge into this node; `None` for the root.
    pub character: Option<char>,
    /// True if the path to this node spells a stored word.
    pub is_word: bool,
    /// The value attached to the word, if any.
    pub value: Option<V>,
    /// Number of records directly below this one.
    pub child_count: u32,
}

/// Destination for a preorder record stream.
pub trait NodeSink<V> {
    /// Writes the stream header. Called once, before any node.
    fn write_header(&mut self, header: &Header) -> Result<()>;

    /// Writes one node record.
    fn write_node(&mut self, record: NodeRecord<&V>) -> Result<()>;

    /// Called after the last record.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Origin of a preorder record stream.
pub trait NodeSource<V> {
    /// Reads the stream header.
    fn read_header(&mut self) -> Result<Header>;

    /// Reads the next node record.
    fn read_node(&mut self) -> Result<NodeRecord<V>>;
}

/// Writes `trie` to `sink`: the header, then every node in preorder.
///
/// # Errors
///
/// Propagates the first error reported by the sink.
pub fn write_trie<V, S: NodeSink<V>>(trie: &Trie<V>, sink: &mut S) -> Result<()> {
    let header = Header::for_trie(trie);
    sink.write_header(&header)?;

    let mut written = 0u64;
    let mut stack: Vec<(Option<char>, NodeId)> = vec![(None, trie.root)];
    while let Some((character, id)) = stack.pop() {
        let node = &trie.arena[id];
        let child_count = u32::try_from(node.children.len())
            .map_err(|_| Error::format("node has more than u32::MAX children"))?;
        sink.write_node(NodeRecord {
            character,
            is_word: node.word,
            value: node.value.as_ref(),
            child_count,
        })?;
        written += 1;
        stack.extend(node.children.iter().rev().map(|(ch, child)| (Some(ch), child)));
    }
    sink.finish()?;

    debug!(num_words = header.num_words, num_nodes = written, "trie written");
    Ok(())
}

/// Rebuilds a trie from `source`.
///
/// # Errors
///
/// Returns [`Error::Format`] if the stream is truncated, the header does not match,
/// the root carries a word or a character, a node repeats a sibling's character,
/// or a node neither ends a word nor has children. Errors from the source are
/// propagated unchanged.
pub fn read_trie<V, S: NodeSource<V>>(source: &mut S) -> Result<Trie<V>> {
    read_records(source).inspect_err(|err| warn!(%err, "rejected trie stream"))
}

fn read_records<V, S: NodeSource<V>>(source: &mut S) -> Result<Trie<V>> {
    let header = source.read_header()?;
    header.validate()?;

    let root = source.read_node()?;
    if root.character.is_some() || root.is_word || root.value.is_some() {
        return Err(Error::format("root record must carry no character, word, or value"));
    }

    let mut trie = Trie::new();
    // (node, children still to read)
    let mut pending: Vec<(NodeId, u32)> = vec![(trie.root, root.child_count)];
    while let Some(top) = pending.last_mut() {
        if top.1 == 0 {
            let id = top.0;
            pending.pop();
            trie.refresh(id);
            continue;
        }
        top.1 -= 1;
        let parent = top.0;

        let record = source.read_node()?;
        let Some(character) = record.character else {
            return Err(Error::format("non-root record without a character"));
        };
        if record.value.is_some() && !record.is_word {
            return Err(Error::format(format!("value attached to non-word node '{character}'")));
        }
        if record.child_count == 0 && !record.is_word {
            return Err(Error::format(format!("node '{character}' leads to no word")));
        }
        if trie.arena[parent].children.find(character).is_some() {
            return Err(Error::format(format!("duplicate sibling character '{character}'")));
        }

        let mut node = TrieNode::new();
        node.word = record.is_word;
        node.value = record.value;
        let id = trie
            .arena
            .alloc(node)
            .ok_or_else(|| Error::format("stream holds more nodes than a trie can address"))?;
        trie.arena[parent].children.insert(character, id);
        pending.push((id, record.child_count));
    }

    if trie.num_words() as u64 != header.num_words || trie.num_nodes() as u64 != header.num_nodes {
        return Err(Error::format(format!(
            "header announced {} words in {} nodes, stream held {} words in {} nodes",
            header.num_words,
            header.num_nodes,
            trie.num_words(),
            trie.num_nodes()
        )));
    }
    debug!(num_words = header.num_words, num_nodes = header.num_nodes, "trie read");
    Ok(trie)
}

/// An in-memory record stream, usable both as a [`NodeSink`] and a [`NodeSource`].
///
/// ```
/// use libtrie::trie::codec::{read_trie, write_trie, RecordBuffer};
/// use libtrie::trie::Trie;
///
/// let trie: Trie<u8> = Trie::from_entries([("woord", 1), ("woorden", 2)]).unwrap();
/// let mut buffer = RecordBuffer::new();
/// write_trie(&trie, &mut buffer).unwrap();
/// assert_eq!(buffer.records().len(), trie.num_nodes());
///
/// let copy: Trie<u8> = read_trie(&mut buffer).unwrap();
/// assert_eq!(copy.find_value("woorden"), Some(&2));
/// ```
#[derive(Clone, Debug)]
pub struct RecordBuffer<V> {
    header: Option<Header>,
    records: VecDeque<NodeRecord<V>>,
}

impl<V> RecordBuffer<V> {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        RecordBuffer {
            header: None,
            records: VecDeque::new(),
        }
    }

    /// The header written so far, if any.
    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    /// Records not yet read, in stream order.
    pub fn records(&self) -> &VecDeque<NodeRecord<V>> {
        &self.records
    }

    /// Direct access to the pending records.
    pub fn records_mut(&mut self) -> &mut VecDeque<NodeRecord<V>> {
        &mut self.records
    }
}

impl<V> Default for RecordBuffer<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> NodeSink<V> for RecordBuffer<V> {
    fn write_header(&mut self, header: &Header) -> Result<()> {
        self.header = Some(*header);
        Ok(())
    }

    fn write_node(&mut self, record: NodeRecord<&V>) -> Result<()> {
        self.records.push_back(NodeRecord {
            character: record.character,
            is_word: record.is_word,
            value: record.value.cloned(),
            child_count: record.child_count,
        });
        Ok(())
    }
}

impl<V> NodeSource<V> for RecordBuffer<V> {
    fn read_header(&mut self) -> Result<Header> {
        self.header.ok_or_else(|| Error::format("missing header"))
    }

    fn read_node(&mut self) -> Result<NodeRecord<V>> {
        self.records
            .pop_front()
            .ok_or_else(|| Error::format("unexpected end of stream"))
    }
}

#[cfg(feature = "bincode")]
mod stream {
    use std::io::{Read, Write};

    use bincode::{DefaultOptions, ErrorKind, Options};
    use serde::de::DeserializeOwned;
    use serde::Serialize;

    use super::{Header, NodeRecord, NodeSink, NodeSource};
    use crate::trie::error::{Error, Result};
    use crate::trie::tree::Trie;

    /// Upper bound on the encoded size of a single header or node record.
    ///
    /// A length prefix that claims more is rejected before anything is allocated.
    pub const MAX_RECORD_BYTES: u64 = 16 << 20;

    /// The layout of `bincode::serialize`, with every read capped at [`MAX_RECORD_BYTES`].
    fn options() -> impl Options {
        DefaultOptions::new()
            .with_fixint_encoding()
            .allow_trailing_bytes()
            .with_limit(MAX_RECORD_BYTES)
    }

    /// Write failures keep their I/O nature; everything else is a format problem.
    fn write_error(err: bincode::Error) -> Error {
        match *err {
            ErrorKind::Io(io) => Error::Io(io),
            other => Error::Format(other.to_string()),
        }
    }

    /// Any read failure, truncation included, means the stream is unusable.
    fn read_error(err: bincode::Error) -> Error {
        Error::Format(err.to_string())
    }

    /// A [`NodeSink`] that bincode-encodes records onto a writer.
    ///
    /// Records are small; wrap unbuffered writers such as files in a
    /// [`std::io::BufWriter`].
    pub struct StreamSink<W: Write> {
        writer: W,
    }

    impl<W: Write> StreamSink<W> {
        /// Wraps a writer.
        pub fn new(writer: W) -> Self {
            StreamSink { writer }
        }

        /// Returns the wrapped writer.
        pub fn into_inner(self) -> W {
            self.writer
        }
    }

    impl<V: Serialize, W: Write> NodeSink<V> for StreamSink<W> {
        fn write_header(&mut self, header: &Header) -> Result<()> {
            options().serialize_into(&mut self.writer, header).map_err(write_error)
        }

        fn write_node(&mut self, record: NodeRecord<&V>) -> Result<()> {
            options().serialize_into(&mut self.writer, &record).map_err(write_error)
        }

        fn finish(&mut self) -> Result<()> {
            Ok(self.writer.flush()?)
        }
    }

    /// A [`NodeSource`] that decodes bincode records from a reader.
    pub struct StreamSource<R: Read> {
        reader: R,
    }

    impl<R: Read> StreamSource<R> {
        /// Wraps a reader.
        pub fn new(reader: R) -> Self {
            StreamSource { reader }
        }

        /// Returns the wrapped reader.
        pub fn into_inner(self) -> R {
            self.reader
        }
    }

    impl<V: DeserializeOwned, R: Read> NodeSource<V> for StreamSource<R> {
        fn read_header(&mut self) -> Result<Header> {
            options().deserialize_from(&mut self.reader).map_err(read_error)
        }

        fn read_node(&mut self) -> Result<NodeRecord<V>> {
            options().deserialize_from(&mut self.reader).map_err(read_error)
        }
    }

    impl<V: Serialize> Trie<V> {
        /// Serializes the trie onto `writer`.
        ///
        /// # Errors
        ///
        /// Returns [`Error::Io`] if the writer fails, or [`Error::Format`] if a single
        /// node record would exceed [`MAX_RECORD_BYTES`].
        ///
        /// ```
        /// use libtrie::trie::Trie;
        ///
        /// let trie: Trie = Trie::from_words(["woord", "woorden", "zijn"]).unwrap();
        /// let mut bytes = Vec::new();
        /// trie.write_to(&mut bytes).unwrap();
        ///
        /// let copy: Trie = Trie::read_from(bytes.as_slice()).unwrap();
        /// assert_eq!(copy.num_words(), 3);
        /// assert!(copy.contains("woorden", false).unwrap());
        /// ```
        pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
            super::write_trie(self, &mut StreamSink::new(writer))
        }
    }

    impl<V: DeserializeOwned> Trie<V> {
        /// Deserializes a trie written by [`write_to`](Trie::write_to).
        ///
        /// # Errors
        ///
        /// Returns [`Error::Format`] if the stream is truncated or malformed, including
        /// records longer than [`MAX_RECORD_BYTES`].
        pub fn read_from<R: Read>(reader: R) -> Result<Self> {
            super::read_trie(&mut StreamSource::new(reader))
        }
    }
}

#[cfg(feature = "bincode")]
pub use stream::{StreamSink, StreamSource, MAX_RECORD_BYTES};
