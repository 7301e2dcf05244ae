//! Flat trie answering queries directly on its byte buffer.

use std::io::{Read, Write};

use anyhow::Result;
use byteorder::{BigEndian, ByteOrder};

use crate::cursor::ByteCursor;
use crate::utils::MatrixView;
use crate::{Build, Error, Search, Serializable, Trie};

/// Bytes of `eow:u8 | count:u8` heading every record.
const RECORD_HEADER: usize = 2;
/// Bytes of a `key:u8 | offset:u32` child-table entry.
const ENTRY_LEN: usize = 5;

/// Immutable trie encoded into one offset-addressed buffer.
///
/// Every node is the record `eow:u8 | count:u8 | { key:u8 | offset:u32 }*`, where `offset`
/// is the absolute position of the child's record. Records are laid out in pre-order with
/// children in ascending key order, the root at offset 0.
///
/// # Examples
///
/// ```
/// # fn main() -> anyhow::Result<()> {
/// use trie_encodings::{prelude::*, BinaryTrie, Trie};
///
/// let trie = BinaryTrie::create(&Trie::create(["ab", "c"]))?;
/// assert_eq!(trie.data(), [
///     0, 2, b'a', 0, 0, 0, 12, b'c', 0, 0, 0, 21, // root
///     0, 1, b'b', 0, 0, 0, 19,                    // a
///     1, 0,                                       // ab
///     1, 0,                                       // c
/// ]);
///
/// assert_eq!(trie.find_child(b'c', 0), Some(21));
/// assert_eq!(trie.find_child(b'b', 0), None);
/// assert!(trie.search("ab"));
/// assert!(trie.starts_with("a"));
/// assert!(!trie.search("a"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct BinaryTrie {
    data: Vec<u8>,
}

impl BinaryTrie {
    /// Encodes `trie` into a new buffer.
    ///
    /// The byte size of every subtree is computed bottom-up first, so that each child
    /// table can be written with the final offsets before the children themselves.
    ///
    /// # Errors
    ///
    /// [`Error::CapacityExceeded`] is returned if a node has more than 255 children or
    /// if the buffer would exceed `u32::MAX` bytes.
    pub fn create(trie: &Trie) -> Result<Self> {
        let nodes = trie.nodes();

        let mut sizes = vec![0; nodes.len()];
        for (id, node) in nodes.iter().enumerate().rev() {
            if node.num_children() > u8::MAX as usize {
                return Err(Error::CapacityExceeded(format!(
                    "node with {} children does not fit a one-byte count",
                    node.num_children()
                ))
                .into());
            }
            sizes[id] = node
                .children()
                .iter()
                .fold(record_len(node.num_children()), |acc, &(_, c)| acc + sizes[c]);
        }
        crate::utils::to_u32(sizes[Trie::ROOT], "buffer length")?;

        let mut cur = ByteCursor::new(vec![0; sizes[Trie::ROOT]]);
        let mut stack = vec![Trie::ROOT];
        while let Some(id) = stack.pop() {
            let node = &nodes[id];
            let mut offset = cur.offset() + record_len(node.num_children());
            cur.set_u8(u8::from(node.is_end_of_word()))?;
            cur.set_u8(node.num_children() as u8)?;
            for &(key, child) in node.children() {
                cur.set_u8(key)?;
                cur.set_u32(offset as u32)?;
                offset += sizes[child];
            }
            stack.extend(node.children().iter().rev().map(|&(_, c)| c));
        }
        debug_assert_eq!(cur.offset(), cur.len());

        let this = Self {
            data: cur.into_inner(),
        };
        tracing::debug!(
            nodes = nodes.len(),
            bytes = this.data.len(),
            "created binary trie"
        );
        Ok(this)
    }

    /// Returns the offset of the child of the record at `position` reached by `key`,
    /// or [`None`] if absent.
    ///
    /// # Complexity
    ///
    /// Linear in the number of children.
    #[inline(always)]
    pub fn find_child(&self, key: u8, position: usize) -> Option<usize> {
        let count = *self.data.get(position.checked_add(1)?)? as usize;
        let table = self
            .data
            .get(position + RECORD_HEADER..position + record_len(count))?;
        table
            .chunks_exact(ENTRY_LEN)
            .find(|entry| entry[0] == key)
            .map(|entry| BigEndian::read_u32(&entry[1..]) as usize)
    }

    /// Returns the offset of the record reached by spelling `word` from the root,
    /// or [`None`] if the path breaks.
    pub fn find<W: AsRef<[u8]>>(&self, word: W) -> Option<usize> {
        word.as_ref()
            .iter()
            .try_fold(0, |pos, &key| self.find_child(key, pos))
    }

    /// Returns the encoded buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Converts into the encoded buffer.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Checks that `data` is exactly the pre-order layout built by [`Self::create()`].
    fn validate(data: &[u8]) -> Result<()> {
        let mut cur = ByteCursor::new(data);
        let mut pending = vec![0];
        while let Some(offset) = pending.pop() {
            if offset != cur.offset() {
                return Err(Error::malformed(format!(
                    "record expected at {} but the child table points to {offset}",
                    cur.offset()
                ))
                .into());
            }
            let eow = cur.get_u8()?;
            if 1 < eow {
                return Err(Error::malformed(format!(
                    "record at {offset} has end-of-word byte {eow}"
                ))
                .into());
            }
            let count = cur.get_u8()? as usize;
            let mut seen = [false; 256];
            let mut children = Vec::with_capacity(count);
            for _ in 0..count {
                let key = cur.get_u8()?;
                if std::mem::replace(&mut seen[key as usize], true) {
                    return Err(Error::malformed(format!(
                        "duplicate key {key} in record at {offset}"
                    ))
                    .into());
                }
                children.push(cur.get_u32()? as usize);
            }
            pending.extend(children.into_iter().rev());
        }
        if cur.remaining() != 0 {
            return Err(Error::malformed(format!(
                "{} trailing bytes after the last record",
                cur.remaining()
            ))
            .into());
        }
        Ok(())
    }
}

/// Returns the byte length of a record with `count` children.
const fn record_len(count: usize) -> usize {
    RECORD_HEADER + ENTRY_LEN * count
}

impl Build for BinaryTrie {
    /// Creates a new trie from `words`.
    ///
    /// # Errors
    ///
    /// See [`BinaryTrie::create()`].
    fn build_from_words<I, W>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = W>,
        W: AsRef<[u8]>,
    {
        Self::create(&Trie::create(words))
    }
}

impl Search for BinaryTrie {
    fn search<W: AsRef<[u8]>>(&self, word: W) -> bool {
        self.find(word)
            .and_then(|pos| self.data.get(pos))
            .map_or(false, |&eow| eow == 1)
    }

    fn starts_with<W: AsRef<[u8]>>(&self, prefix: W) -> bool {
        self.find(prefix).is_some()
    }
}

impl Serializable for BinaryTrie {
    fn serialize_into<W: Write>(&self, mut writer: W) -> Result<usize> {
        writer.write_all(&self.data)?;
        Ok(self.data.len())
    }

    fn deserialize_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = vec![];
        reader.read_to_end(&mut data)?;
        Self::validate(&data)?;
        tracing::debug!(bytes = data.len(), "deserialized binary trie");
        Ok(Self { data })
    }

    fn size_in_bytes(&self) -> usize {
        self.data.len()
    }
}

impl std::fmt::Debug for BinaryTrie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinaryTrie")
            .field("data", &MatrixView::new(&self.data, 16))
            .finish()
    }
}
