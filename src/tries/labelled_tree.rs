//! Succinct trie made of a LOUDS sequence and two label arrays.

use std::io::{Read, Write};

use anyhow::Result;

use crate::bit_vectors::{BitArray, Louds, RankedBitArray};
use crate::tries::{LevelStep, Trie};
use crate::utils::ceiled_divide;
use crate::{Build, Error, Search, Serializable};

/// Succinct trie over a [`Louds`] sequence.
///
/// Every non-root node has an edge label in `keys` and an end-of-word byte in `eow`, both
/// at index `node_index - 2`. The end-of-word flag of the root (the empty word) is kept
/// aside. Both arrays are filled by the same level-order walk that emits the existence
/// bits, so they stay aligned with the sequence.
///
/// # Serialization
///
/// The export layout is `louds ++ keys ++ eow`. For `m` non-root nodes, the LOUDS section
/// packs its `2m + 3` bits into bytes with bit `i` at byte `i >> 3`, bit `i & 7`. The bit
/// right after the sequence holds the end-of-word flag of the root, and the remaining
/// padding is zero. The node count is recovered from the buffer length.
///
/// # Examples
///
/// ```
/// # fn main() -> anyhow::Result<()> {
/// use trie_encodings::{prelude::*, LabelledTree, Trie};
///
/// let tree = LabelledTree::create(&Trie::create(["a", "b"]));
/// assert_eq!(tree.keys(), b"ab");
/// assert_eq!(tree.eow(), [1, 1]);
///
/// // Root at 0; `a` and `b` at 2 and 3.
/// assert_eq!(tree.find_child(0, b'a'), Some(2));
/// assert_eq!(tree.find_child(0, b'b'), Some(3));
/// assert_eq!(tree.find_child(0, b'c'), None);
///
/// let bytes = tree.to_bytes()?;
/// assert_eq!(bytes, [0b0000_1101, b'a', b'b', 1, 1]);
/// assert_eq!(LabelledTree::from_bytes(&bytes)?, tree);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelledTree {
    louds: Louds,
    keys: Vec<u8>,
    eow: Vec<u8>,
    root_eow: bool,
}

impl LabelledTree {
    /// Creates the succinct form of `trie`.
    ///
    /// Each child visited by the level-order walk emits its existence bit, key and
    /// end-of-word byte in the same step.
    pub fn create(trie: &Trie) -> Self {
        let mut bv = BitArray::from_bits([true, false]);
        let mut keys = Vec::with_capacity(trie.num_nodes() - 1);
        let mut eow = Vec::with_capacity(trie.num_nodes() - 1);
        for step in trie.level_order() {
            match step {
                LevelStep::Child {
                    key, end_of_word, ..
                } => {
                    bv.push_bit(true);
                    keys.push(key);
                    eow.push(u8::from(end_of_word));
                }
                LevelStep::Close => bv.push_bit(false),
            }
        }
        let this = Self {
            louds: Louds::new(RankedBitArray::new(bv)),
            keys,
            eow,
            root_eow: trie.root().is_end_of_word(),
        };
        tracing::debug!(
            nodes = this.num_nodes(),
            bits = this.louds.num_bits(),
            "created labelled tree"
        );
        this
    }

    /// Returns the position of the child of the node at `position` labelled `key`,
    /// or [`None`] if absent.
    ///
    /// # Complexity
    ///
    /// Linear in the number of children, plus one select.
    #[inline(always)]
    pub fn find_child(&self, position: usize, key: u8) -> Option<usize> {
        let mut pos = self.louds.first_child(position)?;
        while self.louds.is_node(pos) {
            if self.label(pos)? == key {
                return Some(pos);
            }
            pos += 1;
        }
        None
    }

    /// Returns the position of the node reached by spelling `word` from the root,
    /// or [`None`] if the path breaks.
    pub fn find<W: AsRef<[u8]>>(&self, word: W) -> Option<usize> {
        word.as_ref()
            .iter()
            .try_fold(0, |pos, &key| self.find_child(pos, key))
    }

    /// Returns the LOUDS sequence.
    pub const fn louds(&self) -> &Louds {
        &self.louds
    }

    /// Returns the edge labels of the non-root nodes in level order.
    pub fn keys(&self) -> &[u8] {
        &self.keys
    }

    /// Returns the end-of-word bytes of the non-root nodes in level order.
    pub fn eow(&self) -> &[u8] {
        &self.eow
    }

    /// Returns the number of nodes, including the root.
    pub fn num_nodes(&self) -> usize {
        self.keys.len() + 1
    }

    /// Returns the byte length of the export layout for `m` non-root nodes.
    ///
    /// # Examples
    ///
    /// ```
    /// use trie_encodings::LabelledTree;
    ///
    /// assert_eq!(LabelledTree::encoded_len(0), 1);
    /// assert_eq!(LabelledTree::encoded_len(11), 26);
    /// ```
    pub const fn encoded_len(m: usize) -> usize {
        ceiled_divide(2 * m + 3, 8) + 2 * m
    }

    fn label(&self, pos: usize) -> Option<u8> {
        let index = self.louds.node_index(pos)?;
        self.keys.get(index.checked_sub(2)?).copied()
    }

    fn is_end_of_word(&self, pos: usize) -> bool {
        if pos == 0 {
            return self.root_eow;
        }
        self.louds
            .node_index(pos)
            .and_then(|index| self.eow.get(index.checked_sub(2)?))
            .map_or(false, |&x| x == 1)
    }

    /// Returns the number of non-root nodes whose export layout takes `len` bytes.
    fn num_labels_for(len: usize) -> Option<usize> {
        let (mut lo, mut hi) = (0, len / 2);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if Self::encoded_len(mid) < len {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        (Self::encoded_len(lo) == len).then_some(lo)
    }

    fn export(&self) -> Vec<u8> {
        let num_bits = self.louds.num_bits();
        let mut bytes = vec![0; ceiled_divide(num_bits + 1, 8)];
        let bits = self.louds.ranked_bit_array().bit_array().iter();
        for (i, bit) in bits.chain([self.root_eow]).enumerate() {
            bytes[i >> 3] |= u8::from(bit) << (i & 7);
        }
        bytes.extend_from_slice(&self.keys);
        bytes.extend_from_slice(&self.eow);
        bytes
    }

    fn import(bytes: &[u8]) -> Result<Self> {
        let m = Self::num_labels_for(bytes.len()).ok_or_else(|| {
            Error::malformed(format!(
                "no node count yields a {}-byte buffer",
                bytes.len()
            ))
        })?;
        let num_bits = 2 * m + 3;
        let (louds, labels) = bytes.split_at(ceiled_divide(num_bits, 8));
        let (keys, eow) = labels.split_at(m);

        let bit = |i: usize| (louds[i >> 3] >> (i & 7)) & 1 == 1;
        if (num_bits + 1..louds.len() * 8).any(bit) {
            return Err(Error::malformed("padding bits of the louds section are set").into());
        }
        if let Some(x) = eow.iter().find(|&&x| 1 < x) {
            return Err(Error::malformed(format!("end-of-word byte {x}")).into());
        }

        let louds = Louds::from_bit_array(BitArray::from_bits((0..num_bits).map(bit)))?;
        check_sibling_keys(&louds, keys)?;

        Ok(Self {
            louds,
            keys: keys.to_vec(),
            eow: eow.to_vec(),
            root_eow: bit(num_bits),
        })
    }
}

/// Checks that no children group of `louds` holds the same key twice.
fn check_sibling_keys(louds: &Louds, keys: &[u8]) -> Result<()> {
    let mut seen = [false; 256];
    let mut index: usize = 0;
    // The super-root group holds only the root, which has no key.
    for (pos, bit) in louds.ranked_bit_array().bit_array().iter().enumerate() {
        if !bit {
            seen = [false; 256];
            continue;
        }
        index += 1;
        let Some(&key) = index.checked_sub(2).and_then(|i| keys.get(i)) else {
            continue;
        };
        if std::mem::replace(&mut seen[key as usize], true) {
            return Err(Error::malformed(format!(
                "duplicate key {key} among the siblings at {pos}"
            ))
            .into());
        }
    }
    Ok(())
}

impl Build for LabelledTree {
    /// Creates a new tree from `words`.
    ///
    /// # Errors
    ///
    /// Never.
    fn build_from_words<I, W>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = W>,
        W: AsRef<[u8]>,
    {
        Ok(Self::create(&Trie::create(words)))
    }
}

impl Search for LabelledTree {
    fn search<W: AsRef<[u8]>>(&self, word: W) -> bool {
        self.find(word).map_or(false, |pos| self.is_end_of_word(pos))
    }

    fn starts_with<W: AsRef<[u8]>>(&self, prefix: W) -> bool {
        self.find(prefix).is_some()
    }
}

impl Serializable for LabelledTree {
    fn serialize_into<W: Write>(&self, mut writer: W) -> Result<usize> {
        let bytes = self.export();
        writer.write_all(&bytes)?;
        Ok(bytes.len())
    }

    fn deserialize_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = vec![];
        reader.read_to_end(&mut bytes)?;
        let this = Self::import(&bytes)?;
        tracing::debug!(
            nodes = this.num_nodes(),
            bytes = bytes.len(),
            "deserialized labelled tree"
        );
        Ok(this)
    }

    fn size_in_bytes(&self) -> usize {
        Self::encoded_len(self.keys.len())
    }
}
