//! Level-order unary degree sequence over a [`RankedBitArray`].

use std::io::{Read, Write};

use anyhow::Result;

use crate::bit_vectors::prelude::*;
use crate::bit_vectors::{BitArray, RankedBitArray};
use crate::tries::{LevelStep, Trie};
use crate::{Error, Serializable};

/// LOUDS tree navigation.
///
/// The sequence starts with the group `1 0` of a synthetic super-root whose only child is
/// the real root. Nodes are then expanded in level order: each contributes one `1` per
/// child (its children's existence bits) followed by a terminating `0`.
///
/// A node is addressed by the position of its existence bit. Its 1-based index in level
/// order is [`Self::node_index()`], where the real root is index 1 at position 0.
/// A tree of `m` non-root nodes takes `2m + 3` bits.
///
/// # Examples
///
/// ```
/// use trie_encodings::{bit_vectors::Louds, Trie};
///
/// // root -> {a -> {b}, c}
/// let louds = Louds::from_trie(&Trie::create(["ab", "c"]));
/// assert_eq!(louds.num_bits(), 9);
///
/// // The root is at 0; its children `a` and `c` are at 2 and 3.
/// assert_eq!(louds.first_child(0), Some(2));
/// assert_eq!(louds.last_child(0), Some(3));
/// assert_eq!(louds.num_children(0), Some(2));
/// assert_eq!(louds.node_index(3), Some(3));
/// assert_eq!(louds.parent(3), Some(0));
///
/// // `b` is the only child of `a`; `c` is a leaf.
/// assert_eq!(louds.child(2, 0), Some(5));
/// assert_eq!(louds.num_children(3), Some(0));
/// assert_eq!(louds.last_child(3), None);
/// ```
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Louds {
    rba: RankedBitArray,
}

impl Louds {
    /// Creates a new instance over `rba` without checking its shape.
    pub const fn new(rba: RankedBitArray) -> Self {
        Self { rba }
    }

    /// Creates a new instance from input bit stream `bits` without checking its shape.
    pub fn from_bits<I>(bits: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        Self::new(RankedBitArray::from_bits(bits))
    }

    /// Creates the sequence of `trie` by a level-order walk.
    pub fn from_trie(trie: &Trie) -> Self {
        let mut bv = BitArray::from_bits([true, false]);
        bv.extend(
            trie.level_order()
                .map(|step| matches!(step, LevelStep::Child { .. })),
        );
        let this = Self::new(RankedBitArray::new(bv));
        tracing::debug!(bits = this.num_bits(), "created louds");
        this
    }

    /// Creates a new instance from `bv`, checking that it is a well-formed sequence.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedEncoding`] is returned if `bv` is not the sequence of some tree:
    /// it must start with `1 0`, hold one more zero than ones, end with a zero, and
    /// place every node's existence bit before its children group.
    ///
    /// # Examples
    ///
    /// ```
    /// use trie_encodings::bit_vectors::{BitArray, Louds};
    ///
    /// let bits = |s: &str| BitArray::from_bits(s.chars().map(|c| c == '1'));
    /// assert!(Louds::from_bit_array(bits("101100100")).is_ok());
    /// assert!(Louds::from_bit_array(bits("100110100")).is_err());
    /// ```
    pub fn from_bit_array(bv: BitArray) -> Result<Self> {
        let len = bv.len();
        if len < 3 || len % 2 == 0 {
            return Err(Error::malformed(format!("louds cannot have {len} bits")).into());
        }
        if bv.get_bit(0) != Some(true) || bv.get_bit(1) != Some(false) {
            return Err(Error::malformed("louds must start with the super-root group 1 0").into());
        }
        if bv.get_bit(len - 1) != Some(false) {
            return Err(Error::malformed("louds must end with a terminator").into());
        }
        let (mut ones, mut zeros) = (0, 0);
        for (pos, bit) in bv.iter().enumerate() {
            if bit {
                ones += 1;
                continue;
            }
            zeros += 1;
            // The group starting here belongs to the node of index `zeros`.
            if pos + 1 < len && ones < zeros {
                return Err(Error::malformed(format!(
                    "group at {} precedes the existence bit of its node",
                    pos + 1
                ))
                .into());
            }
        }
        if zeros != ones + 1 {
            return Err(Error::malformed(format!(
                "louds holds {ones} ones and {zeros} zeros"
            ))
            .into());
        }
        Ok(Self::new(RankedBitArray::new(bv)))
    }

    /// Returns the reference of the internal ranked bit array.
    pub const fn ranked_bit_array(&self) -> &RankedBitArray {
        &self.rba
    }

    /// Returns the number of bits in the sequence.
    pub fn num_bits(&self) -> usize {
        self.rba.num_bits()
    }

    /// Returns the number of nodes, including the root but not the super-root.
    pub fn num_nodes(&self) -> usize {
        self.rba.num_ones()
    }

    /// Checks if the bit at `pos` is an existence bit, as opposed to a terminator.
    #[inline(always)]
    pub fn is_node(&self, pos: usize) -> bool {
        self.rba.get_bit(pos) == Some(true)
    }

    /// Returns the 1-based level-order index of the node whose existence bit is at `pos`,
    /// or [`None`] if `self.num_bits() <= pos`.
    #[inline(always)]
    pub fn node_index(&self, pos: usize) -> Option<usize> {
        if self.num_bits() <= pos {
            return None;
        }
        self.rba.rank1(pos + 1)
    }

    /// Returns the position of the existence bit of the node with 1-based `index`,
    /// or [`None`] if no such node exists.
    #[inline(always)]
    pub fn node_position(&self, index: usize) -> Option<usize> {
        self.rba.select1(index)
    }

    /// Returns the position where the children group of the node at `pos` starts.
    ///
    /// For a leaf, this is the position of its terminator, so the result must be checked
    /// with [`Self::is_node()`] before use.
    #[inline(always)]
    pub fn first_child(&self, pos: usize) -> Option<usize> {
        let index = self.node_index(pos)?;
        Some(self.rba.select0(index)? + 1)
    }

    /// Returns the position of the last child of the node at `pos`,
    /// or [`None`] if it is a leaf.
    pub fn last_child(&self, pos: usize) -> Option<usize> {
        let index = self.node_index(pos)?;
        let end = self.rba.select0(index + 1)?;
        let first = self.rba.select0(index)? + 1;
        (first < end).then(|| end - 1)
    }

    /// Returns the number of children of the node at `pos`.
    pub fn num_children(&self, pos: usize) -> Option<usize> {
        let index = self.node_index(pos)?;
        Some(self.rba.select0(index + 1)? - self.rba.select0(index)? - 1)
    }

    /// Returns the position of the `n`-th child (0-based) of the node at `pos`,
    /// or [`None`] if it has no more than `n` children.
    pub fn child(&self, pos: usize, n: usize) -> Option<usize> {
        let first = self.first_child(pos)?;
        (n < self.num_children(pos)?).then(|| first + n)
    }

    /// Returns the position of the parent of the node at `pos`,
    /// or [`None`] for the root or a non-node position.
    pub fn parent(&self, pos: usize) -> Option<usize> {
        if !self.is_node(pos) {
            return None;
        }
        // The group holding `pos` belongs to the node whose index is its zero count.
        match self.rba.rank0(pos)? {
            0 => None,
            index => self.node_position(index),
        }
    }
}

impl Serializable for Louds {
    fn serialize_into<W: Write>(&self, writer: W) -> Result<usize> {
        self.rba.serialize_into(writer)
    }

    fn deserialize_from<R: Read>(reader: R) -> Result<Self> {
        let rba = RankedBitArray::deserialize_from(reader)?;
        Self::from_bit_array(rba.bit_array().clone())
    }

    fn size_in_bytes(&self) -> usize {
        self.rba.size_in_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = "1011010101101010010101000";

    fn parse_bits(s: &str) -> Vec<bool> {
        s.chars().map(|c| c == '1').collect()
    }

    fn fixture() -> Louds {
        Louds::from_trie(&Trie::create(["hello", "hey", "world"]))
    }

    #[test]
    fn test_from_trie_bits() {
        let louds = fixture();
        let bits: Vec<bool> = louds.ranked_bit_array().bit_array().iter().collect();
        assert_eq!(bits, parse_bits(FIXTURE));
        assert_eq!(louds.num_bits(), 25);
        assert_eq!(louds.num_nodes(), 12);
        assert_eq!(louds, Louds::from_bits(parse_bits(FIXTURE)));
    }

    #[test]
    fn test_empty_trie() {
        let louds = Louds::from_trie(&Trie::new());
        assert_eq!(louds.num_bits(), 3);
        assert_eq!(louds.first_child(0), Some(2));
        assert!(!louds.is_node(2));
        assert_eq!(louds.num_children(0), Some(0));
        assert_eq!(louds.last_child(0), None);
        assert_eq!(louds.child(0, 0), None);
    }

    #[test]
    fn test_node_index() {
        let louds = fixture();
        for (pos, expected) in [(0, 1), (1, 1), (16, 9), (21, 12)] {
            assert_eq!(louds.node_index(pos), Some(expected), "pos={pos}");
        }
        assert_eq!(louds.node_index(25), None);
    }

    #[test]
    fn test_node_position() {
        let louds = fixture();
        for (index, expected) in [(1, 0), (5, 7), (11, 19)] {
            assert_eq!(louds.node_position(index), Some(expected), "index={index}");
        }
        assert_eq!(louds.node_position(0), None);
        assert_eq!(louds.node_position(13), None);
    }

    #[test]
    fn test_first_child() {
        let louds = fixture();
        for (pos, expected) in [(0, 2), (2, 5), (5, 9), (17, 21)] {
            assert_eq!(louds.first_child(pos), Some(expected), "pos={pos}");
        }
    }

    #[test]
    fn test_last_child() {
        let louds = fixture();
        for (pos, expected) in [(0, 3), (2, 5), (5, 10)] {
            assert_eq!(louds.last_child(pos), Some(expected), "pos={pos}");
        }
        assert_eq!(louds.last_child(21), None);
    }

    #[test]
    fn test_num_children() {
        let louds = fixture();
        for (pos, expected) in [(0, 2), (2, 1), (5, 2), (10, 0)] {
            assert_eq!(louds.num_children(pos), Some(expected), "pos={pos}");
        }
    }

    #[test]
    fn test_child() {
        let louds = fixture();
        assert_eq!(louds.child(5, 0), Some(9));
        assert_eq!(louds.child(5, 1), Some(10));
        assert_eq!(louds.child(5, 2), None);
        assert_eq!(louds.child(17, 0), Some(21));
    }

    #[test]
    fn test_parent() {
        let louds = fixture();
        assert_eq!(louds.parent(0), None);
        assert_eq!(louds.parent(1), None);
        for (pos, expected) in [(2, 0), (3, 0), (5, 2), (9, 5), (10, 5)] {
            assert_eq!(louds.parent(pos), Some(expected), "pos={pos}");
        }
    }

    #[test]
    fn test_children_match_trie() {
        let trie = Trie::create(["hello", "hey", "world", "he", "worm", "x"]);
        let louds = Louds::from_trie(&trie);
        // Node indices follow the level order of the walk.
        let mut order = vec![Trie::ROOT];
        order.extend(trie.level_order().filter_map(|step| match step {
            LevelStep::Child { node, .. } => Some(node),
            LevelStep::Close => None,
        }));
        for (i, &id) in order.iter().enumerate() {
            let pos = louds.node_position(i + 1).unwrap();
            let node = trie.node(id).unwrap();
            assert_eq!(louds.num_children(pos), Some(node.num_children()));
            let mut child = louds.first_child(pos).unwrap();
            for &(_, c) in node.children() {
                assert!(louds.is_node(child));
                let index = louds.node_index(child).unwrap();
                assert_eq!(order[index - 1], c);
                assert_eq!(louds.parent(child), Some(pos));
                child += 1;
            }
            assert!(!louds.is_node(child));
        }
    }

    #[test]
    fn test_from_bit_array() {
        let bits = |s: &str| BitArray::from_bits(parse_bits(s));
        assert!(Louds::from_bit_array(bits(FIXTURE)).is_ok());
        assert!(Louds::from_bit_array(bits("100")).is_ok());
        for s in ["", "10", "1000", "000", "110", "101", "10010", "100110100"] {
            let e = Louds::from_bit_array(bits(s)).unwrap_err();
            assert!(
                matches!(e.downcast_ref::<Error>(), Some(Error::MalformedEncoding(_))),
                "bits={s}"
            );
        }
    }

    #[test]
    fn test_serialize() {
        let louds = fixture();
        let mut bytes = vec![];
        let size = louds.serialize_into(&mut bytes).unwrap();
        let other = Louds::deserialize_from(&bytes[..]).unwrap();
        assert_eq!(louds, other);
        assert_eq!(size, bytes.len());
        assert_eq!(size, louds.size_in_bytes());
    }
}
