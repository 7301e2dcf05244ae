//! Live trie over an arena of nodes.

use std::io::{Read, Write};

use anyhow::Result;

use crate::cursor::ByteCursor;
use crate::queue::Queue;
use crate::{Build, Error, Search, Serializable};

/// Index of a node in the arena of a [`Trie`].
pub type NodeId = usize;

/// Bytes of `size:u32 | eow:u8` heading every record of the recursive format.
const RECORD_HEADER: usize = 5;

/// Node of a [`Trie`].
///
/// Children are kept sorted by key.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct TrieNode {
    children: Vec<(u8, NodeId)>,
    is_end_of_word: bool,
}

impl TrieNode {
    /// Checks if the path to this node spells an inserted word.
    pub const fn is_end_of_word(&self) -> bool {
        self.is_end_of_word
    }

    /// Returns the `(key, child)` pairs in ascending key order.
    pub fn children(&self) -> &[(u8, NodeId)] {
        &self.children
    }

    /// Returns the number of children.
    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    /// Returns the child reached by `key`, or [`None`] if absent.
    #[inline(always)]
    pub fn child(&self, key: u8) -> Option<NodeId> {
        self.children
            .binary_search_by_key(&key, |&(k, _)| k)
            .ok()
            .map(|i| self.children[i].1)
    }
}

/// Live trie supporting incremental insertion.
///
/// Nodes live in one arena and refer to their children by [`NodeId`]; the root is
/// [`Trie::ROOT`]. A child is always allocated after its parent, so its id is larger.
///
/// # Serialization
///
/// [`Serializable`] uses the recursive format
/// `size:u32 | eow:u8 | { key:u8 | <child record> }*`,
/// where `size` is the byte length of the whole record including its descendants.
///
/// # Examples
///
/// ```
/// # fn main() -> anyhow::Result<()> {
/// use trie_encodings::{prelude::*, Trie};
///
/// let mut trie = Trie::new();
/// trie.insert("ab");
/// trie.insert("c");
///
/// assert!(trie.search("ab"));
/// assert!(!trie.search("a"));
/// assert!(trie.starts_with("a"));
///
/// let bytes = trie.to_bytes()?;
/// assert_eq!(bytes, [
///     0, 0, 0, 23, 0,
///     b'a', 0, 0, 0, 11, 0,
///     b'b', 0, 0, 0, 5, 1,
///     b'c', 0, 0, 0, 5, 1,
/// ]);
/// assert_eq!(Trie::from_bytes(&bytes)?, trie);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Trie {
    nodes: Vec<TrieNode>,
}

impl Default for Trie {
    fn default() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
        }
    }
}

impl Trie {
    /// Id of the root node.
    pub const ROOT: NodeId = 0;

    /// Creates a trie holding only the root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a trie holding every word of `words`, inserted in order.
    pub fn create<I, W>(words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: AsRef<[u8]>,
    {
        let mut this = Self::new();
        words.into_iter().for_each(|w| this.insert(w));
        tracing::debug!(nodes = this.num_nodes(), "created trie");
        this
    }

    /// Inserts `word`, creating the missing nodes on its path.
    ///
    /// # Examples
    ///
    /// ```
    /// use trie_encodings::{prelude::*, Trie};
    ///
    /// let mut trie = Trie::new();
    /// trie.insert("hey");
    /// trie.insert("hello");
    /// assert_eq!(trie.num_nodes(), 7);
    /// assert_eq!(trie.num_words(), 2);
    /// ```
    pub fn insert<W: AsRef<[u8]>>(&mut self, word: W) {
        let mut cur = Self::ROOT;
        for &key in word.as_ref() {
            let children = &self.nodes[cur].children;
            cur = match children.binary_search_by_key(&key, |&(k, _)| k) {
                Ok(i) => children[i].1,
                Err(i) => {
                    let id = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[cur].children.insert(i, (key, id));
                    id
                }
            };
        }
        self.nodes[cur].is_end_of_word = true;
    }

    /// Returns the node reached by spelling `word` from the root, or [`None`] if the path breaks.
    pub fn find<W: AsRef<[u8]>>(&self, word: W) -> Option<NodeId> {
        word.as_ref()
            .iter()
            .try_fold(Self::ROOT, |cur, &key| self.nodes[cur].child(key))
    }

    /// Returns the root node.
    pub fn root(&self) -> &TrieNode {
        &self.nodes[Self::ROOT]
    }

    /// Returns the node of `id`, or [`None`] if out of bounds.
    pub fn node(&self, id: NodeId) -> Option<&TrieNode> {
        self.nodes.get(id)
    }

    /// Returns all nodes indexed by [`NodeId`].
    pub fn nodes(&self) -> &[TrieNode] {
        &self.nodes
    }

    /// Returns the number of nodes, including the root.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of distinct words inserted.
    pub fn num_words(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_end_of_word).count()
    }

    /// Creates an iterator walking the trie in level order, as [`LevelStep`]s.
    ///
    /// # Examples
    ///
    /// ```
    /// use trie_encodings::{tries::LevelStep, Trie};
    ///
    /// let trie = Trie::create(["ab", "c"]);
    /// let steps: Vec<_> = trie.level_order().collect();
    /// assert_eq!(steps, [
    ///     LevelStep::Child { key: b'a', node: 1, end_of_word: false },
    ///     LevelStep::Child { key: b'c', node: 3, end_of_word: true },
    ///     LevelStep::Close,
    ///     LevelStep::Child { key: b'b', node: 2, end_of_word: true },
    ///     LevelStep::Close,
    ///     LevelStep::Close,
    ///     LevelStep::Close,
    /// ]);
    /// ```
    pub fn level_order(&self) -> LevelOrder<'_> {
        LevelOrder::new(self)
    }

    /// Returns the byte length of the record of every node, indexed by [`NodeId`].
    fn record_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.nodes.len()];
        // Children have larger ids than their parent.
        for id in (0..self.nodes.len()).rev() {
            sizes[id] = self.nodes[id]
                .children
                .iter()
                .fold(RECORD_HEADER, |acc, &(_, child)| acc + 1 + sizes[child]);
        }
        sizes
    }

    fn encode(&self) -> Result<Vec<u8>> {
        let sizes = self.record_sizes();
        crate::utils::to_u32(sizes[Self::ROOT], "record size")?;

        enum Item {
            Key(u8),
            Node(NodeId),
        }

        let mut cur = ByteCursor::new(vec![0; sizes[Self::ROOT]]);
        let mut stack = vec![Item::Node(Self::ROOT)];
        while let Some(item) = stack.pop() {
            match item {
                Item::Key(key) => cur.set_u8(key)?,
                Item::Node(id) => {
                    let node = &self.nodes[id];
                    cur.set_u32(sizes[id] as u32)?;
                    cur.set_u8(u8::from(node.is_end_of_word))?;
                    for &(key, child) in node.children.iter().rev() {
                        stack.push(Item::Node(child));
                        stack.push(Item::Key(key));
                    }
                }
            }
        }
        debug_assert_eq!(cur.offset(), cur.len());
        Ok(cur.into_inner())
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        let mut cur = ByteCursor::new(bytes);
        let (size, is_end_of_word) = read_header(&mut cur)?;
        if size != bytes.len() {
            return Err(Error::malformed(format!(
                "root record size {size} does not match the {}-byte buffer",
                bytes.len()
            ))
            .into());
        }

        let mut this = Self {
            nodes: vec![TrieNode {
                children: vec![],
                is_end_of_word,
            }],
        };
        let mut stack = vec![(Self::ROOT, size)];
        while let Some(&(parent, end)) = stack.last() {
            if cur.offset() == end {
                stack.pop();
                continue;
            }
            let key = cur.get_u8()?;
            let start = cur.offset();
            let (size, is_end_of_word) = read_header(&mut cur)?;
            let child_end = start + size;
            if end < child_end {
                return Err(Error::malformed(format!(
                    "record at {start} ends at {child_end}, past its parent's end {end}"
                ))
                .into());
            }
            let id = this.nodes.len();
            let children = &mut this.nodes[parent].children;
            match children.binary_search_by_key(&key, |&(k, _)| k) {
                Ok(_) => {
                    return Err(
                        Error::malformed(format!("duplicate key {key} in record at {start}")).into(),
                    )
                }
                Err(i) => children.insert(i, (key, id)),
            }
            this.nodes.push(TrieNode {
                children: vec![],
                is_end_of_word,
            });
            stack.push((id, child_end));
        }
        Ok(this)
    }
}

/// Reads `size:u32 | eow:u8` and checks that the size covers at least the header.
fn read_header(cur: &mut ByteCursor<&[u8]>) -> Result<(usize, bool)> {
    let start = cur.offset();
    let size = cur.get_u32()? as usize;
    if size < RECORD_HEADER {
        return Err(Error::malformed(format!(
            "record at {start} has size {size}, smaller than its header"
        ))
        .into());
    }
    let is_end_of_word = match cur.get_u8()? {
        0 => false,
        1 => true,
        x => {
            return Err(Error::malformed(format!(
                "record at {start} has end-of-word byte {x}"
            ))
            .into())
        }
    };
    Ok((size, is_end_of_word))
}

impl PartialEq for Trie {
    /// Compares the tree shapes, regardless of how the nodes are numbered.
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(Self::ROOT, Self::ROOT)];
        while let Some((a, b)) = stack.pop() {
            let (a, b) = (&self.nodes[a], &other.nodes[b]);
            if a.is_end_of_word != b.is_end_of_word || a.children.len() != b.children.len() {
                return false;
            }
            for (&(ka, ca), &(kb, cb)) in a.children.iter().zip(&b.children) {
                if ka != kb {
                    return false;
                }
                stack.push((ca, cb));
            }
        }
        true
    }
}

impl Eq for Trie {}

impl Build for Trie {
    /// Creates a new trie from `words`.
    ///
    /// # Errors
    ///
    /// Never.
    fn build_from_words<I, W>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = W>,
        W: AsRef<[u8]>,
    {
        Ok(Self::create(words))
    }
}

impl Search for Trie {
    fn search<W: AsRef<[u8]>>(&self, word: W) -> bool {
        self.find(word)
            .map_or(false, |id| self.nodes[id].is_end_of_word)
    }

    fn starts_with<W: AsRef<[u8]>>(&self, prefix: W) -> bool {
        self.find(prefix).is_some()
    }
}

impl Serializable for Trie {
    fn serialize_into<W: Write>(&self, mut writer: W) -> Result<usize> {
        let bytes = self.encode()?;
        writer.write_all(&bytes)?;
        tracing::debug!(nodes = self.num_nodes(), bytes = bytes.len(), "serialized trie");
        Ok(bytes.len())
    }

    fn deserialize_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = vec![];
        reader.read_to_end(&mut bytes)?;
        let this = Self::decode(&bytes)?;
        tracing::debug!(nodes = this.num_nodes(), bytes = bytes.len(), "deserialized trie");
        Ok(this)
    }

    fn size_in_bytes(&self) -> usize {
        self.record_sizes()[Self::ROOT]
    }
}

/// Step of a level-order walk, created by [`Trie::level_order()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelStep {
    /// Visits a child of the node being expanded.
    Child {
        /// Label of the edge into the child.
        key: u8,
        /// The child.
        node: NodeId,
        /// End-of-word flag of the child.
        end_of_word: bool,
    },
    /// Ends the children of the node being expanded.
    Close,
}

/// Iterator walking a [`Trie`] in level order.
///
/// Nodes are expanded in breadth-first order starting at the root. Expanding a node yields
/// one [`LevelStep::Child`] per child in ascending key order, then one [`LevelStep::Close`].
/// A trie of `n` nodes yields `n - 1` children and `n` closes.
pub struct LevelOrder<'a> {
    trie: &'a Trie,
    queue: Queue<NodeId>,
    expanding: Option<(NodeId, usize)>,
}

impl<'a> LevelOrder<'a> {
    /// Creates a new iterator.
    pub fn new(trie: &'a Trie) -> Self {
        let mut queue = Queue::new();
        queue.push(Trie::ROOT);
        Self {
            trie,
            queue,
            expanding: None,
        }
    }
}

impl Iterator for LevelOrder<'_> {
    type Item = LevelStep;

    fn next(&mut self) -> Option<Self::Item> {
        let (id, i) = match self.expanding {
            Some(state) => state,
            None => (self.queue.shift()?, 0),
        };
        match self.trie.nodes[id].children.get(i) {
            Some(&(key, node)) => {
                self.queue.push(node);
                self.expanding = Some((id, i + 1));
                Some(LevelStep::Child {
                    key,
                    node,
                    end_of_word: self.trie.nodes[node].is_end_of_word,
                })
            }
            None => {
                self.expanding = None;
                Some(LevelStep::Close)
            }
        }
    }
}
