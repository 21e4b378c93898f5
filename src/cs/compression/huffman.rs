//! Huffman prefix-code tree.
//!
//! The tree is stored as an arena of [`HuffmanNode`]s addressed by [`NodeId`].
//! Child links and the parent back-reference are plain indices, so dropping a
//! tree releases every node exactly once. A dense leaf table maps each symbol
//! to its leaf for O(1) lookup during encoding.
//!
//! Construction is fully deterministic. Nodes leave the priority queue in
//! order of lower count first; among equal counts the larger symbol goes
//! first. The first node dequeued becomes the `0` child of the merged node,
//! the second becomes the `1` child and lends the merged node its symbol for
//! further tie-breaking.

use crate::cs::compression::bit_io::{BitSink, BitSource};
use crate::cs::compression::frequency::FrequencyTable;
use crate::cs::compression::symbol::Symbol;
use crate::cs::compression::Result;
use crate::cs::error::Error;
use bitvec::prelude::*;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

mod shape;

/// Index of a node inside its tree's arena.
pub type NodeId = usize;

/// One node of a prefix-code tree.
///
/// A node is either a leaf (no children) or internal (both children).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanNode<S> {
    /// Frequency of the leaf, or the sum of the children's counts.
    pub count: u64,
    /// Leaf symbol. On internal nodes only used to break ties during build.
    pub symbol: S,
    /// Child reached by a `0` bit.
    pub zero: Option<NodeId>,
    /// Child reached by a `1` bit.
    pub one: Option<NodeId>,
    /// Non-owning back-reference, `None` on the root.
    pub parent: Option<NodeId>,
    /// Whether this node hangs off its parent's `0` edge.
    pub is_zero_child: bool,
}

impl<S> HuffmanNode<S> {
    fn new(count: u64, symbol: S) -> Self {
        HuffmanNode {
            count,
            symbol,
            zero: None,
            one: None,
            parent: None,
            is_zero_child: false,
        }
    }

    /// True when the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.zero.is_none() && self.one.is_none()
    }
}

/// Priority-queue entry. `BinaryHeap` pops the greatest entry, so the
/// ordering ranks lower counts, then larger symbols, then older nodes higher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeWrapper<S> {
    count: u64,
    symbol: S,
    id: NodeId,
}

impl<S: Ord> Ord for NodeWrapper<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .count
            .cmp(&self.count)
            .then_with(|| self.symbol.cmp(&other.symbol))
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl<S: Ord> PartialOrd for NodeWrapper<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A prefix-code tree over the alphabet `S`.
#[derive(Debug, Clone)]
pub struct HuffmanTree<S: Symbol> {
    nodes: Vec<HuffmanNode<S>>,
    root: Option<NodeId>,
    leaves: Vec<Option<NodeId>>,
}

impl<S: Symbol> HuffmanTree<S> {
    /// A tree with no nodes.
    pub fn empty() -> Self {
        HuffmanTree {
            nodes: Vec::new(),
            root: None,
            leaves: vec![None; S::ALPHABET_SIZE],
        }
    }

    /// Build the tree for a frequency table.
    ///
    /// Symbols with a zero count get no leaf. An all-zero table yields an empty
    /// tree and a table with a single symbol yields a lone leaf as root.
    ///
    /// # Example
    ///
    /// ```
    /// use hctree::cs::compression::{FrequencyTable, HuffmanTree};
    ///
    /// let freqs = FrequencyTable::<u8>::from_symbols(b"aabbbccccc");
    /// let tree = HuffmanTree::build(&freqs);
    /// assert_eq!(tree.code_word(b'c').unwrap().len(), 1);
    /// assert_eq!(tree.code_word(b'a').unwrap().len(), 2);
    /// ```
    pub fn build(freqs: &FrequencyTable<S>) -> Self {
        let mut tree = Self::empty();
        let mut heap = BinaryHeap::new();

        for (symbol, count) in freqs.present() {
            let id = tree.push(HuffmanNode::new(count, symbol));
            tree.leaves[symbol.index()] = Some(id);
            heap.push(NodeWrapper { count, symbol, id });
        }

        while let Some(first) = heap.pop() {
            let Some(second) = heap.pop() else {
                tree.root = Some(first.id);
                break;
            };
            let count = first.count.saturating_add(second.count);
            let parent = tree.push(HuffmanNode::new(count, second.symbol));
            tree.attach(parent, first.id, true);
            tree.attach(parent, second.id, false);
            log::trace!(
                "merged {:?}({}) and {:?}({}) into node {}",
                first.symbol,
                first.count,
                second.symbol,
                second.count,
                parent
            );
            heap.push(NodeWrapper {
                count,
                symbol: second.symbol,
                id: parent,
            });
        }

        log::debug!(
            "built prefix-code tree: {} leaves, {} nodes, total count {}",
            tree.distinct_symbol_count(),
            tree.nodes.len(),
            tree.root.map_or(0, |root| tree.nodes[root].count)
        );
        tree
    }

    fn push(&mut self, node: HuffmanNode<S>) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn attach(&mut self, parent: NodeId, child: NodeId, zero: bool) {
        if zero {
            self.nodes[parent].zero = Some(child);
        } else {
            self.nodes[parent].one = Some(child);
        }
        self.nodes[child].parent = Some(parent);
        self.nodes[child].is_zero_child = zero;
    }

    /// Root node, `None` for an empty tree.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Borrow the node at `id`.
    pub fn node(&self, id: NodeId) -> Option<&HuffmanNode<S>> {
        self.nodes.get(id)
    }

    /// Leaf holding `symbol`, if the symbol is part of the code.
    pub fn leaf(&self, symbol: S) -> Option<NodeId> {
        self.leaves.get(symbol.index()).copied().flatten()
    }

    /// True when no symbol has a code word.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Total number of nodes, leaves and internal.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of symbols that have a code word.
    pub fn distinct_symbol_count(&self) -> usize {
        self.leaves.iter().filter(|leaf| leaf.is_some()).count()
    }

    /// The code word of `symbol`, root to leaf.
    ///
    /// A tree whose root is a leaf gives its only symbol the code word `0`.
    pub fn code_word(&self, symbol: S) -> Result<BitVec<u8, Msb0>> {
        let leaf = self
            .leaf(symbol)
            .ok_or(Error::UnknownSymbol(symbol.index()))?;
        let mut bits = BitVec::new();
        if self.root == Some(leaf) {
            bits.push(false);
            return Ok(bits);
        }

        // Walk leaf to root, then flip into root-to-leaf order.
        let mut current = leaf;
        while let Some(parent) = self.nodes[current].parent {
            bits.push(!self.nodes[current].is_zero_child);
            current = parent;
        }
        bits.reverse();
        Ok(bits)
    }

    /// Code words of every symbol, indexed by symbol value.
    pub fn code_table(&self) -> Vec<Option<BitVec<u8, Msb0>>> {
        (0..S::ALPHABET_SIZE)
            .map(|index| {
                S::from_index(index)
                    .filter(|&symbol| self.leaf(symbol).is_some())
                    .and_then(|symbol| self.code_word(symbol).ok())
            })
            .collect()
    }

    /// Write the code word of `symbol` to `sink`.
    ///
    /// Fails with [`Error::UnknownSymbol`] before writing anything if the
    /// symbol has no leaf.
    pub fn encode<B: BitSink + ?Sized>(&self, symbol: S, sink: &mut B) -> Result<()> {
        for bit in self.code_word(symbol)?.iter().by_vals() {
            sink.write_bit(bit)?;
        }
        Ok(())
    }

    /// Read one code word from `source` and return its symbol.
    ///
    /// A lone-leaf tree returns its symbol without consuming any bits.
    pub fn decode<B: BitSource + ?Sized>(&self, source: &mut B) -> Result<S> {
        let mut current = self.root.ok_or(Error::EmptyTree)?;
        loop {
            let node = &self.nodes[current];
            if node.is_leaf() {
                return Ok(node.symbol);
            }
            let next = if source.read_bit()? {
                node.one
            } else {
                node.zero
            };
            current = next.ok_or_else(|| {
                Error::MalformedShape(format!("node {} is missing a child", current))
            })?;
        }
    }
}

impl<S: Symbol> Default for HuffmanTree<S> {
    fn default() -> Self {
        Self::empty()
    }
}
