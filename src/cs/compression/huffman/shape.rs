//! Pre-order bit serialization of a tree's shape.
//!
//! Internal nodes below the root are announced by a `0` bit before their
//! subtrees are written. A leaf is a `1` bit followed by its symbol, `WIDTH`
//! bits MSB-first. Subtrees are visited zero child first. The root's own marker
//! is implicit, and a lone-leaf tree is written as its bare symbol. The number
//! of leaves is not part of the stream; the reader must be told.

use super::{HuffmanNode, HuffmanTree, NodeId};
use crate::cs::compression::bit_io::{BitSink, BitSource};
use crate::cs::compression::symbol::Symbol;
use crate::cs::compression::Result;
use crate::cs::error::Error;

impl<S: Symbol> HuffmanTree<S> {
    /// Write the tree's shape to `sink`. An empty tree writes nothing.
    pub fn serialize_shape<B: BitSink + ?Sized>(&self, sink: &mut B) -> Result<()> {
        let Some(root) = self.root else {
            return Ok(());
        };
        if self.nodes[root].is_leaf() {
            return write_symbol(sink, self.nodes[root].symbol);
        }

        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            match (node.zero, node.one) {
                (Some(zero), Some(one)) => {
                    if id != root {
                        sink.write_bit(false)?;
                    }
                    stack.push(one);
                    stack.push(zero);
                }
                (None, None) => {
                    sink.write_bit(true)?;
                    write_symbol(sink, node.symbol)?;
                }
                _ => {
                    return Err(Error::MalformedShape(format!(
                        "node {} has exactly one child",
                        id
                    )))
                }
            }
        }
        Ok(())
    }

    /// Rebuild a tree from a shape written by [`HuffmanTree::serialize_shape`].
    ///
    /// Reading stops as soon as `leaf_count` leaves are attached. Node counts
    /// are not part of the shape and come back as zero.
    pub fn reconstruct_from_shape<B: BitSource + ?Sized>(
        source: &mut B,
        leaf_count: usize,
    ) -> Result<Self> {
        let mut tree = Self::empty();
        if leaf_count > S::ALPHABET_SIZE {
            return Err(Error::InvalidInput(format!(
                "{} leaves requested from an alphabet of {}",
                leaf_count,
                S::ALPHABET_SIZE
            )));
        }
        match leaf_count {
            0 => return Ok(tree),
            1 => {
                let symbol = read_symbol(source)?;
                let leaf = tree.push_leaf(symbol)?;
                tree.root = Some(leaf);
                return Ok(tree);
            }
            _ => {}
        }

        let root = tree.push(HuffmanNode::new(0, S::zero()));
        tree.root = Some(root);
        let mut current = root;
        let mut attached = 0;

        while attached < leaf_count {
            if !source.read_bit()? {
                let child = tree.push(HuffmanNode::new(0, S::zero()));
                tree.attach_open(current, child);
                current = child;
                continue;
            }

            let symbol = read_symbol(source)?;
            let leaf = tree.push_leaf(symbol)?;
            attached += 1;
            if tree.attach_open(current, leaf) && attached < leaf_count {
                // Climb to the nearest ancestor still waiting for its one child.
                while tree.nodes[current].one.is_some() {
                    current = tree.nodes[current].parent.ok_or_else(|| {
                        Error::MalformedShape(format!(
                            "shape closed after {} of {} leaves",
                            attached, leaf_count
                        ))
                    })?;
                }
            }
        }

        if let Some(id) = tree
            .nodes
            .iter()
            .position(|node| node.zero.is_some() != node.one.is_some())
        {
            return Err(Error::MalformedShape(format!(
                "node {} has exactly one child after {} leaves",
                id, leaf_count
            )));
        }

        log::debug!(
            "reconstructed prefix-code tree: {} leaves, {} nodes",
            leaf_count,
            tree.nodes.len()
        );
        Ok(tree)
    }

    fn push_leaf(&mut self, symbol: S) -> Result<NodeId> {
        if self.leaves[symbol.index()].is_some() {
            return Err(Error::MalformedShape(format!(
                "symbol {:?} appears twice",
                symbol
            )));
        }
        let id = self.push(HuffmanNode::new(0, symbol));
        self.leaves[symbol.index()] = Some(id);
        Ok(id)
    }

    /// Attach `child` to the first free slot of `parent`. Returns true when
    /// that slot was the one child.
    fn attach_open(&mut self, parent: NodeId, child: NodeId) -> bool {
        let into_one = self.nodes[parent].zero.is_some();
        self.attach(parent, child, !into_one);
        into_one
    }
}

fn write_symbol<S: Symbol, B: BitSink + ?Sized>(sink: &mut B, symbol: S) -> Result<()> {
    sink.write_bits(symbol.index() as u64, S::WIDTH)
}

fn read_symbol<S: Symbol, B: BitSource + ?Sized>(source: &mut B) -> Result<S> {
    let raw = source.read_bits(S::WIDTH)?;
    S::from_u64(raw).ok_or_else(|| Error::InvalidInput(format!("symbol {} out of range", raw)))
}
