//! Compression algorithms implementation.
//!
//! This module provides a two-pass Huffman coder:
//! - Bit-granular I/O over byte streams (MSB-first)
//! - A deterministic prefix-code tree builder over 8-bit and 16-bit alphabets
//! - A compact pre-order serialization of the tree shape
//! - Binary and text containers that frame the shape and the payload
//!
//! # Examples
//!
//! ```rust
//! use hctree::cs::compression::{Compression, HuffmanCodec, Mode};
//!
//! let codec = HuffmanCodec::new(Mode::Block);
//! let packed = codec.compress(b"abracadabra").unwrap();
//! assert_eq!(codec.decompress(&packed).unwrap(), b"abracadabra");
//! ```

use crate::cs::error::Error;

/// Result type for compression operations
pub type Result<T> = std::result::Result<T, Error>;

/// Trait for compression algorithms
pub trait Compression {
    /// Compress the input data
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Decompress the compressed data
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>>;
}

pub mod ascii;
pub mod bit_io;
pub mod codec;
pub mod container;
pub mod frequency;
pub mod huffman;
pub mod symbol;

pub use bit_io::{BitReader, BitSink, BitSource, BitWriter};
pub use codec::{HuffmanCodec, Mode};
pub use frequency::FrequencyTable;
pub use huffman::{HuffmanNode, HuffmanTree, NodeId};
pub use symbol::Symbol;
