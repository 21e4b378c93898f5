//! Fixed-width symbol alphabets.
//!
//! A prefix-code tree is generic over its symbol type. Two widths are
//! supported: single bytes (`u8`, 256 symbols) and byte pairs (`u16`, 65536
//! symbols, first byte in the high half).

use num_traits::{AsPrimitive, FromPrimitive, PrimInt, Unsigned};
use std::fmt::Debug;

/// An unsigned symbol of fixed bit width.
pub trait Symbol: PrimInt + Unsigned + AsPrimitive<usize> + FromPrimitive + Debug {
    /// Number of bits in one symbol.
    const WIDTH: u32;

    /// Number of distinct symbol values.
    const ALPHABET_SIZE: usize = 1 << Self::WIDTH;

    /// Number of bytes one symbol covers in the raw input.
    const BYTES: usize = (Self::WIDTH / 8) as usize;

    /// Position of this symbol in a dense per-symbol table.
    fn index(self) -> usize {
        self.as_()
    }

    /// Symbol stored at `index` of a dense per-symbol table.
    fn from_index(index: usize) -> Option<Self> {
        Self::from_usize(index)
    }

    /// Split raw bytes into symbols. A trailing partial symbol is padded with
    /// zero bytes.
    fn pack(bytes: &[u8]) -> Vec<Self>;

    /// Append the bytes of `symbols` to `out`, stopping after `byte_len` bytes.
    fn unpack(symbols: &[Self], byte_len: usize, out: &mut Vec<u8>);

    /// Number of symbols `pack` produces for `byte_len` bytes.
    fn symbols_for_bytes(byte_len: usize) -> usize {
        byte_len.div_ceil(Self::BYTES)
    }
}

impl Symbol for u8 {
    const WIDTH: u32 = 8;

    fn pack(bytes: &[u8]) -> Vec<Self> {
        bytes.to_vec()
    }

    fn unpack(symbols: &[Self], byte_len: usize, out: &mut Vec<u8>) {
        out.extend_from_slice(&symbols[..byte_len.min(symbols.len())]);
    }
}

impl Symbol for u16 {
    const WIDTH: u32 = 16;

    fn pack(bytes: &[u8]) -> Vec<Self> {
        bytes
            .chunks(2)
            .map(|pair| {
                let high = u16::from(pair[0]) << 8;
                let low = pair.get(1).copied().map_or(0, u16::from);
                high | low
            })
            .collect()
    }

    fn unpack(symbols: &[Self], byte_len: usize, out: &mut Vec<u8>) {
        out.extend(
            symbols
                .iter()
                .flat_map(|symbol| symbol.to_be_bytes())
                .take(byte_len),
        );
    }
}
