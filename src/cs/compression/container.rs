//! Binary container for Huffman-compressed data.
//!
//! Layout, all multi-byte fields big-endian:
//!
//! | field        | size                 | contents                                  |
//! |--------------|----------------------|-------------------------------------------|
//! | length       | 4 bytes              | original input length in bytes            |
//! | leaves       | 1 byte (2 for `u16`) | number of distinct symbols minus one      |
//! | shape        | bits                 | tree shape, see `HuffmanTree::serialize_shape` |
//! | payload      | bits                 | code word of every symbol in input order  |
//!
//! The shape starts right after the header and the payload follows the shape
//! without alignment. The last byte is zero-padded. A zero length ends the
//! container after the length field.
//!
//! For the one-byte alphabet the length is also the symbol count. For the
//! paired-byte alphabet the decoder reads `ceil(length / 2)` symbols and drops
//! the padding byte of an odd-length input.

use crate::cs::compression::bit_io::{self, BitReader, BitSink, BitWriter};
use crate::cs::compression::frequency::FrequencyTable;
use crate::cs::compression::huffman::HuffmanTree;
use crate::cs::compression::symbol::Symbol;
use crate::cs::compression::Result;
use crate::cs::error::Error;
use std::io::{self, Read, Write};

/// Size of the length field.
pub const LENGTH_BYTES: usize = 4;

/// Compress `data` over the alphabet `S` and write the container to `out`.
pub fn write_container<S: Symbol, W: Write>(data: &[u8], mut out: W) -> Result<()> {
    let length = u32::try_from(data.len()).map_err(|_| {
        Error::InvalidInput(format!(
            "input of {} bytes does not fit the 32-bit length field",
            data.len()
        ))
    })?;
    out.write_all(&length.to_be_bytes())?;
    if length == 0 {
        out.flush()?;
        return Ok(());
    }

    let symbols = S::pack(data);
    let tree = HuffmanTree::build(&FrequencyTable::from_symbols(&symbols));
    let leaves = tree.distinct_symbol_count();
    let leaf_field = (leaves as u64 - 1).to_be_bytes();
    out.write_all(&leaf_field[leaf_field.len() - S::BYTES..])?;

    let mut writer = BitWriter::new(&mut out);
    tree.serialize_shape(&mut writer)?;
    let table = tree.code_table();
    for &symbol in &symbols {
        let word = table[symbol.index()]
            .as_ref()
            .ok_or(Error::UnknownSymbol(symbol.index()))?;
        for bit in word.iter().by_vals() {
            writer.write_bit(bit)?;
        }
    }
    writer.finish()?;

    log::debug!(
        "wrote {}-bit container: {} bytes, {} symbols, {} leaves",
        S::WIDTH,
        data.len(),
        symbols.len(),
        leaves
    );
    Ok(())
}

/// Read a container over the alphabet `S` and return the original bytes.
///
/// A source with no bytes at all is treated like a zero-length container.
pub fn read_container<S: Symbol, R: Read>(mut input: R) -> Result<Vec<u8>> {
    let mut length_field = [0u8; LENGTH_BYTES];
    match fill(&mut input, &mut length_field)? {
        0 => return Ok(Vec::new()),
        LENGTH_BYTES => {}
        _ => return Err(Error::UnexpectedEndOfStream),
    }
    let length = u32::from_be_bytes(length_field) as usize;
    if length == 0 {
        return Ok(Vec::new());
    }

    let mut leaf_field = [0u8; 8];
    bit_io::read_exact(&mut input, &mut leaf_field[8 - S::BYTES..])?;
    let leaves = u64::from_be_bytes(leaf_field) as usize + 1;

    let mut reader = BitReader::new(input);
    let tree = HuffmanTree::<S>::reconstruct_from_shape(&mut reader, leaves)?;

    let symbol_count = S::symbols_for_bytes(length);
    let mut symbols = Vec::with_capacity(symbol_count.min(1 << 20));
    for _ in 0..symbol_count {
        symbols.push(tree.decode(&mut reader)?);
    }

    let mut output = Vec::with_capacity(length.min(1 << 20));
    S::unpack(&symbols, length, &mut output);
    log::debug!(
        "read {}-bit container: {} bytes, {} symbols, {} leaves",
        S::WIDTH,
        length,
        symbol_count,
        leaves
    );
    Ok(output)
}

/// Read until `buf` is full or the source ends; returns the bytes read.
fn fill<R: Read>(input: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match input.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(filled)
}
