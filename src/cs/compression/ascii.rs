//! Human-readable Huffman container over the byte alphabet.
//!
//! The header is 256 lines, one decimal count per byte value, each ended by
//! `\n`. The payload spells every code word out as ASCII `'0'` and `'1'`
//! characters. The decoder rebuilds the tree from the counts, so no tree shape
//! is stored. Useful for inspecting what the coder does; the output is larger
//! than the input.

use crate::cs::compression::bit_io::{self, BitSink, BitSource};
use crate::cs::compression::frequency::FrequencyTable;
use crate::cs::compression::huffman::HuffmanTree;
use crate::cs::compression::Result;
use crate::cs::error::Error;
use std::io::{BufRead, BufReader, Read, Write};

/// Writes each bit as the character `'0'` or `'1'`.
pub struct AsciiBitSink<W: Write> {
    inner: W,
}

impl<W: Write> AsciiBitSink<W> {
    /// Wrap a byte sink.
    pub fn new(inner: W) -> Self {
        AsciiBitSink { inner }
    }

    /// Release the byte sink.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> BitSink for AsciiBitSink<W> {
    fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.inner.write_all(if bit { b"1" } else { b"0" })?;
        Ok(())
    }
}

/// Reads bits spelled as the characters `'0'` and `'1'`.
pub struct AsciiBitSource<R: Read> {
    inner: R,
}

impl<R: Read> AsciiBitSource<R> {
    /// Wrap a byte source.
    pub fn new(inner: R) -> Self {
        AsciiBitSource { inner }
    }
}

impl<R: Read> BitSource for AsciiBitSource<R> {
    fn read_bit(&mut self) -> Result<bool> {
        let mut buf = [0u8; 1];
        bit_io::read_exact(&mut self.inner, &mut buf)?;
        match buf[0] {
            b'0' => Ok(false),
            b'1' => Ok(true),
            other => Err(Error::InvalidInput(format!(
                "expected '0' or '1' in text payload, found byte {:#04x}",
                other
            ))),
        }
    }
}

/// Compress `data` into the text container.
pub fn write_ascii<W: Write>(data: &[u8], mut out: W) -> Result<()> {
    let freqs = FrequencyTable::<u8>::from_symbols(data);
    for count in freqs.as_slice() {
        writeln!(out, "{}", count)?;
    }

    let tree = HuffmanTree::build(&freqs);
    let mut sink = AsciiBitSink::new(&mut out);
    for &byte in data {
        tree.encode(byte, &mut sink)?;
    }
    out.flush()?;
    log::debug!(
        "wrote text container: {} bytes, {} leaves",
        data.len(),
        tree.distinct_symbol_count()
    );
    Ok(())
}

/// Read a text container and return the original bytes.
///
/// A source with no bytes at all decodes to nothing.
pub fn read_ascii<R: Read>(input: R) -> Result<Vec<u8>> {
    let mut reader = BufReader::new(input);
    let mut counts = Vec::with_capacity(256);
    let mut line = Vec::new();

    for index in 0..256 {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            if index == 0 {
                return Ok(Vec::new());
            }
            return Err(Error::UnexpectedEndOfStream);
        }
        counts.push(parse_count(&line, index)?);
    }

    let freqs = FrequencyTable::<u8>::from_counts(counts)?;
    let total = freqs
        .total()
        .ok_or_else(|| Error::InvalidInput("header counts overflow".to_string()))?;
    let tree = HuffmanTree::build(&freqs);
    // A lone leaf decodes without reading, but its `0` code word is still
    // spelled out once per symbol.
    let lone_leaf = freqs.distinct() == 1;

    let mut source = AsciiBitSource::new(reader);
    let mut output = Vec::with_capacity(total.min(1 << 20) as usize);
    for _ in 0..total {
        if lone_leaf && source.read_bit()? {
            return Err(Error::InvalidInput(
                "expected '0' code word for the only symbol".to_string(),
            ));
        }
        output.push(tree.decode(&mut source)?);
    }
    log::debug!(
        "read text container: {} bytes, {} leaves",
        total,
        tree.distinct_symbol_count()
    );
    Ok(output)
}

fn parse_count(line: &[u8], index: usize) -> Result<u64> {
    let text = std::str::from_utf8(line)
        .map_err(|_| Error::InvalidInput(format!("header line {} is not UTF-8", index)))?;
    text.trim_end_matches(&['\n', '\r'][..])
        .parse()
        .map_err(|err| Error::InvalidInput(format!("header line {}: {}", index, err)))
}
