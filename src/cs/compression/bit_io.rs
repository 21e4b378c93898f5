//! Bit-granular I/O layered over byte streams.
//!
//! Bits are packed most-significant first: the first bit written to a byte
//! becomes its high bit. A [`BitWriter`] emits each byte as soon as its eighth
//! bit arrives and zero-pads the last partial byte on [`BitWriter::flush`].
//! A [`BitReader`] pulls exactly one byte from its source whenever its buffer
//! runs dry.
//!
//! The [`BitSink`] and [`BitSource`] traits are the seams the prefix-code tree
//! is written against, so the same tree drives the binary container and the
//! text container in [`crate::cs::compression::ascii`].

use crate::cs::compression::Result;
use crate::cs::error::Error;
use bitvec::prelude::*;
use std::io::{self, Read, Write};

/// Something that accepts a sequence of bits.
pub trait BitSink {
    /// Append one bit.
    fn write_bit(&mut self, bit: bool) -> Result<()>;

    /// Append the low `width` bits of `value`, most significant first.
    fn write_bits(&mut self, value: u64, width: u32) -> Result<()> {
        debug_assert!(width <= u64::BITS);
        for shift in (0..width).rev() {
            self.write_bit((value >> shift) & 1 == 1)?;
        }
        Ok(())
    }
}

/// Something that yields a sequence of bits.
pub trait BitSource {
    /// Take the next bit.
    fn read_bit(&mut self) -> Result<bool>;

    /// Take `width` bits and assemble them most significant first.
    fn read_bits(&mut self, width: u32) -> Result<u64> {
        debug_assert!(width <= u64::BITS);
        let mut value = 0u64;
        for _ in 0..width {
            value = (value << 1) | u64::from(self.read_bit()?);
        }
        Ok(value)
    }
}

impl BitSink for BitVec<u8, Msb0> {
    fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.push(bit);
        Ok(())
    }
}

/// `Read::read_exact`, with a short read reported as
/// [`Error::UnexpectedEndOfStream`].
pub(crate) fn read_exact<R: Read + ?Sized>(input: &mut R, buf: &mut [u8]) -> Result<()> {
    match input.read_exact(buf) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => Err(Error::UnexpectedEndOfStream),
        Err(err) => Err(err.into()),
    }
}

/// Writes bits into a byte sink, one byte at a time.
pub struct BitWriter<W: Write> {
    inner: W,
    current_byte: u8,
    bits_filled: u8,
}

impl<W: Write> BitWriter<W> {
    /// Wrap a byte sink.
    pub fn new(inner: W) -> Self {
        BitWriter {
            inner,
            current_byte: 0,
            bits_filled: 0,
        }
    }

    /// Emit the partially filled byte, if any, with its unused low bits set to
    /// zero, then flush the underlying sink.
    pub fn flush(&mut self) -> Result<()> {
        if self.bits_filled > 0 {
            let byte = self.current_byte << (8 - self.bits_filled);
            self.inner.write_all(&[byte])?;
            self.current_byte = 0;
            self.bits_filled = 0;
        }
        self.inner.flush()?;
        Ok(())
    }

    /// Flush and release the writer, reporting any error the flush hits.
    pub fn finish(mut self) -> Result<()> {
        self.flush()
    }

    /// Number of bits held in the in-flight byte (0-7).
    pub fn pending_bits(&self) -> u8 {
        self.bits_filled
    }

    /// Borrow the underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Mutably borrow the underlying sink. Bytes written through it land
    /// before any bits still pending in the writer.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }
}

impl<W: Write> BitSink for BitWriter<W> {
    fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.current_byte = (self.current_byte << 1) | u8::from(bit);
        self.bits_filled += 1;
        if self.bits_filled == 8 {
            self.inner.write_all(&[self.current_byte])?;
            self.current_byte = 0;
            self.bits_filled = 0;
        }
        Ok(())
    }
}

impl<W: Write> Drop for BitWriter<W> {
    fn drop(&mut self) {
        if self.bits_filled > 0 {
            if let Err(err) = self.flush() {
                log::warn!("dropping bit writer lost {} bits: {}", self.bits_filled, err);
            }
        }
    }
}

/// Reads bits from a byte source, one byte at a time.
pub struct BitReader<R: Read> {
    inner: R,
    current_byte: u8,
    bits_left: u8,
}

impl<R: Read> BitReader<R> {
    /// Wrap a byte source. Nothing is read until the first bit is requested.
    pub fn new(inner: R) -> Self {
        BitReader {
            inner,
            current_byte: 0,
            bits_left: 0,
        }
    }

    fn fill(&mut self) -> Result<()> {
        let mut buf = [0u8; 1];
        read_exact(&mut self.inner, &mut buf)?;
        self.current_byte = buf[0];
        self.bits_left = 8;
        Ok(())
    }

    /// Borrow the underlying source.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Mutably borrow the underlying source.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Release the source. Bits left in the current byte are discarded.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> BitSource for BitReader<R> {
    fn read_bit(&mut self) -> Result<bool> {
        if self.bits_left == 0 {
            self.fill()?;
        }
        self.bits_left -= 1;
        Ok((self.current_byte >> self.bits_left) & 1 == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_pads_partial_byte() {
        let mut out = Vec::new();
        let mut writer = BitWriter::new(&mut out);
        writer.write_bit(true).unwrap();
        writer.write_bit(false).unwrap();
        writer.flush().unwrap();
        drop(writer);
        assert_eq!(out, vec![0b1000_0000]);
    }

    #[test]
    fn test_writer_alternating_bits() {
        let mut out = Vec::new();
        let mut writer = BitWriter::new(&mut out);
        for i in 0..15 {
            writer.write_bit((i + 1) % 2 == 1).unwrap();
        }
        assert_eq!(writer.pending_bits(), 7);
        writer.finish().unwrap();
        assert_eq!(out, vec![0b1010_1010, 0b1010_1010]);
    }

    #[test]
    fn test_writer_emits_full_byte_immediately() {
        let mut out = Vec::new();
        let mut writer = BitWriter::new(&mut out);
        writer.write_bits(0xA5, 8).unwrap();
        assert_eq!(writer.get_ref().as_slice(), &[0xA5]);
        assert_eq!(writer.pending_bits(), 0);
        writer.finish().unwrap();
        // Flushing an empty buffer adds nothing.
        assert_eq!(out, vec![0xA5]);
    }

    #[test]
    fn test_writer_flushes_on_drop() {
        let mut out = Vec::new();
        {
            let mut writer = BitWriter::new(&mut out);
            writer.write_bits(0b101, 3).unwrap();
        }
        assert_eq!(out, vec![0b1010_0000]);
    }

    #[test]
    fn test_reader_msb_first() {
        let data = [0b1000_0000u8];
        let mut reader = BitReader::new(&data[..]);
        assert!(reader.read_bit().unwrap());
        assert!(!reader.read_bit().unwrap());
    }

    #[test]
    fn test_reader_alternating_bits() {
        let data = [0b1010_1010u8, 0b1010_1010];
        let mut reader = BitReader::new(&data[..]);
        for i in 0..15 {
            assert_eq!(reader.read_bit().unwrap(), (i + 1) % 2 == 1);
        }
    }

    #[test]
    fn test_reader_end_of_stream() {
        let data = [0xFFu8];
        let mut reader = BitReader::new(&data[..]);
        assert_eq!(reader.read_bits(8).unwrap(), 0xFF);
        assert!(matches!(
            reader.read_bit(),
            Err(Error::UnexpectedEndOfStream)
        ));

        let mut empty = BitReader::new(io::empty());
        assert!(matches!(
            empty.read_bit(),
            Err(Error::UnexpectedEndOfStream)
        ));
    }

    #[test]
    fn test_fixed_width_values_across_byte_boundaries() {
        let mut out = Vec::new();
        let mut writer = BitWriter::new(&mut out);
        writer.write_bit(true).unwrap();
        writer.write_bits(0xBEEF, 16).unwrap();
        writer.write_bits(0x3, 2).unwrap();
        writer.finish().unwrap();
        assert_eq!(out.len(), 3);

        let mut reader = BitReader::new(out.as_slice());
        assert!(reader.read_bit().unwrap());
        assert_eq!(reader.read_bits(16).unwrap(), 0xBEEF);
        assert_eq!(reader.read_bits(2).unwrap(), 0x3);
        // Padding bits are zero.
        assert_eq!(reader.read_bits(5).unwrap(), 0);
    }

    #[test]
    fn test_bitvec_sink() {
        let mut bits: BitVec<u8, Msb0> = BitVec::new();
        bits.write_bits(0b1101, 4).unwrap();
        assert_eq!(bits, bitvec![u8, Msb0; 1, 1, 0, 1]);
    }
}
