use crate::cs::compression::ascii;
use crate::cs::compression::container;
use crate::cs::compression::{Compression, Result};
use std::io::{Read, Write};

/// Container variant a [`HuffmanCodec`] reads and writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// One-byte symbols, binary container.
    #[default]
    Byte,
    /// Two-byte symbols (byte pairs), binary container.
    Block,
    /// One-byte symbols, text header and `'0'`/`'1'` payload.
    Ascii,
}

/// Two-pass Huffman compressor.
///
/// The whole input is counted before the tree is built, and the decoder needs
/// the whole container from the start.
///
/// # Example
///
/// ```
/// use hctree::{Compression, HuffmanCodec, Mode};
///
/// let codec = HuffmanCodec::default();
/// let packed = codec.compress(b"mississippi").unwrap();
/// assert_eq!(codec.decompress(&packed).unwrap(), b"mississippi");
///
/// let text = HuffmanCodec::new(Mode::Ascii).compress(b"ab").unwrap();
/// assert!(text.ends_with(b"\n01") || text.ends_with(b"\n10"));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HuffmanCodec {
    mode: Mode,
}

impl HuffmanCodec {
    /// Create a codec for the given container variant.
    pub fn new(mode: Mode) -> Self {
        HuffmanCodec { mode }
    }

    /// Switch to another container variant.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Container variant in use.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Compress `data` and write the container to `out`.
    pub fn compress_to<W: Write>(&self, data: &[u8], out: W) -> Result<()> {
        log::debug!("compressing {} bytes in {:?} mode", data.len(), self.mode);
        match self.mode {
            Mode::Byte => container::write_container::<u8, W>(data, out),
            Mode::Block => container::write_container::<u16, W>(data, out),
            Mode::Ascii => ascii::write_ascii(data, out),
        }
    }

    /// Read a whole container from `input` and return the original bytes.
    pub fn decompress_from<R: Read>(&self, input: R) -> Result<Vec<u8>> {
        log::debug!("decompressing in {:?} mode", self.mode);
        match self.mode {
            Mode::Byte => container::read_container::<u8, R>(input),
            Mode::Block => container::read_container::<u16, R>(input),
            Mode::Ascii => ascii::read_ascii(input),
        }
    }
}

impl Compression for HuffmanCodec {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.compress_to(data, &mut out)?;
        Ok(out)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.decompress_from(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const MODES: [Mode; 3] = [Mode::Byte, Mode::Block, Mode::Ascii];

    #[test]
    fn test_default_mode() {
        assert_eq!(HuffmanCodec::default().mode(), Mode::Byte);
        assert_eq!(
            HuffmanCodec::default().with_mode(Mode::Block).mode(),
            Mode::Block
        );
    }

    #[test]
    fn test_round_trip_every_mode() {
        let inputs: [&[u8]; 5] = [
            b"",
            b"a",
            b"aaaaaaaaaa",
            b"huffman coding in rust is fun!",
            b"odd length block input",
        ];
        for mode in MODES {
            let codec = HuffmanCodec::new(mode);
            for input in inputs {
                let packed = codec.compress(input).unwrap();
                assert_eq!(codec.decompress(&packed).unwrap(), input, "{:?}", mode);
            }
        }
    }

    #[test]
    fn test_binary_modes_shrink_skewed_input() {
        let mut rng = StdRng::seed_from_u64(5);
        let data: Vec<u8> = (0..20_000)
            .map(|_| if rng.gen_bool(0.9) { b'e' } else { rng.gen() })
            .collect();
        for mode in [Mode::Byte, Mode::Block] {
            let codec = HuffmanCodec::new(mode);
            let packed = codec.compress(&data).unwrap();
            assert!(packed.len() < data.len() / 2, "{:?}: {}", mode, packed.len());
            assert_eq!(codec.decompress(&packed).unwrap(), data);
        }
    }

    #[test]
    fn test_stream_interfaces() {
        let codec = HuffmanCodec::new(Mode::Block);
        let mut out = Vec::new();
        codec.compress_to(b"streams of bytes", &mut out).unwrap();
        let decoded = codec.decompress_from(std::io::Cursor::new(out)).unwrap();
        assert_eq!(decoded, b"streams of bytes");
    }

    #[test]
    fn test_empty_file_decompresses_in_every_mode() {
        for mode in MODES {
            assert!(HuffmanCodec::new(mode).decompress(&[]).unwrap().is_empty());
        }
    }
}
