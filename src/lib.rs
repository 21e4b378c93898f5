pub mod cs;

pub use cs::compression;
pub use cs::compression::{Compression, HuffmanCodec, HuffmanTree, Mode};
pub use cs::error::{Error, Result};
