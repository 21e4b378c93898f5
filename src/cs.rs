pub mod compression;
pub mod error;

pub use compression::*;
