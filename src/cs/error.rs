//! Error type shared by every algorithm in the crate.

use thiserror::Error;

/// Errors raised while building, serializing or applying a prefix code.
#[derive(Debug, Error)]
pub enum Error {
    /// The caller supplied something outside an operation's contract.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The underlying byte channel failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A bit was requested after the byte source was exhausted.
    #[error("unexpected end of stream")]
    UnexpectedEndOfStream,

    /// Encode was asked for a symbol that has no leaf in the tree.
    #[error("symbol {0:#x} has no code word in this tree")]
    UnknownSymbol(usize),

    /// Decode was invoked on a tree without a root.
    #[error("cannot decode with an empty tree")]
    EmptyTree,

    /// A serialized tree shape does not describe a full binary tree.
    #[error("malformed tree shape: {0}")]
    MalformedShape(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
