//! Error types for tst-rs.
//!
//! Map operations never fail; only decoding a serialized path or tree can.

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Decoding errors for node paths and tree snapshots.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A path needs at least one data byte and the end byte.
    #[error("path encoding truncated: {len} bytes, need at least 2")]
    TruncatedPath { len: usize },

    /// The final byte of a path must be the end marker (0x00).
    #[error("path encoding is missing its end marker")]
    MissingEndMarker,

    /// A data byte has an empty move below an occupied one, or a lower byte is not full.
    #[error("malformed path byte {byte:#04x} at index {index}")]
    MalformedPath { index: usize, byte: u8 },

    /// A serialized tree must contain at least the root node.
    #[error("snapshot contains no root node")]
    EmptySnapshot,

    /// A child link points past the end of the node list.
    #[error("snapshot node {node} links to missing node {link}")]
    DanglingLink { node: usize, link: u32 },

    /// A node is the child of more than one link, or the root is somebody's child.
    #[error("snapshot node {node} has more than one parent")]
    SharedNode { node: usize },

    /// Some nodes cannot be reached from the root.
    #[error("snapshot has {count} nodes unreachable from the root")]
    UnreachableNodes { count: usize },
}
