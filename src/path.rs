//! Bit-packed root-to-node paths.
//!
//! A path addresses a node by the moves taken from a root, so it survives
//! anything that rebuilds the tree with the same shape (serialization,
//! cloning) without holding a reference into it.
//!
//! ## Layout
//!
//! Each move is two bits: `Low = 01`, `Equal = 11`, `High = 10`, `End = 00`.
//! Four moves fit in a byte. The first move from the root occupies the two
//! lowest bits of byte 0, later moves fill successively higher pairs and
//! bytes, and the buffer always finishes with one `0x00` end byte:
//!
//! ```text
//! moves:  H E E E E            (root -> 'h' -> 'e' -> 'l' -> 'l' -> 'o')
//! byte 0: 11 11 11 10          (read right to left)
//! byte 1: 00 00 00 11
//! byte 2: 00 00 00 00          end
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::node::Branch;

const END: u8 = 0b00;
const LOW: u8 = 0b01;
const HIGH: u8 = 0b10;
const EQUAL: u8 = 0b11;

const MOVES_PER_BYTE: usize = 4;
const TOP_PAIR: u8 = 0b1100_0000;

#[inline]
fn encode(branch: Branch) -> u8 {
    match branch {
        Branch::Low => LOW,
        Branch::Equal => EQUAL,
        Branch::High => HIGH,
    }
}

#[inline]
fn decode(bits: u8) -> Option<Branch> {
    match bits & 0b11 {
        LOW => Some(Branch::Low),
        EQUAL => Some(Branch::Equal),
        HIGH => Some(Branch::High),
        _ => None,
    }
}

/// Number of occupied move slots in a data byte (moves are packed low to high).
#[inline]
fn occupied_pairs(byte: u8) -> usize {
    MOVES_PER_BYTE - byte.leading_zeros() as usize / 2
}

/// Compact locator for a node: the moves from a root down to it.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct NodePath {
    bytes: SmallVec<[u8; 8]>,
}

impl NodePath {
    /// The empty path, addressing the root itself.
    pub fn new() -> Self {
        let mut bytes = SmallVec::new();
        bytes.push(END);
        bytes.push(END);
        Self { bytes }
    }

    /// Prepend a move: the new move becomes the first one taken from the root.
    ///
    /// This is the natural order when walking parent links upward.
    pub fn push_front(&mut self, branch: Branch) {
        if self.bytes[0] & TOP_PAIR != 0 {
            self.rollover();
        }
        self.bytes[0] = (self.bytes[0] << 2) | encode(branch);
    }

    /// Carry the top pair of every byte into the next one up, opening a fresh
    /// end byte when the current end byte receives a move.
    fn rollover(&mut self) {
        let last = self.bytes.len() - 1;
        for i in (1..=last).rev() {
            let carry = self.bytes[i - 1] >> 6;
            self.bytes[i] = (self.bytes[i] << 2) | carry;
        }
        if self.bytes[last] != END {
            self.bytes.push(END);
        }
    }

    /// Number of moves.
    pub fn len(&self) -> usize {
        let data = self.data();
        match data.split_last() {
            Some((&top, full)) => full.len() * MOVES_PER_BYTE + occupied_pairs(top),
            None => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Moves in root-to-node order.
    pub fn moves(&self) -> Moves<'_> {
        Moves {
            data: self.data(),
            byte: 0,
            shift: 0,
        }
    }

    /// The encoded form, end byte included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decode and validate an encoded path.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 2 {
            return Err(Error::TruncatedPath { len: bytes.len() });
        }
        let (&end, data) = bytes.split_last().ok_or(Error::TruncatedPath { len: 0 })?;
        if end != END {
            return Err(Error::MissingEndMarker);
        }

        let top = data.len() - 1;
        for (index, &byte) in data.iter().enumerate() {
            let pairs = occupied_pairs(byte);
            let dense = (0..pairs).all(|p| (byte >> (2 * p)) & 0b11 != END);
            let full_enough = index == top || pairs == MOVES_PER_BYTE;
            let nonempty = index == 0 || byte != END;
            if !(dense && full_enough && nonempty) {
                return Err(Error::MalformedPath { index, byte });
            }
        }

        Ok(Self {
            bytes: SmallVec::from_slice(bytes),
        })
    }

    #[inline]
    fn data(&self) -> &[u8] {
        &self.bytes[..self.bytes.len() - 1]
    }
}

impl Default for NodePath {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a path from moves given in root-to-node order.
impl FromIterator<Branch> for NodePath {
    fn from_iter<I: IntoIterator<Item = Branch>>(iter: I) -> Self {
        let moves: SmallVec<[Branch; 32]> = iter.into_iter().collect();
        let mut path = NodePath::new();
        for &branch in moves.iter().rev() {
            path.push_front(branch);
        }
        path
    }
}

impl TryFrom<Vec<u8>> for NodePath {
    type Error = Error;

    fn try_from(bytes: Vec<u8>) -> Result<Self> {
        Self::from_bytes(&bytes)
    }
}

impl From<NodePath> for Vec<u8> {
    fn from(path: NodePath) -> Self {
        path.bytes.into_vec()
    }
}

impl fmt::Debug for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NodePath(")?;
        for branch in self.moves() {
            f.write_str(match branch {
                Branch::Low => "L",
                Branch::Equal => "E",
                Branch::High => "H",
            })?;
        }
        f.write_str(")")
    }
}

/// Iterator over the moves of a [`NodePath`], root first.
pub struct Moves<'a> {
    data: &'a [u8],
    byte: usize,
    shift: u8,
}

impl Iterator for Moves<'_> {
    type Item = Branch;

    fn next(&mut self) -> Option<Branch> {
        while self.byte < self.data.len() {
            let bits = self.data[self.byte] >> self.shift;
            if self.shift == 6 {
                self.shift = 0;
                self.byte += 1;
            } else {
                self.shift += 2;
            }
            // Unused pairs only ever sit above the last move.
            if let Some(branch) = decode(bits) {
                return Some(branch);
            }
        }
        None
    }
}
