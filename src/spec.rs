//! Code specific to the PAK layout.
//!
//! We try to keep the nitty gritty here,
//! and higher-level stuff in the [`read`], [`write`], and [`archive`] modules.
//!
//! Nobody has published a description of the format. As far as anyone can tell,
//! a PAK is:
//!
//! ```text
//! offset 0   entry count             4 bytes (i32)
//! offset 4   N records               296 bytes each
//!              name                  260 bytes (UTF-8, zero-padded)
//!              content offset        4 bytes (i32)
//!              content length        4 bytes (i32)
//!              unknown               24 bytes
//!              unknown               4 bytes (i32)
//!            content                 wherever the records say
//! ```
//!
//! All integers are little-endian.
//!
//! [`read`]: ../read/index.html
//! [`write`]: ../write/index.html
//! [`archive`]: ../archive/index.html

use std::convert::TryInto;
use std::io::{self, Write};

use crate::name::NAME_LEN;

/// Size of the leading entry count
pub const COUNT_SIZE: usize = 4;

/// Size of each record in the table
pub const RECORD_SIZE: usize = NAME_LEN + 4 + 4 + OPAQUE_A_LEN + 4;

/// Size of the first unknown field
pub const OPAQUE_A_LEN: usize = 24;

/// Size of the header region (count plus records) for `count` entries.
/// Content starts right after.
pub fn header_size(count: usize) -> u64 {
    COUNT_SIZE as u64 + RECORD_SIZE as u64 * count as u64
}

// Straight from the Rust docs:

/// Reads a little-endian i32 from the front of the provided slice, shrinking it.
pub fn read_i32(input: &mut &[u8]) -> i32 {
    let (int_bytes, rest) = input.split_at(std::mem::size_of::<i32>());
    *input = rest;
    i32::from_le_bytes(int_bytes.try_into().expect("less than four bytes for i32"))
}

/// Splits a fixed-size array off the front of the provided slice, shrinking it.
fn read_array<const N: usize>(input: &mut &[u8]) -> [u8; N] {
    let (bytes, rest) = input.split_at(N);
    *input = rest;
    bytes.try_into().expect("slice shorter than array")
}

/// One entry's record in the table, as it sits on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub name: [u8; NAME_LEN],
    pub offset: i32,
    pub length: i32,
    pub opaque_a: [u8; OPAQUE_A_LEN],
    pub opaque_b: i32,
}

impl Record {
    /// Parses a record from exactly [`RECORD_SIZE`] bytes.
    pub fn parse(record: &[u8; RECORD_SIZE]) -> Self {
        let mut record: &[u8] = record;
        let name = read_array::<NAME_LEN>(&mut record);
        let offset = read_i32(&mut record);
        let length = read_i32(&mut record);
        let opaque_a = read_array::<OPAQUE_A_LEN>(&mut record);
        let opaque_b = read_i32(&mut record);
        debug_assert!(record.is_empty());

        Self {
            name,
            offset,
            length,
            opaque_a,
            opaque_b,
        }
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.name)?;
        w.write_all(&self.offset.to_le_bytes())?;
        w.write_all(&self.length.to_le_bytes())?;
        w.write_all(&self.opaque_a)?;
        w.write_all(&self.opaque_b.to_le_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_layout() {
        assert_eq!(RECORD_SIZE, 296);
        assert_eq!(header_size(0), 4);
        assert_eq!(header_size(2), 596);
    }

    #[test]
    fn record_fields_land_where_expected() {
        let mut name = [0u8; NAME_LEN];
        name[..5].copy_from_slice(b"a.txt");
        let record = Record {
            name,
            offset: 596,
            length: -2,
            opaque_a: *b"ABCDEFGHIJKLMNOPQRSTUVWX",
            opaque_b: 42,
        };

        let mut bytes = Vec::new();
        record.write_to(&mut bytes).unwrap();
        assert_eq!(bytes.len(), RECORD_SIZE);
        assert_eq!(&bytes[..5], b"a.txt");
        assert_eq!(bytes[260..264], 596i32.to_le_bytes());
        assert_eq!(bytes[264..268], (-2i32).to_le_bytes());
        assert_eq!(&bytes[268..292], b"ABCDEFGHIJKLMNOPQRSTUVWX");
        assert_eq!(bytes[292..296], 42i32.to_le_bytes());

        let raw: [u8; RECORD_SIZE] = bytes.try_into().unwrap();
        assert_eq!(Record::parse(&raw), record);
    }
}
