//! Conversion between the fixed-width name field and usable names.
//!
//! Each record stores its name in 260 bytes (Windows' `MAX_PATH`):
//! UTF-8, padded out with zeros.

use std::borrow::Cow;

use crate::result::*;

/// Width of the on-disk name field
pub const NAME_LEN: usize = 260;

/// Decodes a zero-padded name field.
///
/// Only trailing zeros are stripped; anything before the last non-zero byte
/// is part of the name. An all-zero field is the empty name.
/// Invalid UTF-8 is replaced with U+FFFD rather than rejected,
/// so the caller should hang on to the raw field if it wants to write it back.
pub fn decode_name(raw: &[u8; NAME_LEN]) -> Cow<'_, str> {
    let end = raw.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    String::from_utf8_lossy(&raw[..end])
}

/// Encodes a name into a zero-padded name field.
pub fn encode_name(name: &str) -> PakResult<[u8; NAME_LEN]> {
    let bytes = name.as_bytes();
    if bytes.len() > NAME_LEN {
        return Err(PakError::NameTooLong {
            name: name.to_owned(),
            len: bytes.len(),
        });
    }
    let mut raw = [0u8; NAME_LEN];
    raw[..bytes.len()].copy_from_slice(bytes);
    Ok(raw)
}
