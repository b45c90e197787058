use std::convert::TryFrom;

use crate::result::*;

/// A checked cast from a host size to the signed 32-bit fields PAK stores.
///
/// We could use the `cast` crate,
/// (https://docs.rs/cast/0.2.3/cast/)
/// but these are the only ones we really need.
pub fn i32<I: Into<u64>>(i: I) -> PakResult<i32> {
    let i: u64 = i.into();
    i32::try_from(i).map_err(|_| PakError::ArchiveTooLarge(i))
}

/// A cast from an on-disk `i32` to `usize`, or `None` if it's negative.
pub fn usize(i: i32) -> Option<usize> {
    usize::try_from(i).ok()
}
