//! Serializing a table of entries back into a PAK archive.
//!
//! PAK can't be updated in place: adding or removing a record shifts where
//! content starts, so every change rewrites the whole thing.

use std::io::Write;

use log::*;

use crate::arch;
use crate::entry::Entry;
use crate::result::*;
use crate::spec;

/// Lays content out back-to-back, in table order, right after the header.
///
/// Offsets only depend on the table's order and each entry's length,
/// never on where the content used to be.
/// Fails if the archive would outgrow 32-bit offsets.
pub fn recompute_offsets(entries: &mut [Entry]) -> PakResult<()> {
    let mut offset = spec::header_size(entries.len());
    for entry in entries.iter_mut() {
        entry.set_offset(arch::i32(offset)?);
        offset += entry.len() as u64;
    }
    // The last entry's end needs to be addressable too.
    arch::i32(offset)?;
    Ok(())
}

/// Writes the entry count, every record, then every entry's content.
///
/// Offsets are recomputed first, so `entries` reflects what was written.
/// Returns the number of bytes written.
pub fn write_entries<W: Write>(entries: &mut [Entry], w: &mut W) -> PakResult<u64> {
    recompute_offsets(entries)?;

    let count = arch::i32(entries.len() as u64)?;
    w.write_all(&count.to_le_bytes())?;

    for entry in entries.iter() {
        let record = entry.to_record(arch::i32(entry.len() as u64)?);
        trace!("{:?}", record);
        record.write_to(w)?;
    }

    let mut written = spec::header_size(entries.len());
    for entry in entries.iter() {
        debug!("Writing {:?}", entry);
        debug_assert_eq!(written, entry.offset() as u64);
        w.write_all(entry.content())?;
        written += entry.len() as u64;
    }

    w.flush()?;
    Ok(written)
}
