//! Parsing a PAK archive into its table of entries.

use std::io::{self, Read, Seek, SeekFrom};

use log::*;

use crate::arch::usize;
use crate::entry::Entry;
use crate::result::*;
use crate::spec::{self, Record, COUNT_SIZE, RECORD_SIZE};

/// Reads every entry (and its content) out of a PAK archive.
///
/// Records are read front to back; each one's content is read from wherever
/// its offset points, after which we hop back to the record table.
/// Content can sit in any order relative to the records.
///
/// Either the whole table comes back, or an error does.
pub fn read_entries<R: Read + Seek>(reader: &mut R) -> PakResult<Vec<Entry>> {
    let stream_len = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(0))?;

    let mut count_bytes = [0u8; COUNT_SIZE];
    read_or(reader, &mut count_bytes, || {
        PakError::CorruptHeader(format!(
            "{} bytes is too short for an entry count",
            stream_len
        ))
    })?;
    let count = spec::read_i32(&mut &count_bytes[..]);
    trace!("{} entries declared in a {} byte archive", count, stream_len);

    let count = usize(count)
        .ok_or_else(|| PakError::CorruptHeader(format!("Negative entry count ({})", count)))?;
    // Check up front so a garbage count can't make us allocate the moon.
    let header_size = spec::header_size(count);
    if header_size > stream_len {
        return Err(PakError::CorruptHeader(format!(
            "{} entries need {} bytes of records, but the archive is only {} bytes",
            count, header_size, stream_len
        )));
    }

    let mut entries = Vec::with_capacity(count);
    let mut record_bytes = [0u8; RECORD_SIZE];

    for i in 0..count {
        read_or(reader, &mut record_bytes, || {
            PakError::CorruptHeader(format!("Archive ended in record {}", i))
        })?;
        let record = Record::parse(&record_bytes);
        trace!("{:?}", record);

        let table_position = reader.stream_position()?;
        let content = read_content(reader, &record, stream_len)?;
        reader.seek(SeekFrom::Start(table_position))?;

        let entry = Entry::from_record(&record, content);
        debug!("{:?}", entry);
        entries.push(entry);
    }

    #[cfg(feature = "check-duplicate-names")]
    warn_on_duplicates(&entries);

    Ok(entries)
}

/// Reads the content a record points to.
fn read_content<R: Read + Seek>(
    reader: &mut R,
    record: &Record,
    stream_len: u64,
) -> PakResult<Vec<u8>> {
    let corrupt = || PakError::CorruptContent {
        name: crate::name::decode_name(&record.name).into_owned(),
        offset: record.offset,
        length: record.length,
    };

    let (offset, length) = match (usize(record.offset), usize(record.length)) {
        (Some(o), Some(l)) => (o as u64, l),
        _ => return Err(corrupt()),
    };
    if offset + length as u64 > stream_len {
        return Err(corrupt());
    }

    reader.seek(SeekFrom::Start(offset))?;
    let mut content = vec![0u8; length];
    read_or(reader, &mut content, corrupt)?;
    Ok(content)
}

/// Like `read_exact()`, but swaps running out of bytes for a format error.
fn read_or<R: Read, F: FnOnce() -> PakError>(
    reader: &mut R,
    buf: &mut [u8],
    on_eof: F,
) -> PakResult<()> {
    match reader.read_exact(buf) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(on_eof()),
        Err(e) => Err(PakError::Io(e)),
    }
}

/// Later entries with a name shadow earlier ones as far as anyone looking
/// things up by name is concerned; the game probably doesn't expect that.
#[cfg(feature = "check-duplicate-names")]
fn warn_on_duplicates(entries: &[Entry]) {
    let mut seen = std::collections::HashSet::new();
    for entry in entries {
        if !seen.insert(entry.name()) {
            warn!("Duplicate entry for {}", entry.name());
        }
    }
}
