//! Error types and the related `Result<T>`

use thiserror::Error;

pub type PakResult<T> = Result<T, PakError>;

#[derive(Debug, Error)]
pub enum PakError {
    /// An error from underlying I/O
    #[error("I/O Error")]
    Io(#[from] std::io::Error),

    /// The entry count or record table couldn't be read:
    /// the stream is too short, or the count is negative or absurd.
    #[error("Corrupt PAK header: {0}")]
    CorruptHeader(String),

    /// A record's offset and length point outside the archive.
    #[error("Corrupt content for {name}: {length} bytes at offset {offset} run past the end of the archive")]
    CorruptContent {
        name: String,
        offset: i32,
        length: i32,
    },

    /// A name doesn't fit in the fixed-width name field.
    /// (We refuse rather than chop off the end.)
    #[error("Name {name} is {len} bytes long; PAK names hold at most 260")]
    NameTooLong { name: String, len: usize },

    /// A user-provided path (not one from a PAK archive) was invalid.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// No entry at the given index of the table
    #[error("No entry at index {0}")]
    NoSuchEntry(usize),

    /// Offsets and lengths are signed 32-bit on disk,
    /// so archives can't grow past 2 GiB.
    #[error("Archive would be {0} bytes, too large for 32-bit offsets")]
    ArchiveTooLarge(u64),
}
