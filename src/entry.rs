//! A single member of a PAK archive

use std::borrow::Cow;
use std::fmt;
use std::fs;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use log::*;

use crate::name::{self, NAME_LEN};
use crate::result::*;
use crate::spec::{Record, OPAQUE_A_LEN};

/// What we put in the first unknown field of entries we create.
///
/// Nobody knows what the game keeps here, and it doesn't seem to care,
/// so this is the same filler other PAK editors write.
pub const DEFAULT_OPAQUE_A: [u8; OPAQUE_A_LEN] = *b"ABCDEFGHIJKLMNOPQRSTUVWX";

/// What we put in the second unknown field of entries we create.
pub const DEFAULT_OPAQUE_B: i32 = 42;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "tga"];

/// A file stored in the archive: its metadata and its contents.
///
/// Entries are only changed through their [`PakArchive`];
/// everyone else gets a read-only view.
///
/// [`PakArchive`]: ../archive/struct.PakArchive.html
#[derive(Clone, PartialEq, Eq)]
pub struct Entry {
    name: String,
    raw_name: [u8; NAME_LEN],
    /// Only meaningful after the archive was loaded or rewritten
    offset: i32,
    opaque_a: [u8; OPAQUE_A_LEN],
    opaque_b: i32,
    content: Vec<u8>,
}

impl Entry {
    /// Builds a new entry with placeholder metadata.
    pub(crate) fn new(name: &str, content: Vec<u8>) -> PakResult<Self> {
        let raw_name = name::encode_name(name)?;
        Ok(Self {
            name: name.to_owned(),
            raw_name,
            offset: 0,
            opaque_a: DEFAULT_OPAQUE_A,
            opaque_b: DEFAULT_OPAQUE_B,
            content,
        })
    }

    /// Builds an entry from a record read from disk, and the content it points to.
    pub(crate) fn from_record(record: &Record, content: Vec<u8>) -> Self {
        let name = name::decode_name(&record.name);
        if let Cow::Owned(_) = name {
            warn!("Name {:?} isn't valid UTF-8", name);
        }
        Self {
            name: name.into_owned(),
            raw_name: record.name,
            offset: record.offset,
            opaque_a: record.opaque_a,
            opaque_b: record.opaque_b,
            content,
        }
    }

    /// The record to write out for this entry.
    ///
    /// `length` is taken as given, since the caller already checked it fits.
    pub(crate) fn to_record(&self, length: i32) -> Record {
        Record {
            name: self.raw_name,
            offset: self.offset,
            length,
            opaque_a: self.opaque_a,
            opaque_b: self.opaque_b,
        }
    }

    pub(crate) fn set_offset(&mut self, offset: i32) {
        self.offset = offset;
    }

    /// The entry's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name exactly as stored in the record
    pub fn raw_name(&self) -> &[u8; NAME_LEN] {
        &self.raw_name
    }

    /// Where the content starts in the archive.
    ///
    /// New entries read 0 here until the archive is rewritten.
    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Length of the content in bytes
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn opaque_a(&self) -> &[u8; OPAQUE_A_LEN] {
        &self.opaque_a
    }

    pub fn opaque_b(&self) -> i32 {
        self.opaque_b
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Returns true if a previewer should treat this as an image
    pub fn is_image(&self) -> bool {
        self.extension()
            .map(|ext| IMAGE_EXTENSIONS.iter().any(|i| ext.eq_ignore_ascii_case(i)))
            .unwrap_or(false)
    }

    /// Returns true if this is a Targa image, which most image decoders
    /// need special handling for.
    pub fn is_tga(&self) -> bool {
        self.extension()
            .map(|ext| ext.eq_ignore_ascii_case("tga"))
            .unwrap_or(false)
    }

    /// The content as text, for previews.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }

    fn extension(&self) -> Option<&str> {
        Utf8Path::new(&self.name).extension()
    }

    /// Saves the content to `<dir>/<name>`, replacing any file already there.
    /// Returns the path written.
    ///
    /// Names that would land anywhere but directly inside `dir`
    /// (`..`, absolute paths, subdirectories, or the empty name) are refused.
    pub fn save_to<P: AsRef<Utf8Path>>(&self, dir: P) -> PakResult<Utf8PathBuf> {
        let name = Utf8Path::new(&self.name);
        let mut components = name.components();
        match (components.next(), components.next()) {
            (Some(Utf8Component::Normal(_)), None) => {}
            _ => {
                return Err(PakError::InvalidPath(format!(
                    "Entry name {:?} isn't a plain file name",
                    self.name
                )))
            }
        }

        let path = dir.as_ref().join(name);
        debug!("Saving {} ({} bytes) to {}", self.name, self.len(), path);
        fs::write(&path, &self.content)?;
        Ok(path)
    }
}

// Don't dump the whole content into logs.
impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("name", &self.name)
            .field("offset", &self.offset)
            .field("length", &self.content.len())
            .field("opaque_a", &self.opaque_a)
            .field("opaque_b", &self.opaque_b)
            .finish()
    }
}
