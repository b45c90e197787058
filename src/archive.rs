//! A PAK archive on disk and its table of entries.
//!
//! To start, [`open`] an existing archive (or [`create`] a new one).
//! Changes are made to the table in memory and written out with [`rewrite`].
//!
//! [`open`]: struct.PakArchive.html#method.open
//! [`create`]: struct.PakArchive.html#method.create
//! [`rewrite`]: struct.PakArchive.html#method.rewrite

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};

use camino::{Utf8Path, Utf8PathBuf};
use log::*;
use tempfile::NamedTempFile;

use crate::entry::Entry;
use crate::read::read_entries;
use crate::result::*;
use crate::write::write_entries;

/// One row of an archive listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryListing<'a> {
    pub name: &'a str,
    pub offset: i32,
    pub length: usize,
}

/// A PAK archive: an ordered table of entries, backed by a file.
///
/// The whole archive is read into memory when it's opened,
/// so no file handles are held between calls.
/// Table order is the order records and content are written in.
#[derive(Debug)]
pub struct PakArchive {
    path: Utf8PathBuf,
    entries: Vec<Entry>,
}

impl PakArchive {
    /// Reads the PAK archive at `path`.
    ///
    /// ```no_run
    /// # use florpak::*;
    /// let archive = PakArchive::open("data.pak")?;
    /// for row in archive.list_entries() {
    ///     println!("{} @ {} ({} bytes)", row.name, row.offset, row.length);
    /// }
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open<P: AsRef<Utf8Path>>(path: P) -> PakResult<Self> {
        let path = path.as_ref();
        info!("Opening {}", path);
        let mut reader = BufReader::new(File::open(path)?);
        let entries = read_entries(&mut reader)?;
        info!("{} entries in {}", entries.len(), path);
        Ok(Self {
            path: path.to_owned(),
            entries,
        })
    }

    /// Creates an empty PAK archive at `path`, replacing anything there.
    pub fn create<P: AsRef<Utf8Path>>(path: P) -> PakResult<Self> {
        let mut archive = Self {
            path: path.as_ref().to_owned(),
            entries: Vec::new(),
        };
        archive.rewrite()?;
        Ok(archive)
    }

    /// The file backing this archive
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// All entries, in table order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Name, offset, and length of each entry, in table order.
    pub fn list_entries(&self) -> impl Iterator<Item = EntryListing<'_>> {
        self.entries.iter().map(|e| EntryListing {
            name: e.name(),
            offset: e.offset(),
            length: e.len(),
        })
    }

    /// Returns the entry at `index` in the table.
    pub fn entry(&self, index: usize) -> PakResult<&Entry> {
        self.entries.get(index).ok_or(PakError::NoSuchEntry(index))
    }

    /// Looks up an entry by name.
    ///
    /// If an archive from elsewhere has duplicate names, the last one wins.
    pub fn lookup(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().rev().find(|e| e.name() == name)
    }

    /// Index of the entry with the given name (last one wins, as above).
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().rposition(|e| e.name() == name)
    }

    /// Adds `content` to the table under the last component of `path`.
    ///
    /// Any entries already using that name are removed, and the new one goes
    /// at the end of the table. Nothing is written until [`rewrite()`].
    ///
    /// [`rewrite()`]: #method.rewrite
    pub fn add<P: AsRef<Utf8Path>>(&mut self, path: P, content: Vec<u8>) -> PakResult<()> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .ok_or_else(|| PakError::InvalidPath(format!("{} has no file name", path)))?;
        let entry = Entry::new(name, content)?;

        let before = self.entries.len();
        self.entries.retain(|e| e.name() != name);
        let replaced = before - self.entries.len();
        if replaced > 0 {
            debug!("Replacing {} entries named {}", replaced, name);
        }

        debug!("Adding {:?}", entry);
        self.entries.push(entry);
        Ok(())
    }

    /// Reads the file at `path` and [`add()`]s it.
    ///
    /// [`add()`]: #method.add
    pub fn add_file<P: AsRef<Utf8Path>>(&mut self, path: P) -> PakResult<()> {
        let path = path.as_ref();
        let content = fs::read(path)?;
        self.add(path, content)
    }

    /// Removes the entry at `index` and immediately rewrites the archive.
    ///
    /// Returns the removed entry.
    pub fn delete_entry(&mut self, index: usize) -> PakResult<Entry> {
        if index >= self.entries.len() {
            return Err(PakError::NoSuchEntry(index));
        }
        let removed = self.entries.remove(index);
        debug!("Deleted {:?}", removed);
        self.rewrite()?;
        Ok(removed)
    }

    /// Writes the whole table out to the backing file.
    ///
    /// The new archive is written to a temporary file next to the old one,
    /// which then replaces it in a single rename.
    /// If the archive's path is a symlink, the file it points to is replaced,
    /// and the replacement keeps the old file's permissions.
    /// If anything fails, the file on disk is left as it was
    /// (but entry offsets in memory may already be updated;
    /// reopen the archive before carrying on).
    pub fn rewrite(&mut self) -> PakResult<()> {
        let target = self.backing_file()?;
        let dir = match target.parent() {
            Some(p) if !p.as_str().is_empty() => p,
            _ => Utf8Path::new("."),
        };
        let mut temp = NamedTempFile::new_in(dir)?;
        trace!("Writing {} to temp file {:?}", target, temp.path());

        // Temp files are created 0600; keep whatever the archive had.
        match fs::metadata(&target) {
            Ok(metadata) => temp.as_file().set_permissions(metadata.permissions())?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let written = write_entries(
            &mut self.entries,
            &mut BufWriter::new(temp.as_file_mut()),
        )?;
        temp.as_file().sync_all()?;

        temp.persist(&target).map_err(|e| PakError::Io(e.error))?;
        sync_dir(dir)?;
        info!(
            "Rewrote {} ({} entries, {} bytes)",
            target,
            self.entries.len(),
            written
        );
        Ok(())
    }

    /// The file a rewrite should replace: `path` with any symlinks resolved,
    /// or `path` itself if nothing exists there yet.
    fn backing_file(&self) -> PakResult<Utf8PathBuf> {
        match fs::canonicalize(&self.path) {
            Ok(resolved) => Utf8PathBuf::from_path_buf(resolved).map_err(|p| {
                PakError::InvalidPath(format!(
                    "{} resolves to non-UTF-8 {}",
                    self.path,
                    p.display()
                ))
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(self.path.clone()),
            Err(e) => Err(e.into()),
        }
    }

    /// Saves every entry into `dir` (see [`Entry::save_to()`]).
    ///
    /// Returns the paths written, in table order.
    ///
    /// [`Entry::save_to()`]: ../entry/struct.Entry.html#method.save_to
    pub fn extract_all<P: AsRef<Utf8Path>>(&self, dir: P) -> PakResult<Vec<Utf8PathBuf>> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        self.entries.iter().map(|e| e.save_to(dir)).collect()
    }

    /// Closes the archive, throwing away any changes that weren't rewritten.
    pub fn close(self) {
        debug!("Closing {}", self.path);
    }
}

/// Flushes a rename in `dir` to disk.
#[cfg(unix)]
fn sync_dir(dir: &Utf8Path) -> io::Result<()> {
    File::open(dir)?.sync_all()
}

// Windows can't open directories as files; NTFS journals renames anyway.
#[cfg(not(unix))]
fn sync_dir(_dir: &Utf8Path) -> io::Result<()> {
    Ok(())
}
