//! florpak reads and edits PAK archives, the flat containers
//! Florensia keeps its data files in:
//!
//! ```no_run
//! # use florpak::*;
//! let mut archive = PakArchive::open("data.pak")?;
//!
//! // Peek at what's inside...
//! for entry in archive.entries() {
//!     println!("{} ({} bytes)", entry.name(), entry.len());
//! }
//! let quests = archive.lookup("quest.xml").expect("no quests?");
//! println!("{}", quests.text());
//!
//! // ...swap a file in (replacing any entry with the same name)...
//! archive.add_file("mods/quest.xml")?;
//! // ...and write the archive back out.
//! archive.rewrite()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! A PAK is a count, a table of fixed-size records (name, offset, length,
//! and two fields nobody has figured out), then the files themselves.
//! There's no compression and no index beyond the table,
//! so adding or removing anything means rewriting the whole archive.
//! [`PakArchive::rewrite()`] does so into a temporary file and renames it
//! over the original, so a crash partway through leaves the old archive intact.
//!
//! The whole archive is read into memory on open.
//! PAKs top out at 2 GiB (offsets are signed 32-bit), so this is fine.
//!
//! [`PakArchive::rewrite()`]: archive/struct.PakArchive.html#method.rewrite

pub mod archive;
pub mod entry;
pub mod name;
pub mod read;
pub mod result;
pub mod write;

pub use archive::{EntryListing, PakArchive};
pub use entry::Entry;
pub use result::{PakError, PakResult};

mod arch;
mod spec;

pub use spec::{header_size, COUNT_SIZE, OPAQUE_A_LEN, RECORD_SIZE};
