use std::path::PathBuf;

use anyhow::*;
use camino::{Utf8Path, Utf8PathBuf};
use log::*;
use structopt::*;

use florpak::*;

#[derive(Debug, StructOpt)]
#[structopt(name = "pakedit", about = "Lists, extracts, and edits PAK archives")]
struct Opt {
    /// Pass multiple times for additional verbosity (info, debug, trace)
    #[structopt(short, long, parse(from_occurrences))]
    verbosity: usize,

    /// Change to the given directory before performing any operations.
    #[structopt(short = "C", long)]
    directory: Option<PathBuf>,

    #[structopt(name("PAK file"))]
    pak_path: Utf8PathBuf,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Prints each entry's name, offset, and length.
    List,
    /// Saves entries (all of them if none are named) into a directory.
    Extract {
        #[structopt(short, long, default_value = ".")]
        output: Utf8PathBuf,
        names: Vec<String>,
    },
    /// Adds files, replacing entries with the same name, then rewrites the archive.
    Add {
        #[structopt(required = true)]
        files: Vec<Utf8PathBuf>,
    },
    /// Removes the named entries from the archive.
    Delete {
        #[structopt(required = true)]
        names: Vec<String>,
    },
    /// Creates a new, empty archive.
    Create,
}

fn main() -> Result<()> {
    let args = Opt::from_args();

    let mut errlog = stderrlog::new();
    errlog.verbosity(args.verbosity + 1);
    errlog.init()?;

    if let Some(chto) = args.directory {
        std::env::set_current_dir(&chto)
            .with_context(|| format!("Couldn't set working directory to {}", chto.display()))?;
    }

    let pak_path = args.pak_path;
    match args.command {
        Command::Create => {
            PakArchive::create(&pak_path)
                .with_context(|| format!("Couldn't create {}", pak_path))?;
            Ok(())
        }
        Command::List => list(&open(&pak_path)?),
        Command::Extract { output, names } => extract(&open(&pak_path)?, &output, &names),
        Command::Add { files } => add(&mut open(&pak_path)?, &files),
        Command::Delete { names } => delete(&mut open(&pak_path)?, &names),
    }
}

fn open(pak_path: &Utf8Path) -> Result<PakArchive> {
    PakArchive::open(pak_path).with_context(|| format!("Couldn't open {}", pak_path))
}

fn add(archive: &mut PakArchive, files: &[Utf8PathBuf]) -> Result<()> {
    for file in files {
        archive
            .add_file(file)
            .with_context(|| format!("Couldn't add {}", file))?;
    }
    archive.rewrite().context("Couldn't rewrite archive")
}

fn delete(archive: &mut PakArchive, names: &[String]) -> Result<()> {
    for name in names {
        let index = archive
            .position(name)
            .ok_or_else(|| anyhow!("No entry named {}", name))?;
        archive
            .delete_entry(index)
            .with_context(|| format!("Couldn't delete {}", name))?;
    }
    Ok(())
}

fn list(archive: &PakArchive) -> Result<()> {
    for row in archive.list_entries() {
        println!("{:>10} {:>10}  {}", row.offset, row.length, row.name);
    }
    Ok(())
}

fn extract(archive: &PakArchive, output: &Utf8Path, names: &[String]) -> Result<()> {
    if names.is_empty() {
        let written = archive.extract_all(output)?;
        info!("Extracted {} entries to {}", written.len(), output);
        return Ok(());
    }

    std::fs::create_dir_all(output)
        .with_context(|| format!("Couldn't create directory {}", output))?;
    for name in names {
        let entry = archive
            .lookup(name)
            .ok_or_else(|| anyhow!("No entry named {}", name))?;
        let path = entry.save_to(output)?;
        info!("Extracted {}", path);
    }
    Ok(())
}
