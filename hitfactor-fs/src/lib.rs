//! Capability-scoped artifact directories built on `cap-std` and `camino`.
//!
//! Every artifact the pipeline produces (meta files, batch files, reference
//! downloads, analytics) is written through an [`ArtifactDir`]. Writes land in
//! a temporary sibling first and are renamed into place, so a file that exists
//! is always complete. Resumable fetches depend on that.
#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use std::io;

/// Directory handle scoped to one artifact tree.
#[derive(Debug)]
pub struct ArtifactDir {
    root: Utf8PathBuf,
    dir: fs_utf8::Dir,
}

impl ArtifactDir {
    /// Create `path` (and any missing parents) and open it.
    pub fn create(path: &Utf8Path) -> io::Result<Self> {
        fs_utf8::Dir::create_ambient_dir_all(path, ambient_authority())?;
        Self::open(path)
    }

    /// Open an existing directory.
    pub fn open(path: &Utf8Path) -> io::Result<Self> {
        let dir = fs_utf8::Dir::open_ambient_dir(path, ambient_authority())?;
        Ok(Self {
            root: path.to_path_buf(),
            dir,
        })
    }

    /// Path the directory was opened from.
    pub fn path(&self) -> &Utf8Path {
        &self.root
    }

    /// Create `name` below this directory and open it.
    pub fn subdir(&self, name: &str) -> io::Result<Self> {
        self.dir.create_dir_all(name)?;
        Ok(Self {
            root: self.root.join(name),
            dir: self.dir.open_dir(name)?,
        })
    }

    /// Whether `name` exists and is a regular file.
    pub fn contains_file(&self, name: &str) -> bool {
        self.dir
            .metadata(name)
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    }

    /// Replace `name` with `contents` via a temporary file and rename.
    pub fn write_atomic(&self, name: &str, contents: impl AsRef<[u8]>) -> io::Result<()> {
        let staging = format!(".{name}.partial");
        self.dir.write(&staging, contents)?;
        self.dir.rename(&staging, &self.dir, name)
    }

    /// Read `name` into memory.
    pub fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        self.dir.read(name)
    }

    /// Regular files in the directory, sorted by name.
    ///
    /// Staging files left behind by an interrupted write are skipped.
    pub fn file_names(&self) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in self.dir.entries()? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name()?;
            if name.starts_with('.') && name.ends_with(".partial") {
                continue;
            }
            names.push(name);
        }
        names.sort();
        Ok(names)
    }
}

/// Read a file addressed by an ambient path.
pub fn read_ambient(path: &Utf8Path) -> io::Result<Vec<u8>> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("path should include a file name"))?;
    fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?.read(file_name)
}
