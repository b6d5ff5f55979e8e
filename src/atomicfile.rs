//! A simple thing to atomically write to a file.

use tempfile::TempDir;

use std::fs::{rename, File};
use std::io::{Error, ErrorKind, Result, Write};
use std::path::{Path, PathBuf};

/// A version of File that never leaves a partially-written file.
/// Nothing appears at the destination until `commit` is called, at
/// which point any existing file with the same name is replaced.
pub struct AtomicFile {
    path: PathBuf,
    dir: TempDir,
    file: File,
}

impl AtomicFile {
    /// Start writing a file.
    pub fn create<P: AsRef<Path>>(p: P) -> Result<AtomicFile> {
        let filepath = p.as_ref();
        let parent = match filepath.parent() {
            None => {
                return Err(Error::new(
                    ErrorKind::Other,
                    format!("Cannot create a file named {:?}", filepath),
                ));
            }
            Some(p) if p.as_os_str().is_empty() => Path::new("."),
            Some(p) => p,
        };
        let dir = TempDir::new_in(parent)?;
        let file = File::create(dir.path().join("temp"))?;
        Ok(AtomicFile {
            path: PathBuf::from(filepath),
            dir,
            file,
        })
    }

    /// Finish writing, and move the file into place.  If this is never
    /// called, the partial file is thrown away.
    pub fn commit(self) -> Result<()> {
        self.file.sync_data()?;
        rename(self.dir.path().join("temp"), &self.path)
    }
}

impl<'a> Write for &'a AtomicFile {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        (&self.file).write(buf)
    }
    fn flush(&mut self) -> Result<()> {
        (&self.file).flush()
    }
}

impl Write for AtomicFile {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.file.write(buf)
    }
    fn flush(&mut self) -> Result<()> {
        self.file.flush()
    }
}
