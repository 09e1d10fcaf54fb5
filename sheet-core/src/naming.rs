use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Sequential output names: `<base><NNN><ext>`, counting from 001.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputNaming {
    pub base: String,
    pub ext: String,
}

impl Default for OutputNaming {
    fn default() -> Self {
        Self {
            base: "etiquetas".to_string(),
            ext: ".pdf".to_string(),
        }
    }
}

impl OutputNaming {
    pub fn new(base: impl Into<String>, ext: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            ext: ext.into(),
        }
    }

    pub fn file_name(&self, n: u32) -> String {
        format!("{}{:03}{}", self.base, n, self.ext)
    }

    /// First name in `dir` that does not exist yet, scanning up from 1.
    pub fn next_free(&self, dir: &Path) -> PathBuf {
        let mut n = 1;
        loop {
            let candidate = dir.join(self.file_name(n));
            if !candidate.exists() {
                return candidate;
            }
            n += 1;
        }
    }

    /// Like [`next_free`](Self::next_free) but also creates the file with
    /// create-new semantics, so a name taken in between is skipped instead of
    /// overwritten.
    pub fn allocate(&self, dir: &Path) -> io::Result<(PathBuf, File)> {
        let mut n = 1;
        loop {
            let candidate = dir.join(self.file_name(n));
            match OpenOptions::new().write(true).create_new(true).open(&candidate) {
                Ok(file) => return Ok((candidate, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => n += 1,
                Err(e) => return Err(e),
            }
        }
    }
}
