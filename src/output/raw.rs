use crate::output::OutputResult;
use std::fs;
use std::path::{Path, PathBuf};

/// Kind of raw payload, which decides the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawKind {
    Html,
    Pdf,
}

impl RawKind {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Pdf => "pdf",
        }
    }
}

/// Directory of raw fetched bodies named `<doc_id>.<ext>`
#[derive(Debug, Clone)]
pub struct RawStore {
    dir: PathBuf,
}

impl RawStore {
    /// Creates the directory if needed
    pub fn new(dir: &Path) -> OutputResult<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Writes one payload, replacing any earlier copy
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Where the payload was written
    /// * `Err(OutputError)` - The file could not be written
    pub fn save(&self, doc_id: &str, kind: RawKind, body: &[u8]) -> OutputResult<PathBuf> {
        let path = self.dir.join(format!("{}.{}", doc_id, kind.extension()));
        fs::write(&path, body)?;
        Ok(path)
    }
}
