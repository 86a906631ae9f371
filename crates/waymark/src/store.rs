//! Flowchart persistence.
//!
//! A [`FlowchartStore`] persists and retrieves [`FlowchartDocument`]s
//! verbatim. Saving never touches the working flowchart, so a failed save
//! leaves the in-memory graph exactly as it was.

use std::{
    collections::HashMap,
    fs, io,
    io::Write,
    path::{Path, PathBuf},
};

use log::debug;
use tempfile::NamedTempFile;
use thiserror::Error;

use waymark_core::flowchart::FlowchartDocument;

/// Errors raised while loading or saving flowchart documents.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid flowchart name `{0}`")]
    InvalidName(String),

    #[error("failed to access `{path}`: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("malformed flowchart document `{path}`: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Loads and saves flowchart documents by name.
pub trait FlowchartStore {
    /// Returns the stored document, or `None` if no flowchart has that name yet.
    fn load(&self, name: &str) -> Result<Option<FlowchartDocument>, Error>;

    /// Persists the document under its own name, replacing any previous version.
    fn save(&mut self, document: &FlowchartDocument) -> Result<(), Error>;
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: HashMap<String, FlowchartDocument>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FlowchartStore for MemoryStore {
    fn load(&self, name: &str) -> Result<Option<FlowchartDocument>, Error> {
        Ok(self.documents.get(name).cloned())
    }

    fn save(&mut self, document: &FlowchartDocument) -> Result<(), Error> {
        self.documents
            .insert(document.name.clone(), document.clone());
        Ok(())
    }
}

/// Stores each flowchart as `<dir>/<name>.json`.
///
/// Documents are written to a temporary file in the same directory and then
/// moved into place, so readers never observe a half-written document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file backing the flowchart `name`.
    ///
    /// # Errors
    ///
    /// Rejects names that are empty, hidden, or would escape the store directory.
    pub fn document_path(&self, name: &str) -> Result<PathBuf, Error> {
        let valid = !name.is_empty()
            && !name.starts_with('.')
            && !name.contains(['/', '\\'])
            && !name.contains("..");
        if !valid {
            return Err(Error::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(format!("{name}.json")))
    }

    fn io_error(path: &Path) -> impl FnOnce(io::Error) -> Error + '_ {
        move |source| Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl FlowchartStore for JsonFileStore {
    fn load(&self, name: &str) -> Result<Option<FlowchartDocument>, Error> {
        let path = self.document_path(name)?;

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = path.display().to_string(); "No stored flowchart");
                return Ok(None);
            }
            Err(source) => return Err(Error::Io { path, source }),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| Error::Json { path, source })
    }

    fn save(&mut self, document: &FlowchartDocument) -> Result<(), Error> {
        let path = self.document_path(&document.name)?;
        fs::create_dir_all(&self.dir).map_err(Self::io_error(&self.dir))?;

        let json = serde_json::to_string_pretty(document).map_err(|source| Error::Json {
            path: path.clone(),
            source,
        })?;

        let mut temp_file = NamedTempFile::new_in(&self.dir).map_err(Self::io_error(&self.dir))?;
        temp_file
            .write_all(json.as_bytes())
            .map_err(Self::io_error(&path))?;
        temp_file
            .persist(&path)
            .map_err(|err| Error::Io {
                path: path.clone(),
                source: err.error,
            })?;

        debug!(path = path.display().to_string(); "Flowchart saved");
        Ok(())
    }
}
