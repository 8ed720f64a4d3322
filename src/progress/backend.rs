//! Where the progress document lives.
//!
//! A backend stores one opaque JSON document. The store never assumes a
//! particular medium; it only needs `load` and `save`.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::TutorError;

pub trait ProgressBackend {
    /// The stored document, or `None` when nothing has been saved yet.
    fn load(&mut self) -> Result<Option<Value>, TutorError>;

    fn save(&mut self, document: &Value) -> Result<(), TutorError>;
}

/// Keeps the document in memory. Handy for tests and for sessions that
/// should not persist.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    document: Option<Value>,
    saves: usize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a previously saved document.
    pub fn with_document(document: Value) -> Self {
        MemoryBackend {
            document: Some(document),
            saves: 0,
        }
    }

    pub fn document(&self) -> Option<&Value> {
        self.document.as_ref()
    }

    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl ProgressBackend for MemoryBackend {
    fn load(&mut self) -> Result<Option<Value>, TutorError> {
        Ok(self.document.clone())
    }

    fn save(&mut self, document: &Value) -> Result<(), TutorError> {
        self.document = Some(document.clone());
        self.saves += 1;
        Ok(())
    }
}

/// Pretty-printed JSON file. Saves go to a sibling temp file first and are
/// renamed into place, so a crash mid-write never leaves a torn document.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileBackend { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "progress.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_temp(&self, temp: &Path, document: &Value) -> io::Result<()> {
        let file = File::create(temp)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, document)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        writer.get_ref().sync_all()
    }
}

impl ProgressBackend for JsonFileBackend {
    fn load(&mut self) -> Result<Option<Value>, TutorError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(TutorError::persistence("reading progress file", err)),
        };
        if text.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| TutorError::persistence("parsing progress file", e))
    }

    fn save(&mut self, document: &Value) -> Result<(), TutorError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| TutorError::persistence("creating progress directory", e))?;
        }
        let temp = self.temp_path();
        if let Err(err) = self.write_temp(&temp, document) {
            let _ = fs::remove_file(&temp);
            return Err(TutorError::persistence("writing progress file", err));
        }
        fs::rename(&temp, &self.path).map_err(|e| TutorError::persistence("replacing progress file", e))
    }
}
