//! File transport: one file per level per day.
//!
//! Layout is `<directory>/<level>/<prefix>_<YYYY-MM-DD>.<ext>`. `json` files hold a single
//! array that is rewritten on every record, so concurrent writers are last-writer-wins.

use super::{Record, Transport, TransportError};
use crate::config::{FileTransportConfig, FileType, Project, TransportKind};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// One element of a `json` log file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub prefix: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct FileTransport {
    config: FileTransportConfig,
    project: Project,
}

impl FileTransport {
    #[must_use]
    pub const fn new(config: FileTransportConfig, project: Project) -> Self {
        Self { config, project }
    }

    /// Full path the record will be written to.
    #[must_use]
    pub fn path_for(&self, record: &Record) -> PathBuf {
        let filename = format!(
            "{}_{}.{}",
            self.config.prefix,
            record.timestamp.format("%Y-%m-%d"),
            self.config.file_type.extension()
        );
        self.config
            .directory
            .join(record.level.as_str())
            .join(filename)
    }

    fn entry(&self, record: &Record) -> FileEntry {
        FileEntry {
            prefix: format!(
                "{} | [{} - {}]",
                record.timestamp.format("%H:%M:%S"),
                self.project.name,
                record.level.label()
            ),
            message: record.text(),
        }
    }

    fn append_json(path: &Path, entry: FileEntry) -> Result<(), TransportError> {
        let mut entries: Vec<FileEntry> = match fs::read_to_string(path) {
            Ok(content) if !content.trim().is_empty() => serde_json::from_str(&content)?,
            Ok(_) => Vec::new(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        entries.push(entry);
        fs::write(path, serde_json::to_string(&entries)?)?;
        Ok(())
    }

    fn append_line(path: &Path, entry: &FileEntry) -> Result<(), TransportError> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        // Single write so the line lands whole.
        let line = format!("{} -> {}\n", entry.prefix, entry.message);
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}

impl Transport for FileTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::File
    }

    fn send(&self, record: &Record) -> Result<(), TransportError> {
        let path = self.path_for(record);
        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let entry = self.entry(record);
        match self.config.file_type {
            FileType::Json => Self::append_json(&path, entry),
            FileType::Log | FileType::Txt => Self::append_line(&path, &entry),
        }
    }
}
