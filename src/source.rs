//! Read content files from the inputs' `src`.
//!
//! `src` is either a directory or a `.zip` archive. Sources are opened
//! lazily: nothing touches the filesystem until a file is read.

use crate::error::{Error, Result};
use crate::paths;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use zip::ZipArchive;
use zip::result::ZipError;

/// Reads files by path relative to a source root.
pub trait SourceReader: Send + Sync {
    /// Read `relative` as UTF-8 text.
    fn read_to_string(&self, relative: &str) -> Result<String>;

    /// Human-readable location, for messages.
    fn location(&self) -> String;
}

/// Files under a directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SourceReader for DirSource {
    fn read_to_string(&self, relative: &str) -> Result<String> {
        if relative.trim().is_empty() {
            return Err(Error::source_not_found(relative));
        }

        let path = paths::resolve(&self.root, relative);
        if !path.is_file() {
            return Err(Error::source_not_found(path.display().to_string()));
        }

        log::debug!("Reading {}", path.display());
        Ok(fs::read_to_string(&path)?)
    }

    fn location(&self) -> String {
        self.root.display().to_string()
    }
}

/// Files inside a zip archive.
#[derive(Debug, Clone)]
pub struct ZipSource {
    archive: PathBuf,
}

impl ZipSource {
    pub fn new(archive: impl Into<PathBuf>) -> Self {
        Self {
            archive: archive.into(),
        }
    }
}

/// Archive entry names never start with `./` or `/`.
fn entry_name(relative: &str) -> &str {
    let mut name = relative.trim();
    while let Some(rest) = name.strip_prefix("./") {
        name = rest;
    }
    name.trim_start_matches('/')
}

impl SourceReader for ZipSource {
    fn read_to_string(&self, relative: &str) -> Result<String> {
        let name = entry_name(relative);
        if name.is_empty() {
            return Err(Error::source_not_found(relative));
        }
        if !self.archive.is_file() {
            return Err(Error::source_not_found(self.archive.display().to_string()));
        }

        let file = File::open(&self.archive)?;
        let mut archive = ZipArchive::new(file)?;

        let mut entry = match archive.by_name(name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => {
                return Err(Error::source_not_found(format!(
                    "{}!{name}",
                    self.archive.display()
                )));
            }
            Err(e) => return Err(e.into()),
        };

        log::debug!("Reading {name} from {}", self.archive.display());
        let mut content = String::new();
        entry.read_to_string(&mut content)?;
        Ok(content)
    }

    fn location(&self) -> String {
        self.archive.display().to_string()
    }
}

/// Open the source named by `src`, relative to `base_dir`.
///
/// Without `src`, files are read relative to `base_dir` itself.
pub fn open(src: Option<&str>, base_dir: &Path) -> Box<dyn SourceReader> {
    let Some(src) = src.map(str::trim).filter(|s| !s.is_empty()) else {
        return Box::new(DirSource::new(base_dir));
    };

    let path = paths::resolve(base_dir, src);
    let is_zip = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("zip"));

    if is_zip {
        Box::new(ZipSource::new(path))
    } else {
        Box::new(DirSource::new(path))
    }
}
