use super::document::Log;
use crate::{Error, Result};
use std::fs;
use std::io;
use std::path::Path;

pub struct HarReader;

impl HarReader {
    /// Read and parse a HAR file from the given path
    pub fn from_file(path: &Path) -> Result<Log> {
        tracing::debug!("Reading HAR file from: {}", path.display());

        let content = fs::read(path)?;
        let log = Log::parse(&content)?;

        tracing::info!(
            "Successfully parsed HAR file with {} entries",
            log.entries.len()
        );

        Ok(log)
    }

    /// Every `*.har` file directly inside `dir`, sorted by path
    pub fn list_directory(dir: &Path) -> Result<Vec<std::path::PathBuf>> {
        if !dir.is_dir() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Not a directory: {}", dir.display()),
            )));
        }

        let pattern = format!(
            "{}/*.har",
            glob::Pattern::escape(&dir.to_string_lossy())
        );
        let paths = glob::glob(&pattern)
            .map_err(|e| Error::Format(format!("Invalid directory pattern '{}': {}", pattern, e)))?;

        let mut files = Vec::new();
        for path in paths {
            let path = path.map_err(|e| Error::Io(e.into()))?;
            if path.is_file() {
                files.push(path);
            }
        }

        Ok(files)
    }

    /// Parse every `*.har` file in `dir` and merge them into the first one.
    ///
    /// Files are taken in path order. Returns `Ok(None)` when the directory
    /// holds no HAR files.
    pub fn combine_from_directory(dir: &Path) -> Result<Option<Log>> {
        tracing::debug!("Combining HAR files in: {}", dir.display());

        let files = Self::list_directory(dir)?;
        if files.is_empty() {
            tracing::warn!("No .har files found in {}", dir.display());
            return Ok(None);
        }

        let logs = files
            .iter()
            .map(|path| Self::from_file(path))
            .collect::<Result<Vec<_>>>()?;
        let combined = Log::combine_to_first(logs);

        if let Some(log) = &combined {
            tracing::info!(
                "Combined {} HAR files into {} entries",
                files.len(),
                log.entries.len()
            );
        }

        Ok(combined)
    }
}
