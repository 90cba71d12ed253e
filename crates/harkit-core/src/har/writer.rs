use super::document::Log;
use super::reader::HarReader;
use crate::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Callbacks around the actual file write, for instrumentation
pub trait WriteObserver {
    fn before_write(&mut self) {}
    fn after_write(&mut self) {}
}

impl WriteObserver for () {}

/// Closure pair usable as a [`WriteObserver`]
pub struct WriteHooks<B, A> {
    pub before: B,
    pub after: A,
}

impl<B: FnMut(), A: FnMut()> WriteObserver for WriteHooks<B, A> {
    fn before_write(&mut self) {
        (self.before)()
    }

    fn after_write(&mut self) {
        (self.after)()
    }
}

pub struct HarWriter;

impl HarWriter {
    /// Write a HAR log to a file
    pub fn to_file(log: &Log, path: &Path) -> Result<()> {
        Self::to_file_with_observer(log, path, &mut ())
    }

    /// Write a HAR log to a file, notifying `observer` around the write.
    ///
    /// The log is serialized before anything is opened, so a serialization
    /// failure leaves the target untouched and fires no callbacks.
    pub fn to_file_with_observer(
        log: &Log,
        path: &Path,
        observer: &mut impl WriteObserver,
    ) -> Result<()> {
        tracing::debug!("Writing HAR file to: {}", path.display());

        let content = log.to_bytes()?;

        observer.before_write();
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(&content)?;
        writer.flush()?;
        observer.after_write();

        tracing::info!(
            "Successfully wrote HAR file with {} entries to {}",
            log.entries.len(),
            path.display()
        );

        Ok(())
    }

    /// Combine every `*.har` file in `dir` and save the result to `output`.
    ///
    /// Nothing is written when the directory holds no HAR files.
    pub fn combine_directory_to_file(dir: &Path, output: &Path) -> Result<Option<Log>> {
        let combined = HarReader::combine_from_directory(dir)?;
        if let Some(log) = &combined {
            Self::to_file(log, output)?;
        }
        Ok(combined)
    }
}
