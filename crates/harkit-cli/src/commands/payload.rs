use anyhow::Result;
use harkit_core::har::HarReader;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Decoded body of the last entry's response, empty when there is none
pub fn last_payload(file: &Path) -> Result<Vec<u8>> {
    let log = HarReader::from_file(file)?;
    Ok(log.last_entry_payload(b"").to_vec())
}

pub fn execute(file: &Path, output: Option<PathBuf>) -> Result<()> {
    tracing::debug!("Extracting last payload from: {}", file.display());

    let payload = last_payload(file)?;
    if payload.is_empty() {
        tracing::warn!("Last entry of {} has no payload", file.display());
    }

    match output {
        Some(output_path) => {
            tracing::debug!("Writing payload to: {}", output_path.display());
            fs::write(&output_path, &payload)?;
        }
        None => io::stdout().write_all(&payload)?,
    }

    Ok(())
}
