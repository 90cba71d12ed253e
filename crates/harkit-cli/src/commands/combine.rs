use crate::OutputFormat;
use anyhow::{Result, bail};
use harkit_core::har::{HarReader, HarWriter, Log};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Merge every `*.har` file in `dir` into the first one
pub fn combine_directory(dir: &Path) -> Result<Log> {
    match HarReader::combine_from_directory(dir)? {
        Some(log) => Ok(log),
        None => bail!("No .har files found in {}", dir.display()),
    }
}

pub fn execute(dir: &Path, output: Option<PathBuf>, format: OutputFormat) -> Result<()> {
    tracing::debug!("Combining HAR files in: {}", dir.display());

    let Some(output_path) = output else {
        // No output file: the combined document goes to stdout
        let log = combine_directory(dir)?;
        let mut stdout = io::stdout();
        stdout.write_all(log.serialize()?.as_bytes())?;
        stdout.write_all(b"\n")?;
        return Ok(());
    };

    let Some(log) = HarWriter::combine_directory_to_file(dir, &output_path)? else {
        bail!("No .har files found in {}", dir.display());
    };

    match format {
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "output": output_path.display().to_string(),
                "entries": log.entries.len(),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Pretty => {
            use console::style;
            println!(
                "{} {} entries to {}",
                style("Combined").bold().green(),
                log.entries.len(),
                output_path.display()
            );
        }
    }

    Ok(())
}
