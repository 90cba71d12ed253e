use crate::OutputFormat;
use anyhow::Result;
use harkit_core::har::{HarReader, Log};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct LogInfo {
    pub version: String,
    pub creator: String,
    pub browser: String,
    pub entries: usize,
    pub non_empty_responses: usize,
    pub robots_disallowed: usize,
    pub date_range: Option<(String, String)>,
}

impl LogInfo {
    pub fn from_log(log: &Log) -> Self {
        let date_range = match (log.entries.first(), log.entries.last()) {
            (Some(first), Some(last)) => Some((
                first.started_date_time.clone(),
                last.started_date_time.clone(),
            )),
            _ => None,
        };

        Self {
            version: log.version.clone(),
            creator: format!("{} {}", log.creator.name, log.creator.version),
            browser: format!("{} {}", log.browser.name, log.browser.version),
            entries: log.entries.len(),
            non_empty_responses: log
                .entries
                .iter()
                .filter(|e| e.has_non_empty_response())
                .count(),
            robots_disallowed: log.entries.iter().filter(|e| e.robots_disallowed()).count(),
            date_range,
        }
    }
}

pub fn summarize(file: &Path) -> Result<LogInfo> {
    let log = HarReader::from_file(file)?;
    Ok(LogInfo::from_log(&log))
}

pub fn execute(file: &Path, format: OutputFormat) -> Result<()> {
    tracing::info!("Reading HAR file: {}", file.display());

    let info = summarize(file)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&info)?),
        OutputFormat::Pretty => output_pretty(&info),
    }

    Ok(())
}

fn output_pretty(info: &LogInfo) {
    use console::style;

    println!("\n{}", style("HAR Log").bold().cyan());
    println!("{}", style("=======").cyan());
    println!("  Version:             {}", info.version);
    println!("  Creator:             {}", info.creator);
    println!("  Browser:             {}", info.browser);
    println!("  Entries:             {}", info.entries);
    println!("  Non-empty Responses: {}", info.non_empty_responses);
    println!("  Robots Disallowed:   {}", info.robots_disallowed);

    if let Some((start, end)) = &info.date_range {
        println!("  Date Range:          {} to {}", start, end);
    }

    println!();
}
