use crate::OutputFormat;
use anyhow::Result;
use harkit_core::har::HarReader;
use std::path::Path;

/// URLs of the entries flagged `robots=disallowed`, in document order
pub fn disallowed_urls(file: &Path) -> Result<Vec<String>> {
    let log = HarReader::from_file(file)?;
    Ok(log
        .entries
        .iter()
        .filter(|e| e.robots_disallowed())
        .map(|e| e.request.url.clone())
        .collect())
}

pub fn execute(file: &Path, format: OutputFormat) -> Result<()> {
    let urls = disallowed_urls(file)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&urls)?),
        OutputFormat::Pretty => {
            use console::style;

            if urls.is_empty() {
                println!("{}", style("No robots-disallowed entries").dim());
            } else {
                println!(
                    "{} ({})",
                    style("Robots-disallowed URLs").bold().yellow(),
                    urls.len()
                );
                for url in &urls {
                    println!("  {}", url);
                }
            }
        }
    }

    Ok(())
}
