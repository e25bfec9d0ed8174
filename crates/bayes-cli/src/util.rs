use anyhow::{Context, Result};
use std::path::PathBuf;

pub fn validate_tsv_or_csv_file(path: &str) -> Result<()> {
    let pb = PathBuf::from(path);

    let ext = pb
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    match ext.as_deref() {
        Some("tsv") | Some("csv") => {}
        _ => anyhow::bail!("File must have a .tsv or .csv extension: {}", path),
    }

    if !pb.exists() {
        anyhow::bail!("File does not exist: {}", path);
    }

    Ok(())
}

/// Split a comma-separated argument, dropping blank entries.
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse row indices such as `0,1,2` or `0-9,15`. Ranges are inclusive.
pub fn parse_index_list(value: &str) -> Result<Vec<usize>> {
    let mut indices = Vec::new();
    for item in parse_list(value) {
        match item.split_once('-') {
            Some((start, end)) => {
                let start: usize = start
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid range start in '{}'", item))?;
                let end: usize = end
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid range end in '{}'", item))?;
                if end < start {
                    anyhow::bail!("Descending range '{}'", item);
                }
                indices.extend(start..=end);
            }
            None => indices.push(
                item.parse()
                    .with_context(|| format!("Invalid row index '{}'", item))?,
            ),
        }
    }
    Ok(indices)
}
