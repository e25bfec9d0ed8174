//! CSV / TSV reader and scored-row writer.
use std::io::Write;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use indexmap::IndexSet;

use crate::data_handling::{DataRow, Dataset, Value};
use crate::scoring::ScoredRow;

/// Configuration for reading delimited text files.
#[derive(Debug, Clone)]
pub struct TableReaderConfig {
    /// Field delimiter. When `None` it is chosen from the file extension:
    /// tab for `.tsv`, comma otherwise.
    pub delimiter: Option<u8>,
    /// Trim surrounding whitespace from headers and cells.
    pub trim: bool,
    /// Parse cells that are entirely a finite number as `Value::Number`.
    pub parse_numbers: bool,
}

impl Default for TableReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            trim: true,
            parse_numbers: true,
        }
    }
}

/// Read a CSV or TSV file with a header row into a `Dataset`.
pub fn read_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    read_dataset_with_config(path, &TableReaderConfig::default())
}

fn delimiter_for(path: &Path) -> u8 {
    match path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("tsv") | Some("tab") => b'\t',
        _ => b',',
    }
}

fn to_value(cell: &str, config: &TableReaderConfig) -> Value {
    let cell = if config.trim { cell.trim() } else { cell };
    if cell.is_empty() {
        return Value::Missing;
    }
    if config.parse_numbers {
        if let Ok(n) = cell.parse::<f64>() {
            if n.is_finite() {
                return Value::Number(n);
            }
        }
    }
    Value::Text(cell.to_string())
}

/// Read a delimited file using a custom configuration.
pub fn read_dataset_with_config<P: AsRef<Path>>(path: P, config: &TableReaderConfig) -> Result<Dataset> {
    let path = path.as_ref();
    let delimiter = config.delimiter.unwrap_or_else(|| delimiter_for(path));
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open data file: {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .context("Failed to read header row")?
        .iter()
        .map(|h| if config.trim { h.trim() } else { h }.to_string())
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(anyhow!("Header row of {} is empty", path.display()));
    }

    let mut rows = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;
        let row: DataRow = headers
            .iter()
            .enumerate()
            .filter(|(_, name)| !name.is_empty())
            .map(|(i, name)| {
                let value = record.get(i).map(|c| to_value(c, config)).unwrap_or(Value::Missing);
                (name.clone(), value)
            })
            .collect();
        rows.push(row);
    }

    log::info!(
        "Loaded {} rows x {} columns from {}",
        rows.len(),
        headers.len(),
        path.display()
    );
    Ok(Dataset::new(rows))
}

/// Fail unless every name in `columns` appears in `dataset`.
pub fn require_columns(dataset: &Dataset, columns: &[String]) -> Result<()> {
    let present = dataset.columns();
    let missing: Vec<&str> = columns
        .iter()
        .filter(|c| !present.contains(c))
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        anyhow::bail!(
            "Columns not found in dataset: {} (available: {})",
            missing.join(", "),
            present.join(", ")
        );
    }
    Ok(())
}

/// Write scored rows as CSV: original columns, `predicted_label`, then one
/// `prob_<class>` column per class.
pub fn write_scored_rows<W: Write>(writer: W, rows: &[ScoredRow], classes: &IndexSet<String>) -> Result<()> {
    let mut columns: IndexSet<String> = IndexSet::new();
    for scored in rows {
        for column in scored.row.columns() {
            columns.insert(column.to_string());
        }
    }

    let mut out = csv::Writer::from_writer(writer);
    let mut header: Vec<String> = columns.iter().cloned().collect();
    header.push("predicted_label".to_string());
    header.extend(classes.iter().map(|c| format!("prob_{}", c)));
    out.write_record(&header).context("Failed to write header")?;

    for scored in rows {
        let mut record: Vec<String> = columns.iter().map(|c| scored.row.label(c)).collect();
        record.push(scored.predicted_label.clone());
        record.extend(classes.iter().map(|c| format!("{:.6}", scored.probability(c))));
        out.write_record(&record).context("Failed to write scored row")?;
    }
    out.flush().context("Failed to flush scored rows")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[test]
    fn reads_csv_with_mixed_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("phones.csv");
        std::fs::write(&path, "brand,ram,price_idr\nAcme, 8 ,Rp 2.000.000\nZed,,4500000\n").unwrap();

        let ds = read_dataset(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows()[0].get("ram"), &Value::Number(8.0));
        assert_eq!(ds.rows()[0].get("price_idr"), &Value::from("Rp 2.000.000"));
        assert_eq!(ds.rows()[1].get("ram"), &Value::Missing);
    }

    #[test]
    fn tsv_extension_selects_tab_delimiter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.tsv");
        std::fs::write(&path, "a\tb\n1\tx\n").unwrap();
        let ds = read_dataset(&path).unwrap();
        assert_eq!(ds.columns(), vec!["a", "b"]);
    }

    #[test]
    fn missing_columns_are_reported() {
        let ds: Dataset = vec![[("a", Value::Number(1.0))].into_iter().collect::<DataRow>()].into();
        assert!(require_columns(&ds, &["a".to_string()]).is_ok());
        let err = require_columns(&ds, &["b".to_string()]).unwrap_err();
        assert!(err.to_string().contains("b"));
    }

    #[test]
    fn writes_probability_columns() {
        let classes: IndexSet<String> = ["A".to_string(), "B".to_string()].into_iter().collect();
        let probabilities: IndexMap<String, f64> =
            [("A".to_string(), 0.25), ("B".to_string(), 0.75)].into_iter().collect();
        let rows = vec![ScoredRow {
            row: [("x", Value::Number(1.0))].into_iter().collect(),
            predicted_label: "B".to_string(),
            probabilities,
        }];
        let mut buffer = Vec::new();
        write_scored_rows(&mut buffer, &rows, &classes).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("x,predicted_label,prob_A,prob_B\n"));
        assert!(text.contains("1,B,0.250000,0.750000"));
    }
}
