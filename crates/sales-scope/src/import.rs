//! CSV dataset import.
//!
//! Converts a sales report CSV into the JSON dataset the server reads. The
//! parser handles quoted cells with embedded commas and `""` escapes, both
//! newline conventions, and ragged rows: short rows are padded with empty
//! cells, long rows are truncated with a warning, and rows with no values
//! at all are skipped.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};

/// Outcome of a conversion, before anything is written to disk.
pub struct Conversion {
    /// One JSON object per data row, keyed by the header row's column names.
    pub records: Vec<Map<String, Value>>,
    /// Rows whose cells were all empty.
    pub skipped_rows: usize,
    /// 1-based data row numbers that carried more cells than the header.
    pub oversized_rows: Vec<usize>,
}

/// Run the import command: read `input`, convert it, and write the JSON
/// dataset to `output`, creating parent directories as needed.
pub fn run_import(input: &Path, output: &Path) -> Result<()> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read CSV file: {}", input.display()))?;

    let conversion = convert(&content)?;

    for row in &conversion.oversized_rows {
        eprintln!(
            "Warning: data row {} has more columns than the header; extra values ignored",
            row
        );
    }

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string(&conversion.records)?;
    std::fs::write(output, &json)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "Converted {} records from {}",
        conversion.records.len(),
        input.display()
    );
    if conversion.skipped_rows > 0 {
        println!(
            "Skipped {} empty row{}",
            conversion.skipped_rows,
            if conversion.skipped_rows == 1 { "" } else { "s" }
        );
    }
    println!(
        "Output written to {} ({:.2} KB)",
        output.display(),
        json.len() as f64 / 1024.0
    );

    Ok(())
}

/// Convert CSV text into JSON records. Pure; never touches the filesystem.
pub fn convert(content: &str) -> Result<Conversion> {
    // Splitting on both newline characters and dropping blank results
    // accepts LF, CRLF, and bare-CR files alike.
    let mut lines = content
        .split(['\n', '\r'])
        .filter(|line| !line.trim().is_empty());

    let header_line = match lines.next() {
        Some(line) => line,
        None => bail!("CSV file is empty"),
    };
    let headers = parse_csv_line(header_line);
    if headers.iter().all(|header| header.is_empty()) {
        bail!("CSV header row has no column names");
    }

    let mut records = Vec::new();
    let mut skipped_rows = 0;
    let mut oversized_rows = Vec::new();

    for (index, line) in lines.enumerate() {
        let values = parse_csv_line(line);
        if values.iter().all(|value| value.is_empty()) {
            skipped_rows += 1;
            continue;
        }
        if values.len() > headers.len() {
            oversized_rows.push(index + 1);
        }
        let mut record = Map::new();
        for (column, header) in headers.iter().enumerate() {
            let value = values.get(column).cloned().unwrap_or_default();
            record.insert(header.clone(), Value::String(value));
        }
        records.push(record);
    }

    Ok(Conversion {
        records,
        skipped_rows,
        oversized_rows,
    })
}

/// Split one CSV line into trimmed cell values, honoring double quotes and
/// `""` escapes inside quoted cells.
fn parse_csv_line(line: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                values.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    values.push(current.trim().to_string());
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_cells_keep_commas_and_escaped_quotes() {
        let conversion = convert("Name,Note\n\"Smith, John\",\"said \"\"hi\"\"\"\n").unwrap();
        assert_eq!(conversion.records.len(), 1);
        assert_eq!(conversion.records[0]["Name"], "Smith, John");
        assert_eq!(conversion.records[0]["Note"], "said \"hi\"");
    }

    #[test]
    fn all_newline_conventions_split_rows() {
        let conversion = convert("A,B\r\n1,2\r3,4\n5,6").unwrap();
        assert_eq!(conversion.records.len(), 3);
        assert_eq!(conversion.records[2]["A"], "5");
    }

    #[test]
    fn cells_are_trimmed() {
        let conversion = convert("A,B\n  x , y  \n").unwrap();
        assert_eq!(conversion.records[0]["A"], "x");
        assert_eq!(conversion.records[0]["B"], "y");
    }

    #[test]
    fn short_rows_pad_missing_cells_with_empty_strings() {
        let conversion = convert("A,B,C\n1,2\n").unwrap();
        assert_eq!(conversion.records[0]["B"], "2");
        assert_eq!(conversion.records[0]["C"], "");
    }

    #[test]
    fn long_rows_truncate_to_the_header_and_are_reported() {
        let conversion = convert("A,B\n1,2,3,4\n").unwrap();
        assert_eq!(conversion.oversized_rows, vec![1]);
        assert_eq!(conversion.records[0].len(), 2);
        assert_eq!(conversion.records[0]["B"], "2");
    }

    #[test]
    fn rows_with_only_empty_cells_are_skipped_and_counted() {
        let conversion = convert("A,B\n,\n\n1,2\n").unwrap();
        assert_eq!(conversion.records.len(), 1);
        assert_eq!(conversion.skipped_rows, 1);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(convert("").is_err());
        assert!(convert("   \n  \n").is_err());
    }

    #[test]
    fn run_import_writes_json_and_creates_parent_dirs() {
        let dir = tempfile::TempDir::new().unwrap();
        let input = dir.path().join("report.csv");
        std::fs::write(&input, "Customer Name,Quantity\nAda,3\n").unwrap();

        let output = dir.path().join("nested/out/sales.json");
        run_import(&input, &output).unwrap();

        let text = std::fs::read_to_string(&output).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["Customer Name"], "Ada");
        assert_eq!(value[0]["Quantity"], "3");
    }
}
