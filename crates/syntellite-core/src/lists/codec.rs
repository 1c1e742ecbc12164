//! CSV parsing and writing for candidate lists.

use std::io;

use crate::error::{Error, Result};

use super::model::Row;

/// Parses CSV bytes into column headers and rows.
///
/// The header row is required. Empty lines are skipped; short rows are
/// padded with empty cells, extra cells beyond the header are dropped.
pub(crate) fn parse(data: &[u8]) -> Result<(Vec<String>, Vec<Row>)> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(data);

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(ToString::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Row = columns
            .iter()
            .enumerate()
            .map(|(index, column)| {
                let value = record.get(index).unwrap_or("").to_string();
                (column.clone(), value)
            })
            .collect();
        rows.push(row);
    }

    Ok((columns, rows))
}

/// Writes rows back out as CSV text in the given column order.
pub(crate) fn unparse(columns: &[String], rows: &[Row]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(columns)?;
    for row in rows {
        writer.write_record(
            columns
                .iter()
                .map(|column| row.get(column).map_or("", String::as_str)),
        )?;
    }

    let data = writer
        .into_inner()
        .map_err(|error| Error::Io(io::Error::other(error.to_string())))?;
    Ok(String::from_utf8_lossy(&data).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_with_header() {
        let data = b"First Name,Email\nAda,ada@example.com\nGrace,grace@example.com\n";
        let (columns, rows) = parse(data).unwrap();
        assert_eq!(columns, vec!["First Name", "Email"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["First Name"], "Ada");
        assert_eq!(rows[1]["Email"], "grace@example.com");
    }

    #[test]
    fn parse_skips_empty_lines_and_pads_short_rows() {
        let data = b"Name,Role\n\nAda,Engineer\nGrace\n";
        let (_, rows) = parse(data).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["Name"], "Grace");
        assert_eq!(rows[1]["Role"], "");
    }

    #[test]
    fn unparse_roundtrip() {
        let data = b"Name,Role\nAda,Engineer\n";
        let (columns, rows) = parse(data).unwrap();
        let text = unparse(&columns, &rows).unwrap();
        assert_eq!(text, "Name,Role\nAda,Engineer\n");
    }

    #[test]
    fn unparse_fills_missing_cells() {
        let columns = vec!["Name".to_string(), "Role".to_string()];
        let rows = vec![Row::from([("Name".to_string(), "Ada".to_string())])];
        let text = unparse(&columns, &rows).unwrap();
        assert_eq!(text, "Name,Role\nAda,\n");
    }
}
