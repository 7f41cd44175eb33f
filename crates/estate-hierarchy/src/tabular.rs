//! CSV boundary for bulk import and export.
//!
//! Input must carry a header row. Cells are UTF-8 with standard CSV quoting;
//! list fields are comma-joined inside a single quoted cell.

use std::io::{Read, Write};

use estate_core::models::Level;

use crate::codec::{RawRow, template_row};
use crate::error::HierarchyError;
use crate::schema::schema;

/// Parse CSV text into rows keyed by header names.
///
/// Short records leave their missing trailing columns absent; cells beyond
/// the header are ignored.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<RawRow>, HierarchyError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();
    if headers.iter().all(String::is_empty) {
        return Err(HierarchyError::MissingHeader);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .filter(|(header, _)| !header.is_empty())
            .map(|(header, cell)| (header.clone(), cell.to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

/// Write rows as CSV using the level's canonical column order.
pub fn write_csv<W: Write>(writer: W, level: Level, rows: &[RawRow]) -> Result<(), HierarchyError> {
    let schema = schema(level);
    let mut writer = csv::Writer::from_writer(writer);

    writer.write_record(schema.columns())?;
    for row in rows {
        writer.write_record(
            schema
                .columns()
                .map(|column| row.get(column).map(String::as_str).unwrap_or("")),
        )?;
    }
    writer
        .flush()
        .map_err(|e| HierarchyError::Tabular(e.to_string()))
}

/// Render rows as a CSV string.
pub fn to_csv_string(level: Level, rows: &[RawRow]) -> Result<String, HierarchyError> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, level, rows)?;
    String::from_utf8(buffer).map_err(|e| HierarchyError::Tabular(e.to_string()))
}

/// A header plus one example row for operators preparing import files.
pub fn template_csv(level: Level) -> Result<String, HierarchyError> {
    to_csv_string(level, &[template_row(level)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_quoted_lists() {
        let input = "\u{feff}name , amenities,greenInfrastructure.hasSolar\n\
                     HQ Campus,\"cafeteria,gym\",true\n";
        let rows = parse_csv(input.as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], "HQ Campus");
        assert_eq!(rows[0]["amenities"], "cafeteria,gym");
        assert_eq!(rows[0]["greenInfrastructure.hasSolar"], "true");
    }

    #[test]
    fn short_rows_leave_columns_absent() {
        let rows = parse_csv("id,name,description\nORG-1,Acme\n".as_bytes()).unwrap();
        assert_eq!(rows[0].get("name").map(String::as_str), Some("Acme"));
        assert!(!rows[0].contains_key("description"));
    }

    #[test]
    fn empty_input_has_no_header() {
        assert!(matches!(
            parse_csv("".as_bytes()),
            Err(HierarchyError::MissingHeader)
        ));
    }

    #[test]
    fn template_has_header_and_example() {
        let csv = template_csv(Level::Building).unwrap();
        let mut lines = csv.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("id,campusId,name"));
        assert!(header.contains("leaseDetails.monthlyRent"));
        assert!(lines.next().unwrap().starts_with("BLD-0001,CMP-0001"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn written_csv_parses_back() {
        let rows = vec![template_row(Level::Campus)];
        let csv = to_csv_string(Level::Campus, &rows).unwrap();
        assert_eq!(parse_csv(csv.as_bytes()).unwrap(), rows);
    }
}
