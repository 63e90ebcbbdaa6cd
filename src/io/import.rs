//! Reads demand series from headered CSV files.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Reads one numeric column, selected by header name, from a CSV file.
///
/// # Errors
///
/// Returns an `io::Error` if the file cannot be opened or the column is
/// missing or holds a non-numeric value.
pub fn read_series_csv(path: &Path, column: &str) -> io::Result<Vec<f32>> {
    let file = File::open(path)?;
    read_series(io::BufReader::new(file), column)
}

/// Reads one numeric column, selected by header name, from any reader.
///
/// # Errors
///
/// Returns `InvalidData` if the column is missing or a cell fails to parse.
pub fn read_series(reader: impl Read, column: &str) -> io::Result<Vec<f32>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let idx = rdr
        .headers()?
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| invalid(format!("column \"{column}\" not found")))?;

    let mut series = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        let cell = record.get(idx).unwrap_or("");
        let value = cell.parse::<f32>().map_err(|e| {
            invalid(format!("row {}: \"{cell}\" in column \"{column}\": {e}", row + 1))
        })?;
        series.push(value);
    }
    Ok(series)
}

fn invalid(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str = "timestep,demand_kw,thermal_kw\n0,10.5,2\n1,12,3\n2, 9 ,4\n";

    #[test]
    fn reads_named_column() {
        let series = read_series(DATA.as_bytes(), "demand_kw").ok();
        assert_eq!(series, Some(vec![10.5, 12.0, 9.0]));
        let thermal = read_series(DATA.as_bytes(), "thermal_kw").ok();
        assert_eq!(thermal, Some(vec![2.0, 3.0, 4.0]));
    }

    #[test]
    fn missing_column_is_invalid_data() {
        let err = read_series(DATA.as_bytes(), "load").err();
        assert_eq!(err.map(|e| e.kind()), Some(io::ErrorKind::InvalidData));
    }

    #[test]
    fn bad_cell_reports_row() {
        let err = read_series("demand_kw\n1\nabc\n".as_bytes(), "demand_kw").err();
        let msg = err.map(|e| e.to_string()).unwrap_or_default();
        assert!(msg.contains("row 2"), "unexpected message: {msg}");
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(read_series_csv(Path::new("/nonexistent/demand.csv"), "demand_kw").is_err());
    }
}
