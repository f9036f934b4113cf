use crate::error::SheetError;
use crate::table::Table;
use std::fs::File;
use std::path::Path;

/// Write a table as CSV, headers exactly as the row builder produced them.
///
/// Cells are already serialized strings; GUIDs pass through opaque.
pub fn write_csv<P: AsRef<Path>>(table: &Table, path: P) -> Result<(), SheetError> {
    let path_ref = path.as_ref();
    let file = File::create(path_ref).map_err(|source| SheetError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;

    let mut writer = csv::Writer::from_writer(file);

    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }

    writer.flush().map_err(|e| SheetError::WriteError {
        message: e.to_string(),
    })?;

    Ok(())
}

/// Read an edited sheet back into a table.
///
/// Headers come from the first record; every cell is read back in its
/// serialized string form. A malformed sheet is batch-fatal.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Table, SheetError> {
    let path_ref = path.as_ref();
    let file = File::open(path_ref).map_err(|source| SheetError::FileRead {
        path: path_ref.to_path_buf(),
        source,
    })?;

    let mut reader = csv::Reader::from_reader(file);
    let columns: Vec<String> = reader.headers()?.iter().map(ToString::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(ToString::to_string).collect());
    }

    Ok(Table { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn table_round_trips_through_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("elements.csv");

        let table = Table {
            columns: vec![
                "GUID".to_string(),
                "Name".to_string(),
                "G55_LCA.Gjenbruksstatus".to_string(),
            ],
            rows: vec![
                vec!["0aF$3_xyz$$".to_string(), "Vegg, bærende".to_string(), "NY".to_string()],
                vec!["1A2B".to_string(), String::new(), String::new()],
            ],
        };

        write_csv(&table, &path).unwrap();
        let back = read_csv(&path).unwrap();

        // GUIDs are opaque strings and must round-trip exactly
        assert_eq!(back, table);
    }

    #[test]
    fn unreadable_sheet_is_an_error() {
        let err = read_csv("/nonexistent-folder/elements.csv").unwrap_err();
        assert!(matches!(err, SheetError::FileRead { .. }));
    }
}
