use std::io::{Read, Write};

use super::{Row, StoreError};

/// The whole row-store held in memory: a header plus rows of cell text.
///
/// Every row is kept exactly as wide as `columns`; cells for fields a row
/// never had are empty strings.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Load a table from CSV. The first record is the header. Short rows are
    /// padded with empty cells, rows wider than the header are rejected.
    pub fn read_from<R: Read>(source: R) -> Result<Self, StoreError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(source);

        let columns: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
        if columns.is_empty() {
            return Ok(Table::default());
        }

        for (idx, name) in columns.iter().enumerate() {
            if columns[..idx].contains(name) {
                return Err(StoreError::Corrupt(format!("duplicate column '{name}'")));
            }
        }

        let mut rows = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            let record = record?;
            if record.len() > columns.len() {
                return Err(StoreError::Corrupt(format!(
                    "row {} has {} fields, header has {}",
                    idx + 1,
                    record.len(),
                    columns.len()
                )));
            }
            let mut cells: Vec<String> = record.iter().map(|c| c.to_string()).collect();
            cells.resize(columns.len(), String::new());
            rows.push(cells);
        }

        Ok(Table { columns, rows })
    }

    /// Append one row, reconciling columns first: fields the table has not
    /// seen yet become new trailing columns (empty in every earlier row), and
    /// columns the row lacks are left empty.
    pub fn push_row(&mut self, row: Row) {
        let mut cells = vec![String::new(); self.columns.len()];

        for (name, value) in row {
            match self.columns.iter().position(|c| *c == name) {
                Some(idx) => cells[idx] = value,
                None => {
                    self.columns.push(name);
                    for existing in &mut self.rows {
                        existing.push(String::new());
                    }
                    cells.push(value);
                }
            }
        }

        self.rows.push(cells);
    }

    /// Serialize header and rows as CSV, handing the sink back once flushed.
    pub fn write_to<W: Write>(&self, sink: W) -> Result<W, StoreError> {
        let mut writer = csv::Writer::from_writer(sink);

        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }

        writer
            .into_inner()
            .map_err(|e| StoreError::Io(e.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[(&str, &str)]) -> Row {
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn render(table: &Table) -> String {
        String::from_utf8(table.write_to(Vec::new()).unwrap()).unwrap()
    }

    #[test]
    fn first_row_defines_header() {
        let mut table = Table::default();
        table.push_row(row(&[("name", "Alice"), ("score", "10")]));

        assert_eq!(render(&table), "name,score\nAlice,10\n");
    }

    #[test]
    fn new_columns_are_appended_and_backfilled() {
        let mut table = Table::default();
        table.push_row(row(&[("x", "1")]));
        table.push_row(row(&[("y", "2")]));

        assert_eq!(table.columns(), ["x", "y"]);
        assert_eq!(render(&table), "x,y\n1,\n,2\n");
    }

    #[test]
    fn row_fields_land_in_existing_column_order() {
        let mut table = Table::default();
        table.push_row(row(&[("a", "1"), ("b", "2")]));
        table.push_row(row(&[("c", "3"), ("b", "4")]));

        assert_eq!(table.columns(), ["a", "b", "c"]);
        assert_eq!(
            table.rows(),
            [
                vec!["1".to_string(), "2".to_string(), String::new()],
                vec![String::new(), "4".to_string(), "3".to_string()],
            ]
        );
    }

    #[test]
    fn read_pads_short_rows() {
        let table = Table::read_from("a,b,c\n1,2\n4,5,6\n".as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0], ["1", "2", ""]);
        assert_eq!(table.rows()[1], ["4", "5", "6"]);
    }

    #[test]
    fn read_rejects_rows_wider_than_header() {
        let err = Table::read_from("a\n1,2\n".as_bytes()).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)), "got {err}");
    }

    #[test]
    fn read_rejects_duplicate_columns() {
        let err = Table::read_from("a,a\n1,2\n".as_bytes()).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)), "got {err}");
    }

    #[test]
    fn empty_input_is_an_empty_table() {
        let table = Table::read_from("".as_bytes()).unwrap();
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
    }

    #[test]
    fn quoted_cells_survive_reload() {
        let mut table = Table::default();
        table.push_row(row(&[("note", "hello, \"world\"\nbye")]));

        let text = render(&table);
        let reloaded = Table::read_from(text.as_bytes()).unwrap();

        assert_eq!(reloaded, table);
    }
}
