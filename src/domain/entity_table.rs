use itertools::Itertools;

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("Failed to read csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("Table has no header row")]
    MissingHeader,
}

/// Tabular input the user picks entities from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntityTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl EntityTable {
    pub fn from_csv(content: &str) -> Result<Self, TableError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());

        let columns: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

        let mut rows = vec![];
        for record in reader.records() {
            rows.push(record?.iter().map(|cell| cell.to_string()).collect());
        }

        EntityTable::from_records(columns, rows)
    }

    /// Builds a table from a header and raw rows, short rows are padded and
    /// long rows truncated to the header width.
    pub fn from_records(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, TableError> {
        if columns.is_empty() || columns.iter().all(|c| c.trim().is_empty()) {
            return Err(TableError::MissingHeader);
        }

        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        Ok(EntityTable { columns, rows })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct non-empty values of a column in first-seen order.
    pub fn entities(&self, column: &str) -> Vec<String> {
        let Some(index) = self.columns.iter().position(|c| c == column) else {
            return vec![];
        };

        self.rows
            .iter()
            .filter_map(|row| row.get(index))
            .filter(|value| !value.trim().is_empty())
            .unique()
            .cloned()
            .collect()
    }

    pub fn preview(&self, limit: usize) -> &[Vec<String>] {
        &self.rows[..self.rows.len().min(limit)]
    }
}

#[cfg(test)]
mod tests {
    use super::{EntityTable, TableError};

    const CSV: &str = "name,company\nJane Doe,Acme\nJohn Roe,Globex\nJane Doe,Initech\n,Umbrella\n";

    #[test]
    fn parses_csv_header_and_rows() {
        let table = EntityTable::from_csv(CSV).unwrap();

        assert_eq!(table.columns, vec!["name", "company"]);
        assert_eq!(table.rows.len(), 4);
        assert_eq!(table.rows[1], vec!["John Roe", "Globex"]);
    }

    #[test]
    fn entities_are_unique_and_ordered() {
        let table = EntityTable::from_csv(CSV).unwrap();

        assert_eq!(table.entities("name"), vec!["Jane Doe", "John Roe"]);
        assert_eq!(
            table.entities("company"),
            vec!["Acme", "Globex", "Initech", "Umbrella"]
        );
        assert!(table.entities("email").is_empty());
    }

    #[test]
    fn entity_values_are_not_trimmed() {
        let table = EntityTable::from_csv("name\n Jane Doe \n   \nJane Doe\n").unwrap();
        assert_eq!(table.entities("name"), vec![" Jane Doe ", "Jane Doe"]);
    }

    #[test]
    fn short_rows_are_padded() {
        let table = EntityTable::from_csv("name,company\nJane Doe\n").unwrap();
        assert_eq!(table.rows[0], vec!["Jane Doe", ""]);
    }

    #[test]
    fn empty_input_has_no_header() {
        assert!(matches!(
            EntityTable::from_csv(""),
            Err(TableError::MissingHeader)
        ));
    }

    #[test]
    fn header_only_table_is_empty() {
        let table = EntityTable::from_csv("name\n").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn preview_is_bounded() {
        let table = EntityTable::from_csv(CSV).unwrap();
        assert_eq!(table.preview(2).len(), 2);
        assert_eq!(table.preview(10).len(), 4);
    }
}
