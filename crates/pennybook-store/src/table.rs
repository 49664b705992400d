//! CSV codec for the ledger table

use crate::error::{StoreError, StoreResult};

/// One data row exactly as stored, before any type conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based line in the source (0 for rows that were never read from disk)
    pub line: u64,
    pub date: String,
    pub amount: String,
    pub category: String,
    pub description: String,
}

impl RawRecord {
    pub fn new(
        date: impl Into<String>,
        amount: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            line: 0,
            date: date.into(),
            amount: amount.into(),
            category: category.into(),
            description: description.into(),
        }
    }

    fn from_csv(record: &csv::StringRecord) -> Self {
        let field = |i: usize| record.get(i).unwrap_or("").to_string();
        Self {
            line: record.position().map_or(0, |p| p.line()),
            date: field(0),
            amount: field(1),
            category: field(2),
            description: field(3),
        }
    }

    fn fields(&self) -> [&str; 4] {
        [&self.date, &self.amount, &self.category, &self.description]
    }
}

/// Header plus rows, in stored order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<RawRecord>,
}

impl Table {
    /// A header-only table
    pub fn empty(header: &[String]) -> Self {
        Self {
            header: header.to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Decode CSV bytes, requiring the header to have `expected_columns` fields.
///
/// Rows shorter than the header are padded with empty fields. Rows longer
/// than the header and invalid UTF-8 are reported as [`StoreError::Csv`].
pub fn decode_table(bytes: &[u8], location: &str, expected_columns: usize) -> StoreResult<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let header: Vec<String> = reader
        .headers()
        .map_err(|e| StoreError::csv(location, e))?
        .iter()
        .map(String::from)
        .collect();

    if header.len() != expected_columns {
        return Err(StoreError::ColumnCount {
            expected: expected_columns,
            found: header.len(),
        });
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| StoreError::csv(location, e))?;
        if record.len() > header.len() {
            return Err(StoreError::Csv {
                location: location.to_string(),
                message: format!(
                    "line {}: found {} fields, expected at most {}",
                    record.position().map_or(0, |p| p.line()),
                    record.len(),
                    header.len()
                ),
            });
        }
        rows.push(RawRecord::from_csv(&record));
    }

    Ok(Table { header, rows })
}

/// Encode a table to CSV bytes with standard quoting
pub fn encode_table(table: &Table) -> StoreResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(&table.header)
        .map_err(|e| StoreError::csv("<memory>", e))?;
    for row in &table.rows {
        writer
            .write_record(row.fields())
            .map_err(|e| StoreError::csv("<memory>", e))?;
    }

    writer.into_inner().map_err(|e| StoreError::Io(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> Vec<String> {
        vec!["date".into(), "amount".into(), "category".into(), "description".into()]
    }

    #[test]
    fn test_decode_header_only() {
        let table = decode_table(b"date,amount,category,description\n", "t", 4).unwrap();
        assert_eq!(table.header, header());
        assert!(table.is_empty());
    }

    #[test]
    fn test_decode_rows_keep_line_numbers() {
        let data = b"date,amount,category,description\n01-01-2024,10,Income,gift\n02-01-2024,5.5,Expense,\n";
        let table = decode_table(data, "t", 4).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].line, 2);
        assert_eq!(table.rows[0].description, "gift");
        assert_eq!(table.rows[1].line, 3);
        assert_eq!(table.rows[1].amount, "5.5");
        assert_eq!(table.rows[1].description, "");
    }

    #[test]
    fn test_decode_wrong_column_count() {
        let err = decode_table(b"date,amount,category\n", "t", 4).unwrap_err();
        assert!(matches!(err, StoreError::ColumnCount { expected: 4, found: 3 }));
        assert!(err.is_corrupt());
    }

    #[test]
    fn test_decode_empty_input() {
        let err = decode_table(b"", "t", 4).unwrap_err();
        assert!(matches!(err, StoreError::ColumnCount { found: 0, .. }));
    }

    #[test]
    fn test_decode_ragged_row() {
        let data = b"date,amount,category,description\n01-01-2024,10,Income,gift,extra\n";
        let err = decode_table(data, "ledger.csv", 4).unwrap_err();
        assert!(matches!(err, StoreError::Csv { ref location, .. } if location == "ledger.csv"));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_decode_pads_short_rows() {
        let data = b"date,amount,category,description\n01-01-2024,100,Income,salary\n02-01-2024,5,Expense\n";
        let table = decode_table(data, "t", 4).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[1].line, 3);
        assert_eq!(table.rows[1].category, "Expense");
        assert_eq!(table.rows[1].description, "");
        assert_eq!(table.rows[0].description, "salary");
    }

    #[test]
    fn test_encode_quotes_delimiters() {
        let mut table = Table::empty(&header());
        table.rows.push(RawRecord::new("01-01-2024", "3", "Expense", "coffee, \"large\""));

        let bytes = encode_table(&table).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.contains("\"coffee, \"\"large\"\"\""));

        let decoded = decode_table(&bytes, "t", 4).unwrap();
        assert_eq!(decoded.rows[0].description, "coffee, \"large\"");
    }
}
