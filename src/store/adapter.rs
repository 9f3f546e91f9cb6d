use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    schema,
    store::sheet::Workbook,
};

/// A row keyed by header name, the unit the services work with.
pub type Record = serde_json::Map<String, Value>;

/// Canonical text form of a cell. Blank and null cells read as the empty
/// string; whole numbers render without a fractional part so that `120` and
/// `120.0` compare equal.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(f) = n.as_f64() {
                if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                    (f as i64).to_string()
                } else {
                    f.to_string()
                }
            } else {
                n.to_string()
            }
        }
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Numeric cell value, stored as an integer when the value is whole.
pub fn number_value(f: f64) -> Value {
    if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Value::from(f as i64)
    } else {
        serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or_else(|| Value::from(0))
    }
}

/// Row Store Adapter: header-aware table operations over a [`Workbook`].
/// Row indices are 0-based over data rows (the header row is excluded) and
/// only valid until the next mutation of the same table.
#[derive(Clone)]
pub struct RowStore {
    book: Workbook,
}

impl RowStore {
    pub fn new(book: Workbook) -> Self {
        Self { book }
    }

    /// Ensure the table exists, creating it with its registered header row on
    /// first access.
    pub fn open_table(&self, name: &str) -> AppResult<()> {
        if !self.book.has_sheet(name) {
            let headers = schema::headers_for(name).ok_or_else(|| {
                AppError::Schema(format!("No schema registered for table: {name}"))
            })?;
            let header_row = headers.iter().map(|h| Value::from(*h)).collect();
            self.book.insert_sheet(name, header_row)?;
        }
        Ok(())
    }

    pub fn headers(&self, name: &str) -> AppResult<Vec<String>> {
        self.open_table(name)?;
        let rows = self.book.sheet_rows(name)?;
        Ok(rows
            .first()
            .map(|row| row.iter().map(cell_text).collect())
            .unwrap_or_default())
    }

    /// Number of data rows.
    pub fn row_count(&self, name: &str) -> AppResult<usize> {
        self.open_table(name)?;
        Ok(self.book.sheet_rows(name)?.len().saturating_sub(1))
    }

    /// All data rows as header-keyed records; blank cells become `""`.
    pub fn read_all(&self, name: &str) -> AppResult<Vec<Record>> {
        self.open_table(name)?;
        let rows = self.book.sheet_rows(name)?;
        let Some((header, data)) = rows.split_first() else {
            return Ok(Vec::new());
        };
        let headers: Vec<String> = header.iter().map(cell_text).collect();
        Ok(data.iter().map(|row| to_record(&headers, row)).collect())
    }

    pub fn row_record(&self, name: &str, data_idx: usize) -> AppResult<Record> {
        let headers = self.headers(name)?;
        let rows = self.book.sheet_rows(name)?;
        let row = rows
            .get(data_idx + 1)
            .ok_or_else(|| AppError::NotFound(format!("Row {data_idx} not found in {name}")))?;
        Ok(to_record(&headers, row))
    }

    /// Position of a column in the table's header, if present.
    pub fn column_index(&self, name: &str, column: &str) -> AppResult<Option<usize>> {
        Ok(self.headers(name)?.iter().position(|h| h == column))
    }

    /// Linear scan of data rows for the first one whose cell in `col_idx`
    /// matches `value` textually.
    pub fn find_row(&self, name: &str, col_idx: usize, value: &str) -> AppResult<Option<usize>> {
        self.open_table(name)?;
        let rows = self.book.sheet_rows(name)?;
        Ok(rows.iter().skip(1).position(|row| {
            row.get(col_idx)
                .map(cell_text)
                .is_some_and(|text| text == value)
        }))
    }

    /// Append one row, mapping record fields onto the current header order.
    /// Fields absent from the record become empty strings.
    pub fn append_row(&self, name: &str, record: &Record) -> AppResult<()> {
        let row = self.to_row(name, record)?;
        self.book.append_row(name, row)?;
        Ok(())
    }

    /// Overwrite a full data row in header order.
    pub fn update_row(&self, name: &str, data_idx: usize, record: &Record) -> AppResult<()> {
        let row = self.to_row(name, record)?;
        self.book.set_row(name, data_idx + 1, row)?;
        Ok(())
    }

    pub fn set_cell(
        &self,
        name: &str,
        data_idx: usize,
        col_idx: usize,
        value: Value,
    ) -> AppResult<()> {
        self.open_table(name)?;
        self.book.set_cell(name, data_idx + 1, col_idx, value)?;
        Ok(())
    }

    /// Physical removal; indices of rows below shift up by one.
    pub fn delete_row(&self, name: &str, data_idx: usize) -> AppResult<()> {
        self.open_table(name)?;
        self.book.remove_row(name, data_idx + 1)?;
        Ok(())
    }

    fn to_row(&self, name: &str, record: &Record) -> AppResult<Vec<Value>> {
        let headers = self.headers(name)?;
        Ok(headers
            .iter()
            .map(|h| match record.get(h) {
                Some(Value::Null) | None => Value::String(String::new()),
                Some(v) => v.clone(),
            })
            .collect())
    }
}

fn to_record(headers: &[String], row: &[Value]) -> Record {
    let mut record = Record::new();
    for (i, header) in headers.iter().enumerate() {
        let cell = row.get(i).cloned().unwrap_or(Value::Null);
        let cell = match cell {
            Value::Null => Value::String(String::new()),
            other => other,
        };
        record.insert(header.clone(), cell);
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{COL_ORDER_ID, ORDERS_TABLE};
    use serde_json::json;

    fn store() -> RowStore {
        RowStore::new(Workbook::in_memory())
    }

    #[test]
    fn open_table_seeds_registered_headers() {
        let store = store();
        store.open_table(ORDERS_TABLE).unwrap();
        let headers = store.headers(ORDERS_TABLE).unwrap();
        assert_eq!(headers.len(), 14);
        assert_eq!(headers[0], COL_ORDER_ID);
    }

    #[test]
    fn open_table_rejects_unregistered_names() {
        let err = store().open_table("Mystery").unwrap_err();
        assert!(matches!(err, AppError::Schema(_)));
    }

    #[test]
    fn append_maps_fields_onto_header_order() {
        let store = store();
        let mut record = Record::new();
        record.insert(COL_ORDER_ID.into(), json!("ORD-1-1"));
        record.insert("سعر المنتجات".into(), json!(100));
        store.append_row(ORDERS_TABLE, &record).unwrap();

        let rows = store.read_all(ORDERS_TABLE).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][COL_ORDER_ID], json!("ORD-1-1"));
        assert_eq!(rows[0]["سعر المنتجات"], json!(100));
        // Unsupplied fields default to the empty string.
        assert_eq!(rows[0]["العنوان"], json!(""));
    }

    #[test]
    fn find_row_scans_data_rows_only() {
        let store = store();
        let idx_id = store
            .column_index(ORDERS_TABLE, COL_ORDER_ID)
            .unwrap()
            .unwrap();
        // The header cell itself must never match.
        assert_eq!(
            store.find_row(ORDERS_TABLE, idx_id, COL_ORDER_ID).unwrap(),
            None
        );

        for id in ["ORD-1-1", "ORD-2-2"] {
            let mut record = Record::new();
            record.insert(COL_ORDER_ID.into(), json!(id));
            store.append_row(ORDERS_TABLE, &record).unwrap();
        }
        assert_eq!(
            store.find_row(ORDERS_TABLE, idx_id, "ORD-2-2").unwrap(),
            Some(1)
        );
        assert_eq!(
            store.find_row(ORDERS_TABLE, idx_id, "ORD-9-9").unwrap(),
            None
        );
    }

    #[test]
    fn cell_text_normalizes_numbers() {
        assert_eq!(cell_text(&json!(120)), "120");
        assert_eq!(cell_text(&json!(120.0)), "120");
        assert_eq!(cell_text(&json!(120.5)), "120.5");
        assert_eq!(cell_text(&Value::Null), "");
    }
}
