use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result, bail};
use serde_json::Value;

/// One sheet: row 0 is the header, everything below is data.
type Grid = Vec<Vec<Value>>;

/// The spreadsheet analog: a named set of sheets behind one lock, optionally
/// mirrored to a JSON file after every mutation. Cloning shares the same book.
#[derive(Clone)]
pub struct Workbook {
    sheets: Arc<Mutex<BTreeMap<String, Grid>>>,
    path: Option<Arc<PathBuf>>,
}

impl Workbook {
    pub fn in_memory() -> Self {
        Self {
            sheets: Arc::new(Mutex::new(BTreeMap::new())),
            path: None,
        }
    }

    /// Open a file-backed workbook, loading existing sheets when the file is
    /// already there.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let sheets = if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("reading workbook {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("parsing workbook {}", path.display()))?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            sheets: Arc::new(Mutex::new(sheets)),
            path: Some(Arc::new(path)),
        })
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Grid>> {
        self.sheets.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, sheets: &BTreeMap<String, Grid>) -> Result<()> {
        if let Some(path) = &self.path {
            let raw = serde_json::to_string_pretty(sheets)?;
            fs::write(path.as_ref(), raw)
                .with_context(|| format!("writing workbook {}", path.display()))?;
        }
        Ok(())
    }

    pub fn has_sheet(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    /// Create a sheet with the given header row. No-op when it already exists.
    pub fn insert_sheet(&self, name: &str, header: Vec<Value>) -> Result<()> {
        let mut sheets = self.lock();
        if !sheets.contains_key(name) {
            sheets.insert(name.to_string(), vec![header]);
            self.persist(&sheets)?;
        }
        Ok(())
    }

    pub fn sheet_rows(&self, name: &str) -> Result<Grid> {
        match self.lock().get(name) {
            Some(grid) => Ok(grid.clone()),
            None => bail!("no such sheet: {name}"),
        }
    }

    pub fn append_row(&self, name: &str, row: Vec<Value>) -> Result<()> {
        let mut sheets = self.lock();
        match sheets.get_mut(name) {
            Some(grid) => grid.push(row),
            None => bail!("no such sheet: {name}"),
        }
        self.persist(&sheets)
    }

    pub fn set_row(&self, name: &str, row_idx: usize, row: Vec<Value>) -> Result<()> {
        let mut sheets = self.lock();
        match sheets.get_mut(name) {
            Some(grid) if row_idx < grid.len() => grid[row_idx] = row,
            Some(_) => bail!("row {row_idx} out of range in sheet {name}"),
            None => bail!("no such sheet: {name}"),
        }
        self.persist(&sheets)
    }

    pub fn set_cell(&self, name: &str, row_idx: usize, col_idx: usize, value: Value) -> Result<()> {
        let mut sheets = self.lock();
        match sheets.get_mut(name) {
            Some(grid) if row_idx < grid.len() => {
                let row = &mut grid[row_idx];
                if row.len() <= col_idx {
                    row.resize(col_idx + 1, Value::String(String::new()));
                }
                row[col_idx] = value;
            }
            Some(_) => bail!("row {row_idx} out of range in sheet {name}"),
            None => bail!("no such sheet: {name}"),
        }
        self.persist(&sheets)
    }

    /// Physically removes a row; rows below shift up by one.
    pub fn remove_row(&self, name: &str, row_idx: usize) -> Result<()> {
        let mut sheets = self.lock();
        match sheets.get_mut(name) {
            Some(grid) if row_idx < grid.len() => {
                grid.remove(row_idx);
            }
            Some(_) => bail!("row {row_idx} out of range in sheet {name}"),
            None => bail!("no such sheet: {name}"),
        }
        self.persist(&sheets)
    }
}
