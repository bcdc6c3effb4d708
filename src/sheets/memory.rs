//! In-memory data source for tests.

use super::{DataSource, SheetError};
use crate::models::Table;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct MemorySheet {
    values: Mutex<Vec<Vec<String>>>,
    pub updates: Mutex<Vec<(String, Vec<String>)>>,
    pub deletes: Mutex<Vec<usize>>,
}

impl MemorySheet {
    pub fn new(values: &[&[&str]]) -> Self {
        let values = values
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect();
        Self {
            values: Mutex::new(values),
            ..Self::default()
        }
    }

    pub fn values(&self) -> Vec<Vec<String>> {
        self.values.lock().unwrap().clone()
    }
}

impl DataSource for MemorySheet {
    async fn fetch_all(&self) -> Result<Table, SheetError> {
        Ok(Table::from_values(self.values()))
    }

    async fn update_row(&self, range: &str, values: Vec<String>) -> Result<(), SheetError> {
        self.updates
            .lock()
            .unwrap()
            .push((range.to_string(), values));
        Ok(())
    }

    async fn delete_row(&self, sheet_row: usize) -> Result<(), SheetError> {
        let mut values = self.values.lock().unwrap();
        if sheet_row == 0 || sheet_row > values.len() {
            return Err(SheetError::Malformed(format!("row {} out of range", sheet_row)));
        }
        values.remove(sheet_row - 1);
        self.deletes.lock().unwrap().push(sheet_row);
        Ok(())
    }
}
