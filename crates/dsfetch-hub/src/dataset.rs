use std::borrow::Cow;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::FetchError;

/// A structured dataset as loaded from the Hub: one entry per split.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub partitions: Vec<Partition>,
}

impl Dataset {
    /// Writes every partition to `<dir>/<partition>.csv` and returns the
    /// files written, in partition order.
    pub fn export_csv(&self, dir: &Path) -> Result<Vec<PathBuf>, FetchError> {
        let mut written = Vec::with_capacity(self.partitions.len());
        for partition in &self.partitions {
            let path = dir.join(format!("{}.csv", partition.name));
            partition.write_csv(&path)?;
            written.push(path);
        }
        Ok(written)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    pub name: String,
    pub columns: Vec<String>,
    /// One value per column, in column order.
    pub rows: Vec<Vec<Value>>,
}

impl Partition {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Header row, then one record per row. No index column.
    pub fn write_csv(&self, path: &Path) -> Result<(), FetchError> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_path(path)?;
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(|v| render_cell(v).into_owned()))?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Text form of a single cell. Booleans are spelled `True`/`False` to match
/// what the Hub's own tooling writes.
pub fn render_cell(value: &Value) -> Cow<'_, str> {
    match value {
        Value::Null => Cow::Borrowed(""),
        Value::Bool(true) => Cow::Borrowed("True"),
        Value::Bool(false) => Cow::Borrowed("False"),
        Value::String(s) => Cow::Borrowed(s),
        Value::Number(n) => Cow::Owned(n.to_string()),
        Value::Array(_) | Value::Object(_) => Cow::Owned(value.to_string()),
    }
}
