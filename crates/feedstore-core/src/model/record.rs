use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Change-tracked column map
///
/// Holds two snapshots: `persisted` (as loaded or last saved) and `current`
/// (as mutated by setters). A column is dirty when the two disagree, so the
/// dirty set always reflects the net difference, not the history of writes.
///
/// Both snapshots are ordered maps; INSERT and UPDATE statements built from
/// a record list their columns in the same order every time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    persisted: BTreeMap<String, String>,
    current: BTreeMap<String, String>,
}

impl Record {
    /// Create an empty record
    ///
    /// Every column set afterwards is dirty until `mark_clean` is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a clean record from data loaded out of storage
    pub fn from_existing<I, K, V>(data: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut record = Self::new();
        for (column, value) in data {
            record.set(column, value);
        }
        record.mark_clean();
        record
    }

    /// Current value of a column, or `""` if it was never set
    pub fn get(&self, column: &str) -> &str {
        self.current.get(column).map(String::as_str).unwrap_or("")
    }

    /// Value of a column as of the last persist, if any
    pub fn persisted_value(&self, column: &str) -> Option<&str> {
        self.persisted.get(column).map(String::as_str)
    }

    /// Update a column in the current snapshot
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.current.insert(column.into(), value.into());
        self
    }

    /// Full current snapshot
    pub fn data(&self) -> &BTreeMap<String, String> {
        &self.current
    }

    /// Only the columns whose current value differs from the persisted one
    pub fn data_changed(&self) -> BTreeMap<String, String> {
        self.current
            .iter()
            .filter(|(column, value)| self.persisted.get(*column) != Some(*value))
            .map(|(column, value)| (column.clone(), value.clone()))
            .collect()
    }

    /// Names of the dirty columns, sorted
    pub fn dirty_columns(&self) -> Vec<&str> {
        self.current
            .iter()
            .filter(|(column, value)| self.persisted.get(*column) != Some(*value))
            .map(|(column, _)| column.as_str())
            .collect()
    }

    pub fn is_column_dirty(&self, column: &str) -> bool {
        match self.current.get(column) {
            Some(value) => self.persisted.get(column) != Some(value),
            None => false,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.current
            .iter()
            .any(|(column, value)| self.persisted.get(column) != Some(value))
    }

    /// Collapse current into persisted; the dirty set becomes empty
    pub fn mark_clean(&mut self) {
        self.persisted = self.current.clone();
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.current.serialize(serializer)
    }
}
