//! In-memory employee directory.

use std::collections::HashMap;

/// A stored employee record, keyed by short name in the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeRecord {
    pub full_name: String,
    pub id: i64,
    pub birthday: String,
}

/// Simulates a database of employee records.
#[derive(Debug, Clone)]
pub struct EmployeeDirectory {
    records: HashMap<String, EmployeeRecord>,
}

impl EmployeeDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// Create a directory pre-loaded with the canonical sample records.
    pub fn with_sample_data() -> Self {
        let mut dir = Self::new();
        dir.insert(
            "Tom",
            EmployeeRecord {
                full_name: "Thomas Anderson".to_string(),
                id: 1,
                birthday: "1999-03-31".to_string(),
            },
        );
        dir.insert(
            "Michelle",
            EmployeeRecord {
                full_name: "Michelle Yeoh".to_string(),
                id: 2,
                birthday: "1962-08-06".to_string(),
            },
        );
        dir.insert(
            "Sabrina",
            EmployeeRecord {
                full_name: "Sabrina Spellman".to_string(),
                id: 3,
                birthday: "1980-09-27".to_string(),
            },
        );
        dir
    }

    pub fn insert(&mut self, short_name: impl Into<String>, record: EmployeeRecord) {
        self.records.insert(short_name.into(), record);
    }

    pub fn lookup(&self, short_name: &str) -> Option<&EmployeeRecord> {
        self.records.get(short_name)
    }

    /// All short names, sorted so repeated listings are stable.
    pub fn short_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.records.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for EmployeeDirectory {
    fn default() -> Self {
        Self::with_sample_data()
    }
}
