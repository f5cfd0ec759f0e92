//! Group table: maps a group name to its recipient email address.
//!
//! The table is a delimited text file (semicolon by default) with a header
//! row naming at least the `Name` and `Email` columns. It is loaded once at
//! startup and read-only for the run.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Default column delimiter.
pub const DEFAULT_DELIMITER: char = ';';

/// One row of the group table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRecord {
    /// Group name, matched exactly against derived file group names.
    pub name: String,
    /// Recipient email address.
    pub email: String,
}

/// In-memory group table.
#[derive(Debug, Clone, Default)]
pub struct GroupTable {
    records: Vec<GroupRecord>,
}

impl GroupTable {
    /// Loads a table using the default `;` delimiter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, or
    /// [`Error::Table`] if the header row is missing or lacks the `Name`
    /// or `Email` column.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_delimiter(path, DEFAULT_DELIMITER)
    }

    /// Loads a table with an explicit delimiter.
    ///
    /// # Errors
    ///
    /// Same as [`GroupTable::load`].
    pub fn load_with_delimiter(path: impl AsRef<Path>, delimiter: char) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let table = Self::parse(&content, delimiter)?;
        debug!(path = %path.display(), groups = table.len(), "Loaded group table");
        Ok(table)
    }

    /// Parses table content. Exposed for tests.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Table`] if the header row is missing or lacks a
    /// required column.
    pub fn parse(content: &str, delimiter: char) -> Result<Self> {
        let mut lines = content.lines();

        let header = lines
            .next()
            .ok_or_else(|| Error::Table("Empty table file".to_string()))?;
        let columns: Vec<&str> = header.split(delimiter).map(str::trim).collect();

        let name_idx = columns
            .iter()
            .position(|c| *c == "Name")
            .ok_or_else(|| Error::Table("Missing 'Name' column".to_string()))?;
        let email_idx = columns
            .iter()
            .position(|c| *c == "Email")
            .ok_or_else(|| Error::Table("Missing 'Email' column".to_string()))?;

        let mut records = Vec::new();
        for (line_no, line) in lines.enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(delimiter).map(str::trim).collect();
            let Some(name) = fields.get(name_idx) else {
                warn!(line = line_no + 2, "Skipping short table row");
                continue;
            };
            let Some(email) = fields.get(email_idx) else {
                warn!(line = line_no + 2, "Skipping short table row");
                continue;
            };

            records.push(GroupRecord {
                name: (*name).to_string(),
                email: (*email).to_string(),
            });
        }

        Ok(Self { records })
    }

    /// Looks up the email address for a group name.
    ///
    /// Exact match over the `name` field; the first matching row wins.
    /// `None` is the distinct not-found signal — the caller decides the
    /// policy for a miss.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.records
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.email.as_str())
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
