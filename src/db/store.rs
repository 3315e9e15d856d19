//! Storage capability
//!
//! The relay never talks to a database directly. Every read and write goes
//! through [`Store`], a key/value interface over flat BSON documents, so the
//! backend (DynamoDB, MongoDB, in-memory) is chosen by whoever builds the
//! relay.

use bson::Document;

use crate::types::Result;

/// A table and the attribute holding each record's key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Table {
    /// Table name
    pub name: &'static str,
    /// Name of the string attribute used as the record key
    pub key_attr: &'static str,
}

impl Table {
    pub const fn new(name: &'static str, key_attr: &'static str) -> Self {
        Self { name, key_attr }
    }
}

/// Key/value storage backend (allows swapping implementations)
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    /// Fetch a record by key; `None` when absent
    async fn get_record(&self, table: &Table, key: &str) -> Result<Option<Document>>;

    /// Insert or fully replace a record. The key is read from
    /// `record[table.key_attr]`.
    async fn put_record(&self, table: &Table, record: Document) -> Result<()>;

    /// Delete a record by key. Deleting an absent key succeeds.
    async fn delete_record(&self, table: &Table, key: &str) -> Result<()>;
}
