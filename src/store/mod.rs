mod filter;
mod http;
mod memory;
mod table;

pub use filter::{FilterSpec, SortDir, WireQuery, PAGE_LIMIT, REFERENCE_PAGE_LIMIT};
pub use http::HttpStore;
pub use memory::MemoryStore;
pub use table::{Table, TableClient};

use async_trait::async_trait;

use crate::error::StoreError;

/// A record as it travels on the wire: a flat JSON object.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// The gateway contract against the hosted tabular store. One logical
/// table per entity; every operation round-trips to the server and can
/// fail. No retries happen at this level.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn fetch_records(&self, table: &str, query: &WireQuery)
        -> Result<Vec<Fields>, StoreError>;

    async fn get_record(&self, table: &str, id: &str) -> Result<Fields, StoreError>;

    async fn create_record(&self, table: &str, fields: Fields) -> Result<Fields, StoreError>;

    async fn update_record(
        &self,
        table: &str,
        id: &str,
        fields: Fields,
    ) -> Result<Fields, StoreError>;

    /// Returns whether the record was actually removed.
    async fn delete_record(&self, table: &str, id: &str) -> Result<bool, StoreError>;
}
