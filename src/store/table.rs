use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;
use crate::store::{Fields, FilterSpec, RecordStore};

/// Static schema of one hosted table. `Record` is the full row as read
/// back (server-managed fields included); `Draft` carries exactly the
/// writable subset, so create/update payloads cannot leak identity or
/// audit fields.
pub trait Table {
    const NAME: &'static str;
    const FIELDS: &'static [&'static str];
    type Record: DeserializeOwned + Send;
    type Draft: Serialize + Send + Sync;
}

/// Typed CRUD handle over one table of a [`RecordStore`].
pub struct TableClient<T: Table> {
    store: Arc<dyn RecordStore>,
    _table: PhantomData<T>,
}

impl<T: Table> Clone for TableClient<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _table: PhantomData,
        }
    }
}

impl<T: Table> TableClient<T> {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            _table: PhantomData,
        }
    }

    pub async fn list(&self, spec: &FilterSpec) -> Result<Vec<T::Record>, StoreError> {
        let rows = self
            .store
            .fetch_records(T::NAME, &spec.to_wire(T::FIELDS))
            .await?;
        rows.into_iter()
            .map(|row| {
                serde_json::from_value(serde_json::Value::Object(row)).map_err(StoreError::from)
            })
            .collect()
    }

    pub async fn get(&self, id: &str) -> Result<T::Record, StoreError> {
        let row = self.store.get_record(T::NAME, id).await?;
        serde_json::from_value(serde_json::Value::Object(row)).map_err(StoreError::from)
    }

    pub async fn create(&self, draft: &T::Draft) -> Result<T::Record, StoreError> {
        let row = self
            .store
            .create_record(T::NAME, draft_fields(draft)?)
            .await?;
        serde_json::from_value(serde_json::Value::Object(row)).map_err(StoreError::from)
    }

    pub async fn update(&self, id: &str, draft: &T::Draft) -> Result<T::Record, StoreError> {
        let row = self
            .store
            .update_record(T::NAME, id, draft_fields(draft)?)
            .await?;
        serde_json::from_value(serde_json::Value::Object(row)).map_err(StoreError::from)
    }

    pub async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        self.store.delete_record(T::NAME, id).await
    }
}

fn draft_fields<D: Serialize>(draft: &D) -> Result<Fields, StoreError> {
    match serde_json::to_value(draft)? {
        serde_json::Value::Object(fields) => Ok(fields),
        _ => Err(StoreError::Envelope("draft must serialize to an object")),
    }
}
