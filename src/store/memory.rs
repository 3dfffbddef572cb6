use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::{Fields, RecordStore, WireQuery};

/// In-process record store with the same filter/sort/paging semantics as
/// the hosted one. Backs the integration tests and offline demos; it also
/// counts operations and remembers the last update payload so tests can
/// assert exactly what went over the gateway.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, Vec<Fields>>>,
    ops: AtomicU64,
    last_update: Mutex<Option<(String, Fields)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts rows as given; callers supply their own `Id` values.
    pub fn seed(&self, table: &str, rows: Vec<Fields>) {
        let mut tables = self.tables.lock().unwrap();
        tables.entry(table.to_string()).or_default().extend(rows);
    }

    /// Number of store operations performed so far, across all tables.
    pub fn op_count(&self) -> u64 {
        self.ops.load(AtomicOrdering::SeqCst)
    }

    /// Record id and payload of the most recent update call.
    pub fn last_update(&self) -> Option<(String, Fields)> {
        self.last_update.lock().unwrap().clone()
    }

    pub fn rows(&self, table: &str) -> Vec<Fields> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    fn bump(&self) {
        self.ops.fetch_add(1, AtomicOrdering::SeqCst);
    }
}

fn field_text(row: &Fields, field: &str) -> String {
    match row.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

fn matches(row: &Fields, query: &WireQuery) -> bool {
    // All exact-match conditions must hold.
    for cond in &query.where_ {
        let text = field_text(row, &cond.field_name);
        if !cond.values.iter().any(|v| *v == text) {
            return false;
        }
    }

    // Each group is an OR over its substring conditions.
    for group in &query.where_groups {
        let hit = group.sub_groups.iter().any(|sub| {
            sub.conditions.iter().any(|cond| {
                let text = field_text(row, &cond.field_name).to_lowercase();
                cond.values
                    .iter()
                    .any(|term| text.contains(&term.to_lowercase()))
            })
        });
        if !hit {
            return false;
        }
    }

    true
}

fn sort_rows(rows: &mut [Fields], query: &WireQuery) {
    rows.sort_by(|a, b| {
        for order in &query.order_by {
            let ord = field_text(a, &order.field_name).cmp(&field_text(b, &order.field_name));
            let ord = if order.sort_type == "DESC" {
                ord.reverse()
            } else {
                ord
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn fetch_records(
        &self,
        table: &str,
        query: &WireQuery,
    ) -> Result<Vec<Fields>, StoreError> {
        self.bump();
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<Fields> = tables
            .get(table)
            .map(|rows| rows.iter().filter(|r| matches(r, query)).cloned().collect())
            .unwrap_or_default();
        sort_rows(&mut rows, query);
        Ok(rows
            .into_iter()
            .skip(query.paging.offset as usize)
            .take(query.paging.limit as usize)
            .collect())
    }

    async fn get_record(&self, table: &str, id: &str) -> Result<Fields, StoreError> {
        self.bump();
        let tables = self.tables.lock().unwrap();
        tables
            .get(table)
            .and_then(|rows| rows.iter().find(|r| field_text(r, "Id") == id))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create_record(&self, table: &str, mut fields: Fields) -> Result<Fields, StoreError> {
        self.bump();
        let now = Utc::now().to_rfc3339();
        fields.insert("Id".to_string(), Value::String(Uuid::new_v4().to_string()));
        fields.insert("CreatedOn".to_string(), Value::String(now.clone()));
        fields.insert("ModifiedOn".to_string(), Value::String(now));
        let mut tables = self.tables.lock().unwrap();
        tables
            .entry(table.to_string())
            .or_default()
            .push(fields.clone());
        Ok(fields)
    }

    async fn update_record(
        &self,
        table: &str,
        id: &str,
        fields: Fields,
    ) -> Result<Fields, StoreError> {
        self.bump();
        *self.last_update.lock().unwrap() = Some((id.to_string(), fields.clone()));
        let mut tables = self.tables.lock().unwrap();
        let rows = tables.get_mut(table).ok_or(StoreError::NotFound)?;
        let row = rows
            .iter_mut()
            .find(|r| field_text(r, "Id") == id)
            .ok_or(StoreError::NotFound)?;
        for (key, value) in fields {
            row.insert(key, value);
        }
        row.insert(
            "ModifiedOn".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        Ok(row.clone())
    }

    async fn delete_record(&self, table: &str, id: &str) -> Result<bool, StoreError> {
        self.bump();
        let mut tables = self.tables.lock().unwrap();
        let Some(rows) = tables.get_mut(table) else {
            return Ok(false);
        };
        let before = rows.len();
        rows.retain(|r| field_text(r, "Id") != id);
        Ok(rows.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FilterSpec, SortDir};

    fn row(id: &str, name: &str, status: &str, date: &str, time: &str) -> Fields {
        serde_json::json!({
            "Id": id,
            "Name": name,
            "status": status,
            "date": date,
            "time": time,
        })
        .as_object()
        .unwrap()
        .clone()
    }

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store.seed(
            "appointment",
            vec![
                row("a1", "Blood pressure check", "scheduled", "2023-09-19", "09:30"),
                row("a2", "Headache consultation", "completed", "2023-09-18", "10:15"),
                row("a3", "Knee assessment", "scheduled", "2023-09-18", "14:00"),
            ],
        );
        store
    }

    #[tokio::test]
    async fn exact_match_and_sort() {
        let store = seeded();
        let wire = FilterSpec::new()
            .eq("status", "scheduled")
            .order_by("date", SortDir::Asc)
            .order_by("time", SortDir::Asc)
            .to_wire(&["Id"]);
        let rows = store.fetch_records("appointment", &wire).await.unwrap();
        let ids: Vec<String> = rows.iter().map(|r| field_text(r, "Id")).collect();
        assert_eq!(ids, vec!["a3", "a1"]);
    }

    #[tokio::test]
    async fn contains_is_case_insensitive_or() {
        let store = seeded();
        let wire = FilterSpec::new()
            .contains_any(&["Name", "status"], "KNEE")
            .to_wire(&["Id"]);
        let rows = store.fetch_records("appointment", &wire).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(field_text(&rows[0], "Id"), "a3");
    }

    #[tokio::test]
    async fn paging_applies_after_sort() {
        let store = seeded();
        let wire = FilterSpec::new()
            .order_by("date", SortDir::Asc)
            .order_by("time", SortDir::Asc)
            .limit(1)
            .offset(1)
            .to_wire(&["Id"]);
        let rows = store.fetch_records("appointment", &wire).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(field_text(&rows[0], "Id"), "a3");
    }

    #[tokio::test]
    async fn create_assigns_id_and_audit_fields() {
        let store = MemoryStore::new();
        let created = store
            .create_record("patient", row("", "Jane Roe", "", "", ""))
            .await
            .unwrap();
        assert!(!field_text(&created, "Id").is_empty());
        assert!(created.contains_key("CreatedOn"));
        assert_eq!(store.rows("patient").len(), 1);
    }

    #[tokio::test]
    async fn delete_reports_whether_removed() {
        let store = seeded();
        assert!(store.delete_record("appointment", "a2").await.unwrap());
        assert!(!store.delete_record("appointment", "a2").await.unwrap());
        assert_eq!(store.rows("appointment").len(), 2);
    }
}
