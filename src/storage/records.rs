use std::collections::HashMap;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::storage::{error::StoreError, store::KeyValueStore};

// Values under a record key are JSON objects: { "<entity id>": <record>, ... }.
// Anything that does not parse is treated as absent.

fn read_raw(store: &dyn KeyValueStore, key: &str) -> HashMap<String, Value> {
    store
        .get(key)
        .and_then(|raw| serde_json::from_str::<HashMap<String, Value>>(&raw).ok())
        .unwrap_or_default()
}

/// All well-formed records under `key`. Malformed entries are skipped.
pub fn read_records<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> HashMap<String, T> {
    read_raw(store, key)
        .into_iter()
        .filter_map(|(id, value)| serde_json::from_value(value).ok().map(|r| (id, r)))
        .collect()
}

pub fn read_record<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
    entity_id: &str,
) -> Option<T> {
    let value = read_raw(store, key).remove(entity_id)?;
    serde_json::from_value(value).ok()
}

pub fn read_record_or<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
    entity_id: &str,
    default: T,
) -> T {
    read_record(store, key, entity_id).unwrap_or(default)
}

/// Insert or replace one record, keeping every other entry under `key`.
pub fn write_record<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    entity_id: &str,
    record: &T,
) -> Result<(), StoreError> {
    let value = serde_json::to_value(record).map_err(|source| StoreError::Serialize {
        key: format!("{}/{}", key, entity_id),
        source,
    })?;

    let mut all = read_raw(store, key);
    all.insert(entity_id.to_string(), value);

    let json = serde_json::to_string(&all).map_err(|source| StoreError::Serialize {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &json)
}
