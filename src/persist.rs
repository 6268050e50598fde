use crate::storage::KeyValueStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Instant;

/// A value mirrored to one key of a [`KeyValueStore`].
///
/// The stored JSON is read once in [`Persisted::load`]; every later change is
/// written back in full. Read and write failures never reach the caller: a
/// bad read falls back to the initial value, a failed write leaves the
/// in-memory value authoritative.
pub struct Persisted<T> {
    store: Box<dyn KeyValueStore>,
    key: String,
    value: T,
    last_write: Option<Instant>,
}

impl<T> Persisted<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn load(store: Box<dyn KeyValueStore>, key: impl Into<String>, initial: T) -> Self {
        let key = key.into();
        let value = read_or(&*store, &key, initial);
        let mut cell = Persisted {
            store,
            key,
            value,
            last_write: None,
        };
        cell.write();
        cell
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn set(&mut self, value: T) {
        self.value = value;
        self.write();
    }

    pub fn update<F>(&mut self, f: F)
    where
        F: FnOnce(&mut T),
    {
        f(&mut self.value);
        self.write();
    }

    pub fn location(&self) -> String {
        self.store.describe(&self.key)
    }

    /// Time of the last write that reached the store.
    pub fn last_write(&self) -> Option<Instant> {
        self.last_write
    }

    #[cfg(test)]
    pub fn into_store(self) -> Box<dyn KeyValueStore> {
        self.store
    }

    fn write(&mut self) {
        let serialized = match serde_json::to_string(&self.value) {
            Ok(s) => s,
            Err(err) => {
                log::warn!("event=store_write status=skipped key={} reason={}", self.key, err);
                return;
            }
        };
        match self.store.set_item(&self.key, &serialized) {
            Ok(()) => {
                self.last_write = Some(Instant::now());
                log::debug!(
                    "event=store_write status=ok key={} bytes={}",
                    self.key,
                    serialized.len()
                );
            }
            Err(err) => {
                log::warn!("event=store_write status=failed key={} reason={}", self.key, err);
            }
        }
    }
}

fn read_or<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str, initial: T) -> T {
    let raw = match store.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return initial,
        Err(err) => {
            log::warn!("event=store_read status=failed key={} reason={}", key, err);
            return initial;
        }
    };
    match serde_json::from_str::<Option<T>>(&raw) {
        Ok(Some(value)) => value,
        Ok(None) => initial,
        Err(err) => {
            log::warn!("event=store_read status=invalid key={} reason={}", key, err);
            initial
        }
    }
}
