use std::collections::HashMap;

/// A typed value held by the [`Store`].
///
/// Numeric entries keep the text they were set from next to the parsed value. Replies echo
/// `raw`, so `5.40` reads back as `5.40`; arithmetic works on `value`.
///
/// `Null` never lives inside the map: it is what a lookup yields when the key is absent, so a
/// deleted key and a key that never existed look the same to readers.
#[derive(Clone, Debug, PartialEq)]
pub enum Entry {
    Integer { value: i64, raw: String },
    Double { value: f64, raw: String },
    Boolean(bool),
    String(String),
    Null,
}

impl Entry {
    /// An integer entry whose text is the canonical decimal form of `value`.
    pub fn integer(value: i64) -> Entry {
        Entry::Integer {
            value,
            raw: value.to_string(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Entry::Null)
    }
}

/// The Store maps keys to typed entries. It has a single owner, the execution engine worker,
/// so there is no locking of any kind in here.
#[derive(Debug, Default)]
pub struct Store {
    entries: HashMap<String, Entry>,
}

impl Store {
    pub fn new() -> Store {
        Store {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Entry {
        self.entries.get(key).cloned().unwrap_or(Entry::Null)
    }

    /// Last write wins. Storing `Entry::Null` is equivalent to removing the key.
    pub fn set(&mut self, key: String, entry: Entry) {
        if entry.is_null() {
            self.entries.remove(&key);
            return;
        }
        self.entries.insert(key, entry);
    }

    pub fn remove(&mut self, key: &str) -> Option<Entry> {
        self.entries.remove(key)
    }
}
