use crate::error::Error;
use crate::types::{NativeFn, PropertyKey, Value};
use rustc_hash::FxHashMap;

/// One property slot. Exactly one shape applies: a data record carrying a
/// value, or an accessor record carrying an optional getter/setter pair.
#[derive(Clone, Debug)]
pub enum PropertyRecord {
    Data {
        value: Value,
        writable: bool,
        enumerable: bool,
        configurable: bool,
    },
    Accessor {
        get: Option<NativeFn>,
        set: Option<NativeFn>,
        enumerable: bool,
        configurable: bool,
    },
}

impl PropertyRecord {
    pub fn data(value: Value, writable: bool, enumerable: bool, configurable: bool) -> Self {
        PropertyRecord::Data {
            value,
            writable,
            enumerable,
            configurable,
        }
    }

    /// A plain assignment result: writable, enumerable, configurable.
    pub fn data_default(value: Value) -> Self {
        Self::data(value, true, true, true)
    }

    pub fn accessor(
        get: Option<NativeFn>,
        set: Option<NativeFn>,
        enumerable: bool,
        configurable: bool,
    ) -> Self {
        PropertyRecord::Accessor {
            get,
            set,
            enumerable,
            configurable,
        }
    }

    pub fn is_data(&self) -> bool {
        matches!(self, PropertyRecord::Data { .. })
    }

    pub fn is_accessor(&self) -> bool {
        matches!(self, PropertyRecord::Accessor { .. })
    }

    pub fn enumerable(&self) -> bool {
        match self {
            PropertyRecord::Data { enumerable, .. }
            | PropertyRecord::Accessor { enumerable, .. } => *enumerable,
        }
    }

    pub fn configurable(&self) -> bool {
        match self {
            PropertyRecord::Data { configurable, .. }
            | PropertyRecord::Accessor { configurable, .. } => *configurable,
        }
    }

    /// Accessor records are never writable in the data sense.
    pub fn writable(&self) -> bool {
        matches!(self, PropertyRecord::Data { writable: true, .. })
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            PropertyRecord::Data { value, .. } => Some(value),
            PropertyRecord::Accessor { .. } => None,
        }
    }
}

/// Per-object ordered key/record mapping. Insertion order is observable:
/// enumeration walks keys in the order they were first inserted, and
/// deletion frees the slot entirely (a re-insert goes to the back).
#[derive(Debug, Default)]
pub struct PropertyTable {
    records: FxHashMap<PropertyKey, PropertyRecord>,
    order: Vec<PropertyKey>,
}

impl PropertyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_own(&self, key: &PropertyKey) -> Option<&PropertyRecord> {
        self.records.get(key)
    }

    pub fn contains(&self, key: &PropertyKey) -> bool {
        self.records.contains_key(key)
    }

    /// Inserts or overwrites the record for `key`. A non-configurable
    /// existing record only admits a value update of a writable data record
    /// with every attribute left intact; any attribute change or a
    /// data<->accessor reshape fails, and the table is untouched on failure.
    pub fn set_own(&mut self, key: PropertyKey, record: PropertyRecord) -> Result<(), Error> {
        match self.records.get(&key) {
            Some(current) if !current.configurable() => {
                if !Self::value_only_update(current, &record) {
                    return Err(Error::Configuration { key });
                }
            }
            Some(_) => {}
            None => self.order.push(key.clone()),
        }
        self.records.insert(key, record);
        Ok(())
    }

    fn value_only_update(current: &PropertyRecord, next: &PropertyRecord) -> bool {
        match (current, next) {
            (
                PropertyRecord::Data {
                    writable: true,
                    enumerable,
                    configurable,
                    ..
                },
                PropertyRecord::Data {
                    writable: next_writable,
                    enumerable: next_enumerable,
                    configurable: next_configurable,
                    ..
                },
            ) => {
                *next_writable
                    && next_enumerable == enumerable
                    && next_configurable == configurable
            }
            _ => false,
        }
    }

    /// Removes the record for `key`. Returns `false` when the key is absent
    /// and when the record is non-configurable; strict-policy escalation is
    /// the resolver's job, the table itself never errors on delete.
    pub fn delete_own(&mut self, key: &PropertyKey) -> bool {
        match self.records.get(key) {
            None => false,
            Some(record) if !record.configurable() => false,
            Some(_) => {
                self.records.remove(key);
                self.order.retain(|k| k != key);
                true
            }
        }
    }

    pub fn keys_in_order(&self) -> impl Iterator<Item = &PropertyKey> {
        self.order.iter()
    }

    /// Own enumerable keys in insertion order.
    pub fn enumerable_keys(&self) -> Vec<PropertyKey> {
        self.order
            .iter()
            .filter(|k| self.records.get(k).is_some_and(PropertyRecord::enumerable))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// In-place value update for the resolver's local-write fast path. The
    /// caller has already checked the record is writable data.
    pub(crate) fn update_value(&mut self, key: &PropertyKey, new_value: Value) {
        if let Some(PropertyRecord::Data { value, .. }) = self.records.get_mut(key) {
            *value = new_value;
        }
    }
}
