use crate::error::Error;
use crate::object::ObjectNode;
use crate::property::PropertyRecord;
use crate::types::{PropertyKey, Value};
use rustc_hash::FxHashSet;
use tracing::trace;

/// What happens when a write or removal hits a non-writable or
/// non-configurable record. Lenient silently drops the operation; Strict
/// surfaces `Error::Configuration`. Reads are soft under both policies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WritePolicy {
    #[default]
    Lenient,
    Strict,
}

/// The chain-walking accessors. All delegation-aware reads, writes, and
/// removals on an [`ObjectNode`] go through here; the node API itself never
/// reaches across the chain.
#[derive(Clone, Copy, Debug, Default)]
pub struct Resolver {
    pub policy: WritePolicy,
}

impl Resolver {
    pub fn new(policy: WritePolicy) -> Self {
        Resolver { policy }
    }

    /// Finds the record for `key` starting at `node`'s own table and
    /// following delegate links, returning the record together with the
    /// node that owns it. The walk terminates because chains are acyclic
    /// by construction.
    pub fn resolve(
        &self,
        node: &ObjectNode,
        key: &PropertyKey,
    ) -> Option<(PropertyRecord, ObjectNode)> {
        let mut cursor = node.clone();
        loop {
            let found = cursor.table().get_own(key).cloned();
            if let Some(record) = found {
                trace!(key = %key, owner = ?cursor, "resolved");
                return Some((record, cursor));
            }
            match cursor.delegate() {
                Some(next) => cursor = next,
                None => return None,
            }
        }
    }

    /// Reads `key` through the chain. A getter found anywhere is invoked
    /// with the *original* `receiver`, not the node that owns the accessor.
    /// Absent keys and getter-less accessors both read as `Undefined`.
    pub fn read(
        &self,
        node: &ObjectNode,
        key: &PropertyKey,
        receiver: &Value,
    ) -> Result<Value, Error> {
        match self.resolve(node, key) {
            Some((PropertyRecord::Accessor { get: Some(getter), .. }, _)) => {
                getter.call(receiver, &[])
            }
            Some((PropertyRecord::Accessor { get: None, .. }, _)) => Ok(Value::Undefined),
            Some((PropertyRecord::Data { value, .. }, _)) => Ok(value),
            None => Ok(Value::Undefined),
        }
    }

    /// Reads `key` with `node` itself as the receiver.
    pub fn get(&self, node: &ObjectNode, key: &PropertyKey) -> Result<Value, Error> {
        self.read(node, key, &Value::Object(node.clone()))
    }

    /// Writes `key` on `node`. A setter found anywhere in the chain is
    /// invoked with `node` as receiver. A writable data record updates in
    /// place when local, and is shadowed by a fresh local default record
    /// when owned by a delegate; delegate tables are never mutated by a
    /// descendant's write. Non-writable records and setter-less accessors
    /// follow the policy; an unresolved key becomes a local default record.
    pub fn write(&self, node: &ObjectNode, key: &PropertyKey, value: Value) -> Result<(), Error> {
        match self.resolve(node, key) {
            Some((PropertyRecord::Accessor { set: Some(setter), .. }, _)) => setter
                .call(&Value::Object(node.clone()), &[value])
                .map(|_| ()),
            Some((PropertyRecord::Accessor { set: None, .. }, _)) => self.reject_write(key),
            Some((PropertyRecord::Data { writable: false, .. }, _)) => self.reject_write(key),
            Some((PropertyRecord::Data { .. }, owner)) => {
                if owner.ptr_eq(node) {
                    node.table_mut().update_value(key, value);
                } else {
                    trace!(key = %key, "shadowing delegated record");
                    node.table_mut()
                        .set_own(key.clone(), PropertyRecord::data_default(value))?;
                }
                Ok(())
            }
            None => node
                .table_mut()
                .set_own(key.clone(), PropertyRecord::data_default(value)),
        }
    }

    /// Removes `key` from `node`'s own table only. Removal never reaches
    /// through the chain: deleting a shadow re-exposes the delegate's
    /// record, it does not touch it. Under Strict, a present
    /// non-configurable record errors instead of returning `false`.
    pub fn remove(&self, node: &ObjectNode, key: &PropertyKey) -> Result<bool, Error> {
        let mut table = node.table_mut();
        if self.policy == WritePolicy::Strict
            && table.get_own(key).is_some_and(|r| !r.configurable())
        {
            return Err(Error::Configuration { key: key.clone() });
        }
        Ok(table.delete_own(key))
    }

    /// Membership across the whole chain, own or delegated.
    pub fn has(&self, node: &ObjectNode, key: &PropertyKey) -> bool {
        self.resolve(node, key).is_some()
    }

    /// Membership in `node`'s own table only.
    pub fn has_own(&self, node: &ObjectNode, key: &PropertyKey) -> bool {
        node.table().contains(key)
    }

    /// Enumerable keys across the chain: own keys first in insertion order,
    /// then each delegate's, with shadowed names reported once.
    pub fn keys(&self, node: &ObjectNode) -> Vec<PropertyKey> {
        let mut seen = FxHashSet::default();
        let mut keys = Vec::new();
        let mut cursor = Some(node.clone());
        while let Some(current) = cursor {
            for key in current.table().enumerable_keys() {
                if seen.insert(key.clone()) {
                    keys.push(key);
                }
            }
            cursor = current.delegate();
        }
        keys
    }

    fn reject_write(&self, key: &PropertyKey) -> Result<(), Error> {
        match self.policy {
            WritePolicy::Lenient => Ok(()),
            WritePolicy::Strict => Err(Error::Configuration { key: key.clone() }),
        }
    }
}
