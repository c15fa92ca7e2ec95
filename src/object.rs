use crate::error::Error;
use crate::property::{PropertyRecord, PropertyTable};
use crate::types::PropertyKey;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;
use tracing::debug;

struct ObjectData {
    table: PropertyTable,
    delegate: Option<ObjectNode>,
}

/// A cheap-clone handle to one object: its own property table plus an
/// optional delegate link used for lookup fallback. The link is shared by
/// reference: many descendants may delegate to the same node, and a node
/// stays alive while any handle or delegate link still reaches it.
#[derive(Clone)]
pub struct ObjectNode(Rc<RefCell<ObjectData>>);

impl ObjectNode {
    /// A bare node: empty table, no delegate.
    pub fn new() -> Self {
        ObjectNode(Rc::new(RefCell::new(ObjectData {
            table: PropertyTable::new(),
            delegate: None,
        })))
    }

    /// A fresh node already linked to `template`.
    pub fn with_delegate(template: &ObjectNode) -> Result<Self, Error> {
        let node = Self::new();
        node.set_delegate(Some(template))?;
        Ok(node)
    }

    /// Object identity. Two handles are the same object iff they share
    /// storage; property contents never enter into it.
    pub fn ptr_eq(&self, other: &ObjectNode) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn delegate(&self) -> Option<ObjectNode> {
        self.0.borrow().delegate.clone()
    }

    /// Relinks (or clears) the delegate. Rejected with `Error::Cycle` when
    /// `delegate` is this node or already reaches it transitively; the
    /// existing link is untouched on failure.
    pub fn set_delegate(&self, delegate: Option<&ObjectNode>) -> Result<(), Error> {
        if let Some(candidate) = delegate {
            let mut cursor = Some(candidate.clone());
            while let Some(node) = cursor {
                if node.ptr_eq(self) {
                    return Err(Error::Cycle);
                }
                cursor = node.delegate();
            }
        }
        debug!(node = ?self, cleared = delegate.is_none(), "relinking delegate");
        self.0.borrow_mut().delegate = delegate.cloned();
        Ok(())
    }

    /// Defines or replaces an own record, bypassing the delegation-aware
    /// write path. Same non-configurable guards as the table itself.
    pub fn define_own(&self, key: PropertyKey, record: PropertyRecord) -> Result<(), Error> {
        self.table_mut().set_own(key, record)
    }

    /// Own keys in insertion order.
    pub fn own_keys(&self) -> Vec<PropertyKey> {
        self.table().keys_in_order().cloned().collect()
    }

    pub(crate) fn table(&self) -> Ref<'_, PropertyTable> {
        Ref::map(self.0.borrow(), |data| &data.table)
    }

    pub(crate) fn table_mut(&self) -> RefMut<'_, PropertyTable> {
        RefMut::map(self.0.borrow_mut(), |data| &mut data.table)
    }
}

impl Default for ObjectNode {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ObjectNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectNode({:p})", Rc::as_ptr(&self.0))
    }
}
