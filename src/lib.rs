//! Prototype-delegation object/property runtime core.
//!
//! Objects are bare property tables. One object may delegate unresolved
//! lookups to another, forming an acyclic chain; local records shadow
//! delegated ones, writes copy-on-write onto the writing node, and removal
//! only ever un-shadows. The instantiation protocol allocates a node, links
//! it to a template, and runs a factory routine with the node as its
//! explicitly threaded receiver.
//!
//! The crate is the storage-and-lookup core only: a surrounding evaluator
//! owns syntax, key coercion, and the strict/lenient policy choice. The
//! object graph is single-threaded (`Rc`-based); multi-threaded hosts must
//! serialize access externally.

mod error;
mod instantiate;
mod object;
mod property;
mod resolver;
mod types;

pub use error::Error;
pub use instantiate::{Factory, instantiate};
pub use object::ObjectNode;
pub use property::{PropertyRecord, PropertyTable};
pub use resolver::{Resolver, WritePolicy};
pub use types::{NativeFn, PropertyKey, Symbol, SymbolRegistry, Value};
