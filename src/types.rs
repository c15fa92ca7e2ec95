use crate::error::Error;
use crate::object::ObjectNode;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Everything a property can hold. `List`, `Object`, and `Function` are
/// shared by reference; cloning a `Value` never copies their contents.
#[derive(Clone, Debug)]
pub enum Value {
    Undefined,
    Boolean(bool),
    Number(f64),
    String(Rc<str>),
    Symbol(Symbol),
    List(Rc<RefCell<Vec<Value>>>),
    Object(ObjectNode),
    Function(NativeFn),
}

impl Value {
    pub fn string(s: &str) -> Self {
        Value::String(Rc::from(s))
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items)))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn as_object(&self) -> Option<&ObjectNode> {
        match self {
            Value::Object(node) => Some(node),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Symbol(s) => write!(f, "{s}"),
            Value::List(items) => write!(f, "[list of {}]", items.borrow().len()),
            Value::Object(_) => write!(f, "[object]"),
            Value::Function(func) => write!(f, "[function {}]", func.name()),
        }
    }
}

/// An opaque symbol key. Identity is the id alone: two symbols with the
/// same description are distinct unless interned through a registry.
#[derive(Clone, Debug)]
pub struct Symbol {
    pub id: u64,
    pub description: Option<Rc<str>>,
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Symbol) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(desc) => write!(f, "Symbol({desc})"),
            None => write!(f, "Symbol()"),
        }
    }
}

/// Mints fresh symbols and interns shared ones by string key, so that
/// independently-minted symbols never collide while registry lookups with
/// the same key always agree.
#[derive(Debug, Default)]
pub struct SymbolRegistry {
    shared: FxHashMap<String, Symbol>,
    next_id: u64,
}

impl SymbolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A brand-new symbol, never equal to any other.
    pub fn create(&mut self, description: Option<&str>) -> Symbol {
        let id = self.next_id;
        self.next_id += 1;
        Symbol {
            id,
            description: description.map(Rc::from),
        }
    }

    /// The shared symbol for `key`, minting it on first use.
    pub fn intern(&mut self, key: &str) -> Symbol {
        if let Some(sym) = self.shared.get(key) {
            return sym.clone();
        }
        let sym = self.create(Some(key));
        self.shared.insert(key.to_string(), sym.clone());
        sym
    }
}

/// A property key: a string or a symbol. The surrounding evaluator is
/// responsible for coercing anything else to a string before calling in.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    String(Rc<str>),
    Symbol(Symbol),
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        PropertyKey::String(Rc::from(s))
    }
}

impl From<Symbol> for PropertyKey {
    fn from(sym: Symbol) -> Self {
        PropertyKey::Symbol(sym)
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::String(s) => write!(f, "{s}"),
            PropertyKey::Symbol(sym) => write!(f, "{sym}"),
        }
    }
}

/// A host-supplied callable used for getters, setters, and plain function
/// values. The receiver is always passed explicitly as the first argument.
#[derive(Clone)]
pub struct NativeFn {
    name: Rc<str>,
    body: Rc<dyn Fn(&Value, &[Value]) -> Result<Value, Error>>,
}

impl NativeFn {
    pub fn new(
        name: &str,
        body: impl Fn(&Value, &[Value]) -> Result<Value, Error> + 'static,
    ) -> Self {
        Self {
            name: Rc::from(name),
            body: Rc::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, receiver: &Value, args: &[Value]) -> Result<Value, Error> {
        (self.body)(receiver, args)
    }

    pub fn ptr_eq(&self, other: &NativeFn) -> bool {
        Rc::ptr_eq(&self.body, &other.body)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFn({:?})", self.name)
    }
}
