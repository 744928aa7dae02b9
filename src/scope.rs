// ABOUTME: Ordered name-to-value scopes and the closure merge used at definition sites

use crate::heap::ValueId;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

/// A shared, mutable scope. Scopes hold identifiers, never payloads, which
/// is what lets closures, lists, and scopes form cycles without any extra
/// bookkeeping: the heap is the only resolver.
pub type ScopeRef = Rc<RefCell<Scope>>;

/// An ordered mapping from identifier name to value identifier. Definition
/// order is preserved; it matters when scopes are merged into a closure.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    vars: IndexMap<String, ValueId>,
}

impl Scope {
    pub fn new() -> Self {
        Scope::default()
    }

    pub fn shared(self) -> ScopeRef {
        Rc::new(RefCell::new(self))
    }

    pub fn lookup(&self, name: &str) -> Option<ValueId> {
        self.vars.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Bind a name in this scope, keeping its original position if the name
    /// was already present.
    pub fn define(&mut self, name: impl Into<String>, id: ValueId) {
        self.vars.insert(name.into(), id);
    }

    /// Update an existing binding. Returns false when the name is absent.
    pub fn update(&mut self, name: &str, id: ValueId) -> bool {
        match self.vars.get_mut(name) {
            Some(slot) => {
                *slot = id;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Snapshot of `function ∪ local` taken when a callable is defined.
    /// Local bindings shadow function-scope bindings on collision.
    pub fn merged(function: &Scope, local: Option<&Scope>) -> Scope {
        let mut out = Scope::new();
        for (name, id) in &function.vars {
            out.vars.insert(name.clone(), *id);
        }
        if let Some(local) = local {
            for (name, id) in &local.vars {
                out.vars.insert(name.clone(), *id);
            }
        }
        out
    }
}
