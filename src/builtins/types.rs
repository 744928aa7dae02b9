//! Type predicates: `number?`, `function?`, `list?`, `symbol?`, `boolean?`,
//! `macro?`, `error?`
//!
//! `error?` is the only way a program can observe an error value without
//! propagating it, since every other step passes errors through unchanged.

use super::{arity_error, define_builtin};
use crate::eval::Interp;
use crate::heap::{ObjKind, ValueId};

fn predicate(interp: &mut Interp, name: &str, args: &[ValueId], kind: ObjKind) -> ValueId {
    if args.len() != 1 {
        return arity_error(interp, name, "1", args.len());
    }
    interp.bool_value(interp.heap.kind(args[0]) == kind)
}

pub fn builtin_is_number(interp: &mut Interp, args: &[ValueId]) -> ValueId {
    predicate(interp, "number?", args, ObjKind::Number)
}

pub fn builtin_is_function(interp: &mut Interp, args: &[ValueId]) -> ValueId {
    predicate(interp, "function?", args, ObjKind::Function)
}

pub fn builtin_is_list(interp: &mut Interp, args: &[ValueId]) -> ValueId {
    predicate(interp, "list?", args, ObjKind::Cell)
}

pub fn builtin_is_symbol(interp: &mut Interp, args: &[ValueId]) -> ValueId {
    predicate(interp, "symbol?", args, ObjKind::Symbol)
}

pub fn builtin_is_boolean(interp: &mut Interp, args: &[ValueId]) -> ValueId {
    predicate(interp, "boolean?", args, ObjKind::Bool)
}

pub fn builtin_is_macro(interp: &mut Interp, args: &[ValueId]) -> ValueId {
    predicate(interp, "macro?", args, ObjKind::Macro)
}

pub fn builtin_is_error(interp: &mut Interp, args: &[ValueId]) -> ValueId {
    predicate(interp, "error?", args, ObjKind::Error)
}

pub fn register(interp: &mut Interp) {
    define_builtin(interp, "number?", builtin_is_number);
    define_builtin(interp, "function?", builtin_is_function);
    define_builtin(interp, "list?", builtin_is_list);
    define_builtin(interp, "symbol?", builtin_is_symbol);
    define_builtin(interp, "boolean?", builtin_is_boolean);
    define_builtin(interp, "macro?", builtin_is_macro);
    define_builtin(interp, "error?", builtin_is_error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::Object;
    use crate::number::Number;

    fn truth(interp: &Interp, id: ValueId) -> bool {
        matches!(interp.heap.get(id), Object::Bool(true))
    }

    #[test]
    fn test_predicates_match_their_kind() {
        let mut interp = Interp::new();
        let num = interp.number(Number::Int(1));
        let sym = interp.symbol("s");
        let list = interp.empty_list();
        let t = interp.bool_value(true);

        let r = builtin_is_number(&mut interp, &[num]);
        assert!(truth(&interp, r));
        let r = builtin_is_number(&mut interp, &[sym]);
        assert!(!truth(&interp, r));
        let r = builtin_is_symbol(&mut interp, &[sym]);
        assert!(truth(&interp, r));
        let r = builtin_is_list(&mut interp, &[list]);
        assert!(truth(&interp, r));
        let r = builtin_is_boolean(&mut interp, &[t]);
        assert!(truth(&interp, r));
        let r = builtin_is_error(&mut interp, &[num]);
        assert!(!truth(&interp, r));
    }

    #[test]
    fn test_error_predicate_observes_error_values() {
        let mut interp = Interp::new();
        let err = interp.error("boom", None);
        let r = builtin_is_error(&mut interp, &[err]);
        assert!(truth(&interp, r));
    }
}
