//! Boolean operations: `&`, `|`, `xor`, `not`
//!
//! The folds take any number of booleans and do not short-circuit; every
//! argument was already evaluated by the time a builtin runs.

use super::{arity_error, bool_arg, define_builtin};
use crate::eval::Interp;
use crate::heap::ValueId;

fn fold(
    interp: &mut Interp,
    name: &str,
    args: &[ValueId],
    start: bool,
    combine: fn(bool, bool) -> bool,
) -> ValueId {
    if args.is_empty() {
        return arity_error(interp, name, "at least 1", args.len());
    }
    let mut acc = start;
    for index in 0..args.len() {
        match bool_arg(interp, name, args, index) {
            Ok(b) => acc = combine(acc, b),
            Err(error) => return error,
        }
    }
    interp.bool_value(acc)
}

pub fn builtin_and(interp: &mut Interp, args: &[ValueId]) -> ValueId {
    fold(interp, "&", args, true, |a, b| a && b)
}

pub fn builtin_or(interp: &mut Interp, args: &[ValueId]) -> ValueId {
    fold(interp, "|", args, false, |a, b| a || b)
}

pub fn builtin_xor(interp: &mut Interp, args: &[ValueId]) -> ValueId {
    fold(interp, "xor", args, false, |a, b| a != b)
}

pub fn builtin_not(interp: &mut Interp, args: &[ValueId]) -> ValueId {
    if args.len() != 1 {
        return arity_error(interp, "not", "1", args.len());
    }
    match bool_arg(interp, "not", args, 0) {
        Ok(b) => interp.bool_value(!b),
        Err(error) => error,
    }
}

pub fn register(interp: &mut Interp) {
    define_builtin(interp, "&", builtin_and);
    define_builtin(interp, "|", builtin_or);
    define_builtin(interp, "xor", builtin_xor);
    define_builtin(interp, "not", builtin_not);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::Object;

    fn truth(interp: &Interp, id: ValueId) -> bool {
        matches!(interp.heap.get(id), Object::Bool(true))
    }

    #[test]
    fn test_and_or_xor_folds() {
        let mut interp = Interp::new();
        let t = interp.bool_value(true);
        let f = interp.bool_value(false);

        let r = builtin_and(&mut interp, &[t, t, t]);
        assert!(truth(&interp, r));
        let r = builtin_and(&mut interp, &[t, f]);
        assert!(!truth(&interp, r));
        let r = builtin_or(&mut interp, &[f, t]);
        assert!(truth(&interp, r));
        let r = builtin_or(&mut interp, &[f, f]);
        assert!(!truth(&interp, r));
        let r = builtin_xor(&mut interp, &[t, f]);
        assert!(truth(&interp, r));
        let r = builtin_xor(&mut interp, &[t, t]);
        assert!(!truth(&interp, r));
        let r = builtin_xor(&mut interp, &[t, t, t]);
        assert!(truth(&interp, r));
    }

    #[test]
    fn test_not() {
        let mut interp = Interp::new();
        let t = interp.bool_value(true);
        let r = builtin_not(&mut interp, &[t]);
        assert!(!truth(&interp, r));
    }

    #[test]
    fn test_non_boolean_argument_is_an_error_value() {
        let mut interp = Interp::new();
        let t = interp.bool_value(true);
        let bad = interp.symbol("x");
        let out = builtin_and(&mut interp, &[t, bad]);
        assert!(matches!(interp.heap.get(out), Object::Error(_)));
    }
}
