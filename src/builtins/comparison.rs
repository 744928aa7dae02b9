//! Comparison operations: `<`, `>`, `<=`, `>=`, `=`, `!=`, `eq`
//!
//! The ordering operators reject complex operands. `=` and `!=` compare
//! numbers; since arithmetic keeps numbers reduced, values of different
//! variants are never equal. `eq` compares any two values: numbers by
//! value, symbols by name, everything else by identity.

use super::{arity_error, define_builtin, number_arg};
use crate::eval::Interp;
use crate::heap::{Object, ValueId};
use crate::number::Number;
use std::cmp::Ordering;

fn binary_numbers(
    interp: &mut Interp,
    name: &str,
    args: &[ValueId],
) -> Result<(Number, Number), ValueId> {
    if args.len() != 2 {
        return Err(arity_error(interp, name, "2", args.len()));
    }
    let one = number_arg(interp, name, args, 0)?;
    let two = number_arg(interp, name, args, 1)?;
    Ok((one, two))
}

fn ordered(
    interp: &mut Interp,
    name: &str,
    args: &[ValueId],
    accept: fn(Ordering) -> bool,
) -> ValueId {
    let (one, two) = match binary_numbers(interp, name, args) {
        Ok(pair) => pair,
        Err(error) => return error,
    };
    match one.try_cmp(&two) {
        Ok(Some(ordering)) => interp.bool_value(accept(ordering)),
        // A NaN comparison holds no order at all.
        Ok(None) => interp.bool_value(false),
        Err(err) => interp.error(err.to_string(), None),
    }
}

pub fn builtin_lt(interp: &mut Interp, args: &[ValueId]) -> ValueId {
    ordered(interp, "<", args, Ordering::is_lt)
}

pub fn builtin_gt(interp: &mut Interp, args: &[ValueId]) -> ValueId {
    ordered(interp, ">", args, Ordering::is_gt)
}

pub fn builtin_le(interp: &mut Interp, args: &[ValueId]) -> ValueId {
    ordered(interp, "<=", args, Ordering::is_le)
}

pub fn builtin_ge(interp: &mut Interp, args: &[ValueId]) -> ValueId {
    ordered(interp, ">=", args, Ordering::is_ge)
}

pub fn builtin_num_eq(interp: &mut Interp, args: &[ValueId]) -> ValueId {
    let (one, two) = match binary_numbers(interp, "=", args) {
        Ok(pair) => pair,
        Err(error) => return error,
    };
    interp.bool_value(one.num_eq(&two))
}

pub fn builtin_num_neq(interp: &mut Interp, args: &[ValueId]) -> ValueId {
    let (one, two) = match binary_numbers(interp, "!=", args) {
        Ok(pair) => pair,
        Err(error) => return error,
    };
    interp.bool_value(!one.num_eq(&two))
}

/// Structural-ish equality across value kinds.
pub fn builtin_eq(interp: &mut Interp, args: &[ValueId]) -> ValueId {
    if args.len() != 2 {
        return arity_error(interp, "eq", "2", args.len());
    }
    let equal = match (interp.heap.get(args[0]), interp.heap.get(args[1])) {
        (Object::Number(a), Object::Number(b)) => a.num_eq(b),
        (Object::Symbol(a), Object::Symbol(b)) => a == b,
        (a, b) if a.kind() != b.kind() => false,
        _ => args[0] == args[1],
    };
    interp.bool_value(equal)
}

pub fn register(interp: &mut Interp) {
    define_builtin(interp, "<", builtin_lt);
    define_builtin(interp, ">", builtin_gt);
    define_builtin(interp, "<=", builtin_le);
    define_builtin(interp, ">=", builtin_ge);
    define_builtin(interp, "=", builtin_num_eq);
    define_builtin(interp, "!=", builtin_num_neq);
    define_builtin(interp, "eq", builtin_eq);
}
