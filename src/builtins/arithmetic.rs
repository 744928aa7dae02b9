//! Arithmetic operations: `+`, `-`, `*`, `/`, `**`
//!
//! `+`, `-`, and `*` fold any number of arguments (identities 0, 0, and 1);
//! `/` and `**` are binary. Every result passes through numeric reduction,
//! so an integral real comes back as an integer and a complex with zero
//! imaginary part as its real component.

use super::{arity_error, define_builtin, number_arg};
use crate::eval::Interp;
use crate::heap::ValueId;
use crate::number::Number;

/// Sum of the arguments.
pub fn builtin_add(interp: &mut Interp, args: &[ValueId]) -> ValueId {
    if args.is_empty() {
        return arity_error(interp, "+", "at least 1", args.len());
    }
    let mut acc = Number::Int(0);
    for index in 0..args.len() {
        match number_arg(interp, "+", args, index) {
            Ok(num) => acc = acc.add(&num),
            Err(error) => return error,
        }
    }
    interp.number(acc)
}

/// Subtract the remaining arguments from the first.
pub fn builtin_sub(interp: &mut Interp, args: &[ValueId]) -> ValueId {
    if args.is_empty() {
        return arity_error(interp, "-", "at least 1", args.len());
    }
    let mut acc = match number_arg(interp, "-", args, 0) {
        Ok(num) => num,
        Err(error) => return error,
    };
    for index in 1..args.len() {
        match number_arg(interp, "-", args, index) {
            Ok(num) => acc = acc.sub(&num),
            Err(error) => return error,
        }
    }
    interp.number(acc)
}

/// Product of the arguments.
pub fn builtin_mul(interp: &mut Interp, args: &[ValueId]) -> ValueId {
    if args.is_empty() {
        return arity_error(interp, "*", "at least 1", args.len());
    }
    let mut acc = Number::Int(1);
    for index in 0..args.len() {
        match number_arg(interp, "*", args, index) {
            Ok(num) => acc = acc.mul(&num),
            Err(error) => return error,
        }
    }
    interp.number(acc)
}

/// Binary division. Integer over integer lands on a real.
pub fn builtin_div(interp: &mut Interp, args: &[ValueId]) -> ValueId {
    if args.len() != 2 {
        return arity_error(interp, "/", "2", args.len());
    }
    let one = match number_arg(interp, "/", args, 0) {
        Ok(num) => num,
        Err(error) => return error,
    };
    let two = match number_arg(interp, "/", args, 1) {
        Ok(num) => num,
        Err(error) => return error,
    };
    match one.div(&two) {
        Ok(out) => interp.number(out),
        Err(err) => interp.error(err.to_string(), None),
    }
}

/// Binary exponentiation. Complex operands are unsupported.
pub fn builtin_pow(interp: &mut Interp, args: &[ValueId]) -> ValueId {
    if args.len() != 2 {
        return arity_error(interp, "**", "2", args.len());
    }
    let base = match number_arg(interp, "**", args, 0) {
        Ok(num) => num,
        Err(error) => return error,
    };
    let exponent = match number_arg(interp, "**", args, 1) {
        Ok(num) => num,
        Err(error) => return error,
    };
    match base.pow(&exponent) {
        Ok(out) => interp.number(out),
        Err(err) => interp.error(err.to_string(), None),
    }
}

pub fn register(interp: &mut Interp) {
    define_builtin(interp, "+", builtin_add);
    define_builtin(interp, "-", builtin_sub);
    define_builtin(interp, "*", builtin_mul);
    define_builtin(interp, "/", builtin_div);
    define_builtin(interp, "**", builtin_pow);
}
