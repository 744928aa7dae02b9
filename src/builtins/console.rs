//! Output operations: `print`, `print-line`
//!
//! Both take at least one argument and return the last one, so a print can
//! be threaded into a larger expression.

use super::{arity_error, define_builtin};
use crate::eval::Interp;
use crate::heap::ValueId;
use std::io::Write;

pub fn builtin_print(interp: &mut Interp, args: &[ValueId]) -> ValueId {
    if args.is_empty() {
        return arity_error(interp, "print", "at least 1", args.len());
    }
    for &arg in args {
        print!("{}", interp.display_value(arg));
    }
    let _ = std::io::stdout().flush();
    args[args.len() - 1]
}

pub fn builtin_print_line(interp: &mut Interp, args: &[ValueId]) -> ValueId {
    if args.is_empty() {
        return arity_error(interp, "print-line", "at least 1", args.len());
    }
    for &arg in args {
        println!("{}", interp.display_value(arg));
    }
    args[args.len() - 1]
}

pub fn register(interp: &mut Interp) {
    define_builtin(interp, "print", builtin_print);
    define_builtin(interp, "print-line", builtin_print_line);
}
