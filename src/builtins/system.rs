//! Interpreter services: `include`, `unique`
//!
//! `include` loads and evaluates the source file named by a symbol in the
//! current global environment. `unique` generates a fresh symbol that the
//! lexer can never read back, for use in macro expansions.

use super::{arity_error, define_builtin, symbol_arg};
use crate::error::SourceError;
use crate::eval::Interp;
use crate::heap::{ObjKind, ValueId};
use log::debug;

pub fn builtin_include(interp: &mut Interp, args: &[ValueId]) -> ValueId {
    if args.len() != 1 {
        return arity_error(interp, "include", "1", args.len());
    }
    let name = match symbol_arg(interp, "include", args, 0) {
        Ok(name) => name,
        Err(error) => return error,
    };

    debug!("include: loading {}", name);
    let source = match std::fs::read_to_string(&name) {
        Ok(source) => source,
        Err(_) => return interp.error(format!("\"{}\" not available.", name), None),
    };

    match interp.eval_source(&source) {
        Ok(last) if interp.heap.kind(last) == ObjKind::Error => last,
        Ok(_) => interp.bool_value(true),
        Err(SourceError::Lex(err)) => {
            interp.error(format!("include: {}: {}", name, err), None)
        }
        Err(SourceError::Parse(diagnostics)) => {
            interp.error(format!("include: {}:\n{}", name, diagnostics), None)
        }
    }
}

pub fn builtin_unique(interp: &mut Interp, args: &[ValueId]) -> ValueId {
    if !args.is_empty() {
        return arity_error(interp, "unique", "0", args.len());
    }
    interp.gensym()
}

pub fn register(interp: &mut Interp) {
    define_builtin(interp, "include", builtin_include);
    define_builtin(interp, "unique", builtin_unique);
}
