//! # Built-in Functions
//!
//! The built-in global environment, organized by category:
//!
//! - **[arithmetic]**: `+`, `-`, `*`, `/`, `**`
//! - **[comparison]**: `<`, `>`, `<=`, `>=`, `=`, `!=`, `eq`
//! - **[logic]**: `&`, `|`, `xor`, `not`
//! - **[lists]**: `head`, `tail`, `len`, `nth`, `insert`
//! - **[console]**: `print`, `print-line`
//! - **[types]**: `number?`, `function?`, `list?`, `symbol?`, `boolean?`,
//!   `macro?`, `error?`
//! - **[system]**: `include`, `unique`
//!
//! Built-ins validate their own arguments and report failures by returning
//! error values; they never unwind through the evaluator.

use crate::callable::{BuiltinFn, Function};
use crate::eval::Interp;
use crate::heap::{ObjKind, Object, ValueId};
use crate::number::Number;

pub mod arithmetic;
pub mod comparison;
pub mod console;
pub mod lists;
pub mod logic;
pub mod system;
pub mod types;

/// Install the whole built-in environment into the global scope.
pub fn register(interp: &mut Interp) {
    arithmetic::register(interp);
    comparison::register(interp);
    logic::register(interp);
    lists::register(interp);
    console::register(interp);
    types::register(interp);
    system::register(interp);
}

pub(crate) fn define_builtin(interp: &mut Interp, name: &'static str, run: BuiltinFn) {
    let id = interp
        .heap
        .alloc(Object::Function(Function::Builtin { name, run }));
    interp.define_global(name, id);
}

// ===== Shared argument accessors =====
//
// Each checks one argument and hands back an owned payload, so no heap
// borrow is held while the builtin goes on to allocate.

pub(crate) fn arity_error(
    interp: &mut Interp,
    name: &str,
    expected: &str,
    actual: usize,
) -> ValueId {
    let plural = if expected == "1" { "" } else { "s" };
    let message = format!("{name}: expected {expected} argument{plural}, got {actual}");
    interp.error(message, None)
}

pub(crate) fn number_arg(
    interp: &mut Interp,
    name: &str,
    args: &[ValueId],
    index: usize,
) -> Result<Number, ValueId> {
    if let Object::Number(num) = interp.heap.get(args[index]) {
        return Ok(num.clone());
    }
    let found = interp.heap.kind(args[index]).name();
    let message = format!(
        "{name}: expected a number as argument {}, got a {found}",
        index + 1
    );
    Err(interp.error(message, None))
}

pub(crate) fn bool_arg(
    interp: &mut Interp,
    name: &str,
    args: &[ValueId],
    index: usize,
) -> Result<bool, ValueId> {
    if let Object::Bool(b) = interp.heap.get(args[index]) {
        return Ok(*b);
    }
    let found = interp.heap.kind(args[index]).name();
    let message = format!(
        "{name}: expected a boolean as argument {}, got a {found}",
        index + 1
    );
    Err(interp.error(message, None))
}

pub(crate) fn list_arg(
    interp: &mut Interp,
    name: &str,
    args: &[ValueId],
    index: usize,
) -> Result<ValueId, ValueId> {
    if interp.heap.kind(args[index]) == ObjKind::Cell {
        return Ok(args[index]);
    }
    let found = interp.heap.kind(args[index]).name();
    let message = format!(
        "{name}: expected a list as argument {}, got a {found}",
        index + 1
    );
    Err(interp.error(message, None))
}

pub(crate) fn symbol_arg(
    interp: &mut Interp,
    name: &str,
    args: &[ValueId],
    index: usize,
) -> Result<String, ValueId> {
    if let Object::Symbol(text) = interp.heap.get(args[index]) {
        return Ok(text.clone());
    }
    let found = interp.heap.kind(args[index]).name();
    let message = format!(
        "{name}: expected a symbol as argument {}, got a {found}",
        index + 1
    );
    Err(interp.error(message, None))
}

pub(crate) fn int_arg(
    interp: &mut Interp,
    name: &str,
    args: &[ValueId],
    index: usize,
) -> Result<i64, ValueId> {
    if let Object::Number(Number::Int(i)) = interp.heap.get(args[index]) {
        return Ok(*i);
    }
    let message = format!("{name}: expected an integer as argument {}", index + 1);
    Err(interp.error(message, None))
}
