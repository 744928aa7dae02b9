//! List operations: `head`, `tail`, `len`, `nth`, `insert`
//!
//! Lists are persistent: `insert` returns a new list and leaves its
//! argument untouched. Out-of-range access is a list-bounds error value.

use super::{arity_error, define_builtin, int_arg, list_arg};
use crate::eval::Interp;
use crate::heap::{Cell, Object, ValueId};
use crate::number::Number;

pub fn builtin_head(interp: &mut Interp, args: &[ValueId]) -> ValueId {
    if args.len() != 1 {
        return arity_error(interp, "head", "1", args.len());
    }
    let list = match list_arg(interp, "head", args, 0) {
        Ok(list) => list,
        Err(error) => return error,
    };
    let data = match interp.heap.get(list) {
        Object::Cell(cell) => cell.data,
        _ => None,
    };
    match data {
        Some(head) => head,
        None => interp.error("Cannot take the head of an empty list.", None),
    }
}

pub fn builtin_tail(interp: &mut Interp, args: &[ValueId]) -> ValueId {
    if args.len() != 1 {
        return arity_error(interp, "tail", "1", args.len());
    }
    let list = match list_arg(interp, "tail", args, 0) {
        Ok(list) => list,
        Err(error) => return error,
    };
    let cell = match interp.heap.get(list) {
        Object::Cell(cell) => *cell,
        // list_arg already guaranteed a cell
        _ => Cell::default(),
    };
    if cell.data.is_none() {
        return interp.error("Cannot take the tail of an empty list.", None);
    }
    match cell.next {
        Some(next) => next,
        None => interp.empty_list(),
    }
}

pub fn builtin_len(interp: &mut Interp, args: &[ValueId]) -> ValueId {
    if args.len() != 1 {
        return arity_error(interp, "len", "1", args.len());
    }
    let list = match list_arg(interp, "len", args, 0) {
        Ok(list) => list,
        Err(error) => return error,
    };
    let length = interp.list_items(list).len() as i64;
    interp.number(Number::Int(length))
}

pub fn builtin_nth(interp: &mut Interp, args: &[ValueId]) -> ValueId {
    if args.len() != 2 {
        return arity_error(interp, "nth", "2", args.len());
    }
    let list = match list_arg(interp, "nth", args, 0) {
        Ok(list) => list,
        Err(error) => return error,
    };
    let index = match int_arg(interp, "nth", args, 1) {
        Ok(index) => index,
        Err(error) => return error,
    };
    let items = interp.list_items(list);
    if index < 0 || index as usize >= items.len() {
        return interp.error("List index out of bounds.", None);
    }
    items[index as usize]
}

/// `(insert list value index)` returns a new list with the value placed at
/// the index.
pub fn builtin_insert(interp: &mut Interp, args: &[ValueId]) -> ValueId {
    if args.len() != 3 {
        return arity_error(interp, "insert", "3", args.len());
    }
    let list = match list_arg(interp, "insert", args, 0) {
        Ok(list) => list,
        Err(error) => return error,
    };
    let index = match int_arg(interp, "insert", args, 2) {
        Ok(index) => index,
        Err(error) => return error,
    };
    let mut items = interp.list_items(list);
    if index < 0 || index as usize > items.len() {
        return interp.error("List index out of bounds.", None);
    }
    items.insert(index as usize, args[1]);
    interp.list_from(&items)
}

pub fn register(interp: &mut Interp) {
    define_builtin(interp, "head", builtin_head);
    define_builtin(interp, "tail", builtin_tail);
    define_builtin(interp, "len", builtin_len);
    define_builtin(interp, "nth", builtin_nth);
    define_builtin(interp, "insert", builtin_insert);
}
