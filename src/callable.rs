// ABOUTME: Function and macro structures with argument descriptors and their ordering rules

use crate::ast::Expr;
use crate::eval::Interp;
use crate::heap::ValueId;
use crate::scope::ScopeRef;
use std::rc::Rc;

/// What an argument descriptor accepts and how call sites satisfy it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Positional,
    Optional,
    Named,
    NamedOptional,
    Rest,
}

impl ParamKind {
    pub fn is_optional(self) -> bool {
        matches!(self, ParamKind::Optional | ParamKind::NamedOptional)
    }

    pub fn is_named(self) -> bool {
        matches!(self, ParamKind::Named | ParamKind::NamedOptional)
    }

    pub fn is_rest(self) -> bool {
        self == ParamKind::Rest
    }
}

#[derive(Debug, Clone)]
pub struct Param {
    pub kind: ParamKind,
    pub name: String,
    /// Present for optionals; evaluated once at definition time.
    pub default: Option<ValueId>,
}

/// The body and captured scope of a user-defined callable. Cheap to clone:
/// invocation clones it out of the heap before evaluating.
#[derive(Debug, Clone)]
pub struct NativeDef {
    pub params: Rc<[Param]>,
    pub body: Rc<[Expr]>,
    pub scope: ScopeRef,
}

pub type BuiltinFn = fn(&mut Interp, &[ValueId]) -> ValueId;

/// Built-in functions check their own arguments; native ones carry
/// descriptors that the evaluator enforces.
#[derive(Debug, Clone)]
pub enum Function {
    Builtin { name: &'static str, run: BuiltinFn },
    Native(NativeDef),
}

/// Macros are always native. Their arguments arrive quoted and their result
/// is converted back to a parse tree.
#[derive(Debug, Clone)]
pub struct MacroDef {
    pub params: Rc<[Param]>,
    pub body: Rc<[Expr]>,
    pub scope: ScopeRef,
}

/// Validate band ordering: optionals after requireds, rest last.
pub fn check_param_order(params: &[Param]) -> Result<(), &'static str> {
    let mut optionals_started = false;
    for (i, param) in params.iter().enumerate() {
        if param.kind.is_rest() {
            if i != params.len() - 1 {
                return Err("Rest arguments must come last.");
            }
            continue;
        }
        if param.kind.is_optional() {
            optionals_started = true;
        } else if optionals_started {
            return Err("Optional arguments must come last.");
        }
    }
    Ok(())
}

/// Order descriptors as required-named, required-positional, optional-named,
/// optional-positional, rest. The reorder is stable within each class.
pub fn reorder_params(params: Vec<Param>) -> Vec<Param> {
    let mut required_named = Vec::new();
    let mut required_positional = Vec::new();
    let mut optional_named = Vec::new();
    let mut optional_positional = Vec::new();
    let mut rest = Vec::new();

    for param in params {
        match param.kind {
            ParamKind::Named => required_named.push(param),
            ParamKind::Positional => required_positional.push(param),
            ParamKind::NamedOptional => optional_named.push(param),
            ParamKind::Optional => optional_positional.push(param),
            ParamKind::Rest => rest.push(param),
        }
    }

    required_named
        .into_iter()
        .chain(required_positional)
        .chain(optional_named)
        .chain(optional_positional)
        .chain(rest)
        .collect()
}

/// Check an actual-argument count against the descriptor list.
pub fn check_arg_count(params: &[Param], argc: usize) -> Option<&'static str> {
    let has_rest = params.last().is_some_and(|p| p.kind.is_rest());
    if !has_rest && argc > params.len() {
        return Some("Too many arguments to function.");
    }

    let required = params
        .iter()
        .take_while(|p| !p.kind.is_optional() && !p.kind.is_rest())
        .count();
    if argc < required {
        return Some("Unsatisfied arguments.");
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(kind: ParamKind, name: &str) -> Param {
        Param {
            kind,
            name: name.into(),
            default: None,
        }
    }

    #[test]
    fn test_reorder_moves_named_ahead_within_bands() {
        let params = vec![
            param(ParamKind::Positional, "a"),
            param(ParamKind::Named, "b"),
            param(ParamKind::Optional, "c"),
            param(ParamKind::NamedOptional, "d"),
            param(ParamKind::Rest, "e"),
        ];
        let ordered: Vec<String> = reorder_params(params)
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(ordered, vec!["b", "a", "d", "c", "e"]);
    }

    #[test]
    fn test_reorder_is_stable() {
        let params = vec![
            param(ParamKind::Positional, "a"),
            param(ParamKind::Positional, "b"),
            param(ParamKind::Named, "x"),
            param(ParamKind::Named, "y"),
        ];
        let ordered: Vec<String> = reorder_params(params)
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(ordered, vec!["x", "y", "a", "b"]);
    }

    #[test]
    fn test_check_param_order() {
        let ok = vec![
            param(ParamKind::Positional, "a"),
            param(ParamKind::Optional, "b"),
            param(ParamKind::Rest, "c"),
        ];
        assert!(check_param_order(&ok).is_ok());

        let optional_first = vec![
            param(ParamKind::Optional, "a"),
            param(ParamKind::Positional, "b"),
        ];
        assert_eq!(
            check_param_order(&optional_first),
            Err("Optional arguments must come last.")
        );

        let rest_not_last = vec![
            param(ParamKind::Rest, "a"),
            param(ParamKind::Positional, "b"),
        ];
        assert_eq!(
            check_param_order(&rest_not_last),
            Err("Rest arguments must come last.")
        );
    }

    #[test]
    fn test_check_arg_count() {
        let params = vec![
            param(ParamKind::Positional, "a"),
            param(ParamKind::Optional, "b"),
        ];
        assert_eq!(check_arg_count(&params, 0), Some("Unsatisfied arguments."));
        assert_eq!(check_arg_count(&params, 1), None);
        assert_eq!(check_arg_count(&params, 2), None);
        assert_eq!(
            check_arg_count(&params, 3),
            Some("Too many arguments to function.")
        );
    }

    #[test]
    fn test_rest_lifts_the_upper_bound() {
        let params = vec![
            param(ParamKind::Positional, "a"),
            param(ParamKind::Rest, "r"),
        ];
        assert_eq!(check_arg_count(&params, 0), Some("Unsatisfied arguments."));
        assert_eq!(check_arg_count(&params, 1), None);
        assert_eq!(check_arg_count(&params, 12), None);
    }
}
