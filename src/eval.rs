// ABOUTME: Tree-walking evaluator: special forms, invocation, quasi-quotation, flow control

use crate::ast::{Expr, ExprKind, QUOTE, QUOTE_SUBSTITUTIONS};
use crate::builtins;
use crate::callable::{
    check_arg_count, check_param_order, reorder_params, Function, MacroDef, NativeDef, Param,
    ParamKind,
};
use crate::error::SourceError;
use crate::heap::{Cell, FlowKind, FlowSignal, Heap, ObjKind, Object, RuntimeError, ValueId};
use crate::lexer;
use crate::number::Number;
use crate::parser;
use crate::scope::{Scope, ScopeRef};
use crate::token::Position;
use std::rc::Rc;

/// A callable cloned out of the heap for invocation, so no payload borrow
/// is held while the body allocates.
enum Callable {
    Function(Function),
    Macro(MacroDef),
}

/// The interpreter context: the heap, the three live scopes, and the stack
/// of scopes saved across calls. All evaluation goes through [`Interp::eval`],
/// which returns a value identifier; errors and `go` signals are in-band
/// values that callers inspect, never Rust panics or unwinding.
pub struct Interp {
    pub heap: Heap,
    globals: ScopeRef,
    locals: ScopeRef,
    function_scope: ScopeRef,
    saved_scopes: Vec<(ScopeRef, ScopeRef)>,
    true_id: ValueId,
    false_id: ValueId,
    gensym_counter: u64,
}

impl Default for Interp {
    fn default() -> Self {
        Self::new()
    }
}

impl Interp {
    /// Create an interpreter with the built-in global environment in place.
    pub fn new() -> Self {
        let mut heap = Heap::new();
        // The boolean singletons: exactly one true and one false value exist.
        let true_id = heap.alloc(Object::Bool(true));
        let false_id = heap.alloc(Object::Bool(false));

        let globals = Scope::new().shared();
        let mut interp = Interp {
            heap,
            globals: Rc::clone(&globals),
            // Until a call is made, the local scope IS the global scope.
            locals: globals,
            function_scope: Scope::new().shared(),
            saved_scopes: Vec::new(),
            true_id,
            false_id,
            gensym_counter: 0,
        };

        builtins::register(&mut interp);
        interp.define_global("true!", true_id);
        interp.define_global("false!", false_id);
        interp
    }

    // ===== Allocation helpers =====

    pub fn number(&mut self, num: Number) -> ValueId {
        self.heap.alloc(Object::Number(num))
    }

    pub fn symbol(&mut self, name: impl Into<String>) -> ValueId {
        self.heap.alloc(Object::Symbol(name.into()))
    }

    pub fn bool_value(&self, b: bool) -> ValueId {
        if b {
            self.true_id
        } else {
            self.false_id
        }
    }

    pub fn false_value(&self) -> ValueId {
        self.false_id
    }

    /// Allocate a runtime error value.
    pub fn error(&mut self, message: impl Into<String>, expr: Option<&Expr>) -> ValueId {
        self.heap.alloc(Object::Error(RuntimeError {
            message: message.into(),
            expr: expr.cloned(),
        }))
    }

    pub fn empty_list(&mut self) -> ValueId {
        self.heap.alloc(Object::Cell(Cell::default()))
    }

    /// Build a list value from items, front to back.
    pub fn list_from(&mut self, items: &[ValueId]) -> ValueId {
        let mut next = None;
        for &item in items.iter().rev() {
            let id = self.heap.alloc(Object::Cell(Cell {
                data: Some(item),
                next,
            }));
            next = Some(id);
        }
        match next {
            Some(head) => head,
            None => self.empty_list(),
        }
    }

    /// Flatten a list value into its element identifiers.
    pub fn list_items(&self, id: ValueId) -> Vec<ValueId> {
        let mut items = Vec::new();
        let mut current = Some(id);
        while let Some(cell_id) = current {
            match self.heap.get(cell_id) {
                Object::Cell(cell) => {
                    if let Some(data) = cell.data {
                        items.push(data);
                    }
                    current = cell.next;
                }
                _ => break,
            }
        }
        items
    }

    /// Generate a symbol the lexer can never read back (`#` starts a
    /// reader discard).
    pub fn gensym(&mut self) -> ValueId {
        let name = format!("#-{}", self.gensym_counter);
        self.gensym_counter += 1;
        self.symbol(name)
    }

    pub fn define_global(&mut self, name: impl Into<String>, id: ValueId) {
        self.globals.borrow_mut().define(name, id);
    }

    // ===== Scope access =====

    /// Name lookup order: local, then the closure scope, then global.
    pub fn lookup(&self, name: &str) -> Option<ValueId> {
        if let Some(id) = self.locals.borrow().lookup(name) {
            return Some(id);
        }
        if let Some(id) = self.function_scope.borrow().lookup(name) {
            return Some(id);
        }
        self.globals.borrow().lookup(name)
    }

    /// Snapshot of `current-function ∪ local` captured at a definition
    /// site. The local scope is left out at top level, where it is the
    /// global scope.
    fn capture_closure(&self) -> ScopeRef {
        let function = self.function_scope.borrow();
        let merged = if Rc::ptr_eq(&self.locals, &self.globals) {
            Scope::merged(&function, None)
        } else {
            let local = self.locals.borrow();
            Scope::merged(&function, Some(&local))
        };
        merged.shared()
    }

    // ===== Abrupt-value plumbing =====

    fn is_abrupt(&self, id: ValueId) -> bool {
        matches!(self.heap.kind(id), ObjKind::Error | ObjKind::Flow)
    }

    /// Give an error value a source location if it has none yet.
    fn attach(&mut self, id: ValueId, expr: &Expr) -> ValueId {
        if let Object::Error(err) = self.heap.get_mut(id) {
            if err.expr.is_none() {
                err.expr = Some(expr.clone());
            }
        }
        id
    }

    // ===== Evaluation =====

    pub fn eval(&mut self, expr: &Expr) -> ValueId {
        match &expr.kind {
            ExprKind::Number(num) => {
                let num = num.clone();
                self.number(num)
            }
            ExprKind::Ident(name) => match self.lookup(name) {
                Some(id) => id,
                None => {
                    let message = format!("Variable not found: {}", name);
                    self.error(message, Some(expr))
                }
            },
            ExprKind::Str(_) => self.error("String literals have no runtime value.", Some(expr)),
            ExprKind::Reference(..) => self.error("References cannot be evaluated.", Some(expr)),
            ExprKind::Error(message) => {
                let message = message.clone();
                self.error(message, Some(expr))
            }
            ExprKind::List(items) if items.is_empty() => self.empty_list(),
            ExprKind::List(items) => self.eval_form(expr, items),
        }
    }

    fn as_callable(&self, id: ValueId) -> Option<Callable> {
        match self.heap.get(id) {
            Object::Function(f) => Some(Callable::Function(f.clone())),
            Object::Macro(m) => Some(Callable::Macro(m.clone())),
            _ => None,
        }
    }

    fn eval_form(&mut self, expr: &Expr, items: &[Expr]) -> ValueId {
        if let Some(name) = items[0].as_ident() {
            match name {
                "lambda" => return self.eval_lambda(expr, items, false),
                "mambda" => return self.eval_lambda(expr, items, true),
                "set" => return self.eval_set(expr, items, false),
                "global" => return self.eval_set(expr, items, true),
                "if" => return self.eval_if(expr, items),
                QUOTE => return self.eval_quote(expr, items, false),
                QUOTE_SUBSTITUTIONS => return self.eval_quote(expr, items, true),
                "tagbody" => return self.eval_tagbody(expr, items),
                "go" => return self.eval_go(expr, items),
                _ => {}
            }

            let Some(id) = self.lookup(name) else {
                let message = format!("Callable not found: {}", name);
                return self.error(message, Some(expr));
            };
            return match self.as_callable(id) {
                Some(Callable::Function(function)) => self.invoke_function(function, expr, items),
                Some(Callable::Macro(mac)) => self.expand_macro(mac, expr, items),
                None => {
                    let message = format!("Cannot call a non-executable data type: {}", name);
                    self.error(message, Some(expr))
                }
            };
        }

        // The head is not an identifier: evaluate it, invoke the result if
        // it is callable, and otherwise treat the list as a block whose
        // value is its last expression.
        let head = self.eval(&items[0]);
        if self.is_abrupt(head) {
            return self.attach(head, &items[0]);
        }
        match self.as_callable(head) {
            Some(Callable::Function(function)) => self.invoke_function(function, expr, items),
            Some(Callable::Macro(mac)) => self.expand_macro(mac, expr, items),
            None => {
                let mut last = head;
                for item in &items[1..] {
                    last = self.eval(item);
                    if self.is_abrupt(last) {
                        return self.attach(last, item);
                    }
                }
                last
            }
        }
    }

    // ===== Special forms =====

    fn eval_lambda(&mut self, expr: &Expr, items: &[Expr], is_macro: bool) -> ValueId {
        let form = if is_macro { "mambda" } else { "lambda" };
        let Some(formals) = items.get(1).and_then(Expr::as_list) else {
            let message = format!("{}: the argument list must be a list.", form);
            return self.error(message, Some(expr));
        };
        let params = match self.parse_formals(formals) {
            Ok(params) => params,
            Err(abrupt) => return self.attach(abrupt, expr),
        };

        let params: Rc<[Param]> = params.into();
        let body: Rc<[Expr]> = items[2..].to_vec().into();
        let scope = self.capture_closure();
        let object = if is_macro {
            Object::Macro(MacroDef {
                params,
                body,
                scope,
            })
        } else {
            Object::Function(Function::Native(NativeDef {
                params,
                body,
                scope,
            }))
        };
        self.heap.alloc(object)
    }

    /// Read a formal list. Optional defaults are evaluated here, at
    /// definition time, and stored as value identifiers.
    fn parse_formals(&mut self, formals: &[Expr]) -> Result<Vec<Param>, ValueId> {
        let mut params = Vec::new();
        let mut i = 0;
        while i < formals.len() {
            let item = &formals[i];
            match item.as_ident() {
                Some(marker) if matches!(marker, "?" | "~" | "~?" | "&") => {
                    let Some(detail) = formals.get(i + 1).and_then(Expr::as_list) else {
                        let message = format!(
                            "Argument marker {} must be followed by a (name ...) list.",
                            marker
                        );
                        return Err(self.error(message, Some(item)));
                    };
                    let Some(name) = detail.first().and_then(Expr::as_ident) else {
                        return Err(self.error("Argument names must be identifiers.", Some(item)));
                    };
                    let name = name.to_string();
                    let (kind, default) = match marker {
                        "?" | "~?" => {
                            let Some(default_expr) = detail.get(1) else {
                                return Err(self.error(
                                    "Optional arguments need a default value.",
                                    Some(item),
                                ));
                            };
                            let default = self.eval(default_expr);
                            if self.is_abrupt(default) {
                                return Err(self.attach(default, default_expr));
                            }
                            let kind = if marker == "?" {
                                ParamKind::Optional
                            } else {
                                ParamKind::NamedOptional
                            };
                            (kind, Some(default))
                        }
                        "~" => (ParamKind::Named, None),
                        _ => (ParamKind::Rest, None),
                    };
                    params.push(Param {
                        kind,
                        name,
                        default,
                    });
                    i += 2;
                }
                Some(name) => {
                    params.push(Param {
                        kind: ParamKind::Positional,
                        name: name.to_string(),
                        default: None,
                    });
                    i += 1;
                }
                None => {
                    return Err(self.error("Function arguments must be identifiers.", Some(item)))
                }
            }
        }

        if let Err(message) = check_param_order(&params) {
            return Err(self.error(message, None));
        }
        Ok(reorder_params(params))
    }

    fn eval_set(&mut self, expr: &Expr, items: &[Expr], global: bool) -> ValueId {
        let form = if global { "global" } else { "set" };
        if items.len() != 3 {
            let message = format!("{}: expected a variable name and a value.", form);
            return self.error(message, Some(expr));
        }
        let Some(name) = items[1].as_ident() else {
            let message = format!("{}: the variable name must be an identifier.", form);
            return self.error(message, Some(&items[1]));
        };
        let name = name.to_string();
        let value = self.eval(&items[2]);
        if self.is_abrupt(value) {
            return self.attach(value, &items[2]);
        }

        if global {
            self.globals.borrow_mut().define(name, value);
            return value;
        }

        // Update the first scope that already holds the name; otherwise
        // this is a fresh local definition.
        if self.locals.borrow_mut().update(&name, value) {
            return value;
        }
        if self.function_scope.borrow_mut().update(&name, value) {
            return value;
        }
        if self.globals.borrow_mut().update(&name, value) {
            return value;
        }
        self.locals.borrow_mut().define(name, value);
        value
    }

    fn eval_if(&mut self, expr: &Expr, items: &[Expr]) -> ValueId {
        if items.len() < 3 || items.len() > 4 {
            return self.error("if: expected a condition and one or two branches.", Some(expr));
        }
        let condition = self.eval(&items[1]);
        if self.is_abrupt(condition) {
            return self.attach(condition, &items[1]);
        }
        let truth = match self.heap.get(condition) {
            Object::Bool(b) => Some(*b),
            _ => None,
        };
        let Some(truth) = truth else {
            return self.error(
                "Invalid boolean variable (condition must evaluate to a boolean).",
                Some(&items[1]),
            );
        };
        if truth {
            self.eval(&items[2])
        } else if items.len() > 3 {
            self.eval(&items[3])
        } else {
            self.false_id
        }
    }

    fn eval_quote(&mut self, expr: &Expr, items: &[Expr], substitutions: bool) -> ValueId {
        if items.len() != 2 {
            let form = items[0].as_ident().unwrap_or(QUOTE);
            let message = format!("{}: expected exactly one expression.", form);
            return self.error(message, Some(expr));
        }
        self.quoted_eval(&items[1], substitutions)
    }

    fn eval_go(&mut self, expr: &Expr, items: &[Expr]) -> ValueId {
        let Some(target) = items.get(1).and_then(Expr::as_ident) else {
            return self.error("go: the target tag must be an identifier.", Some(expr));
        };
        self.heap.alloc(Object::Flow(FlowSignal {
            kind: FlowKind::Go,
            target: target.to_string(),
        }))
    }

    /// Run tags in order from the first. A `go` naming one of this form's
    /// tags resumes at that tag's first body expression; one naming a tag
    /// elsewhere propagates outward. The value of the whole form is the
    /// last value computed.
    fn eval_tagbody(&mut self, expr: &Expr, items: &[Expr]) -> ValueId {
        let mut tag_names = Vec::new();
        for tag in &items[1..] {
            let Some(tag_items) = tag.as_list() else {
                return self.error("Tagbody tags must be wrapped in a list.", Some(expr));
            };
            let Some(name) = tag_items.first().and_then(Expr::as_ident) else {
                return self.error("Tag names must be identifiers.", Some(tag));
            };
            tag_names.push(name.to_string());
        }

        let mut last = self.false_id;
        let mut current = 0usize;
        'tags: while current < tag_names.len() {
            let Some(tag_items) = items[current + 1].as_list() else {
                break;
            };
            current += 1;
            for body_expr in &tag_items[1..] {
                last = self.eval(body_expr);
                let target = match self.heap.get(last) {
                    Object::Flow(flow) => Some(flow.target.clone()),
                    Object::Error(_) => return last,
                    _ => None,
                };
                if let Some(target) = target {
                    match tag_names.iter().position(|name| *name == target) {
                        Some(index) => {
                            current = index;
                            continue 'tags;
                        }
                        // Not one of ours: let an enclosing tagbody look.
                        None => return last,
                    }
                }
            }
        }
        last
    }

    // ===== Quasi-quotation =====

    /// Convert a parse tree into a data value. With `substitutions` set,
    /// `$x` forms evaluate normally and `$@x` forms splice list results
    /// into the surrounding list.
    pub fn quoted_eval(&mut self, expr: &Expr, substitutions: bool) -> ValueId {
        match &expr.kind {
            ExprKind::Ident(name) => {
                let name = name.clone();
                self.symbol(name)
            }
            ExprKind::Number(num) => {
                let num = num.clone();
                self.number(num)
            }
            ExprKind::Str(_) => self.error("String literals have no runtime value.", Some(expr)),
            ExprKind::Reference(..) => self.error("References cannot be quoted.", Some(expr)),
            ExprKind::Error(message) => {
                let message = message.clone();
                self.error(message, Some(expr))
            }
            ExprKind::List(items) => {
                if expr.is_substitution() && substitutions {
                    return self.eval(&items[1]);
                }

                let mut out = Vec::new();
                for child in items {
                    if child.is_splicing_substitution() && substitutions {
                        let Some(payload) = child.as_list().and_then(|list| list.get(1)) else {
                            continue;
                        };
                        let spliced = self.eval(payload);
                        if self.is_abrupt(spliced) {
                            return self.attach(spliced, child);
                        }
                        if self.heap.kind(spliced) != ObjKind::Cell {
                            return self.error(
                                "A splicing substitution operates only on lists.",
                                Some(expr),
                            );
                        }
                        out.extend(self.list_items(spliced));
                    } else {
                        let value = self.quoted_eval(child, substitutions);
                        if self.is_abrupt(value) {
                            return value;
                        }
                        out.push(value);
                    }
                }
                self.list_from(&out)
            }
        }
    }

    // ===== Invocation =====

    /// Evaluate the actual arguments of a call, left to right. A bare `~`
    /// marks the following `(name value)` pair as a named argument. Macro
    /// calls evaluate their actuals under quoted-without-substitution
    /// semantics instead.
    #[allow(clippy::type_complexity)]
    fn eval_call_args(
        &mut self,
        args: &[Expr],
        quoted: bool,
    ) -> Result<(Vec<ValueId>, Vec<Option<String>>), ValueId> {
        let mut values = Vec::new();
        let mut names = Vec::new();
        let mut i = 0;
        while i < args.len() {
            if args[i].as_ident() == Some("~") {
                let pair = args.get(i + 1).and_then(Expr::as_list);
                let (name, value_expr) = match pair {
                    Some([name_expr, value_expr]) => match name_expr.as_ident() {
                        Some(name) => (name.to_string(), value_expr),
                        None => {
                            return Err(self.error(
                                "Named arguments must be (name value) pairs.",
                                Some(&args[i]),
                            ))
                        }
                    },
                    _ => {
                        return Err(self.error(
                            "Named arguments must be (name value) pairs.",
                            Some(&args[i]),
                        ))
                    }
                };
                let value = if quoted {
                    self.quoted_eval(value_expr, false)
                } else {
                    self.eval(value_expr)
                };
                if self.is_abrupt(value) {
                    return Err(self.attach(value, &args[i + 1]));
                }
                values.push(value);
                names.push(Some(name));
                i += 2;
            } else {
                let value = if quoted {
                    self.quoted_eval(&args[i], false)
                } else {
                    self.eval(&args[i])
                };
                if self.is_abrupt(value) {
                    return Err(self.attach(value, &args[i]));
                }
                values.push(value);
                names.push(None);
                i += 1;
            }
        }
        Ok((values, names))
    }

    /// Swap named actuals into their formal positions, band by band, then
    /// insert stored defaults for optionals that were not passed.
    fn apply_named_and_defaults(
        &mut self,
        params: &[Param],
        values: &mut Vec<ValueId>,
        names: &mut Vec<Option<String>>,
    ) {
        for c in 0..params.len() {
            let param = &params[c];
            if !param.kind.is_named() {
                continue;
            }
            let found = names
                .iter()
                .position(|n| n.as_deref() == Some(param.name.as_str()));
            match found {
                Some(d) => {
                    if d != c {
                        let value = values.remove(d);
                        let name = names.remove(d);
                        let at = c.min(values.len());
                        values.insert(at, value);
                        names.insert(at, name);
                    }
                }
                None if param.kind == ParamKind::NamedOptional => {
                    let default = param.default.unwrap_or(self.false_id);
                    let at = c.min(values.len());
                    values.insert(at, default);
                    names.insert(at, None);
                }
                None => {}
            }
        }

        // Trailing positional optionals that were not passed take their
        // stored defaults.
        let fixed = params.iter().filter(|p| !p.kind.is_rest()).count();
        while values.len() < fixed {
            let param = &params[values.len()];
            if param.kind == ParamKind::Optional {
                values.push(param.default.unwrap_or(self.false_id));
                names.push(None);
            } else {
                break;
            }
        }
    }

    fn invoke_function(&mut self, function: Function, call: &Expr, items: &[Expr]) -> ValueId {
        let (mut values, mut names) = match self.eval_call_args(&items[1..], false) {
            Ok(pair) => pair,
            Err(abrupt) => return abrupt,
        };
        match function {
            // Built-ins validate their own arguments and never unwind.
            Function::Builtin { run, .. } => {
                let result = run(self, &values);
                self.attach(result, call)
            }
            Function::Native(def) => {
                self.apply_named_and_defaults(&def.params, &mut values, &mut names);
                if let Some(message) = check_arg_count(&def.params, values.len()) {
                    return self.error(message, Some(call));
                }
                self.run_body(&def.params, &def.body, &def.scope, &values, call)
            }
        }
    }

    fn expand_macro(&mut self, mac: MacroDef, call: &Expr, items: &[Expr]) -> ValueId {
        let (mut values, mut names) = match self.eval_call_args(&items[1..], true) {
            Ok(pair) => pair,
            Err(abrupt) => return abrupt,
        };
        self.apply_named_and_defaults(&mac.params, &mut values, &mut names);
        if let Some(message) = check_arg_count(&mac.params, values.len()) {
            return self.error(message, Some(call));
        }

        let expansion = self.run_body(&mac.params, &mac.body, &mac.scope, &values, call);
        if self.is_abrupt(expansion) {
            return expansion;
        }

        // The macro's value becomes code again, evaluated where it was
        // called.
        match self.value_to_expr(expansion, call.pos) {
            Ok(tree) => self.eval(&tree),
            Err(error_id) => self.attach(error_id, call),
        }
    }

    /// The call protocol: save the caller's local and closure scopes, bind
    /// arguments in a fresh local, evaluate the body left to right, and
    /// restore. The last expression's value is the result.
    fn run_body(
        &mut self,
        params: &[Param],
        body: &[Expr],
        scope: &ScopeRef,
        values: &[ValueId],
        call: &Expr,
    ) -> ValueId {
        self.saved_scopes
            .push((Rc::clone(&self.locals), Rc::clone(&self.function_scope)));
        self.locals = Scope::new().shared();
        self.function_scope = Rc::clone(scope);

        self.bind_args(params, values);

        let mut last = self.false_id;
        for expr in body {
            last = self.eval(expr);
            if self.is_abrupt(last) {
                break;
            }
        }

        if let Some((locals, function_scope)) = self.saved_scopes.pop() {
            self.locals = locals;
            self.function_scope = function_scope;
        }

        // A go unwinding out of a function finds no tag here: the caller's
        // tagbody must not catch it.
        let escaped_go = match self.heap.get(last) {
            Object::Flow(flow) => Some(flow.target.clone()),
            _ => None,
        };
        if let Some(target) = escaped_go {
            let message = format!("go: no tag named '{}' in scope", target);
            return self.error(message, Some(call));
        }

        self.attach(last, call)
    }

    fn bind_args(&mut self, params: &[Param], values: &[ValueId]) {
        for (i, param) in params.iter().enumerate() {
            if param.kind.is_rest() {
                let surplus = &values[i.min(values.len())..];
                let rest = self.list_from(surplus);
                self.locals.borrow_mut().define(param.name.clone(), rest);
                return;
            }
            if let Some(&value) = values.get(i) {
                self.locals.borrow_mut().define(param.name.clone(), value);
            }
        }
    }

    /// Convert a macro's result back into a parse tree: lists become list
    /// trees, symbols identifiers, numbers number trees. Anything else is
    /// not code.
    fn value_to_expr(&mut self, id: ValueId, pos: Position) -> Result<Expr, ValueId> {
        let object = self.heap.get(id).clone();
        match object {
            Object::Cell(_) => {
                let mut children = Vec::new();
                for item in self.list_items(id) {
                    children.push(self.value_to_expr(item, pos)?);
                }
                Ok(Expr::list(children, pos))
            }
            Object::Symbol(name) => Ok(Expr::ident(name, pos)),
            Object::Number(num) => Ok(Expr::number(num, pos)),
            other => {
                let message = format!(
                    "A macro must expand to a list, symbol, or number, not a {}.",
                    other.kind().name()
                );
                Err(self.error(message, None))
            }
        }
    }

    // ===== Whole-source evaluation =====

    /// Lex, parse, and evaluate a complete source text. Parse diagnostics
    /// abort before any evaluation; a runtime error value is returned as
    /// soon as a top-level form produces one. Flow-control values reaching
    /// the top are discarded.
    pub fn eval_source(&mut self, source: &str) -> Result<ValueId, SourceError> {
        let tokens = lexer::lex(source)?;
        let program = parser::parse_tokens(tokens);
        let diagnostics = parser::diagnostics(&program);
        if !diagnostics.is_empty() {
            return Err(SourceError::Parse(diagnostics.join("\n")));
        }

        let mut last = self.false_id;
        for expr in &program {
            last = self.eval(expr);
            if self.heap.kind(last) == ObjKind::Error {
                return Ok(last);
            }
        }
        Ok(last)
    }

    // ===== Printing =====

    /// Render a value the way `print` and the REPL show it.
    pub fn display_value(&self, id: ValueId) -> String {
        match self.heap.get(id) {
            Object::Number(num) => num.to_string(),
            Object::Bool(true) => "true!".into(),
            Object::Bool(false) => "false!".into(),
            Object::Symbol(name) => name.clone(),
            Object::Cell(_) => {
                let inner: Vec<String> = self
                    .list_items(id)
                    .iter()
                    .map(|&item| self.display_value(item))
                    .collect();
                format!("({})", inner.join(" "))
            }
            Object::Function(_) => "#<function>".into(),
            Object::Macro(_) => "#<macro>".into(),
            Object::Error(err) => format!("#<error: {}>", err.message),
            Object::Flow(flow) => format!("#<go {}>", flow.target),
        }
    }

    /// Render an error value as a diagnostic, with the offending source
    /// text and its position when known.
    pub fn render_error(&self, id: ValueId) -> String {
        let Object::Error(err) = self.heap.get(id) else {
            return self.display_value(id);
        };
        let mut out = format!("Error: {}", err.message);
        if let Some(expr) = &err.expr {
            out.push_str(&format!("\n  in: {}", expr));
            out.push_str(&format!("\n  at: {}", expr.pos));
        }
        out
    }
}
