// ABOUTME: End-to-end tests driving source text through lex, parse, and eval

use vesper::error::SourceError;
use vesper::eval::Interp;
use vesper::heap::{ObjKind, Object};
use vesper::{lexer, parser};

/// Evaluate a program and render its final value the way the REPL would.
fn run(source: &str) -> String {
    let mut interp = Interp::new();
    let id = interp
        .eval_source(source)
        .unwrap_or_else(|e| panic!("{source:?} failed to load: {e}"));
    interp.display_value(id)
}

fn run_error(source: &str) -> String {
    let mut interp = Interp::new();
    let id = interp
        .eval_source(source)
        .unwrap_or_else(|e| panic!("{source:?} failed to load: {e}"));
    match interp.heap.get(id) {
        Object::Error(err) => err.message.clone(),
        other => panic!("{source:?} expected an error, got {other:?}"),
    }
}

// ===== The end-to-end scenarios =====

#[test]
fn test_arithmetic_fold() {
    assert_eq!(run("(+ 1 2 3)"), "6");
}

#[test]
fn test_conditional_with_quoted_symbols() {
    assert_eq!(run("(if (< 1 2) 'yes 'no)"), "yes");
}

#[test]
fn test_optional_arguments() {
    assert_eq!(run("(set f (lambda (x ? (y 10)) (+ x y))) (f 5)"), "15");
    assert_eq!(
        run("(set f (lambda (x ? (y 10)) (+ x y))) (f 5 ~ (y 1))"),
        "6"
    );
}

#[test]
fn test_macro_expansion() {
    assert_eq!(run("(set mul (mambda (a b) [* $a $b])) (mul 3 4)"), "12");
}

#[test]
fn test_tagbody_loop() {
    let source = "(tagbody
                    (start (set i 0))
                    (loop (set i (+ i 1)) (if (< i 3) (go loop) i)))";
    assert_eq!(run(source), "3");
}

#[test]
fn test_numeric_reduction_scenarios() {
    assert_eq!(run("(/ 1 2)"), "0.5");
    assert_eq!(run("(/ 1i 1i)"), "1");
}

// ===== Scope, closures, and callables =====

#[test]
fn test_closure_over_lexical_scope() {
    assert_eq!(run("(((lambda (x) (lambda (y) (+ x y))) 3) 4)"), "7");
}

#[test]
fn test_counter_closures_share_their_captured_scope() {
    let source = "(set make (lambda (n) (lambda () (set n (+ n 1)))))
                  (set tick (make 0))
                  (tick)
                  (tick)
                  (tick)";
    assert_eq!(run(source), "3");
}

#[test]
fn test_global_definition_survives_calls() {
    let source = "(set note (lambda () (global g 7)))
                  (note)
                  g";
    assert_eq!(run(source), "7");
}

#[test]
fn test_rest_and_named_arguments_together() {
    let source = "(set f (lambda (~ (mode) x & (extra)) (if mode x (len extra))))
                  (f ~ (mode false!) 9 1 2 3)";
    assert_eq!(run(source), "3");
}

#[test]
fn test_higher_order_functions() {
    let source = "(set apply-twice (lambda (f x) (f (f x))))
                  (apply-twice (lambda (n) (* n n)) 3)";
    assert_eq!(run(source), "81");
}

// ===== Quasi-quotation =====

#[test]
fn test_quasiquote_substitution_and_splice() {
    assert_eq!(run("(set x 2) [1 $x $@'(3 4) 5]"), "(1 2 3 4 5)");
}

#[test]
fn test_quote_produces_pure_data() {
    assert_eq!(run("'(a (b 1) 2)"), "(a (b 1) 2)");
}

#[test]
fn test_macro_builds_a_call_from_its_arguments() {
    let source = "(set swap-args (mambda (f a b) [$f $b $a]))
                  (swap-args - 1 10)";
    assert_eq!(run(source), "9");
}

// ===== Lists =====

#[test]
fn test_list_operations_compose() {
    assert_eq!(run("(head (tail '(1 2 3)))"), "2");
    assert_eq!(run("(len (insert '(1 3) 2 1))"), "3");
    assert_eq!(run("(nth '(10 20 30) 2)"), "30");
}

#[test]
fn test_list_bounds_errors() {
    assert_eq!(run_error("(nth '(1) 5)"), "List index out of bounds.");
    assert_eq!(
        run_error("(head '())"),
        "Cannot take the head of an empty list."
    );
}

// ===== Numbers =====

#[test]
fn test_ratio_literals() {
    assert_eq!(run("1/2"), "1/2");
    assert_eq!(run("(+ 1/2 1/2)"), "1");
    assert_eq!(run("(* 2/3 3/2)"), "1");
}

#[test]
fn test_complex_arithmetic() {
    assert_eq!(run("(* 1i 1i)"), "-1");
    assert_eq!(run("(+ 2 3i)"), "2+3i");
}

#[test]
fn test_comparison_chain() {
    assert_eq!(run("(& (< 1 2) (<= 2 2) (>= 3 2) (!= 1 2))"), "true!");
}

#[test]
fn test_complex_ordering_is_an_error() {
    assert_eq!(
        run_error("(< 1i 2)"),
        "Operations < and > are undefined on complex numbers."
    );
}

#[test]
fn test_integer_exponentiation_stays_integral() {
    assert_eq!(run("(** 2 8)"), "256");
    assert_eq!(run("(** 2 0.5)"), format!("{}", 2f64.powf(0.5)));
}

// ===== Errors and diagnostics =====

#[test]
fn test_undefined_variable_reports_position() {
    let mut interp = Interp::new();
    let id = interp
        .eval_source("(+ 1\n   missing)")
        .expect("load failed");
    let rendered = interp.render_error(id);
    assert!(rendered.contains("Variable not found: missing"));
    assert!(rendered.contains("line 2, character 4"));
}

#[test]
fn test_parse_errors_block_evaluation() {
    let mut interp = Interp::new();
    let out = interp.eval_source("(set x 1) (unclosed");
    match out {
        Err(SourceError::Parse(diagnostics)) => {
            assert!(diagnostics.contains("Unclosed list"));
        }
        other => panic!("expected parse diagnostics, got {other:?}"),
    }
    assert_eq!(interp.lookup("x"), None);
}

#[test]
fn test_lex_errors_are_fatal() {
    let mut interp = Interp::new();
    assert!(matches!(
        interp.eval_source("\"runaway"),
        Err(SourceError::Lex(_))
    ));
}

#[test]
fn test_error_predicate_on_ordinary_values() {
    assert_eq!(run("(error? 1)"), "false!");
    assert_eq!(run("(error? 'sym)"), "false!");
}

#[test]
fn test_errors_short_circuit_argument_positions() {
    // An error produced while evaluating an argument is the call's result.
    assert_eq!(
        run_error("(error? (nth '() 5))"),
        "List index out of bounds."
    );
}

#[test]
fn test_errors_propagate_out_of_nested_calls() {
    let source = "(set f (lambda (x) (+ x 1)))
                  (set g (lambda (x) (f x)))
                  (g 'sym)";
    assert!(run_error(source).contains("expected a number"));
}

// ===== Flow control =====

#[test]
fn test_go_does_not_escape_a_function() {
    let source = "(set jumper (lambda () (go out)))
                  (tagbody (out (jumper)))";
    assert!(run_error(source).contains("no tag named 'out'"));
}

#[test]
fn test_tagbody_countdown() {
    let source = "(tagbody
                    (init (set n 5) (set acc 0))
                    (loop (set acc (+ acc n))
                          (set n (- n 1))
                          (if (> n 0) (go loop) acc)))";
    assert_eq!(run(source), "15");
}

// ===== Parse/print round trip =====

#[test]
fn test_print_parse_round_trip_over_program_files() {
    let sources = [
        "(set fib (lambda (n) (if (< n 2) n (+ (fib (- n 1)) (fib (- n 2))))))",
        "(set when! (mambda (c body) [if $c $body false!]))",
        "(tagbody (a (set x 1)) (b (go a)))",
        "(print-line '(1 2i 3/4 -5.5) \"done\")",
        "{x + obj:field}",
    ];
    for source in sources {
        let first = parser::parse_tokens(lexer::lex(source).expect("lexing failed"));
        assert!(parser::diagnostics(&first).is_empty());
        let printed = first
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        let second = parser::parse_tokens(lexer::lex(&printed).expect("relexing failed"));
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert!(a.same_shape(b), "round-tripping {source:?} via {printed:?}");
        }
    }
}

// ===== Heap behavior =====

#[test]
fn test_values_survive_sustained_allocation() {
    let mut interp = Interp::new();
    let kept = interp
        .eval_source("(set kept '(a b c)) kept")
        .expect("load failed");

    // Enough evaluation to grow the heap through several chunks.
    for _ in 0..2000 {
        interp
            .eval_source("(len '(1 2 3 4 5 6 7 8))")
            .expect("load failed");
    }

    assert_eq!(interp.heap.kind(kept), ObjKind::Cell);
    assert_eq!(interp.display_value(kept), "(a b c)");
}
