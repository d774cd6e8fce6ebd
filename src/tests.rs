/*
MIT License

Copyright (c) 2026 Raja Lehtihet and Wael El Oraiby

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! Crate unit tests.

use super::*;
use crate::dual::{Dual, DualComplex};
use crate::model::format_number;
use approx::assert_relative_eq;
use num_complex::Complex64;

fn first_caret_column(pointer: &str) -> Option<usize> {
    pointer.chars().position(|ch| ch == '^').map(|idx| idx + 1)
}

fn assert_parse_error_case(
    case_name: &str,
    source: &str,
    expected_line: usize,
    expected_column: usize,
) {
    let err = parse_dsl(source).expect_err("parse should fail");
    assert_eq!(
        err.line, expected_line,
        "{case_name}: unexpected error line"
    );
    assert_eq!(
        err.column, expected_column,
        "{case_name}: unexpected error column"
    );
    assert!(
        err.message.starts_with("Syntax error"),
        "{case_name}: unexpected message '{}'",
        err.message
    );

    let expected_snippet = source
        .lines()
        .nth(err.line.saturating_sub(1))
        .unwrap_or_default();
    assert_eq!(
        err.snippet, expected_snippet,
        "{case_name}: snippet should match source line"
    );
    assert_eq!(
        first_caret_column(&err.pointer),
        Some(err.column),
        "{case_name}: caret column mismatch"
    );
}

fn external(name: &str, value: f64, locked: bool) -> ExternalVariable {
    ExternalVariable::new(name, Complex64::new(value, 0.0), locked, 1.0)
}

#[test]
fn parses_terminal_equation_with_exact_positions() {
    let system = parse_dsl("a *b=c;").expect("parse");
    assert_eq!(system.equations.len(), 1);
    let equation = &system.equations[0];
    assert_eq!(equation.span.start, 0);
    assert_eq!(equation.span.end, 7);

    let EquationKind::Terminal { left, right } = &equation.kind else {
        panic!("expected a terminal equation");
    };
    let ExprKind::Binary {
        op,
        left: factor_a,
        right: factor_b,
    } = &left.kind
    else {
        panic!("expected a product on the left");
    };
    assert_eq!(*op, BinOp::Mul);
    assert_eq!(left.span.start, 0);
    assert_eq!(left.span.end, 4);

    let ExprKind::Symbol(name) = &factor_a.kind else {
        panic!("expected symbol 'a'");
    };
    assert_eq!(name, "a");
    assert_eq!(factor_a.span.start, 0);
    assert_eq!(factor_a.span.end, 1);
    assert_eq!(factor_a.span.line, 1);
    assert_eq!(factor_a.span.column, 1);

    let ExprKind::Symbol(name) = &factor_b.kind else {
        panic!("expected symbol 'b'");
    };
    assert_eq!(name, "b");
    assert_eq!(factor_b.span.start, 3);
    assert_eq!(factor_b.span.end, 4);
    assert_eq!(factor_b.span.column, 4);

    let ExprKind::Symbol(name) = &right.kind else {
        panic!("expected symbol 'c'");
    };
    assert_eq!(name, "c");
    assert_eq!(right.span.start, 5);
    assert_eq!(right.span.end, 6);
    assert_eq!(right.span.column, 6);
}

#[test]
fn parses_operator_precedence_and_associativity() {
    let system = parse_dsl("a + b * c = d;").expect("parse");
    let EquationKind::Terminal { left, .. } = &system.equations[0].kind else {
        panic!("expected a terminal equation");
    };
    let ExprKind::Binary { op, right, .. } = &left.kind else {
        panic!("expected a sum");
    };
    assert_eq!(*op, BinOp::Add);
    let ExprKind::Binary { op, .. } = &right.kind else {
        panic!("expected the product to bind tighter");
    };
    assert_eq!(*op, BinOp::Mul);

    let system = parse_dsl("a - b - c = d;").expect("parse");
    let EquationKind::Terminal { left, .. } = &system.equations[0].kind else {
        panic!("expected a terminal equation");
    };
    let ExprKind::Binary {
        op, left: inner, ..
    } = &left.kind
    else {
        panic!("expected a difference");
    };
    assert_eq!(*op, BinOp::Sub);
    let ExprKind::Binary { op, .. } = &inner.kind else {
        panic!("expected left-associative folding");
    };
    assert_eq!(*op, BinOp::Sub);
}

#[test]
fn parses_numeric_literal_forms() {
    let system = parse_dsl("var f = 2.5k[Hz];").expect("parse");
    let literal = &system.vars[0].literal;
    assert_eq!(literal.real, 2.5);
    assert_eq!(literal.real_span.start, 8);
    assert_eq!(literal.real_span.end, 11);
    assert_eq!(literal.prefix.symbol, "k");
    assert_eq!(literal.prefix.factor, 1e3);
    assert_eq!(literal.unit.as_deref(), Some("Hz"));
    assert_eq!(literal.value(), Complex64::new(2500.0, 0.0));
    assert_eq!(literal.span.start, 8);
    assert_eq!(literal.span.end, 16);

    let system = parse_dsl("var x = 1:2;").expect("parse");
    let literal = &system.vars[0].literal;
    assert_eq!(literal.real_span.start, 8);
    assert_eq!(literal.real_span.end, 9);
    let imag = literal.imag.as_ref().expect("imaginary part");
    assert_eq!(imag.value, 2.0);
    assert_eq!(imag.span.start, 10);
    assert_eq!(imag.span.end, 11);
    assert_eq!(literal.value(), Complex64::new(1.0, 2.0));

    let system = parse_dsl("var n = -3.5;").expect("parse");
    assert_eq!(system.vars[0].literal.value().re, -3.5);

    let system = parse_dsl("var e = 1.2e3;").expect("parse");
    assert_eq!(system.vars[0].literal.value().re, 1200.0);
}

#[test]
fn bare_m_suffix_reads_as_metres() {
    let system = parse_dsl("var d = 10m;").expect("parse");
    let literal = &system.vars[0].literal;
    assert!(literal.prefix.is_none());
    assert_eq!(literal.unit.as_deref(), Some("m"));
    assert_eq!(literal.value().re, 10.0);

    // With an explicit unit the same letter is the milli prefix.
    let system = parse_dsl("var e = 10m[s];").expect("parse");
    let literal = &system.vars[0].literal;
    assert_eq!(literal.prefix.symbol, "m");
    assert_eq!(literal.unit.as_deref(), Some("s"));
    assert_relative_eq!(literal.value().re, 0.01, epsilon = 1e-15);
}

#[test]
fn si_prefixes_scale_literals() {
    for prefix in PrefixTable::default().entries() {
        let source = format!("var x = 1.5{}[V];", prefix.symbol);
        let system = parse_dsl(&source).expect("prefixed literal should parse");
        let literal = &system.vars[0].literal;
        assert_eq!(literal.unit.as_deref(), Some("V"));
        assert_relative_eq!(
            literal.value().re,
            1.5 * prefix.factor,
            max_relative = 1e-12
        );
    }
}

#[test]
fn formatted_numbers_reparse_within_tolerance() {
    let values = [
        0.0,
        1.0,
        -2.5,
        0.25,
        1234.5678,
        9.5e-5,
        3.0e15,
        -4.25e20,
        6.1e-9,
    ];
    for &value in &values {
        let formatted = format_number(value);
        let source = format!("var x = {formatted};");
        let system = parse_dsl(&source).expect("formatted literal should reparse");
        let parsed = system.vars[0].literal.value();
        assert_relative_eq!(parsed.re, value, max_relative = 1e-12);
        assert_eq!(parsed.im, 0.0);
    }
    assert_eq!(format_number(0.0), "0");
}

#[test]
fn custom_prefix_tables_are_explicit() {
    let table = PrefixTable::new(vec![SiPrefix::new("Q", 1e30), SiPrefix::none()]);
    let system = parse_dsl_with_prefixes("var x = 2Q;", &table).expect("parse");
    assert_relative_eq!(system.vars[0].literal.value().re, 2e30, max_relative = 1e-12);

    // The default table does not know 'Q', so the literal ends before it.
    let err = parse_dsl("var x = 2Q;").expect_err("unknown prefix should not parse");
    assert_eq!(err.column, 10);
}

#[test]
fn parses_equation_definition_with_params_and_body() {
    let system = parse_dsl("eq pyth(a, b, c){ a*a + b*b = c*c; }").expect("parse");
    assert_eq!(system.defs.len(), 1);
    let def = &system.defs[0];
    assert_eq!(def.name, "pyth");
    let params: Vec<&str> = def.params.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(params, ["a", "b", "c"]);
    assert_eq!(def.body.len(), 1);
    assert!(matches!(def.body[0].kind, EquationKind::Terminal { .. }));
}

#[test]
fn accepts_positional_then_named_call_arguments() {
    let system = parse_dsl("f(1, 2, c: 3, d: 4);").expect("parse");
    let EquationKind::Call(call) = &system.equations[0].kind else {
        panic!("expected a call equation");
    };
    assert_eq!(call.name, "f");
    assert_eq!(call.positional.len(), 2);
    let named: Vec<&str> = call.named.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(named, ["c", "d"]);
}

#[test]
fn rejects_positional_argument_after_named() {
    let err = parse_dsl("foo(foo:bar,1);").expect_err("parse should fail");
    assert_eq!(err.line, 1);
    assert_eq!(err.column, 13);
    assert!(err.message.contains("a parameter name"));
}

#[test]
fn reports_parse_errors_at_furthest_failure() {
    let cases = [
        ("missing value after equals", "var x = ;", 1, 9),
        ("missing semicolon after declaration", "var x = 1", 1, 10),
        ("unterminated unit bracket", "var x = 1[Hz;", 1, 14),
        ("missing imaginary digits", "var x = 1:;", 1, 11),
        ("unclosed call argument list", "f(1, 2;", 1, 7),
        ("missing equation right side", "var x = 1;\nx = ;", 2, 5),
        ("second declaration incomplete", "var a = 1;\nvar b = ;", 2, 9),
        ("unterminated definition body", "eq f(a){ a = 1;", 1, 16),
        ("not a statement at all", "@@@", 1, 1),
    ];
    for (case_name, source, line, column) in cases {
        assert_parse_error_case(case_name, source, line, column);
    }
}

#[test]
fn parse_error_display_includes_snippet_and_caret() {
    let err = parse_dsl("var b = ;").expect_err("parse should fail");
    assert!(err.message.contains("a numeric value"));
    let rendered = err.to_string();
    assert!(rendered.contains("line 1, column 9"));
    assert!(rendered.contains("var b = ;"));
    assert!(rendered.lines().last().unwrap_or_default().ends_with('^'));
}

#[test]
fn collects_unknown_symbol_batch_and_never_solves() {
    let err = solve_dsl("var a = 1; a = b + c;", &[]).expect_err("compile should fail");
    let SolveError::Compile(batch) = err else {
        panic!("expected a compile error batch");
    };
    assert_eq!(batch.len(), 2);
    assert!(batch.errors[0].message.contains("Unknown symbol 'b'"));
    assert!(batch.errors[1].message.contains("Unknown symbol 'c'"));
}

#[test]
fn reports_compile_error_line_and_column() {
    let err = solve_dsl("var x = 1;\nx = y;", &[]).expect_err("compile should fail");
    let SolveError::Compile(batch) = &err else {
        panic!("expected a compile error batch");
    };
    let first = batch.first().expect("at least one error");
    assert!(first.message.contains("Unknown symbol 'y'"));
    assert_eq!(first.line, 2);
    assert_eq!(first.column, 5);
    assert_eq!(first.snippet, "x = y;");
    assert_eq!(first_caret_column(&first.pointer), Some(5));
    assert!(err.to_string().contains("line 2, column 5"));
}

#[test]
fn rejects_duplicate_declarations_before_solving() {
    let err = solve_dsl("var a = 1; var a = 2; a = 3;", &[]).expect_err("compile should fail");
    let SolveError::Compile(batch) = err else {
        panic!("expected a compile error batch");
    };
    assert!(batch.errors[0]
        .message
        .contains("Duplicate declaration of variable 'a'"));

    let doubled = [external("a", 1.0, false), external("a", 2.0, false)];
    let err = solve_dsl("a = 1;", &doubled).expect_err("compile should fail");
    let SolveError::Compile(batch) = err else {
        panic!("expected a compile error batch");
    };
    assert!(batch.errors[0].message.contains("Duplicate variable 'a'"));

    let clashing = [external("a", 1.0, false)];
    let err = solve_dsl("var a = 2; a = 3;", &clashing).expect_err("compile should fail");
    let SolveError::Compile(batch) = err else {
        panic!("expected a compile error batch");
    };
    assert!(batch.errors[0]
        .message
        .contains("Duplicate declaration of variable 'a'"));
}

#[test]
fn reports_definition_and_call_binding_mismatches() {
    let def = "eq f(a, b){ a = b; }";

    let err = solve_dsl(&format!("{def} f(1);"), &[]).expect_err("missing argument");
    let SolveError::Compile(batch) = err else {
        panic!("expected a compile error batch");
    };
    assert!(batch.errors[0]
        .message
        .contains("Missing argument(s) for parameter(s) 'b' of 'f'"));

    let err = solve_dsl(&format!("{def} f(1, 2, 3);"), &[]).expect_err("extra argument");
    let SolveError::Compile(batch) = err else {
        panic!("expected a compile error batch");
    };
    assert!(batch.errors[0]
        .message
        .contains("'f' declares 2 parameter(s), found 3 positional argument(s)"));

    let err = solve_dsl(&format!("{def} f(1, c: 2);"), &[]).expect_err("unknown parameter");
    let SolveError::Compile(batch) = err else {
        panic!("expected a compile error batch");
    };
    assert!(batch
        .errors
        .iter()
        .any(|e| e.message.contains("Unknown parameter 'c' for 'f'")));

    let err = solve_dsl(&format!("{def} f(1, a: 2);"), &[]).expect_err("double binding");
    let SolveError::Compile(batch) = err else {
        panic!("expected a compile error batch");
    };
    assert!(batch
        .errors
        .iter()
        .any(|e| e.message.contains("Parameter 'a' of 'f' is bound more than once")));

    let err = solve_dsl("eq g(a, a){ a = 1; }", &[]).expect_err("duplicate parameter");
    let SolveError::Compile(batch) = err else {
        panic!("expected a compile error batch");
    };
    assert!(batch.errors[0]
        .message
        .contains("Duplicate parameter 'a' in definition 'g'"));

    let err =
        solve_dsl("eq f(a){ a = 1; } eq f(b){ b = 2; }", &[]).expect_err("duplicate definition");
    let SolveError::Compile(batch) = err else {
        panic!("expected a compile error batch");
    };
    assert!(batch.errors[0]
        .message
        .contains("Duplicate equation definition 'f'"));
}

#[test]
fn reports_builtin_misuse() {
    let err = solve_dsl("var x = 1; sqrt(x, x) = 1;", &[]).expect_err("arity");
    let SolveError::Compile(batch) = err else {
        panic!("expected a compile error batch");
    };
    assert!(batch.errors[0]
        .message
        .contains("'sqrt' expects exactly 1 argument(s), found 2"));

    let err = solve_dsl("var x = 1; atan2(y: x) = 1;", &[]).expect_err("named argument");
    let SolveError::Compile(batch) = err else {
        panic!("expected a compile error batch");
    };
    assert!(batch.errors[0]
        .message
        .contains("'atan2' does not take named arguments"));

    let err = solve_dsl("var x = 1; nosuch(x) = 1;", &[]).expect_err("unknown function");
    let SolveError::Compile(batch) = err else {
        panic!("expected a compile error batch");
    };
    assert!(batch.errors[0].message.contains("Unknown function 'nosuch'"));
}

#[test]
fn rejects_recursive_definition_invocation() {
    let err = solve_dsl("eq cycle(n){ cycle(n); } cycle(1);", &[]).expect_err("recursion");
    let SolveError::Compile(batch) = err else {
        panic!("expected a compile error batch");
    };
    assert_eq!(batch.len(), 1);
    assert!(batch.errors[0]
        .message
        .contains("Recursive invocation of equation definition 'cycle'"));
}

#[test]
fn model_reports_equation_and_slot_counts() {
    let model = compile_dsl("var a = 1; lvar b = 2; a = b;", &[]).expect("compile");
    assert_eq!(model.equation_count(), 1);
    assert_eq!(model.unknown_slot_count(), 2);
    assert_eq!(model.variable_names(), ["a", "b"]);
}

#[test]
fn solves_linear_system_and_patches_source() {
    let source = "var a = 1; lvar b = 3; var c = 1; a * b = c; c = 6;";
    let result = solve_dsl(source, &[]).expect("solve");
    assert!((result.real("a").expect("a") - 2.0).abs() < 1e-12);
    assert!((result.real("b").expect("b") - 3.0).abs() < 1e-12);
    assert!((result.real("c").expect("c") - 6.0).abs() < 1e-12);
    assert_eq!(result.iterations(), 1);
    assert!(result.residual() < 1e-14);
    assert_eq!(
        result.source(),
        "var a = 2; lvar b = 3; var c = 6; a * b = c; c = 6;"
    );
}

#[test]
fn forward_references_resolve_before_solving() {
    let source = "a * b = c; var a = 1; lvar b = 3; var c = 1; c = 6;";
    let result = solve_dsl(source, &[]).expect("solve");
    assert!((result.real("a").expect("a") - 2.0).abs() < 1e-12);
    assert!((result.real("c").expect("c") - 6.0).abs() < 1e-12);
}

#[test]
fn preserves_comments_and_locked_declarations() {
    let source =
        "// sheet inputs\nlvar rate = 3; // locked\nvar total = 1;\ntotal = rate * 4; // equation\n";
    let result = solve_dsl(source, &[]).expect("solve");
    assert_eq!(
        result.source(),
        "// sheet inputs\nlvar rate = 3; // locked\nvar total = 12;\ntotal = rate * 4; // equation\n"
    );
}

#[test]
fn shrinking_values_keep_edit_offsets_straight() {
    let source = "var a = 100; var b = 1; a = 2; b = a;";
    let result = solve_dsl(source, &[]).expect("solve");
    assert_eq!(result.source(), "var a = 2; var b = 2; a = 2; b = a;");
}

#[test]
fn idempotent_on_already_converged_source() {
    let first = solve_dsl("var a = 1; lvar b = 3; var c = 1; a * b = c; c = 6;", &[])
        .expect("first solve");
    let second = solve_dsl(first.source(), &[]).expect("second solve");
    assert_eq!(second.iterations(), 0);
    assert_eq!(second.source(), first.source());
}

#[test]
fn external_variables_share_namespace_and_update() {
    let externals = [
        ExternalVariable::new("x", Complex64::new(1.0, 0.0), false, 1.0),
        ExternalVariable::new("k", Complex64::new(4.0, 0.0), true, 1e3),
    ];
    let result = solve_dsl("x * x = k;", &externals).expect("solve");
    assert!((result.real("x").expect("x") - 2.0).abs() < 1e-7);
    assert_eq!(result.source(), "x * x = k;");

    let updated = result.variables();
    assert_eq!(updated[0].name, "x");
    assert!((updated[0].value.re - 2.0).abs() < 1e-7);
    assert!(!updated[0].locked);
    assert_eq!(updated[1].name, "k");
    assert_eq!(updated[1].value, Complex64::new(4.0, 0.0));
    assert!(updated[1].locked);
    assert_eq!(updated[1].si_prefix_factor, 1e3);

    assert!(matches!(
        result.value("nope"),
        Err(SolveError::MissingValue(_))
    ));
}

#[test]
fn expands_nested_definitions_depth_first() {
    let source = "\
var a = 1;
var b = 1;
eq sq(u, v){ u * u = v; }
eq chain(p){ sq(p, 9); sq(u: p + 1, v: b); }
chain(a);
";
    let result = solve_dsl(source, &[]).expect("solve");
    assert!((result.real("a").expect("a") - 3.0).abs() < 1e-7);
    assert!((result.real("b").expect("b") - 16.0).abs() < 1e-6);
}

#[test]
fn solves_with_sqrt_builtin() {
    let result = solve_dsl("var x = 2; sqrt(x) = 3;", &[]).expect("solve");
    assert!((result.real("x").expect("x") - 9.0).abs() < 1e-7);
}

#[test]
fn solves_division_and_precedence_system() {
    let source = "var x = 1; var y = 1; 1 + 6 / x = 3; (1 + y) * 2 = 8;";
    let result = solve_dsl(source, &[]).expect("solve");
    assert!((result.real("x").expect("x") - 3.0).abs() < 1e-7);
    assert!((result.real("y").expect("y") - 3.0).abs() < 1e-9);
}

#[test]
fn solves_complex_linear_system_and_patches_imaginary_spans() {
    let result = solve_dsl("var z = 1:1; z + z = 4:6;", &[]).expect("solve");
    let z = result.value("z").expect("z");
    assert!((z - Complex64::new(2.0, 3.0)).norm() < 1e-12);
    assert_eq!(result.source(), "var z = 2:3; z + z = 4:6;");
}

#[test]
fn solves_complex_quadratic_system() {
    let result = solve_dsl("var z = 2:0; z * z = 0:2;", &[]).expect("solve");
    let z = result.value("z").expect("z");
    assert!((z - Complex64::new(1.0, 1.0)).norm() < 1e-7);
    assert!(result.iterations() > 0);

    // The patched literal reparses to the solved value.
    let reparsed = parse_dsl(result.source()).expect("patched source should parse");
    assert!((reparsed.vars[0].literal.value() - z).norm() < 1e-12);
}

#[test]
fn bare_atan2_equation_has_a_singular_jacobian() {
    let err = solve_dsl("var t = 0.5; lvar y = 1; atan2(y, t) = 1;", &[])
        .expect_err("solve should fail");
    assert!(matches!(err, SolveError::Numerical(ref m) if m.contains("singular")));
}

#[test]
fn fully_locked_system_solves_only_when_consistent() {
    let result = solve_dsl("lvar a = 1; a = 1;", &[]).expect("consistent system");
    assert_eq!(result.iterations(), 0);
    assert_eq!(result.source(), "lvar a = 1; a = 1;");

    let err = solve_dsl("lvar a = 1; a = 2;", &[]).expect_err("no unknowns to adjust");
    assert!(matches!(err, SolveError::Numerical(ref m) if m.contains("no unknowns")));

    let locked = [external("x", 1.0, true)];
    let err = solve_dsl("x = 2;", &locked).expect_err("no unknowns to adjust");
    assert!(matches!(err, SolveError::Numerical(ref m) if m.contains("no unknowns")));
}

#[test]
fn solves_atan2_with_imaginary_coupling() {
    let source = "var t = 0.5; var s = 1; lvar y = 1; atan2(y, t) = s; s = 1;";
    let result = solve_dsl(source, &[]).expect("solve");
    let expected = 1.0 / (1.0_f64).tan();
    assert!((result.real("t").expect("t") - expected).abs() < 1e-9);
}

#[test]
fn least_squares_failure_reports_ranked_residuals() {
    let source = "var x = 1;\nx = 0;\nx = 10;\nx = 11;";
    let err = solve_dsl(source, &[]).expect_err("contradictory system");
    let report = err.failure_report().expect("failure report");
    assert!(report.error > 8.0 && report.error < 9.0);
    assert!(report.damping < 0.1);
    assert!(report.iterations < 100);

    // Worst residuals first: |7| at line 2, then |-4| at line 4, then |-3|.
    assert_eq!(report.worst.len(), 3);
    assert_eq!(report.worst[0].equation_index, 0);
    assert!((report.worst[0].magnitude - 7.0).abs() < 1e-9);
    assert_eq!(report.worst[0].line, 2);
    assert_eq!(report.worst[0].column, 1);
    assert_eq!(report.worst[0].description, "equation");
    assert_eq!(report.worst[0].snippet, "x = 0;");
    assert_eq!(report.worst[1].equation_index, 2);
    assert_eq!(report.worst[1].line, 4);
    assert_eq!(report.worst[2].equation_index, 1);

    let rendered = err.to_string();
    assert!(rendered.contains("No convergence after"));
    assert!(rendered.contains("at line 2, column 1"));
}

#[test]
fn iteration_cap_respects_custom_settings() {
    let settings = NewtonSettings {
        max_iterations: 5,
        ..NewtonSettings::default()
    };
    let err = solve_dsl_with(
        "var x = 1;\nx = 0;\nx = 10;\nx = 11;",
        &[],
        &PrefixTable::default(),
        &settings,
    )
    .expect_err("cap should trip");
    let report = err.failure_report().expect("failure report");
    assert_eq!(report.iterations, 5);
}

#[test]
fn dual_arithmetic_follows_differentiation_rules() {
    let a = Dual::seeded(3.0, 0, 2);
    let b = Dual::seeded(4.0, 1, 2);

    let sum = &a + &b;
    assert_relative_eq!(sum.value, 7.0, epsilon = 1e-12);
    assert_relative_eq!(sum.deriv[0], 1.0, epsilon = 1e-12);
    assert_relative_eq!(sum.deriv[1], 1.0, epsilon = 1e-12);

    let difference = &a - &b;
    assert_relative_eq!(difference.value, -1.0, epsilon = 1e-12);
    assert_relative_eq!(difference.deriv[0], 1.0, epsilon = 1e-12);
    assert_relative_eq!(difference.deriv[1], -1.0, epsilon = 1e-12);

    let product = &a * &b;
    assert_relative_eq!(product.value, 12.0, epsilon = 1e-12);
    assert_relative_eq!(product.deriv[0], 4.0, epsilon = 1e-12);
    assert_relative_eq!(product.deriv[1], 3.0, epsilon = 1e-12);

    let quotient = &a / &b;
    assert_relative_eq!(quotient.value, 0.75, epsilon = 1e-12);
    assert_relative_eq!(quotient.deriv[0], 0.25, epsilon = 1e-12);
    assert_relative_eq!(quotient.deriv[1], -0.1875, epsilon = 1e-12);

    let negated = -&a;
    assert_relative_eq!(negated.value, -3.0, epsilon = 1e-12);
    assert_relative_eq!(negated.deriv[0], -1.0, epsilon = 1e-12);

    let scaled = a.scale(2.0);
    assert_relative_eq!(scaled.value, 6.0, epsilon = 1e-12);
    assert_relative_eq!(scaled.deriv[0], 2.0, epsilon = 1e-12);
}

#[test]
fn dual_sqrt_and_atan2_derivatives() {
    let root = Dual::seeded(9.0, 0, 1).sqrt();
    assert_relative_eq!(root.value, 3.0, epsilon = 1e-12);
    assert_relative_eq!(root.deriv[0], 1.0 / 6.0, epsilon = 1e-12);

    let y = Dual::seeded(1.0, 0, 2);
    let x = Dual::seeded(2.0, 1, 2);
    let angle = y.atan2(&x);
    assert_relative_eq!(angle.value, (0.5_f64).atan(), epsilon = 1e-12);
    assert_relative_eq!(angle.deriv[0], 0.4, epsilon = 1e-12);
    assert_relative_eq!(angle.deriv[1], -0.2, epsilon = 1e-12);
}

#[test]
fn dual_complex_algebra_and_derivatives() {
    let z = DualComplex::seeded(Complex64::new(3.0, 4.0), 0, 2);

    let squared = &z * &z;
    assert_relative_eq!(squared.re.value, -7.0, epsilon = 1e-12);
    assert_relative_eq!(squared.im.value, 24.0, epsilon = 1e-12);
    assert_relative_eq!(squared.re.deriv[0], 6.0, epsilon = 1e-12);
    assert_relative_eq!(squared.re.deriv[1], -8.0, epsilon = 1e-12);
    assert_relative_eq!(squared.im.deriv[0], 8.0, epsilon = 1e-12);
    assert_relative_eq!(squared.im.deriv[1], 6.0, epsilon = 1e-12);

    // d(1/z)/dz = -1/z^2 = (7 + 24i)/625 at z = 3+4i.
    let inverse = z.recip();
    assert_relative_eq!(inverse.re.value, 0.12, epsilon = 1e-12);
    assert_relative_eq!(inverse.im.value, -0.16, epsilon = 1e-12);
    assert_relative_eq!(inverse.re.deriv[0], 7.0 / 625.0, epsilon = 1e-12);
    assert_relative_eq!(inverse.im.deriv[0], 24.0 / 625.0, epsilon = 1e-12);
    assert_relative_eq!(inverse.re.deriv[1], -24.0 / 625.0, epsilon = 1e-12);
    assert_relative_eq!(inverse.im.deriv[1], 7.0 / 625.0, epsilon = 1e-12);
}

#[test]
fn dual_complex_sqrt_principal_branch() {
    // d(sqrt z)/dz = 1/(2 sqrt z) = (2 - i)/10 at z = 3+4i.
    let root = DualComplex::seeded(Complex64::new(3.0, 4.0), 0, 2).sqrt();
    assert_relative_eq!(root.re.value, 2.0, epsilon = 1e-12);
    assert_relative_eq!(root.im.value, 1.0, epsilon = 1e-12);
    assert_relative_eq!(root.re.deriv[0], 0.2, epsilon = 1e-12);
    assert_relative_eq!(root.re.deriv[1], 0.1, epsilon = 1e-12);
    assert_relative_eq!(root.im.deriv[0], -0.1, epsilon = 1e-12);
    assert_relative_eq!(root.im.deriv[1], 0.2, epsilon = 1e-12);

    let negative = DualComplex::constant(Complex64::new(-4.0, 0.0), 1).sqrt();
    assert_relative_eq!(negative.re.value, 0.0, epsilon = 1e-12);
    assert_relative_eq!(negative.im.value, 2.0, epsilon = 1e-12);
    assert_relative_eq!(negative.im.deriv[0], 0.0, epsilon = 1e-12);
}
