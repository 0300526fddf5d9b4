use std::{fs, rc::Rc, thread};

use mbase::{
    RunOptions,
    diagnostic::BufferConsole,
    interpreter::value::{base_literal::BaseLiteral, core::Value},
    run_source,
};
use walkdir::WalkDir;

#[test]
fn demo_programs_run() {
    let mut count = 0;

    for entry in
        WalkDir::new("demos").into_iter()
                             .filter_map(Result::ok)
                             .filter(|e| e.path().extension().is_some_and(|ext| ext == "mb"))
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        count += 1;
        let console = Rc::new(BufferConsole::new());
        let options = RunOptions::file(path.display().to_string());
        if let Err(e) = run_source(&source, &options, console.clone()) {
            panic!("Demo {path:?} failed: {e}\n{:?}", console.diagnostics());
        }
        assert!(console.diagnostics().is_empty(),
                "Demo {path:?} reported {:?}",
                console.diagnostics());
    }

    assert!(count > 0, "No demo programs found in demos/");
}

fn run(src: &str) -> (Result<Option<Value>, String>, Rc<BufferConsole>) {
    let console = Rc::new(BufferConsole::new());
    let result = run_source(src, &RunOptions::default(), console.clone()).map_err(|e| e.to_string());
    (result, console)
}

/// Runs `src` and returns the rendering of its last non-unit result.
fn assert_success(src: &str) -> String {
    match run(src) {
        (Ok(result), _) => result.map(|value| value.to_string()).unwrap_or_default(),
        (Err(e), console) => panic!("Script failed: {e}\n{:?}", console.diagnostics()),
    }
}

/// Runs `src`, expecting it to fail, and returns the reported failure kind.
fn assert_failure(src: &str) -> &'static str {
    let (result, console) = run(src);
    assert!(result.is_err(), "Script succeeded but was expected to fail");

    let diagnostics = console.diagnostics();
    assert_eq!(diagnostics.len(), 1, "expected exactly one report: {diagnostics:?}");
    diagnostics[0].label
}

fn output_of(src: &str) -> String {
    let (_, console) = run(src);
    console.output()
}

#[test]
fn assignment_and_basic_arithmetic() {
    assert_eq!(assert_success("x = 5\nret x + 3"), "8");
    assert_eq!(assert_success("x = 7 * 9; ret x"), "63");
    assert_eq!(assert_success("ret 8 - 5 - 1"), "2");
    assert_eq!(assert_success("ret 7 / 2"), "3");
    assert_eq!(assert_success("ret (1 + 2) * 3"), "9");
}

#[test]
fn arithmetic_stays_in_the_left_base() {
    assert_eq!(assert_success("ret b16@ff + 1"), "b16@100");
    assert_eq!(assert_success("ret b2@101 * b16@3"), "b2@1111");
    assert_eq!(assert_success("ret 10 + b2@10"), "12");
    assert_eq!(assert_success("ret b64@(Zz)"), "b64@zz");
}

#[test]
fn literals_grow_without_bound() {
    let big = "9".repeat(45);
    let source = format!("x = {big}\nif (x > b16@ffffffffffffffffffffffffffffffff) {{ out(\"wide\") }}\nret x + 1");
    let (result, console) = run(&source);
    assert_eq!(result.map(|value| value.map(|v| v.to_string())),
               Ok(Some(format!("1{}", "0".repeat(45)))));
    assert_eq!(console.output(), "wide");

    let wide = "z".repeat(40);
    assert_eq!(assert_success(&format!("x = b64@({wide})\nret rebase(rebase(x, 2), 64) === x")), "1");
    assert_eq!(assert_success(&format!("ret b36@{wide} - b36@{wide}")), "b36@0");
}

#[test]
fn last_non_unit_result_is_returned() {
    let (result, _) = run("x = b16@ff\nret x\ny = 1");
    assert_eq!(result, Ok(Some(Value::Literal(BaseLiteral::new(16, "ff").unwrap()))));

    let (result, _) = run("x = 1");
    assert_eq!(result, Ok(None));
}

#[test]
fn rebase_native() {
    assert_eq!(assert_success("ret rebase(b16@ff, 2)"), "b2@11111111");
    assert_eq!(assert_success("ret rebase(b2@11111111, 16)"), "b16@ff");
    assert_eq!(assert_failure("rebase(1, 65)"), "ValueError");
}

#[test]
fn text_natives() {
    assert_eq!(assert_success("ret len(\"héllo\")"), "5");
    assert_eq!(assert_success("ret str(b8@17) + \"!\""), "b8@17!");
    assert_eq!(assert_success("ret number(\"42\") + 1"), "43");
    assert_eq!(assert_success("ret sqrt(b10@(99))"), "9");
    assert_eq!(assert_failure("number(\"4x\")"), "ValueError");
}

#[test]
fn input_and_output() {
    let console = Rc::new(BufferConsole::with_input(["Ada"]));
    let source = "name = in()\nout(\"hello, \" + name)";
    run_source(source, &RunOptions::default(), console.clone()).unwrap();
    assert_eq!(console.output(), "hello, Ada");
}

#[test]
fn text_interpolation() {
    assert_eq!(assert_success("ret \"sum = {1 + 2}\""), "sum = 3");
    assert_eq!(assert_success("x = b16@ff\nret \"x is {x}\""), "x is b16@ff");
    assert_eq!(assert_success("ret \"\\{literal\\}\""), "{literal}");
    assert_eq!(assert_success(r#"ret "{\"a\" + \"b\"}c""#), "abc");
    assert_eq!(assert_failure("out(\"{1 2}\")"), "SyntaxError");
}

#[test]
fn user_defined_functions() {
    let add = "fn add(b10 a, b10 b) b10 {\n  ret a + b\n}\n";
    assert_eq!(assert_success(&format!("{add}ret add(3, 4)")), "7");

    let fact = "fn fact(b10 n) b10 {\n  if (n < 2) { ret 1 }\n  ret n * fact(n - 1)\n}\n";
    assert_eq!(assert_success(&format!("{fact}ret fact(5)")), "120");

    assert_eq!(assert_success("fn nothing() { x = 1 }\nret \"[{nothing()}]\""), "[]");
}

#[test]
fn runaway_recursion_is_a_recursion_error() {
    let source = "fn down(b10 n) b10 { ret down(n + 1) }\ndown(0)\nout(\"after\")";
    let (failed, output, diagnostics) =
        thread::Builder::new().stack_size(256 * 1024 * 1024)
                              .spawn(move || {
                                  let (result, console) = run(source);
                                  (result.is_err(), console.output(), console.diagnostics())
                              })
                              .unwrap()
                              .join()
                              .unwrap();

    assert!(failed);
    assert_eq!(output, "");
    assert_eq!(diagnostics.len(), 1, "expected exactly one report: {diagnostics:?}");
    assert_eq!(diagnostics[0].label, "RecursionError");
}

#[test]
fn bounded_recursion_still_runs() {
    let count = "fn count(b10 n) b10 {\n  if (n == 0) { ret 0 }\n  ret 1 + count(n - 1)\n}\n";
    assert_eq!(assert_success(&format!("{count}ret count(30)")), "30");
}

#[test]
fn calls_are_checked_before_running() {
    let source = "fn f(b10 a) {\n  out(\"ran\")\n}\nf(1, 2)";
    let (result, console) = run(source);
    assert!(result.is_err());
    assert_eq!(console.output(), "");
    assert_eq!(console.diagnostics()[0].label, "ArityError");

    assert_eq!(assert_failure("fn f(b10 a) { ret a }\nf(b16@a)"), "TypeError");
    assert_eq!(assert_failure("fn f(str a) { ret a }\nf(1)"), "TypeError");
    assert_eq!(assert_success("fn f(b_ a) { ret a }\nret f(b3@12)"), "b3@12");
}

#[test]
fn native_arity_mismatch_prints_nothing() {
    assert_eq!(assert_failure("out(\"a\", \"b\")"), "ArityError");
    assert_eq!(output_of("out(\"a\", \"b\")"), "");
}

#[test]
fn unknown_type_tags_fail_at_declaration() {
    assert_eq!(assert_failure("fn f(int a) { }"), "TypeError");
}

#[test]
fn calls_work_on_a_copy_of_the_caller() {
    assert_eq!(assert_success("x = 1\nfn set() { x = 2 }\nset()\nret x"), "1");
    assert_eq!(assert_success("y = 5\nfn get() b10 { ret y }\nret get()"), "5");
    assert_eq!(assert_failure("fn outer() {\n  fn inner() { ret 1 }\n  ret inner()\n}\nouter()\ninner()"),
               "NameError");
}

#[test]
fn labeled_continue_skips_to_the_outer_loop() {
    let source = r"
count = 0
i = 0
while @outer (i < 3) {
  i = i + 1
  j = 0
  while (j < 10) {
    j = j + 1
    if (j == 3) { continue @outer }
    count = count + 1
  }
}
ret count
";
    assert_eq!(assert_success(source), "6");
}

#[test]
fn labeled_break_leaves_enclosing_constructs() {
    let source = "n = 0\nloop @a {\n  loop {\n    n = n + 1\n    if (n == 4) { break @a }\n  }\n}\nret n";
    assert_eq!(assert_success(source), "4");

    let source = "x = 0\nif @check (1) {\n  x = 1\n  break @check\n  x = 2\n}\nret x";
    assert_eq!(assert_success(source), "1");
}

#[test]
fn escaping_jumps_are_control_flow_errors() {
    assert_eq!(assert_failure("break"), "ControlFlowError");
    assert_eq!(assert_failure("loop { break @missing }"), "ControlFlowError");
    assert_eq!(assert_failure("fn f() { break }\nf()"), "ControlFlowError");
}

#[test]
fn jumps_inside_calls_reach_the_callers_loop() {
    let source = "fn stop() { break }\nn = 0\nwhile (1) {\n  n = n + 1\n  if (n == 3) { stop() }\n}\nret n";
    assert_eq!(assert_success(source), "3");

    let source = r#"
fn skip() { continue @outer }
seen = ""
i = 0
while @outer (i < 3) {
  i = i + 1
  if (i == 2) { skip() }
  seen = seen + str(i)
}
out(seen)
"#;
    assert_eq!(output_of(source), "13");
    assert_eq!(output_of("fn f() { break }\nwhile (1) { f() }\nout(\"done\")"), "done");
}

#[test]
fn loose_and_strict_equality() {
    assert_eq!(assert_success("ret b2@1010 == 10"), "1");
    assert_eq!(assert_success("ret b2@1010 === 10"), "0");
    assert_eq!(assert_success("ret b2@1010 !== 10"), "1");
    assert_eq!(assert_success("ret b10@(10) === 10"), "1");
    assert_eq!(assert_success("ret \"a\" == \"a\" && \"a\" !== 1"), "1");
}

#[test]
fn logical_operators_short_circuit() {
    assert_eq!(assert_success("ret 0 && undefined"), "0");
    assert_eq!(assert_success("ret 1 || undefined"), "1");
}

#[test]
fn operator_failures_are_reported_and_execution_continues() {
    let (result, console) = run("x = 1 / 0\nout(\"after\")");
    assert!(result.is_ok());
    assert_eq!(console.output(), "after");

    let diagnostics = console.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].label, "ValueError");
    assert_eq!(diagnostics[0].message, "Division by zero");
}

#[test]
fn syntax_errors_prevent_execution() {
    let (result, console) = run("out(\"a\")\nx = (1");
    assert!(result.is_err());
    assert_eq!(console.output(), "");
    assert_eq!(console.diagnostics()[0].label, "SyntaxError");

    assert_eq!(assert_failure("x = 1 $ 2"), "LexError");
    assert_eq!(assert_failure("out(\"open"), "LexError");
    assert_eq!(assert_failure("x = b2@(12)"), "ValueError");
}

#[test]
fn diagnostics_point_at_the_failure() {
    let (_, console) = run("x = 1\ny = foo(1)");
    let diagnostic = &console.diagnostics()[0];
    assert_eq!(diagnostic.label, "NameError");
    assert_eq!(diagnostic.render(false),
               "<input>:2:5\ny = foo(1)\n    ^\n[NameError]: Unknown function 'foo'");
}

#[test]
fn escapes_do_not_shift_interpolation_positions() {
    let (_, console) = run("out(\"\\t\\\"{foo(1)}\")");
    let diagnostic = &console.diagnostics()[0];
    assert_eq!(diagnostic.label, "NameError");
    assert_eq!(diagnostic.render(false),
               "<input>:1:11\nout(\"\\t\\\"{foo(1)}\")\n          ^\n[NameError]: Unknown function 'foo'");
}

#[test]
fn repl_echo() {
    let console = Rc::new(BufferConsole::new());
    run_source("out(\"hi\")\nx = 2\nx * 3", &RunOptions::repl(), console.clone()).unwrap();
    assert_eq!(console.output(), "hi\n6\n");
}

#[test]
fn funcs_lists_user_functions() {
    let output = output_of("fn twice(b_ x) b_ { ret x * 2 }\nfuncs()");
    assert!(output.starts_with("Available functions: "));
    assert!(output.contains("fn twice(b_ x) b_"));
    assert!(output.contains("fn out(str text)"));
}
