//! Tests for the error policy
//!
//! Without `-C` the first error stops the run; with it, data errors are
//! reported, a placeholder takes the failed result's place and the chain
//! keeps going. Overflows always stop the run.

use super::helpers::{document, run_chain, run_chain_with};
use crate::config::Settings;
use crate::interpreter::errors::{EngineError, EXIT_FAILURE};
use crate::interpreter::VM;

#[test]
fn test_error_stops_run_by_default() {
    let outcome = run_chain(r#"{"a": 1}"#, &["-e", "b", "-t"]);

    let Err(err) = &outcome.result else {
        unreachable!("Expected error, got {:?}", outcome.result);
    };
    assert!(matches!(err.kind(), EngineError::NoSuchKey(key) if key == "b"));
    assert_eq!(err.to_string(), "parse error: key \"b\" not found (arg 1)");
    assert_eq!(err.exit_code(), EXIT_FAILURE);
    assert_eq!(outcome.out, "");
    assert_eq!(outcome.vm.recovered_errors, 0);
}

#[test]
fn test_error_reports_argument_position() {
    let outcome = run_chain("[1, 2]", &["-Q", "-e", "0", "-l"]);
    let Err(err) = &outcome.result else {
        unreachable!("Expected error, got {:?}", outcome.result);
    };
    assert_eq!(err.to_string(), "parse error: type 'number' has no length (arg 4)");
}

#[test]
fn test_continue_substitutes_null_for_failed_extract() {
    let outcome = run_chain(r#"{"a": 1}"#, &["-C", "-e", "b", "-t"]);
    assert!(outcome.result.is_ok());
    assert_eq!(outcome.out, "null\n");
    assert_eq!(outcome.err, "parse error: key \"b\" not found (arg 2)\n");
    assert_eq!(outcome.vm.recovered_errors, 1);
}

#[test]
fn test_continue_quiet_suppresses_diagnostics() {
    let outcome = run_chain(r#"{"a": 1}"#, &["-C", "-Q", "-e", "b", "-t"]);
    assert!(outcome.result.is_ok());
    assert_eq!(outcome.out, "null\n");
    assert_eq!(outcome.err, "");
    assert_eq!(outcome.vm.recovered_errors, 1);
}

#[test]
fn test_continue_after_failed_insert_keeps_container() {
    let outcome = run_chain("1", &["-C", "-n", "2", "-i", "a"]);
    assert!(outcome.result.is_ok());
    assert_eq!(outcome.out, "1\n");
    assert!(outcome.err.contains("type 'number' cannot gain elements"));
    assert_eq!(outcome.vm.stack.depth(), 1);
}

#[test]
fn test_continue_after_print_error() {
    let outcome = run_chain(r#"[1, {"a": 2}, "xyz"]"#, &["-C", "-a", "-l"]);
    assert!(outcome.result.is_ok());
    assert_eq!(outcome.out, "1\n3\n");
    assert_eq!(outcome.vm.recovered_errors, 1);
}

#[test]
fn test_continue_after_bad_literal() {
    let outcome = run_chain("{}", &["-C", "-n", "bogus", "-i", "k"]);
    assert!(outcome.result.is_ok());
    assert_eq!(outcome.out, "{\n \"k\": null\n}\n");
    assert!(outcome.err.starts_with("parse error: illegal nonstring \"bogus\""));
}

#[test]
fn test_bad_index() {
    let outcome = run_chain("[1]", &["-e", "x"]);
    let Err(err) = &outcome.result else {
        unreachable!("Expected error, got {:?}", outcome.result);
    };
    assert!(matches!(err.kind(), EngineError::BadIndex(_)));
}

#[test]
fn test_extract_from_empty_array() {
    let outcome = run_chain("[]", &["-e", "0"]);
    let Err(err) = &outcome.result else {
        unreachable!("Expected error, got {:?}", outcome.result);
    };
    assert!(matches!(err.kind(), EngineError::EmptyCollection));
}

#[test]
fn test_type_mismatches() {
    let cases: &[(&str, &[&str], &str)] = &[
        ("1", &["-k"], "type 'number' has no keys"),
        ("[]", &["-u"], "type 'array' is not simple/printable"),
        ("true", &["-e", "a"], "type 'bool' has no elements to extract"),
        ("null", &["-d", "a"], "type 'null' cannot lose elements"),
        (r#""s""#, &["-a"], "type 'string' not mappable"),
    ];
    for (input, args, expected) in cases {
        let outcome = run_chain(input, args);
        let Err(err) = &outcome.result else {
            unreachable!("Expected error for {:?}, got {:?}", args, outcome.result);
        };
        assert!(
            err.to_string().contains(expected),
            "{:?}: {} does not mention {}",
            args,
            err,
            expected
        );
    }
}

#[test]
fn test_across_scalar_under_continue_opens_no_frame() {
    let outcome = run_chain("5", &["-C", "-a", "-t"]);
    assert!(outcome.result.is_ok());
    assert_eq!(outcome.out, "number\n");
    assert!(outcome.vm.frames.is_empty());
}

#[test]
fn test_underflow_is_an_error() {
    let outcome = run_chain("1", &["-p", "-p"]);
    let Err(err) = &outcome.result else {
        unreachable!("Expected error, got {:?}", outcome.result);
    };
    assert!(matches!(err.kind(), EngineError::StackUnderflow));
    assert_eq!(err.to_string(), "internal error: stack underflow (arg 2)");
}

#[test]
fn test_overflow_is_fatal_even_when_continuing() {
    let settings = Settings {
        stack_depth: 2,
        ..Settings::default()
    };
    let outcome = run_chain_with("1", &["-C", "-n", "2", "-n", "3", "-t"], settings);
    let Err(err) = &outcome.result else {
        unreachable!("Expected error, got {:?}", outcome.result);
    };
    assert!(matches!(err.kind(), EngineError::StackOverflow));
    assert!(err.is_fatal());
    assert_eq!(outcome.out, "");
    assert_eq!(outcome.vm.recovered_errors, 0);
}

#[test]
fn test_results_before_error_are_kept() {
    let outcome = run_chain(r#"{"a": 1}"#, &["-t", "-e", "a", "-k"]);
    assert_eq!(outcome.out, "object\n");
    assert!(outcome.result.is_err());
}

#[test]
fn test_document_must_fit_on_stack() {
    let settings = Settings {
        stack_depth: 0,
        ..Settings::default()
    };
    let result = VM::new(Vec::new(), Some(document(r#"{"a": 1}"#)), settings);
    let Err(err) = result else {
        unreachable!("Expected stack overflow for a zero-depth stack");
    };
    assert!(matches!(err, EngineError::StackOverflow));
}
