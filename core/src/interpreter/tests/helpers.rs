//! Test helpers for interpreter tests
//!
//! Common utilities for parsing chains and running them against a document

use crate::config::Settings;
use crate::interpreter::output::to_json_string;
use crate::interpreter::{parse_chain, run_until_done, EngineError, Value, VM};

/// Everything a finished run left behind
pub struct Outcome {
    pub vm: VM,
    pub out: String,
    pub err: String,
    pub result: Result<(), EngineError>,
}

/// Parse `args` as a chain and run it against the JSON text `input`
pub fn run_chain(input: &str, args: &[&str]) -> Outcome {
    run_chain_with(input, args, Settings::default())
}

/// Like `run_chain`, starting from the given settings instead of the defaults
///
/// Modifiers in `args` are applied on top of `settings`.
pub fn run_chain_with(input: &str, args: &[&str], mut settings: Settings) -> Outcome {
    let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
    let chain = parse_chain(&args).expect("Parse chain failed");
    for modifier in &chain.modifiers {
        settings.apply(modifier);
    }

    let vm = VM::new(chain.commands, Some(document(input)), settings).expect("VM setup failed");
    run_vm(vm)
}

/// Run an already-built VM to completion, capturing both writers
pub fn run_vm(mut vm: VM) -> Outcome {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let result = run_until_done(&mut vm, &mut out, &mut err);

    Outcome {
        vm,
        out: String::from_utf8(out).expect("Output is not UTF-8"),
        err: String::from_utf8(err).expect("Diagnostics are not UTF-8"),
        result,
    }
}

pub fn document(input: &str) -> Value {
    let json: serde_json::Value = serde_json::from_str(input).expect("Invalid test document");
    Value::from(json)
}

/// Pretty-printed form of the document the run ended with
pub fn final_document(outcome: &Outcome) -> String {
    let value = outcome
        .vm
        .result_document()
        .expect("Run ended without a document");
    to_json_string(value, false)
}
