//! Command-line surface
//!
//! Reads the document, runs the command chain and writes the results. The
//! chain is parsed before any input is read so usage errors come first.

use anyhow::Result;
use clap::Parser;
use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::Path;

use crate::config::Settings;
use crate::interpreter::errors::{EngineError, EXIT_FAILURE, EXIT_OK, EXIT_USAGE};
use crate::interpreter::output::to_json_string;
use crate::interpreter::{parse_chain, run_until_done, Value, VM};
use crate::jsonp;

/// Version number printed by `--version`
pub const VERSION: &str = "20130901";

#[derive(Parser)]
#[command(name = "jshon")]
#[command(about = "Parse, read and create JSON from the shell", long_about = LONG_ABOUT)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Modifiers and the command chain, in order
    #[arg(allow_hyphen_values = true, trailing_var_arg = true, num_args = 0..)]
    pub chain: Vec<String>,
}

const LONG_ABOUT: &str = "\
Reads one JSON document from stdin (or -F path) and applies a chain of commands.

Modifiers: -P jsonp  -S sort keys  -Q quiet  -V by value  -C continue  -I in place  -0 NUL delimiter  -F path
Commands:  -t type  -l length  -k keys  -u unstring  -p pop  -a across
           -s value  -n value  -e index  -d index  -i index|append";

/// Run the CLI by parsing process arguments, returning the exit status
pub fn run_cli() -> Result<i32> {
    let cli = Cli::parse();
    run_cli_with_args(cli)
}

/// Run the CLI with provided arguments
pub fn run_cli_from_args(args: Vec<String>) -> Result<i32> {
    let cli = Cli::try_parse_from(args)?;
    run_cli_with_args(cli)
}

fn run_cli_with_args(cli: Cli) -> Result<i32> {
    let chain = match parse_chain(&cli.chain) {
        Ok(chain) => chain,
        Err(err) => {
            if !quiet_requested(&cli.chain) {
                eprintln!("{}", err);
            }
            return Ok(EXIT_USAGE);
        }
    };

    if chain.version {
        println!("{}", VERSION);
        return Ok(EXIT_OK);
    }

    let settings = Settings::builder().modifiers(&chain.modifiers).build()?;
    let report = |message: &str| {
        if !settings.quiet {
            eprintln!("{}", message);
        }
    };

    let in_place_path = match (&settings.file, settings.in_place) {
        (Some(path), true) if path.as_os_str() != "-" => Some(path.clone()),
        (_, true) => {
            report("warning: in-place editing (-I) requires -F");
            None
        }
        _ => None,
    };

    let content = match read_input(settings.file.as_deref()) {
        Ok(content) => content,
        Err(err) => {
            report(&format!("{}", err));
            return Ok(EXIT_FAILURE);
        }
    };
    if content.trim().is_empty() {
        report("warning: nothing to read");
    }

    let document = match parse_document(&content, settings.jsonp) {
        Ok(document) => document,
        Err(err) => {
            report(&err.to_string());
            return Ok(err.exit_code());
        }
    };

    let mut engine_settings = settings.clone();
    engine_settings.in_place = in_place_path.is_some();
    let mut vm = match VM::new(chain.commands, document, engine_settings) {
        Ok(vm) => vm,
        Err(error) => {
            report(&error.to_string());
            return Ok(error.exit_code());
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let stderr = io::stderr();
    let mut err = stderr.lock();

    if let Err(error) = run_until_done(&mut vm, &mut out, &mut err) {
        out.flush()?;
        report(&error.to_string());
        return Ok(error.exit_code());
    }

    if let Some(path) = in_place_path {
        if let Some(result) = vm.result_document() {
            let text = to_json_string(result, settings.sort_keys);
            if let Err(e) = fs::write(&path, format!("{}\n", text)) {
                report(&format!("cannot write {}: {}", path.display(), e));
                return Ok(EXIT_FAILURE);
            }
        }
    }

    tracing::debug!(recovered = vm.recovered_errors, "chain complete");
    if vm.recovered_errors > 0 {
        Ok(EXIT_FAILURE)
    } else {
        Ok(EXIT_OK)
    }
}

/// Whether `-Q` appears in an argument list that failed to parse
fn quiet_requested(args: &[String]) -> bool {
    args.iter().any(|arg| {
        arg.strip_prefix('-')
            .filter(|letters| !letters.starts_with('-'))
            .is_some_and(|letters| letters.contains('Q'))
    })
}

/* ===================== Input ===================== */

/// Read the whole input; stdin when no file (or `-`) is given
///
/// Nothing is read from an interactive terminal.
fn read_input(file: Option<&Path>) -> io::Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path).map_err(|e| {
            io::Error::new(e.kind(), format!("cannot read {}: {}", path.display(), e))
        }),
        _ => {
            let stdin = io::stdin();
            if stdin.is_terminal() {
                return Ok(String::new());
            }
            let mut content = String::new();
            stdin.lock().read_to_string(&mut content)?;
            Ok(content)
        }
    }
}

/// Parse the input text into a document, or `None` when it is empty
///
/// Error locations account for a stripped JSONP prologue.
pub fn parse_document(content: &str, tolerate_jsonp: bool) -> Result<Option<Value>, EngineError> {
    let stripped = if tolerate_jsonp {
        jsonp::strip(content)
    } else {
        jsonp::Stripped {
            body: content,
            rows_skipped: 0,
            cols_skipped: 0,
            detected: false,
        }
    };

    if stripped.body.trim().is_empty() {
        return Ok(None);
    }

    match serde_json::from_str::<serde_json::Value>(stripped.body) {
        Ok(json) => Ok(Some(Value::from(json))),
        Err(e) => {
            let suffix = format!(" at line {} column {}", e.line(), e.column());
            let message = e.to_string();
            let message = message.strip_suffix(&suffix).unwrap_or(&message).to_string();
            let jsonp = match (tolerate_jsonp, stripped.detected) {
                (false, _) => "",
                (true, true) => "(jsonp detected) ",
                (true, false) => "(jsonp not detected) ",
            };
            // Columns only shift on the line the body starts on
            let column = if e.line() == 1 {
                e.column() + stripped.cols_skipped
            } else {
                e.column()
            };
            Err(EngineError::Parse {
                line: e.line() + stripped.rows_skipped,
                column,
                message,
                jsonp,
            })
        }
    }
}
