//! Core execution loop
//!
//! This module contains the step() function - the heart of the interpreter.
//! One step is one full pass of the command chain from the current cursor to
//! the end, followed by the iteration check that decides whether another pass
//! (the replay for the next element of an `across`) is needed.
//!
//! ## Function Organization
//! 1. run_until_done() - Top-level driver (calls step repeatedly)
//! 2. step() - One pass: scan, print, iteration check
//! 3. scan() - Dispatches commands and applies the error policy
//! 4. resume() - Closes finished frames and advances the innermost live one

use super::commands::{dispatch, recover, Flow};
use super::errors::EngineError;
use super::output::to_json_string;
use super::types::Command;
use super::vm::{advance, close_frame, VM};
use std::io::Write;

/* ===================== Public API ===================== */

/// Result of executing one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Another pass is needed
    Continue,
    /// Execution complete
    Done,
}

/// Run the VM until every pass has finished
///
/// Results go to `out`; diagnostics for recovered errors go to `err`. A fatal
/// error stops the run immediately and is returned with the argument
/// position of the command that raised it.
pub fn run_until_done(
    vm: &mut VM,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), EngineError> {
    loop {
        match step(vm, out, err)? {
            Step::Continue => continue,
            Step::Done => break,
        }
    }
    out.flush()?;
    Ok(())
}

/// Execute one pass of the command chain
pub fn step(vm: &mut VM, out: &mut dyn Write, err: &mut dyn Write) -> Result<Step, EngineError> {
    scan(vm, out, err)?;

    if vm.print_armed && !vm.settings.in_place {
        if let Ok(top) = vm.stack.peek() {
            writeln!(out, "{}", to_json_string(top, vm.settings.sort_keys))?;
        }
    }

    resume(vm, out, err)
}

/* ===================== Scan ===================== */

fn scan(vm: &mut VM, out: &mut dyn Write, err: &mut dyn Write) -> Result<(), EngineError> {
    while let Some(command) = vm.program.get(vm.cursor).cloned() {
        vm.cursor += 1;
        tracing::trace!(
            op = %command.op.letter(),
            position = command.position,
            depth = vm.stack.depth(),
            "dispatch"
        );

        match dispatch(vm, &command.op, out) {
            Ok(Flow::Next) => {}
            Ok(Flow::EndPass) => break,
            Err(error) => handle_error(vm, &command, error, out, err)?,
        }
    }
    Ok(())
}

/// Apply the continue-vs-abort policy to a failed command
fn handle_error(
    vm: &mut VM,
    command: &Command,
    error: EngineError,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), EngineError> {
    let error = error.at(command.position);
    if error.is_fatal() || !vm.settings.continue_on_error {
        return Err(error);
    }

    vm.recovered_errors += 1;
    tracing::debug!(%error, "recovered from command error");
    if !vm.settings.quiet {
        // Keep results and diagnostics in execution order
        out.flush()?;
        writeln!(err, "{}", error)?;
    }

    recover(vm, &command.op).map_err(|e| e.at(command.position))
}

/* ===================== Iteration Check ===================== */

/// Close every finished frame, then advance the innermost unfinished one
///
/// Returns `Step::Done` once no frame is left. A frame that cannot advance
/// is charged to its `across` command; when recovered from, it is closed.
fn resume(vm: &mut VM, out: &mut dyn Write, err: &mut dyn Write) -> Result<Step, EngineError> {
    loop {
        let Some(frame) = vm.frames.top() else {
            return Ok(Step::Done);
        };

        if frame.complete {
            close_frame(vm);
            if vm.frames.is_empty() {
                return Ok(Step::Done);
            }
            continue;
        }

        let across = frame
            .resume_at
            .checked_sub(1)
            .and_then(|idx| vm.program.get(idx))
            .cloned();
        match advance(vm) {
            Ok(true) => return Ok(Step::Continue),
            Ok(false) => {}
            Err(error) => {
                let Some(across) = across else {
                    return Err(error);
                };
                handle_error(vm, &across, error, out, err)?;
                close_frame(vm);
                if vm.frames.is_empty() {
                    return Ok(Step::Done);
                }
            }
        }
    }
}
