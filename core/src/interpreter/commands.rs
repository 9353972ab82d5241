//! Command handlers
//!
//! Each operation of the chain has its own handler. Handlers validate their
//! operands before touching the stack, so a failed command leaves the stack
//! as it was and the driver can apply a recovery placeholder.

use super::errors::EngineError;
use super::output::scalar_text;
use super::types::{Op, Value};
use super::vm::{advance, open_frame, VM};
use std::io::Write;

/// What the scan should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Scan the next command
    Next,
    /// Stop this pass; an `across` found nothing to iterate
    EndPass,
}

/* ===================== Dispatcher ===================== */

/// Execute one command against the VM
pub fn dispatch(vm: &mut VM, op: &Op, out: &mut dyn Write) -> Result<Flow, EngineError> {
    vm.print_armed = op.arms_print();

    match op {
        Op::Type => execute_type(vm, out),
        Op::Length => execute_length(vm, out),
        Op::Keys => execute_keys(vm, out),
        Op::Unstring => execute_unstring(vm, out),
        Op::Pop => execute_pop(vm),
        Op::LiteralString(text) => vm.stack.push(Value::String(text.clone())),
        Op::LiteralValue(text) => {
            let value = parse_literal(text, vm.settings.legacy_literals)?;
            vm.stack.push(value)
        }
        Op::Extract(key) => execute_extract(vm, key),
        Op::Delete(key) => execute_delete(vm, key),
        Op::Insert(key) => execute_insert(vm, key),
        Op::Across => return execute_across(vm),
    }?;

    Ok(Flow::Next)
}

/// Leave the stack in a usable state after a recovered error
///
/// Operations that would have produced a value get a `null` in its place;
/// a failed insert consumes its value operand and keeps the container.
pub fn recover(vm: &mut VM, op: &Op) -> Result<(), EngineError> {
    match op {
        Op::Extract(_) | Op::LiteralValue(_) => vm.stack.push(Value::Null),
        Op::Insert(_) => {
            if vm.stack.depth() >= 2 {
                vm.stack.pop()?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/* ===================== Print Commands ===================== */

fn execute_type(vm: &VM, out: &mut dyn Write) -> Result<(), EngineError> {
    writeln!(out, "{}", vm.stack.peek()?.type_name())?;
    Ok(())
}

fn execute_length(vm: &VM, out: &mut dyn Write) -> Result<(), EngineError> {
    let value = vm.stack.peek()?;
    let size = value
        .size()
        .ok_or(EngineError::NotSizeable(value.type_name()))?;
    writeln!(out, "{}", size)?;
    Ok(())
}

fn execute_keys(vm: &VM, out: &mut dyn Write) -> Result<(), EngineError> {
    let Value::Object(members) = vm.stack.peek()? else {
        return Err(EngineError::NotAnObject(vm.stack.peek()?.type_name()));
    };

    let members = members.borrow();
    let mut keys: Vec<&String> = members.keys().collect();
    if vm.settings.sort_keys {
        keys.sort();
    }
    for key in keys {
        writeln!(out, "{}", key)?;
    }
    Ok(())
}

fn execute_unstring(vm: &VM, out: &mut dyn Write) -> Result<(), EngineError> {
    let value = vm.stack.peek()?;
    let text = scalar_text(value).ok_or(EngineError::NotScalar(value.type_name()))?;
    let delimiter = if vm.settings.null_delimiter { '\0' } else { '\n' };
    write!(out, "{}{}", text, delimiter)?;
    Ok(())
}

/* ===================== Stack Commands ===================== */

fn execute_pop(vm: &mut VM) -> Result<(), EngineError> {
    vm.stack.pop()?;
    Ok(())
}

/// Parse the argument of `literal-value`
///
/// Accepts `null`, `true`, `false`, `[]`, `{}` (and their short aliases
/// `n`, `t`, `f`, `array`, `object`), a base-10 integer, or a finite real.
pub fn parse_literal(text: &str, legacy: bool) -> Result<Value, EngineError> {
    let value = match text {
        "null" | "n" => Some(Value::Null),
        "true" | "t" => Some(Value::Bool(true)),
        "false" | "f" => Some(Value::Bool(false)),
        "[]" | "array" => Some(Value::array(Vec::new())),
        "{}" | "object" => Some(Value::object(Default::default())),
        _ => text
            .parse::<i64>()
            .map(Value::Integer)
            .ok()
            .or_else(|| text.parse::<f64>().ok().filter(|f| f.is_finite()).map(Value::Real)),
    };

    match value {
        Some(value) => Ok(value),
        None if legacy => Ok(Value::String(text.to_string())),
        None => Err(EngineError::BadLiteral(text.to_string())),
    }
}

/* ===================== Collection Commands ===================== */

/// Resolve any integer into `[0, len)` by true modulo; `len` must be non-zero
pub fn wrap_index(raw: i64, len: usize) -> usize {
    let len = len as i64;
    raw.rem_euclid(len) as usize
}

/// Resolve a decimal index argument into `[0, len)`; `len` must be non-zero
///
/// Integers outside the `i64` range are reduced modulo `len` digit by digit.
pub fn resolve_index(key: &str, len: usize) -> Result<usize, EngineError> {
    if let Ok(raw) = key.parse::<i64>() {
        return Ok(wrap_index(raw, len));
    }

    let (negative, digits) = match key.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, key.strip_prefix('+').unwrap_or(key)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EngineError::BadIndex(key.to_string()));
    }

    let modulus = len as u128;
    let rem = digits
        .bytes()
        .fold(0u128, |acc, b| (acc * 10 + u128::from(b - b'0')) % modulus);
    let idx = if negative { (modulus - rem) % modulus } else { rem };
    Ok(idx as usize)
}

fn execute_extract(vm: &mut VM, key: &str) -> Result<(), EngineError> {
    let member = match vm.stack.peek()? {
        Value::Object(members) => members
            .borrow()
            .get(key)
            .cloned()
            .ok_or_else(|| EngineError::NoSuchKey(key.to_string()))?,
        Value::Array(elements) => {
            let elements = elements.borrow();
            if elements.is_empty() {
                return Err(EngineError::EmptyCollection);
            }
            let idx = resolve_index(key, elements.len())?;
            elements[idx].clone()
        }
        other => {
            return Err(EngineError::NotIndexable {
                found: other.type_name(),
                action: "has no elements to extract",
            })
        }
    };

    let member = vm.share(&member);
    vm.stack.push(member)
}

fn execute_delete(vm: &mut VM, key: &str) -> Result<(), EngineError> {
    // Mutates the container in place, which is the same node pop+push would return
    match vm.stack.peek()? {
        Value::Object(members) => {
            members.borrow_mut().shift_remove(key);
        }
        Value::Array(elements) => {
            let len = elements.borrow().len();
            if len > 0 {
                let idx = resolve_index(key, len)?;
                elements.borrow_mut().remove(idx);
            }
        }
        other => {
            return Err(EngineError::NotIndexable {
                found: other.type_name(),
                action: "cannot lose elements",
            })
        }
    }
    Ok(())
}

fn execute_insert(vm: &mut VM, key: &str) -> Result<(), EngineError> {
    let container = vm.stack.peek_at(1)?;
    let value = vm.stack.peek()?;

    // Inserting a node into itself would make the document cyclic
    let value = if value.same_node(container) {
        value.deep_copy()
    } else {
        value.clone()
    };

    match container {
        Value::Object(members) => {
            members.borrow_mut().insert(key.to_string(), value);
        }
        Value::Array(elements) => {
            let len = elements.borrow().len();
            if key == "append" {
                elements.borrow_mut().push(value);
            } else {
                // Every valid index lands at 0 in an empty array
                let idx = resolve_index(key, len.max(1))?;
                elements.borrow_mut().insert(idx, value);
            }
        }
        other => {
            return Err(EngineError::NotIndexable {
                found: other.type_name(),
                action: "cannot gain elements",
            })
        }
    }

    vm.stack.pop()?;
    Ok(())
}

fn execute_across(vm: &mut VM) -> Result<Flow, EngineError> {
    open_frame(vm)?;
    if advance(vm)? {
        Ok(Flow::Next)
    } else {
        Ok(Flow::EndPass)
    }
}
