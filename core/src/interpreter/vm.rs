//! Virtual Machine state
//!
//! The VM holds all execution state:
//! - stack: Value Stack (working memory)
//! - frames: Iteration Frame Stack (one checkpoint per active `across`)
//! - cursor: scan position in the command chain, independent of nesting
//!
//! Frame management (open/advance/close) lives here because it has to move
//! the stack and the cursor together.

use super::errors::EngineError;
use super::stack::{FrameStack, ValueStack};
use super::types::{Command, Cursor, Frame, Value};
use crate::config::Settings;

/* ===================== VM ===================== */

#[derive(Debug, Clone)]
pub struct VM {
    /// Value Stack
    pub stack: ValueStack,

    /// Iteration Frame Stack
    pub frames: FrameStack,

    /// The command chain being interpreted
    pub program: Vec<Command>,

    /// Index of the next command to scan
    pub cursor: usize,

    /// Whether the end of a pass prints the top of the stack
    pub print_armed: bool,

    /// Number of errors reported and recovered from
    pub recovered_errors: usize,

    pub settings: Settings,

    /// The parsed input document, kept for in-place writing
    document: Option<Value>,
}

impl VM {
    /// Create a VM seeded with the parsed document (if any)
    ///
    /// Fails with `StackOverflow` when the stack bound leaves no room for
    /// the document.
    pub fn new(
        program: Vec<Command>,
        document: Option<Value>,
        settings: Settings,
    ) -> Result<Self, EngineError> {
        let depth = settings.stack_depth;
        let mut stack = ValueStack::new(depth);
        if let Some(doc) = &document {
            stack.push(doc.clone())?;
        }

        Ok(VM {
            stack,
            frames: FrameStack::new(depth),
            program,
            cursor: 0,
            print_armed: true,
            recovered_errors: 0,
            settings,
            document,
        })
    }

    /// Apply the by-value/by-reference policy to a value about to be pushed
    pub fn share(&self, value: &Value) -> Value {
        if self.settings.by_value {
            value.deep_copy()
        } else {
            value.clone()
        }
    }

    /// Value written back to the source file in in-place mode
    pub fn result_document(&self) -> Option<&Value> {
        self.stack.bottom().or(self.document.as_ref())
    }
}

/* ===================== Frame Management ===================== */

/// Open an iteration frame over the collection on top of the stack
///
/// The frame checkpoints the current cursor (already past the `across`
/// command) and the stack index of the collection.
pub fn open_frame(vm: &mut VM) -> Result<(), EngineError> {
    let (cursor, complete) = match vm.stack.peek()? {
        Value::Object(members) => {
            let complete = members.borrow().is_empty();
            (Cursor::Members { target: members.clone(), next: 0 }, complete)
        }
        Value::Array(elements) => {
            let complete = elements.borrow().is_empty();
            (Cursor::Elements { target: elements.clone(), next: 0 }, complete)
        }
        other => return Err(EngineError::NotIterable(other.type_name())),
    };

    let frame = Frame {
        cursor,
        watermark: vm.stack.depth() - 1,
        resume_at: vm.cursor,
        complete,
    };
    tracing::debug!(
        watermark = frame.watermark,
        resume_at = frame.resume_at,
        complete = frame.complete,
        depth = vm.frames.len() + 1,
        "open iteration frame"
    );
    vm.frames.push(frame)
}

/// Push the next element of the innermost frame's collection
///
/// Rewinds the stack to just above the collection and the cursor to the
/// frame's resume point first. Returns `false` (and marks the frame
/// complete) when no element is left.
pub fn advance(vm: &mut VM) -> Result<bool, EngineError> {
    let by_value = vm.settings.by_value;
    let Some(frame) = vm.frames.top_mut() else {
        return Ok(false);
    };

    // The collection slot itself must still exist below the replayed region
    if vm.stack.depth() <= frame.watermark {
        return Err(EngineError::StackUnderflow);
    }

    let (element, remaining) = match &mut frame.cursor {
        Cursor::Members { target, next } => {
            let members = target.borrow();
            let element = members.get_index(*next).map(|(_, v)| v.clone());
            *next += 1;
            (element, members.len().saturating_sub(*next))
        }
        Cursor::Elements { target, next } => {
            let elements = target.borrow();
            let element = elements.get(*next).cloned();
            *next += 1;
            (element, elements.len().saturating_sub(*next))
        }
    };

    let Some(element) = element else {
        frame.complete = true;
        return Ok(false);
    };
    frame.complete = remaining == 0;

    let watermark = frame.watermark;
    vm.cursor = frame.resume_at;
    tracing::debug!(watermark, remaining, "advance iteration frame");

    vm.stack.truncate_to(watermark + 1);
    let element = if by_value { element.deep_copy() } else { element };
    vm.stack.push(element)?;
    Ok(true)
}

/// Pop the innermost frame, dropping its collection and everything above it
/// and moving the cursor back to the frame's resume point
pub fn close_frame(vm: &mut VM) {
    if let Some(frame) = vm.frames.pop() {
        tracing::debug!(
            watermark = frame.watermark,
            resume_at = frame.resume_at,
            "close iteration frame"
        );
        vm.stack.truncate_to(frame.watermark);
        vm.cursor = frame.resume_at;
    }
}
