//! Bounded stacks
//!
//! - `ValueStack`: the engine's working memory of JSON values
//! - `FrameStack`: saved checkpoints, one per active `across` scope
//!
//! Both share the same depth bound.

use super::errors::EngineError;
use super::types::{Frame, Value};

/// Default depth bound for both stacks
pub const DEFAULT_DEPTH: usize = 128;

/* ===================== Value Stack ===================== */

#[derive(Debug, Clone)]
pub struct ValueStack {
    slots: Vec<Value>,
    capacity: usize,
}

impl ValueStack {
    pub fn new(capacity: usize) -> Self {
        ValueStack {
            slots: Vec::new(),
            capacity,
        }
    }

    pub fn push(&mut self, value: Value) -> Result<(), EngineError> {
        if self.slots.len() >= self.capacity {
            return Err(EngineError::StackOverflow);
        }
        self.slots.push(value);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Value, EngineError> {
        self.slots.pop().ok_or(EngineError::StackUnderflow)
    }

    pub fn peek(&self) -> Result<&Value, EngineError> {
        self.slots.last().ok_or(EngineError::StackUnderflow)
    }

    /// Look `depth` entries below the top (0 is the top itself)
    pub fn peek_at(&self, depth: usize) -> Result<&Value, EngineError> {
        self.slots
            .len()
            .checked_sub(depth + 1)
            .and_then(|idx| self.slots.get(idx))
            .ok_or(EngineError::StackUnderflow)
    }

    /// Discard every entry above `depth`
    pub fn truncate_to(&mut self, depth: usize) {
        self.slots.truncate(depth);
    }

    pub fn depth(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn bottom(&self) -> Option<&Value> {
        self.slots.first()
    }
}

/* ===================== Iteration Frame Stack ===================== */

#[derive(Debug, Clone)]
pub struct FrameStack {
    frames: Vec<Frame>,
    capacity: usize,
}

impl FrameStack {
    pub fn new(capacity: usize) -> Self {
        FrameStack {
            frames: Vec::new(),
            capacity,
        }
    }

    pub fn push(&mut self, frame: Frame) -> Result<(), EngineError> {
        if self.frames.len() >= self.capacity {
            return Err(EngineError::FrameOverflow);
        }
        // Frames nest over the stack region created after the outer collection
        if let Some(outer) = self.frames.last() {
            if frame.watermark < outer.watermark {
                return Err(EngineError::StackUnderflow);
            }
        }
        self.frames.push(frame);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    pub fn top(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut Frame> {
        self.frames.last_mut()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
