//! Engine error types
//!
//! Handlers return these instead of exiting; the driver decides whether an
//! error aborts the run or is reported and recovered from.

use thiserror::Error;

/// Exit status for a successful run
pub const EXIT_OK: i32 = 0;
/// Exit status for parse failures, type mismatches and stack misuse
pub const EXIT_FAILURE: i32 = 1;
/// Exit status for a malformed command line
pub const EXIT_USAGE: i32 = 2;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{0}")]
    Usage(String),

    #[error("json {jsonp}read error: line {line} column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
        /// Empty, or "(jsonp detected) " / "(jsonp not detected) "
        jsonp: &'static str,
    },

    #[error("internal error: stack overflow")]
    StackOverflow,

    #[error("internal error: stack underflow")]
    StackUnderflow,

    #[error("internal error: iteration stack overflow")]
    FrameOverflow,

    #[error("parse error: type '{0}' has no length")]
    NotSizeable(&'static str),

    #[error("parse error: type '{0}' has no keys")]
    NotAnObject(&'static str),

    #[error("parse error: type '{0}' is not simple/printable")]
    NotScalar(&'static str),

    #[error("parse error: type '{found}' {action}")]
    NotIndexable {
        found: &'static str,
        action: &'static str,
    },

    #[error("parse error: type '{0}' not mappable")]
    NotIterable(&'static str),

    #[error("parse error: key \"{0}\" not found")]
    NoSuchKey(String),

    #[error("parse error: index out of bounds on empty array")]
    EmptyCollection,

    #[error("parse error: illegal index \"{0}\"")]
    BadIndex(String),

    #[error("parse error: illegal nonstring \"{0}\"")]
    BadLiteral(String),

    #[error("{source} (arg {position})")]
    Command {
        position: usize,
        #[source]
        source: Box<EngineError>,
    },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Attach the argument position of the command that failed
    pub fn at(self, position: usize) -> Self {
        match self {
            EngineError::Command { .. } => self,
            other => EngineError::Command {
                position,
                source: Box::new(other),
            },
        }
    }

    /// The underlying error with any position wrapper removed
    pub fn kind(&self) -> &EngineError {
        match self {
            EngineError::Command { source, .. } => source.kind(),
            other => other,
        }
    }

    /// Errors that abort the run even when continuing through errors
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind(),
            EngineError::Usage(_)
                | EngineError::Parse { .. }
                | EngineError::StackOverflow
                | EngineError::FrameOverflow
                | EngineError::Io(_)
        )
    }

    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            EngineError::Usage(_) => EXIT_USAGE,
            _ => EXIT_FAILURE,
        }
    }
}
