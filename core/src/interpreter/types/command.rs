//! Command chain types and the argument-list parser
//!
//! The chain is parsed in full before any document is read, so a malformed
//! chain is reported as a usage error without touching the input.

use super::super::errors::EngineError;

/* ===================== Commands ===================== */

/// One operation of the command chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Type,
    Length,
    Keys,
    Unstring,
    Pop,
    Across,
    LiteralString(String),
    LiteralValue(String),
    Extract(String),
    Delete(String),
    Insert(String),
}

impl Op {
    /// Whether the value on top of the stack is printed at the end of a pass
    /// when this is the last command executed
    pub fn arms_print(&self) -> bool {
        match self {
            Op::Type | Op::Length | Op::Keys | Op::Unstring | Op::Across => false,
            Op::Pop
            | Op::LiteralString(_)
            | Op::LiteralValue(_)
            | Op::Extract(_)
            | Op::Delete(_)
            | Op::Insert(_) => true,
        }
    }

    pub fn letter(&self) -> char {
        match self {
            Op::Type => 't',
            Op::Length => 'l',
            Op::Keys => 'k',
            Op::Unstring => 'u',
            Op::Pop => 'p',
            Op::Across => 'a',
            Op::LiteralString(_) => 's',
            Op::LiteralValue(_) => 'n',
            Op::Extract(_) => 'e',
            Op::Delete(_) => 'd',
            Op::Insert(_) => 'i',
        }
    }
}

/// A chain operation together with the argument position it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub op: Op,
    /// 1-based index into the argument list, used in diagnostics
    pub position: usize,
}

/// Global modifiers; they never occupy a chain position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modifier {
    Jsonp,
    SortKeys,
    Quiet,
    ByValue,
    ContinueOnError,
    InPlace,
    NullDelimiter,
    File(String),
}

/// Result of parsing the argument list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chain {
    pub commands: Vec<Command>,
    pub modifiers: Vec<Modifier>,
    /// `--version` was given as the only argument
    pub version: bool,
}

/* ===================== Parser ===================== */

const USAGE: &str =
    "Valid: -[P|S|Q|V|C|I|0] [-F path] -[t|l|k|u|p|a] -[s|n] value -[e|i|d] index";

/// Parse the argument list (program name excluded) into a chain
///
/// Follows getopt conventions: nullary letters may be grouped (`-tl`), and a
/// letter that takes an argument consumes the rest of its token or, if the
/// token ends there, the whole next token.
pub fn parse_chain(args: &[String]) -> Result<Chain, EngineError> {
    let mut chain = Chain::default();

    if args.len() == 1 && args[0].starts_with("--version") {
        chain.version = true;
        return Ok(chain);
    }

    let mut idx = 0;
    while idx < args.len() {
        let position = idx + 1;
        let token = &args[idx];
        idx += 1;

        let Some(letters) = token.strip_prefix('-').filter(|rest| !rest.is_empty()) else {
            return Err(EngineError::Usage(format!(
                "unexpected argument \"{}\"\n{}",
                token, USAGE
            )));
        };

        let mut chars = letters.char_indices();
        while let Some((offset, letter)) = chars.next() {
            if takes_argument(letter) {
                let rest = &letters[offset + letter.len_utf8()..];
                let value = if !rest.is_empty() {
                    rest.to_string()
                } else if let Some(next) = args.get(idx) {
                    idx += 1;
                    next.clone()
                } else {
                    return Err(EngineError::Usage(format!(
                        "option -{} requires an argument (arg {})\n{}",
                        letter, position, USAGE
                    )));
                };
                push_with_argument(&mut chain, letter, value, position);
                break;
            }
            push_nullary(&mut chain, letter, position)?;
        }
    }

    Ok(chain)
}

fn takes_argument(letter: char) -> bool {
    matches!(letter, 'F' | 'e' | 's' | 'n' | 'd' | 'i')
}

fn push_with_argument(chain: &mut Chain, letter: char, value: String, position: usize) {
    let op = match letter {
        'F' => {
            chain.modifiers.push(Modifier::File(value));
            return;
        }
        'e' => Op::Extract(value),
        's' => Op::LiteralString(value),
        'n' => Op::LiteralValue(value),
        'd' => Op::Delete(value),
        _ => Op::Insert(value),
    };
    chain.commands.push(Command { op, position });
}

fn push_nullary(chain: &mut Chain, letter: char, position: usize) -> Result<(), EngineError> {
    let modifier = match letter {
        'P' => Some(Modifier::Jsonp),
        'S' => Some(Modifier::SortKeys),
        'Q' => Some(Modifier::Quiet),
        'V' => Some(Modifier::ByValue),
        'C' => Some(Modifier::ContinueOnError),
        'I' => Some(Modifier::InPlace),
        '0' => Some(Modifier::NullDelimiter),
        _ => None,
    };
    if let Some(modifier) = modifier {
        chain.modifiers.push(modifier);
        return Ok(());
    }

    let op = match letter {
        't' => Op::Type,
        'l' => Op::Length,
        'k' => Op::Keys,
        'u' => Op::Unstring,
        'p' => Op::Pop,
        'a' => Op::Across,
        other => {
            return Err(EngineError::Usage(format!(
                "invalid option -{} (arg {})\n{}",
                other, position, USAGE
            )))
        }
    };
    chain.commands.push(Command { op, position });
    Ok(())
}
