//! Configuration and formula errors.
//!
//! Everything here is fatal at load time. Runtime economic failures
//! (locked, maxed, can't afford) live in `upgrades::PurchaseError` instead.

use std::fmt;
use std::io;

/// Failure to tokenize, parse or evaluate an upgrade cost formula.
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaError {
    Empty,
    UnexpectedChar { ch: char, pos: usize },
    UnknownIdentifier { name: String, pos: usize },
    InvalidNumber { text: String, pos: usize },
    UnexpectedToken { pos: usize },
    UnexpectedEnd,
    UnbalancedParen { pos: usize },
    /// Nesting beyond `MAX_FORMULA_DEPTH`.
    TooDeep { pos: usize },
    DivisionByZero,
    NonFinite,
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulaError::Empty => write!(f, "formula is empty"),
            FormulaError::UnexpectedChar { ch, pos } => {
                write!(f, "unexpected character '{}' at {}", ch, pos)
            }
            FormulaError::UnknownIdentifier { name, pos } => {
                write!(f, "unknown identifier '{}' at {} (only 'n' is allowed)", name, pos)
            }
            FormulaError::InvalidNumber { text, pos } => {
                write!(f, "invalid number '{}' at {}", text, pos)
            }
            FormulaError::UnexpectedToken { pos } => write!(f, "unexpected token at {}", pos),
            FormulaError::UnexpectedEnd => write!(f, "unexpected end of formula"),
            FormulaError::UnbalancedParen { pos } => write!(f, "unbalanced parenthesis at {}", pos),
            FormulaError::TooDeep { pos } => write!(f, "formula nested too deeply at {}", pos),
            FormulaError::DivisionByZero => write!(f, "division by zero"),
            FormulaError::NonFinite => write!(f, "result is not a finite number"),
        }
    }
}

impl std::error::Error for FormulaError {}

#[derive(Debug)]
pub enum ConfigError {
    Formula {
        upgrade: String,
        formula: String,
        source: FormulaError,
    },
    DuplicateUpgrade(String),
    UnknownUnlockRoot {
        upgrade: String,
        root: String,
    },
    /// The unlock chain starting at the first element leads back to itself.
    CyclicUnlock(Vec<String>),
    InvalidMaxLevel {
        upgrade: String,
        max_level: i32,
    },
    UnknownEnemyTemplate(String),
    DuplicateEnemyTemplate(String),
    InvalidValue {
        field: &'static str,
        reason: String,
    },
    Json(serde_json::Error),
    Io(io::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Formula {
                upgrade,
                formula,
                source,
            } => write!(
                f,
                "invalid cost formula for upgrade '{}' (\"{}\"): {}",
                upgrade, formula, source
            ),
            ConfigError::DuplicateUpgrade(id) => write!(f, "duplicate upgrade id '{}'", id),
            ConfigError::UnknownUnlockRoot { upgrade, root } => write!(
                f,
                "upgrade '{}' names unknown unlock root '{}'",
                upgrade, root
            ),
            ConfigError::CyclicUnlock(chain) => {
                write!(f, "cyclic unlock chain: {}", chain.join(" -> "))
            }
            ConfigError::InvalidMaxLevel { upgrade, max_level } => write!(
                f,
                "upgrade '{}' has invalid max level {}",
                upgrade, max_level
            ),
            ConfigError::UnknownEnemyTemplate(id) => write!(f, "unknown enemy template '{}'", id),
            ConfigError::DuplicateEnemyTemplate(id) => {
                write!(f, "duplicate enemy template id '{}'", id)
            }
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid config value for {}: {}", field, reason)
            }
            ConfigError::Json(e) => write!(f, "config JSON error: {}", e),
            ConfigError::Io(e) => write!(f, "config IO error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Formula { source, .. } => Some(source),
            ConfigError::Json(e) => Some(e),
            ConfigError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        ConfigError::Io(e)
    }
}
