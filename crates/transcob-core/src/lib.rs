//! # transcob Core
//!
//! Core types shared by every stage of the transcob translator.
//!
//! ## Architecture
//!
//! ```text
//! COBOL source text
//!       |
//!       v
//! +-------------+
//! |   Lexer     |  (Token stream)
//! +-------------+
//!       |
//!       v
//! +-------------+
//! |   Parser    |  (AST: Program node)
//! +-------------+
//!       |
//!       v
//! +-------------+
//! |  Codegen    |  (Java or Rust source text)
//! +-------------+
//! ```
//!
//! Every stage fails fast: the first error aborts the whole translation and
//! nothing is produced.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// File extensions recognised as COBOL source
pub const COBOL_EXTENSIONS: &[&str] = &["cob", "cbl", "cpy"];

/// Check whether an extension (without the dot) names a COBOL source file
pub fn is_cobol_extension(ext: &str) -> bool {
    let ext = ext.to_ascii_lowercase();
    COBOL_EXTENSIONS.contains(&ext.as_str())
}

/// Source file representation
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// File name
    pub name: String,
    /// File content
    pub content: String,
}

impl SourceFile {
    pub fn new(name: &str, content: String) -> Self {
        Self {
            name: name.to_string(),
            content,
        }
    }

    /// Whether the file name carries a COBOL extension
    pub fn is_cobol(&self) -> bool {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| is_cobol_extension(ext))
            .unwrap_or(false)
    }
}

/// No tokenizer rule matched at the current input position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unexpected token in source: {remaining}")]
pub struct LexError {
    /// The unrecognised remaining input, starting at the failing position
    pub remaining: String,
}

impl LexError {
    pub fn new(remaining: &str) -> Self {
        Self {
            remaining: remaining.to_string(),
        }
    }
}

/// Parse errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Expected {expected} but found {found} (token {position})")]
    UnexpectedToken {
        expected: String,
        found: String,
        /// Index of the offending token in the token sequence
        position: usize,
    },

    #[error("Unexpected end of input: expected {expected}")]
    UnexpectedEof { expected: String },
}

impl ParseError {
    pub fn unexpected(
        expected: impl Into<String>,
        found: impl Into<String>,
        position: usize,
    ) -> Self {
        Self::UnexpectedToken {
            expected: expected.into(),
            found: found.into(),
            position,
        }
    }

    pub fn eof(expected: impl Into<String>) -> Self {
        Self::UnexpectedEof {
            expected: expected.into(),
        }
    }
}

/// Errors raised while rendering an AST into target source
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Unexpected {kind} node at statement level")]
    UnexpectedNode { kind: String },

    #[error("Malformed {kind} node: {detail}")]
    MalformedNode { kind: String, detail: String },

    #[error("Invalid literal `{0}` for the target language")]
    InvalidLiteral(String),

    #[error("Generated code failed to parse: {0}")]
    Syntax(String),

    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),
}

impl GenerateError {
    pub fn malformed(kind: impl ToString, detail: impl Into<String>) -> Self {
        Self::MalformedNode {
            kind: kind.to_string(),
            detail: detail.into(),
        }
    }
}

/// Errors during transpilation
#[derive(Debug, Error)]
pub enum TranspileError {
    #[error("Lexer error: {0}")]
    Lex(#[from] LexError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Code generation error: {0}")]
    Generate(#[from] GenerateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for transpilation operations
pub type Result<T> = std::result::Result<T, TranspileError>;

/// Type reported for names that were never declared
pub const UNKNOWN_TYPE: &str = "UNKNOWN";

/// Advisory registry of COBOL variable declarations.
///
/// Nothing in the pipeline requires it. A backend handed a table may use the
/// recorded types to annotate its output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymbolTable {
    variables: HashMap<String, String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare (or redeclare) a variable with a type such as `PIC 9(3)`
    pub fn declare(&mut self, name: &str, ty: &str) -> &mut Self {
        tracing::debug!(name, ty, "declared variable");
        self.variables.insert(name.to_string(), ty.to_string());
        self
    }

    /// Type of a variable, or [`UNKNOWN_TYPE`] when undeclared
    pub fn type_of(&self, name: &str) -> &str {
        self.variables
            .get(name)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_TYPE)
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}
