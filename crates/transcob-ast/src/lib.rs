//! # transcob AST
//!
//! The tree handed from the COBOL frontend to the code generators.
//!
//! Every node is a `kind`, an optional literal `value` (empty when unused) and
//! an ordered list of owned `children`. The tree is strictly hierarchical.
//!
//! ## Shape Contract
//!
//! | Kind | Value | Children |
//! |------|-------|----------|
//! | Program | - | statements |
//! | DisplayStatement | string literal | - |
//! | MoveStatement | - | `Value`, `Variable` |
//! | StopRun | - | - |
//! | CallStatement | - | `Subroutine`, `Parameter`* |
//! | ExecSql | query text | - |
//!
//! Backends rely on this contract; [`Node::expect_children`] and friends turn a
//! violation into a [`GenerateError`] instead of a panic.

pub use transcob_core::{GenerateError, ParseError, SourceFile, SymbolTable};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Construct label carried by every node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Root of a translated program
    Program,
    /// `DISPLAY "text".`
    DisplayStatement,
    /// `MOVE 10 TO VAR.`
    MoveStatement,
    /// Source literal of a MOVE
    Value,
    /// Target variable of a MOVE
    Variable,
    /// `STOP RUN.`
    StopRun,
    /// `CALL "SUB" USING A, B.`
    CallStatement,
    /// Called program name
    Subroutine,
    /// One `USING` argument
    Parameter,
    /// `EXEC SQL ... END-EXEC.`
    #[serde(rename = "ExecSQL")]
    ExecSql,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Program => "Program",
            Self::DisplayStatement => "DisplayStatement",
            Self::MoveStatement => "MoveStatement",
            Self::Value => "Value",
            Self::Variable => "Variable",
            Self::StopRun => "StopRun",
            Self::CallStatement => "CallStatement",
            Self::Subroutine => "Subroutine",
            Self::Parameter => "Parameter",
            Self::ExecSql => "ExecSQL",
        }
    }

    /// Whether nodes of this kind may appear directly under `Program`
    pub fn is_statement(&self) -> bool {
        matches!(
            self,
            Self::DisplayStatement
                | Self::MoveStatement
                | Self::StopRun
                | Self::CallStatement
                | Self::ExecSql
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the syntax tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    pub value: String,
    pub children: Vec<Node>,
}

impl Node {
    /// Node without a value
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            value: String::new(),
            children: Vec::new(),
        }
    }

    /// Leaf node carrying a literal
    pub fn with_value(kind: NodeKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            children: Vec::new(),
        }
    }

    pub fn add_child(&mut self, child: Node) -> &mut Self {
        self.children.push(child);
        self
    }

    /// Builder form of [`Node::add_child`]
    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn program() -> Self {
        Self::new(NodeKind::Program)
    }

    pub fn display(text: impl Into<String>) -> Self {
        Self::with_value(NodeKind::DisplayStatement, text)
    }

    pub fn move_to(value: impl Into<String>, variable: impl Into<String>) -> Self {
        Self::new(NodeKind::MoveStatement)
            .child(Self::with_value(NodeKind::Value, value))
            .child(Self::with_value(NodeKind::Variable, variable))
    }

    pub fn stop_run() -> Self {
        Self::new(NodeKind::StopRun)
    }

    pub fn call<I, S>(subroutine: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut node = Self::new(NodeKind::CallStatement)
            .child(Self::with_value(NodeKind::Subroutine, subroutine));
        for param in params {
            node.add_child(Self::with_value(NodeKind::Parameter, param));
        }
        node
    }

    pub fn exec_sql(query: impl Into<String>) -> Self {
        Self::with_value(NodeKind::ExecSql, query)
    }

    /// Children, checked against an exact arity
    pub fn expect_children(&self, count: usize) -> Result<&[Node], GenerateError> {
        if self.children.len() == count {
            Ok(&self.children)
        } else {
            Err(GenerateError::malformed(
                self.kind,
                format!("expected {} children, found {}", count, self.children.len()),
            ))
        }
    }

    /// Child at `index`, checked against the expected kind
    pub fn expect_child(&self, index: usize, kind: NodeKind) -> Result<&Node, GenerateError> {
        match self.children.get(index) {
            Some(child) if child.kind == kind => Ok(child),
            Some(child) => Err(GenerateError::malformed(
                self.kind,
                format!("child {} is {}, expected {}", index, child.kind, kind),
            )),
            None => Err(GenerateError::malformed(
                self.kind,
                format!("missing {} child at position {}", kind, index),
            )),
        }
    }

    /// Statement children of a `Program` node.
    ///
    /// Fails on a non-`Program` root or on any child that is not a statement.
    pub fn statements(&self) -> Result<&[Node], GenerateError> {
        let unexpected = |node: &Node| GenerateError::UnexpectedNode {
            kind: node.kind.to_string(),
        };
        if self.kind != NodeKind::Program {
            return Err(unexpected(self));
        }
        if let Some(child) = self.children.iter().find(|c| !c.kind.is_statement()) {
            return Err(unexpected(child));
        }
        Ok(&self.children)
    }

    /// Count of direct children of a given kind
    pub fn count(&self, kind: NodeKind) -> usize {
        self.children.iter().filter(|c| c.kind == kind).count()
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}{}", "", self.kind, indent = depth * 2)?;
        if !self.value.is_empty() {
            write!(f, " = {}", self.value)?;
        }
        writeln!(f)?;
        for child in &self.children {
            child.write_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

/// Indented tree rendering, one node per line
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0)
    }
}

/// A source-language frontend producing a `Program` node
pub trait Frontend {
    /// Frontend name
    fn name(&self) -> &'static str;

    /// File extensions this frontend handles
    fn file_extensions(&self) -> &[&'static str];

    /// Parse source code into a program tree
    fn parse(&self, source: &SourceFile) -> transcob_core::Result<Node>;
}

/// A target-language backend rendering a `Program` node
pub trait Backend {
    /// Backend name
    fn name(&self) -> &'static str;

    /// Extension of generated files
    fn file_extension(&self) -> &'static str;

    /// Render the program as target source text
    fn generate(&self, program: &Node) -> Result<String, GenerateError>;
}
