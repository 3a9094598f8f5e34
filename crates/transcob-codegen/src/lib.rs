//! # transcob Code Generator
//!
//! Renders a parsed COBOL `Program` tree as target-language source.
//!
//! ## Backends
//!
//! 1. **Java** (default): a `Program` class with a `main` method, using
//!    `System.out`, `System.exit` and JDBC for embedded SQL.
//! 2. **Rust**: a `main` function built with `quote` and formatted with
//!    `prettyplease`; embedded SQL goes through the `mysql` crate.
//!
//! ## Construct Mapping
//!
//! | COBOL | Java | Rust |
//! |-------|------|------|
//! | DISPLAY "X" | `System.out.println("X");` | `println!("{}", "X");` |
//! | MOVE 1 TO V | `V = 1;` | `v = 1;` |
//! | STOP RUN | `System.exit(0);` | `std::process::exit(0);` |
//! | CALL "S" USING A | `S.methodName(A);` | `s::call(&mut a);` |
//! | EXEC SQL q END-EXEC | JDBC try-with-resources block | `mysql` pool block |
//!
//! Statements are emitted in source order. A `STOP RUN` does not end
//! generation; whatever follows it is emitted too.

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::{self, Write};
use std::str::FromStr;
use transcob_ast::{Backend, Node, NodeKind};
use transcob_core::{GenerateError, SymbolTable};

/// Target language
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    #[default]
    Java,
    Rust,
}

impl Target {
    pub fn file_extension(&self) -> &'static str {
        match self {
            Self::Java => "java",
            Self::Rust => "rs",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Java => "java",
            Self::Rust => "rust",
        })
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "java" => Ok(Self::Java),
            "rust" | "rs" => Ok(Self::Rust),
            other => Err(format!("unsupported target: {}", other)),
        }
    }
}

/// Connection settings baked into embedded-SQL blocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            database: "mydb".to_string(),
            user: "user".to_string(),
            password: "password".to_string(),
        }
    }
}

impl DatabaseConfig {
    pub fn jdbc_url(&self) -> String {
        format!("jdbc:mysql://{}:{}/{}", self.host, self.port, self.database)
    }

    pub fn mysql_url(&self) -> String {
        format!(
            "mysql://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.database
        )
    }
}

/// Code generation options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodegenOptions {
    /// Language to emit
    pub target: Target,
    /// Drop the enclosing quotes of string literals before embedding them
    pub strip_string_quotes: bool,
    /// Name of the generated Java class
    pub class_name: String,
    /// Emit a provenance header comment (Rust target)
    pub include_header: bool,
    /// Connection used by embedded SQL
    pub database: DatabaseConfig,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            target: Target::Java,
            strip_string_quotes: true,
            class_name: "Program".to_string(),
            include_header: true,
            database: DatabaseConfig::default(),
        }
    }
}

impl CodegenOptions {
    pub fn for_target(target: Target) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    /// String literal text as it should be embedded
    fn literal<'a>(&self, raw: &'a str) -> &'a str {
        if self.strip_string_quotes {
            strip_quotes(raw)
        } else {
            raw
        }
    }
}

/// Remove one pair of enclosing double quotes, if present
pub fn strip_quotes(raw: &str) -> &str {
    raw.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw)
}

/// Escape text for the inside of a Java string literal
fn java_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Java class name derived from a file stem: `payroll-run` becomes `PayrollRun`.
///
/// Falls back to `Program` when the stem has no usable characters.
pub fn java_class_name(stem: &str) -> String {
    let mut name = String::new();
    for part in stem.split(|c: char| !c.is_ascii_alphanumeric()) {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            name.push(first.to_ascii_uppercase());
            name.extend(chars.map(|c| c.to_ascii_lowercase()));
        }
    }

    match name.chars().next() {
        None => "Program".to_string(),
        Some(c) if c.is_ascii_digit() => format!("_{}", name),
        Some(_) => name,
    }
}

/// Pick the backend for `options.target`
pub fn backend<'s>(
    options: &CodegenOptions,
    symbols: Option<&'s SymbolTable>,
) -> Box<dyn Backend + 's> {
    match options.target {
        Target::Java => {
            let mut codegen = JavaCodegen::new(options.clone());
            if let Some(symbols) = symbols {
                codegen = codegen.with_symbols(symbols);
            }
            Box::new(codegen)
        }
        Target::Rust => Box::new(RustCodegen::new(options.clone())),
    }
}

/// Generate target source for a `Program` node
pub fn generate(program: &Node, options: &CodegenOptions) -> Result<String, GenerateError> {
    backend(options, None).generate(program)
}

/// Operands of a MOVE: (value, variable)
fn move_operands(node: &Node) -> Result<(&str, &str), GenerateError> {
    node.expect_children(2)?;
    let value = node.expect_child(0, NodeKind::Value)?;
    let variable = node.expect_child(1, NodeKind::Variable)?;
    Ok((value.value.as_str(), variable.value.as_str()))
}

/// Operands of a CALL: (subroutine, parameters)
fn call_operands(node: &Node) -> Result<(&str, Vec<&str>), GenerateError> {
    let subroutine = node.expect_child(0, NodeKind::Subroutine)?;
    let params = node.children[1..]
        .iter()
        .map(|p| {
            if p.kind == NodeKind::Parameter {
                Ok(p.value.as_str())
            } else {
                Err(GenerateError::malformed(
                    node.kind,
                    format!("unexpected {} child", p.kind),
                ))
            }
        })
        .collect::<Result<_, _>>()?;
    Ok((subroutine.value.as_str(), params))
}

fn check_leaf(node: &Node) -> Result<(), GenerateError> {
    node.expect_children(0).map(|_| ())
}

const JAVA_BODY: &str = "        ";
const JAVA_CALL_METHOD: &str = "methodName";

/// Java code generator
pub struct JavaCodegen<'s> {
    options: CodegenOptions,
    symbols: Option<&'s SymbolTable>,
}

impl<'s> JavaCodegen<'s> {
    pub fn new(options: CodegenOptions) -> Self {
        Self {
            options,
            symbols: None,
        }
    }

    /// Annotate assignments to declared variables with their type
    pub fn with_symbols(mut self, symbols: &'s SymbolTable) -> Self {
        self.symbols = Some(symbols);
        self
    }

    fn emit_statement(&self, code: &mut String, node: &Node) -> Result<(), GenerateError> {
        match node.kind {
            NodeKind::DisplayStatement => {
                check_leaf(node)?;
                self.emit_display(code, &node.value)
            }
            NodeKind::MoveStatement => {
                let (value, variable) = move_operands(node)?;
                self.emit_move(code, value, variable)
            }
            NodeKind::StopRun => {
                check_leaf(node)?;
                writeln!(code, "{}System.exit(0);", JAVA_BODY)?;
                Ok(())
            }
            NodeKind::CallStatement => {
                let (subroutine, params) = call_operands(node)?;
                writeln!(
                    code,
                    "{}{}.{}({});",
                    JAVA_BODY,
                    self.options.literal(subroutine),
                    JAVA_CALL_METHOD,
                    params.join(", ")
                )?;
                Ok(())
            }
            NodeKind::ExecSql => {
                check_leaf(node)?;
                self.emit_exec_sql(code, &node.value)
            }
            NodeKind::Program
            | NodeKind::Value
            | NodeKind::Variable
            | NodeKind::Subroutine
            | NodeKind::Parameter => Err(GenerateError::UnexpectedNode {
                kind: node.kind.to_string(),
            }),
        }
    }

    fn emit_display(&self, code: &mut String, raw: &str) -> Result<(), GenerateError> {
        let text = if self.options.strip_string_quotes {
            java_escape(strip_quotes(raw))
        } else {
            raw.to_string()
        };
        writeln!(code, "{}System.out.println(\"{}\");", JAVA_BODY, text)?;
        Ok(())
    }

    fn emit_move(
        &self,
        code: &mut String,
        value: &str,
        variable: &str,
    ) -> Result<(), GenerateError> {
        write!(code, "{}{} = {};", JAVA_BODY, variable, value)?;
        if let Some(symbols) = self.symbols.filter(|s| s.is_declared(variable)) {
            write!(code, " // {}", symbols.type_of(variable))?;
        }
        writeln!(code)?;
        Ok(())
    }

    fn emit_exec_sql(&self, code: &mut String, query: &str) -> Result<(), GenerateError> {
        let db = &self.options.database;
        writeln!(
            code,
            "{}try (Connection conn = DriverManager.getConnection(\"{}\", \"{}\", \"{}\");",
            JAVA_BODY,
            java_escape(&db.jdbc_url()),
            java_escape(&db.user),
            java_escape(&db.password)
        )?;
        writeln!(
            code,
            "{}     PreparedStatement stmt = conn.prepareStatement(\"{}\")) {{",
            JAVA_BODY,
            java_escape(query)
        )?;
        writeln!(code, "{}    ResultSet rs = stmt.executeQuery();", JAVA_BODY)?;
        writeln!(code, "{}    if (rs.next()) {{", JAVA_BODY)?;
        writeln!(code, "{}        System.out.println(rs.getString(1));", JAVA_BODY)?;
        writeln!(code, "{}    }}", JAVA_BODY)?;
        writeln!(code, "{}}}", JAVA_BODY)?;
        Ok(())
    }
}

impl Backend for JavaCodegen<'_> {
    fn name(&self) -> &'static str {
        "Java"
    }

    fn file_extension(&self) -> &'static str {
        Target::Java.file_extension()
    }

    fn generate(&self, program: &Node) -> Result<String, GenerateError> {
        let statements = program.statements()?;
        let mut code = String::new();

        writeln!(code, "import java.util.*;")?;
        writeln!(code, "import java.sql.*;")?;
        writeln!(code, "public class {} {{", self.options.class_name)?;
        writeln!(code, "    public static void main(String[] args) throws SQLException {{")?;

        for statement in statements {
            self.emit_statement(&mut code, statement)?;
        }

        writeln!(code, "    }}")?;
        writeln!(code, "}}")?;

        tracing::debug!(statements = statements.len(), bytes = code.len(), "generated Java");
        Ok(code)
    }
}

const RUST_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "static", "struct", "super", "trait", "true", "try", "type", "typeof",
    "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Map a COBOL name onto a snake-case Rust identifier.
///
/// `WS-TOTAL` becomes `ws_total`; Rust keywords get a trailing underscore.
pub fn rust_ident_name(name: &str) -> Result<String, GenerateError> {
    let mapped: String = name
        .chars()
        .map(|c| if c == '-' { '_' } else { c.to_ascii_lowercase() })
        .collect();

    let mut chars = mapped.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') || mapped == "_" {
        return Err(GenerateError::InvalidLiteral(name.to_string()));
    }

    if RUST_KEYWORDS.contains(&mapped.as_str()) {
        Ok(format!("{}_", mapped))
    } else {
        Ok(mapped)
    }
}

fn rust_ident(name: &str) -> Result<Ident, GenerateError> {
    Ok(format_ident!("{}", rust_ident_name(name)?))
}

/// Rust code generator
pub struct RustCodegen {
    options: CodegenOptions,
}

impl RustCodegen {
    pub fn new(options: CodegenOptions) -> Self {
        Self { options }
    }

    /// Token stream of the whole generated file
    pub fn generate_tokens(&self, program: &Node) -> Result<TokenStream, GenerateError> {
        let header = if self.options.include_header {
            let doc = " Transpiled from COBOL by transcob";
            quote! { #![doc = #doc] }
        } else {
            quote! {}
        };

        let imports = if program.count(NodeKind::ExecSql) > 0 {
            quote! { use mysql::prelude::Queryable; }
        } else {
            quote! {}
        };

        let statements: Vec<TokenStream> = program
            .statements()?
            .iter()
            .map(|s| self.statement_tokens(s))
            .collect::<Result<_, _>>()?;

        Ok(quote! {
            #header
            #imports

            fn main() -> Result<(), Box<dyn std::error::Error>> {
                #(#statements)*
                Ok(())
            }
        })
    }

    fn statement_tokens(&self, node: &Node) -> Result<TokenStream, GenerateError> {
        match node.kind {
            NodeKind::DisplayStatement => {
                check_leaf(node)?;
                let text = self.options.literal(&node.value);
                Ok(quote! { println!("{}", #text); })
            }
            NodeKind::MoveStatement => {
                let (value, variable) = move_operands(node)?;
                let value: syn::Lit = syn::parse_str(value)
                    .map_err(|_| GenerateError::InvalidLiteral(value.to_string()))?;
                let variable = rust_ident(variable)?;
                Ok(quote! { #variable = #value; })
            }
            NodeKind::StopRun => {
                check_leaf(node)?;
                Ok(quote! { std::process::exit(0); })
            }
            NodeKind::CallStatement => {
                let (subroutine, params) = call_operands(node)?;
                let module = rust_ident(strip_quotes(subroutine))?;
                let args: Vec<Ident> = params
                    .into_iter()
                    .map(rust_ident)
                    .collect::<Result<_, _>>()?;
                // Each argument is borrowed mutably, so a name may appear once
                let mut seen = HashSet::new();
                if let Some(dup) = args.iter().find(|arg| !seen.insert(arg.to_string())) {
                    return Err(GenerateError::malformed(
                        node.kind,
                        format!("parameter `{}` passed more than once", dup),
                    ));
                }
                Ok(quote! { #module::call(#(&mut #args),*); })
            }
            NodeKind::ExecSql => {
                check_leaf(node)?;
                let url = self.options.database.mysql_url();
                let query = node.value.as_str();
                Ok(quote! {
                    {
                        let pool = mysql::Pool::new(#url)?;
                        let mut conn = pool.get_conn()?;
                        let row: Option<String> = conn.query_first(#query)?;
                        if let Some(value) = row {
                            println!("{}", value);
                        }
                    }
                })
            }
            NodeKind::Program
            | NodeKind::Value
            | NodeKind::Variable
            | NodeKind::Subroutine
            | NodeKind::Parameter => Err(GenerateError::UnexpectedNode {
                kind: node.kind.to_string(),
            }),
        }
    }

    /// Format code using prettyplease
    fn format_code(&self, tokens: TokenStream) -> Result<String, GenerateError> {
        let file: syn::File =
            syn::parse2(tokens).map_err(|e| GenerateError::Syntax(e.to_string()))?;

        Ok(prettyplease::unparse(&file))
    }
}

impl Backend for RustCodegen {
    fn name(&self) -> &'static str {
        "Rust"
    }

    fn file_extension(&self) -> &'static str {
        Target::Rust.file_extension()
    }

    fn generate(&self, program: &Node) -> Result<String, GenerateError> {
        let tokens = self.generate_tokens(program)?;
        let code = self.format_code(tokens)?;

        tracing::debug!(statements = program.children.len(), bytes = code.len(), "generated Rust");
        Ok(code)
    }
}
