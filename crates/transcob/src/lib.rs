//! # transcob
//!
//! Translates a restricted COBOL subset into Java (or Rust).
//!
//! ## Quick Start
//!
//! ```
//! let java = transcob::transpile("DISPLAY \"Hello\".\nSTOP RUN.").unwrap();
//! assert!(java.contains("System.out.println(\"Hello\");"));
//! ```
//!
//! The pipeline is pure: one source string in, one target string (or the
//! first error) out. Nothing is written anywhere, so callers never see a
//! partial translation.

pub use transcob_ast::{Backend, Frontend, Node, NodeKind};
pub use transcob_cobol::{
    parse_program, tokenize, CobolFrontend, Lexer, Parser, RuleSet, Token, TokenCategory,
    TokenRule,
};
pub use transcob_codegen::{
    backend, generate, java_class_name, strip_quotes, CodegenOptions, DatabaseConfig, JavaCodegen,
    RustCodegen, Target,
};
pub use transcob_core::{
    is_cobol_extension, GenerateError, LexError, ParseError, Result, SourceFile, SymbolTable,
    TranspileError, COBOL_EXTENSIONS,
};

/// Configured pipeline: rule set, codegen options and an optional symbol table
pub struct Transpiler<'a> {
    frontend: CobolFrontend<'a>,
    options: CodegenOptions,
    symbols: Option<&'a SymbolTable>,
}

impl Default for Transpiler<'static> {
    fn default() -> Self {
        Self::new(CodegenOptions::default())
    }
}

impl Transpiler<'static> {
    pub fn new(options: CodegenOptions) -> Self {
        Self {
            frontend: CobolFrontend::default(),
            options,
            symbols: None,
        }
    }
}

impl<'a> Transpiler<'a> {
    /// Use a custom rule set instead of the standard COBOL rules
    pub fn with_rules(mut self, rules: &'a RuleSet) -> Self {
        self.frontend = CobolFrontend::with_rules(rules);
        self
    }

    pub fn with_symbols(mut self, symbols: &'a SymbolTable) -> Self {
        self.symbols = Some(symbols);
        self
    }

    pub fn options(&self) -> &CodegenOptions {
        &self.options
    }

    /// Extension for files produced by this pipeline
    pub fn output_extension(&self) -> &'static str {
        self.options.target.file_extension()
    }

    pub fn tokenize(&self, source: &str) -> Result<Vec<Token>> {
        Ok(self.frontend.tokenize(source)?)
    }

    pub fn parse(&self, source: &str) -> Result<Node> {
        self.frontend.parse_source(source)
    }

    /// Run all three stages over `source`
    pub fn transpile(&self, source: &str) -> Result<String> {
        tracing::debug!("starting lexical analysis");
        let tokens = self.frontend.tokenize(source)?;

        tracing::debug!(tokens = tokens.len(), "parsing tokens");
        let program = parse_program(tokens)?;

        tracing::debug!(target = %self.options.target, "generating code");
        let code = backend(&self.options, self.symbols).generate(&program)?;
        Ok(code)
    }

    /// Translate a loaded source file
    pub fn transpile_file(&self, source: &SourceFile) -> Result<String> {
        tracing::debug!(file = %source.name, "transpiling");
        self.transpile(&source.content)
    }
}

/// Translate COBOL source to Java with default options
pub fn transpile(source: &str) -> Result<String> {
    Transpiler::default().transpile(source)
}

/// Translate COBOL source with explicit options
pub fn transpile_with(source: &str, options: &CodegenOptions) -> Result<String> {
    Transpiler::new(options.clone()).transpile(source)
}
