//! # transcob COBOL Frontend
//!
//! Lexes and parses a restricted COBOL subset into the transcob AST.
//!
//! ## Supported Subset
//!
//! - `IDENTIFICATION`, `DATA` and `PROCEDURE` division headers (skipped)
//! - `DISPLAY "text".`
//! - `MOVE 100 TO VAR.`
//! - `STOP RUN.`
//! - `CALL "SUB" [USING A, B].`
//! - `EXEC SQL ... END-EXEC.` (raw pass-through)
//!
//! ## Tokenization
//!
//! The lexer walks an ordered [`RuleSet`]. After skipping whitespace, the
//! first rule whose pattern matches at offset 0 of the remaining input wins,
//! so specific rules (division headers, keywords, `<=`) sit before generic
//! ones (identifiers, `<`). Source is expected in upper case, as in
//! fixed-format COBOL listings.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use transcob_ast::{Frontend, Node, NodeKind};
use transcob_core::{LexError, ParseError, SourceFile, COBOL_EXTENSIONS};

/// Token categories, a closed set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenCategory {
    DivisionHeader,
    Keyword,
    Identifier,
    StringLiteral,
    Number,
    Comment,
    /// Relational or arithmetic operator
    Operator,
    Punctuation,
    Symbol,
}

impl TokenCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DivisionHeader => "DIVISION_HEADER",
            Self::Keyword => "KEYWORD",
            Self::Identifier => "IDENTIFIER",
            Self::StringLiteral => "STRING",
            Self::Number => "NUMBER",
            Self::Comment => "COMMENT",
            Self::Operator => "OPERATOR",
            Self::Punctuation => "PUNCTUATION",
            Self::Symbol => "SYMBOL",
        }
    }
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lexed token: category plus the exact matched text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub category: TokenCategory,
    pub text: String,
}

impl Token {
    pub fn new(category: TokenCategory, text: impl Into<String>) -> Self {
        Self {
            category,
            text: text.into(),
        }
    }

    pub fn is(&self, category: TokenCategory, text: &str) -> bool {
        self.category == category && self.text == text
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<16}{}", self.category.as_str(), self.text)
    }
}

/// Trailing context for word-like rules: the word must not continue.
const WORD_END: &str = r"(?:[^A-Za-z0-9_\-]|$)";

const DIVISION_HEADERS: &[&str] = &["IDENTIFICATION", "DATA", "PROCEDURE"];

const KEYWORDS: &[&str] = &[
    "DIVISION", "PROGRAM-ID", "WORKING-STORAGE", "SECTION", "STOP", "RUN", "MOVE", "TO", "IF",
    "ELSE", "DISPLAY", "COMPUTE", "PERFORM", "TIMES", "READ", "WRITE", "OPEN", "CLOSE", "INTO",
    "OUTPUT", "INPUT", "END-IF", "END-PERFORM", "ACCEPT", "EVALUATE", "WHEN", "OTHER",
    "END-EVALUATE", "STRING", "FUNCTION", "LENGTH", "OCCURS", "SEARCH", "AT", "END-EXEC", "END",
    "ALL", "SORT", "ASCENDING", "DESCENDING", "MERGE", "CALL", "USING", "GOTO", "EXEC", "SQL",
    "PIC",
];

/// One tokenizer rule: a category and a pattern anchored at offset 0.
///
/// When the pattern defines a `tok` capture group, the token text is that
/// group; anything matched after it is trailing context and is not consumed.
#[derive(Debug, Clone)]
pub struct TokenRule {
    pub category: TokenCategory,
    pattern: Regex,
}

impl TokenRule {
    pub fn new(category: TokenCategory, pattern: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!("^(?:{})", pattern))?;
        Ok(Self { category, pattern })
    }

    /// Rule matching any of `words` as a whole word
    pub fn words(category: TokenCategory, words: &[&str]) -> Result<Self, regex::Error> {
        let alternatives: Vec<String> = words.iter().map(|w| regex::escape(w)).collect();
        Self::new(
            category,
            &format!("(?P<tok>{}){}", alternatives.join("|"), WORD_END),
        )
    }

    /// Matched token text, if the rule matches at the very start of `input`
    pub fn match_start<'h>(&self, input: &'h str) -> Option<&'h str> {
        let caps = self.pattern.captures(input)?;
        let m = caps.name("tok").or_else(|| caps.get(0))?;
        (m.start() == 0 && !m.as_str().is_empty()).then(|| m.as_str())
    }
}

/// Ordered, read-only tokenizer configuration
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<TokenRule>,
}

static STANDARD_RULES: Lazy<RuleSet> =
    Lazy::new(|| RuleSet::cobol().expect("built-in COBOL token rules compile"));

impl RuleSet {
    pub fn new(rules: Vec<TokenRule>) -> Self {
        Self { rules }
    }

    /// The COBOL subset rules, in priority order
    pub fn cobol() -> Result<Self, regex::Error> {
        use TokenCategory::*;

        Ok(Self::new(vec![
            TokenRule::words(DivisionHeader, DIVISION_HEADERS)?,
            TokenRule::words(Keyword, KEYWORDS)?,
            TokenRule::new(Identifier, &format!(r"(?P<tok>[A-Z][A-Z0-9\-]*){}", WORD_END))?,
            TokenRule::new(StringLiteral, r#""[^"]*""#)?,
            TokenRule::new(Number, r"[0-9]+(?:\.[0-9]+)?\b")?,
            TokenRule::new(Comment, r"\*>.*")?,
            TokenRule::new(Operator, r"<=|>=|<>|=|<|>")?,
            TokenRule::new(Operator, r"[+\-*/=]")?,
            TokenRule::new(Punctuation, r#"[,."]"#)?,
            TokenRule::new(Symbol, r"[():]")?,
        ]))
    }

    /// Shared instance of [`RuleSet::cobol`], built on first use
    pub fn standard() -> &'static RuleSet {
        &STANDARD_RULES
    }

    /// First rule matching at offset 0, with the matched text
    pub fn match_start<'h>(&self, input: &'h str) -> Option<(TokenCategory, &'h str)> {
        self.rules
            .iter()
            .find_map(|rule| rule.match_start(input).map(|text| (rule.category, text)))
    }
}

/// Splits source text into tokens using a borrowed rule set
#[derive(Debug, Clone, Copy)]
pub struct Lexer<'r> {
    rules: &'r RuleSet,
}

impl Default for Lexer<'static> {
    fn default() -> Self {
        Self::new(RuleSet::standard())
    }
}

impl<'r> Lexer<'r> {
    pub fn new(rules: &'r RuleSet) -> Self {
        Self { rules }
    }

    pub fn tokenize(&self, source: &str) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        let mut remaining = source;

        loop {
            remaining = remaining.trim_start();
            if remaining.is_empty() {
                break;
            }

            let (category, text) = self
                .rules
                .match_start(remaining)
                .ok_or_else(|| LexError::new(remaining))?;
            tokens.push(Token::new(category, text));
            remaining = &remaining[text.len()..];
        }

        tracing::debug!(count = tokens.len(), "tokenized source");
        Ok(tokens)
    }
}

/// Tokenize with the standard rule set
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::default().tokenize(source)
}

/// Recursive-descent parser over a token sequence
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Comments carry no statement meaning and are dropped here.
    pub fn new(tokens: Vec<Token>) -> Self {
        let tokens = tokens
            .into_iter()
            .filter(|t| t.category != TokenCategory::Comment)
            .collect();
        Self { tokens, pos: 0 }
    }

    /// Parse the whole token sequence into a `Program` node
    pub fn parse_program(&mut self) -> Result<Node, ParseError> {
        let mut program = Node::program();

        self.skip_divisions()?;

        while !self.is_at_end() {
            program.add_child(self.parse_statement()?);
        }

        tracing::debug!(statements = program.children.len(), "parsed program");
        Ok(program)
    }

    /// `IDENTIFICATION DIVISION.` and friends carry nothing we translate
    fn skip_divisions(&mut self) -> Result<(), ParseError> {
        while self
            .peek()
            .is_some_and(|t| t.category == TokenCategory::DivisionHeader)
        {
            self.expect(TokenCategory::DivisionHeader)?;
            self.expect_keyword("DIVISION")?;
            self.expect_period()?;
        }
        Ok(())
    }

    fn parse_statement(&mut self) -> Result<Node, ParseError> {
        let token = self.peek().ok_or_else(|| ParseError::eof("statement"))?;
        let keyword = match token.category {
            TokenCategory::Keyword => token.text.clone(),
            _ => return Err(ParseError::unexpected("statement", &token.text, self.pos)),
        };

        match keyword.as_str() {
            "DISPLAY" => self.parse_display(),
            "MOVE" => self.parse_move(),
            "STOP" => self.parse_stop_run(),
            "CALL" => self.parse_call(),
            "EXEC" => self.parse_exec_sql(),
            other => Err(ParseError::unexpected("statement", other, self.pos)),
        }
    }

    fn parse_display(&mut self) -> Result<Node, ParseError> {
        self.expect_keyword("DISPLAY")?;
        let text = self.expect(TokenCategory::StringLiteral)?;
        self.expect_period()?;

        Ok(Node::display(text.text))
    }

    fn parse_move(&mut self) -> Result<Node, ParseError> {
        self.expect_keyword("MOVE")?;
        let value = self.expect(TokenCategory::Number)?;
        self.expect_keyword("TO")?;
        let variable = self.expect(TokenCategory::Identifier)?;
        self.expect_period()?;

        Ok(Node::move_to(value.text, variable.text))
    }

    fn parse_stop_run(&mut self) -> Result<Node, ParseError> {
        self.expect_keyword("STOP")?;
        self.expect_keyword("RUN")?;
        self.expect_period()?;

        Ok(Node::stop_run())
    }

    fn parse_call(&mut self) -> Result<Node, ParseError> {
        self.expect_keyword("CALL")?;
        let subroutine = self.expect(TokenCategory::StringLiteral)?;

        let mut node = Node::new(NodeKind::CallStatement)
            .child(Node::with_value(NodeKind::Subroutine, subroutine.text));

        if self.match_token(TokenCategory::Keyword, "USING") {
            loop {
                let param = self.expect(TokenCategory::Identifier)?;
                node.add_child(Node::with_value(NodeKind::Parameter, param.text));
                if !self.match_token(TokenCategory::Punctuation, ",") {
                    break;
                }
            }
        }
        self.expect_period()?;

        Ok(node)
    }

    fn parse_exec_sql(&mut self) -> Result<Node, ParseError> {
        self.expect_keyword("EXEC")?;
        self.expect_keyword("SQL")?;

        let mut query = Vec::new();
        while !self.match_token(TokenCategory::Keyword, "END-EXEC") {
            let token = self.advance().ok_or_else(|| ParseError::eof("END-EXEC"))?;
            query.push(token.text);
        }
        self.expect_period()?;

        Ok(Node::exec_sql(query.join(" ")))
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned()?;
        self.pos += 1;
        Some(token)
    }

    /// Consume the current token if it has this category and text
    fn match_token(&mut self, category: TokenCategory, text: &str) -> bool {
        if self.peek().is_some_and(|t| t.is(category, text)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, category: TokenCategory) -> Result<Token, ParseError> {
        match self.peek() {
            Some(t) if t.category == category => {}
            Some(t) => return Err(ParseError::unexpected(category.as_str(), &t.text, self.pos)),
            None => return Err(ParseError::eof(category.as_str())),
        }
        self.advance().ok_or_else(|| ParseError::eof(category.as_str()))
    }

    fn expect_text(&mut self, category: TokenCategory, text: &str) -> Result<Token, ParseError> {
        match self.peek() {
            Some(t) if t.is(category, text) => {}
            Some(t) => return Err(ParseError::unexpected(text, &t.text, self.pos)),
            None => return Err(ParseError::eof(text)),
        }
        self.advance().ok_or_else(|| ParseError::eof(text))
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<Token, ParseError> {
        self.expect_text(TokenCategory::Keyword, keyword)
    }

    fn expect_period(&mut self) -> Result<Token, ParseError> {
        self.expect_text(TokenCategory::Punctuation, ".")
    }
}

/// Parse an already tokenized program
pub fn parse_program(tokens: Vec<Token>) -> Result<Node, ParseError> {
    Parser::new(tokens).parse_program()
}

/// The COBOL frontend: tokenize, then parse
#[derive(Debug, Clone, Copy)]
pub struct CobolFrontend<'r> {
    lexer: Lexer<'r>,
}

impl Default for CobolFrontend<'static> {
    fn default() -> Self {
        Self {
            lexer: Lexer::default(),
        }
    }
}

impl<'r> CobolFrontend<'r> {
    pub fn with_rules(rules: &'r RuleSet) -> Self {
        Self {
            lexer: Lexer::new(rules),
        }
    }

    pub fn tokenize(&self, source: &str) -> Result<Vec<Token>, LexError> {
        self.lexer.tokenize(source)
    }

    pub fn parse_source(&self, source: &str) -> transcob_core::Result<Node> {
        let tokens = self.lexer.tokenize(source)?;
        Ok(parse_program(tokens)?)
    }
}

impl Frontend for CobolFrontend<'_> {
    fn name(&self) -> &'static str {
        "COBOL"
    }

    fn file_extensions(&self) -> &[&'static str] {
        COBOL_EXTENSIONS
    }

    fn parse(&self, source: &SourceFile) -> transcob_core::Result<Node> {
        tracing::debug!(file = %source.name, "parsing COBOL source");
        self.parse_source(&source.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use transcob_core::TranspileError;

    fn categories(source: &str) -> Vec<TokenCategory> {
        tokenize(source).unwrap().into_iter().map(|t| t.category).collect()
    }

    fn texts(source: &str) -> Vec<String> {
        tokenize(source).unwrap().into_iter().map(|t| t.text).collect()
    }

    fn parse(source: &str) -> Result<Node, ParseError> {
        parse_program(tokenize(source).unwrap())
    }

    #[test]
    fn test_lexer_display() {
        let tokens = tokenize("DISPLAY \"Hello, COBOL\".").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::new(TokenCategory::Keyword, "DISPLAY"),
                Token::new(TokenCategory::StringLiteral, "\"Hello, COBOL\""),
                Token::new(TokenCategory::Punctuation, "."),
            ]
        );
    }

    #[test]
    fn test_lexer_empty_and_whitespace() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("  \n\t  ").unwrap().is_empty());
    }

    #[test]
    fn test_division_headers() {
        use TokenCategory::*;
        assert_eq!(
            categories("IDENTIFICATION DIVISION.\nDATA DIVISION."),
            vec![DivisionHeader, Keyword, Punctuation, DivisionHeader, Keyword, Punctuation]
        );
    }

    #[test]
    fn test_relational_operators_stay_whole() {
        for op in ["<=", ">=", "<>"] {
            let tokens = tokenize(op).unwrap();
            assert_eq!(tokens, vec![Token::new(TokenCategory::Operator, op)]);
        }
        assert_eq!(texts("A <= B"), vec!["A", "<=", "B"]);
        assert_eq!(texts("A<>B"), vec!["A", "<>", "B"]);
        assert_eq!(texts("< ="), vec!["<", "="]);
    }

    #[test]
    fn test_arithmetic_operators() {
        assert_eq!(texts("A + B * 2 / C - D"), vec!["A", "+", "B", "*", "2", "/", "C", "-", "D"]);
    }

    #[test]
    fn test_hyphenated_words() {
        use TokenCategory::*;
        let tokens = tokenize("END-EXEC END TO-DATE DATA-NAME WORKING-STORAGE").unwrap();
        let pairs: Vec<_> = tokens.iter().map(|t| (t.category, t.text.as_str())).collect();
        assert_eq!(
            pairs,
            vec![
                (Keyword, "END-EXEC"),
                (Keyword, "END"),
                (Identifier, "TO-DATE"),
                (Identifier, "DATA-NAME"),
                (Keyword, "WORKING-STORAGE"),
            ]
        );
    }

    #[test]
    fn test_trailing_hyphen_stays_in_word() {
        use TokenCategory::*;
        let tokens = tokenize("END- END VAR-").unwrap();
        let pairs: Vec<_> = tokens.iter().map(|t| (t.category, t.text.as_str())).collect();
        assert_eq!(pairs, vec![(Identifier, "END-"), (Keyword, "END"), (Identifier, "VAR-")]);
        assert_eq!(texts("A - B"), vec!["A", "-", "B"]);
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        let tokens = tokenize("MOVED TOTAL").unwrap();
        assert!(tokens.iter().all(|t| t.category == TokenCategory::Identifier));
    }

    #[test]
    fn test_numbers_and_period() {
        assert_eq!(texts("MOVE 100 TO VAR1."), vec!["MOVE", "100", "TO", "VAR1", "."]);
        assert_eq!(texts("1.5."), vec!["1.5", "."]);
    }

    #[test]
    fn test_comment_token() {
        let tokens = tokenize("*> a comment\nSTOP RUN.").unwrap();
        assert_eq!(tokens[0], Token::new(TokenCategory::Comment, "*> a comment"));
        assert_eq!(tokens[1].text, "STOP");
    }

    #[test]
    fn test_symbols() {
        use TokenCategory::*;
        assert_eq!(categories("(A):"), vec![Symbol, Identifier, Symbol, Symbol]);
    }

    #[test]
    fn test_unmatched_input_is_error() {
        let err = tokenize("DISPLAY @oops").unwrap_err();
        assert_eq!(err.remaining, "@oops");

        // Lower-case words only match later in the string, never at offset 0.
        let err = tokenize("display \"X\".").unwrap_err();
        assert_eq!(err.remaining, "display \"X\".");
    }

    #[test]
    fn test_rule_order_matters() {
        let reversed = RuleSet::new(vec![
            TokenRule::new(TokenCategory::Operator, r"[<>=]").unwrap(),
            TokenRule::new(TokenCategory::Operator, r"<=|>=|<>").unwrap(),
        ]);
        let tokens = Lexer::new(&reversed).tokenize("<=").unwrap();
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_rule_rejects_later_match() {
        let rule = TokenRule::new(TokenCategory::Number, r"[0-9]+").unwrap();
        assert_eq!(rule.match_start("ABC 123"), None);
        assert_eq!(rule.match_start("123 ABC"), Some("123"));
    }

    #[test]
    fn test_lexer_deterministic() {
        let source = "IDENTIFICATION DIVISION.\nDISPLAY \"A\".\nCALL \"X\" USING P, Q.";
        assert_eq!(tokenize(source).unwrap(), tokenize(source).unwrap());
    }

    #[test]
    fn test_parse_divisions_only() {
        let program = parse(
            "IDENTIFICATION DIVISION.\nDATA DIVISION.\nPROCEDURE DIVISION.",
        )
        .unwrap();
        assert_eq!(program.kind, NodeKind::Program);
        assert!(program.children.is_empty());
    }

    #[test]
    fn test_parse_empty() {
        let program = parse_program(Vec::new()).unwrap();
        assert!(program.children.is_empty());
    }

    #[test]
    fn test_parse_display() {
        let program = parse("DISPLAY \"X\".").unwrap();
        assert_eq!(program.children, vec![Node::display("\"X\"")]);
    }

    #[test]
    fn test_parse_move() {
        let program = parse("MOVE 100 TO VAR1.").unwrap();
        let stmt = &program.children[0];
        assert_eq!(stmt.kind, NodeKind::MoveStatement);
        assert_eq!(stmt.children[0], Node::with_value(NodeKind::Value, "100"));
        assert_eq!(stmt.children[1], Node::with_value(NodeKind::Variable, "VAR1"));
    }

    #[test]
    fn test_parse_stop_run() {
        let program = parse("STOP RUN.").unwrap();
        assert_eq!(program.children, vec![Node::stop_run()]);
        assert!(program.children[0].children.is_empty());
    }

    #[test]
    fn test_parse_call_with_params() {
        let program = parse("CALL \"SUB\" USING A, B.").unwrap();
        let stmt = &program.children[0];
        let children: Vec<_> = stmt
            .children
            .iter()
            .map(|c| (c.kind, c.value.as_str()))
            .collect();
        assert_eq!(
            children,
            vec![
                (NodeKind::Subroutine, "\"SUB\""),
                (NodeKind::Parameter, "A"),
                (NodeKind::Parameter, "B"),
            ]
        );
    }

    #[test]
    fn test_parse_call_without_using() {
        let program = parse("CALL \"SUB\".").unwrap();
        assert_eq!(program.children[0].children.len(), 1);
    }

    #[test]
    fn test_parse_call_requires_comma_separated_params() {
        assert!(parse("CALL \"SUB\" USING A B.").is_err());
        assert!(parse("CALL \"SUB\" USING .").is_err());
        assert!(parse("CALL \"SUB\" USING A,.").is_err());
    }

    #[test]
    fn test_parse_exec_sql() {
        let program = parse("EXEC SQL SELECT NAME FROM EMPLOYEE WHERE ID = 7 END-EXEC.").unwrap();
        assert_eq!(
            program.children,
            vec![Node::exec_sql("SELECT NAME FROM EMPLOYEE WHERE ID = 7")]
        );
    }

    #[test]
    fn test_parse_exec_sql_unterminated() {
        let err = parse("EXEC SQL SELECT NAME").unwrap_err();
        assert_eq!(err, ParseError::eof("END-EXEC"));
    }

    #[test]
    fn test_parse_full_program_in_order() {
        let source = r#"
            IDENTIFICATION DIVISION.
            PROCEDURE DIVISION.
            *> greet first
            DISPLAY "Hello, COBOL".
            MOVE 100 TO VAR1.
            STOP RUN.
            DISPLAY "after stop".
        "#;
        let program = parse(source).unwrap();
        let kinds: Vec<_> = program.children.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::DisplayStatement,
                NodeKind::MoveStatement,
                NodeKind::StopRun,
                NodeKind::DisplayStatement,
            ]
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse("MOVE ABC TO VAR1.").unwrap_err(),
            ParseError::unexpected("NUMBER", "ABC", 1)
        );
        assert_eq!(parse("DISPLAY \"X\"").unwrap_err(), ParseError::eof("."));
        assert_eq!(
            parse("IDENTIFICATION SECTION.").unwrap_err(),
            ParseError::unexpected("DIVISION", "SECTION", 1)
        );
        assert_eq!(
            parse("PERFORM X.").unwrap_err(),
            ParseError::unexpected("statement", "PERFORM", 0)
        );
        assert_eq!(
            parse("VAR1.").unwrap_err(),
            ParseError::unexpected("statement", "VAR1", 0)
        );
    }

    #[test]
    fn test_division_after_statement_is_error() {
        assert!(parse("STOP RUN.\nPROCEDURE DIVISION.").is_err());
    }

    #[test]
    fn test_frontend() {
        let frontend = CobolFrontend::default();
        let source = SourceFile::new("hello.cbl", "DISPLAY \"HI\".".to_string());
        let program = frontend.parse(&source).unwrap();
        assert_eq!(program.children.len(), 1);
        assert!(frontend.file_extensions().contains(&"cob"));

        let bad = SourceFile::new("bad.cbl", "DISPLAY ~".to_string());
        assert!(matches!(frontend.parse(&bad), Err(TranspileError::Lex(_))));
    }
}
