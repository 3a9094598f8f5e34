//! # transcob CLI
//!
//! Command-line front end for the COBOL subset translator.
//!
//! ## Quick Start
//!
//! ```bash
//! # Translate a single file to Java
//! transcob transpile payroll.cob -o Payroll.java
//!
//! # Translate to Rust instead
//! transcob transpile payroll.cob --target rust
//!
//! # Batch translate a directory
//! transcob batch legacy/ --output-dir java/ -r
//!
//! # Inspect the lexer and parser output
//! transcob tokens payroll.cob --format json
//! transcob ast payroll.cob
//! ```

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use console::{style, Emoji};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use transcob::{
    is_cobol_extension, java_class_name, CodegenOptions, DatabaseConfig, NodeKind, SourceFile,
    SymbolTable, Target, TokenCategory, Transpiler,
};
use walkdir::WalkDir;

static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "");
static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK] ");
static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR] ");
static GEAR: Emoji<'_, '_> = Emoji("⚙️  ", "");
static FOLDER: Emoji<'_, '_> = Emoji("📁 ", "");
static FILE: Emoji<'_, '_> = Emoji("📄 ", "");

/// transcob - COBOL subset to Java/Rust translator
#[derive(Parser)]
#[command(name = "transcob")]
#[command(version)]
#[command(about = "Translate a COBOL subset into Java or Rust", long_about = LONG_ABOUT)]
#[command(after_help = AFTER_HELP)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,
}

const LONG_ABOUT: &str = r#"
transcob translates a small COBOL subset (DISPLAY, MOVE, STOP RUN, CALL and
EXEC SQL) into a Java class or a Rust program. Division headers are skipped.
The first lexical, syntax or generation error aborts the translation and no
output file is written.
"#;

const AFTER_HELP: &str = r#"
EXAMPLES:
    transcob transpile code.cob             Translate to code.java
    transcob transpile code.cob -t rust     Translate to code.rs
    transcob batch legacy/ -o java/ -r      Batch translate a directory tree
    transcob tokens code.cob                Show the token stream
    transcob ast code.cob --format json     Show the syntax tree as JSON
    transcob info code.cob                  Analyze a source file
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TargetArg {
    Java,
    Rust,
}

impl From<TargetArg> for Target {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Java => Target::Java,
            TargetArg::Rust => Target::Rust,
        }
    }
}

/// Code generation flags shared by `transpile` and `batch`
#[derive(Debug, Args)]
struct CodegenArgs {
    /// Target language
    #[arg(short, long, value_enum, default_value_t = TargetArg::Java)]
    target: TargetArg,

    /// Embed string literals with their enclosing quotes
    #[arg(long)]
    keep_quotes: bool,

    /// Name of the generated Java class (default: derived from the input file name)
    #[arg(long)]
    class_name: Option<String>,

    /// Omit the provenance header from Rust output
    #[arg(long)]
    no_header: bool,

    /// Database host used by EXEC SQL blocks
    #[arg(long, default_value = "localhost")]
    db_host: String,

    /// Database port used by EXEC SQL blocks
    #[arg(long, default_value_t = 3306)]
    db_port: u16,

    /// Database name used by EXEC SQL blocks
    #[arg(long, default_value = "mydb")]
    db_name: String,

    /// Database user used by EXEC SQL blocks
    #[arg(long, default_value = "user")]
    db_user: String,

    /// Database password used by EXEC SQL blocks
    #[arg(long, default_value = "password")]
    db_password: String,

    /// Declare a variable type for output annotations (NAME=TYPE, repeatable)
    #[arg(long = "declare", value_name = "NAME=TYPE", value_parser = parse_declaration)]
    declarations: Vec<(String, String)>,
}

impl CodegenArgs {
    fn options(&self, class_name: String) -> CodegenOptions {
        CodegenOptions {
            target: self.target.into(),
            strip_string_quotes: !self.keep_quotes,
            class_name,
            include_header: !self.no_header,
            database: DatabaseConfig {
                host: self.db_host.clone(),
                port: self.db_port,
                database: self.db_name.clone(),
                user: self.db_user.clone(),
                password: self.db_password.clone(),
            },
        }
    }

    /// Plan the translation of `input`.
    ///
    /// Without an explicit `output`, Java lands in `<class>.java` under `out_dir`
    /// so the file name matches the public class; Rust keeps the input stem.
    fn translation(&self, input: &Path, output: Option<PathBuf>, out_dir: &Path) -> Translation {
        let class_name = self.class_name.clone().unwrap_or_else(|| {
            let stem = input.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
            java_class_name(&stem)
        });
        let options = self.options(class_name);
        let output = output.unwrap_or_else(|| match options.target {
            Target::Java => out_dir.join(format!("{}.java", options.class_name)),
            Target::Rust => out_dir
                .join(input.file_name().unwrap_or_default())
                .with_extension(Target::Rust.file_extension()),
        });

        Translation {
            input: input.to_path_buf(),
            output,
            options,
        }
    }

    fn symbols(&self) -> SymbolTable {
        let mut symbols = SymbolTable::new();
        for (name, ty) in &self.declarations {
            symbols.declare(name, ty);
        }
        symbols
    }
}

fn parse_declaration(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, ty)) if !name.trim().is_empty() && !ty.trim().is_empty() => {
            Ok((name.trim().to_string(), ty.trim().to_string()))
        }
        _ => Err(format!("expected NAME=TYPE, got `{}`", s)),
    }
}

/// One planned source-to-target translation
struct Translation {
    input: PathBuf,
    output: PathBuf,
    options: CodegenOptions,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a COBOL source file
    Transpile {
        /// Input file
        input: PathBuf,

        /// Output file (default: input with the target extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        codegen: CodegenArgs,
    },

    /// Batch translate every COBOL file in a directory
    Batch {
        /// Input directory
        input: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Recursive search
        #[arg(short, long)]
        recursive: bool,

        /// Number of parallel jobs
        #[arg(short, long, default_value = "4")]
        jobs: usize,

        /// Continue on errors
        #[arg(long)]
        keep_going: bool,

        #[command(flatten)]
        codegen: CodegenArgs,
    },

    /// Print the token stream of a source file
    Tokens {
        /// Source file to tokenize
        input: PathBuf,
    },

    /// Print the syntax tree of a source file
    Ast {
        /// Source file to parse
        input: PathBuf,
    },

    /// Show information about a source file
    Info {
        /// Source file to analyze
        file: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays parseable
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    } else if !cli.quiet {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_writer(std::io::stderr)
            .init();
    }

    let ctx = Output {
        quiet: cli.quiet,
        format: cli.format,
    };

    match cli.command {
        Commands::Transpile {
            input,
            output,
            codegen,
        } => run_transpile(&ctx, &input, output, &codegen),
        Commands::Batch {
            input,
            output_dir,
            recursive,
            jobs,
            keep_going,
            codegen,
        } => run_batch(&ctx, &input, output_dir, recursive, jobs, keep_going, &codegen),
        Commands::Tokens { input } => show_tokens(&ctx, &input),
        Commands::Ast { input } => show_ast(&ctx, &input),
        Commands::Info { file } => show_info(&ctx, &file),
        Commands::Completions { shell } => {
            generate_completions(shell);
            Ok(())
        }
    }
}

/// Global output settings
struct Output {
    quiet: bool,
    format: OutputFormat,
}

impl Output {
    fn decorated(&self) -> bool {
        !self.quiet && self.format == OutputFormat::Text
    }
}

fn read_source(path: &Path) -> Result<SourceFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(SourceFile::new(&path.display().to_string(), content))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Translate one file and write the result; nothing is written on failure
fn transpile_to(translation: &Translation, symbols: &SymbolTable) -> Result<usize> {
    let Translation {
        input,
        output,
        options,
    } = translation;
    let source = read_source(input)?;
    let code = Transpiler::new(options.clone())
        .with_symbols(symbols)
        .transpile_file(&source)
        .with_context(|| format!("Failed to translate {}", input.display()))?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(output, &code)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!(input = %input.display(), output = %output.display(), "wrote translation");
    Ok(code.lines().count())
}

#[derive(Serialize)]
struct TranspileReport {
    input: String,
    output: String,
    target: Target,
    lines: usize,
}

fn run_transpile(
    ctx: &Output,
    input: &Path,
    output: Option<PathBuf>,
    codegen: &CodegenArgs,
) -> Result<()> {
    let symbols = codegen.symbols();
    let translation = codegen.translation(input, output, input.parent().unwrap_or(Path::new("")));
    let output_path = &translation.output;
    let target = translation.options.target;

    if ctx.decorated() {
        println!();
        println!(
            "{}Transpiling {} -> {}",
            ROCKET,
            style(input.display()).cyan(),
            style(output_path.display()).green()
        );
        println!(
            "  {}Target: {}",
            GEAR,
            style(target).yellow()
        );
    }

    let lines = transpile_to(&translation, &symbols)?;

    if ctx.quiet {
        return Ok(());
    }
    match ctx.format {
        OutputFormat::Json => print_json(&TranspileReport {
            input: input.display().to_string(),
            output: output_path.display().to_string(),
            target,
            lines,
        })?,
        OutputFormat::Text => {
            println!("{}Transpilation complete!", CHECK);
            println!(
                "  {}Output: {} ({} lines)",
                FILE,
                style(output_path.display()).green(),
                lines
            );
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct BatchReport {
    successful: usize,
    failed: Vec<BatchFailure>,
}

#[derive(Serialize)]
struct BatchFailure {
    file: String,
    error: String,
}

fn run_batch(
    ctx: &Output,
    input: &Path,
    output_dir: Option<PathBuf>,
    recursive: bool,
    jobs: usize,
    keep_going: bool,
    codegen: &CodegenArgs,
) -> Result<()> {
    let output_dir = output_dir.unwrap_or_else(|| PathBuf::from("transcob_output"));
    let jobs = jobs.max(1);

    if ctx.decorated() {
        println!("\n{}Batch transpilation", FOLDER);
        println!("  Source: {}", style(input.display()).cyan());
        println!("  Output: {}", style(output_dir.display()).green());
        println!("  Jobs: {}", jobs);
    }

    let walker = if recursive {
        WalkDir::new(input)
    } else {
        WalkDir::new(input).max_depth(1)
    };

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to scan {}", input.display()))?;
        let is_cobol = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(is_cobol_extension)
            .unwrap_or(false);
        if entry.file_type().is_file() && is_cobol {
            files.push(entry.into_path());
        }
    }
    files.sort();

    if files.is_empty() {
        if !ctx.quiet {
            println!("{}No COBOL source files found!", CROSS);
        }
        return Ok(());
    }

    if ctx.decorated() {
        println!("  Found: {} files\n", style(files.len()).yellow());
    }

    let symbols = codegen.symbols();
    let translations: Vec<Translation> = files
        .iter()
        .map(|path| {
            let rel_dir = path
                .strip_prefix(input)
                .ok()
                .and_then(Path::parent)
                .unwrap_or(Path::new(""));
            codegen.translation(path, None, &output_dir.join(rel_dir))
        })
        .collect();

    let mut claimed: HashMap<&Path, &Path> = HashMap::new();
    for translation in &translations {
        if let Some(previous) = claimed.insert(&translation.output, &translation.input) {
            bail!(
                "{} and {} would both be written to {}",
                previous.display(),
                translation.input.display(),
                translation.output.display()
            );
        }
    }

    let progress = if ctx.decorated() {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} files {msg}")?,
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let next = AtomicUsize::new(0);
    let stop = AtomicBool::new(false);
    let succeeded = AtomicUsize::new(0);
    let failures: Mutex<Vec<(PathBuf, anyhow::Error)>> = Mutex::new(Vec::new());

    std::thread::scope(|scope| {
        for _ in 0..jobs.min(files.len()) {
            scope.spawn(|| loop {
                if stop.load(Ordering::Relaxed) {
                    break;
                }
                let index = next.fetch_add(1, Ordering::Relaxed);
                let Some(translation) = translations.get(index) else {
                    break;
                };

                let path = &translation.input;
                let rel_path = path.strip_prefix(input).unwrap_or(path);
                progress.set_message(rel_path.display().to_string());

                match transpile_to(translation, &symbols) {
                    Ok(_) => {
                        succeeded.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(e) => {
                        tracing::debug!(file = %path.display(), error = %e, "translation failed");
                        if !keep_going {
                            stop.store(true, Ordering::Relaxed);
                        }
                        if let Ok(mut failures) = failures.lock() {
                            failures.push((path.clone(), e));
                        }
                    }
                }
                progress.inc(1);
            });
        }
    });

    progress.finish_and_clear();

    let mut failures = failures
        .into_inner()
        .map_err(|_| anyhow::anyhow!("batch worker panicked"))?;
    failures.sort_by(|a, b| a.0.cmp(&b.0));
    let successful = succeeded.load(Ordering::Relaxed);

    if !keep_going {
        if let Some((_, error)) = failures.into_iter().next() {
            return Err(error);
        }
        failures = Vec::new();
    }

    if !ctx.quiet {
        match ctx.format {
            OutputFormat::Json => print_json(&BatchReport {
                successful,
                failed: failures
                    .iter()
                    .map(|(path, error)| BatchFailure {
                        file: path.display().to_string(),
                        error: format!("{:#}", error),
                    })
                    .collect(),
            })?,
            OutputFormat::Text => {
                for (path, error) in &failures {
                    println!("{}{}: {:#}", CROSS, style(path.display()).red(), error);
                }
                println!("\n{}Batch complete!", CHECK);
                println!(
                    "  {} successful, {} failed",
                    style(successful).green(),
                    style(failures.len()).red()
                );
            }
        }
    }

    if !failures.is_empty() {
        bail!("{} of {} files failed", failures.len(), files.len());
    }
    Ok(())
}

fn show_tokens(ctx: &Output, input: &Path) -> Result<()> {
    let source = read_source(input)?;
    let tokens = Transpiler::default()
        .tokenize(&source.content)
        .with_context(|| format!("Failed to tokenize {}", input.display()))?;

    match ctx.format {
        OutputFormat::Json => print_json(&tokens)?,
        OutputFormat::Text => {
            for token in &tokens {
                println!("{}", token);
            }
        }
    }
    Ok(())
}

fn show_ast(ctx: &Output, input: &Path) -> Result<()> {
    let source = read_source(input)?;
    let program = Transpiler::default()
        .parse(&source.content)
        .with_context(|| format!("Failed to parse {}", input.display()))?;

    match ctx.format {
        OutputFormat::Json => print_json(&program)?,
        OutputFormat::Text => print!("{}", program),
    }
    Ok(())
}

#[derive(Serialize)]
struct FileInfo {
    file: String,
    total_lines: usize,
    code_lines: usize,
    blank_lines: usize,
    comment_lines: usize,
    tokens: usize,
    statements: Vec<StatementCount>,
}

#[derive(Serialize)]
struct StatementCount {
    kind: NodeKind,
    count: usize,
}

const STATEMENT_KINDS: &[NodeKind] = &[
    NodeKind::DisplayStatement,
    NodeKind::MoveStatement,
    NodeKind::StopRun,
    NodeKind::CallStatement,
    NodeKind::ExecSql,
];

fn show_info(ctx: &Output, file: &Path) -> Result<()> {
    let source = read_source(file)?;
    let transpiler = Transpiler::default();
    let tokens = transpiler
        .tokenize(&source.content)
        .with_context(|| format!("Failed to tokenize {}", file.display()))?;
    let program = transpiler
        .parse(&source.content)
        .with_context(|| format!("Failed to parse {}", file.display()))?;

    let lines: Vec<&str> = source.content.lines().collect();
    let blank_lines = lines.iter().filter(|l| l.trim().is_empty()).count();
    let comment_lines = lines
        .iter()
        .filter(|l| l.trim_start().starts_with("*>"))
        .count();

    let info = FileInfo {
        file: source.name.clone(),
        total_lines: lines.len(),
        code_lines: lines.len() - blank_lines - comment_lines,
        blank_lines,
        comment_lines,
        tokens: tokens
            .iter()
            .filter(|t| t.category != TokenCategory::Comment)
            .count(),
        statements: STATEMENT_KINDS
            .iter()
            .map(|&kind| StatementCount {
                kind,
                count: program.count(kind),
            })
            .collect(),
    };

    match ctx.format {
        OutputFormat::Json => print_json(&info)?,
        OutputFormat::Text => {
            println!("\n{}File Analysis: {}", FILE, style(file.display()).cyan());
            println!("{}", "─".repeat(50));
            println!("  Total lines:   {}", style(info.total_lines).yellow());
            println!("  Code lines:    {}", style(info.code_lines).yellow());
            println!("  Comment lines: {}", info.comment_lines);
            println!("  Blank lines:   {}", info.blank_lines);
            println!("  Tokens:        {}", info.tokens);
            println!("\n  {}Statements:", GEAR);
            for entry in &info.statements {
                println!("    {:<18}{}", entry.kind, entry.count);
            }
        }
    }
    Ok(())
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;

    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "transcob", &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_declaration() {
        assert_eq!(
            parse_declaration("VAR1=PIC 9(3)").unwrap(),
            ("VAR1".to_string(), "PIC 9(3)".to_string())
        );
        assert!(parse_declaration("VAR1").is_err());
        assert!(parse_declaration("=PIC X").is_err());
    }

    #[test]
    fn test_codegen_args_to_options() {
        let cli = Cli::parse_from([
            "transcob",
            "transpile",
            "a.cob",
            "--target",
            "rust",
            "--keep-quotes",
            "--db-port",
            "5432",
            "--declare",
            "X=PIC 9",
        ]);
        let Commands::Transpile { codegen, .. } = cli.command else {
            panic!("expected transpile command");
        };
        let translation = codegen.translation(Path::new("a.cob"), None, Path::new("out"));
        let options = &translation.options;
        assert_eq!(options.target, Target::Rust);
        assert!(!options.strip_string_quotes);
        assert_eq!(options.database.port, 5432);
        assert_eq!(translation.output, Path::new("out").join("a.rs"));
        assert_eq!(codegen.symbols().type_of("X"), "PIC 9");
    }

    #[test]
    fn test_java_output_named_after_class() {
        let cli = Cli::parse_from(["transcob", "transpile", "payroll-run.cob"]);
        let Commands::Transpile { codegen, .. } = cli.command else {
            panic!("expected transpile command");
        };
        let input = Path::new("src/payroll-run.cob");
        let translation = codegen.translation(input, None, Path::new("src"));
        assert_eq!(translation.options.class_name, "PayrollRun");
        assert_eq!(translation.output, Path::new("src").join("PayrollRun.java"));

        let cli = Cli::parse_from(["transcob", "transpile", "a.cob", "--class-name", "Main"]);
        let Commands::Transpile { codegen, .. } = cli.command else {
            panic!("expected transpile command");
        };
        let translation = codegen.translation(Path::new("a.cob"), None, Path::new(""));
        assert_eq!(translation.output, Path::new("Main.java"));
    }
}
