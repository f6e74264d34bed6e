use std::{path::PathBuf, process::ExitCode, time::Instant};

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use tinylang::{
    compile, errors::errors::CompileError, lexer::LexerKind, parser::parse, render_diagnostic,
    CompileOptions,
};

#[derive(Debug, Parser)]
#[command(name = "tinylang", about = "Front end for the tiny language")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Raise the default log level (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the token stream
    Tokens(FileArgs),
    /// Print the syntax tree
    Ast(FileArgs),
    /// Run every stage and report the first failing one
    Check(FileArgs),
}

#[derive(Debug, Args)]
struct FileArgs {
    file: PathBuf,

    #[arg(long, value_enum, default_value_t = LexerChoice::Scanner)]
    lexer: LexerChoice,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LexerChoice {
    Regex,
    Scanner,
}

impl From<LexerChoice> for LexerKind {
    fn from(choice: LexerChoice) -> Self {
        match choice {
            LexerChoice::Regex => LexerKind::Regex,
            LexerChoice::Scanner => LexerKind::Scanner,
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let args = match &cli.command {
        Command::Tokens(args) | Command::Ast(args) | Command::Check(args) => args,
    };

    let source = match std::fs::read_to_string(&args.file) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Error: could not read {}: {}", args.file.display(), error);
            return ExitCode::FAILURE;
        }
    };
    let file_name = args.file.display().to_string();
    let lexer = LexerKind::from(args.lexer);

    let start = Instant::now();
    let result = match &cli.command {
        Command::Tokens(_) => tokens_command(&source, lexer),
        Command::Ast(_) => ast_command(&source, lexer),
        Command::Check(_) => check_command(&source, lexer),
    };
    debug!(elapsed = ?start.elapsed(), "finished");

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            for report in error.reports() {
                eprint!("{}", render_diagnostic(&source, &file_name, report));
            }
            ExitCode::FAILURE
        }
    }
}

fn tokens_command(source: &str, lexer: LexerKind) -> Result<(), CompileError> {
    let tokens = tinylang::lexer::tokenize(source, lexer)?;
    for token in &tokens {
        println!("{}", token);
    }
    Ok(())
}

fn ast_command(source: &str, lexer: LexerKind) -> Result<(), CompileError> {
    let tokens = tinylang::lexer::tokenize(source, lexer)?;
    let program = parse(tokens)?;
    println!("{:#?}", program);
    Ok(())
}

fn check_command(source: &str, lexer: LexerKind) -> Result<(), CompileError> {
    let compilation = compile(source, &CompileOptions { lexer })?;

    info!(
        functions = compilation.program.functions().count(),
        "program is well formed"
    );
    println!(
        "ok: {} items, {} typed expressions",
        compilation.program.items.len(),
        compilation.types.len()
    );
    Ok(())
}
