use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use rtacc::tokenizer::{TokenKind, Tokenizer, describe_token};

/// Three-address code generator for a small imperative language.
#[derive(Parser)]
#[command(name = "rtacc", version)]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Show a source file, optionally with line numbers.
  Print {
    file: PathBuf,
    #[arg(short, long)]
    numbered: bool,
  },
  /// Dump the token stream of a source file.
  Tokenize { file: PathBuf },
  /// Generate three-address code and print the listing.
  Gen {
    file: PathBuf,
    /// Also write the rendered listing to this path.
    #[arg(short, long)]
    output: Option<PathBuf>,
  },
}

fn main() {
  let cli = Cli::parse();
  if let Err(message) = run(cli) {
    eprintln!("{message}");
    process::exit(1);
  }
}

fn run(cli: Cli) -> Result<(), String> {
  match cli.command {
    Command::Print { file, numbered } => {
      let source = read_source(&file)?;
      print_source(&source, numbered);
      Ok(())
    }
    Command::Tokenize { file } => {
      let source = read_source(&file)?;
      print_tokens(&source).map_err(|err| err.to_string())
    }
    Command::Gen { file, output } => {
      let source = read_source(&file)?;
      let program = rtacc::generate_tac(&source).map_err(|err| err.to_string())?;
      print!("{program}");
      if let Some(path) = output {
        fs::write(&path, program.to_string())
          .map_err(|err| format!("cannot write {}: {err}", path.display()))?;
      }
      Ok(())
    }
  }
}

fn read_source(path: &Path) -> Result<String, String> {
  fs::read_to_string(path).map_err(|err| format!("cannot read {}: {err}", path.display()))
}

fn print_source(source: &str, numbered: bool) {
  if numbered {
    let width = source.lines().count().to_string().len();
    for (i, line) in source.lines().enumerate() {
      println!("{:>width$} | {}", i + 1, line, width = width);
    }
  } else {
    print!("{source}");
  }
}

/// One token per line, offset first, stopping at the first lexical error.
fn print_tokens(source: &str) -> rtacc::CompileResult<()> {
  let mut tokens = Tokenizer::new(source);
  loop {
    let token = tokens.next_token()?;
    println!("{:>4}  {:?} {}", token.loc, token.kind, describe_token(&token, source));
    if token.kind == TokenKind::Eof {
      return Ok(());
    }
  }
}
