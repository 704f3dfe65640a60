//! flatdb interactive shell
//!
//! Reads statements (possibly spanning several lines, terminated by `;`),
//! runs them through the SQL pipeline and prints the result. Meta-commands:
//! `\l` list tables, `\h` help, `\c` clear screen, `\q` quit.

use anyhow::Context;
use clap::Parser;
use flatdb::{execute_sql, DBConfig, DbError, QueryExecutor};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "flatdb-cli", version, about = "Interactive shell for a flatdb data directory")]
struct Args {
    /// Data directory (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn build_config(args: &Args) -> anyhow::Result<DBConfig> {
    let mut config = match &args.config {
        Some(path) => DBConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DBConfig::default(),
    };
    if let Some(dir) = &args.data_dir {
        config = config.with_data_dir(dir.clone());
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = build_config(&args)?;

    let executor = QueryExecutor::new(config).context("Error initializing database")?;
    Shell::new(executor).run()
}

/// Outcome of reading one command from stdin
#[derive(Debug, PartialEq)]
enum Input {
    Command(String),
    Eof,
}

struct Shell {
    executor: QueryExecutor,
    running: bool,
}

impl Shell {
    fn new(executor: QueryExecutor) -> Self {
        Self {
            executor,
            running: true,
        }
    }

    fn run(&mut self) -> anyhow::Result<()> {
        println!("flatdb v{}", VERSION);
        println!("==========={}", "=".repeat(VERSION.len()));
        println!("Type 'help' or '\\h' for help, '\\q' to quit.\n");

        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();

        while self.running {
            print_prompt("flatdb> ")?;

            let command = match read_command(&mut lines)? {
                Input::Command(command) => command,
                Input::Eof => break,
            };
            if command.is_empty() {
                continue;
            }

            let output = if is_meta_command(&command) {
                self.process_meta_command(&command)?
            } else {
                self.process_sql(&command)
            };

            if !output.is_empty() {
                println!("{}", output);
            }
            println!();
        }

        Ok(())
    }

    fn process_meta_command(&mut self, input: &str) -> anyhow::Result<String> {
        let cmd = input.strip_prefix('\\').unwrap_or(input).to_lowercase();
        let cmd = cmd.strip_suffix(';').unwrap_or(&cmd);

        Ok(match cmd {
            "q" | "quit" | "exit" => {
                self.running = false;
                "Goodbye!".to_string()
            }
            "l" | "list" => self.executor.list_tables(),
            "h" | "help" => self.executor.show_help().to_string(),
            "c" | "clear" => {
                print!("\x1b[2J\x1b[H");
                io::stdout().flush()?;
                String::new()
            }
            _ => format!("Unknown meta command: {}", input),
        })
    }

    fn process_sql(&mut self, input: &str) -> String {
        let sql = input.strip_suffix(';').unwrap_or(input);
        match execute_sql(&mut self.executor, sql) {
            Ok(output) => output,
            Err(DbError::ParseError(msg)) => format!("Parse Error: {}", msg),
            Err(e) => format!("Error: {}", e),
        }
    }
}

fn print_prompt(prompt: &str) -> io::Result<()> {
    print!("{}", prompt);
    io::stdout().flush()
}

/// Accumulate trimmed lines until one ends with `;`, is a meta-command, or is
/// blank after some input has been collected.
fn read_command<B: BufRead>(lines: &mut io::Lines<B>) -> io::Result<Input> {
    let mut command = String::new();

    loop {
        let line = match lines.next() {
            Some(line) => line?,
            None => return Ok(Input::Eof),
        };
        let line = line.trim();

        if line.is_empty() {
            if command.is_empty() {
                print_prompt("flatdb> ")?;
                continue;
            }
            break;
        }

        command.push_str(line);
        if line.ends_with(';') || is_meta_command(line) {
            break;
        }

        command.push(' ');
        print_prompt("    -> ")?;
    }

    Ok(Input::Command(command.trim_end().to_string()))
}

fn is_meta_command(input: &str) -> bool {
    if input.starts_with('\\') {
        return true;
    }
    let lower = input.to_lowercase();
    let word = lower.strip_suffix(';').unwrap_or(&lower);
    matches!(word, "help" | "exit" | "quit" | "clear")
}
