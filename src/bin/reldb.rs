//! Interactive shell for reldb
//!
//! Reads SQL statements terminated by `;`, executes them through the
//! engine, and renders result sets as aligned text tables. Statement
//! errors are printed and the loop continues.

use clap::Parser;
use reldb::{Engine, EngineConfig, ExecutionResult, ResultSet};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const PRIMARY_PROMPT: &str = "sql> ";
const CONTINUATION_PROMPT: &str = " ... ";

#[derive(Parser)]
#[command(name = "reldb")]
#[command(about = "Embedded relational database shell")]
struct Cli {
    /// Database snapshot file
    #[arg(default_value = "database.db")]
    database: PathBuf,

    /// Execute one statement and exit
    #[arg(short, long)]
    execute: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut engine = match Engine::open(EngineConfig::new(&cli.database)) {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(sql) = cli.execute {
        return match engine.execute_sql(&sql) {
            Ok(result) => {
                print_result(&result);
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("Error: {err}");
                ExitCode::FAILURE
            }
        };
    }

    match repl(&mut engine) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn repl(engine: &mut Engine) -> rustyline::Result<()> {
    println!("reldb shell. Statements end with ';'. Type 'help' or 'exit'.");
    let mut editor = DefaultEditor::new()?;
    let mut buffer = String::new();

    loop {
        let prompt = if buffer.is_empty() {
            PRIMARY_PROMPT
        } else {
            CONTINUATION_PROMPT
        };
        match editor.readline(prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if buffer.is_empty() {
                    match trimmed.to_ascii_lowercase().as_str() {
                        "exit" | "quit" => {
                            println!("Goodbye!");
                            break;
                        }
                        "help" => {
                            print_help();
                            continue;
                        }
                        "tables" => {
                            for name in engine.storage().table_names() {
                                println!("{name}");
                            }
                            continue;
                        }
                        "" => continue,
                        _ => {}
                    }
                }
                if !buffer.is_empty() {
                    buffer.push(' ');
                }
                buffer.push_str(trimmed);
                if !buffer.ends_with(';') {
                    continue;
                }
                let sql = std::mem::take(&mut buffer);
                let _ = editor.add_history_entry(&sql);
                match engine.execute_sql(&sql) {
                    Ok(result) => print_result(&result),
                    Err(err) => println!("Error: {err}"),
                }
            }
            Err(ReadlineError::Interrupted) => {
                buffer.clear();
                println!("^C");
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

fn print_help() {
    println!("Statements:");
    println!("  CREATE TABLE t (col TYPE [NOT NULL] [PRIMARY KEY], ..., UNIQUE(col));");
    println!("  INSERT INTO t [(cols)] VALUES (values);");
    println!("  SELECT cols FROM t [JOIN t2 ON a.x = b.y] [WHERE ...] [ORDER BY col] [LIMIT n];");
    println!("  UPDATE t SET col = value [WHERE ...];");
    println!("  DELETE FROM t [WHERE ...];");
    println!("  CREATE INDEX name ON t(col);");
    println!("Types: INT, VARCHAR(n), TEXT, DATE, FLOAT, BOOL");
    println!("Shell: help, tables, exit");
}

fn print_result(result: &ExecutionResult) {
    match result {
        ExecutionResult::TableCreated => println!("Table created"),
        ExecutionResult::Inserted(row_id) => println!("Inserted row with id {row_id}"),
        ExecutionResult::Rows(rows) => print_rows(rows),
        ExecutionResult::Updated(count) => println!("Updated {count} row(s)"),
        ExecutionResult::Deleted(count) => println!("Deleted {count} row(s)"),
        ExecutionResult::IndexCreated => println!("Index created"),
    }
}

fn print_rows(result: &ResultSet) {
    if result.rows.is_empty() {
        println!("No rows found");
        return;
    }
    let headers: Vec<String> = result.columns.iter().map(|c| c.to_string()).collect();
    let mut widths: Vec<usize> = headers.iter().map(String::len).collect();
    let rendered: Vec<Vec<String>> = result
        .rows
        .iter()
        .map(|row| row.iter().map(|value| value.as_text()).collect())
        .collect();
    for row in &rendered {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(header, &width)| format!("{header:<width$}"))
        .collect();
    println!("{}", line.join(" | "));
    println!(
        "{}",
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("-+-")
    );
    for row in &rendered {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect();
        println!("{}", line.join(" | "));
    }
    println!("{} row(s) returned", rendered.len());
}
